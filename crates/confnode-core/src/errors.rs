use confnode_core_types::{RequestId, TraceId};
use thiserror::Error;

/// Result type alias using NodeError
pub type Result<T> = std::result::Result<T, NodeError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code and to the HTTP status a
/// RESTCONF-style handler reports for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Structural
    Conflict,
    NotFound,
    UnknownIdent,

    // Request/definition validation
    InvalidInput,
    InvalidSchema,
    TypeMismatch,
    NotImplemented,

    // Integration/IO
    Backend,
    Io,
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::Conflict => "ERR_CONFLICT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::UnknownIdent => "ERR_UNKNOWN_IDENT",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidSchema => "ERR_INVALID_SCHEMA",
            ExErrorKind::TypeMismatch => "ERR_TYPE_MISMATCH",
            ExErrorKind::NotImplemented => "ERR_NOT_IMPLEMENTED",
            ExErrorKind::Backend => "ERR_BACKEND",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// HTTP-equivalent status for protocol handlers
    pub fn status(&self) -> u16 {
        match self {
            ExErrorKind::Conflict => 409,
            ExErrorKind::NotFound => 404,
            ExErrorKind::NotImplemented => 501,
            ExErrorKind::UnknownIdent
            | ExErrorKind::InvalidInput
            | ExErrorKind::InvalidSchema
            | ExErrorKind::TypeMismatch
            | ExErrorKind::Serialization => 400,
            ExErrorKind::Backend | ExErrorKind::Io | ExErrorKind::Internal => 500,
        }
    }
}

/// Canonical structured error type
///
/// What a protocol-facing caller sees: a classification plus enough of the
/// tree address to locate the offending node in the request document.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    path: Option<String>,
    ident: Option<String>,
    request_id: Option<RequestId>,
    trace_id: Option<TraceId>,
    message: String,
}

impl ExError {
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            path: None,
            ident: None,
            request_id: None,
            trace_id: None,
            message: String::new(),
        }
    }

    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_ident(mut self, ident: impl Into<String>) -> Self {
        self.ident = Some(ident.into());
        self
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn status(&self) -> u16 {
        self.kind.status()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn ident(&self) -> Option<&str> {
        self.ident.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] status {}", self.code(), self.status())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        if let Some(request_id) = &self.request_id {
            write!(f, " (request_id: {})", request_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Typed errors raised while navigating, reading or editing a tree
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NodeError {
    // ===== Edit strategy violations =====
    /// Insert targeted a container that already exists
    #[error("Duplicate item '{ident}' found in '{path}'")]
    Duplicate { ident: String, path: String },

    /// Insert targeted a list item whose key already exists
    #[error("Duplicate item found with same key in list {path}")]
    DuplicateListItem { path: String },

    /// Update targeted a container that does not exist
    #[error("cannot update '{ident}' not found in '{path}' container destination node")]
    NotFound { ident: String, path: String },

    /// Update targeted a list item that does not exist
    #[error("'{key}' not found in '{path}' list node")]
    ListItemNotFound { key: String, path: String },

    /// A protocol operation the engine recognises but does not implement
    #[error("Strategy not implemented: {strategy}")]
    StrategyNotImplemented { strategy: String },

    // ===== Navigation failures =====
    /// Destination refused to create a container it was asked to create
    #[error("'{path}' could not create '{ident}' container node")]
    CouldNotCreate { ident: String, path: String },

    /// Destination refused to create a list item it was asked to create
    #[error("Could not create destination list node {path}")]
    CouldNotCreateListItem { path: String },

    /// Backing store failure
    #[error("Backend failure at '{path}': {reason}")]
    Backend { path: String, reason: String },

    /// Identifier is not defined under the given schema node
    #[error("Unknown identifier '{ident}' under '{path}'")]
    UnknownIdent { ident: String, path: String },

    // ===== Values and definitions =====
    #[error("Type mismatch at '{path}': expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: String,
        found: String,
    },

    #[error("Invalid schema: {reason}")]
    InvalidSchema { reason: String },

    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("IO error reading {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl NodeError {
    pub fn kind(&self) -> ExErrorKind {
        match self {
            NodeError::Duplicate { .. } | NodeError::DuplicateListItem { .. } => {
                ExErrorKind::Conflict
            }
            NodeError::NotFound { .. } | NodeError::ListItemNotFound { .. } => {
                ExErrorKind::NotFound
            }
            NodeError::StrategyNotImplemented { .. } => ExErrorKind::NotImplemented,
            NodeError::CouldNotCreate { .. } | NodeError::CouldNotCreateListItem { .. } => {
                ExErrorKind::Internal
            }
            NodeError::Backend { .. } => ExErrorKind::Backend,
            NodeError::UnknownIdent { .. } => ExErrorKind::UnknownIdent,
            NodeError::TypeMismatch { .. } => ExErrorKind::TypeMismatch,
            NodeError::InvalidSchema { .. } => ExErrorKind::InvalidSchema,
            NodeError::InvalidInput { .. } => ExErrorKind::InvalidInput,
            NodeError::Io { .. } => ExErrorKind::Io,
            NodeError::Serialization(_) => ExErrorKind::Serialization,
        }
    }

    /// HTTP-equivalent status (409, 404, 501, ...)
    pub fn status(&self) -> u16 {
        self.kind().status()
    }

    /// Tree address the error refers to, when it has one
    pub fn path(&self) -> Option<&str> {
        match self {
            NodeError::Duplicate { path, .. }
            | NodeError::DuplicateListItem { path }
            | NodeError::NotFound { path, .. }
            | NodeError::ListItemNotFound { path, .. }
            | NodeError::CouldNotCreate { path, .. }
            | NodeError::CouldNotCreateListItem { path }
            | NodeError::Backend { path, .. }
            | NodeError::UnknownIdent { path, .. }
            | NodeError::TypeMismatch { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Schema identifier the error refers to, when it has one
    pub fn ident(&self) -> Option<&str> {
        match self {
            NodeError::Duplicate { ident, .. }
            | NodeError::NotFound { ident, .. }
            | NodeError::CouldNotCreate { ident, .. }
            | NodeError::UnknownIdent { ident, .. } => Some(ident),
            _ => None,
        }
    }
}

impl From<NodeError> for ExError {
    fn from(err: NodeError) -> Self {
        ExError::from(&err)
    }
}

impl From<&NodeError> for ExError {
    fn from(err: &NodeError) -> Self {
        let mut ex = ExError::new(err.kind()).with_message(err.to_string());
        if let Some(path) = err.path() {
            ex = ex.with_path(path);
        }
        if let Some(ident) = err.ident() {
            ex = ex.with_ident(ident);
        }
        ex
    }
}

impl From<serde_json::Error> for NodeError {
    fn from(err: serde_json::Error) -> Self {
        NodeError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for NodeError {
    fn from(err: serde_yaml::Error) -> Self {
        NodeError::Serialization(err.to_string())
    }
}
