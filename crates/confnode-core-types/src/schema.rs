//! Canonical schema constants for structured logging and events
//!
//! These constants keep the edit engine, the CLI and error reporting using the
//! same field names.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";
pub const FIELD_TRACE_ID: &str = "trace_id";

// Tree addressing
pub const FIELD_PATH: &str = "path";
pub const FIELD_IDENT: &str = "ident";
pub const FIELD_STRATEGY: &str = "strategy";
pub const FIELD_KEY: &str = "key";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";
pub const FIELD_ERR_STATUS: &str = "err_status";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
