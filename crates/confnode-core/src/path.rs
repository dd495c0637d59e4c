use std::sync::Arc;

use crate::meta::MetaId;
use crate::value::{format_key, Value};

/// Position of a node in a data tree
///
/// A persistent chain from the node back to the root. A frame extends the
/// chain with [`Path::child`] or re-keys it with [`Path::with_key`]; an
/// existing `Path` is never modified, so siblings can share their parent.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    parent: Option<Arc<Path>>,
    meta: MetaId,
    ident: String,
    key: Vec<Value>,
}

impl Path {
    pub fn root(meta: MetaId, ident: &str) -> Arc<Path> {
        Arc::new(Path {
            parent: None,
            meta,
            ident: ident.to_string(),
            key: Vec::new(),
        })
    }

    pub fn child(self: &Arc<Self>, meta: MetaId, ident: &str) -> Arc<Path> {
        Arc::new(Path {
            parent: Some(Arc::clone(self)),
            meta,
            ident: ident.to_string(),
            key: Vec::new(),
        })
    }

    /// Same position, addressing the list item identified by `key`
    pub fn with_key(&self, key: Vec<Value>) -> Arc<Path> {
        Arc::new(Path {
            parent: self.parent.clone(),
            meta: self.meta,
            ident: self.ident.clone(),
            key,
        })
    }

    pub fn parent(&self) -> Option<&Arc<Path>> {
        self.parent.as_ref()
    }

    pub fn meta(&self) -> MetaId {
        self.meta
    }

    pub fn ident(&self) -> &str {
        &self.ident
    }

    pub fn key(&self) -> &[Value] {
        &self.key
    }

    /// Number of segments including the root
    pub fn depth(&self) -> usize {
        let mut n = 1;
        let mut current = self.parent.as_deref();
        while let Some(p) = current {
            n += 1;
            current = p.parent.as_deref();
        }
        n
    }

    /// Segments from the root down to this one
    pub fn segments(&self) -> Vec<&Path> {
        let mut out = vec![self];
        let mut current = self.parent.as_deref();
        while let Some(p) = current {
            out.push(p);
            current = p.parent.as_deref();
        }
        out.reverse();
        out
    }
}

impl std::fmt::Display for Path {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, segment) in self.segments().into_iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            f.write_str(&segment.ident)?;
            if !segment.key.is_empty() {
                write!(f, "={}", format_key(&segment.key))?;
            }
        }
        Ok(())
    }
}
