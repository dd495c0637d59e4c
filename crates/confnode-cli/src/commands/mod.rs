pub mod check;
pub mod edit;

use std::fs;
use std::path::Path;

use confnode_core::errors::{NodeError, Result};
use serde_json::Value as Json;

/// Read and parse one JSON document
pub(crate) fn read_json(path: &Path) -> Result<Json> {
    let content = fs::read_to_string(path).map_err(|e| NodeError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    Ok(serde_json::from_str(&content)?)
}
