//! Check command
//!
//! Usage: confnode check --schema <FILE> <PATH>
//!
//! Decodes one document, or every `.json` document of a directory, against
//! the schema without editing anything.

use std::path::{Path, PathBuf};

use clap::Args;
use confnode_core::errors::{ExError, Result};
use confnode_core::meta::{load_schema_file, Schema};
use confnode_core::MemoryStore;

use super::read_json;

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Schema definition (YAML, or JSON with a .json extension)
    #[arg(long)]
    pub schema: PathBuf,

    /// JSON document or directory of documents
    pub path: PathBuf,
}

/// Execute check command
pub fn execute(args: CheckArgs) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let schema = load_schema_file(&args.schema).map_err(ExError::from)?;

    let documents = if args.path.is_dir() {
        // Sorted for deterministic output
        let mut files: Vec<PathBuf> = std::fs::read_dir(&args.path)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().map(|ext| ext == "json").unwrap_or(false))
            .collect();
        files.sort();
        files
    } else {
        vec![args.path.clone()]
    };

    for doc in documents {
        check_document(&schema, &doc).map_err(|e| ExError::from(e).with_op("check"))?;
        println!("✓ {}", doc.display());
    }

    Ok(())
}

fn check_document(schema: &Schema, path: &Path) -> Result<()> {
    MemoryStore::from_json(schema, &read_json(path)?)?;
    Ok(())
}
