//! Edit command
//!
//! Usage: confnode edit --schema <FILE> --source <FILE> [--target <FILE>]
//!        [--strategy <merge|create|update>] [--with-defaults] [--output <FILE>]

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use confnode_core::core_types::RequestContext;
use confnode_core::errors::{NodeError, Result};
use confnode_core::meta::load_schema_file;
use confnode_core::{EditOptions, EditStrategy, Editor, MemoryStore};

use super::read_json;

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Schema definition (YAML, or JSON with a .json extension)
    #[arg(long)]
    pub schema: PathBuf,

    /// JSON document to merge
    #[arg(long)]
    pub source: PathBuf,

    /// JSON document to merge into (default: empty tree)
    #[arg(long)]
    pub target: Option<PathBuf>,

    /// Edit operation: merge/upsert, create/insert or update
    #[arg(long, default_value = "merge")]
    pub strategy: String,

    /// Fill schema defaults into every visited node, not just created ones
    #[arg(long)]
    pub with_defaults: bool,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute edit command
pub fn execute(args: EditArgs) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let options = EditOptions {
        use_default: args.with_defaults,
    };
    let editor = Editor::new(&options).with_context(RequestContext::new());

    run(&args, &editor).map_err(|e| editor.describe_error(&e).into())
}

fn run(args: &EditArgs, editor: &Editor) -> Result<()> {
    let strategy: EditStrategy = args.strategy.parse()?;
    let schema = Arc::new(load_schema_file(&args.schema)?);

    let source = MemoryStore::from_json(&schema, &read_json(&args.source)?)?;
    let target = match &args.target {
        Some(path) => MemoryStore::from_json(&schema, &read_json(path)?)?,
        None => MemoryStore::new(),
    };

    editor.edit(&source.select(&schema), &target.select(&schema), strategy)?;

    let rendered = serde_json::to_string_pretty(&target.to_json())?;
    match &args.output {
        Some(path) => {
            fs::write(path, format!("{}\n", rendered)).map_err(|e| NodeError::Io {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
            println!("✓ Wrote {}", path.display());
        }
        None => println!("{}", rendered),
    }
    Ok(())
}
