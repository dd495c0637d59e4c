//! confnode CLI
//!
//! Command-line interface for schema-driven configuration edits

use clap::{Parser, Subcommand};
use confnode_core::logging_facility::{init, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "confnode")]
#[command(about = "confnode - merge configuration documents against a schema", long_about = None)]
struct Cli {
    /// Logging profile (dev or prod); logging is off when omitted
    #[arg(long, global = true)]
    log_profile: Option<Profile>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Merge a source document into a target document
    Edit(commands::edit::EditArgs),
    /// Validate documents against a schema
    Check(commands::check::CheckArgs),
}

fn main() {
    let cli = Cli::parse();
    if let Some(profile) = cli.log_profile {
        init(profile);
    }

    let result = match cli.command {
        Commands::Edit(args) => commands::edit::execute(args),
        Commands::Check(args) => commands::check::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
