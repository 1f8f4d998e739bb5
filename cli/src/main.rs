#![deny(missing_docs)]

//! # CDD IR CLI
//!
//! Command Line Interface for the generator IR resolution engine.
//!
//! Supported Commands:
//! - `resolve`: OpenAPI document -> generator IR (JSON or YAML).
//! - `models`: Lists resolved models with their kind.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::error::CliResult;

mod error;
mod models;
mod resolve;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Generator IR resolution CLI")]
struct Cli {
    /// Log filter (e.g. `info`, `cdd_ir=debug`); overrides `RUST_LOG`.
    #[clap(long, global = true, env = "CDD_IR_LOG")]
    log_level: Option<String>,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve an OpenAPI document into the generator IR.
    Resolve(resolve::ResolveArgs),
    /// List the models of an OpenAPI document.
    Models(models::ModelsArgs),
}

/// Installs the stderr subscriber; `warn` unless configured otherwise.
fn init_tracing(log_level: Option<&str>) {
    let filter = match log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    match &cli.command {
        Commands::Resolve(args) => resolve::execute(args)?,
        Commands::Models(args) => models::execute(args)?,
    }

    Ok(())
}
