#![deny(missing_docs)]

//! # Models Command
//!
//! Lists the resolved models with their kind, one per line.

use std::path::PathBuf;

use cdd_ir::{GeneratorIr, Model};

use crate::error::CliResult;
use crate::resolve::{load_options, parse_property, resolve_file};

/// Arguments for the models command.
#[derive(clap::Args, Debug, Clone)]
pub struct ModelsArgs {
    /// Path to the OpenAPI document (YAML or JSON).
    #[clap(long, short)]
    pub input: PathBuf,

    /// Option override as `key=value`.
    #[clap(short = 'p', long = "property", value_parser = parse_property)]
    pub properties: Vec<(String, String)>,
}

/// Kind label of a model.
pub fn model_kind(model: &Model) -> &'static str {
    if model.is_alias {
        "alias"
    } else if model.is_enum {
        "enum"
    } else if model.is_array_model {
        "array"
    } else if model.is_map_model {
        "map"
    } else if model.is_composed_model {
        "composed"
    } else {
        "object"
    }
}

/// One `name: kind` line per model, in document order.
pub fn list_models(ir: &GeneratorIr) -> Vec<String> {
    ir.models
        .iter()
        .map(|(name, model)| format!("{}: {}", name, model_kind(model)))
        .collect()
}

/// Executes the models command.
pub fn execute(args: &ModelsArgs) -> CliResult<()> {
    let options = load_options(None, &args.properties)?;
    let ir = resolve_file(&args.input, &options)?;
    for line in list_models(&ir) {
        println!("{}", line);
    }
    Ok(())
}
