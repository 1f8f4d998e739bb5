#![deny(missing_docs)]

//! # Resolve Command
//!
//! Reads an OpenAPI document, resolves it with the default hooks and writes
//! the generator IR as JSON or YAML.

use std::fs;
use std::path::{Path, PathBuf};

use cdd_ir::{parse_document, resolve_document, DefaultHooks, GeneratorIr, GeneratorOptions};
use indexmap::IndexMap;
use serde_json::Value;

use crate::error::{CliError, CliResult};

/// Serialization of the written IR.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Pretty-printed JSON.
    #[default]
    Json,
    /// YAML.
    Yaml,
}

/// Arguments for the resolve command.
#[derive(clap::Args, Debug, Clone)]
pub struct ResolveArgs {
    /// Path to the OpenAPI document (YAML or JSON).
    #[clap(long, short)]
    pub input: PathBuf,

    /// Generator options file (YAML or JSON, camelCase keys).
    #[clap(long, short)]
    pub config: Option<PathBuf>,

    /// Option override as `key=value`; applied after the config file.
    #[clap(short = 'p', long = "property", value_parser = parse_property)]
    pub properties: Vec<(String, String)>,

    /// Output format.
    #[clap(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Output file; the IR goes to stdout when omitted.
    #[clap(long, short)]
    pub output: Option<PathBuf>,

    /// Fail when resolution records any diagnostic.
    #[clap(long)]
    pub deny_diagnostics: bool,
}

/// Splits a `key=value` option override.
pub fn parse_property(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected key=value, got '{}'", raw)),
    }
}

/// Loads options from the config file (if any), then applies the overrides.
pub fn load_options(
    config: Option<&Path>,
    overrides: &[(String, String)],
) -> CliResult<GeneratorOptions> {
    let mut options = match config {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|e| {
                CliError::General(format!("Failed to read config {:?}: {}", path, e))
            })?;
            GeneratorOptions::from_yaml(&text)?
        }
        None => GeneratorOptions::default(),
    };
    let properties: IndexMap<String, Value> = overrides
        .iter()
        .map(|(key, value)| (key.clone(), Value::String(value.clone())))
        .collect();
    options.apply_properties(&properties)?;
    Ok(options)
}

/// Reads and resolves the document at `input`.
pub fn resolve_file(input: &Path, options: &GeneratorOptions) -> CliResult<GeneratorIr> {
    let text = fs::read_to_string(input)
        .map_err(|e| CliError::General(format!("Failed to read document {:?}: {}", input, e)))?;
    let document = parse_document(&text)?;
    let hooks = DefaultHooks::from_options(options);
    Ok(resolve_document(&document, options, &hooks)?)
}

/// Serializes the IR.
pub fn render(ir: &GeneratorIr, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(ir)
            .map_err(|e| CliError::General(format!("Failed to serialize IR: {}", e))),
        OutputFormat::Yaml => serde_yaml::to_string(ir)
            .map_err(|e| CliError::General(format!("Failed to serialize IR: {}", e))),
    }
}

/// Executes the resolve command.
pub fn execute(args: &ResolveArgs) -> CliResult<()> {
    let options = load_options(args.config.as_deref(), &args.properties)?;
    let ir = resolve_file(&args.input, &options)?;

    if args.deny_diagnostics && !ir.diagnostics.is_empty() {
        return Err(CliError::Diagnostics(ir.diagnostics.len()));
    }

    let rendered = render(&ir, args.format)?;
    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| {
                    CliError::General(format!("Failed to create output dir: {}", e))
                })?;
            }
            fs::write(path, rendered)
                .map_err(|e| CliError::General(format!("Failed to write IR: {}", e)))?;
            tracing::info!(output = ?path, models = ir.models.len(), "Wrote generator IR");
        }
        None => println!("{}", rendered),
    }
    Ok(())
}
