#![deny(missing_docs)]

//! # CDD IR
//!
//! Resolution engine that turns a parsed OpenAPI document into a
//! language-agnostic generator IR: models, operations grouped by tag, and
//! security schemes, ready for any template engine.

/// Shared error types.
pub mod error;

/// Generator options.
pub mod config;

/// Recoverable resolution conditions.
pub mod diagnostics;

/// OpenAPI (OAS) input shims.
pub mod oas;

/// Generator IR nodes.
pub mod ir;

/// Schema and operation resolution.
pub mod resolver;

pub use config::GeneratorOptions;
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use error::{AppError, AppResult};
pub use ir::{GeneratorIr, Model, ModelMap, Operation, Parameter, Property, Response, Security};
pub use oas::{parse_document, ApiDocument, Schema};
pub use resolver::{resolve_document, DefaultHooks, Generator, LanguageHooks, ResolutionContext};

/// Parses `text` and resolves it with [`DefaultHooks`] built from `options`.
pub fn resolve_str(text: &str, options: &GeneratorOptions) -> AppResult<GeneratorIr> {
    let document = parse_document(text)?;
    let hooks = DefaultHooks::from_options(options);
    resolve_document(&document, options, &hooks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_str() {
        let ir = resolve_str(
            "openapi: 3.0.0\npaths: {}\ncomponents: {schemas: {Name: {type: string}}}\n",
            &GeneratorOptions::default(),
        )
        .unwrap();
        assert!(ir.models["Name"].is_alias);
        assert!(ir.operations.is_empty());
    }

    #[test]
    fn test_resolve_str_parse_error() {
        let err = resolve_str("paths: [", &GeneratorOptions::default()).unwrap_err();
        assert!(matches!(err, AppError::Parse(_)));
    }
}
