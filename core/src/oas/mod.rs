#![deny(missing_docs)]

//! # OpenAPI Input Layer
//!
//! Serde shims for the parsed input graph consumed by the resolver:
//! - **Schema**: the tagged schema node (`schema`).
//! - **Document**: paths, operations, parameters, bodies, responses, security (`document`).
//! - **References**: `$ref` → component name helpers (`ref_utils`).

use crate::error::{AppError, AppResult};

pub mod document;
pub mod ref_utils;
pub mod schema;

pub use document::{
    ApiDocument, RefOr, ShimComponents, ShimHeader, ShimMediaType, ShimOAuthFlow,
    ShimOAuthFlows, ShimOperation, ShimParameter, ShimPathItem, ShimPaths, ShimRequestBody,
    ShimResponse, ShimSecurityScheme,
};
pub use schema::{AdditionalProperties, Discriminator, PrimitiveType, Schema, SchemaKind};

/// Deserializes a YAML or JSON document into the input graph.
///
/// This is a thin serde layer: no grammar validation is performed.
pub fn parse_document(text: &str) -> AppResult<ApiDocument> {
    serde_yaml::from_str(text)
        .map_err(|e| AppError::Parse(format!("Failed to parse OpenAPI document: {}", e)))
}
