#![deny(missing_docs)]

//! # Response Builder
//!
//! Converts declared responses into [`Response`] nodes and selects the
//! response an operation returns.

use crate::diagnostics::DiagnosticKind;
use crate::ir::{Property, Response};
use crate::oas::document::vendor_extensions;
use crate::oas::{AdditionalProperties, RefOr, Schema, SchemaKind, ShimHeader, ShimResponse};
use crate::resolver::context::ResolutionContext;
use crate::resolver::enums::name_property_enum;
use crate::resolver::params::collect_imports;
use crate::resolver::property::build_property;
use indexmap::{IndexMap, IndexSet};

/// Code of the catch-all response.
pub const DEFAULT_RESPONSE_CODE: &str = "default";

/// Picks the code of the response an operation returns.
///
/// The lowest `2xx` code wins; `default` is the fallback.
pub fn select_default_response<'c>(codes: impl IntoIterator<Item = &'c str>) -> Option<&'c str> {
    let mut fallback = None;
    let mut best: Option<&str> = None;
    for code in codes {
        if code.starts_with('2') {
            if best.map_or(true, |b| code < b) {
                best = Some(code);
            }
        } else if code == DEFAULT_RESPONSE_CODE {
            fallback = Some(code);
        }
    }
    best.or(fallback)
}

/// The first media type carrying a schema.
pub fn response_schema(response: &ShimResponse) -> Option<(&str, &Schema)> {
    response
        .content
        .iter()
        .find_map(|(content_type, media)| media.schema.as_ref().map(|s| (content_type.as_str(), s)))
}

/// Name of the schema referenced by the payload, following array items and map values.
pub fn referenced_model(ctx: &ResolutionContext<'_>, schema: &Schema) -> Option<String> {
    match &schema.kind {
        SchemaKind::Array { items: Some(items) } => referenced_model(ctx, items),
        SchemaKind::Map {
            value: AdditionalProperties::Schema(value),
            ..
        } => referenced_model(ctx, value),
        _ => ctx.ref_name(schema),
    }
}

/// Builds one response and records referenced complex types in `imports`.
pub fn build_response(
    ctx: &ResolutionContext<'_>,
    code: &str,
    declared: &ShimResponse,
    imports: &mut IndexSet<String>,
) -> Response {
    let hooks = ctx.hooks();
    let mut response = Response {
        code: if code == DEFAULT_RESPONSE_CODE {
            "0".to_string()
        } else {
            code.to_string()
        },
        message: declared.description.clone().unwrap_or_default(),
        headers: build_headers(ctx, &declared.headers),
        extensions: vendor_extensions(&declared.extensions),
        ..Default::default()
    };

    let Some((content_type, schema)) = response_schema(declared) else {
        response.simple_type = true;
        response.primitive_type = true;
        return response;
    };

    let mut property = build_property(ctx, "response", schema);
    if property.is_enum {
        name_property_enum(hooks, &mut property);
    }
    collect_imports(ctx, &property, imports);

    let base_type = if property.is_container() {
        property.innermost().base_type.clone()
    } else {
        property
            .complex_type
            .clone()
            .unwrap_or_else(|| property.base_type.clone())
    };
    response.primitive_type = hooks.is_primitive(&base_type);
    response.is_model = !property.is_container() && property.complex_type.is_some();
    response.base_type = Some(base_type);
    response.data_type = Some(property.datatype.clone());
    response.container = property.container;
    response.simple_type = !property.is_container();
    response.is_binary = property.flags.is_binary;
    response.is_file = property.flags.is_file;
    response.content_type = Some(content_type.to_string());
    response.schema = Some(property);
    response
}

/// Resolves response headers to properties.
pub fn build_headers(
    ctx: &ResolutionContext<'_>,
    headers: &IndexMap<String, RefOr<ShimHeader>>,
) -> Vec<Property> {
    headers
        .iter()
        .filter_map(|(name, header)| {
            let header = ctx.header(header)?;
            let fallback;
            let schema = match &header.schema {
                Some(schema) => schema,
                None => {
                    ctx.diagnose(
                        DiagnosticKind::MissingSchema,
                        name,
                        format!("Header '{}' has no schema; using object", name),
                    );
                    fallback = Schema::empty_object();
                    &fallback
                }
            };
            let mut property = build_property(ctx, name, schema);
            property.description = header.description.clone().or(property.description);
            property.required = header.required;
            Some(property)
        })
        .collect()
}
