#![deny(missing_docs)]

//! # Request Body Builder
//!
//! Resolves a request body into form parameters and body parameters, one
//! [`Content`] per negotiated media type.
//!
//! Form media types (`application/x-www-form-urlencoded`, `multipart/form-data`)
//! explode the object's properties into form parameters. Every other media type
//! yields a single body parameter; media types whose schemas resolve to the
//! same definition share one content entry.

use crate::diagnostics::DiagnosticKind;
use crate::ir::{Content, ParamLocation, Parameter};
use crate::oas::document::vendor_extensions;
use crate::oas::{Schema, ShimMediaType, ShimParameter, ShimRequestBody};
use crate::resolver::context::ResolutionContext;
use crate::resolver::enums::name_property_enum;
use crate::resolver::hooks::render_scalar;
use crate::resolver::params::{apply_property, build_parameter, collect_imports};
use crate::resolver::property::build_property;
use crate::resolver::types::TypeTag;
use indexmap::IndexSet;

/// Default name of the body parameter.
pub const REQUEST_BODY_NAME: &str = "body";

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
const MULTIPART_FORM_DATA: &str = "multipart/form-data";

/// Parameters contributed by a request body.
#[derive(Debug, Clone, Default)]
pub struct RequestParams {
    /// Body parameter of the first non-form media type.
    pub body_param: Option<Parameter>,
    /// Body parameters (at most one).
    pub body_params: Vec<Parameter>,
    /// Form parameters of every form media type, in declaration order.
    pub form_params: Vec<Parameter>,
    /// One entry per distinct media type.
    pub contents: Vec<Content>,
    /// Declared media types in order.
    pub consumes: Vec<String>,
}

/// True for the two form media types (case-insensitive).
pub fn is_form_content_type(content_type: &str) -> bool {
    content_type.eq_ignore_ascii_case(FORM_URLENCODED)
        || content_type.eq_ignore_ascii_case(MULTIPART_FORM_DATA)
}

/// Builds the parameters of a request body.
pub fn build_request_body(
    ctx: &ResolutionContext<'_>,
    body: &ShimRequestBody,
    imports: &mut IndexSet<String>,
) -> RequestParams {
    let mut result = RequestParams::default();
    let mut body_schemas: Vec<(Option<&Schema>, usize)> = Vec::new();

    for (content_type, media) in &body.content {
        result.consumes.push(content_type.clone());

        if is_form_content_type(content_type) {
            let params = form_parameters(ctx, content_type, media, imports);
            if params.is_empty() {
                continue;
            }
            result.form_params.extend(params.iter().cloned());
            result.contents.push(Content {
                content_types: vec![content_type.clone()],
                is_form: true,
                parameters: params,
            });
            continue;
        }

        let schema = media.schema.as_ref().map(|schema| ctx.dereference(schema));
        if let Some((_, index)) = body_schemas.iter().find(|(seen, _)| *seen == schema) {
            tracing::debug!(content_type = %content_type, "Media type shares an earlier body schema");
            result.contents[*index].content_types.push(content_type.clone());
            continue;
        }

        let parameter = body_parameter(ctx, body, content_type, media, imports);
        if result.body_param.is_none() {
            result.body_param = Some(parameter.clone());
            result.body_params.push(parameter.clone());
        }
        body_schemas.push((schema, result.contents.len()));
        result.contents.push(Content {
            content_types: vec![content_type.clone()],
            is_form: false,
            parameters: vec![parameter],
        });
    }
    result
}

/// Explodes the properties of a form body into form parameters.
fn form_parameters(
    ctx: &ResolutionContext<'_>,
    content_type: &str,
    media: &ShimMediaType,
    imports: &mut IndexSet<String>,
) -> Vec<Parameter> {
    let Some(schema) = media.schema.as_ref() else {
        return Vec::new();
    };
    let schema = ctx.dereference(schema);
    let Some(properties) = schema.properties() else {
        return Vec::new();
    };
    let required = schema.required();
    let is_multipart = content_type.eq_ignore_ascii_case(MULTIPART_FORM_DATA);

    properties
        .iter()
        .map(|(name, prop_schema)| {
            let mut declared = ShimParameter::new(name.clone(), "formData", prop_schema.clone());
            declared.description = prop_schema.description.clone();
            declared.required = required.contains(name);
            let mut parameter = build_parameter(ctx, &declared, imports);
            parameter.is_multipart = is_multipart;
            parameter
        })
        .collect()
}

/// Builds the body parameter for one non-form media type.
fn body_parameter(
    ctx: &ResolutionContext<'_>,
    body: &ShimRequestBody,
    content_type: &str,
    media: &ShimMediaType,
    imports: &mut IndexSet<String>,
) -> Parameter {
    let hooks = ctx.hooks();
    let name = body
        .extensions
        .get("x-codegen-request-body-name")
        .map(render_scalar)
        .unwrap_or_else(|| REQUEST_BODY_NAME.to_string());

    let mut parameter = Parameter {
        param_name: hooks.to_param_name(&name),
        base_name: name.clone(),
        description: body.description.clone(),
        location: Some(ParamLocation::Body),
        required: body.required,
        content_type: Some(content_type.to_string()),
        example: media.first_example().map(render_scalar),
        extensions: vendor_extensions(&body.extensions),
        ..Default::default()
    };

    match media.schema.as_ref() {
        Some(schema) => {
            let mut property = build_property(ctx, &name, schema);
            if property.is_enum {
                name_property_enum(hooks, &mut property);
            }
            collect_imports(ctx, &property, imports);
            let model = ctx.ref_name(schema).filter(|target| !ctx.is_alias(target));
            parameter.data_format = schema.format.clone();
            parameter.nullable = schema.nullable;
            apply_property(&mut parameter, property);
            if let Some(model) = model {
                parameter.is_model = true;
                parameter.base_type = Some(hooks.to_model_name(&model));
            }
        }
        None => {
            ctx.diagnose(
                DiagnosticKind::MissingSchema,
                content_type,
                format!("Request body '{}' has no schema; using object", content_type),
            );
            let object = hooks.type_name(&TypeTag::Object);
            parameter.data_type = object.clone();
            parameter.base_type = Some(object);
            parameter.flags = TypeTag::Object.flags();
        }
    }

    hooks.post_process_parameter(&mut parameter);
    tracing::debug!(parameter = %parameter.base_name, content_type = %content_type, data_type = %parameter.data_type, "Built body parameter");
    parameter
}
