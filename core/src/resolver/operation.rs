#![deny(missing_docs)]

//! # Operation Builder
//!
//! Assembles one [`Operation`] from a path, a method and the declared
//! operation: identifier, classified parameter lists, per-media-type parameter
//! sets, responses and the return type of the selected response.
//!
//! Parameter lists are built in this order:
//! 1. Request body (form parameters or the body parameter of each media type).
//! 2. Path-item and operation parameters, merged, deep objects flattened.
//! 3. Optional required-first sort of `all_params`.
//! 4. One [`Content`] per media type, each holding its own parameter copies.
//!    Duplicate names are only renamed inside these copies.

use crate::diagnostics::DiagnosticKind;
use crate::error::{AppError, AppResult};
use crate::ir::{
    mark_params_has_more, Content, HttpMethod, ModelMap, Operation, ParamLocation, Parameter,
};
use crate::oas::document::vendor_extensions;
use crate::oas::{RefOr, ShimOperation, ShimParameter};
use crate::resolver::body::build_request_body;
use crate::resolver::context::ResolutionContext;
use crate::resolver::naming::{remove_operation_id_prefix, synthesize_operation_id};
use crate::resolver::params::{
    build_parameter, ensure_unique_names, flatten_deep_object, merge_parameters, sort_by_required,
};
use crate::resolver::responses::{
    build_response, referenced_model, response_schema, select_default_response,
};
use crate::resolver::security::requirement_names;
use indexmap::IndexSet;

/// Builds one operation.
///
/// `path_parameters` are the parameters declared on the enclosing path item.
/// `models` is the linked model map; the returned model's discriminator is read from it.
/// Fails only when no usable operation identifier can be derived.
pub fn build_operation(
    ctx: &ResolutionContext<'_>,
    models: &ModelMap,
    path: &str,
    method: HttpMethod,
    path_parameters: &[RefOr<ShimParameter>],
    declared: &ShimOperation,
) -> AppResult<Operation> {
    let options = ctx.options();
    let operation_id = operation_id(ctx, path, method, declared)?;

    let mut operation = Operation::new(path, method, operation_id);
    operation.summary = declared.summary.clone();
    operation.notes = declared.description.clone();
    operation.deprecated = declared.deprecated;
    operation.tags = declared.tags.clone();
    operation.extensions = vendor_extensions(&declared.extensions);

    let mut imports: IndexSet<String> = IndexSet::new();
    let mut contents: Vec<Content> = Vec::new();

    if let Some(body) = declared.request_body.as_ref().and_then(|b| ctx.request_body(b)) {
        let request = build_request_body(ctx, body, &mut imports);
        operation.consumes = request.consumes;
        for parameter in request.form_params.iter().chain(&request.body_params) {
            operation.all_params.push(parameter.clone());
            if parameter.required {
                operation.required_params.push(parameter.clone());
            }
        }
        operation.form_params = request.form_params;
        operation.body_params = request.body_params;
        operation.body_param = request.body_param;
        contents = request.contents;
    }

    for declared_param in merge_parameters(ctx, path_parameters, &declared.parameters) {
        let expanded = flatten_deep_object(ctx, declared_param);
        let sources: Vec<&ShimParameter> = match &expanded {
            Some(leaves) => leaves.iter().collect(),
            None => vec![declared_param],
        };
        for source in sources {
            let parameter = build_parameter(ctx, source, &mut imports);
            classify_parameter(&mut operation, parameter);
        }
    }

    build_responses(ctx, models, &mut operation, declared, &mut imports);

    if options.sort_params_by_required_flag {
        sort_by_required(&mut operation.all_params);
    }
    for list in [
        &mut operation.all_params,
        &mut operation.body_params,
        &mut operation.path_params,
        &mut operation.query_params,
        &mut operation.header_params,
        &mut operation.cookie_params,
        &mut operation.form_params,
        &mut operation.required_params,
    ] {
        mark_params_has_more(list);
    }

    operation.contents = content_parameters(ctx, &operation, contents);
    operation.has_params = !operation.all_params.is_empty();
    operation.has_required_params = !operation.required_params.is_empty();
    operation.has_optional_params = operation.all_params.iter().any(|p| !p.required);
    operation.has_reference =
        operation.has_reference || operation.all_params.iter().any(|p| p.is_model);
    operation.test_path = test_path(&operation);
    operation.security = requirement_names(
        declared
            .security
            .as_deref()
            .unwrap_or(ctx.document().security.as_slice()),
    );
    operation.imports = imports;

    tracing::debug!(
        operation = %operation.operation_id,
        method = %method,
        path = %path,
        params = operation.all_params.len(),
        responses = operation.responses.len(),
        "Built operation"
    );
    Ok(operation)
}

/// Declared operationId, or one synthesized from path and method.
fn operation_id(
    ctx: &ResolutionContext<'_>,
    path: &str,
    method: HttpMethod,
    declared: &ShimOperation,
) -> AppResult<String> {
    let raw = match declared.operation_id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => {
            let synthesized = synthesize_operation_id(path, method.as_str());
            ctx.diagnose(
                DiagnosticKind::SynthesizedOperationId,
                &format!("{} {}", method, path),
                format!("No operationId declared; using '{}'", synthesized),
            );
            synthesized
        }
    };
    let raw = if ctx.options().remove_operation_id_prefix {
        remove_operation_id_prefix(&raw)
    } else {
        raw
    };

    let id = ctx.hooks().sanitize_operation_id(&raw);
    if id.is_empty() {
        return Err(AppError::Resolution(format!(
            "Cannot derive an operation identifier for {} {} from '{}'",
            method, path, raw
        )));
    }
    Ok(id)
}

/// Files a parameter under `all_params`, its location list and `required_params`.
fn classify_parameter(operation: &mut Operation, parameter: Parameter) {
    let list = match parameter.location {
        Some(ParamLocation::Query) => Some(&mut operation.query_params),
        Some(ParamLocation::Path) => Some(&mut operation.path_params),
        Some(ParamLocation::Header) => Some(&mut operation.header_params),
        Some(ParamLocation::Cookie) => Some(&mut operation.cookie_params),
        Some(ParamLocation::Form) => Some(&mut operation.form_params),
        Some(ParamLocation::Body) => Some(&mut operation.body_params),
        None => None,
    };
    if let Some(list) = list {
        list.push(parameter.clone());
    }
    if parameter.required {
        operation.required_params.push(parameter.clone());
    }
    operation.all_params.push(parameter);
}

/// Builds every response and derives the return type from the selected one.
fn build_responses(
    ctx: &ResolutionContext<'_>,
    models: &ModelMap,
    operation: &mut Operation,
    declared: &ShimOperation,
    imports: &mut IndexSet<String>,
) {
    let hooks = ctx.hooks();
    let default_code = select_default_response(declared.responses.keys().map(String::as_str));
    let mut produces: IndexSet<String> = IndexSet::new();

    for (code, item) in &declared.responses {
        let Some(response) = ctx.response(item) else {
            continue;
        };
        produces.extend(response.content.keys().cloned());

        let mut built = build_response(ctx, code, response, imports);
        built.is_default = Some(code.as_str()) == default_code;
        if built.is_default {
            operation.response_headers = built.headers.clone();
            if let Some((_, schema)) = response_schema(response) {
                if let Some(name) = referenced_model(ctx, schema) {
                    let model = models.get(&name).filter(|m| !m.is_alias);
                    operation.has_reference = model.is_some();
                    operation.discriminator = model.and_then(|m| m.discriminator.clone());
                }
            }
        }
        operation.responses.push(built);
    }

    let len = operation.responses.len();
    for (i, response) in operation.responses.iter_mut().enumerate() {
        response.has_more = i + 1 < len;
    }
    operation.produces = produces.into_iter().collect();

    let Some(returned) = operation.default_response().and_then(|r| r.schema.clone()) else {
        operation.return_simple_type = true;
        operation.return_type_is_primitive = true;
        return;
    };
    let base_type = match returned.items.as_deref() {
        Some(items) => items.base_type.clone(),
        None => returned
            .complex_type
            .clone()
            .unwrap_or_else(|| returned.base_type.clone()),
    };
    operation.return_type_is_primitive = hooks.is_primitive(&base_type);
    operation.return_type = Some(returned.datatype.clone());
    operation.return_base_type = Some(base_type);
    operation.return_container = returned.container;
    operation.return_simple_type = !returned.is_container();
}

/// Gives each media type its own parameter set.
///
/// Without a request body a single content holds every parameter.
fn content_parameters(
    ctx: &ResolutionContext<'_>,
    operation: &Operation,
    contents: Vec<Content>,
) -> Vec<Content> {
    let options = ctx.options();
    let mut contents = if contents.is_empty() {
        vec![Content {
            parameters: operation.all_params.clone(),
            ..Default::default()
        }]
    } else {
        contents
            .into_iter()
            .map(|mut content| {
                content.parameters.extend(
                    operation
                        .header_params
                        .iter()
                        .chain(&operation.query_params)
                        .chain(&operation.path_params)
                        .chain(&operation.cookie_params)
                        .cloned(),
                );
                content
            })
            .collect()
    };

    for content in &mut contents {
        if options.ensure_unique_params {
            ensure_unique_names(&mut content.parameters);
        }
        sort_by_required(&mut content.parameters);
        mark_params_has_more(&mut content.parameters);
    }
    contents
}

/// Path with each `{name}` replaced by the example of the matching path parameter.
///
/// Substitution stops at the first placeholder without a matching parameter.
fn test_path(operation: &Operation) -> String {
    let mut path = operation.path.clone();
    let mut cursor = 0;
    while let Some(offset) = path[cursor..].find('{') {
        let start = cursor + offset;
        let Some(len) = path[start..].find('}') else {
            break;
        };
        let name = &path[start + 1..start + len];
        let example = operation
            .path_params
            .iter()
            .find(|p| p.base_name == name)
            .and_then(|p| p.example.clone());
        let Some(example) = example else {
            break;
        };
        path.replace_range(start..=start + len, &example);
        cursor = start + example.len();
    }
    path
}
