#![deny(missing_docs)]

//! # Parameter Builder
//!
//! Converts declared parameters into [`Parameter`] nodes and post-processes
//! parameter lists.
//!
//! Parameters are typed through the property builder, so containers, enums and
//! validation follow the same rules as model members. Deep-object query
//! parameters are expanded into one flat parameter per leaf before building.

use crate::diagnostics::DiagnosticKind;
use crate::ir::{CollectionFormat, ContainerKind, ParamLocation, Parameter, Property};
use crate::oas::document::vendor_extensions;
use crate::oas::{RefOr, Schema, ShimParameter};
use crate::resolver::context::ResolutionContext;
use crate::resolver::enums::name_property_enum;
use crate::resolver::hooks::render_scalar;
use crate::resolver::naming::generate_next_name;
use crate::resolver::property::build_property;
use indexmap::IndexSet;
use std::collections::HashSet;

/// Builds one parameter and records the complex types it references in `imports`.
pub fn build_parameter(
    ctx: &ResolutionContext<'_>,
    declared: &ShimParameter,
    imports: &mut IndexSet<String>,
) -> Parameter {
    let hooks = ctx.hooks();
    let location = ParamLocation::from_keyword(&declared.location);

    let mut parameter = Parameter {
        base_name: declared.name.clone(),
        param_name: hooks.to_param_name(&declared.name),
        description: declared.description.clone(),
        location,
        required: declared.required || location == Some(ParamLocation::Path),
        deprecated: declared.deprecated,
        extensions: vendor_extensions(&declared.extensions),
        ..Default::default()
    };

    let fallback;
    let schema = match parameter_schema(declared) {
        Some((schema, content_type)) => {
            parameter.content_type = content_type;
            schema
        }
        None => {
            ctx.diagnose(
                DiagnosticKind::MissingSchema,
                &declared.name,
                format!(
                    "Parameter '{}' has neither schema nor content; using object",
                    declared.name
                ),
            );
            fallback = Schema::empty_object();
            &fallback
        }
    };

    if matches!(location, Some(ParamLocation::Query | ParamLocation::Header)) {
        parameter.default_value = hooks.to_default_value(schema);
    }
    parameter.nullable = schema.nullable;
    parameter.data_format = schema.format.clone();

    let mut property = build_property(ctx, &declared.name, schema);
    if property.is_enum {
        name_property_enum(hooks, &mut property);
    }
    collect_imports(ctx, &property, imports);
    apply_property(&mut parameter, property);

    if parameter.container == ContainerKind::Array {
        parameter.collection_format = collection_format(declared);
    }

    parameter.example = match declared.extensions.get("x-example").or(declared.example.as_ref()) {
        Some(example) => Some(render_scalar(example)),
        None => Some(hooks.parameter_example(&parameter)),
    };

    hooks.post_process_parameter(&mut parameter);
    tracing::debug!(parameter = %parameter.base_name, location = ?parameter.location, data_type = %parameter.data_type, "Built parameter");
    parameter
}

/// Copies the type information of a built property onto a parameter.
pub(crate) fn apply_property(parameter: &mut Parameter, property: Property) {
    parameter.data_type = property.datatype.clone();
    parameter.base_type = Some(match property.items.as_deref() {
        Some(items) => items.datatype.clone(),
        None => property
            .complex_type
            .clone()
            .unwrap_or_else(|| property.base_type.clone()),
    });
    parameter.container = property.container;
    parameter.flags = property.flags;
    parameter.validation = property.validation;
    parameter.has_validation = property.has_validation;
    if property.is_enum {
        parameter.is_enum = true;
        parameter.datatype_with_enum = Some(property.datatype_with_enum);
        parameter.enum_name = property.enum_name;
    }
    parameter.allowable_values = property.allowable_values;
    parameter.items = property.items;
}

/// Adds every complex type along the container chain of `property`.
pub(crate) fn collect_imports(
    ctx: &ResolutionContext<'_>,
    property: &Property,
    imports: &mut IndexSet<String>,
) {
    let hooks = ctx.hooks();
    let mut current = Some(property);
    while let Some(level) = current {
        if let Some(complex) = &level.complex_type {
            if !hooks.is_primitive(complex) {
                imports.insert(complex.clone());
            }
        }
        current = level.items.as_deref();
    }
}

/// The schema of a parameter, or the schema of its first media type.
fn parameter_schema(declared: &ShimParameter) -> Option<(&Schema, Option<String>)> {
    if let Some(schema) = &declared.schema {
        return Some((schema, None));
    }
    let (content_type, media) = declared.content.as_ref()?.first()?;
    media
        .schema
        .as_ref()
        .map(|schema| (schema, Some(content_type.clone())))
}

/// Collection format of an array parameter from `style` and `explode`.
///
/// `explode` defaults to true, which always yields `multi`.
pub fn collection_format(declared: &ShimParameter) -> Option<CollectionFormat> {
    if declared.explode.unwrap_or(true) {
        return Some(CollectionFormat::Multi);
    }
    match declared.style.as_deref() {
        None | Some("form") => Some(CollectionFormat::Csv),
        Some("pipeDelimited") => Some(CollectionFormat::Pipe),
        Some("spaceDelimited") => Some(CollectionFormat::Space),
        Some(_) => None,
    }
}

/// Expands a `style: deepObject` query parameter into one parameter per leaf.
///
/// Leaves are named `name[prop]`, or `name[prop][]` for arrays. Properties are
/// visited in declaration order; a nested object expands in place of its leaf.
/// Returns `None` when the parameter is not a deep object.
pub fn flatten_deep_object(
    ctx: &ResolutionContext<'_>,
    declared: &ShimParameter,
) -> Option<Vec<ShimParameter>> {
    if declared.style.as_deref() != Some("deepObject")
        || ParamLocation::from_keyword(&declared.location) != Some(ParamLocation::Query)
    {
        return None;
    }
    let schema = ctx.dereference(declared.schema.as_ref()?);
    if !has_members(schema) {
        return None;
    }

    let mut leaves = Vec::new();
    let mut visited = HashSet::new();
    flatten_into(ctx, declared, &declared.name, schema, &mut visited, &mut leaves);
    tracing::debug!(parameter = %declared.name, leaves = leaves.len(), "Flattened deep-object parameter");
    Some(leaves)
}

fn flatten_into(
    ctx: &ResolutionContext<'_>,
    declared: &ShimParameter,
    prefix: &str,
    schema: &Schema,
    visited: &mut HashSet<String>,
    leaves: &mut Vec<ShimParameter>,
) {
    let Some(properties) = schema.properties() else {
        return;
    };
    let required = schema.required();
    let is_required = |name: &str| required.iter().any(|r| r.eq_ignore_ascii_case(name));

    for (name, prop_schema) in properties {
        let target = ctx.dereference(prop_schema);
        if has_members(target) {
            let key = ctx.ref_name(prop_schema);
            if let Some(key) = &key {
                if !visited.insert(key.clone()) {
                    continue;
                }
            }
            flatten_into(ctx, declared, &format!("{}[{}]", prefix, name), target, visited, leaves);
            if let Some(key) = key {
                visited.remove(&key);
            }
            continue;
        }

        let leaf_name = if target.is_array() {
            format!("{}[{}][]", prefix, name)
        } else {
            format!("{}[{}]", prefix, name)
        };
        let mut leaf = ShimParameter::new(leaf_name, declared.location.clone(), prop_schema.clone());
        leaf.description = prop_schema.description.clone();
        leaf.required = is_required(name);
        leaf.deprecated = declared.deprecated;
        leaf.explode = declared.explode;
        leaves.push(leaf);
    }
}

/// Non-map schema with at least one declared property.
fn has_members(schema: &Schema) -> bool {
    !schema.is_map() && schema.properties().is_some_and(|p| !p.is_empty())
}

/// Merges path-item parameters into operation parameters.
///
/// Operation parameters come first; a path-item parameter is appended unless
/// the operation declares one with the same name and location.
pub fn merge_parameters<'s>(
    ctx: &'s ResolutionContext<'_>,
    path_level: &'s [RefOr<ShimParameter>],
    operation_level: &'s [RefOr<ShimParameter>],
) -> Vec<&'s ShimParameter> {
    let mut merged: Vec<&ShimParameter> = operation_level
        .iter()
        .filter_map(|p| ctx.parameter(p))
        .collect();
    let inherited: Vec<&ShimParameter> = path_level
        .iter()
        .filter_map(|p| ctx.parameter(p))
        .filter(|p| {
            !merged
                .iter()
                .any(|m| m.name == p.name && m.location.eq_ignore_ascii_case(&p.location))
        })
        .collect();
    merged.extend(inherited);
    merged
}

/// Renames repeated `param_name`s: the first keeps its name, later ones get the next free name.
pub fn ensure_unique_names(parameters: &mut [Parameter]) {
    let mut taken: HashSet<String> = HashSet::new();
    for parameter in parameters.iter_mut() {
        let mut name = parameter.param_name.clone();
        while !taken.insert(name.clone()) {
            name = generate_next_name(&name);
        }
        if name != parameter.param_name {
            tracing::debug!(from = %parameter.param_name, to = %name, "Renamed duplicate parameter");
            parameter.param_name = name;
        }
    }
}

/// Stable sort putting required parameters first.
pub fn sort_by_required(parameters: &mut [Parameter]) {
    parameters.sort_by_key(|p| !p.required);
}
