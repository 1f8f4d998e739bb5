#![deny(missing_docs)]

//! # Composition Handler
//!
//! Synthesizes anonymous composite models for `oneOf`/`anyOf` lists that
//! appear on a model, a property, or array/map items. A composite carries only
//! the ordered names of its alternatives; it is created only when every
//! alternative is a reference to an object-shaped schema.

use crate::ir::{Model, Property};
use crate::oas::{AdditionalProperties, Schema, SchemaKind};
use crate::resolver::context::ResolutionContext;
use crate::resolver::naming::composite_name;
use crate::resolver::property::retype_innermost;

/// Kind of union a composite stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnionKind {
    /// `oneOf`
    OneOf,
    /// `anyOf`
    AnyOf,
}

impl UnionKind {
    /// Name prefix of synthesized composites.
    pub fn prefix(self) -> &'static str {
        match self {
            UnionKind::OneOf => "OneOf",
            UnionKind::AnyOf => "AnyOf",
        }
    }
}

/// The union branches of a composed schema; `oneOf` wins over `anyOf`.
pub fn union_branches(schema: &Schema) -> Option<(UnionKind, &[Schema])> {
    match &schema.kind {
        SchemaKind::Composed { one_of, .. } if !one_of.is_empty() => {
            Some((UnionKind::OneOf, one_of.as_slice()))
        }
        SchemaKind::Composed { any_of, .. } if !any_of.is_empty() => {
            Some((UnionKind::AnyOf, any_of.as_slice()))
        }
        _ => None,
    }
}

/// Builds the composite model `name` over `branches`.
///
/// Returns `None` when any branch is inline or not object-shaped.
pub fn synthesize_composite(
    ctx: &ResolutionContext<'_>,
    name: &str,
    branches: &[Schema],
) -> Option<Model> {
    let hooks = ctx.hooks();
    let mut alternatives = Vec::with_capacity(branches.len());
    for branch in branches {
        let target_name = ctx.ref_name(branch)?;
        let target = ctx.schema(&target_name)?;
        let target = ctx.dereference(target);
        if !(target.is_object() || target.is_composed()) {
            tracing::debug!(composite = name, alternative = %target_name, "Skipping composite over non-object alternative");
            return None;
        }
        alternatives.push(target_name);
    }

    let mut composite = Model::new(name, hooks.to_model_name(name));
    composite.is_composed_model = true;
    composite.model_names = alternatives.iter().map(|a| hooks.to_model_name(a)).collect();
    composite.interfaces = alternatives;
    composite.reindex();
    tracing::debug!(composite = name, alternatives = ?composite.model_names, "Synthesized composite model");
    Some(composite)
}

/// Creates the model-level composite for a composed schema, if any.
pub fn model_composite(
    ctx: &ResolutionContext<'_>,
    model_name: &str,
    schema: &Schema,
) -> Option<Model> {
    let (kind, branches) = union_branches(schema)?;
    synthesize_composite(ctx, &composite_name(kind.prefix(), model_name, None), branches)
}

/// Retypes a property whose (innermost) schema is a union to a synthesized composite.
///
/// `property_name` is `None` for the container property of array/map models.
pub fn attach_property_composite(
    ctx: &ResolutionContext<'_>,
    model_name: &str,
    property_name: Option<&str>,
    property: &mut Property,
    schema: &Schema,
) -> Option<Model> {
    let innermost = innermost_schema(schema);
    if innermost.extension_str("x-model-name").is_some() {
        return None;
    }
    let (kind, branches) = union_branches(innermost)?;
    let name = composite_name(kind.prefix(), model_name, property_name);
    let composite = synthesize_composite(ctx, &name, branches)?;
    retype_innermost(ctx.hooks(), property, &composite.classname);
    property.composed_model = Some(composite.name.clone());
    Some(composite)
}

/// Follows array items and map values down to the element schema.
fn innermost_schema(schema: &Schema) -> &Schema {
    match &schema.kind {
        SchemaKind::Array { items: Some(items) } => innermost_schema(items),
        SchemaKind::Map {
            value: AdditionalProperties::Schema(value),
            ..
        } => innermost_schema(value),
        _ => schema,
    }
}
