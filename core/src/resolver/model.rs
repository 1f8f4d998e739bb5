#![deny(missing_docs)]

//! # Model Builder
//!
//! Converts one named schema into a [`Model`].
//!
//! Shapes handled:
//! - **Array / map models**: a synthetic container property describes the element type.
//! - **Composed models**: `allOf[0]` reference is the parent, later references are
//!   interfaces, inline branches merge their properties. `oneOf`/`anyOf` without a
//!   discriminator produce a composite model.
//! - **Plain schemas**: object members, enum values, or an alias of a primitive.

use crate::ir::{AllowableValues, Model, Property};
use crate::oas::{Schema, SchemaKind};
use crate::resolver::composition::{attach_property_composite, model_composite, union_branches};
use crate::resolver::context::ResolutionContext;
use crate::resolver::property::build_property;
use crate::resolver::types::classify;
use indexmap::{IndexMap, IndexSet};
use std::collections::HashSet;

/// A built model plus the composites synthesized while building it.
#[derive(Debug, Clone)]
pub struct BuiltModel {
    /// The model itself.
    pub model: Model,
    /// Composite models for oneOf/anyOf lists met in the schema.
    pub composites: Vec<Model>,
}

/// Builds the model for the named schema `name`.
pub fn build_model(ctx: &ResolutionContext<'_>, name: &str, schema: &Schema) -> BuiltModel {
    let hooks = ctx.hooks();
    let mut model = Model::new(name, hooks.to_model_name(name));
    model.title = schema.title.clone();
    model.description = schema.description.clone();
    model.model_json = schema.to_pretty_json();
    model.extensions = schema.extensions.clone();
    model.is_alias = ctx.is_alias(name);
    model.discriminator = schema.discriminator.clone();
    model.is_nullable = schema.nullable;

    let mut composites = Vec::new();

    match &schema.kind {
        SchemaKind::Array { .. } => {
            model.is_array_model = true;
            let property = container_property(ctx, &mut model, schema, &mut composites);
            model.array_model_type = property.complex_type.clone();
            model.container_property = Some(property);
        }
        SchemaKind::Map {
            properties,
            required,
            ..
        } => {
            model.is_map_model = true;
            let property = container_property(ctx, &mut model, schema, &mut composites);
            model.container_property = Some(property);
            model.vars = build_vars(ctx, name, properties, required, &mut composites);
        }
        SchemaKind::Composed { .. } => {
            build_composed(ctx, &mut model, schema, &mut composites);
        }
        _ => {
            let tag = classify(ctx, schema);
            model.data_type = Some(hooks.type_name(&tag));
            if schema.is_enum() {
                model.is_enum = true;
                model.allowable_values =
                    Some(AllowableValues::new(schema.enum_values.clone()));
            }
            if let Some(properties) = schema.properties() {
                model.vars = build_vars(ctx, name, properties, schema.required(), &mut composites);
            }
        }
    }

    finish_model(ctx, &mut model);
    tracing::debug!(model = %name, vars = model.vars.len(), composites = composites.len(), "Built model");
    BuiltModel { model, composites }
}

/// Builds the synthetic container property of an array/map model.
fn container_property(
    ctx: &ResolutionContext<'_>,
    model: &mut Model,
    schema: &Schema,
    composites: &mut Vec<Model>,
) -> Property {
    let hooks = ctx.hooks();
    let mut property = build_property(ctx, &model.name, schema);
    if let Some(composite) = attach_property_composite(ctx, &model.name, None, &mut property, schema) {
        model.interfaces.push(composite.name.clone());
        composites.push(composite);
    }
    if let Some(items) = property.items.as_deref() {
        model.container_instantiation = hooks.instantiation_type(property.container, &items.datatype);
    }
    model.data_type = Some(property.datatype.clone());
    if let Some(complex) = &property.complex_type {
        model.imports.insert(complex.clone());
    }
    property
}

/// Builds vars for declared properties in order, synthesizing property composites.
fn build_vars(
    ctx: &ResolutionContext<'_>,
    model_name: &str,
    properties: &IndexMap<String, Schema>,
    required: &[String],
    composites: &mut Vec<Model>,
) -> Vec<Property> {
    properties
        .iter()
        .map(|(prop_name, prop_schema)| {
            let mut property = build_property(ctx, prop_name, prop_schema);
            property.required = required.iter().any(|r| r == prop_name);
            if let Some(composite) = attach_property_composite(
                ctx,
                model_name,
                Some(prop_name),
                &mut property,
                prop_schema,
            ) {
                composites.push(composite);
            }
            property
        })
        .collect()
}

/// Ordered property/required accumulator used while flattening allOf chains.
#[derive(Default)]
struct PropertySet {
    properties: IndexMap<String, Schema>,
    required: Vec<String>,
}

impl PropertySet {
    fn add_own(&mut self, schema: &Schema) {
        if let Some(properties) = schema.properties() {
            for (name, prop) in properties {
                self.properties.insert(name.clone(), prop.clone());
            }
        }
        for name in schema.required() {
            if !self.required.contains(name) {
                self.required.push(name.clone());
            }
        }
    }

    /// Adds every property reachable from `schema`, following refs and all allOf branches.
    fn add_all(&mut self, ctx: &ResolutionContext<'_>, schema: &Schema, seen: &mut HashSet<String>) {
        if let Some(name) = ctx.ref_name(schema) {
            if !seen.insert(name.clone()) {
                return;
            }
            if let Some(target) = ctx.schema(&name) {
                self.add_all(ctx, target, seen);
            }
            return;
        }
        if let SchemaKind::Composed { all_of, .. } = &schema.kind {
            for branch in all_of {
                self.add_all(ctx, branch, seen);
            }
        }
        self.add_own(schema);
    }
}

fn build_composed(
    ctx: &ResolutionContext<'_>,
    model: &mut Model,
    schema: &Schema,
    composites: &mut Vec<Model>,
) {
    let options = ctx.options();
    let hooks = ctx.hooks();
    let SchemaKind::Composed {
        all_of, one_of, ..
    } = &schema.kind
    else {
        return;
    };
    model.is_composed_model = true;

    if model.discriminator.is_none() {
        model.discriminator = all_of
            .iter()
            .find_map(|branch| ctx.dereference(branch).discriminator.clone());
    }

    let inheritance = options.supports_inheritance;
    let mixins = options.supports_mixins && !inheritance;

    let mut own = PropertySet::default();
    let mut inherited = PropertySet::default();
    let self_name = model.name.clone();
    let visited = || HashSet::from([self_name.clone()]);

    for (i, branch) in all_of.iter().enumerate() {
        let Some(ref_name) = ctx.ref_name(branch) else {
            own.add_own(branch);
            continue;
        };
        // Classifying reports missing targets.
        let _ = classify(ctx, branch);
        if i == 0 {
            if ctx.schema(&ref_name).is_some() && !mixins {
                model.parent = Some(ref_name.clone());
                model.imports.insert(hooks.to_model_name(&ref_name));
            }
            if inheritance {
                inherited.add_all(ctx, branch, &mut visited());
            } else {
                own.add_all(ctx, branch, &mut visited());
            }
        } else {
            model.interfaces.push(ref_name.clone());
            model.imports.insert(hooks.to_model_name(&ref_name));
            if !mixins {
                own.add_all(ctx, branch, &mut visited());
            }
            if inheritance {
                inherited.add_all(ctx, branch, &mut visited());
            }
        }
    }
    own.add_own(schema);

    if !one_of.is_empty() && schema.discriminator.is_some() {
        for branch in one_of {
            if let Some(ref_name) = ctx.ref_name(branch) {
                model.interfaces.push(ref_name);
            }
        }
    } else if union_branches(schema).is_some() {
        if let Some(composite) = model_composite(ctx, &model.name, schema) {
            model.interfaces.push(composite.name.clone());
            composites.push(composite);
        }
    }

    model.vars = build_vars(ctx, &model.name, &own.properties, &own.required, composites);
    if inheritance {
        let mut all = inherited;
        for (name, prop) in own.properties {
            all.properties.insert(name, prop);
        }
        for name in own.required {
            if !all.required.contains(&name) {
                all.required.push(name);
            }
        }
        let mut scratch = Vec::new();
        model.all_vars = build_vars(ctx, &model.name, &all.properties, &all.required, &mut scratch);
    }
}

/// Runs the post-construction hook and derives imports and summary flags.
fn finish_model(ctx: &ResolutionContext<'_>, model: &mut Model) {
    let hooks = ctx.hooks();
    let mut vars = std::mem::take(&mut model.vars);
    for var in vars.iter_mut() {
        hooks.post_process_model_property(model, var);
    }
    model.vars = vars;

    let imports: IndexSet<String> = model
        .vars
        .iter()
        .chain(model.all_vars.iter())
        .filter_map(|var| var.complex_type.clone())
        .collect();
    model.imports.extend(imports);
    model.imports.shift_remove(&model.classname);
    model.reindex();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorOptions;
    use crate::oas::{parse_document, ApiDocument};
    use crate::resolver::hooks::DefaultHooks;

    fn doc() -> ApiDocument {
        parse_document(
            r##"
openapi: 3.0.0
paths: {}
components:
  schemas:
    Animal:
      type: object
      required: [kind]
      properties:
        kind: { type: string }
      discriminator: { propertyName: kind }
    Named:
      type: object
      properties:
        name: { type: string }
    Cat:
      allOf:
        - $ref: "#/components/schemas/Animal"
        - $ref: "#/components/schemas/Named"
        - type: object
          required: [lives]
          properties:
            lives: { type: integer }
    Pets:
      type: array
      items: { $ref: "#/components/schemas/Cat" }
    Registry:
      type: object
      additionalProperties: { $ref: "#/components/schemas/Cat" }
    Status:
      type: string
      enum: [on, off]
    Id:
      type: string
      format: uuid
    Shape:
      oneOf:
        - $ref: "#/components/schemas/Cat"
        - $ref: "#/components/schemas/Named"
"##,
        )
        .unwrap()
    }

    fn build(doc: &ApiDocument, options: &GeneratorOptions, name: &str) -> BuiltModel {
        let hooks = DefaultHooks::default();
        let ctx = ResolutionContext::new(doc, options, &hooks);
        build_model(&ctx, name, &doc.components.schemas[name])
    }

    fn names(vars: &[Property]) -> Vec<&str> {
        vars.iter().map(|v| v.base_name.as_str()).collect()
    }

    #[test]
    fn test_inheritance_mode() {
        let doc = doc();
        let options = GeneratorOptions {
            supports_inheritance: true,
            ..Default::default()
        };
        let cat = build(&doc, &options, "Cat").model;
        assert_eq!(cat.parent.as_deref(), Some("Animal"));
        assert_eq!(cat.interfaces, vec!["Named"]);
        assert_eq!(names(&cat.vars), vec!["name", "lives"]);
        assert_eq!(names(&cat.all_vars), vec!["kind", "name", "lives"]);
        assert_eq!(cat.discriminator.as_ref().unwrap().property_name, "kind");
        assert!(cat.is_composed_model);
        assert!(cat.imports.contains("Animal"));
    }

    #[test]
    fn test_flat_mode_copies_parent() {
        let doc = doc();
        let cat = build(&doc, &GeneratorOptions::default(), "Cat").model;
        assert_eq!(cat.parent.as_deref(), Some("Animal"));
        assert_eq!(names(&cat.vars), vec!["kind", "name", "lives"]);
        assert!(cat.all_vars.is_empty());
        assert_eq!(cat.required_vars.len(), 2);
    }

    #[test]
    fn test_mixin_mode_has_no_parent() {
        let doc = doc();
        let options = GeneratorOptions {
            supports_mixins: true,
            ..Default::default()
        };
        let cat = build(&doc, &options, "Cat").model;
        assert!(cat.parent.is_none());
        assert_eq!(names(&cat.vars), vec!["kind", "lives"]);
    }

    #[test]
    fn test_container_models() {
        let doc = doc();
        let options = GeneratorOptions::default();
        let pets = build(&doc, &options, "Pets").model;
        assert!(pets.is_array_model);
        assert_eq!(pets.array_model_type.as_deref(), Some("Cat"));
        assert_eq!(pets.container_instantiation.as_deref(), Some("array<Cat>"));

        let registry = build(&doc, &options, "Registry").model;
        assert!(registry.is_map_model);
        assert_eq!(
            registry.container_property.as_ref().unwrap().datatype,
            "map<string, Cat>"
        );
    }

    #[test]
    fn test_enum_and_alias_models() {
        let doc = doc();
        let options = GeneratorOptions::default();
        let status = build(&doc, &options, "Status").model;
        assert!(status.is_enum && !status.is_alias);
        assert_eq!(status.data_type.as_deref(), Some("string"));
        assert_eq!(status.allowable_values.unwrap().values.len(), 2);

        let id = build(&doc, &options, "Id").model;
        assert!(id.is_alias);
        assert_eq!(id.data_type.as_deref(), Some("UUID"));
    }

    #[test]
    fn test_one_of_composite() {
        let doc = doc();
        let built = build(&doc, &GeneratorOptions::default(), "Shape");
        assert_eq!(built.model.interfaces, vec!["OneOfShape"]);
        assert_eq!(built.composites.len(), 1);
        assert_eq!(built.composites[0].model_names, vec!["Cat", "Named"]);
    }
}
