#![deny(missing_docs)]

//! # Property Builder
//!
//! Converts one schema node into a [`Property`], recursing one level per
//! container nesting (array items, map values).

use crate::diagnostics::DiagnosticKind;
use crate::ir::{AllowableValues, ContainerKind, Property, Validation};
use crate::oas::{AdditionalProperties, PrimitiveType, Schema, SchemaKind};
use crate::resolver::context::ResolutionContext;
use crate::resolver::hooks::LanguageHooks;
use crate::resolver::types::{classify, TypeTag};
use serde_json::Number;

/// Deepest container nesting followed before the leaf is cut to `object`.
pub const MAX_CONTAINER_DEPTH: usize = 64;

/// Builds the property for `name` from `schema`.
pub fn build_property(ctx: &ResolutionContext<'_>, name: &str, schema: &Schema) -> Property {
    build_at_depth(ctx, name, schema, 0)
}

fn build_at_depth(
    ctx: &ResolutionContext<'_>,
    name: &str,
    schema: &Schema,
    depth: usize,
) -> Property {
    let hooks = ctx.hooks();
    let mut property = Property {
        name: hooks.to_var_name(name),
        base_name: name.to_string(),
        title: schema.title.clone(),
        description: schema.description.clone(),
        nullable: schema.nullable,
        read_only: schema.read_only,
        write_only: schema.write_only,
        default_value: hooks.to_default_value(schema),
        example: hooks.to_example_value(schema).filter(|e| e != "null"),
        extensions: schema.extensions.clone(),
        ..Default::default()
    };

    if depth > MAX_CONTAINER_DEPTH {
        ctx.diagnose(
            DiagnosticKind::RecursionLimit,
            name,
            format!(
                "Container nesting deeper than {} levels; using object",
                MAX_CONTAINER_DEPTH
            ),
        );
        set_leaf_type(hooks, &mut property, &TypeTag::Object);
        property.flags.is_object = true;
        return property;
    }

    let mut tag = classify(ctx, schema);
    let referenced = tag.reference().and_then(|r| ctx.schema(r));
    if let Some(aliased) = tag.reference().and_then(|r| ctx.alias_type(r)) {
        tag = aliased.clone();
    }

    property.validation = validation_of(schema, &tag);
    if let Some(target) = referenced {
        if matches!(target.kind, SchemaKind::Primitive(PrimitiveType::String)) {
            property.validation.pattern = target.pattern.clone();
            property.validation.min_length = target.min_length;
            property.validation.max_length = target.max_length;
        }
    }
    property.has_validation = property.validation.is_constrained();

    if schema.is_enum() {
        property.is_enum = true;
        property.allowable_values = Some(AllowableValues::new(schema.enum_values.clone()));
    }

    match &schema.kind {
        SchemaKind::Array { items } => {
            let fallback;
            let items = match items {
                Some(items) => &**items,
                None => {
                    ctx.diagnose(
                        DiagnosticKind::MissingArrayItems,
                        name,
                        format!("Array property '{}' has no items; assuming string", name),
                    );
                    fallback = Schema::primitive(PrimitiveType::String, None);
                    &fallback
                }
            };
            let item_name = schema
                .extension_str("x-item-name")
                .map(str::to_string)
                .unwrap_or_else(|| property.name.clone());
            let inner = build_at_depth(ctx, &item_name, items, depth + 1);
            attach_items(hooks, &mut property, ContainerKind::Array, inner);
        }
        SchemaKind::Map { value, .. } => {
            let fallback;
            let value = match value {
                AdditionalProperties::Schema(inner) => &**inner,
                AdditionalProperties::Any => {
                    fallback = Schema::empty_object();
                    &fallback
                }
            };
            let inner = build_at_depth(ctx, "inner", value, depth + 1);
            attach_items(hooks, &mut property, ContainerKind::Map, inner);
        }
        _ => {
            set_leaf_type(hooks, &mut property, &tag);
            property.flags.is_object = is_object_shaped(ctx, schema, &tag);
        }
    }
    property
}

/// Types a non-container property.
fn set_leaf_type(hooks: &dyn LanguageHooks, property: &mut Property, tag: &TypeTag) {
    let flags = tag.flags();
    property.flags = flags;
    property.base_type = hooks.type_name(tag);
    property.datatype = property.base_type.clone();
    if hooks.is_primitive(&property.base_type) {
        property.flags.is_primitive_type = true;
        property.complex_type = None;
    } else {
        property.complex_type = Some(property.base_type.clone());
    }
    refresh_enum_naming(hooks, property);
}

/// Wraps `inner` as the item/value of a container property.
fn attach_items(
    hooks: &dyn LanguageHooks,
    property: &mut Property,
    container: ContainerKind,
    inner: Property,
) {
    property.container = container;
    property.base_type = hooks.type_name(match container {
        ContainerKind::Map => &TypeTag::Map,
        _ => &TypeTag::Array,
    });
    property.items = Some(Box::new(inner));
    refresh_container_types(hooks, property);
}

/// Re-derives the declarations of a container chain from its innermost item.
///
/// Used after construction and after the innermost item was retyped (composites).
pub fn refresh_container_types(hooks: &dyn LanguageHooks, property: &mut Property) {
    if property.items.is_none() {
        refresh_enum_naming(hooks, property);
        return;
    }
    let Some(inner) = property.items.as_mut() else {
        return;
    };
    refresh_container_types(hooks, inner);

    let inner_is_container = inner.is_container();
    let (complex, primitive) = if inner_is_container {
        (inner.complex_type.clone(), inner.flags.is_primitive_type)
    } else if hooks.is_primitive(&inner.base_type) {
        (None, true)
    } else {
        (Some(inner.base_type.clone()), false)
    };
    let datatype = hooks.container_declaration(property.container, &inner.datatype);
    let datatype_with_enum =
        hooks.container_declaration(property.container, &inner.datatype_with_enum);

    property.complex_type = complex;
    property.flags.is_primitive_type = primitive;
    property.datatype = datatype;

    let innermost = property.innermost();
    if innermost.is_enum {
        let allowable = innermost.allowable_values.clone();
        property.is_enum = true;
        property.allowable_values = allowable;
        property.datatype_with_enum = datatype_with_enum;
        property.enum_name = Some(hooks.to_enum_name(property));
    } else {
        property.datatype_with_enum = property.datatype.clone();
    }
}

/// Points the innermost item of `property` at a named model.
pub fn retype_innermost(hooks: &dyn LanguageHooks, property: &mut Property, model_name: &str) {
    let leaf = property.innermost_mut();
    let tag = TypeTag::Reference(model_name.to_string());
    set_leaf_type(hooks, leaf, &tag);
    leaf.flags.is_object = true;
    refresh_container_types(hooks, property);
}

fn refresh_enum_naming(hooks: &dyn LanguageHooks, property: &mut Property) {
    if property.is_enum && !property.is_container() {
        let enum_name = hooks.to_enum_name(property);
        property.datatype_with_enum = enum_name.clone();
        property.enum_name = Some(enum_name);
    } else {
        property.datatype_with_enum = property.datatype.clone();
    }
}

fn is_object_shaped(ctx: &ResolutionContext<'_>, schema: &Schema, tag: &TypeTag) -> bool {
    match tag {
        TypeTag::Object => true,
        TypeTag::Reference(_) => {
            let target = ctx.dereference(schema);
            target.is_object() || target.is_composed()
        }
        _ => false,
    }
}

/// Copies validation constraints; bounds render integral for integer types.
pub(crate) fn validation_of(schema: &Schema, tag: &TypeTag) -> Validation {
    let integral = matches!(tag, TypeTag::Integer | TypeTag::Long);
    Validation {
        minimum: schema.minimum.as_ref().map(|n| render_bound(n, integral)),
        maximum: schema.maximum.as_ref().map(|n| render_bound(n, integral)),
        exclusive_minimum: schema.exclusive_minimum && schema.minimum.is_some(),
        exclusive_maximum: schema.exclusive_maximum && schema.maximum.is_some(),
        min_length: schema.min_length,
        max_length: schema.max_length,
        pattern: schema.pattern.clone(),
        min_items: schema.min_items,
        max_items: schema.max_items,
        unique_items: schema.unique_items,
        multiple_of: schema.multiple_of.as_ref().map(Number::to_string),
    }
}

fn render_bound(value: &Number, integral: bool) -> String {
    if !integral {
        return value.to_string();
    }
    if let Some(i) = value.as_i64() {
        i.to_string()
    } else if let Some(u) = value.as_u64() {
        u.to_string()
    } else {
        (value.as_f64().unwrap_or_default().trunc() as i64).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorOptions;
    use crate::oas::{parse_document, ApiDocument};
    use crate::resolver::hooks::DefaultHooks;
    use serde_json::json;

    fn doc() -> ApiDocument {
        parse_document(
            r##"
openapi: 3.0.0
paths: {}
components:
  schemas:
    Pet:
      type: object
      properties:
        name: { type: string }
    Code: { type: string, pattern: "^[A-Z]+$", maxLength: 8 }
"##,
        )
        .unwrap()
    }

    fn schema(yaml: &str) -> Schema {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_primitive_property() {
        let doc = doc();
        let options = GeneratorOptions::default();
        let hooks = DefaultHooks::default();
        let ctx = ResolutionContext::new(&doc, &options, &hooks);

        let prop = build_property(
            &ctx,
            "count",
            &schema("{type: integer, format: int64, minimum: 1.0, maximum: 10, default: 5}"),
        );
        assert_eq!(prop.datatype, "long");
        assert!(prop.flags.is_long && prop.flags.is_primitive_type);
        assert_eq!(prop.validation.minimum.as_deref(), Some("1"));
        assert_eq!(prop.validation.maximum.as_deref(), Some("10"));
        assert!(prop.has_validation);
        assert_eq!(prop.default_value.as_deref(), Some("5"));
        assert!(prop.complex_type.is_none());
    }

    #[test]
    fn test_number_bounds_keep_fraction() {
        let doc = doc();
        let options = GeneratorOptions::default();
        let hooks = DefaultHooks::default();
        let ctx = ResolutionContext::new(&doc, &options, &hooks);
        let prop = build_property(&ctx, "ratio", &schema("{type: number, minimum: 0.5}"));
        assert_eq!(prop.validation.minimum.as_deref(), Some("0.5"));
    }

    #[test]
    fn test_reference_property() {
        let doc = doc();
        let options = GeneratorOptions::default();
        let hooks = DefaultHooks::default();
        let ctx = ResolutionContext::new(&doc, &options, &hooks);

        let prop = build_property(&ctx, "pet", &Schema::reference("#/components/schemas/Pet"));
        assert_eq!(prop.complex_type.as_deref(), Some("Pet"));
        assert_eq!(prop.datatype, "Pet");
        assert!(prop.flags.is_object);
    }

    #[test]
    fn test_alias_reference_resolves_to_primitive() {
        let doc = doc();
        let options = GeneratorOptions::default();
        let hooks = DefaultHooks::default();
        let ctx = ResolutionContext::new(&doc, &options, &hooks);

        let prop = build_property(&ctx, "code", &Schema::reference("#/components/schemas/Code"));
        assert_eq!(prop.datatype, "string");
        assert!(prop.flags.is_string);
        assert_eq!(prop.validation.max_length, Some(8));
        assert_eq!(prop.validation.pattern.as_deref(), Some("^[A-Z]+$"));
        assert!(prop.has_validation);
    }

    #[test]
    fn test_array_of_enum() {
        let doc = doc();
        let options = GeneratorOptions::default();
        let hooks = DefaultHooks::default();
        let ctx = ResolutionContext::new(&doc, &options, &hooks);

        let prop = build_property(
            &ctx,
            "status",
            &schema("{type: array, items: {type: string, enum: [a, b]}}"),
        );
        assert_eq!(prop.container, ContainerKind::Array);
        assert_eq!(prop.base_type, "array");
        assert_eq!(prop.datatype, "array<string>");
        assert_eq!(prop.datatype_with_enum, "array<StatusEnum>");
        assert!(prop.is_enum);
        assert_eq!(
            prop.allowable_values.as_ref().unwrap().values,
            vec![json!("a"), json!("b")]
        );
        assert!(prop.flags.is_primitive_type);
    }

    #[test]
    fn test_array_without_items_defaults_to_string() {
        let doc = doc();
        let options = GeneratorOptions::default();
        let hooks = DefaultHooks::default();
        let ctx = ResolutionContext::new(&doc, &options, &hooks);

        let prop = build_property(&ctx, "tags", &schema("{type: array}"));
        assert_eq!(prop.datatype, "array<string>");
        assert!(ctx.take_diagnostics().contains(DiagnosticKind::MissingArrayItems));
    }

    #[test]
    fn test_map_properties() {
        let doc = doc();
        let options = GeneratorOptions::default();
        let hooks = DefaultHooks::default();
        let ctx = ResolutionContext::new(&doc, &options, &hooks);

        let typed = build_property(
            &ctx,
            "pets",
            &schema(r##"{additionalProperties: {$ref: "#/components/schemas/Pet"}}"##),
        );
        assert_eq!(typed.container, ContainerKind::Map);
        assert_eq!(typed.datatype, "map<string, Pet>");
        assert_eq!(typed.complex_type.as_deref(), Some("Pet"));
        assert_eq!(typed.items.as_ref().unwrap().base_name, "inner");

        let open = build_property(&ctx, "bag", &schema("{type: object, additionalProperties: true}"));
        assert_eq!(open.datatype, "map<string, object>");
    }

    #[test]
    fn test_item_name_extension() {
        let doc = doc();
        let options = GeneratorOptions::default();
        let hooks = DefaultHooks::default();
        let ctx = ResolutionContext::new(&doc, &options, &hooks);
        let prop = build_property(
            &ctx,
            "children",
            &schema("{type: array, items: {type: string}, x-item-name: child}"),
        );
        assert_eq!(prop.items.as_ref().unwrap().base_name, "child");
    }

    #[test]
    fn test_recursion_ceiling() {
        let doc = doc();
        let options = GeneratorOptions::default();
        let hooks = DefaultHooks::default();
        let ctx = ResolutionContext::new(&doc, &options, &hooks);

        let mut nested = Schema::primitive(PrimitiveType::String, None);
        for _ in 0..(MAX_CONTAINER_DEPTH + 5) {
            nested = Schema::new(SchemaKind::Array {
                items: Some(Box::new(nested)),
            });
        }
        let prop = build_property(&ctx, "deep", &nested);
        assert!(prop.innermost().flags.is_object);
        assert!(ctx.take_diagnostics().contains(DiagnosticKind::RecursionLimit));
    }

    #[test]
    fn test_retype_innermost() {
        let doc = doc();
        let options = GeneratorOptions::default();
        let hooks = DefaultHooks::default();
        let ctx = ResolutionContext::new(&doc, &options, &hooks);
        let mut prop = build_property(&ctx, "pets", &schema("{type: array, items: {}}"));
        retype_innermost(&hooks, &mut prop, "OneOfOwnerPets");
        assert_eq!(prop.datatype, "array<OneOfOwnerPets>");
        assert_eq!(prop.complex_type.as_deref(), Some("OneOfOwnerPets"));
    }
}
