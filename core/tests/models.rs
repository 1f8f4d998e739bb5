use cdd_ir::diagnostics::DiagnosticKind;
use cdd_ir::ir::ContainerKind;
use cdd_ir::oas::{ApiDocument, PrimitiveType, Schema, SchemaKind};
use cdd_ir::resolver::property::MAX_CONTAINER_DEPTH;
use cdd_ir::{resolve_document, resolve_str, DefaultHooks, GeneratorIr, GeneratorOptions};
use pretty_assertions::assert_eq;

const ZOO: &str = r##"
openapi: 3.0.0
paths: {}
components:
  schemas:
    Animal:
      type: object
      required: [name]
      properties:
        name: { type: string }
    Pet:
      discriminator: { propertyName: petType }
      allOf:
        - $ref: "#/components/schemas/Animal"
        - type: object
          properties:
            petType: { type: string }
            mood: { type: string, enum: [mood-calm, mood-angry] }
    Cat:
      allOf:
        - $ref: "#/components/schemas/Pet"
        - type: object
          properties:
            lives: { type: integer }
    Dog:
      allOf:
        - $ref: "#/components/schemas/Pet"
        - type: object
          properties:
            mood: { type: string, enum: [mood-calm, mood-angry] }
            bark: { type: boolean }
    Shape:
      oneOf:
        - $ref: "#/components/schemas/Cat"
        - $ref: "#/components/schemas/Dog"
    Scalar:
      oneOf:
        - type: string
        - type: integer
    Owner:
      type: object
      properties:
        pet:
          oneOf:
            - $ref: "#/components/schemas/Cat"
            - $ref: "#/components/schemas/Dog"
        code: { $ref: "#/components/schemas/Code" }
        kennels:
          type: array
          items: { $ref: "#/components/schemas/Dog" }
    Code:
      type: string
      pattern: "^[A-Z]{3}$"
      maxLength: 3
    Registry:
      type: object
      additionalProperties: { $ref: "#/components/schemas/Cat" }
    Level:
      type: string
      enum: [level-low, level-high, level-high]
"##;

fn resolve(options: &GeneratorOptions) -> GeneratorIr {
    resolve_str(ZOO, options).unwrap()
}

fn inheritance() -> GeneratorOptions {
    GeneratorOptions {
        supports_inheritance: true,
        ..Default::default()
    }
}

fn var_names(ir: &GeneratorIr, model: &str) -> Vec<String> {
    ir.models[model].vars.iter().map(|v| v.base_name.clone()).collect()
}

#[test]
fn test_inheritance_links_parent_and_children() {
    let ir = resolve(&inheritance());

    let cat = &ir.models["Cat"];
    assert_eq!(cat.parent.as_deref(), Some("Pet"));
    assert_eq!(cat.parent_model.as_ref().unwrap().name(), "Pet");
    assert_eq!(var_names(&ir, "Cat"), vec!["lives"]);
    let all: Vec<&str> = cat.all_vars.iter().map(|v| v.base_name.as_str()).collect();
    assert!(all.contains(&"name"));
    assert!(all.contains(&"petType"));
    assert!(all.contains(&"lives"));
    assert!(cat.imports.contains("Pet"));

    let parent = cat.parent_model.as_ref().unwrap().resolve(&ir.models).unwrap();
    assert_eq!(parent.name, "Pet");
}

#[test]
fn test_children_stop_at_discriminator() {
    let ir = resolve(&inheritance());

    assert_eq!(ir.models["Pet"].child_names(), vec!["Cat", "Dog"]);
    assert_eq!(ir.models["Animal"].child_names(), vec!["Pet"]);
    assert!(!ir.diagnostics.contains(DiagnosticKind::DiscriminatorConflict));
}

#[test]
fn test_inherited_enum_removed_from_child() {
    let ir = resolve(&inheritance());
    assert_eq!(var_names(&ir, "Dog"), vec!["bark"]);
}

#[test]
fn test_flat_mode_keeps_merged_properties() {
    let ir = resolve(&GeneratorOptions::default());

    let cat = &ir.models["Cat"];
    assert_eq!(cat.parent.as_deref(), Some("Pet"));
    assert!(cat.parent_model.is_none());
    assert!(cat.all_vars.is_empty());
    assert!(cat.var("lives").is_some());
    assert!(ir.models["Pet"].children.is_empty());
}

#[test]
fn test_mixins_mode_drops_parent() {
    let options = GeneratorOptions {
        supports_mixins: true,
        ..Default::default()
    };
    let ir = resolve(&options);
    assert!(ir.models["Cat"].parent.is_none());
    assert!(ir.models["Cat"].var("lives").is_some());
}

#[test]
fn test_model_level_composite() {
    let ir = resolve(&GeneratorOptions::default());

    let composite = &ir.models["OneOfShape"];
    assert!(composite.is_composed_model);
    assert_eq!(composite.model_names, vec!["Cat", "Dog"]);
    assert!(ir.models["Shape"].interfaces.contains(&"OneOfShape".to_string()));

    assert!(!ir.models.contains_key("OneOfScalar"));
    assert!(ir.models["Scalar"].is_composed_model);
}

#[test]
fn test_property_composite_and_alias() {
    let ir = resolve(&GeneratorOptions::default());
    let owner = &ir.models["Owner"];

    let pet = owner.var("pet").unwrap();
    assert_eq!(pet.datatype, "OneOfOwnerPet");
    assert_eq!(pet.composed_model.as_deref(), Some("OneOfOwnerPet"));
    assert_eq!(ir.models["OneOfOwnerPet"].model_names, vec!["Cat", "Dog"]);

    let code = owner.var("code").unwrap();
    assert_eq!(code.datatype, "string");
    assert!(code.complex_type.is_none());
    assert_eq!(code.validation.pattern.as_deref(), Some("^[A-Z]{3}$"));
    assert_eq!(code.validation.max_length, Some(3));
    assert!(code.has_validation);
    assert!(ir.models["Code"].is_alias);

    let kennels = owner.var("kennels").unwrap();
    assert_eq!(kennels.container, ContainerKind::Array);
    assert_eq!(kennels.datatype, "array<Dog>");
    assert_eq!(kennels.complex_type.as_deref(), Some("Dog"));
    assert!(owner.imports.contains("Dog"));
    assert!(!owner.imports.contains("Code"));
}

#[test]
fn test_map_model() {
    let ir = resolve(&GeneratorOptions::default());
    let registry = &ir.models["Registry"];
    assert!(registry.is_map_model);
    let container = registry.container_property.as_ref().unwrap();
    assert_eq!(container.container, ContainerKind::Map);
    assert_eq!(container.datatype, "map<string, Cat>");
    assert!(registry.imports.contains("Cat"));
}

#[test]
fn test_enum_model_names() {
    let ir = resolve(&GeneratorOptions::default());
    let level = &ir.models["Level"];
    assert!(level.is_enum);
    let names: Vec<&str> = level
        .allowable_values
        .as_ref()
        .unwrap()
        .enum_vars
        .iter()
        .map(|v| v.name.as_str())
        .collect();
    assert_eq!(names, vec!["low", "high", "high_2"]);
}

#[test]
fn test_recursion_ceiling() {
    let mut schema = Schema::primitive(PrimitiveType::String, None);
    for _ in 0..(MAX_CONTAINER_DEPTH + 3) {
        schema = Schema::new(SchemaKind::Array {
            items: Some(Box::new(schema)),
        });
    }
    let mut document = ApiDocument::default();
    document.components.schemas.insert("Deep".to_string(), schema);

    let options = GeneratorOptions::default();
    let ir = resolve_document(&document, &options, &DefaultHooks::default()).unwrap();
    assert!(ir.models["Deep"].is_array_model);
    assert!(ir.diagnostics.contains(DiagnosticKind::RecursionLimit));
}
