#![deny(missing_docs)]

//! # Schema Graph
//!
//! The immutable input node consumed by the resolver.
//!
//! Documents are deserialized through a flat `RawSchema` shim that mirrors the
//! JSON Schema object, then classified into the tagged [`SchemaKind`]. The
//! conversion also normalizes OAS 3.1 spellings:
//! - `type: [T, "null"]` becomes `T` + `nullable`
//! - numeric `exclusiveMinimum`/`exclusiveMaximum` become a bound + flag
//! - `const` becomes a single-value enum

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Discriminator object (`propertyName` plus optional value→schema mapping).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Discriminator {
    /// Property whose value selects the concrete schema.
    #[serde(rename = "propertyName")]
    pub property_name: String,
    /// Explicit value → `$ref` mapping.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub mapping: IndexMap<String, String>,
}

/// Scalar `type` keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    /// `string`
    String,
    /// `integer`
    Integer,
    /// `number`
    Number,
    /// `boolean`
    Boolean,
    /// `file` (Swagger 2 form parameters)
    File,
}

impl PrimitiveType {
    fn keyword(self) -> &'static str {
        match self {
            PrimitiveType::String => "string",
            PrimitiveType::Integer => "integer",
            PrimitiveType::Number => "number",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::File => "file",
        }
    }
}

/// Value side of a map schema.
#[derive(Debug, Clone, PartialEq)]
pub enum AdditionalProperties {
    /// `additionalProperties: true`
    Any,
    /// `additionalProperties: { ... }`
    Schema(Box<Schema>),
}

/// Structural shape of a schema node.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SchemaKind {
    /// A scalar.
    Primitive(PrimitiveType),
    /// `type: array`.
    Array {
        /// Item schema; `None` when the document omits it.
        items: Option<Box<Schema>>,
    },
    /// An object whose `additionalProperties` is a schema or `true`.
    Map {
        /// Value schema.
        value: AdditionalProperties,
        /// Fixed properties declared next to the map clause.
        properties: IndexMap<String, Schema>,
        /// Required fixed properties.
        required: Vec<String>,
    },
    /// `type: object`, or untyped with properties.
    Object {
        /// Declared properties, in document order.
        properties: IndexMap<String, Schema>,
        /// Required property names.
        required: Vec<String>,
    },
    /// allOf / oneOf / anyOf.
    Composed {
        /// Intersection branches.
        all_of: Vec<Schema>,
        /// Exclusive union branches.
        one_of: Vec<Schema>,
        /// Inclusive union branches.
        any_of: Vec<Schema>,
        /// Properties declared beside the composition keywords.
        properties: IndexMap<String, Schema>,
        /// Required names declared beside the composition keywords.
        required: Vec<String>,
    },
    /// `$ref`, raw.
    Reference(String),
    /// No type, no structure.
    #[default]
    Any,
}

/// One schema node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "RawSchema", into = "RawSchema")]
pub struct Schema {
    /// Structural shape.
    pub kind: SchemaKind,
    /// `title`
    pub title: Option<String>,
    /// `description`
    pub description: Option<String>,
    /// `format`
    pub format: Option<String>,
    /// Enum values in declaration order; empty when not an enum.
    pub enum_values: Vec<Value>,
    /// `default`
    pub default: Option<Value>,
    /// `example`
    pub example: Option<Value>,
    /// `nullable` (or `null` in a 3.1 type list).
    pub nullable: bool,
    /// `readOnly`
    pub read_only: bool,
    /// `writeOnly`
    pub write_only: bool,
    /// `minimum`
    pub minimum: Option<Number>,
    /// `maximum`
    pub maximum: Option<Number>,
    /// `exclusiveMinimum` as a flag.
    pub exclusive_minimum: bool,
    /// `exclusiveMaximum` as a flag.
    pub exclusive_maximum: bool,
    /// `multipleOf`
    pub multiple_of: Option<Number>,
    /// `minLength`
    pub min_length: Option<u64>,
    /// `maxLength`
    pub max_length: Option<u64>,
    /// `pattern`
    pub pattern: Option<String>,
    /// `minItems`
    pub min_items: Option<u64>,
    /// `maxItems`
    pub max_items: Option<u64>,
    /// `uniqueItems`
    pub unique_items: bool,
    /// `discriminator`
    pub discriminator: Option<Discriminator>,
    /// `x-` extensions.
    pub extensions: IndexMap<String, Value>,
}

impl Schema {
    /// Creates a schema with the given shape and no metadata.
    pub fn new(kind: SchemaKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    /// Creates a `$ref` schema.
    pub fn reference(target: impl Into<String>) -> Self {
        Self::new(SchemaKind::Reference(target.into()))
    }

    /// Creates a scalar schema with an optional format.
    pub fn primitive(ty: PrimitiveType, format: Option<&str>) -> Self {
        Self {
            format: format.map(str::to_string),
            ..Self::new(SchemaKind::Primitive(ty))
        }
    }

    /// Creates an empty `type: object` schema.
    pub fn empty_object() -> Self {
        Self::new(SchemaKind::Object {
            properties: IndexMap::new(),
            required: Vec::new(),
        })
    }

    /// The raw `$ref` when this node is a reference.
    pub fn ref_path(&self) -> Option<&str> {
        match &self.kind {
            SchemaKind::Reference(r) => Some(r),
            _ => None,
        }
    }

    /// True for arrays.
    pub fn is_array(&self) -> bool {
        matches!(self.kind, SchemaKind::Array { .. })
    }

    /// True for maps.
    pub fn is_map(&self) -> bool {
        matches!(self.kind, SchemaKind::Map { .. })
    }

    /// True for composed schemas.
    pub fn is_composed(&self) -> bool {
        matches!(self.kind, SchemaKind::Composed { .. })
    }

    /// True for objects (including untyped schemas carrying properties).
    pub fn is_object(&self) -> bool {
        matches!(self.kind, SchemaKind::Object { .. })
    }

    /// Declared properties for object, map and composed schemas.
    pub fn properties(&self) -> Option<&IndexMap<String, Schema>> {
        match &self.kind {
            SchemaKind::Object { properties, .. }
            | SchemaKind::Map { properties, .. }
            | SchemaKind::Composed { properties, .. } => Some(properties),
            _ => None,
        }
    }

    /// Declared required names for object, map and composed schemas.
    pub fn required(&self) -> &[String] {
        match &self.kind {
            SchemaKind::Object { required, .. }
            | SchemaKind::Map { required, .. }
            | SchemaKind::Composed { required, .. } => required,
            _ => &[],
        }
    }

    /// True when the schema declares enum values.
    pub fn is_enum(&self) -> bool {
        !self.enum_values.is_empty()
    }

    /// A string-valued extension.
    pub fn extension_str(&self, key: &str) -> Option<&str> {
        self.extensions.get(key).and_then(Value::as_str)
    }

    /// Visits every `$ref` in this subtree mutably.
    pub fn visit_refs_mut(&mut self, f: &mut dyn FnMut(&mut String)) {
        match &mut self.kind {
            SchemaKind::Reference(r) => f(r),
            SchemaKind::Array { items } => {
                if let Some(items) = items {
                    items.visit_refs_mut(f);
                }
            }
            SchemaKind::Map {
                value, properties, ..
            } => {
                if let AdditionalProperties::Schema(inner) = value {
                    inner.visit_refs_mut(f);
                }
                for prop in properties.values_mut() {
                    prop.visit_refs_mut(f);
                }
            }
            SchemaKind::Object { properties, .. } => {
                for prop in properties.values_mut() {
                    prop.visit_refs_mut(f);
                }
            }
            SchemaKind::Composed {
                all_of,
                one_of,
                any_of,
                properties,
                ..
            } => {
                for branch in all_of.iter_mut().chain(one_of).chain(any_of) {
                    branch.visit_refs_mut(f);
                }
                for prop in properties.values_mut() {
                    prop.visit_refs_mut(f);
                }
            }
            SchemaKind::Primitive(_) | SchemaKind::Any => {}
        }
    }

    /// Pretty-printed JSON form of the node (diagnostics only).
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

// --- Deserialization shim ---

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum TypeField {
    Single(String),
    Multiple(Vec<String>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawAdditional {
    Flag(bool),
    Schema(Box<RawSchema>),
}

/// Flat mirror of the JSON Schema object used at the serde boundary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSchema {
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    reference: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    schema_type: Option<TypeField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    enum_values: Option<Vec<Value>>,
    #[serde(rename = "const", skip_serializing_if = "Option::is_none")]
    const_value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    example: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    nullable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    read_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    write_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    minimum: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    maximum: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    exclusive_minimum: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    exclusive_maximum: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    multiple_of: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    min_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    min_items: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_items: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    unique_items: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    items: Option<Box<RawSchema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    properties: Option<IndexMap<String, RawSchema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    required: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    additional_properties: Option<RawAdditional>,
    #[serde(skip_serializing_if = "Option::is_none")]
    all_of: Option<Vec<RawSchema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    one_of: Option<Vec<RawSchema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    any_of: Option<Vec<RawSchema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    discriminator: Option<Discriminator>,
    #[serde(flatten)]
    extra: IndexMap<String, Value>,
}

/// Splits a 3.1 `exclusiveMinimum: 5` into `(Some(5), true)`; keeps the 3.0 flag form.
fn normalize_exclusive(bound: Option<Number>, exclusive: Option<Value>) -> (Option<Number>, bool) {
    match exclusive {
        Some(Value::Bool(flag)) => (bound, flag),
        Some(Value::Number(n)) => (Some(n), true),
        _ => (bound, false),
    }
}

fn convert_properties(raw: Option<IndexMap<String, RawSchema>>) -> IndexMap<String, Schema> {
    raw.unwrap_or_default()
        .into_iter()
        .map(|(name, schema)| (name, Schema::from(schema)))
        .collect()
}

fn convert_list(raw: Option<Vec<RawSchema>>) -> Vec<Schema> {
    raw.unwrap_or_default().into_iter().map(Schema::from).collect()
}

impl From<RawSchema> for Schema {
    fn from(raw: RawSchema) -> Self {
        let (type_name, nullable_in_type) = match raw.schema_type {
            None => (None, false),
            Some(TypeField::Single(t)) => (Some(t), false),
            Some(TypeField::Multiple(types)) => {
                let nullable = types.iter().any(|t| t == "null");
                (types.into_iter().find(|t| t != "null"), nullable)
            }
        };
        let (minimum, exclusive_minimum) = normalize_exclusive(raw.minimum, raw.exclusive_minimum);
        let (maximum, exclusive_maximum) = normalize_exclusive(raw.maximum, raw.exclusive_maximum);

        let mut enum_values = raw.enum_values.unwrap_or_default();
        if enum_values.is_empty() {
            if let Some(value) = raw.const_value {
                enum_values.push(value);
            }
        }

        let extensions: IndexMap<String, Value> = raw
            .extra
            .into_iter()
            .filter(|(k, _)| k.starts_with("x-"))
            .collect();

        let properties = convert_properties(raw.properties);
        let required = raw.required.unwrap_or_default();
        let all_of = convert_list(raw.all_of);
        let one_of = convert_list(raw.one_of);
        let any_of = convert_list(raw.any_of);
        let items = raw.items.map(|i| Box::new(Schema::from(*i)));

        let kind = if let Some(target) = raw.reference {
            SchemaKind::Reference(target)
        } else if !all_of.is_empty() || !one_of.is_empty() || !any_of.is_empty() {
            SchemaKind::Composed {
                all_of,
                one_of,
                any_of,
                properties,
                required,
            }
        } else {
            match type_name.as_deref() {
                Some("array") => SchemaKind::Array { items },
                Some("string") => SchemaKind::Primitive(PrimitiveType::String),
                Some("integer") => SchemaKind::Primitive(PrimitiveType::Integer),
                Some("number") => SchemaKind::Primitive(PrimitiveType::Number),
                Some("boolean") => SchemaKind::Primitive(PrimitiveType::Boolean),
                Some("file") => SchemaKind::Primitive(PrimitiveType::File),
                Some("object") | None => match raw.additional_properties {
                    Some(RawAdditional::Flag(true)) => SchemaKind::Map {
                        value: AdditionalProperties::Any,
                        properties,
                        required,
                    },
                    Some(RawAdditional::Schema(inner)) => SchemaKind::Map {
                        value: AdditionalProperties::Schema(Box::new(Schema::from(*inner))),
                        properties,
                        required,
                    },
                    _ if type_name.is_some() || !properties.is_empty() => {
                        SchemaKind::Object {
                            properties,
                            required,
                        }
                    }
                    _ if items.is_some() => SchemaKind::Array { items },
                    _ => SchemaKind::Any,
                },
                Some(_) => SchemaKind::Any,
            }
        };

        Schema {
            kind,
            title: raw.title,
            description: raw.description,
            format: raw.format,
            enum_values,
            default: raw.default,
            example: raw.example,
            nullable: raw.nullable.unwrap_or(false) || nullable_in_type,
            read_only: raw.read_only.unwrap_or(false),
            write_only: raw.write_only.unwrap_or(false),
            minimum,
            maximum,
            exclusive_minimum,
            exclusive_maximum,
            multiple_of: raw.multiple_of,
            min_length: raw.min_length,
            max_length: raw.max_length,
            pattern: raw.pattern,
            min_items: raw.min_items,
            max_items: raw.max_items,
            unique_items: raw.unique_items.unwrap_or(false),
            discriminator: raw.discriminator,
            extensions,
        }
    }
}

fn raw_properties(properties: IndexMap<String, Schema>) -> Option<IndexMap<String, RawSchema>> {
    if properties.is_empty() {
        return None;
    }
    Some(
        properties
            .into_iter()
            .map(|(name, schema)| (name, RawSchema::from(schema)))
            .collect(),
    )
}

fn raw_list(list: Vec<Schema>) -> Option<Vec<RawSchema>> {
    if list.is_empty() {
        None
    } else {
        Some(list.into_iter().map(RawSchema::from).collect())
    }
}

fn raw_required(required: Vec<String>) -> Option<Vec<String>> {
    if required.is_empty() {
        None
    } else {
        Some(required)
    }
}

impl From<Schema> for RawSchema {
    fn from(schema: Schema) -> Self {
        let mut raw = RawSchema {
            format: schema.format,
            title: schema.title,
            description: schema.description,
            enum_values: (!schema.enum_values.is_empty()).then_some(schema.enum_values),
            default: schema.default,
            example: schema.example,
            nullable: schema.nullable.then_some(true),
            read_only: schema.read_only.then_some(true),
            write_only: schema.write_only.then_some(true),
            minimum: schema.minimum,
            maximum: schema.maximum,
            exclusive_minimum: schema.exclusive_minimum.then_some(Value::Bool(true)),
            exclusive_maximum: schema.exclusive_maximum.then_some(Value::Bool(true)),
            multiple_of: schema.multiple_of,
            min_length: schema.min_length,
            max_length: schema.max_length,
            pattern: schema.pattern,
            min_items: schema.min_items,
            max_items: schema.max_items,
            unique_items: schema.unique_items.then_some(true),
            discriminator: schema.discriminator,
            extra: schema.extensions,
            ..Default::default()
        };

        match schema.kind {
            SchemaKind::Reference(target) => raw.reference = Some(target),
            SchemaKind::Primitive(ty) => {
                raw.schema_type = Some(TypeField::Single(ty.keyword().to_string()))
            }
            SchemaKind::Array { items } => {
                raw.schema_type = Some(TypeField::Single("array".into()));
                raw.items = items.map(|i| Box::new(RawSchema::from(*i)));
            }
            SchemaKind::Map {
                value,
                properties,
                required,
            } => {
                raw.schema_type = Some(TypeField::Single("object".into()));
                raw.additional_properties = Some(match value {
                    AdditionalProperties::Any => RawAdditional::Flag(true),
                    AdditionalProperties::Schema(inner) => {
                        RawAdditional::Schema(Box::new(RawSchema::from(*inner)))
                    }
                });
                raw.properties = raw_properties(properties);
                raw.required = raw_required(required);
            }
            SchemaKind::Object {
                properties,
                required,
            } => {
                raw.schema_type = Some(TypeField::Single("object".into()));
                raw.properties = raw_properties(properties);
                raw.required = raw_required(required);
            }
            SchemaKind::Composed {
                all_of,
                one_of,
                any_of,
                properties,
                required,
            } => {
                raw.all_of = raw_list(all_of);
                raw.one_of = raw_list(one_of);
                raw.any_of = raw_list(any_of);
                raw.properties = raw_properties(properties);
                raw.required = raw_required(required);
            }
            SchemaKind::Any => {}
        }
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> Schema {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_object_with_required() {
        let schema = parse(
            r#"
type: object
required: [id]
properties:
  id: { type: integer, format: int64 }
  name: { type: string, maxLength: 20 }
x-internal: true
"#,
        );
        assert!(schema.is_object());
        assert_eq!(schema.required(), &["id".to_string()]);
        let props = schema.properties().unwrap();
        assert_eq!(props.keys().collect::<Vec<_>>(), vec!["id", "name"]);
        assert_eq!(props["name"].max_length, Some(20));
        assert_eq!(schema.extensions.get("x-internal"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_untyped_with_properties_is_object() {
        let schema = parse("properties:\n  a: { type: string }\n");
        assert!(schema.is_object());
    }

    #[test]
    fn test_map_variants() {
        let typed = parse("type: object\nadditionalProperties: { type: integer }\n");
        match &typed.kind {
            SchemaKind::Map {
                value: AdditionalProperties::Schema(inner),
                ..
            } => assert_eq!(inner.kind, SchemaKind::Primitive(PrimitiveType::Integer)),
            other => panic!("expected typed map, got {:?}", other),
        }

        let open = parse("type: object\nadditionalProperties: true\n");
        assert!(matches!(
            open.kind,
            SchemaKind::Map {
                value: AdditionalProperties::Any,
                ..
            }
        ));

        let closed = parse("type: object\nadditionalProperties: false\n");
        assert!(closed.is_object());
    }

    #[test]
    fn test_openapi_31_normalization() {
        let schema = parse(
            r#"
type: [integer, "null"]
exclusiveMinimum: 5
"#,
        );
        assert_eq!(schema.kind, SchemaKind::Primitive(PrimitiveType::Integer));
        assert!(schema.nullable);
        assert!(schema.exclusive_minimum);
        assert_eq!(schema.minimum.map(|n| n.to_string()).as_deref(), Some("5"));

        let constant = parse("type: string\nconst: fixed\n");
        assert_eq!(constant.enum_values, vec![Value::String("fixed".into())]);
    }

    #[test]
    fn test_reference_and_composed() {
        let schema = parse(
            r##"
allOf:
  - $ref: "#/components/schemas/Pet"
  - type: object
    properties:
      bark: { type: boolean }
"##,
        );
        match &schema.kind {
            SchemaKind::Composed { all_of, .. } => {
                assert_eq!(all_of[0].ref_path(), Some("#/components/schemas/Pet"));
                assert!(all_of[1].is_object());
            }
            other => panic!("expected composed, got {:?}", other),
        }
    }

    #[test]
    fn test_serialize_back_to_openapi_shape() {
        let schema = parse("type: array\nitems:\n  $ref: '#/components/schemas/Tag'\nminItems: 1\n");
        let json = serde_json::to_value(&schema).unwrap();
        assert_eq!(json["type"], "array");
        assert_eq!(json["items"]["$ref"], "#/components/schemas/Tag");
        assert_eq!(json["minItems"], 1);
        assert!(json.get("nullable").is_none());
    }

    #[test]
    fn test_visit_refs_mut() {
        let mut schema = parse(
            r##"
type: object
properties:
  a: { $ref: "#/components/schemas/pet" }
  b:
    type: array
    items: { $ref: "#/components/schemas/pet" }
"##,
        );
        schema.visit_refs_mut(&mut |r| {
            if r.as_str() == "#/components/schemas/pet" {
                *r = "#/components/schemas/pet2".to_string();
            }
        });
        let props = schema.properties().unwrap();
        assert_eq!(props["a"].ref_path(), Some("#/components/schemas/pet2"));
        match &props["b"].kind {
            SchemaKind::Array { items: Some(items) } => {
                assert_eq!(items.ref_path(), Some("#/components/schemas/pet2"))
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
