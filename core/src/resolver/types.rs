#![deny(missing_docs)]

//! # Type Classifier
//!
//! Maps an input schema node to a canonical [`TypeTag`].
//!
//! Precedence (first match wins):
//! 1. `$ref` → the referenced name, verbatim
//! 2. explicit string formats (`number`, `byte`, `binary`, `date`, `date-time`, `uuid`, `email`)
//! 3. the bare type keyword (`integer`/`int64`, `number`/`float`/`double`, `boolean` ...)
//! 4. containers (`array`, `map`)
//! 5. composed schemas named through `x-model-name`
//! 6. everything else is the generic `object`

use crate::diagnostics::DiagnosticKind;
use crate::ir::TypeFlags;
use crate::oas::ref_utils::simple_ref_name;
use crate::oas::{PrimitiveType, Schema, SchemaKind};
use crate::resolver::context::ResolutionContext;
use std::fmt;

/// Canonical type of a schema node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// `string`
    String,
    /// `integer` (32-bit)
    Integer,
    /// `integer` + `int64`
    Long,
    /// `number`
    Number,
    /// `number` + `float`
    Float,
    /// `number` + `double`
    Double,
    /// `string` + `number`: arbitrary precision decimal.
    BigDecimal,
    /// `boolean`
    Boolean,
    /// `string` + `date`
    Date,
    /// `string` + `date-time`
    DateTime,
    /// `string` + `uuid`
    Uuid,
    /// `string` + `email`
    Email,
    /// `string` + `binary`
    Binary,
    /// `file`
    File,
    /// `string` + `byte`
    ByteArray,
    /// `array`
    Array,
    /// `object` + `additionalProperties`
    Map,
    /// Generic object (also the fallback for unusable references).
    Object,
    /// A named schema.
    Reference(String),
}

impl TypeTag {
    /// Canonical keyword; the referenced name for references.
    pub fn keyword(&self) -> &str {
        match self {
            TypeTag::String => "string",
            TypeTag::Integer => "integer",
            TypeTag::Long => "long",
            TypeTag::Number => "number",
            TypeTag::Float => "float",
            TypeTag::Double => "double",
            TypeTag::BigDecimal => "BigDecimal",
            TypeTag::Boolean => "boolean",
            TypeTag::Date => "date",
            TypeTag::DateTime => "DateTime",
            TypeTag::Uuid => "UUID",
            TypeTag::Email => "email",
            TypeTag::Binary => "binary",
            TypeTag::File => "file",
            TypeTag::ByteArray => "ByteArray",
            TypeTag::Array => "array",
            TypeTag::Map => "map",
            TypeTag::Object => "object",
            TypeTag::Reference(name) => name,
        }
    }

    /// Referenced name, if any.
    pub fn reference(&self) -> Option<&str> {
        match self {
            TypeTag::Reference(name) => Some(name),
            _ => None,
        }
    }

    /// True for arrays and maps.
    pub fn is_container(&self) -> bool {
        matches!(self, TypeTag::Array | TypeTag::Map)
    }

    /// Capability flags implied by the tag alone.
    pub fn flags(&self) -> TypeFlags {
        let mut flags = TypeFlags::default();
        match self {
            TypeTag::String => flags.is_string = true,
            TypeTag::Integer => {
                flags.is_numeric = true;
                flags.is_integer = true;
            }
            TypeTag::Long => {
                flags.is_numeric = true;
                flags.is_long = true;
            }
            TypeTag::Number => {
                flags.is_numeric = true;
                flags.is_number = true;
            }
            TypeTag::Float => {
                flags.is_numeric = true;
                flags.is_float = true;
            }
            TypeTag::Double => {
                flags.is_numeric = true;
                flags.is_double = true;
            }
            TypeTag::BigDecimal => {
                flags.is_numeric = true;
                flags.is_big_decimal = true;
            }
            TypeTag::Boolean => flags.is_boolean = true,
            TypeTag::Date => flags.is_date = true,
            TypeTag::DateTime => flags.is_date_time = true,
            TypeTag::Uuid => {
                flags.is_uuid = true;
                flags.is_string = true;
            }
            TypeTag::Email => {
                flags.is_email = true;
                flags.is_string = true;
            }
            TypeTag::Binary => {
                flags.is_binary = true;
                flags.is_string = true;
            }
            TypeTag::File => {
                flags.is_file = true;
                flags.is_binary = true;
            }
            TypeTag::ByteArray => {
                flags.is_byte_array = true;
                flags.is_string = true;
            }
            TypeTag::Object => flags.is_object = true,
            TypeTag::Array | TypeTag::Map | TypeTag::Reference(_) => {}
        }
        flags
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

/// Classifies a schema without consulting the schema set.
///
/// `self_uri` lets document-qualified references count as local.
pub fn classify_schema(schema: &Schema, self_uri: Option<&str>) -> TypeTag {
    let format = schema.format.as_deref();
    match &schema.kind {
        SchemaKind::Reference(target) => {
            let name = simple_ref_name(target, self_uri);
            if name.is_empty() {
                TypeTag::Object
            } else {
                TypeTag::Reference(name)
            }
        }
        SchemaKind::Primitive(PrimitiveType::String) => match format {
            Some("number") => TypeTag::BigDecimal,
            Some("byte") => TypeTag::ByteArray,
            Some("binary") => TypeTag::Binary,
            Some("date") => TypeTag::Date,
            Some("date-time") => TypeTag::DateTime,
            Some("uuid") => TypeTag::Uuid,
            Some("email") => TypeTag::Email,
            _ => TypeTag::String,
        },
        SchemaKind::Primitive(PrimitiveType::File) => TypeTag::File,
        SchemaKind::Primitive(PrimitiveType::Boolean) => TypeTag::Boolean,
        SchemaKind::Primitive(PrimitiveType::Number) => match format {
            Some("float") => TypeTag::Float,
            Some("double") => TypeTag::Double,
            _ => TypeTag::Number,
        },
        SchemaKind::Primitive(PrimitiveType::Integer) => match format {
            Some("int64") => TypeTag::Long,
            _ => TypeTag::Integer,
        },
        SchemaKind::Array { .. } => TypeTag::Array,
        SchemaKind::Map { .. } => TypeTag::Map,
        SchemaKind::Composed { .. } => match schema.extension_str("x-model-name") {
            Some(name) if !name.is_empty() => TypeTag::Reference(name.to_string()),
            _ => TypeTag::Object,
        },
        SchemaKind::Object { .. } | SchemaKind::Any => TypeTag::Object,
    }
}

/// Classifies a schema, reporting references that cannot be resolved.
///
/// The referenced name is kept verbatim even when the target is missing; only
/// a reference with no extractable name falls back to `object`.
pub fn classify(ctx: &ResolutionContext<'_>, schema: &Schema) -> TypeTag {
    let tag = classify_schema(schema, ctx.self_uri());
    if let Some(target) = schema.ref_path() {
        match &tag {
            TypeTag::Reference(name) if ctx.schema(name).is_none() => {
                ctx.report_unresolved(name, target);
            }
            TypeTag::Object => ctx.diagnose(
                DiagnosticKind::UnresolvedReference,
                target,
                format!("Reference '{}' names no schema; using object", target),
            ),
            _ => {}
        }
    }
    tag
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> Schema {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_reference_name_verbatim() {
        for name in ["Pet", "pet_store", "Pet.V1", "User Profile"] {
            let schema = Schema::reference(crate::oas::ref_utils::schema_ref(name));
            assert_eq!(classify_schema(&schema, None), TypeTag::Reference(name.to_string()));
        }
    }

    #[test]
    fn test_format_overrides() {
        assert_eq!(classify_schema(&parse("{type: string, format: number}"), None), TypeTag::BigDecimal);
        assert_eq!(classify_schema(&parse("{type: string, format: byte}"), None), TypeTag::ByteArray);
        assert_eq!(classify_schema(&parse("{type: string, format: binary}"), None), TypeTag::Binary);
        assert_eq!(classify_schema(&parse("{type: string, format: date-time}"), None), TypeTag::DateTime);
        assert_eq!(classify_schema(&parse("{type: string, format: uuid}"), None), TypeTag::Uuid);
        assert_eq!(classify_schema(&parse("{type: integer, format: int64}"), None), TypeTag::Long);
        assert_eq!(classify_schema(&parse("{type: integer, format: int32}"), None), TypeTag::Integer);
        assert_eq!(classify_schema(&parse("{type: number, format: double}"), None), TypeTag::Double);
        assert_eq!(classify_schema(&parse("{type: number}"), None), TypeTag::Number);
        assert_eq!(classify_schema(&parse("{type: file}"), None), TypeTag::File);
    }

    #[test]
    fn test_object_and_map() {
        assert_eq!(classify_schema(&parse("{properties: {a: {type: string}}}"), None), TypeTag::Object);
        assert_eq!(classify_schema(&parse("{type: object, additionalProperties: true}"), None), TypeTag::Map);
        assert_eq!(classify_schema(&parse("{additionalProperties: {type: string}}"), None), TypeTag::Map);
        assert_eq!(classify_schema(&parse("{}"), None), TypeTag::Object);
    }

    #[test]
    fn test_composed_with_model_name() {
        let schema = parse(
            r##"
oneOf:
  - $ref: "#/components/schemas/Cat"
x-model-name: Pet
"##,
        );
        assert_eq!(classify_schema(&schema, None), TypeTag::Reference("Pet".into()));
    }

    #[test]
    fn test_flags() {
        let flags = TypeTag::Long.flags();
        assert!(flags.is_numeric && flags.is_long && !flags.is_integer);
        assert!(TypeTag::Uuid.flags().is_string);
        assert_eq!(TypeTag::Reference("Pet".into()).flags(), TypeFlags::default());
    }
}
