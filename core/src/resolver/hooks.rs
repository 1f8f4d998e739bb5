#![deny(missing_docs)]

//! # Language Hooks
//!
//! Defines the per-target-language policies the resolver calls into:
//! identifier sanitization and casing, reserved-word escaping, type-name and
//! instantiation mapping, example synthesis, and post-construction
//! customization of properties and parameters.
//!
//! Every method has a neutral default so a target only overrides what it
//! needs. The resolver treats all of them as pure functions.

use crate::config::GeneratorOptions;
use crate::ir::{ContainerKind, Model, Parameter, Property};
use crate::oas::Schema;
use crate::resolver::naming::{camelize, initial_caps, sanitize_name};
use crate::resolver::types::TypeTag;
use serde_json::Value;

/// Type names the default hooks treat as language primitives.
pub const DEFAULT_PRIMITIVES: &[&str] = &[
    "string",
    "integer",
    "long",
    "number",
    "float",
    "double",
    "BigDecimal",
    "boolean",
    "date",
    "DateTime",
    "UUID",
    "email",
    "binary",
    "file",
    "ByteArray",
    "object",
];

/// Per-target naming and typing policies.
pub trait LanguageHooks {
    // --- Identifiers ---

    /// Whether sanitization keeps Unicode letters and digits.
    fn allow_unicode_identifiers(&self) -> bool {
        false
    }

    /// Removes characters that cannot appear in identifiers.
    fn sanitize_name(&self, name: &str) -> String {
        sanitize_name(name, self.allow_unicode_identifiers())
    }

    /// Reserved words of the target language (compared case-insensitively).
    fn reserved_words(&self) -> &[&str] {
        &[]
    }

    /// True when `name` is reserved.
    fn is_reserved_word(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.reserved_words().iter().any(|w| w.to_lowercase() == lower)
    }

    /// Escapes a reserved word.
    fn escape_reserved_word(&self, name: &str) -> String {
        format!("_{}", name)
    }

    /// Model (type) name for a schema name.
    fn to_model_name(&self, name: &str) -> String {
        let camel = camelize(&self.sanitize_name(name), false);
        if self.is_reserved_word(&camel) {
            self.escape_reserved_word(&camel)
        } else {
            camel
        }
    }

    /// Member name for a property's wire name.
    fn to_var_name(&self, name: &str) -> String {
        let sanitized = self.sanitize_name(name);
        if self.is_reserved_word(&sanitized) {
            self.escape_reserved_word(&sanitized)
        } else {
            sanitized
        }
    }

    /// Parameter name for a parameter's wire name.
    fn to_param_name(&self, name: &str) -> String {
        self.to_var_name(name)
    }

    /// Bucket key for a tag.
    fn sanitize_tag(&self, tag: &str) -> String {
        let camel = camelize(&self.sanitize_name(tag), false);
        if camel.chars().next().is_some_and(|c| c.is_ascii_digit()) {
            format!("Class{}", camel)
        } else {
            camel
        }
    }

    /// Operation identifier in lower camel case; empty when nothing survives sanitization.
    fn sanitize_operation_id(&self, operation_id: &str) -> String {
        let camel = camelize(&self.sanitize_name(operation_id), true);
        if self.is_reserved_word(&camel) {
            self.escape_reserved_word(&camel)
        } else {
            camel
        }
    }

    // --- Enums ---

    /// Type name of an inline enum property.
    fn to_enum_name(&self, property: &Property) -> String {
        format!("{}Enum", initial_caps(&property.name))
    }

    /// Member identifier for a derived enum value name.
    fn to_enum_var_name(&self, name: &str, datatype: &str) -> String {
        let _ = datatype;
        if name.is_empty() {
            return "empty".to_string();
        }
        let sanitized = self.sanitize_name(name);
        if sanitized.is_empty() {
            return "value".to_string();
        }
        if sanitized.starts_with(|c: char| c.is_ascii_digit()) {
            format!("_{}", sanitized)
        } else {
            sanitized
        }
    }

    /// Literal for an enum value (quoted unless numeric).
    fn to_enum_value(&self, value: &Value, datatype: &str) -> String {
        let _ = datatype;
        match value {
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null => "null".to_string(),
            Value::String(s) => format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"")),
            other => format!("\"{}\"", other),
        }
    }

    /// Default value expressed through the enum member.
    fn to_enum_default_value(&self, var_name: &str, datatype_with_enum: &str) -> String {
        format!("{}.{}", datatype_with_enum, var_name)
    }

    // --- Types ---

    /// Language type name for a classified schema.
    fn type_name(&self, tag: &TypeTag) -> String {
        match tag {
            TypeTag::Reference(name) => self.to_model_name(name),
            other => other.keyword().to_string(),
        }
    }

    /// True when `type_name` is a language primitive.
    fn is_primitive(&self, type_name: &str) -> bool {
        DEFAULT_PRIMITIVES.contains(&type_name)
    }

    /// Declaration of a container of `inner`.
    fn container_declaration(&self, container: ContainerKind, inner: &str) -> String {
        match container {
            ContainerKind::Array => format!("array<{}>", inner),
            ContainerKind::Map => format!("map<string, {}>", inner),
            ContainerKind::None => inner.to_string(),
        }
    }

    /// Concrete constructor type of a container of `inner`.
    fn instantiation_type(&self, container: ContainerKind, inner: &str) -> Option<String> {
        match container {
            ContainerKind::None => None,
            other => Some(self.container_declaration(other, inner)),
        }
    }

    // --- Values ---

    /// Default value as source text.
    fn to_default_value(&self, schema: &Schema) -> Option<String> {
        schema.default.as_ref().map(render_scalar)
    }

    /// Example value as source text.
    fn to_example_value(&self, schema: &Schema) -> Option<String> {
        schema.example.as_ref().map(render_scalar)
    }

    /// Example for a parameter that has none in the document.
    fn parameter_example(&self, parameter: &Parameter) -> String {
        let flags = &parameter.flags;
        if flags.is_uuid {
            "38400000-8cf0-11bd-b23e-10b96e4ef00d".to_string()
        } else if flags.is_date_time {
            "2013-10-20T19:20:30+01:00".to_string()
        } else if flags.is_date {
            "2013-10-20".to_string()
        } else if flags.is_file {
            "/path/to/file.txt".to_string()
        } else if flags.is_binary {
            "BINARY_DATA_HERE".to_string()
        } else if flags.is_byte_array {
            "B".to_string()
        } else if flags.is_boolean {
            "true".to_string()
        } else if flags.is_long {
            "789".to_string()
        } else if flags.is_integer {
            "56".to_string()
        } else if flags.is_float {
            "3.4".to_string()
        } else if flags.is_double || flags.is_number || flags.is_big_decimal {
            "1.2".to_string()
        } else if flags.is_string {
            format!("{}_example", parameter.param_name)
        } else {
            "null".to_string()
        }
    }

    // --- Post-construction ---

    /// Called once per model var after the model's vars are final.
    fn post_process_model_property(&self, model: &Model, property: &mut Property) {
        let _ = (model, property);
    }

    /// Called once per built parameter.
    fn post_process_parameter(&self, parameter: &mut Parameter) {
        let _ = parameter;
    }

    // --- Options ---

    /// Libraries accepted by the `library` option; empty accepts anything.
    fn supported_libraries(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Renders a JSON scalar as text; composite values as compact JSON.
pub fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Language-neutral hooks: canonical type keywords, CamelCase model names.
#[derive(Debug, Clone, Default)]
pub struct DefaultHooks {
    allow_unicode: bool,
}

impl DefaultHooks {
    /// Creates hooks honoring `allowUnicodeIdentifiers`.
    pub fn from_options(options: &GeneratorOptions) -> Self {
        Self {
            allow_unicode: options.allow_unicode_identifiers,
        }
    }
}

impl LanguageHooks for DefaultHooks {
    fn allow_unicode_identifiers(&self) -> bool {
        self.allow_unicode
    }
}
