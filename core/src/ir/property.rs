#![deny(missing_docs)]

//! # Property Nodes
//!
//! One model member or one nested container element.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// Container classification of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerKind {
    /// Not a container.
    #[default]
    None,
    /// A list.
    Array,
    /// A string-keyed map.
    Map,
}

impl ContainerKind {
    /// True for arrays and maps.
    pub fn is_container(self) -> bool {
        self != ContainerKind::None
    }
}

/// Capability flags computed once from the classified type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TypeFlags {
    /// String-like (includes uuid, email, binary, dates rendered as text).
    pub is_string: bool,
    /// Any numeric type.
    pub is_numeric: bool,
    /// 32-bit integer.
    pub is_integer: bool,
    /// 64-bit integer.
    pub is_long: bool,
    /// Unformatted `number`.
    pub is_number: bool,
    /// `float`
    pub is_float: bool,
    /// `double`
    pub is_double: bool,
    /// Arbitrary precision decimal.
    pub is_big_decimal: bool,
    /// `boolean`
    pub is_boolean: bool,
    /// `date`
    pub is_date: bool,
    /// `date-time`
    pub is_date_time: bool,
    /// `uuid`
    pub is_uuid: bool,
    /// `email`
    pub is_email: bool,
    /// `binary`
    pub is_binary: bool,
    /// `byte` (base64 text)
    pub is_byte_array: bool,
    /// `file`
    pub is_file: bool,
    /// Object-shaped schema (inline or referenced model).
    pub is_object: bool,
    /// Mapped to a language primitive by the hooks.
    pub is_primitive_type: bool,
}

/// Validation constraints copied from the schema.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Validation {
    /// `minimum`, integral for integer types.
    pub minimum: Option<String>,
    /// `maximum`, integral for integer types.
    pub maximum: Option<String>,
    /// Lower bound is exclusive.
    pub exclusive_minimum: bool,
    /// Upper bound is exclusive.
    pub exclusive_maximum: bool,
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
    /// `multipleOf`
    pub multiple_of: Option<String>,
}

impl Validation {
    /// True when any constraint is present.
    pub fn is_constrained(&self) -> bool {
        self.minimum.is_some()
            || self.maximum.is_some()
            || self.min_length.is_some()
            || self.max_length.is_some()
            || self.pattern.is_some()
            || self.min_items.is_some()
            || self.max_items.is_some()
            || self.unique_items
            || self.multiple_of.is_some()
    }
}

/// One named enum member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumVar {
    /// Identifier derived from the value.
    pub name: String,
    /// Literal as rendered by the hooks (quoted unless numeric).
    pub value: String,
}

/// Enum values of a model or property.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AllowableValues {
    /// Raw values in declaration order.
    pub values: Vec<Value>,
    /// Named members, filled by the enum naming pipeline.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub enum_vars: Vec<EnumVar>,
}

impl AllowableValues {
    /// Wraps raw values.
    pub fn new(values: Vec<Value>) -> Self {
        Self {
            values,
            enum_vars: Vec::new(),
        }
    }
}

/// A model member or container element.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Property {
    /// Language identifier.
    pub name: String,
    /// Wire name.
    pub base_name: String,
    /// Unqualified value type (container kind for containers).
    pub base_type: String,
    /// Full type declaration from the hooks.
    pub datatype: String,
    /// Declaration used when the property is an inline enum.
    pub datatype_with_enum: String,
    /// Inline enum type name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enum_name: Option<String>,
    /// Referenced model name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complex_type: Option<String>,
    /// Container classification.
    pub container: ContainerKind,
    /// Item (array) or value (map) property.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Property>>,
    /// `title`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// `description`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Listed in the owner's `required`.
    pub required: bool,
    /// `nullable`
    pub nullable: bool,
    /// `readOnly`
    pub read_only: bool,
    /// `writeOnly`
    pub write_only: bool,
    /// Enum-bearing (directly or through the innermost item).
    pub is_enum: bool,
    /// Enum values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowable_values: Option<AllowableValues>,
    /// Default value as source text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    /// Example value as source text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    /// Constraints.
    pub validation: Validation,
    /// Any constraint present.
    pub has_validation: bool,
    /// Capability flags.
    pub flags: TypeFlags,
    /// Synthesized oneOf/anyOf composite this property points to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composed_model: Option<String>,
    /// Not the last entry of its list.
    pub has_more: bool,
    /// `x-` extensions of the source schema.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub extensions: IndexMap<String, Value>,
}

impl Property {
    /// True for arrays and maps.
    pub fn is_container(&self) -> bool {
        self.container.is_container()
    }

    /// Follows `items` to the innermost element.
    pub fn innermost(&self) -> &Property {
        let mut current = self;
        while let Some(items) = &current.items {
            current = items;
        }
        current
    }

    /// Mutable variant of [`Property::innermost`].
    pub fn innermost_mut(&mut self) -> &mut Property {
        match self.items {
            Some(ref mut items) => items.innermost_mut(),
            None => self,
        }
    }
}

/// Recomputes `has_more` across a list.
pub fn mark_has_more(properties: &mut [Property]) {
    let len = properties.len();
    for (i, prop) in properties.iter_mut().enumerate() {
        prop.has_more = i + 1 < len;
    }
}
