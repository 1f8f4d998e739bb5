#![deny(missing_docs)]

//! # Model Nodes
//!
//! One named schema in the generator IR.
//!
//! Models are owned exclusively by the [`ModelMap`]. Parent, child and
//! interface links are [`ModelRef`] name handles resolved against that map,
//! so cyclic `$ref` graphs never produce owning cycles.

use crate::ir::property::{mark_has_more, AllowableValues, Property};
use crate::oas::Discriminator;
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use serde_json::Value;

/// Name → Model map owning every model of one resolution.
pub type ModelMap = IndexMap<String, Model>;

/// Non-owning handle to a model in a [`ModelMap`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ModelRef(String);

impl ModelRef {
    /// Creates a handle for the model keyed by `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Key of the referenced model.
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Looks the model up.
    pub fn resolve<'a>(&self, models: &'a ModelMap) -> Option<&'a Model> {
        models.get(&self.0)
    }
}

/// A named schema.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Model {
    /// Schema name (map key).
    pub name: String,
    /// Language type name from the hooks.
    pub classname: String,
    /// `title` echo.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// `description` echo.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Declared members (own only).
    pub vars: Vec<Property>,
    /// Own + inherited members (inheritance mode).
    pub all_vars: Vec<Property>,
    /// Indices into `vars` of required members.
    pub required_vars: Vec<usize>,
    /// Indices into `vars` of optional members.
    pub optional_vars: Vec<usize>,
    /// Indices into `vars` of read-only members.
    pub read_only_vars: Vec<usize>,
    /// Indices into `vars` of read-write members.
    pub read_write_vars: Vec<usize>,
    /// Parent schema name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Resolved parent (after fixup).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_model: Option<ModelRef>,
    /// Registered descendants (after fixup).
    pub children: Vec<ModelRef>,
    /// Interface names (allOf references past the first, composites).
    pub interfaces: Vec<String>,
    /// Resolved interfaces (after fixup).
    pub interface_models: Vec<ModelRef>,
    /// Discriminator of the model or adopted from an allOf branch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<Discriminator>,
    /// Enum model.
    pub is_enum: bool,
    /// Enum values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowable_values: Option<AllowableValues>,
    /// Schema resolves to a primitive under another name.
    pub is_alias: bool,
    /// Composed model (allOf/oneOf/anyOf or a synthesized composite).
    pub is_composed_model: bool,
    /// Array container model.
    pub is_array_model: bool,
    /// Map container model.
    pub is_map_model: bool,
    /// Synthetic property describing the container shape.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_property: Option<Property>,
    /// Instantiation type of the container from the hooks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_instantiation: Option<String>,
    /// Item complex type of an array model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub array_model_type: Option<String>,
    /// Type name an alias or primitive model maps to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    /// Alternatives of a synthesized oneOf/anyOf composite.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub model_names: Vec<String>,
    /// At least one var.
    pub has_vars: bool,
    /// At least one enum-bearing var.
    pub has_enums: bool,
    /// At least one required var.
    pub has_required: bool,
    /// At least one optional var.
    pub has_optional: bool,
    /// Every var is read-only.
    pub has_only_read_only: bool,
    /// `nullable`
    pub is_nullable: bool,
    /// Complex types referenced by vars.
    pub imports: IndexSet<String>,
    /// Pretty-printed source schema; diagnostics only.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub model_json: String,
    /// `x-` extensions of the source schema.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub extensions: IndexMap<String, Value>,
}

impl Model {
    /// Creates an empty model.
    pub fn new(name: impl Into<String>, classname: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            classname: classname.into(),
            has_only_read_only: true,
            ..Default::default()
        }
    }

    /// Re-derives partitions, sequencing and summary flags from `vars`.
    ///
    /// Must be called after any change to `vars` (construction, enum dedup).
    pub fn reindex(&mut self) {
        self.required_vars.clear();
        self.optional_vars.clear();
        self.read_only_vars.clear();
        self.read_write_vars.clear();
        self.has_required = false;
        self.has_optional = false;
        self.has_enums = false;
        self.has_only_read_only = true;

        mark_has_more(&mut self.vars);
        mark_has_more(&mut self.all_vars);

        for (i, var) in self.vars.iter().enumerate() {
            if var.required {
                self.required_vars.push(i);
                self.has_required = true;
            } else {
                self.optional_vars.push(i);
                self.has_optional = true;
            }
            if var.read_only {
                self.read_only_vars.push(i);
            } else {
                self.read_write_vars.push(i);
                self.has_only_read_only = false;
            }
            if var.is_enum {
                self.has_enums = true;
            }
        }
        self.has_vars = !self.vars.is_empty();
    }

    /// Own var by wire name.
    pub fn var(&self, base_name: &str) -> Option<&Property> {
        self.vars.iter().find(|v| v.base_name == base_name)
    }

    /// Required members as properties.
    pub fn required_properties(&self) -> impl Iterator<Item = &Property> {
        self.required_vars.iter().filter_map(|&i| self.vars.get(i))
    }

    /// Optional members as properties.
    pub fn optional_properties(&self) -> impl Iterator<Item = &Property> {
        self.optional_vars.iter().filter_map(|&i| self.vars.get(i))
    }

    /// Names of registered children.
    pub fn child_names(&self) -> Vec<&str> {
        self.children.iter().map(ModelRef::name).collect()
    }
}
