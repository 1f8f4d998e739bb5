#![deny(missing_docs)]

//! # Generator Options
//!
//! Flags read once before resolution begins.
//!
//! Options can be deserialized from a YAML/JSON config file (camelCase keys)
//! or assembled from loose `key=value` properties via
//! [`GeneratorOptions::from_properties`].

use crate::error::{AppError, AppResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Option key: keep parent pointers and an `allVars` superset for composed models.
pub const SUPPORTS_INHERITANCE: &str = "supportsInheritance";
/// Option key: flatten ancestor properties into the model's own vars.
pub const SUPPORTS_MIXINS: &str = "supportsMixins";
/// Option key: move required parameters before optional ones.
pub const SORT_PARAMS_BY_REQUIRED_FLAG: &str = "sortParamsByRequiredFlag";
/// Option key: rename colliding parameter names within a content.
pub const ENSURE_UNIQUE_PARAMS: &str = "ensureUniqueParams";
/// Option key: keep Unicode letters when sanitizing identifiers.
pub const ALLOW_UNICODE_IDENTIFIERS: &str = "allowUnicodeIdentifiers";
/// Option key: strip everything up to the first `_` from operation ids.
pub const REMOVE_OPERATION_ID_PREFIX: &str = "removeOperationIdPrefix";
/// Option key: rename schema names that only differ by case.
pub const CHECK_DUPLICATED_MODEL_NAME: &str = "checkDuplicatedModelName";
/// Option key: target library, validated against the hooks' supported set.
pub const LIBRARY: &str = "library";

/// Generator configuration consumed by the resolution engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorOptions {
    /// Composed models keep a parent pointer and `allVars`.
    pub supports_inheritance: bool,
    /// Composed models flatten ancestor properties into `vars`.
    pub supports_mixins: bool,
    /// Required parameters precede optional ones (stable).
    pub sort_params_by_required_flag: bool,
    /// Colliding parameter names in one content are renamed.
    pub ensure_unique_params: bool,
    /// Identifier sanitization keeps Unicode letters and digits.
    pub allow_unicode_identifiers: bool,
    /// Operation ids lose everything up to the first `_`.
    pub remove_operation_id_prefix: bool,
    /// Schema names that only differ by case are suffixed.
    pub check_duplicated_model_name: bool,
    /// Selected library/template variant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub library: Option<String>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            supports_inheritance: false,
            supports_mixins: false,
            sort_params_by_required_flag: true,
            ensure_unique_params: true,
            allow_unicode_identifiers: false,
            remove_operation_id_prefix: false,
            check_duplicated_model_name: false,
            library: None,
        }
    }
}

impl GeneratorOptions {
    /// Parses options from a YAML (or JSON) document.
    pub fn from_yaml(text: &str) -> AppResult<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
            .map_err(|e| AppError::Config(format!("Failed to parse generator options: {}", e)))
    }

    /// Builds options from loose string-keyed properties.
    ///
    /// Booleans may be JSON booleans or the strings `"true"`/`"false"`.
    /// Unknown keys are ignored.
    pub fn from_properties(properties: &IndexMap<String, Value>) -> AppResult<Self> {
        let mut options = Self::default();
        options.apply_properties(properties)?;
        Ok(options)
    }

    /// Overlays loose properties on top of the current values.
    pub fn apply_properties(&mut self, properties: &IndexMap<String, Value>) -> AppResult<()> {
        for (key, value) in properties {
            match key.as_str() {
                SUPPORTS_INHERITANCE => self.supports_inheritance = flag(key, value)?,
                SUPPORTS_MIXINS => self.supports_mixins = flag(key, value)?,
                SORT_PARAMS_BY_REQUIRED_FLAG => {
                    self.sort_params_by_required_flag = flag(key, value)?
                }
                ENSURE_UNIQUE_PARAMS => self.ensure_unique_params = flag(key, value)?,
                ALLOW_UNICODE_IDENTIFIERS => self.allow_unicode_identifiers = flag(key, value)?,
                REMOVE_OPERATION_ID_PREFIX => {
                    self.remove_operation_id_prefix = flag(key, value)?
                }
                CHECK_DUPLICATED_MODEL_NAME => {
                    self.check_duplicated_model_name = flag(key, value)?
                }
                LIBRARY => {
                    self.library = match value {
                        Value::Null => None,
                        Value::String(s) if s.is_empty() => None,
                        Value::String(s) => Some(s.clone()),
                        other => {
                            return Err(AppError::Config(format!(
                                "Option '{}' must be a string, got {}",
                                key, other
                            )))
                        }
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Checks the selected library against the supported set.
    ///
    /// An empty `supported` list accepts any library.
    pub fn validate_library(&self, supported: &[String]) -> AppResult<()> {
        let Some(library) = &self.library else {
            return Ok(());
        };
        if supported.is_empty() || supported.iter().any(|s| s == library) {
            return Ok(());
        }
        Err(AppError::Config(format!(
            "Unknown library: {}\nAvailable libraries:\n  {}",
            library,
            supported.join("\n  ")
        )))
    }
}

fn flag(key: &str, value: &Value) -> AppResult<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(AppError::Config(format!(
                "Option '{}' expects a boolean, got '{}'",
                key, s
            ))),
        },
        other => Err(AppError::Config(format!(
            "Option '{}' expects a boolean, got {}",
            key, other
        ))),
    }
}
