#![deny(missing_docs)]

//! # Operation Nodes
//!
//! Operations, their parameters, per-content parameter sets and responses.

use crate::ir::property::{AllowableValues, ContainerKind, Property, TypeFlags, Validation};
use crate::oas::Discriminator;
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// HTTP method of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// GET
    Get,
    /// PUT
    Put,
    /// POST
    Post,
    /// DELETE
    Delete,
    /// OPTIONS
    Options,
    /// HEAD
    Head,
    /// PATCH
    Patch,
    /// TRACE
    Trace,
}

impl HttpMethod {
    /// Lowercase keyword as used in path items.
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Put => "put",
            HttpMethod::Post => "post",
            HttpMethod::Delete => "delete",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Patch => "patch",
            HttpMethod::Trace => "trace",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

/// Where a parameter travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamLocation {
    /// Templated path segment.
    Path,
    /// Query string.
    Query,
    /// Request header.
    Header,
    /// Cookie.
    Cookie,
    /// Whole request body.
    Body,
    /// One field of a form body.
    Form,
}

impl ParamLocation {
    /// Parses the `in` keyword (case-insensitive).
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "path" => Some(ParamLocation::Path),
            "query" => Some(ParamLocation::Query),
            "header" => Some(ParamLocation::Header),
            "cookie" => Some(ParamLocation::Cookie),
            "body" => Some(ParamLocation::Body),
            "formdata" | "form" => Some(ParamLocation::Form),
            _ => None,
        }
    }
}

/// Serialization of array/object query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionFormat {
    /// Repeated `name=a&name=b`.
    Multi,
    /// Comma separated.
    Csv,
    /// `|` separated.
    Pipe,
    /// Space separated.
    Space,
}

/// One operation parameter.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Parameter {
    /// Wire name.
    pub base_name: String,
    /// Language identifier.
    pub param_name: String,
    /// `description`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Location.
    pub location: Option<ParamLocation>,
    /// Type declaration from the hooks.
    pub data_type: String,
    /// `format`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_format: Option<String>,
    /// Unqualified type; for bodies referencing a model, its classname.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_type: Option<String>,
    /// Inline enum declaration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datatype_with_enum: Option<String>,
    /// Inline enum name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enum_name: Option<String>,
    /// Required (always for path parameters).
    pub required: bool,
    /// `nullable`
    pub nullable: bool,
    /// `deprecated`
    pub deprecated: bool,
    /// Form field of a `multipart/form-data` body.
    pub is_multipart: bool,
    /// Body that references a named model.
    pub is_model: bool,
    /// Container classification.
    pub container: ContainerKind,
    /// Item/value property of a container parameter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Property>>,
    /// Collection format for array parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_format: Option<CollectionFormat>,
    /// Enum-bearing.
    pub is_enum: bool,
    /// Enum values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowable_values: Option<AllowableValues>,
    /// Default value as text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    /// Example value as text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    /// Constraints.
    pub validation: Validation,
    /// Any constraint present.
    pub has_validation: bool,
    /// Capability flags.
    pub flags: TypeFlags,
    /// Media type the schema was taken from (`content` parameters, bodies).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Not the last entry of its list.
    pub has_more: bool,
    /// `x-` extensions.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub extensions: IndexMap<String, Value>,
}

impl Parameter {
    /// True for arrays and maps.
    pub fn is_container(&self) -> bool {
        self.container.is_container()
    }
}

/// Recomputes `has_more` across a parameter list.
pub fn mark_params_has_more(params: &mut [Parameter]) {
    let len = params.len();
    for (i, param) in params.iter_mut().enumerate() {
        param.has_more = i + 1 < len;
    }
}

/// Parameter set for one negotiated request media type.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Content {
    /// Media types sharing this parameter set (first is the declared one).
    pub content_types: Vec<String>,
    /// Form content (`application/x-www-form-urlencoded`, `multipart/form-data`).
    pub is_form: bool,
    /// Own copies of every parameter for this media type.
    pub parameters: Vec<Parameter>,
}

/// One declared response.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Response {
    /// Status code; `"0"` for `default`.
    pub code: String,
    /// `description`
    pub message: String,
    /// Selected as the operation's return response.
    pub is_default: bool,
    /// Type declaration of the payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    /// Unqualified payload type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_type: Option<String>,
    /// Container classification of the payload.
    pub container: ContainerKind,
    /// Neither container nor model-less map.
    pub simple_type: bool,
    /// Payload maps to a language primitive.
    pub primitive_type: bool,
    /// Binary payload.
    pub is_binary: bool,
    /// File payload.
    pub is_file: bool,
    /// Payload references a named model.
    pub is_model: bool,
    /// Media type the payload schema was taken from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Resolved payload property.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Property>,
    /// Response headers.
    pub headers: Vec<Property>,
    /// Not the last response.
    pub has_more: bool,
    /// `x-` extensions.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub extensions: IndexMap<String, Value>,
}

/// One resolved operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Operation {
    /// Path template.
    pub path: String,
    /// Method.
    pub http_method: HttpMethod,
    /// Declared or synthesized identifier.
    pub operation_id: String,
    /// `summary`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// `description`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// `deprecated`
    pub deprecated: bool,
    /// Declared tags.
    pub tags: Vec<String>,
    /// Every parameter (superset).
    pub all_params: Vec<Parameter>,
    /// Body parameters.
    pub body_params: Vec<Parameter>,
    /// Path parameters.
    pub path_params: Vec<Parameter>,
    /// Query parameters.
    pub query_params: Vec<Parameter>,
    /// Header parameters.
    pub header_params: Vec<Parameter>,
    /// Cookie parameters.
    pub cookie_params: Vec<Parameter>,
    /// Form parameters.
    pub form_params: Vec<Parameter>,
    /// Required parameters.
    pub required_params: Vec<Parameter>,
    /// Body parameter of the first non-form content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_param: Option<Parameter>,
    /// Per media type parameter sets.
    pub contents: Vec<Content>,
    /// Request media types.
    pub consumes: Vec<String>,
    /// Distinct response media types.
    pub produces: Vec<String>,
    /// Declared responses.
    pub responses: Vec<Response>,
    /// Headers of the selected response.
    pub response_headers: Vec<Property>,
    /// Declared return type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
    /// Unqualified return type (item/value type for containers).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_base_type: Option<String>,
    /// Container classification of the return type.
    pub return_container: ContainerKind,
    /// Return type is not a container.
    pub return_simple_type: bool,
    /// Return type maps to a language primitive (or there is none).
    pub return_type_is_primitive: bool,
    /// Discriminator of the returned model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<Discriminator>,
    /// Any parameter or return type references a model.
    pub has_reference: bool,
    /// `all_params` is not empty.
    pub has_params: bool,
    /// `required_params` is not empty.
    pub has_required_params: bool,
    /// Some parameter is optional.
    pub has_optional_params: bool,
    /// Path with each `{param}` replaced by its example.
    pub test_path: String,
    /// Names of the security schemes protecting the operation.
    pub security: Vec<String>,
    /// Complex types referenced by parameters and responses.
    pub imports: IndexSet<String>,
    /// `x-` extensions.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub extensions: IndexMap<String, Value>,
}

impl Operation {
    /// Creates an operation with empty parameter lists.
    pub fn new(path: impl Into<String>, http_method: HttpMethod, operation_id: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            test_path: path.clone(),
            path,
            http_method,
            operation_id: operation_id.into(),
            summary: None,
            notes: None,
            deprecated: false,
            tags: Vec::new(),
            all_params: Vec::new(),
            body_params: Vec::new(),
            path_params: Vec::new(),
            query_params: Vec::new(),
            header_params: Vec::new(),
            cookie_params: Vec::new(),
            form_params: Vec::new(),
            required_params: Vec::new(),
            body_param: None,
            contents: Vec::new(),
            consumes: Vec::new(),
            produces: Vec::new(),
            responses: Vec::new(),
            response_headers: Vec::new(),
            return_type: None,
            return_base_type: None,
            return_container: ContainerKind::None,
            return_simple_type: false,
            return_type_is_primitive: false,
            discriminator: None,
            has_reference: false,
            has_params: false,
            has_required_params: false,
            has_optional_params: false,
            security: Vec::new(),
            imports: IndexSet::new(),
            extensions: IndexMap::new(),
        }
    }

    /// The response selected as the return response.
    pub fn default_response(&self) -> Option<&Response> {
        self.responses.iter().find(|r| r.is_default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_method_display() {
        assert_eq!(HttpMethod::Patch.to_string(), "PATCH");
        assert_eq!(HttpMethod::Patch.as_str(), "patch");
        assert_eq!(serde_json::to_value(HttpMethod::Get).unwrap(), "GET");
    }

    #[test]
    fn test_param_location_keywords() {
        assert_eq!(ParamLocation::from_keyword("Query"), Some(ParamLocation::Query));
        assert_eq!(ParamLocation::from_keyword("formData"), Some(ParamLocation::Form));
        assert_eq!(ParamLocation::from_keyword("matrix"), None);
    }

    #[test]
    fn test_new_operation_test_path() {
        let op = Operation::new("/pets/{id}", HttpMethod::Get, "getPet");
        assert_eq!(op.test_path, "/pets/{id}");
        assert!(op.default_response().is_none());
    }
}
