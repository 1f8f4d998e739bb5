#![deny(missing_docs)]

//! # Document Shims
//!
//! Generic structures acting as an Intermediate Deserialization Layer.
//! These structs map directly to OpenAPI YAML objects and carry exactly the
//! fields the resolver reads; everything else in the document is ignored.

use crate::oas::schema::Schema;
use indexmap::IndexMap;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Either a `$ref` object or an inline value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RefOr<T> {
    /// `{ "$ref": "..." }`
    Ref {
        /// Reference target.
        #[serde(rename = "$ref")]
        reference: String,
    },
    /// Inline definition.
    Item(T),
}

/// Root of a parsed API document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiDocument {
    /// `openapi` version string.
    #[serde(default)]
    pub openapi: Option<String>,
    /// OAS 3.2 `$self` URI used to treat absolute refs as local.
    #[serde(rename = "$self", default, skip_serializing_if = "Option::is_none")]
    pub self_uri: Option<String>,
    /// Path items keyed by template, in document order.
    #[serde(default)]
    pub paths: ShimPaths,
    /// Reusable components.
    #[serde(default)]
    pub components: ShimComponents,
    /// Document-level security requirements.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub security: Vec<IndexMap<String, Vec<String>>>,
}

/// Paths Object; `x-` keys are split off as extensions.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ShimPaths {
    /// Path items keyed by template.
    #[serde(flatten)]
    pub items: IndexMap<String, ShimPathItem>,
}

impl<'de> Deserialize<'de> for ShimPaths {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = IndexMap::<String, Value>::deserialize(deserializer)?;
        let mut items = IndexMap::new();

        for (key, value) in raw {
            if key.starts_with("x-") {
                continue;
            }
            let path_item = serde_json::from_value::<ShimPathItem>(value).map_err(|e| {
                DeError::custom(format!("Failed to parse path item '{}': {}", key, e))
            })?;
            items.insert(key, path_item);
        }

        Ok(Self { items })
    }
}

/// Components Object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShimComponents {
    /// Named schemas, in document order.
    #[serde(default)]
    pub schemas: IndexMap<String, Schema>,
    /// Reusable parameters.
    #[serde(default)]
    pub parameters: IndexMap<String, RefOr<ShimParameter>>,
    /// Reusable request bodies.
    #[serde(default)]
    pub request_bodies: IndexMap<String, RefOr<ShimRequestBody>>,
    /// Reusable responses.
    #[serde(default)]
    pub responses: IndexMap<String, RefOr<ShimResponse>>,
    /// Reusable headers.
    #[serde(default)]
    pub headers: IndexMap<String, RefOr<ShimHeader>>,
    /// Security schemes.
    #[serde(default)]
    pub security_schemes: IndexMap<String, RefOr<ShimSecurityScheme>>,
}

/// Path Item Object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShimPathItem {
    /// GET
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get: Option<ShimOperation>,
    /// PUT
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub put: Option<ShimOperation>,
    /// POST
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<ShimOperation>,
    /// DELETE
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete: Option<ShimOperation>,
    /// OPTIONS
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<ShimOperation>,
    /// HEAD
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<ShimOperation>,
    /// PATCH
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<ShimOperation>,
    /// TRACE
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<ShimOperation>,
    /// Parameters shared by every operation of the path.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<RefOr<ShimParameter>>,
}

/// Operation Object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShimOperation {
    /// Grouping tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Short summary.
    #[serde(default)]
    pub summary: Option<String>,
    /// Long description.
    #[serde(default)]
    pub description: Option<String>,
    /// Declared identifier.
    #[serde(default)]
    pub operation_id: Option<String>,
    /// Operation parameters.
    #[serde(default)]
    pub parameters: Vec<RefOr<ShimParameter>>,
    /// Request body.
    #[serde(default)]
    pub request_body: Option<RefOr<ShimRequestBody>>,
    /// Responses keyed by status code or `default`.
    #[serde(default)]
    pub responses: IndexMap<String, RefOr<ShimResponse>>,
    /// Deprecation marker.
    #[serde(default)]
    pub deprecated: bool,
    /// Operation-level security requirements (overrides the document's).
    #[serde(default)]
    pub security: Option<Vec<IndexMap<String, Vec<String>>>>,
    /// `x-` extensions (non-extension keys are dropped on conversion).
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

/// Parameter Object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShimParameter {
    /// Name of the parameter.
    pub name: String,
    /// Location of the parameter (query, path, header, cookie).
    #[serde(rename = "in")]
    pub location: String,
    /// A brief description of the parameter.
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the parameter is required.
    #[serde(default)]
    pub required: bool,
    /// Whether the parameter is deprecated.
    #[serde(default)]
    pub deprecated: bool,
    /// Schema definition.
    #[serde(default)]
    pub schema: Option<Schema>,
    /// Content map; mutually exclusive with `schema`.
    #[serde(default)]
    pub content: Option<IndexMap<String, ShimMediaType>>,
    /// Serialization style.
    #[serde(default)]
    pub style: Option<String>,
    /// Explode modifier.
    #[serde(default)]
    pub explode: Option<bool>,
    /// Single example value.
    #[serde(default)]
    pub example: Option<Value>,
    /// Everything else, `x-` keys included.
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

impl ShimParameter {
    /// Creates a parameter with the given name, location and schema.
    pub fn new(name: impl Into<String>, location: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            description: None,
            required: false,
            deprecated: false,
            schema: Some(schema),
            content: None,
            style: None,
            explode: None,
            example: None,
            extensions: IndexMap::new(),
        }
    }
}

/// Request Body Object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShimRequestBody {
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Media types, in document order.
    #[serde(default)]
    pub content: IndexMap<String, ShimMediaType>,
    /// Whether the body is required.
    #[serde(default)]
    pub required: bool,
    /// Everything else, `x-` keys included.
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

/// Media Type Object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShimMediaType {
    /// Payload schema.
    #[serde(default)]
    pub schema: Option<Schema>,
    /// Single example.
    #[serde(default)]
    pub example: Option<Value>,
    /// Named examples (`{ name: { value: ... } }`).
    #[serde(default)]
    pub examples: Option<IndexMap<String, Value>>,
}

impl ShimMediaType {
    /// The first example available: `example`, then the first named example's `value`.
    pub fn first_example(&self) -> Option<&Value> {
        if let Some(example) = &self.example {
            return Some(example);
        }
        let (_, first) = self.examples.as_ref()?.first()?;
        Some(first.get("value").unwrap_or(first))
    }
}

/// Response Object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShimResponse {
    /// Description (becomes the response message).
    #[serde(default)]
    pub description: Option<String>,
    /// Response headers.
    #[serde(default)]
    pub headers: IndexMap<String, RefOr<ShimHeader>>,
    /// Media types.
    #[serde(default)]
    pub content: IndexMap<String, ShimMediaType>,
    /// Everything else, `x-` keys included.
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

/// Header Object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShimHeader {
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the header is always present.
    #[serde(default)]
    pub required: bool,
    /// Header value schema.
    #[serde(default)]
    pub schema: Option<Schema>,
}

/// Security Scheme Object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShimSecurityScheme {
    /// `apiKey`, `http`, `oauth2`, `openIdConnect`.
    #[serde(rename = "type")]
    pub scheme_type: String,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// API key parameter name.
    #[serde(default)]
    pub name: Option<String>,
    /// API key location.
    #[serde(rename = "in", default)]
    pub location: Option<String>,
    /// HTTP auth scheme (`basic`, `bearer`).
    #[serde(default)]
    pub scheme: Option<String>,
    /// Bearer token format hint.
    #[serde(default)]
    pub bearer_format: Option<String>,
    /// OAuth2 flows.
    #[serde(default)]
    pub flows: Option<ShimOAuthFlows>,
    /// OpenID Connect discovery URL.
    #[serde(default)]
    pub open_id_connect_url: Option<String>,
}

/// OAuth Flows Object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShimOAuthFlows {
    /// Implicit flow.
    #[serde(default)]
    pub implicit: Option<ShimOAuthFlow>,
    /// Resource owner password flow.
    #[serde(default)]
    pub password: Option<ShimOAuthFlow>,
    /// Client credentials flow.
    #[serde(default)]
    pub client_credentials: Option<ShimOAuthFlow>,
    /// Authorization code flow.
    #[serde(default)]
    pub authorization_code: Option<ShimOAuthFlow>,
}

/// OAuth Flow Object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShimOAuthFlow {
    /// Authorization endpoint.
    #[serde(default)]
    pub authorization_url: Option<String>,
    /// Token endpoint.
    #[serde(default)]
    pub token_url: Option<String>,
    /// Refresh endpoint.
    #[serde(default)]
    pub refresh_url: Option<String>,
    /// Scope name → description.
    #[serde(default)]
    pub scopes: IndexMap<String, String>,
}

/// Keeps only `x-` entries of a flattened extension bag.
pub(crate) fn vendor_extensions(bag: &IndexMap<String, Value>) -> IndexMap<String, Value> {
    bag.iter()
        .filter(|(k, _)| k.starts_with("x-"))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_skip_extensions() {
        let yaml = r#"
/pets:
  get:
    operationId: listPets
    responses: {}
x-internal: true
"#;
        let paths: ShimPaths = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(paths.items.len(), 1);
        let get = paths.items["/pets"].get.as_ref().unwrap();
        assert_eq!(get.operation_id.as_deref(), Some("listPets"));
    }

    #[test]
    fn test_ref_or_parameter() {
        let yaml = r##"
- $ref: "#/components/parameters/Limit"
- name: id
  in: path
  required: true
  schema: { type: string }
  x-example: abc
"##;
        let params: Vec<RefOr<ShimParameter>> = serde_yaml::from_str(yaml).unwrap();
        assert!(matches!(&params[0], RefOr::Ref { reference } if reference == "#/components/parameters/Limit"));
        match &params[1] {
            RefOr::Item(p) => {
                assert_eq!(p.name, "id");
                assert_eq!(p.location, "path");
                assert_eq!(vendor_extensions(&p.extensions).len(), 1);
            }
            _ => panic!("expected inline parameter"),
        }
    }

    #[test]
    fn test_media_type_first_example() {
        let yaml = r#"
examples:
  one:
    value: { id: 1 }
"#;
        let media: ShimMediaType = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(media.first_example().unwrap()["id"], 1);
    }
}
