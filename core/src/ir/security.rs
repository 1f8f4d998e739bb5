#![deny(missing_docs)]

//! # Security Nodes
//!
//! One parsed security scheme with its flow metadata.

use indexmap::IndexMap;
use serde::Serialize;

/// Scheme family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SecurityKind {
    /// `apiKey`
    ApiKey,
    /// `http` (basic / bearer)
    Http,
    /// `oauth2`
    OAuth2,
    /// `openIdConnect`
    OpenIdConnect,
    /// Any other type; only `name` and `scheme_type` are filled.
    Other,
}

/// OAuth2 flow, named the way templates expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum OAuthFlowKind {
    /// Resource owner password.
    Password,
    /// Implicit.
    Implicit,
    /// Client credentials.
    Application,
    /// Authorization code.
    AccessCode,
}

/// One security scheme.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Security {
    /// Scheme name from `components.securitySchemes`.
    pub name: String,
    /// Family.
    pub kind: SecurityKind,
    /// Declared `type`.
    pub scheme_type: String,
    /// `description`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// API key parameter name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_param_name: Option<String>,
    /// API key sent as header.
    pub is_key_in_header: bool,
    /// API key sent as query parameter.
    pub is_key_in_query: bool,
    /// API key sent as cookie.
    pub is_key_in_cookie: bool,
    /// HTTP basic.
    pub is_basic: bool,
    /// HTTP bearer.
    pub is_bearer: bool,
    /// Bearer token format.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bearer_format: Option<String>,
    /// Selected OAuth2 flow.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow: Option<OAuthFlowKind>,
    /// OAuth2 authorization endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization_url: Option<String>,
    /// OAuth2 token endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_url: Option<String>,
    /// OAuth2 refresh endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_url: Option<String>,
    /// OAuth2 scopes.
    pub scopes: IndexMap<String, String>,
    /// OpenID Connect discovery URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_id_connect_url: Option<String>,
    /// Not the last scheme.
    pub has_more: bool,
}

impl Security {
    /// Creates a scheme entry with no metadata.
    pub fn new(name: impl Into<String>, kind: SecurityKind) -> Self {
        Self {
            name: name.into(),
            kind,
            scheme_type: String::new(),
            description: None,
            key_param_name: None,
            is_key_in_header: false,
            is_key_in_query: false,
            is_key_in_cookie: false,
            is_basic: false,
            is_bearer: false,
            bearer_format: None,
            flow: None,
            authorization_url: None,
            token_url: None,
            refresh_url: None,
            scopes: IndexMap::new(),
            open_id_connect_url: None,
            has_more: false,
        }
    }
}
