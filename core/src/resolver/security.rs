#![deny(missing_docs)]

//! # Security Resolution
//!
//! Converts `components.securitySchemes` into [`Security`] entries sorted by
//! name. An OAuth2 scheme contributes its first declared flow, examined in the
//! order password, implicit, client credentials, authorization code.

use crate::diagnostics::DiagnosticKind;
use crate::error::{AppError, AppResult};
use crate::ir::{OAuthFlowKind, Security, SecurityKind};
use crate::oas::{RefOr, ShimOAuthFlow, ShimOAuthFlows, ShimSecurityScheme};
use crate::resolver::context::ResolutionContext;
use indexmap::{IndexMap, IndexSet};

/// Builds every security scheme of the document.
pub fn build_security(ctx: &ResolutionContext<'_>) -> AppResult<Vec<Security>> {
    let schemes = &ctx.document().components.security_schemes;
    let mut result = Vec::with_capacity(schemes.len());
    for (name, scheme) in schemes {
        let Some(scheme) = resolve_scheme(schemes, scheme) else {
            tracing::warn!(scheme = %name, "Skipping unresolvable security scheme reference");
            continue;
        };
        let security = build_scheme(name, scheme)?;
        if security.kind == SecurityKind::Other {
            ctx.diagnose(
                DiagnosticKind::UnsupportedSecurityScheme,
                name,
                format!(
                    "Security scheme '{}' has type '{}'; only its name and type are kept",
                    name, security.scheme_type
                ),
            );
        }
        result.push(security);
    }
    result.sort_by(|a, b| a.name.cmp(&b.name));
    let len = result.len();
    for (i, security) in result.iter_mut().enumerate() {
        security.has_more = i + 1 < len;
    }
    tracing::debug!(count = len, "Resolved security schemes");
    Ok(result)
}

fn resolve_scheme<'s>(
    schemes: &'s IndexMap<String, RefOr<ShimSecurityScheme>>,
    scheme: &'s RefOr<ShimSecurityScheme>,
) -> Option<&'s ShimSecurityScheme> {
    let mut current = scheme;
    for _ in 0..schemes.len() + 1 {
        match current {
            RefOr::Item(item) => return Some(item),
            RefOr::Ref { reference } => {
                let name = reference.rsplit('/').next()?;
                current = schemes.get(name)?;
            }
        }
    }
    None
}

/// Builds one scheme entry.
///
/// Fails when an OAuth2 scheme declares no flow. Unknown types yield [`SecurityKind::Other`].
pub fn build_scheme(name: &str, scheme: &ShimSecurityScheme) -> AppResult<Security> {
    let mut security = match scheme.scheme_type.as_str() {
        "apiKey" => {
            let mut security = Security::new(name, SecurityKind::ApiKey);
            security.key_param_name = scheme.name.clone();
            match scheme.location.as_deref() {
                Some("header") => security.is_key_in_header = true,
                Some("query") => security.is_key_in_query = true,
                Some("cookie") => security.is_key_in_cookie = true,
                _ => {}
            }
            security
        }
        "http" => {
            let mut security = Security::new(name, SecurityKind::Http);
            match scheme.scheme.as_deref().map(str::to_ascii_lowercase).as_deref() {
                Some("basic") => security.is_basic = true,
                Some("bearer") => {
                    security.is_bearer = true;
                    security.bearer_format = scheme.bearer_format.clone();
                }
                _ => {}
            }
            security
        }
        "oauth2" => {
            let mut security = Security::new(name, SecurityKind::OAuth2);
            let (kind, flow) = scheme
                .flows
                .as_ref()
                .and_then(first_flow)
                .ok_or_else(|| {
                    AppError::Security(format!("OAuth2 scheme '{}' declares no flow", name))
                })?;
            security.flow = Some(kind);
            security.authorization_url = flow.authorization_url.clone();
            security.token_url = flow.token_url.clone();
            security.refresh_url = flow.refresh_url.clone();
            security.scopes = flow.scopes.clone();
            security
        }
        "openIdConnect" => {
            let mut security = Security::new(name, SecurityKind::OpenIdConnect);
            security.open_id_connect_url = scheme.open_id_connect_url.clone();
            security
        }
        _ => Security::new(name, SecurityKind::Other),
    };
    security.scheme_type = scheme.scheme_type.clone();
    security.description = scheme.description.clone();
    Ok(security)
}

fn first_flow(flows: &ShimOAuthFlows) -> Option<(OAuthFlowKind, &ShimOAuthFlow)> {
    [
        (OAuthFlowKind::Password, flows.password.as_ref()),
        (OAuthFlowKind::Implicit, flows.implicit.as_ref()),
        (OAuthFlowKind::Application, flows.client_credentials.as_ref()),
        (OAuthFlowKind::AccessCode, flows.authorization_code.as_ref()),
    ]
    .into_iter()
    .find_map(|(kind, flow)| flow.map(|flow| (kind, flow)))
}

/// Names of the schemes in a list of security requirements, first occurrence first.
pub fn requirement_names(requirements: &[IndexMap<String, Vec<String>>]) -> Vec<String> {
    requirements
        .iter()
        .flat_map(|requirement| requirement.keys().cloned())
        .collect::<IndexSet<String>>()
        .into_iter()
        .collect()
}
