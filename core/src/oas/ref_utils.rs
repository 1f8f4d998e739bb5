#![deny(missing_docs)]

//! # Reference Utilities
//!
//! Shared helpers for turning `$ref` targets into component names.
//!
//! These utilities never fetch external documents. Absolute or relative
//! references are treated as local when their document part matches the
//! current document's `$self` URI.

use percent_encoding::percent_decode_str;
use std::path::Path;
use url::Url;

/// Splits a reference into its document part and its fragment (without `#`).
fn split_reference(ref_str: &str) -> (&str, Option<&str>) {
    match ref_str.split_once('#') {
        Some((doc, fragment)) => (doc, Some(fragment)),
        None => (ref_str, None),
    }
}

/// Normalizes a `$ref` to a local JSON Pointer (e.g. `#/components/...`) if it targets the
/// current document.
///
/// Returns `None` if the reference is external or lacks a fragment.
pub fn normalize_ref_to_local(ref_str: &str, self_uri: Option<&str>) -> Option<String> {
    let (document, fragment) = split_reference(ref_str);
    let fragment = fragment?;
    if document.is_empty() {
        return Some(format!("#{}", fragment));
    }
    if ref_doc_matches_self(document, self_uri?) {
        return Some(format!("#{}", fragment));
    }
    None
}

/// Extracts a component name from a `$ref` if it points to `#/components/{section}/{name}`.
///
/// Returns `None` if the reference is not local to the current document.
pub fn extract_component_name(ref_str: &str, self_uri: Option<&str>, section: &str) -> Option<String> {
    let (found_section, name) = split_component_pointer(ref_str, self_uri)?;
    (found_section == section).then_some(name)
}

/// Returns the referenced name stripped of its location prefix.
///
/// `#/components/<any section>/<name>` yields the decoded `<name>`; any other
/// reference is returned verbatim.
pub fn simple_ref_name(ref_str: &str, self_uri: Option<&str>) -> String {
    match split_component_pointer(ref_str, self_uri) {
        Some((_, name)) => name,
        None => ref_str.to_string(),
    }
}

/// Builds the local pointer for a schema name (used when rewriting renamed schemas).
pub fn schema_ref(name: &str) -> String {
    format!("#/components/schemas/{}", encode_pointer_segment(name))
}

fn split_component_pointer(ref_str: &str, self_uri: Option<&str>) -> Option<(String, String)> {
    let local = normalize_ref_to_local(ref_str, self_uri)?;
    let pointer = local.trim_start_matches('#').trim_start_matches('/');
    let segments: Vec<&str> = pointer.split('/').collect();

    if segments.len() != 3 || segments[0] != "components" {
        return None;
    }

    let name = decode_pointer_segment(segments[2]);
    if name.is_empty() {
        None
    } else {
        Some((segments[1].to_string(), name))
    }
}

/// Decodes a JSON Pointer segment (handles `~1` and `~0`).
pub(crate) fn decode_pointer_segment(segment: &str) -> String {
    let decoded = segment.replace("~1", "/").replace("~0", "~");
    percent_decode_str(&decoded)
        .decode_utf8_lossy()
        .into_owned()
}

fn encode_pointer_segment(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

fn ref_doc_matches_self(ref_doc: &str, self_uri: &str) -> bool {
    if ref_doc == self_uri {
        return true;
    }

    if let (Ok(ref_url), Ok(self_url)) = (Url::parse(ref_doc), Url::parse(self_uri)) {
        return ref_url.scheme() == self_url.scheme()
            && ref_url.host() == self_url.host()
            && ref_url.port() == self_url.port()
            && ref_url.path() == self_url.path();
    }

    // If `$self` is an absolute-path reference (e.g. "/api/openapi"), compare path.
    if self_uri.starts_with('/') {
        if let Ok(ref_url) = Url::parse(ref_doc) {
            return ref_url.path() == self_uri;
        }
    }

    // Fallback: compare raw relative paths.
    if !self_uri.contains("://") && !ref_doc.contains("://") {
        return Path::new(ref_doc) == Path::new(self_uri);
    }

    false
}
