#![deny(missing_docs)]

//! # Naming Utilities
//!
//! Helper functions for deriving identifiers from paths, methods and schema names.

use regex::Regex;
use std::sync::OnceLock;

/// Upper-cases the first character.
pub fn initial_caps(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lower-cases the first character.
pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Joins the words of `s` (split on `_`, `-`, `.`, `/`, spaces) in CamelCase.
///
/// e.g. `pet_store-item` -> `PetStoreItem`, or `petStoreItem` with `lower_camel`.
pub fn camelize(s: &str, lower_camel: bool) -> String {
    let joined: String = s
        .split(|c: char| matches!(c, '_' | '-' | '.' | '/' | ' '))
        .filter(|part| !part.is_empty())
        .map(initial_caps)
        .collect();
    if lower_camel {
        lower_first(&joined)
    } else {
        joined
    }
}

/// Replaces punctuation with `_` and strips every remaining non-word character.
///
/// With `allow_unicode` Unicode letters and digits survive, otherwise only ASCII.
pub fn sanitize_name(name: &str, allow_unicode: bool) -> String {
    static ASCII_RE: OnceLock<Regex> = OnceLock::new();
    static UNICODE_RE: OnceLock<Regex> = OnceLock::new();

    let replaced = name
        .replace("[]", "")
        .replace('[', "_")
        .replace(']', "")
        .replace('(', "_")
        .replace(')', "")
        .replace(['.', '-', ' '], "_");

    let re = if allow_unicode {
        UNICODE_RE.get_or_init(|| Regex::new(r"[^\p{L}\p{N}_]").expect("Invalid regex"))
    } else {
        ASCII_RE.get_or_init(|| Regex::new(r"[^a-zA-Z0-9_]").expect("Invalid regex"))
    };
    re.replace_all(&replaced, "").into_owned()
}

/// Builds an operation identifier from the path and method when none is declared.
///
/// Path braces are dropped, segments are joined in lower camel case, and the
/// method is appended. The root path contributes `root`.
///
/// e.g. `GET /pets/{id}` -> `petsIdGet`, `GET /` -> `rootGet`
pub fn synthesize_operation_id(path: &str, method: &str) -> String {
    let clean_path = path.replace(['{', '}'], "");
    let mut builder = String::new();
    if clean_path == "/" {
        builder.push_str("root");
    }
    let joined = format!("{}/{}", clean_path, method.to_lowercase());
    for part in joined.split('/').filter(|p| !p.is_empty()) {
        if builder.is_empty() {
            builder.push_str(&lower_first(part));
        } else {
            builder.push_str(&initial_caps(part));
        }
    }
    builder
}

/// Strips everything up to and including the first `_`.
pub fn remove_operation_id_prefix(operation_id: &str) -> String {
    match operation_id.split_once('_') {
        Some((_, rest)) => rest.to_string(),
        None => operation_id.to_string(),
    }
}

/// Increments a trailing number, or appends `2`.
///
/// e.g. `status` -> `status2`, `status2` -> `status3`
pub fn generate_next_name(name: &str) -> String {
    static TRAILING_DIGITS_RE: OnceLock<Regex> = OnceLock::new();
    let re = TRAILING_DIGITS_RE.get_or_init(|| Regex::new(r"(\d+)$").expect("Invalid regex"));

    if let Some(caps) = re.captures(name) {
        let digits = &caps[1];
        if let Some(next) = digits.parse::<u64>().ok().and_then(|n| n.checked_add(1)) {
            let stem = &name[..name.len() - digits.len()];
            return format!("{}{}", stem, next);
        }
    }
    format!("{}2", name)
}

/// Derives the composite model name for a oneOf/anyOf list.
///
/// e.g. (`OneOf`, `Pet`, Some(`owner_ref`)) -> `OneOfPetOwnerRef`
pub fn composite_name(prefix: &str, model: &str, property: Option<&str>) -> String {
    let mut name = format!("{}{}", prefix, camelize(model, false));
    if let Some(property) = property {
        name.push_str(&camelize(property, false));
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camelize() {
        assert_eq!(camelize("pet_store-item", false), "PetStoreItem");
        assert_eq!(camelize("pet_store-item", true), "petStoreItem");
        assert_eq!(camelize("already", false), "Already");
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("pet-store.v1 id", false), "pet_store_v1_id");
        assert_eq!(sanitize_name("ids[]", false), "ids");
        assert_eq!(sanitize_name("filter[name]", false), "filter_name");
        assert_eq!(sanitize_name("naïve$", false), "nave");
        assert_eq!(sanitize_name("naïve$", true), "naïve");
    }

    #[test]
    fn test_synthesize_operation_id() {
        assert_eq!(synthesize_operation_id("/pets/{id}", "GET"), "petsIdGet");
        assert_eq!(synthesize_operation_id("/", "get"), "rootGet");
        assert_eq!(
            synthesize_operation_id("/users/{id}/activate", "post"),
            "usersIdActivatePost"
        );
    }

    #[test]
    fn test_remove_operation_id_prefix() {
        assert_eq!(remove_operation_id_prefix("pets_listPets"), "listPets");
        assert_eq!(remove_operation_id_prefix("listPets"), "listPets");
    }

    #[test]
    fn test_generate_next_name() {
        assert_eq!(generate_next_name("status"), "status2");
        assert_eq!(generate_next_name("status2"), "status3");
        assert_eq!(generate_next_name("v19"), "v20");
    }

    #[test]
    fn test_generate_next_name_saturated_counter() {
        assert_eq!(
            generate_next_name("id18446744073709551615"),
            "id184467440737095516152"
        );
        assert_eq!(
            generate_next_name("id99999999999999999999"),
            "id999999999999999999992"
        );
    }

    #[test]
    fn test_composite_name() {
        assert_eq!(composite_name("OneOf", "Pet", None), "OneOfPet");
        assert_eq!(composite_name("AnyOf", "Pet", Some("owner_ref")), "AnyOfPetOwnerRef");
    }
}
