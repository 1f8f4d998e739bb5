#![deny(missing_docs)]

//! # Enum Naming
//!
//! Turns raw enum values into named members and reconciles enums that a
//! child model re-declares from its parent.
//!
//! Steps per enum:
//! 1. Find the common prefix of all string values, minus its trailing word run
//!    (`status-on`, `status-off` → `status-`).
//! 2. Name each value by stripping the prefix (the full value if nothing is left, `null` for null).
//! 3. Rename collisions by appending the index of the later occurrence.
//! 4. Rewrite a default value that matches a member to the member reference.

use crate::ir::{EnumVar, Model, ModelMap, Property};
use crate::resolver::hooks::{render_scalar, LanguageHooks};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// Common prefix of the values, minus the trailing alphanumeric run.
///
/// Empty for fewer than two values or when any value is not a string.
pub fn find_common_prefix(values: &[Value]) -> String {
    static TRAILING_WORD_RE: OnceLock<Regex> = OnceLock::new();

    if values.len() < 2 {
        return String::new();
    }
    let Some(strings) = values.iter().map(Value::as_str).collect::<Option<Vec<&str>>>() else {
        return String::new();
    };

    let first = strings[0];
    let mut end = first.len();
    for other in &strings[1..] {
        let shared: usize = first
            .chars()
            .zip(other.chars())
            .take_while(|(a, b)| a == b)
            .map(|(a, _)| a.len_utf8())
            .sum();
        end = end.min(shared);
    }
    let prefix = &first[..end];

    let re = TRAILING_WORD_RE.get_or_init(|| Regex::new(r"[a-zA-Z0-9]+\z").expect("Invalid regex"));
    re.replace(prefix, "").into_owned()
}

/// Display name of one value after prefix truncation.
fn enum_display_name(value: &Value, truncate: usize) -> String {
    if value.is_null() {
        return "null".to_string();
    }
    let text = render_scalar(value);
    if truncate == 0 {
        return text;
    }
    match text.get(truncate..) {
        Some(rest) if !rest.is_empty() => rest.to_string(),
        _ => text,
    }
}

/// Builds the named members for `values`.
pub fn build_enum_vars(hooks: &dyn LanguageHooks, values: &[Value], datatype: &str) -> Vec<EnumVar> {
    let truncate = find_common_prefix(values).len();
    let mut vars: Vec<EnumVar> = values
        .iter()
        .map(|value| EnumVar {
            name: hooks.to_enum_var_name(&enum_display_name(value, truncate), datatype),
            value: hooks.to_enum_value(value, datatype),
        })
        .collect();

    for i in 0..vars.len() {
        let name = vars[i].name.clone();
        for (j, other) in vars.iter_mut().enumerate() {
            if i != j && other.name == name {
                other.name = format!("{}_{}", name, j);
            }
        }
    }
    vars
}

/// Names the enum members of a property (innermost item for containers).
pub fn name_property_enum(hooks: &dyn LanguageHooks, property: &mut Property) {
    let datatype = property.innermost().datatype.clone();
    let raw_values = property
        .innermost()
        .allowable_values
        .as_ref()
        .map(|a| a.values.clone());
    let Some(values) = raw_values else {
        return;
    };
    let enum_vars = build_enum_vars(hooks, &values, &datatype);

    if let Some(default) = property.default_value.clone() {
        let matched = values
            .iter()
            .position(|v| render_scalar(v) == default)
            .and_then(|i| enum_vars.get(i));
        if let Some(member) = matched {
            property.default_value =
                Some(hooks.to_enum_default_value(&member.name, &property.datatype_with_enum));
        }
    }

    if let Some(allowable) = property.allowable_values.as_mut() {
        allowable.enum_vars = enum_vars.clone();
    }
    if let Some(allowable) = property.innermost_mut().allowable_values.as_mut() {
        allowable.enum_vars = enum_vars;
    }
}

/// Names the members of an enum model and of every enum-bearing var.
pub fn name_model_enums(hooks: &dyn LanguageHooks, model: &mut Model) {
    if model.is_enum {
        let datatype = model.data_type.clone().unwrap_or_default();
        if let Some(allowable) = model.allowable_values.as_mut() {
            allowable.enum_vars = build_enum_vars(hooks, &allowable.values, &datatype);
        }
    }
    for var in model.vars.iter_mut().chain(model.all_vars.iter_mut()) {
        if var.is_enum {
            name_property_enum(hooks, var);
        }
    }
}

/// Removes from each child the enum vars its resolved parent already declares.
///
/// Two vars are the same enum when name, base type and datatype match. Must run
/// after the inheritance fixup; models without a resolved parent are untouched.
pub fn remove_inherited_enums(models: &mut ModelMap) {
    let mut removals: Vec<(String, Vec<String>)> = Vec::new();
    for model in models.values() {
        let Some(parent) = model.parent_model.as_ref().and_then(|p| p.resolve(models)) else {
            continue;
        };
        let duplicates: Vec<String> = model
            .vars
            .iter()
            .filter(|var| var.is_enum)
            .filter(|var| {
                parent.vars.iter().any(|p| {
                    p.is_enum
                        && p.name == var.name
                        && p.base_type == var.base_type
                        && p.datatype == var.datatype
                })
            })
            .map(|var| var.name.clone())
            .collect();
        if !duplicates.is_empty() {
            removals.push((model.name.clone(), duplicates));
        }
    }

    for (name, duplicates) in removals {
        if let Some(model) = models.get_mut(&name) {
            tracing::debug!(model = %name, removed = ?duplicates, "Removing inherited enum vars");
            model.vars.retain(|var| !duplicates.contains(&var.name));
            model.reindex();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{AllowableValues, ModelRef};
    use crate::resolver::hooks::DefaultHooks;
    use serde_json::json;

    #[test]
    fn test_common_prefix_trims_word() {
        assert_eq!(find_common_prefix(&[json!("status-on"), json!("status-off")]), "status-");
        assert_eq!(find_common_prefix(&[json!("available")]), "");
        assert_eq!(find_common_prefix(&[json!("abc"), json!("abd")]), "");
        assert_eq!(find_common_prefix(&[json!(1), json!(12)]), "");
    }

    #[test]
    fn test_build_enum_vars() {
        let hooks = DefaultHooks::default();
        let vars = build_enum_vars(&hooks, &[json!("status-on"), json!("status-off")], "string");
        let names: Vec<_> = vars.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["on", "off"]);
        assert_eq!(vars[0].value, "\"status-on\"");
    }

    #[test]
    fn test_collision_suffix() {
        let hooks = DefaultHooks::default();
        let vars = build_enum_vars(&hooks, &[json!("a-b"), json!("a.b"), json!("x")], "string");
        let names: Vec<_> = vars.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["a_b", "a_b_1", "x"]);
    }

    #[test]
    fn test_null_and_prefix_only_values() {
        let hooks = DefaultHooks::default();
        let vars = build_enum_vars(&hooks, &[json!(null), json!(3)], "integer");
        assert_eq!(vars[0].name, "null");
        assert_eq!(vars[1].value, "3");
        assert_eq!(enum_display_name(&json!("status-"), 7), "status-");
    }

    #[test]
    fn test_default_rewritten_to_member() {
        let hooks = DefaultHooks::default();
        let mut prop = Property {
            name: "status".into(),
            datatype: "string".into(),
            datatype_with_enum: "StatusEnum".into(),
            is_enum: true,
            allowable_values: Some(AllowableValues::new(vec![json!("on"), json!("off")])),
            default_value: Some("off".into()),
            ..Default::default()
        };
        name_property_enum(&hooks, &mut prop);
        assert_eq!(prop.default_value.as_deref(), Some("StatusEnum.off"));
        assert_eq!(prop.allowable_values.unwrap().enum_vars.len(), 2);
    }

    #[test]
    fn test_remove_inherited_enums() {
        let status = Property {
            name: "status".into(),
            base_name: "status".into(),
            base_type: "string".into(),
            datatype: "string".into(),
            is_enum: true,
            ..Default::default()
        };
        let mut parent = Model::new("Pet", "Pet");
        parent.vars = vec![status.clone()];
        parent.reindex();
        let mut child = Model::new("Cat", "Cat");
        child.vars = vec![status, Property { name: "lives".into(), ..Default::default() }];
        child.parent = Some("Pet".into());
        child.parent_model = Some(ModelRef::new("Pet"));
        child.reindex();

        let mut models = ModelMap::new();
        models.insert("Pet".into(), parent);
        models.insert("Cat".into(), child);
        remove_inherited_enums(&mut models);

        assert_eq!(models["Cat"].vars.len(), 1);
        assert!(!models["Cat"].vars[0].has_more);
        assert!(!models["Cat"].has_enums);
        assert_eq!(models["Pet"].vars.len(), 1);
    }
}
