#![deny(missing_docs)]

//! # Inheritance Fixup
//!
//! Second pass over the complete model set. Resolves parent and interface
//! names to [`ModelRef`] handles and registers each model as a child of its
//! ancestors, stopping at (and including) the nearest ancestor that declares
//! a discriminator.

use crate::diagnostics::DiagnosticKind;
use crate::ir::{ModelMap, ModelRef};
use crate::resolver::context::ResolutionContext;
use std::collections::HashSet;

/// Links parents, children and interfaces across `models`.
pub fn fixup(ctx: &ResolutionContext<'_>, models: &mut ModelMap) {
    let mut registrations: Vec<(String, String)> = Vec::new();

    let names: Vec<String> = models.keys().cloned().collect();
    for name in &names {
        let Some(model) = models.get(name) else {
            continue;
        };
        let parent_ref = model
            .parent
            .as_ref()
            .filter(|p| models.contains_key(p.as_str()))
            .map(ModelRef::new);
        let interface_refs: Vec<ModelRef> = model
            .interfaces
            .iter()
            .filter(|i| models.contains_key(i.as_str()))
            .map(ModelRef::new)
            .collect();

        let own_discriminator = model.discriminator.clone();
        let mut visited = HashSet::from([name.clone()]);
        let mut ancestor = parent_ref.clone();
        while let Some(current) = ancestor.take() {
            if !visited.insert(current.name().to_string()) {
                tracing::debug!(model = %name, ancestor = %current.name(), "Parent chain loops; stopping");
                break;
            }
            let Some(parent) = current.resolve(models) else {
                break;
            };
            registrations.push((parent.name.clone(), name.clone()));

            if let (Some(mine), Some(theirs)) = (&own_discriminator, &parent.discriminator) {
                if mine.property_name != theirs.property_name {
                    ctx.diagnose(
                        DiagnosticKind::DiscriminatorConflict,
                        name,
                        format!(
                            "Discriminator '{}' differs from '{}' declared by ancestor '{}'",
                            mine.property_name, theirs.property_name, parent.name
                        ),
                    );
                }
            }
            if parent.discriminator.is_some() {
                break;
            }
            ancestor = parent
                .parent
                .as_ref()
                .filter(|p| models.contains_key(p.as_str()))
                .map(ModelRef::new);
        }

        if let Some(model) = models.get_mut(name) {
            model.parent_model = parent_ref;
            model.interface_models = interface_refs;
        }
    }

    for (parent, child) in registrations {
        if let Some(parent) = models.get_mut(&parent) {
            let child = ModelRef::new(child);
            if !parent.children.contains(&child) {
                parent.children.push(child);
            }
        }
    }
}
