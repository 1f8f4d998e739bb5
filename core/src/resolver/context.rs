#![deny(missing_docs)]

//! # Resolution Context
//!
//! Read-only view of one document plus the state shared by every builder:
//! options, language hooks, the alias cache and the diagnostics sink.
//!
//! One context serves exactly one resolution. It is `!Sync` because
//! diagnostics are collected through a `RefCell`.

use crate::config::GeneratorOptions;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::oas::ref_utils::extract_component_name;
use crate::oas::{
    ApiDocument, RefOr, Schema, SchemaKind, ShimHeader, ShimParameter, ShimRequestBody,
    ShimResponse,
};
use crate::resolver::hooks::LanguageHooks;
use crate::resolver::types::{classify_schema, TypeTag};
use indexmap::IndexMap;
use std::cell::RefCell;
use std::collections::HashSet;

/// Maximum `$ref` hops followed before a chain is considered cyclic.
const MAX_REF_HOPS: usize = 32;

/// Shared state of one resolution.
pub struct ResolutionContext<'a> {
    options: &'a GeneratorOptions,
    hooks: &'a dyn LanguageHooks,
    document: &'a ApiDocument,
    aliases: IndexMap<String, TypeTag>,
    diagnostics: RefCell<Diagnostics>,
    reported_refs: RefCell<HashSet<String>>,
}

impl<'a> ResolutionContext<'a> {
    /// Creates the context and computes the alias cache from the full schema set.
    pub fn new(
        document: &'a ApiDocument,
        options: &'a GeneratorOptions,
        hooks: &'a dyn LanguageHooks,
    ) -> Self {
        let aliases = collect_aliases(document);
        tracing::debug!(count = aliases.len(), "Computed alias cache");
        Self {
            options,
            hooks,
            document,
            aliases,
            diagnostics: RefCell::new(Diagnostics::new()),
            reported_refs: RefCell::new(HashSet::new()),
        }
    }

    /// Resolution options.
    pub fn options(&self) -> &'a GeneratorOptions {
        self.options
    }

    /// Language hooks.
    pub fn hooks(&self) -> &'a dyn LanguageHooks {
        self.hooks
    }

    /// The input document.
    pub fn document(&self) -> &'a ApiDocument {
        self.document
    }

    /// `$self` URI of the document.
    pub fn self_uri(&self) -> Option<&'a str> {
        self.document.self_uri.as_deref()
    }

    /// All named schemas.
    pub fn schemas(&self) -> &'a IndexMap<String, Schema> {
        &self.document.components.schemas
    }

    /// A named schema.
    pub fn schema(&self, name: &str) -> Option<&'a Schema> {
        self.document.components.schemas.get(name)
    }

    /// Referenced schema name of a `$ref` node.
    pub fn ref_name(&self, schema: &Schema) -> Option<String> {
        classify_schema(schema, self.self_uri())
            .reference()
            .map(str::to_string)
            .filter(|_| schema.ref_path().is_some())
    }

    /// Follows `$ref` hops to a concrete schema.
    ///
    /// Returns the input itself when it is not a reference or the chain is
    /// broken or cyclic.
    pub fn dereference<'s>(&'s self, schema: &'s Schema) -> &'s Schema {
        let mut current = schema;
        let mut seen = HashSet::new();
        for _ in 0..MAX_REF_HOPS {
            let Some(name) = self.ref_name(current) else {
                return current;
            };
            if !seen.insert(name.clone()) {
                return schema;
            }
            match self.schema(&name) {
                Some(target) => current = target,
                None => return schema,
            }
        }
        schema
    }

    /// Aliased type of a schema name, if it is an alias.
    pub fn alias_type(&self, name: &str) -> Option<&TypeTag> {
        self.aliases.get(name)
    }

    /// True when `name` is a primitive under another name.
    pub fn is_alias(&self, name: &str) -> bool {
        self.aliases.contains_key(name)
    }

    /// The alias cache.
    pub fn aliases(&self) -> &IndexMap<String, TypeTag> {
        &self.aliases
    }

    /// Records a recoverable condition.
    pub fn diagnose(&self, kind: DiagnosticKind, location: &str, message: String) {
        self.diagnostics.borrow_mut().push(kind, location, message);
    }

    /// Records a missing schema reference once per name.
    pub fn report_unresolved(&self, name: &str, target: &str) {
        if self.reported_refs.borrow_mut().insert(name.to_string()) {
            self.diagnose(
                DiagnosticKind::UnresolvedReference,
                target,
                format!("Schema '{}' is not defined; keeping the name", name),
            );
        }
    }

    /// Drains the collected diagnostics.
    pub fn take_diagnostics(&self) -> Diagnostics {
        self.diagnostics.take()
    }

    /// Resolves a parameter against `components.parameters`.
    pub fn parameter<'s>(&'s self, item: &'s RefOr<ShimParameter>) -> Option<&'s ShimParameter> {
        self.component(item, "parameters", &self.document.components.parameters)
    }

    /// Resolves a request body against `components.requestBodies`.
    pub fn request_body<'s>(
        &'s self,
        item: &'s RefOr<ShimRequestBody>,
    ) -> Option<&'s ShimRequestBody> {
        self.component(item, "requestBodies", &self.document.components.request_bodies)
    }

    /// Resolves a response against `components.responses`.
    pub fn response<'s>(&'s self, item: &'s RefOr<ShimResponse>) -> Option<&'s ShimResponse> {
        self.component(item, "responses", &self.document.components.responses)
    }

    /// Resolves a header against `components.headers`.
    pub fn header<'s>(&'s self, item: &'s RefOr<ShimHeader>) -> Option<&'s ShimHeader> {
        self.component(item, "headers", &self.document.components.headers)
    }

    fn component<'s, T>(
        &'s self,
        item: &'s RefOr<T>,
        section: &str,
        pool: &'s IndexMap<String, RefOr<T>>,
    ) -> Option<&'s T> {
        let mut current = item;
        for _ in 0..MAX_REF_HOPS {
            match current {
                RefOr::Item(value) => return Some(value),
                RefOr::Ref { reference } => {
                    let next = extract_component_name(reference, self.self_uri(), section)
                        .and_then(|name| pool.get(&name));
                    match next {
                        Some(next) => current = next,
                        None => {
                            self.diagnose(
                                DiagnosticKind::UnresolvedReference,
                                reference,
                                format!("Component '{}' is not defined in {}", reference, section),
                            );
                            return None;
                        }
                    }
                }
            }
        }
        None
    }
}

/// Maps every primitive-shaped named schema to its classified type.
///
/// Containers, objects, composed schemas, references and enums are never aliases.
fn collect_aliases(document: &ApiDocument) -> IndexMap<String, TypeTag> {
    let self_uri = document.self_uri.as_deref();
    document
        .components
        .schemas
        .iter()
        .filter(|(_, schema)| {
            matches!(schema.kind, SchemaKind::Primitive(_)) && !schema.is_enum()
        })
        .map(|(name, schema)| (name.clone(), classify_schema(schema, self_uri)))
        .collect()
}
