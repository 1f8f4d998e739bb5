#![deny(missing_docs)]

//! # Diagnostics
//!
//! Collects recoverable conditions met during resolution.
//!
//! Every entry is also emitted through `tracing::warn!` so hosts that only
//! install a subscriber still see them, while tests and callers can inspect
//! the returned list.

use serde::Serialize;

/// Category of a recoverable resolution condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    /// A `$ref` names a schema/component that does not exist.
    UnresolvedReference,
    /// An array schema without `items`; a string item was assumed.
    MissingArrayItems,
    /// A parameter, body or response carries no usable schema.
    MissingSchema,
    /// An operation without `operationId` got a synthesized one.
    SynthesizedOperationId,
    /// A duplicate operationId within a tag bucket was suffixed.
    DuplicateOperationId,
    /// Model names differing only by case were renamed.
    DuplicateModelName,
    /// Discriminators with different property names along one parent chain.
    DiscriminatorConflict,
    /// Container nesting exceeded the recursion ceiling.
    RecursionLimit,
    /// A security scheme type without dedicated metadata (e.g. `mutualTLS`).
    UnsupportedSecurityScheme,
}

/// One recoverable condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Category.
    pub kind: DiagnosticKind,
    /// Where it happened (model name, `METHOD /path`, scheme name ...).
    pub location: String,
    /// Human readable explanation.
    pub message: String,
}

/// Ordered collection of diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a diagnostic and logs it at `warn` level.
    pub fn push(
        &mut self,
        kind: DiagnosticKind,
        location: impl Into<String>,
        message: impl Into<String>,
    ) {
        let location = location.into();
        let message = message.into();
        tracing::warn!(kind = ?kind, location = %location, "{}", message);
        self.entries.push(Diagnostic {
            kind,
            location,
            message,
        });
    }

    /// Number of recorded diagnostics.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates all diagnostics in emission order.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// Iterates diagnostics of one kind.
    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(move |d| d.kind == kind)
    }

    /// True when at least one diagnostic of `kind` was recorded.
    pub fn contains(&self, kind: DiagnosticKind) -> bool {
        self.of_kind(kind).next().is_some()
    }

    /// Appends all entries of `other` without logging them again.
    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    /// Consumes the collection.
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}
