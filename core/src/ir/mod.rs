#![deny(missing_docs)]

//! # Generator IR
//!
//! The language-agnostic structures handed to template renderers:
//! - **Models**: one per named schema, owned by a [`ModelMap`].
//! - **Operations**: grouped into tag buckets.
//! - **Security**: parsed security schemes.
//!
//! Every node derives `Serialize` so hosts can hand the IR to any engine.

pub mod model;
pub mod operation;
pub mod property;
pub mod security;

pub use model::{Model, ModelMap, ModelRef};
pub use operation::{
    mark_params_has_more, CollectionFormat, Content, HttpMethod, Operation, ParamLocation,
    Parameter, Response,
};
pub use property::{AllowableValues, ContainerKind, EnumVar, Property, TypeFlags, Validation};
pub use security::{OAuthFlowKind, Security, SecurityKind};

use crate::diagnostics::Diagnostics;
use indexmap::IndexMap;
use serde::Serialize;

/// Result of resolving one document.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GeneratorIr {
    /// Name → Model.
    pub models: ModelMap,
    /// Tag → operations, in document order.
    pub operations: IndexMap<String, Vec<Operation>>,
    /// Security schemes sorted by name.
    pub security: Vec<Security>,
    /// Recoverable conditions met during resolution.
    pub diagnostics: Diagnostics,
}

impl GeneratorIr {
    /// Finds an operation by id across all tag buckets.
    pub fn operation(&self, operation_id: &str) -> Option<&Operation> {
        self.operations
            .values()
            .flatten()
            .find(|op| op.operation_id == operation_id)
    }

    /// Total number of operations.
    pub fn operation_count(&self) -> usize {
        self.operations.values().map(Vec::len).sum()
    }
}
