#![deny(missing_docs)]

//! # Resolver
//!
//! Turns the parsed input graph into the generator IR.
//!
//! - **Classification**: schema → canonical type tag (`types`).
//! - **Construction**: properties, models, composites, parameters, bodies,
//!   responses and operations.
//! - **Linking**: inheritance fixup and enum reconciliation over the full model map.
//! - **Pipeline**: the phase driver returning a [`GeneratorIr`](crate::ir::GeneratorIr).

pub mod body;
pub mod composition;
pub mod context;
pub mod enums;
pub mod fixup;
pub mod hooks;
pub mod model;
pub mod naming;
pub mod operation;
pub mod params;
pub mod pipeline;
pub mod property;
pub mod responses;
pub mod security;
pub mod types;

pub use context::ResolutionContext;
pub use hooks::{DefaultHooks, LanguageHooks};
pub use pipeline::{resolve_document, Generator, DEFAULT_TAG};
pub use types::{classify, classify_schema, TypeTag};
