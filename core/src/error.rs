//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.
//!
//! Only conditions that abort resolution are errors. Everything recoverable
//! is recorded as a [`crate::diagnostics::Diagnostic`] instead.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// The document text could not be deserialized into the input graph.
    #[from(ignore)]
    #[display("Parse Error: {_0}")]
    Parse(String),

    /// A generator option is malformed or not supported.
    #[from(ignore)]
    #[display("Config Error: {_0}")]
    Config(String),

    /// A security scheme cannot be expressed (e.g. OAuth2 without flows).
    #[from(ignore)]
    #[display("Security Error: {_0}")]
    Security(String),

    /// Resolution could not continue (e.g. an operation identifier could not be built).
    #[from(ignore)]
    #[display("Resolution Error: {_0}")]
    Resolution(String),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
