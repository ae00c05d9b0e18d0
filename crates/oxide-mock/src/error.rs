//! Error types for building mock handlers.

use thiserror::Error;

/// Errors raised while assembling a handler from route declarations.
///
/// Dispatch itself never produces a `RouterError`: an unmatched request is a
/// normal outcome, and handler failures are surfaced as [`HandlerError`].
#[derive(Debug, Error)]
pub enum RouterError {
    /// The configured base path does not start with `/`.
    #[error("invalid base path: {0:?} (must start with '/')")]
    InvalidBasePath(String),

    /// A path template contains a malformed parameter segment.
    #[error("invalid path template {template:?}: {reason}")]
    InvalidTemplate {
        /// The offending template, as declared.
        template: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The same parameter name is bound twice within one template.
    #[error("duplicate parameter {name:?} in path template {template:?}")]
    DuplicateParameter {
        /// The offending template, as declared.
        template: String,
        /// The repeated parameter name.
        name: String,
    },
}

/// Result type alias for handler construction.
pub type Result<T> = std::result::Result<T, RouterError>;

/// Error returned by a user handler.
///
/// The dispatcher hands these back to its caller exactly as the handler
/// produced them.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;
