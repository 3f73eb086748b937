//! Error types for tree loading, resolution and invocation.
//!
//! Resolution errors describe bad user input; invocation and load errors
//! describe a misconfigured tree or registry. They are kept apart so an entry
//! point can report them differently.

use thiserror::Error;

/// Error returned by a handler. Passed through invocation untouched.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Failure to match tokens against the tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// No invokable node matched the tokens.
    #[error("command not found: {}", tokens.join(" "))]
    CommandNotFound {
        /// Positional tokens that were tried.
        tokens: Vec<String>,
    },

    /// A command matched but fewer positional tokens than it requires were given.
    #[error("missing required arguments: {}", required.join(", "))]
    MissingRequiredArgs {
        /// Canonical path of the matched command.
        command: Vec<String>,
        /// Declared required argument names.
        required: Vec<String>,
    },
}

/// Failure to dispatch a bound invocation.
#[derive(Debug, Error)]
pub enum InvokeError {
    /// No callable is registered for the handler location.
    #[error("handler not found: {location}")]
    HandlerNotFound {
        /// Location that was looked up.
        location: String,
    },

    /// The handler ran and returned an error.
    #[error(transparent)]
    Handler(HandlerError),
}

/// Failure to build a tree from a document.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// A tree entry has an unexpected shape.
    #[error("invalid node at '{path}': {reason}")]
    InvalidNode {
        /// Dotted key path of the entry (empty for the root).
        path: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The file extension does not name a supported format.
    #[error("unsupported tree format: {0}")]
    UnsupportedFormat(String),
}

/// Convenience alias for results with [`LoadError`].
pub type Result<T> = std::result::Result<T, LoadError>;
