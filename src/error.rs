//! Error types for xsdtypes
//!
//! This module defines all error types used throughout the library.
//! Every error is raised at the point where the offending declaration,
//! assignment or export happens; nothing is deferred or retried.

use std::fmt;
use thiserror::Error;

/// Result type alias using xsdtypes Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for xsdtypes operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid component or type declaration
    #[error("invalid declaration: {0}")]
    Declaration(String),

    /// Declared name is not a valid XML name
    #[error("name error: {0}")]
    Name(String),

    /// Read or write of a field the complex type does not declare
    #[error("'{name}' is not a valid component of a {type_name}")]
    UnknownAttribute {
        /// Name of the complex type
        type_name: String,
        /// Name of the requested field
        name: String,
    },

    /// A value was rejected by a type's `check_value`
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Operation applied to the wrong kind of type
    #[error("type error: {0}")]
    Type(String),

    /// Insertion beyond the maximum length of a bounded sequence
    #[error("out of bounds: {0}")]
    OutOfBounds(String),

    /// Export of an element that has not been given a value
    #[error("missing value: {0}")]
    MissingValue(String),

    /// Reserved name used with a dynamic accessor
    #[error("key error: {0}")]
    Key(String),

    /// Markup rendering error
    #[error("XML error: {0}")]
    Xml(String),

    /// JSON export error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Check if this error reports a rejected value
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

/// Type mismatch raised by `check_value`, with context
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Error message
    pub message: String,
    /// Field path where the value was assigned (e.g. `DictionaryItem.key`)
    pub path: Option<String>,
    /// Why the value was rejected
    pub reason: Option<String>,
}

impl ValidationError {
    /// Create a new validation error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: None,
            reason: None,
        }
    }

    /// Set the path where validation failed
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Set the reason
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(ref reason) = self.reason {
            write!(f, "\n\nReason: {}", reason)?;
        }

        if let Some(ref path) = self.path {
            write!(f, "\n\nPath: {}", path)?;
        }

        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Prefix the path of a validation error with `parent`, leaving other errors untouched
pub(crate) fn at_path(err: Error, parent: impl Into<String>) -> Error {
    match err {
        Error::Validation(mut v) => {
            let parent = parent.into();
            v.path = Some(match v.path.take() {
                Some(inner) if inner.starts_with('[') => format!("{}{}", parent, inner),
                Some(inner) => format!("{}.{}", parent, inner),
                None => parent,
            });
            Error::Validation(v)
        }
        other => other,
    }
}
