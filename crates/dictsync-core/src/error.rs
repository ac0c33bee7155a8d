//! Core error types.

use thiserror::Error;

/// Errors raised by the collection, the mutation gateway, and the listener
/// registry.
#[derive(Debug, Error)]
pub enum Error {
    /// A required argument is missing or has the wrong shape.
    ///
    /// The message is host-facing and fixed per call site (e.g.
    /// `"A callback function is required."`).
    #[error("{0}")]
    Validation(String),

    /// A host value could not be represented in the collection's native
    /// value type. Names the offending key.
    #[error("cannot convert value for key '{key}': {reason}")]
    Conversion {
        /// The key whose value failed to convert.
        key: String,
        /// Why the conversion failed.
        reason: String,
    },

    /// A listener callback failed while handling a changeset.
    #[error("listener callback failed: {0}")]
    Callback(String),

    /// Storage layer error from a collection primitive.
    #[error("storage error: {0}")]
    Storage(String),

    /// No method with the given name is bound on the dictionary object.
    #[error("unknown method: {0}")]
    UnknownMethod(String),
}

impl Error {
    /// Validation error with a host-facing message.
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    /// Conversion error naming the offending key.
    pub fn conversion(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Conversion {
            key: key.into(),
            reason: reason.into(),
        }
    }
}
