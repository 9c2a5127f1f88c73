//! Error types for domain construction.

use thiserror::Error;

use crate::metadata::MetadataError;

/// Result type for domain construction and model accessors.
pub type ModelResult<T> = Result<T, ModelError>;

/// Fatal errors raised while building or querying the domain model.
///
/// Non-fatal conditions (a malformed annotation, an unknown provider type)
/// never surface here; they degrade to "absent" and are logged.
#[derive(Error, Debug)]
pub enum ModelError {
    /// A referenced field, table or constraint member is missing from
    /// already-loaded metadata.
    #[error("schema inconsistency: {0}")]
    SchemaInconsistency(String),

    /// A type needed to complete an operation cannot be resolved.
    #[error("unresolved type '{type_name}' for operation '{operation}': {reason}")]
    UnresolvedType {
        type_name: String,
        operation: String,
        reason: String,
    },

    /// The model has more than one candidate where exactly one is required.
    #[error("ambiguous model: {0}")]
    AmbiguousModel(String),

    /// The metadata source failed.
    #[error(transparent)]
    Metadata(#[from] MetadataError),
}

impl ModelError {
    pub fn inconsistency(message: impl Into<String>) -> Self {
        Self::SchemaInconsistency(message.into())
    }

    pub fn ambiguous(message: impl Into<String>) -> Self {
        Self::AmbiguousModel(message.into())
    }

    pub fn unresolved(
        type_name: impl Into<String>,
        operation: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::UnresolvedType {
            type_name: type_name.into(),
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// True when the error came from the schema store rather than the model.
    pub fn is_metadata(&self) -> bool {
        matches!(self, Self::Metadata(_))
    }
}
