//! OpenAPI metadata error types.

use thiserror::Error;

/// Errors that can occur while assembling API metadata.
#[derive(Error, Debug)]
pub enum OpenApiError {
    /// Two tags share a name.
    #[error("duplicate tag: {0}")]
    DuplicateTag(String),

    /// Metadata could not be rendered as JSON.
    #[error("failed to serialize metadata: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for metadata operations.
pub type OpenApiResult<T> = Result<T, OpenApiError>;
