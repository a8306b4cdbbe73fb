use thiserror::Error;

use crate::models::SourceType;

/// Error types shared by every NCES crate.
#[derive(Error, Debug)]
pub enum AppError {
    /// HTTP request failed or returned a non-success status.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Request timed out.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Network/connection error.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// A CSS selector used by a source profile did not compile.
    #[error("Selector error: {0}")]
    SelectorError(String),

    /// Listing traversal hit the configured page bound without a match.
    #[error("Pagination limit of {max_pages} pages exceeded on the {source_type} listing")]
    PaginationLimitExceeded {
        source_type: SourceType,
        max_pages: usize,
    },

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The caller supplied an unusable query.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

impl AppError {
    /// Returns true if the remote directory could not be reached or answered
    /// with a failure status.
    ///
    /// Transport failures abort a resolution outright; they are never
    /// reported as "not found".
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            AppError::HttpError(_) | AppError::Timeout(_) | AppError::NetworkError(_)
        )
    }
}
