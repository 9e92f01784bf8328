use thiserror::Error;

/// Errors that can occur while querying the meal catalog
///
/// A lookup that succeeds but matches nothing is not an error: single lookups
/// return `None` and list lookups return an empty `Vec`.
#[derive(Error, Debug)]
pub enum FinderError {
    /// Network failure, non-success status, timeout or undecodable response
    #[error("Catalog request failed: {0}")]
    FetchError(#[from] reqwest::Error),

    /// Catalog could not be reached for a reason not reported by the HTTP client
    #[error("Catalog unavailable: {0}")]
    SourceError(String),

    /// Caller supplied an unknown diet tag or a malformed calorie bound
    #[error("Invalid filter criteria: {0}")]
    InvalidCriteria(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    /// Builder configuration error
    #[error("Builder error: {0}")]
    BuilderError(String),
}

impl FinderError {
    /// True when the failure came from talking to the remote catalog
    pub fn is_transport(&self) -> bool {
        matches!(self, FinderError::FetchError(_) | FinderError::SourceError(_))
    }
}
