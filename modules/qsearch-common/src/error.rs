use thiserror::Error;

pub type Result<T> = std::result::Result<T, CatalogError>;

/// A decoded document that is structurally valid but cannot be linked into an
/// event graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IncompleteDocument {
    #[error("Empty PreferredOriginID")]
    MissingPreferredOrigin,

    #[error("Empty PreferredMagnitudeID")]
    MissingPreferredMagnitude,

    #[error("Found no origins")]
    NoOrigins,

    #[error("Found no magnitudes")]
    NoMagnitudes,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Non 200 response code: {status}")]
    Status { status: u16, message: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Incomplete document: {0}")]
    Incomplete(#[from] IncompleteDocument),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Cancelled before completion")]
    Cancelled,
}

impl CatalogError {
    /// Network failures and non-success statuses.
    pub fn is_transport(&self) -> bool {
        matches!(self, CatalogError::Network(_) | CatalogError::Status { .. })
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Decode(err.to_string())
    }
}
