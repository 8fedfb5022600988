use thiserror::Error;

/// Result type for bundle resolution
pub type Result<T> = std::result::Result<T, BundleError>;

/// Errors that can occur while resolving a bundle
#[derive(Error, Debug)]
pub enum BundleError {
    /// The host handed over a format tag this resolver does not own
    #[error("Unsupported Transformers format '{0}'.")]
    UnsupportedFormat(String),

    /// The anchor itself could not be decoded as JSON
    #[error("Anchor '{0}' is not a JSON document")]
    AnchorUndecodable(String),

    /// Assembly was requested without a single file
    #[error("Bundle has no files to assemble")]
    EmptyBundle,

    /// A sibling file does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// A sibling name that does not stay inside the anchor's directory
    #[error("Invalid sibling name: {0}")]
    InvalidName(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl BundleError {
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
