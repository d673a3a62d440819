use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    // Query errors
    #[error("Invalid feed query: {0}")]
    InvalidQuery(String),

    #[error("No endpoint serves this feed: {0}")]
    UnsupportedQuery(String),

    // Network errors
    #[error("{0}")]
    Api(#[from] content_api::ContentApiError),

    // Output errors
    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type FeedResult<T> = Result<T, FeedError>;
