use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected HTTP status: {0}")]
    Status(u16),

    #[error("Unable to decode boosts: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid feed URL: {0}")]
    InvalidUrl(String),
}
