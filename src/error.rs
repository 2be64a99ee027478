//! Error types for openFEMA queries

/// Errors that can occur while building or executing an openFEMA query.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The dataset name is not one of the supported identifiers.
    #[error("Could not find endpoint for {name}; only {allowed:?} supported")]
    UnsupportedDataset {
        name: String,
        allowed: Vec<&'static str>,
    },

    /// The API answered with a non-success status.
    #[error("HTTP {status} from {url}: {body}")]
    Http {
        status: u16,
        url: String,
        body: String,
    },

    /// The request could not be sent or the body could not be read.
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The response body was not valid JSON.
    #[error("Failed to parse JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// The response JSON lacked an expected field.
    #[error("Response is missing `{0}`")]
    MissingField(String),
}

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;
