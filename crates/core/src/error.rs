//! Error types for the tradecheck system.

use thiserror::Error;

use crate::interval::list_allowed_intervals;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the tradecheck system.
#[derive(Error, Debug)]
pub enum Error {
    /// Interval code is empty or not one of the recognized codes.
    #[error("Invalid interval {value:?}: must be one of {allowed:?}", allowed = list_allowed_intervals())]
    InvalidInterval { value: String },

    /// Request arguments rejected before any fetch was attempted.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Data error (invalid or inconsistent data).
    #[error("Data error: {0}")]
    Data(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failure reported by the data-fetch collaborator.
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an invalid interval error.
    pub fn invalid_interval(value: impl Into<String>) -> Self {
        Error::InvalidInterval {
            value: value.into(),
        }
    }

    /// Create an invalid request error.
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Error::InvalidRequest(msg.into())
    }

    /// Create a data error.
    pub fn data(msg: impl Into<String>) -> Self {
        Error::Data(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }
}

/// Errors raised while talking to the exchange.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Network or protocol failure in the transport.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The response body could not be decoded.
    #[error("could not decode response: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}
