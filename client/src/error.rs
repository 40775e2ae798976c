//! Error handling for the Soil Health Monitor client

use thiserror::Error;

/// Client error types
#[derive(Error, Debug)]
pub enum ClientError {
    /// The transport could not complete the request
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The gateway answered outside the 2xx range
    #[error("sensor gateway returned HTTP {status}")]
    Protocol { status: reqwest::StatusCode },

    /// The body was not a well-formed soil payload
    #[error("malformed sensor payload: {0}")]
    Parse(String),
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;
