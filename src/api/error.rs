//! Error types for the chat backend client.

use thiserror::Error;

/// Errors returned by [`ChatApi`](super::ChatApi).
#[derive(Debug, Error)]
pub enum ApiError {
    /// The question was empty after trimming.
    #[error("question is empty")]
    EmptyQuestion,

    /// An endpoint URL could not be built from the base URL.
    #[error("cannot build endpoint '{path}' from base URL {base}")]
    InvalidEndpoint {
        /// Configured base URL.
        base: String,
        /// Relative endpoint path.
        path: String,
    },

    /// Transport-level failure.
    #[error("network error calling {endpoint}: {source}")]
    Network {
        /// Endpoint URL.
        endpoint: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with a non-success status.
    #[error("HTTP {status} from {endpoint}: {message}")]
    Status {
        /// Endpoint URL.
        endpoint: String,
        /// HTTP status code.
        status: u16,
        /// The backend's `error` field, or the status reason.
        message: String,
    },

    /// The response body was not the expected JSON.
    #[error("unexpected response from {endpoint}: {source}")]
    Decode {
        /// Endpoint URL.
        endpoint: String,
        /// The underlying decode error.
        #[source]
        source: reqwest::Error,
    },
}

impl ApiError {
    /// Creates an invalid endpoint error.
    pub fn invalid_endpoint(base: impl Into<String>, path: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            base: base.into(),
            path: path.into(),
        }
    }

    /// Creates a network error.
    pub fn network(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            endpoint: endpoint.into(),
            source,
        }
    }

    /// Creates a status error.
    pub fn status(endpoint: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            endpoint: endpoint.into(),
            status,
            message: message.into(),
        }
    }

    /// Creates a decode error.
    pub fn decode(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Decode {
            endpoint: endpoint.into(),
            source,
        }
    }
}
