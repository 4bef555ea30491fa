//! Error types for the authenticated API client.
//!
//! # Design
//! Failures split along the two moments they can happen. `ConfigurationError`
//! is raised while building `Credentials`, before any network activity.
//! `RequestError` covers everything that can go wrong during a single call:
//! the transport, the header material, and decoding the body. Neither is
//! retried internally; the caller decides what to do.

use thiserror::Error;

/// Errors raised while constructing `Credentials`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    /// The access token was absent, empty, or whitespace only.
    #[error("API access token is missing or empty")]
    MissingToken,

    /// An environment variable was set but is not valid unicode.
    #[error("environment variable {name} is not valid unicode")]
    InvalidEnv { name: String },
}

/// Errors raised while performing a request.
#[derive(Debug, Error)]
pub enum RequestError {
    /// Connection, TLS, or I/O failure reported by the transport.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// A header name or value could not be encoded (e.g. a token containing
    /// a newline).
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// Only produced by strict method parsing; `RequestManager::request`
    /// falls back to GET instead.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// The response body was not valid JSON.
    #[error("response body (HTTP {status}) is not valid JSON: {source}")]
    Decode {
        status: u16,
        #[source]
        source: serde_json::Error,
    },
}

/// Umbrella error for callers that construct and request in one `?` chain.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Request(#[from] RequestError),
}
