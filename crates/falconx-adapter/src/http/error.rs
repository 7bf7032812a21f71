/*
[INPUT]:  Error sources (HTTP status, transport, signing, decoding, WebSocket)
[OUTPUT]: Structured error types with a machine-checkable kind and reason
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or changing status mapping
*/

use std::fmt;

use reqwest::StatusCode;
use thiserror::Error;

/// Coarse classification of a [`FalconxError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidSecret,
    Transport,
    AuthRejected,
    ClientError,
    ServerError,
    DecodeError,
    Unknown,
    Config,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InvalidSecret => "invalid_secret",
            ErrorKind::Transport => "transport",
            ErrorKind::AuthRejected => "auth_rejected",
            ErrorKind::ClientError => "client_error",
            ErrorKind::ServerError => "server_error",
            ErrorKind::DecodeError => "decode_error",
            ErrorKind::Unknown => "unknown",
            ErrorKind::Config => "config",
        };
        f.write_str(name)
    }
}

/// Main error type for the FalconX adapter
#[derive(Error, Debug)]
pub enum FalconxError {
    /// API secret is not valid base64
    #[error("Invalid secret: {reason}")]
    InvalidSecret { reason: String },

    /// HTTP request failed before a response arrived
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// WebSocket transport failure
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// Server rejected the credentials or signature (401/403)
    #[error("Authentication rejected (status {status}): {reason}")]
    AuthRejected { status: u16, reason: String },

    /// Request was malformed or addressed a missing resource (400/404)
    #[error("Client error (status {status}): {reason}")]
    Client { status: u16, reason: String },

    /// Server-side failure (500/503/504)
    #[error("Server error (status {status}): {reason}")]
    Server { status: u16, reason: String },

    /// Any other non-success status
    #[error("Unexpected status {status}: {reason}")]
    UnexpectedStatus { status: u16, reason: String },

    /// Response body did not match the expected shape
    #[error("Failed to decode response: {reason}")]
    Decode { reason: String },

    /// Request body could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl FalconxError {
    /// Machine-checkable classification of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            FalconxError::InvalidSecret { .. } => ErrorKind::InvalidSecret,
            FalconxError::Http(_) | FalconxError::WebSocket(_) => ErrorKind::Transport,
            FalconxError::AuthRejected { .. } => ErrorKind::AuthRejected,
            FalconxError::Client { .. } => ErrorKind::ClientError,
            FalconxError::Server { .. } => ErrorKind::ServerError,
            FalconxError::UnexpectedStatus { .. } => ErrorKind::Unknown,
            FalconxError::Decode { .. } => ErrorKind::DecodeError,
            FalconxError::Serialization(_)
            | FalconxError::UrlParse(_)
            | FalconxError::Config(_) => ErrorKind::Config,
        }
    }

    /// Human-readable reason without the kind prefix
    pub fn reason(&self) -> String {
        match self {
            FalconxError::InvalidSecret { reason }
            | FalconxError::AuthRejected { reason, .. }
            | FalconxError::Client { reason, .. }
            | FalconxError::Server { reason, .. }
            | FalconxError::UnexpectedStatus { reason, .. }
            | FalconxError::Decode { reason } => reason.clone(),
            FalconxError::Http(err) => err.to_string(),
            FalconxError::WebSocket(reason) | FalconxError::Config(reason) => reason.clone(),
            FalconxError::Serialization(err) => err.to_string(),
            FalconxError::UrlParse(err) => err.to_string(),
        }
    }

    /// HTTP status attached to the error, if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            FalconxError::AuthRejected { status, .. }
            | FalconxError::Client { status, .. }
            | FalconxError::Server { status, .. }
            | FalconxError::UnexpectedStatus { status, .. } => Some(*status),
            FalconxError::Http(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }

    /// Whether a caller may reasonably retry. The adapter itself never does.
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Transport | ErrorKind::ServerError)
    }

    /// Check if error indicates authentication failure
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::AuthRejected | ErrorKind::InvalidSecret
        )
    }

    /// Map a non-success HTTP status to a typed error
    pub fn from_status(status: StatusCode) -> Self {
        let code = status.as_u16();
        match code {
            400 => FalconxError::Client {
                status: code,
                reason: "Bad Request - Invalid request format".to_string(),
            },
            401 => FalconxError::AuthRejected {
                status: code,
                reason: "Unauthorized - Invalid API Key".to_string(),
            },
            403 => FalconxError::AuthRejected {
                status: code,
                reason: "Forbidden - You do not have access to the requested resource"
                    .to_string(),
            },
            404 => FalconxError::Client {
                status: code,
                reason: "Resource Not Found".to_string(),
            },
            500 => FalconxError::Server {
                status: code,
                reason: "Internal Server Error - We had a problem with our server".to_string(),
            },
            503 => FalconxError::Server {
                status: code,
                reason: "Service Unavailable".to_string(),
            },
            504 => FalconxError::Server {
                status: code,
                reason: "Gateway Timeout".to_string(),
            },
            _ => FalconxError::UnexpectedStatus {
                status: code,
                reason: "Unknown Error Occurred".to_string(),
            },
        }
    }
}

/// Result type alias for FalconX operations
pub type Result<T> = std::result::Result<T, FalconxError>;
