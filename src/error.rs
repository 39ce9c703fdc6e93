//! Error types for anyclient
//!
//! This module defines the error taxonomy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here;
//! no call terminates outside that contract.

use thiserror::Error;

/// The main error type for anyclient
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Request Errors (raised before any network activity)
    // ============================================================================
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Failed to serialize body: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Request cancelled during {action}")]
    Cancelled { action: String },

    // ============================================================================
    // Response Errors
    // ============================================================================
    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create an invalid-request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a cancellation error for the given operation
    pub fn cancelled(action: impl Into<String>) -> Self {
        Self::Cancelled {
            action: action.into(),
        }
    }

    /// True for caller-contract violations raised before any network activity
    pub fn is_invalid_request(&self) -> bool {
        matches!(
            self,
            Error::InvalidRequest { .. } | Error::InvalidUrl(_) | Error::JsonParse(_)
        )
    }

    /// True for failures of the transport itself (not HTTP status failures)
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Http(_) | Error::Timeout { .. } | Error::Cancelled { .. }
        )
    }

    /// HTTP status code, when this error carries one
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for anyclient
pub type Result<T> = std::result::Result<T, Error>;
