// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Relay errors.

use osem_units::UnitError;
use thiserror::Error;

/// Longest response body excerpt kept in an error.
const BODY_EXCERPT_LEN: usize = 200;

/// A failed upload attempt. Everything except `Payload` is retried by the
/// worker.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("request timed out")]
    Timeout,

    #[error("request throttled by server (HTTP 429)")]
    Throttled,

    #[error("server returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("unexpected server response: '{body}'")]
    UnexpectedResponse { body: String },

    #[error("cannot build HTTP client: {0}")]
    Client(String),

    #[error("cannot serialize payload: {0}")]
    Payload(String),
}

impl UploadError {
    /// Build an HTTP status failure, keeping a short body excerpt.
    pub fn http_status(status: u16, body: &str) -> Self {
        UploadError::HttpStatus {
            status,
            body: excerpt(body),
        }
    }

    /// Build an unexpected-response failure, keeping a short body excerpt.
    pub fn unexpected_response(body: &str) -> Self {
        UploadError::UnexpectedResponse {
            body: excerpt(body),
        }
    }
}

impl From<reqwest::Error> for UploadError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            UploadError::Timeout
        } else if e.is_builder() {
            UploadError::Client(e.to_string())
        } else {
            UploadError::Transport(e.to_string())
        }
    }
}

impl From<PayloadError> for UploadError {
    fn from(e: PayloadError) -> Self {
        UploadError::Payload(e.to_string())
    }
}

fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(BODY_EXCERPT_LEN) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}

/// A mapped field that could not be converted or formatted. The rest of the
/// record is still uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field '{field}': {source}")]
pub struct FieldError {
    pub field: String,
    #[source]
    pub source: UnitError,
}

/// Payload serialization failure.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Top-level relay errors.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    #[error("Payload error: {0}")]
    Payload(#[from] PayloadError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
