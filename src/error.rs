//! Error taxonomy for translation resolution.
//!
//! Everything except `Cancelled` is absorbed inside the resolver: a failed
//! endpoint moves on to the next one, a dictionary miss moves on to the next
//! fallback tier. The variants exist so failures can be logged and tested.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranslationError {
    /// Network failure or timeout talking to one endpoint
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        source: reqwest::Error,
    },

    /// Endpoint answered with a non-success status
    #[error("{endpoint} returned HTTP {status}")]
    HttpStatus {
        endpoint: String,
        status: reqwest::StatusCode,
    },

    /// Endpoint answered, but the body is not the expected nested-array shape
    #[error("malformed response from {endpoint}: {reason}")]
    MalformedResponse { endpoint: String, reason: String },

    /// Neither an exact nor a partial dictionary match exists
    #[error("no dictionary match for target language '{target_lang}'")]
    NoMatchFound { target_lang: String },

    #[error("translation cancelled")]
    Cancelled,
}

impl TranslationError {
    pub(crate) fn malformed(endpoint: &str, reason: impl Into<String>) -> Self {
        TranslationError::MalformedResponse {
            endpoint: endpoint.to_string(),
            reason: reason.into(),
        }
    }
}
