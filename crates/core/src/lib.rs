//! Shared primitives for all Rust crates in Campora.

#![forbid(unsafe_code)]

/// Authentication primitives shared across services.
pub mod auth;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use auth::{AccessToken, RefreshToken};

/// Result type used across Campora crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Value could not be encrypted, decrypted, or (de)serialized.
    #[error("codec error: {0}")]
    Codec(String),

    /// Session vault read or write failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// Request never produced a response from the backend.
    #[error("transport error: {0}")]
    Transport(String),

    /// Backend answered the request with an error status.
    #[error("rejected with status {status}: {detail}")]
    Rejected {
        /// HTTP status code the backend answered with.
        status: u16,
        /// Response body or reason phrase, trimmed for logging.
        detail: String,
    },

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns true when the backend itself rejected the request, as
    /// opposed to the request never reaching it.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}
