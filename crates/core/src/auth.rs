use std::fmt::{Debug, Formatter};

use serde::{Deserialize, Serialize};

/// Short-lived bearer token attached to authenticated backend calls.
///
/// The raw value never appears in `Debug` output or logs; call sites log
/// [`AccessToken::fingerprint`] instead.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wraps a raw access token issued by the backend.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the raw token for use in request headers and bodies.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Consumes the wrapper and returns the raw token.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Returns a short non-reversible identifier safe to log.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        fingerprint_of(self.0.as_str())
    }
}

impl Debug for AccessToken {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.debug_tuple("AccessToken").field(&"<redacted>").finish()
    }
}

/// Long-lived token exchanged for fresh access tokens.
///
/// Redacted in `Debug` output the same way as [`AccessToken`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RefreshToken(String);

impl RefreshToken {
    /// Wraps a raw refresh token issued by the backend.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the raw token for use in request bodies.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Consumes the wrapper and returns the raw token.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Returns a short non-reversible identifier safe to log.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        fingerprint_of(self.0.as_str())
    }
}

impl Debug for RefreshToken {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.debug_tuple("RefreshToken").field(&"<redacted>").finish()
    }
}

/// Computes the first eight hex characters of the SHA-256 hash of a token.
fn fingerprint_of(raw_token: &str) -> String {
    use sha2::{Digest, Sha256};
    use std::fmt::Write;

    let mut hasher = Sha256::new();
    hasher.update(raw_token.as_bytes());
    let result = hasher.finalize();

    result
        .iter()
        .take(4)
        .fold(String::with_capacity(8), |mut acc, byte| {
            let _ = write!(acc, "{byte:02x}");
            acc
        })
}
