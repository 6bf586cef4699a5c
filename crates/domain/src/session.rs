use campora_core::{AccessToken, RefreshToken};

/// The token pair identifying an authenticated client.
///
/// Created on login, replaced together on refresh, destroyed on logout;
/// the two tokens never change independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTokens {
    /// Short-lived token attached to authenticated calls.
    pub access: AccessToken,
    /// Long-lived token exchanged for fresh access tokens.
    pub refresh: RefreshToken,
}

impl SessionTokens {
    /// Pairs the two tokens issued by a login or refresh response.
    #[must_use]
    pub fn new(access: AccessToken, refresh: RefreshToken) -> Self {
        Self { access, refresh }
    }
}
