use async_trait::async_trait;
use campora_core::{AccessToken, AppResult, RefreshToken};
use campora_domain::{EnrollmentRecord, ProfileRecord, Role, SessionTokens, UserRecord};

/// Payload of a successful login.
#[derive(Debug, Clone)]
pub struct LoginGrant {
    /// Token pair for the new session.
    pub tokens: SessionTokens,
    /// Base account record.
    pub user: UserRecord,
    /// Role-specific profile, when the backend sends one.
    pub profile: Option<ProfileRecord>,
}

/// Backend authentication endpoints consumed by the session service.
///
/// The only network seam in the crate. Implementations distinguish a
/// backend rejection (`AppError::Rejected`) from a request that never
/// completed (`AppError::Transport`); the session service treats only the
/// former as session invalidation.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Exchanges credentials for a session grant.
    async fn login(&self, username: &str, password: &str) -> AppResult<LoginGrant>;

    /// Asks the backend whether an access token is still valid.
    async fn verify_token(&self, token: &AccessToken) -> AppResult<()>;

    /// Exchanges a refresh token for a fresh token pair.
    async fn refresh_tokens(&self, refresh: &RefreshToken) -> AppResult<SessionTokens>;

    /// Fetches the enrollment for a student or teacher profile.
    ///
    /// Returns `Ok(None)` when the profile has no enrollment; roles
    /// without enrollment data are a validation error.
    async fn fetch_enrollment(
        &self,
        role: Role,
        profile_id: i64,
        token: &AccessToken,
    ) -> AppResult<Option<EnrollmentRecord>>;
}
