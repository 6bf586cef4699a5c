use campora_core::{AccessToken, AppError, AppResult, NonEmptyString};
use campora_domain::Role;
use tracing::{debug, warn};

use crate::auth_gateway::LoginGrant;

use super::{SessionPhase, SessionService};

impl SessionService {
    /// Authenticates against the backend and persists the session.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<()> {
        let username = NonEmptyString::new(username)
            .map_err(|_| AppError::Validation("username must not be empty".to_owned()))?;
        let password = NonEmptyString::new(password)
            .map_err(|_| AppError::Validation("password must not be empty".to_owned()))?;

        let grant = self
            .gateway
            .login(username.as_str(), password.as_str())
            .await?;
        self.save_login_response(grant).await
    }

    /// Persists a login grant and enters the logged-in phase.
    ///
    /// Tokens, user, and profile are written in program order before this
    /// returns, and any enrollment cached by a previous session is
    /// dropped. When the role carries an enrollment, its fetch is spawned
    /// fire-and-forget: a failure there is logged and swallowed, and the
    /// login still succeeds. Callers that need enrollment data right away
    /// should use [`SessionService::refresh_enrollment`] instead of
    /// assuming availability.
    pub async fn save_login_response(&self, grant: LoginGrant) -> AppResult<()> {
        let LoginGrant {
            tokens,
            user,
            profile,
        } = grant;

        self.store.set_tokens(&tokens).await?;
        self.store.set_user(&user).await?;

        let profile_id = profile.as_ref().map(|profile| profile.id);
        match profile {
            Some(profile) => self.store.set_profile(&profile).await?,
            None => self.store.remove_profile().await?,
        }

        // The grant itself carries no enrollment; anything cached under
        // that key belongs to a previous session.
        self.store.remove_enrollment().await?;

        self.publish_phase(SessionPhase::LoggedIn);
        debug!(
            user_id = user.id,
            role = user.role.as_str(),
            access_fingerprint = %tokens.access.fingerprint(),
            "login response persisted"
        );

        if user.role.requires_enrollment() {
            match profile_id {
                Some(profile_id) => {
                    self.spawn_enrollment_fetch(user.role, profile_id, tokens.access.clone())
                        .await;
                }
                None => {
                    warn!(
                        role = user.role.as_str(),
                        "login response carries no profile; skipping enrollment fetch"
                    );
                }
            }
        }

        Ok(())
    }

    /// Fetches and caches the enrollment for the cached user and profile.
    ///
    /// The awaitable counterpart of the fire-and-forget fetch spawned by
    /// [`SessionService::save_login_response`].
    pub async fn refresh_enrollment(&self) -> AppResult<()> {
        let Some(user) = self.store.user().await? else {
            return Err(AppError::Validation(
                "no user is cached; log in first".to_owned(),
            ));
        };

        if !user.role.requires_enrollment() {
            return Err(AppError::Validation(format!(
                "role '{}' has no enrollment data",
                user.role.as_str()
            )));
        }

        let Some(profile) = self.store.profile().await? else {
            return Err(AppError::Validation(
                "no profile is cached; enrollment lookup needs a profile id".to_owned(),
            ));
        };

        let Some(token) = self.store.access_token().await? else {
            return Err(AppError::Validation(
                "no access token is cached".to_owned(),
            ));
        };

        self.fetch_and_cache_enrollment(user.role, profile.id, &token)
            .await
    }

    /// Aborts any in-flight enrollment fetch, clears the whole storage
    /// area, and publishes the logged-out phase.
    pub async fn logout(&self) -> AppResult<()> {
        if let Some(task) = self.enrollment_task.lock().await.take() {
            task.abort();
        }

        self.store.clear().await?;
        self.publish_phase(SessionPhase::LoggedOut);
        debug!("session cleared");
        Ok(())
    }

    pub(super) async fn spawn_enrollment_fetch(
        &self,
        role: Role,
        profile_id: i64,
        token: AccessToken,
    ) {
        let service = self.clone();
        let handle = tokio::spawn(async move {
            if let Err(error) = service
                .fetch_and_cache_enrollment(role, profile_id, &token)
                .await
            {
                warn!(error = %error, profile_id, "enrollment fetch after login failed");
            }
        });

        // A newer login supersedes any fetch still in flight.
        if let Some(previous) = self.enrollment_task.lock().await.replace(handle) {
            previous.abort();
        }
    }

    pub(super) async fn fetch_and_cache_enrollment(
        &self,
        role: Role,
        profile_id: i64,
        token: &AccessToken,
    ) -> AppResult<()> {
        match self.gateway.fetch_enrollment(role, profile_id, token).await? {
            Some(enrollment) => {
                self.store.set_enrollment(&enrollment).await?;
                debug!(profile_id, "enrollment cached");
            }
            None => {
                self.store.remove_enrollment().await?;
                debug!(profile_id, "profile has no enrollment");
            }
        }

        Ok(())
    }
}
