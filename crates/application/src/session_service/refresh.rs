use campora_core::AccessToken;
use tracing::{debug, warn};

use super::{SessionPhase, SessionService};

impl SessionService {
    /// Asks the backend whether the cached access token is still valid.
    ///
    /// Resolves to a boolean, never an error: a missing token answers
    /// `false` without any network call, a backend rejection answers
    /// `false` and publishes the logged-out phase, and a transport failure
    /// answers `false` while leaving the phase unchanged.
    pub async fn check_token_validity(&self) -> bool {
        let token = match self.store.access_token().await {
            Ok(Some(token)) => token,
            Ok(None) => return false,
            Err(error) => {
                warn!(error = %error, "failed to read cached access token for verification");
                return false;
            }
        };

        match self.gateway.verify_token(&token).await {
            Ok(()) => true,
            Err(error) if error.is_rejection() => {
                warn!(
                    access_fingerprint = %token.fingerprint(),
                    error = %error,
                    "backend rejected the cached access token"
                );
                self.publish_phase(SessionPhase::LoggedOut);
                false
            }
            Err(error) => {
                warn!(
                    access_fingerprint = %token.fingerprint(),
                    error = %error,
                    "token verification did not complete"
                );
                false
            }
        }
    }

    /// Exchanges the cached refresh token for a fresh token pair.
    ///
    /// On success both tokens are persisted together and the new access
    /// token is returned. Every failure resolves to `None` with nothing
    /// persisted; callers treat `None` as "must re-login". A missing
    /// refresh token short-circuits without a network call. A backend
    /// rejection publishes the logged-out phase; a transport failure
    /// settles back to the phase implied by the cache, so an overlapping
    /// refresh that already completed is never overwritten by a stale
    /// snapshot.
    pub async fn refresh_tokens(&self) -> Option<AccessToken> {
        let refresh = match self.store.refresh_token().await {
            Ok(Some(token)) => token,
            Ok(None) => {
                debug!("no refresh token cached; session must be re-established");
                return None;
            }
            Err(error) => {
                warn!(error = %error, "failed to read cached refresh token");
                return None;
            }
        };

        self.publish_phase(SessionPhase::Refreshing);

        match self.gateway.refresh_tokens(&refresh).await {
            Ok(tokens) => {
                if let Err(error) = self.store.set_tokens(&tokens).await {
                    warn!(error = %error, "failed to persist refreshed tokens");
                    self.publish_phase_from_cache().await;
                    return None;
                }

                self.publish_phase(SessionPhase::LoggedIn);
                debug!(
                    access_fingerprint = %tokens.access.fingerprint(),
                    "session tokens refreshed"
                );
                Some(tokens.access)
            }
            Err(error) if error.is_rejection() => {
                warn!(
                    refresh_fingerprint = %refresh.fingerprint(),
                    error = %error,
                    "backend rejected the refresh token"
                );
                self.publish_phase(SessionPhase::LoggedOut);
                None
            }
            Err(error) => {
                warn!(
                    refresh_fingerprint = %refresh.fingerprint(),
                    error = %error,
                    "token refresh did not complete"
                );
                self.publish_phase_from_cache().await;
                None
            }
        }
    }
}
