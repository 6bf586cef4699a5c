//! Session lifecycle facade over the cache and the auth backend.

use std::sync::Arc;

use campora_core::AppResult;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tracing::warn;

use crate::auth_gateway::AuthGateway;
use crate::session_store::SessionStore;

mod lifecycle;
mod refresh;

/// Observable lifecycle phases of the client session.
///
/// Published through a watch channel so embedding layers react to
/// invalidation in one place instead of polling return values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No session is believed valid.
    LoggedOut,
    /// A session is cached and believed valid.
    LoggedIn,
    /// A token refresh is in flight.
    Refreshing,
}

/// Orchestrates login, logout, verification, refresh, and the permission
/// query against the backend and the local cache.
///
/// The only component that performs network I/O, always through the
/// [`AuthGateway`] port. Query methods degrade every failure to a
/// boolean/`None` sentinel; mutating operations surface errors because
/// local persistence is fallible.
#[derive(Clone)]
pub struct SessionService {
    store: SessionStore,
    gateway: Arc<dyn AuthGateway>,
    phase: Arc<watch::Sender<SessionPhase>>,
    enrollment_task: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl SessionService {
    /// Creates a session service starting in the logged-out phase.
    ///
    /// Call [`SessionService::resume`] to adopt a session persisted by a
    /// previous process.
    #[must_use]
    pub fn new(store: SessionStore, gateway: Arc<dyn AuthGateway>) -> Self {
        let (sender, _receiver) = watch::channel(SessionPhase::LoggedOut);
        Self {
            store,
            gateway,
            phase: Arc::new(sender),
            enrollment_task: Arc::new(Mutex::new(None)),
        }
    }

    /// Returns the current session phase.
    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        *self.phase.borrow()
    }

    /// Subscribes to phase transitions.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionPhase> {
        self.phase.subscribe()
    }

    /// Returns the underlying store for typed read access.
    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Returns whether an access token is present in the cache.
    ///
    /// Purely local: no validity check is performed, so a stale token
    /// still answers `true`. Storage failures degrade to `false`.
    pub async fn is_logged_in(&self) -> bool {
        match self.store.access_token().await {
            Ok(token) => token.is_some(),
            Err(error) => {
                warn!(error = %error, "failed to read cached access token; reporting logged out");
                false
            }
        }
    }

    /// Returns whether the current user holds a permission codename.
    ///
    /// The administrator role implicitly holds every permission; all other
    /// roles are answered from the denormalized permission cache. Absent
    /// cache, absent codename, and storage failures all answer `false`.
    pub async fn has_permission(&self, codename: &str) -> bool {
        if let Some(role) = self.store.role().await {
            if role.is_administrator() {
                return true;
            }
        }

        match self.store.has_permission(codename).await {
            Ok(allowed) => allowed,
            Err(error) => {
                warn!(error = %error, codename = codename, "permission lookup failed; denying");
                false
            }
        }
    }

    /// Re-reads the cache and publishes the phase implied by its contents.
    ///
    /// Enters `LoggedIn` iff an access token is cached; the token is not
    /// verified against the backend.
    pub async fn resume(&self) -> AppResult<()> {
        let phase = if self.store.access_token().await?.is_some() {
            SessionPhase::LoggedIn
        } else {
            SessionPhase::LoggedOut
        };

        self.publish_phase(phase);
        Ok(())
    }

    fn publish_phase(&self, phase: SessionPhase) {
        self.phase.send_replace(phase);
    }

    /// Publishes the phase implied by the cache contents right now.
    ///
    /// Used to settle the phase after a failed operation: a snapshot taken
    /// before the operation began may be stale when calls overlap, but the
    /// cache always knows whether a session is still present. Storage
    /// failures degrade to the logged-out phase.
    pub(super) async fn publish_phase_from_cache(&self) {
        let phase = match self.store.access_token().await {
            Ok(Some(_)) => SessionPhase::LoggedIn,
            Ok(None) => SessionPhase::LoggedOut,
            Err(error) => {
                warn!(error = %error, "failed to read cached access token; publishing logged out");
                SessionPhase::LoggedOut
            }
        };

        self.publish_phase(phase);
    }
}
