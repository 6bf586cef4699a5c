//! Typed accessors over the encrypted session cache.
//!
//! Every value crosses a [`ValueCodec`] on its way in and out of the
//! [`SessionVault`], so nothing lands in persistent storage as plaintext.
//! Decode failures are recoverable: a corrupted entry reads back as absent.

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use async_trait::async_trait;
use campora_core::{AccessToken, AppError, AppResult, RefreshToken};
use campora_domain::{
    EnrollmentRecord, PermissionSet, ProfileRecord, Role, SessionTokens, UserRecord,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

/// Storage keys in the shared vault area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Raw access token string.
    AccessToken,
    /// Raw refresh token string.
    RefreshToken,
    /// JSON-encoded base user record.
    User,
    /// JSON-encoded role-specific profile record.
    Profile,
    /// JSON-encoded denormalized effective permission list.
    Permissions,
    /// JSON-encoded enrollment record.
    Enrollment,
}

impl CacheKey {
    /// Returns the stable storage name for this key.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccessToken => "access_token",
            Self::RefreshToken => "refresh_token",
            Self::User => "user",
            Self::Profile => "profile",
            Self::Permissions => "permissions",
            Self::Enrollment => "enrollment",
        }
    }
}

impl Display for CacheKey {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Reversible string codec applied to every cached value.
///
/// Obfuscates credentials at rest; not a security boundary on its own.
/// Decoding foreign or corrupted input must fail with an error value,
/// never panic.
pub trait ValueCodec: Send + Sync {
    /// Encodes a plaintext value for storage.
    fn encode(&self, plaintext: &str) -> AppResult<String>;

    /// Decodes a stored value back to plaintext.
    fn decode(&self, encoded: &str) -> AppResult<String>;
}

/// Persistence port for the session cache.
///
/// Values are opaque strings; encoding happens above this seam. The vault
/// models one shared storage area, so `clear` drops every key in it, not
/// just the session keys.
#[async_trait]
pub trait SessionVault: Send + Sync {
    /// Writes a value under a key, replacing any previous value.
    async fn put(&self, key: CacheKey, value: &str) -> AppResult<()>;

    /// Reads the value under a key, or `None` when absent.
    async fn get(&self, key: CacheKey) -> AppResult<Option<String>>;

    /// Removes the value under a key; absent keys are not an error.
    async fn remove(&self, key: CacheKey) -> AppResult<()>;

    /// Drops every key in the storage area unconditionally.
    async fn clear(&self) -> AppResult<()>;
}

/// Typed read/write pairs over the vault for each cached entity.
///
/// Records are value objects: every mutation is a full replace-and-persist,
/// and nothing mutates a cached record in place.
#[derive(Clone)]
pub struct SessionStore {
    codec: Arc<dyn ValueCodec>,
    vault: Arc<dyn SessionVault>,
}

impl SessionStore {
    /// Creates a session store from a codec and vault implementation.
    #[must_use]
    pub fn new(codec: Arc<dyn ValueCodec>, vault: Arc<dyn SessionVault>) -> Self {
        Self { codec, vault }
    }

    /// Persists the access token.
    pub async fn set_access_token(&self, token: &AccessToken) -> AppResult<()> {
        self.write_raw(CacheKey::AccessToken, token.as_str()).await
    }

    /// Returns the cached access token, if any.
    pub async fn access_token(&self) -> AppResult<Option<AccessToken>> {
        Ok(self
            .read_raw(CacheKey::AccessToken)
            .await?
            .map(AccessToken::new))
    }

    /// Persists the refresh token.
    pub async fn set_refresh_token(&self, token: &RefreshToken) -> AppResult<()> {
        self.write_raw(CacheKey::RefreshToken, token.as_str()).await
    }

    /// Returns the cached refresh token, if any.
    pub async fn refresh_token(&self) -> AppResult<Option<RefreshToken>> {
        Ok(self
            .read_raw(CacheKey::RefreshToken)
            .await?
            .map(RefreshToken::new))
    }

    /// Persists both session tokens, access first.
    pub async fn set_tokens(&self, tokens: &SessionTokens) -> AppResult<()> {
        self.set_access_token(&tokens.access).await?;
        self.set_refresh_token(&tokens.refresh).await
    }

    /// Persists the base user record.
    pub async fn set_user(&self, user: &UserRecord) -> AppResult<()> {
        self.write_json(CacheKey::User, user).await
    }

    /// Returns the cached user record, if present and well-formed.
    pub async fn user(&self) -> AppResult<Option<UserRecord>> {
        self.read_json(CacheKey::User).await
    }

    /// Persists the profile record and refreshes the denormalized
    /// permission cache.
    ///
    /// When the profile carries both its direct permission list and its
    /// group list, the deduplicated union is persisted under the
    /// `permissions` key so membership checks never re-derive it. When the
    /// union is not derivable, any previously cached permission list is
    /// removed rather than left stale.
    pub async fn set_profile(&self, profile: &ProfileRecord) -> AppResult<()> {
        self.write_json(CacheKey::Profile, profile).await?;

        match profile.effective_permissions() {
            Some(permissions) => self.write_json(CacheKey::Permissions, &permissions).await,
            None => self.vault.remove(CacheKey::Permissions).await,
        }
    }

    /// Returns the cached profile record, if present and well-formed.
    pub async fn profile(&self) -> AppResult<Option<ProfileRecord>> {
        self.read_json(CacheKey::Profile).await
    }

    /// Removes the cached profile and its derived permission cache.
    pub async fn remove_profile(&self) -> AppResult<()> {
        self.vault.remove(CacheKey::Profile).await?;
        self.vault.remove(CacheKey::Permissions).await
    }

    /// Returns the denormalized effective permission set, if cached.
    pub async fn permissions(&self) -> AppResult<Option<PermissionSet>> {
        self.read_json(CacheKey::Permissions).await
    }

    /// Returns whether the cached permission set contains a codename.
    ///
    /// Absent cache or missing codename both answer `false`. This check is
    /// not role-aware; the administrator short-circuit lives in the
    /// session service.
    pub async fn has_permission(&self, codename: &str) -> AppResult<bool> {
        Ok(self
            .permissions()
            .await?
            .map(|permissions| permissions.contains_codename(codename))
            .unwrap_or(false))
    }

    /// Returns the cached user's role, or `None` when no user is cached
    /// or the cached record cannot be read.
    pub async fn role(&self) -> Option<Role> {
        match self.user().await {
            Ok(user) => user.map(|user| user.role),
            Err(error) => {
                warn!(error = %error, "failed to read cached user for role lookup");
                None
            }
        }
    }

    /// Returns the cached user's id, or `None` when no user is cached or
    /// the cached record cannot be read.
    pub async fn user_id(&self) -> Option<i64> {
        match self.user().await {
            Ok(user) => user.map(|user| user.id),
            Err(error) => {
                warn!(error = %error, "failed to read cached user for id lookup");
                None
            }
        }
    }

    /// Persists the enrollment record.
    pub async fn set_enrollment(&self, enrollment: &EnrollmentRecord) -> AppResult<()> {
        self.write_json(CacheKey::Enrollment, enrollment).await
    }

    /// Returns the cached enrollment, if present and well-formed.
    pub async fn enrollment(&self) -> AppResult<Option<EnrollmentRecord>> {
        self.read_json(CacheKey::Enrollment).await
    }

    /// Removes the cached enrollment.
    pub async fn remove_enrollment(&self) -> AppResult<()> {
        self.vault.remove(CacheKey::Enrollment).await
    }

    /// Drops every key in the vault's storage area, session keys and
    /// foreign keys alike.
    pub async fn clear(&self) -> AppResult<()> {
        self.vault.clear().await
    }

    async fn write_raw(&self, key: CacheKey, plaintext: &str) -> AppResult<()> {
        let encoded = self.codec.encode(plaintext)?;
        self.vault.put(key, &encoded).await
    }

    async fn read_raw(&self, key: CacheKey) -> AppResult<Option<String>> {
        let Some(stored) = self.vault.get(key).await? else {
            return Ok(None);
        };

        match self.codec.decode(&stored) {
            Ok(plaintext) => Ok(Some(plaintext)),
            Err(error) => {
                warn!(
                    key = %key,
                    error = %error,
                    "cached value failed to decode; treating as absent"
                );
                Ok(None)
            }
        }
    }

    async fn write_json<T: Serialize>(&self, key: CacheKey, value: &T) -> AppResult<()> {
        let raw = serde_json::to_string(value).map_err(|error| {
            AppError::Codec(format!("failed to serialize cached '{key}': {error}"))
        })?;
        self.write_raw(key, &raw).await
    }

    async fn read_json<T: DeserializeOwned>(&self, key: CacheKey) -> AppResult<Option<T>> {
        let Some(raw) = self.read_raw(key).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(error) => {
                warn!(
                    key = %key,
                    error = %error,
                    "cached value failed to parse; treating as absent"
                );
                Ok(None)
            }
        }
    }
}
