//! reqwest adapter for the backend authentication and academy endpoints.

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use campora_application::{AuthGateway, LoginGrant};
use campora_core::{AccessToken, AppError, AppResult, RefreshToken};
use campora_domain::{EnrollmentRecord, ProfileRecord, Role, SessionTokens, UserRecord};
use serde::Deserialize;
use url::Url;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const REJECTION_DETAIL_LIMIT: usize = 256;

/// Environment-driven settings for the HTTP gateway.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL of the backend API, e.g. `https://api.example.edu/v1/`.
    pub base_url: Url,
    /// Timeout applied to every request.
    pub timeout: Duration,
}

impl GatewayConfig {
    /// Loads the gateway configuration from the environment.
    ///
    /// `CAMPORA_API_BASE_URL` is required. `CAMPORA_HTTP_TIMEOUT_SECS`
    /// defaults to 30 seconds.
    pub fn from_env() -> AppResult<Self> {
        let raw_base_url = required_env("CAMPORA_API_BASE_URL")?;
        let base_url = Url::parse(&raw_base_url).map_err(|error| {
            AppError::Validation(format!(
                "invalid CAMPORA_API_BASE_URL '{raw_base_url}': {error}"
            ))
        })?;

        let timeout_secs = env::var("CAMPORA_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn required_env(name: &str) -> AppResult<String> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

/// HTTP implementation of the backend authentication gateway.
pub struct HttpAuthGateway {
    http_client: reqwest::Client,
    base_url: Url,
}

impl HttpAuthGateway {
    /// Creates a gateway from an existing client and base URL.
    #[must_use]
    pub fn new(http_client: reqwest::Client, base_url: Url) -> Self {
        Self {
            http_client,
            base_url,
        }
    }

    /// Creates a gateway with a client built from the configuration.
    pub fn from_config(config: &GatewayConfig) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|error| {
                AppError::Internal(format!("failed to build HTTP client: {error}"))
            })?;

        Ok(Self::new(http_client, config.base_url.clone()))
    }

    fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| AppError::Validation("base URL cannot be a base".to_owned()))?;
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
            // Backend routes all end with a trailing slash.
            path.push("");
        }

        Ok(url)
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> AppResult<reqwest::Response> {
        let response = builder
            .header("X-Request-Id", uuid::Uuid::new_v4().to_string())
            .send()
            .await
            .map_err(|error| AppError::Transport(format!("request failed: {error}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<response body unavailable>".to_owned());
        Err(AppError::Rejected {
            status: status.as_u16(),
            detail: body.chars().take(REJECTION_DETAIL_LIMIT).collect(),
        })
    }
}

fn enrollment_path_segment(role: Role) -> AppResult<&'static str> {
    match role {
        Role::Student => Ok("students"),
        Role::Teacher => Ok("other-profile"),
        other => Err(AppError::Validation(format!(
            "role '{}' has no enrollment endpoint",
            other.as_str()
        ))),
    }
}

#[derive(Deserialize)]
struct LoginResponseDto {
    access: AccessToken,
    refresh: RefreshToken,
    user: UserRecord,
    #[serde(default)]
    profile: Option<ProfileRecord>,
}

impl From<LoginResponseDto> for LoginGrant {
    fn from(dto: LoginResponseDto) -> Self {
        Self {
            tokens: SessionTokens::new(dto.access, dto.refresh),
            user: dto.user,
            profile: dto.profile,
        }
    }
}

#[derive(Deserialize)]
struct TokenPairDto {
    access: AccessToken,
    refresh: RefreshToken,
}

#[async_trait]
impl AuthGateway for HttpAuthGateway {
    async fn login(&self, username: &str, password: &str) -> AppResult<LoginGrant> {
        let url = self.endpoint(&["login"])?;
        let response = self
            .send(self.http_client.post(url).json(&serde_json::json!({
                "username": username,
                "password": password,
            })))
            .await?;

        let dto: LoginResponseDto = response.json().await.map_err(|error| {
            AppError::Internal(format!("failed to parse login response: {error}"))
        })?;

        Ok(dto.into())
    }

    async fn verify_token(&self, token: &AccessToken) -> AppResult<()> {
        let url = self.endpoint(&["token", "verify"])?;
        self.send(self.http_client.post(url).json(&serde_json::json!({
            "token": token.as_str(),
        })))
        .await?;

        Ok(())
    }

    async fn refresh_tokens(&self, refresh: &RefreshToken) -> AppResult<SessionTokens> {
        let url = self.endpoint(&["token", "refresh"])?;
        let response = self
            .send(self.http_client.post(url).json(&serde_json::json!({
                "refresh": refresh.as_str(),
            })))
            .await?;

        let dto: TokenPairDto = response.json().await.map_err(|error| {
            AppError::Internal(format!("failed to parse token refresh response: {error}"))
        })?;

        Ok(SessionTokens::new(dto.access, dto.refresh))
    }

    async fn fetch_enrollment(
        &self,
        role: Role,
        profile_id: i64,
        token: &AccessToken,
    ) -> AppResult<Option<EnrollmentRecord>> {
        let segment = enrollment_path_segment(role)?;
        let url = self.endpoint(&["academy", segment, &profile_id.to_string(), "enrollment"])?;

        let response = match self
            .send(self.http_client.get(url).bearer_auth(token.as_str()))
            .await
        {
            Ok(response) => response,
            Err(AppError::Rejected { status: 404, .. }) => return Ok(None),
            Err(error) => return Err(error),
        };

        let record: EnrollmentRecord = response.json().await.map_err(|error| {
            AppError::Internal(format!("failed to parse enrollment response: {error}"))
        })?;

        Ok(Some(record))
    }
}
