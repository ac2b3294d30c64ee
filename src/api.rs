//! REST backend client.
//!
//! Every call carries `Authorization: Bearer <access token>`. A 401 or 403
//! triggers one token refresh through `POST /auth/refresh` followed by a
//! single retry. Refreshes are serialized so concurrent callers that hit an
//! expired token share one refresh.

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::sync::{Mutex, RwLock};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::onboarding::model::{JobSeekerProfile, UserProfile};
use crate::onboarding::source::ProfileSource;

const USER_PROFILE_PATH: &str = "/user/profile";
const JOB_SEEKER_PROFILE_PATH: &str = "/job-seeker/profile";
const REFRESH_PATH: &str = "/auth/refresh";

/// The backend's response envelope.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct RefreshData {
    #[serde(rename = "accessToken")]
    access_token: String,
}

#[derive(Default)]
struct Session {
    access_token: Option<SecretString>,
    refresh_token: Option<SecretString>,
}

/// Authorized client for the onboarding endpoints.
pub struct BackendClient {
    base_url: String,
    http: reqwest::Client,
    session: RwLock<Session>,
    refresh_lock: Mutex<()>,
}

impl BackendClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ApiError::Request {
                endpoint: config.api_base_url.clone(),
                reason: format!("Failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            http,
            session: RwLock::new(Session {
                access_token: config.access_token.clone(),
                refresh_token: config.refresh_token.clone(),
            }),
            refresh_lock: Mutex::new(()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Whether an access token is currently held.
    pub async fn is_signed_in(&self) -> bool {
        self.session.read().await.access_token.is_some()
    }

    async fn clear_session(&self) {
        *self.session.write().await = Session::default();
    }

    async fn access_token(&self) -> Option<SecretString> {
        self.session.read().await.access_token.clone()
    }

    async fn send_get(
        &self,
        path: &str,
        token: Option<&SecretString>,
    ) -> Result<reqwest::Response, ApiError> {
        let mut request = self.http.get(self.url(path));
        if let Some(token) = token {
            request = request.bearer_auth(token.expose_secret());
        }
        request.send().await.map_err(|e| ApiError::Request {
            endpoint: path.to_string(),
            reason: e.to_string(),
        })
    }

    /// GET with bearer auth, refreshing and retrying once on 401/403.
    async fn authorized_get(&self, path: &str) -> Result<reqwest::Response, ApiError> {
        let token = self.access_token().await;
        let response = self.send_get(path, token.as_ref()).await?;
        if !is_auth_rejection(response.status()) {
            return Ok(response);
        }

        tracing::debug!(path, status = %response.status(), "Access token rejected");
        self.refresh_access_token(token.as_ref()).await?;

        let token = self.access_token().await;
        self.send_get(path, token.as_ref()).await
    }

    /// Exchange the refresh token for a new access token.
    ///
    /// `rejected` is the token that just failed; if another caller already
    /// replaced it while we waited for the lock, nothing is refreshed.
    async fn refresh_access_token(&self, rejected: Option<&SecretString>) -> Result<(), ApiError> {
        let _guard = self.refresh_lock.lock().await;

        let refresh_token = {
            let session = self.session.read().await;
            let current = session.access_token.as_ref().map(|t| t.expose_secret());
            if current.is_some() && current != rejected.map(|t| t.expose_secret()) {
                return Ok(());
            }
            session.refresh_token.clone()
        };

        let Some(refresh_token) = refresh_token else {
            return Err(ApiError::Unauthorized {
                reason: "no refresh token".to_string(),
            });
        };

        let response = self
            .http
            .post(self.url(REFRESH_PATH))
            .json(&serde_json::json!({ "refresh_token": refresh_token.expose_secret() }))
            .send()
            .await
            .map_err(|e| ApiError::Request {
                endpoint: REFRESH_PATH.to_string(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "Token refresh rejected, clearing session");
            self.clear_session().await;
            return Err(ApiError::SessionExpired);
        }

        let body: ApiResponse<RefreshData> =
            response.json().await.map_err(|e| ApiError::InvalidResponse {
                endpoint: REFRESH_PATH.to_string(),
                reason: e.to_string(),
            })?;
        let access_token = body
            .data
            .map(|d| d.access_token)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::InvalidResponse {
                endpoint: REFRESH_PATH.to_string(),
                reason: "missing accessToken".to_string(),
            })?;

        self.session.write().await.access_token = Some(SecretString::from(access_token));
        tracing::info!("Access token refreshed");
        Ok(())
    }
}

fn is_auth_rejection(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}

#[async_trait]
impl ProfileSource for BackendClient {
    async fn fetch_user_profile(&self) -> Result<UserProfile, ApiError> {
        let response = self.authorized_get(USER_PROFILE_PATH).await?;
        let status = response.status();
        if is_auth_rejection(status) {
            return Err(ApiError::Unauthorized {
                reason: format!("{USER_PROFILE_PATH} returned {status}"),
            });
        }
        if !status.is_success() {
            return Err(ApiError::Status {
                endpoint: USER_PROFILE_PATH.to_string(),
                status: status.as_u16(),
            });
        }

        let body: ApiResponse<UserProfile> =
            response.json().await.map_err(|e| ApiError::InvalidResponse {
                endpoint: USER_PROFILE_PATH.to_string(),
                reason: e.to_string(),
            })?;

        match body {
            ApiResponse {
                success: true,
                data: Some(profile),
                ..
            } => Ok(profile),
            ApiResponse { message, .. } => Err(ApiError::InvalidResponse {
                endpoint: USER_PROFILE_PATH.to_string(),
                reason: message.unwrap_or_else(|| "Failed to fetch profile".to_string()),
            }),
        }
    }

    async fn fetch_job_seeker_profile(&self) -> Result<Option<JobSeekerProfile>, ApiError> {
        let response = self.authorized_get(JOB_SEEKER_PROFILE_PATH).await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if is_auth_rejection(status) {
            return Err(ApiError::Unauthorized {
                reason: format!("{JOB_SEEKER_PROFILE_PATH} returned {status}"),
            });
        }
        if !status.is_success() {
            return Err(ApiError::Status {
                endpoint: JOB_SEEKER_PROFILE_PATH.to_string(),
                status: status.as_u16(),
            });
        }

        let body: ApiResponse<JobSeekerProfile> =
            response.json().await.map_err(|e| ApiError::InvalidResponse {
                endpoint: JOB_SEEKER_PROFILE_PATH.to_string(),
                reason: e.to_string(),
            })?;
        Ok(if body.success { body.data } else { None })
    }

    async fn sign_out(&self) {
        self.clear_session().await;
    }
}
