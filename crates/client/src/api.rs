//! REST API access.
//!
//! [`ApiClient`] is the seam the list stores fetch through; [`HttpApiClient`]
//! is the reqwest implementation that signs requests with the session token
//! and tears the session down on 401.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use hemmy_auth::{Identity, SessionStore};

use crate::config::ClientConfig;
use crate::decode::unwrap_data;

pub const PROFILE_PATH: &str = "/auth/profile";
pub const LOGIN_PATH: &str = "/auth/login";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("session expired or invalid")]
    Unauthorized,

    #[error("API error ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Message suitable for a toast.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => "Could not reach the server".to_string(),
            ApiError::Unauthorized => "Your session has expired, please sign in again".to_string(),
            ApiError::Status { status, .. } => format!("The server answered with an error ({status})"),
            ApiError::Decode(_) => "The server sent an unexpected response".to_string(),
        }
    }
}

/// Minimal JSON transport over the backend.
#[async_trait]
pub trait ApiClient: Send + Sync {
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, ApiError>;

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, ApiError>;
}

#[async_trait]
impl<A> ApiClient for Arc<A>
where
    A: ApiClient + ?Sized,
{
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, ApiError> {
        (**self).get_json(path, query).await
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        (**self).post_json(path, body).await
    }
}

/// reqwest-backed client bound to one session.
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionStore>,
}

impl HttpApiClient {
    pub fn new(config: &ClientConfig, session: Arc<SessionStore>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.api_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<Value, ApiError> {
        let req = match self.session.token() {
            Some(token) => req.bearer_auth(token),
            None => req,
        };

        let resp = req.send().await.map_err(|e| ApiError::Network(e.to_string()))?;
        let status = resp.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            self.session.handle_unauthorized();
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: resp.text().await.unwrap_or_default(),
            });
        }

        resp.json::<Value>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ApiClient for HttpApiClient {
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, ApiError> {
        let req = self.http.get(self.url(path)).query(query);
        self.send(req).await
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        let req = self.http.post(self.url(path)).json(body);
        self.send(req).await
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    #[serde(alias = "accessToken")]
    token: String,
    #[serde(alias = "profile")]
    user: Identity,
}

/// Sign in and start the session. Returns the `Set-Cookie` value for the
/// auth cookie.
pub async fn login(
    api: &dyn ApiClient,
    session: &SessionStore,
    username: &str,
    password: &str,
) -> Result<String, ApiError> {
    let body = serde_json::json!({ "username": username, "password": password });
    let raw = unwrap_data(api.post_json(LOGIN_PATH, &body).await?);
    let resp: LoginResponse =
        serde_json::from_value(raw).map_err(|e| ApiError::Decode(e.to_string()))?;

    session
        .login(resp.token, resp.user, chrono::Utc::now())
        .map_err(|e| ApiError::Decode(e.to_string()))
}

/// "whoami": reload the profile and replace the session identity.
pub async fn fetch_profile(
    api: &dyn ApiClient,
    session: &SessionStore,
) -> Result<Identity, ApiError> {
    let raw = unwrap_data(api.get_json(PROFILE_PATH, &[]).await?);
    let identity: Identity =
        serde_json::from_value(raw).map_err(|e| ApiError::Decode(e.to_string()))?;
    session.refresh_profile(identity.clone());
    Ok(identity)
}
