//! Typed client for the Assessment Backend API.
//!
//! The client keeps the session token it receives from the `token` cookie on
//! register/login and replays it on guarded calls.

use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    /// The API answered with `{ success: false, message }`.
    #[error("API returned {status}: {message}")]
    Api { status: StatusCode, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl SdkError {
    /// HTTP status for API errors.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            SdkError::Api { status, .. } => Some(*status),
            SdkError::Http(e) => e.status(),
        }
    }

    pub fn message(&self) -> String {
        match self {
            SdkError::Api { message, .. } => message.clone(),
            SdkError::Http(e) => e.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub number: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub number: u64,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    pub user: UserProfile,
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserResponse {
    pub success: bool,
    pub user: UserProfile,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogoutResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse {
    pub success: bool,
    pub count: usize,
    pub total: usize,
    pub page: usize,
    pub total_pages: usize,
    pub data: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BalanceResponse {
    pub success: bool,
    pub balance: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub blockchain: String,
}

/// Query for `/get-all`. Values are sent verbatim so callers can exercise
/// the server's own coercion rules.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PageQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

pub struct ApiClient {
    client: Client,
    base_url: String,
    api_prefix: String,
    token: Option<String>,
}

impl ApiClient {
    /// Client for a server at `base_url` using the default `/api/v1` prefix.
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_prefix: "/api/v1".to_string(),
            token: None,
        }
    }

    pub fn with_prefix(mut self, api_prefix: &str) -> Self {
        self.api_prefix = api_prefix.to_string();
        self
    }

    /// Use an existing session token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Current session token, if any.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn api(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, self.api_prefix, path)
    }

    fn with_session(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.header(COOKIE, format!("token={}", token)),
            None => request,
        }
    }

    /// Create an account; on success the session token is kept.
    pub async fn register(&mut self, request: &RegisterRequest) -> Result<AuthResponse, SdkError> {
        let resp = self.client.post(self.api("/register")).json(request).send().await?;
        self.capture_session(&resp);
        decode(resp).await
    }

    /// Log in; on success the session token is kept.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<AuthResponse, SdkError> {
        let resp = self
            .client
            .post(self.api("/login"))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;
        self.capture_session(&resp);
        decode(resp).await
    }

    /// End the session; the kept token is dropped when the server clears the cookie.
    pub async fn logout(&mut self) -> Result<LogoutResponse, SdkError> {
        let resp = self
            .with_session(self.client.get(self.api("/logout")))
            .send()
            .await?;
        self.capture_session(&resp);
        decode(resp).await
    }

    pub async fn me(&self) -> Result<UserResponse, SdkError> {
        let resp = self.with_session(self.client.get(self.api("/me"))).send().await?;
        decode(resp).await
    }

    pub async fn get_all(&self, query: &PageQuery) -> Result<PageResponse, SdkError> {
        let resp = self
            .client
            .get(self.api("/get-all"))
            .query(query)
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn balance(&self, address: &str) -> Result<BalanceResponse, SdkError> {
        let resp = self
            .with_session(self.client.get(self.api(&format!("/balance/{}", address))))
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn health(&self) -> Result<HealthResponse, SdkError> {
        let resp = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        decode(resp).await
    }

    fn capture_session(&mut self, resp: &Response) {
        for value in resp.headers().get_all(SET_COOKIE) {
            let Ok(value) = value.to_str() else { continue };
            let Some(pair) = value.split(';').next() else { continue };
            if let Some(token) = pair.trim().strip_prefix("token=") {
                self.token = if token.is_empty() {
                    None
                } else {
                    Some(token.to_string())
                };
            }
        }
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, SdkError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json().await?);
    }

    let message = match resp.json::<Value>().await {
        Ok(body) => body["message"].as_str().unwrap_or_default().to_string(),
        Err(_) => String::new(),
    };
    Err(SdkError::Api { status, message })
}
