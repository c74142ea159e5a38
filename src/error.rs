//! Error boundary for the HTTP surface.
//!
//! Every subsystem defines its own `thiserror` enum; all of them convert into
//! [`ApiError`], which is the only error type handlers return. Rendering is
//! uniform: `{ "success": false, "message": "..." }` plus the mapped status.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Request,
    },
    http::{
        header::{CONTENT_LENGTH, CONTENT_TYPE},
        HeaderMap, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Error body rendered for every failed request.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Always `false`.
    pub success: bool,
    /// Human readable reason.
    pub message: String,
}

/// Errors surfaced to HTTP clients.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or out-of-range input (400).
    #[error("{0}")]
    InvalidArgument(String),

    /// Missing, invalid or expired session (401).
    #[error("{0}")]
    Unauthenticated(String),

    /// Login rejected. Same message for unknown email and wrong password (401).
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// No matching records (404).
    #[error("{0}")]
    NotFound(String),

    /// A dependent service (data API, RPC endpoint) failed (500).
    #[error("{0}")]
    UpstreamUnavailable(String),

    /// Anything else. The detail is logged, never rendered (500).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            Self::Unauthenticated(_) | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::UpstreamUnavailable(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the caller.
    pub fn user_message(&self) -> String {
        match self {
            Self::Internal(_) => "Internal Server Error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "Request failed");
        } else {
            tracing::warn!(status = %status, error = %self, "Request rejected");
        }

        let body = ErrorBody {
            success: false,
            message: self.user_message(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidArgument(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::InvalidArgument(rejection.body_text())
    }
}

/// Re-render non-JSON failures with the error body.
///
/// Covers responses produced by the layer stack before any handler runs,
/// such as request timeouts (408) and oversized bodies (413).
pub async fn json_error_envelope(request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) || is_json(response.headers()) {
        return response;
    }

    let message = match status {
        StatusCode::REQUEST_TIMEOUT => "Request timed out",
        StatusCode::PAYLOAD_TOO_LARGE => "Payload too large",
        other => other.canonical_reason().unwrap_or("Request failed"),
    };
    tracing::warn!(status = %status, "Request rejected by middleware");

    let (parts, _) = response.into_parts();
    let mut rendered = (
        status,
        Json(ErrorBody {
            success: false,
            message: message.to_string(),
        }),
    )
        .into_response();
    for (name, value) in parts.headers.iter() {
        if name != CONTENT_TYPE && name != CONTENT_LENGTH {
            rendered.headers_mut().append(name.clone(), value.clone());
        }
    }
    rendered
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"))
}

/// Fallback for unmatched routes.
pub async fn route_not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}
