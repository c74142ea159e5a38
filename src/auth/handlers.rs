use axum::{extract::State, http::StatusCode, Extension, Json};
use axum_extra::extract::cookie::CookieJar;

use crate::auth::session::{removal_cookie, session_cookie, CurrentUser};
use crate::auth::types::{
    AuthResponse, LoginRequest, LogoutResponse, RegisterRequest, UserProfile, UserResponse,
};
use crate::error::{ApiError, ErrorBody};
use crate::http::request::ApiJson;
use crate::http::server::AppState;

/// Register a new user and start a session.
#[utoipa::path(
    post,
    path = "/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered; token cookie set", body = AuthResponse),
        (status = 400, description = "Invalid or duplicate registration data", body = ErrorBody),
        (status = 500, description = "Failed to register user", body = ErrorBody)
    )
)]
pub async fn register_user(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>), ApiError> {
    let session = state.identity.register(body).await?;
    let jar = jar.add(session_cookie(session.token.clone(), &state.config.auth));

    Ok((
        StatusCode::CREATED,
        jar,
        Json(AuthResponse {
            success: true,
            user: UserProfile::from(&session.user),
            token: session.token,
        }),
    ))
}

/// Authenticate with email and password.
#[utoipa::path(
    post,
    path = "/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; token cookie set", body = AuthResponse),
        (status = 400, description = "Email or password missing", body = ErrorBody),
        (status = 401, description = "Invalid email or password", body = ErrorBody),
        (status = 500, description = "Failed to log in user", body = ErrorBody)
    )
)]
pub async fn login_user(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), ApiError> {
    let session = state.identity.login(&body.email, &body.password).await?;
    let jar = jar.add(session_cookie(session.token.clone(), &state.config.auth));

    Ok((
        jar,
        Json(AuthResponse {
            success: true,
            user: UserProfile::from(&session.user),
            token: session.token,
        }),
    ))
}

/// Clear the session cookie.
#[utoipa::path(
    get,
    path = "/logout",
    tag = "Authentication",
    responses(
        (status = 200, description = "Logged out; token cookie cleared", body = LogoutResponse)
    )
)]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<LogoutResponse>) {
    (
        jar.add(removal_cookie()),
        Json(LogoutResponse {
            success: true,
            message: "Logged Out".to_string(),
        }),
    )
}

/// Details of the logged-in user.
#[utoipa::path(
    get,
    path = "/me",
    tag = "Authentication",
    security(("cookieAuth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Not logged in", body = ErrorBody)
    )
)]
pub async fn get_user_details(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<UserResponse> {
    Json(UserResponse {
        success: true,
        user,
    })
}
