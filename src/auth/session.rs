//! Session cookie handling and the session guard middleware.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::auth::service::AuthError;
use crate::auth::types::UserProfile;
use crate::config::AuthConfig;
use crate::error::ApiError;
use crate::http::server::AppState;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "token";

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// The authenticated user, attached to request extensions by [`require_session`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserProfile);

/// HttpOnly cookie carrying `token`.
pub fn session_cookie(token: String, config: &AuthConfig) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.secure_cookie)
        .max_age(time::Duration::seconds(
            config.cookie_expire_days.saturating_mul(SECONDS_PER_DAY),
        ))
        .build()
}

/// Cookie that makes the client drop its session.
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .build();
    cookie.make_removal();
    cookie
}

/// Reject requests without a valid session cookie.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value())
        .filter(|value| !value.is_empty())
        .ok_or(AuthError::MissingSession)?;

    let user = state.identity.current_user(token)?;
    tracing::debug!(user_id = %user.id, "Session authenticated");

    request
        .extensions_mut()
        .insert(CurrentUser(UserProfile::from(&user)));
    Ok(next.run(request).await)
}
