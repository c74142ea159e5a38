//! Identity subsystem.
//!
//! # Data Flow
//! ```text
//! POST /register → types.rs (validate) → password.rs (bcrypt) → store.rs
//!     → token.rs (JWT) → session.rs (HttpOnly cookie)
//! POST /login    → store.rs lookup → password.rs verify → token.rs → cookie
//! GET  /logout   → removal cookie
//! guarded routes → session.rs::require_session (cookie → JWT → store)
//! ```
//!
//! # Security Constraints
//! - The credential hash never leaves `store.rs`/`service.rs`
//! - Unknown email and wrong password are indistinguishable to the caller
//! - Tokens are only accepted from the HttpOnly `token` cookie

pub mod handlers;
pub mod password;
pub mod service;
pub mod session;
pub mod store;
pub mod token;
pub mod types;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::http::server::AppState;

pub use service::{AuthError, IdentityService, Session};
pub use session::{require_session, CurrentUser, SESSION_COOKIE};
pub use store::{InMemoryUserStore, User, UserStore};
pub use token::{Claims, TokenService};

/// Public identity routes plus the guarded `/me`.
pub fn router(state: &AppState) -> Router<AppState> {
    let guarded = Router::new()
        .route("/me", get(handlers::get_user_details))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    Router::new()
        .route("/register", post(handlers::register_user))
        .route("/login", post(handlers::login_user))
        .route("/logout", get(handlers::logout))
        .merge(guarded)
}
