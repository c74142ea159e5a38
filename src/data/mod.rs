//! Public data proxy subsystem.
//!
//! # Data Flow
//! ```text
//! GET /get-all?page&limit&category
//!     → upstream.rs (fetch full collection, bounded timeout)
//!     → pagination.rs (validate, filter, slice)
//!     → handlers.rs (render PageResponse)
//! ```
//!
//! An upstream failure short-circuits before any pagination runs.

pub mod handlers;
pub mod pagination;
pub mod upstream;

use axum::{routing::get, Router};

use crate::http::server::AppState;

pub use pagination::{paginate, Categorized, Page, PageError, PageRequest};
pub use upstream::{EntriesClient, UpstreamError};

/// Routes for the data proxy.
pub fn router() -> Router<AppState> {
    Router::new().route("/get-all", get(handlers::fetch_all_data))
}
