//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, JSON and query extraction)
//!     → [auth | data | blockchain] routers under the API prefix
//!     → error.rs (failures rendered as { success: false, message })
//!     → Send to client
//! ```

pub mod health;
pub mod request;
pub mod server;

pub use request::{request_id, ApiJson, ApiQuery, X_REQUEST_ID};
pub use server::{AppState, HttpServer, StartupError};
