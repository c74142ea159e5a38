//! Assessment backend API library.

pub mod auth;
pub mod blockchain;
pub mod config;
pub mod data;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod openapi;

pub use config::schema::AppConfig;
pub use error::ApiError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
