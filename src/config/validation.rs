//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, ports valid, bcrypt cost)
//! - Validate addresses and URLs before anything binds or connects
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::{AppConfig, MAX_COOKIE_EXPIRE_DAYS, PLACEHOLDER_JWT_SECRET};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    /// What is wrong with it.
    pub reason: String,
}

impl ValidationError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Validate a fully assembled configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }
    if !config.listener.api_prefix.starts_with('/') || config.listener.api_prefix.ends_with('/') {
        errors.push(ValidationError::new(
            "listener.api_prefix",
            "must start with '/' and must not end with '/'",
        ));
    }
    if config.listener.max_body_size == 0 {
        errors.push(ValidationError::new("listener.max_body_size", "must be > 0"));
    }

    if config.auth.jwt_secret.trim().is_empty() {
        errors.push(ValidationError::new("auth.jwt_secret", "must not be empty"));
    } else if config.auth.jwt_secret == PLACEHOLDER_JWT_SECRET {
        errors.push(ValidationError::new(
            "auth.jwt_secret",
            "placeholder secret is not accepted; set JWT_SECRET",
        ));
    }
    if config.auth.jwt_expiry_secs == 0 {
        errors.push(ValidationError::new("auth.jwt_expiry_secs", "must be > 0"));
    }
    if !(1..=MAX_COOKIE_EXPIRE_DAYS).contains(&config.auth.cookie_expire_days) {
        errors.push(ValidationError::new(
            "auth.cookie_expire_days",
            format!("must be within 1..={}", MAX_COOKIE_EXPIRE_DAYS),
        ));
    }
    if !(4..=31).contains(&config.auth.bcrypt_cost) {
        errors.push(ValidationError::new("auth.bcrypt_cost", "must be within 4..=31"));
    }

    if let Err(e) = url::Url::parse(&config.upstream.entries_url) {
        errors.push(ValidationError::new("upstream.entries_url", e.to_string()));
    }
    if config.upstream.timeout_secs == 0 {
        errors.push(ValidationError::new("upstream.timeout_secs", "must be > 0"));
    }

    if config.blockchain.enabled {
        if let Err(e) = url::Url::parse(&config.blockchain.rpc_url) {
            errors.push(ValidationError::new("blockchain.rpc_url", e.to_string()));
        }
    }
    if config.blockchain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("blockchain.rpc_timeout_secs", "must be > 0"));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be > 0"));
    }

    if config.cors.allowed_origins.is_empty() {
        errors.push(ValidationError::new("cors.allowed_origins", "must list at least one origin"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
