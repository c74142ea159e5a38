//! Configuration loading from disk and environment.

use std::env;
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Env file read outside production.
pub const ENV_FILE: &str = "config/config.env";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid environment variable {name}: {reason}")]
    Env { name: &'static str, reason: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration: TOML file (or defaults), then environment overrides,
/// then validation.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    if env::var("APP_ENV").map(|v| v != "production").unwrap_or(true) {
        // Missing env file is fine; the process env still applies.
        let _ = dotenvy::from_filename(ENV_FILE);
    }

    let mut config = match path {
        Some(path) => parse_config(&fs::read_to_string(path)?)?,
        None => AppConfig::default(),
    };

    apply_env_overrides(&mut config, |name| env::var(name).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Deserialize a TOML document.
pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Apply the recognised environment variables on top of `config`.
///
/// `lookup` abstracts the process environment so overrides can be tested
/// without mutating global state.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = lookup("PORT") {
        let port: u16 = port.trim().parse().map_err(|_| ConfigError::Env {
            name: "PORT",
            reason: format!("'{}' is not a port number", port),
        })?;
        let host = config
            .listener
            .bind_address
            .rsplit_once(':')
            .map(|(host, _)| host.to_string())
            .unwrap_or_else(|| "0.0.0.0".to_string());
        config.listener.bind_address = format!("{}:{}", host, port);
    }

    if let Some(secret) = lookup("JWT_SECRET") {
        config.auth.jwt_secret = secret;
    }

    if let Some(expire) = lookup("JWT_EXPIRE") {
        config.auth.jwt_expiry_secs =
            parse_duration_secs(&expire).ok_or_else(|| ConfigError::Env {
                name: "JWT_EXPIRE",
                reason: format!("'{}' is not a duration like 5d, 12h, 30m or 45s", expire),
            })?;
    }

    if let Some(days) = lookup("COOKIE_EXPIRE") {
        config.auth.cookie_expire_days = days.trim().parse().map_err(|_| ConfigError::Env {
            name: "COOKIE_EXPIRE",
            reason: format!("'{}' is not a number of days", days),
        })?;
    }

    if let Some(rpc_url) = lookup("INFURA_URL") {
        config.blockchain.rpc_url = rpc_url;
        config.blockchain.enabled = true;
    }

    if let Some(entries_url) = lookup("ENTRIES_URL") {
        config.upstream.entries_url = entries_url;
    }

    Ok(())
}

/// Parse `5d`, `12h`, `30m`, `45s` or a bare number of seconds.
pub fn parse_duration_secs(input: &str) -> Option<u64> {
    let input = input.trim();
    let (digits, multiplier) = match input.chars().last()? {
        'd' => (&input[..input.len() - 1], 24 * 3600),
        'h' => (&input[..input.len() - 1], 3600),
        'm' => (&input[..input.len() - 1], 60),
        's' => (&input[..input.len() - 1], 1),
        c if c.is_ascii_digit() => (input, 1),
        _ => return None,
    };
    let value: u64 = digits.trim().parse().ok()?;
    value.checked_mul(multiplier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration_secs("5d"), Some(432_000));
        assert_eq!(parse_duration_secs("12h"), Some(43_200));
        assert_eq!(parse_duration_secs("30m"), Some(1_800));
        assert_eq!(parse_duration_secs("45s"), Some(45));
        assert_eq!(parse_duration_secs("90"), Some(90));
        assert_eq!(parse_duration_secs("5w"), None);
        assert_eq!(parse_duration_secs(""), None);
        assert_eq!(parse_duration_secs("d"), None);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        let env = env_of(&[
            ("PORT", "5000"),
            ("JWT_SECRET", "from-env"),
            ("JWT_EXPIRE", "2d"),
            ("COOKIE_EXPIRE", "2"),
            ("INFURA_URL", "https://mainnet.infura.io/v3/key"),
        ]);

        apply_env_overrides(&mut config, env).unwrap();

        assert_eq!(config.listener.bind_address, "0.0.0.0:5000");
        assert_eq!(config.auth.jwt_secret, "from-env");
        assert_eq!(config.auth.jwt_expiry_secs, 172_800);
        assert_eq!(config.auth.cookie_expire_days, 2);
        assert!(config.blockchain.enabled);
        assert_eq!(config.blockchain.rpc_url, "https://mainnet.infura.io/v3/key");
    }

    #[test]
    fn test_bad_port_is_reported() {
        let mut config = AppConfig::default();
        let err = apply_env_overrides(&mut config, env_of(&[("PORT", "http")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_parse_config_error() {
        assert!(matches!(
            parse_config("listener = 3"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_shipped_config_needs_secret() {
        let mut config = parse_config(include_str!("../../config/default.toml")).unwrap();
        assert_eq!(config.listener.api_prefix, "/api/v1");

        // The secret only ever comes from the environment.
        assert!(validate_config(&config).is_err());
        apply_env_overrides(&mut config, env_of(&[("JWT_SECRET", "from-env")])).unwrap();
        assert!(validate_config(&config).is_ok());
    }
}
