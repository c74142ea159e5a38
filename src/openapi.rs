use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::auth::types::{
    AuthResponse, LoginRequest, LogoutResponse, RegisterRequest, UserProfile, UserResponse,
};
use crate::blockchain::handlers::BalanceResponse;
use crate::data::handlers::PageResponse;
use crate::error::ErrorBody;
use crate::http::health::HealthResponse;

/// Routes served outside the API prefix.
const ROOT_PATHS: &[&str] = &["/health"];

/// OpenAPI documentation for the assessment backend.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Assessment Backend API",
        description = "User authentication, a paginated proxy over a public API catalogue, and Ethereum balance lookup."
    ),
    tags(
        (name = "Health", description = "Liveness endpoint"),
        (name = "Authentication", description = "Register, login, logout and current user"),
        (name = "Data", description = "Paginated, category-filtered public API entries"),
        (name = "Web3", description = "Ethereum balance lookup")
    ),
    paths(
        crate::auth::handlers::register_user,
        crate::auth::handlers::login_user,
        crate::auth::handlers::logout,
        crate::auth::handlers::get_user_details,
        crate::data::handlers::fetch_all_data,
        crate::blockchain::handlers::fetch_eth_balance,
        crate::http::health::health
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            UserProfile,
            AuthResponse,
            UserResponse,
            LogoutResponse,
            PageResponse,
            BalanceResponse,
            HealthResponse,
            ErrorBody
        )
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Session cookie authentication.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "cookieAuth",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    "token",
                    "JWT issued by /register or /login",
                ))),
            );
        }
    }
}

/// The document with every API path mounted under `api_prefix`.
pub fn api_doc(api_prefix: &str) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    let paths = std::mem::take(&mut doc.paths.paths);
    doc.paths.paths = paths
        .into_iter()
        .map(|(path, item)| {
            if ROOT_PATHS.contains(&path.as_str()) {
                (path, item)
            } else {
                (format!("{}{}", api_prefix, path), item)
            }
        })
        .collect();
    doc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_are_prefixed() {
        let doc = api_doc("/api/v1");
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for expected in [
            "/api/v1/register",
            "/api/v1/login",
            "/api/v1/logout",
            "/api/v1/me",
            "/api/v1/get-all",
            "/api/v1/balance/{address}",
            "/health",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing {expected}"
            );
        }
    }

    #[test]
    fn test_cookie_scheme_registered() {
        let doc = ApiDoc::openapi();
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            json["components"]["securitySchemes"]["cookieAuth"]["in"],
            "cookie"
        );
        assert_eq!(json["info"]["title"], "Assessment Backend API");
    }

    #[test]
    fn test_version_follows_package() {
        let doc = ApiDoc::openapi();
        assert_eq!(doc.info.version, env!("CARGO_PKG_VERSION"));
    }
}
