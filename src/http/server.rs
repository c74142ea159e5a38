//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Construct shared services once (identity, entries client, blockchain client)
//! - Create Axum Router with all handlers under the API prefix
//! - Wire up middleware (request ID, tracing, timeout, body limit, CORS, metrics)
//! - Render middleware rejections with the JSON error body
//! - Serve on a listener until the shutdown signal fires

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::Request,
    http::HeaderValue,
    middleware,
    routing::get,
    Json, Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::auth::{self, AuthError, IdentityService};
use crate::blockchain::{self, BlockchainClient, BlockchainError};
use crate::config::{AppConfig, CorsConfig};
use crate::data::{self, EntriesClient, UpstreamError};
use crate::error::{json_error_envelope, route_not_found};
use crate::http::health::health;
use crate::http::request::request_id;
use crate::observability::metrics::track_metrics;
use crate::openapi::api_doc;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub identity: Arc<IdentityService>,
    pub entries: Arc<EntriesClient>,
    /// `None` when blockchain integration is disabled.
    pub blockchain: Option<Arc<BlockchainClient>>,
}

impl AppState {
    /// Build every shared service from configuration.
    pub async fn from_config(config: AppConfig) -> Result<Self, StartupError> {
        let identity = IdentityService::from_config(&config.auth)?;
        let entries = EntriesClient::new(&config.upstream)?;

        let blockchain = if config.blockchain.enabled {
            Some(Arc::new(BlockchainClient::new(config.blockchain.clone()).await?))
        } else {
            tracing::info!("Blockchain integration disabled");
            None
        };

        Ok(Self {
            config: Arc::new(config),
            identity: Arc::new(identity),
            entries: Arc::new(entries),
            blockchain,
        })
    }
}

/// A service failed to initialize; the server must not start.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("identity service: {0}")]
    Identity(#[from] AuthError),

    #[error("entries client: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("blockchain client: {0}")]
    Blockchain(#[from] BlockchainError),
}

/// HTTP server for the API.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub async fn new(config: AppConfig) -> Result<Self, StartupError> {
        let state = AppState::from_config(config).await?;
        let router = build_router(state.clone());
        Ok(Self { router, state })
    }

    /// The fully layered router, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// In-flight requests are drained once `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            api_prefix = %self.state.config.listener.api_prefix,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.state.config
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
fn build_router(state: AppState) -> Router {
    let config = state.config.clone();

    let api = Router::new()
        .merge(auth::router(&state))
        .merge(data::router())
        .merge(blockchain::router(&state));

    let doc = Arc::new(api_doc(&config.listener.api_prefix));

    Router::new()
        .nest(&config.listener.api_prefix, api)
        .route("/health", get(health))
        .route(
            "/api-docs/openapi.json",
            get(move || {
                let doc = doc.clone();
                async move { Json(doc.as_ref().clone()) }
            }),
        )
        .fallback(route_not_found)
        .with_state(state)
        .layer(middleware::from_fn(track_metrics))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request_id(request.headers()).unwrap_or("-"),
                    )
                }))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(RequestBodyLimitLayer::new(config.listener.max_body_size))
                .layer(cors_layer(&config.cors))
                .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
        )
        .layer(middleware::from_fn(json_error_envelope))
}

/// `*` mirrors the caller's origin so credentialed requests still work.
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origin = if config.allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::mirror_request()
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| match o.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %o, "Ignoring unparseable CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, StatusCode};
    use tower::ServiceExt;

    fn get_request(uri: &str) -> axum::http::Request<Body> {
        axum::http::Request::get(uri).body(Body::empty()).unwrap()
    }

    fn test_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = "server-test-secret".into();
        config.auth.bcrypt_cost = 4;
        config
    }

    async fn test_server() -> HttpServer {
        HttpServer::new(test_config()).await.unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let server = test_server().await;
        let response = server
            .router()
            .oneshot(get_request("/nope"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_guarded_route_without_cookie() {
        let server = test_server().await;
        let response = server
            .router()
            .oneshot(get_request("/api/v1/me"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_duplicate_query_field_is_json() {
        let server = test_server().await;
        let response = server
            .router()
            .oneshot(get_request("/api/v1/get-all?page=1&page=2"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");

        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert!(json["message"]
            .as_str()
            .unwrap()
            .contains("duplicate field `page`"));
    }

    #[tokio::test]
    async fn test_oversized_body_is_json() {
        let mut config = test_config();
        config.listener.max_body_size = 16;
        let server = HttpServer::new(config).await.unwrap();

        let body = r#"{"email":"someone@example.com","password":"password123"}"#;
        let response = server
            .router()
            .oneshot(
                axum::http::Request::post("/api/v1/register")
                    .header(header::CONTENT_TYPE, "application/json")
                    .header(header::CONTENT_LENGTH, body.len())
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(response.headers().contains_key("x-request-id"));

        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Payload too large");
    }

    #[tokio::test]
    async fn test_cors_mirrors_origin_with_credentials() {
        let server = test_server().await;
        let response = server
            .router()
            .oneshot(
                axum::http::Request::get("/health")
                    .header(header::ORIGIN, "http://localhost:3000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:3000"
        );
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS],
            "true"
        );
    }

    #[tokio::test]
    async fn test_supplied_request_id_is_kept() {
        let server = test_server().await;
        let response = server
            .router()
            .oneshot(
                axum::http::Request::get("/health")
                    .header("x-request-id", "req-42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers()["x-request-id"], "req-42");
    }
}
