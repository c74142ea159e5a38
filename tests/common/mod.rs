//! Shared utilities for integration testing.
//!
//! Every mock binds `127.0.0.1:0`, so tests never contend for ports.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use assessment_api::config::AppConfig;
use assessment_api::http::HttpServer;
use assessment_api::lifecycle::Shutdown;
use axum::{http::StatusCode, routing::get, routing::post, Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// 1.5 ether in wei, hex encoded as the node returns it.
pub const MOCK_BALANCE_WEI: &str = "0x14d1120d7b160000";
pub const MOCK_ADDRESS: &str = "0x742d35Cc6634C0532925a3b844Bc454e4438f44e";

async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

/// `count` entries cycling through the Animals, Books and Weather categories.
pub fn sample_entries(count: usize) -> Vec<Value> {
    const CATEGORIES: [&str; 3] = ["Animals", "Books", "Weather"];
    (0..count)
        .map(|i| {
            json!({
                "API": format!("api-{i}"),
                "Description": format!("Entry number {i}"),
                "Auth": "",
                "HTTPS": true,
                "Cors": "unknown",
                "Link": format!("https://example.com/{i}"),
                "Category": CATEGORIES[i % CATEGORIES.len()],
            })
        })
        .collect()
}

/// Mock public API serving `entries` at `/entries`. Returns the entries URL.
pub async fn start_entries_backend(entries: Vec<Value>) -> String {
    let body = json!({ "count": entries.len(), "entries": entries });
    let router = Router::new().route(
        "/entries",
        get(move || {
            let body = body.clone();
            async move { Json(body) }
        }),
    );
    format!("http://{}/entries", serve(router).await)
}

/// Mock public API that always fails with `status`.
pub async fn start_failing_backend(status: StatusCode) -> String {
    let router = Router::new().route("/entries", get(move || async move { status }));
    format!("http://{}/entries", serve(router).await)
}

/// Mock public API answering 200 with a body that is not JSON.
pub async fn start_non_json_backend() -> String {
    let router = Router::new().route(
        "/entries",
        get(|| async { "<html>maintenance</html>" }),
    );
    format!("http://{}/entries", serve(router).await)
}

/// Mock public API answering 200 with a JSON object that lacks `entries`.
pub async fn start_entryless_backend() -> String {
    let router = Router::new().route(
        "/entries",
        get(|| async { Json(json!({ "count": 0 })) }),
    );
    format!("http://{}/entries", serve(router).await)
}

/// Mock public API that answers only after `delay`.
pub async fn start_slow_backend(delay: Duration) -> String {
    let router = Router::new().route(
        "/entries",
        get(move || async move {
            tokio::time::sleep(delay).await;
            Json(json!({ "count": 0, "entries": [] }))
        }),
    );
    format!("http://{}/entries", serve(router).await)
}

/// Mock JSON-RPC node answering chain id 1 and a fixed balance for any address.
pub async fn start_rpc_backend() -> String {
    let router = Router::new().route(
        "/",
        post(|Json(request): Json<Value>| async move {
            let id = request["id"].clone();
            let result = match request["method"].as_str() {
                Some("eth_chainId") => json!("0x1"),
                Some("eth_blockNumber") => json!("0x10"),
                Some("eth_getBalance") => json!(MOCK_BALANCE_WEI),
                _ => {
                    return Json(json!({
                        "jsonrpc": "2.0",
                        "id": id,
                        "error": { "code": -32601, "message": "method not found" }
                    }))
                }
            };
            Json(json!({ "jsonrpc": "2.0", "id": id, "result": result }))
        }),
    );
    format!("http://{}/", serve(router).await)
}

/// Defaults tuned for tests: cheap hashing, fixed secret, given upstreams.
pub fn test_config(entries_url: &str, rpc_url: Option<&str>) -> AppConfig {
    let mut config = AppConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.auth.jwt_secret = "integration-test-secret".to_string();
    config.auth.bcrypt_cost = 4;
    config.upstream.entries_url = entries_url.to_string();
    config.upstream.timeout_secs = 5;
    if let Some(rpc_url) = rpc_url {
        config.blockchain.enabled = true;
        config.blockchain.rpc_url = rpc_url.to_string();
        config.blockchain.chain_id = Some(1);
        config.blockchain.rpc_timeout_secs = 5;
    }
    config
}

/// A running server; dropping it stops the server.
pub struct TestApp {
    pub addr: SocketAddr,
    pub base_url: String,
    shutdown: Shutdown,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub async fn start_app(config: AppConfig) -> TestApp {
    let server = HttpServer::new(config).await.expect("server should start");
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestApp {
        addr,
        base_url: format!("http://{}", addr),
        shutdown,
    }
}
