// src/tests/common/mod.rs
pub use axum::Router;
pub use serde_json::json;
pub use tokio::task::JoinHandle;

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{http::StatusCode, routing::post, Json};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::Utc;

use crate::auth::{AuthManager, Credentials};

/// Minimal unsigned token for tests: `{"exp": exp, "sub": sub}`.
pub fn sample_jwt_for(exp: u64, sub: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{},"sub":"{}"}}"#, exp, sub));
    format!("{}.{}.c2ln", header, payload)
}

pub fn sample_jwt(exp: u64) -> String {
    sample_jwt_for(exp, "tester")
}

pub fn now_u64() -> u64 {
    Utc::now().timestamp() as u64
}

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

/// How the identity stub answers `/v1/authenticate`.
#[derive(Clone)]
pub enum IdentityReply {
    /// 200 with a token expiring `ttl` seconds from now
    Token { ttl_seconds: i64 },
    /// 200 with this exact token
    Fixed(String),
    Status(StatusCode, String),
}

/// Counters observed by the identity stub.
#[derive(Default)]
pub struct IdentityStats {
    pub calls: AtomicUsize,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl IdentityStats {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

pub struct IdentityStub {
    pub url: String,
    pub stats: Arc<IdentityStats>,
    handle: JoinHandle<()>,
}

impl Drop for IdentityStub {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Identity service double that counts calls and concurrent requests.
pub async fn spawn_identity(reply: IdentityReply, delay: Duration) -> IdentityStub {
    let stats = Arc::new(IdentityStats::default());
    let stats_clone = stats.clone();

    let router = Router::new().route("/v1/authenticate", post(move |Json(body): Json<serde_json::Value>| {
        let stats = stats_clone.clone();
        let reply = reply.clone();
        async move {
            let n = stats.calls.fetch_add(1, Ordering::SeqCst);
            let current = stats.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            stats.max_in_flight.fetch_max(current, Ordering::SeqCst);

            tokio::time::sleep(delay).await;
            stats.in_flight.fetch_sub(1, Ordering::SeqCst);

            match reply {
                IdentityReply::Token { ttl_seconds } => {
                    let sub = format!("{}-{}", body["userId"].as_str().unwrap_or_default(), n);
                    let exp = (now_u64() as i64 + ttl_seconds) as u64;
                    (StatusCode::OK, json!({ "token": sample_jwt_for(exp, &sub) }).to_string())
                }
                IdentityReply::Fixed(token) => (StatusCode::OK, json!({ "token": token }).to_string()),
                IdentityReply::Status(status, body) => (status, body),
            }
        }
    }));

    let (handle, addr) = spawn_axum(router).await;
    IdentityStub {
        url: format!("http://{}", addr),
        stats,
        handle,
    }
}

pub fn build_manager(identity_url: &str, enable_semaphore: bool) -> AuthManager {
    AuthManager::new(identity_url, Credentials::new("A", "U", "P"), false, enable_semaphore)
        .expect("auth manager")
}
