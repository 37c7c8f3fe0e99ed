//! Mock lookup providers for integration tests
//!
//! Every route answers one canned scenario and counts its hits so tests can
//! assert how many attempts the retrier made.

#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

use tubemark::RetryPolicy;
use tubemark::fetch::HttpFetcher;
use tubemark::health::{HealthProber, ProbeSettings};
use tubemark::resolver::{MetadataResolver, ResolverSettings};

#[derive(Clone, Default)]
pub struct MockProvider {
    hits: Arc<Mutex<HashMap<&'static str, usize>>>,
}

impl MockProvider {
    fn hit(&self, route: &'static str) {
        let mut hits = self.hits.lock().unwrap();
        *hits.entry(route).or_default() += 1;
    }

    pub fn hits(&self, route: &'static str) -> usize {
        self.hits.lock().unwrap().get(route).copied().unwrap_or(0)
    }
}

/// Mock server handle; `url("/route")` gives an endpoint on it
pub struct MockServer {
    pub base: String,
    pub provider: MockProvider,
}

impl MockServer {
    pub async fn start() -> Self {
        let provider = MockProvider::default();
        let app = Router::new()
            .route("/playlist/ok", get(playlist_ok))
            .route("/playlist/bare", get(playlist_bare))
            .route("/playlist/empty", get(playlist_empty))
            .route("/oembed/ok", get(oembed_ok))
            .route("/oembed/untitled", get(oembed_untitled))
            .route("/echo", get(echo))
            .route("/fail", get(fail))
            .route("/not-found", get(not_found))
            .route("/error-field", get(error_field))
            .route("/error-empty", get(error_empty))
            .route("/accept", get(accept))
            .route("/garbage", get(garbage))
            .route("/slow", get(slow))
            .route("/flaky", get(flaky))
            .with_state(provider.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base: format!("http://{addr}"),
            provider,
        }
    }

    pub fn url(&self, route: &str) -> String {
        format!("{}{}", self.base, route)
    }

    pub fn hits(&self, route: &'static str) -> usize {
        self.provider.hits(route)
    }
}

/// An address nothing listens on
pub async fn closed_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/gone")
}

/// Loopback traffic must never be routed through an ambient proxy
pub fn test_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

pub fn fast_retry(max_retries: u32) -> RetryPolicy {
    RetryPolicy::builder()
        .max_retries(max_retries)
        .base_delay(Duration::from_millis(5))
        .max_delay(Duration::from_millis(20))
        .build()
}

pub fn resolver(playlist_endpoint: String, oembed_endpoint: String) -> MetadataResolver {
    resolver_with(
        ResolverSettings::builder()
            .playlist_endpoint(playlist_endpoint)
            .oembed_endpoint(oembed_endpoint)
            .request_timeout(Duration::from_secs(2))
            .retry(fast_retry(3))
            .build(),
    )
}

pub fn resolver_with(settings: ResolverSettings) -> MetadataResolver {
    MetadataResolver::with_fetcher(HttpFetcher::with_client(test_client()), settings)
}

pub fn prober(playlist_endpoint: String, oembed_endpoint: String, timeout: Duration) -> HealthProber {
    let settings = ProbeSettings::builder()
        .playlist_endpoint(playlist_endpoint)
        .oembed_endpoint(oembed_endpoint)
        .timeout(timeout)
        .build();
    HealthProber::with_fetcher(HttpFetcher::with_client(test_client()), settings)
}

async fn playlist_ok(State(mock): State<MockProvider>) -> impl IntoResponse {
    mock.hit("/playlist/ok");
    Json(json!({
        "playlist_info": {
            "title": "Test Playlist",
            "items": [
                {"thumbnail": "https://x/thumb1.jpg"},
                {"thumbnail": "https://x/thumb2.jpg"}
            ]
        }
    }))
}

async fn playlist_bare(State(mock): State<MockProvider>) -> impl IntoResponse {
    mock.hit("/playlist/bare");
    Json(json!({"playlist_info": {"items": [{}]}}))
}

async fn playlist_empty(State(mock): State<MockProvider>) -> impl IntoResponse {
    mock.hit("/playlist/empty");
    Json(json!({"playlist_info": {"title": "Nothing here", "items": []}}))
}

async fn oembed_ok(State(mock): State<MockProvider>) -> impl IntoResponse {
    mock.hit("/oembed/ok");
    Json(json!({
        "title": "Test Video",
        "thumbnail_url": "https://x/provider.jpg",
        "provider_name": "YouTube"
    }))
}

async fn oembed_untitled(State(mock): State<MockProvider>) -> impl IntoResponse {
    mock.hit("/oembed/untitled");
    Json(json!({"title": ""}))
}

/// Echo the `url` query parameter back as the title
async fn echo(
    State(mock): State<MockProvider>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    mock.hit("/echo");
    Json(json!({"title": params.get("url").cloned().unwrap_or_default()}))
}

async fn fail(State(mock): State<MockProvider>) -> impl IntoResponse {
    mock.hit("/fail");
    (StatusCode::INTERNAL_SERVER_ERROR, "boom")
}

async fn not_found(State(mock): State<MockProvider>) -> impl IntoResponse {
    mock.hit("/not-found");
    (StatusCode::NOT_FOUND, "no such video")
}

async fn error_field(State(mock): State<MockProvider>) -> impl IntoResponse {
    mock.hit("/error-field");
    Json(json!({"error": "no matches for url"}))
}

async fn error_empty(State(mock): State<MockProvider>) -> impl IntoResponse {
    mock.hit("/error-empty");
    Json(json!({"error": "", "title": "Quiet Provider"}))
}

/// Echo the request's Accept header back as the title
async fn accept(State(mock): State<MockProvider>, headers: HeaderMap) -> impl IntoResponse {
    mock.hit("/accept");
    let accept = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    Json(json!({"title": accept}))
}

async fn garbage(State(mock): State<MockProvider>) -> impl IntoResponse {
    mock.hit("/garbage");
    (StatusCode::OK, "<html>definitely not json</html>")
}

async fn slow(State(mock): State<MockProvider>) -> impl IntoResponse {
    mock.hit("/slow");
    tokio::time::sleep(Duration::from_secs(5)).await;
    Json(json!({"title": "Too Late"}))
}

/// Fails twice, then succeeds
async fn flaky(State(mock): State<MockProvider>) -> axum::response::Response {
    mock.hit("/flaky");
    if mock.hits("/flaky") <= 2 {
        (StatusCode::SERVICE_UNAVAILABLE, "try again").into_response()
    } else {
        Json(json!({"title": "Eventually"})).into_response()
    }
}
