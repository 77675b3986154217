// Shared bootstrapping for integration tests: a stub provider and a relay pointed at it.
use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{StatusCode, Uri, header},
};
use care_relay::RelayConfig;
use serde_json::Value;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

pub const TEST_API_KEY: &str = "test-key";
pub const TEST_TEXT_MODEL: &str = "gemini-test";

// One request observed by the stub provider.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub path: String,
    pub query: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct StubState {
    status: StatusCode,
    content_type: &'static str,
    body: String,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

pub struct StubUpstream {
    pub base_url: String,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl StubUpstream {
    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.captured.lock().expect("captured mutex poisoned").clone()
    }
}

async fn stub_handler(
    State(state): State<StubState>,
    uri: Uri,
    body: Bytes,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    let body = serde_json::from_slice(&body).unwrap_or(Value::Null);
    state
        .captured
        .lock()
        .expect("captured mutex poisoned")
        .push(CapturedRequest {
            path: uri.path().to_string(),
            query: uri.query().map(str::to_string),
            body,
        });
    (
        state.status,
        [(header::CONTENT_TYPE, state.content_type)],
        state.body.clone(),
    )
}

// Bind an ephemeral port and answer every request with the given status and JSON body.
pub async fn spawn_stub_upstream(status: u16, body: Value) -> StubUpstream {
    spawn_raw_stub_upstream(status, "application/json", body.to_string()).await
}

// Same as `spawn_stub_upstream`, but the body is sent as-is.
pub async fn spawn_raw_stub_upstream(
    status: u16,
    content_type: &'static str,
    body: impl Into<String>,
) -> StubUpstream {
    let captured = Arc::new(Mutex::new(Vec::new()));
    let state = StubState {
        status: StatusCode::from_u16(status).expect("valid status code"),
        content_type,
        body: body.into(),
        captured: Arc::clone(&captured),
    };
    let app = Router::new().fallback(stub_handler).with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral stub port");
    let addr = listener.local_addr().expect("get local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub upstream failed");
    });

    StubUpstream {
        base_url: format!("http://{addr}"),
        captured,
    }
}

// Start the relay on an ephemeral port against the given provider base URL.
pub async fn spawn_relay(upstream_base_url: &str) -> String {
    let vars = HashMap::from([
        ("GEMINI_API_KEY".to_string(), TEST_API_KEY.to_string()),
        ("GEMINI_API_BASE_URL".to_string(), upstream_base_url.to_string()),
        ("GEMINI_TEXT_MODEL".to_string(), TEST_TEXT_MODEL.to_string()),
    ]);
    let config = RelayConfig::from_lookup(|key: &str| vars.get(key).cloned())
        .expect("test config should resolve");

    // Binding before spawning means connections queue until the server accepts them.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral relay port");
    let addr = listener.local_addr().expect("get local addr");
    tokio::spawn(async move {
        care_relay::run(listener, config).await.expect("relay failed");
    });

    format!("http://{addr}")
}

// A base URL nothing is listening on.
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("get local addr");
    drop(listener);
    format!("http://{addr}")
}
