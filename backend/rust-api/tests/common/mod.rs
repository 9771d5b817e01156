#![allow(dead_code)]

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request, StatusCode},
    routing::post,
    Json, Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use studyportal_api::{
    config::{AiConfig, Config},
    create_router,
    services::AppState,
};
use tower::ServiceExt;

pub const TEST_API_KEY: &str = "test-gateway-key";

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub authorization: Option<String>,
    pub body: Value,
}

struct StubState {
    status: StatusCode,
    body: String,
    captured: Mutex<Vec<CapturedRequest>>,
}

/// Chat-completion endpoint double bound on an ephemeral local port.
pub struct StubUpstream {
    pub url: String,
    state: Arc<StubState>,
}

impl StubUpstream {
    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.state.captured.lock().unwrap().clone()
    }
}

pub async fn spawn_upstream(status: StatusCode, body: impl Into<String>) -> StubUpstream {
    let state = Arc::new(StubState {
        status,
        body: body.into(),
        captured: Mutex::new(Vec::new()),
    });

    let app = Router::new()
        .route("/v1/chat/completions", post(stub_completion))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub upstream");
    let addr = listener.local_addr().expect("stub local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve stub upstream") });

    StubUpstream {
        url: format!("http://{}/v1/chat/completions", addr),
        state,
    }
}

async fn stub_completion(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    state.captured.lock().unwrap().push(CapturedRequest {
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });
    (
        state.status,
        [(header::CONTENT_TYPE, "application/json")],
        state.body.clone(),
    )
}

/// Address nothing listens on, for transport failures.
pub async fn unreachable_upstream_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind probe listener");
    let addr = listener.local_addr().expect("probe local addr");
    drop(listener);
    format!("http://{}/v1/chat/completions", addr)
}

pub fn create_test_app(upstream_url: &str) -> Router {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let config = Config::new(AiConfig::new(TEST_API_KEY, upstream_url));
    let app_state = Arc::new(AppState::new(config).expect("Failed to initialize test app state"));
    create_router(app_state)
}

pub fn tool_call_response(name: &str, arguments: &Value) -> String {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "finish_reason": "tool_calls",
            "message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call_0",
                    "type": "function",
                    "function": {
                        "name": name,
                        "arguments": arguments.to_string()
                    }
                }]
            }
        }]
    })
    .to_string()
}

pub fn plain_text_response(text: &str) -> String {
    json!({
        "choices": [{
            "index": 0,
            "finish_reason": "stop",
            "message": { "role": "assistant", "content": text }
        }]
    })
    .to_string()
}

/// 2xx bodies that carry no usable tool call.
pub fn envelopes_without_tool_call() -> Vec<String> {
    vec![
        r#"{"choices":null}"#.to_string(),
        r#"{"choices":[{"index":0,"finish_reason":"stop"}]}"#.to_string(),
        r#"{"choices":[{"message":null}]}"#.to_string(),
        r#"{"choices":[{"message":{"tool_calls":[{"type":"function"}]}}]}"#.to_string(),
        r#"{"id":"chatcmpl-test"}"#.to_string(),
        "<html>ok</html>".to_string(),
        String::new(),
    ]
}

pub fn sample_quiz(count: usize) -> Value {
    let labels = ["A", "B", "C", "D"];
    let questions: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "question": format!("Question {}?", i + 1),
                "options": { "A": "alpha", "B": "beta", "C": "gamma", "D": "delta" },
                "correctAnswer": labels[i % labels.len()],
                "explanation": format!("Because of rule {}", i + 1)
            })
        })
        .collect();
    json!({ "questions": questions })
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub raw: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.raw).expect("response body is JSON")
    }
}

pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let raw = response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec();
    TestResponse {
        status,
        headers,
        raw,
    }
}

pub async fn post_json(app: &Router, uri: &str, body: &Value) -> TestResponse {
    send(
        app,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

pub async fn preflight(app: &Router, uri: &str) -> TestResponse {
    send(
        app,
        Request::builder()
            .method("OPTIONS")
            .uri(uri)
            .header("origin", "http://localhost:5173")
            .header("access-control-request-method", "POST")
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

pub fn assert_cors_headers(headers: &HeaderMap) {
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(
        headers["access-control-allow-headers"],
        "authorization, x-client-info, apikey, content-type"
    );
}
