//! End-to-end tests of `Gateway` over real HTTP against a local stand-in upstream.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use chatgate_llm::{normalize_bytes, Gateway, GatewayConfig, GatewayResponse};

#[derive(Clone, Default)]
struct Recorded {
    hits: Arc<AtomicUsize>,
    last_body: Arc<Mutex<Option<Value>>>,
    last_auth: Arc<Mutex<Option<String>>>,
    last_key: Arc<Mutex<Option<String>>>,
    last_model: Arc<Mutex<Option<String>>>,
}

async fn openai_completions(
    State(rec): State<Recorded>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    rec.hits.fetch_add(1, Ordering::SeqCst);
    *rec.last_auth.lock().unwrap() = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let last = body["messages"]
        .as_array()
        .and_then(|m| m.last())
        .and_then(|m| m["content"].as_str())
        .unwrap_or("")
        .to_string();
    *rec.last_body.lock().unwrap() = Some(body);
    (
        StatusCode::OK,
        Json(json!({ "choices": [{ "message": { "role": "assistant", "content": format!("echo: {last}") } }] })),
    )
}

async fn gemini_generate(
    State(rec): State<Recorded>,
    Path(model_action): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    rec.hits.fetch_add(1, Ordering::SeqCst);
    *rec.last_key.lock().unwrap() = query.get("key").cloned();
    *rec.last_model.lock().unwrap() = Some(model_action);
    *rec.last_body.lock().unwrap() = Some(body);
    (
        StatusCode::OK,
        Json(json!({
            "candidates": [{ "content": { "role": "model", "parts": [{ "text": "hi " }, { "text": "there" }] } }]
        })),
    )
}

async fn unavailable(State(rec): State<Recorded>) -> (StatusCode, Json<Value>) {
    rec.hits.fetch_add(1, Ordering::SeqCst);
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({ "error": { "message": "try later" } })),
    )
}

async fn spawn_upstream(router: Router<Recorded>, rec: Recorded) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router.with_state(rec);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn config_for(base: &str) -> GatewayConfig {
    let mut config = GatewayConfig::default()
        .with_openai_key("sk-local")
        .with_gemini_key("g-local");
    config.openai_base_url = base.to_string();
    config.gemini_base_url = base.to_string();
    config.gemini_model = "gemini-test".into();
    config
}

#[tokio::test]
async fn gemini_call_sends_key_as_query_and_concatenates_parts() {
    let rec = Recorded::default();
    let base = spawn_upstream(
        Router::new().route("/models/:model_action", post(gemini_generate)),
        rec.clone(),
    )
    .await;
    let gateway = Gateway::new(config_for(&base));

    let request = normalize_bytes(br#"{"userInput":"hello"}"#);
    let resp = gateway.dispatch(&request).await;

    assert_eq!(resp, GatewayResponse::text("hi there"));
    assert_eq!(rec.hits.load(Ordering::SeqCst), 1);
    assert_eq!(rec.last_key.lock().unwrap().as_deref(), Some("g-local"));
    assert_eq!(
        rec.last_model.lock().unwrap().as_deref(),
        Some("gemini-test:generateContent")
    );
    let body = rec.last_body.lock().unwrap().clone().unwrap();
    assert_eq!(
        body["contents"],
        json!([{ "role": "user", "parts": [{ "text": "hello" }] }])
    );
    assert!(body["systemInstruction"]["parts"][0]["text"].is_string());
}

#[tokio::test]
async fn openai_call_sends_bearer_and_full_history() {
    let rec = Recorded::default();
    let base = spawn_upstream(
        Router::new().route("/v1/chat/completions", post(openai_completions)),
        rec.clone(),
    )
    .await;
    let gateway = Gateway::new(config_for(&base));

    let request = normalize_bytes(
        br#"{"provider":"openai","messages":[{"role":"assistant","content":"previous"}],"userInput":"next"}"#,
    );
    let resp = gateway.dispatch(&request).await;

    assert_eq!(resp, GatewayResponse::text("echo: next"));
    assert_eq!(
        rec.last_auth.lock().unwrap().as_deref(),
        Some("Bearer sk-local")
    );
    let body = rec.last_body.lock().unwrap().clone().unwrap();
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0]["role"], "system");
    assert_eq!(messages[1], json!({ "role": "assistant", "content": "previous" }));
    assert_eq!(messages[2], json!({ "role": "user", "content": "next" }));
}

#[tokio::test]
async fn upstream_503_is_reported_once_as_500() {
    let rec = Recorded::default();
    let base = spawn_upstream(
        Router::new().route("/v1/chat/completions", post(unavailable)),
        rec.clone(),
    )
    .await;
    let gateway = Gateway::new(config_for(&base));

    let resp = gateway
        .dispatch(&normalize_bytes(br#"{"provider":"OPENAI","userInput":"x"}"#))
        .await;

    assert_eq!(resp.http_status(), 500);
    let error = resp.body()["error"].as_str().unwrap().to_string();
    assert!(error.contains("503"), "error was: {error}");
    assert!(error.contains("try later"));
    assert_eq!(rec.hits.load(Ordering::SeqCst), 1);
}
