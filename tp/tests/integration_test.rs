//! Integration tests for TaskPlanner
//!
//! These tests drive a real GeminiClient against a local stub upstream and
//! exercise the HTTP API end to end over reqwest.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::routing::post;
use serde_json::{Value, json};
use tokio::net::TcpListener;

use taskplanner::llm::{GeminiClient, LlmError};
use taskplanner::planning::{GenerateError, TaskGenerator};
use taskplanner::server::{self, AppState, LIVENESS};
use taskplanner::state::StateManager;

const PODCAST_REPLY: &str = "Here is a plan for your podcast.\n\n\
    **Heading:** Plan Content\n**Priority:** High\n**Timeline:** 1 week\n**Dependencies:** None\n\
    **Due Date:** Week 1\n**Matter:** Outline the first season's topics and guests.\n\n\
    **Heading:** Record Episode\n**Priority:** Medium\n**Timeline:** 2-3 days\n**Dependencies:** Task 1\n\
    **Due Date:** Week 2\n**Matter:** Record and edit the pilot episode.\n";

// =============================================================================
// Stub upstream
// =============================================================================

/// A request the stub upstream received
#[derive(Debug, Clone)]
struct Seen {
    key: Option<String>,
    body: Value,
}

#[derive(Clone)]
struct Upstream {
    status: StatusCode,
    body: String,
    delay: Duration,
    seen: Arc<Mutex<Vec<Seen>>>,
}

impl Upstream {
    fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }
}

async fn upstream_handler(
    State(up): State<Upstream>,
    Query(query): Query<HashMap<String, String>>,
    body: String,
) -> impl IntoResponse {
    up.seen.lock().unwrap().push(Seen {
        key: query.get("key").cloned(),
        body: serde_json::from_str(&body).unwrap_or(Value::Null),
    });
    if !up.delay.is_zero() {
        tokio::time::sleep(up.delay).await;
    }
    (up.status, [(CONTENT_TYPE, "application/json")], up.body.clone())
}

async fn spawn_upstream_with_delay(status: StatusCode, body: impl Into<String>, delay: Duration) -> (String, Upstream) {
    let upstream = Upstream {
        status,
        body: body.into(),
        delay,
        seen: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .route("/v1beta/generate", post(upstream_handler))
        .with_state(upstream.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("Failed to bind stub upstream");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/v1beta/generate", addr), upstream)
}

async fn spawn_upstream(status: StatusCode, body: impl Into<String>) -> (String, Upstream) {
    spawn_upstream_with_delay(status, body, Duration::ZERO).await
}

/// Gemini-shaped success body carrying `text`
fn gemini_reply(text: &str) -> String {
    json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] }).to_string()
}

fn generator_for(endpoint: &str) -> TaskGenerator {
    let client = GeminiClient::new(endpoint, "test-key", Duration::from_secs(5)).expect("Failed to build client");
    TaskGenerator::new(Arc::new(client))
}

/// Start the API server over the given generator and an in-memory store
async fn spawn_api(generator: TaskGenerator) -> String {
    let store = StateManager::spawn_in_memory().expect("Failed to open store");
    let app = server::router(AppState::new(generator, store));

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("Failed to bind API");
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

// =============================================================================
// Generation through the Gemini client
// =============================================================================

#[tokio::test]
async fn test_generate_podcast_through_gemini() {
    let (endpoint, _upstream) = spawn_upstream(StatusCode::OK, gemini_reply(PODCAST_REPLY)).await;

    let tasks = generator_for(&endpoint).generate_tasks("Launch a podcast").await.unwrap();

    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].heading, "Plan Content");
    assert_eq!(tasks[0].priority, "HIGH");
    assert_eq!(tasks[1].heading, "Record Episode");
    assert_eq!(tasks[1].dependencies, "Task 1");
    assert_eq!(tasks[1].due_date, "Week 2");
}

#[tokio::test]
async fn test_request_carries_key_and_single_user_part() {
    let (endpoint, upstream) = spawn_upstream(StatusCode::OK, gemini_reply(PODCAST_REPLY)).await;

    generator_for(&endpoint).generate_tasks("Launch a podcast").await.unwrap();

    let seen = upstream.seen();
    assert_eq!(seen.len(), 1, "exactly one upstream call per goal");
    assert_eq!(seen[0].key.as_deref(), Some("test-key"));

    let contents = seen[0].body["contents"].as_array().unwrap();
    assert_eq!(contents.len(), 1);
    let parts = contents[0]["parts"].as_array().unwrap();
    assert_eq!(parts.len(), 1);
    let prompt = parts[0]["text"].as_str().unwrap();
    assert!(prompt.contains("Launch a podcast"));
    assert!(prompt.contains("**Heading:**"));
    assert!(prompt.contains("**Matter:**"));
}

#[tokio::test]
async fn test_upstream_500_is_upstream_error() {
    let (endpoint, _upstream) = spawn_upstream(StatusCode::INTERNAL_SERVER_ERROR, r#"{"error":"boom"}"#).await;

    let err = generator_for(&endpoint).generate_tasks("Goal").await.unwrap_err();

    match err {
        GenerateError::Upstream(inner) => {
            assert_eq!(inner.status(), Some(500));
            assert!(inner.to_string().contains("boom"));
        }
        other => panic!("expected upstream error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_candidates_is_malformed() {
    let (endpoint, _upstream) = spawn_upstream(StatusCode::OK, "{}").await;

    let err = generator_for(&endpoint).generate_tasks("Goal").await.unwrap_err();

    assert!(
        matches!(err, GenerateError::Upstream(LlmError::MalformedResponse(_))),
        "got {:?}",
        err
    );
}

#[tokio::test]
async fn test_non_json_body_is_malformed() {
    let (endpoint, _upstream) = spawn_upstream(StatusCode::OK, "<html>not json</html>").await;

    let err = generator_for(&endpoint).generate_tasks("Goal").await.unwrap_err();

    assert!(matches!(err, GenerateError::Upstream(LlmError::MalformedResponse(_))));
}

#[tokio::test]
async fn test_reply_without_blocks_is_empty_result() {
    let (endpoint, _upstream) = spawn_upstream(StatusCode::OK, gemini_reply("I can't help with that.")).await;

    let err = generator_for(&endpoint).generate_tasks("Goal").await.unwrap_err();

    assert!(matches!(err, GenerateError::EmptyResult), "got {:?}", err);
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // Bind and drop to get a port with nothing listening
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = generator_for(&format!("http://{}/v1beta/generate", addr))
        .generate_tasks("Goal")
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(!message.contains("test-key"), "API key leaked: {}", message);
    assert!(!message.contains("key="), "query string leaked: {}", message);
    match err {
        GenerateError::Upstream(inner) => {
            assert!(inner.is_transport(), "got {:?}", inner);
            assert!(!format!("{:?}", inner).contains("test-key"));
        }
        other => panic!("expected transport error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_api_transport_failure_does_not_expose_key() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let base = spawn_api(generator_for(&format!("http://{}/v1beta/generate", addr))).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/api/tasks/generate", base))
        .json(&json!({ "goal": "Launch a podcast" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    let body = resp.text().await.unwrap();
    assert!(!body.contains("test-key"), "API key leaked: {}", body);
}

#[tokio::test]
async fn test_slow_upstream_times_out() {
    let (endpoint, _upstream) =
        spawn_upstream_with_delay(StatusCode::OK, gemini_reply(PODCAST_REPLY), Duration::from_secs(5)).await;
    let client = GeminiClient::new(&endpoint, "test-key", Duration::from_millis(200)).unwrap();

    let err = TaskGenerator::new(Arc::new(client))
        .generate_tasks("Goal")
        .await
        .unwrap_err();

    assert!(
        matches!(err, GenerateError::Upstream(LlmError::Timeout(_))),
        "got {:?}",
        err
    );
}

// =============================================================================
// HTTP API
// =============================================================================

#[tokio::test]
async fn test_api_generate_returns_records() {
    let (endpoint, _upstream) = spawn_upstream(StatusCode::OK, gemini_reply(PODCAST_REPLY)).await;
    let base = spawn_api(generator_for(&endpoint)).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/api/tasks/generate", base))
        .json(&json!({ "goal": "Launch a podcast" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    let tasks = body.as_array().unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0]["heading"], "Plan Content");
    assert_eq!(tasks[0]["priority"], "HIGH");
    assert_eq!(tasks[0]["dueDate"], "Week 1");
    assert_eq!(tasks[1]["matter"], "Record and edit the pilot episode.");
}

#[tokio::test]
async fn test_api_blank_goal_is_400_without_upstream_call() {
    let (endpoint, upstream) = spawn_upstream(StatusCode::OK, gemini_reply(PODCAST_REPLY)).await;
    let base = spawn_api(generator_for(&endpoint)).await;
    let http = reqwest::Client::new();

    for body in [json!({ "goal": "   " }), json!({ "goal": "" }), json!({})] {
        let resp = http
            .post(format!("{}/api/tasks/generate", base))
            .json(&body)
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST, "body {}", body);
        let error: Value = resp.json().await.unwrap();
        assert_eq!(error, json!({ "error": "Goal is required" }));
    }

    assert!(upstream.seen().is_empty());
}

#[tokio::test]
async fn test_api_missing_body_is_goal_required() {
    let (endpoint, upstream) = spawn_upstream(StatusCode::OK, gemini_reply(PODCAST_REPLY)).await;
    let base = spawn_api(generator_for(&endpoint)).await;
    let http = reqwest::Client::new();

    // No body at all, and a body-less request with a JSON content type
    let bare = http.post(format!("{}/api/tasks/generate", base)).send().await.unwrap();
    let typed = http
        .post(format!("{}/api/tasks/generate", base))
        .header("content-type", "application/json")
        .send()
        .await
        .unwrap();

    for resp in [bare, typed] {
        assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
        let error: Value = resp.json().await.unwrap();
        assert_eq!(error, json!({ "error": "Goal is required" }));
    }
    assert!(upstream.seen().is_empty());
}

#[tokio::test]
async fn test_api_malformed_json_is_400_with_error_body() {
    let (endpoint, _upstream) = spawn_upstream(StatusCode::OK, gemini_reply(PODCAST_REPLY)).await;
    let base = spawn_api(generator_for(&endpoint)).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/api/tasks/generate", base))
        .header("content-type", "application/json")
        .body("{ not json")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
    let error: Value = resp.json().await.unwrap();
    assert!(error["error"].is_string());
}

#[tokio::test]
async fn test_api_upstream_failure_is_500() {
    let (endpoint, _upstream) = spawn_upstream(StatusCode::SERVICE_UNAVAILABLE, "overloaded").await;
    let base = spawn_api(generator_for(&endpoint)).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/api/tasks/generate", base))
        .json(&json!({ "goal": "Launch a podcast" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    let error: Value = resp.json().await.unwrap();
    let message = error["error"].as_str().unwrap();
    assert!(message.contains("503"), "message: {}", message);
}

#[tokio::test]
async fn test_api_empty_result_is_500() {
    let (endpoint, _upstream) = spawn_upstream(StatusCode::OK, gemini_reply("no tasks here")).await;
    let base = spawn_api(generator_for(&endpoint)).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/api/tasks/generate", base))
        .json(&json!({ "goal": "Launch a podcast" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    let error: Value = resp.json().await.unwrap();
    assert!(error["error"].is_string());
}

#[tokio::test]
async fn test_api_liveness() {
    let (endpoint, _upstream) = spawn_upstream(StatusCode::OK, gemini_reply(PODCAST_REPLY)).await;
    let base = spawn_api(generator_for(&endpoint)).await;

    let resp = reqwest::get(format!("{}/api/tasks/test", base)).await.unwrap();

    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), LIVENESS);
}

#[tokio::test]
async fn test_api_stored_task_crud() {
    let (endpoint, _upstream) = spawn_upstream(StatusCode::OK, gemini_reply(PODCAST_REPLY)).await;
    let base = spawn_api(generator_for(&endpoint)).await;
    let http = reqwest::Client::new();

    // Create
    let resp = http
        .post(format!("{}/api/tasks", base))
        .json(&json!({
            "title": "Define requirements",
            "description": "Interview stakeholders",
            "dueDate": "2025-03-01"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::CREATED);
    let created: Value = resp.json().await.unwrap();
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["status"], "pending");
    assert_eq!(created["dueDate"], "2025-03-01");

    let resp = http
        .post(format!("{}/api/tasks", base))
        .json(&json!({ "title": "Design architecture", "dependencyIds": [id] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::CREATED);

    // List
    let list: Value = http.get(format!("{}/api/tasks", base)).send().await.unwrap().json().await.unwrap();
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[1]["dependencyIds"], json!([id]));

    // Get
    let resp = http.get(format!("{}/api/tasks/{}", base, id)).send().await.unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    let fetched: Value = resp.json().await.unwrap();
    assert_eq!(fetched["title"], "Define requirements");

    // Delete
    let resp = http.delete(format!("{}/api/tasks/{}", base, id)).send().await.unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::NO_CONTENT);

    let resp = http.get(format!("{}/api/tasks/{}", base, id)).send().await.unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);
    let error: Value = resp.json().await.unwrap();
    assert_eq!(error, json!({ "error": format!("Task {} not found", id) }));

    let resp = http.delete(format!("{}/api/tasks/{}", base, id)).send().await.unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_api_blank_title_is_400() {
    let (endpoint, _upstream) = spawn_upstream(StatusCode::OK, gemini_reply(PODCAST_REPLY)).await;
    let base = spawn_api(generator_for(&endpoint)).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/api/tasks", base))
        .json(&json!({ "title": "  ", "description": "no title" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
    let error: Value = resp.json().await.unwrap();
    assert!(error["error"].as_str().unwrap().contains("title"));
}
