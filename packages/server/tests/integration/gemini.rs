//! Judging over real HTTP against a local stand-in for the generative service.

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::post;
use serde_json::{Value, json};

use uzcode_server::config::JudgeConfig;
use uzcode_server::judge::{GeminiTransport, JudgeClient};

use crate::common::{ScriptedTransport, TestApp, test_config};

#[derive(Default)]
struct MockGemini {
    replies: Mutex<VecDeque<(StatusCode, String)>>,
    hits: Mutex<Vec<Hit>>,
}

#[derive(Clone)]
struct Hit {
    action: String,
    key: Option<String>,
    body: Value,
}

impl MockGemini {
    fn reply(&self, status: StatusCode, body: Value) {
        self.replies
            .lock()
            .unwrap()
            .push_back((status, body.to_string()));
    }

    fn reply_analysis(&self, status: &str) {
        let text = json!({
            "status": status,
            "timeComplexity": "O(1)",
            "spaceComplexity": "O(1)",
            "critique": "Juda yaxshi",
        })
        .to_string();
        self.reply(
            StatusCode::OK,
            json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] }),
        );
    }

    fn hits(&self) -> Vec<Hit> {
        self.hits.lock().unwrap().clone()
    }
}

async fn generate(
    State(mock): State<Arc<MockGemini>>,
    Path(action): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    body: String,
) -> (StatusCode, String) {
    mock.hits.lock().unwrap().push(Hit {
        action,
        key: params.get("key").cloned(),
        body: serde_json::from_str(&body).unwrap_or(Value::Null),
    });
    mock.replies
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or((StatusCode::INTERNAL_SERVER_ERROR, "{}".into()))
}

async fn spawn_mock() -> (SocketAddr, Arc<MockGemini>) {
    let mock = Arc::new(MockGemini::default());
    let app = Router::new()
        .route("/v1beta/models/{action}", post(generate))
        .with_state(mock.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, mock)
}

fn judge_config(addr: SocketAddr) -> JudgeConfig {
    JudgeConfig {
        base_url: format!("http://{addr}/v1beta/"),
        ..test_config().judge
    }
}

#[tokio::test]
async fn request_targets_the_configured_model_with_key_in_query() {
    let (addr, mock) = spawn_mock().await;
    mock.reply_analysis("Accepted");
    let client = JudgeClient::from_config(&judge_config(addr)).unwrap();

    let analysis = client
        .judge("print(1)", "Problem Slug: two-sum.")
        .await
        .unwrap();

    assert_eq!(analysis.status, "Accepted");
    assert_eq!(analysis.critique, "Juda yaxshi");

    let hits = mock.hits();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].action, "gemini-2.5-flash:generateContent");
    assert_eq!(hits[0].key.as_deref(), Some("test-api-key"));
    assert_eq!(
        hits[0].body["generationConfig"]["responseMimeType"],
        "application/json"
    );
}

#[tokio::test]
async fn server_errors_are_retried_until_success() {
    let (addr, mock) = spawn_mock().await;
    mock.reply(StatusCode::INTERNAL_SERVER_ERROR, json!({"error": "boom"}));
    mock.reply(StatusCode::SERVICE_UNAVAILABLE, json!({"error": "busy"}));
    mock.reply_analysis("Accepted");
    let client = JudgeClient::from_config(&judge_config(addr)).unwrap();

    let analysis = client.judge("print(1)", "desc").await.unwrap();

    assert_eq!(analysis.status, "Accepted");
    assert_eq!(mock.hits().len(), 3);
}

#[tokio::test]
async fn invalid_key_is_a_credential_failure() {
    let (addr, mock) = spawn_mock().await;
    for _ in 0..3 {
        mock.reply(
            StatusCode::BAD_REQUEST,
            json!({"error": {"message": "API key not valid. Please pass a valid API key.", "status": "INVALID_ARGUMENT"}}),
        );
    }
    let client = JudgeClient::from_config(&judge_config(addr)).unwrap();

    let failure = client.judge("print(1)", "desc").await.unwrap_err();

    assert!(failure.is_credential_error());
    assert_eq!(failure.attempts(), 3);
    assert_eq!(failure.analysis().status, "API_CALL_FAILED");
    assert!(!failure.analysis().critique.contains("test-api-key"));
}

#[tokio::test]
async fn submission_flow_over_http_marks_failed_after_retries() {
    let (addr, mock) = spawn_mock().await;
    let transport = Arc::new(GeminiTransport::new(&judge_config(addr)).unwrap());
    let app =
        TestApp::spawn_with_judge_transport(transport, Arc::new(ScriptedTransport::default()))
            .await;
    let token = app.create_authenticated_user("alisher", "securepass").await;
    app.seed_problem("two-sum", "Two Sum", "Easy", None).await;

    let res = app.submit(&token, "two-sum", "print(1)").await;

    assert_eq!(res.status, 500, "{}", res.text);
    assert!(
        res.body["detail"]
            .as_str()
            .unwrap()
            .contains("API call failed after 3 attempts")
    );
    assert_eq!(mock.hits().len(), 3);
}

#[tokio::test]
async fn submission_flow_over_http_records_the_verdict() {
    let (addr, mock) = spawn_mock().await;
    mock.reply_analysis("Accepted");
    let transport = Arc::new(GeminiTransport::new(&judge_config(addr)).unwrap());
    let app =
        TestApp::spawn_with_judge_transport(transport, Arc::new(ScriptedTransport::default()))
            .await;
    let token = app.create_authenticated_user("alisher", "securepass").await;
    app.seed_problem("two-sum", "Two Sum", "Easy", None).await;

    let res = app.submit(&token, "two-sum", "print(1)").await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["status"], "Accepted");
    let prompt = mock.hits()[0].body["contents"][0]["parts"][0]["text"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(prompt.contains("Problem Title: Two Sum"));
}
