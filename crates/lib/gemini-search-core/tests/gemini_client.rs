use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::{Json, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use gemini_search_core::client::GenerativeModel;
use gemini_search_core::{ConfigInputs, GeminiClient, ModelError, SearchConfig, SearchService};
use serde_json::{Value, json};

#[derive(Debug, Clone)]
struct CapturedRequest {
    model_action: String,
    api_key: Option<String>,
    body: Value,
}

#[derive(Clone)]
struct FakeGemini {
    status: StatusCode,
    reply: Value,
    delay: Option<Duration>,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

async fn generate_content(
    State(state): State<FakeGemini>,
    Path(model_action): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let api_key = headers
        .get("x-goog-api-key")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    state
        .captured
        .lock()
        .expect("capture lock poisoned")
        .push(CapturedRequest {
            model_action,
            api_key,
            body,
        });
    if let Some(delay) = state.delay {
        tokio::time::sleep(delay).await;
    }
    (state.status, Json(state.reply.clone()))
}

async fn spawn_fake(
    status: StatusCode,
    reply: Value,
    delay: Option<Duration>,
) -> (String, Arc<Mutex<Vec<CapturedRequest>>>) {
    let captured = Arc::new(Mutex::new(Vec::new()));
    let state = FakeGemini {
        status,
        reply,
        delay,
        captured: captured.clone(),
    };
    let app = Router::new()
        .route("/v1beta/models/:model_action", post(generate_content))
        .with_state(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind fake gemini listener");
    let addr = listener.local_addr().expect("listener should have an address");
    tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("fake gemini server failed");
    });
    (format!("http://{addr}"), captured)
}

fn config(web_search: &str, thinking_budget: &str) -> SearchConfig {
    SearchConfig::resolve(ConfigInputs {
        api_key: Some("integration-key".to_string()),
        model: Some("pro".to_string()),
        timeout_ms: Some("5000".to_string()),
        thinking_budget: Some(thinking_budget.to_string()),
        web_search: Some(web_search.to_string()),
    })
    .expect("config should resolve")
}

fn client_for(config: &SearchConfig, base_url: &str) -> GeminiClient {
    GeminiClient::from_config(config)
        .expect("client should build")
        .with_base_url(base_url)
}

#[tokio::test]
async fn grounded_search_roundtrip() {
    let reply = json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{ "text": "Paris is the capital of France." }]
            },
            "finishReason": "STOP",
            "groundingMetadata": {
                "webSearchQueries": ["capital of France"],
                "groundingChunks": [
                    { "web": { "uri": "https://example.com/paris", "title": "example.com" } },
                    { "retrievedContext": {} },
                    { "web": { "uri": "https://example.org/france" } }
                ]
            }
        }]
    });
    let (base_url, captured) = spawn_fake(StatusCode::OK, reply, None).await;
    let config = config("true", "-1");
    let service = SearchService::new(config.clone(), client_for(&config, &base_url));

    let answer = service.search("What is the capital of France?").await;

    assert_eq!(
        answer,
        "Paris is the capital of France.\n\n---\n**Sources:**\n\
         [1] example.com: https://example.com/paris\n\
         [2] Source: https://example.org/france"
    );

    let captured = captured.lock().expect("capture lock poisoned");
    assert_eq!(captured.len(), 1);
    let request = &captured[0];
    assert_eq!(request.model_action, "gemini-2.5-pro:generateContent");
    assert_eq!(request.api_key.as_deref(), Some("integration-key"));
    assert_eq!(
        request.body,
        json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": "What is the capital of France?" }]
            }],
            "tools": [{ "googleSearch": {} }]
        })
    );
}

#[tokio::test]
async fn disabled_search_sends_thinking_budget_without_tools() {
    let reply = json!({
        "candidates": [{ "content": { "parts": [{ "text": "ok" }] } }]
    });
    let (base_url, captured) = spawn_fake(StatusCode::OK, reply, None).await;
    let config = config("false", "0");
    let service = SearchService::new(config.clone(), client_for(&config, &base_url));

    assert_eq!(service.search("ping").await, "ok");

    let captured = captured.lock().expect("capture lock poisoned");
    let body = &captured[0].body;
    assert!(body.get("tools").is_none(), "tools must be omitted: {body}");
    assert_eq!(
        body["generationConfig"],
        json!({ "thinkingConfig": { "thinkingBudget": 0 } })
    );
}

#[tokio::test]
async fn api_errors_surface_service_message() {
    let reply = json!({
        "error": {
            "code": 400,
            "message": "API key not valid. Please pass a valid API key.",
            "status": "INVALID_ARGUMENT"
        }
    });
    let (base_url, _) = spawn_fake(StatusCode::BAD_REQUEST, reply, None).await;
    let config = config("true", "-1");
    let client = client_for(&config, &base_url);

    let request = SearchService::new(config.clone(), client.clone()).build_request("hello");
    let err = client
        .generate(&request)
        .await
        .expect_err("bad request should fail");
    assert!(matches!(err, ModelError::Api { status: 400, .. }));

    let service = SearchService::new(config, client);
    assert_eq!(
        service.search("hello").await,
        "Error: Gemini API error 400: API key not valid. Please pass a valid API key."
    );
}

#[tokio::test]
async fn empty_candidate_uses_fallback_text() {
    let reply = json!({ "candidates": [{ "finishReason": "MAX_TOKENS" }] });
    let (base_url, _) = spawn_fake(StatusCode::OK, reply, None).await;
    let config = config("true", "-1");
    let service = SearchService::new(config.clone(), client_for(&config, &base_url));

    assert_eq!(service.search("hello").await, "No response text available.");
}

#[tokio::test]
async fn blocked_prompt_falls_back_to_no_text_answer() {
    let reply = json!({ "promptFeedback": { "blockReason": "SAFETY" } });
    let (base_url, _) = spawn_fake(StatusCode::OK, reply, None).await;
    let config = config("true", "-1");
    let service = SearchService::new(config.clone(), client_for(&config, &base_url));

    let answer = service.search("hello").await;
    assert_eq!(answer, "No response text available.");
    assert!(service.try_search("hello").await.is_ok());
}

#[tokio::test]
async fn slow_responses_hit_the_timeout() {
    let reply = json!({ "candidates": [] });
    let (base_url, _) = spawn_fake(StatusCode::OK, reply, Some(Duration::from_secs(2))).await;
    let client = GeminiClient::new("key", Duration::from_millis(100))
        .expect("client should build")
        .with_base_url(base_url);
    let config = config("true", "-1");
    let service = SearchService::new(config, client);

    assert_eq!(
        service.search("hello").await,
        "Error: request timed out after 100 ms"
    );
}

#[tokio::test]
async fn unreachable_endpoint_becomes_error_answer() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind probe listener");
    let addr = listener.local_addr().expect("listener should have an address");
    drop(listener);

    let config = config("true", "-1");
    let service = SearchService::new(config.clone(), client_for(&config, &format!("http://{addr}")));

    let answer = service.search("hello").await;
    assert!(answer.starts_with("Error: "), "unexpected answer: {answer}");
}
