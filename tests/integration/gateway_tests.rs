/*!
 * Integration tests for the DeepL gateway over a scripted local listener
 *
 * These tests bind a stub HTTP server on a loopback port so the real
 * reqwest-based client can be exercised end to end: request construction,
 * the pre/post glossary passes, and upstream failure classification.
 */

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Form, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;

use vertaalbrug::errors::GatewayError;
use vertaalbrug::gateway::{DeepLClient, Translator};
use vertaalbrug::glossary::Glossary;

use crate::common::init_test_logging;

/// Form fields the stub expects from the client.
#[derive(Debug, Clone, Deserialize)]
struct RecordedRequest {
    text: String,
    source_lang: String,
    target_lang: String,
    tag_handling: String,
    preserve_formatting: String,
}

/// What the stub saw: auth header plus the decoded form.
#[derive(Debug, Clone, Default)]
struct StubRecording {
    authorization: Option<String>,
    request: Option<RecordedRequest>,
}

#[derive(Clone)]
struct StubState {
    recording: Arc<Mutex<StubRecording>>,
    reply: serde_json::Value,
    status: StatusCode,
}

async fn stub_handler(
    State(state): State<StubState>,
    headers: HeaderMap,
    Form(form): Form<RecordedRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    let mut recording = state.recording.lock().unwrap();
    recording.authorization = headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());
    recording.request = Some(form);
    (state.status, Json(state.reply.clone()))
}

/// Spawn a stub provider returning `reply` with `status`, yielding the
/// endpoint URL and the shared recording.
async fn spawn_stub(
    reply: serde_json::Value,
    status: StatusCode,
) -> (String, Arc<Mutex<StubRecording>>) {
    let recording = Arc::new(Mutex::new(StubRecording::default()));
    let state = StubState {
        recording: Arc::clone(&recording),
        reply,
        status,
    };
    let app = Router::new()
        .route("/v2/translate", post(stub_handler))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/v2/translate", addr), recording)
}

fn dutch_reply(text: &str) -> serde_json::Value {
    serde_json::json!({ "translations": [{ "text": text }] })
}

fn client(endpoint: String) -> DeepLClient {
    DeepLClient::new(
        "test-key",
        endpoint,
        Arc::new(Glossary::builtin()),
        Duration::from_secs(5),
    )
}

#[tokio::test]
async fn test_translate_shouldPreSubstituteGlossaryBeforeSending() {
    init_test_logging();
    let (endpoint, recording) =
        spawn_stub(dutch_reply("Bijwerkingen"), StatusCode::OK).await;

    let gateway = client(endpoint);
    gateway
        .translate("CAMZYOS® is a First-in-class cardiac myosin inhibitor")
        .await
        .unwrap();

    let recording = recording.lock().unwrap();
    let request = recording.request.clone().unwrap();
    // The provider must receive the pre-substituted form, not the original.
    assert_eq!(
        request.text,
        "CAMZYOS® is a Eerste-in-zijn-klasse cardiale myosineremmer"
    );
    assert_eq!(request.source_lang, "EN");
    assert_eq!(request.target_lang, "NL");
    assert_eq!(request.tag_handling, "html");
    assert_eq!(request.preserve_formatting, "1");
    assert_eq!(
        recording.authorization.as_deref(),
        Some("DeepL-Auth-Key test-key")
    );
}

#[tokio::test]
async fn test_translate_shouldReSubstituteProviderOutput() {
    init_test_logging();
    // The provider "undoes" a glossary term; the post-pass re-asserts it.
    let (endpoint, _recording) = spawn_stub(
        dutch_reply("De Quality of life van patiënten verbeterde"),
        StatusCode::OK,
    )
    .await;

    let gateway = client(endpoint);
    let dutch = gateway.translate("Patients improved").await.unwrap();
    assert_eq!(dutch, "De Levenskwaliteit van patiënten verbeterde");
}

#[tokio::test]
async fn test_backTranslate_shouldSkipGlossaryInBothDirections() {
    init_test_logging();
    let (endpoint, recording) = spawn_stub(
        dutch_reply("The Quality of life improved"),
        StatusCode::OK,
    )
    .await;

    let gateway = client(endpoint);
    // Input carries a glossary source term; it must reach the provider
    // untouched, and the reply must come back untouched as well.
    let english = gateway
        .back_translate("De Quality of life verbeterde")
        .await
        .unwrap();
    assert_eq!(english, "The Quality of life improved");

    let recording = recording.lock().unwrap();
    let request = recording.request.clone().unwrap();
    assert_eq!(request.text, "De Quality of life verbeterde");
    assert_eq!(request.source_lang, "NL");
    assert_eq!(request.target_lang, "EN");
}

#[tokio::test]
async fn test_translate_withErrorStatus_shouldClassifyAsApi() {
    init_test_logging();
    let (endpoint, _recording) = spawn_stub(
        serde_json::json!({ "message": "quota exceeded" }),
        StatusCode::TOO_MANY_REQUESTS,
    )
    .await;

    let gateway = client(endpoint);
    let result = gateway.translate("Hello").await;
    assert!(matches!(
        result,
        Err(GatewayError::Api { status: 429, .. })
    ));
}

#[tokio::test]
async fn test_translate_withEmptyTranslations_shouldBeMalformed() {
    init_test_logging();
    let (endpoint, _recording) =
        spawn_stub(serde_json::json!({ "translations": [] }), StatusCode::OK).await;

    let gateway = client(endpoint);
    let result = gateway.translate("Hello").await;
    assert!(matches!(
        result,
        Err(GatewayError::MalformedResponse(_))
    ));
}

#[test]
fn test_translate_withUnreachableProvider_shouldClassifyAsUnavailable() {
    init_test_logging();
    let result = tokio_test::block_on(async {
        // Bind a port, then drop the listener so the address refuses
        // connections.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let gateway = client(format!("http://{}/v2/translate", addr));
        gateway.translate("Hello").await
    });

    assert!(matches!(result, Err(GatewayError::Unavailable(_))));
}
