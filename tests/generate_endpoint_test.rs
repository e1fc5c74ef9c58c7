//! Drives the router end to end with a scripted provider.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use kidshorts::{
    config::API_KEY_VAR, create_routes, CompletionProvider, CompletionRequest, Config, Generator,
    ProviderError,
};
use serde_json::{json, Value};
use tower::ServiceExt;

enum Reply {
    Text(&'static str),
    Empty,
    Fail,
}

struct ScriptedProvider {
    reply: Reply,
    calls: AtomicUsize,
    last_request: Mutex<Option<CompletionRequest>>,
}

impl ScriptedProvider {
    fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<Option<String>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request);
        match self.reply {
            Reply::Text(text) => Ok(Some(text.to_string())),
            Reply::Empty => Ok(None),
            Reply::Fail => Err(ProviderError::Status {
                status: 429,
                body: r#"{"error":{"message":"quota exceeded"}}"#.to_string(),
            }),
        }
    }
}

fn app(provider: &Arc<ScriptedProvider>) -> Router {
    create_routes(Generator::new(provider.clone()))
}

async fn post_json(app: Router, body: Value) -> (StatusCode, Value) {
    post_raw(app, Some("application/json"), body.to_string()).await
}

async fn post_raw(app: Router, content_type: Option<&str>, body: String) -> (StatusCode, Value) {
    let mut request = Request::builder().method("POST").uri("/api/generate");
    if let Some(content_type) = content_type {
        request = request.header(header::CONTENT_TYPE, content_type);
    }
    let response = app
        .oneshot(request.body(Body::from(body)).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .is_some_and(|v| v.as_bytes().starts_with(b"application/json"));
    assert!(is_json, "{status} reply was not JSON");
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn generator_with_key(key: &'static str, provider: &Arc<ScriptedProvider>) -> Generator {
    let config = Config::from_lookup(|name| (name == API_KEY_VAR).then(|| key.to_string())).unwrap();
    Generator::from_config_with(&config, |_, _| {
        provider.clone() as Arc<dyn CompletionProvider>
    })
}

async fn post_form(app: Router, uri: &str, body: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn brief() -> Value {
    json!({
        "channelName": "Sprout TV",
        "topic": "How bees make honey",
        "ageRange": "Ages 5-8",
        "tone": "Playful & Silly",
        "runtimeSeconds": 120,
        "cadence": "3 videos/week",
        "creativity": 0.5
    })
}

const PLAN: &str = r#"{"headline":"Buzzy Business","hook":"Ever wondered where honey comes from?","storyline":[{"beat":"Hook","timing":"0-5s"},{"beat":"Hive","timing":"5-20s"},{"beat":"Nectar","timing":"20-40s"},{"beat":"Outro","timing":"40-45s"}],"script":"HOST: Buzz!"}"#;

#[tokio::test]
async fn missing_credential_returns_500_without_calling_out() {
    let provider = ScriptedProvider::new(Reply::Text(PLAN));
    let app = create_routes(generator_with_key("   ", &provider));
    let (status, body) = post_json(app, brief()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        "Missing OPENAI_API_KEY. Add it to your environment to generate scripts."
    );
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn configured_key_reaches_the_provider() {
    let provider = ScriptedProvider::new(Reply::Text(PLAN));
    let app = create_routes(generator_with_key("sk-test", &provider));
    let (status, _) = post_json(app, brief()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn unreadable_briefs_get_a_json_error() {
    const MESSAGE: &str = "The brief could not be read. Check the fields and try again.";
    let cases = [
        (Some("application/json"), "{not json}", StatusCode::BAD_REQUEST),
        (
            Some("application/json"),
            r#"{"runtimeSeconds":45.5}"#,
            StatusCode::UNPROCESSABLE_ENTITY,
        ),
        (
            Some("application/json"),
            r#"{"creativity":"0.7"}"#,
            StatusCode::UNPROCESSABLE_ENTITY,
        ),
        (None, "{}", StatusCode::UNSUPPORTED_MEDIA_TYPE),
    ];
    for (content_type, body, expected) in cases {
        let provider = ScriptedProvider::new(Reply::Text(PLAN));
        let (status, reply) = post_raw(app(&provider), content_type, body.to_string()).await;
        assert_eq!(status, expected, "{body}");
        assert_eq!(reply["error"], MESSAGE, "{body}");
        assert_eq!(provider.calls(), 0);
    }
}

#[tokio::test]
async fn valid_json_is_returned_verbatim() {
    let provider = ScriptedProvider::new(Reply::Text(PLAN));
    let (status, body) = post_json(app(&provider), brief()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::from_str::<Value>(PLAN).unwrap());
    assert_eq!(provider.calls(), 1);

    let request = provider.last_request.lock().unwrap().clone().unwrap();
    assert!((request.temperature - 0.7).abs() < 1e-9);
    assert!(request.user_prompt.contains("90-second"));
    assert_eq!(request.system_prompt, kidshorts::prompt::SYSTEM_PROMPT);
}

#[tokio::test]
async fn fenced_json_is_unwrapped() {
    let provider = ScriptedProvider::new(Reply::Text(
        "```json\n{\"headline\":\"Buzzy Business\",\"storyline\":[]}\n```",
    ));
    let (status, body) = post_json(app(&provider), brief()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"headline": "Buzzy Business", "storyline": []}));
}

#[tokio::test]
async fn non_json_completion_is_a_formatting_failure() {
    let provider = ScriptedProvider::new(Reply::Text("Here is a fun idea about bees!"));
    let (status, body) = post_json(app(&provider), brief()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        "The AI response succeeded but formatting failed. Try again."
    );
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn provider_failure_is_502_without_leaking_details() {
    let provider = ScriptedProvider::new(Reply::Fail);
    let (status, body) = post_json(app(&provider), brief()).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let message = body["error"].as_str().unwrap();
    assert_eq!(
        message,
        "The AI service could not generate a script right now. Please try again."
    );
    assert!(!message.contains("quota"));
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn empty_completion_yields_empty_schema() {
    let provider = ScriptedProvider::new(Reply::Empty);
    let (status, body) = post_json(app(&provider), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["storyline"], json!([]));
    assert_eq!(body["metadata"]["hashtags"], json!([]));

    let request = provider.last_request.lock().unwrap().clone().unwrap();
    assert!((request.temperature - 0.8).abs() < 1e-9);
}

#[tokio::test]
async fn form_submit_renders_plan_and_quick_preview() {
    let provider = ScriptedProvider::new(Reply::Text(PLAN));
    let (status, html) = post_form(
        app(&provider),
        "/",
        "channelName=Sprout+TV&topic=Bees&runtimeSeconds=45&creativity=0.6",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Buzzy Business"));
    let preview_start = html.find(r#"id="quickPreview""#).unwrap();
    let preview_end = html.find(r#"id="plan""#).unwrap();
    let preview = &html[preview_start..preview_end];
    assert!(preview.contains("Nectar"));
    assert!(!preview.contains("Outro"));
    assert!(html.contains(r#"value="Sprout TV""#));
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn form_submit_renders_plan_with_null_fields() {
    let provider = ScriptedProvider::new(Reply::Text(
        r#"{"headline":"Bees","hook":null,"storyline":[{"beat":"Hook","timing":"0-5s","soundDesign":null}],"metadata":{"hashtags":null}}"#,
    ));
    let (status, html) = post_form(app(&provider), "/", "topic=Bees").await;
    assert_eq!(status, StatusCode::OK);
    assert!(!html.contains(r#"id="error""#));
    assert!(html.contains(r#"id="quickPreview""#));
    assert!(html.contains("Bees"));
}

#[tokio::test]
async fn form_submit_shows_error_message() {
    let provider = ScriptedProvider::new(Reply::Fail);
    let (status, html) = post_form(app(&provider), "/", "topic=Bees").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(r#"id="error""#));
    assert!(html.contains("could not generate a script right now"));
    assert!(!html.contains(r#"id="quickPreview""#));
}

#[tokio::test]
async fn reset_restores_the_default_form() {
    let provider = ScriptedProvider::new(Reply::Text(PLAN));
    let (status, html) = post_form(
        app(&provider),
        "/reset",
        "channelName=Sprout+TV&ageRange=Ages+13%2B&runtimeSeconds=80",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(!html.contains(r#"value="Sprout TV""#));
    assert!(html.contains(r#"<option value="Ages 5-8" selected>"#));
    assert!(html.contains(r#"value="45""#));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn index_and_health() {
    let app = create_routes(Generator::unconfigured());
    let response = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    assert!(String::from_utf8_lossy(&bytes).contains("Generation is disabled"));

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
