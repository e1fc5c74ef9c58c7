use std::sync::Arc;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use crate::{
    config::Config,
    models::Brief,
    prompt::{build_user_prompt, SYSTEM_PROMPT},
    provider::{CompletionProvider, CompletionRequest, OpenAiProvider},
};

/// Returned in place of a completion that carried no text.
pub const FALLBACK_COMPLETION: &str = r#"{"headline":"","hook":"","storyline":[],"script":"","educationalMoments":[],"callToAction":"","safetyChecklist":[],"metadata":{"description":"","hashtags":[],"keywords":[],"publishingTip":""},"thumbnailIdeas":[],"repurposingIdeas":[]}"#;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GenerateError {
    #[error("Missing OPENAI_API_KEY. Add it to your environment to generate scripts.")]
    MissingCredential,

    #[error("The AI service could not generate a script right now. Please try again.")]
    Provider,

    #[error("The AI response succeeded but formatting failed. Try again.")]
    Formatting,

    #[error("The brief could not be read. Check the fields and try again.")]
    InvalidBrief(StatusCode),
}

impl From<JsonRejection> for GenerateError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!("Rejected brief: {rejection}");
        let status = match rejection {
            JsonRejection::JsonDataError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            JsonRejection::MissingJsonContentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            _ => StatusCode::BAD_REQUEST,
        };
        GenerateError::InvalidBrief(status)
    }
}

impl GenerateError {
    pub fn status(&self) -> StatusCode {
        match self {
            GenerateError::MissingCredential | GenerateError::Formatting => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            GenerateError::Provider => StatusCode::BAD_GATEWAY,
            GenerateError::InvalidBrief(status) => *status,
        }
    }
}

impl IntoResponse for GenerateError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

/// Stateless generation pipeline shared by the JSON endpoint and the form page.
#[derive(Clone, Default)]
pub struct Generator {
    provider: Option<Arc<dyn CompletionProvider>>,
}

impl Generator {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// Uses the OpenAI-compatible provider when an API key is configured.
    pub fn from_config(config: &Config) -> Self {
        Self::from_config_with(config, |config, api_key| {
            Arc::new(OpenAiProvider::new(&config.base_url, api_key, &config.model))
        })
    }

    /// Like [`Generator::from_config`], with the provider built by `build`.
    /// `build` only runs when a key is present.
    pub fn from_config_with<F>(config: &Config, build: F) -> Self
    where
        F: FnOnce(&Config, &str) -> Arc<dyn CompletionProvider>,
    {
        match &config.api_key {
            Some(api_key) => {
                tracing::info!(model = %config.model, "Generation enabled");
                Self::new(build(config, api_key))
            }
            None => {
                tracing::warn!("OPENAI_API_KEY is not set; generation requests will fail");
                Self::unconfigured()
            }
        }
    }

    /// A generator with no credential configured; every call fails fast.
    pub fn unconfigured() -> Self {
        Self::default()
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// Runs one brief through exactly one provider call.
    pub async fn generate(&self, brief: &Brief) -> Result<Value, GenerateError> {
        let provider = self
            .provider
            .as_ref()
            .ok_or(GenerateError::MissingCredential)?;

        let request = CompletionRequest {
            system_prompt: SYSTEM_PROMPT.to_string(),
            user_prompt: build_user_prompt(brief),
            temperature: brief.temperature(),
        };
        tracing::debug!(
            temperature = request.temperature,
            runtime = brief.effective_runtime(),
            "Requesting completion"
        );

        let completion = provider.complete(request).await.map_err(|e| {
            tracing::error!("Provider call failed: {e}");
            GenerateError::Provider
        })?;

        let text = completion.unwrap_or_else(|| FALLBACK_COMPLETION.to_string());
        parse_completion(&text)
    }
}

/// Parses completion text, retrying once with code fences removed.
pub fn parse_completion(text: &str) -> Result<Value, GenerateError> {
    if let Ok(value) = serde_json::from_str(text) {
        return Ok(value);
    }

    let cleaned = text.replace("```json", "").replace("```", "");
    serde_json::from_str(cleaned.trim()).map_err(|e| {
        tracing::warn!("Completion is not valid JSON: {e}");
        GenerateError::Formatting
    })
}
