use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Form, Router,
};
use serde_json::Value;

use crate::{
    form::{BriefFields, BriefForm, SubmitError},
    generator::{GenerateError, Generator},
    models::{Brief, GeneratedPlan},
    page,
};

pub fn create_routes(generator: Generator) -> Router {
    Router::new()
        .route("/", get(index).post(submit_form))
        .route("/reset", post(reset_form))
        .route("/api/generate", post(generate))
        .route("/health", get(health_check))
        .with_state(generator)
}

async fn index(State(generator): State<Generator>) -> Html<String> {
    Html(page::render(&BriefForm::default(), generator.is_configured()))
}

async fn reset_form(State(generator): State<Generator>) -> Html<String> {
    Html(page::render(&BriefForm::default(), generator.is_configured()))
}

// Same generation path as the JSON endpoint, rendered back into the page.
async fn submit_form(
    State(generator): State<Generator>,
    Form(fields): Form<BriefFields>,
) -> Html<String> {
    let mut form = BriefForm::with_brief(fields.into_brief());
    let brief = form.begin_submission();

    let outcome = match generator.generate(&brief).await {
        Ok(value) => serde_json::from_value::<GeneratedPlan>(value).map_err(|e| {
            tracing::warn!("Plan does not match the expected shape: {e}");
            SubmitError::Unreadable
        }),
        Err(e) => Err(SubmitError::from(e)),
    };
    form.finish(outcome);

    Html(page::render(&form, generator.is_configured()))
}

// Accept a JSON brief and return the provider's JSON verbatim
async fn generate(
    State(generator): State<Generator>,
    payload: Result<Json<Brief>, JsonRejection>,
) -> Result<Json<Value>, GenerateError> {
    let Json(brief) = payload?;
    let plan = generator.generate(&brief).await?;
    Ok(Json(plan))
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}
