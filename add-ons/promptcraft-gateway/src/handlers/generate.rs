//! `POST /api/generate/{website,apk}`: run the relay and map its result to HTTP.
//!
//! Validation failures answer 400; upstream and persistence failures answer 500.
//! Bodies that are not valid JSON are treated as a missing prompt; bodies over the
//! request size limit answer 413.

use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use promptcraft_core::{success_body, ArtifactKind, ErrorResponse, FailureKind, GenerateBody, GenerationResult};

pub const PROMPT_TOO_LARGE_MESSAGE: &str = "Prompt is too large.";

pub async fn generate_website(
    State(state): State<AppState>,
    body: Result<Json<GenerateBody>, JsonRejection>,
) -> Response {
    relay(&state, ArtifactKind::Website, body).await
}

pub async fn generate_apk(
    State(state): State<AppState>,
    body: Result<Json<GenerateBody>, JsonRejection>,
) -> Response {
    relay(&state, ArtifactKind::App, body).await
}

async fn relay(state: &AppState, kind: ArtifactKind, body: Result<Json<GenerateBody>, JsonRejection>) -> Response {
    let prompt = match body {
        Ok(Json(b)) => b.prompt,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            tracing::warn!(%kind, "request body over size limit: {}", rejection);
            let body = ErrorResponse {
                success: false,
                error: PROMPT_TOO_LARGE_MESSAGE.to_string(),
                error_kind: Some(FailureKind::Validation),
            };
            return (StatusCode::PAYLOAD_TOO_LARGE, Json(body)).into_response();
        }
        Err(rejection) => {
            tracing::debug!(%kind, "unreadable request body: {}", rejection);
            String::new()
        }
    };

    if !prompt.trim().is_empty() {
        tracing::info!(%kind, "generating for prompt: {}", prompt);
    }

    match state.relay.generate(kind, &prompt).await {
        GenerationResult::Succeeded(artifact) => (StatusCode::OK, Json(success_body(artifact))).into_response(),
        GenerationResult::Failed(failure) => {
            let status = status_for(failure.kind);
            (status, Json(ErrorResponse::from(&failure))).into_response()
        }
    }
}

fn status_for(kind: FailureKind) -> StatusCode {
    match kind {
        FailureKind::Validation => StatusCode::BAD_REQUEST,
        FailureKind::Upstream | FailureKind::Persistence => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
