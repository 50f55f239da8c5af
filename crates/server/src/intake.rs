//! Public intake: the unauthenticated suggestion form.

use api_types::intake::Suggestion;
use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;

use crate::{ServerError, server::ServerState};
use engine::Lead;

pub async fn suggestion_new(
    State(state): State<ServerState>,
    Json(payload): Json<Suggestion>,
) -> Result<(StatusCode, Json<Lead>), ServerError> {
    let today = Utc::now().date_naive();
    let lead = state
        .engine
        .write()
        .await
        .submit_suggestion(payload.name, payload.whatsapp, payload.message, today)
        .await?;
    Ok((StatusCode::CREATED, Json(lead)))
}
