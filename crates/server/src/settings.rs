//! Profile endpoints, including the category list administration.

use api_types::settings::{CategoryAdd, CategoryKind as ApiKind, CategoryRemove, CategoryRename};
use axum::{Json, extract::State};

use crate::{ServerError, server::ServerState};
use engine::{CategoryKind, Profile};

fn map_kind(kind: ApiKind) -> CategoryKind {
    match kind {
        ApiKind::Income => CategoryKind::Income,
        ApiKind::Expense => CategoryKind::Expense,
        ApiKind::ProjectType => CategoryKind::ProjectType,
        ApiKind::EventType => CategoryKind::EventType,
    }
}

pub async fn get_profile(
    State(state): State<ServerState>,
) -> Result<Json<Option<Profile>>, ServerError> {
    Ok(Json(state.engine.read().await.profile()))
}

pub async fn save_profile(
    State(state): State<ServerState>,
    Json(payload): Json<Profile>,
) -> Result<Json<Profile>, ServerError> {
    Ok(Json(state.engine.write().await.save_profile(payload).await?))
}

pub async fn add_category(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryAdd>,
) -> Result<Json<Profile>, ServerError> {
    let profile = state
        .engine
        .write()
        .await
        .add_category(map_kind(payload.kind), &payload.name)
        .await?;
    Ok(Json(profile))
}

pub async fn rename_category(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryRename>,
) -> Result<Json<Profile>, ServerError> {
    let profile = state
        .engine
        .write()
        .await
        .rename_category(map_kind(payload.kind), &payload.from, &payload.to)
        .await?;
    Ok(Json(profile))
}

pub async fn remove_category(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryRemove>,
) -> Result<Json<Profile>, ServerError> {
    let profile = state
        .engine
        .write()
        .await
        .remove_category(map_kind(payload.kind), &payload.name)
        .await?;
    Ok(Json(profile))
}
