use axum::{extract::State, Json};
use common::types::StatusReply;
use serde::Deserialize;
use serde_json::Value;

use super::ServerState;
use crate::errors::ApiError;

#[derive(Debug, Deserialize)]
pub struct UpdateSongsRequest {
    #[serde(default)]
    pub admin_user: Option<String>,
    #[serde(default)]
    pub songs: Value,
}

/// `GET /api/songs`
pub async fn list_songs(State(state): State<ServerState>) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.stores.charts.songs().await?))
}

/// `POST /api/update_songs`. The requester name comes from the body, which is
/// exactly as trustworthy as the single-admin check it feeds.
pub async fn update_songs(
    State(state): State<ServerState>,
    Json(req): Json<UpdateSongsRequest>,
) -> Result<Json<StatusReply>, ApiError> {
    state
        .stores
        .charts
        .replace_all(req.songs, req.admin_user.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(StatusReply::success()))
}
