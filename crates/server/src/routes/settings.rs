use axum::{
    extract::{Query, State},
    Json,
};
use common::types::StatusReply;
use serde::Deserialize;
use serde_json::Value;

use super::ServerState;
use crate::errors::ApiError;

#[derive(Debug, Deserialize)]
pub struct SettingsQuery {
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SaveSettingsRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub settings: Value,
}

/// `GET /api/get_settings?username=`
pub async fn get_settings(
    State(state): State<ServerState>,
    Query(q): Query<SettingsQuery>,
) -> Result<Json<Value>, ApiError> {
    let settings = state.stores.settings.get(q.username.as_deref().unwrap_or_default()).await?;
    Ok(Json(settings))
}

/// `POST /api/save_settings`
pub async fn save_settings(
    State(state): State<ServerState>,
    Json(req): Json<SaveSettingsRequest>,
) -> Result<Json<StatusReply>, ApiError> {
    state.stores.settings.put(req.username.as_deref().unwrap_or_default(), req.settings).await?;
    Ok(Json(StatusReply::success()))
}
