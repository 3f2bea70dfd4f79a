use axum::{extract::State, Json};
use common::types::StatusReply;
use serde::Deserialize;
use serde_json::Number;
use service::leaderboard::{store::RankingsDocument, ScoreSubmission};

use super::ServerState;
use crate::errors::ApiError;

#[derive(Debug, Deserialize)]
pub struct SaveScoreRequest {
    #[serde(default)]
    pub song_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub score: Option<Number>,
    #[serde(default)]
    pub accuracy: Option<Number>,
    #[serde(default)]
    pub grade: Option<String>,
}

/// `GET /api/get_rankings`
pub async fn get_rankings(State(state): State<ServerState>) -> Result<Json<RankingsDocument>, ApiError> {
    Ok(Json(state.stores.leaderboard.list().await?))
}

/// `POST /api/save_score`
pub async fn save_score(
    State(state): State<ServerState>,
    Json(req): Json<SaveScoreRequest>,
) -> Result<Json<StatusReply>, ApiError> {
    let submission = ScoreSubmission {
        username: req.username,
        score: req.score,
        accuracy: req.accuracy,
        grade: req.grade,
    };
    state
        .stores
        .leaderboard
        .submit(req.song_name.as_deref().unwrap_or_default(), submission)
        .await?;
    Ok(Json(StatusReply::success()))
}
