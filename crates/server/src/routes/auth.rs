use axum::{extract::State, http::StatusCode, Json};
use common::types::StatusReply;
use service::auth::domain::CredentialsInput;

use super::ServerState;
use crate::errors::ApiError;

/// `POST /api/signup`
pub async fn signup(
    State(state): State<ServerState>,
    Json(input): Json<CredentialsInput>,
) -> Result<(StatusCode, Json<StatusReply>), ApiError> {
    state.stores.credentials.register(input.username(), input.password()).await?;
    Ok((StatusCode::CREATED, Json(StatusReply::success())))
}

/// `POST /api/login`. No session is issued; success only confirms the credentials.
pub async fn login(
    State(state): State<ServerState>,
    Json(input): Json<CredentialsInput>,
) -> Result<Json<StatusReply>, ApiError> {
    state.stores.credentials.authenticate(input.username(), input.password()).await?;
    Ok(Json(StatusReply::success()))
}
