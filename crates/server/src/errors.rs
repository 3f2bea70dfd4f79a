use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::errors::StoreError;
use thiserror::Error;
use tracing::error;

/// Store failure rendered as `{"error": msg}` with a matching status code.
#[derive(Debug)]
pub struct ApiError(pub StoreError);

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        Self(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            StoreError::InvalidInput(_) | StoreError::AlreadyExists(_) => StatusCode::BAD_REQUEST,
            StoreError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            StoreError::Unauthorized => StatusCode::FORBIDDEN,
            StoreError::CorruptDocument { .. } | StoreError::StorageUnavailable { .. } | StoreError::Hashing(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if self.0.is_internal() {
            error!(code = self.0.code(), error = %self.0, "store failure");
        }
        (status, Json(serde_json::json!({"error": self.0.to_string()}))).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("runtime check failed: {0}")]
    Runtime(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(ApiError(StoreError::invalid("x")).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError(StoreError::AlreadyExists("u".into())).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError(StoreError::InvalidCredentials).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError(StoreError::Unauthorized).status(), StatusCode::FORBIDDEN);
        let io = std::io::Error::other("disk");
        assert_eq!(
            ApiError(StoreError::StorageUnavailable { resource: "users", source: io }).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
