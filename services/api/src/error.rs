//! Custom error types for the API service

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{models::MessageResponse, validation::ValidationError};

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Mutating request without a login session
    #[error("Not authenticated")]
    Unauthenticated,

    /// Payload failed validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Body could not be read as the expected JSON
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// No record with the requested id
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Session could not be destroyed
    #[error("Error logging out")]
    LogoutFailed,

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Unauthenticated => (StatusCode::UNAUTHORIZED, self.to_string()),
            ApiError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::LogoutFailed | ApiError::InternalServerError => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        (status, Json(MessageResponse::new(message))).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    async fn render(err: ApiError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_status_and_message_mapping() {
        assert_eq!(
            render(ApiError::Unauthenticated).await,
            (StatusCode::UNAUTHORIZED, json!({"message": "Not authenticated"}))
        );
        assert_eq!(
            render(ApiError::NotFound("Movie")).await,
            (StatusCode::NOT_FOUND, json!({"message": "Movie not found"}))
        );
        assert_eq!(
            render(ValidationError::InvalidRating.into()).await,
            (
                StatusCode::BAD_REQUEST,
                json!({"message": "Rating must be a number between 0 and 10."})
            )
        );
        assert_eq!(
            render(ApiError::LogoutFailed).await,
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"message": "Error logging out"})
            )
        );
    }

    #[tokio::test]
    async fn test_server_errors_stay_generic() {
        let (status, body) = render(ApiError::InternalServerError).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"message": "Internal server error"}));
    }
}
