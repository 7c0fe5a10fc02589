use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::error;
use serde_json::json;
use thiserror::Error;

use crate::voting::validate::VoteRejection;

/// Service-wide error taxonomy. Validation and permission failures are
/// ordinary values the caller can branch on; only storage faults are opaque.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("you don't have admin permissions")]
    PermissionDenied,

    #[error(transparent)]
    Validation(#[from] VoteRejection),

    #[error("{0}")]
    Precondition(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("corrupt row: {0}")]
    Decode(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::PermissionDenied => StatusCode::FORBIDDEN,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Precondition(_) => StatusCode::PRECONDITION_FAILED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Decode(_) => {
                error!("internal error: {}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_taxonomy() {
        let cases = [
            (AppError::NotFound("vote"), StatusCode::NOT_FOUND),
            (AppError::PermissionDenied, StatusCode::FORBIDDEN),
            (
                AppError::Validation(VoteRejection::SelfVote),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                AppError::Precondition("no votes".into()),
                StatusCode::PRECONDITION_FAILED,
            ),
            (AppError::Conflict("stale".into()), StatusCode::CONFLICT),
            (AppError::BadRequest("id mismatch".into()), StatusCode::BAD_REQUEST),
            (AppError::Decode("bad uuid".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn rejection_message_passes_through() {
        let err = AppError::Validation(VoteRejection::SelfVote);
        assert_eq!(
            err.to_string(),
            "voting and voted employee can't be the same person"
        );
    }
}
