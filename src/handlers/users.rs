use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use crate::db::Database;
use crate::error::AppError;
use crate::models::User;

// GET /api/users
pub async fn list(State(db): State<Arc<Database>>) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(db.list_users().await?))
}

// GET /api/users/{id}
pub async fn get_by_id(
    State(db): State<Arc<Database>>,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, AppError> {
    db.get_user(id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("user"))
}
