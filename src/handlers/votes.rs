use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use log::info;
use uuid::Uuid;

use crate::db::Database;
use crate::error::AppError;
use crate::models::{NewVote, Vote};
use crate::voting::report::aggregate;
use crate::voting::{Period, Report, validate};

// GET /api/votes
pub async fn list(State(db): State<Arc<Database>>) -> Result<Json<Vec<Vote>>, AppError> {
    Ok(Json(db.list_votes().await?))
}

// GET /api/votes/{id}
pub async fn get_by_id(
    State(db): State<Arc<Database>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vote>, AppError> {
    db.get_vote(id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("vote"))
}

// POST /api/votes
//
// Stamps the id and timestamp, runs the validator over a snapshot of users
// and votes, and persists only on acceptance. The store's unique index is the
// backstop for two submissions racing past the same snapshot.
pub async fn create(
    State(db): State<Arc<Database>>,
    Json(payload): Json<NewVote>,
) -> Result<(StatusCode, Json<Vote>), AppError> {
    let users = db.list_users().await?;

    // Cached display names; left empty when the lookup misses, in which case
    // the validator rejects before the vote is ever stored.
    let voting_user_name = users
        .iter()
        .find(|u| u.id == payload.voting_user_id)
        .map(|u| u.name.clone())
        .unwrap_or_default();
    let voted_user_name = users
        .iter()
        .find(|u| u.id == payload.voted_user_id)
        .map(|u| u.name.clone())
        .unwrap_or_default();

    let vote = Vote::new(payload, voting_user_name, voted_user_name);

    let votes = db.list_votes().await?;
    validate::validate(&vote, &users, &votes)?;

    db.insert_vote(&vote).await?;
    info!(
        "vote {} recorded: {} -> {} ({})",
        vote.id,
        vote.voting_user_name,
        vote.voted_user_name,
        vote.nomination.label()
    );

    Ok((StatusCode::CREATED, Json(vote)))
}

// PUT /api/votes/{id}
pub async fn replace(
    State(db): State<Arc<Database>>,
    Path(id): Path<Uuid>,
    Json(vote): Json<Vote>,
) -> Result<StatusCode, AppError> {
    if id != vote.id {
        return Err(AppError::BadRequest(
            "path id does not match the vote id".to_string(),
        ));
    }

    db.replace_vote(&vote).await?;
    info!("vote {} replaced", vote.id);

    Ok(StatusCode::NO_CONTENT)
}

// DELETE /api/votes/{id}
pub async fn delete(
    State(db): State<Arc<Database>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vote>, AppError> {
    let deleted = db.delete_vote(id).await?.ok_or(AppError::NotFound("vote"))?;
    info!("vote {} deleted", id);
    Ok(Json(deleted))
}

// GET /api/votes/admin/{admin_id}/report/{period}
pub async fn report(
    State(db): State<Arc<Database>>,
    Path((admin_id, period)): Path<(Uuid, String)>,
) -> Result<Json<Report>, AppError> {
    let admin = db
        .get_user(admin_id)
        .await?
        .ok_or(AppError::NotFound("user"))?;

    if !admin.is_admin {
        return Err(AppError::PermissionDenied);
    }

    let period: Period = period.parse().map_err(AppError::BadRequest)?;

    let users = db.list_users().await?;
    let votes = db.list_votes().await?;

    aggregate(period, &users, &votes)
        .map(Json)
        .ok_or_else(|| AppError::Precondition(format!("no votes recorded for period {}", period)))
}
