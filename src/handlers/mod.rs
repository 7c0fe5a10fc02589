pub mod users;
pub mod votes;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use crate::db::Database;

/// Build the API router. All state the handlers need is the shared database
/// handle; the voting core itself is pure and stateless.
pub fn router(database: Arc<Database>) -> Router {
    Router::new()
        .route("/api/votes", get(votes::list).post(votes::create))
        .route(
            "/api/votes/:id",
            get(votes::get_by_id).put(votes::replace).delete(votes::delete),
        )
        .route(
            "/api/votes/admin/:admin_id/report/:period",
            get(votes::report),
        )
        .route("/api/users", get(users::list))
        .route("/api/users/:id", get(users::get_by_id))
        .with_state(database)
}
