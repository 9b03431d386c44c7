//! `/health` routes.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::services::health::{self, DatabaseHealth, DetailedHealth, Health};
use crate::state::SharedState;

pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/health", get(status))
        .route("/health/detailed", get(detailed))
        .route("/health/database", get(database))
}

async fn status(State(state): State<SharedState>) -> Json<Health> {
    Json(health::health(&state))
}

async fn detailed(State(state): State<SharedState>) -> Json<DetailedHealth> {
    Json(health::detailed(&state))
}

async fn database(State(state): State<SharedState>) -> Json<DatabaseHealth> {
    Json(health::database(&state).await)
}
