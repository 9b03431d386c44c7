//! `/old-users` routes.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use mystash_types::legacy::{LegacyTransaction, LegacyUser, LegacyUserStatistics, LegacyUserView};
use mystash_types::ledger::{Payment, PaymentStats};
use mystash_types::Paginated;

use super::{ok, Enveloped};
use crate::error::ServiceResult;
use crate::params::PageQuery;
use crate::services::legacy_users;
use crate::state::SharedState;

pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/old-users", get(list))
        .route("/old-users/email/:email", get(by_email))
        .route("/old-users/uid/:uid", get(by_uid))
        .route("/old-users/statistics/:uid", get(statistics))
        .route("/old-users/transactions/:uid", get(transactions))
        .route("/old-users/payments/:uid", get(payments))
        .route("/old-users/payment-stats/:uid", get(payment_stats))
}

async fn list(
    State(state): State<SharedState>,
    Query(q): Query<PageQuery>,
) -> ServiceResult<Json<Paginated<LegacyUserView>>> {
    legacy_users::list(&state, q.request()).await.map(Json)
}

async fn by_email(State(state): State<SharedState>, Path(email): Path<String>) -> Enveloped<LegacyUser> {
    let user = legacy_users::by_email(&state, &email).await?;
    Ok(ok("User retrieved successfully", user))
}

async fn by_uid(State(state): State<SharedState>, Path(uid): Path<String>) -> Enveloped<LegacyUser> {
    let user = legacy_users::by_uid(&state, &uid).await?;
    Ok(ok("User retrieved successfully", user))
}

async fn statistics(State(state): State<SharedState>, Path(uid): Path<String>) -> Enveloped<LegacyUserStatistics> {
    let stats = legacy_users::statistics(&state, &uid).await?;
    Ok(ok("User statistics retrieved successfully", stats))
}

async fn transactions(
    State(state): State<SharedState>,
    Path(uid): Path<String>,
    Query(q): Query<PageQuery>,
) -> Enveloped<Paginated<LegacyTransaction>> {
    let page = legacy_users::transactions(&state, &uid, q.request()).await?;
    Ok(ok("User transactions retrieved successfully", page))
}

async fn payments(
    State(state): State<SharedState>,
    Path(uid): Path<String>,
    Query(q): Query<PageQuery>,
) -> Enveloped<Paginated<Payment>> {
    let page = legacy_users::payments(&state, &uid, q.request()).await?;
    Ok(ok("User payments retrieved successfully", page))
}

async fn payment_stats(State(state): State<SharedState>, Path(uid): Path<String>) -> Enveloped<PaymentStats> {
    let stats = legacy_users::payment_stats(&state, &uid).await?;
    Ok(ok("User payment statistics retrieved successfully", stats))
}
