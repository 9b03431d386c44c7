//! `/old-transactions` routes.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use mystash_types::ledger::RecentActivity;
use mystash_types::legacy::LegacyTransaction;
use mystash_types::Paginated;

use super::{ok, DateRangeQuery, Enveloped};
use crate::error::ServiceResult;
use crate::params::PageQuery;
use crate::services::legacy_transactions::{self, LegacyHistory};
use crate::state::SharedState;

pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/old-transactions", get(list))
        .route("/old-transactions/tnx/:id", get(by_id))
        .route("/old-transactions/recent/:uid", get(recent))
        .route("/old-transactions/user/email/:email", get(by_email))
        .route("/old-transactions/date-range", get(date_range))
}

async fn list(
    State(state): State<SharedState>,
    Query(q): Query<PageQuery>,
) -> ServiceResult<Json<Paginated<LegacyTransaction>>> {
    legacy_transactions::list(&state, q.request()).await.map(Json)
}

async fn by_id(State(state): State<SharedState>, Path(id): Path<String>) -> Enveloped<LegacyTransaction> {
    let tx = legacy_transactions::by_id(&state, &id).await?;
    Ok(ok("Transaction retrieved successfully", tx))
}

async fn recent(
    State(state): State<SharedState>,
    Path(uid): Path<String>,
) -> Enveloped<RecentActivity<LegacyTransaction>> {
    let activity = legacy_transactions::recent(&state, &uid).await?;
    Ok(ok("Recent transactions retrieved successfully", activity))
}

async fn by_email(
    State(state): State<SharedState>,
    Path(email): Path<String>,
    Query(q): Query<PageQuery>,
) -> Enveloped<LegacyHistory> {
    let history = legacy_transactions::by_email(&state, &email, q.request()).await?;
    Ok(ok("User transactions retrieved successfully", history))
}

async fn date_range(
    State(state): State<SharedState>,
    Query(q): Query<DateRangeQuery>,
) -> Enveloped<Vec<LegacyTransaction>> {
    let found = legacy_transactions::date_range_search(
        &state,
        q.start_date.as_deref(),
        q.end_date.as_deref(),
        q.uid.as_deref(),
    )
    .await?;
    Ok(ok("Transactions retrieved successfully for the specified date range", found))
}
