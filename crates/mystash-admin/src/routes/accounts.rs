//! `/accounts` routes.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use mystash_types::wallet::Account;
use mystash_types::Paginated;

use super::{ok, Enveloped};
use crate::error::ServiceResult;
use crate::params::PageQuery;
use crate::services::accounts;
use crate::state::SharedState;

pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/accounts", get(list))
        .route("/accounts/:id", get(by_id))
}

async fn list(State(state): State<SharedState>, Query(q): Query<PageQuery>) -> ServiceResult<Json<Paginated<Account>>> {
    accounts::list(&state, q.request()).await.map(Json)
}

async fn by_id(State(state): State<SharedState>, Path(id): Path<String>) -> Enveloped<Account> {
    let account = accounts::by_id(&state, &id).await?;
    Ok(ok("Account retrieved successfully", account))
}
