//! `/wallets` routes.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use mystash_types::wallet::Wallet;
use mystash_types::Paginated;

use super::{ok, Enveloped};
use crate::error::ServiceResult;
use crate::params::PageQuery;
use crate::services::wallets;
use crate::state::SharedState;

pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/wallets", get(list))
        .route("/wallets/:id", get(by_id))
        .route("/wallets/auth/:auth_id", get(by_auth))
}

async fn list(State(state): State<SharedState>, Query(q): Query<PageQuery>) -> ServiceResult<Json<Paginated<Wallet>>> {
    wallets::list(&state, q.request()).await.map(Json)
}

async fn by_id(State(state): State<SharedState>, Path(id): Path<String>) -> Enveloped<Wallet> {
    let wallet = wallets::by_id(&state, &id).await?;
    Ok(ok("Wallet retrieved successfully", wallet))
}

async fn by_auth(
    State(state): State<SharedState>,
    Path(auth_id): Path<String>,
    Query(q): Query<PageQuery>,
) -> Enveloped<Paginated<Wallet>> {
    let page = wallets::by_auth(&state, &auth_id, q.request()).await?;
    Ok(ok("User wallets retrieved successfully", page))
}
