//! `/transfers` routes.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use mystash_types::ledger::Transfer;
use mystash_types::Paginated;

use super::{ok, Enveloped};
use crate::error::ServiceResult;
use crate::params::PageQuery;
use crate::services::transfers;
use crate::state::SharedState;

pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/transfers", get(list))
        .route("/transfers/:id", get(by_id))
        .route("/transfers/auth/:auth_id", get(by_auth))
        .route("/transfers/status/:status", get(by_status))
}

async fn list(State(state): State<SharedState>, Query(q): Query<PageQuery>) -> ServiceResult<Json<Paginated<Transfer>>> {
    transfers::list(&state, q.request()).await.map(Json)
}

async fn by_id(State(state): State<SharedState>, Path(id): Path<String>) -> Enveloped<Transfer> {
    let transfer = transfers::by_id(&state, &id).await?;
    Ok(ok("Transfer retrieved successfully", transfer))
}

async fn by_auth(
    State(state): State<SharedState>,
    Path(auth_id): Path<String>,
    Query(q): Query<PageQuery>,
) -> ServiceResult<Json<Paginated<Transfer>>> {
    transfers::by_auth(&state, &auth_id, q.request()).await.map(Json)
}

async fn by_status(
    State(state): State<SharedState>,
    Path(status): Path<String>,
    Query(q): Query<PageQuery>,
) -> ServiceResult<Json<Paginated<Transfer>>> {
    transfers::by_status(&state, &status, q.request()).await.map(Json)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use mystash_db::fixtures;
    use mystash_db::queries::transfers as transfer_rows;
    use mystash_types::ObjectId;

    use crate::routes::router;
    use crate::routes::testing::{get, test_state};

    #[tokio::test]
    async fn test_by_status() {
        let state = test_state();
        state
            .stores
            .service
            .run(|c| transfer_rows::insert(c, &fixtures::transfer(ObjectId::new())))
            .await
            .expect("seed");
        let app = router(state);

        let (status, body) = get(app.clone(), "/v1/transfers/status/pending").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pagination"]["total"], 1);

        let (status, body) = get(app, "/v1/transfers/status/lost").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }
}
