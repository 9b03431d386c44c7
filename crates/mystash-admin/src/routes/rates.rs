//! `/rates` routes.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::Router;
use mystash_types::ledger::Rate;
use serde::Deserialize;

use super::{ok, Enveloped};
use crate::services::rates;
use crate::state::SharedState;

#[derive(Debug, Default, Deserialize)]
struct PairQuery {
    source: Option<String>,
    destination: Option<String>,
}

pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/rates", get(list))
        .route("/rates/active", get(active))
        .route("/rates/currency-pair", get(by_currency_pair))
        .route("/rates/public/:public_id", get(by_public_id))
        .route("/rates/:id", get(by_id))
}

async fn list(State(state): State<SharedState>) -> Enveloped<Vec<Rate>> {
    let found = rates::list(&state).await?;
    Ok(ok("Rates retrieved successfully", found))
}

async fn active(State(state): State<SharedState>) -> Enveloped<Vec<Rate>> {
    let found = rates::active(&state).await?;
    Ok(ok("Active rates retrieved successfully", found))
}

async fn by_currency_pair(State(state): State<SharedState>, Query(q): Query<PairQuery>) -> Enveloped<Rate> {
    let rate = rates::by_currency_pair(&state, q.source.as_deref(), q.destination.as_deref()).await?;
    Ok(ok("Rate retrieved successfully", rate))
}

async fn by_public_id(State(state): State<SharedState>, Path(public_id): Path<String>) -> Enveloped<Rate> {
    let rate = rates::by_public_id(&state, &public_id).await?;
    Ok(ok("Rate retrieved successfully", rate))
}

async fn by_id(State(state): State<SharedState>, Path(id): Path<String>) -> Enveloped<Rate> {
    let rate = rates::by_id(&state, &id).await?;
    Ok(ok("Rate retrieved successfully", rate))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use mystash_db::fixtures;
    use mystash_db::queries::rates as rate_rows;

    use crate::routes::router;
    use crate::routes::testing::{get, test_state};

    #[tokio::test]
    async fn test_currency_pair_route() {
        let state = test_state();
        state
            .stores
            .service
            .run(|c| rate_rows::insert(c, &fixtures::rate("USD", "NGN", 1500.0)))
            .await
            .expect("seed");
        let app = router(state);

        let (status, body) = get(app.clone(), "/v1/rates/currency-pair?source=USD&destination=NGN").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["rate"], 1500.0);

        let (status, body) = get(app.clone(), "/v1/rates/currency-pair?source=USD").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Source and destination currencies are required");

        let (status, body) = get(app, "/v1/rates/currency-pair?source=EUR&destination=NGN").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Rate not found");
    }
}
