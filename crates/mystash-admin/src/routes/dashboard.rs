//! `/dashboard` routes. Figures are returned without an envelope.

use std::collections::BTreeMap;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use mystash_types::reports::{DashboardAggregate, SavingsAggregate, SignupPoint};
use serde::Deserialize;

use crate::error::ServiceResult;
use crate::services::dashboard;
use crate::state::SharedState;

#[derive(Debug, Default, Deserialize)]
struct YearQuery {
    year: Option<String>,
}

pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/dashboard/aggregate", get(aggregate))
        .route("/dashboard/chart/signups", get(signup_chart))
        .route("/dashboard/chart/signups/all-years", get(signup_chart_all_years))
        .route("/dashboard/savings/aggregate", get(savings_aggregate))
}

async fn aggregate(State(state): State<SharedState>) -> ServiceResult<Json<DashboardAggregate>> {
    dashboard::aggregate(&state).await.map(Json)
}

async fn signup_chart(State(state): State<SharedState>, Query(q): Query<YearQuery>) -> Json<Vec<SignupPoint>> {
    Json(dashboard::signup_chart(&state, q.year.as_deref()).await)
}

async fn signup_chart_all_years(State(state): State<SharedState>) -> Json<BTreeMap<String, Vec<SignupPoint>>> {
    Json(dashboard::signup_chart_all_years(&state).await)
}

async fn savings_aggregate(State(state): State<SharedState>) -> ServiceResult<Json<SavingsAggregate>> {
    dashboard::savings_aggregate(&state).await.map(Json)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::routes::router;
    use crate::routes::testing::{get, test_state};

    #[tokio::test]
    async fn test_aggregate_is_unwrapped() {
        let (status, body) = get(router(test_state()), "/v1/dashboard/aggregate").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.get("success").is_none());
        assert_eq!(body["totalUsers"], 0);
        assert_eq!(body["totalSavingsBalance"]["USD"], 0.0);
        assert!(body["signupChartData"]["2021"].is_array());
    }

    #[tokio::test]
    async fn test_signup_chart_bad_year() {
        let (status, body) = get(router(test_state()), "/v1/dashboard/chart/signups?year=abc").await;
        assert_eq!(status, StatusCode::OK);
        let points = body.as_array().expect("array");
        assert_eq!(points.len(), 12);
        assert_eq!(points[0]["month"], "Jan");
        assert!(points.iter().all(|p| p["signups"] == 0));
    }
}
