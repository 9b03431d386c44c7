//! Integration test: dashboard rollups and the legacy read path.
//!
//! Exercises the platform-wide figures over a small seeded book:
//! 1. Savings totals by save type, restricted to USD and NGN
//! 2. Matured plans, never including deleted stashes
//! 3. Monthly signup charts for one year and for every charted year
//! 4. Legacy history lookup by email and date-range validation

use axum::http::StatusCode;
use mystash_db::fixtures::{self, day};
use mystash_db::queries::{legacy_transactions, legacy_users, stashes, users};
use mystash_integration_tests::{fresh_state, get};
use mystash_types::enums::SaveType;
use mystash_types::savings::{PlanWindow, Stash};
use mystash_types::ObjectId;

fn matured(auth: ObjectId, currency: &str, balance: f64) -> Stash {
    Stash {
        duration: PlanWindow {
            start_date: day(2023, 1, 1),
            end_date: day(2024, 1, 1),
        },
        ..fixtures::stash(auth, currency, balance)
    }
}

#[tokio::test]
async fn savings_aggregate_over_seeded_book() {
    let state = fresh_state();
    let auth = ObjectId::new();

    // =========================================================
    // Step 1: Seed stashes across currencies and save types
    // =========================================================
    let ripe = matured(auth, "NGN", 250.0);
    let gone = Stash {
        deleted: true,
        ..matured(auth, "NGN", 999.0)
    };
    let goal = Stash {
        save_type: SaveType::Target,
        ..fixtures::stash(auth, "USD", 40.0)
    };
    state
        .stores
        .service
        .run(|c| {
            stashes::insert(c, &fixtures::stash(auth, "NGN", 100.0))?;
            stashes::insert(c, &ripe)?;
            stashes::insert(c, &goal)?;
            stashes::insert(c, &fixtures::stash(auth, "EUR", 70.0))?;
            stashes::insert(c, &gone)
        })
        .await
        .expect("seed stashes");

    // =========================================================
    // Step 2: Savings totals
    // =========================================================
    let (status, body) = get(&state, "/v1/dashboard/savings/aggregate").await;
    assert_eq!(status, StatusCode::OK, "savings aggregate: {body}");
    assert!(body.get("success").is_none(), "dashboard figures are unwrapped");

    let total = body["totalSavingsBalance"].as_object().expect("total object");
    assert_eq!(total.len(), 2, "only USD and NGN are reported");
    assert_eq!(body["totalSavingsBalance"]["NGN"], 350.0);
    assert_eq!(body["totalSavingsBalance"]["USD"], 40.0);
    assert_eq!(body["regularSavings"]["NGN"], 350.0);
    assert_eq!(body["regularSavings"]["USD"], 0.0);
    assert_eq!(body["targetSavings"]["USD"], 40.0);
    assert_eq!(body["salarySavings"]["NGN"], 0.0);
    assert_eq!(body["totalSavingsPlans"], 4, "deleted stashes are not counted");

    // =========================================================
    // Step 3: Matured plans
    // =========================================================
    let plans = body["maturePlans"].as_array().expect("mature plans");
    assert_eq!(plans.len(), 1, "the deleted matured stash is excluded");
    assert_eq!(plans[0]["publicId"], ripe.public_id.as_str());
    assert_eq!(plans[0]["maturityStatus"], "matured");

    // =========================================================
    // Step 4: The combined dashboard agrees on savings
    // =========================================================
    let (status, body) = get(&state, "/v1/dashboard/aggregate").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalSavingsBalance"]["NGN"], 350.0);
}

#[tokio::test]
async fn signup_charts_cover_every_month() {
    let state = fresh_state();
    let march = fixtures::user("march@mystash.co");
    let march = mystash_types::user::User {
        created_at: day(2023, 3, 10),
        ..march
    };
    state
        .stores
        .auth
        .run(|c| {
            users::insert(c, &fixtures::user("jan@mystash.co"))?;
            users::insert(c, &march)
        })
        .await
        .expect("seed users");

    let (status, body) = get(&state, "/v1/dashboard/chart/signups?year=2024").await;
    assert_eq!(status, StatusCode::OK);
    let points = body.as_array().expect("chart points");
    assert_eq!(points.len(), 12);
    assert_eq!(points[0]["month"], "Jan");
    assert_eq!(points[0]["signups"], 1);
    assert_eq!(points[2]["signups"], 0);

    let (_, body) = get(&state, "/v1/dashboard/chart/signups?year=twenty").await;
    let points = body.as_array().expect("chart points");
    assert_eq!(points.len(), 12, "an unparseable year still yields twelve points");
    assert!(points.iter().all(|p| p["signups"] == 0));

    let (status, body) = get(&state, "/v1/dashboard/chart/signups/all-years").await;
    assert_eq!(status, StatusCode::OK);
    for year in ["2021", "2022", "2023", "2024"] {
        assert_eq!(body[year].as_array().map(Vec::len), Some(12), "year {year} charted");
    }
    assert_eq!(body["2023"][2]["signups"], 1, "March 2023 signup");
}

#[tokio::test]
async fn legacy_history_and_date_validation() {
    let state = fresh_state();

    // =========================================================
    // Step 1: Seed a legacy user with two ledger entries
    // =========================================================
    let legacy = fixtures::legacy_user("uid-chidi", "chidi@mystash.co");
    state
        .stores
        .dev
        .run(|c| {
            legacy_users::insert(c, &legacy)?;
            legacy_transactions::insert(c, &fixtures::legacy_transaction("uid-chidi", 10.0, day(2022, 5, 1)))?;
            legacy_transactions::insert(c, &fixtures::legacy_transaction("uid-chidi", 15.0, day(2022, 6, 1)))
        })
        .await
        .expect("seed legacy records");

    // =========================================================
    // Step 2: History by email carries the user's identity
    // =========================================================
    let (status, body) = get(&state, "/v1/old-transactions/user/email/chidi@mystash.co").await;
    assert_eq!(status, StatusCode::OK, "legacy history: {body}");
    assert_eq!(body["data"]["data"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["data"]["pagination"]["total"], 2);
    assert_eq!(body["data"]["userInfo"]["uid"], "uid-chidi");

    let (status, body) = get(&state, "/v1/old-transactions/user/email/nobody@mystash.co").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found with the provided email");

    // =========================================================
    // Step 3: Date ranges, valid and reversed
    // =========================================================
    let (status, body) = get(
        &state,
        "/v1/old-transactions/date-range?startDate=2022-05-15&endDate=2022-12-31&uid=uid-chidi",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));

    for uri in [
        "/v1/old-transactions/date-range?startDate=2022-12-31&endDate=2022-01-01",
        "/v1/transactions/date-range?startDate=2022-12-31&endDate=2022-01-01",
        "/v1/payments/date-range?startDate=2022-12-31&endDate=2022-01-01",
    ] {
        let (status, body) = get(&state, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "reversed range on {uri}");
        assert_eq!(body["success"], false);
    }
}
