//! Integration test: the per-user aggregate view.
//!
//! Seeds one user across the auth and service stores, then reads
//! `/v1/users/:authId/aggregate` and checks:
//! 1. Profile fields come from the auth store
//! 2. Recent slices cap at five records but report full totals
//! 3. Payments are attributed through their metadata uid
//! 4. Unknown and malformed ids answer with the failure envelope

use axum::http::StatusCode;
use mystash_db::fixtures;
use mystash_db::queries::{payments, stashes, transactions, users, wallets};
use mystash_integration_tests::{fresh_state, get};
use mystash_types::ledger::{Payment, PaymentMeta};
use mystash_types::ObjectId;

/// Stashes seeded for the user; more than fit in a recent slice.
const STASH_COUNT: usize = 7;

fn paid_by(auth: ObjectId, reference: &str) -> Payment {
    Payment {
        meta_data: Some(PaymentMeta {
            uid: Some(auth.to_hex()),
            ..PaymentMeta::default()
        }),
        ..fixtures::payment(reference, 25.0)
    }
}

#[tokio::test]
async fn aggregate_caps_recent_slices_and_counts_everything() {
    let state = fresh_state();

    // =========================================================
    // Step 1: Seed a user, their records, and a stranger's payment
    // =========================================================
    let user = fixtures::user("ada@mystash.co");
    let auth = user.auth;
    state.stores.auth.run(|c| users::insert(c, &user)).await.expect("seed user");

    state
        .stores
        .service
        .run(|c| {
            for _ in 0..STASH_COUNT {
                stashes::insert(c, &fixtures::stash(auth, "NGN", 10.0))?;
            }
            wallets::insert(c, &fixtures::wallet(auth, "NGN", 50.0))?;
            wallets::insert(c, &fixtures::wallet(auth, "USD", 5.0))?;
            transactions::insert(c, &fixtures::transaction(auth, "NGN", 3.0))?;
            payments::insert(c, &paid_by(auth, "pay-1"))?;
            payments::insert(c, &paid_by(auth, "pay-2"))?;
            payments::insert(c, &paid_by(ObjectId::new(), "pay-other"))
        })
        .await
        .expect("seed service records");

    // =========================================================
    // Step 2: Read the aggregate
    // =========================================================
    let (status, body) = get(&state, &format!("/v1/users/{auth}/aggregate")).await;
    assert_eq!(status, StatusCode::OK, "aggregate should succeed: {body}");
    assert_eq!(body["success"], true);
    let data = &body["data"];

    assert_eq!(data["user"]["email"], "ada@mystash.co");
    assert_eq!(data["user"]["firstName"], "Ada");

    // =========================================================
    // Step 3: Recent slices and counts
    // =========================================================
    let stash_slice = &data["recentData"]["stashes"];
    assert_eq!(stash_slice["showing"], 5, "recent stashes cap at five");
    assert_eq!(stash_slice["total"], STASH_COUNT);
    assert_eq!(stash_slice["hasMore"], true);
    assert_eq!(stash_slice["data"].as_array().map(Vec::len), Some(5));

    let counts = &data["summary"]["counts"];
    assert_eq!(counts["stashes"], STASH_COUNT);
    assert_eq!(counts["wallets"], 2);
    assert_eq!(counts["transactions"], 1);
    assert_eq!(counts["transfers"], 0);
    assert_eq!(counts["payments"], 2, "only payments carrying the user's uid count");

    assert_eq!(data["recentData"]["wallets"]["hasMore"], false);
    assert_eq!(data["recentData"]["payments"]["showing"], 2);

    // =========================================================
    // Step 4: Summary totals cover the returned records
    // =========================================================
    assert_eq!(data["summary"]["totalBalance"], 55.0);
    assert_eq!(data["summary"]["totalStashValue"], 100.0, "five stashes with target 20 each");
}

#[tokio::test]
async fn aggregate_reports_unknown_user() {
    let state = fresh_state();
    let (status, body) = get(&state, &format!("/v1/users/{}/aggregate", ObjectId::new())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "User not found");
}

#[tokio::test]
async fn aggregate_rejects_malformed_id() {
    let state = fresh_state();
    let (status, body) = get(&state, "/v1/users/12345/aggregate").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["data"].is_null());
}
