//! Platform users and the per-user rollups that span both stores.

use mystash_db::queries::{payments, stashes, transactions, transfers, users, wallets};
use mystash_types::reports::{
    AggregateBalances, AggregateCounts, AggregateSummary, BalanceBucket, BucketsUsdNgn, RecentData,
    UserAggregate, UserBalances, UserStashStats, UsdNgn,
};
use mystash_types::savings::Stash;
use mystash_types::user::User;
use mystash_types::wallet::Wallet;
use mystash_types::{PageRequest, Paginated, RecentSlice, RECENT_LIMIT};

use crate::error::{failed, fault, ServiceError, ServiceResult};
use crate::params::object_id;
use crate::state::AdminState;

const AUTH_ID: &str = "auth ID";

pub async fn list(state: &AdminState, page: PageRequest) -> ServiceResult<Paginated<User>> {
    state.stores.auth.run(|c| users::list(c, page)).await.map_err(fault)
}

pub async fn by_email(state: &AdminState, email: &str) -> ServiceResult<User> {
    state
        .stores
        .auth
        .run(|c| users::find_by_email(c, email))
        .await
        .map_err(fault)?
        .ok_or_else(|| ServiceError::NotFound("User not found".into()))
}

pub async fn stashes_by_auth(
    state: &AdminState,
    auth: &str,
    page: PageRequest,
) -> ServiceResult<Paginated<Stash>> {
    let auth = object_id(auth, AUTH_ID)?;
    state
        .stores
        .service
        .run(|c| stashes::by_auth(c, &auth, page))
        .await
        .map_err(failed("Failed to retrieve user stashes"))
}

pub async fn wallets_by_auth(
    state: &AdminState,
    auth: &str,
    page: PageRequest,
) -> ServiceResult<Paginated<Wallet>> {
    let auth = object_id(auth, AUTH_ID)?;
    state
        .stores
        .service
        .run(|c| wallets::by_auth(c, &auth, page))
        .await
        .map_err(failed("Failed to retrieve user wallets"))
}

/// Wallet and stash balances of one user, in USD and NGN.
pub async fn balances(state: &AdminState, auth: &str) -> ServiceResult<UserBalances> {
    let auth = object_id(auth, AUTH_ID)?;
    let service = &state.stores.service;
    let (wallet_totals, stash_totals) = tokio::try_join!(
        service.run(|c| wallets::balance_by_currency(c, Some(&auth))),
        service.run(|c| stashes::balance_by_currency(c, None, Some(&auth))),
    )
    .map_err(failed("Failed to retrieve user balances"))?;
    Ok(UserBalances::new(
        UsdNgn::from_totals(&wallet_totals),
        UsdNgn::from_totals(&stash_totals),
    ))
}

fn buckets(rows: &[(String, f64, u64)]) -> BucketsUsdNgn {
    let bucket = |code: &str| {
        rows.iter()
            .find(|(currency, _, _)| currency == code)
            .map(|&(_, total_balance, user_count)| BalanceBucket { total_balance, user_count })
            .unwrap_or_default()
    };
    BucketsUsdNgn {
        usd: bucket("USD"),
        ngn: bucket("NGN"),
    }
}

/// Balances across every user, with owner counts per currency.
pub async fn aggregate_balances(state: &AdminState) -> ServiceResult<AggregateBalances> {
    let service = &state.stores.service;
    let (wallet_rows, stash_rows) = tokio::try_join!(
        service.run(wallets::balance_and_owners),
        service.run(stashes::balance_and_owners),
    )
    .map_err(failed("Failed to retrieve aggregate user balances"))?;
    Ok(AggregateBalances::new(buckets(&wallet_rows), buckets(&stash_rows)))
}

pub async fn stash_stats(state: &AdminState, auth: &str) -> ServiceResult<UserStashStats> {
    let auth = object_id(auth, AUTH_ID)?;
    let service = &state.stores.service;
    let (overview, save_type_breakdown) = tokio::try_join!(
        service.run(|c| stashes::overview(c, &auth)),
        service.run(|c| stashes::breakdown_by_save_type(c, &auth)),
    )
    .map_err(failed("Failed to retrieve user stash statistics"))?;
    Ok(UserStashStats { overview, save_type_breakdown })
}

/// Everything about one user: profile, counts and the most recent few
/// records of each collection.
///
/// Payments are matched on their metadata uid, which holds the same hex
/// identity as `auth`. Summary totals cover the returned records only.
pub async fn aggregate(state: &AdminState, auth_raw: &str) -> ServiceResult<UserAggregate> {
    let auth = object_id(auth_raw, AUTH_ID)?;
    let uid = auth.to_hex();
    let service = &state.stores.service;
    let n = RECENT_LIMIT;

    let (
        user,
        recent_stashes,
        recent_wallets,
        recent_transactions,
        recent_payments,
        payment_count,
        recent_transfers,
    ) = tokio::try_join!(
        state.stores.auth.run(|c| users::find_by_auth(c, &auth)),
        service.run(|c| stashes::by_auth(c, &auth, PageRequest::new(1, n))),
        service.run(|c| wallets::by_auth(c, &auth, PageRequest::new(1, n))),
        service.run(|c| transactions::by_auth(c, &auth, PageRequest::new(1, n))),
        service.run(|c| payments::recent_by_meta_uid(c, &uid, n)),
        service.run(|c| payments::count_by_meta_uid(c, &uid)),
        service.run(|c| transfers::by_auth(c, &auth, PageRequest::new(1, n))),
    )
    .map_err(failed("Failed to retrieve user aggregate data"))?;

    let user = user.ok_or_else(|| ServiceError::NotFound("User not found".into()))?;

    let counts = AggregateCounts {
        stashes: recent_stashes.pagination.total,
        wallets: recent_wallets.pagination.total,
        transactions: recent_transactions.pagination.total,
        transfers: recent_transfers.pagination.total,
        payments: payment_count,
    };
    let summary = AggregateSummary {
        total_balance: recent_wallets.data.iter().map(|w| w.balance).sum(),
        total_stash_value: recent_stashes.data.iter().map(|s| s.target).sum(),
        counts,
    };
    let recent_data = RecentData {
        stashes: RecentSlice::new(recent_stashes.data, counts.stashes, n),
        wallets: RecentSlice::new(recent_wallets.data, counts.wallets, n),
        transactions: RecentSlice::new(recent_transactions.data, counts.transactions, n),
        transfers: RecentSlice::new(recent_transfers.data, counts.transfers, n),
        payments: RecentSlice::new(recent_payments, counts.payments, n),
    };

    Ok(UserAggregate {
        user: user.into(),
        summary,
        recent_data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AdminConfig;
    use mystash_db::fixtures;
    use mystash_types::ledger::PaymentMeta;
    use mystash_types::ObjectId;

    fn test_state() -> AdminState {
        AdminState::in_memory(AdminConfig::default()).expect("in-memory state")
    }

    #[tokio::test]
    async fn test_balances_ignore_other_currencies() {
        let state = test_state();
        let auth = ObjectId::new();
        state
            .stores
            .service
            .run(|c| {
                wallets::insert(c, &fixtures::wallet(auth, "NGN", 100.0))?;
                wallets::insert(c, &fixtures::wallet(auth, "GBP", 9.0))?;
                stashes::insert(c, &fixtures::stash(auth, "NGN", 50.0))?;
                stashes::insert(c, &fixtures::stash(auth, "USD", 5.0))
            })
            .await
            .expect("seed");

        let b = balances(&state, &auth.to_hex()).await.expect("balances");
        assert_eq!(b.wallets, UsdNgn { usd: 0.0, ngn: 100.0 });
        assert_eq!(b.total, UsdNgn { usd: 5.0, ngn: 150.0 });
    }

    #[tokio::test]
    async fn test_combined_users_is_max_not_union() {
        let state = test_state();
        let (a, b, c) = (ObjectId::new(), ObjectId::new(), ObjectId::new());
        state
            .stores
            .service
            .run(|conn| {
                wallets::insert(conn, &fixtures::wallet(a, "NGN", 10.0))?;
                wallets::insert(conn, &fixtures::wallet(b, "NGN", 10.0))?;
                stashes::insert(conn, &fixtures::stash(c, "NGN", 30.0))
            })
            .await
            .expect("seed");

        let agg = aggregate_balances(&state).await.expect("aggregate");
        assert_eq!(agg.wallets.ngn.user_count, 2);
        assert_eq!(agg.stashes.ngn.user_count, 1);
        assert_eq!(agg.combined.ngn.unique_users, 2);
        assert_eq!(agg.combined.ngn.total_balance, 50.0);
        assert_eq!(agg.combined.usd.total_balance, 0.0);
    }

    #[tokio::test]
    async fn test_aggregate_caps_recent_records() {
        let state = test_state();
        let user = fixtures::user("ada@mystash.co");
        let auth = user.auth;
        state.stores.auth.run(|c| users::insert(c, &user)).await.expect("seed user");
        state
            .stores
            .service
            .run(|c| {
                for _ in 0..7 {
                    stashes::insert(c, &fixtures::stash(auth, "NGN", 10.0))?;
                }
                wallets::insert(c, &fixtures::wallet(auth, "NGN", 40.0))?;
                let mut payment = fixtures::payment("pay-1", 25.0);
                payment.meta_data = Some(PaymentMeta {
                    uid: Some(auth.to_hex()),
                    ..PaymentMeta::default()
                });
                payments::insert(c, &payment)
            })
            .await
            .expect("seed");

        let agg = aggregate(&state, &auth.to_hex()).await.expect("aggregate");
        let stashes = &agg.recent_data.stashes;
        assert_eq!(stashes.data.len(), 5);
        assert_eq!(stashes.showing, 5);
        assert_eq!(stashes.total, 7);
        assert!(stashes.has_more);
        assert!(!agg.recent_data.wallets.has_more);
        assert_eq!(agg.summary.counts.payments, 1);
        assert_eq!(agg.summary.total_balance, 40.0);
        // five recent stashes, target 20 each
        assert_eq!(agg.summary.total_stash_value, 100.0);
    }

    #[tokio::test]
    async fn test_aggregate_payment_count_exceeds_recent_slice() {
        let state = test_state();
        let user = fixtures::user("bola@mystash.co");
        let auth = user.auth;
        state.stores.auth.run(|c| users::insert(c, &user)).await.expect("seed user");
        state
            .stores
            .service
            .run(|c| {
                for i in 0..7 {
                    let mut payment = fixtures::payment(&format!("pay-{i}"), 10.0);
                    payment.meta_data = Some(PaymentMeta {
                        uid: Some(auth.to_hex()),
                        ..PaymentMeta::default()
                    });
                    payments::insert(c, &payment)?;
                }
                payments::insert(c, &fixtures::payment("pay-stranger", 10.0))
            })
            .await
            .expect("seed");

        let agg = aggregate(&state, &auth.to_hex()).await.expect("aggregate");
        assert_eq!(agg.summary.counts.payments, 7);
        assert_eq!(agg.recent_data.payments.showing, 5);
        assert_eq!(agg.recent_data.payments.total, 7);
        assert!(agg.recent_data.payments.has_more);
    }

    #[tokio::test]
    async fn test_aggregate_unknown_user() {
        let state = test_state();
        let err = aggregate(&state, &ObjectId::new().to_hex()).await.expect_err("absent");
        assert!(matches!(err, ServiceError::NotFound(ref m) if m == "User not found"));
        let err = aggregate(&state, "xyz").await.expect_err("malformed");
        assert!(matches!(err, ServiceError::Invalid(ref m) if m == "Invalid auth ID format"));
    }
}
