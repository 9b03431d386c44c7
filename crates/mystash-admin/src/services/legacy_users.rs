//! Users of the previous platform, kept in the dev store.
//!
//! Lookups propagate store faults. The per-user history listings catch
//! them and answer with a failure envelope instead.

use mystash_db::queries::{legacy_transactions, legacy_users, payments};
use mystash_types::legacy::{LegacyTransaction, LegacyUser, LegacyUserStatistics, LegacyUserView};
use mystash_types::ledger::{Payment, PaymentStats};
use mystash_types::{PageRequest, Paginated};

use crate::error::{failed, fault, ServiceError, ServiceResult};
use crate::state::AdminState;

fn user_not_found() -> ServiceError {
    ServiceError::NotFound("User not found".into())
}

pub async fn list(state: &AdminState, page: PageRequest) -> ServiceResult<Paginated<LegacyUserView>> {
    let found = state
        .stores
        .dev
        .run(|c| legacy_users::list(c, page))
        .await
        .map_err(fault)?;
    Ok(found.map(LegacyUserView::from))
}

pub async fn by_email(state: &AdminState, email: &str) -> ServiceResult<LegacyUser> {
    state
        .stores
        .dev
        .run(|c| legacy_users::find_by_email(c, email))
        .await
        .map_err(fault)?
        .ok_or_else(user_not_found)
}

pub async fn by_uid(state: &AdminState, uid: &str) -> ServiceResult<LegacyUser> {
    state
        .stores
        .dev
        .run(|c| legacy_users::find_by_uid(c, uid))
        .await
        .map_err(fault)?
        .ok_or_else(user_not_found)
}

pub async fn statistics(state: &AdminState, uid: &str) -> ServiceResult<LegacyUserStatistics> {
    state
        .stores
        .dev
        .run(|c| legacy_users::statistics(c, uid))
        .await
        .map_err(fault)?
        .ok_or_else(|| ServiceError::NotFound("User statistics not found".into()))
}

pub async fn transactions(
    state: &AdminState,
    uid: &str,
    page: PageRequest,
) -> ServiceResult<Paginated<LegacyTransaction>> {
    state
        .stores
        .dev
        .run(|c| legacy_transactions::by_uid(c, uid, page))
        .await
        .map_err(failed("Error retrieving user transactions"))
}

/// Gateway charges whose `user` is this legacy uid.
pub async fn payments(state: &AdminState, uid: &str, page: PageRequest) -> ServiceResult<Paginated<Payment>> {
    state
        .stores
        .service
        .run(|c| payments::by_user(c, uid, page))
        .await
        .map_err(failed("Error retrieving user payments"))
}

pub async fn payment_stats(state: &AdminState, uid: &str) -> ServiceResult<PaymentStats> {
    state
        .stores
        .service
        .run(|c| payments::stats(c, Some(uid)))
        .await
        .map_err(failed("Error retrieving user payment statistics"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AdminConfig;
    use mystash_db::fixtures;

    fn test_state() -> AdminState {
        AdminState::in_memory(AdminConfig::default()).expect("in-memory state")
    }

    #[tokio::test]
    async fn test_list_projects_uid_and_join_date() {
        let state = test_state();
        let user = fixtures::legacy_user("uid-1", "chidi@old.mystash.co");
        state.stores.dev.run(|c| legacy_users::insert(c, &user)).await.expect("seed");

        let page = list(&state, PageRequest::default()).await.expect("list");
        assert_eq!(page.pagination.total, 1);
        assert_eq!(page.data[0].id, "uid-1");
        assert_eq!(page.data[0].joined_at, user.created_at);
    }

    #[tokio::test]
    async fn test_suspended_user_is_not_found() {
        let state = test_state();
        let user = LegacyUser {
            suspended: true,
            ..fixtures::legacy_user("uid-2", "gone@old.mystash.co")
        };
        state.stores.dev.run(|c| legacy_users::insert(c, &user)).await.expect("seed");

        let err = by_uid(&state, "uid-2").await.expect_err("suspended");
        assert!(matches!(err, ServiceError::NotFound(_)));
        let err = by_email(&state, "gone@old.mystash.co").await.expect_err("suspended");
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_statistics_missing() {
        let state = test_state();
        let err = statistics(&state, "nobody").await.expect_err("absent");
        assert!(matches!(err, ServiceError::NotFound(ref m) if m == "User statistics not found"));
    }

    #[tokio::test]
    async fn test_payments_match_legacy_uid() {
        let state = test_state();
        let owned = |reference: &str, user: &str| Payment {
            user: Some(user.to_string()),
            ..fixtures::payment(reference, 40.0)
        };
        state
            .stores
            .service
            .run(|c| {
                payments::insert(c, &owned("p1", "uid-1"))?;
                payments::insert(c, &owned("p2", "uid-1"))?;
                payments::insert(c, &owned("p3", "uid-9"))
            })
            .await
            .expect("seed");

        let page = payments(&state, "uid-1", PageRequest::default()).await.expect("payments");
        assert_eq!(page.pagination.total, 2);
        let stats = payment_stats(&state, "uid-1").await.expect("stats");
        assert_eq!(stats.total_payments, 2);
        assert_eq!(stats.total_amount, 80.0);
    }
}
