//! Ledger entries of the previous platform, ordered by booking `date`.

use chrono::{Duration, Utc};
use mystash_db::queries::{legacy_transactions, legacy_users};
use mystash_types::ledger::{DayGroup, RecentActivity};
use mystash_types::legacy::{LegacyTransaction, LegacyUserInfo};
use mystash_types::{PageRequest, Paginated};
use serde::Serialize;

use crate::error::{failed, ServiceError, ServiceResult};
use crate::params::{date_range, object_id};
use crate::services::transactions::start_of_day;
use crate::state::AdminState;

/// One legacy user's history along with who they are.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyHistory {
    #[serde(flatten)]
    pub page: Paginated<LegacyTransaction>,
    pub user_info: LegacyUserInfo,
}

pub async fn list(state: &AdminState, page: PageRequest) -> ServiceResult<Paginated<LegacyTransaction>> {
    state
        .stores
        .dev
        .run(|c| legacy_transactions::list(c, page))
        .await
        .map_err(failed("Error retrieving transactions"))
}

pub async fn by_id(state: &AdminState, id: &str) -> ServiceResult<LegacyTransaction> {
    let id = object_id(id, "transaction ID")?;
    state
        .stores
        .dev
        .run(|c| legacy_transactions::find_by_id(c, &id))
        .await
        .map_err(failed("Error retrieving transaction"))?
        .ok_or_else(|| ServiceError::NotFound("Transaction not found".into()))
}

/// Today's and yesterday's entries for `uid`, by UTC booking day.
pub async fn recent(state: &AdminState, uid: &str) -> ServiceResult<RecentActivity<LegacyTransaction>> {
    let today = start_of_day(Utc::now());
    let yesterday = today - Duration::days(1);
    let tomorrow = today + Duration::days(1);
    let dev = &state.stores.dev;
    let (today_rows, yesterday_rows) = tokio::try_join!(
        dev.run(|c| legacy_transactions::by_uid_in(c, uid, today, tomorrow)),
        dev.run(|c| legacy_transactions::by_uid_in(c, uid, yesterday, today)),
    )
    .map_err(failed("Error retrieving recent transactions"))?;
    Ok(RecentActivity {
        today: DayGroup::new(today_rows, |t| t.amount),
        yesterday: DayGroup::new(yesterday_rows, |t| t.amount),
    })
}

pub async fn by_email(state: &AdminState, email: &str, page: PageRequest) -> ServiceResult<LegacyHistory> {
    let dev = &state.stores.dev;
    let user = dev
        .run(|c| legacy_users::find_by_email(c, email))
        .await
        .map_err(failed("Error retrieving transactions by email"))?
        .ok_or_else(|| ServiceError::NotFound("User not found with the provided email".into()))?;
    let found = dev
        .run(|c| legacy_transactions::by_uid(c, &user.uid, page))
        .await
        .map_err(failed("Error retrieving transactions by email"))?;
    Ok(LegacyHistory {
        page: found,
        user_info: LegacyUserInfo {
            email: user.email,
            uid: user.uid,
            name: user.name,
        },
    })
}

/// Entries booked within `[startDate, endDate]`, optionally for one user.
pub async fn date_range_search(
    state: &AdminState,
    start: Option<&str>,
    end: Option<&str>,
    uid: Option<&str>,
) -> ServiceResult<Vec<LegacyTransaction>> {
    let (from, until) = date_range(start, end)?;
    let uid = uid.map(str::trim).filter(|s| !s.is_empty());
    state
        .stores
        .dev
        .run(|c| legacy_transactions::between(c, from, until, uid))
        .await
        .map_err(failed("Error retrieving transactions by date range"))
}
