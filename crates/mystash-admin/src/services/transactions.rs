//! Ledger entries.

use chrono::{Duration, Utc};
use mystash_db::queries::transactions::{self, TransactionQuery};
use mystash_db::queries::users;
use mystash_types::enums::{Currency, Entry, SourceType, TransactionStatus};
use mystash_types::ledger::{DayGroup, RecentActivity, Transaction, TransactionStats};
use mystash_types::{ObjectId, PageRequest, Paginated, Timestamp};
use serde::Deserialize;

use crate::error::{failed, ServiceError, ServiceResult};
use crate::params::{date_bounds, date_range, object_id, object_id_opt, one_of_opt};
use crate::state::AdminState;

const NO_USER_WITH_EMAIL: &str = "User not found with this email";

/// Raw query of the filtered search. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilter {
    pub currency: Option<String>,
    #[serde(rename = "type")]
    pub entry: Option<String>,
    pub source_type: Option<String>,
    pub status: Option<String>,
    pub auth_id: Option<String>,
    pub email: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub reference: Option<String>,
    pub destination_type: Option<String>,
}

/// Midnight UTC of the day containing `now`.
pub fn start_of_day(now: Timestamp) -> Timestamp {
    now.date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
        .unwrap_or(now)
}

pub async fn list(state: &AdminState, page: PageRequest) -> ServiceResult<Paginated<Transaction>> {
    state
        .stores
        .service
        .run(|c| transactions::list(c, page))
        .await
        .map_err(failed("Failed to retrieve transactions"))
}

async fn auth_for_email(state: &AdminState, email: &str) -> ServiceResult<ObjectId> {
    let user = state
        .stores
        .auth
        .run(|c| users::find_by_email(c, email))
        .await
        .map_err(failed("Failed to retrieve user"))?;
    user.map(|u| u.auth)
        .ok_or_else(|| ServiceError::NotFound(NO_USER_WITH_EMAIL.into()))
}

/// Search with any combination of filters. Values are validated before
/// any store is queried; an email is resolved to its owner first and
/// takes precedence over `authId`.
pub async fn filtered(
    state: &AdminState,
    filter: &TransactionFilter,
    page: PageRequest,
) -> ServiceResult<Paginated<Transaction>> {
    let (from, until) = date_bounds(filter.start_date.as_deref(), filter.end_date.as_deref())?;
    let mut query = TransactionQuery {
        currency: one_of_opt(filter.currency.as_deref(), Currency::accepted)?,
        entry: one_of_opt(filter.entry.as_deref(), Entry::accepted)?,
        source_type: one_of_opt(filter.source_type.as_deref(), SourceType::accepted)?,
        status: one_of_opt(filter.status.as_deref(), TransactionStatus::accepted)?,
        auth: object_id_opt(filter.auth_id.as_deref(), "auth ID")?,
        from,
        until,
        reference: filter.reference.clone().filter(|s| !s.is_empty()),
        destination_type: filter.destination_type.clone().filter(|s| !s.is_empty()),
    };
    if let Some(email) = filter.email.as_deref().filter(|s| !s.is_empty()) {
        query.auth = Some(auth_for_email(state, email).await?);
    }
    state
        .stores
        .service
        .run(|c| transactions::search(c, &query, page))
        .await
        .map_err(failed("Failed to retrieve transactions"))
}

pub async fn by_id(state: &AdminState, id: &str) -> ServiceResult<Transaction> {
    let id = object_id(id, "transaction ID")?;
    state
        .stores
        .service
        .run(|c| transactions::find_by_id(c, &id))
        .await
        .map_err(failed("Failed to retrieve transaction"))?
        .ok_or_else(|| ServiceError::NotFound("Transaction not found".into()))
}

pub async fn by_reference(state: &AdminState, reference: &str) -> ServiceResult<Transaction> {
    state
        .stores
        .service
        .run(|c| transactions::find_by_reference(c, reference))
        .await
        .map_err(failed("Failed to retrieve transaction"))?
        .ok_or_else(|| ServiceError::NotFound("Transaction not found".into()))
}

pub async fn by_auth(
    state: &AdminState,
    auth: &str,
    page: PageRequest,
) -> ServiceResult<Paginated<Transaction>> {
    let auth = object_id(auth, "auth ID")?;
    state
        .stores
        .service
        .run(|c| transactions::by_auth(c, &auth, page))
        .await
        .map_err(failed("Failed to retrieve user transactions"))
}

pub async fn stats(state: &AdminState, auth: &str) -> ServiceResult<TransactionStats> {
    let auth = object_id(auth, "auth ID")?;
    state
        .stores
        .service
        .run(|c| transactions::stats(c, &auth))
        .await
        .map_err(failed("Failed to retrieve transaction statistics"))
}

/// Entries created within `[startDate, endDate]`, optionally for one user.
pub async fn date_range_search(
    state: &AdminState,
    start: Option<&str>,
    end: Option<&str>,
    auth: Option<&str>,
) -> ServiceResult<Vec<Transaction>> {
    let (from, until) = date_range(start, end)?;
    let query = TransactionQuery {
        auth: object_id_opt(auth, "auth ID")?,
        from: Some(from),
        until: Some(until),
        ..TransactionQuery::default()
    };
    state
        .stores
        .service
        .run(|c| transactions::search_all(c, &query))
        .await
        .map_err(failed("Failed to retrieve transactions by date range"))
}

/// Today's and yesterday's entries for one user, by UTC calendar day.
pub async fn recent(state: &AdminState, auth: &str) -> ServiceResult<RecentActivity<Transaction>> {
    let auth = object_id(auth, "auth ID")?;
    let today = start_of_day(Utc::now());
    let yesterday = today - Duration::days(1);
    let tomorrow = today + Duration::days(1);
    let service = &state.stores.service;
    let (today_rows, yesterday_rows) = tokio::try_join!(
        service.run(|c| transactions::by_auth_in(c, &auth, today, tomorrow)),
        service.run(|c| transactions::by_auth_in(c, &auth, yesterday, today)),
    )
    .map_err(failed("Failed to retrieve recent transactions"))?;
    Ok(RecentActivity {
        today: DayGroup::new(today_rows, |t| t.amount),
        yesterday: DayGroup::new(yesterday_rows, |t| t.amount),
    })
}

/// A user's history, looked up by email in the auth store.
pub async fn by_email(
    state: &AdminState,
    email: &str,
    page: PageRequest,
) -> ServiceResult<Paginated<Transaction>> {
    let auth = auth_for_email(state, email).await?;
    state
        .stores
        .service
        .run(|c| transactions::by_auth(c, &auth, page))
        .await
        .map_err(failed("Failed to retrieve transaction history"))
}
