//! Gateway charges.

use mystash_db::queries::payments;
use mystash_types::ledger::{Payment, PaymentStats};
use mystash_types::{PageRequest, Paginated};

use crate::error::{failed, ServiceError, ServiceResult};
use crate::params::{date_range, object_id};
use crate::state::AdminState;

fn blank_to_none(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

pub async fn list(state: &AdminState, page: PageRequest) -> ServiceResult<Paginated<Payment>> {
    state
        .stores
        .service
        .run(|c| payments::list(c, page))
        .await
        .map_err(failed("Failed to retrieve payments"))
}

pub async fn by_id(state: &AdminState, id: &str) -> ServiceResult<Payment> {
    let id = object_id(id, "payment ID")?;
    state
        .stores
        .service
        .run(|c| payments::find_by_id(c, &id))
        .await
        .map_err(failed("Failed to retrieve payment"))?
        .ok_or_else(|| ServiceError::NotFound("Payment not found".into()))
}

pub async fn by_reference(state: &AdminState, reference: &str) -> ServiceResult<Payment> {
    state
        .stores
        .service
        .run(|c| payments::find_by_reference(c, reference))
        .await
        .map_err(failed("Failed to retrieve payment"))?
        .ok_or_else(|| ServiceError::NotFound("Payment not found".into()))
}

pub async fn by_status(state: &AdminState, status: &str, page: PageRequest) -> ServiceResult<Paginated<Payment>> {
    state
        .stores
        .service
        .run(|c| payments::by_status(c, status, page))
        .await
        .map_err(failed("Failed to retrieve payments by status"))
}

pub async fn by_type(state: &AdminState, payment_type: &str, page: PageRequest) -> ServiceResult<Paginated<Payment>> {
    state
        .stores
        .service
        .run(|c| payments::by_type(c, payment_type, page))
        .await
        .map_err(failed("Failed to retrieve payments by type"))
}

pub async fn by_category(state: &AdminState, category: &str, page: PageRequest) -> ServiceResult<Paginated<Payment>> {
    state
        .stores
        .service
        .run(|c| payments::by_category(c, category, page))
        .await
        .map_err(failed("Failed to retrieve payments by category"))
}

/// Charges created within `[startDate, endDate]`, optionally for one
/// legacy user.
pub async fn date_range_search(
    state: &AdminState,
    start: Option<&str>,
    end: Option<&str>,
    uid: Option<&str>,
) -> ServiceResult<Vec<Payment>> {
    let (from, until) = date_range(start, end)?;
    let uid = blank_to_none(uid);
    state
        .stores
        .service
        .run(|c| payments::between(c, from, until, uid))
        .await
        .map_err(failed("Failed to retrieve payments by date range"))
}

pub async fn stats(state: &AdminState, uid: Option<&str>) -> ServiceResult<PaymentStats> {
    let uid = blank_to_none(uid);
    state
        .stores
        .service
        .run(|c| payments::stats(c, uid))
        .await
        .map_err(failed("Failed to retrieve payment statistics"))
}
