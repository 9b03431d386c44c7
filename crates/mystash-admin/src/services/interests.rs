//! Interest-rate schedules.
//!
//! The one writable resource. Deletion is a tombstone (`deleted = true`,
//! `active = false`) and cannot be undone through this service. Store
//! errors other than "not found" and "duplicate" propagate as faults.

use chrono::Utc;
use mystash_db::queries::interests;
use mystash_db::DbError;
use mystash_types::savings::{check_interest_terms, Interest, InterestPatch, NewInterest};
use mystash_types::ObjectId;
use tracing::info;

use crate::error::{fault, ServiceError, ServiceResult};
use crate::params::object_id;
use crate::state::AdminState;

const NOT_FOUND: &str = "Interest not found";
const DUPLICATE: &str = "Interest with this publicId already exists";

fn write_error(e: DbError) -> ServiceError {
    match e {
        DbError::NotFound(_) => ServiceError::NotFound(NOT_FOUND.into()),
        DbError::Constraint(_) => ServiceError::Conflict(DUPLICATE.into()),
        other => fault(other),
    }
}

fn found(interest: Option<Interest>) -> ServiceResult<Interest> {
    interest.ok_or_else(|| ServiceError::NotFound(NOT_FOUND.into()))
}

pub async fn list(state: &AdminState) -> ServiceResult<Vec<Interest>> {
    state.stores.service.run(interests::all).await.map_err(fault)
}

pub async fn active(state: &AdminState) -> ServiceResult<Vec<Interest>> {
    state.stores.service.run(interests::active).await.map_err(fault)
}

/// Active schedules in one currency.
pub async fn by_currency(state: &AdminState, currency: &str) -> ServiceResult<Vec<Interest>> {
    let currency = currency.trim().to_uppercase();
    state
        .stores
        .service
        .run(|c| interests::active_by_currency(c, &currency))
        .await
        .map_err(fault)
}

pub async fn by_auth(state: &AdminState, auth: &str) -> ServiceResult<Vec<Interest>> {
    let auth = object_id(auth, "auth ID")?;
    state
        .stores
        .service
        .run(|c| interests::by_auth(c, &auth))
        .await
        .map_err(fault)
}

pub async fn by_profile(state: &AdminState, profile: &str) -> ServiceResult<Vec<Interest>> {
    let profile = object_id(profile, "profile ID")?;
    state
        .stores
        .service
        .run(|c| interests::by_profile(c, &profile))
        .await
        .map_err(fault)
}

pub async fn by_public_id(state: &AdminState, public_id: &str) -> ServiceResult<Interest> {
    let interest = state
        .stores
        .service
        .run(|c| interests::find_by_public_id(c, public_id))
        .await
        .map_err(fault)?;
    found(interest)
}

pub async fn by_id(state: &AdminState, id: &str) -> ServiceResult<Interest> {
    let id = object_id(id, "interest ID")?;
    let interest = state
        .stores
        .service
        .run(|c| interests::find_by_id(c, &id))
        .await
        .map_err(fault)?;
    found(interest)
}

pub async fn create(state: &AdminState, new: NewInterest) -> ServiceResult<Interest> {
    check_interest_terms(new.start_day, new.end_day, new.percentage).map_err(ServiceError::Invalid)?;
    if new.public_id.trim().is_empty() {
        return Err(ServiceError::Invalid("publicId is required".into()));
    }
    let now = Utc::now();
    let interest = Interest {
        id: ObjectId::new(),
        public_id: new.public_id,
        auth: new.auth,
        profile: new.profile,
        start_day: new.start_day,
        end_day: new.end_day,
        currency: new.currency.to_uppercase(),
        percentage: new.percentage,
        note: new.note,
        active: new.active,
        deleted: false,
        created_at: now,
        updated_at: now,
    };
    state
        .stores
        .service
        .run(|c| interests::insert(c, &interest))
        .await
        .map_err(write_error)?;
    info!(public_id = %interest.public_id, "interest created");
    Ok(interest)
}

/// Apply `patch` to a live schedule. The patched terms must still be
/// within bounds.
pub async fn update(state: &AdminState, id: &str, patch: InterestPatch) -> ServiceResult<Interest> {
    let id = object_id(id, "interest ID")?;
    let updated = state
        .stores
        .service
        .run(|c| {
            let Some(mut interest) = interests::find_by_id(c, &id)? else {
                return Ok(Err(ServiceError::NotFound(NOT_FOUND.into())));
            };
            patch.apply(&mut interest);
            interest.currency = interest.currency.to_uppercase();
            if let Err(reason) =
                check_interest_terms(interest.start_day, interest.end_day, interest.percentage)
            {
                return Ok(Err(ServiceError::Invalid(reason)));
            }
            interest.updated_at = Utc::now();
            interests::update(c, &interest)?;
            Ok(Ok(interest))
        })
        .await
        .map_err(write_error)??;
    info!(public_id = %updated.public_id, "interest updated");
    Ok(updated)
}

/// Tombstone a live schedule.
pub async fn delete(state: &AdminState, id: &str) -> ServiceResult<()> {
    let id = object_id(id, "interest ID")?;
    state
        .stores
        .service
        .run(|c| interests::soft_delete(c, &id))
        .await
        .map_err(write_error)?;
    info!(%id, "interest deleted");
    Ok(())
}
