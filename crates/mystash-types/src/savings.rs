//! Savings plans ("stashes") and the interest schedules applied to them.

use serde::{Deserialize, Serialize};

use crate::enums::{AutoType, PlanStatus, SaveType, StrictStatus};
use crate::user::UserSummary;
use crate::{ObjectId, Timestamp};

/// Placeholder rendered for owner fields when the owner cannot be resolved.
pub const UNKNOWN_OWNER: &str = "N/A";

/// Start and end of a plan's saving window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanWindow {
    pub start_date: Timestamp,
    pub end_date: Timestamp,
}

impl PlanWindow {
    /// Lifecycle position at `now`: matured once `now` reaches the end,
    /// active from the start until then, pending before the start.
    pub fn status_at(&self, now: Timestamp) -> PlanStatus {
        if now >= self.end_date {
            PlanStatus::Matured
        } else if now >= self.start_date {
            PlanStatus::Active
        } else {
            PlanStatus::Pending
        }
    }
}

/// Automatic top-up policy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Automation {
    pub auto_type: AutoType,
    /// Day of week or month the top-up runs on.
    pub index: Option<u32>,
    pub by_percentage: bool,
    pub amount: f64,
}

/// Interest terms copied onto a stash when it was opened.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterestTerms {
    pub public_id: Option<String>,
    pub start_day: u32,
    pub end_day: u32,
    pub currency: String,
    pub percentage: f64,
    pub note: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stash {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub public_id: String,
    pub interest: Option<ObjectId>,
    pub auth: ObjectId,
    pub profile: Option<ObjectId>,
    pub name: String,
    pub save_type: SaveType,
    pub currency: String,
    pub target: f64,
    pub current_interest: f64,
    pub duration: PlanWindow,
    pub automation: Option<Automation>,
    pub strict_status: StrictStatus,
    pub start_save_on: Option<Timestamp>,
    pub balance: f64,
    pub funding_sources: Vec<String>,
    pub processor: String,
    pub interest_data: Option<InterestTerms>,
    pub deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Stash {
    pub fn status_at(&self, now: Timestamp) -> PlanStatus {
        self.duration.status_at(now)
    }
}

/// A stash joined with its owner and its derived status.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StashDetail {
    #[serde(flatten)]
    pub stash: Stash,
    pub plan_name: String,
    pub maturity_date: Timestamp,
    pub plan_status: PlanStatus,
    pub user_first_name: String,
    pub user_last_name: String,
    pub user_email: String,
}

impl StashDetail {
    /// Missing owners and missing name parts render as `"N/A"`.
    pub fn new(stash: Stash, owner: Option<&UserSummary>, now: Timestamp) -> Self {
        let field = |f: fn(&UserSummary) -> Option<&str>| {
            owner
                .and_then(f)
                .unwrap_or(UNKNOWN_OWNER)
                .to_string()
        };
        Self {
            plan_name: stash.name.clone(),
            maturity_date: stash.duration.end_date,
            plan_status: stash.status_at(now),
            user_first_name: field(|u| u.first_name.as_deref()),
            user_last_name: field(|u| u.last_name.as_deref()),
            user_email: field(|u| Some(u.email.as_str())),
            stash,
        }
    }
}

/// A stash whose window has closed, as listed on the savings dashboard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ts_rs::TS)]
#[serde(rename_all = "camelCase")]
pub struct MaturePlan {
    pub public_id: String,
    pub name: String,
    pub save_type: SaveType,
    pub currency: String,
    pub balance: f64,
    pub target: f64,
    pub end_date: Timestamp,
    pub maturity_status: PlanStatus,
}

impl From<Stash> for MaturePlan {
    fn from(stash: Stash) -> Self {
        Self {
            public_id: stash.public_id,
            name: stash.name,
            save_type: stash.save_type,
            currency: stash.currency,
            balance: stash.balance,
            target: stash.target,
            end_date: stash.duration.end_date,
            maturity_status: PlanStatus::Matured,
        }
    }
}

/// An interest-rate schedule.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interest {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub public_id: String,
    pub auth: Option<ObjectId>,
    pub profile: Option<ObjectId>,
    pub start_day: u32,
    pub end_day: u32,
    pub currency: String,
    pub percentage: f64,
    pub note: Option<String>,
    pub active: bool,
    pub deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Body of an interest creation request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInterest {
    pub public_id: String,
    pub auth: Option<ObjectId>,
    pub profile: Option<ObjectId>,
    pub start_day: u32,
    pub end_day: u32,
    pub currency: String,
    pub percentage: f64,
    pub note: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Body of an interest update request. Absent fields are left unchanged.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterestPatch {
    pub start_day: Option<u32>,
    pub end_day: Option<u32>,
    pub currency: Option<String>,
    pub percentage: Option<f64>,
    pub note: Option<String>,
    pub active: Option<bool>,
}

impl InterestPatch {
    pub fn apply(&self, interest: &mut Interest) {
        if let Some(v) = self.start_day {
            interest.start_day = v;
        }
        if let Some(v) = self.end_day {
            interest.end_day = v;
        }
        if let Some(v) = &self.currency {
            interest.currency = v.clone();
        }
        if let Some(v) = self.percentage {
            interest.percentage = v;
        }
        if let Some(v) = &self.note {
            interest.note = Some(v.clone());
        }
        if let Some(v) = self.active {
            interest.active = v;
        }
    }
}

/// Check the bounds every stored schedule must satisfy.
pub fn check_interest_terms(start_day: u32, end_day: u32, percentage: f64) -> Result<(), String> {
    if !(0.0..=100.0).contains(&percentage) {
        return Err("percentage must be between 0 and 100".into());
    }
    if end_day < 1 {
        return Err("endDay must be at least 1".into());
    }
    if end_day < start_day {
        return Err("endDay cannot be before startDay".into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn window() -> PlanWindow {
        PlanWindow {
            start_date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().expect("start"),
            end_date: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).single().expect("end"),
        }
    }

    #[test]
    fn test_status_boundaries() {
        let w = window();
        assert_eq!(w.status_at(w.start_date - Duration::seconds(1)), PlanStatus::Pending);
        assert_eq!(w.status_at(w.start_date), PlanStatus::Active);
        assert_eq!(w.status_at(w.end_date - Duration::seconds(1)), PlanStatus::Active);
        assert_eq!(w.status_at(w.end_date), PlanStatus::Matured);
    }

    #[test]
    fn test_interest_bounds() {
        assert!(check_interest_terms(0, 30, 12.5).is_ok());
        assert!(check_interest_terms(0, 30, 100.1).is_err());
        assert!(check_interest_terms(0, 0, 5.0).is_err());
        assert!(check_interest_terms(31, 30, 5.0).is_err());
    }

    #[test]
    fn test_patch_leaves_absent_fields() {
        let now = Utc::now();
        let mut interest = Interest {
            id: ObjectId::new(),
            public_id: "int-1".into(),
            auth: None,
            profile: None,
            start_day: 0,
            end_day: 30,
            currency: "NGN".into(),
            percentage: 10.0,
            note: None,
            active: true,
            deleted: false,
            created_at: now,
            updated_at: now,
        };
        let patch = InterestPatch {
            percentage: Some(12.0),
            ..Default::default()
        };
        patch.apply(&mut interest);
        assert_eq!(interest.percentage, 12.0);
        assert_eq!(interest.end_day, 30);
        assert_eq!(interest.currency, "NGN");
    }
}
