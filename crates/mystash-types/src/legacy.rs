//! Records from the previous platform, kept in the dev store for
//! historical lookups. They are keyed by `uid` rather than store identity.

use serde::{Deserialize, Serialize};

use crate::enums::Entry;
use crate::{ObjectId, Timestamp};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyUser {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub uid: String,
    pub name: Option<String>,
    pub email: String,
    pub phone_number: Option<String>,
    pub onboarding_stage: Option<String>,
    pub ambassador: bool,
    pub personas: Vec<String>,
    pub suspended: bool,
    pub disabled: bool,
    pub email_verified: bool,
    pub role: Option<String>,
    pub referral_code: Option<String>,
    pub deleted: bool,
    pub created_at: Timestamp,
}

/// The fields of a legacy user exposed over HTTP.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyUserView {
    pub id: String,
    pub name: Option<String>,
    pub email: String,
    pub phone_number: Option<String>,
    pub onboarding_stage: Option<String>,
    pub ambassador: bool,
    pub personas: Vec<String>,
    pub suspended: bool,
    pub disabled: bool,
    pub email_verified: bool,
    pub role: Option<String>,
    pub referral_code: Option<String>,
    pub joined_at: Timestamp,
}

impl From<LegacyUser> for LegacyUserView {
    fn from(user: LegacyUser) -> Self {
        Self {
            id: user.uid,
            name: user.name,
            email: user.email,
            phone_number: user.phone_number,
            onboarding_stage: user.onboarding_stage,
            ambassador: user.ambassador,
            personas: user.personas,
            suspended: user.suspended,
            disabled: user.disabled,
            email_verified: user.email_verified,
            role: user.role,
            referral_code: user.referral_code,
            joined_at: user.created_at,
        }
    }
}

/// Activity counters maintained per legacy user.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyUserStatistics {
    pub uid: String,
    pub referred_mandates_activated: u64,
    pub referred_mandates_created: u64,
    pub referrals: u64,
    pub withdrawals: u64,
    pub cash_reserve_stashes: u64,
    pub stashes: u64,
    pub mandate_breaks: u64,
    pub mandates: u64,
    pub active_mandates: u64,
    pub linked_cards: u64,
    pub linked_accounts: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyTransaction {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(rename = "type")]
    pub entry: Entry,
    pub amount: f64,
    pub narration: Option<String>,
    /// When the entry was booked. Listings sort on this, not `createdAt`.
    pub date: Timestamp,
    pub balance: f64,
    pub transaction_id: String,
    pub uid: String,
    pub obp_id: Option<String>,
    pub obp_name: Option<String>,
    pub deleted: bool,
    pub created_at: Timestamp,
}

/// Owner details attached to a legacy transaction listing by email.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LegacyUserInfo {
    pub email: String,
    pub uid: String,
    pub name: Option<String>,
}
