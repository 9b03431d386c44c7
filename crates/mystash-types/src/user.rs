//! Users held in the auth store.

use serde::{Deserialize, Serialize};

use crate::{ObjectId, Timestamp};

/// Contact number with its ISO country code.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ts_rs::TS)]
#[serde(rename_all = "camelCase")]
pub struct Mobile {
    pub phone_number: Option<String>,
    pub iso_code: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
pub struct Verifications {
    pub email: bool,
    pub mobile: bool,
}

/// A platform user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// Identity every service-store record refers back to.
    pub auth: ObjectId,
    pub profile: Option<ObjectId>,
    pub unique_id: Option<String>,
    pub public_id: Option<String>,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub mobile: Mobile,
    pub verifications: Verifications,
    pub deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The handful of owner fields joined onto service-store records.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub auth: ObjectId,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            auth: user.auth,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        }
    }
}

/// Public-facing projection listed under the dashboard's recent users.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ts_rs::TS)]
#[serde(rename_all = "camelCase")]
pub struct RecentUser {
    pub public_id: Option<String>,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub mobile: Mobile,
    pub verifications: Verifications,
    pub created_at: Timestamp,
}

impl From<User> for RecentUser {
    fn from(user: User) -> Self {
        Self {
            public_id: user.public_id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            mobile: user.mobile,
            verifications: user.verifications,
            created_at: user.created_at,
        }
    }
}

/// Profile projection returned inside a per-user aggregate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: ObjectId,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            phone_number: user.mobile.phone_number,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Platform-wide verification counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationStats {
    pub total_users: u64,
    pub email_verified: u64,
    pub mobile_verified: u64,
    pub both_verified: u64,
}
