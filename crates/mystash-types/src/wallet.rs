//! Spendable balances and registered payment rails.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::enums::{AccountType, BeneficiaryType};
use crate::{ObjectId, Timestamp};

/// One currency balance owned by a user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub public_id: String,
    pub auth: ObjectId,
    pub profile: Option<ObjectId>,
    pub currency: String,
    pub balance: f64,
    pub last_updated: Option<Timestamp>,
    pub processor: Option<String>,
    pub deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A payment rail registration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub public_id: String,
    pub reference: Option<String>,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub currency: String,
    pub processor: String,
    pub beneficiary_type: Option<BeneficiaryType>,
    pub active: bool,
    pub account_number: Option<String>,
    pub account_name: Option<String>,
    pub bank_name: Option<String>,
    pub bank_code: Option<String>,
    pub data: Option<Value>,
    pub deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
