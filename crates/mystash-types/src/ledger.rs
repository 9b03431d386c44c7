//! Money movement records: ledger transactions, gateway payments,
//! beneficiary transfers and the exchange rates they use.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::enums::{Entry, TransactionStatus, TransferStatus};
use crate::{ObjectId, Timestamp};

/// A ledger entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub public_id: String,
    pub auth: ObjectId,
    pub profile: Option<ObjectId>,
    pub currency: String,
    pub entry: Entry,
    pub destination: Option<Value>,
    pub destination_type: Option<String>,
    pub source: Option<Value>,
    pub source_type: Option<String>,
    pub amount: f64,
    pub balance: f64,
    pub fee: f64,
    pub narration: Option<String>,
    pub reference: String,
    pub debit_reference: Option<String>,
    #[serde(rename = "tRef")]
    pub t_ref: Option<String>,
    pub status: TransactionStatus,
    pub completed_at: Option<Timestamp>,
    pub processor: Option<String>,
    pub meta: Option<Value>,
    pub currency_pair: Option<String>,
    pub deleted: bool,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Per-user ledger counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionStats {
    pub total_transactions: u64,
    pub total_credits: u64,
    pub total_debits: u64,
    pub successful_transactions: u64,
    pub pending_transactions: u64,
    pub failed_transactions: u64,
}

/// Records that fell on one calendar day.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayGroup<T> {
    pub transactions: Vec<T>,
    pub count: usize,
    pub total_amount: f64,
}

impl<T> DayGroup<T> {
    pub fn new(transactions: Vec<T>, amount: impl Fn(&T) -> f64) -> Self {
        let total_amount = transactions.iter().map(amount).sum();
        Self {
            count: transactions.len(),
            transactions,
            total_amount,
        }
    }
}

/// Today's and yesterday's records for a user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecentActivity<T> {
    pub today: DayGroup<T>,
    pub yesterday: DayGroup<T>,
}

/// Currency conversion applied to a gateway charge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversion {
    pub from: Option<String>,
    pub to: Option<String>,
    pub conversion_rate: Option<f64>,
}

/// Metadata the gateway attaches to a charge.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMeta {
    /// Hex `auth` identity of the paying user.
    pub uid: Option<String>,
    pub email: Option<String>,
    pub card_id: Option<String>,
    pub mandate_id: Option<String>,
    pub account_id: Option<String>,
    pub total_transaction_amount: Option<f64>,
    pub currency: Option<String>,
}

/// A card or gateway charge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub currency: Option<Conversion>,
    pub uid: Option<String>,
    pub amount: f64,
    pub card_type: Option<String>,
    pub last4: Option<String>,
    pub verified: bool,
    pub meta_data: Option<PaymentMeta>,
    pub reference: String,
    #[serde(rename = "type")]
    pub payment_type: String,
    pub category: Option<String>,
    pub status: String,
    pub reason: Option<String>,
    /// Legacy user identity the charge belongs to.
    pub user: Option<String>,
    pub deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStats {
    pub total_payments: u64,
    pub total_amount: f64,
    pub average_amount: f64,
    pub successful_payments: u64,
    pub failed_payments: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Beneficiary {
    #[serde(rename = "type")]
    pub beneficiary_type: Option<String>,
    pub company_name: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
    pub mobile: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankDetails {
    pub account_number: Option<String>,
    pub sort_code: Option<String>,
    pub swift_code: Option<String>,
}

/// A cross-currency payout to a beneficiary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub public_id: String,
    pub auth: ObjectId,
    pub profile: Option<ObjectId>,
    pub source_currency: String,
    pub funding_source: Option<String>,
    pub destination_currency: String,
    pub source_amount: f64,
    /// Amount in the destination currency, converted upstream.
    pub converted_amount: f64,
    pub country: Option<String>,
    pub payment_method: Option<String>,
    pub beneficiary: Beneficiary,
    pub account: BankDetails,
    pub rate: f64,
    pub narration: Option<String>,
    pub currency_pair: Option<String>,
    pub status: TransferStatus,
    pub active: bool,
    pub deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Exchange rate for one currency pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rate {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub public_id: String,
    pub rate: f64,
    pub source_currency: String,
    pub destination_currency: String,
    pub source: String,
    pub min_amount: f64,
    pub fee: f64,
    pub active: bool,
    pub is_default: bool,
    pub deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_group_totals() {
        let group = DayGroup::new(vec![100.0, 250.5], |a| *a);
        assert_eq!(group.count, 2);
        assert_eq!(group.total_amount, 350.5);
    }

    #[test]
    fn test_empty_day_group() {
        let group: DayGroup<f64> = DayGroup::new(Vec::new(), |a| *a);
        assert_eq!(group.count, 0);
        assert_eq!(group.total_amount, 0.0);
    }
}
