//! Entity builders for seeding stores in tests.
//!
//! Each builder returns a live record with plausible defaults; tests adjust
//! fields with struct update syntax and persist through the `insert`
//! function of the matching query module.

use chrono::{TimeZone, Utc};
use mystash_types::enums::{
    AccountType, Entry, SaveType, StrictStatus, TransactionStatus, TransferStatus,
};
use mystash_types::ledger::{BankDetails, Beneficiary, Payment, PaymentMeta, Rate, Transaction, Transfer};
use mystash_types::legacy::{LegacyTransaction, LegacyUser, LegacyUserStatistics};
use mystash_types::savings::{Interest, PlanWindow, Stash};
use mystash_types::user::{Mobile, User, Verifications};
use mystash_types::wallet::{Account, Wallet};
use mystash_types::{ObjectId, Timestamp};

/// Midnight UTC on the given date.
///
/// # Panics
///
/// Panics on an invalid calendar date.
#[allow(clippy::panic)]
pub fn day(year: i32, month: u32, day: u32) -> Timestamp {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_else(|| panic!("invalid fixture date {year}-{month}-{day}"))
}

/// Fixed reference time the builders stamp records with.
pub fn epoch() -> Timestamp {
    day(2024, 1, 15)
}

pub fn user(email: &str) -> User {
    User {
        id: ObjectId::new(),
        auth: ObjectId::new(),
        profile: Some(ObjectId::new()),
        unique_id: None,
        public_id: Some(format!("usr_{}", ObjectId::new())),
        email: email.to_string(),
        first_name: Some("Ada".into()),
        last_name: Some("Obi".into()),
        mobile: Mobile {
            phone_number: Some("+2348000000000".into()),
            iso_code: "NG".into(),
        },
        verifications: Verifications::default(),
        deleted: false,
        created_at: epoch(),
        updated_at: epoch(),
    }
}

pub fn stash(auth: ObjectId, currency: &str, balance: f64) -> Stash {
    Stash {
        id: ObjectId::new(),
        public_id: format!("stash_{}", ObjectId::new()),
        interest: None,
        auth,
        profile: None,
        name: "Rainy day".into(),
        save_type: SaveType::Regular,
        currency: currency.to_string(),
        target: balance * 2.0,
        current_interest: 0.0,
        duration: PlanWindow {
            start_date: day(2024, 1, 1),
            end_date: day(2099, 1, 1),
        },
        automation: None,
        strict_status: StrictStatus::Flex,
        start_save_on: None,
        balance,
        funding_sources: Vec::new(),
        processor: "mystash".into(),
        interest_data: None,
        deleted: false,
        created_at: epoch(),
        updated_at: epoch(),
    }
}

pub fn wallet(auth: ObjectId, currency: &str, balance: f64) -> Wallet {
    Wallet {
        id: ObjectId::new(),
        public_id: format!("wal_{}", ObjectId::new()),
        auth,
        profile: None,
        currency: currency.to_string(),
        balance,
        last_updated: None,
        processor: Some("mystash".into()),
        deleted: false,
        created_at: epoch(),
        updated_at: epoch(),
    }
}

pub fn transaction(auth: ObjectId, currency: &str, amount: f64) -> Transaction {
    let id = ObjectId::new();
    Transaction {
        id,
        public_id: format!("txn_{id}"),
        auth,
        profile: None,
        currency: currency.to_string(),
        entry: Entry::Credit,
        destination: None,
        destination_type: None,
        source: None,
        source_type: Some("Wallet".into()),
        amount,
        balance: amount,
        fee: 0.0,
        narration: None,
        reference: format!("ref_{id}"),
        debit_reference: None,
        t_ref: None,
        status: TransactionStatus::Success,
        completed_at: None,
        processor: None,
        meta: None,
        currency_pair: None,
        deleted: false,
        deleted_at: None,
        created_at: epoch(),
        updated_at: epoch(),
    }
}

pub fn payment(reference: &str, amount: f64) -> Payment {
    Payment {
        id: ObjectId::new(),
        currency: None,
        uid: None,
        amount,
        card_type: Some("visa".into()),
        last4: Some("4242".into()),
        verified: true,
        meta_data: Some(PaymentMeta::default()),
        reference: reference.to_string(),
        payment_type: "card".into(),
        category: Some("funding".into()),
        status: "success".into(),
        reason: None,
        user: None,
        deleted: false,
        created_at: epoch(),
        updated_at: epoch(),
    }
}

pub fn transfer(auth: ObjectId) -> Transfer {
    Transfer {
        id: ObjectId::new(),
        public_id: format!("trf_{}", ObjectId::new()),
        auth,
        profile: None,
        source_currency: "NGN".into(),
        funding_source: Some("wallet".into()),
        destination_currency: "GBP".into(),
        source_amount: 100_000.0,
        converted_amount: 50.0,
        country: Some("GB".into()),
        payment_method: Some("bank".into()),
        beneficiary: Beneficiary {
            first_name: Some("Tunde".into()),
            last_name: Some("Bello".into()),
            ..Beneficiary::default()
        },
        account: BankDetails::default(),
        rate: 2000.0,
        narration: None,
        currency_pair: Some("NGN/GBP".into()),
        status: TransferStatus::Pending,
        active: true,
        deleted: false,
        created_at: epoch(),
        updated_at: epoch(),
    }
}

pub fn account(currency: &str) -> Account {
    Account {
        id: ObjectId::new(),
        public_id: format!("acc_{}", ObjectId::new()),
        reference: None,
        account_type: AccountType::Bank,
        currency: currency.to_string(),
        processor: "mystash".into(),
        beneficiary_type: None,
        active: true,
        account_number: Some("0123456789".into()),
        account_name: Some("Ada Obi".into()),
        bank_name: Some("Test Bank".into()),
        bank_code: Some("058".into()),
        data: None,
        deleted: false,
        created_at: epoch(),
        updated_at: epoch(),
    }
}

pub fn rate(source: &str, destination: &str, rate: f64) -> Rate {
    Rate {
        id: ObjectId::new(),
        public_id: format!("rate_{}", ObjectId::new()),
        rate,
        source_currency: source.to_string(),
        destination_currency: destination.to_string(),
        source: "mystash".into(),
        min_amount: 0.0,
        fee: 0.0,
        active: true,
        is_default: false,
        deleted: false,
        created_at: epoch(),
        updated_at: epoch(),
    }
}

pub fn interest(public_id: &str) -> Interest {
    Interest {
        id: ObjectId::new(),
        public_id: public_id.to_string(),
        auth: None,
        profile: None,
        start_day: 0,
        end_day: 30,
        currency: "NGN".into(),
        percentage: 10.0,
        note: None,
        active: true,
        deleted: false,
        created_at: epoch(),
        updated_at: epoch(),
    }
}

pub fn legacy_user(uid: &str, email: &str) -> LegacyUser {
    LegacyUser {
        id: ObjectId::new(),
        uid: uid.to_string(),
        name: Some("Chidi Okeke".into()),
        email: email.to_string(),
        phone_number: None,
        onboarding_stage: Some("completed".into()),
        ambassador: false,
        personas: Vec::new(),
        suspended: false,
        disabled: false,
        email_verified: true,
        role: Some("user".into()),
        referral_code: None,
        deleted: false,
        created_at: epoch(),
    }
}

pub fn legacy_statistics(uid: &str) -> LegacyUserStatistics {
    LegacyUserStatistics {
        uid: uid.to_string(),
        ..LegacyUserStatistics::default()
    }
}

pub fn legacy_transaction(uid: &str, amount: f64, date: Timestamp) -> LegacyTransaction {
    let id = ObjectId::new();
    LegacyTransaction {
        id,
        entry: Entry::Credit,
        amount,
        narration: None,
        date,
        balance: amount,
        transaction_id: format!("ltx_{id}"),
        uid: uid.to_string(),
        obp_id: None,
        obp_name: None,
        deleted: false,
        created_at: date,
    }
}
