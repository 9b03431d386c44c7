//! Derived reporting views: dashboard rollups and per-user aggregates.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::enums::SaveType;
use crate::ledger::{Payment, Transaction, Transfer};
use crate::savings::{MaturePlan, Stash};
use crate::user::{RecentUser, UserProfile};
use crate::wallet::Wallet;
use crate::RecentSlice;

/// Three-letter month labels, January first.
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Years always present in the all-years signup chart, besides the current one.
pub const CHART_YEARS: [i32; 4] = [2021, 2022, 2023, 2024];

/// Totals keyed by arbitrary currency code.
pub type CurrencyTotals = BTreeMap<String, f64>;

/// A total restricted to the two reported currencies.
///
/// Any other currency present in the data is dropped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize, ts_rs::TS)]
pub struct UsdNgn {
    #[serde(rename = "USD")]
    pub usd: f64,
    #[serde(rename = "NGN")]
    pub ngn: f64,
}

impl UsdNgn {
    pub fn from_totals(totals: &CurrencyTotals) -> Self {
        Self {
            usd: totals.get("USD").copied().unwrap_or(0.0),
            ngn: totals.get("NGN").copied().unwrap_or(0.0),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
pub struct SignupPoint {
    pub month: String,
    pub signups: u64,
}

/// Twelve points labelled Jan..Dec from per-month counts (index 0 = January).
pub fn signup_series(counts: [u64; 12]) -> Vec<SignupPoint> {
    MONTH_LABELS
        .iter()
        .zip(counts)
        .map(|(month, signups)| SignupPoint {
            month: (*month).to_string(),
            signups,
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ts_rs::TS)]
#[serde(rename_all = "camelCase")]
pub struct DashboardAggregate {
    pub total_savings_balance: UsdNgn,
    pub total_wallet_balance: CurrencyTotals,
    pub total_transaction_volume: CurrencyTotals,
    pub total_users: u64,
    pub recent_users: Vec<RecentUser>,
    pub signup_chart_data: BTreeMap<String, Vec<SignupPoint>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ts_rs::TS)]
#[serde(rename_all = "camelCase")]
pub struct SavingsAggregate {
    pub total_savings_balance: UsdNgn,
    pub regular_savings: UsdNgn,
    pub target_savings: UsdNgn,
    pub salary_savings: UsdNgn,
    pub total_savings_plans: u64,
    pub mature_plans: Vec<MaturePlan>,
}

/// A user's wallet and stash balances in the reported currencies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserBalances {
    pub wallets: UsdNgn,
    pub stashes: UsdNgn,
    pub total: UsdNgn,
}

impl UserBalances {
    pub fn new(wallets: UsdNgn, stashes: UsdNgn) -> Self {
        Self {
            wallets,
            stashes,
            total: UsdNgn {
                usd: wallets.usd + stashes.usd,
                ngn: wallets.ngn + stashes.ngn,
            },
        }
    }
}

/// Sum of balances in one currency and how many distinct owners hold them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceBucket {
    pub total_balance: f64,
    pub user_count: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BucketsUsdNgn {
    #[serde(rename = "USD")]
    pub usd: BalanceBucket,
    #[serde(rename = "NGN")]
    pub ngn: BalanceBucket,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedBucket {
    pub total_balance: f64,
    /// The larger of the wallet and stash owner counts, not a true union.
    pub unique_users: u64,
}

impl CombinedBucket {
    pub fn merge(wallets: BalanceBucket, stashes: BalanceBucket) -> Self {
        Self {
            total_balance: wallets.total_balance + stashes.total_balance,
            unique_users: wallets.user_count.max(stashes.user_count),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CombinedUsdNgn {
    #[serde(rename = "USD")]
    pub usd: CombinedBucket,
    #[serde(rename = "NGN")]
    pub ngn: CombinedBucket,
}

/// Platform-wide balances across every user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateBalances {
    pub wallets: BucketsUsdNgn,
    pub stashes: BucketsUsdNgn,
    pub combined: CombinedUsdNgn,
}

impl AggregateBalances {
    pub fn new(wallets: BucketsUsdNgn, stashes: BucketsUsdNgn) -> Self {
        Self {
            wallets,
            stashes,
            combined: CombinedUsdNgn {
                usd: CombinedBucket::merge(wallets.usd, stashes.usd),
                ngn: CombinedBucket::merge(wallets.ngn, stashes.ngn),
            },
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StashOverview {
    pub total_stashes: u64,
    pub total_balance: f64,
    pub total_target: f64,
    pub total_current_interest: f64,
    /// Rounded to two decimal places.
    pub avg_balance: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveTypeBreakdown {
    pub save_type: SaveType,
    pub count: u64,
    pub total_balance: f64,
    pub total_target: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStashStats {
    pub overview: StashOverview,
    pub save_type_breakdown: Vec<SaveTypeBreakdown>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateCounts {
    pub stashes: u64,
    pub wallets: u64,
    pub transactions: u64,
    pub transfers: u64,
    pub payments: u64,
}

/// Summary figures of a per-user aggregate.
///
/// `total_balance` and `total_stash_value` are summed over the records in
/// `recent_data` only, not over the user's full collections.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateSummary {
    pub total_balance: f64,
    pub total_stash_value: f64,
    pub counts: AggregateCounts,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecentData {
    pub stashes: RecentSlice<Stash>,
    pub wallets: RecentSlice<Wallet>,
    pub transactions: RecentSlice<Transaction>,
    pub transfers: RecentSlice<Transfer>,
    pub payments: RecentSlice<Payment>,
}

/// Everything known about one user, across stores.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAggregate {
    pub user: UserProfile,
    pub summary: AggregateSummary,
    pub recent_data: RecentData,
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
