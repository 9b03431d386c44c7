//! Platform-wide rollups for the admin dashboard.
//!
//! Every figure here is computed on read; nothing is cached between
//! requests. Store faults propagate, except while building the signup
//! chart, which degrades to zero counts.

use std::collections::BTreeMap;

use chrono::{Datelike, TimeZone, Utc};
use mystash_db::queries::{stashes, transactions, users, wallets};
use mystash_types::enums::SaveType;
use mystash_types::reports::{
    signup_series, DashboardAggregate, SavingsAggregate, SignupPoint, UsdNgn, CHART_YEARS,
};
use mystash_types::savings::MaturePlan;
use mystash_types::user::RecentUser;
use mystash_types::{Timestamp, MATURE_PLANS_LIMIT, RECENT_USERS};
use tracing::warn;

use crate::error::{fault, ServiceResult};
use crate::state::AdminState;

/// `[Jan 1 of year, Jan 1 of year + 1)` in UTC, if representable.
fn year_bounds(year: i32) -> Option<(Timestamp, Timestamp)> {
    let from = Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).single()?;
    let until = Utc.with_ymd_and_hms(year.checked_add(1)?, 1, 1, 0, 0, 0).single()?;
    Some((from, until))
}

async fn signups_in(state: &AdminState, year: i32) -> Vec<SignupPoint> {
    let Some((from, until)) = year_bounds(year) else {
        warn!(year, "signup chart year out of range");
        return signup_series([0; 12]);
    };
    match state
        .stores
        .auth
        .run(|c| users::monthly_signups(c, from, until))
        .await
    {
        Ok(counts) => signup_series(counts),
        Err(e) => {
            warn!(year, error = %e, "signup chart unavailable");
            signup_series([0; 12])
        }
    }
}

/// Monthly signups for `year` (current year when absent). An unparseable
/// year yields twelve zero points.
pub async fn signup_chart(state: &AdminState, year: Option<&str>) -> Vec<SignupPoint> {
    let year = match year.map(str::trim).filter(|s| !s.is_empty()) {
        None => Utc::now().year(),
        Some(raw) => match raw.parse::<i32>() {
            Ok(year) => year,
            Err(_) => {
                warn!(year = raw, "invalid signup chart year");
                return signup_series([0; 12]);
            }
        },
    };
    signups_in(state, year).await
}

/// Signup charts for the fixed reporting years plus the current one,
/// keyed by year.
pub async fn signup_chart_all_years(state: &AdminState) -> BTreeMap<String, Vec<SignupPoint>> {
    let mut years: Vec<i32> = CHART_YEARS.to_vec();
    let current = Utc::now().year();
    if !years.contains(&current) {
        years.push(current);
    }
    let mut charts = BTreeMap::new();
    for year in years {
        charts.insert(year.to_string(), signups_in(state, year).await);
    }
    charts
}

pub async fn aggregate(state: &AdminState) -> ServiceResult<DashboardAggregate> {
    let service = &state.stores.service;
    let auth = &state.stores.auth;
    let (savings, wallet_totals, volume, total_users, recent) = tokio::try_join!(
        service.run(|c| stashes::balance_by_currency(c, None, None)),
        service.run(|c| wallets::balance_by_currency(c, None)),
        service.run(transactions::success_volume_by_currency),
        auth.run(users::count),
        auth.run(|c| users::recent(c, RECENT_USERS)),
    )
    .map_err(fault)?;
    let signup_chart_data = signup_chart_all_years(state).await;

    Ok(DashboardAggregate {
        total_savings_balance: UsdNgn::from_totals(&savings),
        total_wallet_balance: wallet_totals,
        total_transaction_volume: volume,
        total_users,
        recent_users: recent.into_iter().map(RecentUser::from).collect(),
        signup_chart_data,
    })
}

pub async fn savings_aggregate(state: &AdminState) -> ServiceResult<SavingsAggregate> {
    let service = &state.stores.service;
    let now = Utc::now();
    let (total, regular, target, salary, plans, matured) = tokio::try_join!(
        service.run(|c| stashes::balance_by_currency(c, None, None)),
        service.run(|c| stashes::balance_by_currency(c, Some(SaveType::Regular), None)),
        service.run(|c| stashes::balance_by_currency(c, Some(SaveType::Target), None)),
        service.run(|c| stashes::balance_by_currency(c, Some(SaveType::Salary), None)),
        service.run(stashes::count),
        service.run(|c| stashes::matured(c, now, MATURE_PLANS_LIMIT)),
    )
    .map_err(fault)?;

    Ok(SavingsAggregate {
        total_savings_balance: UsdNgn::from_totals(&total),
        regular_savings: UsdNgn::from_totals(&regular),
        target_savings: UsdNgn::from_totals(&target),
        salary_savings: UsdNgn::from_totals(&salary),
        total_savings_plans: plans,
        mature_plans: matured.into_iter().map(MaturePlan::from).collect(),
    })
}
