//! Legacy users and their statistics (dev store).
//!
//! Besides the `deleted` tombstone, disabled and suspended accounts are
//! treated as gone.

use mystash_types::legacy::{LegacyUser, LegacyUserStatistics};
use mystash_types::{PageRequest, Paginated};
use rusqlite::{Connection, Row};

use super::{Table, NEWEST_FIRST};
use crate::columns::{get_id, get_json, get_ts};
use crate::{Filter, Result};

pub const LEGACY_USERS: Table<LegacyUser> = Table {
    name: "legacy_users",
    columns: "id, uid, name, email, phone_number, onboarding_stage, ambassador, personas,
              suspended, disabled, email_verified, role, referral_code, deleted, created_at",
    from_row,
};

pub const LEGACY_STATISTICS: Table<LegacyUserStatistics> = Table {
    name: "legacy_user_statistics",
    columns: "uid, referred_mandates_activated, referred_mandates_created, referrals,
              withdrawals, cash_reserve_stashes, stashes, mandate_breaks, mandates,
              active_mandates, linked_cards, linked_accounts",
    from_row: statistics_from_row,
};

fn from_row(row: &Row<'_>) -> rusqlite::Result<LegacyUser> {
    Ok(LegacyUser {
        id: get_id(row, "id")?,
        uid: row.get("uid")?,
        name: row.get("name")?,
        email: row.get("email")?,
        phone_number: row.get("phone_number")?,
        onboarding_stage: row.get("onboarding_stage")?,
        ambassador: row.get("ambassador")?,
        personas: get_json(row, "personas")?,
        suspended: row.get("suspended")?,
        disabled: row.get("disabled")?,
        email_verified: row.get("email_verified")?,
        role: row.get("role")?,
        referral_code: row.get("referral_code")?,
        deleted: row.get("deleted")?,
        created_at: get_ts(row, "created_at")?,
    })
}

fn statistics_from_row(row: &Row<'_>) -> rusqlite::Result<LegacyUserStatistics> {
    let n = |name: &str| row.get::<_, i64>(name).map(|v| v.max(0) as u64);
    Ok(LegacyUserStatistics {
        uid: row.get("uid")?,
        referred_mandates_activated: n("referred_mandates_activated")?,
        referred_mandates_created: n("referred_mandates_created")?,
        referrals: n("referrals")?,
        withdrawals: n("withdrawals")?,
        cash_reserve_stashes: n("cash_reserve_stashes")?,
        stashes: n("stashes")?,
        mandate_breaks: n("mandate_breaks")?,
        mandates: n("mandates")?,
        active_mandates: n("active_mandates")?,
        linked_cards: n("linked_cards")?,
        linked_accounts: n("linked_accounts")?,
    })
}

/// Live, enabled, unsuspended accounts.
fn usable() -> Filter {
    Filter::live().raw("disabled = 0").raw("suspended = 0")
}

pub fn list(conn: &Connection, page: PageRequest) -> Result<Paginated<LegacyUser>> {
    LEGACY_USERS.page(conn, &usable(), NEWEST_FIRST, page)
}

pub fn find_by_email(conn: &Connection, email: &str) -> Result<Option<LegacyUser>> {
    LEGACY_USERS.find_one(conn, &usable().eq_nocase("email", email), NEWEST_FIRST)
}

pub fn find_by_uid(conn: &Connection, uid: &str) -> Result<Option<LegacyUser>> {
    LEGACY_USERS.find_one(conn, &usable().eq_text("uid", uid), NEWEST_FIRST)
}

pub fn statistics(conn: &Connection, uid: &str) -> Result<Option<LegacyUserStatistics>> {
    LEGACY_STATISTICS.find_one(conn, &Filter::live().eq_text("uid", uid), "uid")
}

#[cfg(any(test, feature = "fixtures"))]
pub fn insert(conn: &Connection, user: &LegacyUser) -> Result<()> {
    use crate::columns::{id_text, json, millis};
    conn.execute(
        "INSERT INTO legacy_users (id, uid, name, email, phone_number, onboarding_stage,
             ambassador, personas, suspended, disabled, email_verified, role, referral_code,
             deleted, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
        rusqlite::params![
            id_text(&user.id),
            user.uid,
            user.name,
            user.email,
            user.phone_number,
            user.onboarding_stage,
            user.ambassador,
            json(&user.personas)?,
            user.suspended,
            user.disabled,
            user.email_verified,
            user.role,
            user.referral_code,
            user.deleted,
            millis(user.created_at),
        ],
    )?;
    Ok(())
}

#[cfg(any(test, feature = "fixtures"))]
pub fn insert_statistics(conn: &Connection, stats: &LegacyUserStatistics) -> Result<()> {
    let n = |v: u64| i64::try_from(v).unwrap_or(i64::MAX);
    conn.execute(
        "INSERT INTO legacy_user_statistics (uid, referred_mandates_activated,
             referred_mandates_created, referrals, withdrawals, cash_reserve_stashes, stashes,
             mandate_breaks, mandates, active_mandates, linked_cards, linked_accounts)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        rusqlite::params![
            stats.uid,
            n(stats.referred_mandates_activated),
            n(stats.referred_mandates_created),
            n(stats.referrals),
            n(stats.withdrawals),
            n(stats.cash_reserve_stashes),
            n(stats.stashes),
            n(stats.mandate_breaks),
            n(stats.mandates),
            n(stats.active_mandates),
            n(stats.linked_cards),
            n(stats.linked_accounts),
        ],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::StoreKind;

    fn test_db() -> Connection {
        crate::open_memory(StoreKind::Dev).expect("open test db")
    }

    #[test]
    fn test_disabled_and_suspended_hidden() {
        let conn = test_db();
        insert(&conn, &fixtures::legacy_user("u1", "one@x.io")).expect("insert");
        let disabled = LegacyUser { disabled: true, ..fixtures::legacy_user("u2", "two@x.io") };
        let suspended = LegacyUser { suspended: true, ..fixtures::legacy_user("u3", "three@x.io") };
        let deleted = LegacyUser { deleted: true, ..fixtures::legacy_user("u4", "four@x.io") };
        for u in [&disabled, &suspended, &deleted] {
            insert(&conn, u).expect("insert");
        }

        let page = list(&conn, PageRequest::default()).expect("list");
        assert_eq!(page.pagination.total, 1);
        assert!(find_by_uid(&conn, "u2").expect("query").is_none());
        assert!(find_by_email(&conn, "THREE@x.io").expect("query").is_none());
        assert!(find_by_email(&conn, "ONE@x.io").expect("query").is_some());
    }

    #[test]
    fn test_statistics() {
        let conn = test_db();
        let stats = LegacyUserStatistics {
            referrals: 4,
            linked_cards: 2,
            ..fixtures::legacy_statistics("u1")
        };
        insert_statistics(&conn, &stats).expect("insert");
        assert_eq!(statistics(&conn, "u1").expect("query"), Some(stats));
        assert!(statistics(&conn, "u9").expect("query").is_none());
    }
}
