//! Savings plans (service store).

use mystash_types::enums::SaveType;
use mystash_types::reports::{CurrencyTotals, SaveTypeBreakdown, StashOverview};
use mystash_types::savings::Stash;
use mystash_types::{ObjectId, PageRequest, Paginated, Timestamp};
use rusqlite::{params_from_iter, Connection, Row};

use super::{Table, NEWEST_FIRST};
use crate::columns::{get_enum, get_id, get_id_opt, get_json, get_json_opt, get_ts, get_ts_opt};
use crate::{Filter, Result};

pub const STASHES: Table<Stash> = Table {
    name: "stashes",
    columns: "id, public_id, interest, auth, profile, name, save_type, currency, target,
              current_interest, start_date, end_date, automation, strict_status,
              start_save_on, balance, funding_sources, processor, interest_data, deleted,
              created_at, updated_at",
    from_row,
};

fn from_row(row: &Row<'_>) -> rusqlite::Result<Stash> {
    Ok(Stash {
        id: get_id(row, "id")?,
        public_id: row.get("public_id")?,
        interest: get_id_opt(row, "interest")?,
        auth: get_id(row, "auth")?,
        profile: get_id_opt(row, "profile")?,
        name: row.get("name")?,
        save_type: get_enum(row, "save_type")?,
        currency: row.get("currency")?,
        target: row.get("target")?,
        current_interest: row.get("current_interest")?,
        duration: mystash_types::savings::PlanWindow {
            start_date: get_ts(row, "start_date")?,
            end_date: get_ts(row, "end_date")?,
        },
        automation: get_json_opt(row, "automation")?,
        strict_status: get_enum(row, "strict_status")?,
        start_save_on: get_ts_opt(row, "start_save_on")?,
        balance: row.get("balance")?,
        funding_sources: get_json(row, "funding_sources")?,
        processor: row.get("processor")?,
        interest_data: get_json_opt(row, "interest_data")?,
        deleted: row.get("deleted")?,
        created_at: get_ts(row, "created_at")?,
        updated_at: get_ts(row, "updated_at")?,
    })
}

pub fn list(conn: &Connection, page: PageRequest) -> Result<Paginated<Stash>> {
    STASHES.page(conn, &Filter::live(), NEWEST_FIRST, page)
}

pub fn find_by_id(conn: &Connection, id: &ObjectId) -> Result<Option<Stash>> {
    STASHES.find_one(conn, &Filter::live().eq_id("id", id), NEWEST_FIRST)
}

pub fn by_auth(conn: &Connection, auth: &ObjectId, page: PageRequest) -> Result<Paginated<Stash>> {
    STASHES.page(conn, &Filter::live().eq_id("auth", auth), NEWEST_FIRST, page)
}

/// Every live stash a user owns.
pub fn all_by_auth(conn: &Connection, auth: &ObjectId) -> Result<Vec<Stash>> {
    STASHES.find(conn, &Filter::live().eq_id("auth", auth), NEWEST_FIRST)
}

pub fn by_save_type(
    conn: &Connection,
    save_type: SaveType,
    page: PageRequest,
) -> Result<Paginated<Stash>> {
    let filter = Filter::live().eq_text("save_type", save_type.as_str());
    STASHES.page(conn, &filter, NEWEST_FIRST, page)
}

/// Stashes whose window contains `now`: `start_date <= now < end_date`.
pub fn active(conn: &Connection, now: Timestamp, auth: Option<&ObjectId>) -> Result<Vec<Stash>> {
    let mut filter = Filter::live()
        .at_or_before("start_date", now)
        .after("end_date", now);
    if let Some(auth) = auth {
        filter = filter.eq_id("auth", auth);
    }
    STASHES.find(conn, &filter, NEWEST_FIRST)
}

/// Up to `n` stashes whose window closed at or before `now`, most recently
/// matured first.
pub fn matured(conn: &Connection, now: Timestamp, n: u32) -> Result<Vec<Stash>> {
    let filter = Filter::live().at_or_before("end_date", now);
    STASHES.find_window(conn, &filter, "end_date DESC, id DESC", u64::from(n), 0)
}

/// Balance summed per currency, optionally restricted to one save type
/// or one owner.
pub fn balance_by_currency(
    conn: &Connection,
    save_type: Option<SaveType>,
    auth: Option<&ObjectId>,
) -> Result<CurrencyTotals> {
    let mut filter = Filter::live().eq_opt("save_type", save_type.map(|t| t.as_str().to_string()));
    if let Some(auth) = auth {
        filter = filter.eq_id("auth", auth);
    }
    STASHES.sum_by(conn, &filter, "currency", "balance")
}

/// Per currency: total balance and number of distinct owners.
pub fn balance_and_owners(conn: &Connection) -> Result<Vec<(String, f64, u64)>> {
    STASHES.sum_and_owners_by_currency(conn, &Filter::live(), "balance", "auth")
}

pub fn count(conn: &Connection) -> Result<u64> {
    STASHES.count(conn, &Filter::live())
}

pub fn count_by_auth(conn: &Connection, auth: &ObjectId) -> Result<u64> {
    STASHES.count(conn, &Filter::live().eq_id("auth", auth))
}

/// Totals over every live stash a user owns.
pub fn overview(conn: &Connection, auth: &ObjectId) -> Result<StashOverview> {
    let filter = Filter::live().eq_id("auth", auth);
    let sql = format!(
        "SELECT COUNT(*), COALESCE(SUM(balance), 0), COALESCE(SUM(target), 0),
                COALESCE(SUM(current_interest), 0), COALESCE(AVG(balance), 0)
         FROM stashes {}",
        filter.where_clause()
    );
    let overview = conn.query_row(&sql, params_from_iter(filter.params()), |row| {
        Ok(StashOverview {
            total_stashes: row.get::<_, i64>(0)?.max(0) as u64,
            total_balance: row.get(1)?,
            total_target: row.get(2)?,
            total_current_interest: row.get(3)?,
            avg_balance: mystash_types::reports::round2(row.get(4)?),
        })
    })?;
    Ok(overview)
}

/// Count, balance and target per save type for one owner.
pub fn breakdown_by_save_type(conn: &Connection, auth: &ObjectId) -> Result<Vec<SaveTypeBreakdown>> {
    let filter = Filter::live().eq_id("auth", auth);
    let sql = format!(
        "SELECT save_type, COUNT(*), COALESCE(SUM(balance), 0), COALESCE(SUM(target), 0)
         FROM stashes {} GROUP BY save_type ORDER BY save_type",
        filter.where_clause()
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(filter.params()), |row| {
            Ok(SaveTypeBreakdown {
                save_type: get_enum(row, "save_type")?,
                count: row.get::<_, i64>(1)?.max(0) as u64,
                total_balance: row.get(2)?,
                total_target: row.get(3)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

#[cfg(any(test, feature = "fixtures"))]
pub fn insert(conn: &Connection, stash: &Stash) -> Result<()> {
    use crate::columns::{id_text, id_text_opt, json, json_opt, millis, millis_opt};
    conn.execute(
        "INSERT INTO stashes (id, public_id, interest, auth, profile, name, save_type, currency,
             target, current_interest, start_date, end_date, automation, strict_status,
             start_save_on, balance, funding_sources, processor, interest_data, deleted,
             created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17,
                 ?18, ?19, ?20, ?21, ?22)",
        rusqlite::params![
            id_text(&stash.id),
            stash.public_id,
            id_text_opt(stash.interest.as_ref()),
            id_text(&stash.auth),
            id_text_opt(stash.profile.as_ref()),
            stash.name,
            stash.save_type.as_str(),
            stash.currency,
            stash.target,
            stash.current_interest,
            millis(stash.duration.start_date),
            millis(stash.duration.end_date),
            json_opt(stash.automation.as_ref())?,
            stash.strict_status.as_str(),
            millis_opt(stash.start_save_on),
            stash.balance,
            json(&stash.funding_sources)?,
            stash.processor,
            json_opt(stash.interest_data.as_ref())?,
            stash.deleted,
            millis(stash.created_at),
            millis(stash.updated_at),
        ],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{self, day};
    use crate::StoreKind;
    use mystash_types::savings::PlanWindow;

    fn test_db() -> Connection {
        crate::open_memory(StoreKind::Service).expect("open test db")
    }

    fn window(start: Timestamp, end: Timestamp) -> PlanWindow {
        PlanWindow { start_date: start, end_date: end }
    }

    #[test]
    fn test_find_by_id_skips_deleted() {
        let conn = test_db();
        let live = fixtures::stash(ObjectId::new(), "NGN", 100.0);
        let gone = Stash { deleted: true, ..fixtures::stash(ObjectId::new(), "NGN", 100.0) };
        insert(&conn, &live).expect("insert");
        insert(&conn, &gone).expect("insert");

        assert!(find_by_id(&conn, &live.id).expect("query").is_some());
        assert!(find_by_id(&conn, &gone.id).expect("query").is_none());
    }

    #[test]
    fn test_matured_ordering_and_cap() {
        let conn = test_db();
        let now = day(2024, 6, 1);
        for month in 1..=6u32 {
            let stash = Stash {
                duration: window(day(2023, 1, 1), day(2024, month, 1)),
                ..fixtures::stash(ObjectId::new(), "USD", 10.0)
            };
            insert(&conn, &stash).expect("insert");
        }
        let tombstoned = Stash {
            deleted: true,
            duration: window(day(2023, 1, 1), day(2024, 5, 20)),
            ..fixtures::stash(ObjectId::new(), "USD", 10.0)
        };
        insert(&conn, &tombstoned).expect("insert");

        let plans = matured(&conn, now, 5).expect("matured");
        assert_eq!(plans.len(), 5);
        assert_eq!(plans[0].duration.end_date, day(2024, 6, 1));
        assert_eq!(plans[4].duration.end_date, day(2024, 2, 1));
        assert!(plans.iter().all(|p| !p.deleted));
    }

    #[test]
    fn test_active_window() {
        let conn = test_db();
        let owner = ObjectId::new();
        let now = day(2024, 6, 1);
        let running = Stash {
            duration: window(day(2024, 1, 1), day(2024, 12, 1)),
            ..fixtures::stash(owner, "NGN", 1.0)
        };
        let future = Stash {
            duration: window(day(2024, 7, 1), day(2024, 12, 1)),
            ..fixtures::stash(owner, "NGN", 1.0)
        };
        let ended = Stash {
            duration: window(day(2024, 1, 1), now),
            ..fixtures::stash(owner, "NGN", 1.0)
        };
        let other = Stash {
            duration: window(day(2024, 1, 1), day(2024, 12, 1)),
            ..fixtures::stash(ObjectId::new(), "NGN", 1.0)
        };
        for s in [&running, &future, &ended, &other] {
            insert(&conn, s).expect("insert");
        }

        assert_eq!(active(&conn, now, None).expect("active").len(), 2);
        let mine = active(&conn, now, Some(&owner)).expect("active");
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, running.id);
    }

    #[test]
    fn test_balance_by_currency_and_type() {
        let conn = test_db();
        let owner = ObjectId::new();
        insert(&conn, &fixtures::stash(owner, "USD", 10.0)).expect("insert");
        insert(&conn, &Stash { save_type: SaveType::Target, ..fixtures::stash(owner, "USD", 5.0) })
            .expect("insert");
        insert(&conn, &fixtures::stash(ObjectId::new(), "NGN", 700.0)).expect("insert");
        insert(&conn, &fixtures::stash(ObjectId::new(), "EUR", 3.0)).expect("insert");

        let all = balance_by_currency(&conn, None, None).expect("sum");
        assert_eq!(all.get("USD"), Some(&15.0));
        assert_eq!(all.get("EUR"), Some(&3.0));

        let target = balance_by_currency(&conn, Some(SaveType::Target), None).expect("sum");
        assert_eq!(target.len(), 1);
        assert_eq!(target.get("USD"), Some(&5.0));

        let mine = balance_by_currency(&conn, None, Some(&owner)).expect("sum");
        assert_eq!(mine.get("NGN"), None);
    }

    #[test]
    fn test_overview_and_breakdown() {
        let conn = test_db();
        let owner = ObjectId::new();
        let a = Stash { target: 100.0, current_interest: 1.5, ..fixtures::stash(owner, "NGN", 10.0) };
        let b = Stash { target: 50.0, current_interest: 0.5, ..fixtures::stash(owner, "NGN", 20.0) };
        let c = Stash {
            save_type: SaveType::Salary,
            target: 10.0,
            current_interest: 0.0,
            ..fixtures::stash(owner, "NGN", 0.0)
        };
        for s in [&a, &b, &c] {
            insert(&conn, s).expect("insert");
        }

        let o = overview(&conn, &owner).expect("overview");
        assert_eq!(o.total_stashes, 3);
        assert_eq!(o.total_balance, 30.0);
        assert_eq!(o.total_target, 160.0);
        assert_eq!(o.total_current_interest, 2.0);
        assert_eq!(o.avg_balance, 10.0);

        let parts = breakdown_by_save_type(&conn, &owner).expect("breakdown");
        assert_eq!(parts.len(), 2);
        let regular = parts.iter().find(|p| p.save_type == SaveType::Regular).expect("regular");
        assert_eq!(regular.count, 2);
        assert_eq!(regular.total_target, 150.0);
    }

    #[test]
    fn test_empty_overview() {
        let conn = test_db();
        let o = overview(&conn, &ObjectId::new()).expect("overview");
        assert_eq!(o, StashOverview::default());
    }
}
