//! Currency-pair exchange rates (service store).

use mystash_types::ledger::Rate;
use mystash_types::ObjectId;
use rusqlite::{Connection, Row};

use super::{Table, NEWEST_FIRST};
use crate::columns::{get_id, get_ts};
use crate::{Filter, Result};

pub const RATES: Table<Rate> = Table {
    name: "rates",
    columns: "id, public_id, rate, source_currency, destination_currency, source, min_amount,
              fee, active, is_default, deleted, created_at, updated_at",
    from_row,
};

fn from_row(row: &Row<'_>) -> rusqlite::Result<Rate> {
    Ok(Rate {
        id: get_id(row, "id")?,
        public_id: row.get("public_id")?,
        rate: row.get("rate")?,
        source_currency: row.get("source_currency")?,
        destination_currency: row.get("destination_currency")?,
        source: row.get("source")?,
        min_amount: row.get("min_amount")?,
        fee: row.get("fee")?,
        active: row.get("active")?,
        is_default: row.get("is_default")?,
        deleted: row.get("deleted")?,
        created_at: get_ts(row, "created_at")?,
        updated_at: get_ts(row, "updated_at")?,
    })
}

pub fn all(conn: &Connection) -> Result<Vec<Rate>> {
    RATES.find(conn, &Filter::live(), NEWEST_FIRST)
}

pub fn active(conn: &Connection) -> Result<Vec<Rate>> {
    RATES.find(conn, &Filter::live().flag("active", true), NEWEST_FIRST)
}

/// The active rate for a pair. Default rates win over newer ones.
pub fn find_by_pair(conn: &Connection, source: &str, destination: &str) -> Result<Option<Rate>> {
    let filter = Filter::live()
        .eq_text("source_currency", source)
        .eq_text("destination_currency", destination)
        .flag("active", true);
    RATES.find_one(conn, &filter, "is_default DESC, created_at DESC")
}

pub fn find_by_public_id(conn: &Connection, public_id: &str) -> Result<Option<Rate>> {
    RATES.find_one(conn, &Filter::live().eq_text("public_id", public_id), NEWEST_FIRST)
}

pub fn find_by_id(conn: &Connection, id: &ObjectId) -> Result<Option<Rate>> {
    RATES.find_one(conn, &Filter::live().eq_id("id", id), NEWEST_FIRST)
}

#[cfg(any(test, feature = "fixtures"))]
pub fn insert(conn: &Connection, rate: &Rate) -> Result<()> {
    use crate::columns::{id_text, millis};
    conn.execute(
        "INSERT INTO rates (id, public_id, rate, source_currency, destination_currency, source,
             min_amount, fee, active, is_default, deleted, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        rusqlite::params![
            id_text(&rate.id),
            rate.public_id,
            rate.rate,
            rate.source_currency,
            rate.destination_currency,
            rate.source,
            rate.min_amount,
            rate.fee,
            rate.active,
            rate.is_default,
            rate.deleted,
            millis(rate.created_at),
            millis(rate.updated_at),
        ],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{self, day};
    use crate::StoreKind;

    #[test]
    fn test_pair_prefers_default() {
        let conn = crate::open_memory(StoreKind::Service).expect("open");
        let default = Rate {
            is_default: true,
            created_at: day(2023, 1, 1),
            ..fixtures::rate("NGN", "USD", 0.0006)
        };
        let newer = Rate { created_at: day(2024, 1, 1), ..fixtures::rate("NGN", "USD", 0.0007) };
        let inactive = Rate { active: false, ..fixtures::rate("USD", "NGN", 1500.0) };
        for r in [&default, &newer, &inactive] {
            insert(&conn, r).expect("insert");
        }

        let found = find_by_pair(&conn, "NGN", "USD").expect("query").expect("present");
        assert_eq!(found.id, default.id);
        assert!(find_by_pair(&conn, "USD", "NGN").expect("query").is_none());
        assert_eq!(all(&conn).expect("all").len(), 3);
        assert_eq!(active(&conn).expect("active").len(), 2);
    }

    #[test]
    fn test_deleted_rates_are_invisible() {
        let conn = crate::open_memory(StoreKind::Service).expect("open");
        let live = fixtures::rate("GBP", "NGN", 2000.0);
        let gone = Rate {
            is_default: true,
            deleted: true,
            ..fixtures::rate("GBP", "NGN", 1900.0)
        };
        insert(&conn, &live).expect("insert");
        insert(&conn, &gone).expect("insert");

        assert_eq!(all(&conn).expect("all"), vec![live.clone()]);
        assert_eq!(active(&conn).expect("active").len(), 1);
        let found = find_by_pair(&conn, "GBP", "NGN").expect("query").expect("present");
        assert_eq!(found.id, live.id, "a deleted default never wins the pair");
        assert!(find_by_id(&conn, &gone.id).expect("query").is_none());
        assert!(find_by_public_id(&conn, &gone.public_id).expect("query").is_none());
        assert_eq!(find_by_public_id(&conn, &live.public_id).expect("query"), Some(live));
    }
}
