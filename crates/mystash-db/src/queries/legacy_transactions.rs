//! Legacy ledger entries (dev store). Ordered by booking `date`.

use mystash_types::legacy::LegacyTransaction;
use mystash_types::{ObjectId, PageRequest, Paginated, Timestamp};
use rusqlite::{Connection, Row};

use super::Table;
use crate::columns::{get_enum, get_id, get_ts};
use crate::{Filter, Result};

/// Most recently booked first.
const BY_DATE: &str = "date DESC, id DESC";

pub const LEGACY_TRANSACTIONS: Table<LegacyTransaction> = Table {
    name: "legacy_transactions",
    columns: "id, entry, amount, narration, date, balance, transaction_id, uid, obp_id,
              obp_name, deleted, created_at",
    from_row,
};

fn from_row(row: &Row<'_>) -> rusqlite::Result<LegacyTransaction> {
    Ok(LegacyTransaction {
        id: get_id(row, "id")?,
        entry: get_enum(row, "entry")?,
        amount: row.get("amount")?,
        narration: row.get("narration")?,
        date: get_ts(row, "date")?,
        balance: row.get("balance")?,
        transaction_id: row.get("transaction_id")?,
        uid: row.get("uid")?,
        obp_id: row.get("obp_id")?,
        obp_name: row.get("obp_name")?,
        deleted: row.get("deleted")?,
        created_at: get_ts(row, "created_at")?,
    })
}

pub fn list(conn: &Connection, page: PageRequest) -> Result<Paginated<LegacyTransaction>> {
    LEGACY_TRANSACTIONS.page(conn, &Filter::live(), BY_DATE, page)
}

pub fn find_by_id(conn: &Connection, id: &ObjectId) -> Result<Option<LegacyTransaction>> {
    LEGACY_TRANSACTIONS.find_one(conn, &Filter::live().eq_id("id", id), BY_DATE)
}

pub fn by_uid(conn: &Connection, uid: &str, page: PageRequest) -> Result<Paginated<LegacyTransaction>> {
    LEGACY_TRANSACTIONS.page(conn, &Filter::live().eq_text("uid", uid), BY_DATE, page)
}

/// A user's entries booked in `[from, until)`.
pub fn by_uid_in(
    conn: &Connection,
    uid: &str,
    from: Timestamp,
    until: Timestamp,
) -> Result<Vec<LegacyTransaction>> {
    let filter = Filter::live()
        .eq_text("uid", uid)
        .since("date", from)
        .before("date", until);
    LEGACY_TRANSACTIONS.find(conn, &filter, BY_DATE)
}

/// Entries booked within `[from, until]`, optionally for one user.
pub fn between(
    conn: &Connection,
    from: Timestamp,
    until: Timestamp,
    uid: Option<&str>,
) -> Result<Vec<LegacyTransaction>> {
    let filter = Filter::live()
        .between("date", from, until)
        .eq_opt("uid", uid.map(str::to_string));
    LEGACY_TRANSACTIONS.find(conn, &filter, BY_DATE)
}

#[cfg(any(test, feature = "fixtures"))]
pub fn insert(conn: &Connection, tx: &LegacyTransaction) -> Result<()> {
    use crate::columns::{id_text, millis};
    conn.execute(
        "INSERT INTO legacy_transactions (id, entry, amount, narration, date, balance,
             transaction_id, uid, obp_id, obp_name, deleted, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        rusqlite::params![
            id_text(&tx.id),
            tx.entry.as_str(),
            tx.amount,
            tx.narration,
            millis(tx.date),
            tx.balance,
            tx.transaction_id,
            tx.uid,
            tx.obp_id,
            tx.obp_name,
            tx.deleted,
            millis(tx.created_at),
        ],
    )?;
    Ok(())
}
