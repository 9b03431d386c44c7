//! Ledger entries (service store).

use mystash_types::enums::{Currency, Entry, SourceType, TransactionStatus};
use mystash_types::ledger::{Transaction, TransactionStats};
use mystash_types::reports::CurrencyTotals;
use mystash_types::{ObjectId, PageRequest, Paginated, Timestamp};
use rusqlite::{params_from_iter, Connection, Row};

use super::{Table, NEWEST_FIRST};
use crate::columns::{get_enum, get_id, get_id_opt, get_json_opt, get_ts, get_ts_opt};
use crate::{Filter, Result};

pub const TRANSACTIONS: Table<Transaction> = Table {
    name: "transactions",
    columns: "id, public_id, auth, profile, currency, entry, destination, destination_type,
              source, source_type, amount, balance, fee, narration, reference,
              debit_reference, t_ref, status, completed_at, processor, meta, currency_pair,
              deleted, deleted_at, created_at, updated_at",
    from_row,
};

fn from_row(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        id: get_id(row, "id")?,
        public_id: row.get("public_id")?,
        auth: get_id(row, "auth")?,
        profile: get_id_opt(row, "profile")?,
        currency: row.get("currency")?,
        entry: get_enum(row, "entry")?,
        destination: get_json_opt(row, "destination")?,
        destination_type: row.get("destination_type")?,
        source: get_json_opt(row, "source")?,
        source_type: row.get("source_type")?,
        amount: row.get("amount")?,
        balance: row.get("balance")?,
        fee: row.get("fee")?,
        narration: row.get("narration")?,
        reference: row.get("reference")?,
        debit_reference: row.get("debit_reference")?,
        t_ref: row.get("t_ref")?,
        status: get_enum(row, "status")?,
        completed_at: get_ts_opt(row, "completed_at")?,
        processor: row.get("processor")?,
        meta: get_json_opt(row, "meta")?,
        currency_pair: row.get("currency_pair")?,
        deleted: row.get("deleted")?,
        deleted_at: get_ts_opt(row, "deleted_at")?,
        created_at: get_ts(row, "created_at")?,
        updated_at: get_ts(row, "updated_at")?,
    })
}

/// Optional equality and range filters over the ledger. Unset fields do
/// not constrain the result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionQuery {
    pub currency: Option<Currency>,
    pub entry: Option<Entry>,
    pub source_type: Option<SourceType>,
    pub status: Option<TransactionStatus>,
    pub auth: Option<ObjectId>,
    /// Inclusive lower bound on `created_at`.
    pub from: Option<Timestamp>,
    /// Inclusive upper bound on `created_at`.
    pub until: Option<Timestamp>,
    pub reference: Option<String>,
    pub destination_type: Option<String>,
}

impl TransactionQuery {
    fn filter(&self) -> Filter {
        let text = |s: &str| s.to_string();
        let mut filter = Filter::live()
            .eq_opt("currency", self.currency.map(|c| text(c.as_str())))
            .eq_opt("entry", self.entry.map(|e| text(e.as_str())))
            .eq_opt("source_type", self.source_type.map(|s| text(s.as_str())))
            .eq_opt("status", self.status.map(|s| text(s.as_str())))
            .eq_opt("auth", self.auth.map(|a| a.to_hex()))
            .eq_opt("reference", self.reference.clone())
            .eq_opt("destination_type", self.destination_type.clone());
        if let Some(from) = self.from {
            filter = filter.since("created_at", from);
        }
        if let Some(until) = self.until {
            filter = filter.at_or_before("created_at", until);
        }
        filter
    }
}

pub fn list(conn: &Connection, page: PageRequest) -> Result<Paginated<Transaction>> {
    TRANSACTIONS.page(conn, &Filter::live(), NEWEST_FIRST, page)
}

pub fn search(
    conn: &Connection,
    query: &TransactionQuery,
    page: PageRequest,
) -> Result<Paginated<Transaction>> {
    TRANSACTIONS.page(conn, &query.filter(), NEWEST_FIRST, page)
}

/// Every match, unpaginated.
pub fn search_all(conn: &Connection, query: &TransactionQuery) -> Result<Vec<Transaction>> {
    TRANSACTIONS.find(conn, &query.filter(), NEWEST_FIRST)
}

pub fn find_by_id(conn: &Connection, id: &ObjectId) -> Result<Option<Transaction>> {
    TRANSACTIONS.find_one(conn, &Filter::live().eq_id("id", id), NEWEST_FIRST)
}

pub fn find_by_reference(conn: &Connection, reference: &str) -> Result<Option<Transaction>> {
    TRANSACTIONS.find_one(conn, &Filter::live().eq_text("reference", reference), NEWEST_FIRST)
}

pub fn by_auth(
    conn: &Connection,
    auth: &ObjectId,
    page: PageRequest,
) -> Result<Paginated<Transaction>> {
    TRANSACTIONS.page(conn, &Filter::live().eq_id("auth", auth), NEWEST_FIRST, page)
}

pub fn count_by_auth(conn: &Connection, auth: &ObjectId) -> Result<u64> {
    TRANSACTIONS.count(conn, &Filter::live().eq_id("auth", auth))
}

/// A user's entries created in `[from, until)`.
pub fn by_auth_in(
    conn: &Connection,
    auth: &ObjectId,
    from: Timestamp,
    until: Timestamp,
) -> Result<Vec<Transaction>> {
    let filter = Filter::live()
        .eq_id("auth", auth)
        .since("created_at", from)
        .before("created_at", until);
    TRANSACTIONS.find(conn, &filter, NEWEST_FIRST)
}

/// Amount summed per currency over successful entries.
pub fn success_volume_by_currency(conn: &Connection) -> Result<CurrencyTotals> {
    let filter = Filter::live().eq_text("status", TransactionStatus::Success.as_str());
    TRANSACTIONS.sum_by(conn, &filter, "currency", "amount")
}

/// Direction and status counters for one user.
pub fn stats(conn: &Connection, auth: &ObjectId) -> Result<TransactionStats> {
    let filter = Filter::live().eq_id("auth", auth);
    let sql = format!(
        "SELECT COUNT(*),
                COALESCE(SUM(entry = 'credit'), 0),
                COALESCE(SUM(entry = 'debit'), 0),
                COALESCE(SUM(status = 'success'), 0),
                COALESCE(SUM(status = 'pending'), 0),
                COALESCE(SUM(status = 'failed'), 0)
         FROM transactions {}",
        filter.where_clause()
    );
    let stats = conn.query_row(&sql, params_from_iter(filter.params()), |row| {
        let n = |i: usize| row.get::<_, i64>(i).map(|v| v.max(0) as u64);
        Ok(TransactionStats {
            total_transactions: n(0)?,
            total_credits: n(1)?,
            total_debits: n(2)?,
            successful_transactions: n(3)?,
            pending_transactions: n(4)?,
            failed_transactions: n(5)?,
        })
    })?;
    Ok(stats)
}

#[cfg(any(test, feature = "fixtures"))]
pub fn insert(conn: &Connection, tx: &Transaction) -> Result<()> {
    use crate::columns::{id_text, id_text_opt, json_opt, millis, millis_opt};
    conn.execute(
        "INSERT INTO transactions (id, public_id, auth, profile, currency, entry, destination,
             destination_type, source, source_type, amount, balance, fee, narration, reference,
             debit_reference, t_ref, status, completed_at, processor, meta, currency_pair,
             deleted, deleted_at, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17,
                 ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26)",
        rusqlite::params![
            id_text(&tx.id),
            tx.public_id,
            id_text(&tx.auth),
            id_text_opt(tx.profile.as_ref()),
            tx.currency,
            tx.entry.as_str(),
            json_opt(tx.destination.as_ref())?,
            tx.destination_type,
            json_opt(tx.source.as_ref())?,
            tx.source_type,
            tx.amount,
            tx.balance,
            tx.fee,
            tx.narration,
            tx.reference,
            tx.debit_reference,
            tx.t_ref,
            tx.status.as_str(),
            millis_opt(tx.completed_at),
            tx.processor,
            json_opt(tx.meta.as_ref())?,
            tx.currency_pair,
            tx.deleted,
            millis_opt(tx.deleted_at),
            millis(tx.created_at),
            millis(tx.updated_at),
        ],
    )?;
    Ok(())
}
