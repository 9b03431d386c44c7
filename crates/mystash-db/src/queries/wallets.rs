//! Per-currency user balances (service store).

use mystash_types::reports::CurrencyTotals;
use mystash_types::wallet::Wallet;
use mystash_types::{ObjectId, PageRequest, Paginated};
use rusqlite::{Connection, Row};

use super::{Table, NEWEST_FIRST};
use crate::columns::{get_id, get_id_opt, get_ts, get_ts_opt};
use crate::{Filter, Result};

pub const WALLETS: Table<Wallet> = Table {
    name: "wallets",
    columns: "id, public_id, auth, profile, currency, balance, last_updated, processor,
              deleted, created_at, updated_at",
    from_row,
};

fn from_row(row: &Row<'_>) -> rusqlite::Result<Wallet> {
    Ok(Wallet {
        id: get_id(row, "id")?,
        public_id: row.get("public_id")?,
        auth: get_id(row, "auth")?,
        profile: get_id_opt(row, "profile")?,
        currency: row.get("currency")?,
        balance: row.get("balance")?,
        last_updated: get_ts_opt(row, "last_updated")?,
        processor: row.get("processor")?,
        deleted: row.get("deleted")?,
        created_at: get_ts(row, "created_at")?,
        updated_at: get_ts(row, "updated_at")?,
    })
}

pub fn list(conn: &Connection, page: PageRequest) -> Result<Paginated<Wallet>> {
    WALLETS.page(conn, &Filter::live(), NEWEST_FIRST, page)
}

pub fn find_by_id(conn: &Connection, id: &ObjectId) -> Result<Option<Wallet>> {
    WALLETS.find_one(conn, &Filter::live().eq_id("id", id), NEWEST_FIRST)
}

pub fn by_auth(conn: &Connection, auth: &ObjectId, page: PageRequest) -> Result<Paginated<Wallet>> {
    WALLETS.page(conn, &Filter::live().eq_id("auth", auth), NEWEST_FIRST, page)
}

pub fn count_by_auth(conn: &Connection, auth: &ObjectId) -> Result<u64> {
    WALLETS.count(conn, &Filter::live().eq_id("auth", auth))
}

/// Balance summed per currency, platform-wide or for one owner.
pub fn balance_by_currency(conn: &Connection, auth: Option<&ObjectId>) -> Result<CurrencyTotals> {
    let mut filter = Filter::live();
    if let Some(auth) = auth {
        filter = filter.eq_id("auth", auth);
    }
    WALLETS.sum_by(conn, &filter, "currency", "balance")
}

/// Per currency: total balance and number of distinct owners.
pub fn balance_and_owners(conn: &Connection) -> Result<Vec<(String, f64, u64)>> {
    WALLETS.sum_and_owners_by_currency(conn, &Filter::live(), "balance", "auth")
}

#[cfg(any(test, feature = "fixtures"))]
pub fn insert(conn: &Connection, wallet: &Wallet) -> Result<()> {
    use crate::columns::{id_text, id_text_opt, millis, millis_opt};
    conn.execute(
        "INSERT INTO wallets (id, public_id, auth, profile, currency, balance, last_updated,
             processor, deleted, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        rusqlite::params![
            id_text(&wallet.id),
            wallet.public_id,
            id_text(&wallet.auth),
            id_text_opt(wallet.profile.as_ref()),
            wallet.currency,
            wallet.balance,
            millis_opt(wallet.last_updated),
            wallet.processor,
            wallet.deleted,
            millis(wallet.created_at),
            millis(wallet.updated_at),
        ],
    )?;
    Ok(())
}
