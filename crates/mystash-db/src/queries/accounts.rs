//! Payment rail registrations (service store).

use mystash_types::wallet::Account;
use mystash_types::{ObjectId, PageRequest, Paginated};
use rusqlite::{Connection, Row};

use super::{Table, NEWEST_FIRST};
use crate::columns::{get_enum, get_enum_opt, get_id, get_json_opt, get_ts};
use crate::{Filter, Result};

pub const ACCOUNTS: Table<Account> = Table {
    name: "accounts",
    columns: "id, public_id, reference, account_type, currency, processor, beneficiary_type,
              active, account_number, account_name, bank_name, bank_code, data, deleted,
              created_at, updated_at",
    from_row,
};

fn from_row(row: &Row<'_>) -> rusqlite::Result<Account> {
    Ok(Account {
        id: get_id(row, "id")?,
        public_id: row.get("public_id")?,
        reference: row.get("reference")?,
        account_type: get_enum(row, "account_type")?,
        currency: row.get("currency")?,
        processor: row.get("processor")?,
        beneficiary_type: get_enum_opt(row, "beneficiary_type")?,
        active: row.get("active")?,
        account_number: row.get("account_number")?,
        account_name: row.get("account_name")?,
        bank_name: row.get("bank_name")?,
        bank_code: row.get("bank_code")?,
        data: get_json_opt(row, "data")?,
        deleted: row.get("deleted")?,
        created_at: get_ts(row, "created_at")?,
        updated_at: get_ts(row, "updated_at")?,
    })
}

pub fn list(conn: &Connection, page: PageRequest) -> Result<Paginated<Account>> {
    ACCOUNTS.page(conn, &Filter::live(), NEWEST_FIRST, page)
}

pub fn find_by_id(conn: &Connection, id: &ObjectId) -> Result<Option<Account>> {
    ACCOUNTS.find_one(conn, &Filter::live().eq_id("id", id), NEWEST_FIRST)
}

#[cfg(any(test, feature = "fixtures"))]
pub fn insert(conn: &Connection, account: &Account) -> Result<()> {
    use crate::columns::{id_text, json_opt, millis};
    conn.execute(
        "INSERT INTO accounts (id, public_id, reference, account_type, currency, processor,
             beneficiary_type, active, account_number, account_name, bank_name, bank_code,
             data, deleted, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        rusqlite::params![
            id_text(&account.id),
            account.public_id,
            account.reference,
            account.account_type.as_str(),
            account.currency,
            account.processor,
            account.beneficiary_type.map(|b| b.as_str()),
            account.active,
            account.account_number,
            account.account_name,
            account.bank_name,
            account.bank_code,
            json_opt(account.data.as_ref())?,
            account.deleted,
            millis(account.created_at),
            millis(account.updated_at),
        ],
    )?;
    Ok(())
}
