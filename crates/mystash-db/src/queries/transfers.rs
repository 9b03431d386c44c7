//! Beneficiary payouts (service store).

use mystash_types::enums::TransferStatus;
use mystash_types::ledger::Transfer;
use mystash_types::{ObjectId, PageRequest, Paginated};
use rusqlite::{Connection, Row};

use super::{Table, NEWEST_FIRST};
use crate::columns::{get_enum, get_id, get_id_opt, get_json, get_ts};
use crate::{Filter, Result};

pub const TRANSFERS: Table<Transfer> = Table {
    name: "transfers",
    columns: "id, public_id, auth, profile, source_currency, funding_source,
              destination_currency, source_amount, converted_amount, country, payment_method,
              beneficiary, account, rate, narration, currency_pair, status, active, deleted,
              created_at, updated_at",
    from_row,
};

fn from_row(row: &Row<'_>) -> rusqlite::Result<Transfer> {
    Ok(Transfer {
        id: get_id(row, "id")?,
        public_id: row.get("public_id")?,
        auth: get_id(row, "auth")?,
        profile: get_id_opt(row, "profile")?,
        source_currency: row.get("source_currency")?,
        funding_source: row.get("funding_source")?,
        destination_currency: row.get("destination_currency")?,
        source_amount: row.get("source_amount")?,
        converted_amount: row.get("converted_amount")?,
        country: row.get("country")?,
        payment_method: row.get("payment_method")?,
        beneficiary: get_json(row, "beneficiary")?,
        account: get_json(row, "account")?,
        rate: row.get("rate")?,
        narration: row.get("narration")?,
        currency_pair: row.get("currency_pair")?,
        status: get_enum(row, "status")?,
        active: row.get("active")?,
        deleted: row.get("deleted")?,
        created_at: get_ts(row, "created_at")?,
        updated_at: get_ts(row, "updated_at")?,
    })
}

pub fn list(conn: &Connection, page: PageRequest) -> Result<Paginated<Transfer>> {
    TRANSFERS.page(conn, &Filter::live(), NEWEST_FIRST, page)
}

pub fn find_by_id(conn: &Connection, id: &ObjectId) -> Result<Option<Transfer>> {
    TRANSFERS.find_one(conn, &Filter::live().eq_id("id", id), NEWEST_FIRST)
}

pub fn by_auth(conn: &Connection, auth: &ObjectId, page: PageRequest) -> Result<Paginated<Transfer>> {
    TRANSFERS.page(conn, &Filter::live().eq_id("auth", auth), NEWEST_FIRST, page)
}

pub fn count_by_auth(conn: &Connection, auth: &ObjectId) -> Result<u64> {
    TRANSFERS.count(conn, &Filter::live().eq_id("auth", auth))
}

pub fn by_status(
    conn: &Connection,
    status: TransferStatus,
    page: PageRequest,
) -> Result<Paginated<Transfer>> {
    let filter = Filter::live().eq_text("status", status.as_str());
    TRANSFERS.page(conn, &filter, NEWEST_FIRST, page)
}

#[cfg(any(test, feature = "fixtures"))]
pub fn insert(conn: &Connection, transfer: &Transfer) -> Result<()> {
    use crate::columns::{id_text, id_text_opt, json, millis};
    conn.execute(
        "INSERT INTO transfers (id, public_id, auth, profile, source_currency, funding_source,
             destination_currency, source_amount, converted_amount, country, payment_method,
             beneficiary, account, rate, narration, currency_pair, status, active, deleted,
             created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17,
                 ?18, ?19, ?20, ?21)",
        rusqlite::params![
            id_text(&transfer.id),
            transfer.public_id,
            id_text(&transfer.auth),
            id_text_opt(transfer.profile.as_ref()),
            transfer.source_currency,
            transfer.funding_source,
            transfer.destination_currency,
            transfer.source_amount,
            transfer.converted_amount,
            transfer.country,
            transfer.payment_method,
            json(&transfer.beneficiary)?,
            json(&transfer.account)?,
            transfer.rate,
            transfer.narration,
            transfer.currency_pair,
            transfer.status.as_str(),
            transfer.active,
            transfer.deleted,
            millis(transfer.created_at),
            millis(transfer.updated_at),
        ],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::StoreKind;

    #[test]
    fn test_by_status() {
        let conn = crate::open_memory(StoreKind::Service).expect("open");
        let owner = ObjectId::new();
        let done = Transfer { status: TransferStatus::Completed, ..fixtures::transfer(owner) };
        insert(&conn, &done).expect("insert");
        insert(&conn, &fixtures::transfer(owner)).expect("insert");

        let page = by_status(&conn, TransferStatus::Completed, PageRequest::default()).expect("page");
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0], done);
        assert_eq!(count_by_auth(&conn, &owner).expect("count"), 2);
    }

    #[test]
    fn test_deleted_transfers_are_invisible() {
        let conn = crate::open_memory(StoreKind::Service).expect("open");
        let owner = ObjectId::new();
        let live = fixtures::transfer(owner);
        let gone = Transfer { deleted: true, ..fixtures::transfer(owner) };
        insert(&conn, &live).expect("insert");
        insert(&conn, &gone).expect("insert");

        let all = list(&conn, PageRequest::default()).expect("list");
        assert_eq!(all.pagination.total, 1);
        assert_eq!(all.data, vec![live.clone()]);
        assert!(find_by_id(&conn, &gone.id).expect("query").is_none());
        assert_eq!(find_by_id(&conn, &live.id).expect("query"), Some(live));

        let owned = by_auth(&conn, &owner, PageRequest::default()).expect("by auth");
        assert_eq!(owned.pagination.total, 1);
        assert_eq!(count_by_auth(&conn, &owner).expect("count"), 1);
        let pending = by_status(&conn, TransferStatus::Pending, PageRequest::default()).expect("by status");
        assert_eq!(pending.pagination.total, 1);
        assert!(pending.data.iter().all(|t| !t.deleted));
    }
}
