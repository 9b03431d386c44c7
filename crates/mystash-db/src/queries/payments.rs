//! Gateway charges (service store).
//!
//! Charges carry two user identities: `metaData.uid` for current users and
//! `user` for legacy users. Neither is the `auth` reference.

use mystash_types::ledger::{Payment, PaymentStats};
use mystash_types::{ObjectId, PageRequest, Paginated, Timestamp};
use rusqlite::{params_from_iter, Connection, Row};

use super::{Table, NEWEST_FIRST};
use crate::columns::{get_id, get_json_opt, get_ts};
use crate::{Filter, Result};

pub const PAYMENTS: Table<Payment> = Table {
    name: "payments",
    columns: "id, conversion, uid, amount, card_type, last4, verified, meta_data, reference,
              payment_type, category, status, reason, user_uid, deleted, created_at,
              updated_at",
    from_row,
};

fn from_row(row: &Row<'_>) -> rusqlite::Result<Payment> {
    Ok(Payment {
        id: get_id(row, "id")?,
        currency: get_json_opt(row, "conversion")?,
        uid: row.get("uid")?,
        amount: row.get("amount")?,
        card_type: row.get("card_type")?,
        last4: row.get("last4")?,
        verified: row.get("verified")?,
        meta_data: get_json_opt(row, "meta_data")?,
        reference: row.get("reference")?,
        payment_type: row.get("payment_type")?,
        category: row.get("category")?,
        status: row.get("status")?,
        reason: row.get("reason")?,
        user: row.get("user_uid")?,
        deleted: row.get("deleted")?,
        created_at: get_ts(row, "created_at")?,
        updated_at: get_ts(row, "updated_at")?,
    })
}

pub fn list(conn: &Connection, page: PageRequest) -> Result<Paginated<Payment>> {
    PAYMENTS.page(conn, &Filter::live(), NEWEST_FIRST, page)
}

pub fn find_by_id(conn: &Connection, id: &ObjectId) -> Result<Option<Payment>> {
    PAYMENTS.find_one(conn, &Filter::live().eq_id("id", id), NEWEST_FIRST)
}

pub fn find_by_reference(conn: &Connection, reference: &str) -> Result<Option<Payment>> {
    PAYMENTS.find_one(conn, &Filter::live().eq_text("reference", reference), NEWEST_FIRST)
}

/// Charges whose `column` equals `value`, for status, type and category
/// listings.
fn by_column(
    conn: &Connection,
    column: &'static str,
    value: &str,
    page: PageRequest,
) -> Result<Paginated<Payment>> {
    PAYMENTS.page(conn, &Filter::live().eq_text(column, value), NEWEST_FIRST, page)
}

pub fn by_status(conn: &Connection, status: &str, page: PageRequest) -> Result<Paginated<Payment>> {
    by_column(conn, "status", status, page)
}

pub fn by_type(conn: &Connection, payment_type: &str, page: PageRequest) -> Result<Paginated<Payment>> {
    by_column(conn, "payment_type", payment_type, page)
}

pub fn by_category(conn: &Connection, category: &str, page: PageRequest) -> Result<Paginated<Payment>> {
    by_column(conn, "category", category, page)
}

/// Charges created within `[from, until]`, optionally for one legacy user.
pub fn between(
    conn: &Connection,
    from: Timestamp,
    until: Timestamp,
    user: Option<&str>,
) -> Result<Vec<Payment>> {
    let filter = Filter::live()
        .between("created_at", from, until)
        .eq_opt("user_uid", user.map(str::to_string));
    PAYMENTS.find(conn, &filter, NEWEST_FIRST)
}

/// The `n` most recent charges whose metadata names `uid`.
pub fn recent_by_meta_uid(conn: &Connection, uid: &str, n: u32) -> Result<Vec<Payment>> {
    let filter = Filter::live().eq_text("meta_uid", uid);
    PAYMENTS.find_window(conn, &filter, NEWEST_FIRST, u64::from(n), 0)
}

pub fn count_by_meta_uid(conn: &Connection, uid: &str) -> Result<u64> {
    PAYMENTS.count(conn, &Filter::live().eq_text("meta_uid", uid))
}

/// A legacy user's charges.
pub fn by_user(conn: &Connection, user: &str, page: PageRequest) -> Result<Paginated<Payment>> {
    by_column(conn, "user_uid", user, page)
}

/// Totals over every live charge, or over one legacy user's charges.
pub fn stats(conn: &Connection, user: Option<&str>) -> Result<PaymentStats> {
    let filter = Filter::live().eq_opt("user_uid", user.map(str::to_string));
    let sql = format!(
        "SELECT COUNT(*), COALESCE(SUM(amount), 0), COALESCE(AVG(amount), 0),
                COALESCE(SUM(status = 'success'), 0), COALESCE(SUM(status = 'failed'), 0)
         FROM payments {}",
        filter.where_clause()
    );
    let stats = conn.query_row(&sql, params_from_iter(filter.params()), |row| {
        Ok(PaymentStats {
            total_payments: row.get::<_, i64>(0)?.max(0) as u64,
            total_amount: row.get(1)?,
            average_amount: row.get(2)?,
            successful_payments: row.get::<_, i64>(3)?.max(0) as u64,
            failed_payments: row.get::<_, i64>(4)?.max(0) as u64,
        })
    })?;
    Ok(stats)
}

#[cfg(any(test, feature = "fixtures"))]
pub fn insert(conn: &Connection, payment: &Payment) -> Result<()> {
    use crate::columns::{id_text, json_opt, millis};
    let meta_uid = payment.meta_data.as_ref().and_then(|m| m.uid.clone());
    conn.execute(
        "INSERT INTO payments (id, conversion, uid, amount, card_type, last4, verified,
             meta_uid, meta_data, reference, payment_type, category, status, reason,
             user_uid, deleted, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)",
        rusqlite::params![
            id_text(&payment.id),
            json_opt(payment.currency.as_ref())?,
            payment.uid,
            payment.amount,
            payment.card_type,
            payment.last4,
            payment.verified,
            meta_uid,
            json_opt(payment.meta_data.as_ref())?,
            payment.reference,
            payment.payment_type,
            payment.category,
            payment.status,
            payment.reason,
            payment.user,
            payment.deleted,
            millis(payment.created_at),
            millis(payment.updated_at),
        ],
    )?;
    Ok(())
}
