//! Interest-rate schedules (service store).
//!
//! The only table this service writes to: schedules can be created,
//! updated and soft-deleted. Deletion is terminal; nothing reactivates a
//! deleted schedule.

use chrono::Utc;
use mystash_types::savings::Interest;
use mystash_types::ObjectId;
use rusqlite::{params_from_iter, Connection, Row};
use rusqlite::types::Value;

use super::{constraint, Table, NEWEST_FIRST};
use crate::columns::{get_id, get_id_opt, get_ts, id_text, id_text_opt, millis, text_opt};
use crate::{DbError, Filter, Result};

pub const INTERESTS: Table<Interest> = Table {
    name: "interests",
    columns: "id, public_id, auth, profile, start_day, end_day, currency, percentage, note,
              active, deleted, created_at, updated_at",
    from_row,
};

fn from_row(row: &Row<'_>) -> rusqlite::Result<Interest> {
    Ok(Interest {
        id: get_id(row, "id")?,
        public_id: row.get("public_id")?,
        auth: get_id_opt(row, "auth")?,
        profile: get_id_opt(row, "profile")?,
        start_day: row.get("start_day")?,
        end_day: row.get("end_day")?,
        currency: row.get("currency")?,
        percentage: row.get("percentage")?,
        note: row.get("note")?,
        active: row.get("active")?,
        deleted: row.get("deleted")?,
        created_at: get_ts(row, "created_at")?,
        updated_at: get_ts(row, "updated_at")?,
    })
}

pub fn all(conn: &Connection) -> Result<Vec<Interest>> {
    INTERESTS.find(conn, &Filter::live(), NEWEST_FIRST)
}

pub fn active(conn: &Connection) -> Result<Vec<Interest>> {
    INTERESTS.find(conn, &Filter::live().flag("active", true), NEWEST_FIRST)
}

/// Active schedules in one currency, shortest tenor first.
pub fn active_by_currency(conn: &Connection, currency: &str) -> Result<Vec<Interest>> {
    let filter = Filter::live().flag("active", true).eq_text("currency", currency);
    INTERESTS.find(conn, &filter, "start_day ASC, end_day ASC")
}

pub fn by_auth(conn: &Connection, auth: &ObjectId) -> Result<Vec<Interest>> {
    INTERESTS.find(conn, &Filter::live().eq_id("auth", auth), NEWEST_FIRST)
}

pub fn by_profile(conn: &Connection, profile: &ObjectId) -> Result<Vec<Interest>> {
    INTERESTS.find(conn, &Filter::live().eq_id("profile", profile), NEWEST_FIRST)
}

pub fn find_by_public_id(conn: &Connection, public_id: &str) -> Result<Option<Interest>> {
    INTERESTS.find_one(conn, &Filter::live().eq_text("public_id", public_id), NEWEST_FIRST)
}

pub fn find_by_id(conn: &Connection, id: &ObjectId) -> Result<Option<Interest>> {
    INTERESTS.find_one(conn, &Filter::live().eq_id("id", id), NEWEST_FIRST)
}

/// Persist a new schedule. A taken `public_id` is a constraint violation,
/// whether or not the holder is deleted.
pub fn insert(conn: &Connection, interest: &Interest) -> Result<()> {
    conn.execute(
        "INSERT INTO interests (id, public_id, auth, profile, start_day, end_day, currency,
             percentage, note, active, deleted, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        rusqlite::params![
            id_text(&interest.id),
            interest.public_id,
            id_text_opt(interest.auth.as_ref()),
            id_text_opt(interest.profile.as_ref()),
            interest.start_day,
            interest.end_day,
            interest.currency,
            interest.percentage,
            interest.note,
            interest.active,
            interest.deleted,
            millis(interest.created_at),
            millis(interest.updated_at),
        ],
    )
    .map_err(|e| constraint(e, "interest publicId already exists"))?;
    Ok(())
}

/// Overwrite the mutable fields of a live schedule.
pub fn update(conn: &Connection, interest: &Interest) -> Result<()> {
    let filter = Filter::live().eq_id("id", &interest.id);
    let sql = format!(
        "UPDATE interests SET start_day = ?, end_day = ?, currency = ?, percentage = ?,
             note = ?, active = ?, updated_at = ?
         {}",
        filter.where_clause()
    );
    let leading = [
        Value::Integer(i64::from(interest.start_day)),
        Value::Integer(i64::from(interest.end_day)),
        Value::Text(interest.currency.clone()),
        Value::Real(interest.percentage),
        text_opt(interest.note.as_deref()),
        Value::Integer(i64::from(interest.active)),
        Value::Integer(millis(interest.updated_at)),
    ];
    let params: Vec<Value> = leading.into_iter().chain(filter.params().iter().cloned()).collect();
    let updated = conn.execute(&sql, params_from_iter(params))?;
    if updated == 0 {
        return Err(DbError::NotFound("interest".into()));
    }
    Ok(())
}

/// Tombstone a live schedule: `deleted = 1`, `active = 0`.
pub fn soft_delete(conn: &Connection, id: &ObjectId) -> Result<()> {
    let filter = Filter::live().eq_id("id", id);
    let sql = format!(
        "UPDATE interests SET deleted = 1, active = 0, updated_at = ? {}",
        filter.where_clause()
    );
    let params: Vec<Value> = std::iter::once(Value::Integer(millis(Utc::now())))
        .chain(filter.params().iter().cloned())
        .collect();
    let updated = conn.execute(&sql, params_from_iter(params))?;
    if updated == 0 {
        return Err(DbError::NotFound("interest".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::StoreKind;

    fn test_db() -> Connection {
        crate::open_memory(StoreKind::Service).expect("open test db")
    }

    #[test]
    fn test_duplicate_public_id_is_constraint() {
        let conn = test_db();
        insert(&conn, &fixtures::interest("int-1")).expect("first insert");
        let result = insert(&conn, &fixtures::interest("int-1"));
        assert!(matches!(result, Err(DbError::Constraint(_))));
    }

    #[test]
    fn test_soft_delete_is_terminal() {
        let conn = test_db();
        let interest = fixtures::interest("int-1");
        insert(&conn, &interest).expect("insert");

        soft_delete(&conn, &interest.id).expect("delete");
        assert!(find_by_id(&conn, &interest.id).expect("query").is_none());
        assert!(all(&conn).expect("all").is_empty());
        assert!(matches!(
            soft_delete(&conn, &interest.id),
            Err(DbError::NotFound(_))
        ));

        let (deleted, active): (bool, bool) = conn
            .query_row(
                "SELECT deleted, active FROM interests WHERE id = ?1",
                [interest.id.to_hex()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .expect("raw row");
        assert!(deleted);
        assert!(!active);
    }

    #[test]
    fn test_update_skips_deleted() {
        let conn = test_db();
        let mut interest = fixtures::interest("int-1");
        insert(&conn, &interest).expect("insert");
        interest.percentage = 15.0;
        update(&conn, &interest).expect("update");
        let stored = find_by_id(&conn, &interest.id).expect("query").expect("present");
        assert_eq!(stored.percentage, 15.0);

        soft_delete(&conn, &interest.id).expect("delete");
        assert!(matches!(update(&conn, &interest), Err(DbError::NotFound(_))));
    }

    #[test]
    fn test_active_by_currency() {
        let conn = test_db();
        let long = mystash_types::savings::Interest {
            start_day: 31,
            end_day: 90,
            ..fixtures::interest("long")
        };
        let short = fixtures::interest("short");
        let usd = mystash_types::savings::Interest {
            currency: "USD".into(),
            ..fixtures::interest("usd")
        };
        for i in [&long, &short, &usd] {
            insert(&conn, i).expect("insert");
        }
        let found = active_by_currency(&conn, "NGN").expect("query");
        let ids: Vec<_> = found.iter().map(|i| i.public_id.as_str()).collect();
        assert_eq!(ids, vec!["short", "long"]);
    }
}
