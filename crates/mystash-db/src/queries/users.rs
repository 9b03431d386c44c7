//! Platform users (auth store).

use mystash_types::user::{Mobile, User, Verifications, VerificationStats};
use mystash_types::{ObjectId, PageRequest, Paginated, Timestamp};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row};

use super::{Table, NEWEST_FIRST};
use crate::columns::{get_id, get_id_opt, get_ts};
use crate::{Filter, Result};

pub const USERS: Table<User> = Table {
    name: "users",
    columns: "id, auth, profile, unique_id, public_id, email, first_name, last_name,
              phone_number, iso_code, email_verified, mobile_verified, deleted,
              created_at, updated_at",
    from_row,
};

fn from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: get_id(row, "id")?,
        auth: get_id(row, "auth")?,
        profile: get_id_opt(row, "profile")?,
        unique_id: row.get("unique_id")?,
        public_id: row.get("public_id")?,
        email: row.get("email")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        mobile: Mobile {
            phone_number: row.get("phone_number")?,
            iso_code: row.get("iso_code")?,
        },
        verifications: Verifications {
            email: row.get("email_verified")?,
            mobile: row.get("mobile_verified")?,
        },
        deleted: row.get("deleted")?,
        created_at: get_ts(row, "created_at")?,
        updated_at: get_ts(row, "updated_at")?,
    })
}

pub fn list(conn: &Connection, page: PageRequest) -> Result<Paginated<User>> {
    USERS.page(conn, &Filter::live(), NEWEST_FIRST, page)
}

/// Email match ignores ASCII case.
pub fn find_by_email(conn: &Connection, email: &str) -> Result<Option<User>> {
    USERS.find_one(conn, &Filter::live().eq_nocase("email", email), NEWEST_FIRST)
}

pub fn find_by_auth(conn: &Connection, auth: &ObjectId) -> Result<Option<User>> {
    USERS.find_one(conn, &Filter::live().eq_id("auth", auth), NEWEST_FIRST)
}

/// Users whose `auth` is one of `auths`. Unknown identities are skipped.
pub fn find_by_auths(conn: &Connection, auths: &[ObjectId]) -> Result<Vec<User>> {
    let values = auths.iter().map(|a| Value::Text(a.to_hex())).collect();
    USERS.find(conn, &Filter::live().is_in("auth", values), NEWEST_FIRST)
}

pub fn count(conn: &Connection) -> Result<u64> {
    USERS.count(conn, &Filter::live())
}

/// The `n` most recently created users.
pub fn recent(conn: &Connection, n: u32) -> Result<Vec<User>> {
    USERS.find_window(conn, &Filter::live(), NEWEST_FIRST, u64::from(n), 0)
}

/// Users created in `[from, until)`, counted per calendar month (UTC).
/// Index 0 is January.
pub fn monthly_signups(conn: &Connection, from: Timestamp, until: Timestamp) -> Result<[u64; 12]> {
    let filter = Filter::live()
        .since("created_at", from)
        .before("created_at", until);
    let sql = format!(
        "SELECT CAST(strftime('%m', created_at / 1000, 'unixepoch') AS INTEGER) AS month,
                COUNT(*)
         FROM users {} GROUP BY month",
        filter.where_clause()
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(filter.params()), |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut counts = [0u64; 12];
    for (month, n) in rows {
        if let Some(slot) = usize::try_from(month - 1).ok().and_then(|i| counts.get_mut(i)) {
            *slot = n.max(0) as u64;
        }
    }
    Ok(counts)
}

/// Platform-wide verification counters.
pub fn verification_stats(conn: &Connection) -> Result<VerificationStats> {
    Ok(VerificationStats {
        total_users: USERS.count(conn, &Filter::live())?,
        email_verified: USERS.count(conn, &Filter::live().flag("email_verified", true))?,
        mobile_verified: USERS.count(conn, &Filter::live().flag("mobile_verified", true))?,
        both_verified: USERS.count(
            conn,
            &Filter::live()
                .flag("email_verified", true)
                .flag("mobile_verified", true),
        )?,
    })
}

#[cfg(any(test, feature = "fixtures"))]
pub fn insert(conn: &Connection, user: &User) -> Result<()> {
    use crate::columns::{id_text, id_text_opt, millis};
    conn.execute(
        "INSERT INTO users (id, auth, profile, unique_id, public_id, email, first_name,
             last_name, phone_number, iso_code, email_verified, mobile_verified, deleted,
             created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
        rusqlite::params![
            id_text(&user.id),
            id_text(&user.auth),
            id_text_opt(user.profile.as_ref()),
            user.unique_id,
            user.public_id,
            user.email,
            user.first_name,
            user.last_name,
            user.mobile.phone_number,
            user.mobile.iso_code,
            user.verifications.email,
            user.verifications.mobile,
            user.deleted,
            millis(user.created_at),
            millis(user.updated_at),
        ],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{self, day};
    use crate::StoreKind;

    fn test_db() -> Connection {
        crate::open_memory(StoreKind::Auth).expect("open test db")
    }

    #[test]
    fn test_list_excludes_deleted_newest_first() {
        let conn = test_db();
        let old = User { created_at: day(2023, 1, 1), ..fixtures::user("old@x.io") };
        let new = User { created_at: day(2024, 1, 1), ..fixtures::user("new@x.io") };
        let gone = User { deleted: true, ..fixtures::user("gone@x.io") };
        for u in [&old, &new, &gone] {
            insert(&conn, u).expect("insert");
        }

        let page = list(&conn, PageRequest::new(1, 20)).expect("list");
        assert_eq!(page.pagination.total, 2);
        assert_eq!(page.data[0].email, "new@x.io");
        assert_eq!(page.data[1].email, "old@x.io");
    }

    #[test]
    fn test_find_by_email_ignores_case() {
        let conn = test_db();
        insert(&conn, &fixtures::user("Ada@Example.com")).expect("insert");
        let found = find_by_email(&conn, "ada@example.com").expect("query");
        assert!(found.is_some());
        assert!(find_by_email(&conn, "nobody@example.com").expect("query").is_none());
    }

    #[test]
    fn test_find_by_auths_skips_unknown() {
        let conn = test_db();
        let a = fixtures::user("a@x.io");
        insert(&conn, &a).expect("insert");
        let found = find_by_auths(&conn, &[a.auth, ObjectId::new()]).expect("query");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].auth, a.auth);
        assert!(find_by_auths(&conn, &[]).expect("empty").is_empty());
    }

    #[test]
    fn test_monthly_signups() {
        let conn = test_db();
        let seeds = [
            (day(2023, 1, 5), false),
            (day(2023, 1, 31), false),
            (day(2023, 3, 1), false),
            (day(2023, 12, 31), false),
            (day(2023, 6, 1), true),
            (day(2024, 1, 1), false),
            (day(2022, 12, 31), false),
        ];
        for (i, (created_at, deleted)) in seeds.iter().enumerate() {
            let user = User {
                created_at: *created_at,
                deleted: *deleted,
                ..fixtures::user(&format!("u{i}@x.io"))
            };
            insert(&conn, &user).expect("insert");
        }

        let counts = monthly_signups(&conn, day(2023, 1, 1), day(2024, 1, 1)).expect("chart");
        assert_eq!(counts, [2, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_verification_stats() {
        let conn = test_db();
        let both = Verifications { email: true, mobile: true };
        let email_only = Verifications { email: true, mobile: false };
        insert(&conn, &User { verifications: both, ..fixtures::user("a@x.io") }).expect("insert");
        insert(&conn, &User { verifications: email_only, ..fixtures::user("b@x.io") }).expect("insert");
        insert(&conn, &fixtures::user("c@x.io")).expect("insert");

        let stats = verification_stats(&conn).expect("stats");
        assert_eq!(
            stats,
            VerificationStats {
                total_users: 3,
                email_verified: 2,
                mobile_verified: 1,
                both_verified: 1,
            }
        );
    }
}
