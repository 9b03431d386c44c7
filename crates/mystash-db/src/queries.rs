//! Query functions, one module per table.
//!
//! Every module describes its table with a [`Table`] and builds reads from
//! a [`Filter`].

pub mod accounts;
pub mod interests;
pub mod legacy_transactions;
pub mod legacy_users;
pub mod payments;
pub mod rates;
pub mod stashes;
pub mod transactions;
pub mod transfers;
pub mod users;
pub mod wallets;

use mystash_types::reports::CurrencyTotals;
use mystash_types::{PageRequest, Paginated};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row};

use crate::{DbError, Filter, Result};

/// Newest first.
pub const NEWEST_FIRST: &str = "created_at DESC, id DESC";

/// How a table's rows map onto a domain type.
pub struct Table<T> {
    pub name: &'static str,
    pub columns: &'static str,
    pub from_row: fn(&Row<'_>) -> rusqlite::Result<T>,
}

impl<T> Table<T> {
    fn select(&self, filter: &Filter, order: &str) -> String {
        format!(
            "SELECT {} FROM {} {} ORDER BY {order}",
            self.columns,
            self.name,
            filter.where_clause()
        )
    }

    fn collect(&self, conn: &Connection, sql: &str, params: Vec<Value>) -> Result<Vec<T>> {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
            .query_map(params_from_iter(params), self.from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// All matching rows.
    pub fn find(&self, conn: &Connection, filter: &Filter, order: &str) -> Result<Vec<T>> {
        let sql = self.select(filter, order);
        self.collect(conn, &sql, filter.params().to_vec())
    }

    /// At most `limit` matching rows after skipping `offset`.
    pub fn find_window(
        &self,
        conn: &Connection,
        filter: &Filter,
        order: &str,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<T>> {
        let sql = format!("{} LIMIT ? OFFSET ?", self.select(filter, order));
        let params = filter.params_with([to_sql_int(limit), to_sql_int(offset)]);
        self.collect(conn, &sql, params)
    }

    /// The first matching row, if any.
    pub fn find_one(&self, conn: &Connection, filter: &Filter, order: &str) -> Result<Option<T>> {
        let sql = format!("{} LIMIT 1", self.select(filter, order));
        let row = conn
            .query_row(&sql, params_from_iter(filter.params()), self.from_row)
            .optional()?;
        Ok(row)
    }

    /// The first matching row, or `NotFound` naming the table.
    pub fn get(&self, conn: &Connection, filter: &Filter) -> Result<T> {
        self.find_one(conn, filter, NEWEST_FIRST)?
            .ok_or_else(|| DbError::NotFound(self.name.to_string()))
    }

    pub fn count(&self, conn: &Connection, filter: &Filter) -> Result<u64> {
        let sql = format!("SELECT COUNT(*) FROM {} {}", self.name, filter.where_clause());
        let n: i64 = conn.query_row(&sql, params_from_iter(filter.params()), |row| row.get(0))?;
        Ok(n.max(0) as u64)
    }

    /// One page of matching rows together with the full match count.
    pub fn page(
        &self,
        conn: &Connection,
        filter: &Filter,
        order: &str,
        page: PageRequest,
    ) -> Result<Paginated<T>> {
        let data = self.find_window(conn, filter, order, u64::from(page.limit), page.offset())?;
        let total = self.count(conn, filter)?;
        Ok(Paginated::new(data, page, total))
    }

    /// `SUM(value)` grouped by `key` over matching rows.
    pub fn sum_by(
        &self,
        conn: &Connection,
        filter: &Filter,
        key: &'static str,
        value: &'static str,
    ) -> Result<CurrencyTotals> {
        let sql = format!(
            "SELECT {key}, COALESCE(SUM({value}), 0) FROM {} {} GROUP BY {key}",
            self.name,
            filter.where_clause()
        );
        let mut stmt = conn.prepare(&sql)?;
        let totals = stmt
            .query_map(params_from_iter(filter.params()), |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
            })?
            .collect::<std::result::Result<CurrencyTotals, _>>()?;
        Ok(totals)
    }

    /// Per currency: summed `value` and the number of distinct `owner`s.
    pub fn sum_and_owners_by_currency(
        &self,
        conn: &Connection,
        filter: &Filter,
        value: &'static str,
        owner: &'static str,
    ) -> Result<Vec<(String, f64, u64)>> {
        let sql = format!(
            "SELECT currency, COALESCE(SUM({value}), 0), COUNT(DISTINCT {owner})
             FROM {} {} GROUP BY currency",
            self.name,
            filter.where_clause()
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(filter.params()), |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, f64>(1)?,
                    row.get::<_, i64>(2)?.max(0) as u64,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

fn to_sql_int(n: u64) -> Value {
    Value::Integer(i64::try_from(n).unwrap_or(i64::MAX))
}

/// Map a unique-index violation onto [`DbError::Constraint`].
pub(crate) fn constraint(e: rusqlite::Error, what: &str) -> DbError {
    match e {
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            DbError::Constraint(what.to_string())
        }
        other => DbError::Sqlite(other),
    }
}
