//! The shared record predicate.
//!
//! A [`Filter`] can only be created by [`Filter::live`], which starts from
//! `deleted = 0`. Every read in this crate, and the single soft-delete
//! write, compiles its WHERE clause from a filter, so tombstoned records
//! are excluded everywhere by construction.
//!
//! Column names are `&'static str` so they can only come from code; all
//! values are bound as parameters.

use mystash_types::{ObjectId, Timestamp};
use rusqlite::types::Value;

use crate::columns::{id_text, millis};

#[derive(Debug, Clone)]
pub struct Filter {
    clauses: Vec<String>,
    params: Vec<Value>,
}

impl Filter {
    /// Records that have not been soft-deleted.
    pub fn live() -> Self {
        Self {
            clauses: vec!["deleted = 0".to_string()],
            params: Vec::new(),
        }
    }

    fn push(mut self, clause: String, value: Value) -> Self {
        self.clauses.push(clause);
        self.params.push(value);
        self
    }

    /// `column = value`
    pub fn eq(self, column: &'static str, value: impl Into<Value>) -> Self {
        self.push(format!("{column} = ?"), value.into())
    }

    /// `column = value`, skipped when `value` is `None`.
    pub fn eq_opt<V: Into<Value>>(self, column: &'static str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.eq(column, v),
            None => self,
        }
    }

    pub fn eq_text(self, column: &'static str, value: &str) -> Self {
        self.eq(column, value.to_string())
    }

    pub fn eq_id(self, column: &'static str, id: &ObjectId) -> Self {
        self.eq(column, id_text(id))
    }

    /// `column IN (...)`. An empty set matches nothing.
    pub fn is_in(mut self, column: &'static str, values: Vec<Value>) -> Self {
        if values.is_empty() {
            self.clauses.push("0".to_string());
            return self;
        }
        let marks = vec!["?"; values.len()].join(", ");
        self.clauses.push(format!("{column} IN ({marks})"));
        self.params.extend(values);
        self
    }

    /// Case-insensitive text equality.
    pub fn eq_nocase(self, column: &'static str, value: &str) -> Self {
        self.push(format!("{column} = ? COLLATE NOCASE"), Value::Text(value.to_string()))
    }

    pub fn flag(self, column: &'static str, value: bool) -> Self {
        self.eq(column, i64::from(value))
    }

    /// `column >= from`
    pub fn since(self, column: &'static str, from: Timestamp) -> Self {
        self.push(format!("{column} >= ?"), Value::Integer(millis(from)))
    }

    /// `column > from`
    pub fn after(self, column: &'static str, from: Timestamp) -> Self {
        self.push(format!("{column} > ?"), Value::Integer(millis(from)))
    }

    /// `column < until`
    pub fn before(self, column: &'static str, until: Timestamp) -> Self {
        self.push(format!("{column} < ?"), Value::Integer(millis(until)))
    }

    /// `column <= until`
    pub fn at_or_before(self, column: &'static str, until: Timestamp) -> Self {
        self.push(format!("{column} <= ?"), Value::Integer(millis(until)))
    }

    /// `from <= column <= until`
    pub fn between(self, column: &'static str, from: Timestamp, until: Timestamp) -> Self {
        self.since(column, from).at_or_before(column, until)
    }

    /// A constant predicate with no parameters, such as `disabled = 0`.
    pub fn raw(mut self, clause: &'static str) -> Self {
        self.clauses.push(clause.to_string());
        self
    }

    /// `WHERE a AND b AND ...`
    pub fn where_clause(&self) -> String {
        format!("WHERE {}", self.clauses.join(" AND "))
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Parameters followed by `extra`, for statements that bind more
    /// values after the WHERE clause (LIMIT, OFFSET).
    pub fn params_with(&self, extra: impl IntoIterator<Item = Value>) -> Vec<Value> {
        self.params.iter().cloned().chain(extra).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_live_excludes_tombstones() {
        let f = Filter::live();
        assert_eq!(f.where_clause(), "WHERE deleted = 0");
        assert!(f.params().is_empty());
    }

    #[test]
    fn test_clauses_and_params_line_up() {
        let f = Filter::live()
            .eq_text("currency", "NGN")
            .eq_opt::<String>("status", None)
            .flag("active", true)
            .raw("disabled = 0");
        assert_eq!(
            f.where_clause(),
            "WHERE deleted = 0 AND currency = ? AND active = ? AND disabled = 0"
        );
        assert_eq!(
            f.params(),
            &[Value::Text("NGN".into()), Value::Integer(1)]
        );
    }

    #[test]
    fn test_empty_in_matches_nothing() {
        let f = Filter::live().is_in("auth", Vec::new());
        assert_eq!(f.where_clause(), "WHERE deleted = 0 AND 0");
        let g = Filter::live().is_in("auth", vec![Value::Text("a".into()), Value::Text("b".into())]);
        assert_eq!(g.where_clause(), "WHERE deleted = 0 AND auth IN (?, ?)");
        assert_eq!(g.params().len(), 2);
    }

    #[test]
    fn test_params_with_appends() {
        let f = Filter::live().eq_text("uid", "u1");
        let all = f.params_with([Value::Integer(20), Value::Integer(0)]);
        assert_eq!(all.len(), 3);
        assert_eq!(all[1], Value::Integer(20));
    }
}
