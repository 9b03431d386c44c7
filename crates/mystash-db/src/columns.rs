//! Conversions between column values and domain types.

use std::str::FromStr;

use chrono::DateTime;
use mystash_types::{ObjectId, Timestamp};
use rusqlite::types::{Type, Value};
use rusqlite::Row;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::Result;

/// Timestamp as stored: Unix epoch milliseconds.
pub fn millis(ts: Timestamp) -> i64 {
    ts.timestamp_millis()
}

pub fn millis_opt(ts: Option<Timestamp>) -> Option<i64> {
    ts.map(millis)
}

pub fn id_text(id: &ObjectId) -> String {
    id.to_hex()
}

pub fn id_text_opt(id: Option<&ObjectId>) -> Option<String> {
    id.map(ObjectId::to_hex)
}

/// Encode a nested document for a JSON text column.
pub fn json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

pub fn json_opt<T: Serialize>(value: Option<&T>) -> Result<Option<String>> {
    value.map(json).transpose()
}

fn index(row: &Row<'_>, name: &str) -> rusqlite::Result<usize> {
    row.as_ref().column_index(name)
}

fn conversion<E>(idx: usize, ty: Type, e: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, ty, Box::new(e))
}

pub fn get_ts(row: &Row<'_>, name: &str) -> rusqlite::Result<Timestamp> {
    let idx = index(row, name)?;
    let ms: i64 = row.get(idx)?;
    DateTime::from_timestamp_millis(ms).ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, ms))
}

pub fn get_ts_opt(row: &Row<'_>, name: &str) -> rusqlite::Result<Option<Timestamp>> {
    let idx = index(row, name)?;
    match row.get::<_, Option<i64>>(idx)? {
        Some(ms) => DateTime::from_timestamp_millis(ms)
            .map(Some)
            .ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, ms)),
        None => Ok(None),
    }
}

pub fn get_id(row: &Row<'_>, name: &str) -> rusqlite::Result<ObjectId> {
    let idx = index(row, name)?;
    let text: String = row.get(idx)?;
    text.parse().map_err(|e| conversion(idx, Type::Text, e))
}

pub fn get_id_opt(row: &Row<'_>, name: &str) -> rusqlite::Result<Option<ObjectId>> {
    let idx = index(row, name)?;
    match row.get::<_, Option<String>>(idx)? {
        Some(text) => text.parse().map(Some).map_err(|e| conversion(idx, Type::Text, e)),
        None => Ok(None),
    }
}

/// Parse a closed-vocabulary text column.
pub fn get_enum<T>(row: &Row<'_>, name: &str) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let idx = index(row, name)?;
    let text: String = row.get(idx)?;
    text.parse().map_err(|e| conversion(idx, Type::Text, e))
}

pub fn get_enum_opt<T>(row: &Row<'_>, name: &str) -> rusqlite::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let idx = index(row, name)?;
    match row.get::<_, Option<String>>(idx)? {
        Some(text) => text.parse().map(Some).map_err(|e| conversion(idx, Type::Text, e)),
        None => Ok(None),
    }
}

/// Decode a JSON text column.
pub fn get_json<T: DeserializeOwned>(row: &Row<'_>, name: &str) -> rusqlite::Result<T> {
    let idx = index(row, name)?;
    let text: String = row.get(idx)?;
    serde_json::from_str(&text).map_err(|e| conversion(idx, Type::Text, e))
}

pub fn get_json_opt<T: DeserializeOwned>(row: &Row<'_>, name: &str) -> rusqlite::Result<Option<T>> {
    let idx = index(row, name)?;
    match row.get::<_, Option<String>>(idx)? {
        Some(text) => serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| conversion(idx, Type::Text, e)),
        None => Ok(None),
    }
}

/// Bindable value for an optional text column.
pub fn text_opt(value: Option<&str>) -> Value {
    value.map_or(Value::Null, |s| Value::Text(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rusqlite::Connection;

    #[test]
    fn test_timestamp_roundtrip() {
        let conn = Connection::open_in_memory().expect("open");
        let ts = Utc.with_ymd_and_hms(2024, 3, 9, 12, 30, 15).single().expect("ts");
        let back = conn
            .query_row("SELECT ?1 AS created_at", [millis(ts)], |row| {
                get_ts(row, "created_at")
            })
            .expect("query");
        assert_eq!(back, ts);
    }

    #[test]
    fn test_bad_id_is_conversion_error() {
        let conn = Connection::open_in_memory().expect("open");
        let result = conn.query_row("SELECT 'nope' AS id", [], |row| get_id(row, "id"));
        assert!(matches!(
            result,
            Err(rusqlite::Error::FromSqlConversionFailure(0, Type::Text, _))
        ));
    }

    #[test]
    fn test_null_json_is_none() {
        let conn = Connection::open_in_memory().expect("open");
        let value: Option<serde_json::Value> = conn
            .query_row("SELECT NULL AS meta", [], |row| get_json_opt(row, "meta"))
            .expect("query");
        assert!(value.is_none());
    }
}
