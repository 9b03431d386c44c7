//! Request parameter parsing.
//!
//! Everything here runs before a store is touched; failures are
//! [`ServiceError::Invalid`].

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use mystash_types::enums::ParseError;
use mystash_types::{ObjectId, PageRequest, Timestamp};
use serde::Deserialize;

use crate::error::{ServiceError, ServiceResult};

pub const INVALID_DATE: &str = "Invalid date format. Please use YYYY-MM-DD format.";
pub const START_AFTER_END: &str = "Start date cannot be later than end date.";

/// Raw `page`/`limit` query values. Kept as text so that garbage falls
/// back to the defaults instead of failing extraction.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl PageQuery {
    pub fn request(&self) -> PageRequest {
        PageRequest::from_query(self.page.as_deref(), self.limit.as_deref())
    }
}

/// A store identity from a path or query value. `field` names it in the
/// error message, e.g. `auth ID`.
pub fn object_id(raw: &str, field: &str) -> ServiceResult<ObjectId> {
    ObjectId::parse(raw.trim()).ok_or_else(|| ServiceError::Invalid(format!("Invalid {field} format")))
}

/// An optional store identity; absent or blank means "no constraint".
pub fn object_id_opt(raw: Option<&str>, field: &str) -> ServiceResult<Option<ObjectId>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => object_id(s, field).map(Some),
        None => Ok(None),
    }
}

/// An enum value whose error lists the accepted spellings.
pub fn one_of<T>(raw: &str, accepted: impl FnOnce() -> String) -> ServiceResult<T>
where
    T: FromStr<Err = ParseError>,
{
    raw.parse::<T>().map_err(|e| {
        ServiceError::Invalid(format!("Invalid {}. Must be one of: {}", e.kind, accepted()))
    })
}

/// Like [`one_of`] for an optional filter value.
pub fn one_of_opt<T>(raw: Option<&str>, accepted: impl FnOnce() -> String) -> ServiceResult<Option<T>>
where
    T: FromStr<Err = ParseError>,
{
    match raw.filter(|s| !s.is_empty()) {
        Some(s) => one_of(s, accepted).map(Some),
        None => Ok(None),
    }
}

/// RFC 3339 timestamp, or a calendar date meaning midnight UTC.
pub fn timestamp(raw: &str) -> Option<Timestamp> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// A closed `[start, end]` interval from `startDate`/`endDate`.
///
/// Both bounds are required.
pub fn date_range(start: Option<&str>, end: Option<&str>) -> ServiceResult<(Timestamp, Timestamp)> {
    let start = start.and_then(timestamp);
    let end = end.and_then(timestamp);
    let (Some(start), Some(end)) = (start, end) else {
        return Err(ServiceError::Invalid(INVALID_DATE.to_string()));
    };
    if start > end {
        return Err(ServiceError::Invalid(START_AFTER_END.to_string()));
    }
    Ok((start, end))
}

/// Optional `[start, end]` bounds for a filtered search. Each bound is
/// checked on its own; when both are given they must be ordered.
pub fn date_bounds(
    start: Option<&str>,
    end: Option<&str>,
) -> ServiceResult<(Option<Timestamp>, Option<Timestamp>)> {
    let parse = |raw: Option<&str>| -> ServiceResult<Option<Timestamp>> {
        match raw.filter(|s| !s.is_empty()) {
            Some(s) => timestamp(s)
                .map(Some)
                .ok_or_else(|| ServiceError::Invalid(INVALID_DATE.to_string())),
            None => Ok(None),
        }
    };
    let (start, end) = (parse(start)?, parse(end)?);
    if let (Some(s), Some(e)) = (start, end) {
        if s > e {
            return Err(ServiceError::Invalid(START_AFTER_END.to_string()));
        }
    }
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mystash_types::enums::SaveType;

    #[test]
    fn test_page_query_defaults() {
        let q = PageQuery { page: Some("abc".into()), limit: Some("0".into()) };
        assert_eq!(q.request(), PageRequest::new(1, 20));
        let q = PageQuery { page: Some("3".into()), limit: Some("500".into()) };
        assert_eq!(q.request(), PageRequest::new(3, 500));
    }

    #[test]
    fn test_object_id_message() {
        let err = object_id("not-an-id", "auth ID").expect_err("malformed");
        assert!(matches!(err, ServiceError::Invalid(ref m) if m == "Invalid auth ID format"));
        assert!(object_id_opt(Some(""), "auth ID").expect("blank").is_none());
    }

    #[test]
    fn test_enum_lists_accepted_values() {
        let err = one_of::<SaveType>("weekly", SaveType::accepted).expect_err("unknown");
        let ServiceError::Invalid(message) = err else {
            unreachable!("expected Invalid");
        };
        assert!(message.contains("regular"));
        assert!(message.contains("flex"));
    }

    #[test]
    fn test_date_forms() {
        let day = timestamp("2024-03-01").expect("date");
        let rfc = timestamp("2024-03-01T00:00:00Z").expect("rfc3339");
        assert_eq!(day, rfc);
        assert!(timestamp("2024-13-01").is_none());
        assert!(timestamp("yesterday").is_none());
    }

    #[test]
    fn test_date_range_checks() {
        let err = date_range(Some("2024-02-01"), Some("2024-01-01")).expect_err("reversed");
        assert!(matches!(err, ServiceError::Invalid(ref m) if m == START_AFTER_END));
        let err = date_range(None, Some("2024-01-01")).expect_err("missing");
        assert!(matches!(err, ServiceError::Invalid(ref m) if m == INVALID_DATE));
        let (s, e) = date_range(Some("2024-01-01"), Some("2024-01-01")).expect("same day");
        assert_eq!(s, e);
    }

    #[test]
    fn test_date_bounds_optional() {
        assert_eq!(date_bounds(None, None).expect("none"), (None, None));
        assert!(date_bounds(Some("bad"), None).is_err());
        assert!(date_bounds(Some("2024-02-01"), Some("2024-01-01")).is_err());
    }
}
