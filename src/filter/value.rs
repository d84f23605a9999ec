//! Typed field values exposed by records for filtering and ordering

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

/// A record field read in its native type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Integer(i64),
    Timestamp(DateTime<Utc>),
}

/// Compare two text values
///
/// Integer text compares numerically, so `"9" < "10"`. Every integer sorts
/// before every non-integer, and non-integers compare lexicographically.
/// The result is a total order, as `sort_by` requires.
pub fn compare_text(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<i64>(), b.trim().parse::<i64>()) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// Order two field values; values of different kinds are unordered
pub fn compare_values(a: &FieldValue<'_>, b: &FieldValue<'_>) -> Option<Ordering> {
    match (a, b) {
        (FieldValue::Text(a), FieldValue::Text(b)) => Some(compare_text(a, b)),
        (FieldValue::Integer(a), FieldValue::Integer(b)) => Some(a.cmp(b)),
        (FieldValue::Timestamp(a), FieldValue::Timestamp(b)) => Some(a.cmp(b)),
        _ => None,
    }
}
