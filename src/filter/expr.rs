//! # Filter Expressions
//!
//! A resource declares which query parameters filter which fields, and how.
//! Parsing binds each supplied parameter to its declaration and converts the
//! value to the field's native type up front, so a malformed bound is
//! rejected even when the collection is empty.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};

use crate::schema::Entity;

use super::errors::{FilterError, FilterResult};
use super::value::{compare_values, FieldValue};

/// Comparison applied by a filter parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// Case-insensitive equality (numeric equality for integers)
    Exact,
    /// Case-insensitive substring
    Contains,
    /// Inclusive lower bound
    RangeLower,
    /// Inclusive upper bound
    RangeUpper,
}

impl Lookup {
    pub fn as_str(&self) -> &'static str {
        match self {
            Lookup::Exact => "exact",
            Lookup::Contains => "contains",
            Lookup::RangeLower => "range-lower",
            Lookup::RangeUpper => "range-upper",
        }
    }
}

/// Native type a criterion value is parsed as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Compared lexicographically
    Text,
    /// Text compared numerically when both sides parse as integers
    NumericText,
    Integer,
    /// RFC 3339 timestamp, or a bare `YYYY-MM-DD` date at midnight UTC
    Timestamp,
    /// One of a fixed set of choices; the parser maps any accepted spelling
    /// to the stored form
    Choice(fn(&str) -> Option<&'static str>),
}

/// Declaration binding a query parameter to a record field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterField {
    pub param: &'static str,
    pub field: &'static str,
    pub lookup: Lookup,
    pub kind: FieldKind,
}

impl FilterField {
    pub const fn new(
        param: &'static str,
        field: &'static str,
        lookup: Lookup,
        kind: FieldKind,
    ) -> Self {
        Self {
            param,
            field,
            lookup,
            kind,
        }
    }

    pub const fn exact(param: &'static str, field: &'static str, kind: FieldKind) -> Self {
        Self::new(param, field, Lookup::Exact, kind)
    }

    pub const fn contains(param: &'static str, field: &'static str) -> Self {
        Self::new(param, field, Lookup::Contains, FieldKind::Text)
    }

    pub const fn min(param: &'static str, field: &'static str, kind: FieldKind) -> Self {
        Self::new(param, field, Lookup::RangeLower, kind)
    }

    pub const fn max(param: &'static str, field: &'static str, kind: FieldKind) -> Self {
        Self::new(param, field, Lookup::RangeUpper, kind)
    }
}

/// A criterion value in the field's native type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Text(String),
    Integer(i64),
    Timestamp(DateTime<Utc>),
}

impl Operand {
    fn parse(param: &str, raw: &str, kind: FieldKind) -> FilterResult<Self> {
        let invalid = |expected| FilterError::InvalidValue {
            param: param.to_string(),
            value: raw.to_string(),
            expected,
        };

        match kind {
            FieldKind::Text | FieldKind::NumericText => Ok(Operand::Text(raw.to_string())),
            FieldKind::Integer => raw
                .trim()
                .parse::<i64>()
                .map(Operand::Integer)
                .map_err(|_| invalid("an integer")),
            FieldKind::Timestamp => parse_timestamp(raw.trim())
                .map(Operand::Timestamp)
                .ok_or_else(|| invalid("an RFC 3339 timestamp or YYYY-MM-DD date")),
            FieldKind::Choice(parse) => parse(raw.trim())
                .map(|stored| Operand::Text(stored.to_string()))
                .ok_or_else(|| invalid("one of the declared choices")),
        }
    }

    fn as_field_value(&self) -> FieldValue<'_> {
        match self {
            Operand::Text(s) => FieldValue::Text(s),
            Operand::Integer(n) => FieldValue::Integer(*n),
            Operand::Timestamp(t) => FieldValue::Timestamp(*t),
        }
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// One bound filter: field, lookup and parsed operand
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Criterion {
    pub field: &'static str,
    pub lookup: Lookup,
    pub kind: FieldKind,
    pub operand: Operand,
}

impl Criterion {
    /// Bind a raw parameter value to its declaration
    pub fn bind(decl: &FilterField, raw: &str) -> FilterResult<Self> {
        Ok(Self {
            field: decl.field,
            lookup: decl.lookup,
            kind: decl.kind,
            operand: Operand::parse(decl.param, raw, decl.kind)?,
        })
    }

    /// Check whether a record satisfies this criterion
    ///
    /// A record without the field, or with a value of another kind, does
    /// not match.
    pub fn matches<E: Entity>(&self, record: &E) -> bool {
        let Some(value) = record.field(self.field) else {
            return false;
        };

        match self.lookup {
            Lookup::Exact => match (&value, &self.operand) {
                (FieldValue::Text(v), Operand::Text(o)) => v.to_lowercase() == o.to_lowercase(),
                _ => compare_values(&value, &self.operand.as_field_value())
                    .is_some_and(|ord| ord.is_eq()),
            },
            Lookup::Contains => match (&value, &self.operand) {
                (FieldValue::Text(v), Operand::Text(o)) => {
                    v.to_lowercase().contains(&o.to_lowercase())
                }
                _ => false,
            },
            Lookup::RangeLower => self.compare(&value).is_some_and(|ord| ord.is_ge()),
            Lookup::RangeUpper => self.compare(&value).is_some_and(|ord| ord.is_le()),
        }
    }

    fn compare(&self, value: &FieldValue<'_>) -> Option<Ordering> {
        match (value, &self.operand, self.kind) {
            (FieldValue::Text(v), Operand::Text(o), FieldKind::Text) => Some((*v).cmp(o.as_str())),
            _ => compare_values(value, &self.operand.as_field_value()),
        }
    }
}

/// Criteria combined with AND logic
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    pub criteria: Vec<Criterion>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `(param, value)` pairs against the declared filters
    ///
    /// Parameters with an empty value are skipped. Undeclared parameters
    /// are rejected.
    pub fn parse<'a, I>(params: I, declared: &[FilterField]) -> FilterResult<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut set = FilterSet::new();
        for (param, raw) in params {
            let decl = declared
                .iter()
                .find(|d| d.param == param)
                .ok_or_else(|| FilterError::UnknownParameter(param.to_string()))?;
            if raw.trim().is_empty() {
                continue;
            }
            set.criteria.push(Criterion::bind(decl, raw)?);
        }
        Ok(set)
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    /// Check if a record matches all criteria
    pub fn matches<E: Entity>(&self, record: &E) -> bool {
        self.criteria.iter().all(|c| c.matches(record))
    }

    /// Keep the records matching every criterion, preserving order
    pub fn apply<E: Entity>(&self, records: Vec<E>) -> Vec<E> {
        if self.is_empty() {
            return records;
        }
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}
