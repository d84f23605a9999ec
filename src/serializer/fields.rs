//! Field-by-field payload reader
//!
//! A `FieldReader` walks one write payload. Each accessor validates a single
//! field, records any failure, and returns a usable value either way so the
//! caller can keep reading; `finish` then reports every failure at once.
//! Values returned after a recorded failure are placeholders and must not be
//! persisted.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde_json::{Map, Value};

use super::errors::{ValidationErrors, NON_FIELD_ERRORS};
use super::WriteMode;

pub const MSG_REQUIRED: &str = "This field is required.";
pub const MSG_NULL: &str = "This field may not be null.";
pub const MSG_BLANK: &str = "This field may not be blank.";
pub const MSG_NOT_STRING: &str = "Not a valid string.";
pub const MSG_NOT_INTEGER: &str = "A valid integer is required.";
pub const MSG_BAD_DATETIME: &str = "Datetime has wrong format. Use RFC 3339.";

/// JSON type name used in error messages
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

/// Outcome of looking a field up in the payload
enum Lookup<'p> {
    Present(&'p Value),
    /// Absent, and the caller's existing value should be kept
    Keep,
    /// Absent with no value to fall back on
    Missing,
}

pub struct FieldReader<'p> {
    fields: Option<&'p Map<String, Value>>,
    mode: WriteMode,
    errors: ValidationErrors,
}

impl<'p> FieldReader<'p> {
    /// Start reading `payload`; a non-object payload is itself a failure
    pub fn new(payload: &'p Value, mode: WriteMode) -> Self {
        let mut errors = ValidationErrors::new();
        let fields = match payload {
            Value::Object(map) => Some(map),
            other => {
                errors.add(
                    NON_FIELD_ERRORS,
                    format!(
                        "Invalid data. Expected a dictionary, but got {}.",
                        json_type_name(other)
                    ),
                );
                None
            }
        };

        Self {
            fields,
            mode,
            errors,
        }
    }

    /// Whether the payload carries `name` at all
    pub fn contains(&self, name: &str) -> bool {
        self.fields.is_some_and(|f| f.contains_key(name))
    }

    /// Record a failure found by entity-specific checks
    pub fn reject(&mut self, field: &str, message: impl Into<String>) {
        self.errors.add(field, message);
    }

    /// Whether `field` already failed
    pub fn failed(&self, field: &str) -> bool {
        self.errors.has_field(field)
    }

    fn lookup(&self, name: &str, has_existing: bool) -> Lookup<'p> {
        match self.fields.and_then(|f| f.get(name)) {
            Some(value) => Lookup::Present(value),
            None if has_existing && self.mode == WriteMode::Partial => Lookup::Keep,
            None => Lookup::Missing,
        }
    }

    /// Required, non-blank text of at most `max_len` characters
    ///
    /// Surrounding whitespace is trimmed. Numbers are accepted and rendered
    /// as text.
    pub fn text(&mut self, name: &str, max_len: usize, existing: Option<&str>) -> String {
        let value = match self.lookup(name, existing.is_some()) {
            Lookup::Present(value) => value,
            Lookup::Keep => return existing.unwrap_or_default().to_string(),
            Lookup::Missing => {
                if self.fields.is_some() {
                    self.errors.add(name, MSG_REQUIRED);
                }
                return String::new();
            }
        };

        let Some(text) = self.coerce_text(name, value) else {
            return String::new();
        };
        let text = text.trim().to_string();
        if text.is_empty() {
            self.errors.add(name, MSG_BLANK);
        } else {
            self.check_length(name, &text, max_len);
        }
        text
    }

    /// Required text that must also match `pattern`
    pub fn text_matching(
        &mut self,
        name: &str,
        max_len: usize,
        pattern: &Regex,
        message: &str,
        existing: Option<&str>,
    ) -> String {
        let text = self.text(name, max_len, existing);
        if !self.failed(name) && !pattern.is_match(&text) {
            self.errors.add(name, message);
        }
        text
    }

    /// Optional text; null or blank clears the field
    ///
    /// Absent fields keep `existing` in every mode.
    pub fn optional_text(
        &mut self,
        name: &str,
        max_len: usize,
        existing: Option<Option<&str>>,
    ) -> Option<String> {
        let keep = existing.flatten().map(str::to_string);
        let value = match self.fields.and_then(|f| f.get(name)) {
            Some(value) => value,
            None => return keep,
        };
        if value.is_null() {
            return None;
        }

        let text = self.coerce_text(name, value)?.trim().to_string();
        if text.is_empty() {
            return None;
        }
        self.check_length(name, &text, max_len);
        Some(text)
    }

    /// Required integer, also accepted as a numeric string
    pub fn integer(&mut self, name: &str, existing: Option<i64>) -> i64 {
        let value = match self.lookup(name, existing.is_some()) {
            Lookup::Present(value) => value,
            Lookup::Keep => return existing.unwrap_or_default(),
            Lookup::Missing => {
                if self.fields.is_some() {
                    self.errors.add(name, MSG_REQUIRED);
                }
                return 0;
            }
        };

        let parsed = match value {
            Value::Null => {
                self.errors.add(name, MSG_NULL);
                return 0;
            }
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        match parsed {
            Some(n) => n,
            None => {
                self.errors.add(name, MSG_NOT_INTEGER);
                0
            }
        }
    }

    /// Optional RFC 3339 timestamp; absent keeps `existing`, else `default`
    pub fn timestamp_or(
        &mut self,
        name: &str,
        existing: Option<DateTime<Utc>>,
        default: DateTime<Utc>,
    ) -> DateTime<Utc> {
        let fallback = existing.unwrap_or(default);
        let value = match self.fields.and_then(|f| f.get(name)) {
            Some(value) => value,
            None => return fallback,
        };

        match value {
            Value::Null => {
                self.errors.add(name, MSG_NULL);
                fallback
            }
            Value::String(s) => match DateTime::parse_from_rfc3339(s.trim()) {
                Ok(parsed) => parsed.with_timezone(&Utc),
                Err(_) => {
                    self.errors.add(name, MSG_BAD_DATETIME);
                    fallback
                }
            },
            _ => {
                self.errors.add(name, MSG_BAD_DATETIME);
                fallback
            }
        }
    }

    /// Required value from a fixed set of choices
    pub fn choice<T>(&mut self, name: &str, existing: Option<T>) -> T
    where
        T: FromStr + Default,
    {
        let value = match self.lookup(name, existing.is_some()) {
            Lookup::Present(value) => value,
            Lookup::Keep => return existing.unwrap_or_default(),
            Lookup::Missing => {
                if self.fields.is_some() {
                    self.errors.add(name, MSG_REQUIRED);
                }
                return T::default();
            }
        };

        let Some(raw) = self.coerce_text(name, value) else {
            return T::default();
        };
        match raw.trim().parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                self.errors
                    .add(name, format!("\"{}\" is not a valid choice.", raw));
                T::default()
            }
        }
    }

    /// Report every recorded failure, or `Ok(())` when the payload is clean
    pub fn finish(self) -> Result<(), ValidationErrors> {
        self.errors.into_result()
    }

    fn coerce_text(&mut self, name: &str, value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Null => {
                self.errors.add(name, MSG_NULL);
                None
            }
            _ => {
                self.errors.add(name, MSG_NOT_STRING);
                None
            }
        }
    }

    fn check_length(&mut self, name: &str, text: &str, max_len: usize) {
        if text.chars().count() > max_len {
            self.errors.add(
                name,
                format!("Ensure this field has no more than {} characters.", max_len),
            );
        }
    }
}
