//! Free-text search across a resource's declared search fields
//!
//! The search string is split on whitespace and commas. Every term must
//! appear (case-insensitively) in at least one search field.

use crate::schema::Entity;

use super::errors::{FilterError, FilterResult};
use super::value::FieldValue;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter {
    fields: Vec<&'static str>,
    terms: Vec<String>,
}

impl SearchFilter {
    /// Parse a `search` parameter; `None` when it holds no terms
    pub fn parse(raw: &str, fields: &[&'static str]) -> FilterResult<Option<Self>> {
        let terms: Vec<String> = raw
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
            .collect();

        if terms.is_empty() {
            return Ok(None);
        }
        if fields.is_empty() {
            return Err(FilterError::SearchUnsupported);
        }

        Ok(Some(Self {
            fields: fields.to_vec(),
            terms,
        }))
    }

    pub fn matches<E: Entity>(&self, record: &E) -> bool {
        let haystacks: Vec<String> = self
            .fields
            .iter()
            .filter_map(|f| match record.field(f)? {
                FieldValue::Text(s) => Some(s.to_lowercase()),
                FieldValue::Integer(n) => Some(n.to_string()),
                FieldValue::Timestamp(_) => None,
            })
            .collect();

        self.terms
            .iter()
            .all(|term| haystacks.iter().any(|h| h.contains(term.as_str())))
    }

    pub fn apply<E: Entity>(&self, records: Vec<E>) -> Vec<E> {
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}
