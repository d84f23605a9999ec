//! Result ordering over declared ordering fields
//!
//! Sorts are stable, so records with equal sort keys keep the order the
//! store returned them in (creation order).

use std::cmp::Ordering;

use crate::schema::Entity;

use super::errors::{FilterError, FilterResult};
use super::value::compare_values;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// One sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub field: &'static str,
    pub direction: SortDirection,
}

impl OrderBy {
    pub const fn asc(field: &'static str) -> Self {
        Self {
            field,
            direction: SortDirection::Asc,
        }
    }

    pub const fn desc(field: &'static str) -> Self {
        Self {
            field,
            direction: SortDirection::Desc,
        }
    }
}

/// Parse `ordering=<field>[,-field]` against the orderable fields
pub fn parse_ordering(raw: &str, allowed: &[&'static str]) -> FilterResult<Vec<OrderBy>> {
    let mut keys = Vec::new();
    for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let (name, direction) = match token.strip_prefix('-') {
            Some(name) => (name, SortDirection::Desc),
            None => (token, SortDirection::Asc),
        };
        let field = *allowed
            .iter()
            .find(|f| **f == name)
            .ok_or_else(|| FilterError::InvalidOrdering(token.to_string()))?;
        keys.push(OrderBy { field, direction });
    }
    Ok(keys)
}

/// Stable sort by each key in turn; missing or mismatched values sort first
pub fn sort_records<E: Entity>(records: &mut [E], keys: &[OrderBy]) {
    if keys.is_empty() {
        return;
    }
    records.sort_by(|a, b| {
        for key in keys {
            let ordering = match (a.field(key.field), b.field(key.field)) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (Some(a), Some(b)) => compare_values(&a, &b).unwrap_or(Ordering::Equal),
            };
            let ordering = match key.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
}
