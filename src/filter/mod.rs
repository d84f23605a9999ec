//! # Filter Evaluator
//!
//! Declarative list criteria: per-resource filter parameters, free-text
//! search and ordering. Everything here works on typed records through
//! `Entity::field`, never on rendered JSON.

mod errors;
mod expr;
mod ordering;
mod search;
mod value;

pub use errors::{FilterError, FilterResult};
pub use expr::{Criterion, FieldKind, FilterField, FilterSet, Lookup, Operand};
pub use ordering::{parse_ordering, sort_records, OrderBy, SortDirection};
pub use search::SearchFilter;
pub use value::{compare_text, compare_values, FieldValue};
