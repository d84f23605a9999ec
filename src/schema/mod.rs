//! # Entity schema
//!
//! Typed records for every resource family and the `Entity` trait the store,
//! filters and controller are generic over.
//!
//! A record names its own table, exposes its fields to the filter evaluator
//! in their native types, and declares the cross-record rules the store
//! enforces under its write lock: relation checks before a write and
//! cascades on delete.

mod blog;
mod chai;
mod employee;
mod student;
mod tweet;

pub use blog::{Blog, Comment};
pub use chai::{ChaiType, ChaiVariety};
pub use employee::Employee;
pub use student::Student;
pub use tweet::Tweet;

use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::auth::Actor;
use crate::filter::FieldValue;
use crate::serializer::ValidationErrors;
use crate::store::{Table, Tables};

/// Primary key type of an entity
pub trait EntityKey:
    Clone + Eq + Hash + Ord + Debug + Display + FromStr + Send + Sync + 'static
{
}

impl EntityKey for u64 {}
impl EntityKey for String {}

/// A stored record type
pub trait Entity: Clone + Send + Sync + 'static {
    type Key: EntityKey;

    /// Singular name used in errors and logs
    const NAME: &'static str;

    /// Records belong to the acting user who created them
    const OWNED: bool = false;

    fn key(&self) -> Self::Key;

    /// Set a store-assigned key; `seq` starts at 1 and is never reused
    ///
    /// Client-keyed entities ignore it.
    fn assign_key(&mut self, _seq: u64) {}

    /// Read a field for filtering, search and ordering
    fn field(&self, name: &str) -> Option<FieldValue<'_>>;

    fn table(tables: &Tables) -> &Table<Self>;

    fn table_mut(tables: &mut Tables) -> &mut Table<Self>;

    /// Check references to other records
    fn check_relations(&self, _tables: &Tables) -> Result<(), ValidationErrors> {
        Ok(())
    }

    /// Remove dependent records; returns how many went
    fn on_delete(&self, _tables: &mut Tables) -> usize {
        0
    }

    /// Whether `actor` may update or delete this record
    fn writable_by(&self, _actor: &Actor) -> bool {
        true
    }
}

/// External timestamp format: RFC 3339, microseconds, `Z` suffix
pub fn render_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn id_value(id: u64) -> FieldValue<'static> {
    FieldValue::Integer(i64::try_from(id).unwrap_or(i64::MAX))
}
