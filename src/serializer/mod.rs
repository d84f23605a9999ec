//! # Serialization Layer
//!
//! Converts typed records to their external JSON representation and builds
//! records back from write payloads.
//!
//! Reads may embed related records (a blog renders its comments inline), so
//! `to_external` receives a read view of the store. Writes never go through
//! an embedded collection: nested fields are read-only and ignored when they
//! appear in a payload.

mod errors;
mod fields;

pub use errors::{ValidationErrors, NON_FIELD_ERRORS};
pub use fields::{
    json_type_name, FieldReader, MSG_BAD_DATETIME, MSG_BLANK, MSG_NOT_INTEGER, MSG_NOT_STRING,
    MSG_NULL, MSG_REQUIRED,
};

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::auth::Actor;
use crate::schema::Entity;
use crate::store::Tables;

/// How a write payload relates to the stored record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// New record; every required field must be present
    Create,
    /// Full update (PUT); every required field must be present,
    /// optional fields left out keep their stored value
    Replace,
    /// Partial update (PATCH); anything left out keeps its stored value
    Partial,
}

/// Request-scoped inputs available while building a record
#[derive(Debug, Clone)]
pub struct WriteContext<'a> {
    pub mode: WriteMode,
    pub actor: &'a Actor,
    /// Clock reading for server-set timestamps
    pub now: DateTime<Utc>,
}

impl<'a> WriteContext<'a> {
    pub fn new(mode: WriteMode, actor: &'a Actor) -> Self {
        Self {
            mode,
            actor,
            now: Utc::now(),
        }
    }
}

/// Converter between a record and its external representation
pub trait Serializer: Entity {
    /// Render `self`, resolving related records through `view`
    fn to_external(&self, view: &Tables) -> Value;

    /// Build a record from `payload`
    ///
    /// `existing` is the stored record for updates and `None` on create.
    /// Every failing field is reported, not just the first one. Checks that
    /// need other records (foreign keys) belong to `Entity::check_relations`,
    /// which the store runs under its write lock.
    fn from_external(
        payload: &Value,
        existing: Option<&Self>,
        ctx: &WriteContext<'_>,
    ) -> Result<Self, ValidationErrors>;
}
