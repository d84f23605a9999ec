//! # Resource Controller
//!
//! The five REST operations, written once and instantiated per record
//! type. A request moves through `Received -> Validated -> Persisted ->
//! Serialized -> Responded`, or stops at `Rejected` with an `ApiError`.
//! Nothing here catches errors per operation; every failure is returned and
//! mapped to a response by `ApiError::into_response`.

mod config;
mod errors;
mod query;
mod resources;
mod response;

pub use config::{Resource, ResourceConfig};
pub use errors::{ApiError, ApiResult, ErrorResponse, INTERNAL_ERROR_MESSAGE};
pub use query::{page_link, ListQuery};
pub use resources::RESOURCE_PATHS;
pub use response::{ListEnvelope, Reply};

use std::marker::PhantomData;
use std::str::FromStr;
use std::sync::Arc;

use serde_json::Value;

use crate::auth::Actor;
use crate::filter::sort_records;
use crate::observability::{log_event_with_fields, Event, MetricsRegistry};
use crate::pagination::paginate;
use crate::schema::Entity;
use crate::serializer::{Serializer, WriteContext, WriteMode};
use crate::store::{Database, StoreError};

/// CRUD operations for one resource
pub struct ResourceController<E: Resource> {
    db: Arc<Database>,
    config: ResourceConfig,
    metrics: Arc<MetricsRegistry>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Resource> Clone for ResourceController<E> {
    fn clone(&self) -> Self {
        Self {
            db: Arc::clone(&self.db),
            config: self.config.clone(),
            metrics: Arc::clone(&self.metrics),
            _entity: PhantomData,
        }
    }
}

impl<E: Resource> ResourceController<E> {
    pub fn new(db: Arc<Database>, config: ResourceConfig, metrics: Arc<MetricsRegistry>) -> Self {
        Self {
            db,
            config,
            metrics,
            _entity: PhantomData,
        }
    }

    /// Controller with the resource's default configuration
    pub fn with_defaults(db: Arc<Database>, metrics: Arc<MetricsRegistry>) -> Self {
        Self::new(db, E::config(), metrics)
    }

    pub fn config(&self) -> &ResourceConfig {
        &self.config
    }

    /// Filter, search, order, paginate and render one page
    ///
    /// `params` are the decoded query pairs; `raw_query` is the query string
    /// as sent, used to build the `next`/`prev` links.
    pub fn list(&self, params: &[(String, String)], raw_query: Option<&str>) -> ApiResult<Reply> {
        let query = ListQuery::parse(params, &self.config)?;

        let page = self.db.read(|tables| {
            let records: Vec<E> = E::table(tables).iter().cloned().collect();
            let records = query.filters.apply(records);
            let mut records = match &query.search {
                Some(search) => search.apply(records),
                None => records,
            };
            sort_records(&mut records, &query.ordering);
            paginate(records, query.page).map(|record| record.to_external(tables))
        })?;

        let collection = self.config.collection_path();
        let envelope = ListEnvelope {
            next: page
                .next_page
                .map(|n| page_link(&collection, raw_query, n)),
            prev: page
                .prev_page
                .map(|n| page_link(&collection, raw_query, n)),
            total_count: page.total_count,
            items: page.items,
        };

        serde_json::to_value(envelope)
            .map(Reply::ok)
            .map_err(|e| ApiError::Internal(e.to_string()))
    }

    pub fn retrieve(&self, id: &str) -> ApiResult<Reply> {
        let key = self.parse_key(id)?;
        let rendered = self
            .db
            .read(|tables| E::table(tables).get(&key).map(|r| r.to_external(tables)))?;

        rendered
            .map(Reply::ok)
            .ok_or_else(|| ApiError::not_found(E::NAME, id))
    }

    pub fn create(&self, payload: &Value, actor: &Actor) -> ApiResult<Reply> {
        if E::OWNED {
            actor.require()?;
        }

        let ctx = WriteContext::new(WriteMode::Create, actor);
        let result = E::from_external(payload, None, &ctx)
            .map_err(StoreError::from)
            .and_then(|record| self.db.create(record));
        let created = self.observe_write("create", result)?;

        self.metrics.increment_created();
        let key = created.key().to_string();
        log_event_with_fields(
            Event::RecordCreated,
            &[("resource", self.config.path), ("id", key.as_str())],
        );

        let body = self.db.read(|tables| created.to_external(tables))?;
        Ok(Reply::created(body))
    }

    /// Full (`Replace`) or partial (`Partial`) update
    pub fn update(
        &self,
        id: &str,
        payload: &Value,
        mode: WriteMode,
        actor: &Actor,
    ) -> ApiResult<Reply> {
        let key = self.parse_key(id)?;
        if E::OWNED {
            actor.require()?;
        }

        let ctx = WriteContext::new(mode, actor);
        let result = self.db.update::<E, _>(&key, |current| {
            if !current.writable_by(actor) {
                return Err(StoreError::not_found(E::NAME, id));
            }
            E::from_external(payload, Some(current), &ctx).map_err(StoreError::from)
        });
        let updated = self.observe_write("update", result)?;

        self.metrics.increment_updated();
        log_event_with_fields(
            Event::RecordUpdated,
            &[("resource", self.config.path), ("id", id)],
        );

        let body = self.db.read(|tables| updated.to_external(tables))?;
        Ok(Reply::ok(body))
    }

    pub fn delete(&self, id: &str, actor: &Actor) -> ApiResult<Reply> {
        let key = self.parse_key(id)?;
        if E::OWNED {
            actor.require()?;
        }

        let cascaded = self.db.delete::<E, _>(&key, |record| record.writable_by(actor))?;

        self.metrics.add_deleted(1 + cascaded as u64);
        log_event_with_fields(
            Event::RecordDeleted,
            &[("resource", self.config.path), ("id", id)],
        );
        if cascaded > 0 {
            let count = cascaded.to_string();
            log_event_with_fields(
                Event::CascadeDelete,
                &[("resource", self.config.path), ("id", id), ("removed", count.as_str())],
            );
        }

        Ok(Reply::no_content())
    }

    /// Ids that do not parse as the key type cannot name a record
    fn parse_key(&self, id: &str) -> ApiResult<E::Key> {
        <E::Key as FromStr>::from_str(id).map_err(|_| ApiError::not_found(E::NAME, id))
    }

    fn observe_write<T>(&self, operation: &str, result: Result<T, StoreError>) -> ApiResult<T> {
        result.map_err(|err| {
            if let StoreError::Validation(errors) = &err {
                self.metrics.increment_validation_rejections();
                let fields = errors.field_names().collect::<Vec<_>>().join(",");
                log_event_with_fields(
                    Event::ValidationRejected,
                    &[
                        ("resource", self.config.path),
                        ("operation", operation),
                        ("fields", fields.as_str()),
                    ],
                );
            }
            ApiError::from(err)
        })
    }
}
