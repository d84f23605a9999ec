//! Per-resource list configuration

use crate::filter::{FilterField, OrderBy};
use crate::pagination::PaginationConfig;
use crate::serializer::Serializer;

/// Everything the controller needs to know about one resource's listing
#[derive(Debug, Clone)]
pub struct ResourceConfig {
    /// URL segment, e.g. `employees`
    pub path: &'static str,
    pub pagination: PaginationConfig,
    pub filters: &'static [FilterField],
    /// Fields the `search` parameter looks in; empty disables search
    pub search_fields: &'static [&'static str],
    /// Fields the `ordering` parameter may name; empty disables ordering
    pub ordering_fields: &'static [&'static str],
    /// Order used when the request gives none; empty means creation order
    pub default_ordering: &'static [OrderBy],
}

impl ResourceConfig {
    pub fn new(path: &'static str) -> Self {
        Self {
            path,
            pagination: PaginationConfig::default(),
            filters: &[],
            search_fields: &[],
            ordering_fields: &[],
            default_ordering: &[],
        }
    }

    pub fn with_pagination(mut self, pagination: PaginationConfig) -> Self {
        self.pagination = pagination;
        self
    }

    pub fn with_filters(mut self, filters: &'static [FilterField]) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_search(mut self, fields: &'static [&'static str]) -> Self {
        self.search_fields = fields;
        self
    }

    pub fn with_ordering(
        mut self,
        fields: &'static [&'static str],
        default: &'static [OrderBy],
    ) -> Self {
        self.ordering_fields = fields;
        self.default_ordering = default;
        self
    }

    /// Collection URL, e.g. `/employees/`
    pub fn collection_path(&self) -> String {
        format!("/{}/", self.path)
    }
}

/// A record type served as a REST resource
pub trait Resource: Serializer {
    /// URL segment the resource is mounted under
    const PATH: &'static str;

    /// Default listing configuration
    fn config() -> ResourceConfig;
}
