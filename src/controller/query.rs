//! # List Query Parser
//!
//! Splits list query parameters into pagination, search, ordering and
//! resource filters.

use crate::filter::{parse_ordering, FilterSet, OrderBy, SearchFilter};
use crate::pagination::PageRequest;

use super::config::ResourceConfig;
use super::errors::ApiResult;

pub const PAGE_PARAM: &str = "page";
pub const PAGE_SIZE_PARAM: &str = "page_size";
pub const SEARCH_PARAM: &str = "search";
pub const ORDERING_PARAM: &str = "ordering";

/// A parsed list request
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub filters: FilterSet,
    pub search: Option<SearchFilter>,
    pub ordering: Vec<OrderBy>,
    pub page: PageRequest,
}

impl ListQuery {
    /// Parse decoded `(name, value)` pairs
    ///
    /// For the reserved parameters the last occurrence wins. Anything else
    /// must be a declared filter of the resource.
    pub fn parse(params: &[(String, String)], config: &ResourceConfig) -> ApiResult<Self> {
        let mut page = None;
        let mut page_size = None;
        let mut search = None;
        let mut ordering = None;
        let mut criteria = Vec::new();

        for (name, value) in params {
            match name.as_str() {
                PAGE_PARAM => page = Some(value.as_str()),
                PAGE_SIZE_PARAM => page_size = Some(value.as_str()),
                SEARCH_PARAM => search = Some(value.as_str()),
                ORDERING_PARAM => ordering = Some(value.as_str()),
                other => criteria.push((other, value.as_str())),
            }
        }

        let filters = FilterSet::parse(criteria, config.filters)?;
        let search = match search {
            Some(raw) => SearchFilter::parse(raw, config.search_fields)?,
            None => None,
        };
        let ordering = match ordering {
            Some(raw) => parse_ordering(raw, config.ordering_fields)?,
            None => Vec::new(),
        };
        let ordering = if ordering.is_empty() {
            config.default_ordering.to_vec()
        } else {
            ordering
        };
        let page = PageRequest::parse(page, page_size, &config.pagination)?;

        Ok(Self {
            filters,
            search,
            ordering,
            page,
        })
    }
}

/// Link to another page of the same listing
///
/// Every other parameter of `raw_query` is kept as sent; `page` is replaced.
pub fn page_link(collection_path: &str, raw_query: Option<&str>, page: usize) -> String {
    let mut parts: Vec<&str> = raw_query
        .unwrap_or_default()
        .split('&')
        .filter(|part| !part.is_empty())
        .filter(|part| part.split('=').next() != Some(PAGE_PARAM))
        .collect();
    let page_part = format!("{}={}", PAGE_PARAM, page);
    parts.push(&page_part);

    format!("{}?{}", collection_path, parts.join("&"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::Resource;
    use crate::filter::FilterError;
    use crate::schema::{Blog, Employee, Tweet};

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_reserved_params_are_not_filters() {
        let query = ListQuery::parse(
            &pairs(&[("page", "2"), ("page_size", "5"), ("name", "an")]),
            &Employee::config(),
        )
        .unwrap();

        assert_eq!(query.page, PageRequest::new(2, 5).unwrap());
        assert_eq!(query.filters.criteria.len(), 1);
        assert!(query.search.is_none());
    }

    #[test]
    fn test_unknown_filter_is_rejected() {
        let err = ListQuery::parse(&pairs(&[("salary", "1")]), &Employee::config()).unwrap_err();
        assert!(matches!(
            err,
            crate::controller::ApiError::InvalidFilter(FilterError::UnknownParameter(_))
        ));
    }

    #[test]
    fn test_search_and_ordering_only_where_declared() {
        assert!(ListQuery::parse(&pairs(&[("search", "x")]), &Employee::config()).is_err());
        assert!(ListQuery::parse(&pairs(&[("ordering", "emp_id")]), &Employee::config()).is_err());

        let query = ListQuery::parse(
            &pairs(&[("search", "rust"), ("ordering", "-id")]),
            &Blog::config(),
        )
        .unwrap();
        assert!(query.search.is_some());
        assert_eq!(query.ordering, vec![OrderBy::desc("id")]);
    }

    #[test]
    fn test_default_ordering_applies() {
        let query = ListQuery::parse(&[], &Tweet::config()).unwrap();
        assert_eq!(query.ordering[0], OrderBy::desc("created_at"));

        let query = ListQuery::parse(&pairs(&[("ordering", "id")]), &Tweet::config()).unwrap();
        assert_eq!(query.ordering, vec![OrderBy::asc("id")]);
    }

    #[test]
    fn test_page_link_keeps_other_params() {
        assert_eq!(
            page_link("/employees/", Some("name=an&page=2&id_min=3"), 3),
            "/employees/?name=an&id_min=3&page=3"
        );
        assert_eq!(page_link("/blogs/", None, 2), "/blogs/?page=2");
        assert_eq!(page_link("/blogs/", Some("page_size=5"), 1), "/blogs/?page_size=5&page=1");
    }
}
