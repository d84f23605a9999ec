//! # Pagination Cursor
//!
//! Page-number slicing of an ordered collection. Pages are 1-based. A page
//! past the end is not an error: it comes back empty with `total_count`
//! populated and `prev_page` pointing at the last page that has items.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Page size used when a resource does not configure one
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Largest `page_size` a client may ask for by default
pub const DEFAULT_MAX_PAGE_SIZE: usize = 100;

/// Rejected page request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    #[error("Invalid page: {0}")]
    InvalidPage(String),
}

pub type PageResult<T> = Result<T, PageError>;

/// Per-resource pagination settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Cap on the `page_size` query override; larger requests are clamped
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_max_page_size() -> usize {
    DEFAULT_MAX_PAGE_SIZE
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
        }
    }
}

impl PaginationConfig {
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            page_size,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.page_size == 0 {
            return Err("page_size must be at least 1".to_string());
        }
        if self.max_page_size < self.page_size {
            return Err(format!(
                "max_page_size ({}) must not be smaller than page_size ({})",
                self.max_page_size, self.page_size
            ));
        }
        Ok(())
    }
}

/// Validated page number and size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub page_size: usize,
}

impl PageRequest {
    /// Parse the `page` and `page_size` query values
    ///
    /// Absent or empty values fall back to page 1 and the configured size.
    pub fn parse(
        page: Option<&str>,
        page_size: Option<&str>,
        config: &PaginationConfig,
    ) -> PageResult<Self> {
        let page = match page.map(str::trim).filter(|p| !p.is_empty()) {
            None => 1,
            Some(raw) => match raw.parse::<i64>() {
                Ok(n) if n >= 1 => n as usize,
                Ok(n) => {
                    return Err(PageError::InvalidPage(format!(
                        "page must be 1 or greater, got {}",
                        n
                    )))
                }
                Err(_) => {
                    return Err(PageError::InvalidPage(format!(
                        "page must be an integer, got '{}'",
                        raw
                    )))
                }
            },
        };

        let page_size = match page_size.map(str::trim).filter(|p| !p.is_empty()) {
            None => config.page_size,
            Some(raw) => match raw.parse::<usize>() {
                Ok(0) => {
                    return Err(PageError::InvalidPage(
                        "page_size must be at least 1".to_string(),
                    ))
                }
                Ok(n) => n.min(config.max_page_size),
                Err(_) => {
                    return Err(PageError::InvalidPage(format!(
                        "page_size must be a positive integer, got '{}'",
                        raw
                    )))
                }
            },
        };

        Self::new(page, page_size)
    }

    pub fn new(page: usize, page_size: usize) -> PageResult<Self> {
        if page == 0 {
            return Err(PageError::InvalidPage(
                "page must be 1 or greater, got 0".to_string(),
            ));
        }
        if page_size == 0 {
            return Err(PageError::InvalidPage(
                "page_size must be at least 1".to_string(),
            ));
        }
        Ok(Self { page, page_size })
    }
}

/// One page of a collection plus navigation metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: usize,
    pub page: usize,
    pub page_size: usize,
    pub next_page: Option<usize>,
    pub prev_page: Option<usize>,
}

impl<T> Page<T> {
    /// Convert the items, keeping the metadata
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            page: self.page,
            page_size: self.page_size,
            next_page: self.next_page,
            prev_page: self.prev_page,
        }
    }
}

/// Number of pages holding items; an empty collection still has page 1
fn last_page(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size).max(1)
}

/// Slice `items` down to the requested page
pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> Page<T> {
    let PageRequest { page, page_size } = request;
    let total_count = items.len();
    let last = last_page(total_count, page_size);

    let start = (page - 1).saturating_mul(page_size);
    let slice: Vec<T> = items.into_iter().skip(start).take(page_size).collect();

    let (next_page, prev_page) = if page > last {
        (None, Some(last))
    } else {
        (
            (page < last).then_some(page + 1),
            (page > 1).then_some(page - 1),
        )
    };

    Page {
        items: slice,
        total_count,
        page,
        page_size,
        next_page,
        prev_page,
    }
}
