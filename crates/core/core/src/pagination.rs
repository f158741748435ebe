//! Pagination metadata and list options.

use serde::{Deserialize, Serialize};

/// Pagination metadata attached to list responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pagination {
    pub current_page: u32,
    pub from: u32,
    pub last_page: u32,
    pub per_page: u32,
    pub to: u32,
    pub total: u64,
}

impl Pagination {
    /// Returns true if there are more pages after the current one.
    pub fn has_next_page(&self) -> bool {
        self.current_page < self.last_page
    }

    /// Returns the next page number, if any.
    pub fn next_page(&self) -> Option<u32> {
        self.has_next_page().then(|| self.current_page + 1)
    }

    /// Returns true if there is a page before the current one.
    pub fn has_previous_page(&self) -> bool {
        self.current_page > 1
    }

    /// Returns the previous page number, if any.
    pub fn previous_page(&self) -> Option<u32> {
        self.has_previous_page().then(|| self.current_page - 1)
    }
}

/// Common options for list endpoints.
///
/// Serialized as query parameters; unset and zero values are omitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ListOptions {
    #[serde(skip_serializing_if = "is_unset")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "is_unset")]
    pub per_page: Option<u32>,
}

fn is_unset(value: &Option<u32>) -> bool {
    value.is_none_or(|v| v == 0)
}

impl ListOptions {
    /// Creates empty list options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page number. Zero leaves it unset.
    pub fn page(mut self, page: u32) -> Self {
        self.page = (page > 0).then_some(page);
        self
    }

    /// Sets the page size. Zero leaves it unset.
    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = (per_page > 0).then_some(per_page);
        self
    }

    /// Options pointing at the page after `pagination`, or `None` on the last page.
    pub fn after(pagination: &Pagination) -> Option<Self> {
        pagination.next_page().map(|page| Self {
            page: Some(page),
            per_page: (pagination.per_page > 0).then_some(pagination.per_page),
        })
    }
}

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Option<Pagination>,
}

impl<T> Page<T> {
    /// Returns true if the remote reports more pages.
    pub fn has_next_page(&self) -> bool {
        self.pagination.as_ref().is_some_and(Pagination::has_next_page)
    }
}
