//! List query parameters and strategy selection
//!
//! A `QueryParams` value is the full cache key for a list lookup: two
//! queries with equal fields always resolve to the same cache entry.

use serde::{Deserialize, Serialize};

/// Default number of entities shown per page
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Parameters driving one page resolution
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryParams {
    /// 1-based page number
    pub page: u32,
    pub page_size: u32,
    /// Category ("type") the list is restricted to
    pub category: Option<String>,
    /// Free-text search; blank means no search
    pub search_text: String,
}

/// How a page is retrieved from the remote catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListStrategy {
    /// Exact id/name lookup, falling back to a name fragment scan.
    /// Carries the trimmed, lower-cased query.
    Search(String),
    /// All members of one category, paginated locally
    Category(String),
    /// Native remote pagination over the whole catalog
    Plain,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self::first_page(DEFAULT_PAGE_SIZE)
    }
}

impl QueryParams {
    pub fn first_page(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size,
            category: None,
            search_text: String::new(),
        }
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Set the search text. A non-blank search clears the category filter,
    /// and any change of search text returns to the first page.
    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self.page = 1;
        if !self.search_text.trim().is_empty() {
            self.category = None;
        }
        self
    }

    /// Set or clear the category filter. Selecting a category clears the
    /// search text; either way the query returns to the first page.
    pub fn with_category(mut self, category: Option<String>) -> Self {
        if category.is_some() {
            self.search_text.clear();
        }
        self.category = category;
        self.page = 1;
        self
    }

    pub fn is_searching(&self) -> bool {
        !self.search_text.trim().is_empty()
    }

    /// Remote offset of the first entity on this page
    pub fn offset(&self) -> u32 {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.page == 0 {
            return Err("page must be at least 1".to_string());
        }
        if self.page_size == 0 {
            return Err("page size must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Pick the retrieval strategy: search wins over category, category
    /// wins over plain pagination.
    pub fn strategy(&self) -> ListStrategy {
        let query = self.search_text.trim();
        if !query.is_empty() {
            return ListStrategy::Search(query.to_lowercase());
        }
        match &self.category {
            Some(category) => ListStrategy::Category(category.clone()),
            None => ListStrategy::Plain,
        }
    }
}
