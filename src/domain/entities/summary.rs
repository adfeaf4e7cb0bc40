//! Entity summaries and page results

use serde::{Deserialize, Serialize};

use super::EntityDetails;
use crate::domain::value_objects::{artwork_url, EntityId, QueryParams};

/// Minimal reference returned by list endpoints before detail resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySummary {
    pub id: EntityId,
    pub name: String,
    pub source_url: String,
}

/// One resolved page of entities
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    pub items: Vec<EntityDetails>,
    /// Global count, category size or match count depending on the strategy
    pub total: u32,
    pub has_next: bool,
    pub has_previous: bool,
}

impl PageResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn single(entity: EntityDetails) -> Self {
        Self {
            items: vec![entity],
            total: 1,
            has_next: false,
            has_previous: false,
        }
    }

    /// Query for the following page, if this result has one
    pub fn next_page(&self, params: &QueryParams) -> Option<QueryParams> {
        self.has_next
            .then(|| params.clone().with_page(params.page.saturating_add(1)))
    }

    /// Query for the preceding page, if this result has one
    pub fn previous_page(&self, params: &QueryParams) -> Option<QueryParams> {
        (self.has_previous && params.page > 1).then(|| params.clone().with_page(params.page - 1))
    }

    /// Artwork URLs worth prefetching for the next plain page.
    ///
    /// Only plain pagination maps page numbers onto contiguous ids, so
    /// filtered and searched lists yield nothing.
    pub fn next_page_artwork(&self, params: &QueryParams) -> Vec<String> {
        if !self.has_next || params.category.is_some() || params.is_searching() {
            return Vec::new();
        }
        let start = params.page.saturating_mul(params.page_size).saturating_add(1);
        (0..params.page_size)
            .map(|i| artwork_url(EntityId::new(start.saturating_add(i))))
            .collect()
    }
}
