//! Entity client port - Read-only access to the remote creature catalog
//!
//! The port exposes the typed request functions the orchestrators build on.
//! Implementations own the transport; services only see domain types and
//! `FetchError`.

use async_trait::async_trait;

use crate::domain::entities::{EntityDetails, EntitySummary};
use crate::domain::value_objects::EntityId;

/// Failure of a catalog request.
///
/// Cloneable so one failure can be handed to every waiter of a shared
/// in-flight request and kept in a cache entry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid response body: {0}")]
    Decode(String),
    #[error("invalid query: {0}")]
    InvalidQuery(String),
    #[error("request task aborted: {0}")]
    Aborted(String),
}

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// One page of summaries plus the remote's pagination metadata
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListSlice {
    pub summaries: Vec<EntitySummary>,
    pub total: u32,
    pub next: Option<String>,
    pub previous: Option<String>,
}

#[async_trait]
pub trait EntityClientPort: Send + Sync {
    /// Fetch one entity by numeric id
    async fn fetch_by_id(&self, id: EntityId) -> Result<EntityDetails, FetchError>;

    /// Fetch one entity by name slug (or id in text form)
    async fn fetch_by_name(&self, name: &str) -> Result<EntityDetails, FetchError>;

    /// Native remote pagination over the whole catalog
    async fn fetch_list_page(&self, offset: u32, limit: u32) -> Result<ListSlice, FetchError>;

    /// Members of one category, paginated locally over the full member list
    async fn fetch_by_category(
        &self,
        category: &str,
        offset: u32,
        limit: u32,
    ) -> Result<ListSlice, FetchError>;

    /// Summaries whose name contains `fragment`, scanned over a bounded
    /// candidate list
    async fn fetch_by_name_fragment(&self, fragment: &str)
        -> Result<Vec<EntitySummary>, FetchError>;
}
