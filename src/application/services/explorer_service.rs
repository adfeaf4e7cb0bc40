//! Explorer Service - Cache-backed queries for the catalog views
//!
//! Wraps the list and detail orchestrators in their query caches and
//! reports each lookup as a `QueryState`. List entries are keyed by the
//! full `QueryParams`, detail entries by entity id.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::query_cache::{QueryCache, QueryState};
use crate::application::services::{DetailService, ListService};
use crate::domain::entities::{EntityDetails, PageResult};
use crate::domain::value_objects::{EntityId, QueryParams};

pub type ListCache = QueryCache<QueryParams, Arc<PageResult>>;
pub type DetailCache = QueryCache<EntityId, Arc<EntityDetails>>;

pub struct ExplorerService {
    list_service: ListService,
    detail_service: DetailService,
    list_cache: ListCache,
    detail_cache: DetailCache,
}

impl ExplorerService {
    pub fn new(
        list_service: ListService,
        detail_service: DetailService,
        list_cache: ListCache,
        detail_cache: DetailCache,
    ) -> Self {
        Self {
            list_service,
            detail_service,
            list_cache,
            detail_cache,
        }
    }

    /// Page of the grid for `params`
    #[instrument(skip(self))]
    pub async fn list_page(&self, params: QueryParams) -> QueryState<Arc<PageResult>> {
        let service = self.list_service.clone();
        let key = params.clone();
        self.list_cache
            .query(key, move || async move {
                service.resolve_page(&params).await.map(Arc::new)
            })
            .await
    }

    /// Request the page again even if the cached copy is fresh
    #[instrument(skip(self))]
    pub async fn refetch_list_page(&self, params: QueryParams) -> QueryState<Arc<PageResult>> {
        let service = self.list_service.clone();
        let key = params.clone();
        self.list_cache
            .refetch_query(key, move || async move {
                service.resolve_page(&params).await.map(Arc::new)
            })
            .await
    }

    /// Current state of a page without issuing a request
    pub async fn peek_list_page(&self, params: &QueryParams) -> QueryState<Arc<PageResult>> {
        self.list_cache.snapshot(params).await
    }

    pub async fn invalidate_list_page(&self, params: &QueryParams) -> bool {
        self.list_cache.invalidate(params).await
    }

    /// Details for the selected entity. No selection means no request.
    #[instrument(skip(self))]
    pub async fn details(&self, id: Option<EntityId>) -> QueryState<Arc<EntityDetails>> {
        let Some(id) = id else {
            debug!("No entity selected, detail query disabled");
            return QueryState::idle();
        };
        let service = self.detail_service.clone();
        self.detail_cache
            .query(id, move || async move {
                service.resolve_details(id).await.map(Arc::new)
            })
            .await
    }

    #[instrument(skip(self))]
    pub async fn refetch_details(&self, id: EntityId) -> QueryState<Arc<EntityDetails>> {
        let service = self.detail_service.clone();
        self.detail_cache
            .refetch_query(id, move || async move {
                service.resolve_details(id).await.map(Arc::new)
            })
            .await
    }

    pub async fn invalidate_details(&self, id: EntityId) -> bool {
        self.detail_cache.invalidate(&id).await
    }

    /// Evict expired entries from both caches
    pub async fn evict_expired(&self) -> usize {
        self.list_cache.evict_expired().await + self.detail_cache.evict_expired().await
    }
}
