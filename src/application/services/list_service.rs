//! List Service - Resolves one page of the catalog grid
//!
//! Picks a retrieval strategy from the query parameters (search, category
//! or plain pagination), fetches the summaries, then resolves the full
//! details of every summary in one parallel batch. The batch is all or
//! nothing: the first failing detail fetch fails the whole page.

use std::sync::Arc;

use futures_util::future::try_join_all;
use tracing::{debug, info, instrument};

use crate::application::ports::outbound::{EntityClientPort, FetchError, ListSlice};
use crate::domain::entities::{EntityDetails, EntitySummary, PageResult};
use crate::domain::value_objects::{ListStrategy, QueryParams};

/// Default number of fragment matches whose details are resolved
pub const DEFAULT_SEARCH_RESULT_CAP: u32 = 50;

#[derive(Clone)]
pub struct ListService {
    client: Arc<dyn EntityClientPort>,
    search_result_cap: u32,
}

impl ListService {
    pub fn new(client: Arc<dyn EntityClientPort>, search_result_cap: u32) -> Self {
        Self {
            client,
            search_result_cap,
        }
    }

    /// Resolve the page described by `params`
    #[instrument(skip(self), fields(page = params.page, page_size = params.page_size))]
    pub async fn resolve_page(&self, params: &QueryParams) -> Result<PageResult, FetchError> {
        params.validate().map_err(FetchError::InvalidQuery)?;

        match params.strategy() {
            ListStrategy::Search(query) => self.search(&query).await,
            ListStrategy::Category(category) => {
                let slice = self
                    .client
                    .fetch_by_category(&category, params.offset(), params.page_size)
                    .await?;
                debug!(category = %category, total = slice.total, "Fetched category slice");
                self.resolve_slice(slice).await
            }
            ListStrategy::Plain => {
                let slice = self
                    .client
                    .fetch_list_page(params.offset(), params.page_size)
                    .await?;
                debug!(total = slice.total, "Fetched list page");
                self.resolve_slice(slice).await
            }
        }
    }

    /// Two-step name search.
    ///
    /// The text is first tried as an exact id or name. Only a not-found
    /// answer falls through to the fragment scan; transport and other
    /// failures propagate. Blank text returns an empty page without any
    /// request.
    #[instrument(skip(self))]
    pub async fn search(&self, text: &str) -> Result<PageResult, FetchError> {
        let query = text.trim().to_lowercase();
        if query.is_empty() {
            return Ok(PageResult::empty());
        }

        match self.client.fetch_by_name(&query).await {
            Ok(entity) => {
                debug!(id = %entity.id, "Exact match");
                return Ok(PageResult::single(entity));
            }
            Err(e) if e.is_not_found() => {
                debug!("No exact match, scanning name fragments");
            }
            Err(e) => return Err(e),
        }

        let matches = self.client.fetch_by_name_fragment(&query).await?;
        let total = u32::try_from(matches.len()).unwrap_or(u32::MAX);
        if matches.is_empty() {
            return Ok(PageResult::empty());
        }

        let cap = self.search_result_cap as usize;
        let items = self.resolve_details(&matches[..matches.len().min(cap)]).await?;
        info!(total, resolved = items.len(), "Fragment search complete");

        Ok(PageResult {
            items,
            total,
            has_next: matches.len() > cap,
            has_previous: false,
        })
    }

    async fn resolve_slice(&self, slice: ListSlice) -> Result<PageResult, FetchError> {
        let items = self.resolve_details(&slice.summaries).await?;
        Ok(PageResult {
            items,
            total: slice.total,
            has_next: slice.next.is_some(),
            has_previous: slice.previous.is_some(),
        })
    }

    /// Fetch details for every summary concurrently, preserving order
    async fn resolve_details(
        &self,
        summaries: &[EntitySummary],
    ) -> Result<Vec<EntityDetails>, FetchError> {
        try_join_all(
            summaries
                .iter()
                .map(|summary| self.client.fetch_by_id(summary.id)),
        )
        .await
    }
}
