//! Shared application state

use std::sync::Arc;

use crate::application::query_cache::QueryCache;
use crate::application::services::{DetailService, ExplorerService, ListService};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::pokeapi::PokeApiClient;

/// Shared application state
pub struct AppState {
    pub config: AppConfig,
    pub catalog: Arc<PokeApiClient>,
    pub explorer: ExplorerService,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let catalog = Arc::new(PokeApiClient::new(
            &config.api_base_url,
            config.search_candidate_limit,
        ));

        let list_service = ListService::new(catalog.clone(), config.search_result_cap);
        let detail_service = DetailService::new(catalog.clone());

        let explorer = ExplorerService::new(
            list_service,
            detail_service,
            QueryCache::new("list", config.cache.list_stale_time, config.cache.gc_time),
            QueryCache::new("detail", config.cache.detail_stale_time, config.cache.gc_time),
        );

        Self {
            config,
            catalog,
            explorer,
        }
    }
}
