//! Dex Explorer - Catalog client for the PokeAPI creature database
//!
//! The library resolves the pages and detail records a catalog browser
//! shows:
//! - Fetches entities from PokeAPI over HTTP
//! - Paginates, filters by category and searches by name
//! - Caches every query with freshness windows and in-flight deduplication

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::ports::outbound::{EntityClientPort, FetchError, ListSlice};
pub use application::query_cache::{CacheEntry, EntryState, QueryCache, QueryState};
pub use application::services::{DetailService, ExplorerService, ListService};
pub use domain::entities::{EntityDetails, EntitySummary, PageResult};
pub use domain::value_objects::{EntityId, ListStrategy, QueryParams};
pub use infrastructure::config::AppConfig;
pub use infrastructure::pokeapi::PokeApiClient;
pub use infrastructure::state::AppState;
