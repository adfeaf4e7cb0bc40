//! Application configuration

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::services::DEFAULT_SEARCH_RESULT_CAP;
use crate::domain::value_objects::DEFAULT_PAGE_SIZE;
use crate::infrastructure::pokeapi::DEFAULT_SEARCH_CANDIDATE_LIMIT;

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Catalog API base URL
    pub api_base_url: String,
    /// Entities per grid page
    pub page_size: u32,
    /// Entries scanned by a name fragment search
    pub search_candidate_limit: u32,
    /// Fragment matches whose details are resolved
    pub search_result_cap: u32,

    pub cache: CacheConfig,
}

/// Query cache timings
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// How long a list page stays fresh
    pub list_stale_time: Duration,
    /// How long entity details stay fresh
    pub detail_stale_time: Duration,
    /// How long a stale entry is kept before eviction
    pub gc_time: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            list_stale_time: Duration::from_secs(5 * 60),
            detail_stale_time: Duration::from_secs(10 * 60),
            gc_time: Duration::from_secs(5 * 60),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://pokeapi.co/api/v2".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            search_candidate_limit: DEFAULT_SEARCH_CANDIDATE_LIMIT,
            search_result_cap: DEFAULT_SEARCH_RESULT_CAP,
            cache: CacheConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            api_base_url: env::var("DEX_API_BASE_URL").unwrap_or(defaults.api_base_url),
            page_size: env_or("DEX_PAGE_SIZE", defaults.page_size)?,
            search_candidate_limit: env_or(
                "DEX_SEARCH_CANDIDATE_LIMIT",
                defaults.search_candidate_limit,
            )?,
            search_result_cap: env_or("DEX_SEARCH_RESULT_CAP", defaults.search_result_cap)?,
            cache: CacheConfig {
                list_stale_time: env_secs("DEX_LIST_STALE_SECS", defaults.cache.list_stale_time)?,
                detail_stale_time: env_secs(
                    "DEX_DETAIL_STALE_SECS",
                    defaults.cache.detail_stale_time,
                )?,
                gc_time: env_secs("DEX_CACHE_GC_SECS", defaults.cache.gc_time)?,
            },
        };

        if config.page_size == 0 {
            anyhow::bail!("DEX_PAGE_SIZE must be greater than 0");
        }
        Ok(config)
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {:?}", key, value)),
        Err(_) => Ok(default),
    }
}

fn env_secs(key: &str, default: Duration) -> Result<Duration> {
    env_or(key, default.as_secs()).map(Duration::from_secs)
}
