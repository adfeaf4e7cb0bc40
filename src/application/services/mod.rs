//! Application services - Use case implementations
//!
//! The list and detail services orchestrate entity client calls; the
//! explorer service puts both behind their query caches.

pub mod detail_service;
pub mod explorer_service;
pub mod list_service;

#[cfg(test)]
pub(crate) mod test_support;

pub use detail_service::DetailService;
pub use explorer_service::{DetailCache, ExplorerService, ListCache};
pub use list_service::{ListService, DEFAULT_SEARCH_RESULT_CAP};
