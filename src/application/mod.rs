//! Application layer - Orchestration of catalog lookups
//!
//! This layer contains:
//! - Ports: the entity client contract and its error taxonomy
//! - Query cache: keyed request cache with freshness windows
//! - Services: list and detail orchestrators plus the cache-backed explorer

pub mod ports;
pub mod query_cache;
pub mod services;
