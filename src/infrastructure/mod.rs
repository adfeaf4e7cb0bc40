//! Infrastructure layer - External adapters and implementations
//!
//! This layer contains:
//! - PokeAPI: HTTP client for the remote creature catalog
//! - Config: Application configuration
//! - State: Shared application state

pub mod config;
pub mod pokeapi;
pub mod state;
