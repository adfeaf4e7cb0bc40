//! Domain layer - Catalog data and pure logic with no I/O
//!
//! This layer contains:
//! - Entities: EntityDetails, EntitySummary, PageResult
//! - Value Objects: EntityId, QueryParams, categories, stat labels, artwork URLs
//! - Domain Services: local pagination, fragment filtering, id extraction

pub mod entities;
pub mod services;
pub mod value_objects;
