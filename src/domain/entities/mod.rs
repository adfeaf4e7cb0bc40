//! Domain entities - Catalog records and page results

mod entity;
mod summary;

pub use entity::{
    Ability, AnimatedSprites, EntityDetails, SpriteVariant, Sprites, Stat, TypeSlot, MAX_BASE_STAT,
};
pub use summary::{EntitySummary, PageResult};
