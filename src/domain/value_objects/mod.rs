//! Value objects - Immutable objects defined by their attributes

mod artwork;
mod category;
mod ids;
mod query;
mod stat_label;

pub use artwork::{artwork_url, fallback_sprite_url};
pub use category::{is_known_category, KNOWN_CATEGORIES};
pub use ids::*;
pub use query::{ListStrategy, QueryParams, DEFAULT_PAGE_SIZE};
pub use stat_label::stat_label;
