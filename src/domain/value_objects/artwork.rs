//! Static image locations keyed by entity id

use super::EntityId;

const ARTWORK_BASE: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork";
const SPRITE_BASE: &str = "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon";

/// Primary artwork image
pub fn artwork_url(id: EntityId) -> String {
    format!("{}/{}.png", ARTWORK_BASE, id)
}

/// Smaller sprite used when the artwork fails to load
pub fn fallback_sprite_url(id: EntityId) -> String {
    format!("{}/{}.png", SPRITE_BASE, id)
}
