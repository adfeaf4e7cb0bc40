//! Entity categories ("types" in the remote catalog)

/// Every category the remote catalog groups entities by, sorted by name
pub const KNOWN_CATEGORIES: [&str; 18] = [
    "bug", "dark", "dragon", "electric", "fairy", "fighting", "fire", "flying", "ghost", "grass",
    "ground", "ice", "normal", "poison", "psychic", "rock", "steel", "water",
];

pub fn is_known_category(name: &str) -> bool {
    KNOWN_CATEGORIES.binary_search(&name).is_ok()
}
