//! Display labels for base stats

/// Short label for a remote stat name, or the raw name when unknown
pub fn stat_label(stat_name: &str) -> &str {
    match stat_name {
        "hp" => "HP",
        "attack" => "Attack",
        "defense" => "Defense",
        "special-attack" => "Sp. Atk",
        "special-defense" => "Sp. Def",
        "speed" => "Speed",
        other => other,
    }
}
