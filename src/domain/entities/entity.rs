//! Entity details - the full catalog record for one creature

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{stat_label, EntityId};

/// Highest base value any stat reaches, used to scale stat bars
pub const MAX_BASE_STAT: u32 = 255;

/// A fully resolved catalog entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDetails {
    pub id: EntityId,
    pub name: String,
    pub height_decimeters: u32,
    pub weight_decigrams: u32,
    /// Missing for some alternate forms in the remote data
    pub base_experience: Option<u32>,
    pub abilities: Vec<Ability>,
    pub stats: Vec<Stat>,
    pub types: Vec<TypeSlot>,
    pub sprites: Sprites,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
    pub name: String,
    pub is_hidden: bool,
    pub slot: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    pub stat_name: String,
    pub base_value: u32,
    pub effort: u32,
}

impl Stat {
    pub fn label(&self) -> &str {
        stat_label(&self.stat_name)
    }

    /// Base value as a percentage of `MAX_BASE_STAT`
    pub fn percentage(&self) -> f64 {
        f64::from(self.base_value) / f64::from(MAX_BASE_STAT) * 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSlot {
    pub slot: u32,
    pub type_name: String,
}

/// Image URLs published for an entity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprites {
    pub front_default: Option<String>,
    pub front_shiny: Option<String>,
    pub front_female: Option<String>,
    pub front_shiny_female: Option<String>,
    pub official_artwork: Option<String>,
    pub animated: Option<AnimatedSprites>,
}

/// Animated sprite set, keyed by gender and shininess
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimatedSprites {
    pub front_default: Option<String>,
    pub front_female: Option<String>,
    pub front_shiny: Option<String>,
    pub front_shiny_female: Option<String>,
}

/// One selectable animated variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpriteVariant {
    RegularMale,
    RegularFemale,
    ShinyMale,
    ShinyFemale,
}

impl SpriteVariant {
    pub fn is_shiny(&self) -> bool {
        matches!(self, Self::ShinyMale | Self::ShinyFemale)
    }
}

impl AnimatedSprites {
    /// Variants that actually have an image, in display order
    pub fn variants(&self) -> Vec<(SpriteVariant, &str)> {
        [
            (SpriteVariant::RegularMale, &self.front_default),
            (SpriteVariant::RegularFemale, &self.front_female),
            (SpriteVariant::ShinyMale, &self.front_shiny),
            (SpriteVariant::ShinyFemale, &self.front_shiny_female),
        ]
        .into_iter()
        .filter_map(|(variant, url)| url.as_deref().map(|url| (variant, url)))
        .collect()
    }
}

impl EntityDetails {
    pub fn height_meters(&self) -> f64 {
        f64::from(self.height_decimeters) / 10.0
    }

    pub fn weight_kilograms(&self) -> f64 {
        f64::from(self.weight_decigrams) / 10.0
    }

    /// Catalog number as shown on cards, e.g. `#0025`
    pub fn display_number(&self) -> String {
        format!("#{:04}", self.id.value())
    }

    pub fn animated_variants(&self) -> Vec<(SpriteVariant, &str)> {
        self.sprites
            .animated
            .as_ref()
            .map(AnimatedSprites::variants)
            .unwrap_or_default()
    }

    pub fn base_stat_total(&self) -> u32 {
        self.stats.iter().map(|s| s.base_value).sum()
    }
}
