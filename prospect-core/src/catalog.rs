//! Read-only reference data: jewelry, tools, consumables, events, ores and
//! museum modifiers.
//!
//! The catalog is parsed once and never mutated. Loadouts refer into it by
//! name (plus position for jewelry) and resolve through the lookup methods
//! here at read time.

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

use crate::loadout::{ItemPosition, ItemReference};

const DEFAULT_CATALOG_DATA: &str = include_str!("../assets/catalog.json");

/// Rarity tiers, ordered from most to least common.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    Mythic,
    Exotic,
}

/// Museum bonus for a rarity the catalog does not recognise.
pub const UNKNOWN_RARITY_BONUS: f64 = 0.01;

impl Rarity {
    pub const ALL: [Self; 7] = [
        Self::Common,
        Self::Uncommon,
        Self::Rare,
        Self::Epic,
        Self::Legendary,
        Self::Mythic,
        Self::Exotic,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Common => "Common",
            Self::Uncommon => "Uncommon",
            Self::Rare => "Rare",
            Self::Epic => "Epic",
            Self::Legendary => "Legendary",
            Self::Mythic => "Mythic",
            Self::Exotic => "Exotic",
        }
    }

    /// Case-insensitive lookup; `None` for names outside the tier list.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let trimmed = name.trim();
        Self::ALL
            .into_iter()
            .find(|rarity| rarity.as_str().eq_ignore_ascii_case(trimmed))
    }

    /// Flat museum bonus granted per targeted stat by a modifier on an ore
    /// of this tier.
    #[must_use]
    pub const fn museum_bonus(self) -> f64 {
        match self {
            Self::Common => 0.005,
            Self::Uncommon => 0.0075,
            Self::Rare => 0.0125,
            Self::Epic => 0.02,
            Self::Legendary => 0.03,
            Self::Mythic => 0.05,
            Self::Exotic => 0.08,
        }
    }

    /// Number of museum display slots reserved for this tier.
    #[must_use]
    pub const fn museum_slots(self) -> usize {
        match self {
            Self::Exotic => 1,
            Self::Mythic => 2,
            Self::Legendary | Self::Epic | Self::Rare | Self::Uncommon | Self::Common => 3,
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Museum bonus for an optional rarity, falling back for unknown tiers.
#[must_use]
pub fn rarity_bonus(rarity: Option<Rarity>) -> f64 {
    rarity.map_or(UNKNOWN_RARITY_BONUS, Rarity::museum_bonus)
}

fn lenient_rarity<'de, D>(deserializer: D) -> Result<Option<Rarity>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(Rarity::from_name))
}

/// A `[min, max]` roll range. A bare number is read as a fixed value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatRange {
    pub min: f64,
    pub max: f64,
}

impl<'de> Deserialize<'de> for StatRange {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawRange {
            Pair(f64, f64),
            Fixed(f64),
            Object { min: f64, max: f64 },
        }

        Ok(match RawRange::deserialize(deserializer)? {
            RawRange::Pair(min, max) | RawRange::Object { min, max } => Self { min, max },
            RawRange::Fixed(value) => Self {
                min: value,
                max: value,
            },
        })
    }
}

pub type StatRanges = BTreeMap<String, StatRange>;

/// Ring, necklace or charm definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDef {
    pub name: String,
    pub position: ItemPosition,
    #[serde(default, deserialize_with = "lenient_rarity")]
    pub rarity: Option<Rarity>,
    #[serde(default)]
    pub stats: StatRanges,
    #[serde(default)]
    pub enhanced_stats: Option<StatRanges>,
}

impl ItemDef {
    /// Stat table for the requested tier; enhanced falls back to base.
    #[must_use]
    pub fn stats_for_tier(&self, enhanced: bool) -> &StatRanges {
        if enhanced {
            self.enhanced_stats.as_ref().unwrap_or(&self.stats)
        } else {
            &self.stats
        }
    }

    #[must_use]
    pub const fn has_enhanced_tier(&self) -> bool {
        self.enhanced_stats.is_some()
    }

    #[must_use]
    pub fn reference(&self) -> ItemReference {
        ItemReference::new(self.name.clone(), self.position)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShovelDef {
    pub name: String,
    #[serde(default, deserialize_with = "lenient_rarity")]
    pub rarity: Option<Rarity>,
    #[serde(default)]
    pub dig_strength: f64,
    #[serde(default)]
    pub dig_speed: f64,
    #[serde(default)]
    pub toughness: f64,
}

/// Structured pan passive bonuses.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassiveEffects {
    #[serde(default)]
    pub size_boost: Option<f64>,
    #[serde(default)]
    pub modifier_boost: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanDef {
    pub name: String,
    #[serde(default, deserialize_with = "lenient_rarity")]
    pub rarity: Option<Rarity>,
    #[serde(default)]
    pub luck: f64,
    #[serde(default)]
    pub capacity: f64,
    #[serde(default)]
    pub shake_strength: f64,
    #[serde(default)]
    pub shake_speed: f64,
    /// Free-text passive, kept for catalogs without structured effects.
    #[serde(default)]
    pub passive: Option<String>,
    #[serde(default)]
    pub passive_effects: Option<PassiveEffects>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnchantDef {
    pub name: String,
    #[serde(default)]
    pub effects: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PotionDef {
    pub name: String,
    #[serde(default)]
    pub effects: BTreeMap<String, f64>,
}

/// Server event with absolute multipliers per stat (1.5 means +50%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDef {
    pub name: String,
    #[serde(default)]
    pub multipliers: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OreDef {
    pub name: String,
    #[serde(default, deserialize_with = "lenient_rarity")]
    pub rarity: Option<Rarity>,
    /// Natural-language description of the single stat this ore boosts.
    #[serde(default)]
    pub effect: String,
    #[serde(default)]
    pub max_multiplier: f64,
    /// Multi-stat effects; when non-empty they replace `effect`.
    #[serde(default)]
    pub special_effects: BTreeMap<String, f64>,
}

impl OreDef {
    #[must_use]
    pub fn has_special_effects(&self) -> bool {
        !self.special_effects.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModifierDef {
    pub name: String,
    /// Effect category such as "Luck", "Dig and Shake Speed" or "2x Luck".
    #[serde(default)]
    pub effect: String,
}

/// Raw catalog document as stored on disk.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CatalogData {
    #[serde(default)]
    pub items: Vec<ItemDef>,
    #[serde(default)]
    pub shovels: Vec<ShovelDef>,
    #[serde(default)]
    pub pans: Vec<PanDef>,
    #[serde(default)]
    pub enchants: Vec<EnchantDef>,
    #[serde(default)]
    pub potions: Vec<PotionDef>,
    #[serde(default)]
    pub events: Vec<EventDef>,
    #[serde(default)]
    pub ores: Vec<OreDef>,
    #[serde(default)]
    pub modifiers: Vec<ModifierDef>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog JSON could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default)]
struct CatalogIndex {
    items: HashMap<ItemPosition, HashMap<String, usize>>,
    shovels: HashMap<String, usize>,
    pans: HashMap<String, usize>,
    enchants: HashMap<String, usize>,
    potions: HashMap<String, usize>,
    events: HashMap<String, usize>,
    ores: HashMap<String, usize>,
    modifiers: HashMap<String, usize>,
}

fn index_by_name<'a, I>(names: I) -> HashMap<String, usize>
where
    I: Iterator<Item = &'a str>,
{
    let mut index = HashMap::new();
    for (position, name) in names.enumerate() {
        index.entry(name.to_string()).or_insert(position);
    }
    index
}

impl CatalogIndex {
    fn build(data: &CatalogData) -> Self {
        let mut items: HashMap<ItemPosition, HashMap<String, usize>> = HashMap::new();
        for (position, item) in data.items.iter().enumerate() {
            items
                .entry(item.position)
                .or_default()
                .entry(item.name.clone())
                .or_insert(position);
        }
        Self {
            items,
            shovels: index_by_name(data.shovels.iter().map(|d| d.name.as_str())),
            pans: index_by_name(data.pans.iter().map(|d| d.name.as_str())),
            enchants: index_by_name(data.enchants.iter().map(|d| d.name.as_str())),
            potions: index_by_name(data.potions.iter().map(|d| d.name.as_str())),
            events: index_by_name(data.events.iter().map(|d| d.name.as_str())),
            ores: index_by_name(data.ores.iter().map(|d| d.name.as_str())),
            modifiers: index_by_name(data.modifiers.iter().map(|d| d.name.as_str())),
        }
    }
}

/// Immutable, indexed catalog. Duplicate names resolve to the first entry.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    data: CatalogData,
    index: CatalogIndex,
}

impl Catalog {
    #[must_use]
    pub fn new(data: CatalogData) -> Self {
        let index = CatalogIndex::build(&data);
        Self { data, index }
    }

    /// Create an empty catalog (useful for tests)
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load a catalog from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into catalog data.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let data: CatalogData = serde_json::from_str(json)?;
        Ok(Self::new(data))
    }

    /// Load the bundled sample catalog.
    #[must_use]
    pub fn load_from_static() -> Self {
        Self::from_json(DEFAULT_CATALOG_DATA).unwrap_or_default()
    }

    #[must_use]
    pub const fn data(&self) -> &CatalogData {
        &self.data
    }

    #[must_use]
    pub fn items(&self) -> &[ItemDef] {
        &self.data.items
    }

    pub fn items_at(&self, position: ItemPosition) -> impl Iterator<Item = &ItemDef> + '_ {
        self.data
            .items
            .iter()
            .filter(move |item| item.position == position)
    }

    #[must_use]
    pub fn shovels(&self) -> &[ShovelDef] {
        &self.data.shovels
    }

    #[must_use]
    pub fn pans(&self) -> &[PanDef] {
        &self.data.pans
    }

    #[must_use]
    pub fn enchants(&self) -> &[EnchantDef] {
        &self.data.enchants
    }

    #[must_use]
    pub fn ores(&self) -> &[OreDef] {
        &self.data.ores
    }

    #[must_use]
    pub fn modifiers(&self) -> &[ModifierDef] {
        &self.data.modifiers
    }

    #[must_use]
    pub fn find_item(&self, reference: &ItemReference) -> Option<&ItemDef> {
        self.index
            .items
            .get(&reference.position)
            .and_then(|by_name| by_name.get(reference.name.as_str()))
            .and_then(|idx| self.data.items.get(*idx))
    }

    #[must_use]
    pub fn find_shovel(&self, name: &str) -> Option<&ShovelDef> {
        self.index.shovels.get(name).and_then(|idx| self.data.shovels.get(*idx))
    }

    #[must_use]
    pub fn find_pan(&self, name: &str) -> Option<&PanDef> {
        self.index.pans.get(name).and_then(|idx| self.data.pans.get(*idx))
    }

    #[must_use]
    pub fn find_enchant(&self, name: &str) -> Option<&EnchantDef> {
        self.index.enchants.get(name).and_then(|idx| self.data.enchants.get(*idx))
    }

    #[must_use]
    pub fn find_potion(&self, name: &str) -> Option<&PotionDef> {
        self.index.potions.get(name).and_then(|idx| self.data.potions.get(*idx))
    }

    #[must_use]
    pub fn find_event(&self, name: &str) -> Option<&EventDef> {
        self.index.events.get(name).and_then(|idx| self.data.events.get(*idx))
    }

    #[must_use]
    pub fn find_ore(&self, name: &str) -> Option<&OreDef> {
        self.index.ores.get(name).and_then(|idx| self.data.ores.get(*idx))
    }

    #[must_use]
    pub fn find_modifier(&self, name: &str) -> Option<&ModifierDef> {
        self.index.modifiers.get(name).and_then(|idx| self.data.modifiers.get(*idx))
    }
}

/// Process-wide bundled catalog, parsed on first use.
#[must_use]
pub fn catalog() -> &'static Catalog {
    static CATALOG: OnceLock<Catalog> = OnceLock::new();
    CATALOG.get_or_init(Catalog::load_from_static)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ranges_pairs_and_fixed_values() {
        let json = r#"{
            "items": [
                {
                    "name": "Ruby Ring",
                    "position": "ring",
                    "rarity": "Epic",
                    "stats": { "luck": [2, 6], "capacity": 4 },
                    "enhancedStats": { "luck": { "min": 3, "max": 9 } }
                }
            ]
        }"#;
        let catalog = Catalog::from_json(json).unwrap();
        let ring = catalog
            .find_item(&ItemReference::new("Ruby Ring", ItemPosition::Ring))
            .unwrap();
        assert_eq!(ring.rarity, Some(Rarity::Epic));
        assert!((ring.stats["luck"].max - 6.0).abs() < f64::EPSILON);
        assert!((ring.stats["capacity"].min - 4.0).abs() < f64::EPSILON);
        assert!((ring.stats_for_tier(true)["luck"].max - 9.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_rarity_is_tolerated() {
        let json = r#"{ "ores": [ { "name": "Oddity", "rarity": "Celestial", "effect": "Luck" } ] }"#;
        let catalog = Catalog::from_json(json).unwrap();
        let ore = catalog.find_ore("Oddity").unwrap();
        assert_eq!(ore.rarity, None);
        assert!((rarity_bonus(ore.rarity) - UNKNOWN_RARITY_BONUS).abs() < f64::EPSILON);
    }

    #[test]
    fn item_lookup_is_keyed_by_position() {
        let json = r#"{
            "items": [
                { "name": "Twin", "position": "ring", "stats": { "luck": [1, 1] } },
                { "name": "Twin", "position": "charm", "stats": { "luck": [5, 5] } }
            ]
        }"#;
        let catalog = Catalog::from_json(json).unwrap();
        let charm = catalog
            .find_item(&ItemReference::new("Twin", ItemPosition::Charm))
            .unwrap();
        assert!((charm.stats["luck"].max - 5.0).abs() < f64::EPSILON);
        assert!(
            catalog
                .find_item(&ItemReference::new("Twin", ItemPosition::Necklace))
                .is_none()
        );
    }

    #[test]
    fn duplicate_names_resolve_to_first_entry() {
        let json = r#"{ "shovels": [
            { "name": "Dup", "digStrength": 1 },
            { "name": "Dup", "digStrength": 9 }
        ] }"#;
        let catalog = Catalog::from_json(json).unwrap();
        assert!((catalog.find_shovel("Dup").unwrap().dig_strength - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            Catalog::from_json("{ not json"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn bundled_catalog_loads() {
        let catalog = catalog();
        assert!(!catalog.items().is_empty());
        assert!(!catalog.ores().is_empty());
        assert!(catalog.items_at(ItemPosition::Ring).count() > 3);
    }

    #[test]
    fn rarity_constants_match_tiers() {
        assert!((Rarity::Common.museum_bonus() - 0.005).abs() < f64::EPSILON);
        assert!((Rarity::Exotic.museum_bonus() - 0.08).abs() < f64::EPSILON);
        let total: usize = Rarity::ALL.into_iter().map(Rarity::museum_slots).sum();
        assert_eq!(total, 18);
        assert!(Rarity::Common < Rarity::Exotic);
    }
}
