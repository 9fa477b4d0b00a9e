//! Museum display slots and the multiplier deltas they grant.
use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};
use std::collections::HashSet;
use std::fmt;

use crate::catalog::{Catalog, OreDef, Rarity, rarity_bonus};
use crate::stats::{MultiplierDeltas, StatKey};

/// Effect description labels in match order; multi-word labels come first
/// so "dig speed" is never read as a bare "speed".
const EFFECT_LABELS: &[(&str, StatKey)] = &[
    ("dig strength", StatKey::DigStrength),
    ("dig speed", StatKey::DigSpeed),
    ("shake strength", StatKey::ShakeStrength),
    ("shake speed", StatKey::ShakeSpeed),
    ("sell boost", StatKey::SellBoost),
    ("size boost", StatKey::SizeBoost),
    ("modifier boost", StatKey::ModifierBoost),
    ("walk speed", StatKey::WalkSpeed),
    ("luck", StatKey::Luck),
    ("capacity", StatKey::Capacity),
    ("toughness", StatKey::Toughness),
    ("sell", StatKey::SellBoost),
    ("size", StatKey::SizeBoost),
    ("modifier", StatKey::ModifierBoost),
];

/// Stat named by a natural-language effect description.
#[must_use]
pub fn effect_stat(description: &str) -> Option<StatKey> {
    let lowered = description.to_lowercase();
    EFFECT_LABELS
        .iter()
        .find(|(label, _)| lowered.contains(label))
        .map(|(_, key)| *key)
}

/// Stat(s) a museum modifier boosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifierCategory {
    Single(StatKey),
    DigAndShakeSpeed,
    LuckAndCapacity,
    DoubleLuck,
}

impl ModifierCategory {
    /// Parse an effect category such as "Luck", "Dig and Shake Speed" or "2x Luck".
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let lowered = text.trim().to_lowercase();
        match lowered.as_str() {
            "2x luck" | "double luck" => Some(Self::DoubleLuck),
            "dig and shake speed" => Some(Self::DigAndShakeSpeed),
            "luck and capacity" => Some(Self::LuckAndCapacity),
            other => other.parse::<StatKey>().ok().map(Self::Single),
        }
    }

    /// Stats receiving the rarity bonus, once per entry.
    #[must_use]
    pub fn targets(self) -> SmallVec<[StatKey; 2]> {
        match self {
            Self::Single(key) => smallvec![key],
            Self::DigAndShakeSpeed => smallvec![StatKey::DigSpeed, StatKey::ShakeSpeed],
            Self::LuckAndCapacity => smallvec![StatKey::Luck, StatKey::Capacity],
            Self::DoubleLuck => smallvec![StatKey::Luck, StatKey::Luck],
        }
    }
}

/// Category of a modifier name: the catalog entry's effect when known,
/// otherwise the name itself read as a category.
#[must_use]
pub fn modifier_category(catalog: &Catalog, name: &str) -> Option<ModifierCategory> {
    catalog
        .find_modifier(name)
        .and_then(|modifier| ModifierCategory::parse(&modifier.effect))
        .or_else(|| ModifierCategory::parse(name))
}

/// Slot identifier: rarity tier plus index within the tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlotId {
    pub rarity: Rarity,
    pub index: u8,
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.rarity.as_str().to_lowercase(), self.index)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MuseumSlot {
    pub id: SlotId,
    #[serde(default)]
    pub ore: Option<String>,
    #[serde(default)]
    pub modifier: Option<String>,
    /// Ore weight as displayed by the host; bonuses use the ore's maximum.
    #[serde(default)]
    pub weight: Option<f64>,
}

impl MuseumSlot {
    #[must_use]
    pub const fn empty(id: SlotId) -> Self {
        Self {
            id,
            ore: None,
            modifier: None,
            weight: None,
        }
    }

    #[must_use]
    pub const fn is_occupied(&self) -> bool {
        self.ore.is_some()
    }
}

/// Tiers in display order with their slot counts.
pub const MUSEUM_TIERS: [Rarity; 7] = [
    Rarity::Exotic,
    Rarity::Mythic,
    Rarity::Legendary,
    Rarity::Epic,
    Rarity::Rare,
    Rarity::Uncommon,
    Rarity::Common,
];

/// Every museum slot, empty, in display order.
#[must_use]
pub fn empty_museum() -> Vec<MuseumSlot> {
    MUSEUM_TIERS
        .into_iter()
        .flat_map(|rarity| {
            (0..rarity.museum_slots()).map(move |index| {
                MuseumSlot::empty(SlotId {
                    rarity,
                    index: u8::try_from(index).unwrap_or(u8::MAX),
                })
            })
        })
        .collect()
}

/// Clear later slots that repeat an ore already on display.
#[must_use]
pub fn sanitize_museum(slots: &[MuseumSlot]) -> Vec<MuseumSlot> {
    let mut seen: HashSet<&str> = HashSet::new();
    slots
        .iter()
        .map(|slot| match slot.ore.as_deref() {
            Some(ore) if !seen.insert(ore) => MuseumSlot::empty(slot.id),
            _ => slot.clone(),
        })
        .collect()
}

fn add_ore_effect(bonuses: &mut MultiplierDeltas, ore: &OreDef, has_modifier: bool) {
    if ore.has_special_effects() {
        for (stat, value) in &ore.special_effects {
            bonuses.add_named(stat, *value);
            if has_modifier {
                bonuses.add_named(stat, rarity_bonus(ore.rarity));
            }
        }
    } else if let Some(key) = effect_stat(&ore.effect) {
        bonuses.add(key, ore.max_multiplier);
    }
}

/// Multiplier deltas granted by the occupied museum slots.
///
/// An ore with special effects and a modifier receives the modifier's
/// rarity bonus twice: once on each special-effect stat and once on the
/// modifier's own targets.
#[must_use]
pub fn calculate_museum_bonuses(catalog: &Catalog, slots: &[MuseumSlot]) -> MultiplierDeltas {
    let mut bonuses = MultiplierDeltas::new();
    for slot in slots {
        let Some(ore) = slot.ore.as_deref().and_then(|name| catalog.find_ore(name)) else {
            continue;
        };
        add_ore_effect(&mut bonuses, ore, slot.modifier.is_some());

        let Some(category) = slot
            .modifier
            .as_deref()
            .and_then(|name| modifier_category(catalog, name))
        else {
            continue;
        };
        let bonus = rarity_bonus(ore.rarity);
        for key in category.targets() {
            bonuses.add(key, bonus);
        }
    }
    bonuses
}
