//! Greedy museum layout: best ores per tier, best modifier per ore.

use std::collections::HashSet;

use crate::catalog::{Catalog, OreDef, Rarity};
use crate::museum::{MUSEUM_TIERS, ModifierCategory, MuseumSlot, SlotId, effect_stat};
use crate::stats::{AdditiveStats, StatKey};

/// Base luck above which priorities shift toward capacity and speed.
pub const HIGH_LUCK_THRESHOLD: f64 = 500.0;

/// Which priority table applies to a set of base stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriorityProfile {
    Standard,
    HighLuck,
}

impl PriorityProfile {
    #[must_use]
    pub fn for_base_stats(base: &AdditiveStats) -> Self {
        if base.get(StatKey::Luck) > HIGH_LUCK_THRESHOLD {
            Self::HighLuck
        } else {
            Self::Standard
        }
    }

    /// Relative value of one unit of a stat bonus.
    #[must_use]
    pub const fn weight(self, key: StatKey) -> f64 {
        match (self, key) {
            (Self::Standard, StatKey::Luck) => 1.0,
            (Self::HighLuck, StatKey::Luck) => 0.7,
            (Self::Standard, StatKey::Capacity) => 0.6,
            (Self::HighLuck, StatKey::Capacity) => 0.9,
            (Self::Standard, StatKey::DigSpeed | StatKey::ShakeSpeed) => 0.5,
            (Self::HighLuck, StatKey::DigSpeed | StatKey::ShakeSpeed) => 0.8,
            (_, StatKey::DigStrength | StatKey::ShakeStrength) => 0.4,
            (_, StatKey::ModifierBoost) => 0.3,
            (_, StatKey::SizeBoost) => 0.2,
            (_, StatKey::SellBoost) => 0.1,
            (_, StatKey::Toughness | StatKey::WalkSpeed) => 0.05,
        }
    }

    fn weight_named(self, name: &str) -> f64 {
        name.parse::<StatKey>().map_or(0.0, |key| self.weight(key))
    }
}

/// Priority-weighted value of an ore's own effect.
#[must_use]
pub fn score_ore(ore: &OreDef, profile: PriorityProfile) -> f64 {
    if ore.has_special_effects() {
        ore.special_effects
            .iter()
            .map(|(stat, value)| value * profile.weight_named(stat) * 100.0)
            .sum()
    } else {
        effect_stat(&ore.effect).map_or(0.0, |key| {
            ore.max_multiplier * profile.weight(key) * 100.0
        })
    }
}

/// Priority-weighted value of a modifier category.
#[must_use]
pub fn score_modifier(category: ModifierCategory, profile: PriorityProfile) -> f64 {
    category
        .targets()
        .into_iter()
        .map(|key| profile.weight(key))
        .sum()
}

/// Highest scoring modifier in catalog order; ties keep the first seen.
#[must_use]
pub fn best_modifier(catalog: &Catalog, profile: PriorityProfile) -> Option<&str> {
    let mut best: Option<(&str, f64)> = None;
    for modifier in catalog.modifiers() {
        let Some(category) = ModifierCategory::parse(&modifier.effect)
            .or_else(|| ModifierCategory::parse(&modifier.name))
        else {
            continue;
        };
        let score = score_modifier(category, profile);
        if score > best.map_or(0.0, |(_, best_score)| best_score) {
            best = Some((modifier.name.as_str(), score));
        }
    }
    best.map(|(name, _)| name)
}

fn top_ores<'a>(
    catalog: &'a Catalog,
    rarity: Rarity,
    count: usize,
    used: &HashSet<&'a str>,
    profile: PriorityProfile,
) -> Vec<&'a OreDef> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut scored: Vec<(f64, &OreDef)> = catalog
        .ores()
        .iter()
        .filter(|ore| ore.rarity == Some(rarity))
        .filter(|ore| !used.contains(ore.name.as_str()) && seen.insert(ore.name.as_str()))
        .map(|ore| (score_ore(ore, profile), ore))
        .collect();
    // Stable: equal scores keep catalog order.
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored.into_iter().take(count).map(|(_, ore)| ore).collect()
}

/// Layout for an explicit priority profile.
#[must_use]
pub fn layout_for_profile(catalog: &Catalog, profile: PriorityProfile) -> Vec<MuseumSlot> {
    let modifier = best_modifier(catalog, profile).map(str::to_string);
    let mut used: HashSet<&str> = HashSet::new();
    let mut slots = Vec::new();

    for rarity in MUSEUM_TIERS {
        let slot_count = rarity.museum_slots();
        let chosen = top_ores(catalog, rarity, slot_count, &used, profile);
        for index in 0..slot_count {
            let id = SlotId {
                rarity,
                index: u8::try_from(index).unwrap_or(u8::MAX),
            };
            match chosen.get(index).copied() {
                Some(ore) => {
                    used.insert(ore.name.as_str());
                    slots.push(MuseumSlot {
                        id,
                        ore: Some(ore.name.clone()),
                        modifier: modifier.clone(),
                        weight: None,
                    });
                }
                None => slots.push(MuseumSlot::empty(id)),
            }
        }
    }
    log::debug!(
        "museum layout for {profile:?}: {} of {} slots filled, modifier {modifier:?}",
        used.len(),
        slots.len()
    );
    slots
}

/// Greedy layout maximising alignment with the stat priorities implied by
/// `base`. Tiers without enough ores leave trailing slots empty.
#[must_use]
pub fn optimize_museum_layout(catalog: &Catalog, base: &AdditiveStats) -> Vec<MuseumSlot> {
    layout_for_profile(catalog, PriorityProfile::for_base_stats(base))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> Catalog {
        Catalog::from_json(
            r#"{
                "ores": [
                    { "name": "Quartz", "rarity": "Common", "effect": "Dig Speed", "maxMultiplier": 0.05 },
                    { "name": "Pyrite", "rarity": "Common", "effect": "Luck", "maxMultiplier": 0.05 },
                    { "name": "Copper", "rarity": "Common", "effect": "Capacity", "maxMultiplier": 0.05 },
                    { "name": "Tin", "rarity": "Common", "effect": "Walk Speed", "maxMultiplier": 0.05 },
                    { "name": "Quartz", "rarity": "Common", "effect": "Luck", "maxMultiplier": 0.9 },
                    { "name": "Starshard", "rarity": "Exotic", "specialEffects": { "luck": 0.5 } },
                    { "name": "Ember", "rarity": "Mythic", "effect": "Luck", "maxMultiplier": 0.3 }
                ],
                "modifiers": [
                    { "name": "Swift", "effect": "Dig Speed" },
                    { "name": "Shiny", "effect": "Luck" },
                    { "name": "Lucky", "effect": "Luck" },
                    { "name": "Glowing", "effect": "Luck and Capacity" }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn picks_highest_scoring_ores_per_tier() {
        let layout = layout_for_profile(&fixture(), PriorityProfile::Standard);
        assert_eq!(layout.len(), 18);
        let common: Vec<_> = layout
            .iter()
            .filter(|slot| slot.id.rarity == Rarity::Common)
            .map(|slot| slot.ore.as_deref())
            .collect();
        assert_eq!(common, vec![Some("Pyrite"), Some("Copper"), Some("Quartz")]);
        assert_eq!(layout[0].ore.as_deref(), Some("Starshard"));
    }

    #[test]
    fn missing_ores_leave_slots_empty() {
        let layout = layout_for_profile(&fixture(), PriorityProfile::Standard);
        let mythic: Vec<_> = layout
            .iter()
            .filter(|slot| slot.id.rarity == Rarity::Mythic)
            .collect();
        assert_eq!(mythic.len(), 2);
        assert_eq!(mythic[0].ore.as_deref(), Some("Ember"));
        assert!(mythic[1].ore.is_none());
        assert!(mythic[1].modifier.is_none());
        assert!(
            layout
                .iter()
                .filter(|slot| slot.id.rarity == Rarity::Legendary)
                .all(|slot| !slot.is_occupied())
        );
    }

    #[test]
    fn ore_names_are_never_reused() {
        let layout = layout_for_profile(&fixture(), PriorityProfile::Standard);
        let mut seen = HashSet::new();
        for ore in layout.iter().filter_map(|slot| slot.ore.as_deref()) {
            assert!(seen.insert(ore), "duplicate ore {ore}");
        }
    }

    #[test]
    fn best_modifier_prefers_dual_targets_and_first_on_ties() {
        let catalog = fixture();
        assert_eq!(best_modifier(&catalog, PriorityProfile::Standard), Some("Glowing"));

        let ties = Catalog::from_json(
            r#"{ "modifiers": [
                { "name": "Shiny", "effect": "Luck" },
                { "name": "Lucky", "effect": "Luck" }
            ] }"#,
        )
        .unwrap();
        assert_eq!(best_modifier(&ties, PriorityProfile::Standard), Some("Shiny"));
        assert_eq!(best_modifier(&Catalog::empty(), PriorityProfile::Standard), None);
    }

    #[test]
    fn high_luck_shifts_priorities() {
        let mut base = AdditiveStats::new();
        base.add(StatKey::Luck, 400.0);
        assert_eq!(PriorityProfile::for_base_stats(&base), PriorityProfile::Standard);
        base.add(StatKey::Luck, 200.0);
        assert_eq!(PriorityProfile::for_base_stats(&base), PriorityProfile::HighLuck);

        let layout = optimize_museum_layout(&fixture(), &base);
        let common: Vec<_> = layout
            .iter()
            .filter(|slot| slot.id.rarity == Rarity::Common)
            .map(|slot| slot.ore.as_deref())
            .collect();
        assert_eq!(common, vec![Some("Copper"), Some("Quartz"), Some("Pyrite")]);
    }
}
