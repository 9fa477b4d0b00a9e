//! Equipment loadout to additive base stats.
//!
//! Contributions are summed in a fixed order (shovel, pan, pan passive,
//! enchant, custom entries, potions, jewelry) so results are reproducible
//! bit for bit. Unknown names contribute nothing.

use regex::Regex;
use std::sync::OnceLock;

use crate::catalog::{Catalog, PanDef, PassiveEffects, StatRanges};
use crate::loadout::{EquipmentLoadout, EquippedItem};
use crate::stats::{AdditiveStats, StatKey};

fn passive_percent_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            // "(+15%)" or "(+15)%"
            Regex::new(r"\(\s*([+-]?\d+)\s*(?:%\s*\)|\)\s*%)").ok()
        })
        .as_ref()
}

/// Stat named by the words around a passive percentage.
fn passive_target(context: &str) -> Option<StatKey> {
    let lowered = context.to_ascii_lowercase();
    let size = lowered.rfind("size");
    let modifier = lowered.rfind("modifier");
    match (size, modifier) {
        (Some(s), Some(m)) if m > s => Some(StatKey::ModifierBoost),
        (Some(_), _) => Some(StatKey::SizeBoost),
        (None, Some(_)) => Some(StatKey::ModifierBoost),
        (None, None) => None,
    }
}

/// Extract `sizeBoost` / `modifierBoost` percentages from free-text passives.
///
/// Each signed integer in parentheses before a `%` is attributed to a stat
/// label in the text between it and its neighbouring matches. When the
/// text opens with a label, labels precede their numbers; otherwise each
/// number takes the label that follows it. Text without a match yields
/// nothing.
#[must_use]
pub fn parse_passive_text(passive: &str) -> PassiveEffects {
    let mut effects = PassiveEffects::default();
    let Some(pattern) = passive_percent_pattern() else {
        return effects;
    };
    let matches: Vec<(usize, usize, f64)> = pattern
        .captures_iter(passive)
        .filter_map(|capture| {
            let whole = capture.get(0)?;
            let value = capture.get(1)?.as_str().parse::<f64>().ok()?;
            Some((whole.start(), whole.end(), value))
        })
        .collect();
    let labels_lead = matches
        .first()
        .is_some_and(|&(start, _, _)| passive_target(&passive[..start]).is_some());

    let mut previous_end = 0;
    for (position, &(start, end, value)) in matches.iter().enumerate() {
        let next_start = matches
            .get(position + 1)
            .map_or(passive.len(), |&(next, _, _)| next);
        let before = &passive[previous_end..start];
        let after = &passive[end..next_start];
        previous_end = end;

        let (primary, secondary) = if labels_lead {
            (before, after)
        } else {
            (after, before)
        };
        match passive_target(primary).or_else(|| passive_target(secondary)) {
            Some(StatKey::SizeBoost) => {
                effects.size_boost = Some(effects.size_boost.unwrap_or(0.0) + value);
            }
            Some(StatKey::ModifierBoost) => {
                effects.modifier_boost = Some(effects.modifier_boost.unwrap_or(0.0) + value);
            }
            _ => {}
        }
    }
    effects
}

/// Passive bonuses of a pan; structured fields win over free text.
#[must_use]
pub fn pan_passive_effects(pan: &PanDef) -> PassiveEffects {
    if let Some(effects) = pan.passive_effects {
        return effects;
    }
    pan.passive
        .as_deref()
        .map(parse_passive_text)
        .unwrap_or_default()
}

fn add_max_of_ranges(stats: &mut AdditiveStats, ranges: &StatRanges) {
    for (name, range) in ranges {
        stats.add_named(name, range.max);
    }
}

fn add_jewelry(stats: &mut AdditiveStats, catalog: &Catalog, slot: &EquippedItem) {
    if let Some(item) = catalog.find_item(&slot.item) {
        add_max_of_ranges(stats, item.stats_for_tier(slot.enhanced));
    }
}

/// Sum every equipped contribution into one additive stat table.
#[must_use]
pub fn calculate_base_stats(catalog: &Catalog, loadout: &EquipmentLoadout) -> AdditiveStats {
    let mut stats = AdditiveStats::new();

    if let Some(shovel) = loadout.shovel.as_deref().and_then(|name| catalog.find_shovel(name)) {
        stats.add(StatKey::DigStrength, shovel.dig_strength);
        stats.add(StatKey::DigSpeed, shovel.dig_speed);
        stats.add(StatKey::Toughness, shovel.toughness);
    }

    if let Some(pan) = loadout.pan.as_deref().and_then(|name| catalog.find_pan(name)) {
        stats.add(StatKey::Luck, pan.luck);
        stats.add(StatKey::Capacity, pan.capacity);
        stats.add(StatKey::ShakeStrength, pan.shake_strength);
        stats.add(StatKey::ShakeSpeed, pan.shake_speed);
        let passive = pan_passive_effects(pan);
        stats.add(StatKey::SizeBoost, passive.size_boost.unwrap_or(0.0));
        stats.add(StatKey::ModifierBoost, passive.modifier_boost.unwrap_or(0.0));
    }

    // Enchants sit on the pan.
    if loadout.pan.is_some()
        && let Some(enchant) = loadout.enchant.as_deref().and_then(|name| catalog.find_enchant(name))
    {
        for (name, value) in &enchant.effects {
            stats.add_named(name, *value);
        }
    }

    for (name, value) in &loadout.custom_stats {
        stats.add_named(name, *value);
    }

    for potion in loadout.potions.iter().filter_map(|name| catalog.find_potion(name)) {
        for (name, value) in &potion.effects {
            stats.add_named(name, *value);
        }
    }

    for slot in loadout.jewelry() {
        add_jewelry(&mut stats, catalog, slot);
    }

    stats
}
