//! Pruned candidate generation.
//!
//! Each slot gets a short ranked list of options; the search space is their
//! Cartesian product, enumerated lazily. Rings are the exception: free ring
//! slots are only tried as "all the same ring" or "two rings alternating",
//! which keeps the space small at the cost of any optimality guarantee.

use std::collections::HashSet;

use crate::aggregate::pan_passive_effects;
use crate::catalog::{Catalog, ItemDef, PanDef, Rarity, ShovelDef, StatRanges};
use crate::loadout::{EquipmentLoadout, EquippedItem, ItemPosition, RING_SLOTS};
use crate::stats::StatKey;

use super::config::OptimizerConfig;
use super::constraints::OptimizationConstraints;

pub type RingSet = [Option<EquippedItem>; RING_SLOTS];

/// Heuristic weight of one point of a stat when ranking candidates.
#[must_use]
pub fn potential_weight(stat: &str) -> f64 {
    match stat.parse::<StatKey>() {
        Ok(StatKey::Luck) => 2.0,
        Ok(StatKey::Capacity) => 0.5,
        Ok(StatKey::DigSpeed | StatKey::ShakeSpeed) => 0.3,
        Ok(StatKey::DigStrength | StatKey::ShakeStrength) => 0.2,
        Ok(StatKey::ModifierBoost) => 0.15,
        Ok(StatKey::SizeBoost) => 0.1,
        _ => 0.05,
    }
}

fn weighted(key: StatKey, value: f64) -> f64 {
    value * potential_weight(key.as_str())
}

/// Potential of a jewelry stat table, using each range's maximum.
#[must_use]
pub fn potential_score(ranges: &StatRanges) -> f64 {
    ranges
        .iter()
        .map(|(stat, range)| range.max * potential_weight(stat))
        .sum()
}

fn shovel_potential(shovel: &ShovelDef) -> f64 {
    weighted(StatKey::DigStrength, shovel.dig_strength)
        + weighted(StatKey::DigSpeed, shovel.dig_speed)
        + weighted(StatKey::Toughness, shovel.toughness)
}

fn pan_potential(pan: &PanDef) -> f64 {
    let passive = pan_passive_effects(pan);
    weighted(StatKey::Luck, pan.luck)
        + weighted(StatKey::Capacity, pan.capacity)
        + weighted(StatKey::ShakeStrength, pan.shake_strength)
        + weighted(StatKey::ShakeSpeed, pan.shake_speed)
        + weighted(StatKey::SizeBoost, passive.size_boost.unwrap_or(0.0))
        + weighted(StatKey::ModifierBoost, passive.modifier_boost.unwrap_or(0.0))
}

/// Highest scores first; equal scores keep input order.
fn top_by_score<T>(mut scored: Vec<(f64, T)>, count: usize) -> Vec<T> {
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored.into_iter().take(count).map(|(_, item)| item).collect()
}

fn ranked_jewelry(
    catalog: &Catalog,
    position: ItemPosition,
    constraints: &OptimizationConstraints,
    count: usize,
) -> Vec<EquippedItem> {
    let mut seen: HashSet<&str> = HashSet::new();
    let scored: Vec<(f64, &ItemDef)> = catalog
        .items_at(position)
        .filter(|item| constraints.allows(item.rarity))
        .filter(|item| seen.insert(item.name.as_str()))
        .map(|item| {
            let score = potential_score(item.stats_for_tier(constraints.prefer_enhanced));
            (score, item)
        })
        .collect();
    top_by_score(scored, count)
        .into_iter()
        .map(|item| EquippedItem {
            item: item.reference(),
            enhanced: constraints.prefer_enhanced && item.has_enhanced_tier(),
        })
        .collect()
}

fn ranked_named<'a, T, R, S>(
    entries: &'a [T],
    name: impl Fn(&'a T) -> &'a str,
    rarity: R,
    score: S,
    constraints: &OptimizationConstraints,
    count: usize,
) -> Vec<String>
where
    R: Fn(&T) -> Option<Rarity>,
    S: Fn(&T) -> f64,
{
    let mut seen: HashSet<&str> = HashSet::new();
    let scored: Vec<(f64, &str)> = entries
        .iter()
        .filter(|entry| constraints.allows(rarity(*entry)))
        .map(|entry| (score(entry), name(entry)))
        .filter(|(_, entry_name)| seen.insert(*entry_name))
        .collect();
    top_by_score(scored, count)
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn ring_set_count(rings: &RingSet) -> usize {
    rings.iter().filter(|ring| ring.is_some()).count()
}

/// Ring arrangements to try.
///
/// Locked slots are fixed. Free slots, up to `max_rings` in total, are
/// filled with one top ring repeated or two of the top rings alternating.
#[must_use]
pub fn ring_combinations(
    catalog: &Catalog,
    constraints: &OptimizationConstraints,
    current: &RingSet,
    config: &OptimizerConfig,
) -> Vec<RingSet> {
    let mut locked = constraints.locked_rings.clone();
    if !constraints.include_rings {
        for (slot, current_ring) in locked.iter_mut().zip(current) {
            if slot.is_none() {
                slot.clone_from(current_ring);
            }
        }
        return vec![locked];
    }

    let ranked = ranked_jewelry(catalog, ItemPosition::Ring, constraints, config.ring_candidates);
    let fill = constraints
        .max_rings
        .saturating_sub(constraints.locked_ring_count());
    let free: Vec<usize> = (0..RING_SLOTS)
        .filter(|&index| locked[index].is_none())
        .take(fill)
        .collect();

    let fill_with = |pattern: &[&EquippedItem]| {
        let mut rings = locked.clone();
        for (position, &index) in free.iter().enumerate() {
            rings[index] = Some(pattern[position % pattern.len()].clone());
        }
        rings
    };

    let mut combos: Vec<RingSet> = Vec::new();
    let mut push = |rings: RingSet| {
        if ring_set_count(&rings) >= constraints.min_rings && !combos.contains(&rings) {
            combos.push(rings);
        }
    };

    for ring in &ranked {
        push(fill_with(&[ring]));
    }
    let pool = &ranked[..ranked.len().min(config.alternating_pool)];
    for (i, first) in pool.iter().enumerate() {
        for (j, second) in pool.iter().enumerate() {
            if i != j {
                push(fill_with(&[first, second]));
            }
        }
    }
    if ranked.is_empty() {
        push(locked.clone());
    }

    if combos.is_empty() {
        log::debug!("no ring arrangement satisfies min_rings; keeping locked rings only");
        combos.push(locked);
    }
    combos
}

fn jewelry_options(
    catalog: &Catalog,
    position: ItemPosition,
    locked: Option<&EquippedItem>,
    include: bool,
    current: Option<&EquippedItem>,
    constraints: &OptimizationConstraints,
    count: usize,
) -> Vec<Option<EquippedItem>> {
    if let Some(locked) = locked {
        return vec![Some(locked.clone())];
    }
    if !include {
        return vec![current.cloned()];
    }
    let ranked = ranked_jewelry(catalog, position, constraints, count);
    if ranked.is_empty() {
        return vec![current.cloned()];
    }
    ranked.into_iter().map(Some).collect()
}

fn named_options(include: bool, current: Option<&String>, ranked: Vec<String>) -> Vec<Option<String>> {
    if !include || ranked.is_empty() {
        return vec![current.cloned()];
    }
    ranked.into_iter().map(Some).collect()
}

fn enchant_shortlist(catalog: &Catalog, config: &OptimizerConfig) -> Vec<String> {
    let listed: Vec<String> = config
        .enchant_shortlist
        .iter()
        .filter(|name| catalog.find_enchant(name).is_some())
        .cloned()
        .collect();
    if !listed.is_empty() {
        return listed;
    }
    let scored: Vec<(f64, String)> = catalog
        .enchants()
        .iter()
        .map(|enchant| {
            let score: f64 = enchant
                .effects
                .iter()
                .map(|(stat, value)| value * potential_weight(stat))
                .sum();
            (score, enchant.name.clone())
        })
        .collect();
    top_by_score(scored, config.enchant_shortlist.len().max(1))
}

/// Lazily enumerated product of per-slot options.
///
/// Index decoding is mixed radix in the order rings, necklace, charm,
/// shovel, pan, enchant, with the enchant varying fastest.
#[derive(Debug, Clone)]
pub struct CandidateSpace {
    template: EquipmentLoadout,
    rings: Vec<RingSet>,
    necklaces: Vec<Option<EquippedItem>>,
    charms: Vec<Option<EquippedItem>>,
    shovels: Vec<Option<String>>,
    pans: Vec<Option<String>>,
    enchants: Vec<Option<String>>,
}

impl CandidateSpace {
    #[must_use]
    pub fn build(
        catalog: &Catalog,
        constraints: &OptimizationConstraints,
        current: &EquipmentLoadout,
        config: &OptimizerConfig,
    ) -> Self {
        let mut template = current.clone();
        if !constraints.preserve_potions {
            template.potions.clear();
        }
        if !constraints.preserve_events {
            template.events.clear();
        }

        let shovels = ranked_named(
            catalog.shovels(),
            |shovel| shovel.name.as_str(),
            |shovel| shovel.rarity,
            shovel_potential,
            constraints,
            config.shovel_candidates,
        );
        let pans = ranked_named(
            catalog.pans(),
            |pan| pan.name.as_str(),
            |pan| pan.rarity,
            pan_potential,
            constraints,
            config.pan_candidates,
        );

        let space = Self {
            rings: ring_combinations(catalog, constraints, &current.rings, config),
            necklaces: jewelry_options(
                catalog,
                ItemPosition::Necklace,
                constraints.locked_necklace.as_ref(),
                constraints.include_necklace,
                current.necklace.as_ref(),
                constraints,
                config.necklace_candidates,
            ),
            charms: jewelry_options(
                catalog,
                ItemPosition::Charm,
                constraints.locked_charm.as_ref(),
                constraints.include_charm,
                current.charm.as_ref(),
                constraints,
                config.charm_candidates,
            ),
            shovels: named_options(constraints.include_shovel, current.shovel.as_ref(), shovels),
            pans: named_options(constraints.include_pan, current.pan.as_ref(), pans),
            enchants: named_options(
                constraints.include_enchant,
                current.enchant.as_ref(),
                enchant_shortlist(catalog, config),
            ),
            template,
        };
        log::debug!(
            "candidate space: {} ring sets x {} necklaces x {} charms x {} shovels x {} pans x {} enchants",
            space.rings.len(),
            space.necklaces.len(),
            space.charms.len(),
            space.shovels.len(),
            space.pans.len(),
            space.enchants.len()
        );
        space
    }

    /// Loadout every candidate starts from.
    #[must_use]
    pub const fn template(&self) -> &EquipmentLoadout {
        &self.template
    }

    const fn radices(&self) -> [usize; 6] {
        [
            self.rings.len(),
            self.necklaces.len(),
            self.charms.len(),
            self.shovels.len(),
            self.pans.len(),
            self.enchants.len(),
        ]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.radices()
            .into_iter()
            .fold(1_usize, usize::saturating_mul)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Candidate at `index`, or `None` past the end.
    #[must_use]
    pub fn candidate(&self, index: usize) -> Option<EquipmentLoadout> {
        if index >= self.len() {
            return None;
        }
        let mut digits = [0_usize; 6];
        let mut rest = index;
        for (digit, radix) in digits.iter_mut().zip(self.radices()).rev() {
            *digit = rest % radix;
            rest /= radix;
        }
        let [ring, necklace, charm, shovel, pan, enchant] = digits;

        let mut loadout = self.template.clone();
        loadout.rings.clone_from(&self.rings[ring]);
        loadout.necklace.clone_from(&self.necklaces[necklace]);
        loadout.charm.clone_from(&self.charms[charm]);
        loadout.shovel.clone_from(&self.shovels[shovel]);
        loadout.pan.clone_from(&self.pans[pan]);
        loadout.enchant.clone_from(&self.enchants[enchant]);
        Some(loadout)
    }

    pub fn iter(&self) -> impl Iterator<Item = EquipmentLoadout> + '_ {
        (0..self.len()).filter_map(|index| self.candidate(index))
    }
}
