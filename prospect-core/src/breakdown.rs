//! Display-oriented views of the stat pipeline.

use serde::{Deserialize, Serialize};

use crate::aggregate::calculate_base_stats;
use crate::catalog::Catalog;
use crate::efficiency::{EfficiencyConstants, efficiency_of};
use crate::events::{apply_event_multipliers, separate_event_multipliers};
use crate::loadout::EquipmentLoadout;
use crate::museum::{MuseumSlot, calculate_museum_bonuses};
use crate::stats::{AdditiveStats, MultiplierDeltas, StatKey};

/// Every stage of the pipeline for one plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatBreakdown {
    pub base: AdditiveStats,
    pub museum_bonuses: MultiplierDeltas,
    pub with_museum: AdditiveStats,
    pub with_events: AdditiveStats,
    /// Efficiency of `with_events`.
    pub efficiency: f64,
}

/// Breakdown with the default efficiency constants.
#[must_use]
pub fn compute_stat_breakdown(
    catalog: &Catalog,
    loadout: &EquipmentLoadout,
    museum: &[MuseumSlot],
) -> StatBreakdown {
    compute_stat_breakdown_with(catalog, loadout, museum, &EfficiencyConstants::default())
}

#[must_use]
pub fn compute_stat_breakdown_with(
    catalog: &Catalog,
    loadout: &EquipmentLoadout,
    museum: &[MuseumSlot],
    constants: &EfficiencyConstants,
) -> StatBreakdown {
    let base = calculate_base_stats(catalog, loadout);
    let museum_bonuses = calculate_museum_bonuses(catalog, museum);
    let events = separate_event_multipliers(catalog, &loadout.events);
    let staged = apply_event_multipliers(&base, &museum_bonuses, &events.pre, &events.post);
    let efficiency = efficiency_of(&staged.event_stats, constants);
    StatBreakdown {
        base,
        museum_bonuses,
        with_museum: staged.final_stats,
        with_events: staged.event_stats,
        efficiency,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatDelta {
    pub stat: StatKey,
    pub current: f64,
    pub proposed: f64,
}

impl StatDelta {
    #[must_use]
    pub fn change(&self) -> f64 {
        self.proposed - self.current
    }

    /// Relative change in percent; `None` when the current value is zero.
    #[must_use]
    pub fn percent_change(&self) -> Option<f64> {
        (self.current.abs() > f64::EPSILON).then(|| self.change() / self.current.abs() * 100.0)
    }
}

/// Side-by-side comparison of the current and a proposed plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadoutComparison {
    pub current: StatBreakdown,
    pub proposed: StatBreakdown,
    pub deltas: Vec<StatDelta>,
    pub efficiency_delta: f64,
}

impl LoadoutComparison {
    /// Stats whose post-event value differs.
    pub fn changed(&self) -> impl Iterator<Item = &StatDelta> + '_ {
        self.deltas
            .iter()
            .filter(|delta| delta.change().abs() > f64::EPSILON)
    }

    #[must_use]
    pub fn is_improvement(&self) -> bool {
        self.efficiency_delta > 0.0
    }
}

/// Compare two post-event breakdowns stat by stat.
#[must_use]
pub fn compare_breakdowns(current: StatBreakdown, proposed: StatBreakdown) -> LoadoutComparison {
    let deltas = StatKey::ALL
        .into_iter()
        .map(|stat| StatDelta {
            stat,
            current: current.with_events.get(stat),
            proposed: proposed.with_events.get(stat),
        })
        .collect();
    let efficiency_delta = proposed.efficiency - current.efficiency;
    LoadoutComparison {
        current,
        proposed,
        deltas,
        efficiency_delta,
    }
}

/// Compare the current plan against a proposed loadout and museum.
#[must_use]
pub fn compare_plans(
    catalog: &Catalog,
    constants: &EfficiencyConstants,
    current: (&EquipmentLoadout, &[MuseumSlot]),
    proposed: (&EquipmentLoadout, &[MuseumSlot]),
) -> LoadoutComparison {
    compare_breakdowns(
        compute_stat_breakdown_with(catalog, current.0, current.1, constants),
        compute_stat_breakdown_with(catalog, proposed.0, proposed.1, constants),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Rarity;
    use crate::museum::{SlotId, empty_museum};

    fn fixture() -> Catalog {
        Catalog::from_json(
            r#"{
                "pans": [
                    { "name": "Plastic Pan", "luck": 10, "capacity": 20, "shakeStrength": 2, "shakeSpeed": 100 },
                    { "name": "Golden Pan", "luck": 20, "capacity": 20, "shakeStrength": 2, "shakeSpeed": 100 }
                ],
                "shovels": [ { "name": "Rusty Shovel", "digStrength": 2, "digSpeed": 100 } ],
                "events": [
                    { "name": "Luck Totem", "multipliers": { "luck": 1.5 } },
                    { "name": "Meteor Shower", "multipliers": { "luck": 2.0 } }
                ],
                "ores": [ { "name": "Pyrite", "rarity": "Common", "effect": "Luck", "maxMultiplier": 0.1 } ]
            }"#,
        )
        .unwrap()
    }

    fn loadout(pan: &str) -> EquipmentLoadout {
        let mut loadout = EquipmentLoadout::new();
        loadout.pan = Some(pan.to_string());
        loadout.shovel = Some("Rusty Shovel".to_string());
        loadout
    }

    fn museum_with_pyrite() -> Vec<MuseumSlot> {
        let mut museum = empty_museum();
        for slot in &mut museum {
            if slot.id == (SlotId { rarity: Rarity::Common, index: 0 }) {
                slot.ore = Some("Pyrite".to_string());
            }
        }
        museum
    }

    #[test]
    fn breakdown_tracks_each_stage() {
        let mut plan = loadout("Plastic Pan");
        plan.events = vec!["Luck Totem".to_string(), "Meteor Shower".to_string()];
        let breakdown = compute_stat_breakdown(&fixture(), &plan, &museum_with_pyrite());

        assert!((breakdown.base.get(StatKey::Luck) - 10.0).abs() < 1e-9);
        assert!((breakdown.museum_bonuses.get(StatKey::Luck) - 0.1).abs() < 1e-9);
        // 10 * 1.5 + 10 * 0.1
        assert!((breakdown.with_museum.get(StatKey::Luck) - 16.0).abs() < 1e-9);
        assert!((breakdown.with_events.get(StatKey::Luck) - 32.0).abs() < 1e-9);
        assert!(breakdown.efficiency > 0.0);
    }

    #[test]
    fn comparison_reports_deltas() {
        let catalog = fixture();
        let museum = empty_museum();
        let comparison = compare_plans(
            &catalog,
            &EfficiencyConstants::default(),
            (&loadout("Plastic Pan"), &museum),
            (&loadout("Golden Pan"), &museum),
        );
        let changed: Vec<_> = comparison.changed().collect();
        assert_eq!(changed.len(), 1);
        assert_eq!(changed[0].stat, StatKey::Luck);
        assert!((changed[0].change() - 10.0).abs() < 1e-9);
        assert_eq!(changed[0].percent_change().map(f64::round), Some(100.0));
        assert!(comparison.is_improvement());
        assert_eq!(comparison.deltas.len(), StatKey::COUNT);
    }

    #[test]
    fn percent_change_is_undefined_from_zero() {
        let delta = StatDelta {
            stat: StatKey::SizeBoost,
            current: 0.0,
            proposed: 5.0,
        };
        assert_eq!(delta.percent_change(), None);
    }
}
