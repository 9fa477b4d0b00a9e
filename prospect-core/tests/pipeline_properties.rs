use prospect_core::catalog::Catalog;
use prospect_core::efficiency::{EfficiencyConstants, EfficiencyInputs, calculate_luck_efficiency};
use prospect_core::events::{apply_event_multipliers, separate_event_multipliers};
use prospect_core::museum::{MuseumSlot, SlotId, calculate_museum_bonuses, empty_museum};
use prospect_core::stats::{AdditiveStats, MultiplierDeltas, StatKey};
use prospect_core::{
    EquipmentLoadout, EquippedItem, ItemPosition, ItemReference, Rarity, calculate_base_stats,
    compute_stat_breakdown,
};

fn fixture() -> Catalog {
    Catalog::from_json(
        r#"{
            "items": [
                { "name": "Ruby Ring", "position": "ring", "rarity": "Epic", "stats": { "luck": [2, 6] } },
                { "name": "Plain Charm", "position": "charm", "rarity": "Common", "stats": { "capacity": [1, 3] } }
            ],
            "pans": [
                { "name": "Golden Pan", "rarity": "Epic", "luck": 7, "capacity": 55, "shakeStrength": 3, "shakeSpeed": 110,
                  "passive": "Size boost (+15%) and modifier chance (+5%)" }
            ],
            "enchants": [ { "name": "Prismatic", "effects": { "luck": 5 } } ],
            "events": [
                { "name": "Luck Totem", "multipliers": { "luck": 1.5 } },
                { "name": "Meteor Shower", "multipliers": { "luck": 2.0 } }
            ],
            "ores": [
                { "name": "Quartz", "rarity": "Common", "effect": "Dig Speed", "maxMultiplier": 0.05 },
                { "name": "Moonstone", "rarity": "Legendary", "specialEffects": { "luck": 0.15, "capacity": 0.1 } }
            ],
            "modifiers": [
                { "name": "Shiny", "effect": "Luck" },
                { "name": "Radiant", "effect": "2x Luck" }
            ]
        }"#,
    )
    .unwrap()
}

fn slot(rarity: Rarity, ore: &str, modifier: Option<&str>) -> MuseumSlot {
    MuseumSlot {
        id: SlotId { rarity, index: 0 },
        ore: Some(ore.to_string()),
        modifier: modifier.map(str::to_string),
        weight: None,
    }
}

fn approx(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn empty_loadout_has_zero_base_stats() {
    let stats = calculate_base_stats(&fixture(), &EquipmentLoadout::new());
    assert!(stats.is_zero());
}

#[test]
fn ring_adds_maximum_of_range() {
    let mut loadout = EquipmentLoadout::new();
    loadout.set_ring(
        0,
        Some(EquippedItem::base(ItemReference::new("Ruby Ring", ItemPosition::Ring))),
    );
    let stats = calculate_base_stats(&fixture(), &loadout);
    approx(stats.get(StatKey::Luck), 6.0);
}

#[test]
fn missing_enhanced_table_falls_back_to_base() {
    let mut loadout = EquipmentLoadout::new();
    loadout.charm = Some(EquippedItem::enhanced(ItemReference::new(
        "Plain Charm",
        ItemPosition::Charm,
    )));
    let stats = calculate_base_stats(&fixture(), &loadout);
    approx(stats.get(StatKey::Capacity), 3.0);
}

#[test]
fn pan_passive_text_and_enchant_are_aggregated() {
    let mut loadout = EquipmentLoadout::new();
    loadout.pan = Some("Golden Pan".to_string());
    loadout.enchant = Some("Prismatic".to_string());
    let stats = calculate_base_stats(&fixture(), &loadout);
    approx(stats.get(StatKey::Luck), 12.0);
    approx(stats.get(StatKey::SizeBoost), 15.0);
    approx(stats.get(StatKey::ModifierBoost), 5.0);

    loadout.pan = None;
    let without_pan = calculate_base_stats(&fixture(), &loadout);
    approx(without_pan.get(StatKey::Luck), 0.0);
}

#[test]
fn single_stat_ore_without_modifier() {
    let bonuses = calculate_museum_bonuses(&fixture(), &[slot(Rarity::Common, "Quartz", None)]);
    approx(bonuses.get(StatKey::DigSpeed), 0.05);
    for key in StatKey::ALL.into_iter().filter(|key| *key != StatKey::DigSpeed) {
        approx(bonuses.get(key), 0.0);
    }
}

#[test]
fn luck_modifier_adds_common_rarity_bonus() {
    let bonuses =
        calculate_museum_bonuses(&fixture(), &[slot(Rarity::Common, "Quartz", Some("Shiny"))]);
    approx(bonuses.get(StatKey::DigSpeed), 0.05);
    approx(bonuses.get(StatKey::Luck), 0.005);
}

#[test]
fn double_luck_modifier_adds_twice() {
    let bonuses =
        calculate_museum_bonuses(&fixture(), &[slot(Rarity::Common, "Quartz", Some("Radiant"))]);
    approx(bonuses.get(StatKey::Luck), 0.01);
}

#[test]
fn special_effect_ore_with_modifier_counts_bonus_twice() {
    let bonuses = calculate_museum_bonuses(
        &fixture(),
        &[slot(Rarity::Legendary, "Moonstone", Some("Shiny"))],
    );
    // 0.15 own + 0.03 on every special stat + 0.03 from the luck modifier.
    approx(bonuses.get(StatKey::Luck), 0.21);
    approx(bonuses.get(StatKey::Capacity), 0.13);
}

#[test]
fn empty_events_and_museum_leave_base_unchanged() {
    let mut base = AdditiveStats::new();
    base.add(StatKey::Luck, 42.0);
    base.add(StatKey::Capacity, 12.5);
    base.add_named("mystery", 3.0);
    let none = MultiplierDeltas::new();
    let staged = apply_event_multipliers(&base, &none, &none, &none);
    assert_eq!(staged.final_stats, base);
    assert_eq!(staged.event_stats, base);
}

#[test]
fn museum_applies_to_original_base_between_event_stages() {
    let catalog = fixture();
    let split = separate_event_multipliers(&catalog, &["Luck Totem", "Meteor Shower", "Unknown"]);
    approx(split.pre.get(StatKey::Luck), 0.5);
    approx(split.post.get(StatKey::Luck), 1.0);

    let mut base = AdditiveStats::new();
    base.add(StatKey::Luck, 10.0);
    let mut museum = MultiplierDeltas::new();
    museum.add(StatKey::Luck, 0.2);
    let staged = apply_event_multipliers(&base, &museum, &split.pre, &split.post);
    approx(staged.final_stats.get(StatKey::Luck), 17.0);
    approx(staged.event_stats.get(StatKey::Luck), 34.0);
}

#[test]
fn zero_inputs_give_finite_efficiency() {
    let score =
        calculate_luck_efficiency(&EfficiencyInputs::default(), &EfficiencyConstants::default());
    assert!(score.is_finite());
    assert!(score >= 0.0);
}

#[test]
fn breakdown_of_bundled_catalog_plan_is_finite() {
    let catalog = prospect_core::catalog();
    let mut loadout = EquipmentLoadout::new();
    loadout.pan = Some("Golden Pan".to_string());
    loadout.shovel = Some("Steel Shovel".to_string());
    loadout.events.push("Meteor Shower".to_string());
    let breakdown = compute_stat_breakdown(catalog, &loadout, &empty_museum());
    assert!(breakdown.efficiency.is_finite());
    assert!(breakdown.efficiency > 0.0);
    approx(
        breakdown.with_events.get(StatKey::Luck),
        2.0 * breakdown.base.get(StatKey::Luck),
    );
}
