//! Equipment loadouts and catalog references.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Number of ring slots on a character.
pub const RING_SLOTS: usize = 8;

/// Jewelry position; part of an item's catalog key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemPosition {
    Ring,
    Necklace,
    Charm,
}

impl fmt::Display for ItemPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Ring => "ring",
            Self::Necklace => "necklace",
            Self::Charm => "charm",
        };
        f.write_str(label)
    }
}

/// Stable key into the catalog. Loadouts never store item snapshots.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemReference {
    pub name: String,
    pub position: ItemPosition,
}

impl ItemReference {
    #[must_use]
    pub fn new(name: impl Into<String>, position: ItemPosition) -> Self {
        Self {
            name: name.into(),
            position,
        }
    }
}

/// A filled jewelry slot and its tier flag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EquippedItem {
    pub item: ItemReference,
    /// Use the enhanced stat table when the item has one.
    #[serde(default)]
    pub enhanced: bool,
}

impl EquippedItem {
    #[must_use]
    pub const fn base(item: ItemReference) -> Self {
        Self {
            item,
            enhanced: false,
        }
    }

    #[must_use]
    pub const fn enhanced(item: ItemReference) -> Self {
        Self {
            item,
            enhanced: true,
        }
    }
}

/// Everything a character has equipped or active.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentLoadout {
    #[serde(default)]
    pub rings: [Option<EquippedItem>; RING_SLOTS],
    #[serde(default)]
    pub necklace: Option<EquippedItem>,
    #[serde(default)]
    pub charm: Option<EquippedItem>,
    #[serde(default)]
    pub shovel: Option<String>,
    #[serde(default)]
    pub pan: Option<String>,
    #[serde(default)]
    pub enchant: Option<String>,
    #[serde(default)]
    pub custom_stats: BTreeMap<String, f64>,
    #[serde(default)]
    pub potions: Vec<String>,
    #[serde(default)]
    pub events: Vec<String>,
}

impl EquipmentLoadout {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ring in slot `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below [`RING_SLOTS`].
    #[must_use]
    pub fn ring(&self, index: usize) -> Option<&EquippedItem> {
        assert!(index < RING_SLOTS, "ring index {index} out of range");
        self.rings[index].as_ref()
    }

    /// Replace the ring in slot `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below [`RING_SLOTS`].
    pub fn set_ring(&mut self, index: usize, ring: Option<EquippedItem>) {
        assert!(index < RING_SLOTS, "ring index {index} out of range");
        self.rings[index] = ring;
    }

    #[must_use]
    pub fn ring_count(&self) -> usize {
        self.rings.iter().filter(|ring| ring.is_some()).count()
    }

    /// Equipped jewelry in aggregation order: rings, necklace, charm.
    pub fn jewelry(&self) -> impl Iterator<Item = &EquippedItem> + '_ {
        self.rings
            .iter()
            .chain(std::iter::once(&self.necklace))
            .chain(std::iter::once(&self.charm))
            .flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(name: &str) -> EquippedItem {
        EquippedItem::base(ItemReference::new(name, ItemPosition::Ring))
    }

    #[test]
    fn empty_loadout_has_eight_empty_ring_slots() {
        let loadout = EquipmentLoadout::new();
        assert_eq!(loadout.rings.len(), RING_SLOTS);
        assert_eq!(loadout.ring_count(), 0);
        assert_eq!(loadout.jewelry().count(), 0);
    }

    #[test]
    fn jewelry_iterates_rings_then_necklace_then_charm() {
        let mut loadout = EquipmentLoadout::new();
        loadout.set_ring(3, Some(ring("Opal Band")));
        loadout.charm = Some(EquippedItem::base(ItemReference::new(
            "Lucky Clover",
            ItemPosition::Charm,
        )));
        loadout.necklace = Some(EquippedItem::enhanced(ItemReference::new(
            "Gold Chain",
            ItemPosition::Necklace,
        )));
        let names: Vec<&str> = loadout.jewelry().map(|slot| slot.item.name.as_str()).collect();
        assert_eq!(names, vec!["Opal Band", "Gold Chain", "Lucky Clover"]);
        assert_eq!(loadout.ring(3).unwrap().item.name, "Opal Band");
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn ring_index_outside_slots_panics() {
        let mut loadout = EquipmentLoadout::new();
        loadout.set_ring(RING_SLOTS, Some(ring("Opal Band")));
    }

    #[test]
    fn loadout_round_trips_through_json() {
        let mut loadout = EquipmentLoadout::new();
        loadout.set_ring(0, Some(ring("Opal Band")));
        loadout.shovel = Some("Iron Shovel".to_string());
        loadout.custom_stats.insert("luck".to_string(), 5.0);
        let json = serde_json::to_string(&loadout).unwrap();
        assert!(json.contains("customStats"));
        let restored: EquipmentLoadout = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, loadout);
    }
}
