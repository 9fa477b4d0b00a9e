//! User constraints on the optimizer search.
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

use crate::catalog::Rarity;
use crate::loadout::{EquippedItem, RING_SLOTS};

/// Errors raised when optimization constraints are inconsistent.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConstraintError {
    #[error("minimum ring count {min} exceeds maximum {max}")]
    RingBoundsInverted { min: usize, max: usize },
    #[error("maximum ring count {max} exceeds the {slots} available ring slots")]
    TooManyRings { max: usize, slots: usize },
    #[error("{locked} locked rings exceed the maximum ring count {max}")]
    LockedRingsExceedMax { locked: usize, max: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationConstraints {
    #[serde(default)]
    pub min_rings: usize,
    #[serde(default = "OptimizationConstraints::default_max_rings")]
    pub max_rings: usize,
    #[serde(default = "default_true")]
    pub include_rings: bool,
    #[serde(default = "default_true")]
    pub include_necklace: bool,
    #[serde(default = "default_true")]
    pub include_charm: bool,
    #[serde(default = "default_true")]
    pub include_shovel: bool,
    #[serde(default = "default_true")]
    pub include_pan: bool,
    #[serde(default = "default_true")]
    pub include_enchant: bool,
    #[serde(default)]
    pub locked_rings: [Option<EquippedItem>; RING_SLOTS],
    #[serde(default)]
    pub locked_necklace: Option<EquippedItem>,
    #[serde(default)]
    pub locked_charm: Option<EquippedItem>,
    /// Rarities eligible for search; empty allows every rarity.
    #[serde(default)]
    pub allowed_rarities: BTreeSet<Rarity>,
    #[serde(default = "default_true")]
    pub preserve_potions: bool,
    #[serde(default = "default_true")]
    pub preserve_events: bool,
    #[serde(default)]
    pub prefer_enhanced: bool,
    #[serde(default = "default_true")]
    pub optimize_museum: bool,
}

const fn default_true() -> bool {
    true
}

impl OptimizationConstraints {
    #[must_use]
    pub const fn default_max_rings() -> usize {
        RING_SLOTS
    }

    /// Constraints that leave every slot exactly as it is.
    #[must_use]
    pub fn frozen() -> Self {
        Self {
            include_rings: false,
            include_necklace: false,
            include_charm: false,
            include_shovel: false,
            include_pan: false,
            include_enchant: false,
            optimize_museum: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn locked_ring_count(&self) -> usize {
        self.locked_rings.iter().filter(|ring| ring.is_some()).count()
    }

    /// Whether an optional rarity passes the rarity filter.
    #[must_use]
    pub fn allows(&self, rarity: Option<Rarity>) -> bool {
        if self.allowed_rarities.is_empty() {
            return true;
        }
        rarity.is_some_and(|rarity| self.allowed_rarities.contains(&rarity))
    }

    /// Validate ring bounds and locks.
    ///
    /// # Errors
    ///
    /// Returns an error when the ring bounds are inverted, exceed the slot
    /// count, or cannot hold the locked rings.
    pub fn validate(&self) -> Result<(), ConstraintError> {
        if self.min_rings > self.max_rings {
            return Err(ConstraintError::RingBoundsInverted {
                min: self.min_rings,
                max: self.max_rings,
            });
        }
        if self.max_rings > RING_SLOTS {
            return Err(ConstraintError::TooManyRings {
                max: self.max_rings,
                slots: RING_SLOTS,
            });
        }
        let locked = self.locked_ring_count();
        if locked > self.max_rings {
            return Err(ConstraintError::LockedRingsExceedMax {
                locked,
                max: self.max_rings,
            });
        }
        Ok(())
    }
}

impl Default for OptimizationConstraints {
    fn default() -> Self {
        Self {
            min_rings: 0,
            max_rings: Self::default_max_rings(),
            include_rings: true,
            include_necklace: true,
            include_charm: true,
            include_shovel: true,
            include_pan: true,
            include_enchant: true,
            locked_rings: Default::default(),
            locked_necklace: None,
            locked_charm: None,
            allowed_rarities: BTreeSet::new(),
            preserve_potions: true,
            preserve_events: true,
            prefer_enhanced: false,
            optimize_museum: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loadout::{ItemPosition, ItemReference};

    #[test]
    fn defaults_validate() {
        assert_eq!(OptimizationConstraints::default().validate(), Ok(()));
        assert_eq!(OptimizationConstraints::frozen().validate(), Ok(()));
    }

    #[test]
    fn rejects_inverted_and_oversized_bounds() {
        let inverted = OptimizationConstraints {
            min_rings: 5,
            max_rings: 3,
            ..OptimizationConstraints::default()
        };
        assert_eq!(
            inverted.validate(),
            Err(ConstraintError::RingBoundsInverted { min: 5, max: 3 })
        );

        let oversized = OptimizationConstraints {
            max_rings: 9,
            ..OptimizationConstraints::default()
        };
        assert!(matches!(
            oversized.validate(),
            Err(ConstraintError::TooManyRings { max: 9, .. })
        ));
    }

    #[test]
    fn rejects_more_locks_than_max() {
        let mut constraints = OptimizationConstraints {
            max_rings: 1,
            ..OptimizationConstraints::default()
        };
        let ring = EquippedItem::base(ItemReference::new("Opal Band", ItemPosition::Ring));
        constraints.locked_rings[0] = Some(ring.clone());
        constraints.locked_rings[4] = Some(ring);
        assert_eq!(
            constraints.validate(),
            Err(ConstraintError::LockedRingsExceedMax { locked: 2, max: 1 })
        );
    }

    #[test]
    fn rarity_filter_allows_everything_when_empty() {
        let mut constraints = OptimizationConstraints::default();
        assert!(constraints.allows(None));
        assert!(constraints.allows(Some(Rarity::Common)));
        constraints.allowed_rarities.insert(Rarity::Epic);
        assert!(constraints.allows(Some(Rarity::Epic)));
        assert!(!constraints.allows(Some(Rarity::Common)));
        assert!(!constraints.allows(None));
    }

    #[test]
    fn deserializes_partial_documents_with_defaults() {
        let constraints: OptimizationConstraints =
            serde_json::from_str(r#"{ "maxRings": 4, "allowedRarities": ["Epic", "Mythic"] }"#)
                .unwrap();
        assert_eq!(constraints.max_rings, 4);
        assert!(constraints.include_pan);
        assert!(constraints.optimize_museum);
        assert_eq!(constraints.allowed_rarities.len(), 2);
    }
}
