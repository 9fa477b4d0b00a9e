//! Prospect Planner Core
//!
//! Platform-agnostic planner for a prospecting game: equipment stats,
//! museum bonuses, event multipliers, luck efficiency and a pruned
//! loadout optimizer. This crate performs no I/O and never initializes a
//! logger.

pub mod aggregate;
pub mod breakdown;
pub mod catalog;
pub mod efficiency;
pub mod events;
pub mod loadout;
pub mod museum;
pub mod museum_layout;
pub mod numbers;
pub mod optimizer;
pub mod state;
pub mod stats;

// Re-export commonly used types
pub use aggregate::{calculate_base_stats, pan_passive_effects, parse_passive_text};
pub use breakdown::{
    LoadoutComparison, StatBreakdown, StatDelta, compare_breakdowns, compare_plans,
    compute_stat_breakdown, compute_stat_breakdown_with,
};
pub use catalog::{
    Catalog, CatalogData, CatalogError, EnchantDef, EventDef, ItemDef, ModifierDef, OreDef,
    PanDef, PassiveEffects, PotionDef, Rarity, ShovelDef, StatRange, catalog,
};
pub use efficiency::{
    EfficiencyConstants, EfficiencyInputs, calculate_luck_efficiency, efficiency_of,
};
pub use events::{
    EventSplit, PRE_MUSEUM_EVENTS, StagedStats, apply_event_multipliers,
    separate_event_multipliers,
};
pub use loadout::{EquipmentLoadout, EquippedItem, ItemPosition, ItemReference, RING_SLOTS};
pub use museum::{
    ModifierCategory, MuseumSlot, SlotId, calculate_museum_bonuses, empty_museum,
    sanitize_museum,
};
pub use museum_layout::{PriorityProfile, optimize_museum_layout};
#[cfg(feature = "async")]
pub use optimizer::optimize_inventory_async;
pub use optimizer::{
    CancellationToken, ConstraintError, NoProgress, OptimizationConstraints, OptimizationResult,
    OptimizationRun, OptimizerConfig, OptimizerConfigError, ProgressSink, RunStatus,
    optimize_inventory,
};
pub use state::{PlannerState, StateError};
pub use stats::{AdditiveStats, MultiplierDeltas, StatKey, StatTable};
