//! Event multipliers and the three-stage stat pipeline.
//!
//! ```text
//! base ──(1 + pre)──▶ base_with_pre ──(+ base × museum)──▶ final ──(1 + post)──▶ event
//! ```
//!
//! The museum term is computed from the original base, not from
//! `base_with_pre`. That ordering is what separates the "with museum" and
//! "with events" views.

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::stats::{AdditiveStats, MultiplierDeltas, StatKey};

/// Events applied to base stats before museum bonuses.
pub const PRE_MUSEUM_EVENTS: &[&str] = &["Luck Totem", "Strength Totem", "Friends Boost"];

/// Whether an event name is applied before museum bonuses.
#[must_use]
pub fn is_pre_museum_event(name: &str) -> bool {
    PRE_MUSEUM_EVENTS.contains(&name)
}

/// Summed `(multiplier - 1)` deltas per stage.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EventSplit {
    pub pre: MultiplierDeltas,
    pub post: MultiplierDeltas,
}

/// Stat values after the museum stage and after the post-event stage.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StagedStats {
    pub final_stats: AdditiveStats,
    pub event_stats: AdditiveStats,
}

/// Classify active events and sum their deltas into pre/post buckets.
/// Unknown event names contribute nothing.
#[must_use]
pub fn separate_event_multipliers<S>(catalog: &Catalog, names: &[S]) -> EventSplit
where
    S: AsRef<str>,
{
    let mut split = EventSplit::default();
    for name in names {
        let name = name.as_ref();
        let Some(event) = catalog.find_event(name) else {
            continue;
        };
        let bucket = if is_pre_museum_event(name) {
            &mut split.pre
        } else {
            &mut split.post
        };
        for (stat, multiplier) in &event.multipliers {
            bucket.add_named(stat, multiplier - 1.0);
        }
    }
    split
}

fn stage_value(base: f64, museum: f64, pre: f64, post: f64) -> (f64, f64) {
    let base_with_pre = base * (1.0 + pre);
    let final_value = base_with_pre + base * museum;
    (final_value, final_value * (1.0 + post))
}

/// Run base stats through pre-events, museum bonuses and post-events.
#[must_use]
pub fn apply_event_multipliers(
    base: &AdditiveStats,
    museum: &MultiplierDeltas,
    pre: &MultiplierDeltas,
    post: &MultiplierDeltas,
) -> StagedStats {
    let mut staged = StagedStats::default();
    for key in StatKey::ALL {
        let (final_value, event_value) =
            stage_value(base.get(key), museum.get(key), pre.get(key), post.get(key));
        staged.final_stats.set(key, final_value);
        staged.event_stats.set(key, event_value);
    }
    for (name, value) in base.extras() {
        let (final_value, event_value) = stage_value(
            *value,
            museum.get_named(name),
            pre.get_named(name),
            post.get_named(name),
        );
        staged.final_stats.set_extra(name, final_value);
        staged.event_stats.set_extra(name, event_value);
    }
    staged
}
