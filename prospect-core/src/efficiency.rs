//! Luck efficiency: the single scalar the optimizer maximises.

use serde::{Deserialize, Serialize};

use crate::numbers::{DENOMINATOR_FLOOR, non_negative};
use crate::stats::{AdditiveStats, StatKey};

/// Time weights of the dig/shake cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyConstants {
    #[serde(default = "EfficiencyConstants::default_dig")]
    pub dig: f64,
    #[serde(default = "EfficiencyConstants::default_shake")]
    pub shake: f64,
    #[serde(default = "EfficiencyConstants::default_time")]
    pub time: f64,
}

impl EfficiencyConstants {
    #[must_use]
    pub const fn default_dig() -> f64 {
        2.0
    }

    #[must_use]
    pub const fn default_shake() -> f64 {
        0.35
    }

    #[must_use]
    pub const fn default_time() -> f64 {
        4.0
    }
}

impl Default for EfficiencyConstants {
    fn default() -> Self {
        Self {
            dig: Self::default_dig(),
            shake: Self::default_shake(),
            time: Self::default_time(),
        }
    }
}

/// The six stats the efficiency formula reads.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EfficiencyInputs {
    pub luck: f64,
    pub capacity: f64,
    pub dig_strength: f64,
    /// Dig speed in percent (100 = 1.0x).
    pub dig_speed_pct: f64,
    pub shake_strength: f64,
    /// Shake speed in percent (100 = 1.0x).
    pub shake_speed_pct: f64,
}

impl EfficiencyInputs {
    #[must_use]
    pub const fn from_stats(stats: &AdditiveStats) -> Self {
        Self {
            luck: stats.get(StatKey::Luck),
            capacity: stats.get(StatKey::Capacity),
            dig_strength: stats.get(StatKey::DigStrength),
            dig_speed_pct: stats.get(StatKey::DigSpeed),
            shake_strength: stats.get(StatKey::ShakeStrength),
            shake_speed_pct: stats.get(StatKey::ShakeSpeed),
        }
    }
}

/// Expected luck-weighted yield per unit time.
///
/// Every denominator is floored at `1e-4`; the result is always finite and
/// non-negative.
#[must_use]
pub fn calculate_luck_efficiency(inputs: &EfficiencyInputs, constants: &EfficiencyConstants) -> f64 {
    let dig_speed = (inputs.dig_speed_pct / 100.0).max(DENOMINATOR_FLOOR);
    let shake_speed = (inputs.shake_speed_pct / 100.0).max(DENOMINATOR_FLOOR);
    let capacity = inputs.capacity.max(DENOMINATOR_FLOOR);
    let dig_strength = (inputs.dig_strength * 1.5).max(DENOMINATOR_FLOOR);
    let shake_strength = inputs.shake_strength.max(DENOMINATOR_FLOOR);

    let numerator = inputs.luck * capacity.sqrt() * 0.625;
    let dig_cycles = (capacity / dig_strength).ceil();
    let shake_cycles = (capacity / shake_strength).ceil();
    let denominator = constants.dig * dig_cycles / dig_speed
        + constants.shake * shake_cycles / shake_speed
        + constants.time;

    non_negative(numerator / denominator.max(DENOMINATOR_FLOOR))
}

/// Efficiency of a stat table.
#[must_use]
pub fn efficiency_of(stats: &AdditiveStats, constants: &EfficiencyConstants) -> f64 {
    calculate_luck_efficiency(&EfficiencyInputs::from_stats(stats), constants)
}
