//! Tuning knobs for the candidate search.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::efficiency::EfficiencyConstants;

/// Errors raised when optimizer tuning is out of range.
#[derive(Debug, Error, PartialEq)]
pub enum OptimizerConfigError {
    #[error("{field} must be at least {min} (got {value})")]
    MinViolation {
        field: &'static str,
        min: usize,
        value: usize,
    },
    #[error("efficiency constant {field} must be finite and non-negative (got {value})")]
    InvalidConstant { field: &'static str, value: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Candidates evaluated between progress reports and cancellation checks.
    #[serde(default = "OptimizerConfig::default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "OptimizerConfig::default_ring_candidates")]
    pub ring_candidates: usize,
    /// Top rings paired up for the alternating pattern.
    #[serde(default = "OptimizerConfig::default_alternating_pool")]
    pub alternating_pool: usize,
    #[serde(default = "OptimizerConfig::default_necklace_candidates")]
    pub necklace_candidates: usize,
    #[serde(default = "OptimizerConfig::default_charm_candidates")]
    pub charm_candidates: usize,
    #[serde(default = "OptimizerConfig::default_shovel_candidates")]
    pub shovel_candidates: usize,
    #[serde(default = "OptimizerConfig::default_pan_candidates")]
    pub pan_candidates: usize,
    /// Enchants tried when enchant search is enabled.
    #[serde(default = "OptimizerConfig::default_enchant_shortlist")]
    pub enchant_shortlist: Vec<String>,
    #[serde(default)]
    pub efficiency: EfficiencyConstants,
}

impl OptimizerConfig {
    #[must_use]
    pub const fn default_chunk_size() -> usize {
        1000
    }

    #[must_use]
    pub const fn default_ring_candidates() -> usize {
        20
    }

    #[must_use]
    pub const fn default_alternating_pool() -> usize {
        3
    }

    #[must_use]
    pub const fn default_necklace_candidates() -> usize {
        10
    }

    #[must_use]
    pub const fn default_charm_candidates() -> usize {
        10
    }

    #[must_use]
    pub const fn default_shovel_candidates() -> usize {
        5
    }

    #[must_use]
    pub const fn default_pan_candidates() -> usize {
        5
    }

    #[must_use]
    pub fn default_enchant_shortlist() -> Vec<String> {
        ["Destructive", "Prismatic", "Blessed", "Glittering"]
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Validate every tuning value.
    ///
    /// # Errors
    ///
    /// Returns an error when a count is zero or an efficiency constant is
    /// negative or non-finite.
    pub fn validate(&self) -> Result<(), OptimizerConfigError> {
        for (field, value) in self.counts() {
            if value < 1 {
                return Err(OptimizerConfigError::MinViolation {
                    field,
                    min: 1,
                    value,
                });
            }
        }
        for (field, value) in [
            ("efficiency.dig", self.efficiency.dig),
            ("efficiency.shake", self.efficiency.shake),
            ("efficiency.time", self.efficiency.time),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(OptimizerConfigError::InvalidConstant { field, value });
            }
        }
        Ok(())
    }

    /// Repair out-of-range values in place.
    pub fn sanitize(&mut self) {
        self.chunk_size = self.chunk_size.max(1);
        self.ring_candidates = self.ring_candidates.max(1);
        self.alternating_pool = self.alternating_pool.max(1);
        self.necklace_candidates = self.necklace_candidates.max(1);
        self.charm_candidates = self.charm_candidates.max(1);
        self.shovel_candidates = self.shovel_candidates.max(1);
        self.pan_candidates = self.pan_candidates.max(1);
        let defaults = EfficiencyConstants::default();
        if !self.efficiency.dig.is_finite() || self.efficiency.dig < 0.0 {
            self.efficiency.dig = defaults.dig;
        }
        if !self.efficiency.shake.is_finite() || self.efficiency.shake < 0.0 {
            self.efficiency.shake = defaults.shake;
        }
        if !self.efficiency.time.is_finite() || self.efficiency.time < 0.0 {
            self.efficiency.time = defaults.time;
        }
    }

    const fn counts(&self) -> [(&'static str, usize); 7] {
        [
            ("chunk_size", self.chunk_size),
            ("ring_candidates", self.ring_candidates),
            ("alternating_pool", self.alternating_pool),
            ("necklace_candidates", self.necklace_candidates),
            ("charm_candidates", self.charm_candidates),
            ("shovel_candidates", self.shovel_candidates),
            ("pan_candidates", self.pan_candidates),
        ]
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            chunk_size: Self::default_chunk_size(),
            ring_candidates: Self::default_ring_candidates(),
            alternating_pool: Self::default_alternating_pool(),
            necklace_candidates: Self::default_necklace_candidates(),
            charm_candidates: Self::default_charm_candidates(),
            shovel_candidates: Self::default_shovel_candidates(),
            pan_candidates: Self::default_pan_candidates(),
            enchant_shortlist: Self::default_enchant_shortlist(),
            efficiency: EfficiencyConstants::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = OptimizerConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.chunk_size, 1000);
        assert_eq!(config.enchant_shortlist.len(), 4);
    }

    #[test]
    fn validate_reports_zero_counts() {
        let config = OptimizerConfig {
            ring_candidates: 0,
            ..OptimizerConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(OptimizerConfigError::MinViolation {
                field: "ring_candidates",
                min: 1,
                value: 0,
            })
        );
    }

    #[test]
    fn sanitize_repairs_counts_and_constants() {
        let mut config = OptimizerConfig {
            chunk_size: 0,
            efficiency: EfficiencyConstants {
                dig: f64::NAN,
                shake: -1.0,
                time: 3.0,
            },
            ..OptimizerConfig::default()
        };
        assert!(config.validate().is_err());
        config.sanitize();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.chunk_size, 1);
        assert!((config.efficiency.dig - 2.0).abs() < f64::EPSILON);
        assert!((config.efficiency.shake - 0.35).abs() < f64::EPSILON);
        assert!((config.efficiency.time - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: OptimizerConfig =
            serde_json::from_str(r#"{ "chunk_size": 50, "efficiency": { "time": 6.0 } }"#).unwrap();
        assert_eq!(config.chunk_size, 50);
        assert_eq!(config.ring_candidates, 20);
        assert!((config.efficiency.time - 6.0).abs() < f64::EPSILON);
        assert!((config.efficiency.dig - 2.0).abs() < f64::EPSILON);
    }
}
