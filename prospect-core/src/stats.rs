//! Stat keys and the two stat table domains used by the pipeline.
//!
//! `AdditiveStats` accumulates raw values (luck, capacity, speed percentages).
//! `MultiplierDeltas` holds "+x%" deltas produced by the museum and by events.
//! Both share one storage layout but are distinct types, so a delta table can
//! never be summed into an accumulator by accident.

use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use thiserror::Error;

/// Fixed stat keys understood by the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatKey {
    Luck,
    DigStrength,
    DigSpeed,
    ShakeStrength,
    ShakeSpeed,
    Capacity,
    SellBoost,
    SizeBoost,
    ModifierBoost,
    Toughness,
    WalkSpeed,
}

impl StatKey {
    pub const COUNT: usize = 11;

    pub const ALL: [Self; Self::COUNT] = [
        Self::Luck,
        Self::DigStrength,
        Self::DigSpeed,
        Self::ShakeStrength,
        Self::ShakeSpeed,
        Self::Capacity,
        Self::SellBoost,
        Self::SizeBoost,
        Self::ModifierBoost,
        Self::Toughness,
        Self::WalkSpeed,
    ];

    const fn index(self) -> usize {
        self as usize
    }

    /// Canonical camelCase name used in catalogs and reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Luck => "luck",
            Self::DigStrength => "digStrength",
            Self::DigSpeed => "digSpeed",
            Self::ShakeStrength => "shakeStrength",
            Self::ShakeSpeed => "shakeSpeed",
            Self::Capacity => "capacity",
            Self::SellBoost => "sellBoost",
            Self::SizeBoost => "sizeBoost",
            Self::ModifierBoost => "modifierBoost",
            Self::Toughness => "toughness",
            Self::WalkSpeed => "walkSpeed",
        }
    }

    /// Lowercase natural-language label, as written in effect descriptions.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Luck => "luck",
            Self::DigStrength => "dig strength",
            Self::DigSpeed => "dig speed",
            Self::ShakeStrength => "shake strength",
            Self::ShakeSpeed => "shake speed",
            Self::Capacity => "capacity",
            Self::SellBoost => "sell boost",
            Self::SizeBoost => "size boost",
            Self::ModifierBoost => "modifier boost",
            Self::Toughness => "toughness",
            Self::WalkSpeed => "walk speed",
        }
    }
}

impl fmt::Display for StatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown stat key `{0}`")]
pub struct UnknownStatKey(pub String);

impl FromStr for StatKey {
    type Err = UnknownStatKey;

    /// Accepts the camelCase name in any letter case, or the spaced label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|key| {
                key.as_str().eq_ignore_ascii_case(trimmed) || key.label().eq_ignore_ascii_case(trimmed)
            })
            .ok_or_else(|| UnknownStatKey(s.to_string()))
    }
}

/// Marker for raw accumulated values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Additive;

/// Marker for "+x%" multiplier deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Multiplier;

/// A table of stat values in one semantic domain.
///
/// Unknown stat names are kept in an ordered `extras` map so custom stats
/// survive the pipeline without widening the fixed key set.
#[derive(Debug, Clone, PartialEq)]
pub struct StatTable<D> {
    values: [f64; StatKey::COUNT],
    extras: BTreeMap<String, f64>,
    domain: PhantomData<D>,
}

/// Accumulator output of the aggregator and of the event pipeline stages.
pub type AdditiveStats = StatTable<Additive>;

/// Multiplier deltas produced by the museum and by events.
pub type MultiplierDeltas = StatTable<Multiplier>;

impl<D> Default for StatTable<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> StatTable<D> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            values: [0.0; StatKey::COUNT],
            extras: BTreeMap::new(),
            domain: PhantomData,
        }
    }

    #[must_use]
    pub const fn get(&self, key: StatKey) -> f64 {
        self.values[key.index()]
    }

    pub const fn set(&mut self, key: StatKey, value: f64) {
        self.values[key.index()] = value;
    }

    pub fn add(&mut self, key: StatKey, value: f64) {
        self.values[key.index()] += value;
    }

    /// Add to a stat by name, creating an extra entry for unknown names.
    pub fn add_named(&mut self, name: &str, value: f64) {
        match name.parse::<StatKey>() {
            Ok(key) => self.add(key, value),
            Err(_) => *self.extras.entry(name.to_string()).or_insert(0.0) += value,
        }
    }

    /// Read a stat by name; unknown names with no extra entry read as zero.
    #[must_use]
    pub fn get_named(&self, name: &str) -> f64 {
        match name.parse::<StatKey>() {
            Ok(key) => self.get(key),
            Err(_) => self.extras.get(name).copied().unwrap_or(0.0),
        }
    }

    /// Set an extra (non-fixed) stat directly.
    pub fn set_extra(&mut self, name: &str, value: f64) {
        self.extras.insert(name.to_string(), value);
    }

    /// Fixed stats in key order.
    pub fn iter(&self) -> impl Iterator<Item = (StatKey, f64)> + '_ {
        StatKey::ALL.into_iter().map(|key| (key, self.get(key)))
    }

    #[must_use]
    pub const fn extras(&self) -> &BTreeMap<String, f64> {
        &self.extras
    }

    /// Every stat as `(name, value)`, fixed keys first, then extras by name.
    pub fn named_entries(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.iter()
            .map(|(key, value)| (key.as_str(), value))
            .chain(self.extras.iter().map(|(name, value)| (name.as_str(), *value)))
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.values.iter().all(|value| *value == 0.0) && self.extras.values().all(|value| *value == 0.0)
    }

    /// Add every value of another table of the same domain.
    pub fn accumulate(&mut self, other: &Self) {
        for key in StatKey::ALL {
            self.add(key, other.get(key));
        }
        for (name, value) in &other.extras {
            *self.extras.entry(name.clone()).or_insert(0.0) += *value;
        }
    }
}

impl<D> Serialize for StatTable<D> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(StatKey::COUNT + self.extras.len()))?;
        for (name, value) in self.named_entries() {
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}

impl<'de, D> Deserialize<'de> for StatTable<D> {
    fn deserialize<De>(deserializer: De) -> Result<Self, De::Error>
    where
        De: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, f64>::deserialize(deserializer)?;
        let mut table = Self::new();
        for (name, value) in raw {
            table.add_named(&name, value);
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stat_key_parses_names_and_labels() {
        assert_eq!("digSpeed".parse::<StatKey>().unwrap(), StatKey::DigSpeed);
        assert_eq!("DIGSPEED".parse::<StatKey>().unwrap(), StatKey::DigSpeed);
        assert_eq!("shake strength".parse::<StatKey>().unwrap(), StatKey::ShakeStrength);
        assert!("stamina".parse::<StatKey>().is_err());
    }

    #[test]
    fn add_named_routes_unknown_keys_to_extras() {
        let mut stats = AdditiveStats::new();
        stats.add_named("luck", 3.0);
        stats.add_named("stamina", 2.0);
        stats.add_named("stamina", 1.5);
        assert!((stats.get(StatKey::Luck) - 3.0).abs() < f64::EPSILON);
        assert!((stats.get_named("stamina") - 3.5).abs() < f64::EPSILON);
        assert!(stats.get_named("unseen").abs() < f64::EPSILON);
    }

    #[test]
    fn new_table_is_zero() {
        let stats = MultiplierDeltas::default();
        assert!(stats.is_zero());
        assert_eq!(stats.iter().count(), StatKey::COUNT);
    }

    #[test]
    fn accumulate_sums_fixed_and_extra_values() {
        let mut left = AdditiveStats::new();
        left.add(StatKey::Capacity, 10.0);
        left.add_named("stamina", 1.0);
        let mut right = AdditiveStats::new();
        right.add(StatKey::Capacity, 5.0);
        right.add_named("stamina", 2.0);
        right.add_named("grit", 4.0);
        left.accumulate(&right);
        assert!((left.get(StatKey::Capacity) - 15.0).abs() < f64::EPSILON);
        assert!((left.get_named("stamina") - 3.0).abs() < f64::EPSILON);
        assert!((left.get_named("grit") - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn serializes_as_flat_camel_case_map() {
        let mut stats = AdditiveStats::new();
        stats.add(StatKey::DigStrength, 4.0);
        stats.add_named("stamina", 1.0);
        let value = serde_json::to_value(&stats).unwrap();
        assert_eq!(value["digStrength"], 4.0);
        assert_eq!(value["stamina"], 1.0);
        assert_eq!(value["walkSpeed"], 0.0);

        let restored: AdditiveStats = serde_json::from_value(value).unwrap();
        assert_eq!(restored, stats);
    }
}
