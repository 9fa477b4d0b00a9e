//! Saved planner state: the current loadout and museum.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::loadout::EquipmentLoadout;
use crate::museum::{MuseumSlot, empty_museum, sanitize_museum};

#[derive(Debug, Error)]
pub enum StateError {
    #[error("planner state JSON could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Host-owned document; the core only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerState {
    #[serde(default)]
    pub loadout: EquipmentLoadout,
    #[serde(default = "empty_museum")]
    pub museum: Vec<MuseumSlot>,
}

impl PlannerState {
    /// Parse a state document. Duplicate museum ores are cleared.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::Parse`] when the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, StateError> {
        let mut state: Self = serde_json::from_str(json)?;
        state.museum = sanitize_museum(&state.museum);
        Ok(state)
    }

    /// # Errors
    ///
    /// Returns [`StateError::Parse`] if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, StateError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for PlannerState {
    fn default() -> Self {
        Self {
            loadout: EquipmentLoadout::new(),
            museum: empty_museum(),
        }
    }
}
