use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;

use prospect_core::{
    Catalog, OptimizationConstraints, OptimizerConfig, PlannerState, Rarity, catalog,
};

fn read(path: &Path, what: &str) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {what} {}", path.display()))
}

/// Catalog from `path`, or the bundled sample catalog.
pub fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    let Some(path) = path else {
        return Ok(catalog().clone());
    };
    let json = read(path, "catalog")?;
    Catalog::from_json(&json).with_context(|| format!("invalid catalog {}", path.display()))
}

pub fn load_state(path: Option<&Path>) -> Result<PlannerState> {
    let Some(path) = path else {
        return Ok(PlannerState::default());
    };
    let json = read(path, "state")?;
    PlannerState::from_json(&json).with_context(|| format!("invalid state {}", path.display()))
}

pub fn load_constraints(path: Option<&Path>) -> Result<OptimizationConstraints> {
    let Some(path) = path else {
        return Ok(OptimizationConstraints::default());
    };
    let json = read(path, "constraints")?;
    serde_json::from_str(&json).with_context(|| format!("invalid constraints {}", path.display()))
}

pub fn load_config(path: Option<&Path>) -> Result<OptimizerConfig> {
    let Some(path) = path else {
        return Ok(OptimizerConfig::default());
    };
    let json = read(path, "optimizer config")?;
    let config: OptimizerConfig = serde_json::from_str(&json)
        .with_context(|| format!("invalid optimizer config {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("optimizer config {} out of range", path.display()))?;
    Ok(config)
}

/// Parse a comma-separated rarity list such as `epic,Mythic`.
pub fn parse_rarities(list: &str) -> Result<Vec<Rarity>> {
    let mut rarities = Vec::new();
    for token in list.split(',').map(str::trim).filter(|token| !token.is_empty()) {
        let Some(rarity) = Rarity::from_name(token) else {
            bail!("unknown rarity {token:?}");
        };
        rarities.push(rarity);
    }
    Ok(rarities)
}

/// Command-line overrides layered over the constraints file.
#[derive(Debug, Clone, Default)]
pub struct ConstraintOverrides {
    pub min_rings: Option<usize>,
    pub max_rings: Option<usize>,
    pub rarities: Option<String>,
    pub keep_museum: bool,
    pub prefer_enhanced: bool,
}

pub fn apply_overrides(
    mut constraints: OptimizationConstraints,
    overrides: &ConstraintOverrides,
) -> Result<OptimizationConstraints> {
    if let Some(min) = overrides.min_rings {
        constraints.min_rings = min;
    }
    if let Some(max) = overrides.max_rings {
        constraints.max_rings = max;
    }
    if let Some(list) = overrides.rarities.as_deref() {
        constraints.allowed_rarities = parse_rarities(list)?.into_iter().collect();
    }
    if overrides.keep_museum {
        constraints.optimize_museum = false;
    }
    if overrides.prefer_enhanced {
        constraints.prefer_enhanced = true;
    }
    constraints.validate().context("inconsistent constraints")?;
    Ok(constraints)
}
