use std::{fs, path::Path};

use anyhow::{ensure, Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Tunables for the resolvers. Every field has a default, so a config file
/// only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct EngineConfig {
    /// Ticks before another trainer tile can trigger.
    pub trainer_cooldown: u32,
    /// Ticks before another teleport tile can trigger.
    pub teleport_cooldown: u32,
    pub movement: MovementConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            trainer_cooldown: 10,
            teleport_cooldown: 30,
            movement: MovementConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct MovementConfig {
    pub max_drunk: f64,
    /// Weight of every direction when there is no previous step.
    pub uniform_weight: f64,
    /// Weight of continuing straight when sober.
    pub straight_weight: f64,
    /// Straight weight lost per point of drunkenness.
    pub straight_drunk_penalty: f64,
    pub turn_weight: f64,
    pub min_weight: f64,
    /// Personality traits feeding the drunk factor, and how much each adds.
    pub drunk_traits: IndexMap<String, f64>,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            max_drunk: 10.0,
            uniform_weight: 10.0,
            straight_weight: 40.0,
            straight_drunk_penalty: 3.6,
            turn_weight: 4.0,
            min_weight: 1.0,
            drunk_traits: IndexMap::from([("Drunk".to_string(), 7.0)]),
        }
    }
}

impl MovementConfig {
    /// Reject values the weight formulas cannot use: `max_drunk` divides,
    /// and every weight feeds a weighted draw.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.max_drunk.is_finite() && self.max_drunk > 0.0,
            "movement.max_drunk must be a positive number, got {}",
            self.max_drunk
        );
        for (name, value) in [
            ("uniform_weight", self.uniform_weight),
            ("straight_weight", self.straight_weight),
            ("straight_drunk_penalty", self.straight_drunk_penalty),
            ("turn_weight", self.turn_weight),
            ("min_weight", self.min_weight),
        ] {
            ensure!(
                value.is_finite() && value >= 0.0,
                "movement.{} must be a non-negative number, got {}",
                name,
                value
            );
        }
        for (name, amount) in &self.drunk_traits {
            ensure!(
                amount.is_finite(),
                "movement.drunk_traits.{} must be a number, got {}",
                name,
                amount
            );
        }
        Ok(())
    }
}

impl EngineConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let cfg: Self = serde_yaml::from_str(text).context("failed to parse engine config YAML")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(text).context("failed to parse engine config JSON")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        self.movement.validate().context("invalid engine config")
    }

    /// Load from `.json`, anything else is read as YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read engine config: {}", path.display()))?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_yaml_str(&text)
        }
    }
}
