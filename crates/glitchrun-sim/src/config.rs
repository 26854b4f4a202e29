//! Simulation configuration: RNG seed, population caps and camera extents.
//!
//! Everything has a default; `SimConfig::from_json` overlays a partial JSON
//! document on top of it.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use glitchrun_core::constants::*;
use glitchrun_core::enums::{EnemyKind, MissionType};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed sim config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Enemy population limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    /// Cap for mission types without an entry in `mission_caps`.
    pub global_cap: usize,
    /// Effective global cap per mission type.
    pub mission_caps: Vec<(MissionType, usize)>,
    /// Per-kind caps. Kinds without an entry are limited only by the global cap.
    pub kind_caps: Vec<(EnemyKind, usize)>,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            global_cap: GLOBAL_ENEMY_CAP,
            mission_caps: vec![(MissionType::HoldPosition, HOLD_POSITION_ENEMY_CAP)],
            kind_caps: vec![
                (EnemyKind::RingSegment, 24),
                (EnemyKind::TwinNode, 10),
                (EnemyKind::Brute, 15),
                (EnemyKind::SquadFlanker, 12),
            ],
        }
    }
}

impl PopulationConfig {
    /// Global cap while `mission` is active.
    pub fn effective_cap(&self, mission: Option<MissionType>) -> usize {
        mission
            .and_then(|m| self.mission_caps.iter().find(|(t, _)| *t == m))
            .map(|(_, cap)| *cap)
            .unwrap_or(self.global_cap)
    }

    pub fn kind_cap(&self, kind: EnemyKind) -> Option<usize> {
        self.kind_caps
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, cap)| *cap)
    }
}

/// Configuration for starting a new simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    pub population: PopulationConfig,
    /// Half size of the camera viewport used for on-screen tests.
    pub viewport_half_extents: Vec2,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            population: PopulationConfig::default(),
            viewport_half_extents: Vec2::new(VIEWPORT_HALF_WIDTH, VIEWPORT_HALF_HEIGHT),
        }
    }
}

impl SimConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population.global_cap == 0 {
            return Err(ConfigError::Zero("population.global_cap"));
        }
        if self.population.mission_caps.iter().any(|(_, cap)| *cap == 0) {
            return Err(ConfigError::Zero("population.mission_caps"));
        }
        if !(self.viewport_half_extents.x > 0.0 && self.viewport_half_extents.y > 0.0) {
            return Err(ConfigError::Zero("viewport_half_extents"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hold_position_uses_reduced_cap() {
        let config = PopulationConfig::default();
        assert_eq!(config.effective_cap(Some(MissionType::HoldPosition)), 30);
        assert_eq!(config.effective_cap(Some(MissionType::Purge)), 50);
        assert_eq!(config.effective_cap(None), 50);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = SimConfig::from_json(r#"{"seed": 7}"#).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.population, PopulationConfig::default());
    }

    #[test]
    fn mission_cap_table_is_configurable() {
        let json = r#"{"population": {"mission_caps": [["HoldPosition", 30], ["Escort", 35]]}}"#;
        let config = SimConfig::from_json(json).unwrap();
        assert_eq!(config.population.effective_cap(Some(MissionType::Escort)), 35);
        assert_eq!(config.population.global_cap, GLOBAL_ENEMY_CAP);
    }

    #[test]
    fn invalid_config_is_rejected() {
        assert!(matches!(
            SimConfig::from_json("{seed"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            SimConfig::from_json(r#"{"population": {"global_cap": 0}}"#),
            Err(ConfigError::Zero(_))
        ));
    }
}
