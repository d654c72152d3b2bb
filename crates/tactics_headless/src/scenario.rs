//! Scenario loading and configuration.
//!
//! A scenario is a battle configuration plus the encounter to spawn, stored as
//! RON so balance tweaks need no rebuild.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use tactics_core::config::BattleConfig;
use tactics_core::encounter::{Encounter, EnemyGroup};
use tactics_core::error::BattleError;
use tactics_core::units::{EnemyArchetype, EnemyScript, UnitStats};

/// Error type for scenario operations.
#[derive(Error, Debug)]
pub enum ScenarioError {
    /// File not found.
    #[error("Scenario file not found: {0}")]
    FileNotFound(String),
    /// Failed to read file.
    #[error("Failed to read scenario file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse RON.
    #[error("Failed to parse scenario: {0}")]
    ParseError(#[from] ron::error::SpannedError),
    /// Parsed, but the battle configuration is unusable.
    #[error("Invalid scenario: {0}")]
    Invalid(#[from] BattleError),
}

/// A complete battle scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name.
    pub name: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Field, spawn and player configuration.
    #[serde(default)]
    pub config: BattleConfig,
    /// Enemies to spawn.
    pub encounter: Encounter,
}

impl Default for Scenario {
    fn default() -> Self {
        Self::skirmish()
    }
}

impl Scenario {
    /// Load a scenario from a RON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ScenarioError::FileNotFound(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    /// Load from a RON string (useful for embedded scenarios).
    pub fn from_ron_str(ron: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = ron::from_str(ron)?;
        scenario.config.validate()?;
        Ok(scenario)
    }

    /// Same scenario with a different seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Built-in scenario: one of three small warbands on the default field.
    #[must_use]
    pub fn skirmish() -> Self {
        let goblin = EnemyArchetype::new(
            "goblin",
            UnitStats {
                max_health: 6,
                movement: 3,
                min_distance: 1,
                max_distance: 1,
                damage: 2,
            },
            EnemyScript::Advance,
        );
        let archer = EnemyArchetype::new(
            "archer",
            UnitStats {
                max_health: 4,
                movement: 2,
                min_distance: 2,
                max_distance: 3,
                damage: 2,
            },
            EnemyScript::Advance,
        );
        let totem = EnemyArchetype::new(
            "totem",
            UnitStats {
                max_health: 10,
                movement: 0,
                min_distance: 1,
                max_distance: 2,
                damage: 1,
            },
            EnemyScript::Hold,
        );

        Self {
            name: "Skirmish".to_string(),
            description: "Player against a random warband on an 8x8 field".to_string(),
            config: BattleConfig::default(),
            encounter: Encounter::RandomPool(vec![
                EnemyGroup {
                    name: "raiders".to_string(),
                    members: vec![goblin.clone(), goblin.clone(), goblin.clone()],
                },
                EnemyGroup {
                    name: "skirmishers".to_string(),
                    members: vec![goblin.clone(), archer.clone(), archer],
                },
                EnemyGroup {
                    name: "shrine".to_string(),
                    members: vec![totem, goblin],
                },
            ]),
        }
    }
}
