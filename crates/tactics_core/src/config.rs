//! Battle configuration.
//!
//! Configurations are plain serde data and can be loaded from RON:
//!
//! ```
//! use tactics_core::config::BattleConfig;
//!
//! let config = BattleConfig::from_ron_str("(field_width: 10, seed: 3)").unwrap();
//! assert_eq!(config.field_width, 10);
//! assert_eq!(config.field_height, 8);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BattleError, Result};
use crate::units::UnitStats;

/// Ticks per second the host is expected to call `tick()` at.
pub const TICK_RATE: u32 = 20;

/// Largest field side; tile coordinates are `i32`.
pub const MAX_FIELD_SIDE: u32 = i32::MAX.unsigned_abs();

/// Parameters of a single battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Field width in tiles.
    pub field_width: u32,
    /// Field height in tiles.
    pub field_height: u32,
    /// Rightmost columns reserved for enemy spawns.
    pub enemy_spawn_width: u32,
    /// Leftmost columns the player may spawn in.
    pub player_spawn_width: u32,
    /// Ticks between the battle being decided and the host being told.
    pub end_delay_ticks: u32,
    /// Seed for spawn placement and encounter selection.
    pub seed: u64,
    /// Player statistics.
    pub player: UnitStats,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            field_width: 8,
            field_height: 8,
            enemy_spawn_width: 2,
            player_spawn_width: 2,
            end_delay_ticks: TICK_RATE,
            seed: 12345,
            player: UnitStats {
                max_health: 20,
                movement: 3,
                min_distance: 1,
                max_distance: 2,
                damage: 5,
            },
        }
    }
}

impl BattleConfig {
    /// Set the random seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the field size.
    #[must_use]
    pub const fn with_field(mut self, width: u32, height: u32) -> Self {
        self.field_width = width;
        self.field_height = height;
        self
    }

    /// Set the end-of-battle delay.
    #[must_use]
    pub const fn with_end_delay(mut self, ticks: u32) -> Self {
        self.end_delay_ticks = ticks;
        self
    }

    /// Parse a configuration from RON. Missing fields take their defaults.
    pub fn from_ron_str(ron: &str) -> Result<Self> {
        let config: Self = ron::from_str(ron)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a RON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    /// Check the field and spawn regions make sense together.
    pub fn validate(&self) -> Result<()> {
        if self.field_width == 0 || self.field_height == 0 {
            return Err(BattleError::InvalidConfig(format!(
                "field must be at least 1x1, got {}x{}",
                self.field_width, self.field_height
            )));
        }
        if self.field_width > MAX_FIELD_SIDE || self.field_height > MAX_FIELD_SIDE {
            return Err(BattleError::InvalidConfig(format!(
                "field side exceeds {MAX_FIELD_SIDE}, got {}x{}",
                self.field_width, self.field_height
            )));
        }
        if u64::from(self.field_width) * u64::from(self.field_height) > u64::from(u32::MAX) {
            return Err(BattleError::InvalidConfig(format!(
                "field of {}x{} has more tiles than tile ids can address",
                self.field_width, self.field_height
            )));
        }
        if self.player_spawn_width == 0 {
            return Err(BattleError::InvalidConfig(
                "player spawn width must be positive".to_string(),
            ));
        }
        if self.player_spawn_width > self.field_width.saturating_sub(self.enemy_spawn_width)
            || self.enemy_spawn_width > self.field_width
        {
            return Err(BattleError::InvalidConfig(format!(
                "spawn regions overlap: {} player + {} enemy columns on a {} wide field",
                self.player_spawn_width, self.enemy_spawn_width, self.field_width
            )));
        }
        if self.player.max_health == 0 {
            return Err(BattleError::InvalidConfig(
                "player must start with health".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = BattleConfig::default();
        assert_eq!(config.field_width, 8);
        assert_eq!(config.field_height, 8);
        assert_eq!(config.enemy_spawn_width, 2);
        assert_eq!(config.player_spawn_width, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overlapping_spawn_regions_rejected() {
        let config = BattleConfig {
            field_width: 3,
            ..BattleConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(BattleError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_zero_field_rejected() {
        let config = BattleConfig::default().with_field(0, 4);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_ron_partial_override() {
        let config = BattleConfig::from_ron_str(
            "(field_height: 5, player: (max_health: 9, movement: 2, min_distance: 2, max_distance: 3, damage: 1))",
        )
        .unwrap();
        assert_eq!(config.field_height, 5);
        assert_eq!(config.field_width, 8);
        assert_eq!(config.player.min_distance, 2);
    }

    #[test]
    fn test_huge_spawn_width_rejected_without_overflow() {
        assert!(matches!(
            BattleConfig::from_ron_str("(player_spawn_width: 4294967295, enemy_spawn_width: 2)"),
            Err(BattleError::InvalidConfig(_))
        ));
        assert!(matches!(
            BattleConfig::from_ron_str("(enemy_spawn_width: 4294967295)"),
            Err(BattleError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_field_beyond_tile_id_range_rejected() {
        assert!(matches!(
            BattleConfig::from_ron_str("(field_width: 70000, field_height: 70000)"),
            Err(BattleError::InvalidConfig(_))
        ));
        assert!(matches!(
            BattleConfig::from_ron_str("(field_width: 4294967295, field_height: 1)"),
            Err(BattleError::InvalidConfig(_))
        ));
        assert!(BattleConfig::default().with_field(65536, 65535).validate().is_ok());
    }

    #[test]
    fn test_ron_parse_error() {
        assert!(matches!(
            BattleConfig::from_ron_str("(field_width: \"wide\")"),
            Err(BattleError::ConfigParse(_))
        ));
    }
}
