//! Unit definitions.
//!
//! Units are plain data. The roster owns them; the grid only holds their ids.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::grid::TileId;

/// Unique identifier for a unit within one battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit#{}", self.0)
    }
}

/// Side a unit fights for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    /// The single player-controlled unit.
    Player,
    /// A scripted opponent.
    Enemy,
}

/// Combat and movement statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitStats {
    /// Health at spawn.
    pub max_health: u32,
    /// Manhattan movement budget per turn.
    pub movement: u32,
    /// Closest distance the unit can attack at.
    pub min_distance: u32,
    /// Furthest distance the unit can attack at.
    pub max_distance: u32,
    /// Damage dealt per hit.
    pub damage: u32,
}

impl Default for UnitStats {
    /// A melee unit with three tiles of movement.
    fn default() -> Self {
        Self {
            max_health: 10,
            movement: 3,
            min_distance: 1,
            max_distance: 1,
            damage: 3,
        }
    }
}

/// Fixed behaviour an enemy follows every turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EnemyScript {
    /// Step to the reachable tile closest to the player.
    #[default]
    Advance,
    /// Never move; attack whatever comes into range.
    Hold,
}

/// Template an encounter spawns enemies from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnemyArchetype {
    /// Display name.
    pub name: String,
    /// Statistics each spawned copy starts with.
    pub stats: UnitStats,
    /// Per-turn behaviour.
    #[serde(default)]
    pub script: EnemyScript,
}

impl EnemyArchetype {
    /// Create an archetype.
    #[must_use]
    pub fn new(name: impl Into<String>, stats: UnitStats, script: EnemyScript) -> Self {
        Self {
            name: name.into(),
            stats,
            script,
        }
    }
}

/// A unit placed on the battle field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Unit {
    /// Identifier, unique per battle.
    pub id: UnitId,
    /// Which side the unit is on.
    pub faction: Faction,
    /// Name shown to the player.
    pub name: String,
    /// Tile the unit stands on.
    pub tile: TileId,
    /// Statistics.
    pub stats: UnitStats,
    /// Remaining health. Zero means dead.
    pub health: u32,
    /// Enemy behaviour; ignored for the player.
    pub script: EnemyScript,
}

impl Unit {
    /// Create the player unit.
    #[must_use]
    pub fn player(id: UnitId, tile: TileId, stats: UnitStats) -> Self {
        Self {
            id,
            faction: Faction::Player,
            name: "Player".to_string(),
            tile,
            stats,
            health: stats.max_health,
            script: EnemyScript::Hold,
        }
    }

    /// Create an enemy from an archetype.
    #[must_use]
    pub fn enemy(id: UnitId, tile: TileId, archetype: &EnemyArchetype) -> Self {
        Self {
            id,
            faction: Faction::Enemy,
            name: archetype.name.clone(),
            tile,
            stats: archetype.stats,
            health: archetype.stats.max_health,
            script: archetype.script,
        }
    }

    /// Whether the unit still has health.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Subtract damage, saturating at zero. Returns `true` if this killed the unit.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        let was_alive = self.is_alive();
        self.health = self.health.saturating_sub(amount);
        was_alive && !self.is_alive()
    }
}
