//! Error types for the battle core.

use thiserror::Error;

use crate::grid::TileId;
use crate::phase::Phase;
use crate::units::UnitId;

/// Result type alias using [`BattleError`].
pub type Result<T> = std::result::Result<T, BattleError>;

/// Top-level error type for all battle core errors.
#[derive(Debug, Error)]
pub enum BattleError {
    /// The enemy spawn pool is exhausted.
    ///
    /// Callers are expected to check `can_spawn_enemy()` first; hitting this
    /// is recoverable.
    #[error("No spawn space available")]
    NoSpawnSpaceAvailable,

    /// An input or completion arrived in a phase that cannot accept it.
    #[error("Invalid phase transition from {from:?} to {to:?}")]
    InvalidPhaseTransition {
        /// Phase the battle was in.
        from: Phase,
        /// Phase the request tried to move to.
        to: Phase,
    },

    /// Tile identifier does not belong to the grid.
    #[error("Tile out of bounds: {0}")]
    TileOutOfBounds(TileId),

    /// Coordinates lie outside the grid.
    #[error("Position out of bounds: ({x}, {y})")]
    PositionOutOfBounds {
        /// Column.
        x: i32,
        /// Row.
        y: i32,
    },

    /// Tile already holds a unit.
    #[error("Tile already occupied: {0}")]
    TileOccupied(TileId),

    /// Requested move target is not in the published walkable set.
    #[error("Tile is not walkable this turn: {0}")]
    TargetNotWalkable(TileId),

    /// Requested attack target is not in the published attackable set.
    #[error("Tile is not attackable this turn: {0}")]
    TargetNotAttackable(TileId),

    /// Unit is not part of the roster.
    #[error("Unit not found: {0}")]
    UnitNotFound(UnitId),

    /// The player unit has not been placed yet.
    #[error("Player has not been spawned")]
    PlayerNotSpawned,

    /// Configuration failed validation.
    #[error("Invalid battle configuration: {0}")]
    InvalidConfig(String),

    /// Configuration text could not be parsed.
    #[error("Failed to parse battle configuration: {0}")]
    ConfigParse(#[from] ron::error::SpannedError),

    /// Configuration file could not be read.
    #[error("Failed to read battle configuration: {0}")]
    ConfigRead(#[from] std::io::Error),
}
