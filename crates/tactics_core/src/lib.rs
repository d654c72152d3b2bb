//! # Tactics Core
//!
//! Turn-based tactical battle core for a single player unit against a roster
//! of scripted enemies on a rectangular tile grid.
//!
//! This crate contains **only** battle logic:
//! - No rendering
//! - No IO (besides optional RON config loading)
//! - No animation or waiting; presentation is delegated to a [`host::BattleHost`]
//! - No system randomness (spawns use a seeded ChaCha RNG)
//!
//! This separation enables:
//! - Headless battle runs in CI
//! - Reproducible battles from a seed
//! - Testing every phase transition without a game engine
//!
//! ## Crate Structure
//!
//! - [`grid`] - Tiles, adjacency and per-tile status
//! - [`range`] - Walkable and attackable range queries
//! - [`phase`] - Turn phase state machine
//! - [`enemy_queue`] - One-enemy-at-a-time phase processor
//! - [`roster`] / [`units`] / [`spawn`] / [`encounter`] - Units and spawning
//! - [`session`] - The battle loop tying it all together

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod config;
pub mod encounter;
pub mod enemy_queue;
pub mod error;
pub mod events;
pub mod grid;
pub mod host;
pub mod phase;
pub mod range;
pub mod roster;
pub mod session;
pub mod spawn;
pub mod units;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{BattleConfig, TICK_RATE};
    pub use crate::encounter::{Encounter, EnemyGroup};
    pub use crate::enemy_queue::{EnemyQueue, QueueStep};
    pub use crate::error::{BattleError, Result};
    pub use crate::events::{AttackEvent, PhaseChange, TickEvents, UnitMove};
    pub use crate::grid::{Direction, Grid, Position, TileId, TileStatus};
    pub use crate::host::{ActionStatus, BattleHost, BattleOutcome, NullHost, PresentationClock};
    pub use crate::phase::Phase;
    pub use crate::range::{compute_attackable, compute_walkable, TileSet};
    pub use crate::roster::Roster;
    pub use crate::session::BattleSession;
    pub use crate::spawn::SpawnPool;
    pub use crate::units::{EnemyArchetype, EnemyScript, Faction, Unit, UnitId, UnitStats};
}
