//! Events reported by the battle session.
//!
//! Events accumulate between ticks (input callbacks also produce them) and are
//! handed to the host by [`BattleSession::tick`](crate::session::BattleSession::tick).

use serde::{Deserialize, Serialize};

use crate::grid::TileId;
use crate::host::BattleOutcome;
use crate::phase::Phase;
use crate::units::UnitId;

/// The battle moved from one phase to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseChange {
    /// Phase left.
    pub from: Phase,
    /// Phase entered.
    pub to: Phase,
}

/// A unit changed tiles (or deliberately stayed put).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitMove {
    /// Unit that moved.
    pub unit: UnitId,
    /// Tile left.
    pub from: TileId,
    /// Tile entered.
    pub to: TileId,
}

/// A unit attacked a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackEvent {
    /// Attacking unit.
    pub attacker: UnitId,
    /// Tile targeted.
    pub tile: TileId,
    /// Unit hit, if any stood there.
    pub target: Option<UnitId>,
    /// Damage dealt to `target`.
    pub damage: u32,
}

/// Everything that happened since the previous tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickEvents {
    /// Phase transitions, in order.
    pub phase_changes: Vec<PhaseChange>,
    /// Unit movements, in order.
    pub moves: Vec<UnitMove>,
    /// Attacks, in order.
    pub attacks: Vec<AttackEvent>,
    /// Units that died.
    pub deaths: Vec<UnitId>,
    /// Set on the tick the host is told the battle is over.
    pub battle_end: Option<BattleOutcome>,
}
