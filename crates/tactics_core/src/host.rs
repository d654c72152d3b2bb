//! Host collaborator interface.
//!
//! The battle core never renders, animates or waits. Whatever presents the
//! battle implements [`BattleHost`]; the session calls it when a range set is
//! ready for display, when an enemy acts and when the battle is over. Long
//! presentations answer [`ActionStatus::InProgress`] and later report back
//! through [`BattleSession::enemy_action_finished`](crate::session::BattleSession::enemy_action_finished).

use serde::{Deserialize, Serialize};

use crate::grid::TileId;
use crate::range::TileSet;
use crate::units::UnitId;

/// Answer to a presentation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ActionStatus {
    /// Finished within the call.
    #[default]
    Done,
    /// Still playing; completion will be reported later.
    InProgress,
}

/// How a battle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattleOutcome {
    /// Every enemy is dead.
    Victory,
    /// The player is dead.
    Defeat,
}

/// Side-effecting collaborator driven by the battle core.
///
/// Every method has a default so hosts only implement what they present.
pub trait BattleHost {
    /// The player's walkable set for this turn is ready.
    fn publish_walkable(&mut self, _player: UnitId, _tiles: &TileSet) {}

    /// The player's attackable set for this turn is ready.
    fn publish_attackable(&mut self, _player: UnitId, _tiles: &TileSet) {}

    /// An enemy moved from one tile to another (possibly the same tile).
    fn animate_enemy_move(&mut self, _enemy: UnitId, _from: TileId, _to: TileId) -> ActionStatus {
        ActionStatus::Done
    }

    /// An enemy attacked; `target` is `None` when nothing was in range.
    fn animate_enemy_attack(&mut self, _enemy: UnitId, _target: Option<UnitId>) -> ActionStatus {
        ActionStatus::Done
    }

    /// The battle is decided and the end delay has elapsed.
    fn battle_finished(&mut self, _outcome: BattleOutcome) {}
}

/// Countdown for hosts whose enemy presentations last a fixed number of ticks.
///
/// [`start`](Self::start) answers the session's presentation request;
/// the host then calls [`advance`](Self::advance) once per tick and reports
/// completion through `enemy_action_finished` when it returns `true`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PresentationClock {
    latency: u32,
    remaining: Option<u32>,
}

impl PresentationClock {
    /// Clock whose presentations take `latency` ticks. Zero finishes at once.
    #[must_use]
    pub const fn new(latency: u32) -> Self {
        Self {
            latency,
            remaining: None,
        }
    }

    /// Begin a presentation.
    pub fn start(&mut self) -> ActionStatus {
        if self.latency == 0 {
            ActionStatus::Done
        } else {
            self.remaining = Some(self.latency);
            ActionStatus::InProgress
        }
    }

    /// Step the current presentation. Returns `true` on the step it finishes.
    pub fn advance(&mut self) -> bool {
        match self.remaining {
            Some(remaining) if remaining <= 1 => {
                self.remaining = None;
                true
            }
            Some(remaining) => {
                self.remaining = Some(remaining - 1);
                false
            }
            None => false,
        }
    }

    /// Whether a presentation is still playing.
    #[must_use]
    pub const fn is_playing(&self) -> bool {
        self.remaining.is_some()
    }
}

/// Host that presents nothing and finishes every action immediately.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullHost;

impl BattleHost for NullHost {}

impl<H: BattleHost + ?Sized> BattleHost for Box<H> {
    fn publish_walkable(&mut self, player: UnitId, tiles: &TileSet) {
        (**self).publish_walkable(player, tiles);
    }

    fn publish_attackable(&mut self, player: UnitId, tiles: &TileSet) {
        (**self).publish_attackable(player, tiles);
    }

    fn animate_enemy_move(&mut self, enemy: UnitId, from: TileId, to: TileId) -> ActionStatus {
        (**self).animate_enemy_move(enemy, from, to)
    }

    fn animate_enemy_attack(&mut self, enemy: UnitId, target: Option<UnitId>) -> ActionStatus {
        (**self).animate_enemy_attack(enemy, target)
    }

    fn battle_finished(&mut self, outcome: BattleOutcome) {
        (**self).battle_finished(outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_latency_finishes_at_once() {
        let mut clock = PresentationClock::new(0);
        assert_eq!(clock.start(), ActionStatus::Done);
        assert!(!clock.is_playing());
        assert!(!clock.advance());
    }

    #[test]
    fn test_clock_finishes_on_last_tick() {
        let mut clock = PresentationClock::new(3);
        assert_eq!(clock.start(), ActionStatus::InProgress);
        assert!(!clock.advance());
        assert!(!clock.advance());
        assert!(clock.advance());
        assert!(!clock.is_playing());
        assert!(!clock.advance());
    }

    #[test]
    fn test_restart_resets_countdown() {
        let mut clock = PresentationClock::new(2);
        clock.start();
        assert!(!clock.advance());
        clock.start();
        assert!(!clock.advance());
        assert!(clock.advance());
    }
}
