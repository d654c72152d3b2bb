//! Recording battle host.
//!
//! [`RecordingHost`] logs every request the battle core makes and can pretend
//! enemy presentations take a number of ticks, so tests can exercise the
//! in-progress path of the enemy queues.

use tactics_core::grid::TileId;
use tactics_core::host::{ActionStatus, BattleHost, BattleOutcome, PresentationClock};
use tactics_core::range::TileSet;
use tactics_core::units::UnitId;

/// A single call made by the battle core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostRequest {
    /// Walkable set published.
    Walkable {
        /// Player the set belongs to.
        player: UnitId,
        /// Tiles in the set.
        tiles: Vec<TileId>,
    },
    /// Attackable set published.
    Attackable {
        /// Player the set belongs to.
        player: UnitId,
        /// Tiles in the set.
        tiles: Vec<TileId>,
    },
    /// Enemy move presented.
    EnemyMove {
        /// Acting enemy.
        enemy: UnitId,
        /// Tile left.
        from: TileId,
        /// Tile entered.
        to: TileId,
    },
    /// Enemy attack presented.
    EnemyAttack {
        /// Acting enemy.
        enemy: UnitId,
        /// Unit hit, if any.
        target: Option<UnitId>,
    },
    /// Battle over.
    Finished(BattleOutcome),
}

/// Host that records requests and simulates presentation latency.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    clock: PresentationClock,
    requests: Vec<HostRequest>,
}

impl RecordingHost {
    /// Host whose enemy presentations finish immediately.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Host whose enemy presentations take `ticks` calls to
    /// [`advance`](Self::advance) to finish.
    #[must_use]
    pub fn with_latency(ticks: u32) -> Self {
        Self {
            clock: PresentationClock::new(ticks),
            ..Self::default()
        }
    }

    /// Step the current presentation. Returns `true` on the step it finishes,
    /// at which point the caller reports completion to the session.
    pub fn advance(&mut self) -> bool {
        self.clock.advance()
    }

    /// Whether a presentation is still playing.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.clock.is_playing()
    }

    /// Every request, in order.
    #[must_use]
    pub fn requests(&self) -> &[HostRequest] {
        &self.requests
    }

    /// Number of walkable publications.
    #[must_use]
    pub fn walkable_publications(&self) -> usize {
        self.requests
            .iter()
            .filter(|r| matches!(r, HostRequest::Walkable { .. }))
            .count()
    }

    /// Enemies in the order they were asked to move.
    #[must_use]
    pub fn enemy_moves(&self) -> Vec<UnitId> {
        self.requests
            .iter()
            .filter_map(|r| match r {
                HostRequest::EnemyMove { enemy, .. } => Some(*enemy),
                _ => None,
            })
            .collect()
    }

    /// Enemies in the order they were asked to attack.
    #[must_use]
    pub fn enemy_attacks(&self) -> Vec<UnitId> {
        self.requests
            .iter()
            .filter_map(|r| match r {
                HostRequest::EnemyAttack { enemy, .. } => Some(*enemy),
                _ => None,
            })
            .collect()
    }

    /// Outcomes reported through `battle_finished`.
    #[must_use]
    pub fn finishes(&self) -> Vec<BattleOutcome> {
        self.requests
            .iter()
            .filter_map(|r| match r {
                HostRequest::Finished(outcome) => Some(*outcome),
                _ => None,
            })
            .collect()
    }
}

impl BattleHost for RecordingHost {
    fn publish_walkable(&mut self, player: UnitId, tiles: &TileSet) {
        self.requests.push(HostRequest::Walkable {
            player,
            tiles: tiles.iter().collect(),
        });
    }

    fn publish_attackable(&mut self, player: UnitId, tiles: &TileSet) {
        self.requests.push(HostRequest::Attackable {
            player,
            tiles: tiles.iter().collect(),
        });
    }

    fn animate_enemy_move(&mut self, enemy: UnitId, from: TileId, to: TileId) -> ActionStatus {
        self.requests.push(HostRequest::EnemyMove { enemy, from, to });
        self.clock.start()
    }

    fn animate_enemy_attack(&mut self, enemy: UnitId, target: Option<UnitId>) -> ActionStatus {
        self.requests.push(HostRequest::EnemyAttack { enemy, target });
        self.clock.start()
    }

    fn battle_finished(&mut self, outcome: BattleOutcome) {
        tracing::debug!(?outcome, "Recorded battle end");
        self.requests.push(HostRequest::Finished(outcome));
    }
}
