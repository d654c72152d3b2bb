//! Headless battle runner.
//!
//! Drives a [`BattleSession`] to completion: the [`Autopilot`] answers player
//! input, and a [`ScriptedHost`] stands in for the presentation layer.

use serde::{Deserialize, Serialize};

use tactics_core::error::Result;
use tactics_core::grid::TileId;
use tactics_core::host::{ActionStatus, BattleHost, BattleOutcome, PresentationClock};
use tactics_core::phase::Phase;
use tactics_core::range::TileSet;
use tactics_core::session::BattleSession;
use tactics_core::units::UnitId;

use crate::autopilot::Autopilot;
use crate::scenario::Scenario;

/// Hard stop so a stalled battle cannot spin forever.
const MAX_TICKS_PER_TURN: u64 = 1_000;

/// Presentation stand-in that keeps each enemy action "playing" for a fixed
/// number of ticks.
#[derive(Debug, Clone, Default)]
pub struct ScriptedHost {
    clock: PresentationClock,
    enemy_moves: u32,
    enemy_attacks: u32,
    outcome: Option<BattleOutcome>,
}

impl ScriptedHost {
    /// Host with `latency` ticks per enemy action.
    #[must_use]
    pub fn new(latency: u32) -> Self {
        Self {
            clock: PresentationClock::new(latency),
            ..Self::default()
        }
    }

    /// Advance the current presentation; `true` when it just finished.
    pub fn advance(&mut self) -> bool {
        self.clock.advance()
    }

    /// Outcome reported by the battle, if any.
    #[must_use]
    pub const fn outcome(&self) -> Option<BattleOutcome> {
        self.outcome
    }
}

impl BattleHost for ScriptedHost {
    fn publish_walkable(&mut self, player: UnitId, tiles: &TileSet) {
        tracing::trace!(player = player.0, count = tiles.len(), "Walkable tiles shown");
    }

    fn animate_enemy_move(&mut self, _enemy: UnitId, _from: TileId, _to: TileId) -> ActionStatus {
        self.enemy_moves += 1;
        self.clock.start()
    }

    fn animate_enemy_attack(&mut self, _enemy: UnitId, _target: Option<UnitId>) -> ActionStatus {
        self.enemy_attacks += 1;
        self.clock.start()
    }

    fn battle_finished(&mut self, outcome: BattleOutcome) {
        self.outcome = Some(outcome);
    }
}

/// A unit still standing when the run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurvivorSummary {
    /// Unit id.
    pub id: u32,
    /// Unit name.
    pub name: String,
    /// Remaining health.
    pub health: u32,
}

/// Result of one headless battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleSummary {
    /// Scenario name.
    pub scenario: String,
    /// Seed the battle ran with.
    pub seed: u64,
    /// How it ended, or `None` if the turn limit was hit first.
    pub outcome: Option<BattleOutcome>,
    /// Turns started.
    pub turns: u32,
    /// Ticks run.
    pub ticks: u64,
    /// Player health at the end.
    pub player_health: u32,
    /// Enemies spawned.
    pub enemies_spawned: usize,
    /// Enemies still alive.
    pub survivors: Vec<SurvivorSummary>,
    /// Enemy move presentations requested.
    pub enemy_moves: u32,
    /// Enemy attack presentations requested.
    pub enemy_attacks: u32,
}

/// Plays one scenario with the autopilot.
#[derive(Debug, Clone)]
pub struct HeadlessRunner {
    scenario: Scenario,
    max_turns: u32,
    latency: u32,
}

impl HeadlessRunner {
    /// Runner with a 50 turn limit and instant presentations.
    #[must_use]
    pub fn new(scenario: Scenario) -> Self {
        Self {
            scenario,
            max_turns: 50,
            latency: 0,
        }
    }

    /// Set the turn limit.
    #[must_use]
    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Set the per-action presentation latency in ticks.
    #[must_use]
    pub fn with_latency(mut self, latency: u32) -> Self {
        self.latency = latency;
        self
    }

    /// Build the battle without running it.
    pub fn setup(&self) -> Result<BattleSession<ScriptedHost>> {
        BattleSession::start(
            self.scenario.config.clone(),
            &self.scenario.encounter,
            ScriptedHost::new(self.latency),
        )
    }

    /// Play until the host is told the battle is over or the turn limit hits.
    pub fn run(&self) -> Result<BattleSummary> {
        let mut session = self.setup()?;
        let enemies_spawned = session.roster().enemies().count();

        tracing::info!(
            scenario = %self.scenario.name,
            seed = self.scenario.config.seed,
            enemies = enemies_spawned,
            "Battle started"
        );

        let tick_limit = u64::from(self.max_turns.max(1)) * MAX_TICKS_PER_TURN;
        while !session.is_finished() && session.turn() <= self.max_turns {
            if session.ticks() >= tick_limit {
                tracing::warn!(ticks = session.ticks(), "Tick limit reached");
                break;
            }
            self.step(&mut session)?;
        }

        let summary = self.summarize(&session, enemies_spawned);
        tracing::info!(
            outcome = ?summary.outcome,
            turns = summary.turns,
            ticks = summary.ticks,
            "Battle over"
        );
        Ok(summary)
    }

    fn step(&self, session: &mut BattleSession<ScriptedHost>) -> Result<()> {
        match session.phase() {
            Phase::PlayerToMove => {
                session.tick()?;
                if session.phase() == Phase::PlayerToMove {
                    let target = Autopilot
                        .choose_move(session)
                        .unwrap_or(session.roster().try_player()?.tile);
                    session.select_move_target(target)?;
                }
            }
            Phase::PlayerMoving => session.player_move_finished()?,
            Phase::PlayerToAttack => {
                let target = Autopilot.choose_attack(session);
                session.select_attack_target(target)?;
            }
            Phase::PlayerAttacking => session.player_attack_finished()?,
            Phase::EnemiesMoving | Phase::EnemiesAttacking | Phase::EndAnimation => {
                session.tick()?;
                if session.host_mut().advance() {
                    session.enemy_action_finished();
                }
            }
        }
        Ok(())
    }

    fn summarize(&self, session: &BattleSession<ScriptedHost>, enemies_spawned: usize) -> BattleSummary {
        let survivors = session
            .roster()
            .living_enemies()
            .map(|e| SurvivorSummary {
                id: e.id.0,
                name: e.name.clone(),
                health: e.health,
            })
            .collect();

        BattleSummary {
            scenario: self.scenario.name.clone(),
            seed: self.scenario.config.seed,
            outcome: session.host().outcome(),
            turns: session.turn(),
            ticks: session.ticks(),
            player_health: session.player().map_or(0, |p| p.health),
            enemies_spawned,
            survivors,
            enemy_moves: session.host().enemy_moves,
            enemy_attacks: session.host().enemy_attacks,
        }
    }
}
