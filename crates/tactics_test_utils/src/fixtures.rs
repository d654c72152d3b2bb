//! Test fixtures and helpers.
//!
//! Pre-built archetypes and battle layouts for consistent testing.

use tactics_core::config::BattleConfig;
use tactics_core::encounter::Encounter;
use tactics_core::error::Result;
use tactics_core::events::TickEvents;
use tactics_core::grid::Position;
use tactics_core::host::BattleHost;
use tactics_core::phase::Phase;
use tactics_core::session::BattleSession;
use tactics_core::units::{EnemyArchetype, EnemyScript, UnitId, UnitStats};

use crate::host::RecordingHost;

/// Enemy that never moves and dies to one hit.
#[must_use]
pub fn sentry() -> EnemyArchetype {
    EnemyArchetype::new(
        "sentry",
        UnitStats {
            max_health: 1,
            movement: 2,
            min_distance: 1,
            max_distance: 1,
            damage: 1,
        },
        EnemyScript::Hold,
    )
}

/// Melee enemy that walks toward the player.
#[must_use]
pub fn grunt() -> EnemyArchetype {
    EnemyArchetype::new(
        "grunt",
        UnitStats {
            max_health: 6,
            movement: 2,
            min_distance: 1,
            max_distance: 1,
            damage: 4,
        },
        EnemyScript::Advance,
    )
}

/// Stationary enemy that kills the player in one hit.
#[must_use]
pub fn executioner() -> EnemyArchetype {
    EnemyArchetype::new(
        "executioner",
        UnitStats {
            max_health: 50,
            movement: 0,
            min_distance: 1,
            max_distance: 1,
            damage: 1000,
        },
        EnemyScript::Hold,
    )
}

/// Parse an encounter from RON, panicking on bad test data.
///
/// # Panics
///
/// Panics if `source` is not a valid encounter.
#[must_use]
pub fn encounter_from_ron(source: &str) -> Encounter {
    ron::from_str(source).unwrap_or_else(|e| panic!("bad encounter fixture: {e}"))
}

/// Lays out a battle with fixed positions instead of random spawns.
#[derive(Debug, Clone)]
pub struct BattleBuilder {
    config: BattleConfig,
    player: Position,
    enemies: Vec<(EnemyArchetype, Position)>,
}

impl Default for BattleBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BattleBuilder {
    /// Default 8x8 field, no end delay, player at the origin.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: BattleConfig::default().with_end_delay(0),
            player: Position::new(0, 0),
            enemies: Vec::new(),
        }
    }

    /// Replace the configuration.
    #[must_use]
    pub fn config(mut self, config: BattleConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the end-of-battle delay.
    #[must_use]
    pub fn end_delay(mut self, ticks: u32) -> Self {
        self.config.end_delay_ticks = ticks;
        self
    }

    /// Place the player.
    #[must_use]
    pub fn player_at(mut self, x: i32, y: i32) -> Self {
        self.player = Position::new(x, y);
        self
    }

    /// Add an enemy. Enemies act in the order added.
    #[must_use]
    pub fn enemy(mut self, archetype: EnemyArchetype, x: i32, y: i32) -> Self {
        self.enemies.push((archetype, Position::new(x, y)));
        self
    }

    /// Build with the given host and run the first tick.
    ///
    /// # Panics
    ///
    /// Panics if a unit lands outside the field or on an occupied tile.
    #[must_use]
    pub fn build_with<H: BattleHost>(self, host: H) -> BattleSession<H> {
        let mut session = BattleSession::new(self.config, host).expect("valid battle config");
        session.spawn_player_at(self.player).expect("player placement");
        for (archetype, position) in &self.enemies {
            session
                .register_enemy(archetype, *position)
                .expect("enemy placement");
        }
        session.tick().expect("first tick");
        session
    }

    /// Build with a [`RecordingHost`].
    #[must_use]
    pub fn build(self) -> BattleSession<RecordingHost> {
        self.build_with(RecordingHost::new())
    }
}

/// Tick once, then let the host's presentation advance and report completion.
pub fn step(session: &mut BattleSession<RecordingHost>) -> Result<TickEvents> {
    let events = session.tick()?;
    if session.host_mut().advance() {
        session.enemy_action_finished();
    }
    Ok(events)
}

/// Stay in place and skip the attack.
pub fn pass_turn<H: BattleHost>(session: &mut BattleSession<H>) -> Result<()> {
    let stay = session.roster().try_player()?.tile;
    session.select_move_target(stay)?;
    session.player_move_finished()?;
    session.select_attack_target(None)?;
    session.player_attack_finished()
}

/// Step until the player is asked to move again or the battle is decided.
///
/// Returns the number of ticks taken.
///
/// # Panics
///
/// Panics if that does not happen within `max_ticks`.
pub fn run_enemy_turn(session: &mut BattleSession<RecordingHost>, max_ticks: u32) -> Result<u32> {
    for taken in 1..=max_ticks {
        step(session)?;
        if matches!(session.phase(), Phase::PlayerToMove | Phase::EndAnimation) {
            return Ok(taken);
        }
    }
    panic!("enemy turn did not end within {max_ticks} ticks");
}

/// Living enemy ids in roster order.
#[must_use]
pub fn living_enemies<H: BattleHost>(session: &BattleSession<H>) -> Vec<UnitId> {
    session.roster().living_enemy_ids()
}
