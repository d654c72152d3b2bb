//! Battle session.
//!
//! The session owns everything a battle needs: the grid, the roster, the
//! enemy spawn pool, the two enemy queues and the host collaborator. The host
//! drives it with [`BattleSession::tick`] once per frame and reports player
//! input and finished presentations through the callback methods.
//!
//! # Turn flow
//!
//! 1. **PlayerToMove** - the walkable set is computed once for the player's
//!    tile and published; the host answers with [`select_move_target`].
//! 2. **PlayerMoving** - waits for [`player_move_finished`]; the attackable
//!    set is then published.
//! 3. **PlayerToAttack** - waits for [`select_attack_target`].
//! 4. **PlayerAttacking** - waits for [`player_attack_finished`]; damage is
//!    resolved and the move queue is armed.
//! 5. **EnemiesMoving** / **EnemiesAttacking** - one enemy per tick, gated
//!    on the host finishing each presentation.
//!
//! # Example
//!
//! ```
//! use tactics_core::config::BattleConfig;
//! use tactics_core::encounter::Encounter;
//! use tactics_core::host::NullHost;
//! use tactics_core::phase::Phase;
//! use tactics_core::session::BattleSession;
//! use tactics_core::units::{EnemyArchetype, EnemyScript, UnitStats};
//!
//! let encounter = Encounter::Predefined {
//!     archetype: EnemyArchetype::new("slime", UnitStats::default(), EnemyScript::Hold),
//!     count: 2,
//! };
//! let mut battle = BattleSession::start(BattleConfig::default(), &encounter, NullHost).unwrap();
//! assert_eq!(battle.phase(), Phase::PlayerToMove);
//! assert!(!battle.walkable().is_empty());
//!
//! let stay = battle.player().unwrap().tile;
//! battle.select_move_target(stay).unwrap();
//! battle.player_move_finished().unwrap();
//! battle.select_attack_target(None).unwrap();
//! battle.player_attack_finished().unwrap();
//! assert_eq!(battle.phase(), Phase::EnemiesMoving);
//!
//! battle.tick().unwrap();
//! battle.tick().unwrap();
//! assert_eq!(battle.phase(), Phase::EnemiesAttacking);
//! ```
//!
//! [`select_move_target`]: BattleSession::select_move_target
//! [`player_move_finished`]: BattleSession::player_move_finished
//! [`select_attack_target`]: BattleSession::select_attack_target
//! [`player_attack_finished`]: BattleSession::player_attack_finished

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::BattleConfig;
use crate::encounter::Encounter;
use crate::enemy_queue::{EnemyQueue, QueueStep};
use crate::error::{BattleError, Result};
use crate::events::{AttackEvent, PhaseChange, TickEvents, UnitMove};
use crate::grid::{Grid, Position, TileId, TileStatus};
use crate::host::{ActionStatus, BattleHost, BattleOutcome, NullHost};
use crate::phase::Phase;
use crate::range::{compute_attackable, compute_walkable, TileSet};
use crate::roster::Roster;
use crate::spawn::{pick_player_tile, SpawnPool};
use crate::units::{EnemyArchetype, EnemyScript, Unit, UnitId, UnitStats};

/// A running battle.
#[derive(Debug)]
pub struct BattleSession<H: BattleHost = NullHost> {
    config: BattleConfig,
    grid: Grid,
    roster: Roster,
    spawn_pool: SpawnPool,
    rng: ChaCha8Rng,
    phase: Phase,
    turn: u32,
    ticks: u64,
    move_queue: EnemyQueue,
    attack_queue: EnemyQueue,
    walkable: TileSet,
    walkable_origin: Option<TileId>,
    attackable: TileSet,
    pending_attack: Option<TileId>,
    outcome: Option<BattleOutcome>,
    end_countdown: Option<u32>,
    finished: bool,
    events: TickEvents,
    host: H,
}

impl<H: BattleHost> BattleSession<H> {
    /// Build the field and spawn region. No units are placed yet.
    pub fn new(config: BattleConfig, host: H) -> Result<Self> {
        config.validate()?;

        let mut grid = Grid::new(config.field_width, config.field_height);
        grid.reset_all();
        let spawn_pool = SpawnPool::enemy_region(&grid, config.enemy_spawn_width);
        let rng = ChaCha8Rng::seed_from_u64(config.seed);

        tracing::debug!(
            width = config.field_width,
            height = config.field_height,
            spawn_tiles = spawn_pool.remaining(),
            seed = config.seed,
            "Battle field built"
        );

        Ok(Self {
            config,
            grid,
            roster: Roster::new(),
            spawn_pool,
            rng,
            phase: Phase::PlayerToMove,
            turn: 1,
            ticks: 0,
            move_queue: EnemyQueue::new(),
            attack_queue: EnemyQueue::new(),
            walkable: TileSet::new(),
            walkable_origin: None,
            attackable: TileSet::new(),
            pending_attack: None,
            outcome: None,
            end_countdown: None,
            finished: false,
            events: TickEvents::default(),
            host,
        })
    }

    /// Build the field, spawn the player and the encounter, and run the first
    /// update so the player's walkable set is published.
    pub fn start(config: BattleConfig, encounter: &Encounter, host: H) -> Result<Self> {
        let mut session = Self::new(config, host)?;
        session.spawn_player()?;
        session.spawn_encounter(encounter)?;
        session.update_battle()?;
        Ok(session)
    }

    // ------------------------------------------------------------------
    // Spawning
    // ------------------------------------------------------------------

    /// Place the player on a random tile of the player spawn columns.
    ///
    /// Calling this again returns the existing player.
    pub fn spawn_player(&mut self) -> Result<UnitId> {
        if let Some(player) = self.roster.player() {
            return Ok(player.id);
        }

        let tile = pick_player_tile(&self.grid, self.config.player_spawn_width, &mut self.rng)?;
        let id = self.roster.allocate_id();
        self.grid.place(id, tile)?;
        self.roster
            .set_player(Unit::player(id, tile, self.config.player));

        tracing::debug!(unit = id.0, tile = tile.0, "Player spawned");
        Ok(id)
    }

    /// Place the player on a fixed tile, for scripted battles.
    pub fn spawn_player_at(&mut self, position: Position) -> Result<UnitId> {
        if let Some(player) = self.roster.player() {
            return Ok(player.id);
        }

        let tile = self.grid.id_at(position)?;
        let id = self.roster.allocate_id();
        self.grid.place(id, tile)?;
        self.roster
            .set_player(Unit::player(id, tile, self.config.player));

        tracing::debug!(unit = id.0, tile = tile.0, "Player placed");
        Ok(id)
    }

    /// Spawn every enemy the encounter rolls, stopping early when the spawn
    /// pool runs out.
    pub fn spawn_encounter(&mut self, encounter: &Encounter) -> Result<Vec<UnitId>> {
        let archetypes = encounter.roll(&mut self.rng);
        let mut spawned = Vec::with_capacity(archetypes.len());

        for archetype in &archetypes {
            if !self.can_spawn_enemy() {
                tracing::warn!(
                    requested = archetypes.len(),
                    spawned = spawned.len(),
                    "Enemy spawn pool exhausted"
                );
                break;
            }
            let position = self.new_enemy_spawn_position()?;
            spawned.push(self.register_enemy(archetype, position)?);
        }

        Ok(spawned)
    }

    /// Whether the enemy spawn pool has tiles left.
    #[must_use]
    pub fn can_spawn_enemy(&self) -> bool {
        self.spawn_pool.can_spawn()
    }

    /// Take a random tile out of the enemy spawn pool.
    pub fn new_enemy_spawn_position(&mut self) -> Result<Position> {
        let tile = self.spawn_pool.take_random(&mut self.rng)?;
        self.grid
            .position(tile)
            .ok_or(BattleError::TileOutOfBounds(tile))
    }

    /// Add an enemy to the roster at `position`.
    ///
    /// Enemies act in the order they were registered.
    pub fn register_enemy(&mut self, archetype: &EnemyArchetype, position: Position) -> Result<UnitId> {
        let tile = self.grid.id_at(position)?;
        if self.grid.is_occupied(tile) {
            return Err(BattleError::TileOccupied(tile));
        }

        let id = self.roster.allocate_id();
        self.grid.place(id, tile)?;
        self.spawn_pool.withdraw(tile);
        self.roster.register_enemy(Unit::enemy(id, tile, archetype));
        self.walkable_origin = None;

        tracing::debug!(
            unit = id.0,
            name = %archetype.name,
            x = position.x,
            y = position.y,
            "Enemy registered"
        );
        Ok(id)
    }

    // ------------------------------------------------------------------
    // Tick
    // ------------------------------------------------------------------

    /// Advance the battle by one step.
    ///
    /// Returns every event produced since the previous tick, including those
    /// raised by input callbacks.
    pub fn tick(&mut self) -> Result<TickEvents> {
        self.ticks += 1;
        self.check_decided();
        self.update_battle()?;
        self.run_end_countdown();
        Ok(std::mem::take(&mut self.events))
    }

    /// Dispatch to the current phase's handler.
    fn update_battle(&mut self) -> Result<()> {
        match self.phase {
            Phase::PlayerToMove => self.prepare_player_move(),
            Phase::PlayerMoving | Phase::PlayerToAttack | Phase::PlayerAttacking => Ok(()),
            Phase::EnemiesMoving => self.move_enemies(),
            Phase::EnemiesAttacking => self.attack_of_enemies(),
            Phase::EndAnimation => Ok(()),
        }
    }

    fn prepare_player_move(&mut self) -> Result<()> {
        let Some(player) = self.roster.player() else {
            return Ok(());
        };
        if self.walkable_origin == Some(player.tile) {
            return Ok(());
        }
        let (id, tile, movement) = (player.id, player.tile, player.stats.movement);

        let walkable = compute_walkable(&self.grid, tile, movement)?;
        self.grid.reset_all();
        self.grid.mark(&walkable, TileStatus::WALKABLE);
        self.host.publish_walkable(id, &walkable);

        tracing::debug!(
            turn = self.turn,
            tile = tile.0,
            count = walkable.len(),
            "Published walkable tiles"
        );

        self.walkable = walkable;
        self.walkable_origin = Some(tile);
        Ok(())
    }

    fn move_enemies(&mut self) -> Result<()> {
        match self.move_queue.step() {
            QueueStep::Idle => {}
            QueueStep::Completed => self.finish_enemy_moves(),
            QueueStep::Act(unit) => {
                let status = self.run_enemy_move(unit)?;
                if self.phase != Phase::EnemiesMoving {
                    return Ok(());
                }
                self.move_queue.settle(status);
                if self.move_queue.try_complete() {
                    self.finish_enemy_moves();
                }
            }
        }
        Ok(())
    }

    fn finish_enemy_moves(&mut self) {
        self.set_phase(Phase::EnemiesAttacking);
        let living = self.roster.living_enemy_ids();
        self.attack_queue.arm(&living);
    }

    fn attack_of_enemies(&mut self) -> Result<()> {
        match self.attack_queue.step() {
            QueueStep::Idle => {}
            QueueStep::Completed => self.finish_enemy_attacks(),
            QueueStep::Act(unit) => {
                let status = self.run_enemy_attack(unit)?;
                if self.phase != Phase::EnemiesAttacking {
                    return Ok(());
                }
                self.attack_queue.settle(status);
                if self.attack_queue.try_complete() {
                    self.finish_enemy_attacks();
                }
            }
        }
        Ok(())
    }

    fn finish_enemy_attacks(&mut self) {
        self.turn += 1;
        self.set_phase(Phase::PlayerToMove);
        tracing::info!(turn = self.turn, "New turn");
    }

    // ------------------------------------------------------------------
    // Enemy scripts
    // ------------------------------------------------------------------

    fn run_enemy_move(&mut self, unit: UnitId) -> Result<ActionStatus> {
        let Some(enemy) = self.roster.enemy(unit).filter(|u| u.is_alive()) else {
            tracing::debug!(unit = unit.0, "Skipping move of fallen enemy");
            return Ok(ActionStatus::Done);
        };
        let (from, stats, script) = (enemy.tile, enemy.stats, enemy.script);

        let to = match script {
            EnemyScript::Hold => from,
            EnemyScript::Advance => self.advance_destination(from, &stats)?,
        };

        self.grid.relocate(unit, from, to)?;
        if let Some(enemy) = self.roster.enemy_mut(unit) {
            enemy.tile = to;
        }
        self.events.moves.push(UnitMove { unit, from, to });

        tracing::debug!(unit = unit.0, from = from.0, to = to.0, "Enemy moved");
        Ok(self.host.animate_enemy_move(unit, from, to))
    }

    /// Reachable tile with the best attack position against the player.
    ///
    /// Prefers tiles whose distance to the player falls inside the attack
    /// band, then staying put, then the lowest tile id.
    fn advance_destination(&self, from: TileId, stats: &UnitStats) -> Result<TileId> {
        let Some(target) = self
            .roster
            .player()
            .filter(|p| p.is_alive())
            .and_then(|p| self.grid.position(p.tile))
        else {
            return Ok(from);
        };

        let walkable = compute_walkable(&self.grid, from, stats.movement)?;
        let best = walkable.iter().min_by_key(|&tile| {
            let distance = self
                .grid
                .position(tile)
                .map_or(u32::MAX, |p| p.manhattan_distance(target));
            let off_band = if distance < stats.min_distance {
                stats.min_distance - distance
            } else {
                distance.saturating_sub(stats.max_distance)
            };
            (off_band, tile != from, tile.0)
        });

        Ok(best.unwrap_or(from))
    }

    fn run_enemy_attack(&mut self, unit: UnitId) -> Result<ActionStatus> {
        let Some(enemy) = self.roster.enemy(unit).filter(|u| u.is_alive()) else {
            tracing::debug!(unit = unit.0, "Skipping attack of fallen enemy");
            return Ok(ActionStatus::Done);
        };
        let (tile, stats) = (enemy.tile, enemy.stats);

        let in_range = compute_attackable(&self.grid, tile, stats.min_distance, stats.max_distance)?;
        let target = self
            .roster
            .player()
            .filter(|p| p.is_alive() && in_range.contains(p.tile))
            .map(|p| (p.id, p.tile));

        if let Some((player_id, player_tile)) = target {
            self.events.attacks.push(AttackEvent {
                attacker: unit,
                tile: player_tile,
                target: Some(player_id),
                damage: stats.damage,
            });

            let killed = self
                .roster
                .player_mut()
                .is_some_and(|p| p.take_damage(stats.damage));

            tracing::debug!(
                unit = unit.0,
                damage = stats.damage,
                killed,
                "Enemy attacked player"
            );

            if killed {
                self.grid.vacate(player_tile);
                self.events.deaths.push(player_id);
            }
        }

        let status = self
            .host
            .animate_enemy_attack(unit, target.map(|(id, _)| id));
        self.check_decided();
        Ok(status)
    }

    // ------------------------------------------------------------------
    // Player input
    // ------------------------------------------------------------------

    fn require_phase(&self, required: Phase, to: Phase) -> Result<()> {
        if self.phase == required {
            Ok(())
        } else {
            Err(BattleError::InvalidPhaseTransition {
                from: self.phase,
                to,
            })
        }
    }

    /// The player picked a destination from the walkable set.
    pub fn select_move_target(&mut self, tile: TileId) -> Result<()> {
        self.require_phase(Phase::PlayerToMove, Phase::PlayerMoving)?;
        self.roster.try_player()?;
        self.prepare_player_move()?;

        if !self.walkable.contains(tile) {
            return Err(BattleError::TargetNotWalkable(tile));
        }

        let player = self.roster.try_player()?;
        let (id, from) = (player.id, player.tile);
        self.grid.relocate(id, from, tile)?;
        if let Some(player) = self.roster.player_mut() {
            player.tile = tile;
        }
        self.events.moves.push(UnitMove {
            unit: id,
            from,
            to: tile,
        });

        tracing::debug!(from = from.0, to = tile.0, "Player moving");
        self.set_phase(Phase::PlayerMoving);
        Ok(())
    }

    /// The host finished presenting the player's move.
    pub fn player_move_finished(&mut self) -> Result<()> {
        self.require_phase(Phase::PlayerMoving, Phase::PlayerToAttack)?;

        let player = self.roster.try_player()?;
        let (id, tile, stats) = (player.id, player.tile, player.stats);

        let attackable = compute_attackable(&self.grid, tile, stats.min_distance, stats.max_distance)?;
        self.set_phase(Phase::PlayerToAttack);
        self.grid.reset_all();
        self.grid.mark(&attackable, TileStatus::PLAYER_ATTACKABLE);
        self.host.publish_attackable(id, &attackable);

        tracing::debug!(
            tile = tile.0,
            count = attackable.len(),
            "Published attackable tiles"
        );
        self.attackable = attackable;
        Ok(())
    }

    /// The player picked a target, or `None` to skip attacking.
    pub fn select_attack_target(&mut self, target: Option<TileId>) -> Result<()> {
        self.require_phase(Phase::PlayerToAttack, Phase::PlayerAttacking)?;

        if let Some(tile) = target {
            if !self.attackable.contains(tile) {
                return Err(BattleError::TargetNotAttackable(tile));
            }
        }

        self.pending_attack = target;
        self.set_phase(Phase::PlayerAttacking);
        Ok(())
    }

    /// The host finished presenting the player's attack; resolve its damage
    /// and hand the turn to the enemies.
    pub fn player_attack_finished(&mut self) -> Result<()> {
        self.require_phase(Phase::PlayerAttacking, Phase::EnemiesMoving)?;

        if let Some(tile) = self.pending_attack.take() {
            self.resolve_player_attack(tile)?;
        }

        self.grid.reset_all();
        self.walkable = TileSet::new();
        self.attackable = TileSet::new();

        self.check_decided();
        if self.phase == Phase::EndAnimation {
            return Ok(());
        }

        self.set_phase(Phase::EnemiesMoving);
        let living = self.roster.living_enemy_ids();
        self.move_queue.arm(&living);
        Ok(())
    }

    fn resolve_player_attack(&mut self, tile: TileId) -> Result<()> {
        let player = self.roster.try_player()?;
        let (attacker, damage) = (player.id, player.stats.damage);

        let target = self
            .grid
            .occupant(tile)
            .filter(|&id| self.roster.enemy(id).is_some());

        self.events.attacks.push(AttackEvent {
            attacker,
            tile,
            target,
            damage: if target.is_some() { damage } else { 0 },
        });

        let Some(enemy_id) = target else {
            tracing::debug!(tile = tile.0, "Player attack hit nothing");
            return Ok(());
        };

        let killed = self
            .roster
            .enemy_mut(enemy_id)
            .is_some_and(|e| e.take_damage(damage));

        tracing::debug!(unit = enemy_id.0, damage, killed, "Player attacked enemy");

        if killed {
            self.grid.vacate(tile);
            self.roster.remove_enemy(enemy_id);
            self.events.deaths.push(enemy_id);
            tracing::info!(
                unit = enemy_id.0,
                remaining = self.roster.living_enemy_count(),
                "Enemy defeated"
            );
        }
        Ok(())
    }

    /// The host finished presenting an enemy action that returned
    /// [`ActionStatus::InProgress`].
    ///
    /// Returns `false` if no action was waiting.
    pub fn enemy_action_finished(&mut self) -> bool {
        match self.phase {
            Phase::EnemiesMoving => self.move_queue.resume(),
            Phase::EnemiesAttacking => self.attack_queue.resume(),
            _ => false,
        }
    }

    // ------------------------------------------------------------------
    // Phases and battle end
    // ------------------------------------------------------------------

    fn set_phase(&mut self, to: Phase) {
        let from = self.phase;
        assert!(
            from.can_transition_to(to),
            "illegal phase transition {from:?} -> {to:?}"
        );

        if from == Phase::PlayerToMove {
            self.walkable_origin = None;
        }
        self.phase = to;
        self.events.phase_changes.push(PhaseChange { from, to });
        tracing::info!(turn = self.turn, %from, %to, "Phase changed");
    }

    fn decide_outcome(&self) -> Option<BattleOutcome> {
        let player = self.roster.player()?;
        if !player.is_alive() {
            Some(BattleOutcome::Defeat)
        } else if self.roster.living_enemy_count() == 0 {
            Some(BattleOutcome::Victory)
        } else {
            None
        }
    }

    fn check_decided(&mut self) {
        if self.outcome.is_some() {
            return;
        }
        let Some(outcome) = self.decide_outcome() else {
            return;
        };

        tracing::info!(?outcome, turn = self.turn, "Battle decided");
        self.outcome = Some(outcome);
        self.move_queue.clear();
        self.attack_queue.clear();
        self.grid.reset_all();
        self.set_phase(Phase::EndAnimation);
        self.end_countdown = Some(self.config.end_delay_ticks);
    }

    fn run_end_countdown(&mut self) {
        let (Some(remaining), Some(outcome)) = (self.end_countdown, self.outcome) else {
            return;
        };
        if remaining > 0 {
            self.end_countdown = Some(remaining - 1);
            return;
        }

        self.end_countdown = None;
        self.finished = true;
        self.events.battle_end = Some(outcome);
        self.host.battle_finished(outcome);
        tracing::info!(?outcome, ticks = self.ticks, "Battle finished");
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Configuration the battle was built from.
    #[must_use]
    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    /// The battle field.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// All units.
    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// The player unit, once spawned.
    #[must_use]
    pub fn player(&self) -> Option<&Unit> {
        self.roster.player()
    }

    /// Current phase, for input gating.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Current turn, starting at 1.
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// Number of ticks run.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// The player's walkable set for this turn.
    #[must_use]
    pub fn walkable(&self) -> &TileSet {
        &self.walkable
    }

    /// The player's attackable set for this turn.
    #[must_use]
    pub fn attackable(&self) -> &TileSet {
        &self.attackable
    }

    /// Queue driving the enemy move phase.
    #[must_use]
    pub fn move_queue(&self) -> &EnemyQueue {
        &self.move_queue
    }

    /// Queue driving the enemy attack phase.
    #[must_use]
    pub fn attack_queue(&self) -> &EnemyQueue {
        &self.attack_queue
    }

    /// Remaining enemy spawn tiles.
    #[must_use]
    pub fn spawn_pool(&self) -> &SpawnPool {
        &self.spawn_pool
    }

    /// Outcome once decided (before the end delay elapses).
    #[must_use]
    pub const fn outcome(&self) -> Option<BattleOutcome> {
        self.outcome
    }

    /// Whether the host has been told the battle is over.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// The host collaborator.
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable host collaborator.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Tear the session down and hand the host back.
    pub fn into_host(self) -> H {
        self.host
    }
}
