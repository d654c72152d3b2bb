//! Unit roster.
//!
//! Owns the player unit and the enemies in spawn order. Spawn order is the
//! order enemy phases process units in.

use serde::{Deserialize, Serialize};

use crate::error::{BattleError, Result};
use crate::units::{Unit, UnitId};

/// Every unit taking part in a battle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Roster {
    player: Option<Unit>,
    enemies: Vec<Unit>,
    next_id: u32,
}

impl Roster {
    /// Create an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self {
            player: None,
            enemies: Vec::new(),
            next_id: 1,
        }
    }

    /// Reserve the next unit identifier.
    pub fn allocate_id(&mut self) -> UnitId {
        let id = UnitId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        id
    }

    /// Install the player unit, replacing any previous one.
    pub fn set_player(&mut self, unit: Unit) {
        self.player = Some(unit);
    }

    /// The player unit, if spawned.
    #[must_use]
    pub fn player(&self) -> Option<&Unit> {
        self.player.as_ref()
    }

    /// Mutable player unit.
    pub fn player_mut(&mut self) -> Option<&mut Unit> {
        self.player.as_mut()
    }

    /// The player unit, failing with [`BattleError::PlayerNotSpawned`].
    pub fn try_player(&self) -> Result<&Unit> {
        self.player().ok_or(BattleError::PlayerNotSpawned)
    }

    /// Append an enemy. Insertion order is preserved.
    pub fn register_enemy(&mut self, unit: Unit) {
        self.enemies.push(unit);
    }

    /// Enemy by id.
    #[must_use]
    pub fn enemy(&self, id: UnitId) -> Option<&Unit> {
        self.enemies.iter().find(|u| u.id == id)
    }

    /// Mutable enemy by id.
    pub fn enemy_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.enemies.iter_mut().find(|u| u.id == id)
    }

    /// Any unit by id.
    #[must_use]
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        match &self.player {
            Some(p) if p.id == id => Some(p),
            _ => self.enemy(id),
        }
    }

    /// All enemies in roster order, dead or alive.
    pub fn enemies(&self) -> impl Iterator<Item = &Unit> {
        self.enemies.iter()
    }

    /// Living enemies in roster order.
    pub fn living_enemies(&self) -> impl Iterator<Item = &Unit> {
        self.enemies.iter().filter(|u| u.is_alive())
    }

    /// Ids of living enemies in roster order.
    #[must_use]
    pub fn living_enemy_ids(&self) -> Vec<UnitId> {
        self.living_enemies().map(|u| u.id).collect()
    }

    /// Number of living enemies.
    #[must_use]
    pub fn living_enemy_count(&self) -> usize {
        self.living_enemies().count()
    }

    /// Remove an enemy from the roster, returning it.
    pub fn remove_enemy(&mut self, id: UnitId) -> Option<Unit> {
        let index = self.enemies.iter().position(|u| u.id == id)?;
        Some(self.enemies.remove(index))
    }
}
