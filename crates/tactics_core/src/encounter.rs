//! Encounter definitions.
//!
//! An encounter decides which enemies a battle starts with: either one group
//! picked at random from a pool, or a fixed archetype repeated a set number of
//! times (boss fights and scripted battles).

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::units::EnemyArchetype;

/// A set of enemies that always appear together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyGroup {
    /// Group name for logs.
    pub name: String,
    /// Enemies spawned, in spawn order.
    pub members: Vec<EnemyArchetype>,
}

/// Source of a battle's enemies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Encounter {
    /// Pick one group uniformly at random.
    RandomPool(Vec<EnemyGroup>),
    /// Spawn `count` copies of one archetype.
    Predefined {
        /// Archetype to copy.
        archetype: EnemyArchetype,
        /// Number of copies.
        count: u32,
    },
}

impl Encounter {
    /// Decide the enemies to spawn, in spawn order.
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<EnemyArchetype> {
        match self {
            Self::RandomPool(groups) => {
                if groups.is_empty() {
                    return Vec::new();
                }
                let group = &groups[rng.gen_range(0..groups.len())];
                tracing::debug!(group = %group.name, size = group.members.len(), "Rolled encounter group");
                group.members.clone()
            }
            Self::Predefined { archetype, count } => {
                (0..*count).map(|_| archetype.clone()).collect()
            }
        }
    }
}
