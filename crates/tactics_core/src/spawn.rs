//! Spawn regions.
//!
//! The player spawns somewhere in the leftmost columns of the field; enemies
//! spawn in the rightmost columns. Because the grid is column-major, both
//! regions are contiguous runs of tile indices.

use rand::Rng;

use crate::error::{BattleError, Result};
use crate::grid::{Grid, TileId};

/// Tiles in the first `columns` columns.
#[must_use]
pub fn player_spawn_tiles(grid: &Grid, columns: u32) -> Vec<TileId> {
    let columns = columns.min(grid.width());
    (0..columns * grid.height()).map(TileId).collect()
}

/// Pick a uniformly random unoccupied tile from the player's spawn columns.
pub fn pick_player_tile<R: Rng + ?Sized>(grid: &Grid, columns: u32, rng: &mut R) -> Result<TileId> {
    let candidates: Vec<TileId> = player_spawn_tiles(grid, columns)
        .into_iter()
        .filter(|&t| !grid.is_occupied(t))
        .collect();
    if candidates.is_empty() {
        return Err(BattleError::NoSpawnSpaceAvailable);
    }
    Ok(candidates[rng.gen_range(0..candidates.len())])
}

/// Pool of tiles reserved for enemy spawns.
///
/// Tiles are consumed one at a time and never return to the pool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpawnPool {
    tiles: Vec<TileId>,
}

impl SpawnPool {
    /// Reserve the last `columns` columns of the grid.
    #[must_use]
    pub fn enemy_region(grid: &Grid, columns: u32) -> Self {
        let columns = columns.min(grid.width());
        let first = (grid.width() - columns) * grid.height();
        let end = grid.width() * grid.height();
        Self {
            tiles: (first..end).map(TileId).collect(),
        }
    }

    /// Build a pool from an explicit tile list.
    #[must_use]
    pub fn from_tiles(tiles: Vec<TileId>) -> Self {
        Self { tiles }
    }

    /// Whether at least one tile remains.
    #[must_use]
    pub fn can_spawn(&self) -> bool {
        !self.tiles.is_empty()
    }

    /// Tiles left in the pool.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.tiles.len()
    }

    /// Whether `id` is still available.
    #[must_use]
    pub fn contains(&self, id: TileId) -> bool {
        self.tiles.contains(&id)
    }

    /// Remove and return a uniformly random tile.
    pub fn take_random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<TileId> {
        if self.tiles.is_empty() {
            return Err(BattleError::NoSpawnSpaceAvailable);
        }
        let index = rng.gen_range(0..self.tiles.len());
        Ok(self.tiles.remove(index))
    }

    /// Withdraw a specific tile. A no-op when it is not in the pool.
    pub fn withdraw(&mut self, id: TileId) -> bool {
        match self.tiles.iter().position(|&t| t == id) {
            Some(index) => {
                self.tiles.remove(index);
                true
            }
            None => false,
        }
    }
}
