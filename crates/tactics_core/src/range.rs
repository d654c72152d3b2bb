//! Range queries over the battle grid.
//!
//! Two queries drive the player's turn:
//!
//! - [`compute_walkable`] - a breadth-first flood over the neighbour links,
//!   bounded by Manhattan distance from the origin and blocked by occupied
//!   tiles.
//! - [`compute_attackable`] - a pure geometric filter over every tile by
//!   Manhattan distance bounds. Occupancy and reachability do not matter.
//!
//! Both fail fast on an origin that is not part of the grid; a missing origin
//! means the roster and the grid disagree, and an empty result would hide it.

use std::collections::{BTreeSet, HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::grid::{Grid, TileId};

/// Ordered set of tiles produced by a range query.
///
/// Iteration is in ascending [`TileId`] order so results are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSet {
    tiles: BTreeSet<TileId>,
}

impl TileSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tile. Returns `true` if it was not present.
    pub fn insert(&mut self, id: TileId) -> bool {
        self.tiles.insert(id)
    }

    /// Remove a tile. Removing an absent tile is a no-op and returns `false`.
    pub fn remove(&mut self, id: TileId) -> bool {
        self.tiles.remove(&id)
    }

    /// Check membership.
    #[must_use]
    pub fn contains(&self, id: TileId) -> bool {
        self.tiles.contains(&id)
    }

    /// Number of tiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Iterate in ascending tile order.
    pub fn iter(&self) -> impl Iterator<Item = TileId> + '_ {
        self.tiles.iter().copied()
    }
}

impl FromIterator<TileId> for TileSet {
    fn from_iter<I: IntoIterator<Item = TileId>>(iter: I) -> Self {
        Self {
            tiles: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a TileSet {
    type Item = TileId;
    type IntoIter = std::iter::Copied<std::collections::btree_set::Iter<'a, TileId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.tiles.iter().copied()
    }
}

/// Tiles a unit standing on `origin` can move to with `movement_range`.
///
/// A tile is included iff its Manhattan distance from `origin` is at most
/// `movement_range` and it can be reached through unoccupied tiles. The flood
/// stops expanding at tiles whose distance equals the range. The origin is
/// always visited even though its own unit occupies it.
pub fn compute_walkable(grid: &Grid, origin: TileId, movement_range: u32) -> Result<TileSet> {
    let origin_pos = grid.try_tile(origin)?.position();

    let mut walkable = TileSet::new();
    let mut seen: HashSet<TileId> = HashSet::new();
    let mut frontier: VecDeque<TileId> = VecDeque::new();
    frontier.push_back(origin);

    while let Some(id) = frontier.pop_front() {
        if !seen.insert(id) {
            continue;
        }

        let Some(tile) = grid.tile(id) else {
            continue;
        };

        if id != origin && tile.is_occupied() {
            continue;
        }

        let distance = origin_pos.manhattan_distance(tile.position());
        if distance <= movement_range {
            walkable.insert(id);
        }

        if distance < movement_range {
            frontier.extend(grid.neighbors(id).filter(|n| !seen.contains(n)));
        }
    }

    tracing::trace!(
        origin = origin.0,
        movement_range,
        count = walkable.len(),
        "Computed walkable tiles"
    );

    Ok(walkable)
}

/// Tiles a unit standing on `origin` can target.
///
/// Includes every tile `t` with `min_distance <= dist(origin, t) <= max_distance`,
/// except the origin itself.
pub fn compute_attackable(
    grid: &Grid,
    origin: TileId,
    min_distance: u32,
    max_distance: u32,
) -> Result<TileSet> {
    let origin_pos = grid.try_tile(origin)?.position();

    let attackable: TileSet = grid
        .tiles()
        .filter(|t| t.id() != origin)
        .filter(|t| {
            let distance = origin_pos.manhattan_distance(t.position());
            min_distance <= distance && distance <= max_distance
        })
        .map(|t| t.id())
        .collect();

    tracing::trace!(
        origin = origin.0,
        min_distance,
        max_distance,
        count = attackable.len(),
        "Computed attackable tiles"
    );

    Ok(attackable)
}
