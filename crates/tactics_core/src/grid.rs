//! Battle field grid.
//!
//! The grid is a fixed W×H block of tiles laid out column-major
//! (`index = x * height + y`). Every tile carries non-owning links to its four
//! neighbours, a set of transient status marks and an optional occupant.
//! Tiles are created once when the grid is built and never move or resize.

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::error::{BattleError, Result};
use crate::range::TileSet;
use crate::units::UnitId;

/// Linear index of a tile inside its [`Grid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileId(pub u32);

impl TileId {
    /// Index into the grid's tile storage.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tile#{}", self.0)
    }
}

/// Integer grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    /// Column, growing to the right.
    pub x: i32,
    /// Row, growing upwards.
    pub y: i32,
}

impl Position {
    /// Create a position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan (taxicab) distance, the only metric the battle uses.
    #[must_use]
    pub const fn manhattan_distance(self, other: Self) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the four neighbour directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Towards `y + 1`.
    Up,
    /// Towards `y - 1`.
    Down,
    /// Towards `x - 1`.
    Left,
    /// Towards `x + 1`.
    Right,
}

impl Direction {
    /// All directions in link order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// The direction pointing back.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    const fn slot(self) -> usize {
        match self {
            Self::Up => 0,
            Self::Down => 1,
            Self::Left => 2,
            Self::Right => 3,
        }
    }
}

bitflags! {
    /// Status of a tile as seen by the input and presentation layers.
    ///
    /// `WALKABLE` and `PLAYER_ATTACKABLE` are marks published from the latest
    /// range query. `OCCUPIED` is never stored; it is derived from the
    /// tile's occupant whenever [`Grid::status`] is read.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TileStatus: u8 {
        /// The player can move here this turn.
        const WALKABLE = 1 << 0;
        /// The player can target this tile this turn.
        const PLAYER_ATTACKABLE = 1 << 1;
        /// A unit stands on this tile.
        const OCCUPIED = 1 << 2;
    }
}

impl TileStatus {
    /// Marks that [`Grid::reset_all`] clears.
    pub const TRANSIENT: Self = Self::WALKABLE.union(Self::PLAYER_ATTACKABLE);
}

/// A single cell of the battle field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    id: TileId,
    position: Position,
    neighbors: [Option<TileId>; 4],
    marks: TileStatus,
    occupant: Option<UnitId>,
}

impl Tile {
    fn new(id: TileId, position: Position) -> Self {
        Self {
            id,
            position,
            neighbors: [None; 4],
            marks: TileStatus::empty(),
            occupant: None,
        }
    }

    /// This tile's identifier.
    #[must_use]
    pub const fn id(&self) -> TileId {
        self.id
    }

    /// Grid coordinates of this tile.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Neighbour in the given direction, `None` on the field edge.
    #[must_use]
    pub const fn neighbor(&self, direction: Direction) -> Option<TileId> {
        self.neighbors[direction.slot()]
    }

    /// Unit standing on this tile.
    #[must_use]
    pub const fn occupant(&self) -> Option<UnitId> {
        self.occupant
    }

    /// Whether a unit stands on this tile.
    #[must_use]
    pub const fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    /// Current status, including the derived `OCCUPIED` bit.
    #[must_use]
    pub fn status(&self) -> TileStatus {
        if self.is_occupied() {
            self.marks | TileStatus::OCCUPIED
        } else {
            self.marks
        }
    }
}

/// The battle field: owns every tile and the links between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Build a grid and wire the neighbour links.
    ///
    /// Tile `(i, j)` gets `Right = (i + 1, j)` when `i + 1 < width` and
    /// `Up = (i, j + 1)` when `j + 1 < height`, plus the matching `Left` and
    /// `Down` back links. There is no wraparound.
    ///
    /// # Panics
    ///
    /// Panics if `width` or `height` is zero.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        assert!(width > 0, "Grid width must be positive");
        assert!(height > 0, "Grid height must be positive");

        let mut tiles = Vec::with_capacity((width as usize) * (height as usize));
        for x in 0..width {
            for y in 0..height {
                let id = TileId(x * height + y);
                tiles.push(Tile::new(id, Position::new(x as i32, y as i32)));
            }
        }

        let mut grid = Self {
            width,
            height,
            tiles,
        };

        for x in 0..width {
            for y in 0..height {
                let here = grid.index_of(x, y);
                if x + 1 < width {
                    let right = grid.index_of(x + 1, y);
                    grid.link(here, right, Direction::Right);
                }
                if y + 1 < height {
                    let up = grid.index_of(x, y + 1);
                    grid.link(here, up, Direction::Up);
                }
            }
        }

        grid
    }

    #[inline]
    const fn index_of(&self, x: u32, y: u32) -> TileId {
        TileId(x * self.height + y)
    }

    fn link(&mut self, from: TileId, to: TileId, direction: Direction) {
        self.tiles[from.index()].neighbors[direction.slot()] = Some(to);
        self.tiles[to.index()].neighbors[direction.opposite().slot()] = Some(from);
    }

    /// Grid width in tiles.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in tiles.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Total number of tiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Always false; a grid has at least one tile.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// All tiles in storage (column-major) order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Check if the identifier belongs to this grid.
    #[must_use]
    pub fn contains(&self, id: TileId) -> bool {
        id.index() < self.tiles.len()
    }

    /// Look up a tile.
    #[must_use]
    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id.index())
    }

    /// Look up a tile, failing with [`BattleError::TileOutOfBounds`].
    pub fn try_tile(&self, id: TileId) -> Result<&Tile> {
        self.tile(id).ok_or(BattleError::TileOutOfBounds(id))
    }

    /// Tile at the given coordinates, if inside the grid.
    #[must_use]
    pub fn tile_at(&self, x: i32, y: i32) -> Option<TileId> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as u32, y as u32);
        if x < self.width && y < self.height {
            Some(self.index_of(x, y))
        } else {
            None
        }
    }

    /// Tile at a position, failing with [`BattleError::PositionOutOfBounds`].
    pub fn id_at(&self, position: Position) -> Result<TileId> {
        self.tile_at(position.x, position.y)
            .ok_or(BattleError::PositionOutOfBounds {
                x: position.x,
                y: position.y,
            })
    }

    /// Coordinates of a tile.
    #[must_use]
    pub fn position(&self, id: TileId) -> Option<Position> {
        self.tile(id).map(Tile::position)
    }

    /// Neighbour of `id` in `direction`.
    #[must_use]
    pub fn neighbor(&self, id: TileId, direction: Direction) -> Option<TileId> {
        self.tile(id).and_then(|t| t.neighbor(direction))
    }

    /// Existing neighbours of `id`, in [`Direction::ALL`] order.
    pub fn neighbors(&self, id: TileId) -> impl Iterator<Item = TileId> + '_ {
        let links = self.tile(id).map(|t| t.neighbors).unwrap_or([None; 4]);
        links.into_iter().flatten()
    }

    /// Current status of a tile. Unknown tiles report an empty status.
    #[must_use]
    pub fn status(&self, id: TileId) -> TileStatus {
        self.tile(id).map_or(TileStatus::empty(), Tile::status)
    }

    /// Unit standing on a tile.
    #[must_use]
    pub fn occupant(&self, id: TileId) -> Option<UnitId> {
        self.tile(id).and_then(Tile::occupant)
    }

    /// Whether a unit stands on a tile.
    #[must_use]
    pub fn is_occupied(&self, id: TileId) -> bool {
        self.occupant(id).is_some()
    }

    /// Clear the transient walk/attack marks on every tile.
    ///
    /// Occupancy is untouched.
    pub fn reset_all(&mut self) {
        for tile in &mut self.tiles {
            tile.marks.remove(TileStatus::TRANSIENT);
        }
    }

    /// Mark every tile of `set` with `status` (transient bits only).
    pub fn mark(&mut self, set: &TileSet, status: TileStatus) {
        let status = status & TileStatus::TRANSIENT;
        for id in set.iter() {
            if let Some(tile) = self.tiles.get_mut(id.index()) {
                tile.marks.insert(status);
            }
        }
    }

    /// Put `unit` on an empty tile.
    pub fn place(&mut self, unit: UnitId, id: TileId) -> Result<()> {
        let tile = self
            .tiles
            .get_mut(id.index())
            .ok_or(BattleError::TileOutOfBounds(id))?;
        if tile.occupant.is_some() {
            return Err(BattleError::TileOccupied(id));
        }
        tile.occupant = Some(unit);
        Ok(())
    }

    /// Remove whatever stands on a tile. Returns the former occupant.
    pub fn vacate(&mut self, id: TileId) -> Option<UnitId> {
        self.tiles.get_mut(id.index()).and_then(|t| t.occupant.take())
    }

    /// Move `unit` from one tile to another, keeping exactly one reference.
    ///
    /// Moving onto the tile the unit already stands on is a no-op.
    pub fn relocate(&mut self, unit: UnitId, from: TileId, to: TileId) -> Result<()> {
        if from == to {
            return Ok(());
        }
        let target = self.try_tile(to)?;
        if target.is_occupied() {
            return Err(BattleError::TileOccupied(to));
        }
        if self.occupant(from) != Some(unit) {
            return Err(BattleError::UnitNotFound(unit));
        }
        self.vacate(from);
        self.place(unit, to)
    }
}
