//! # World Module
//!
//! The tile grid: a fixed-size, dense map from coordinates to tile state.
//!
//! Tiles are mostly static terrain. Two of them carry state that changes while
//! actors move around: closed doors open when someone walks into them, and
//! hidden traps fire once and stay revealed. Those are the only mutations the
//! grid allows after generation, through [`TileGrid::open_door`] and
//! [`TileGrid::trigger_trap`].

use crate::{DelveError, DelveResult, Position};
use serde::{Deserialize, Serialize};

/// Terrain classification of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileType {
    Wall,
    Floor,
    TreasureFloor,
    DoorClosed,
    DoorOpen,
    Water,
    TrapHidden,
    TrapRevealed,
}

impl TileType {
    /// Checks if actors can stand on this tile type.
    pub fn is_walkable(self) -> bool {
        !matches!(self, TileType::Wall | TileType::DoorClosed)
    }

    /// Water is the only terrain that slows movement.
    pub fn slows_movement(self) -> bool {
        self == TileType::Water
    }

    /// Floor-like tiles that hazards and spawns may replace or occupy.
    pub fn is_plain_floor(self) -> bool {
        matches!(self, TileType::Floor | TileType::TreasureFloor)
    }

    pub fn is_door(self) -> bool {
        matches!(self, TileType::DoorClosed | TileType::DoorOpen)
    }

    /// Gets the character representation for text dumps.
    pub fn glyph(self) -> char {
        match self {
            TileType::Wall => '#',
            TileType::Floor => '.',
            TileType::TreasureFloor => '$',
            TileType::DoorClosed => '+',
            TileType::DoorOpen => '\'',
            TileType::Water => '~',
            // Hidden traps look like floor
            TileType::TrapHidden => '.',
            TileType::TrapRevealed => '^',
        }
    }
}

/// One cell of the grid.
///
/// `pending_damage` is only meaningful for [`TileType::TrapHidden`]; it is
/// fixed when the trap is created and drops to 0 once the trap fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub tile_type: TileType,
    pub pending_damage: u32,
}

impl Tile {
    /// Creates a tile of the given type with no pending damage.
    pub fn new(tile_type: TileType) -> Self {
        Self {
            tile_type,
            pending_damage: 0,
        }
    }

    pub fn wall() -> Self {
        Self::new(TileType::Wall)
    }

    pub fn floor() -> Self {
        Self::new(TileType::Floor)
    }

    /// Creates an armed trap that deals `damage` to the first actor stepping on it.
    pub fn hidden_trap(damage: u32) -> Self {
        Self {
            tile_type: TileType::TrapHidden,
            pending_damage: damage,
        }
    }

    pub fn is_walkable(&self) -> bool {
        self.tile_type.is_walkable()
    }

    pub fn slows_movement(&self) -> bool {
        self.tile_type.slows_movement()
    }

    /// Opens a closed door. Returns false (and changes nothing) for any other tile.
    pub fn open_door(&mut self) -> bool {
        if self.tile_type == TileType::DoorClosed {
            self.tile_type = TileType::DoorOpen;
            true
        } else {
            false
        }
    }

    /// Fires a hidden trap, returning its damage exactly once.
    pub fn trigger_trap(&mut self) -> Option<u32> {
        if self.tile_type != TileType::TrapHidden {
            return None;
        }
        let damage = self.pending_damage;
        self.tile_type = TileType::TrapRevealed;
        self.pending_damage = 0;
        Some(damage)
    }
}

/// Fixed-size grid of tiles stored row-major.
///
/// Reads outside the grid return a wall, so callers never have to special-case
/// the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Creates a grid filled with walls.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Position, TileGrid, TileType};
    ///
    /// let grid = TileGrid::new(20, 15);
    /// assert_eq!(grid.width(), 20);
    /// assert_eq!(grid.tile_at(Position::new(3, 3)).tile_type, TileType::Wall);
    /// assert_eq!(grid.tile_at(Position::new(-1, 3)).tile_type, TileType::Wall);
    /// ```
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Tile::wall())
    }

    /// Creates a grid with every cell set to `tile`.
    pub fn filled(width: u32, height: u32, tile: Tile) -> Self {
        Self {
            width,
            height,
            tiles: vec![tile; (width as usize) * (height as usize)],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Checks if a position lies inside the grid.
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if self.in_bounds(pos) {
            Some(pos.y as usize * self.width as usize + pos.x as usize)
        } else {
            None
        }
    }

    /// Returns the tile at `pos`, or a wall when `pos` is out of range.
    pub fn tile_at(&self, pos: Position) -> Tile {
        self.index(pos)
            .map(|index| self.tiles[index])
            .unwrap_or_else(Tile::wall)
    }

    pub fn tile_type_at(&self, pos: Position) -> TileType {
        self.tile_at(pos).tile_type
    }

    pub fn is_walkable(&self, pos: Position) -> bool {
        self.tile_at(pos).is_walkable()
    }

    /// Overwrites a cell. Used by generation; gameplay goes through the
    /// transition methods instead.
    pub fn set_tile(&mut self, pos: Position, tile: Tile) -> DelveResult<()> {
        let index = self
            .index(pos)
            .ok_or(DelveError::OutOfBounds { x: pos.x, y: pos.y })?;
        self.tiles[index] = tile;
        Ok(())
    }

    /// Opens the closed door at `pos`. Opening anything else is a no-op.
    pub fn open_door(&mut self, pos: Position) -> bool {
        match self.index(pos) {
            Some(index) => self.tiles[index].open_door(),
            None => false,
        }
    }

    /// Fires the hidden trap at `pos`, returning its damage the first time only.
    pub fn trigger_trap(&mut self, pos: Position) -> Option<u32> {
        self.index(pos)
            .and_then(|index| self.tiles[index].trigger_trap())
    }

    /// Iterates over every cell with its position, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Tile)> + '_ {
        let width = self.width as usize;
        self.tiles.iter().enumerate().map(move |(index, tile)| {
            (
                Position::new((index % width) as i32, (index / width) as i32),
                tile,
            )
        })
    }

    /// Counts cells of a given type.
    pub fn count(&self, tile_type: TileType) -> usize {
        self.tiles
            .iter()
            .filter(|tile| tile.tile_type == tile_type)
            .count()
    }

    /// Renders the grid as text, one line per row.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(self.tiles.len() + self.height as usize);
        for row in self.tiles.chunks(self.width.max(1) as usize) {
            out.extend(row.iter().map(|tile| tile.tile_type.glyph()));
            out.push('\n');
        }
        out
    }
}
