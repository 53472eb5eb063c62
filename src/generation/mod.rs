//! # Generation Module
//!
//! Procedural content generation for levels, hazards, enemies and items.
//!
//! A level is built in passes that share one seeded random number generator:
//! rooms and corridors first, then hazards and special rooms, then enemy and
//! item placement. The same seed always yields the same level.

pub mod dungeon;
pub mod encounters;
pub mod hazards;
pub mod items;

pub use dungeon::*;
pub use encounters::*;
pub use hazards::*;
pub use items::*;

use crate::game::{Position, TileGrid};
use crate::{config, DelveError, DelveResult};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// Configuration for procedural generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Random seed for reproducible generation
    pub seed: u64,
    /// Grid width in tiles
    pub width: u32,
    /// Grid height in tiles
    pub height: u32,
    /// Number of room slots to try to fill
    pub room_count: u32,
    /// Minimum room size, walls included
    pub min_room_size: u32,
    /// Maximum room size, walls included
    pub max_room_size: u32,
    /// Placement retries per room slot
    pub max_placement_attempts: u32,
    /// Whether to scatter water, traps and special rooms
    pub place_hazards: bool,
    /// Whether to spawn enemies in the rooms
    pub spawn_enemies: bool,
    /// Whether to leave items on the floor
    pub spawn_items: bool,
}

impl GenerationConfig {
    /// Creates a default generation configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::GenerationConfig;
    ///
    /// let config = GenerationConfig::new(7);
    /// assert!(config.min_room_size >= 3);
    /// assert!(config.max_room_size >= config.min_room_size);
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            width: config::DEFAULT_DUNGEON_WIDTH,
            height: config::DEFAULT_DUNGEON_HEIGHT,
            room_count: 10,
            min_room_size: 5,
            max_room_size: 10,
            max_placement_attempts: config::ROOM_PLACEMENT_ATTEMPTS,
            place_hazards: true,
            spawn_enemies: true,
            spawn_items: true,
        }
    }

    /// Creates a configuration for testing with smaller, simpler levels.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            seed,
            width: 40,
            height: 30,
            room_count: 6,
            min_room_size: 5,
            max_room_size: 8,
            max_placement_attempts: config::ROOM_PLACEMENT_ATTEMPTS,
            place_hazards: true,
            spawn_enemies: true,
            spawn_items: true,
        }
    }

    /// Creates a configuration from explicit layout parameters.
    pub fn with_layout(
        width: u32,
        height: u32,
        room_count: u32,
        min_room_size: u32,
        max_room_size: u32,
        seed: u64,
    ) -> Self {
        Self {
            width,
            height,
            room_count,
            min_room_size,
            max_room_size,
            ..Self::new(seed)
        }
    }

    /// Rejects parameters no level can be built from.
    pub fn validate(&self) -> DelveResult<()> {
        if self.width < 3 || self.height < 3 {
            return Err(DelveError::InvalidConfig(format!(
                "grid must be at least 3x3, got {}x{}",
                self.width, self.height
            )));
        }
        if self.min_room_size < 3 {
            return Err(DelveError::InvalidConfig(format!(
                "rooms need at least 3 tiles per side, got {}",
                self.min_room_size
            )));
        }
        if self.min_room_size > self.max_room_size {
            return Err(DelveError::InvalidConfig(format!(
                "min room size {} exceeds max room size {}",
                self.min_room_size, self.max_room_size
            )));
        }
        if self.max_placement_attempts == 0 {
            return Err(DelveError::InvalidConfig(
                "at least one placement attempt is required".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// A rectangular room in the dungeon.
///
/// The outer ring of the rectangle is wall; everything inside is floor.
/// Rooms only exist during generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Placement order of this room
    pub id: u32,
    /// Top-left corner of the room
    pub top_left: Position,
    /// Width of the room (including walls)
    pub width: u32,
    /// Height of the room (including walls)
    pub height: u32,
}

impl Room {
    /// Creates a new room with the given parameters.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Room, Position};
    ///
    /// let room = Room::new(1, Position::new(5, 5), 10, 8);
    /// assert_eq!(room.center(), Position::new(10, 9));
    /// assert!(room.contains(Position::new(7, 7)));
    /// ```
    pub fn new(id: u32, top_left: Position, width: u32, height: u32) -> Self {
        Self {
            id,
            top_left,
            width,
            height,
        }
    }

    /// Gets the bottom-right corner of the room.
    pub fn bottom_right(&self) -> Position {
        Position::new(
            self.top_left.x + self.width as i32 - 1,
            self.top_left.y + self.height as i32 - 1,
        )
    }

    /// Gets the center position of the room.
    pub fn center(&self) -> Position {
        Position::new(
            self.top_left.x + self.width as i32 / 2,
            self.top_left.y + self.height as i32 / 2,
        )
    }


    /// Checks if a position is inside this room.
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.top_left.x
            && pos.y >= self.top_left.y
            && pos.x < self.top_left.x + self.width as i32
            && pos.y < self.top_left.y + self.height as i32
    }

    /// Checks if a position is on the border of this room.
    pub fn is_border(&self, pos: Position) -> bool {
        if !self.contains(pos) {
            return false;
        }

        pos.x == self.top_left.x
            || pos.y == self.top_left.y
            || pos.x == self.top_left.x + self.width as i32 - 1
            || pos.y == self.top_left.y + self.height as i32 - 1
    }

    /// Checks if this room, grown by one tile on every side, overlaps another.
    ///
    /// Accepted rooms therefore always keep at least one tile of rock
    /// between them.
    pub fn intersects(&self, other: &Room) -> bool {
        self.top_left.x < other.top_left.x + other.width as i32 + 1
            && self.top_left.x + self.width as i32 + 1 > other.top_left.x
            && self.top_left.y < other.top_left.y + other.height as i32 + 1
            && self.top_left.y + self.height as i32 + 1 > other.top_left.y
    }

    /// Gets all floor positions within this room.
    pub fn floor_positions(&self) -> Vec<Position> {
        let mut positions = Vec::new();

        for y in (self.top_left.y + 1)..(self.top_left.y + self.height as i32 - 1) {
            for x in (self.top_left.x + 1)..(self.top_left.x + self.width as i32 - 1) {
                positions.push(Position::new(x, y));
            }
        }

        positions
    }

    /// Gets all wall positions of this room.
    pub fn wall_positions(&self) -> Vec<Position> {
        self.all_positions()
            .into_iter()
            .filter(|pos| self.is_border(*pos))
            .collect()
    }

    /// Gets all positions within this room (both floor and walls).
    pub fn all_positions(&self) -> Vec<Position> {
        let mut positions = Vec::new();

        for y in self.top_left.y..(self.top_left.y + self.height as i32) {
            for x in self.top_left.x..(self.top_left.x + self.width as i32) {
                positions.push(Position::new(x, y));
            }
        }

        positions
    }
}

/// Trait for procedural generators.
pub trait Generator<T> {
    /// Generates content using the provided configuration and random number generator.
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> DelveResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, config: &GenerationConfig) -> DelveResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Utility functions for generation algorithms.
pub mod utils {
    use super::*;
    use rand::SeedableRng;

    /// Creates a seeded random number generator from the config.
    pub fn create_rng(config: &GenerationConfig) -> StdRng {
        StdRng::seed_from_u64(config.seed)
    }

    /// Validates that a grid meets basic requirements: something to stand
    /// on, and nothing walkable or door-like on the outer ring.
    pub fn validate_grid(grid: &TileGrid) -> DelveResult<()> {
        if !grid.iter().any(|(_, tile)| tile.is_walkable()) {
            return Err(DelveError::GenerationFailed(
                "Level has no walkable tiles".to_string(),
            ));
        }

        let max_x = grid.width() as i32 - 1;
        let max_y = grid.height() as i32 - 1;
        let leak = grid.iter().find(|(pos, tile)| {
            let on_edge = pos.x == 0 || pos.y == 0 || pos.x == max_x || pos.y == max_y;
            on_edge && (tile.is_walkable() || tile.tile_type.is_door())
        });
        if let Some((pos, tile)) = leak {
            return Err(DelveError::GenerationFailed(format!(
                "{:?} on the grid edge at {}",
                tile.tile_type, pos
            )));
        }

        Ok(())
    }
}

/// Builds a complete level layout: rooms, corridors, doors, and hazards.
///
/// This is the level lifecycle entry point for presentation layers that only
/// need the terrain.
///
/// # Examples
///
/// ```
/// use delve::{generate_level, TileType};
///
/// let level = generate_level(40, 30, 6, 5, 8, 99).unwrap();
/// assert!(level.grid.tile_at(level.player_start).is_walkable());
/// assert!(level.rooms.len() <= 6);
/// ```
pub fn generate_level(
    width: u32,
    height: u32,
    room_count: u32,
    min_room_size: u32,
    max_room_size: u32,
    seed: u64,
) -> DelveResult<GeneratedLevel> {
    let config = GenerationConfig::with_layout(
        width,
        height,
        room_count,
        min_room_size,
        max_room_size,
        seed,
    );
    let mut rng = utils::create_rng(&config);
    generate_level_with(&config, &mut rng)
}

/// Builds a level layout from a config, drawing from a caller-owned RNG so
/// that later passes (enemies, items) continue the same random stream.
pub fn generate_level_with(
    config: &GenerationConfig,
    rng: &mut StdRng,
) -> DelveResult<GeneratedLevel> {
    let generator = RoomCorridorGenerator::new();
    let mut level = generator.generate(config, rng)?;
    if config.place_hazards {
        HazardPlacer::new().place(&mut level, rng)?;
    }
    generator.validate(&level, config)?;
    Ok(level)
}
