//! # Dungeon Generation
//!
//! Room-and-corridor layout generation.
//!
//! Rooms are placed at random with bounded retries and must keep one tile of
//! rock between each other. Consecutive rooms are joined by L-shaped
//! corridors between their centers. Each corridor leg forces its cells to
//! floor, except the last one: a leg that ends in solid rock leaves a closed
//! door there.

use crate::{
    utils, DelveError, DelveResult, GenerationConfig, Generator, Position, Room, Tile, TileGrid,
    TileType,
};
use log::{debug, warn};
use rand::{rngs::StdRng, Rng};
use serde::{Deserialize, Serialize};

/// A freshly generated level layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedLevel {
    pub grid: TileGrid,
    /// Successfully placed rooms, in placement order
    pub rooms: Vec<Room>,
    /// Where the player enters the level
    pub player_start: Position,
}

/// Orientation of a corridor leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Primary dungeon generator using the room-and-corridor algorithm.
///
/// This generator creates dungeons by:
/// 1. Placing rooms randomly with collision detection
/// 2. Connecting consecutive rooms with L-shaped corridors
/// 3. Leaving doors where a corridor leg ends in rock
#[derive(Debug, Clone, Default)]
pub struct RoomCorridorGenerator;

impl RoomCorridorGenerator {
    /// Creates a new dungeon generator.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{utils, GenerationConfig, Generator, RoomCorridorGenerator};
    ///
    /// let config = GenerationConfig::for_testing(3);
    /// let mut rng = utils::create_rng(&config);
    /// let level = RoomCorridorGenerator::new().generate(&config, &mut rng).unwrap();
    /// assert!(!level.rooms.is_empty());
    /// ```
    pub fn new() -> Self {
        Self
    }

    /// Fills as many room slots as possible.
    ///
    /// Each slot gets the configured number of attempts; a slot that never
    /// fits is skipped.
    fn place_rooms(
        &self,
        grid: &mut TileGrid,
        config: &GenerationConfig,
        rng: &mut StdRng,
    ) -> DelveResult<Vec<Room>> {
        let mut rooms: Vec<Room> = Vec::new();

        for slot in 0..config.room_count {
            let id = rooms.len() as u32;
            match self.try_place_room(grid, config, rng, id, &rooms) {
                Some(room) => {
                    self.carve_room(grid, &room)?;
                    rooms.push(room);
                }
                None => debug!(
                    "Room slot {} skipped after {} attempts",
                    slot, config.max_placement_attempts
                ),
            }
        }

        if (rooms.len() as u32) < config.room_count {
            debug!("Placed {} of {} rooms", rooms.len(), config.room_count);
        }

        Ok(rooms)
    }

    /// Attempts to place a single room.
    fn try_place_room(
        &self,
        grid: &TileGrid,
        config: &GenerationConfig,
        rng: &mut StdRng,
        room_id: u32,
        existing_rooms: &[Room],
    ) -> Option<Room> {
        for _ in 0..config.max_placement_attempts {
            let Some(room) = self.generate_room_candidate(grid, config, rng, room_id) else {
                continue;
            };

            if existing_rooms.iter().any(|existing| room.intersects(existing)) {
                continue;
            }

            return Some(room);
        }

        None
    }

    /// Rolls a room size and a top-left corner that keeps the room off the
    /// grid's outer ring. Returns None when the rolled size cannot fit at all.
    fn generate_room_candidate(
        &self,
        grid: &TileGrid,
        config: &GenerationConfig,
        rng: &mut StdRng,
        room_id: u32,
    ) -> Option<Room> {
        let width = rng.gen_range(config.min_room_size..=config.max_room_size);
        let height = rng.gen_range(config.min_room_size..=config.max_room_size);

        let max_x = grid.width() as i32 - width as i32 - 1;
        let max_y = grid.height() as i32 - height as i32 - 1;
        if max_x < 1 || max_y < 1 {
            return None;
        }

        let x = rng.gen_range(1..=max_x);
        let y = rng.gen_range(1..=max_y);

        Some(Room::new(room_id, Position::new(x, y), width, height))
    }

    /// Carves a room: wall ring outside, floor inside.
    pub fn carve_room(&self, grid: &mut TileGrid, room: &Room) -> DelveResult<()> {
        for pos in room.wall_positions() {
            grid.set_tile(pos, Tile::wall())?;
        }
        for pos in room.floor_positions() {
            grid.set_tile(pos, Tile::floor())?;
        }
        Ok(())
    }

    /// Connects each room to the next one in placement order.
    fn connect_rooms(
        &self,
        grid: &mut TileGrid,
        rooms: &[Room],
        rng: &mut StdRng,
    ) -> DelveResult<()> {
        for pair in rooms.windows(2) {
            let first_axis = if rng.gen_bool(0.5) {
                Axis::Horizontal
            } else {
                Axis::Vertical
            };
            self.carve_l_corridor(grid, pair[0].center(), pair[1].center(), first_axis)?;
        }
        Ok(())
    }

    /// Carves an L-shaped corridor from `start` to `end`, running along
    /// `first_axis` up to the bend.
    ///
    /// The second leg begins just past the bend so that a door left at the
    /// bend survives.
    pub fn carve_l_corridor(
        &self,
        grid: &mut TileGrid,
        start: Position,
        end: Position,
        first_axis: Axis,
    ) -> DelveResult<()> {
        let bend = match first_axis {
            Axis::Horizontal => Position::new(end.x, start.y),
            Axis::Vertical => Position::new(start.x, end.y),
        };

        self.carve_segment(grid, start, bend, true)?;
        self.carve_segment(grid, bend, end, bend == start)?;
        Ok(())
    }

    /// Carves a straight leg from `from` to `to`.
    ///
    /// Every cell before `to` becomes floor. `to` becomes a closed door if it
    /// was wall, stays as it is if it already is a door, and is floor
    /// otherwise. `from` is skipped unless
    /// `include_start` is set.
    fn carve_segment(
        &self,
        grid: &mut TileGrid,
        from: Position,
        to: Position,
        include_start: bool,
    ) -> DelveResult<()> {
        if from == to && !include_start {
            return Ok(());
        }

        let step = Position::new((to.x - from.x).signum(), (to.y - from.y).signum());
        if step.x != 0 && step.y != 0 {
            return Err(DelveError::GenerationFailed(format!(
                "corridor leg {} -> {} is not axis-aligned",
                from, to
            )));
        }

        let mut pos = if include_start { from } else { from + step };
        while pos != to {
            grid.set_tile(pos, Tile::floor())?;
            pos = pos + step;
        }

        let terminal = match grid.tile_type_at(to) {
            TileType::Wall => Tile::new(TileType::DoorClosed),
            tile_type if tile_type.is_door() => return Ok(()),
            _ => Tile::floor(),
        };
        grid.set_tile(to, terminal)
    }
}

impl Generator<GeneratedLevel> for RoomCorridorGenerator {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> DelveResult<GeneratedLevel> {
        config.validate()?;

        // Create empty grid (all walls)
        let mut grid = TileGrid::new(config.width, config.height);

        let rooms = self.place_rooms(&mut grid, config, rng)?;
        self.connect_rooms(&mut grid, &rooms, rng)?;

        let player_start = match rooms.first() {
            Some(room) => room.center(),
            None => {
                let fallback =
                    Position::new(config.width as i32 / 2, config.height as i32 / 2);
                warn!(
                    "No room fit in a {}x{} grid; falling back to a single floor tile at {}",
                    config.width, config.height, fallback
                );
                grid.set_tile(fallback, Tile::floor())?;
                fallback
            }
        };

        debug!(
            "{} built {} rooms, start at {}",
            self.generator_type(),
            rooms.len(),
            player_start
        );

        Ok(GeneratedLevel {
            grid,
            rooms,
            player_start,
        })
    }

    fn validate(&self, level: &GeneratedLevel, _config: &GenerationConfig) -> DelveResult<()> {
        utils::validate_grid(&level.grid)?;
        if !level.grid.is_walkable(level.player_start) {
            return Err(DelveError::GenerationFailed(format!(
                "player start {} is not walkable",
                level.player_start
            )));
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "RoomCorridorGenerator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate(config: &GenerationConfig) -> GeneratedLevel {
        let mut rng = utils::create_rng(config);
        RoomCorridorGenerator::new().generate(config, &mut rng).unwrap()
    }

    #[test]
    fn test_generation_with_small_level() {
        let config = GenerationConfig::for_testing(12345);
        let level = generate(&config);

        assert_eq!(level.grid.width(), config.width);
        assert_eq!(level.grid.height(), config.height);
        assert!(!level.rooms.is_empty());
        assert!(level.rooms.len() <= config.room_count as usize);
        assert!(level.grid.count(TileType::Floor) > 0);
        assert_eq!(level.player_start, level.rooms[0].center());
        assert!(RoomCorridorGenerator::new().validate(&level, &config).is_ok());
    }

    #[test]
    fn test_rooms_keep_their_distance() {
        let config = GenerationConfig::new(777);
        let level = generate(&config);

        for (i, a) in level.rooms.iter().enumerate() {
            for b in &level.rooms[i + 1..] {
                assert!(!a.intersects(b), "rooms {} and {} overlap", a.id, b.id);
            }
            assert!(a.top_left.x >= 1 && a.top_left.y >= 1);
            assert!(a.bottom_right().x <= config.width as i32 - 2);
            assert!(a.bottom_right().y <= config.height as i32 - 2);
        }
    }

    #[test]
    fn test_room_ids_follow_placement_order() {
        let level = generate(&GenerationConfig::new(9));
        let ids: Vec<u32> = level.rooms.iter().map(|room| room.id).collect();
        let expected: Vec<u32> = (0..level.rooms.len() as u32).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_carve_room() {
        let mut grid = TileGrid::new(12, 12);
        let room = Room::new(0, Position::new(2, 2), 5, 4);
        RoomCorridorGenerator::new().carve_room(&mut grid, &room).unwrap();

        assert_eq!(grid.count(TileType::Floor), 6);
        assert_eq!(grid.tile_type_at(Position::new(3, 3)), TileType::Floor);
        assert_eq!(grid.tile_type_at(Position::new(2, 2)), TileType::Wall);
        assert_eq!(grid.tile_type_at(Position::new(6, 5)), TileType::Wall);
    }

    #[test]
    fn test_l_corridor_leaves_door_at_bend_in_rock() {
        let generator = RoomCorridorGenerator::new();
        let mut grid = TileGrid::new(20, 20);
        let start = Position::new(5, 5);
        let end = Position::new(15, 15);
        grid.set_tile(start, Tile::floor()).unwrap();
        grid.set_tile(end, Tile::floor()).unwrap();

        generator
            .carve_l_corridor(&mut grid, start, end, Axis::Horizontal)
            .unwrap();

        assert_eq!(grid.tile_type_at(start), TileType::Floor);
        assert_eq!(grid.tile_type_at(Position::new(10, 5)), TileType::Floor);
        assert_eq!(grid.tile_type_at(Position::new(15, 5)), TileType::DoorClosed);
        assert_eq!(grid.tile_type_at(Position::new(15, 10)), TileType::Floor);
        assert_eq!(grid.tile_type_at(end), TileType::Floor);
        assert_eq!(grid.count(TileType::DoorClosed), 1);
    }

    #[test]
    fn test_l_corridor_vertical_first() {
        let generator = RoomCorridorGenerator::new();
        let mut grid = TileGrid::new(20, 20);
        let start = Position::new(4, 12);
        let end = Position::new(10, 3);

        generator
            .carve_l_corridor(&mut grid, start, end, Axis::Vertical)
            .unwrap();

        assert_eq!(grid.tile_type_at(start), TileType::Floor);
        assert_eq!(grid.tile_type_at(Position::new(4, 7)), TileType::Floor);
        // Bend and endpoint were both rock
        assert_eq!(grid.tile_type_at(Position::new(4, 3)), TileType::DoorClosed);
        assert_eq!(grid.tile_type_at(Position::new(7, 3)), TileType::Floor);
        assert_eq!(grid.tile_type_at(end), TileType::DoorClosed);
    }

    #[test]
    fn test_straight_corridor_has_no_bend_door() {
        let generator = RoomCorridorGenerator::new();
        let mut grid = TileGrid::new(20, 10);
        let start = Position::new(3, 4);
        let end = Position::new(12, 4);
        grid.set_tile(start, Tile::floor()).unwrap();
        grid.set_tile(end, Tile::floor()).unwrap();

        generator
            .carve_l_corridor(&mut grid, start, end, Axis::Vertical)
            .unwrap();

        for x in 3..=12 {
            assert_eq!(grid.tile_type_at(Position::new(x, 4)), TileType::Floor);
        }
        assert_eq!(grid.count(TileType::DoorClosed), 0);
    }

    #[test]
    fn test_corridor_carving_is_idempotent_on_floor() {
        let generator = RoomCorridorGenerator::new();
        let mut grid = TileGrid::new(20, 20);
        for y in 1..19 {
            for x in 1..19 {
                grid.set_tile(Position::new(x, y), Tile::floor()).unwrap();
            }
        }
        let start = Position::new(2, 3);
        let end = Position::new(16, 14);

        generator
            .carve_l_corridor(&mut grid, start, end, Axis::Horizontal)
            .unwrap();
        let once = grid.clone();
        generator
            .carve_l_corridor(&mut grid, start, end, Axis::Horizontal)
            .unwrap();
        assert_eq!(grid, once);
    }

    #[test]
    fn test_corridor_carving_through_rock_is_idempotent() {
        let generator = RoomCorridorGenerator::new();
        let mut grid = TileGrid::new(20, 20);
        let start = Position::new(3, 3);
        let end = Position::new(12, 9);

        generator
            .carve_l_corridor(&mut grid, start, end, Axis::Vertical)
            .unwrap();
        let once = grid.clone();
        assert_eq!(once.tile_type_at(Position::new(3, 9)), TileType::DoorClosed);

        generator
            .carve_l_corridor(&mut grid, start, end, Axis::Vertical)
            .unwrap();
        assert_eq!(grid, once);
    }

    #[test]
    fn test_zero_rooms_fall_back_to_center_floor() {
        // Too small for any 5x5 room
        let config = GenerationConfig::with_layout(6, 6, 4, 5, 5, 1);
        let level = generate(&config);

        assert!(level.rooms.is_empty());
        assert_eq!(level.player_start, Position::new(3, 3));
        assert_eq!(level.grid.tile_type_at(level.player_start), TileType::Floor);
        assert_eq!(level.grid.count(TileType::Floor), 1);
    }

    #[test]
    fn test_zero_room_count_is_not_an_error() {
        let config = GenerationConfig::with_layout(20, 20, 0, 5, 8, 1);
        let level = generate(&config);
        assert!(level.rooms.is_empty());
        assert!(level.grid.is_walkable(level.player_start));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = GenerationConfig::with_layout(20, 20, 3, 9, 4, 1);
        let mut rng = utils::create_rng(&config);
        assert!(RoomCorridorGenerator::new().generate(&config, &mut rng).is_err());
    }
}
