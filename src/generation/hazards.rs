//! # Hazard Placement
//!
//! Decorates a generated layout with special rooms, water, and hidden traps.
//!
//! Hazards only ever replace floor. Walls, doors, and the player's start
//! cell are never touched, so every cell that was reachable before this pass
//! is still reachable after it.

use crate::{config, DelveResult, GeneratedLevel, Position, Room, Tile, TileGrid, TileType};
use log::debug;
use rand::{rngs::StdRng, Rng};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Cosmetic feature applied to a whole room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomFeature {
    /// Every floor tile becomes treasure floor
    Treasure,
    /// A 2x2 block of wall at the room's center
    Fountain,
}

/// What the hazard pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HazardReport {
    /// Room ids with the feature they received
    pub special_rooms: Vec<(u32, RoomFeature)>,
    pub water_tiles: usize,
    pub traps: usize,
}

/// Places special rooms, water patches, and traps on a level.
#[derive(Debug, Clone)]
pub struct HazardPlacer {
    pub special_room_chance: f64,
    pub water_patches: RangeInclusive<u32>,
    pub water_patch_size: RangeInclusive<i32>,
    pub traps: RangeInclusive<u32>,
    pub trap_damage: RangeInclusive<u32>,
}

impl HazardPlacer {
    pub fn new() -> Self {
        Self {
            special_room_chance: config::SPECIAL_ROOM_CHANCE,
            water_patches: config::WATER_PATCHES_MIN..=config::WATER_PATCHES_MAX,
            water_patch_size: config::WATER_PATCH_SIZE_MIN..=config::WATER_PATCH_SIZE_MAX,
            traps: config::TRAPS_MIN..=config::TRAPS_MAX,
            trap_damage: config::TRAP_DAMAGE_MIN..=config::TRAP_DAMAGE_MAX,
        }
    }

    /// Runs the full hazard pass: special rooms, then water, then traps.
    ///
    /// Rooms are picked uniformly for each patch and trap. An attempt that
    /// lands on an illegal cell is dropped, not retried.
    pub fn place(&self, level: &mut GeneratedLevel, rng: &mut StdRng) -> DelveResult<HazardReport> {
        let mut report = HazardReport::default();
        if level.rooms.is_empty() {
            return Ok(report);
        }

        self.place_special_rooms(level, rng, &mut report)?;
        self.place_water(level, rng, &mut report)?;
        self.place_traps(level, rng, &mut report)?;

        debug!(
            "Hazards: {} special rooms, {} water tiles, {} traps",
            report.special_rooms.len(),
            report.water_tiles,
            report.traps
        );
        Ok(report)
    }

    fn place_special_rooms(
        &self,
        level: &mut GeneratedLevel,
        rng: &mut StdRng,
        report: &mut HazardReport,
    ) -> DelveResult<()> {
        for (index, room) in level.rooms.iter().enumerate() {
            // The first room is always a candidate
            if index > 0 && !rng.gen_bool(self.special_room_chance) {
                continue;
            }

            let feature = if rng.gen_bool(0.5) {
                RoomFeature::Treasure
            } else {
                RoomFeature::Fountain
            };

            let applied = match feature {
                RoomFeature::Treasure => {
                    Self::apply_treasure(&mut level.grid, room)?;
                    true
                }
                RoomFeature::Fountain => {
                    // Never in the start room, and only where the floor can
                    // still ring around the block
                    if index > 0 && room.width >= 6 && room.height >= 6 {
                        Self::apply_fountain(&mut level.grid, room, level.player_start)?;
                        true
                    } else {
                        false
                    }
                }
            };

            if applied {
                report.special_rooms.push((room.id, feature));
            }
        }
        Ok(())
    }

    fn apply_treasure(grid: &mut TileGrid, room: &Room) -> DelveResult<()> {
        for pos in room.floor_positions() {
            if grid.tile_type_at(pos) == TileType::Floor {
                grid.set_tile(pos, Tile::new(TileType::TreasureFloor))?;
            }
        }
        Ok(())
    }

    fn apply_fountain(grid: &mut TileGrid, room: &Room, start: Position) -> DelveResult<()> {
        let center = room.center();
        for dy in -1..=0 {
            for dx in -1..=0 {
                let pos = Position::new(center.x + dx, center.y + dy);
                if pos != start && grid.tile_type_at(pos) == TileType::Floor {
                    grid.set_tile(pos, Tile::wall())?;
                }
            }
        }
        Ok(())
    }

    fn place_water(
        &self,
        level: &mut GeneratedLevel,
        rng: &mut StdRng,
        report: &mut HazardReport,
    ) -> DelveResult<()> {
        let patches = rng.gen_range(self.water_patches.clone());
        for _ in 0..patches {
            let room = &level.rooms[rng.gen_range(0..level.rooms.len())];
            let size = rng.gen_range(self.water_patch_size.clone());
            let span_x = (room.width as i32 - size + 1).max(1);
            let span_y = (room.height as i32 - size + 1).max(1);
            let origin = Position::new(
                room.top_left.x + rng.gen_range(0..span_x),
                room.top_left.y + rng.gen_range(0..span_y),
            );

            for dy in 0..size {
                for dx in 0..size {
                    let pos = Position::new(origin.x + dx, origin.y + dy);
                    if pos != level.player_start
                        && level.grid.tile_type_at(pos) == TileType::Floor
                    {
                        level.grid.set_tile(pos, Tile::new(TileType::Water))?;
                        report.water_tiles += 1;
                    }
                }
            }
        }
        Ok(())
    }

    fn place_traps(
        &self,
        level: &mut GeneratedLevel,
        rng: &mut StdRng,
        report: &mut HazardReport,
    ) -> DelveResult<()> {
        let traps = rng.gen_range(self.traps.clone());
        for _ in 0..traps {
            let room = &level.rooms[rng.gen_range(0..level.rooms.len())];
            let pos = Position::new(
                room.top_left.x + rng.gen_range(0..room.width as i32),
                room.top_left.y + rng.gen_range(0..room.height as i32),
            );
            let damage = rng.gen_range(self.trap_damage.clone());

            if pos != level.player_start && level.grid.tile_type_at(pos).is_plain_floor() {
                level.grid.set_tile(pos, Tile::hidden_trap(damage))?;
                report.traps += 1;
            }
        }
        Ok(())
    }
}

impl Default for HazardPlacer {
    fn default() -> Self {
        Self::new()
    }
}
