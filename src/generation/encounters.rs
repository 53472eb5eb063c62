//! # Encounter Generation
//!
//! Enemy placement. Every room except the first gets one or two enemies on
//! free floor inside its walls; the first room is left for the player.

use crate::{config, Archetype, DelveResult, Enemy, GeneratedLevel, Position, Room};
use log::debug;
use rand::{rngs::StdRng, Rng};

/// Rolls enemy archetypes and places enemies in rooms.
#[derive(Debug, Clone)]
pub struct EncounterGenerator {
    /// Chance that a spawned enemy is a scout rather than a grunt
    pub scout_chance: f64,
    /// Enemies attempted per room, inclusive
    pub enemies_per_room: (u32, u32),
}

impl EncounterGenerator {
    pub fn new() -> Self {
        Self {
            scout_chance: config::SCOUT_SPAWN_CHANCE,
            enemies_per_room: (1, 2),
        }
    }

    /// Spawns enemies across the level's rooms, in room order.
    ///
    /// A spawn attempt that lands on anything but free floor is dropped.
    pub fn populate(&self, level: &GeneratedLevel, rng: &mut StdRng) -> DelveResult<Vec<Enemy>> {
        let mut enemies: Vec<Enemy> = Vec::new();

        for room in level.rooms.iter().skip(1) {
            let attempts = rng.gen_range(self.enemies_per_room.0..=self.enemies_per_room.1);
            for _ in 0..attempts {
                let pos = interior_cell(room, rng);
                let archetype = self.roll_archetype(rng);

                let free = level.grid.tile_type_at(pos).is_plain_floor()
                    && pos != level.player_start
                    && !enemies.iter().any(|enemy| enemy.position == pos);
                if free {
                    enemies.push(Enemy::new(archetype, pos));
                }
            }
        }

        debug!("Spawned {} enemies", enemies.len());
        Ok(enemies)
    }

    fn roll_archetype(&self, rng: &mut StdRng) -> Archetype {
        if rng.gen_bool(self.scout_chance) {
            Archetype::Scout
        } else {
            Archetype::Grunt
        }
    }
}

impl Default for EncounterGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Picks a cell inside the room's walls.
pub(crate) fn interior_cell(room: &Room, rng: &mut StdRng) -> Position {
    let span_x = (room.width as i32 - 2).max(1);
    let span_y = (room.height as i32 - 2).max(1);
    Position::new(
        room.top_left.x + 1 + rng.gen_range(0..span_x),
        room.top_left.y + 1 + rng.gen_range(0..span_y),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{generate_level_with, utils, GenerationConfig};

    fn level(seed: u64) -> (GeneratedLevel, StdRng) {
        let config = GenerationConfig::for_testing(seed);
        let mut rng = utils::create_rng(&config);
        let level = generate_level_with(&config, &mut rng).unwrap();
        (level, rng)
    }

    #[test]
    fn test_enemies_stand_on_free_floor() {
        for seed in 0..30 {
            let (level, mut rng) = level(seed);
            let enemies = EncounterGenerator::new().populate(&level, &mut rng).unwrap();

            for (i, enemy) in enemies.iter().enumerate() {
                assert!(level.grid.tile_type_at(enemy.position).is_plain_floor());
                assert_ne!(enemy.position, level.player_start);
                assert!(enemies[i + 1..].iter().all(|other| other.position != enemy.position));
            }
        }
    }

    #[test]
    fn test_first_room_stays_empty() {
        for seed in 0..30 {
            let (level, mut rng) = level(seed);
            let enemies = EncounterGenerator::new().populate(&level, &mut rng).unwrap();
            if let Some(first) = level.rooms.first() {
                assert!(enemies.iter().all(|enemy| !first.contains(enemy.position)));
            }
            assert!(enemies.len() <= 2 * level.rooms.len().saturating_sub(1));
        }
    }

    #[test]
    fn test_spawned_enemies_are_fresh() {
        let (level, mut rng) = level(5);
        for enemy in EncounterGenerator::new().populate(&level, &mut rng).unwrap() {
            assert_eq!(enemy.stats, enemy.archetype.base_stats());
            assert!(!enemy.movement_delayed);
        }
    }

    #[test]
    fn test_archetype_roll_respects_chance() {
        let mut rng = utils::create_rng(&GenerationConfig::default());

        let always_grunt = EncounterGenerator {
            scout_chance: 0.0,
            ..EncounterGenerator::new()
        };
        let always_scout = EncounterGenerator {
            scout_chance: 1.0,
            ..EncounterGenerator::new()
        };
        for _ in 0..20 {
            assert_eq!(always_grunt.roll_archetype(&mut rng), Archetype::Grunt);
            assert_eq!(always_scout.roll_archetype(&mut rng), Archetype::Scout);
        }
    }

    #[test]
    fn test_populate_uses_the_configured_scout_chance() {
        let scouts_only = EncounterGenerator {
            scout_chance: 1.0,
            ..EncounterGenerator::new()
        };
        let mut spawned = 0;
        for seed in 0..10 {
            let (level, mut rng) = level(seed);
            let enemies = scouts_only.populate(&level, &mut rng).unwrap();
            assert!(enemies.iter().all(|enemy| enemy.archetype == Archetype::Scout));
            spawned += enemies.len();
        }
        assert!(spawned > 0);
    }

    #[test]
    fn test_interior_cell_stays_inside_walls() {
        let room = Room::new(0, Position::new(4, 6), 5, 7);
        let mut rng = utils::create_rng(&GenerationConfig::default());
        for _ in 0..200 {
            let pos = interior_cell(&room, &mut rng);
            assert!(room.contains(pos));
            assert!(!room.is_border(pos));
        }
    }
}
