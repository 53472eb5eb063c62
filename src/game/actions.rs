//! # Actions Module
//!
//! The movement/interaction resolver.
//!
//! Every step taken by any actor, player or enemy, goes through
//! [`resolve_move`]. It produces exactly one [`MoveOutcome`], checking in
//! order: water delay, closed door, occupant, walkable tile, and finally
//! blocked.

use crate::{
    resolve_attack, ActorId, AttackReport, DelveError, DelveResult, Direction, Position, Roster,
    TileGrid, TileType,
};
use log::debug;
use serde::{Deserialize, Serialize};

/// The single result of one movement intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveOutcome {
    /// The actor was slowed by water and lost this move
    SkippedTurn,
    /// A closed door at `at` was opened; the actor stayed put
    OpenedDoor { at: Position },
    /// The target cell held a hostile actor
    Attacked(AttackReport),
    /// The actor stepped into the target cell
    Moved {
        from: Position,
        to: Position,
        /// Damage taken from a hidden trap in the new cell
        trap_damage: Option<u32>,
        /// The new cell is water, so the next move is skipped
        slowed: bool,
    },
    /// Wall, boundary, or a friendly actor in the way
    Blocked { at: Position },
}

impl MoveOutcome {
    /// Whether the actor changed cells.
    pub fn moved(&self) -> bool {
        matches!(self, MoveOutcome::Moved { .. })
    }
}

/// Resolves one step of `actor` in `direction`.
///
/// Occupants only count while alive. The player and enemies attack each
/// other; an enemy walking into another enemy is blocked instead.
pub fn resolve_move(
    grid: &mut TileGrid,
    roster: &mut Roster,
    actor: ActorId,
    direction: Direction,
) -> DelveResult<MoveOutcome> {
    let entity = roster
        .get_mut(actor)
        .ok_or_else(|| DelveError::InvalidAction(format!("unknown actor {}", actor)))?;
    if !entity.is_alive() {
        return Err(DelveError::InvalidAction(format!("{} is dead", actor)));
    }

    if entity.movement_delayed() {
        entity.set_movement_delayed(false);
        debug!("{} is slowed and skips the move", actor);
        return Ok(MoveOutcome::SkippedTurn);
    }

    let from = entity.position();
    let target = from.step(direction);

    if grid.tile_type_at(target) == TileType::DoorClosed {
        grid.open_door(target);
        debug!("{} opens the door at {}", actor, target);
        return Ok(MoveOutcome::OpenedDoor { at: target });
    }

    if let Some(occupant) = roster.living_occupant_at(target, actor) {
        if occupant.is_player() == actor.is_player() {
            return Ok(MoveOutcome::Blocked { at: target });
        }
        let report = resolve_attack(roster, actor, occupant)?;
        return Ok(MoveOutcome::Attacked(report));
    }

    if !grid.is_walkable(target) {
        return Ok(MoveOutcome::Blocked { at: target });
    }

    let trap_damage = grid.trigger_trap(target);
    let slowed = grid.tile_at(target).slows_movement();

    let entity = roster
        .get_mut(actor)
        .ok_or_else(|| DelveError::InvalidAction(format!("unknown actor {}", actor)))?;
    entity.set_position(target);
    if let Some(amount) = trap_damage {
        entity.stats_mut().take_damage(amount);
        debug!("{} triggers a trap at {} for {} damage", actor, target, amount);
    }
    if slowed {
        entity.set_movement_delayed(true);
    }

    Ok(MoveOutcome::Moved {
        from,
        to: target,
        trap_damage,
        slowed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Enemy, PlayerCharacter, Tile};

    /// 7x5 room: walls on the border, floor inside.
    fn open_room() -> TileGrid {
        let mut grid = TileGrid::new(7, 5);
        for y in 1..4 {
            for x in 1..6 {
                grid.set_tile(Position::new(x, y), Tile::floor()).unwrap();
            }
        }
        grid
    }

    fn roster_at(player: Position, enemies: Vec<Enemy>) -> Roster {
        Roster::new(PlayerCharacter::new(player), enemies)
    }

    #[test]
    fn test_step_onto_floor() {
        let mut grid = open_room();
        let mut roster = roster_at(Position::new(2, 2), vec![]);

        let outcome =
            resolve_move(&mut grid, &mut roster, ActorId::Player, Direction::East).unwrap();
        assert_eq!(
            outcome,
            MoveOutcome::Moved {
                from: Position::new(2, 2),
                to: Position::new(3, 2),
                trap_damage: None,
                slowed: false,
            }
        );
        assert_eq!(roster.player.position, Position::new(3, 2));
    }

    #[test]
    fn test_wall_blocks_without_state_change() {
        let mut grid = open_room();
        let before = grid.clone();
        let mut roster = roster_at(Position::new(1, 1), vec![]);

        let outcome =
            resolve_move(&mut grid, &mut roster, ActorId::Player, Direction::North).unwrap();
        assert_eq!(outcome, MoveOutcome::Blocked { at: Position::new(1, 0) });
        assert_eq!(roster.player.position, Position::new(1, 1));
        assert_eq!(grid, before);
    }

    #[test]
    fn test_out_of_bounds_is_blocked() {
        let mut grid = TileGrid::filled(3, 3, Tile::floor());
        let mut roster = roster_at(Position::new(0, 0), vec![]);

        let outcome =
            resolve_move(&mut grid, &mut roster, ActorId::Player, Direction::West).unwrap();
        assert_eq!(outcome, MoveOutcome::Blocked { at: Position::new(-1, 0) });
    }

    #[test]
    fn test_door_opens_before_moving() {
        let mut grid = open_room();
        let door = Position::new(3, 2);
        grid.set_tile(door, Tile::new(TileType::DoorClosed)).unwrap();
        let mut roster = roster_at(Position::new(2, 2), vec![]);

        let first =
            resolve_move(&mut grid, &mut roster, ActorId::Player, Direction::East).unwrap();
        assert_eq!(first, MoveOutcome::OpenedDoor { at: door });
        assert_eq!(roster.player.position, Position::new(2, 2));
        assert_eq!(grid.tile_type_at(door), TileType::DoorOpen);

        let second =
            resolve_move(&mut grid, &mut roster, ActorId::Player, Direction::East).unwrap();
        assert!(second.moved());
        assert_eq!(roster.player.position, door);
        assert_eq!(grid.tile_type_at(door), TileType::DoorOpen);
    }

    #[test]
    fn test_door_takes_priority_over_occupant() {
        let mut grid = open_room();
        let door = Position::new(3, 2);
        grid.set_tile(door, Tile::new(TileType::DoorClosed)).unwrap();
        let mut roster = roster_at(Position::new(2, 2), vec![Enemy::grunt(door)]);

        let outcome =
            resolve_move(&mut grid, &mut roster, ActorId::Player, Direction::East).unwrap();
        assert_eq!(outcome, MoveOutcome::OpenedDoor { at: door });
        assert_eq!(roster.enemies[0].stats.health, 20);
    }

    #[test]
    fn test_walking_into_enemy_attacks() {
        let mut grid = open_room();
        let mut roster = roster_at(Position::new(2, 2), vec![Enemy::grunt(Position::new(3, 2))]);

        let outcome =
            resolve_move(&mut grid, &mut roster, ActorId::Player, Direction::East).unwrap();
        match outcome {
            MoveOutcome::Attacked(report) => {
                assert_eq!(report.defender, ActorId::Enemy(0));
                assert_eq!(report.damage, 5);
            }
            other => panic!("expected an attack, got {:?}", other),
        }
        assert_eq!(roster.player.position, Position::new(2, 2));
        assert_eq!(roster.enemies[0].stats.health, 15);
    }

    #[test]
    fn test_dead_enemy_is_walked_over() {
        let mut grid = open_room();
        let mut corpse = Enemy::grunt(Position::new(3, 2));
        corpse.stats.health = 0;
        let mut roster = roster_at(Position::new(2, 2), vec![corpse]);

        let outcome =
            resolve_move(&mut grid, &mut roster, ActorId::Player, Direction::East).unwrap();
        assert!(outcome.moved());
    }

    #[test]
    fn test_enemies_block_each_other() {
        let mut grid = open_room();
        let mut roster = roster_at(
            Position::new(5, 3),
            vec![Enemy::grunt(Position::new(2, 2)), Enemy::scout(Position::new(3, 2))],
        );

        let outcome =
            resolve_move(&mut grid, &mut roster, ActorId::Enemy(0), Direction::East).unwrap();
        assert_eq!(outcome, MoveOutcome::Blocked { at: Position::new(3, 2) });
        assert_eq!(roster.enemies[1].stats.health, 15);
    }

    #[test]
    fn test_trap_fires_once() {
        let mut grid = open_room();
        let trap = Position::new(3, 2);
        grid.set_tile(trap, Tile::hidden_trap(12)).unwrap();
        let mut roster = roster_at(Position::new(2, 2), vec![]);

        let outcome =
            resolve_move(&mut grid, &mut roster, ActorId::Player, Direction::East).unwrap();
        assert_eq!(
            outcome,
            MoveOutcome::Moved {
                from: Position::new(2, 2),
                to: trap,
                trap_damage: Some(12),
                slowed: false,
            }
        );
        assert_eq!(roster.player.stats.health, 88);
        assert_eq!(grid.tile_at(trap).tile_type, TileType::TrapRevealed);
        assert_eq!(grid.tile_at(trap).pending_damage, 0);

        resolve_move(&mut grid, &mut roster, ActorId::Player, Direction::West).unwrap();
        let again =
            resolve_move(&mut grid, &mut roster, ActorId::Player, Direction::East).unwrap();
        assert!(matches!(again, MoveOutcome::Moved { trap_damage: None, .. }));
        assert_eq!(roster.player.stats.health, 88);
    }

    #[test]
    fn test_traps_hurt_enemies_too() {
        let mut grid = open_room();
        let trap = Position::new(3, 2);
        grid.set_tile(trap, Tile::hidden_trap(20)).unwrap();
        let mut roster = roster_at(Position::new(5, 3), vec![Enemy::grunt(Position::new(2, 2))]);

        resolve_move(&mut grid, &mut roster, ActorId::Enemy(0), Direction::East).unwrap();
        assert_eq!(roster.enemies[0].stats.health, 0);
        assert!(roster.living_enemy_ids().is_empty());
    }

    #[test]
    fn test_water_skips_exactly_one_move() {
        let mut grid = open_room();
        let water = Position::new(3, 2);
        grid.set_tile(water, Tile::new(TileType::Water)).unwrap();
        let mut roster = roster_at(Position::new(2, 2), vec![]);

        let entered =
            resolve_move(&mut grid, &mut roster, ActorId::Player, Direction::East).unwrap();
        assert!(matches!(entered, MoveOutcome::Moved { slowed: true, .. }));
        assert!(roster.player.movement_delayed);

        let skipped =
            resolve_move(&mut grid, &mut roster, ActorId::Player, Direction::East).unwrap();
        assert_eq!(skipped, MoveOutcome::SkippedTurn);
        assert_eq!(roster.player.position, water);
        assert!(!roster.player.movement_delayed);

        let resumed =
            resolve_move(&mut grid, &mut roster, ActorId::Player, Direction::East).unwrap();
        assert!(matches!(resumed, MoveOutcome::Moved { slowed: false, .. }));
        assert_eq!(roster.player.position, Position::new(4, 2));
    }

    #[test]
    fn test_dead_actor_cannot_move() {
        let mut grid = open_room();
        let mut roster = roster_at(Position::new(2, 2), vec![]);
        roster.player.stats.health = 0;
        assert!(resolve_move(&mut grid, &mut roster, ActorId::Player, Direction::East).is_err());
    }
}
