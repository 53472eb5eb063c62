//! # AI Module
//!
//! Enemy behavior policies.
//!
//! Each archetype maps to a pure function of the enemy, the grid, the
//! player's position and the cells other enemies hold that returns at most
//! one movement intent. Intents are
//! then resolved exactly like player moves, so doors, attacks and hazards
//! apply to enemies the same way.

use crate::{
    resolve_move, ActorId, Archetype, DelveResult, Direction, Enemy, Entity, MoveOutcome,
    Position, Roster, TileGrid, TileType,
};
use log::debug;

/// Picks the step along the larger component of `delta`. Ties go horizontal.
///
/// Returns None for a zero vector.
pub fn dominant_direction(delta: Position) -> Option<Direction> {
    if delta.x == 0 && delta.y == 0 {
        return None;
    }
    if delta.x.abs() >= delta.y.abs() {
        Direction::from_delta(Position::new(delta.x.signum(), 0))
    } else {
        Direction::from_delta(Position::new(0, delta.y.signum()))
    }
}

/// The step along the other axis than [`dominant_direction`], if that
/// component is non-zero.
fn secondary_direction(delta: Position) -> Option<Direction> {
    if delta.x.abs() >= delta.y.abs() {
        Direction::from_delta(Position::new(0, delta.y.signum()))
    } else {
        Direction::from_delta(Position::new(delta.x.signum(), 0))
    }
}

/// A wall or the grid boundary. Closed doors don't count: walking into one
/// opens it.
fn is_wall(grid: &TileGrid, pos: Position) -> bool {
    let tile_type = grid.tile_type_at(pos);
    !tile_type.is_walkable() && tile_type != TileType::DoorClosed
}

/// Decides the movement intent of `enemy` for this tick.
///
/// `occupied` holds the positions of the other living enemies.
pub fn decide_intent(
    enemy: &Enemy,
    grid: &TileGrid,
    player: Position,
    occupied: &[Position],
) -> Option<Direction> {
    match enemy.archetype {
        Archetype::Grunt => grunt_intent(enemy, grid, player),
        Archetype::Scout => scout_intent(enemy, grid, player, occupied),
    }
}

/// Melee chaser: closes in along the dominant axis while the player is in
/// range, swapping axis once if a wall is in the way.
fn grunt_intent(enemy: &Enemy, grid: &TileGrid, player: Position) -> Option<Direction> {
    if enemy.position.euclidean_distance(player) >= enemy.profile.detection_radius {
        return None;
    }

    let delta = player - enemy.position;
    let primary = dominant_direction(delta)?;
    if is_wall(grid, enemy.position.step(primary)) {
        if let Some(secondary) = secondary_direction(delta) {
            return Some(secondary);
        }
    }
    Some(primary)
}

/// Skirmisher: approaches to its preferred distance, backs off when the
/// player gets too close, and otherwise holds. A retreat never targets the
/// player or another enemy.
fn scout_intent(
    enemy: &Enemy,
    grid: &TileGrid,
    player: Position,
    occupied: &[Position],
) -> Option<Direction> {
    let distance = enemy.position.euclidean_distance(player);
    if distance >= enemy.profile.detection_radius {
        return None;
    }
    let preferred = enemy.profile.preferred_distance?;
    let delta = player - enemy.position;

    if distance > preferred {
        return dominant_direction(delta);
    }
    if distance >= preferred - 1.0 {
        return None;
    }

    let retreat = dominant_direction(delta)?.reversed();
    let [clockwise, counter_clockwise] = retreat.perpendicular();
    [retreat, clockwise, counter_clockwise]
        .into_iter()
        .find(|direction| {
            let target = enemy.position.step(*direction);
            grid.is_walkable(target) && target != player && !occupied.contains(&target)
        })
}

/// Runs one AI pass: every living enemy, in roster order, gets one intent
/// resolved. The pass stops early once the player is dead.
pub fn run_enemy_turns(
    grid: &mut TileGrid,
    roster: &mut Roster,
) -> DelveResult<Vec<(ActorId, MoveOutcome)>> {
    let mut outcomes = Vec::new();

    for id in roster.living_enemy_ids() {
        if !roster.player.is_alive() {
            break;
        }
        let ActorId::Enemy(index) = id else {
            continue;
        };
        let enemy = &roster.enemies[index];
        if !enemy.is_alive() {
            continue;
        }
        let occupied: Vec<Position> = roster
            .enemies
            .iter()
            .enumerate()
            .filter(|(other, candidate)| *other != index && candidate.is_alive())
            .map(|(_, candidate)| candidate.position)
            .collect();

        if let Some(direction) = decide_intent(enemy, grid, roster.player.position, &occupied) {
            debug!("{} ({}) moves {:?}", id, enemy.archetype.name(), direction);
            let outcome = resolve_move(grid, roster, id, direction)?;
            outcomes.push((id, outcome));
        }
    }

    Ok(outcomes)
}
