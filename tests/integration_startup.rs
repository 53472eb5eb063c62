//! Integration tests: a full session can be generated, played and inspected.

use delve::{
    ActorId, DelveResult, Entity, GameEvent, GameCompletionState, GameState, GenerationConfig,
    InputHandler, PlayerCharacter, Position, TileType,
};

#[test]
fn test_basic_startup() -> DelveResult<()> {
    let game = GameState::new(&GenerationConfig::for_testing(12345))?;

    assert_eq!(game.turn_number(), 0);
    assert_eq!(game.completion_state(), GameCompletionState::Playing);
    assert!(!game.rooms().is_empty());

    // Player stands on walkable floor at the start cell
    let start = game.player_start();
    assert_eq!(game.player().position, start);
    assert!(game.tile_at(start).is_walkable());
    assert_ne!(game.tile_at(start).tile_type, TileType::Water);

    // No enemy or item shares the start cell
    assert!(game.enemies().iter().all(|enemy| enemy.position != start));
    assert!(game.items().iter().all(|item| item.position != start));

    Ok(())
}

#[test]
fn test_player_can_be_created() {
    let player = PlayerCharacter::new(Position::new(5, 5));
    assert_eq!(player.position, Position::new(5, 5));
    assert!(player.is_alive());
    assert_eq!(player.position(), Position::new(5, 5));
    assert_eq!(player.stats.health, 100);
}

#[test]
fn test_out_of_range_reads_are_walls() -> DelveResult<()> {
    let game = GameState::new(&GenerationConfig::for_testing(7))?;
    for pos in [
        Position::new(-1, 0),
        Position::new(0, -1),
        Position::new(game.width() as i32, 0),
        Position::new(0, game.height() as i32),
    ] {
        assert_eq!(game.tile_at(pos).tile_type, TileType::Wall);
        assert!(!game.tile_at(pos).is_walkable());
    }
    Ok(())
}

#[test]
fn test_scripted_session_runs_until_done() -> DelveResult<()> {
    let mut game = GameState::new(&GenerationConfig::for_testing(2024))?;
    let commands = InputHandler::new().parse_script("ddddssssaaaawwww p dsdsdsds")?;

    let mut ticks = 0;
    let mut player_steps = 0;
    for command in commands {
        if game.is_game_ended() {
            break;
        }
        let events = game.submit_command(command)?;
        assert!(!events.is_empty());
        player_steps += events
            .iter()
            .filter(|event| {
                matches!(
                    event,
                    GameEvent::Moved {
                        actor: ActorId::Player,
                        ..
                    }
                )
            })
            .count() as u64;
        ticks += 1;
    }

    assert!(game.turn_number() <= ticks);
    assert!(game.player().stats.health <= game.player().stats.max_health);
    assert_eq!(game.statistics().steps_taken, player_steps);
    Ok(())
}

#[test]
fn test_snapshot_feed_matches_queries() -> DelveResult<()> {
    let mut game = GameState::new(&GenerationConfig::for_testing(31))?;
    game.submit_player_intent(1, 0)?;
    game.submit_player_intent(0, 1)?;

    let snapshot = game.snapshot();
    assert_eq!(snapshot.turn_number, game.turn_number());
    assert_eq!(snapshot.player.position, game.player().position);
    assert_eq!(snapshot.enemies.len(), game.enemy_snapshots().len());
    assert_eq!(snapshot.items.len(), game.items().len());

    let json: serde_json::Value = serde_json::from_str(&game.snapshot_json()?)?;
    assert_eq!(json["turn_number"], game.turn_number());
    Ok(())
}

#[test]
fn test_same_seed_plays_out_identically() -> DelveResult<()> {
    let config = GenerationConfig::for_testing(77);
    let mut a = GameState::new(&config)?;
    let mut b = GameState::new(&config)?;

    for (dx, dy) in [(1, 0), (1, 0), (0, 1), (-1, 0), (0, -1), (1, 1), (0, 1)] {
        if a.is_game_ended() {
            break;
        }
        assert_eq!(a.submit_player_intent(dx, dy)?, b.submit_player_intent(dx, dy)?);
    }
    assert_eq!(a.snapshot(), b.snapshot());
    assert_eq!(a.messages(), b.messages());
    Ok(())
}
