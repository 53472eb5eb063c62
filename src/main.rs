//! # Delve Main Entry Point
//!
//! Headless driver: generates a level, plays it from a move script or a
//! seeded random walk, and narrates every tick on stdout.

use clap::Parser;
use delve::{
    config, Archetype, DelveError, DelveResult, Direction, GameEvent, GameState,
    GenerationConfig, InputHandler, PlayerCommand, Position,
};
use log::{debug, info};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Command line arguments for Delve.
#[derive(Parser, Debug)]
#[command(name = "delve")]
#[command(about = "A turn-based grid dungeon crawler, played headless")]
#[command(version)]
struct Args {
    /// Random seed for dungeon generation
    #[arg(short, long)]
    seed: Option<u64>,

    /// Grid width in tiles
    #[arg(long, default_value_t = config::DEFAULT_DUNGEON_WIDTH)]
    width: u32,

    /// Grid height in tiles
    #[arg(long, default_value_t = config::DEFAULT_DUNGEON_HEIGHT)]
    height: u32,

    /// Number of room slots to fill
    #[arg(long, default_value_t = 10)]
    rooms: u32,

    /// Minimum room size, walls included
    #[arg(long, default_value_t = 5)]
    min_room_size: u32,

    /// Maximum room size, walls included
    #[arg(long, default_value_t = 10)]
    max_room_size: u32,

    /// Ticks of random walk when no move script is given
    #[arg(short, long, default_value_t = 50)]
    turns: u32,

    /// Move script, e.g. "ddssp" (wasd/hjkl to move, p for a potion)
    #[arg(short, long)]
    moves: Option<String>,

    /// Print the final state as JSON instead of a summary
    #[arg(long)]
    json: bool,

    /// Print the map before and after playing
    #[arg(long)]
    show_map: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> DelveResult<()> {
    let args = Args::parse();

    initialize_logging(&args.log_level)?;

    info!("Starting Delve v{}", delve::VERSION);

    let seed = args.seed.unwrap_or(12345);
    let generation = GenerationConfig {
        seed,
        width: args.width,
        height: args.height,
        room_count: args.rooms,
        min_room_size: args.min_room_size,
        max_room_size: args.max_room_size,
        ..GenerationConfig::new(seed)
    };
    let mut game = GameState::new(&generation)?;

    if args.show_map {
        println!("{}", render_map(&game));
    }

    match &args.moves {
        Some(script) => {
            let commands = InputHandler::new().parse_script(script)?;
            info!("Playing {} scripted commands", commands.len());
            play_script(&mut game, &commands)?;
        }
        None => {
            info!("Random walk for {} turns", args.turns);
            play_random_walk(&mut game, args.turns, seed)?;
        }
    }

    if args.show_map {
        println!("{}", render_map(&game));
    }

    if args.json {
        println!("{}", game.snapshot_json()?);
    } else {
        print_summary(&game);
    }

    Ok(())
}

fn unknown_log_level(log_level: &str) -> DelveError {
    DelveError::InvalidConfig(format!("unknown log level '{}'", log_level))
}

/// Initializes the logging system based on the specified log level.
fn initialize_logging(log_level: &str) -> DelveResult<()> {
    #[cfg(feature = "dev-tools")]
    {
        let level: tracing::Level = log_level
            .parse()
            .map_err(|_| unknown_log_level(log_level))?;

        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(false)
            .try_init()
            .map_err(|e| DelveError::InvalidState(e.to_string()))?;
    }

    #[cfg(not(feature = "dev-tools"))]
    {
        let filter: log::LevelFilter = log_level
            .parse()
            .map_err(|_| unknown_log_level(log_level))?;

        env_logger::Builder::new()
            .filter_level(filter)
            .format_target(false)
            .try_init()
            .map_err(|e| DelveError::InvalidState(e.to_string()))?;
    }

    Ok(())
}

fn play_script(game: &mut GameState, commands: &[PlayerCommand]) -> DelveResult<()> {
    for (played, command) in commands.iter().enumerate() {
        if game.is_game_ended() {
            info!("Game over; {} commands left unplayed", commands.len() - played);
            break;
        }
        let turn = game.turn_number() + 1;
        narrate(turn, game.submit_command(*command)?);
    }
    Ok(())
}

/// Walks in random cardinal directions, drinking a potion when badly hurt.
fn play_random_walk(game: &mut GameState, turns: u32, seed: u64) -> DelveResult<()> {
    let mut rng = StdRng::seed_from_u64(seed);
    let directions = Direction::all();

    for _ in 0..turns {
        if game.is_game_ended() {
            break;
        }

        let player = game.player();
        let badly_hurt = player.stats.health * 2 < player.stats.max_health;
        let command = if badly_hurt && player.potion_count() > 0 {
            PlayerCommand::UseHealthPotion
        } else {
            PlayerCommand::Move(directions[rng.gen_range(0..directions.len())])
        };
        debug!("Random walk picks {}", command);

        let turn = game.turn_number() + 1;
        narrate(turn, game.submit_command(command)?);
    }
    Ok(())
}

fn narrate(turn: u64, events: Vec<GameEvent>) {
    for event in events {
        println!("[turn {:>3}] {}", turn, event);
    }
}

/// Draws the grid with actors and items on top.
fn render_map(game: &GameState) -> String {
    let mut rows: Vec<Vec<char>> = game
        .grid()
        .to_text()
        .lines()
        .map(|line| line.chars().collect())
        .collect();

    let mut put = |pos: Position, glyph: char| {
        if let Some(cell) = rows
            .get_mut(pos.y as usize)
            .and_then(|row| row.get_mut(pos.x as usize))
        {
            *cell = glyph;
        }
    };

    for world_item in game.items() {
        put(world_item.position, '!');
    }
    for enemy in game.enemy_snapshots() {
        let glyph = match enemy.archetype {
            Archetype::Grunt => 'g',
            Archetype::Scout => 's',
        };
        put(enemy.position, glyph);
    }
    put(game.player().position, '@');

    rows.into_iter()
        .map(|row| row.into_iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

fn print_summary(game: &GameState) {
    let player = game.player_snapshot();
    let stats = game.statistics();

    println!();
    println!("=== Delve (seed {}) ===", game.seed());
    println!(
        "Outcome:   {:?} after {} turns",
        game.completion_state(),
        game.turn_number()
    );
    println!(
        "Player:    level {} at {}, {}/{} HP, {} ATK, {} DEF, {} potions",
        player.level,
        player.position,
        player.health,
        player.max_health,
        player.attack,
        player.defense,
        player.potions
    );
    println!(
        "Enemies:   {} alive, {} defeated",
        game.enemy_snapshots().len(),
        stats.enemies_defeated
    );
    println!(
        "Stats:     {} steps, {} dealt, {} taken, {} items, {} traps, {} doors",
        stats.steps_taken,
        stats.damage_dealt,
        stats.damage_taken,
        stats.items_collected,
        stats.traps_triggered,
        stats.doors_opened
    );
}
