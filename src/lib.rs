//! # Delve
//!
//! A turn-based, grid-based dungeon crawler core.
//!
//! ## Architecture Overview
//!
//! Delve owns the rules of the game and nothing else. Drawing, windowing and
//! keyboard wiring live outside the crate and talk to it through read-only
//! queries and one command sink per tick.
//!
//! - **Tile Grid**: dense cell state with door and trap transitions
//! - **Generation System**: rooms, corridors, hazards, enemies and floor items
//! - **Entity Model**: the player and enemies, with stats and equipment
//! - **Resolver**: turns a movement intent into exactly one outcome
//! - **AI Controller**: archetype policies that feed the same resolver
//! - **Game State**: the session that ties a tick together
//!
//! ## Determinism
//!
//! All randomness comes from a seeded [`rand::rngs::StdRng`] passed into the
//! generators, so a seed always reproduces the same level.

pub mod game;
pub mod generation;
pub mod input;

// Core module re-exports
pub use game::*;
pub use generation::*;
pub use input::*;

/// Core error type for the Delve engine.
#[derive(thiserror::Error, Debug)]
pub enum DelveError {
    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Generation parameters are unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Game state is invalid
    #[error("Invalid game state: {0}")]
    InvalidState(String),

    /// Action cannot be performed
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// Generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// A write addressed a cell outside the grid
    #[error("Position ({x}, {y}) is outside the grid")]
    OutOfBounds { x: i32, y: i32 },
}

/// Result type used throughout the Delve codebase.
pub type DelveResult<T> = Result<T, DelveError>;

/// Version information for the game.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Game balance constants.
pub mod config {
    /// Default dungeon width in tiles
    pub const DEFAULT_DUNGEON_WIDTH: u32 = 80;

    /// Default dungeon height in tiles
    pub const DEFAULT_DUNGEON_HEIGHT: u32 = 40;

    /// Room placement retries per room slot
    pub const ROOM_PLACEMENT_ATTEMPTS: u32 = 50;

    /// Default player starting health
    pub const DEFAULT_PLAYER_HEALTH: u32 = 100;

    /// Player attack before equipment
    pub const PLAYER_BASE_ATTACK: u32 = 5;

    /// Player defense before equipment
    pub const PLAYER_BASE_DEFENSE: u32 = 0;

    /// Max health gained on every level-up
    pub const LEVEL_UP_HEALTH_BONUS: u32 = 20;

    /// Experience needed to reach level 2
    pub const FIRST_LEVEL_THRESHOLD: u32 = 100;

    /// Growth factor applied to the threshold after each level
    pub const LEVEL_THRESHOLD_GROWTH: f64 = 1.5;

    pub const GRUNT_HEALTH: u32 = 20;
    pub const GRUNT_ATTACK: u32 = 10;
    pub const GRUNT_DEFENSE: u32 = 0;
    pub const GRUNT_EXPERIENCE: u32 = 10;
    pub const GRUNT_DETECTION_RADIUS: f64 = 8.0;

    pub const SCOUT_HEALTH: u32 = 15;
    pub const SCOUT_ATTACK: u32 = 3;
    pub const SCOUT_DEFENSE: u32 = 0;
    pub const SCOUT_EXPERIENCE: u32 = 15;
    pub const SCOUT_DETECTION_RADIUS: f64 = 10.0;
    pub const SCOUT_PREFERRED_DISTANCE: f64 = 5.0;

    /// Damage range of a hidden trap, rolled when the trap is placed
    pub const TRAP_DAMAGE_MIN: u32 = 10;
    pub const TRAP_DAMAGE_MAX: u32 = 20;

    pub const WEAPON_BONUS_MIN: u32 = 1;
    pub const WEAPON_BONUS_MAX: u32 = 5;
    pub const ARMOR_BONUS_MIN: u32 = 1;
    pub const ARMOR_BONUS_MAX: u32 = 3;
    pub const POTION_HEAL_MIN: u32 = 25;
    pub const POTION_HEAL_MAX: u32 = 50;

    pub const WATER_PATCHES_MIN: u32 = 3;
    pub const WATER_PATCHES_MAX: u32 = 5;
    pub const WATER_PATCH_SIZE_MIN: i32 = 2;
    pub const WATER_PATCH_SIZE_MAX: i32 = 3;
    pub const TRAPS_MIN: u32 = 5;
    pub const TRAPS_MAX: u32 = 10;

    /// Chance for a non-start room to get a treasure floor or a fountain
    pub const SPECIAL_ROOM_CHANCE: f64 = 0.2;

    /// Chance that a room holds a floor item
    pub const ROOM_ITEM_CHANCE: f64 = 0.5;

    /// Chance that a spawned enemy is a Scout rather than a Grunt
    pub const SCOUT_SPAWN_CHANCE: f64 = 1.0 / 3.0;
}
