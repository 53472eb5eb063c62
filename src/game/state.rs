//! # Game State Module
//!
//! The session: one level, its actors and its floor items, advanced one tick
//! per player command.
//!
//! A tick resolves the player's command, then gives every living enemy one
//! move through the same resolver. Everything that happened comes back as a
//! list of [`GameEvent`]s for the presentation layer to narrate. Outside of a
//! tick the session only answers read-only queries.

use crate::{
    generate_level_with, resolve_move, run_enemy_turns, utils, ActorId, Archetype, DelveError,
    DelveResult, EncounterGenerator, Enemy, Entity, GeneratedLevel, GenerationConfig, Item,
    ItemGenerator, MoveOutcome, PlayerCharacter, PlayerCommand, Position, Room, Roster, Tile,
    TileGrid, WorldItem,
};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Oldest messages are dropped past this many entries.
const MESSAGE_LOG_CAPACITY: usize = 200;

/// Something that happened during a tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Moved {
        actor: ActorId,
        from: Position,
        to: Position,
    },
    Blocked {
        actor: ActorId,
        at: Position,
    },
    DoorOpened {
        actor: ActorId,
        at: Position,
    },
    Attacked {
        attacker: ActorId,
        defender: ActorId,
        damage: u32,
    },
    Died {
        actor: ActorId,
        /// None when a trap did it
        killer: Option<ActorId>,
    },
    TrapTriggered {
        actor: ActorId,
        at: Position,
        damage: u32,
    },
    Slowed {
        actor: ActorId,
        at: Position,
    },
    TurnSkipped {
        actor: ActorId,
    },
    ExperienceGained {
        amount: u32,
    },
    LeveledUp {
        level: u32,
    },
    ItemPickedUp {
        item: Item,
        /// Equipment that was dropped to make room
        replaced: Option<Item>,
    },
    PotionUsed {
        healed: u32,
    },
    /// The potion command did nothing; no tick was spent
    NoPotionEffect {
        reason: String,
    },
    /// The intent was not a cardinal unit vector; no tick was spent
    IntentRejected {
        dx: i32,
        dy: i32,
    },
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameEvent::Moved { actor, to, .. } => write!(f, "{} moves to {}", actor, to),
            GameEvent::Blocked { actor, at } => write!(f, "{} is blocked at {}", actor, at),
            GameEvent::DoorOpened { actor, at } => write!(f, "{} opens the door at {}", actor, at),
            GameEvent::Attacked {
                attacker,
                defender,
                damage,
            } => write!(f, "{} hits {} for {} damage", attacker, defender, damage),
            GameEvent::Died {
                actor,
                killer: Some(killer),
            } => write!(f, "{} is slain by {}", actor, killer),
            GameEvent::Died {
                actor,
                killer: None,
            } => write!(f, "{} dies", actor),
            GameEvent::TrapTriggered { actor, at, damage } => {
                write!(f, "{} springs a trap at {} and takes {} damage", actor, at, damage)
            }
            GameEvent::Slowed { actor, at } => {
                write!(f, "{} wades into water at {} and is slowed", actor, at)
            }
            GameEvent::TurnSkipped { actor } => write!(f, "{} struggles through the water", actor),
            GameEvent::ExperienceGained { amount } => write!(f, "You gain {} experience", amount),
            GameEvent::LeveledUp { level } => write!(f, "You reach level {}!", level),
            GameEvent::ItemPickedUp {
                item,
                replaced: Some(old),
            } => write!(f, "You pick up {}, dropping {}", item.label(), old.label()),
            GameEvent::ItemPickedUp {
                item,
                replaced: None,
            } => write!(f, "You pick up {}", item.label()),
            GameEvent::PotionUsed { healed } => {
                write!(f, "You drink a health potion and recover {} HP", healed)
            }
            GameEvent::NoPotionEffect { reason } => write!(f, "Nothing happens: {}", reason),
            GameEvent::IntentRejected { dx, dy } => {
                write!(f, "({}, {}) is not a cardinal step", dx, dy)
            }
        }
    }
}

/// Game statistics tracking player progress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStatistics {
    /// Total steps taken by the player
    pub steps_taken: u64,
    /// Total damage dealt by the player
    pub damage_dealt: u64,
    /// Total damage taken by the player, traps included
    pub damage_taken: u64,
    /// Enemies killed by the player
    pub enemies_defeated: u32,
    /// Number of items collected
    pub items_collected: u32,
    /// Traps sprung by anyone
    pub traps_triggered: u32,
    /// Doors opened by anyone
    pub doors_opened: u32,
    pub potions_used: u32,
}

impl GameStatistics {
    /// Creates new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates statistics based on a game event.
    pub fn update_from_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Moved {
                actor: ActorId::Player,
                ..
            } => {
                self.steps_taken += 1;
            }
            GameEvent::Attacked {
                attacker,
                defender,
                damage,
            } => {
                if attacker.is_player() {
                    self.damage_dealt += *damage as u64;
                }
                if defender.is_player() {
                    self.damage_taken += *damage as u64;
                }
            }
            GameEvent::TrapTriggered { actor, damage, .. } => {
                self.traps_triggered += 1;
                if actor.is_player() {
                    self.damage_taken += *damage as u64;
                }
            }
            GameEvent::Died {
                actor: ActorId::Enemy(_),
                killer: Some(ActorId::Player),
            } => {
                self.enemies_defeated += 1;
            }
            GameEvent::DoorOpened { .. } => {
                self.doors_opened += 1;
            }
            GameEvent::ItemPickedUp { .. } => {
                self.items_collected += 1;
            }
            GameEvent::PotionUsed { .. } => {
                self.potions_used += 1;
            }
            _ => {}
        }
    }
}

/// Game completion state for handling endings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameCompletionState {
    /// Game is still in progress
    Playing,
    /// Player died; no further commands are accepted
    PlayerDied,
    /// Every enemy of the level is dead. Play may continue.
    Cleared,
}

/// Read-only view of the player for presentation layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub position: Position,
    pub health: u32,
    pub max_health: u32,
    /// Attack including the weapon bonus
    pub attack: u32,
    /// Defense including the armor bonus
    pub defense: u32,
    pub level: u32,
    pub experience: u32,
    pub next_level_threshold: u32,
    pub weapon: Option<Item>,
    pub armor: Option<Item>,
    pub potions: usize,
    pub slowed: bool,
}

/// Read-only view of a living enemy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemySnapshot {
    pub id: ActorId,
    pub archetype: Archetype,
    pub position: Position,
    pub health: u32,
    pub max_health: u32,
}

/// Everything a presentation layer needs to draw a frame, minus the tiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub turn_number: u64,
    pub completion_state: GameCompletionState,
    pub player: PlayerSnapshot,
    pub enemies: Vec<EnemySnapshot>,
    pub items: Vec<WorldItem>,
    pub statistics: GameStatistics,
}

/// Central game state containing all game data.
///
/// The session exclusively owns the grid and the roster. The resolver and AI
/// borrow them for the duration of a tick and never keep them.
#[derive(Debug, Clone)]
pub struct GameState {
    grid: TileGrid,
    rooms: Vec<Room>,
    roster: Roster,
    items: Vec<WorldItem>,
    player_start: Position,
    /// Completed ticks
    turn_number: u64,
    message_log: Vec<String>,
    statistics: GameStatistics,
    completion_state: GameCompletionState,
    /// Random number generator seed
    rng_seed: u64,
}

impl GameState {
    /// Generates a complete level from `config` and starts a session on it.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{GameState, GenerationConfig};
    ///
    /// let game = GameState::new(&GenerationConfig::for_testing(42)).unwrap();
    /// assert_eq!(game.turn_number(), 0);
    /// assert!(game.tile_at(game.player().position).is_walkable());
    /// ```
    pub fn new(config: &GenerationConfig) -> DelveResult<Self> {
        let mut rng = utils::create_rng(config);
        let level = generate_level_with(config, &mut rng)?;

        let enemies = if config.spawn_enemies {
            EncounterGenerator::new().populate(&level, &mut rng)?
        } else {
            Vec::new()
        };
        let items = if config.spawn_items {
            ItemGenerator::new().scatter(&level, &enemies, config, &mut rng)?
        } else {
            Vec::new()
        };

        info!(
            "New game (seed {}): {}x{}, {} rooms, {} enemies, {} items",
            config.seed,
            config.width,
            config.height,
            level.rooms.len(),
            enemies.len(),
            items.len()
        );

        Ok(Self::from_parts(level, enemies, items, config.seed))
    }

    /// Starts a session on a prepared level. The player is placed at the
    /// level's start cell.
    pub fn from_parts(
        level: GeneratedLevel,
        enemies: Vec<Enemy>,
        items: Vec<WorldItem>,
        seed: u64,
    ) -> Self {
        let player = PlayerCharacter::new(level.player_start);
        Self {
            grid: level.grid,
            rooms: level.rooms,
            roster: Roster::new(player, enemies),
            items,
            player_start: level.player_start,
            turn_number: 0,
            message_log: Vec::new(),
            statistics: GameStatistics::new(),
            completion_state: GameCompletionState::Playing,
            rng_seed: seed,
        }
    }

    /// Submits a raw movement intent.
    ///
    /// Anything but a cardinal unit vector is rejected with a single
    /// [`GameEvent::IntentRejected`] and no tick is spent.
    pub fn submit_player_intent(&mut self, dx: i32, dy: i32) -> DelveResult<Vec<GameEvent>> {
        self.ensure_accepting_commands()?;

        match PlayerCommand::from_delta(dx, dy) {
            Some(command) => self.submit_command(command),
            None => {
                debug!("Rejected intent ({}, {})", dx, dy);
                let events = vec![GameEvent::IntentRejected { dx, dy }];
                self.record(&events);
                Ok(events)
            }
        }
    }

    /// Runs one tick: the player's command, then one move per living enemy.
    ///
    /// A potion command that would do nothing is reported without spending
    /// the tick. Fails once the player is dead.
    pub fn submit_command(&mut self, command: PlayerCommand) -> DelveResult<Vec<GameEvent>> {
        self.ensure_accepting_commands()?;

        let mut events = Vec::new();
        match command {
            PlayerCommand::Move(direction) => {
                let outcome =
                    resolve_move(&mut self.grid, &mut self.roster, ActorId::Player, direction)?;
                events.extend(outcome_events(ActorId::Player, &outcome, &self.roster));

                if let MoveOutcome::Moved { to, .. } = outcome {
                    if self.roster.player.is_alive() {
                        events.extend(self.pick_up_items_at(to));
                    }
                }
            }
            PlayerCommand::UseHealthPotion => match self.roster.player.use_health_potion() {
                Some(healed) => events.push(GameEvent::PotionUsed { healed }),
                None => {
                    let reason = if self.roster.player.potion_count() == 0 {
                        "no health potion to drink"
                    } else {
                        "already at full health"
                    };
                    let events = vec![GameEvent::NoPotionEffect {
                        reason: reason.to_string(),
                    }];
                    self.record(&events);
                    return Ok(events);
                }
            },
        }

        if self.roster.player.is_alive() {
            for (actor, outcome) in run_enemy_turns(&mut self.grid, &mut self.roster)? {
                events.extend(outcome_events(actor, &outcome, &self.roster));
            }
        }

        self.turn_number += 1;
        self.record(&events);
        self.update_completion_state();
        debug!("Turn {} produced {} events", self.turn_number, events.len());

        Ok(events)
    }

    /// Picks up every item lying at `position`.
    fn pick_up_items_at(&mut self, position: Position) -> Vec<GameEvent> {
        let mut events = Vec::new();
        while let Some(index) = self
            .items
            .iter()
            .position(|world_item| world_item.position == position)
        {
            let item = self.items.remove(index).item;
            let replaced = self.roster.player.pick_up(item);
            events.push(GameEvent::ItemPickedUp { item, replaced });
        }
        events
    }

    fn ensure_accepting_commands(&self) -> DelveResult<()> {
        if self.completion_state == GameCompletionState::PlayerDied {
            return Err(DelveError::InvalidState(
                "the player is dead; no further commands are accepted".to_string(),
            ));
        }
        Ok(())
    }

    /// Feeds events to the statistics and the message log.
    fn record(&mut self, events: &[GameEvent]) {
        for event in events {
            self.statistics.update_from_event(event);
            self.message_log.push(event.to_string());
        }
        if self.message_log.len() > MESSAGE_LOG_CAPACITY {
            let overflow = self.message_log.len() - MESSAGE_LOG_CAPACITY;
            self.message_log.drain(..overflow);
        }
    }

    fn update_completion_state(&mut self) {
        if !self.roster.player.is_alive() {
            if self.completion_state != GameCompletionState::PlayerDied {
                info!("Player died on turn {}", self.turn_number);
            }
            self.completion_state = GameCompletionState::PlayerDied;
        } else if self.completion_state == GameCompletionState::Playing
            && !self.roster.enemies.is_empty()
            && self.roster.living_enemy_ids().is_empty()
        {
            info!("Level cleared on turn {}", self.turn_number);
            self.completion_state = GameCompletionState::Cleared;
        }
    }

    /// Returns the tile at `pos`; out-of-range reads are walls.
    pub fn tile_at(&self, pos: Position) -> Tile {
        self.grid.tile_at(pos)
    }

    pub fn width(&self) -> u32 {
        self.grid.width()
    }

    pub fn height(&self) -> u32 {
        self.grid.height()
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn player(&self) -> &PlayerCharacter {
        &self.roster.player
    }

    /// All enemies, dead ones included, in update order.
    pub fn enemies(&self) -> &[Enemy] {
        &self.roster.enemies
    }

    pub fn items(&self) -> &[WorldItem] {
        &self.items
    }

    pub fn player_start(&self) -> Position {
        self.player_start
    }

    pub fn turn_number(&self) -> u64 {
        self.turn_number
    }

    pub fn messages(&self) -> &[String] {
        &self.message_log
    }

    pub fn statistics(&self) -> &GameStatistics {
        &self.statistics
    }

    pub fn completion_state(&self) -> GameCompletionState {
        self.completion_state
    }

    pub fn seed(&self) -> u64 {
        self.rng_seed
    }

    /// Checks if the game has ended.
    pub fn is_game_ended(&self) -> bool {
        self.completion_state == GameCompletionState::PlayerDied
    }

    pub fn player_snapshot(&self) -> PlayerSnapshot {
        let player = &self.roster.player;
        PlayerSnapshot {
            position: player.position,
            health: player.stats.health,
            max_health: player.stats.max_health,
            attack: crate::effective_attack(player),
            defense: crate::effective_defense(player),
            level: player.level,
            experience: player.experience,
            next_level_threshold: player.next_level_threshold,
            weapon: player.weapon,
            armor: player.armor,
            potions: player.potion_count(),
            slowed: player.movement_delayed,
        }
    }

    /// Living enemies only.
    pub fn enemy_snapshots(&self) -> Vec<EnemySnapshot> {
        self.roster
            .living_enemy_ids()
            .into_iter()
            .filter_map(|id| match id {
                ActorId::Enemy(index) => self.roster.enemies.get(index).map(|enemy| EnemySnapshot {
                    id,
                    archetype: enemy.archetype,
                    position: enemy.position,
                    health: enemy.stats.health,
                    max_health: enemy.stats.max_health,
                }),
                ActorId::Player => None,
            })
            .collect()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            turn_number: self.turn_number,
            completion_state: self.completion_state,
            player: self.player_snapshot(),
            enemies: self.enemy_snapshots(),
            items: self.items.clone(),
            statistics: self.statistics.clone(),
        }
    }

    /// Serializes the current snapshot to pretty JSON.
    pub fn snapshot_json(&self) -> DelveResult<String> {
        serde_json::to_string_pretty(&self.snapshot()).map_err(DelveError::from)
    }
}

/// Translates one resolver outcome into narration events.
///
/// Death is read back from the roster, so call this after the outcome has
/// been applied.
fn outcome_events(actor: ActorId, outcome: &MoveOutcome, roster: &Roster) -> Vec<GameEvent> {
    let mut events = Vec::new();
    match outcome {
        MoveOutcome::SkippedTurn => events.push(GameEvent::TurnSkipped { actor }),
        MoveOutcome::OpenedDoor { at } => events.push(GameEvent::DoorOpened { actor, at: *at }),
        MoveOutcome::Blocked { at } => events.push(GameEvent::Blocked { actor, at: *at }),
        MoveOutcome::Attacked(report) => {
            events.push(GameEvent::Attacked {
                attacker: report.attacker,
                defender: report.defender,
                damage: report.damage,
            });
            if report.killed {
                events.push(GameEvent::Died {
                    actor: report.defender,
                    killer: Some(report.attacker),
                });
            }
            if report.experience_awarded > 0 {
                events.push(GameEvent::ExperienceGained {
                    amount: report.experience_awarded,
                });
            }
            events.extend(
                report
                    .levels_gained
                    .iter()
                    .map(|level| GameEvent::LeveledUp { level: *level }),
            );
        }
        MoveOutcome::Moved {
            from,
            to,
            trap_damage,
            slowed,
        } => {
            events.push(GameEvent::Moved {
                actor,
                from: *from,
                to: *to,
            });
            if let Some(damage) = trap_damage {
                events.push(GameEvent::TrapTriggered {
                    actor,
                    at: *to,
                    damage: *damage,
                });
                if roster.get(actor).map_or(false, |entity| !entity.is_alive()) {
                    events.push(GameEvent::Died {
                        actor,
                        killer: None,
                    });
                }
            }
            if *slowed {
                events.push(GameEvent::Slowed { actor, at: *to });
            }
        }
    }
    events
}
