//! # Command Definitions
//!
//! The commands a player can submit for one tick.

use crate::{Direction, Position};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One player command. Each accepted command runs exactly one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerCommand {
    /// Step (or open, or attack) in a cardinal direction
    Move(Direction),
    /// Drink the first carried health potion
    UseHealthPotion,
}

impl PlayerCommand {
    /// Builds a move from a raw intent vector.
    ///
    /// Only the four cardinal unit vectors are legal; zero and diagonal
    /// vectors are rejected here, before they reach the resolver.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Direction, PlayerCommand};
    ///
    /// assert_eq!(PlayerCommand::from_delta(0, -1), Some(PlayerCommand::Move(Direction::North)));
    /// assert_eq!(PlayerCommand::from_delta(1, 1), None);
    /// assert_eq!(PlayerCommand::from_delta(0, 0), None);
    /// ```
    pub fn from_delta(dx: i32, dy: i32) -> Option<Self> {
        Direction::from_delta(Position::new(dx, dy)).map(PlayerCommand::Move)
    }

    /// Maps a key to a command: `wasd` and `hjkl` move, `p` drinks a potion.
    pub fn parse(key: char) -> Option<Self> {
        let command = match key.to_ascii_lowercase() {
            'w' | 'k' => PlayerCommand::Move(Direction::North),
            's' | 'j' => PlayerCommand::Move(Direction::South),
            'a' | 'h' => PlayerCommand::Move(Direction::West),
            'd' | 'l' => PlayerCommand::Move(Direction::East),
            'p' => PlayerCommand::UseHealthPotion,
            _ => return None,
        };
        Some(command)
    }
}

impl fmt::Display for PlayerCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerCommand::Move(direction) => write!(f, "move {:?}", direction),
            PlayerCommand::UseHealthPotion => write!(f, "use health potion"),
        }
    }
}
