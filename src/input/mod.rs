//! # Input Module
//!
//! Input handling and command parsing for player interactions.
//!
//! Presentation layers own the keyboard; this module only turns the keys
//! they read into [`PlayerCommand`]s.

pub mod commands;

pub use commands::*;

use crate::{DelveError, DelveResult};

/// Input handler for processing player keys.
pub struct InputHandler {
    /// Whether to enable Vi-style movement keys (hjkl)
    pub vi_keys_enabled: bool,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHandler {
    /// Creates a new input handler.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{InputHandler, PlayerInput};
    ///
    /// let input_handler = InputHandler::new();
    /// assert_eq!(input_handler.parse_key('q'), Some(PlayerInput::Quit));
    /// ```
    pub fn new() -> Self {
        Self {
            vi_keys_enabled: true,
        }
    }

    /// Translates one key into player input, or None for unbound keys.
    pub fn parse_key(&self, key: char) -> Option<PlayerInput> {
        match key.to_ascii_lowercase() {
            'q' => Some(PlayerInput::Quit),
            '?' => Some(PlayerInput::Help),
            'h' | 'j' | 'k' | 'l' if !self.vi_keys_enabled => None,
            other => PlayerCommand::parse(other).map(PlayerInput::Command),
        }
    }

    /// Parses a whole move script such as `"ddssp"` into commands.
    ///
    /// Whitespace is ignored. Any other unbound key fails the whole script.
    pub fn parse_script(&self, script: &str) -> DelveResult<Vec<PlayerCommand>> {
        script
            .chars()
            .filter(|key| !key.is_whitespace())
            .map(|key| match self.parse_key(key) {
                Some(PlayerInput::Command(command)) => Ok(command),
                _ => Err(DelveError::InvalidAction(format!(
                    "'{}' is not a move or potion key",
                    key
                ))),
            })
            .collect()
    }
}

/// Player input types that can be processed by the input handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerInput {
    /// A command for the next tick
    Command(PlayerCommand),
    /// Quit the game
    Quit,
    /// Show help information
    Help,
}
