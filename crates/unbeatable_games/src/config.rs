//! Match configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};
use unbeatable_tictactoe::{AiPlayer, HumanPlayer, Mark, Player, ScriptedSource, SearchMode};

/// Configuration for one seat at the board.
///
/// A seat with a move list is played by a scripted human; a seat without
/// one is played by the AI.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct SeatConfig {
    /// Display name.
    name: String,

    /// Cell indices to play, in order of preference.
    #[serde(default)]
    moves: Option<Vec<usize>>,
}

impl SeatConfig {
    /// Seat played by the AI.
    pub fn ai(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            moves: None,
        }
    }

    /// Seat played from a fixed move list.
    pub fn scripted(name: impl Into<String>, moves: Vec<usize>) -> Self {
        Self {
            name: name.into(),
            moves: Some(moves),
        }
    }
}

/// Configuration for a match between two seats.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Seed for the AI opening move; entropy when absent.
    #[serde(default)]
    seed: Option<u64>,

    /// How the AI explores the root of its search.
    #[serde(default)]
    search: SearchMode,

    /// Seat playing X.
    #[serde(default = "default_x")]
    x: SeatConfig,

    /// Seat playing O.
    #[serde(default = "default_o")]
    o: SeatConfig,
}

#[instrument]
fn default_x() -> SeatConfig {
    SeatConfig::ai("AI X")
}

#[instrument]
fn default_o() -> SeatConfig {
    SeatConfig::ai("AI O")
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            seed: None,
            search: SearchMode::default(),
            x: default_x(),
            o: default_o(),
        }
    }
}

impl MatchConfig {
    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml(&content)?;
        info!(x = %config.x.name, o = %config.o.name, "Config loaded successfully");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Overrides the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Overrides the search mode.
    pub fn with_search(mut self, search: SearchMode) -> Self {
        self.search = search;
        self
    }

    /// Replaces the seat for `mark`.
    pub fn with_seat(mut self, mark: Mark, seat: SeatConfig) -> Self {
        match mark {
            Mark::X => self.x = seat,
            Mark::O => self.o = seat,
        }
        self
    }

    /// Returns the seat for `mark`.
    pub fn seat(&self, mark: Mark) -> &SeatConfig {
        match mark {
            Mark::X => &self.x,
            Mark::O => &self.o,
        }
    }

    /// Checks that every scripted move names a cell.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for mark in [Mark::X, Mark::O] {
            let seat = self.seat(mark);
            if let Some(bad) = seat.moves.iter().flatten().find(|cell| **cell > 8) {
                return Err(ConfigError::new(format!(
                    "Seat {} ({}) has move {} outside 0-8",
                    mark, seat.name, bad
                )));
            }
        }
        Ok(())
    }

    /// Builds the player for `mark`.
    #[instrument(skip(self))]
    pub fn build_player(&self, mark: Mark) -> Box<dyn Player> {
        let seat = self.seat(mark);
        match &seat.moves {
            Some(moves) => Box::new(HumanPlayer::new(
                seat.name.clone(),
                mark,
                ScriptedSource::from_cells(moves.iter().copied()),
            )),
            None => {
                let ai = match self.seed {
                    // Distinct streams per mark from one seed.
                    Some(seed) => AiPlayer::seeded(seat.name.clone(), mark, seed.wrapping_add(mark as u64)),
                    None => AiPlayer::from_entropy(seat.name.clone(), mark),
                };
                Box::new(ai.with_search_mode(self.search))
            }
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
