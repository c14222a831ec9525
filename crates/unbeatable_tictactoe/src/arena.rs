//! Batches of AI-versus-AI games.

use crate::player::{AiPlayer, PlayerError};
use crate::search::SearchMode;
use crate::state::GameState;
use crate::turn::{GameStatus, TurnController};
use crate::types::Mark;
use derive_getters::Getters;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::ops::Add;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::{info, instrument};

/// Tally of a batch of games.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[must_use]
pub struct ArenaReport {
    /// Games played.
    games: u32,
    /// Games won by X.
    x_wins: u32,
    /// Games won by O.
    o_wins: u32,
    /// Games tied.
    ties: u32,
    /// Moves played across all games.
    moves: u32,
}

impl ArenaReport {
    fn single(status: GameStatus, moves: usize) -> Self {
        Self {
            games: 1,
            x_wins: (status == GameStatus::Won(Mark::X)) as u32,
            o_wins: (status == GameStatus::Won(Mark::O)) as u32,
            ties: (status == GameStatus::Tied) as u32,
            moves: moves as u32,
        }
    }

    /// True when every game was tied.
    pub fn all_tied(&self) -> bool {
        self.ties == self.games
    }
}

impl Add for ArenaReport {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            games: self.games + rhs.games,
            x_wins: self.x_wins + rhs.x_wins,
            o_wins: self.o_wins + rhs.o_wins,
            ties: self.ties + rhs.ties,
            moves: self.moves + rhs.moves,
        }
    }
}

/// Plays AI against AI from an empty board.
///
/// Game `i` seeds X with `seed + 2i` and O with `seed + 2i + 1`, so a run
/// is reproducible regardless of how rayon schedules the games.
#[derive(Debug, Clone, Copy)]
pub struct Arena {
    games: u32,
    seed: u64,
    mode: SearchMode,
    progress_every: Option<u32>,
}

impl Arena {
    /// Creates an arena for `games` games.
    pub fn new(games: u32, seed: u64) -> Self {
        Self {
            games,
            seed,
            mode: SearchMode::Sequential,
            progress_every: None,
        }
    }

    /// Sets the search mode both AIs use.
    pub fn with_search_mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Logs progress every `n` finished games.
    pub fn with_progress_every(mut self, n: u32) -> Self {
        self.progress_every = Some(n).filter(|n| *n > 0);
        self
    }

    /// Plays all games on the rayon pool.
    #[instrument(skip(self), fields(games = self.games, seed = self.seed, mode = %self.mode))]
    pub fn run(&self) -> Result<ArenaReport, PlayerError> {
        let finished = AtomicU32::default();

        let report = (0..self.games)
            .into_par_iter()
            .map(|game| {
                let report = self.play_one(game)?;
                if let Some(every) = self.progress_every {
                    let done = finished.fetch_add(1, Ordering::Relaxed) + 1;
                    if done % every == 0 {
                        info!(done, total = self.games, "Arena progress");
                    }
                }
                Ok(report)
            })
            .try_reduce(ArenaReport::default, |a, b| Ok(a + b))?;

        info!(
            x_wins = report.x_wins,
            o_wins = report.o_wins,
            ties = report.ties,
            "Arena finished"
        );
        Ok(report)
    }

    fn play_one(&self, game: u32) -> Result<ArenaReport, PlayerError> {
        let base = self.seed.wrapping_add(2 * game as u64);
        let mut x = AiPlayer::seeded(format!("AI X #{game}"), Mark::X, base).with_search_mode(self.mode);
        let mut o = AiPlayer::seeded(format!("AI O #{game}"), Mark::O, base.wrapping_add(1))
            .with_search_mode(self.mode);

        let outcome = TurnController::new(GameState::new()).run(&mut x, &mut o)?;
        Ok(ArenaReport::single(*outcome.status(), outcome.history().len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_addition() {
        let a = ArenaReport::single(GameStatus::Tied, 9);
        let b = ArenaReport::single(GameStatus::Won(Mark::O), 6);
        let sum = a + b;
        assert_eq!(*sum.games(), 2);
        assert_eq!(*sum.ties(), 1);
        assert_eq!(*sum.o_wins(), 1);
        assert_eq!(*sum.moves(), 15);
        assert!(!sum.all_tied());
    }

    #[test]
    fn test_short_run_all_tied() {
        let report = Arena::new(4, 11).run().unwrap();
        assert_eq!(*report.games(), 4);
        assert!(report.all_tied(), "{report:?}");
        assert_eq!(*report.moves(), 36);
    }
}
