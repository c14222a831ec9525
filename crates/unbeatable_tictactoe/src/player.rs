//! Player trait and implementations.
//!
//! The turn controller only sees `dyn Player`; whether a move comes from a
//! person behind some input device or from the search is decided by which
//! implementation was handed in.

use crate::action::MoveError;
use crate::position::{CELLS, Position};
use crate::search::{SearchMode, search_with};
use crate::state::GameState;
use crate::types::Mark;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use tracing::{debug, info, instrument, warn};

/// A player failed to produce a move.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum PlayerError {
    /// The move source for this mark has no more input.
    #[display("Input for {} closed before a move was chosen", _0)]
    InputClosed(Mark),

    /// The player had no move to offer.
    #[display("{} produced no move", _0)]
    NoMove(Mark),
}

impl std::error::Error for PlayerError {}

/// Trait for players that can make moves.
pub trait Player: Send {
    /// Mark this player places.
    fn mark(&self) -> Mark;

    /// Returns the player's display name.
    fn name(&self) -> &str;

    /// Chooses a legal position for the current state.
    fn choose_move(&mut self, state: &GameState) -> Result<Position, PlayerError>;
}

// ─────────────────────────────────────────────────────────────
//  Human-delegate player
// ─────────────────────────────────────────────────────────────

/// One answer from a move source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveReply {
    /// A cell index, not yet validated.
    Cell(usize),
    /// The input could not be read as a cell; ask again.
    Unreadable,
}

/// External collaborator that supplies moves for a human player.
///
/// Parsing raw input is the source's job. The player validates the index
/// and keeps asking until it gets a legal one.
pub trait MoveSource {
    /// Asks for a move for `mark` in `state`.
    ///
    /// Returns `Err(PlayerError::InputClosed)` once no further input is possible.
    fn request_move(&mut self, state: &GameState, mark: Mark) -> Result<MoveReply, PlayerError>;

    /// Told that `index` was refused, before the next request.
    fn reject(&mut self, _index: usize, _error: MoveError) {}
}

/// Player whose moves come from a [`MoveSource`].
pub struct HumanPlayer<S> {
    name: String,
    mark: Mark,
    source: S,
}

impl<S: MoveSource> HumanPlayer<S> {
    /// Creates a new human player.
    pub fn new(name: impl Into<String>, mark: Mark, source: S) -> Self {
        Self {
            name: name.into(),
            mark,
            source,
        }
    }

    /// Returns the move source.
    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<S: MoveSource + Send> Player for HumanPlayer<S> {
    fn mark(&self) -> Mark {
        self.mark
    }

    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self, state), fields(player = %self.name, mark = %self.mark))]
    fn choose_move(&mut self, state: &GameState) -> Result<Position, PlayerError> {
        loop {
            let index = match self.source.request_move(state, self.mark)? {
                MoveReply::Cell(index) => index,
                MoveReply::Unreadable => {
                    debug!("Unreadable input, asking again");
                    continue;
                }
            };

            let Some(position) = Position::from_index(index) else {
                warn!(index, "Move out of range");
                self.source.reject(index, MoveError::OutOfRange(index));
                continue;
            };

            if state.board().is_empty(position) {
                debug!(position = %position, "Human chose position");
                return Ok(position);
            }

            warn!(position = %position, "Square already occupied");
            self.source.reject(index, MoveError::SquareOccupied(position));
        }
    }
}

/// Move source that replays a fixed list of replies.
///
/// Closes once the list is exhausted. Rejected indices are kept for
/// inspection.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    replies: VecDeque<MoveReply>,
    rejected: Vec<usize>,
}

impl ScriptedSource {
    /// Creates a source answering with the given replies in order.
    pub fn new(replies: impl IntoIterator<Item = MoveReply>) -> Self {
        Self {
            replies: replies.into_iter().collect(),
            rejected: Vec::new(),
        }
    }

    /// Creates a source answering with the given cell indices in order.
    pub fn from_cells(cells: impl IntoIterator<Item = usize>) -> Self {
        Self::new(cells.into_iter().map(MoveReply::Cell))
    }

    /// Indices refused so far.
    pub fn rejected(&self) -> &[usize] {
        &self.rejected
    }

    /// Replies not yet consumed.
    pub fn remaining(&self) -> usize {
        self.replies.len()
    }
}

impl MoveSource for ScriptedSource {
    fn request_move(&mut self, _state: &GameState, mark: Mark) -> Result<MoveReply, PlayerError> {
        self.replies.pop_front().ok_or(PlayerError::InputClosed(mark))
    }

    fn reject(&mut self, index: usize, _error: MoveError) {
        self.rejected.push(index);
    }
}

// ─────────────────────────────────────────────────────────────
//  Search-delegate player
// ─────────────────────────────────────────────────────────────

/// Player that picks moves with the minimax search.
///
/// The opening move on an empty board is drawn from `rng` instead of
/// searched; every other move is the deterministic search result.
pub struct AiPlayer<R = StdRng> {
    name: String,
    mark: Mark,
    rng: R,
    mode: SearchMode,
}

impl AiPlayer<StdRng> {
    /// Creates an AI whose opening move is reproducible from `seed`.
    pub fn seeded(name: impl Into<String>, mark: Mark, seed: u64) -> Self {
        Self::with_rng(name, mark, StdRng::seed_from_u64(seed))
    }

    /// Creates an AI with an entropy-seeded opening move.
    pub fn from_entropy(name: impl Into<String>, mark: Mark) -> Self {
        Self::with_rng(name, mark, StdRng::from_entropy())
    }
}

impl<R: Rng> AiPlayer<R> {
    /// Creates an AI drawing its opening move from `rng`.
    pub fn with_rng(name: impl Into<String>, mark: Mark, rng: R) -> Self {
        let name = name.into();
        info!(ai = %name, mark = %mark, "Creating AI player");
        Self {
            name,
            mark,
            rng,
            mode: SearchMode::default(),
        }
    }

    /// Sets how the search explores the root.
    pub fn with_search_mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }
}

impl<R: Rng + Send> Player for AiPlayer<R> {
    fn mark(&self) -> Mark {
        self.mark
    }

    fn name(&self) -> &str {
        &self.name
    }

    /// # Panics
    ///
    /// Panics if the board is full.
    #[instrument(skip(self, state), fields(ai = %self.name, mark = %self.mark))]
    fn choose_move(&mut self, state: &GameState) -> Result<Position, PlayerError> {
        let moves = state.available_moves();
        assert!(!moves.is_empty(), "AI asked to move on a full board");

        if moves.len() == CELLS {
            let position = moves[self.rng.gen_range(0..moves.len())];
            debug!(position = %position, "Random opening move");
            return Ok(position);
        }

        let result = search_with(self.mode, state, self.mark, self.mark);
        debug!(position = ?result.position, score = result.score, "AI chose position");
        result.position.ok_or(PlayerError::NoMove(self.mark))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(cells: &str) -> GameState {
        GameState::from_board(cells.parse().unwrap())
    }

    #[test]
    fn test_human_retries_until_legal() {
        let game = state("X___O____");
        let source = ScriptedSource::new([
            MoveReply::Unreadable,
            MoveReply::Cell(0),
            MoveReply::Cell(12),
            MoveReply::Cell(4),
            MoveReply::Cell(7),
            MoveReply::Cell(8),
        ]);
        let mut human = HumanPlayer::new("Human", Mark::X, source);

        assert_eq!(human.choose_move(&game), Ok(Position::BottomCenter));
        assert_eq!(human.source().rejected(), &[0, 12, 4]);
        assert_eq!(human.source().remaining(), 1);
    }

    #[test]
    fn test_human_input_closed_propagates() {
        let game = state("X___O____");
        let mut human = HumanPlayer::new("Human", Mark::O, ScriptedSource::from_cells([0]));
        assert_eq!(human.choose_move(&game), Err(PlayerError::InputClosed(Mark::O)));
    }

    #[test]
    fn test_ai_opening_is_reproducible() {
        let game = GameState::new();
        let first = AiPlayer::seeded("AI", Mark::X, 7).choose_move(&game).unwrap();
        let again = AiPlayer::seeded("AI", Mark::X, 7).choose_move(&game).unwrap();
        assert_eq!(first, again);
    }

    #[test]
    fn test_ai_does_not_mutate_state() {
        let game = state("XX__O____");
        let before = game;
        let mut ai = AiPlayer::seeded("AI", Mark::O, 0);
        assert_eq!(ai.choose_move(&game), Ok(Position::TopRight));
        assert_eq!(game, before);
    }

    #[test]
    fn test_ai_parallel_mode_agrees() {
        let game = state("X___O___X");
        let mut sequential = AiPlayer::seeded("AI", Mark::O, 0);
        let mut parallel = AiPlayer::seeded("AI", Mark::O, 0).with_search_mode(SearchMode::ParallelRoot);
        assert_eq!(sequential.choose_move(&game), parallel.choose_move(&game));
    }

    #[test]
    #[should_panic(expected = "full board")]
    fn test_ai_on_full_board_panics() {
        let game = state("XOXXOOOXX");
        let _ = AiPlayer::seeded("AI", Mark::X, 0).choose_move(&game);
    }
}
