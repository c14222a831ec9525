//! Game state: the board plus the winner of the most recent move.

use crate::action::MoveError;
use crate::position::{Position, SIDE};
use crate::types::{Board, Mark, Square};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Board and win flag.
///
/// `last_winner` is set by a move that completes a line for its own
/// mark, and is cleared by [`GameState::undo_move`]. The search relies on
/// that pairing: every apply it performs is undone before it looks at the
/// next sibling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GameState {
    board: Board,
    last_winner: Option<Mark>,
}

/// Creates an empty game with no winner.
pub fn new_game() -> GameState {
    GameState::new()
}

impl GameState {
    /// Creates an empty game with no winner.
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            last_winner: None,
        }
    }

    /// Wraps an existing board, recording a line already on it as the winner.
    pub fn from_board(board: Board) -> Self {
        let mut state = Self {
            board,
            last_winner: None,
        };
        state.last_winner = state.scan_winner();
        state
    }

    /// Mark owning any complete line on the board.
    pub fn scan_winner(&self) -> Option<Mark> {
        Position::ALL.into_iter().find_map(|pos| match self.board.get(pos) {
            Square::Occupied(mark) if self.check_win_through(pos, mark) => Some(mark),
            _ => None,
        })
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mark that completed a line on the most recent move, if any.
    pub fn last_winner(&self) -> Option<Mark> {
        self.last_winner
    }

    /// Empty positions in ascending index order.
    pub fn available_moves(&self) -> Vec<Position> {
        self.board.empty_positions()
    }

    /// True when no square is empty.
    pub fn is_full(&self) -> bool {
        self.board.is_full()
    }

    /// Number of empty squares.
    pub fn empty_count(&self) -> usize {
        self.board.empty_count()
    }

    /// Places `mark` at `position`.
    ///
    /// Fails without touching the state if the square is occupied. If the
    /// move completes a line through `position`, `last_winner` becomes `mark`.
    pub fn apply_move(&mut self, position: Position, mark: Mark) -> Result<(), MoveError> {
        if !self.board.is_empty(position) {
            return Err(MoveError::SquareOccupied(position));
        }

        self.board.set(position, Square::Occupied(mark));
        if self.check_win_through(position, mark) {
            self.last_winner = Some(mark);
        }
        Ok(())
    }

    /// Places `mark` at a raw cell index.
    #[instrument(level = "debug", skip(self))]
    pub fn apply_index(&mut self, index: usize, mark: Mark) -> Result<Position, MoveError> {
        let position = Position::from_index(index).ok_or(MoveError::OutOfRange(index))?;
        self.apply_move(position, mark)?;
        Ok(position)
    }

    /// Empties `position` and clears `last_winner`.
    ///
    /// Only valid as the reverse of the most recent `apply_move`; the state
    /// keeps no history and cannot detect any other use.
    pub fn undo_move(&mut self, position: Position) {
        self.board.set(position, Square::Empty);
        self.last_winner = None;
    }

    /// True iff `mark` fills the row, the column, or a diagonal passing
    /// through `position`.
    ///
    /// Diagonals are only consulted for cells that lie on them.
    pub fn check_win_through(&self, position: Position, mark: Mark) -> bool {
        let owns = |row: usize, col: usize| {
            Position::from_coordinates(row, col)
                .is_some_and(|pos| self.board.get(pos) == Square::Occupied(mark))
        };
        let (row, col) = (position.row(), position.col());

        if (0..SIDE).all(|c| owns(row, c)) {
            return true;
        }
        if (0..SIDE).all(|r| owns(r, col)) {
            return true;
        }
        if position.on_main_diagonal() && (0..SIDE).all(|i| owns(i, i)) {
            return true;
        }
        position.on_anti_diagonal() && (0..SIDE).all(|i| owns(i, SIDE - 1 - i))
    }
}
