//! Moves and move errors.

use crate::position::{CELLS, Position};
use crate::types::Mark;
use serde::{Deserialize, Serialize};

/// A move in tic-tac-toe: a mark placed at a position.
///
/// The turn controller records one of these per committed move, so a
/// finished game carries its full history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// The mark being placed.
    pub mark: Mark,
    /// Where the mark is placed.
    pub position: Position,
}

impl Move {
    /// Creates a new move.
    pub fn new(mark: Mark, position: Position) -> Self {
        Self { mark, position }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {} ({})", self.mark, self.position, self.position.label())
    }
}

/// A requested move that cannot be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The square at the position is already occupied.
    #[display("Square {} is already occupied", _0)]
    SquareOccupied(Position),

    /// The index does not name a cell on the board.
    #[display("Position {} is out of range (must be 0-{})", _0, CELLS - 1)]
    OutOfRange(usize),
}

impl std::error::Error for MoveError {}
