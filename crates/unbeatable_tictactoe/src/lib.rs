//! Unbeatable tic-tac-toe.
//!
//! Game rules, an exhaustive minimax opponent, and the turn loop that
//! plays two players against each other.
//!
//! # Architecture
//!
//! - **State**: the board plus the winner of the most recent move, with
//!   apply/undo primitives the search relies on
//! - **Search**: exhaustive minimax with depth-weighted terminal scores
//! - **Players**: a human player fed by an external [`MoveSource`], and an
//!   AI player backed by the search
//! - **Turns**: the [`TurnController`] that alternates players until the
//!   game is won or tied
//!
//! # Example
//!
//! ```
//! use unbeatable_tictactoe::{AiPlayer, GameStatus, Mark, TurnController, new_game};
//!
//! let mut x = AiPlayer::seeded("AI X", Mark::X, 1);
//! let mut o = AiPlayer::seeded("AI O", Mark::O, 2);
//! let outcome = TurnController::new(new_game()).run(&mut x, &mut o).unwrap();
//! assert_eq!(outcome.status(), &GameStatus::Tied);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod arena;
mod audit;
mod player;
mod position;
mod search;
mod state;
mod turn;
mod types;

pub use action::{Move, MoveError};
pub use arena::{Arena, ArenaReport};
pub use audit::{AuditReport, audit};
pub use player::{AiPlayer, HumanPlayer, MoveReply, MoveSource, Player, PlayerError, ScriptedSource};
pub use position::{CELLS, Position, SIDE};
pub use search::{Minimax, SearchMode, SearchResult, best_move, best_move_parallel, search_with};
pub use state::{GameState, new_game};
pub use turn::{GameEvent, GameOutcome, GameStatus, TurnController, play};
pub use types::{Board, BoardParseError, Mark, Square};
