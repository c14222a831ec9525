//! Game orchestration between players.

use crate::action::{Move, MoveError};
use crate::player::{Player, PlayerError};
use crate::state::GameState;
use crate::types::{Board, Mark};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Current status of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// Game is ongoing.
    InProgress,
    /// Game ended in a win.
    Won(Mark),
    /// Game ended with a full board and no line.
    Tied,
}

impl GameStatus {
    /// True for `Won` and `Tied`.
    pub fn is_over(self) -> bool {
        self != GameStatus::InProgress
    }

    /// Status a state is in, judged from its win flag and fill level.
    pub fn of(state: &GameState) -> Self {
        if let Some(winner) = state.last_winner() {
            GameStatus::Won(winner)
        } else if state.is_full() {
            GameStatus::Tied
        } else {
            GameStatus::InProgress
        }
    }
}

/// Events reported while a game runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// A move was committed.
    MoveMade {
        /// The committed move.
        mv: Move,
        /// Board after the move.
        board: Board,
    },
    /// A player offered a move that could not be applied.
    MoveRejected {
        /// Mark of the offending player.
        mark: Mark,
        /// Why the move was refused.
        error: MoveError,
    },
    /// Game ended.
    GameOver {
        /// Final status.
        status: GameStatus,
    },
}

/// Final result of a game.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct GameOutcome {
    /// `Won` or `Tied`.
    status: GameStatus,
    /// Board at the end of the game.
    board: Board,
    /// Moves in the order they were committed.
    history: Vec<Move>,
}

/// Drives alternating turns until the game is won or tied.
///
/// X moves first. The controller owns the state; players only get to
/// look at it.
#[derive(Debug, Clone)]
pub struct TurnController {
    state: GameState,
    to_move: Mark,
    status: GameStatus,
    history: Vec<Move>,
}

impl TurnController {
    /// Creates a controller for `state` with X to move.
    pub fn new(state: GameState) -> Self {
        Self {
            status: GameStatus::of(&state),
            state,
            to_move: Mark::X,
            history: Vec::new(),
        }
    }

    /// Overrides which mark moves next.
    pub fn with_to_move(mut self, mark: Mark) -> Self {
        self.to_move = mark;
        self
    }

    /// Returns the current state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mark whose turn it is.
    pub fn to_move(&self) -> Mark {
        self.to_move
    }

    /// Current status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Moves committed so far.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Plays one turn: asks the player on move, commits, and updates the status.
    ///
    /// Illegal positions are reported to `observer` and the same player is
    /// asked again. Does nothing once the game is over.
    pub fn step<'p>(
        &mut self,
        player_x: &'p mut dyn Player,
        player_o: &'p mut dyn Player,
        observer: &mut dyn FnMut(&GameEvent),
    ) -> Result<GameStatus, PlayerError> {
        if self.status.is_over() {
            return Ok(self.status);
        }

        let mark = self.to_move;
        let player: &mut dyn Player = match mark {
            Mark::X => player_x,
            Mark::O => player_o,
        };
        debug_assert_eq!(player.mark(), mark, "player {} holds the wrong mark", player.name());

        let position = loop {
            debug!(player = %player.name(), mark = %mark, "Waiting for move");
            let position = player.choose_move(&self.state)?;
            match self.state.apply_move(position, mark) {
                Ok(()) => break position,
                Err(error) => {
                    warn!(player = %player.name(), error = %error, "Rejected move, asking again");
                    observer(&GameEvent::MoveRejected { mark, error });
                }
            }
        };

        let mv = Move::new(mark, position);
        self.history.push(mv);
        info!(player = %player.name(), mv = %mv, "Move made");
        observer(&GameEvent::MoveMade {
            mv,
            board: *self.state.board(),
        });

        self.status = GameStatus::of(&self.state);
        if !self.status.is_over() {
            self.to_move = mark.opponent();
        }
        Ok(self.status)
    }

    /// Runs the game loop to the end.
    pub fn run(
        self,
        player_x: &mut dyn Player,
        player_o: &mut dyn Player,
    ) -> Result<GameOutcome, PlayerError> {
        self.run_with(player_x, player_o, |_| {})
    }

    /// Runs the game loop to the end, reporting every event to `observer`.
    #[instrument(skip_all, fields(x = %player_x.name(), o = %player_o.name()))]
    pub fn run_with(
        mut self,
        player_x: &mut dyn Player,
        player_o: &mut dyn Player,
        mut observer: impl FnMut(&GameEvent),
    ) -> Result<GameOutcome, PlayerError> {
        info!("Starting game");

        while !self.status.is_over() {
            self.step(player_x, player_o, &mut observer)?;
        }

        info!(status = ?self.status, moves = self.history.len(), "Game over");
        observer(&GameEvent::GameOver {
            status: self.status,
        });

        Ok(GameOutcome {
            status: self.status,
            board: *self.state.board(),
            history: self.history,
        })
    }
}

/// Plays a game from `state` between the two players.
pub fn play(
    state: GameState,
    player_x: &mut dyn Player,
    player_o: &mut dyn Player,
) -> Result<GameOutcome, PlayerError> {
    TurnController::new(state).run(player_x, player_o)
}
