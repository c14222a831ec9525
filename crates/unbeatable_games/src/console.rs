//! Terminal input and output for matches.

use std::io::{BufRead, BufReader, Stdin, Stdout, Write};
use tracing::{debug, warn};
use unbeatable_tictactoe::{GameEvent, GameState, GameStatus, Mark, MoveError, MoveReply, MoveSource, PlayerError};

/// Reads cell numbers typed by a person, one per line.
pub struct LineSource<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LineSource<R, W> {
    /// Creates a source reading from `input` and prompting on `output`.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl LineSource<BufReader<Stdin>, Stdout> {
    /// Source bound to the process terminal.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(std::io::stdin()), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> MoveSource for LineSource<R, W> {
    fn request_move(&mut self, state: &GameState, mark: Mark) -> Result<MoveReply, PlayerError> {
        let _ = writeln!(self.output, "\n{}", state.board().display());
        let _ = write!(self.output, "{} to move (0-8): ", mark);
        let _ = self.output.flush();

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => Err(PlayerError::InputClosed(mark)),
            Ok(_) => {
                let trimmed = line.trim();
                debug!(input = trimmed, "Read move");
                Ok(trimmed
                    .parse::<usize>()
                    .map(MoveReply::Cell)
                    .unwrap_or(MoveReply::Unreadable))
            }
            Err(e) => {
                warn!(error = %e, "Failed to read move");
                Err(PlayerError::InputClosed(mark))
            }
        }
    }

    fn reject(&mut self, index: usize, error: MoveError) {
        let _ = writeln!(self.output, "Cannot play {}: {}", index, error);
    }
}

/// Asks whether to play another game. Anything but `y` ends the session.
pub fn ask_play_again(mut input: impl BufRead, mut output: impl Write) -> bool {
    let _ = write!(output, "\nPlay again? (y/n): ");
    let _ = output.flush();

    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(_) => line.trim().eq_ignore_ascii_case("y"),
        Err(e) => {
            warn!(error = %e, "Failed to read answer");
            false
        }
    }
}

/// Prints match events as they happen.
pub fn print_event(event: &GameEvent) {
    match event {
        GameEvent::MoveMade { mv, board } => {
            println!("\n{}\n\n{}", mv, board.display());
        }
        GameEvent::MoveRejected { mark, error } => {
            println!("{} rejected: {}", mark, error);
        }
        GameEvent::GameOver { status } => {
            println!("\n{}", describe_status(*status));
        }
    }
}

/// Human-readable outcome line.
pub fn describe_status(status: GameStatus) -> String {
    match status {
        GameStatus::Won(mark) => format!("{} wins.", mark),
        GameStatus::Tied => "It's a tie.".to_string(),
        GameStatus::InProgress => "Game in progress.".to_string(),
    }
}
