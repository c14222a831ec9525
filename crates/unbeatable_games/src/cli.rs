//! Command-line interface for unbeatable_games.

use clap::{Parser, Subcommand};
use unbeatable_tictactoe::{Board, Mark, SearchMode};

/// Unbeatable Games - Tic-tac-toe against an exhaustive minimax AI
#[derive(Parser, Debug)]
#[command(name = "unbeatable_games")]
#[command(about = "Tic-tac-toe with an AI that never loses", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play one match and print every board
    Play {
        /// Path to match config file
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,

        /// Seed for the AI opening move
        #[arg(long)]
        seed: Option<u64>,

        /// Scripted cells for X (comma-separated, 0-8)
        #[arg(long, value_delimiter = ',')]
        x_moves: Option<Vec<usize>>,

        /// Scripted cells for O (comma-separated, 0-8)
        #[arg(long, value_delimiter = ',')]
        o_moves: Option<Vec<usize>>,

        /// Root search mode for AI seats (sequential, parallel-root)
        #[arg(long)]
        search: Option<SearchMode>,

        /// Mark typed in from the terminal; offers a rematch after each game
        #[arg(long)]
        human: Option<Mark>,
    },

    /// Play AI against AI many times and tally the results
    Selfplay {
        /// Number of games
        #[arg(short, long, default_value = "100")]
        games: u32,

        /// Base seed for the opening moves
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Root search mode (sequential, parallel-root)
        #[arg(long, default_value = "sequential")]
        search: SearchMode,
    },

    /// Find the best move for a position
    Analyze {
        /// Nine cells in index order, e.g. "XX_OO____"
        #[arg(short, long)]
        board: Board,

        /// Mark to move
        #[arg(short, long)]
        to_move: Mark,

        /// Mark whose score is maximized (defaults to the mark to move)
        #[arg(short, long)]
        maximize: Option<Mark>,
    },

    /// Check that the AI never loses against any opponent, as X and as O
    Verify,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_flags_parse() {
        let cli = Cli::try_parse_from([
            "unbeatable_games",
            "play",
            "--search",
            "parallel-root",
            "--x-moves",
            "4,0,8",
            "--human",
            "o",
        ])
        .unwrap();

        match cli.command {
            Command::Play {
                search,
                x_moves,
                human,
                ..
            } => {
                assert_eq!(search, Some(SearchMode::ParallelRoot));
                assert_eq!(x_moves, Some(vec![4, 0, 8]));
                assert_eq!(human, Some(Mark::O));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_analyze_parses_board() {
        let cli = Cli::try_parse_from(["unbeatable_games", "analyze", "--board", "XX_OO____", "--to-move", "O"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Analyze { to_move: Mark::O, maximize: None, .. }
        ));
    }
}
