//! Unbeatable Games - Unified CLI
//!
//! Play, self-play, analysis and exhaustive verification for the
//! tic-tac-toe minimax engine.

#![warn(missing_docs)]

mod cli;
mod config;
mod console;

use anyhow::{Context, Result, bail};
use clap::Parser;
use cli::{Cli, Command};
use config::{MatchConfig, SeatConfig};
use console::{LineSource, ask_play_again, describe_status, print_event};
use std::path::PathBuf;
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;
use unbeatable_tictactoe::{
    Arena, Board, GameState, HumanPlayer, Mark, Minimax, Player, SearchMode, TurnController, audit,
};

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Logs go to stderr so boards on stdout stay readable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Play {
            config,
            seed,
            x_moves,
            o_moves,
            search,
            human,
        } => run_play(config, seed, x_moves, o_moves, search, human),
        Command::Selfplay { games, seed, search } => run_selfplay(games, seed, search),
        Command::Analyze {
            board,
            to_move,
            maximize,
        } => run_analyze(board, to_move, maximize),
        Command::Verify => run_verify(),
    }
}

/// Run matches between the configured seats, offering a rematch to a human
#[instrument(skip_all)]
fn run_play(
    config_path: Option<PathBuf>,
    seed: Option<u64>,
    x_moves: Option<Vec<usize>>,
    o_moves: Option<Vec<usize>>,
    search: Option<SearchMode>,
    human: Option<Mark>,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => MatchConfig::from_file(&path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => MatchConfig::default(),
    };

    // CLI flags override file values
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    if let Some(moves) = x_moves {
        config = config.with_seat(Mark::X, SeatConfig::scripted("Script X", moves));
    }
    if let Some(moves) = o_moves {
        config = config.with_seat(Mark::O, SeatConfig::scripted("Script O", moves));
    }
    if let Some(search) = search {
        config = config.with_search(search);
    }
    config.validate()?;

    loop {
        play_match(&config, human)?;
        if human.is_none() || !ask_play_again(std::io::stdin().lock(), std::io::stdout()) {
            return Ok(());
        }
    }
}

/// Play a single match and print every event
fn play_match(config: &MatchConfig, human: Option<Mark>) -> Result<()> {
    let mut player_x = seat_player(config, Mark::X, human);
    let mut player_o = seat_player(config, Mark::O, human);

    info!(x = player_x.name(), o = player_o.name(), "Starting match");
    println!("{} (X) vs {} (O)", player_x.name(), player_o.name());

    let outcome = TurnController::new(GameState::new()).run_with(
        player_x.as_mut(),
        player_o.as_mut(),
        print_event,
    )?;

    info!(status = %describe_status(*outcome.status()), moves = outcome.history().len(), "Match finished");
    Ok(())
}

fn seat_player(config: &MatchConfig, mark: Mark, human: Option<Mark>) -> Box<dyn Player> {
    if human == Some(mark) {
        Box::new(HumanPlayer::new("You", mark, LineSource::stdio()))
    } else {
        config.build_player(mark)
    }
}

/// Run a batch of AI-versus-AI games
#[instrument]
fn run_selfplay(games: u32, seed: u64, search: SearchMode) -> Result<()> {
    let report = Arena::new(games, seed)
        .with_search_mode(search)
        .with_progress_every(games.div_ceil(10).max(1))
        .run()?;

    println!("Games:  {}", report.games());
    println!("X wins: {}", report.x_wins());
    println!("O wins: {}", report.o_wins());
    println!("Ties:   {}", report.ties());
    println!("Moves:  {}", report.moves());

    if !report.all_tied() {
        bail!("{} of {} games were won", report.x_wins() + report.o_wins(), report.games());
    }
    Ok(())
}

/// Print the best move for a position
#[instrument(skip(board), fields(board = %board))]
fn run_analyze(board: Board, to_move: Mark, maximize: Option<Mark>) -> Result<()> {
    let mut state = GameState::from_board(board);
    if let Some(winner) = state.last_winner() {
        bail!("board already won by {}", winner);
    }
    if state.is_full() {
        bail!("board is full");
    }

    let maximizing = maximize.unwrap_or(to_move);
    let mut search = Minimax::new(maximizing);
    let result = search.search(&mut state, to_move);

    println!("{}\n", board.display());
    match result.position {
        Some(position) => println!("Best cell: {} ({})", position, position.label()),
        None => println!("Best cell: none"),
    }
    println!("Score:     {} (for {})", result.score, maximizing);
    println!("Nodes:     {}", search.nodes());
    Ok(())
}

/// Exhaustively audit the AI as both marks
#[instrument]
fn run_verify() -> Result<()> {
    let mut failed = false;
    for mark in [Mark::X, Mark::O] {
        let report = audit(mark);
        println!(
            "AI as {}: {} games, {} wins, {} ties, {} losses",
            mark,
            report.games(),
            report.ai_wins(),
            report.ties(),
            report.losses()
        );
        if let Some(line) = report.first_loss() {
            warn!(mark = %mark, ?line, "AI lost");
            failed = true;
        }
    }

    if failed {
        bail!("AI lost at least one game");
    }
    Ok(())
}
