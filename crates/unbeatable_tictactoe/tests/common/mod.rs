//! Reference rules written independently of the engine, for cross-checking.

#![allow(dead_code)]

use std::collections::HashSet;
use unbeatable_tictactoe::{Board, GameState, Mark, Position, Square};

/// Every winning line on the board.
pub const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Full scan of all eight lines.
pub fn scan_winner(board: &Board) -> Option<Mark> {
    let squares = board.squares();
    LINES.iter().find_map(|[a, b, c]| match squares[*a] {
        Square::Occupied(mark) if squares[*b] == squares[*a] && squares[*c] == squares[*a] => Some(mark),
        _ => None,
    })
}

/// Minimax value computed by copying boards and scanning for winners.
pub fn reference_value(board: Board, to_move: Mark, maximizing: Mark) -> i32 {
    if let Some(winner) = scan_winner(&board) {
        let magnitude = board.empty_count() as i32 + 1;
        return if winner == maximizing { magnitude } else { -magnitude };
    }
    if board.is_full() {
        return 0;
    }

    let values = board.empty_positions().into_iter().map(|pos| {
        let mut child = board;
        child.set(pos, Square::Occupied(to_move));
        reference_value(child, to_move.opponent(), maximizing)
    });

    if to_move == maximizing {
        values.max().unwrap_or(0)
    } else {
        values.min().unwrap_or(0)
    }
}

/// Every state reachable by legal play, keyed by the mark to move.
pub fn reachable_states() -> Vec<(GameState, Mark)> {
    fn walk(state: GameState, to_move: Mark, seen: &mut HashSet<Board>, out: &mut Vec<(GameState, Mark)>) {
        if !seen.insert(*state.board()) {
            return;
        }
        out.push((state, to_move));
        if state.last_winner().is_some() || state.is_full() {
            return;
        }
        for pos in state.available_moves() {
            let mut child = state;
            child.apply_move(pos, to_move).unwrap();
            walk(child, to_move.opponent(), seen, out);
        }
    }

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    walk(GameState::new(), Mark::X, &mut seen, &mut out);
    out
}

/// Reachable, undecided states with exactly `empty` squares left.
pub fn open_states_with(empty: usize) -> Vec<(GameState, Mark)> {
    reachable_states()
        .into_iter()
        .filter(|(state, _)| state.last_winner().is_none() && state.empty_count() == empty)
        .collect()
}

/// Cells of `board` in index order, for readable assertion messages.
pub fn describe(board: &Board, pos: Position) -> String {
    format!("{board} @ {pos}")
}
