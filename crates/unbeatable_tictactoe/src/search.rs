//! Exhaustive minimax search.
//!
//! Scores are from the point of view of the maximizing mark of the
//! top-level call. A line completed with `n` squares still empty is worth
//! `n + 1`, so an earlier win outranks a later one and a later loss
//! outranks an earlier one. Among equal scores the lowest cell index wins,
//! because a candidate only replaces the incumbent on strict improvement.

use crate::position::Position;
use crate::state::GameState;
use crate::types::Mark;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};
use tracing::{debug, instrument};

/// Best move found for a node and its score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchResult {
    /// Chosen cell, `None` at terminal nodes.
    pub position: Option<Position>,
    /// Score relative to the maximizing mark.
    pub score: i32,
}

impl SearchResult {
    fn terminal(score: i32) -> Self {
        Self {
            position: None,
            score,
        }
    }
}

/// How the root of a search is explored.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum SearchMode {
    /// One thread, one board mutated in place.
    #[default]
    Sequential,
    /// Root children searched on the rayon pool, one board copy per child.
    ParallelRoot,
}

/// Applies a move on construction and undoes it on drop.
///
/// Each recursive step holds one of these for the lifetime of its child
/// search, so the undo runs on every exit path, unwinding included.
struct Trial<'a> {
    state: &'a mut GameState,
    position: Position,
}

impl<'a> Trial<'a> {
    fn apply(state: &'a mut GameState, position: Position, mark: Mark) -> Self {
        if let Err(e) = state.apply_move(position, mark) {
            unreachable!("search tried an unavailable move: {e}");
        }
        Self { state, position }
    }
}

impl Deref for Trial<'_> {
    type Target = GameState;

    fn deref(&self) -> &GameState {
        self.state
    }
}

impl DerefMut for Trial<'_> {
    fn deref_mut(&mut self) -> &mut GameState {
        self.state
    }
}

impl Drop for Trial<'_> {
    fn drop(&mut self) {
        self.state.undo_move(self.position);
    }
}

/// Minimax searcher for one maximizing mark.
#[derive(Debug, Clone)]
pub struct Minimax {
    maximizing: Mark,
    nodes: u64,
}

impl Minimax {
    /// Creates a searcher that maximizes for `maximizing`.
    pub fn new(maximizing: Mark) -> Self {
        Self {
            maximizing,
            nodes: 0,
        }
    }

    /// Mark whose score is maximized.
    pub fn maximizing(&self) -> Mark {
        self.maximizing
    }

    /// Nodes visited so far, terminal nodes included.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Searches the subtree below `state` with `to_move` on move.
    ///
    /// `state` is mutated during the search and restored before returning.
    pub fn search(&mut self, state: &mut GameState, to_move: Mark) -> SearchResult {
        self.nodes += 1;

        let just_moved = to_move.opponent();
        if state.last_winner() == Some(just_moved) {
            let magnitude = state.empty_count() as i32 + 1;
            return SearchResult::terminal(if just_moved == self.maximizing {
                magnitude
            } else {
                -magnitude
            });
        }
        if state.is_full() {
            return SearchResult::terminal(0);
        }

        let maximize = to_move == self.maximizing;
        let mut best = SearchResult::terminal(if maximize { i32::MIN } else { i32::MAX });

        for position in state.available_moves() {
            let score = {
                let mut trial = Trial::apply(state, position, to_move);
                self.search(&mut trial, just_moved).score
            };

            if improves(maximize, score, best.score) {
                best = SearchResult {
                    position: Some(position),
                    score,
                };
            }
        }

        best
    }
}

fn improves(maximize: bool, candidate: i32, incumbent: i32) -> bool {
    if maximize {
        candidate > incumbent
    } else {
        candidate < incumbent
    }
}

fn assert_searchable(state: &GameState) {
    assert!(
        !state.is_full(),
        "best_move called on a full board:\n{}",
        state.board().display()
    );
}

/// Finds the optimal move for `to_move`, scored for `maximizing`.
///
/// # Panics
///
/// Panics if the board has no empty square; callers must only search
/// positions that still have a move to make.
#[instrument(level = "debug", skip(state), fields(board = %state.board()))]
pub fn best_move(state: &mut GameState, to_move: Mark, maximizing: Mark) -> SearchResult {
    assert_searchable(state);

    let mut minimax = Minimax::new(maximizing);
    let result = minimax.search(state, to_move);
    debug!(
        position = ?result.position,
        score = result.score,
        nodes = minimax.nodes(),
        "Search complete"
    );
    result
}

/// Same result as [`best_move`], with the root's children searched in parallel.
///
/// Every child gets its own copy of the board; the children's scores are
/// folded in ascending cell order so ties break exactly as in the
/// sequential search.
///
/// # Panics
///
/// Panics if the board has no empty square.
#[instrument(level = "debug", skip(state), fields(board = %state.board()))]
pub fn best_move_parallel(state: &GameState, to_move: Mark, maximizing: Mark) -> SearchResult {
    assert_searchable(state);

    if state.last_winner() == Some(to_move.opponent()) {
        // Terminal root: nothing to fan out.
        return Minimax::new(maximizing).search(&mut { *state }, to_move);
    }

    let children: Vec<(Position, i32, u64)> = state
        .available_moves()
        .into_par_iter()
        .map(|position| {
            let mut child = *state;
            let mut minimax = Minimax::new(maximizing);
            let score = {
                let mut trial = Trial::apply(&mut child, position, to_move);
                minimax.search(&mut trial, to_move.opponent()).score
            };
            (position, score, minimax.nodes())
        })
        .collect();

    let maximize = to_move == maximizing;
    let mut best = SearchResult::terminal(if maximize { i32::MIN } else { i32::MAX });
    let mut nodes = 1;
    for (position, score, child_nodes) in children {
        nodes += child_nodes;
        if improves(maximize, score, best.score) {
            best = SearchResult {
                position: Some(position),
                score,
            };
        }
    }

    debug!(
        position = ?best.position,
        score = best.score,
        nodes,
        "Parallel search complete"
    );
    best
}

/// Runs [`best_move`] or [`best_move_parallel`] on a copy of `state`.
pub fn search_with(mode: SearchMode, state: &GameState, to_move: Mark, maximizing: Mark) -> SearchResult {
    match mode {
        SearchMode::Sequential => {
            let mut scratch = *state;
            best_move(&mut scratch, to_move, maximizing)
        }
        SearchMode::ParallelRoot => best_move_parallel(state, to_move, maximizing),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(cells: &str) -> GameState {
        GameState::from_board(cells.parse().unwrap())
    }

    #[test]
    fn test_takes_immediate_win() {
        let mut game = state("XX_OO____");
        let result = best_move(&mut game, Mark::O, Mark::O);
        assert_eq!(result.position, Some(Position::MiddleRight));
        assert_eq!(result.score, 5);
    }

    #[test]
    fn test_blocks_opponent_win() {
        // X threatens the top row; O must take cell 2.
        let mut game = state("XX__O____");
        let result = best_move(&mut game, Mark::O, Mark::O);
        assert_eq!(result.position, Some(Position::TopRight));
    }

    #[test]
    fn test_search_restores_state() {
        let mut game = state("X___O____");
        let before = game;
        best_move(&mut game, Mark::X, Mark::X);
        assert_eq!(game, before);
    }

    #[test]
    fn test_terminal_scores() {
        let mut won = state("XX__OO___");
        won.apply_move(Position::TopRight, Mark::X).unwrap();

        let mut minimax = Minimax::new(Mark::X);
        assert_eq!(minimax.search(&mut won, Mark::O), SearchResult::terminal(5));

        let mut minimax = Minimax::new(Mark::O);
        assert_eq!(minimax.search(&mut won, Mark::O), SearchResult::terminal(-5));
        assert_eq!(minimax.nodes(), 1);

        let mut full = state("XOXXOOOXX");
        let mut minimax = Minimax::new(Mark::X);
        assert_eq!(minimax.search(&mut full, Mark::O), SearchResult::terminal(0));
    }

    #[test]
    fn test_prefers_faster_win() {
        // X can win now at 2 or set up a later win; the immediate win scores higher.
        let mut game = state("XX_O_O___");
        let result = best_move(&mut game, Mark::X, Mark::X);
        assert_eq!(result.position, Some(Position::TopRight));
        assert_eq!(result.score, 5);
    }

    #[test]
    fn test_tie_breaks_to_lowest_index() {
        // Empty board: every opening draws, so the first cell is kept.
        let mut game = GameState::new();
        let result = best_move(&mut game, Mark::X, Mark::X);
        assert_eq!(result, SearchResult { position: Some(Position::TopLeft), score: 0 });
    }

    #[test]
    fn test_parallel_matches_sequential() {
        for cells in ["X___O____", "XX__O____", "X_O_X_O__", "XO_______"] {
            let game = state(cells);
            for to_move in [Mark::X, Mark::O] {
                for maximizing in [Mark::X, Mark::O] {
                    let sequential = best_move(&mut { game }, to_move, maximizing);
                    let parallel = best_move_parallel(&game, to_move, maximizing);
                    assert_eq!(sequential, parallel, "{cells} {to_move} {maximizing}");
                }
            }
        }
    }

    #[test]
    fn test_search_mode_parses_kebab_case() {
        assert_eq!("parallel-root".parse::<SearchMode>().unwrap(), SearchMode::ParallelRoot);
        assert_eq!(SearchMode::Sequential.to_string(), "sequential");
    }

    #[test]
    #[should_panic(expected = "full board")]
    fn test_full_board_panics() {
        let mut full = state("XOXXOOOXX");
        best_move(&mut full, Mark::X, Mark::X);
    }
}
