//! Exhaustive check that the AI never loses.
//!
//! Walks every game the AI can be drawn into from an empty board: each
//! opponent turn branches over all legal replies, each AI turn follows the
//! search. An AI opening on an empty board branches over all nine cells,
//! since a random opening may land on any of them.

use crate::position::{CELLS, Position};
use crate::search::best_move;
use crate::state::GameState;
use crate::types::Mark;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

/// Outcome counts over every line of play.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct AuditReport {
    /// Mark the AI played.
    ai: Option<Mark>,
    /// Distinct complete games explored.
    games: u64,
    /// Games the AI won.
    ai_wins: u64,
    /// Games that ended tied.
    ties: u64,
    /// Games the AI lost.
    losses: u64,
    /// Move sequence of the first loss found, if any.
    first_loss: Option<Vec<Position>>,
}

impl AuditReport {
    /// True when no explored game was lost.
    pub fn never_lost(&self) -> bool {
        self.losses == 0
    }
}

/// Explores every opponent strategy against the AI playing `ai`.
#[instrument]
pub fn audit(ai: Mark) -> AuditReport {
    let mut report = AuditReport {
        ai: Some(ai),
        ..AuditReport::default()
    };
    let mut line = Vec::with_capacity(CELLS);
    explore(&mut GameState::new(), Mark::X, ai, &mut line, &mut report);

    if report.never_lost() {
        info!(games = report.games, ai_wins = report.ai_wins, ties = report.ties, "Audit passed");
    } else {
        warn!(losses = report.losses, first_loss = ?report.first_loss, "Audit found losses");
    }
    report
}

fn explore(
    state: &mut GameState,
    to_move: Mark,
    ai: Mark,
    line: &mut Vec<Position>,
    report: &mut AuditReport,
) {
    if let Some(winner) = state.last_winner() {
        report.games += 1;
        if winner == ai {
            report.ai_wins += 1;
        } else {
            report.losses += 1;
            if report.first_loss.is_none() {
                report.first_loss = Some(line.clone());
            }
        }
        return;
    }
    if state.is_full() {
        report.games += 1;
        report.ties += 1;
        return;
    }

    let candidates = if to_move == ai && state.empty_count() < CELLS {
        let Some(position) = best_move(&mut { *state }, ai, ai).position else {
            unreachable!("search found no move on an undecided board:\n{}", state.board().display());
        };
        vec![position]
    } else {
        state.available_moves()
    };

    for position in candidates {
        let mut child = *state;
        if let Err(e) = child.apply_move(position, to_move) {
            unreachable!("audit tried an unavailable move: {e}");
        }
        line.push(position);
        explore(&mut child, to_move.opponent(), ai, line, report);
        line.pop();
    }
}
