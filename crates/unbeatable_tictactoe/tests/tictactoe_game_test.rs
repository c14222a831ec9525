//! Tests for full games through the turn controller.

use unbeatable_tictactoe::{
    AiPlayer, Arena, GameEvent, GameState, GameStatus, HumanPlayer, Mark, MoveError, MoveReply, Position,
    ScriptedSource, SearchMode, TurnController, new_game, play,
};

#[test]
fn test_ai_versus_ai_always_ties() {
    for seed in 0..6 {
        let mut x = AiPlayer::seeded("AI X", Mark::X, seed);
        let mut o = AiPlayer::seeded("AI O", Mark::O, seed + 100);
        let outcome = play(new_game(), &mut x, &mut o).expect("AI players always move");

        assert_eq!(outcome.status(), &GameStatus::Tied, "seed {seed}");
        assert!(outcome.board().is_full());
        assert_eq!(outcome.history().len(), 9);
    }
}

#[test]
fn test_arena_parallel_search_ties() {
    let report = Arena::new(3, 42)
        .with_search_mode(SearchMode::ParallelRoot)
        .run()
        .unwrap();
    assert!(report.all_tied(), "{report:?}");
}

#[test]
fn test_arena_is_reproducible() {
    let first = Arena::new(3, 5).run().unwrap();
    let second = Arena::new(3, 5).run().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_occupied_square_fails_and_leaves_board() {
    let mut state = new_game();
    state.apply_move(Position::Center, Mark::X).unwrap();
    let before = state;

    assert_eq!(
        state.apply_move(Position::Center, Mark::O),
        Err(MoveError::SquareOccupied(Position::Center))
    );
    assert_eq!(state, before);
}

#[test]
fn test_ai_punishes_weak_opponent() {
    // X always takes the lowest empty square.
    let mut x = HumanPlayer::new("Lowest", Mark::X, ScriptedSource::from_cells(0..9));
    let mut o = AiPlayer::seeded("AI", Mark::O, 3);

    let outcome = play(new_game(), &mut x, &mut o).unwrap();

    assert_eq!(outcome.status(), &GameStatus::Won(Mark::O));
    let cells: Vec<usize> = outcome.history().iter().map(|mv| mv.position.to_index()).collect();
    assert_eq!(cells, vec![0, 4, 1, 2, 3, 6]);
}

#[test]
fn test_scripted_human_with_bad_input_still_loses_or_ties() {
    let source = ScriptedSource::new([
        MoveReply::Unreadable,
        MoveReply::Cell(40),
        MoveReply::Cell(4),
        MoveReply::Cell(0),
        MoveReply::Cell(1),
        MoveReply::Cell(2),
        MoveReply::Cell(3),
        MoveReply::Cell(5),
        MoveReply::Cell(6),
        MoveReply::Cell(7),
        MoveReply::Cell(8),
    ]);
    let mut human = HumanPlayer::new("Human", Mark::X, source);
    let mut ai = AiPlayer::seeded("AI", Mark::O, 9);

    let mut made = Vec::new();
    let outcome = TurnController::new(new_game())
        .run_with(&mut human, &mut ai, |event| {
            if let GameEvent::MoveMade { mv, .. } = event {
                made.push(*mv);
            }
        })
        .unwrap();

    assert_ne!(outcome.status(), &GameStatus::Won(Mark::X));
    assert_eq!(made.as_slice(), outcome.history().as_slice());
    assert_eq!(made[0].position, Position::Center);
    assert!(human.source().rejected().contains(&40));
}

#[test]
fn test_resume_from_snapshot() {
    let mut state = GameState::new();
    state.apply_move(Position::TopLeft, Mark::X).unwrap();
    state.apply_move(Position::Center, Mark::O).unwrap();

    let json = serde_json::to_string(&state).unwrap();
    let restored: GameState = serde_json::from_str(&json).unwrap();

    let mut x = AiPlayer::seeded("AI X", Mark::X, 0);
    let mut o = AiPlayer::seeded("AI O", Mark::O, 0);
    let outcome = TurnController::new(restored).run(&mut x, &mut o).unwrap();
    assert_eq!(outcome.status(), &GameStatus::Tied);
    assert_eq!(outcome.history().len(), 7);
}
