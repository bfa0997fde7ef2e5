use cozy_chess::Color;

use uci_bridge::position::game::{Game, Outcome};
use uci_bridge::position::GamePosition;
use uci_bridge::AppError;

const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
const FOOLS_MATE: &str = "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3";

#[test]
fn new_game_is_start_position() {
    let game = Game::new();

    assert_eq!(game.fen(), START_FEN);
    assert_eq!(game.ply(), 0);
    assert_eq!(game.halfmove_clock(), 0);
    assert!(game.prev_move().is_none());
    assert_eq!(game.side_to_move(), Color::White);
    assert_eq!(game.legal_moves().len(), 20);
    assert_eq!(game.outcome(), Outcome::Ongoing);
}

#[test]
fn invalid_fen_is_position_error() {
    let err = Game::from_fen("not a fen").unwrap_err();
    assert!(matches!(err, AppError::Position(_)), "got {err:?}");
}

#[test]
fn castling_uses_standard_notation() {
    let mut game = Game::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();

    let mv = game.parse_move("e1g1").expect("castling is legal");
    assert_eq!(game.format_move(mv), "e1g1");

    game.make_move(mv).unwrap();
    assert_eq!(game.move_list(), vec!["e1g1"]);
    assert_eq!(game.halfmove_clock(), 1);
}

#[test]
fn promotion_round_trips_through_text() {
    let game = Game::from_fen("8/P7/8/8/8/8/8/k6K w - - 0 1").unwrap();

    let mv = game.parse_move("a7a8q").unwrap();
    assert_eq!(game.format_move(mv), "a7a8q");
}

#[test]
fn illegal_move_text_is_rejected() {
    let game = Game::new();

    assert!(matches!(game.parse_move("e2e5"), Err(AppError::Position(_))));
    assert!(matches!(game.parse_move("zz99"), Err(AppError::Position(_))));
}

#[test]
fn play_uci_tracks_history_and_clock() {
    let mut game = Game::new();
    game.play_uci(&["e2e4", "e7e5", "g1f3", "b8c6"]).unwrap();

    assert_eq!(game.ply(), 4);
    assert_eq!(game.halfmove_clock(), 2);
    assert_eq!(game.move_list(), vec!["e2e4", "e7e5", "g1f3", "b8c6"]);
}

#[test]
fn undo_restores_previous_fen() {
    let mut game = Game::new();
    game.play_uci(&["d2d4", "g8f6"]).unwrap();
    let before = game.fen();

    game.play_uci(&["c2c4"]).unwrap();
    assert_ne!(game.fen(), before);

    game.undo_move().unwrap();
    assert_eq!(game.fen(), before);
    assert_eq!(game.ply(), 2);
}

#[test]
fn undo_at_start_is_position_error() {
    let mut game = Game::new();
    assert!(matches!(game.undo_move(), Err(AppError::Position(_))));
}

#[test]
fn fools_mate_is_checkmate_for_black() {
    let game = Game::from_fen(FOOLS_MATE).unwrap();

    let outcome = game.outcome();
    assert_eq!(
        outcome,
        Outcome::Checkmate {
            winner: Color::Black
        }
    );
    assert!(outcome.is_over());
    assert_eq!(outcome.result(), "0-1");
    assert!(game.legal_moves().is_empty());
}

#[test]
fn stalemate_is_a_draw() {
    let game = Game::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();

    assert_eq!(game.outcome(), Outcome::Stalemate);
    assert_eq!(game.outcome().result(), "1/2-1/2");
}

#[test]
fn hundred_quiet_plies_is_fifty_move_draw() {
    let game = Game::from_fen("8/8/8/4k3/8/8/8/4K2R w K - 100 80").unwrap();

    assert_eq!(game.outcome(), Outcome::FiftyMoveRule);
}

#[test]
fn third_occurrence_is_threefold_repetition() {
    let mut game = Game::new();
    let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8"];

    game.play_uci(&shuffle).unwrap();
    assert_eq!(game.outcome(), Outcome::Ongoing, "second occurrence only");

    game.play_uci(&shuffle).unwrap();
    assert_eq!(game.outcome(), Outcome::ThreefoldRepetition);
}

#[test]
fn ongoing_result_label() {
    assert_eq!(Outcome::Ongoing.result(), "*");
    assert!(!Outcome::Ongoing.is_over());
    assert_eq!(
        Outcome::Checkmate {
            winner: Color::White
        }
        .result(),
        "1-0"
    );
}
