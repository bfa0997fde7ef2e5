//! Unit tests for engine line classification.

use uci_bridge::uci::response::Response;
use uci_bridge::AppError;

#[test]
fn id_lines_keep_multi_word_values() {
    assert_eq!(
        Response::parse("id name Stockfish 16.1").unwrap(),
        Response::IdName("Stockfish 16.1".into())
    );
    assert_eq!(
        Response::parse("id author the Stockfish developers").unwrap(),
        Response::IdAuthor("the Stockfish developers".into())
    );
}

#[test]
fn handshake_terminators() {
    assert_eq!(Response::parse("uciok").unwrap(), Response::UciOk);
    assert_eq!(Response::parse("  readyok \r").unwrap(), Response::ReadyOk);
}

#[test]
fn option_name_stops_at_type() {
    assert_eq!(
        Response::parse("option name Move Overhead type spin default 10 min 0 max 5000").unwrap(),
        Response::OptionName("Move Overhead".into())
    );
}

#[test]
fn bestmove_with_and_without_ponder() {
    assert_eq!(
        Response::parse("bestmove e2e4").unwrap(),
        Response::BestMove {
            mv: "e2e4".into(),
            ponder: None
        }
    );
    assert_eq!(
        Response::parse("bestmove g1f3 ponder d7d5").unwrap(),
        Response::BestMove {
            mv: "g1f3".into(),
            ponder: Some("d7d5".into())
        }
    );
}

#[test]
fn bestmove_without_move_is_protocol_error() {
    match Response::parse("bestmove") {
        Err(AppError::Protocol(msg)) => assert!(msg.contains("without a move")),
        other => panic!("expected Err(AppError::Protocol), got: {other:?}"),
    }
}

#[test]
fn null_bestmoves_are_recognised() {
    assert!(Response::parse("bestmove (none)").unwrap().is_null_bestmove());
    assert!(Response::parse("bestmove 0000").unwrap().is_null_bestmove());
    assert!(!Response::parse("bestmove a7a8q").unwrap().is_null_bestmove());
    assert!(!Response::UciOk.is_null_bestmove());
}

#[test]
fn info_keeps_tokens_after_keyword() {
    assert_eq!(
        Response::parse("info depth 5 score cp 31 pv e2e4 e7e5").unwrap(),
        Response::Info(
            ["depth", "5", "score", "cp", "31", "pv", "e2e4", "e7e5"]
                .iter()
                .map(|t| (*t).to_owned())
                .collect()
        )
    );
}

#[test]
fn blank_and_unknown_lines() {
    assert_eq!(Response::parse("").unwrap(), Response::Empty);
    assert_eq!(Response::parse(" \t ").unwrap(), Response::Empty);
    assert_eq!(
        Response::parse("copyprotection ok").unwrap(),
        Response::Unknown(vec!["copyprotection".into(), "ok".into()])
    );
    assert!(matches!(
        Response::parse("id").unwrap(),
        Response::Unknown(_)
    ));
}
