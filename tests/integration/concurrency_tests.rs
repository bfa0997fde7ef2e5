//! Integration tests for exclusive use of one engine by concurrent callers.

use std::sync::Arc;
use std::time::{Duration, Instant};

use uci_bridge::position::game::Game;
use uci_bridge::search::SearchBudget;
use uci_bridge::EngineHandle;

use super::test_helpers::{recorded_config, recorded_lines};

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_requests_are_serialized() {
    let (config, record) = recorded_config(&["--delay-ms", "200"]);
    let handle = Arc::new(EngineHandle::start(config).await.expect("start"));
    let budget = SearchBudget::movetime(1_000);

    let started = Instant::now();
    let first = {
        let handle = Arc::clone(&handle);
        tokio::spawn(async move {
            let mut game = Game::new();
            handle.request_move(&mut game, &budget, None).await
        })
    };
    let second = {
        let handle = Arc::clone(&handle);
        tokio::spawn(async move {
            let mut game = Game::new();
            game.play_uci(&["e2e4"]).expect("legal");
            handle.request_move(&mut game, &budget, None).await
        })
    };

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(handle.is_busy(), "a search must hold the handle");

    first.await.expect("join").expect("first search");
    second.await.expect("join").expect("second search");
    assert!(
        started.elapsed() >= Duration::from_millis(400),
        "searches must not overlap"
    );
    assert!(!handle.is_busy());

    handle.shutdown().await.expect("shutdown");

    let exchange: Vec<String> = recorded_lines(&record)
        .into_iter()
        .filter(|line| line.starts_with("position") || line.starts_with("go"))
        .map(|line| line.split_whitespace().next().unwrap_or_default().to_owned())
        .collect();
    assert_eq!(exchange, vec!["position", "go", "position", "go"]);
}

#[tokio::test]
async fn is_busy_is_false_when_idle() {
    let (config, _record) = recorded_config(&[]);
    let handle = EngineHandle::start(config).await.expect("start");

    assert!(!handle.is_busy());
    handle.shutdown().await.expect("shutdown");
    assert!(!handle.is_busy());
}
