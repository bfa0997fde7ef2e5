//! One position/go/bestmove exchange under a deadline.
//!
//! The caller holds the handle's guard, so the process is exclusively ours
//! for the duration of [`run_search`]. The position is described (and
//! restored) before anything is sent, so every failure path below leaves it
//! untouched.

use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::engine::process::EngineProcess;
use crate::position::sync::describe;
use crate::position::GamePosition;
use crate::search::{ClockState, SearchBudget};
use crate::uci::command::{Command, GoCommand};
use crate::uci::response::Response;
use crate::{AppError, Result};

/// Run one search on `process` and parse the reply against `position`.
///
/// # Errors
///
/// See [`EngineHandle::request_move`](crate::engine::handle::EngineHandle::request_move).
pub async fn run_search<P: GamePosition>(
    process: &mut EngineProcess,
    position: &mut P,
    budget: &SearchBudget,
    clock: Option<&ClockState>,
    config: &EngineConfig,
) -> Result<P::Move> {
    if process.needs_resync() {
        process.resync(config.timeouts.sync()).await?;
    }

    let descriptor = describe(position)?;
    process.send(&Command::Position(descriptor)).await?;

    let budget = budget.resolve(clock, &config.search);
    let wait = budget.deadline(&config.search);
    let go = GoCommand {
        clock: clock.copied(),
        ..GoCommand::with_budget(budget)
    };
    // Stale until this search's bestmove is consumed, so a caller that drops
    // the request mid-search leaves the next one to resync.
    process.mark_stale();
    let started = Instant::now();
    process.send(&Command::Go(go)).await?;
    let deadline = started + wait;

    loop {
        let Some(line) = process.recv_until(deadline).await? else {
            return Err(abandon(process, wait).await);
        };

        match Response::parse(&line)? {
            response @ Response::BestMove { .. } if response.is_null_bestmove() => {
                process.mark_synced();
                return Err(AppError::Engine("engine reported no legal move".into()));
            }
            Response::BestMove { mv, ponder } => {
                process.mark_synced();
                let parsed = position.parse_move(&mv).map_err(|err| {
                    AppError::Protocol(format!("unparseable bestmove {mv:?}: {err}"))
                })?;
                info!(
                    engine = process.name(),
                    mv = mv.as_str(),
                    ponder = ponder.as_deref().unwrap_or("-"),
                    elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
                    "search finished"
                );
                return Ok(parsed);
            }
            Response::Info(_) | Response::Empty => {}
            other => {
                debug!(engine = process.name(), ?other, "ignoring line during search");
            }
        }
    }
}

/// Deadline passed: ask the engine to stop and give up without waiting.
///
/// Whatever the engine still prints for this search is drained by the
/// resync at the start of the next one.
async fn abandon(process: &mut EngineProcess, wait: std::time::Duration) -> AppError {
    warn!(engine = process.name(), ?wait, "no bestmove before deadline, sending stop");
    if let Err(err) = process.send(&Command::Stop).await {
        warn!(engine = process.name(), %err, "failed to send stop");
    }
    AppError::EngineTimeout(format!("no bestmove within {wait:?}"))
}
