//! UCI identification handshake.
//!
//! After the engine is spawned the client sends `uci` and reads lines until
//! `uciok`, collecting `id name`, `id author` and `option name` lines seen on
//! the way. The whole exchange, including the write, shares one deadline;
//! a handshake that never reports `uciok` is a timeout, not retried here.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info};

use crate::engine::process::EngineProcess;
use crate::engine::EngineIdentity;
use crate::uci::command::Command;
use crate::uci::response::Response;
use crate::{AppError, Result};

/// Run the `uci` → `uciok` exchange on a freshly spawned engine.
///
/// # Errors
///
/// - `AppError::InitTimeout` — no `uciok` within `timeout`.
/// - `AppError::Transport` — the engine closed its output or a write failed
///   before the handshake completed.
pub async fn perform(process: &mut EngineProcess, timeout: Duration) -> Result<EngineIdentity> {
    let deadline = Instant::now() + timeout;

    tokio::time::timeout_at(deadline, process.send(&Command::Uci))
        .await
        .map_err(|_| init_timeout(timeout))??;

    let mut identity = EngineIdentity::default();

    loop {
        let Some(line) = process.recv_until(deadline).await? else {
            return Err(init_timeout(timeout));
        };

        match Response::parse(&line) {
            Ok(Response::UciOk) => {
                info!(
                    engine = identity.display_name(),
                    author = identity.author.as_deref().unwrap_or("unknown"),
                    options = identity.options.len(),
                    "handshake: 'uciok' received"
                );
                return Ok(identity);
            }
            Ok(Response::IdName(name)) => identity.name = Some(name),
            Ok(Response::IdAuthor(author)) => identity.author = Some(author),
            Ok(Response::OptionName(option)) => identity.options.push(option),
            Ok(_) | Err(_) => {
                debug!(raw = line.as_str(), "handshake: skipping line before 'uciok'");
            }
        }
    }
}

fn init_timeout(timeout: Duration) -> AppError {
    AppError::InitTimeout(format!("'uciok' not received within {timeout:?}"))
}
