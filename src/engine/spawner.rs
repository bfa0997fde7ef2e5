//! Engine process spawner.
//!
//! Launches the configured executable with:
//! - piped stdin/stdout for the protocol, inherited stderr for diagnostics;
//! - `kill_on_drop(true)` so a dropped handle never leaks a process.
//!
//! Spawning does not talk to the engine; see `handshake` for that.

use std::process::Stdio;

use tokio::process::Command;
use tracing::info;

use crate::config::EngineConfig;
use crate::engine::process::EngineProcess;
use crate::{AppError, Result};

/// Spawn the engine described by `config`.
///
/// Must be called from within a tokio runtime.
///
/// # Errors
///
/// - `AppError::SpawnFailed("failed to spawn …")` — OS spawn failure.
/// - `AppError::SpawnFailed("failed to capture …")` — stdio not piped.
pub fn spawn_engine(config: &EngineConfig) -> Result<EngineProcess> {
    let mut cmd = Command::new(&config.path);
    cmd.args(&config.args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .kill_on_drop(true);

    let mut child = cmd.spawn().map_err(|err| {
        AppError::SpawnFailed(format!(
            "failed to spawn {}: {err}",
            config.path.display()
        ))
    })?;

    let stdin = child
        .stdin
        .take()
        .ok_or_else(|| AppError::SpawnFailed("failed to capture engine stdin".into()))?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| AppError::SpawnFailed("failed to capture engine stdout".into()))?;

    info!(
        path = %config.path.display(),
        pid = ?child.id(),
        "engine process spawned"
    );

    Ok(EngineProcess::new(child, stdin, stdout, config.log_protocol))
}
