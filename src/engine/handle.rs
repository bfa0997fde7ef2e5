//! Public engine handle.
//!
//! An [`EngineHandle`] owns one engine process for one session. The
//! process sits behind an async mutex: holding the guard *is* being busy.
//! Every operation that talks to the engine (search, restart, shutdown)
//! takes the guard for its whole duration and releases it on every exit
//! path when the guard drops, so at most one exchange is ever in flight.
//!
//! Handles are ordinary values; share one between tasks with `Arc`.

use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::engine::process::EngineProcess;
use crate::engine::{handshake, spawner, EngineIdentity};
use crate::position::GamePosition;
use crate::search::{orchestrator, ClockState, SearchBudget};
use crate::{AppError, Result};

/// One external search process and its exclusive-use guard.
#[derive(Debug)]
pub struct EngineHandle {
    config: EngineConfig,
    /// `None` after `shutdown` or a failed `restart`.
    process: Mutex<Option<EngineProcess>>,
    identity: RwLock<Option<EngineIdentity>>,
}

impl EngineHandle {
    /// Spawn the engine and complete the handshake.
    ///
    /// # Errors
    ///
    /// - `AppError::Config` — `config` fails validation.
    /// - `AppError::SpawnFailed` — the process could not be created.
    /// - `AppError::InitTimeout` — no `uciok` within `timeouts.init_ms`.
    /// - `AppError::Transport` — the engine died during the handshake.
    ///
    /// No handle is returned on failure and the child is killed.
    pub async fn start(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let (process, identity) = launch(&config).await?;
        Ok(Self {
            config,
            process: Mutex::new(Some(process)),
            identity: RwLock::new(Some(identity)),
        })
    }

    /// Configuration the handle was started with.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Identity reported by the running engine, `None` when none is running.
    pub async fn identity(&self) -> Option<EngineIdentity> {
        self.identity.read().await.clone()
    }

    /// Whether a search, restart or shutdown currently holds the handle.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.process.try_lock().is_err()
    }

    /// Whether a process is attached. Waits for the handle to be free.
    pub async fn is_running(&self) -> bool {
        self.process.lock().await.is_some()
    }

    /// Ask the engine for a move in `position`.
    ///
    /// Waits while another request holds the handle. `position` is restored
    /// to its state on entry whatever the outcome.
    ///
    /// # Errors
    ///
    /// - `AppError::Engine` — no process is running, or the engine had no move.
    /// - `AppError::EngineTimeout` — no `bestmove` before the deadline; `stop`
    ///   has been sent and the next request resynchronises first.
    /// - `AppError::Protocol` — malformed or unparseable reply.
    /// - `AppError::Transport` — stream failure; `restart` before retrying.
    pub async fn request_move<P>(
        &self,
        position: &mut P,
        budget: &SearchBudget,
        clock: Option<&ClockState>,
    ) -> Result<P::Move>
    where
        P: GamePosition + Send,
    {
        let mut guard = self.process.lock().await;
        let process = guard
            .as_mut()
            .ok_or_else(|| AppError::Engine("engine is not running".into()))?;
        orchestrator::run_search(process, position, budget, clock, &self.config).await
    }

    /// Replace the engine process in place.
    ///
    /// Waits for any in-flight request, terminates the current process
    /// (`quit`, grace period, force-kill), then spawns and handshakes a new
    /// one. If the new start fails the handle is left without a process.
    ///
    /// # Errors
    ///
    /// Same as [`EngineHandle::start`].
    pub async fn restart(&self) -> Result<()> {
        let mut guard = self.process.lock().await;
        *self.identity.write().await = None;

        if let Some(old) = guard.take() {
            let name = old.name().to_owned();
            if let Err(err) = old.terminate(self.config.timeouts.shutdown_grace()).await {
                warn!(engine = %name, %err, "old engine did not terminate cleanly");
            }
        }

        let (process, identity) = launch(&self.config).await?;
        info!(engine = identity.display_name(), "engine restarted");
        *guard = Some(process);
        *self.identity.write().await = Some(identity);
        Ok(())
    }

    /// Terminate the engine process. A handle without a process is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Transport` if the engine ignored `quit` and could
    /// not be killed either.
    pub async fn shutdown(&self) -> Result<()> {
        let mut guard = self.process.lock().await;
        *self.identity.write().await = None;

        match guard.take() {
            Some(process) => process.terminate(self.config.timeouts.shutdown_grace()).await,
            None => Ok(()),
        }
    }
}

/// Spawn and handshake; the child is killed if the handshake fails.
async fn launch(config: &EngineConfig) -> Result<(EngineProcess, EngineIdentity)> {
    let mut process = spawner::spawn_engine(config)?;

    match handshake::perform(&mut process, config.timeouts.init()).await {
        Ok(identity) => {
            process.set_name(identity.display_name());
            Ok((process, identity))
        }
        Err(err) => {
            warn!(path = %config.path.display(), %err, "engine handshake failed");
            process.kill().await;
            Err(err)
        }
    }
}
