//! The running engine process and its streams.
//!
//! [`EngineProcess`] is the narrow capability object through which every
//! byte to or from the engine flows: send a command, receive a line before a
//! deadline, resynchronise, terminate. Nothing else in the crate touches the
//! child's stdin or stdout.

use std::time::Duration;

use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;
use tokio::process::{Child, ChildStdin, ChildStdout};
use tokio::time::Instant;
use tokio_util::codec::FramedRead;
use tracing::{debug, info, warn};

use crate::uci::codec::{UciCodec, MAX_COMMAND_BYTES};
use crate::uci::command::Command;
use crate::uci::response::Response;
use crate::{AppError, Result};

/// A spawned engine with its protocol streams.
#[derive(Debug)]
pub struct EngineProcess {
    child: Child,
    stdin: ChildStdin,
    lines: FramedRead<ChildStdout, UciCodec>,
    name: String,
    log_protocol: bool,
    needs_resync: bool,
}

impl EngineProcess {
    /// Wrap a spawned child whose stdin and stdout were taken as pipes.
    #[must_use]
    pub fn new(child: Child, stdin: ChildStdin, stdout: ChildStdout, log_protocol: bool) -> Self {
        Self {
            child,
            stdin,
            lines: FramedRead::new(stdout, UciCodec::new()),
            name: "engine".to_owned(),
            log_protocol,
            needs_resync: false,
        }
    }

    /// Name used in log lines.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replace the log name once the engine has identified itself.
    pub fn set_name(&mut self, name: &str) {
        name.clone_into(&mut self.name);
    }

    /// Whether a timed-out search may still produce a stale `bestmove`.
    #[must_use]
    pub fn needs_resync(&self) -> bool {
        self.needs_resync
    }

    /// Record that the engine may still emit output for an abandoned search.
    pub fn mark_stale(&mut self) {
        self.needs_resync = true;
    }

    /// Record that the current search's `bestmove` has been consumed.
    pub fn mark_synced(&mut self) {
        self.needs_resync = false;
    }

    /// Write one command line and flush it.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Transport` if the write fails (typically because
    /// the engine has exited).
    pub async fn send(&mut self, command: &Command) -> Result<()> {
        let line = command.to_line();
        if line.len() > MAX_COMMAND_BYTES {
            warn!(
                engine = %self.name,
                bytes = line.len(),
                limit = MAX_COMMAND_BYTES,
                "command exceeds the engine input buffer size"
            );
        }
        if self.log_protocol {
            debug!(engine = %self.name, line = line.trim_end(), "gui -> engine");
        }

        self.stdin.write_all(line.as_bytes()).await.map_err(|e| {
            warn!(engine = %self.name, error = %e, "write to engine stdin failed");
            AppError::Transport(format!("write failed: {e}"))
        })?;
        self.stdin
            .flush()
            .await
            .map_err(|e| AppError::Transport(format!("flush failed: {e}")))
    }

    /// Receive the next line, giving up at `deadline`.
    ///
    /// The read and the timer race as equals: when the deadline fires first
    /// the pending read is dropped and `Ok(None)` is returned. Bytes of a
    /// partially received line stay buffered for the next call.
    ///
    /// # Errors
    ///
    /// - `AppError::Transport("engine closed its output")` — EOF.
    /// - `AppError::Transport(…)` — read failure.
    pub async fn recv_until(&mut self, deadline: Instant) -> Result<Option<String>> {
        loop {
            let Ok(item) = tokio::time::timeout_at(deadline, self.lines.next()).await else {
                return Ok(None);
            };

            match item {
                None => {
                    debug!(engine = %self.name, "engine stdout reached EOF");
                    return Err(AppError::Transport("engine closed its output".into()));
                }
                Some(Err(AppError::Protocol(msg))) => {
                    // Oversized line; the codec has discarded it.
                    warn!(engine = %self.name, error = msg.as_str(), "skipping engine line");
                }
                Some(Err(e)) => return Err(e),
                Some(Ok(line)) => {
                    if self.log_protocol {
                        debug!(engine = %self.name, line = line.as_str(), "engine -> gui");
                    }
                    return Ok(Some(line));
                }
            }
        }
    }

    /// Drain output left over from an abandoned search.
    ///
    /// Sends `isready` and discards everything up to `readyok`, so a late
    /// `bestmove` can never be taken as the answer to the next search.
    ///
    /// # Errors
    ///
    /// - `AppError::EngineTimeout` — no `readyok` within `timeout`; the
    ///   process stays marked for resync.
    /// - `AppError::Transport` — stream failure.
    pub async fn resync(&mut self, timeout: Duration) -> Result<()> {
        self.send(&Command::IsReady).await?;
        let deadline = Instant::now() + timeout;

        loop {
            let Some(line) = self.recv_until(deadline).await? else {
                return Err(AppError::EngineTimeout(format!(
                    "no readyok within {timeout:?} while draining a stopped search"
                )));
            };

            match Response::parse(&line) {
                Ok(Response::ReadyOk) => {
                    self.needs_resync = false;
                    debug!(engine = %self.name, "engine resynchronised");
                    return Ok(());
                }
                Ok(Response::BestMove { mv, .. }) => {
                    info!(engine = %self.name, mv = mv.as_str(), "discarding stale bestmove");
                }
                _ => {}
            }
        }
    }

    /// Stop the process: `quit`, wait up to `grace`, then force-kill.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Transport` only if the force-kill itself fails.
    pub async fn terminate(mut self, grace: Duration) -> Result<()> {
        if let Err(err) = self.send(&Command::Quit).await {
            debug!(engine = %self.name, %err, "quit not delivered, engine likely gone");
        }
        let Self {
            mut child,
            stdin,
            name,
            ..
        } = self;
        // Closing stdin lets engines that wait on EOF exit as well.
        drop(stdin);

        match tokio::time::timeout(grace, child.wait()).await {
            Ok(Ok(status)) => {
                info!(engine = %name, %status, "engine exited");
                Ok(())
            }
            Ok(Err(err)) => {
                warn!(engine = %name, %err, "error waiting for engine exit, killing");
                force_kill(&mut child, &name).await
            }
            Err(_elapsed) => {
                warn!(engine = %name, ?grace, "engine ignored quit, killing");
                force_kill(&mut child, &name).await
            }
        }
    }

    /// Force-kill the process without asking first.
    pub async fn kill(mut self) {
        if let Err(err) = force_kill(&mut self.child, &self.name).await {
            debug!(engine = %self.name, %err, "kill after failed start did not succeed");
        }
    }
}

async fn force_kill(child: &mut Child, name: &str) -> Result<()> {
    child
        .kill()
        .await
        .map_err(|e| AppError::Transport(format!("failed to kill {name}: {e}")))
}
