//! Search requests and the orchestrator that runs them.
//!
//! [`SearchBudget`] and [`ClockState`] describe one `go` command;
//! [`orchestrator`] drives the position/go/bestmove exchange under a
//! deadline on behalf of [`EngineHandle::request_move`](crate::engine::handle::EngineHandle::request_move).

pub mod orchestrator;

use std::time::Duration;

use serde::Serialize;

use crate::config::SearchConfig;

/// Stopping conditions for one search. Any combination may be set.
///
/// A budget with nothing set and no clock means "search until told to stop"
/// on the wire (`go infinite`); the orchestrator never sends that as-is and
/// substitutes the configured default movetime instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchBudget {
    /// Node-count limit.
    pub nodes: Option<u64>,
    /// Wall-clock limit in milliseconds.
    pub movetime_ms: Option<u64>,
    /// Depth limit in plies.
    pub depth: Option<u32>,
    /// Search for a mate in this many moves.
    pub mate_in: Option<u32>,
}

impl SearchBudget {
    /// Budget limited by wall-clock time only.
    #[must_use]
    pub fn movetime(ms: u64) -> Self {
        Self {
            movetime_ms: Some(ms),
            ..Self::default()
        }
    }

    /// Budget limited by depth only.
    #[must_use]
    pub fn depth(plies: u32) -> Self {
        Self {
            depth: Some(plies),
            ..Self::default()
        }
    }

    /// Whether no stopping condition is set.
    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.nodes.is_none()
            && self.movetime_ms.is_none()
            && self.depth.is_none()
            && self.mate_in.is_none()
    }

    /// The budget actually sent.
    ///
    /// An unbounded budget gets the default movetime unless a clock is
    /// supplied, in which case the engine manages its own time.
    #[must_use]
    pub fn resolve(self, clock: Option<&ClockState>, config: &SearchConfig) -> Self {
        if self.is_unbounded() && clock.is_none() {
            Self::movetime(config.default_movetime_ms)
        } else {
            self
        }
    }

    /// How long the orchestrator waits for `bestmove` before giving up.
    ///
    /// `movetime + slack` when a movetime is set, otherwise the configured
    /// maximum search time (depth, nodes, mate or clock-only searches).
    #[must_use]
    pub fn deadline(&self, config: &SearchConfig) -> Duration {
        match self.movetime_ms {
            Some(ms) => Duration::from_millis(ms.saturating_add(config.deadline_slack_ms)),
            None => Duration::from_millis(config.max_search_ms),
        }
    }
}

/// Remaining time and increment for both sides, in milliseconds.
///
/// Passed through to the engine unmodified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClockState {
    /// White's remaining time.
    pub wtime: u64,
    /// Black's remaining time.
    pub btime: u64,
    /// White's increment per move.
    pub winc: u64,
    /// Black's increment per move.
    pub binc: u64,
}
