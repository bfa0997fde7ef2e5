//! Commands sent from the client to the engine.

use std::fmt::{Display, Formatter};

use crate::position::sync::PositionDescriptor;
use crate::search::{ClockState, SearchBudget};
use crate::uci::codec::encode_line;

/// Parameters of one `go` command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoCommand {
    /// Search in ponder mode.
    pub ponder: bool,
    /// Restrict the search to these moves (long algebraic).
    pub search_moves: Vec<String>,
    /// Clock information for both sides.
    pub clock: Option<ClockState>,
    /// Stopping conditions; unbounded and without a clock encodes as `infinite`.
    pub budget: SearchBudget,
}

impl GoCommand {
    /// `go` with only a budget.
    #[must_use]
    pub fn with_budget(budget: SearchBudget) -> Self {
        Self {
            budget,
            ..Self::default()
        }
    }

    fn push_tokens(&self, out: &mut Vec<String>) {
        if self.ponder {
            out.push("ponder".into());
        }
        if !self.search_moves.is_empty() {
            out.push("searchmoves".into());
            out.extend(self.search_moves.iter().cloned());
        }
        if let Some(clock) = self.clock {
            for (key, value) in [
                ("wtime", clock.wtime),
                ("btime", clock.btime),
                ("winc", clock.winc),
                ("binc", clock.binc),
            ] {
                out.push(key.into());
                out.push(value.to_string());
            }
        }

        let budget = &self.budget;
        if let Some(depth) = budget.depth {
            out.extend(["depth".into(), depth.to_string()]);
        }
        if let Some(nodes) = budget.nodes {
            out.extend(["nodes".into(), nodes.to_string()]);
        }
        if let Some(ms) = budget.movetime_ms {
            out.extend(["movetime".into(), ms.to_string()]);
        }
        if let Some(moves) = budget.mate_in {
            out.extend(["mate".into(), moves.to_string()]);
        }
        if budget.is_unbounded() && self.clock.is_none() {
            out.push("infinite".into());
        }
    }
}

/// A command line understood by UCI engines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Identification / handshake request.
    Uci,
    /// Synchronisation ping, answered with `readyok`.
    IsReady,
    /// Set the position from a base FEN plus the reversible tail.
    Position(PositionDescriptor),
    /// Begin a search.
    Go(GoCommand),
    /// Stop the running search.
    Stop,
    /// Ask the process to exit.
    Quit,
}

impl Command {
    /// Render the command as protocol tokens.
    #[must_use]
    pub fn tokens(&self) -> Vec<String> {
        match self {
            Self::Uci => vec!["uci".into()],
            Self::IsReady => vec!["isready".into()],
            Self::Stop => vec!["stop".into()],
            Self::Quit => vec!["quit".into()],
            Self::Position(descriptor) => {
                let mut out = vec!["position".into(), "fen".into(), descriptor.fen.clone()];
                if !descriptor.moves.is_empty() {
                    out.push("moves".into());
                    out.extend(descriptor.moves.iter().cloned());
                }
                out
            }
            Self::Go(go) => {
                let mut out = vec!["go".into()];
                go.push_tokens(&mut out);
                out
            }
        }
    }

    /// Render the command as a `\n`-terminated line.
    #[must_use]
    pub fn to_line(&self) -> String {
        encode_line(&self.tokens())
    }
}

impl Display for Command {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_line().trim_end())
    }
}
