//! Engine process lifecycle.
//!
//! - `spawner`: launches the executable with piped stdio and `kill_on_drop`.
//! - `process`: [`EngineProcess`](process::EngineProcess), the only owner of
//!   the child's streams; line send/receive with deadlines, resync, and
//!   termination.
//! - `handshake`: the `uci` → `uciok` exchange collecting the engine identity.
//! - `handle`: [`EngineHandle`](handle::EngineHandle), the public start /
//!   request / restart / shutdown surface with exclusive-use arbitration.

pub mod handle;
pub mod handshake;
pub mod process;
pub mod spawner;

use serde::Serialize;

/// What the engine reported about itself during the handshake.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EngineIdentity {
    /// Value of `id name`.
    pub name: Option<String>,
    /// Value of `id author`.
    pub author: Option<String>,
    /// Names of the options advertised with `option name`.
    pub options: Vec<String>,
}

impl EngineIdentity {
    /// Name used in log lines; `engine` until the engine names itself.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("engine")
    }
}
