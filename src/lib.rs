#![forbid(unsafe_code)]

//! Async client for UCI chess engines.
//!
//! Starts an engine process, performs the `uci` handshake, and asks it for
//! moves one search at a time under hard deadlines. Positions are sent as a
//! base FEN plus the moves since the last irreversible move.

pub mod config;
pub mod engine;
pub mod errors;
pub mod position;
pub mod search;
pub mod uci;

pub use config::EngineConfig;
pub use engine::handle::EngineHandle;
pub use errors::{AppError, Result};
