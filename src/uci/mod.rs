//! UCI line protocol.
//!
//! - `codec`: [`LinesCodec`](tokio_util::codec::LinesCodec)-based framing of
//!   the engine's stdout plus the line/token helpers.
//! - `command`: commands sent to the engine, rendered as token lists.
//! - `response`: classification of lines received from the engine.

pub mod codec;
pub mod command;
pub mod response;
