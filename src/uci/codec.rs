//! Line codec for UCI engine streams.
//!
//! Wraps [`tokio_util::codec::LinesCodec`] with a maximum line length so a
//! misbehaving engine cannot make the client buffer an unterminated line
//! forever. Partial lines stay in the [`FramedRead`](tokio_util::codec::FramedRead)
//! buffer until their `\n` arrives, which also makes an abandoned read (a
//! deadline firing mid-line) lossless.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, LinesCodec, LinesCodecError};

use crate::{AppError, Result};

/// Maximum inbound line length accepted from an engine: 64 KiB.
pub const MAX_LINE_BYTES: usize = 65_536;

/// Size the engine side is assumed to be able to buffer for one command.
///
/// Longer `position` commands are still sent, with a warning.
pub const MAX_COMMAND_BYTES: usize = 1024;

/// Join `parts` with single spaces and terminate the line with `\n`.
#[must_use]
pub fn encode_line<S: AsRef<str>>(parts: &[S]) -> String {
    let mut line = parts
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ");
    line.push('\n');
    line
}

/// Split a received line into whitespace-separated tokens.
///
/// Blank lines yield an empty vector; callers ignore them.
#[must_use]
pub fn decode_tokens(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_owned).collect()
}

/// Inbound line codec for an engine's stdout.
///
/// Each `\n`-terminated UTF-8 string is one protocol line; a trailing `\r`
/// is stripped. Lines longer than [`MAX_LINE_BYTES`] produce
/// [`AppError::Protocol`] and are discarded by the underlying codec.
#[derive(Debug)]
pub struct UciCodec(LinesCodec);

impl UciCodec {
    /// Create a codec with the default [`MAX_LINE_BYTES`] limit.
    #[must_use]
    pub fn new() -> Self {
        Self(LinesCodec::new_with_max_length(MAX_LINE_BYTES))
    }
}

impl Default for UciCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for UciCodec {
    type Item = String;
    type Error = AppError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>> {
        self.0.decode(src).map_err(map_codec_error)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>> {
        self.0.decode_eof(src).map_err(map_codec_error)
    }
}

fn map_codec_error(e: LinesCodecError) -> AppError {
    match e {
        LinesCodecError::MaxLineLengthExceeded => {
            AppError::Protocol(format!("line too long: exceeded {MAX_LINE_BYTES} bytes"))
        }
        LinesCodecError::Io(io_err) => AppError::Transport(io_err.to_string()),
    }
}
