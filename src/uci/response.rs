//! Classification of lines received from the engine.
//!
//! | Line                              | Maps to                  |
//! |-----------------------------------|--------------------------|
//! | `id name <...>`                   | [`Response::IdName`]     |
//! | `id author <...>`                 | [`Response::IdAuthor`]   |
//! | `option name <...> type <...>`    | [`Response::OptionName`] |
//! | `uciok`                           | [`Response::UciOk`]      |
//! | `readyok`                         | [`Response::ReadyOk`]    |
//! | `bestmove <m> [ponder <m>]`       | [`Response::BestMove`]   |
//! | `info ...`                        | [`Response::Info`]       |
//! | blank                             | [`Response::Empty`]      |
//! | *(anything else)*                 | [`Response::Unknown`]    |

use crate::uci::codec::decode_tokens;
use crate::{AppError, Result};

/// Move text engines send when they have no legal move to play.
const NULL_MOVES: &[&str] = &["(none)", "0000"];

/// One parsed engine line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Engine name from `id name`.
    IdName(String),
    /// Engine author from `id author`.
    IdAuthor(String),
    /// Name of an advertised option.
    OptionName(String),
    /// End of the handshake.
    UciOk,
    /// Answer to `isready`.
    ReadyOk,
    /// Search result.
    BestMove {
        /// Chosen move in long algebraic notation.
        mv: String,
        /// Expected reply, if the engine reported one.
        ponder: Option<String>,
    },
    /// Search progress; the raw tokens after `info`.
    Info(Vec<String>),
    /// Blank line.
    Empty,
    /// Any other line.
    Unknown(Vec<String>),
}

impl Response {
    /// Parse one received line.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Protocol` for a `bestmove` line without a move.
    pub fn parse(line: &str) -> Result<Self> {
        Self::from_tokens(decode_tokens(line))
    }

    /// Classify an already tokenized line.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Protocol` for a `bestmove` line without a move.
    pub fn from_tokens(tokens: Vec<String>) -> Result<Self> {
        let Some(head) = tokens.first() else {
            return Ok(Self::Empty);
        };

        let response = match head.as_str() {
            "uciok" => Self::UciOk,
            "readyok" => Self::ReadyOk,
            "info" => Self::Info(tokens[1..].to_vec()),
            "bestmove" => parse_bestmove(&tokens)?,
            "id" => match tokens.get(1).map(String::as_str) {
                Some("name") => Self::IdName(tokens[2..].join(" ")),
                Some("author") => Self::IdAuthor(tokens[2..].join(" ")),
                _ => Self::Unknown(tokens),
            },
            "option" if tokens.get(1).is_some_and(|t| t == "name") => {
                let name: Vec<&str> = tokens[2..]
                    .iter()
                    .map(String::as_str)
                    .take_while(|t| *t != "type")
                    .collect();
                Self::OptionName(name.join(" "))
            }
            _ => Self::Unknown(tokens),
        };

        Ok(response)
    }

    /// Whether this is a `bestmove` carrying a null move (`(none)` / `0000`).
    #[must_use]
    pub fn is_null_bestmove(&self) -> bool {
        matches!(self, Self::BestMove { mv, .. } if NULL_MOVES.contains(&mv.as_str()))
    }
}

fn parse_bestmove(tokens: &[String]) -> Result<Response> {
    let mv = tokens
        .get(1)
        .ok_or_else(|| AppError::Protocol("bestmove without a move".into()))?
        .clone();

    let ponder = match (tokens.get(2).map(String::as_str), tokens.get(3)) {
        (Some("ponder"), Some(reply)) => Some(reply.clone()),
        _ => None,
    };

    Ok(Response::BestMove { mv, ponder })
}
