//! Game positions as seen by the engine client.
//!
//! The chess rules live outside this crate; the client only needs the
//! narrow [`GamePosition`] interface below. [`game::Game`] implements it on
//! top of `cozy-chess`, and [`sync`] turns any implementation into the
//! `position fen ... moves ...` description sent to the engine.

pub mod game;
pub mod sync;

use std::fmt::Debug;

use crate::Result;

/// Rules-collaborator interface consumed by the synchronizer and the
/// orchestrator.
pub trait GamePosition {
    /// Move representation of the rules implementation.
    type Move: Copy + Debug + Send;

    /// Plies played since the game (or the starting FEN) began.
    fn ply(&self) -> usize;

    /// Plies since the last capture or pawn move.
    fn halfmove_clock(&self) -> usize;

    /// The move that led to the current position, if any.
    fn prev_move(&self) -> Option<Self::Move>;

    /// Take back the previous move.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Position` when there is nothing to undo.
    fn undo_move(&mut self) -> Result<()>;

    /// Play `mv` in the current position.
    ///
    /// Re-playing a move straight after undoing it must succeed; the
    /// synchronizer relies on this to restore the position it rewound.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Position` when `mv` is illegal here.
    fn make_move(&mut self, mv: Self::Move) -> Result<()>;

    /// Board-state export in Forsyth–Edwards Notation.
    fn fen(&self) -> String;

    /// Long algebraic text of `mv`, which must be legal in the current position.
    fn format_move(&self, mv: Self::Move) -> String;

    /// Parse long algebraic text into a move legal in the current position.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Position` when the text is not a legal move.
    fn parse_move(&self, text: &str) -> Result<Self::Move>;
}
