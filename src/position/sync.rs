//! Position synchronizer.
//!
//! Describes a position as "base FEN + reversible tail". Only the moves
//! since the last capture or pawn move are sent: the engine still sees every
//! position that can repeat (so its repetition and fifty-move detection
//! work), while the `position` command stays short however long the game
//! has been running.

use tracing::{debug, warn};

use crate::position::GamePosition;
use crate::Result;

/// Base position plus the moves to replay onto it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionDescriptor {
    /// Base position in FEN.
    pub fen: String,
    /// Long algebraic moves, oldest first.
    pub moves: Vec<String>,
}

/// Describe `position` for the engine.
///
/// Undoes up to `halfmove_clock` moves (stopping early at ply 0), records
/// the base FEN, then replays the same moves in their original order,
/// formatting each one before re-applying it. On success `position` is left
/// exactly as it was.
///
/// # Errors
///
/// Propagates the first `AppError::Position` from the rules collaborator.
/// Every move that was undone is still replayed, past any refused one, so
/// the position is rewound no further than the collaborator forces.
pub fn describe<P: GamePosition>(position: &mut P) -> Result<PositionDescriptor> {
    let tail = position.halfmove_clock();
    let mut undone = Vec::with_capacity(tail);
    let mut failure = None;

    while undone.len() < tail && position.ply() > 0 {
        let Some(mv) = position.prev_move() else {
            break;
        };
        if let Err(err) = position.undo_move() {
            failure = Some(err);
            break;
        }
        undone.push(mv);
    }

    let fen = position.fen();
    let mut moves = Vec::with_capacity(undone.len());
    for mv in undone.into_iter().rev() {
        if failure.is_none() {
            moves.push(position.format_move(mv));
        }
        if let Err(err) = position.make_move(mv) {
            warn!(?mv, %err, "failed to replay an undone move");
            if failure.is_none() {
                failure = Some(err);
            }
        }
    }
    if let Some(err) = failure {
        return Err(err);
    }

    debug!(fen = %fen, tail = moves.len(), "position described");
    Ok(PositionDescriptor { fen, moves })
}
