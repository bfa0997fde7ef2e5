//! `cozy-chess` backed game with move history.
//!
//! `cozy_chess::Board` is a value type without take-back, so [`Game`] keeps
//! the board as it was before every move. Undo restores that snapshot,
//! which makes undo/redo exact: the restored board compares equal to the
//! original.

use cozy_chess::util::{display_uci_move, parse_uci_move};
use cozy_chess::{Board, Color, Move};

use crate::position::GamePosition;
use crate::{AppError, Result};

/// How a game stands after the last move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The side to move has legal moves and no draw rule applies.
    Ongoing,
    /// The side to move is mated.
    Checkmate {
        /// Side that delivered mate.
        winner: Color,
    },
    /// The side to move has no legal move and is not in check.
    Stalemate,
    /// A hundred plies without capture or pawn move.
    FiftyMoveRule,
    /// The current position occurred for the third time.
    ThreefoldRepetition,
}

impl Outcome {
    /// Whether the game has ended.
    #[must_use]
    pub fn is_over(self) -> bool {
        self != Self::Ongoing
    }

    /// Short result label, `1-0`, `0-1`, `1/2-1/2` or `*`.
    #[must_use]
    pub fn result(self) -> &'static str {
        match self {
            Self::Ongoing => "*",
            Self::Checkmate {
                winner: Color::White,
            } => "1-0",
            Self::Checkmate {
                winner: Color::Black,
            } => "0-1",
            Self::Stalemate | Self::FiftyMoveRule | Self::ThreefoldRepetition => "1/2-1/2",
        }
    }
}

/// A game: the current board plus every earlier board and the move played.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    history: Vec<(Board, Move)>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Game from the standard starting position.
    #[must_use]
    pub fn new() -> Self {
        Self {
            board: Board::default(),
            history: Vec::new(),
        }
    }

    /// Game starting from `fen`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Position` if the FEN is invalid.
    pub fn from_fen(fen: &str) -> Result<Self> {
        let board = Board::from_fen(fen, false)
            .map_err(|err| AppError::Position(format!("invalid fen {fen:?}: {err:?}")))?;
        Ok(Self {
            board,
            history: Vec::new(),
        })
    }

    /// Play a sequence of long algebraic moves.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Position` at the first move that does not parse or
    /// is illegal; earlier moves stay played.
    pub fn play_uci<S: AsRef<str>>(&mut self, moves: &[S]) -> Result<()> {
        for text in moves {
            let mv = self.parse_move(text.as_ref())?;
            self.make_move(mv)?;
        }
        Ok(())
    }

    /// Current board.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Side to move.
    #[must_use]
    pub fn side_to_move(&self) -> Color {
        self.board.side_to_move()
    }

    /// Every legal move in the current position.
    #[must_use]
    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::new();
        self.board.generate_moves(|piece_moves| {
            moves.extend(piece_moves);
            false
        });
        moves
    }

    /// Long algebraic text of every move played, in order.
    #[must_use]
    pub fn move_list(&self) -> Vec<String> {
        self.history
            .iter()
            .map(|(before, mv)| display_uci_move(before, *mv).to_string())
            .collect()
    }

    /// Classify the current position.
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        let has_moves = self.board.generate_moves(|_| true);
        if !has_moves {
            return if self.board.checkers().is_empty() {
                Outcome::Stalemate
            } else {
                Outcome::Checkmate {
                    winner: !self.board.side_to_move(),
                }
            };
        }
        if self.board.halfmove_clock() >= 100 {
            return Outcome::FiftyMoveRule;
        }
        if self.repetitions() >= 3 {
            return Outcome::ThreefoldRepetition;
        }
        Outcome::Ongoing
    }

    /// Occurrences of the current position, itself included. Only the
    /// reversible tail can contain a repeat.
    fn repetitions(&self) -> usize {
        let hash = self.board.hash();
        let window = self.halfmove_clock().min(self.history.len());
        1 + self.history[self.history.len() - window..]
            .iter()
            .filter(|(before, _)| before.hash() == hash)
            .count()
    }
}

impl GamePosition for Game {
    type Move = Move;

    fn ply(&self) -> usize {
        self.history.len()
    }

    fn halfmove_clock(&self) -> usize {
        usize::from(self.board.halfmove_clock())
    }

    fn prev_move(&self) -> Option<Move> {
        self.history.last().map(|(_, mv)| *mv)
    }

    fn undo_move(&mut self) -> Result<()> {
        let (before, _) = self
            .history
            .pop()
            .ok_or_else(|| AppError::Position("no move to undo".into()))?;
        self.board = before;
        Ok(())
    }

    fn make_move(&mut self, mv: Move) -> Result<()> {
        let before = self.board.clone();
        self.board
            .try_play(mv)
            .map_err(|_| AppError::Position(format!("illegal move {mv}")))?;
        self.history.push((before, mv));
        Ok(())
    }

    fn fen(&self) -> String {
        self.board.to_string()
    }

    fn format_move(&self, mv: Move) -> String {
        display_uci_move(&self.board, mv).to_string()
    }

    fn parse_move(&self, text: &str) -> Result<Move> {
        let mv = parse_uci_move(&self.board, text)
            .map_err(|err| AppError::Position(format!("unparseable move {text:?}: {err:?}")))?;
        if !self.board.is_legal(mv) {
            return Err(AppError::Position(format!("illegal move {text}")));
        }
        Ok(mv)
    }
}
