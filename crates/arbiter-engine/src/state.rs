//! Check, checkmate, and stalemate detection.

use arbiter_core::{Color, Move, Square};

use crate::rules::{is_king_attacked, is_legal};
use crate::Position;

/// Game state as seen by the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameState {
    /// No check, legal moves available.
    Normal,
    /// The side to move is in check but can play on.
    Check,
    /// The side to move is in check with no legal move. Terminal.
    Checkmate,
    /// The side to move is not in check but has no legal move. Terminal.
    Stalemate,
}

impl GameState {
    /// Returns true if no further moves are accepted in this state.
    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(self, GameState::Checkmate | GameState::Stalemate)
    }
}

impl std::fmt::Display for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GameState::Normal => "Normal",
            GameState::Check => "Check",
            GameState::Checkmate => "Checkmate",
            GameState::Stalemate => "Stalemate",
        };
        write!(f, "{}", name)
    }
}

/// Returns true if `color` has at least one legal move.
///
/// Exhaustive scan: every piece of `color` against every destination
/// square, short-circuiting on the first legal move found. At
/// O(pieces x 64) legality queries this is built for an interactive
/// game, not for search.
pub fn has_any_legal_move(position: &Position, color: Color) -> bool {
    // Legality is judged for the side to move, so hand the turn to
    // `color` on a scratch copy before scanning.
    let mut scratch = position.clone();
    scratch.side_to_move = color;

    let origins: Vec<Square> = scratch
        .pieces()
        .filter(|(_, p)| p.color == color)
        .map(|(sq, _)| sq)
        .collect();

    origins.into_iter().any(|from| {
        Square::all().any(|to| to != from && is_legal(&scratch, Move::new(from, to)))
    })
}

/// Classifies the position for the side to move.
pub fn evaluate(position: &Position) -> GameState {
    let side = position.side_to_move;
    let in_check = is_king_attacked(position, side);
    let can_move = has_any_legal_move(position, side);

    match (in_check, can_move) {
        (true, false) => GameState::Checkmate,
        (false, false) => GameState::Stalemate,
        (true, true) => GameState::Check,
        (false, true) => GameState::Normal,
    }
}
