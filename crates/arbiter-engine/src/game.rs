//! Turn control and the engine boundary used by input and rendering.
//!
//! [`Game`] is the single place where turns change hands: it applies a
//! validated move, recomputes the en-passant window and clocks as part of
//! the same step, flips the side to move, and reports the resulting
//! [`GameState`]. The input layer drives it exclusively through
//! [`Game::attempt_move`]; the rendering layer reads
//! [`Game::snapshot`] and is poked through the render hook.

use std::fmt;

use arbiter_core::{FenError, Move, Piece, Square};
use thiserror::Error;

use crate::rules;
use crate::state::{evaluate, GameState};
use crate::Position;

/// Errors returned when a proposed move is rejected.
///
/// A rejected move leaves the position byte-for-byte unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("square is outside the board")]
    OutOfBounds,
    #[error("no piece on the source square")]
    NoPiece,
    #[error("piece belongs to the side not on move")]
    WrongTurn,
    #[error("move is not legal in this position")]
    IllegalMove,
    #[error("game is already over")]
    GameAlreadyOver,
}

/// A copy of the piece grid handed to the rendering layer.
pub type BoardSnapshot = [[Option<Piece>; 8]; 8];

/// The turn state machine.
///
/// Owns the [`Position`] exclusively; external collaborators only ever
/// see a consistent state between calls. Once the game reaches
/// [`GameState::Checkmate`] or [`GameState::Stalemate`], every further
/// move attempt is rejected with [`MoveError::GameAlreadyOver`].
pub struct Game {
    position: Position,
    state: GameState,
    render_hook: Option<Box<dyn FnMut()>>,
}

impl Game {
    /// Creates a new game from the standard starting position.
    pub fn new() -> Self {
        Self::from_position(Position::startpos())
    }

    /// Creates a game from a custom position, evaluating it immediately
    /// so that a loaded mate or stalemate is terminal from the start.
    pub fn from_position(position: Position) -> Self {
        let state = evaluate(&position);
        Game {
            position,
            state,
            render_hook: None,
        }
    }

    /// Creates a game from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Ok(Self::from_position(Position::from_fen(fen)?))
    }

    /// Returns a reference to the current position.
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Returns the current game state.
    pub fn state(&self) -> GameState {
        self.state
    }

    /// Returns true if the game has ended.
    pub fn is_game_over(&self) -> bool {
        self.state.is_terminal()
    }

    /// Returns true if the side to move is in check.
    pub fn is_check(&self) -> bool {
        rules::is_king_attacked(&self.position, self.position.side_to_move)
    }

    /// Returns the current position as a FEN string.
    pub fn to_fen(&self) -> String {
        self.position.to_fen()
    }

    /// Returns a copy of the piece grid for drawing.
    pub fn snapshot(&self) -> BoardSnapshot {
        *self.position.grid()
    }

    /// Installs the render-invalidation hook.
    ///
    /// The hook runs exactly once per successful move; rejected moves
    /// never fire it.
    pub fn set_render_hook(&mut self, hook: impl FnMut() + 'static) {
        self.render_hook = Some(Box::new(hook));
    }

    /// Entry point for the input layer: the pressed and released squares
    /// as raw (row, column) pairs.
    ///
    /// A finished game rejects everything; after that, coordinates
    /// outside the board are rejected before anything else is looked at.
    pub fn attempt_move(&mut self, from: (i32, i32), to: (i32, i32)) -> Result<GameState, MoveError> {
        if self.state.is_terminal() {
            return Err(MoveError::GameAlreadyOver);
        }
        let from = square_at(from)?;
        let to = square_at(to)?;
        self.apply_move(Move::new(from, to))
    }

    /// Applies a move if it is legal, returning the new game state.
    ///
    /// Rejections happen in a fixed order: terminal game, empty source
    /// square, wrong side's piece, and finally full legality. On success
    /// the position is replaced wholesale, so no partially-applied state
    /// is ever observable, and the render hook fires once.
    pub fn apply_move(&mut self, m: Move) -> Result<GameState, MoveError> {
        if self.state.is_terminal() {
            return Err(MoveError::GameAlreadyOver);
        }
        let piece = self.position.piece_at(m.from).ok_or(MoveError::NoPiece)?;
        if piece.color != self.position.side_to_move {
            return Err(MoveError::WrongTurn);
        }
        if !rules::is_legal(&self.position, m) {
            return Err(MoveError::IllegalMove);
        }

        self.position = rules::make_move(&self.position, m);
        self.state = evaluate(&self.position);

        if let Some(hook) = self.render_hook.as_mut() {
            hook();
        }

        Ok(self.state)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("position", &self.position)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

fn square_at((row, col): (i32, i32)) -> Result<Square, MoveError> {
    if !(0..8).contains(&row) || !(0..8).contains(&col) {
        return Err(MoveError::OutOfBounds);
    }
    Square::new(row as u8, col as u8).ok_or(MoveError::OutOfBounds)
}
