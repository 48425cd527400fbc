//! Chess position and legality engine.
//!
//! This crate owns board state and decides what is allowed to happen to
//! it:
//! - [`Position`] - the 8x8 grid plus side to move, castling rights,
//!   en-passant window, and move counters, convertible to and from FEN
//! - [`rules`] - move legality validation and attack queries
//! - [`evaluate`] / [`GameState`] - check, checkmate, and stalemate
//!   detection
//! - [`Game`] - the turn state machine and the boundary consumed by
//!   input and rendering collaborators
//!
//! # Example
//!
//! ```
//! use arbiter_engine::{Game, GameState};
//!
//! let mut game = Game::new();
//! // e2 is (row 6, col 4); e4 is (row 4, col 4).
//! let state = game.attempt_move((6, 4), (4, 4)).unwrap();
//! assert_eq!(state, GameState::Normal);
//! println!("{}", game.to_fen());
//! ```

mod game;
mod position;
pub mod rules;
mod state;

pub use game::{BoardSnapshot, Game, MoveError};
pub use position::{CastlingRights, Position};
pub use rules::{is_king_attacked, is_legal, is_square_attacked, make_move};
pub use state::{evaluate, has_any_legal_move, GameState};
