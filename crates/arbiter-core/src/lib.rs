//! Core types for the chess arbiter.
//!
//! This crate provides the fundamental types used across the engine:
//! - [`PieceKind`], [`Piece`], and [`Color`] for piece representation,
//!   including the geometric movement predicate
//! - [`Square`] for board coordinates
//! - [`Move`] for move representation
//! - FEN field parsing and serialization

mod color;
mod fen;
mod mov;
mod piece;
mod square;

pub use color::Color;
pub use fen::{FenError, FenRecord};
pub use mov::Move;
pub use piece::{Piece, PieceKind};
pub use square::Square;
