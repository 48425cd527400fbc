//! Chess piece representation and the geometric movement predicate.

use crate::{Color, Square};

/// The six kinds of chess pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PieceKind {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl PieceKind {
    /// All piece kinds in order.
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Returns the FEN character for this kind with the given color.
    pub const fn to_fen_char(self, color: Color) -> char {
        let c = match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        match color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    /// Parses a FEN character into a piece kind and color.
    pub const fn from_fen_char(c: char) -> Option<(PieceKind, Color)> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let kind = match c.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return None,
        };
        Some((kind, color))
    }

    /// Returns true if this is a sliding piece (bishop, rook, or queen),
    /// whose moves require a clear path.
    #[inline]
    pub const fn is_slider(self) -> bool {
        matches!(self, PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen)
    }
}

impl std::fmt::Display for PieceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PieceKind::Pawn => "Pawn",
            PieceKind::Knight => "Knight",
            PieceKind::Bishop => "Bishop",
            PieceKind::Rook => "Rook",
            PieceKind::Queen => "Queen",
            PieceKind::King => "King",
        };
        write!(f, "{}", name)
    }
}

/// A piece on the board: its kind, its owner, and whether it has moved.
///
/// A board square holds `Option<Piece>`; emptiness is never modeled as a
/// piece. The has-moved flag matters for pawns (first-move double step)
/// and is tracked for rooks and kings as castling bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub has_moved: bool,
}

impl Piece {
    /// Creates a piece that has not moved yet.
    #[inline]
    pub const fn new(kind: PieceKind, color: Color) -> Self {
        Piece {
            kind,
            color,
            has_moved: false,
        }
    }

    /// Returns true if moving from `from` to `to` matches this piece's
    /// movement shape, ignoring board occupancy.
    ///
    /// For pawns the forward diagonals are shape-legal; whether a capture
    /// (regular or en passant) actually backs them up is the validator's
    /// concern. The king's two-file castling shape is not accepted here.
    pub fn shape_allows(&self, from: Square, to: Square) -> bool {
        let drow = to.row() as i8 - from.row() as i8;
        let dcol = to.col() as i8 - from.col() as i8;
        if drow == 0 && dcol == 0 {
            return false;
        }
        match self.kind {
            PieceKind::Pawn => {
                let fwd = self.color.forward();
                if dcol == 0 {
                    drow == fwd || (!self.has_moved && drow == 2 * fwd)
                } else {
                    dcol.abs() == 1 && drow == fwd
                }
            }
            PieceKind::Knight => {
                (dcol.abs() == 1 && drow.abs() == 2) || (dcol.abs() == 2 && drow.abs() == 1)
            }
            PieceKind::Bishop => dcol.abs() == drow.abs(),
            PieceKind::Rook => (dcol == 0) != (drow == 0),
            PieceKind::Queen => dcol.abs() == drow.abs() || ((dcol == 0) != (drow == 0)),
            PieceKind::King => dcol.abs().max(drow.abs()) == 1,
        }
    }
}
