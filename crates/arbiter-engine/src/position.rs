//! Chess position representation.

use arbiter_core::{Color, FenError, FenRecord, Piece, PieceKind, Square};

/// Castling rights flags.
///
/// A set flag only means the right has not been forfeited yet; whether a
/// castling move is actually playable is a separate concern this engine
/// does not implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const WHITE_KINGSIDE: u8 = 0b0001;
    pub const WHITE_QUEENSIDE: u8 = 0b0010;
    pub const BLACK_KINGSIDE: u8 = 0b0100;
    pub const BLACK_QUEENSIDE: u8 = 0b1000;
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    /// Creates new castling rights from flags.
    #[inline]
    pub const fn new(flags: u8) -> Self {
        CastlingRights(flags & 0b1111)
    }

    /// Returns true if the given side may still castle kingside.
    #[inline]
    pub const fn can_castle_kingside(self, color: Color) -> bool {
        let flag = match color {
            Color::White => Self::WHITE_KINGSIDE,
            Color::Black => Self::BLACK_KINGSIDE,
        };
        (self.0 & flag) != 0
    }

    /// Returns true if the given side may still castle queenside.
    #[inline]
    pub const fn can_castle_queenside(self, color: Color) -> bool {
        let flag = match color {
            Color::White => Self::WHITE_QUEENSIDE,
            Color::Black => Self::BLACK_QUEENSIDE,
        };
        (self.0 & flag) != 0
    }

    /// Returns true if no rights remain.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns the raw flags.
    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

/// Complete chess position state.
///
/// The grid holds `Option<Piece>` per square with row 0 as the top rank
/// (rank 8). The position is a plain value: cloning it yields an
/// independent board, which is how the validator tests hypothetical moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    /// The 8x8 grid, indexed `[row][col]`.
    squares: [[Option<Piece>; 8]; 8],

    /// The side to move.
    pub side_to_move: Color,

    /// Castling rights.
    pub castling: CastlingRights,

    /// En passant target square, present for exactly one half-move after
    /// a pawn double step.
    pub en_passant: Option<Square>,

    /// Halfmove clock, tracked for the 50-move rule but not enforced.
    pub halfmove_clock: u32,

    /// Fullmove number (starts at 1, increments after Black's move).
    pub fullmove_number: u32,
}

impl Position {
    /// Creates an empty position.
    pub fn empty() -> Self {
        Position {
            squares: [[None; 8]; 8],
            side_to_move: Color::White,
            castling: CastlingRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Creates the standard starting position.
    pub fn startpos() -> Self {
        Self::from_fen(FenRecord::STARTPOS).expect("STARTPOS is valid")
    }

    /// Creates a position from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let record = FenRecord::parse(fen)?;
        let mut position = Position::empty();

        // FEN lists rank 8 first, which is row 0 here, so ranks map onto
        // rows directly.
        for (row, rank_str) in record.piece_placement.split('/').enumerate() {
            let mut col = 0u8;
            for c in rank_str.chars() {
                if let Some(run) = c.to_digit(10) {
                    col += run as u8;
                } else if let Some((kind, color)) = PieceKind::from_fen_char(c) {
                    if let Some(sq) = Square::new(row as u8, col) {
                        position.place(sq, decoded_piece(kind, color, sq));
                    }
                    col += 1;
                }
            }
        }

        position.side_to_move = match record.active_color {
            'w' => Color::White,
            'b' => Color::Black,
            _ => unreachable!("FEN record validated this"),
        };

        let mut castling = 0u8;
        for c in record.castling.chars() {
            match c {
                'K' => castling |= CastlingRights::WHITE_KINGSIDE,
                'Q' => castling |= CastlingRights::WHITE_QUEENSIDE,
                'k' => castling |= CastlingRights::BLACK_KINGSIDE,
                'q' => castling |= CastlingRights::BLACK_QUEENSIDE,
                _ => {}
            }
        }
        position.castling = CastlingRights::new(castling);

        position.en_passant = if record.en_passant == "-" {
            None
        } else {
            Square::from_algebraic(&record.en_passant)
        };

        position.halfmove_clock = record.halfmove_clock;
        position.fullmove_number = record.fullmove_number;

        Ok(position)
    }

    /// Converts the position to a FEN string.
    pub fn to_fen(&self) -> String {
        let mut fen = String::new();

        for row in 0..8u8 {
            let mut empty_run = 0;
            for col in 0..8u8 {
                match self.squares[row as usize][col as usize] {
                    Some(piece) => {
                        if empty_run > 0 {
                            fen.push_str(&empty_run.to_string());
                            empty_run = 0;
                        }
                        fen.push(piece.kind.to_fen_char(piece.color));
                    }
                    None => empty_run += 1,
                }
            }
            if empty_run > 0 {
                fen.push_str(&empty_run.to_string());
            }
            if row < 7 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });

        fen.push(' ');
        if self.castling.is_empty() {
            fen.push('-');
        } else {
            if self.castling.can_castle_kingside(Color::White) {
                fen.push('K');
            }
            if self.castling.can_castle_queenside(Color::White) {
                fen.push('Q');
            }
            if self.castling.can_castle_kingside(Color::Black) {
                fen.push('k');
            }
            if self.castling.can_castle_queenside(Color::Black) {
                fen.push('q');
            }
        }

        fen.push(' ');
        match self.en_passant {
            Some(sq) => fen.push_str(&sq.to_algebraic()),
            None => fen.push('-'),
        }

        fen.push(' ');
        fen.push_str(&self.halfmove_clock.to_string());
        fen.push(' ');
        fen.push_str(&self.fullmove_number.to_string());

        fen
    }

    /// Returns the piece at the given square, if any.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.row() as usize][sq.col() as usize]
    }

    /// Places a piece on a square, replacing any prior occupant.
    #[inline]
    pub fn place(&mut self, sq: Square, piece: Piece) {
        self.squares[sq.row() as usize][sq.col() as usize] = Some(piece);
    }

    /// Removes and returns the piece on a square.
    #[inline]
    pub fn take(&mut self, sq: Square) -> Option<Piece> {
        self.squares[sq.row() as usize][sq.col() as usize].take()
    }

    /// Iterates over all occupied squares.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| self.piece_at(sq).map(|p| (sq, p)))
    }

    /// Returns the square of the given color's king, if it is on the board.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces()
            .find(|(_, p)| p.kind == PieceKind::King && p.color == color)
            .map(|(sq, _)| sq)
    }

    /// Read-only view of the full grid, for rendering snapshots.
    #[inline]
    pub fn grid(&self) -> &[[Option<Piece>; 8]; 8] {
        &self.squares
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

/// Rebuilds a piece from its FEN character and square.
///
/// FEN carries no has-moved flag, so it is derived from placement: a pawn
/// off its starting row, or a rook/king off its home square, must have
/// moved. This keeps the double-step rule sound for positions loaded
/// mid-game.
fn decoded_piece(kind: PieceKind, color: Color, sq: Square) -> Piece {
    let at_home = match kind {
        PieceKind::Pawn => sq.row() == color.pawn_start_row(),
        PieceKind::King => sq.row() == color.back_row() && sq.col() == 4,
        PieceKind::Rook => sq.row() == color.back_row() && (sq.col() == 0 || sq.col() == 7),
        _ => true,
    };
    Piece {
        kind,
        color,
        has_moved: !at_home,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn startpos_fen_roundtrip() {
        let pos = Position::startpos();
        assert_eq!(pos.to_fen(), FenRecord::STARTPOS);
    }

    #[test]
    fn custom_fen_roundtrip() {
        let fen = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3";
        let pos = Position::from_fen(fen).unwrap();
        assert_eq!(pos.to_fen(), fen);
    }

    #[test]
    fn startpos_layout() {
        let pos = Position::startpos();
        assert_eq!(pos.pieces().count(), 32);
        assert_eq!(
            pos.pieces().filter(|(_, p)| p.color == Color::White).count(),
            16
        );
        assert_eq!(
            pos.pieces().filter(|(_, p)| p.color == Color::Black).count(),
            16
        );

        let king = pos.piece_at(sq("e1")).unwrap();
        assert_eq!(king.kind, PieceKind::King);
        assert_eq!(king.color, Color::White);
        let king = pos.piece_at(sq("e8")).unwrap();
        assert_eq!(king.kind, PieceKind::King);
        assert_eq!(king.color, Color::Black);
        assert_eq!(pos.piece_at(sq("e4")), None);

        for col in 0..8 {
            let white = pos.piece_at(Square::new(6, col).unwrap()).unwrap();
            assert_eq!((white.kind, white.color), (PieceKind::Pawn, Color::White));
            let black = pos.piece_at(Square::new(1, col).unwrap()).unwrap();
            assert_eq!((black.kind, black.color), (PieceKind::Pawn, Color::Black));
        }
    }

    #[test]
    fn king_square() {
        let pos = Position::startpos();
        assert_eq!(pos.king_square(Color::White), Some(sq("e1")));
        assert_eq!(pos.king_square(Color::Black), Some(sq("e8")));

        let empty = Position::empty();
        assert_eq!(empty.king_square(Color::White), None);
    }

    #[test]
    fn place_and_take() {
        let mut pos = Position::empty();
        let rook = Piece::new(PieceKind::Rook, Color::White);
        pos.place(sq("d4"), rook);
        assert_eq!(pos.piece_at(sq("d4")), Some(rook));
        assert_eq!(pos.take(sq("d4")), Some(rook));
        assert_eq!(pos.piece_at(sq("d4")), None);
        assert_eq!(pos.take(sq("d4")), None);
    }

    #[test]
    fn castling_rights_flags() {
        let rights = CastlingRights::ALL;
        assert!(rights.can_castle_kingside(Color::White));
        assert!(rights.can_castle_queenside(Color::White));
        assert!(rights.can_castle_kingside(Color::Black));
        assert!(rights.can_castle_queenside(Color::Black));

        let partial = CastlingRights::new(
            CastlingRights::WHITE_KINGSIDE | CastlingRights::BLACK_QUEENSIDE,
        );
        assert!(partial.can_castle_kingside(Color::White));
        assert!(!partial.can_castle_queenside(Color::White));
        assert!(!partial.can_castle_kingside(Color::Black));
        assert!(partial.can_castle_queenside(Color::Black));

        assert!(CastlingRights::NONE.is_empty());
        assert_eq!(CastlingRights::NONE.raw(), 0);
    }

    #[test]
    fn castling_fen_fields() {
        let fen = "r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w - - 0 1";
        let pos = Position::from_fen(fen).unwrap();
        assert!(pos.castling.is_empty());
        assert_eq!(pos.to_fen(), fen);

        let fen = "r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R b Kq - 4 12";
        let pos = Position::from_fen(fen).unwrap();
        assert!(pos.castling.can_castle_kingside(Color::White));
        assert!(!pos.castling.can_castle_queenside(Color::White));
        assert!(pos.castling.can_castle_queenside(Color::Black));
        assert_eq!(pos.to_fen(), fen);
    }

    #[test]
    fn en_passant_field() {
        let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
        let pos = Position::from_fen(fen).unwrap();
        assert_eq!(pos.en_passant, Some(sq("e3")));
        assert_eq!(pos.to_fen(), fen);
    }

    #[test]
    fn black_to_move() {
        let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1";
        let pos = Position::from_fen(fen).unwrap();
        assert_eq!(pos.side_to_move, Color::Black);
    }

    #[test]
    fn decoded_has_moved() {
        // White pawn on e4 must have moved; pawns on their start row have not.
        let pos =
            Position::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1")
                .unwrap();
        assert!(pos.piece_at(sq("e4")).unwrap().has_moved);
        assert!(!pos.piece_at(sq("d2")).unwrap().has_moved);
        assert!(!pos.piece_at(sq("e7")).unwrap().has_moved);

        // Rooks and kings off their home squares re-decode as moved.
        let pos = Position::from_fen("8/8/8/3rk3/8/8/8/R3K3 w Q - 0 1").unwrap();
        assert!(!pos.piece_at(sq("a1")).unwrap().has_moved);
        assert!(!pos.piece_at(sq("e1")).unwrap().has_moved);
        assert!(pos.piece_at(sq("d5")).unwrap().has_moved);
        assert!(pos.piece_at(sq("e5")).unwrap().has_moved);
    }

    #[test]
    fn position_empty() {
        let pos = Position::empty();
        assert_eq!(pos.side_to_move, Color::White);
        assert!(pos.castling.is_empty());
        assert_eq!(pos.en_passant, None);
        assert_eq!(pos.halfmove_clock, 0);
        assert_eq!(pos.fullmove_number, 1);
        assert_eq!(pos.pieces().count(), 0);
    }

    #[test]
    fn position_default() {
        let pos = Position::default();
        assert_eq!(pos.to_fen(), FenRecord::STARTPOS);
    }

    #[test]
    fn decode_encode_decode_identity() {
        // For any position reached through decoding, encoding and
        // decoding again reproduces it exactly, has-moved flags included.
        let fens = [
            FenRecord::STARTPOS,
            "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3",
            "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3",
            "7k/5Q2/6K1/8/8/8/8/8 b - - 0 1",
        ];
        for fen in fens {
            let decoded = Position::from_fen(fen).unwrap();
            assert_eq!(Position::from_fen(&decoded.to_fen()).unwrap(), decoded);
        }
    }

    fn arb_piece() -> impl Strategy<Value = (PieceKind, Color)> {
        (0usize..6, any::<bool>()).prop_map(|(k, white)| {
            (
                PieceKind::ALL[k],
                if white { Color::White } else { Color::Black },
            )
        })
    }

    proptest! {
        // Encoding any reachable position and decoding it again is
        // lossless at the FEN level.
        #[test]
        fn fen_roundtrip_property(
            placements in proptest::collection::vec((0u8..64, arb_piece()), 0..24),
            black_to_move in any::<bool>(),
            castling_bits in 0u8..16,
            ep_index in proptest::option::of(0u8..64),
            halfmove in 0u32..200,
            fullmove in 1u32..300,
        ) {
            let mut position = Position::empty();
            for (index, (kind, color)) in placements {
                let square = Square::from_index(index).unwrap();
                position.place(square, Piece::new(kind, color));
            }
            if black_to_move {
                position.side_to_move = Color::Black;
            }
            position.castling = CastlingRights::new(castling_bits);
            position.en_passant = ep_index.and_then(Square::from_index);
            position.halfmove_clock = halfmove;
            position.fullmove_number = fullmove;

            let fen = position.to_fen();
            let decoded = Position::from_fen(&fen).unwrap();
            prop_assert_eq!(decoded.to_fen(), fen);
        }
    }
}
