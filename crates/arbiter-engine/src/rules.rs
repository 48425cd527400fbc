//! Move legality validation.
//!
//! The validator answers two questions: whether a proposed move is legal
//! for the side to move ([`is_legal`]), and whether a square is attacked
//! by a given color ([`is_square_attacked`]). Both read the position
//! only; hypothetical-move testing happens on an owned clone that is
//! discarded before returning.

use arbiter_core::{Color, Move, Piece, PieceKind, Square};

use crate::Position;

/// Returns true if `m` is legal for the side to move.
///
/// Checks run in order and short-circuit on the first failure: a piece of
/// the moving side on the from-square, the piece's movement shape, no
/// own-color piece on the destination, pawn push/capture occupancy rules
/// (including en passant), path clearance for sliding pieces, and finally
/// that the move does not leave the mover's own king attacked.
pub fn is_legal(position: &Position, m: Move) -> bool {
    let piece = match position.piece_at(m.from) {
        Some(p) => p,
        None => return false,
    };
    if piece.color != position.side_to_move {
        return false;
    }
    if !piece.shape_allows(m.from, m.to) {
        return false;
    }
    if let Some(target) = position.piece_at(m.to) {
        if target.color == piece.color {
            return false;
        }
    }

    match piece.kind {
        PieceKind::Pawn => {
            if !pawn_move_allowed(position, piece, m) {
                return false;
            }
        }
        kind if kind.is_slider() => {
            if !path_clear(position, m.from, m.to) {
                return false;
            }
        }
        // Knights jump and kings move a single square; no path to check.
        _ => {}
    }

    !leaves_king_in_check(position, m)
}

/// Occupancy rules for a shape-legal pawn move.
fn pawn_move_allowed(position: &Position, pawn: Piece, m: Move) -> bool {
    if m.from.col() == m.to.col() {
        // A push never captures; the destination must be empty, and a
        // double step also needs the skipped square to be empty.
        if position.piece_at(m.to).is_some() {
            return false;
        }
        let drow = m.to.row() as i8 - m.from.row() as i8;
        if drow.abs() == 2 {
            match m.from.offset(pawn.color.forward(), 0) {
                Some(mid) if position.piece_at(mid).is_none() => true,
                _ => false,
            }
        } else {
            true
        }
    } else {
        // A diagonal step needs something to capture: an enemy piece on
        // the destination or a valid en-passant window.
        match position.piece_at(m.to) {
            Some(target) => target.color != pawn.color,
            None => is_en_passant_capture(position, pawn, m),
        }
    }
}

/// Returns true if `m` is a well-formed en-passant capture for `pawn`:
/// the destination is the current en-passant target, the displacement is
/// one forward diagonal, and an enemy pawn sits one row behind the target.
pub(crate) fn is_en_passant_capture(position: &Position, pawn: Piece, m: Move) -> bool {
    match position.en_passant {
        Some(target) if target == m.to => {}
        _ => return false,
    }

    let drow = m.to.row() as i8 - m.from.row() as i8;
    let dcol = m.to.col() as i8 - m.from.col() as i8;
    if drow != pawn.color.forward() || dcol.abs() != 1 {
        return false;
    }

    match en_passant_victim_square(pawn.color, m.to) {
        Some(victim) => matches!(
            position.piece_at(victim),
            Some(p) if p.kind == PieceKind::Pawn && p.color != pawn.color
        ),
        None => false,
    }
}

/// Square of the pawn captured en passant: one row behind the target,
/// relative to the capturing side's direction of travel.
pub(crate) fn en_passant_victim_square(capturer: Color, target: Square) -> Option<Square> {
    target.offset(-capturer.forward(), 0)
}

/// Returns true when every square strictly between `from` and `to` along
/// the unit direction vector is empty. The destination itself is not
/// inspected.
fn path_clear(position: &Position, from: Square, to: Square) -> bool {
    let drow = (to.row() as i8 - from.row() as i8).signum();
    let dcol = (to.col() as i8 - from.col() as i8).signum();

    let mut current = from;
    loop {
        current = match current.offset(drow, dcol) {
            Some(sq) => sq,
            None => return false,
        };
        if current == to {
            return true;
        }
        if position.piece_at(current).is_some() {
            return false;
        }
    }
}

/// Returns true if any piece of color `by` attacks `target`.
///
/// This is an attack query, not a move query: pawns count only their
/// forward diagonals, and the occupancy of `target` itself is ignored.
pub fn is_square_attacked(position: &Position, target: Square, by: Color) -> bool {
    position.pieces().any(|(from, piece)| {
        if piece.color != by || from == target {
            return false;
        }
        match piece.kind {
            PieceKind::Pawn => pawn_attacks(piece.color, from, target),
            PieceKind::Knight | PieceKind::King => piece.shape_allows(from, target),
            _ => piece.shape_allows(from, target) && path_clear(position, from, target),
        }
    })
}

/// Pawn attack pattern: one forward diagonal, never a push.
fn pawn_attacks(color: Color, from: Square, target: Square) -> bool {
    let drow = target.row() as i8 - from.row() as i8;
    let dcol = target.col() as i8 - from.col() as i8;
    drow == color.forward() && dcol.abs() == 1
}

/// Returns true if the king of the given color is attacked.
pub fn is_king_attacked(position: &Position, color: Color) -> bool {
    match position.king_square(color) {
        Some(king) => is_square_attacked(position, king, color.opposite()),
        // No king on the board: an invariant breach in the setup, not a
        // check. Only reachable through hand-built positions.
        None => false,
    }
}

/// Tests `m` on a discarded copy of the position.
fn leaves_king_in_check(position: &Position, m: Move) -> bool {
    let mover = position.side_to_move;
    let trial = make_move(position, m);
    is_king_attacked(&trial, mover)
}

/// Applies `m` to a copy of `position` and returns the result.
///
/// The move is applied mechanically, without legality checks; callers
/// validate first. Relocation, capture (including the en-passant victim),
/// has-moved marking, the en-passant window, both clocks, and the side to
/// move are all updated as one step.
///
/// # Panics
///
/// Panics if `m.from` is empty. [`is_legal`] rules that out beforehand.
pub fn make_move(position: &Position, m: Move) -> Position {
    let mut next = position.clone();
    let us = position.side_to_move;

    let mut piece = next.take(m.from).expect("no piece on the from-square");
    let is_pawn = piece.kind == PieceKind::Pawn;

    // A regular capture clears the destination; an en-passant capture
    // removes a pawn from a square the move itself never touches.
    let mut captured = next.take(m.to).is_some();
    if is_pawn && !captured && is_en_passant_capture(position, piece, m) {
        if let Some(victim) = en_passant_victim_square(piece.color, m.to) {
            captured = next.take(victim).is_some();
        }
    }

    if matches!(
        piece.kind,
        PieceKind::Pawn | PieceKind::Rook | PieceKind::King
    ) {
        piece.has_moved = true;
    }
    next.place(m.to, piece);

    // The double-step window lasts exactly one half-move; any other move
    // closes it.
    let drow = m.to.row() as i8 - m.from.row() as i8;
    next.en_passant = if is_pawn && drow.abs() == 2 {
        Square::new((m.from.row() + m.to.row()) / 2, m.from.col())
    } else {
        None
    };

    if is_pawn || captured {
        next.halfmove_clock = 0;
    } else {
        next.halfmove_clock += 1;
    }
    if us == Color::Black {
        next.fullmove_number += 1;
    }
    next.side_to_move = us.opposite();

    next
}
