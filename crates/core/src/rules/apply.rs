//! Move application

use crate::board::{Piece, PieceKind, Snapshot, Square};

use super::movegen::{CastleSide, Move};

/// Realizes a validated move on `snap`, in place. Pure mutation: legality is
/// the generator's job and is trusted here.
///
/// A castle marker triggers a secondary, non-capturing application that
/// relocates the rook next to the king; the secondary move never carries a
/// marker itself, so the recursion is exactly one level deep.
///
/// # Panics
///
/// Panics if `from` is empty. That is a caller bug, and failing loudly beats
/// silently producing a corrupt snapshot.
pub fn apply_move(snap: &mut Snapshot, from: Square, mv: &Move) {
    if let Some(capture) = mv.capture {
        snap.remove(capture);
    }

    let mut piece = snap
        .remove(from)
        .unwrap_or_else(|| panic!("apply_move: no piece at {from}"));
    piece.relocate(mv.to);
    snap.place(piece);

    if let Some(castle) = mv.castle {
        let rook_to = match castle.side {
            CastleSide::King => mv.to.offset(-1, 0),
            CastleSide::Queen => mv.to.offset(1, 0),
        }
        .expect("rook landing square is on the board");
        apply_move(snap, castle.rook_from, &Move::plain(rook_to));
    }

    if mv.is_promotion {
        // Without a concrete kind the pawn stays put: the move is pending
        // until the choice arrives and `promote` finishes it.
        if let Some(kind) = mv.promote_to {
            promote(snap, mv.to, kind);
        }
    }
}

/// Replaces the pawn at `square` with a piece of `kind`, same color. The move
/// counter carries over: the piece has visibly moved to get here.
///
/// # Panics
///
/// Panics if `square` is empty.
pub fn promote(snap: &mut Snapshot, square: Square, kind: PieceKind) {
    let pawn = snap
        .remove(square)
        .unwrap_or_else(|| panic!("promote: no piece at {square}"));
    let mut piece = Piece::new(kind, pawn.color, square);
    piece.move_count = pawn.move_count;
    snap.place(piece);
}
