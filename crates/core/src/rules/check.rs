//! Check and checkmate detection

use crate::board::{Color, Snapshot};
use crate::error::Result;

use super::movegen::{self, CheckFilter};

/// Whether `color`'s king is attacked.
///
/// Runs the move generator with the self-check filter disabled: the filter is
/// built on this very predicate, and recursing into it here would wrongly
/// pre-filter the enemy's capturing moves by a check test that is still being
/// answered.
pub fn is_in_check(snap: &Snapshot, color: Color) -> Result<bool> {
    let king_sq = snap.king_square(color)?;
    let attackers: Vec<_> = snap
        .pieces()
        .filter(|p| p.color != color)
        .map(|p| p.square)
        .collect();
    for from in attackers {
        if movegen::can_capture(snap, from, king_sq, CheckFilter::Disabled)? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Whether `color` has no legal move at all.
///
/// Stalemate-shaped positions also report `true` here; a caller that needs to
/// tell checkmate from stalemate additionally consults [`is_in_check`].
pub fn is_in_checkmate(snap: &Snapshot, color: Color) -> Result<bool> {
    let own: Vec<_> = snap
        .pieces()
        .filter(|p| p.color == color)
        .map(|p| p.square)
        .collect();
    for from in own {
        if !movegen::moves_for(snap, from, CheckFilter::Enabled)?.is_empty() {
            return Ok(false);
        }
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{PieceKind, Square};

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_initial_position_is_quiet() {
        let snap = Snapshot::initial();
        assert!(!is_in_check(&snap, Color::White).unwrap());
        assert!(!is_in_check(&snap, Color::Black).unwrap());
        assert!(!is_in_checkmate(&snap, Color::White).unwrap());
    }

    #[test]
    fn test_rook_gives_check() {
        let mut snap = Snapshot::empty();
        snap.spawn(PieceKind::King, Color::White, sq("e1"));
        snap.spawn(PieceKind::King, Color::Black, sq("a8"));
        snap.spawn(PieceKind::Rook, Color::Black, sq("e8"));
        assert!(is_in_check(&snap, Color::White).unwrap());
        assert!(!is_in_check(&snap, Color::Black).unwrap());
        assert!(!is_in_checkmate(&snap, Color::White).unwrap());
    }

    #[test]
    fn test_back_rank_checkmate() {
        // Queen on b7 protected by the king on b6: mate.
        let mut snap = Snapshot::empty();
        snap.spawn(PieceKind::King, Color::Black, sq("a8"));
        snap.spawn(PieceKind::Queen, Color::White, sq("b7"));
        snap.spawn(PieceKind::King, Color::White, sq("b6"));
        assert!(is_in_check(&snap, Color::Black).unwrap());
        assert!(is_in_checkmate(&snap, Color::Black).unwrap());
    }

    #[test]
    fn test_stalemate_shape() {
        // Same corner, queen a knight's bend away: no check, but no legal
        // move either. The two predicates stay independently meaningful.
        let mut snap = Snapshot::empty();
        snap.spawn(PieceKind::King, Color::Black, sq("a8"));
        snap.spawn(PieceKind::Queen, Color::White, sq("c7"));
        snap.spawn(PieceKind::King, Color::White, sq("b6"));

        assert!(!is_in_check(&snap, Color::Black).unwrap());
        assert!(is_in_checkmate(&snap, Color::Black).unwrap());
    }

    #[test]
    fn test_missing_king_is_corrupt() {
        let mut snap = Snapshot::empty();
        snap.spawn(PieceKind::Rook, Color::White, sq("a1"));
        assert!(is_in_check(&snap, Color::White).is_err());
    }
}
