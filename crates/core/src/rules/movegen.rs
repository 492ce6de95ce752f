//! Per-piece legal move enumeration

use crate::board::{Color, Piece, PieceKind, Snapshot, Square};
use crate::error::{Error, Result};

use super::{apply, check};

/// Whether generated moves are filtered against leaving the mover's own king
/// in check. Check detection itself runs with the filter disabled, since the
/// filter is built on check detection; threading this as a parameter (rather
/// than a mutable flag on shared state) keeps the recursion explicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckFilter {
    Enabled,
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastleSide {
    King,
    Queen,
}

/// Castling marker carried by a king move: the applicator relocates the rook
/// at `rook_from` in the same application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Castle {
    pub side: CastleSide,
    pub rook_from: Square,
}

/// A move descriptor. `capture` is usually the destination, but for en
/// passant it is the captured pawn's square, which the destination is not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    pub to: Square,
    pub capture: Option<Square>,
    /// The move lands a pawn on the farthest rank.
    pub is_promotion: bool,
    /// Concrete replacement kind; `None` on a promoting move means the
    /// choice is still pending.
    pub promote_to: Option<PieceKind>,
    pub castle: Option<Castle>,
}

impl Move {
    /// A plain relocation with no capture, promotion, or castle.
    pub fn plain(to: Square) -> Self {
        Move {
            to,
            capture: None,
            is_promotion: false,
            promote_to: None,
            castle: None,
        }
    }

    pub fn capturing(to: Square, capture: Square) -> Self {
        Move {
            capture: Some(capture),
            ..Move::plain(to)
        }
    }
}

const ROOK_DIRS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

const BISHOP_DIRS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

const QUEEN_DIRS: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (2, 1),
    (-2, 1),
    (1, 2),
    (-1, 2),
    (2, -1),
    (-2, -1),
    (1, -2),
    (-1, -2),
];

/// Enumerates the squares the piece at `from` can move to.
///
/// Requesting moves for an empty square is a caller contract violation and is
/// rejected up front, never conflated with "no legal moves".
pub fn moves_for(snap: &Snapshot, from: Square, filter: CheckFilter) -> Result<Vec<Move>> {
    let piece = snap.piece_at(from).ok_or(Error::NoPieceAt(from))?;

    let mut moves = match piece.kind {
        PieceKind::Pawn => pawn_moves(snap, piece),
        PieceKind::Rook => line_moves(snap, piece, &ROOK_DIRS),
        PieceKind::Knight => knight_moves(snap, piece),
        PieceKind::Bishop => line_moves(snap, piece, &BISHOP_DIRS),
        PieceKind::Queen => line_moves(snap, piece, &QUEEN_DIRS),
        PieceKind::King => king_moves(snap, piece, filter)?,
    };

    if piece.kind == PieceKind::Pawn {
        let promotion_rank = piece.color.promotion_rank();
        for mv in &mut moves {
            if mv.to.rank() == promotion_rank {
                mv.is_promotion = true;
            }
        }
    }

    if filter == CheckFilter::Enabled {
        let mut kept = Vec::with_capacity(moves.len());
        for mv in moves {
            if !move_causes_own_check(snap, from, &mv, piece.color)? {
                kept.push(mv);
            }
        }
        return Ok(kept);
    }
    Ok(moves)
}

/// Convenience predicate: can the piece at `from` capture on `target`?
/// Capture-reachability is the primitive check detection is built on, so the
/// caller controls the filter.
pub fn can_capture(snap: &Snapshot, from: Square, target: Square, filter: CheckFilter) -> Result<bool> {
    let moves = moves_for(snap, from, filter)?;
    Ok(moves.iter().any(|mv| mv.capture == Some(target)))
}

fn move_causes_own_check(snap: &Snapshot, from: Square, mv: &Move, color: Color) -> Result<bool> {
    let mut probe = snap.duplicate();
    apply::apply_move(&mut probe, from, mv);
    check::is_in_check(&probe, color)
}

/// Walk each direction until the board edge or a blocking piece; an enemy
/// blocker is included as a capture, a friendly one is not.
fn line_moves(snap: &Snapshot, piece: &Piece, dirs: &[(i8, i8)]) -> Vec<Move> {
    let mut moves = Vec::new();
    for &(file_step, rank_step) in dirs {
        let mut cursor = piece.square;
        while let Some(next) = cursor.offset(file_step, rank_step) {
            match snap.piece_at(next) {
                None => moves.push(Move::plain(next)),
                Some(occupant) => {
                    if occupant.color != piece.color {
                        moves.push(Move::capturing(next, next));
                    }
                    break;
                }
            }
            cursor = next;
        }
    }
    moves
}

fn knight_moves(snap: &Snapshot, piece: &Piece) -> Vec<Move> {
    KNIGHT_DELTAS
        .iter()
        .filter_map(|&(df, dr)| piece.square.offset(df, dr))
        .filter_map(|to| match snap.piece_at(to) {
            None => Some(Move::plain(to)),
            Some(occupant) if occupant.color != piece.color => Some(Move::capturing(to, to)),
            Some(_) => None,
        })
        .collect()
}

fn pawn_moves(snap: &Snapshot, piece: &Piece) -> Vec<Move> {
    let mut moves = Vec::new();
    let dir = piece.color.forward();
    let from = piece.square;

    let one_up = from.offset(0, dir);
    if let Some(one_up) = one_up {
        if snap.piece_at(one_up).is_none() {
            moves.push(Move::plain(one_up));

            // Double step only from the un-moved state, through empty squares.
            if !piece.has_moved() {
                if let Some(two_up) = from.offset(0, dir * 2) {
                    if snap.piece_at(two_up).is_none() {
                        moves.push(Move::plain(two_up));
                    }
                }
            }
        }
    }

    for side in [-1i8, 1] {
        if let Some(diag) = from.offset(side, dir) {
            if let Some(occupant) = snap.piece_at(diag) {
                if occupant.color != piece.color {
                    moves.push(Move::capturing(diag, diag));
                }
            } else if let Some(lateral) = from.offset(side, 0) {
                // En passant: the capture square is the passed pawn's square,
                // not the destination.
                if let Some(neighbor) = snap.piece_at(lateral) {
                    if neighbor.color != piece.color && neighbor.en_passantable {
                        moves.push(Move::capturing(diag, lateral));
                    }
                }
            }
        }
    }

    moves
}

fn king_moves(snap: &Snapshot, piece: &Piece, filter: CheckFilter) -> Result<Vec<Move>> {
    let mut moves: Vec<Move> = QUEEN_DIRS
        .iter()
        .filter_map(|&(df, dr)| piece.square.offset(df, dr))
        .filter_map(|to| match snap.piece_at(to) {
            None => Some(Move::plain(to)),
            Some(occupant) if occupant.color != piece.color => Some(Move::capturing(to, to)),
            Some(_) => None,
        })
        .collect();

    // Castling can never capture, so attack probing (filter disabled) skips
    // it entirely; that also breaks the recursion between the two kings'
    // move generation.
    if filter == CheckFilter::Enabled {
        moves.extend(castle_moves(snap, piece)?);
    }

    Ok(moves)
}

fn castle_moves(snap: &Snapshot, king: &Piece) -> Result<Vec<Move>> {
    let mut moves = Vec::new();
    if king.has_moved() || check::is_in_check(snap, king.color)? {
        return Ok(moves);
    }

    let rooks: Vec<Square> = snap
        .pieces()
        .filter(|p| {
            p.kind == PieceKind::Rook
                && p.color == king.color
                && !p.has_moved()
                && p.square.rank() == king.square.rank()
        })
        .map(|p| p.square)
        .collect();

    for rook_from in rooks {
        let side = if rook_from.file() > king.square.file() {
            CastleSide::King
        } else {
            CastleSide::Queen
        };
        let step: i8 = match side {
            CastleSide::King => 1,
            CastleSide::Queen => -1,
        };

        if !between_empty(snap, king.square, rook_from) {
            continue;
        }

        // The king steps two squares toward the rook; neither traversed
        // square (final square included) may be attacked.
        let path = [king.square.offset(step, 0), king.square.offset(step * 2, 0)];
        let (Some(through), Some(dest)) = (path[0], path[1]) else {
            continue;
        };
        if king_attacked_at(snap, king.square, through)? || king_attacked_at(snap, king.square, dest)? {
            continue;
        }

        moves.push(Move {
            to: dest,
            capture: None,
            is_promotion: false,
            promote_to: None,
            castle: Some(Castle { side, rook_from }),
        });
    }

    Ok(moves)
}

fn between_empty(snap: &Snapshot, a: Square, b: Square) -> bool {
    let step = if b.file() > a.file() { 1 } else { -1 };
    let mut cursor = a;
    while let Some(next) = cursor.offset(step, 0) {
        if next == b {
            return true;
        }
        if snap.piece_at(next).is_some() {
            return false;
        }
        cursor = next;
    }
    false
}

/// Simulates the king standing on `target` and asks whether it would be in
/// check there.
fn king_attacked_at(snap: &Snapshot, king_sq: Square, target: Square) -> Result<bool> {
    let mut probe = snap.duplicate();
    apply::apply_move(&mut probe, king_sq, &Move::plain(target));
    check::is_in_check(&probe, probe.piece_at(target).map(|p| p.color).ok_or_else(|| {
        Error::CorruptPosition("king vanished during castle probe".to_string())
    })?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn destinations(snap: &Snapshot, from: &str) -> Vec<String> {
        let mut dests: Vec<String> = moves_for(snap, sq(from), CheckFilter::Enabled)
            .unwrap()
            .into_iter()
            .map(|m| m.to.to_string())
            .collect();
        dests.sort();
        dests
    }

    #[test]
    fn test_empty_square_is_an_error() {
        let snap = Snapshot::initial();
        assert!(matches!(
            moves_for(&snap, sq("e4"), CheckFilter::Enabled),
            Err(Error::NoPieceAt(_))
        ));
    }

    #[test]
    fn test_initial_pawn_moves() {
        let snap = Snapshot::initial();
        assert_eq!(destinations(&snap, "e2"), vec!["e3", "e4"]);
    }

    #[test]
    fn test_pawn_double_step_requires_unmoved() {
        let mut snap = Snapshot::empty();
        snap.spawn(PieceKind::King, Color::White, sq("e1"));
        snap.spawn(PieceKind::King, Color::Black, sq("e8"));
        snap.spawn(PieceKind::Pawn, Color::White, sq("c2"));
        let mut pawn = snap.remove(sq("c2")).unwrap();
        pawn.relocate(sq("c3"));
        snap.place(pawn);
        let snap = snap.duplicate();
        assert_eq!(destinations(&snap, "c3"), vec!["c4"]);
    }

    #[test]
    fn test_pawn_blocked() {
        let mut snap = Snapshot::empty();
        snap.spawn(PieceKind::King, Color::White, sq("a1"));
        snap.spawn(PieceKind::King, Color::Black, sq("h8"));
        snap.spawn(PieceKind::Pawn, Color::White, sq("e2"));
        snap.spawn(PieceKind::Knight, Color::Black, sq("e3"));
        // Blocked dead ahead, but the knight's neighbors are capturable.
        snap.spawn(PieceKind::Knight, Color::Black, sq("d3"));
        snap.spawn(PieceKind::Knight, Color::Black, sq("f3"));
        assert_eq!(destinations(&snap, "e2"), vec!["d3", "f3"]);
    }

    #[test]
    fn test_initial_knight_moves() {
        let snap = Snapshot::initial();
        assert_eq!(destinations(&snap, "g1"), vec!["f3", "h3"]);
    }

    #[test]
    fn test_slider_stops_at_blockers() {
        let mut snap = Snapshot::empty();
        snap.spawn(PieceKind::King, Color::White, sq("h1"));
        snap.spawn(PieceKind::King, Color::Black, sq("h8"));
        snap.spawn(PieceKind::Rook, Color::White, sq("a1"));
        snap.spawn(PieceKind::Pawn, Color::White, sq("a4"));
        snap.spawn(PieceKind::Pawn, Color::Black, sq("d1"));

        let moves = moves_for(&snap, sq("a1"), CheckFilter::Enabled).unwrap();
        let dests: Vec<String> = moves.iter().map(|m| m.to.to_string()).collect();
        // Up the a-file until the friendly pawn, along rank 1 up to and
        // including the enemy pawn.
        assert!(dests.contains(&"a2".to_string()));
        assert!(dests.contains(&"a3".to_string()));
        assert!(!dests.contains(&"a4".to_string()));
        assert!(dests.contains(&"d1".to_string()));
        assert!(!dests.contains(&"e1".to_string()));

        let capture = moves.iter().find(|m| m.to == sq("d1")).unwrap();
        assert_eq!(capture.capture, Some(sq("d1")));
    }

    #[test]
    fn test_pinned_piece_cannot_move() {
        let mut snap = Snapshot::empty();
        snap.spawn(PieceKind::King, Color::White, sq("e1"));
        snap.spawn(PieceKind::King, Color::Black, sq("e8"));
        snap.spawn(PieceKind::Bishop, Color::White, sq("e2"));
        snap.spawn(PieceKind::Rook, Color::Black, sq("e7"));

        // The bishop shields the king from the rook; any bishop move exposes
        // the king.
        let moves = moves_for(&snap, sq("e2"), CheckFilter::Enabled).unwrap();
        assert!(moves.is_empty());

        // With the filter disabled the bishop moves freely.
        let unfiltered = moves_for(&snap, sq("e2"), CheckFilter::Disabled).unwrap();
        assert!(!unfiltered.is_empty());
    }

    #[test]
    fn test_en_passant_window() {
        // Scenario: black pawn a7-a5, white pawn on b5 may capture en passant
        // landing on a6 and removing the pawn on a5.
        let mut snap = Snapshot::empty();
        snap.spawn(PieceKind::King, Color::White, sq("e1"));
        snap.spawn(PieceKind::King, Color::Black, sq("e8"));
        snap.spawn(PieceKind::Pawn, Color::White, sq("b5"));
        snap.spawn(PieceKind::Pawn, Color::Black, sq("a7"));

        let mut next = snap.duplicate();
        let mut pawn = next.remove(sq("a7")).unwrap();
        pawn.relocate(sq("a5"));
        next.place(pawn);

        let moves = moves_for(&next, sq("b5"), CheckFilter::Enabled).unwrap();
        let ep = moves.iter().find(|m| m.to == sq("a6")).expect("en passant");
        assert_eq!(ep.capture, Some(sq("a5")));

        // One ply later the flag is gone (duplicate clears it) and so is the
        // capture.
        let later = next.duplicate();
        let moves = moves_for(&later, sq("b5"), CheckFilter::Enabled).unwrap();
        assert!(moves.iter().all(|m| m.to != sq("a6")));
    }

    #[test]
    fn test_promotion_tagging() {
        let mut snap = Snapshot::empty();
        snap.spawn(PieceKind::King, Color::White, sq("a1"));
        snap.spawn(PieceKind::King, Color::Black, sq("h5"));
        snap.spawn(PieceKind::Pawn, Color::White, sq("e7"));
        snap.spawn(PieceKind::Rook, Color::Black, sq("f8"));

        let moves = moves_for(&snap, sq("e7"), CheckFilter::Enabled).unwrap();
        assert!(moves.iter().all(|m| m.is_promotion));
        assert!(moves.iter().any(|m| m.to == sq("e8")));
        assert!(moves.iter().any(|m| m.to == sq("f8") && m.capture == Some(sq("f8"))));
    }

    #[test]
    fn test_kingside_castle_available() {
        // Scenario: e1 king and h1 rook unmoved, f1/g1 empty and unattacked.
        let mut snap = Snapshot::empty();
        snap.spawn(PieceKind::King, Color::White, sq("e1"));
        snap.spawn(PieceKind::Rook, Color::White, sq("h1"));
        snap.spawn(PieceKind::King, Color::Black, sq("e8"));
        snap.spawn(PieceKind::Rook, Color::Black, sq("a8"));

        let moves = moves_for(&snap, sq("e1"), CheckFilter::Enabled).unwrap();
        let castle = moves.iter().find(|m| m.castle.is_some()).expect("castle");
        assert_eq!(castle.to, sq("g1"));
        let marker = castle.castle.unwrap();
        assert_eq!(marker.side, CastleSide::King);
        assert_eq!(marker.rook_from, sq("h1"));
    }

    #[test]
    fn test_castle_blocked_by_attack_on_path() {
        let mut snap = Snapshot::empty();
        snap.spawn(PieceKind::King, Color::White, sq("e1"));
        snap.spawn(PieceKind::Rook, Color::White, sq("h1"));
        snap.spawn(PieceKind::King, Color::Black, sq("e8"));
        snap.spawn(PieceKind::Rook, Color::Black, sq("f8"));

        // f1 is covered by the rook on f8.
        let moves = moves_for(&snap, sq("e1"), CheckFilter::Enabled).unwrap();
        assert!(moves.iter().all(|m| m.castle.is_none()));
    }

    #[test]
    fn test_castle_requires_unmoved_king() {
        let mut snap = Snapshot::empty();
        snap.spawn(PieceKind::King, Color::White, sq("e1"));
        snap.spawn(PieceKind::Rook, Color::White, sq("h1"));
        snap.spawn(PieceKind::King, Color::Black, sq("a8"));
        let mut king = snap.remove(sq("e1")).unwrap();
        king.relocate(sq("e2"));
        king.relocate(sq("e1"));
        snap.place(king);

        let moves = moves_for(&snap, sq("e1"), CheckFilter::Enabled).unwrap();
        assert!(moves.iter().all(|m| m.castle.is_none()));
    }

    #[test]
    fn test_queenside_castle() {
        let mut snap = Snapshot::empty();
        snap.spawn(PieceKind::King, Color::White, sq("e1"));
        snap.spawn(PieceKind::Rook, Color::White, sq("a1"));
        snap.spawn(PieceKind::King, Color::Black, sq("h8"));

        let moves = moves_for(&snap, sq("e1"), CheckFilter::Enabled).unwrap();
        let castle = moves.iter().find(|m| m.castle.is_some()).expect("castle");
        assert_eq!(castle.to, sq("c1"));
        assert_eq!(castle.castle.unwrap().side, CastleSide::Queen);
    }

    #[test]
    fn test_no_castle_while_in_check() {
        let mut snap = Snapshot::empty();
        snap.spawn(PieceKind::King, Color::White, sq("e1"));
        snap.spawn(PieceKind::Rook, Color::White, sq("h1"));
        snap.spawn(PieceKind::King, Color::Black, sq("a8"));
        snap.spawn(PieceKind::Rook, Color::Black, sq("e8"));

        let moves = moves_for(&snap, sq("e1"), CheckFilter::Enabled).unwrap();
        assert!(moves.iter().all(|m| m.castle.is_none()));
    }

    #[test]
    fn test_can_capture_sees_king() {
        let mut snap = Snapshot::empty();
        snap.spawn(PieceKind::King, Color::White, sq("e1"));
        snap.spawn(PieceKind::King, Color::Black, sq("e8"));
        snap.spawn(PieceKind::Rook, Color::Black, sq("e5"));
        assert!(can_capture(&snap, sq("e5"), sq("e1"), CheckFilter::Disabled).unwrap());
        assert!(!can_capture(&snap, sq("e5"), sq("a1"), CheckFilter::Disabled).unwrap());
    }
}
