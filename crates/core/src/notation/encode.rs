//! Move descriptor → algebraic notation

use crate::board::{PieceKind, Snapshot, Square};
use crate::error::{Error, Result};
use crate::rules::{check, movegen, CastleSide, CheckFilter, Move};

/// Encodes the move from `start` as algebraic notation, given the snapshots
/// before and after it was applied (the latter is needed for the check and
/// mate suffixes).
pub fn move_as_notation(
    start: Square,
    mv: &Move,
    before: &Snapshot,
    after: &Snapshot,
) -> Result<String> {
    if let Some(castle) = mv.castle {
        return Ok(match castle.side {
            CastleSide::King => "0-0".to_string(),
            CastleSide::Queen => "0-0-0".to_string(),
        });
    }

    let mover = before.piece_at(start).ok_or(Error::NoPieceAt(start))?;
    let opponent = mover.color.opponent();

    let causes_mate = check::is_in_checkmate(after, opponent)?;
    // The mate suffix always wins over the check suffix.
    let causes_check = !causes_mate && check::is_in_check(after, opponent)?;

    // Pawn moves carry their origin file in the capture marker (and quiet
    // pushes identify the origin by the destination file alone), so the
    // rival scan applies to the other kinds only.
    let disambiguator = if mover.kind == PieceKind::Pawn {
        String::new()
    } else {
        disambiguate(before, start, mv.to, mover.kind)?
    };

    let capture_part = if mv.capture.is_some() {
        if mover.kind == PieceKind::Pawn {
            format!("{}x", start.file_char())
        } else {
            "x".to_string()
        }
    } else {
        String::new()
    };

    let promotion_part = match mv.promote_to {
        Some(kind) if mv.is_promotion => format!("={}", kind.abbr()),
        _ => String::new(),
    };

    Ok(format!(
        "{}{}{}{}{}{}",
        mover.kind.abbr(),
        disambiguator,
        capture_part,
        mv.to,
        promotion_part,
        if causes_mate {
            "#"
        } else if causes_check {
            "+"
        } else {
            ""
        },
    ))
}

/// Extra origin information when two or more friendly pieces of the same kind
/// could legally reach the destination: file letter if unique, else rank
/// digit, else the full origin square.
fn disambiguate(before: &Snapshot, start: Square, to: Square, kind: PieceKind) -> Result<String> {
    let mover = before.piece_at(start).ok_or(Error::NoPieceAt(start))?;

    let mut rivals: Vec<Square> = Vec::new();
    for piece in before.pieces() {
        if piece.color != mover.color || piece.kind != kind || piece.square == start {
            continue;
        }
        let reaches = movegen::moves_for(before, piece.square, CheckFilter::Enabled)?
            .iter()
            .any(|m| m.to == to);
        if reaches {
            rivals.push(piece.square);
        }
    }

    if rivals.is_empty() {
        return Ok(String::new());
    }
    if rivals.iter().all(|r| r.file() != start.file()) {
        return Ok(start.file_char().to_string());
    }
    if rivals.iter().all(|r| r.rank() != start.rank()) {
        return Ok(start.rank_char().to_string());
    }
    Ok(start.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Color;
    use crate::rules::{apply_move, Castle};

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn encode(before: &Snapshot, start: &str, mv: Move) -> String {
        let mut after = before.duplicate();
        apply_move(&mut after, sq(start), &mv);
        move_as_notation(sq(start), &mv, before, &after).unwrap()
    }

    #[test]
    fn test_pawn_push() {
        let before = Snapshot::initial();
        assert_eq!(encode(&before, "e2", Move::plain(sq("e4"))), "e4");
    }

    #[test]
    fn test_knight_move() {
        let before = Snapshot::initial();
        assert_eq!(encode(&before, "g1", Move::plain(sq("f3"))), "Nf3");
    }

    #[test]
    fn test_pawn_capture_includes_file() {
        let mut before = Snapshot::empty();
        before.spawn(PieceKind::King, Color::White, sq("e1"));
        before.spawn(PieceKind::King, Color::Black, sq("e8"));
        before.spawn(PieceKind::Pawn, Color::White, sq("e4"));
        before.spawn(PieceKind::Pawn, Color::Black, sq("d5"));
        assert_eq!(
            encode(&before, "e4", Move::capturing(sq("d5"), sq("d5"))),
            "exd5"
        );
    }

    #[test]
    fn test_rival_pawn_capture_keeps_single_file() {
        // Both the c- and e-pawn can take on d5; the capture file is the
        // whole disambiguation, never doubled.
        let mut before = Snapshot::empty();
        before.spawn(PieceKind::King, Color::White, sq("e1"));
        before.spawn(PieceKind::King, Color::Black, sq("e8"));
        before.spawn(PieceKind::Pawn, Color::White, sq("c4"));
        before.spawn(PieceKind::Pawn, Color::White, sq("e4"));
        before.spawn(PieceKind::Pawn, Color::Black, sq("d5"));
        assert_eq!(
            encode(&before, "c4", Move::capturing(sq("d5"), sq("d5"))),
            "cxd5"
        );
        assert_eq!(
            encode(&before, "e4", Move::capturing(sq("d5"), sq("d5"))),
            "exd5"
        );
    }

    #[test]
    fn test_piece_capture() {
        let mut before = Snapshot::empty();
        before.spawn(PieceKind::King, Color::White, sq("e1"));
        before.spawn(PieceKind::King, Color::Black, sq("h8"));
        before.spawn(PieceKind::Bishop, Color::White, sq("c3"));
        before.spawn(PieceKind::Knight, Color::Black, sq("f6"));
        assert_eq!(
            encode(&before, "c3", Move::capturing(sq("f6"), sq("f6"))),
            "Bxf6"
        );
    }

    #[test]
    fn test_file_disambiguation() {
        let mut before = Snapshot::empty();
        before.spawn(PieceKind::King, Color::White, sq("e2"));
        before.spawn(PieceKind::King, Color::Black, sq("h8"));
        before.spawn(PieceKind::Rook, Color::White, sq("a1"));
        before.spawn(PieceKind::Rook, Color::White, sq("f1"));
        assert_eq!(encode(&before, "a1", Move::plain(sq("d1"))), "Rad1");
    }

    #[test]
    fn test_rank_disambiguation() {
        let mut before = Snapshot::empty();
        before.spawn(PieceKind::King, Color::White, sq("b4"));
        before.spawn(PieceKind::King, Color::Black, sq("h4"));
        before.spawn(PieceKind::Rook, Color::White, sq("a1"));
        before.spawn(PieceKind::Rook, Color::White, sq("a7"));
        assert_eq!(encode(&before, "a1", Move::plain(sq("a4"))), "R1a4");
    }

    #[test]
    fn test_castle_notation() {
        let mut before = Snapshot::empty();
        before.spawn(PieceKind::King, Color::White, sq("e1"));
        before.spawn(PieceKind::Rook, Color::White, sq("h1"));
        before.spawn(PieceKind::King, Color::Black, sq("a8"));
        let mv = Move {
            castle: Some(Castle {
                side: CastleSide::King,
                rook_from: sq("h1"),
            }),
            ..Move::plain(sq("g1"))
        };
        assert_eq!(encode(&before, "e1", mv), "0-0");
    }

    #[test]
    fn test_check_suffix() {
        let mut before = Snapshot::empty();
        before.spawn(PieceKind::King, Color::White, sq("e1"));
        before.spawn(PieceKind::King, Color::Black, sq("a8"));
        before.spawn(PieceKind::Rook, Color::White, sq("h7"));
        // Rook to a7: check from the side, king escapes to b8.
        assert_eq!(encode(&before, "h7", Move::plain(sq("a7"))), "Ra7+");
    }

    #[test]
    fn test_mate_suffix_wins() {
        let mut before = Snapshot::empty();
        before.spawn(PieceKind::King, Color::Black, sq("a8"));
        before.spawn(PieceKind::King, Color::White, sq("b6"));
        before.spawn(PieceKind::Queen, Color::White, sq("h7"));
        // Qb7 is mate, so "#" and never "+#".
        assert_eq!(encode(&before, "h7", Move::plain(sq("b7"))), "Qb7#");
    }

    #[test]
    fn test_promotion_suffix() {
        let mut before = Snapshot::empty();
        before.spawn(PieceKind::King, Color::White, sq("a1"));
        before.spawn(PieceKind::King, Color::Black, sq("h4"));
        before.spawn(PieceKind::Pawn, Color::White, sq("e7"));
        let mv = Move {
            is_promotion: true,
            promote_to: Some(PieceKind::Queen),
            ..Move::plain(sq("e8"))
        };
        assert_eq!(encode(&before, "e7", mv), "e8=Q");
    }
}
