//! Algebraic notation → move descriptor

use crate::board::{Color, PieceKind, Snapshot, Square};
use crate::error::{Error, Result};
use crate::rules::{movegen, Castle, CastleSide, CheckFilter, Move};

/// Resolves `note` against `snap` for the side `color`, returning the origin
/// square and the move it describes.
///
/// Failure (no matching piece, ambiguous match, malformed text) is a
/// user-facing error: the caller reports it and mutates nothing.
pub fn notation_as_move(note: &str, color: Color, snap: &Snapshot) -> Result<(Square, Move)> {
    // Check and mate markers do not affect move identity.
    let stripped: String = note.chars().filter(|c| *c != '+' && *c != '#').collect();

    if stripped == "0-0" {
        return Ok(castle_move(color, CastleSide::King));
    }
    if stripped == "0-0-0" {
        return Ok(castle_move(color, CastleSide::Queen));
    }

    let (body, promotion) = match stripped.split_once('=') {
        Some((body, suffix)) => {
            let kind = suffix
                .chars()
                .next()
                .and_then(PieceKind::from_abbr)
                .ok_or_else(|| Error::notation(note, "unknown promotion piece"))?;
            (body.to_string(), Some(kind))
        }
        None => (stripped, None),
    };

    let body: String = body.chars().filter(|c| *c != 'x').collect();
    if !body.is_ascii() {
        return Err(Error::notation(note, "unrecognized characters"));
    }

    let mut rest = body.as_str();
    let kind = match rest.chars().next().and_then(PieceKind::from_abbr) {
        Some(kind) => {
            rest = &rest[1..];
            kind
        }
        None => PieceKind::Pawn,
    };

    if rest.len() < 2 {
        return Err(Error::notation(note, "missing destination square"));
    }
    let (disambig, dest) = rest.split_at(rest.len() - 2);
    let to: Square = dest
        .parse()
        .map_err(|_| Error::notation(note, "bad destination square"))?;

    // A lone disambiguator may be either a file letter or a rank digit
    // ("Rad1" as well as "R1a4"); the character itself says which.
    let mut disambig_file: Option<char> = None;
    let mut disambig_rank: Option<char> = None;
    for c in disambig.chars() {
        match c {
            'a'..='h' => disambig_file = Some(c),
            '1'..='8' => disambig_rank = Some(c),
            _ => return Err(Error::notation(note, "unrecognized characters")),
        }
    }

    let mut resolved: Option<(Square, Move)> = None;
    for piece in snap.pieces() {
        if piece.color != color || piece.kind != kind {
            continue;
        }
        if disambig_file.is_some_and(|f| piece.square.file_char() != f) {
            continue;
        }
        if disambig_rank.is_some_and(|r| piece.square.rank_char() != r) {
            continue;
        }
        let candidate = movegen::moves_for(snap, piece.square, CheckFilter::Enabled)?
            .into_iter()
            .find(|m| m.to == to);
        if let Some(mut mv) = candidate {
            if resolved.is_some() {
                return Err(Error::notation(note, "ambiguous move"));
            }
            mv.promote_to = promotion;
            resolved = Some((piece.square, mv));
        }
    }

    resolved.ok_or_else(|| Error::notation(note, "no matching piece"))
}

/// Castle notation maps directly to the king's fixed destinations for the
/// color; the rook origin rides along for the applicator.
fn castle_move(color: Color, side: CastleSide) -> (Square, Move) {
    let rank = color.home_rank();
    let king_from = Square::new(4, rank).unwrap();
    let (to_file, rook_file) = match side {
        CastleSide::King => (6, 7),
        CastleSide::Queen => (2, 0),
    };
    let mv = Move {
        castle: Some(Castle {
            side,
            rook_from: Square::new(rook_file, rank).unwrap(),
        }),
        ..Move::plain(Square::new(to_file, rank).unwrap())
    };
    (king_from, mv)
}
