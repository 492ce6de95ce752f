//! Per-square queries for renderers and assistive frontends

use crate::board::{Color, Piece, Snapshot, Square};
use crate::error::Result;
use crate::rules::{can_capture, is_in_check, is_in_checkmate, moves_for, CheckFilter};

/// Check and checkmate flags for both sides, for a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckStatus {
    pub white_in_check: bool,
    pub black_in_check: bool,
    pub white_checkmated: bool,
    pub black_checkmated: bool,
}

/// Everything a renderer wants to say about one square: the occupant, where
/// it may go, and which pieces of either side can reach or capture into the
/// square.
#[derive(Debug)]
pub struct SquareReport {
    pub occupant: Option<Piece>,
    /// Legal destinations of the occupant, split into quiet moves and
    /// captures. Both empty when the square is empty.
    pub moves: Vec<Square>,
    pub captures: Vec<Square>,
    /// King destinations reachable by castling, when the occupant is a king
    /// that still may.
    pub castles: Vec<Square>,
    /// Squares of White/Black pieces with a legal move ending here.
    pub movable_white: Vec<Square>,
    pub movable_black: Vec<Square>,
    /// Squares of pieces that could capture into this square, ignoring
    /// self-check (the threat picture, not the legal-move picture).
    pub threatened_by_white: Vec<Square>,
    pub threatened_by_black: Vec<Square>,
}

/// Squares of `color` pieces with a legal move ending on `target`.
pub fn movable_to(snap: &Snapshot, target: Square, color: Color) -> Result<Vec<Square>> {
    let mut sources = Vec::new();
    for piece in snap.pieces().filter(|p| p.color == color) {
        let moves = moves_for(snap, piece.square, CheckFilter::Enabled)?;
        if moves.iter().any(|m| m.to == target) {
            sources.push(piece.square);
        }
    }
    Ok(sources)
}

/// Squares of `color` pieces that could capture into `target`. Self-check is
/// ignored here; a pinned piece still projects a threat.
pub fn threatening(snap: &Snapshot, target: Square, color: Color) -> Result<Vec<Square>> {
    let mut sources = Vec::new();
    for piece in snap.pieces().filter(|p| p.color == color) {
        if can_capture(snap, piece.square, target, CheckFilter::Disabled)? {
            sources.push(piece.square);
        }
    }
    Ok(sources)
}

/// Legal destinations of the piece on `from`, split into quiet moves and
/// captures.
pub fn piece_paths(snap: &Snapshot, from: Square) -> Result<(Vec<Square>, Vec<Square>)> {
    let mut quiet = Vec::new();
    let mut capturing = Vec::new();
    for mv in moves_for(snap, from, CheckFilter::Enabled)? {
        if mv.capture.is_some() {
            capturing.push(mv.to);
        } else {
            quiet.push(mv.to);
        }
    }
    Ok((quiet, capturing))
}

/// Check and checkmate flags for both sides.
pub fn check_status(snap: &Snapshot) -> Result<CheckStatus> {
    Ok(CheckStatus {
        white_in_check: is_in_check(snap, Color::White)?,
        black_in_check: is_in_check(snap, Color::Black)?,
        white_checkmated: is_in_checkmate(snap, Color::White)?,
        black_checkmated: is_in_checkmate(snap, Color::Black)?,
    })
}

/// The full report for one square.
pub fn describe_square(snap: &Snapshot, square: Square) -> Result<SquareReport> {
    let occupant = snap.piece_at(square).map(Piece::duplicate);
    let (moves, captures, castles) = match occupant {
        Some(_) => {
            let (quiet, capturing) = piece_paths(snap, square)?;
            let castles = moves_for(snap, square, CheckFilter::Enabled)?
                .into_iter()
                .filter(|m| m.castle.is_some())
                .map(|m| m.to)
                .collect();
            (quiet, capturing, castles)
        }
        None => (Vec::new(), Vec::new(), Vec::new()),
    };
    Ok(SquareReport {
        occupant,
        moves,
        captures,
        castles,
        movable_white: movable_to(snap, square, Color::White)?,
        movable_black: movable_to(snap, square, Color::Black)?,
        threatened_by_white: threatening(snap, square, Color::White)?,
        threatened_by_black: threatening(snap, square, Color::Black)?,
    })
}
