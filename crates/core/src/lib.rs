//! Chessboard Core Library

pub mod board;
pub mod error;
pub mod feed;
pub mod game;
pub mod notation;
pub mod rules;
pub mod search;
pub mod storage;

pub use board::{Color, Piece, PieceKind, Snapshot, Square};
pub use error::{Error, Result};
pub use game::{Game, GameData, PlayStatus, Timeline};
pub use storage::Database;

use rules::CheckFilter;

/// Basic position information
#[derive(Debug)]
pub struct PositionInfo {
    pub piece_count: u32,
    pub legal_move_count: u32,
    pub side_to_move: Color,
    pub is_check: bool,
    pub is_checkmate: bool,
}

/// Summarizes a position for the side to move.
pub fn analyze_position(snap: &Snapshot, side_to_move: Color) -> Result<PositionInfo> {
    let piece_count = snap.len() as u32;
    let mut legal_move_count = 0;
    for piece in snap.pieces().filter(|p| p.color == side_to_move) {
        legal_move_count += rules::moves_for(snap, piece.square, CheckFilter::Enabled)?.len() as u32;
    }
    let is_check = rules::is_in_check(snap, side_to_move)?;
    let is_checkmate = rules::is_in_checkmate(snap, side_to_move)?;

    Ok(PositionInfo {
        piece_count,
        legal_move_count,
        side_to_move,
        is_check,
        is_checkmate,
    })
}

/// Creates the standard starting position
pub fn starting_position() -> Snapshot {
    Snapshot::initial()
}
