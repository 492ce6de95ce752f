//! Board model: squares, pieces, and position snapshots

mod piece;
mod snapshot;
mod square;

pub use piece::{Color, Piece, PieceKind};
pub use snapshot::Snapshot;
pub use square::Square;
