//! Piece kinds, colors, and the piece value object

use serde::{Deserialize, Serialize};

use super::square::Square;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Rank direction this color's pawns advance in.
    pub fn forward(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Zero-based rank of this color's back rank.
    pub fn home_rank(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    /// Zero-based rank a pawn of this color promotes on.
    pub fn promotion_rank(self) -> u8 {
        self.opponent().home_rank()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Color::White => "white",
            Color::Black => "black",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

impl PieceKind {
    /// Algebraic-notation abbreviation. Pawns have none.
    pub fn abbr(self) -> &'static str {
        match self {
            PieceKind::Pawn => "",
            PieceKind::Rook => "R",
            PieceKind::Knight => "N",
            PieceKind::Bishop => "B",
            PieceKind::Queen => "Q",
            PieceKind::King => "K",
        }
    }

    /// Material value used by the auto-play scoring. The king is never
    /// tradable so it counts for nothing.
    pub fn value(self) -> i32 {
        match self {
            PieceKind::Pawn => 1,
            PieceKind::Knight => 3,
            PieceKind::Bishop => 3,
            PieceKind::Rook => 5,
            PieceKind::Queen => 9,
            PieceKind::King => 0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PieceKind::Pawn => "Pawn",
            PieceKind::Rook => "Rook",
            PieceKind::Knight => "Knight",
            PieceKind::Bishop => "Bishop",
            PieceKind::Queen => "Queen",
            PieceKind::King => "King",
        }
    }

    pub fn from_abbr(c: char) -> Option<PieceKind> {
        match c {
            'R' => Some(PieceKind::Rook),
            'N' => Some(PieceKind::Knight),
            'B' => Some(PieceKind::Bishop),
            'Q' => Some(PieceKind::Queen),
            'K' => Some(PieceKind::King),
            _ => None,
        }
    }
}

/// A piece on the board. Pieces are value objects: they carry no stable
/// identity and are re-created whenever a snapshot is duplicated.
#[derive(Debug, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub square: Square,
    pub start_square: Square,
    pub move_count: u32,
    /// Set on a pawn for the single ply after it double-steps; read by the
    /// move generator for en passant. Never survives a snapshot duplicate.
    pub en_passantable: bool,
}

impl Piece {
    pub fn new(kind: PieceKind, color: Color, square: Square) -> Self {
        Self {
            kind,
            color,
            square,
            start_square: square,
            move_count: 0,
            en_passantable: false,
        }
    }

    /// Deep value copy. The en-passant flag is deliberately not carried over:
    /// it is move-immediate state, valid only for the ply right after a
    /// double pawn step.
    pub fn duplicate(&self) -> Piece {
        Piece {
            kind: self.kind,
            color: self.color,
            square: self.square,
            start_square: self.start_square,
            move_count: self.move_count,
            en_passantable: false,
        }
    }

    /// Moves the piece to `to`, bumping its move counter. A pawn stepping two
    /// ranks becomes en-passant-able.
    pub fn relocate(&mut self, to: Square) {
        if self.kind == PieceKind::Pawn && (to.rank() as i8 - self.square.rank() as i8).abs() == 2 {
            self.en_passantable = true;
        }
        self.square = to;
        self.move_count += 1;
    }

    pub fn has_moved(&self) -> bool {
        self.move_count > 0
    }
}
