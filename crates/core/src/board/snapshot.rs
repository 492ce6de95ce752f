//! Sparse board snapshots

use std::collections::BTreeMap;

use crate::error::{Error, Result};

use super::piece::{Color, Piece, PieceKind};
use super::square::Square;

/// A complete board position at one point in the game. Only occupied squares
/// are stored; at most one piece per square.
#[derive(Debug, Default)]
pub struct Snapshot {
    squares: BTreeMap<Square, Piece>,
}

impl Snapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The standard initial position.
    pub fn initial() -> Self {
        let mut snap = Self::empty();
        for file in 0..8u8 {
            snap.spawn(PieceKind::Pawn, Color::White, Square::new(file, 1).unwrap());
            snap.spawn(PieceKind::Pawn, Color::Black, Square::new(file, 6).unwrap());

            let kind = match file {
                0 | 7 => PieceKind::Rook,
                1 | 6 => PieceKind::Knight,
                2 | 5 => PieceKind::Bishop,
                3 => PieceKind::Queen,
                _ => PieceKind::King,
            };
            snap.spawn(kind, Color::White, Square::new(file, 0).unwrap());
            snap.spawn(kind, Color::Black, Square::new(file, 7).unwrap());
        }
        snap
    }

    /// Places a brand-new piece. Test scaffolding and initial setup.
    pub fn spawn(&mut self, kind: PieceKind, color: Color, square: Square) {
        self.place(Piece::new(kind, color, square));
    }

    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        self.squares.get(&square)
    }

    pub fn piece_at_mut(&mut self, square: Square) -> Option<&mut Piece> {
        self.squares.get_mut(&square)
    }

    /// Inserts `piece` keyed by its own square, replacing any occupant.
    pub fn place(&mut self, piece: Piece) {
        self.squares.insert(piece.square, piece);
    }

    pub fn remove(&mut self, square: Square) -> Option<Piece> {
        self.squares.remove(&square)
    }

    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.squares.values()
    }

    pub fn occupied_squares(&self) -> impl Iterator<Item = Square> + '_ {
        self.squares.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.squares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.squares.is_empty()
    }

    /// Structurally-equal, referentially-independent copy. Every piece is
    /// re-created via [`Piece::duplicate`], so transient en-passant flags are
    /// cleared. All simulation ("what if" probing) must run on a duplicate,
    /// never the live snapshot.
    pub fn duplicate(&self) -> Snapshot {
        Snapshot {
            squares: self
                .squares
                .iter()
                .map(|(sq, piece)| (*sq, piece.duplicate()))
                .collect(),
        }
    }

    /// Locates `color`'s king. A reachable snapshot has exactly one king per
    /// color; anything else is a corrupt position and is reported, not
    /// tolerated.
    pub fn king_square(&self, color: Color) -> Result<Square> {
        let mut kings = self
            .pieces()
            .filter(|p| p.kind == PieceKind::King && p.color == color);
        let first = kings.next().ok_or_else(|| {
            Error::CorruptPosition(format!("no {} king on the board", color.as_str()))
        })?;
        if kings.next().is_some() {
            return Err(Error::CorruptPosition(format!(
                "more than one {} king on the board",
                color.as_str()
            )));
        }
        Ok(first.square)
    }

    /// Total material value for one color.
    pub fn material(&self, color: Color) -> i32 {
        self.pieces()
            .filter(|p| p.color == color)
            .map(|p| p.kind.value())
            .sum()
    }

    /// How far ahead `pos_color` is on material.
    pub fn score_diff(&self, pos_color: Color) -> i32 {
        self.material(pos_color) - self.material(pos_color.opponent())
    }

    /// Deterministic string form of the position, used to deduplicate
    /// transpositions in the auto-play search. Per-piece move counts and the
    /// en-passant flag are part of the key, since two boards with the same
    /// placement can still differ on castling and en-passant rights.
    pub fn board_key(&self) -> String {
        let mut key = String::with_capacity(self.len() * 6);
        for (square, piece) in &self.squares {
            key.push_str(&square.to_string());
            key.push(match piece.color {
                Color::White => 'w',
                Color::Black => 'b',
            });
            key.push_str(piece.kind.abbr());
            key.push_str(&piece.move_count.to_string());
            if piece.en_passantable {
                key.push('*');
            }
        }
        key
    }
}
