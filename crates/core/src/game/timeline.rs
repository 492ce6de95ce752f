//! The move timeline: snapshots plus the move log

use crate::board::{Color, PieceKind, Snapshot, Square};
use crate::error::{Error, Result};
use crate::notation;
use crate::rules::{apply, movegen::Move};

/// Ordered snapshots and the notation strings that produced them.
/// `snapshots[0]` is the standard initial position and
/// `snapshots.len() == moves.len() + 1` always holds. Playing from a point
/// earlier than the end truncates both sequences first: branches are
/// discarded, not retained.
#[derive(Debug)]
pub struct Timeline {
    snapshots: Vec<Snapshot>,
    moves: Vec<String>,
    /// Start/end squares of the move that produced each snapshot, for
    /// renderers that highlight the last move. Aligned with `snapshots`;
    /// entry 0 is `None`.
    highlights: Vec<Option<(Square, Square)>>,
}

/// Result of starting a move: either it fully applied, or it is a promoting
/// pawn move waiting on a piece choice.
#[derive(Debug)]
pub enum PlayOutcome {
    Applied(usize),
    PendingPromotion(PendingPromotion),
}

/// A provisionally-applied promotion move. The pawn has already been
/// relocated (and any capture made) on the held board; supplying a kind via
/// [`Timeline::complete_promotion`] finishes the move.
#[derive(Debug)]
pub struct PendingPromotion {
    cursor: usize,
    start: Square,
    mv: Move,
    before: Snapshot,
    board: Snapshot,
}

impl PendingPromotion {
    pub fn destination(&self) -> Square {
        self.mv.to
    }

    pub fn color(&self) -> Color {
        Timeline::mover_at(self.cursor)
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Timeline::new_game()
    }
}

impl Timeline {
    /// A fresh game: the single initial snapshot and no moves.
    pub fn new_game() -> Self {
        Timeline {
            snapshots: vec![Snapshot::initial()],
            moves: Vec::new(),
            highlights: vec![None],
        }
    }

    /// Replays a stored move list from the initial position. Only notation
    /// strings are ever persisted, so this is how a loaded game becomes live
    /// snapshots again.
    pub fn rebuild(moves: &[String]) -> Result<Self> {
        let mut timeline = Timeline::new_game();
        for note in moves {
            let cursor = timeline.tip();
            match timeline.play_notation_at(cursor, note)? {
                PlayOutcome::Applied(_) => {}
                PlayOutcome::PendingPromotion(_) => {
                    // A stored promotion must carry its "=Kind" suffix; there
                    // is nobody to ask during a replay.
                    return Err(Error::MalformedGame(format!(
                        "stored move '{note}' promotes without naming a piece"
                    )));
                }
            }
        }
        Ok(timeline)
    }

    /// Index of the latest snapshot.
    pub fn tip(&self) -> usize {
        self.snapshots.len() - 1
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn snapshot(&self, idx: usize) -> Option<&Snapshot> {
        self.snapshots.get(idx)
    }

    pub fn moves(&self) -> &[String] {
        &self.moves
    }

    pub fn highlight(&self, idx: usize) -> Option<(Square, Square)> {
        self.highlights.get(idx).copied().flatten()
    }

    /// Whose move it is at snapshot `cursor`: White at even indices.
    pub fn mover_at(cursor: usize) -> Color {
        if cursor % 2 == 0 {
            Color::White
        } else {
            Color::Black
        }
    }

    /// Plays `mv` from `start` at snapshot `cursor`. History past the cursor
    /// is clipped before anything is applied. The move itself is trusted to
    /// have come from the generator or the decoder.
    pub fn play_at(&mut self, cursor: usize, start: Square, mv: Move) -> Result<PlayOutcome> {
        let mover = Timeline::mover_at(cursor);
        let before = self
            .snapshots
            .get(cursor)
            .ok_or(Error::InvalidCursor(cursor))?;
        let piece = before.piece_at(start).ok_or(Error::NoPieceAt(start))?;
        if piece.color != mover {
            return Err(Error::IllegalMove(format!(
                "it is not {}'s turn",
                piece.color.as_str()
            )));
        }

        self.snapshots.truncate(cursor + 1);
        self.moves.truncate(cursor);
        self.highlights.truncate(cursor + 1);

        let before = &self.snapshots[cursor];
        let mut board = before.duplicate();
        apply::apply_move(&mut board, start, &mv);

        if mv.is_promotion && mv.promote_to.is_none() {
            let before = before.duplicate();
            return Ok(PlayOutcome::PendingPromotion(PendingPromotion {
                cursor,
                start,
                mv,
                before,
                board,
            }));
        }

        let note = notation::move_as_notation(start, &mv, before, &board)?;
        self.push_step(board, note, start, mv.to);
        Ok(PlayOutcome::Applied(cursor + 1))
    }

    /// Decodes `note` against the snapshot at `cursor` and plays it.
    pub fn play_notation_at(&mut self, cursor: usize, note: &str) -> Result<PlayOutcome> {
        let snap = self
            .snapshots
            .get(cursor)
            .ok_or(Error::InvalidCursor(cursor))?;
        let (start, mv) = notation::notation_as_move(note, Timeline::mover_at(cursor), snap)?;
        self.play_at(cursor, start, mv)
    }

    /// Finishes a pending promotion with the chosen kind.
    pub fn complete_promotion(
        &mut self,
        pending: PendingPromotion,
        kind: PieceKind,
    ) -> Result<usize> {
        if matches!(kind, PieceKind::Pawn | PieceKind::King) {
            return Err(Error::IllegalMove(format!(
                "cannot promote to a {}",
                kind.name()
            )));
        }
        // The timeline was clipped when the move began; anything else having
        // moved the tip since is a serialization bug upstream.
        if pending.cursor != self.tip() {
            return Err(Error::InvalidCursor(pending.cursor));
        }

        let PendingPromotion {
            cursor,
            start,
            mut mv,
            before,
            mut board,
        } = pending;

        apply::promote(&mut board, mv.to, kind);
        mv.promote_to = Some(kind);
        let note = notation::move_as_notation(start, &mv, &before, &board)?;
        self.push_step(board, note, start, mv.to);
        Ok(cursor + 1)
    }

    fn push_step(&mut self, board: Snapshot, note: String, start: Square, end: Square) {
        self.snapshots.push(board);
        self.moves.push(note);
        self.highlights.push(Some((start, end)));
        debug_assert_eq!(self.snapshots.len(), self.moves.len() + 1);
    }
}
