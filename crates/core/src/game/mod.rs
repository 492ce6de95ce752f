//! The game aggregate: timeline, metadata, and the read cursor

mod data;
mod timeline;

pub use data::{decode_share, encode_share, GameData};
pub use timeline::{PendingPromotion, PlayOutcome, Timeline};

use chrono::{DateTime, Utc};

use crate::board::{Color, PieceKind, Snapshot, Square};
use crate::error::{Error, Result};
use crate::rules::{moves_for, CheckFilter};
use crate::search;

/// What happened to a play request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayStatus {
    Moved,
    /// A pawn reached the last rank without a promotion kind; the game is
    /// suspended until [`Game::complete_promotion`] supplies one.
    PromotionPending,
}

/// One game in play: the timeline, its save metadata, and a read cursor over
/// the snapshots. Rewinding moves the cursor without deleting history; a new
/// move from a rewound cursor clips the abandoned branch.
#[derive(Debug, Default)]
pub struct Game {
    name: String,
    timestamp: Option<DateTime<Utc>>,
    timeline: Timeline,
    cursor: usize,
    pending: Option<PendingPromotion>,
}

impl Game {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores a game from its durable form by replaying the move list.
    /// Malformed data is refused before any state is built.
    pub fn load(data: GameData) -> Result<Game> {
        data.validate()?;
        let timeline = Timeline::rebuild(&data.moves)?;
        let cursor = timeline.tip();
        Ok(Game {
            name: data.name,
            timestamp: data.timestamp,
            timeline,
            cursor,
            pending: None,
        })
    }

    /// Builds a game from a bare move list (the share-link path).
    pub fn from_moves(moves: &[String]) -> Result<Game> {
        let timeline = Timeline::rebuild(moves)?;
        let cursor = timeline.tip();
        Ok(Game {
            timeline,
            cursor,
            ..Game::default()
        })
    }

    /// The durable form, stamped with the current time. Called at save time.
    pub fn save_data(&mut self, name: &str) -> GameData {
        self.name = name.to_string();
        self.timestamp = Some(Utc::now());
        GameData {
            name: self.name.clone(),
            timestamp: self.timestamp,
            moves: self.timeline.moves().to_vec(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The snapshot under the cursor.
    pub fn current(&self) -> &Snapshot {
        self.timeline
            .snapshot(self.cursor)
            .expect("cursor always points at a snapshot")
    }

    pub fn mover(&self) -> Color {
        Timeline::mover_at(self.cursor)
    }

    pub fn promotion_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The suspended promotion move, when one is waiting on a piece choice.
    pub fn pending(&self) -> Option<&PendingPromotion> {
        self.pending.as_ref()
    }

    /// Moves the read cursor. Refused while a promotion hangs.
    pub fn set_cursor(&mut self, idx: usize) -> Result<()> {
        if self.pending.is_some() {
            return Err(Error::PromotionPending);
        }
        if idx > self.timeline.tip() {
            return Err(Error::InvalidCursor(idx));
        }
        self.cursor = idx;
        Ok(())
    }

    /// Plays a move given in algebraic notation at the cursor.
    pub fn play_notation(&mut self, note: &str) -> Result<PlayStatus> {
        if self.pending.is_some() {
            return Err(Error::PromotionPending);
        }
        let outcome = self.timeline.play_notation_at(self.cursor, note)?;
        Ok(self.absorb(outcome))
    }

    /// Plays the move from `from` to `to`, resolving it through the
    /// generator (the board-click path).
    pub fn play_squares(&mut self, from: Square, to: Square) -> Result<PlayStatus> {
        if self.pending.is_some() {
            return Err(Error::PromotionPending);
        }
        let mv = moves_for(self.current(), from, CheckFilter::Enabled)?
            .into_iter()
            .find(|m| m.to == to)
            .ok_or_else(|| Error::IllegalMove(format!("{from} cannot reach {to}")))?;
        let outcome = self.timeline.play_at(self.cursor, from, mv)?;
        Ok(self.absorb(outcome))
    }

    fn absorb(&mut self, outcome: PlayOutcome) -> PlayStatus {
        match outcome {
            PlayOutcome::Applied(cursor) => {
                self.cursor = cursor;
                PlayStatus::Moved
            }
            PlayOutcome::PendingPromotion(pending) => {
                self.pending = Some(pending);
                PlayStatus::PromotionPending
            }
        }
    }

    /// Finishes the hanging promotion with the chosen kind. A refused kind
    /// leaves the choice open for another try.
    pub fn complete_promotion(&mut self, kind: PieceKind) -> Result<()> {
        if self.pending.is_none() {
            return Err(Error::NoPendingPromotion);
        }
        if matches!(kind, PieceKind::Pawn | PieceKind::King) {
            return Err(Error::IllegalMove(format!(
                "cannot promote to a {}",
                kind.name()
            )));
        }
        let pending = self.pending.take().expect("checked above");
        self.cursor = self.timeline.complete_promotion(pending, kind)?;
        Ok(())
    }

    /// Runs the heuristic search for the side to move and applies its pick.
    /// Returns the chosen notation. Errs with [`Error::GameOver`] when the
    /// mover has no legal move.
    pub fn auto_play(&mut self) -> Result<String> {
        if self.pending.is_some() {
            return Err(Error::PromotionPending);
        }
        let note = search::choose_move(self.current(), self.mover())?;
        self.play_notation(&note)?;
        Ok(note)
    }
}
