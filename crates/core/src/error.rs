//! Error types for chessboard-core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid notation '{notation}': {reason}")]
    Notation { notation: String, reason: String },

    #[error("invalid square '{0}'")]
    InvalidSquare(String),

    #[error("no piece at {0}")]
    NoPieceAt(crate::board::Square),

    #[error("illegal move: {0}")]
    IllegalMove(String),

    #[error("snapshot index {0} out of range")]
    InvalidCursor(usize),

    #[error("a promotion choice is already pending")]
    PromotionPending,

    #[error("no promotion is pending")]
    NoPendingPromotion,

    #[error("game is over")]
    GameOver,

    #[error("corrupt position: {0}")]
    CorruptPosition(String),

    #[error("malformed game data: {0}")]
    MalformedGame(String),

    #[error("search failed: {0}")]
    Search(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn notation(notation: &str, reason: impl Into<String>) -> Self {
        Error::Notation {
            notation: notation.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
