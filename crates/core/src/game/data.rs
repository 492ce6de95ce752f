//! The durable game representation and the share-link encoding

use chrono::{DateTime, Utc};
use percent_encoding::{percent_decode_str, utf8_percent_encode, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Separator between moves in a share code. Deliberately a character that
/// never appears in algebraic notation.
const SHARE_SEPARATOR: char = '^';

/// The only externally durable form of a game: a name, a save timestamp, and
/// the ordered algebraic move list. Snapshots are always rebuilt from the
/// moves on load. Field names keep the historical PascalCase save format.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GameData {
    #[serde(default)]
    pub name: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub moves: Vec<String>,
}

impl GameData {
    /// A load is refused unless the data carries both a timestamp and a move
    /// list; the caller's in-memory game is left untouched on refusal.
    pub fn validate(&self) -> Result<()> {
        if self.timestamp.is_none() {
            return Err(Error::MalformedGame("missing Timestamp".to_string()));
        }
        Ok(())
    }

    pub fn share_code(&self) -> String {
        encode_share(&self.moves)
    }
}

/// Joins the move list with [`SHARE_SEPARATOR`] and percent-encodes it for
/// embedding in a link.
pub fn encode_share(moves: &[String]) -> String {
    let joined = moves.join(&SHARE_SEPARATOR.to_string());
    utf8_percent_encode(&joined, NON_ALPHANUMERIC).to_string()
}

/// Reverses [`encode_share`].
pub fn decode_share(code: &str) -> Result<Vec<String>> {
    let decoded = percent_decode_str(code)
        .decode_utf8()
        .map_err(|e| Error::MalformedGame(format!("share code is not UTF-8: {e}")))?;
    Ok(decoded
        .split(SHARE_SEPARATOR)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect())
}
