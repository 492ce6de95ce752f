//! Files, ranks, and squares

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

pub const BOARD_SIZE: u8 = 8;

/// A board coordinate: file `a..h`, rank `1..8`.
///
/// Stored as zero-based indices; `file` 0 is the a-file, `rank` 0 is rank 1
/// (White's back rank). Delta arithmetic saturates to "off board" (`None`)
/// rather than wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Square {
    file: u8,
    rank: u8,
}

impl Square {
    pub fn new(file: u8, rank: u8) -> Option<Self> {
        if file < BOARD_SIZE && rank < BOARD_SIZE {
            Some(Self { file, rank })
        } else {
            None
        }
    }

    pub fn file(self) -> u8 {
        self.file
    }

    pub fn rank(self) -> u8 {
        self.rank
    }

    pub fn file_char(self) -> char {
        (b'a' + self.file) as char
    }

    pub fn rank_char(self) -> char {
        (b'1' + self.rank) as char
    }

    /// The square `file_delta` files and `rank_delta` ranks away, or `None`
    /// if that lands off the board.
    pub fn offset(self, file_delta: i8, rank_delta: i8) -> Option<Square> {
        let file = self.file as i8 + file_delta;
        let rank = self.rank as i8 + rank_delta;
        if (0..BOARD_SIZE as i8).contains(&file) && (0..BOARD_SIZE as i8).contains(&rank) {
            Some(Square {
                file: file as u8,
                rank: rank as u8,
            })
        } else {
            None
        }
    }

    pub fn all() -> impl Iterator<Item = Square> {
        (0..BOARD_SIZE)
            .flat_map(|file| (0..BOARD_SIZE).map(move |rank| Square { file, rank }))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

impl FromStr for Square {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(f @ 'a'..='h'), Some(r @ '1'..='8'), None) => Ok(Square {
                file: f as u8 - b'a',
                rank: r as u8 - b'1',
            }),
            _ => Err(Error::InvalidSquare(s.to_string())),
        }
    }
}
