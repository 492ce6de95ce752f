//! Move legality, application, and check detection

pub mod apply;
pub mod check;
pub mod movegen;

pub use apply::{apply_move, promote};
pub use check::{is_in_check, is_in_checkmate};
pub use movegen::{can_capture, moves_for, Castle, CastleSide, CheckFilter, Move};
