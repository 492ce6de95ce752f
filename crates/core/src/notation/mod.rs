//! Algebraic notation codec

mod decode;
mod encode;

pub use decode::notation_as_move;
pub use encode::move_as_notation;
