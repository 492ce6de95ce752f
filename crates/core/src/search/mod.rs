//! Move selection for the built-in opponent

mod autoplay;

pub use autoplay::{choose_move, choose_move_async};
