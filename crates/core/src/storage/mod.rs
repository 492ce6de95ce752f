//! SQLite storage for saved games

mod db;
mod models;

pub use db::Database;
pub use models::*;
