//! Database operations

use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use super::models::*;
use crate::error::Result;
use crate::game::GameData;

const LAST_SAVE_KEY: &str = "last_save_name";

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS saves (
                name TEXT PRIMARY KEY,
                timestamp TEXT,
                moves TEXT NOT NULL,
                created_at INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_saves_created_at ON saves(created_at);
            "#,
        )?;
        Ok(())
    }

    fn now() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs()
    }

    /// Writes `data` under its name. Saving under an existing name replaces
    /// the old game and moves it to the front of the list.
    pub fn save_game(&self, data: &GameData) -> Result<()> {
        let moves = serde_json::to_string(&data.moves)?;
        let timestamp = data.timestamp.map(|t| t.to_rfc3339());
        self.conn.execute(
            r#"
            INSERT INTO saves (name, timestamp, moves, created_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(name) DO UPDATE SET timestamp = ?2, moves = ?3, created_at = ?4
            "#,
            params![data.name, timestamp, moves, Self::now()],
        )?;
        Ok(())
    }

    pub fn load_game(&self, name: &str) -> Result<Option<GameData>> {
        let row: Option<(Option<String>, String)> = self
            .conn
            .query_row(
                "SELECT timestamp, moves FROM saves WHERE name = ?1",
                params![name],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((timestamp, moves)) = row else {
            return Ok(None);
        };
        let timestamp = timestamp
            .as_deref()
            .and_then(|t| chrono::DateTime::parse_from_rfc3339(t).ok())
            .map(|t| t.with_timezone(&chrono::Utc));
        let moves: Vec<String> = serde_json::from_str(&moves)?;
        Ok(Some(GameData {
            name: name.to_string(),
            timestamp,
            moves,
        }))
    }

    /// Most recently written first.
    pub fn list_saves(&self) -> Result<Vec<SaveSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, timestamp, moves, created_at FROM saves ORDER BY created_at DESC",
        )?;

        let rows = stmt
            .query_map([], |row| {
                let timestamp: Option<String> = row.get(1)?;
                let moves: String = row.get(2)?;
                Ok((row.get::<_, String>(0)?, timestamp, moves, row.get(3)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut saves = Vec::with_capacity(rows.len());
        for (name, timestamp, moves, created_at) in rows {
            let moves: Vec<String> = serde_json::from_str(&moves)?;
            let timestamp = timestamp
                .as_deref()
                .and_then(|t| chrono::DateTime::parse_from_rfc3339(t).ok())
                .map(|t| t.with_timezone(&chrono::Utc));
            saves.push(SaveSummary {
                name,
                timestamp,
                move_count: moves.len() as u32,
                created_at,
            });
        }
        Ok(saves)
    }

    pub fn delete_save(&self, name: &str) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM saves WHERE name = ?1", params![name])?;
        if self.get_last_save()?.as_deref() == Some(name) {
            self.clear_last_save()?;
        }
        Ok(deleted > 0)
    }

    /// Name of the game that was saved or loaded last, so a frontend can
    /// reopen it on startup.
    pub fn get_last_save(&self) -> Result<Option<String>> {
        let name = self
            .conn
            .query_row(
                "SELECT value FROM meta WHERE key = ?1",
                params![LAST_SAVE_KEY],
                |row| row.get(0),
            )
            .optional()?;
        Ok(name)
    }

    pub fn set_last_save(&self, name: &str) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO meta (key, value) VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET value = ?2
            "#,
            params![LAST_SAVE_KEY, name],
        )?;
        Ok(())
    }

    pub fn clear_last_save(&self) -> Result<()> {
        self.conn
            .execute("DELETE FROM meta WHERE key = ?1", params![LAST_SAVE_KEY])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample(name: &str, moves: &[&str]) -> GameData {
        GameData {
            name: name.to_string(),
            timestamp: Some(Utc::now()),
            moves: moves.iter().map(|m| m.to_string()).collect(),
        }
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let db = Database::open_in_memory().unwrap();
        let data = sample("opening study", &["e4", "e5", "Nf3"]);
        db.save_game(&data).unwrap();

        let loaded = db.load_game("opening study").unwrap().unwrap();
        assert_eq!(loaded.name, "opening study");
        assert_eq!(loaded.moves, ["e4", "e5", "Nf3"]);
        assert!(loaded.timestamp.is_some());

        assert!(db.load_game("missing").unwrap().is_none());
    }

    #[test]
    fn test_save_overwrites_by_name() {
        let db = Database::open_in_memory().unwrap();
        db.save_game(&sample("game", &["e4"])).unwrap();
        db.save_game(&sample("game", &["d4", "d5"])).unwrap();

        let loaded = db.load_game("game").unwrap().unwrap();
        assert_eq!(loaded.moves, ["d4", "d5"]);
        assert_eq!(db.list_saves().unwrap().len(), 1);
    }

    #[test]
    fn test_list_saves_summarizes() {
        let db = Database::open_in_memory().unwrap();
        db.save_game(&sample("first", &["e4"])).unwrap();
        db.save_game(&sample("second", &["d4", "d5"])).unwrap();

        let saves = db.list_saves().unwrap();
        assert_eq!(saves.len(), 2);
        let second = saves.iter().find(|s| s.name == "second").unwrap();
        assert_eq!(second.move_count, 2);
    }

    #[test]
    fn test_delete_save() {
        let db = Database::open_in_memory().unwrap();
        db.save_game(&sample("doomed", &["e4"])).unwrap();
        db.set_last_save("doomed").unwrap();

        assert!(db.delete_save("doomed").unwrap());
        assert!(!db.delete_save("doomed").unwrap());
        assert!(db.load_game("doomed").unwrap().is_none());
        assert!(db.get_last_save().unwrap().is_none());
    }

    #[test]
    fn test_last_save_name() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.get_last_save().unwrap().is_none());

        db.set_last_save("current").unwrap();
        assert_eq!(db.get_last_save().unwrap().as_deref(), Some("current"));

        db.set_last_save("newer").unwrap();
        assert_eq!(db.get_last_save().unwrap().as_deref(), Some("newer"));

        db.clear_last_save().unwrap();
        assert!(db.get_last_save().unwrap().is_none());
    }
}
