//! Database models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of the saves list, without the move text itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveSummary {
    pub name: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub move_count: u32,
    pub created_at: u64,
}
