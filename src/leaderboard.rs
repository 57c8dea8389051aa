//! Best-score table: highest scores first, at most ten entries.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::engine::Score;
use crate::error::EngineError;

pub const LEADERBOARD_CAPACITY: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub name: String,
    pub score: Score,
    pub at_unix_s: u64,
}

/// Serializes as a plain JSON array of records. Loading re-sorts and
/// truncates, so a hand-edited file still obeys the ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Record>", into = "Vec<Record>")]
pub struct Leaderboard {
    records: Vec<Record>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a finished game. Returns the 0-based rank if it made the table.
    ///
    /// Ties keep the earlier entry ahead.
    ///
    /// ```
    /// use grid_2048::leaderboard::Leaderboard;
    /// let mut lb = Leaderboard::new();
    /// assert_eq!(lb.submit("ann", 300, 0).unwrap(), Some(0));
    /// assert_eq!(lb.submit("bob", 500, 0).unwrap(), Some(0));
    /// assert_eq!(lb.records()[1].name, "ann");
    /// ```
    pub fn submit(&mut self, name: &str, score: Score, at_unix_s: u64) -> Result<Option<usize>, EngineError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EngineError::EmptyName);
        }
        let rank = self.records.partition_point(|r| r.score >= score);
        if rank >= LEADERBOARD_CAPACITY {
            return Ok(None);
        }
        self.records.insert(rank, Record { name: name.to_string(), score, at_unix_s });
        self.records.truncate(LEADERBOARD_CAPACITY);
        Ok(Some(rank))
    }

    /// True if `score` would earn a place in the table.
    pub fn qualifies(&self, score: Score) -> bool {
        self.records.partition_point(|r| r.score >= score) < LEADERBOARD_CAPACITY
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn best(&self) -> Option<&Record> {
        self.records.first()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<Vec<Record>> for Leaderboard {
    fn from(mut records: Vec<Record>) -> Self {
        // Same rules as submit: trimmed, non-empty names only
        for record in &mut records {
            record.name = record.name.trim().to_string();
        }
        records.retain(|r| !r.name.is_empty());
        records.sort_by(|a, b| b.score.cmp(&a.score));
        records.truncate(LEADERBOARD_CAPACITY);
        Leaderboard { records }
    }
}

impl From<Leaderboard> for Vec<Record> {
    fn from(board: Leaderboard) -> Self {
        board.records
    }
}

pub fn now_unix_seconds() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs()
}
