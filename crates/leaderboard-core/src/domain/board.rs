use serde_json::Value;

use super::score::ScoreEntry;

/// Entries returned by a leaderboard read.
pub const READ_LIMIT: usize = 50;

/// Entries kept in the persisted record after a write.
pub const PERSISTED_LIMIT: usize = 100;

/// The Leaderboard Record - every entry held under the board's key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Leaderboard {
    entries: Vec<ScoreEntry>,
}

impl Leaderboard {
    pub fn new(entries: Vec<ScoreEntry>) -> Self {
        Self { entries }
    }

    /// Decode the stored record. An absent key or a `null` value is an empty board.
    pub fn from_stored(value: Option<Value>) -> Result<Self, serde_json::Error> {
        match value {
            None | Some(Value::Null) => Ok(Self::default()),
            Some(value) => Ok(Self::new(serde_json::from_value(value)?)),
        }
    }

    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(&self.entries)
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add an entry, re-rank, and drop everything past `PERSISTED_LIMIT`.
    pub fn record(&mut self, entry: ScoreEntry) {
        self.entries.push(entry);
        self.rank();
        self.entries.truncate(PERSISTED_LIMIT);
    }

    /// The best `limit` entries, highest score first.
    pub fn top(mut self, limit: usize) -> Vec<ScoreEntry> {
        self.rank();
        self.entries.truncate(limit);
        self.entries
    }

    // Stable sort: equal scores keep their stored order.
    fn rank(&mut self) {
        self.entries.sort_by(|a, b| a.score.cmp_desc(&b.score));
    }
}
