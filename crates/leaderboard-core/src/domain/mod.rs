//! Domain entities - score entries and the ranked board.

mod board;
mod score;

pub use board::{Leaderboard, PERSISTED_LIMIT, READ_LIMIT};
pub use score::{MAX_NAME_CHARS, MAX_SCORE, MIN_SCORE, Score, ScoreEntry, Submission, sanitize_name};
