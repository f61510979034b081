use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::error::DomainError;

/// Longest stored name, counted in UTF-16 code units after trimming.
pub const MAX_NAME_CHARS: usize = 20;

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 1_000_000.0;

/// A submitted score.
///
/// Keeps the JSON number exactly as the client sent it, so integer scores
/// stay integers on the wire and fractional ones keep their precision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Score(Number);

impl Score {
    pub fn as_f64(&self) -> f64 {
        self.0.as_f64().unwrap_or(f64::NAN)
    }

    pub fn is_in_range(&self) -> bool {
        (MIN_SCORE..=MAX_SCORE).contains(&self.as_f64())
    }

    /// Ordering that puts higher scores first.
    pub fn cmp_desc(&self, other: &Self) -> Ordering {
        other
            .as_f64()
            .partial_cmp(&self.as_f64())
            .unwrap_or(Ordering::Equal)
    }
}

impl From<Number> for Score {
    fn from(n: Number) -> Self {
        Self(n)
    }
}

impl From<u32> for Score {
    fn from(n: u32) -> Self {
        Self(Number::from(n))
    }
}

/// Score entry - one player's result on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: Score,
    /// Submission time in milliseconds since the Unix epoch, assigned by the server.
    pub time: i64,
}

/// A validated, sanitized score submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub name: String,
    pub score: Score,
}

impl Submission {
    /// Validate a submission body.
    ///
    /// `name` must be a non-empty string and `score` a JSON number in
    /// `[MIN_SCORE, MAX_SCORE]`. The name is sanitized before the range check
    /// and may end up empty; it is not re-validated.
    pub fn from_payload(payload: &Value) -> Result<Self, DomainError> {
        let name = payload
            .get("name")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
            .ok_or(DomainError::InvalidPayload)?;

        let score = match payload.get("score") {
            Some(Value::Number(n)) => Score::from(n.clone()),
            _ => return Err(DomainError::InvalidPayload),
        };

        let name = sanitize_name(name);

        if !score.is_in_range() {
            return Err(DomainError::InvalidScoreRange);
        }

        Ok(Self { name, score })
    }

    /// Stamp the submission into a board entry.
    pub fn into_entry(self, time: i64) -> ScoreEntry {
        ScoreEntry {
            name: self.name,
            score: self.score,
            time,
        }
    }
}

/// Trim, cut to `MAX_NAME_CHARS` UTF-16 code units, then keep only ASCII
/// letters, digits, space, underscore and hyphen. A surrogate pair split by
/// the cut is dropped.
pub fn sanitize_name(raw: &str) -> String {
    char::decode_utf16(raw.trim().encode_utf16().take(MAX_NAME_CHARS))
        .filter_map(Result::ok)
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '_' | '-'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sanitize_strips_markup() {
        assert_eq!(sanitize_name("  Bob<script>!! "), "Bobscript");
    }

    #[test]
    fn test_sanitize_truncates_before_filtering() {
        // 20 chars are taken first, so stripped characters still count.
        assert_eq!(sanitize_name("!!!!!!!!!!!!!!!!!!!!Alice"), "");
        assert_eq!(sanitize_name("abcdefghijklmnopqrstuvwxyz"), "abcdefghijklmnopqrst");
    }

    #[test]
    fn test_sanitize_keeps_allowed_punctuation() {
        assert_eq!(sanitize_name("x_y-z 1"), "x_y-z 1");
        assert_eq!(sanitize_name("Zoë"), "Zo");
    }

    #[test]
    fn test_sanitize_counts_utf16_units() {
        // Each emoji is two UTF-16 units, so five of them use half the budget.
        let raw = format!("{}ABCDEFGHIJKLMNOPQRST", "😀".repeat(5));
        assert_eq!(sanitize_name(&raw), "ABCDEFGHIJ");

        // The cut lands inside the last emoji's surrogate pair.
        let raw = format!("{}😀", "a".repeat(19));
        assert_eq!(sanitize_name(&raw), "a".repeat(19));
    }

    #[test]
    fn test_payload_requires_name_and_numeric_score() {
        assert!(matches!(
            Submission::from_payload(&json!({"name": "", "score": 5})),
            Err(DomainError::InvalidPayload)
        ));
        assert!(matches!(
            Submission::from_payload(&json!({"name": "A", "score": "5"})),
            Err(DomainError::InvalidPayload)
        ));
        assert!(matches!(
            Submission::from_payload(&json!({"score": 5})),
            Err(DomainError::InvalidPayload)
        ));
        assert!(matches!(
            Submission::from_payload(&json!([1, 2])),
            Err(DomainError::InvalidPayload)
        ));
    }

    #[test]
    fn test_payload_range() {
        for score in [json!(-1), json!(1_000_001), json!(-0.5)] {
            assert!(matches!(
                Submission::from_payload(&json!({"name": "A", "score": score})),
                Err(DomainError::InvalidScoreRange)
            ));
        }

        let low = Submission::from_payload(&json!({"name": "A", "score": 0})).unwrap();
        assert_eq!(low.score.as_f64(), 0.0);
        let high = Submission::from_payload(&json!({"name": "A", "score": 1_000_000})).unwrap();
        assert_eq!(high.score.as_f64(), 1_000_000.0);
    }

    #[test]
    fn test_whitespace_name_is_accepted_and_emptied() {
        let submission = Submission::from_payload(&json!({"name": "   ", "score": 3})).unwrap();
        assert_eq!(submission.name, "");
    }

    #[test]
    fn test_entry_serializes_integer_scores_as_integers() {
        let entry = Submission::from_payload(&json!({"name": "Bob", "score": 42}))
            .unwrap()
            .into_entry(1_700_000_000_000);
        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            json!({"name": "Bob", "score": 42, "time": 1_700_000_000_000i64})
        );
    }
}
