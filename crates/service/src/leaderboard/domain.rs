use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// `date` format written on every entry (local time, second precision).
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Score submission as received from the caller. The timestamp is not part of
/// it: the store stamps entries itself.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoreSubmission {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub score: Option<Number>,
    #[serde(default)]
    pub accuracy: Option<Number>,
    #[serde(default)]
    pub grade: Option<String>,
}

impl ScoreSubmission {
    pub fn new(username: impl Into<String>, score: impl Into<Number>) -> Self {
        Self { username: Some(username.into()), score: Some(score.into()), ..Default::default() }
    }

    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = Number::from_f64(accuracy);
        self
    }

    pub fn with_grade(mut self, grade: impl Into<String>) -> Self {
        self.grade = Some(grade.into());
        self
    }
}

/// One stored leaderboard row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub username: String,
    pub score: Number,
    #[serde(default)]
    pub accuracy: Option<Number>,
    #[serde(default)]
    pub grade: Option<String>,
    pub date: String,
}

fn as_integer(n: &Number) -> Option<i128> {
    n.as_i64().map(i128::from).or_else(|| n.as_u64().map(i128::from))
}

/// Total order on scores. Two integers compare exactly (no `f64` rounding
/// above 2^53); anything involving a float compares as `f64`.
pub fn compare_scores(a: &Number, b: &Number) -> Ordering {
    match (as_integer(a), as_integer(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        _ => {
            let (a, b) = (a.as_f64().unwrap_or(f64::MIN), b.as_f64().unwrap_or(f64::MIN));
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
    }
}

impl ScoreEntry {
    pub fn cmp_score(&self, other: &ScoreEntry) -> Ordering {
        compare_scores(&self.score, &other.score)
    }
}
