use std::{cmp::Ordering, collections::BTreeMap, path::PathBuf, sync::Arc};

use chrono::Local;
use tracing::{debug, info, instrument};

use super::domain::{ScoreEntry, ScoreSubmission, DATE_FORMAT};
use crate::errors::{StoreError, StoreResult};
use crate::storage::{DocumentFs, JsonDocumentStore};

/// Entries kept per song. Anything ranked below this is discarded for good.
pub const MAX_ENTRIES_PER_SONG: usize = 100;

/// `song id -> entries, score descending`
pub type RankingsDocument = BTreeMap<String, Vec<ScoreEntry>>;

/// Append `entry`, re-sort (stable, so ties keep submission order) and cut to `cap`.
///
/// Returns the 1-based rank of the new entry, or `None` if it was cut.
fn insert_ranked(board: &mut Vec<ScoreEntry>, entry: ScoreEntry, cap: usize) -> Option<usize> {
    let ahead = board.iter().filter(|e| e.cmp_score(&entry) != Ordering::Less).count();
    board.push(entry);
    board.sort_by(|a, b| b.cmp_score(a));
    board.truncate(cap);
    (ahead < cap).then_some(ahead + 1)
}

/// All song leaderboards, persisted as one rankings document.
pub struct LeaderboardStore {
    doc: JsonDocumentStore<RankingsDocument>,
}

impl LeaderboardStore {
    pub fn new<P: Into<PathBuf>>(path: P, fs: Arc<dyn DocumentFs>) -> Self {
        Self { doc: JsonDocumentStore::new("rankings", path, fs) }
    }

    pub async fn list(&self) -> StoreResult<RankingsDocument> {
        self.doc.read().await
    }

    /// One song's board; empty if nobody has submitted yet.
    pub async fn collection(&self, song: &str) -> StoreResult<Vec<ScoreEntry>> {
        self.doc.read_with(|all| all.get(song).cloned().unwrap_or_default()).await
    }

    /// Record a score for `song` and return its rank (`None` when it did not make the top list).
    #[instrument(skip(self, submission), fields(username = ?submission.username))]
    pub async fn submit(&self, song: &str, submission: ScoreSubmission) -> StoreResult<Option<usize>> {
        let ScoreSubmission { username, score, accuracy, grade } = submission;
        let (username, score) = match (username, score) {
            (Some(u), Some(s)) if !song.is_empty() && !u.is_empty() => (u, s),
            _ => return Err(StoreError::invalid("missing score data")),
        };
        let entry = ScoreEntry {
            username,
            score,
            accuracy,
            grade,
            date: Local::now().format(DATE_FORMAT).to_string(),
        };

        let rank = self
            .doc
            .update(|rankings| {
                let board = rankings.entry(song.to_string()).or_default();
                Ok(insert_ranked(board, entry, MAX_ENTRIES_PER_SONG))
            })
            .await?;
        match rank {
            Some(rank) => info!(rank, "score_submitted"),
            None => debug!("score below retained top list; dropped"),
        }
        Ok(rank)
    }
}
