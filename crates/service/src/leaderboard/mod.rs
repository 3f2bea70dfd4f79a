//! Per-song leaderboards: bounded, score-descending lists in one rankings document.

pub mod domain;
pub mod store;

pub use domain::{ScoreEntry, ScoreSubmission};
pub use store::{LeaderboardStore, MAX_ENTRIES_PER_SONG};
