//! Persistence core: one JSON document per resource, each behind its own lock.
//! - `storage`: the generic document primitive and the file-system capability.
//! - `auth`: credentials (unique usernames, salted hashes only).
//! - `file`: settings and the admin-only chart catalog.
//! - `leaderboard`: per-song top-100 boards.

pub mod errors;
pub mod auth;
pub mod runtime;
pub mod storage;
pub mod file;
pub mod leaderboard;
pub mod stores;

pub use errors::{StoreError, StoreResult};
pub use stores::Stores;
