use std::{io, path::PathBuf};

use thiserror::Error;

/// Result alias used by every store in this crate.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by the persistence core.
///
/// None of these are retried internally; retry policy belongs to the caller.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A required field is missing or malformed.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Unknown user or wrong password. The two cases are deliberately indistinguishable.
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("{0} already exists")]
    AlreadyExists(String),
    /// A privileged operation was attempted by a non-privileged identity.
    #[error("unauthorized")]
    Unauthorized,
    /// The document on disk could not be parsed. It is left untouched.
    #[error("corrupt {resource} document at {}: {source}", .path.display())]
    CorruptDocument {
        resource: &'static str,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{resource} storage unavailable: {source}")]
    StorageUnavailable {
        resource: &'static str,
        #[source]
        source: io::Error,
    },
    #[error("hashing error: {0}")]
    Hashing(String),
}

impl StoreError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            StoreError::InvalidInput(_) => 1001,
            StoreError::AlreadyExists(_) => 1002,
            StoreError::InvalidCredentials => 1004,
            StoreError::Unauthorized => 1005,
            StoreError::Hashing(_) => 1101,
            StoreError::CorruptDocument { .. } => 1201,
            StoreError::StorageUnavailable { .. } => 1202,
        }
    }

    /// True for failures of the store itself rather than of the caller's request.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            StoreError::CorruptDocument { .. } | StoreError::StorageUnavailable { .. } | StoreError::Hashing(_)
        )
    }
}
