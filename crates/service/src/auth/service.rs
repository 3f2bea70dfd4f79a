use std::{collections::BTreeMap, path::PathBuf, sync::Arc};

use tracing::{debug, info, instrument};

use super::hasher::SecretHasher;
use crate::errors::{StoreError, StoreResult};
use crate::storage::{DocumentFs, JsonDocumentStore};

/// `username -> password hash`
pub type CredentialDocument = BTreeMap<String, String>;

/// Credential store independent of web framework.
///
/// Usernames are trimmed and case-sensitive. Only the hasher's digest is ever
/// written; the plaintext password never reaches the document.
pub struct CredentialStore {
    doc: JsonDocumentStore<CredentialDocument>,
    hasher: Arc<dyn SecretHasher>,
}

impl CredentialStore {
    pub fn new<P: Into<PathBuf>>(path: P, fs: Arc<dyn DocumentFs>, hasher: Arc<dyn SecretHasher>) -> Self {
        Self { doc: JsonDocumentStore::new("users", path, fs), hasher }
    }

    /// Register a new user with a hashed password.
    ///
    /// Lookup, hashing and persistence share one exclusive lock acquisition,
    /// so two concurrent signups for the same name cannot both succeed.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::auth::{Argon2Hasher, CredentialStore};
    /// use service::storage::fs::memory::MemoryFs;
    /// let hasher = Arc::new(Argon2Hasher::with_params(8, 1, 1).unwrap());
    /// let store = CredentialStore::new("users.json", Arc::new(MemoryFs::new()), hasher);
    /// tokio_test::block_on(store.register(" alice ", "Passw0rd")).unwrap();
    /// assert!(tokio_test::block_on(store.authenticate("alice", "Passw0rd")).is_ok());
    /// ```
    #[instrument(skip(self, password), fields(username = %username.trim()))]
    pub async fn register(&self, username: &str, password: &str) -> StoreResult<()> {
        let username = username.trim();
        let password = password.trim();
        if username.is_empty() || password.is_empty() {
            return Err(StoreError::invalid("missing username or password"));
        }

        self.doc
            .update(|users| {
                if users.contains_key(username) {
                    debug!("user exists");
                    return Err(StoreError::AlreadyExists(format!("user {username}")));
                }
                let hash = self.hasher.hash(password)?;
                users.insert(username.to_string(), hash);
                Ok(())
            })
            .await?;
        info!(username, "user_registered");
        Ok(())
    }

    /// Check a username/password pair.
    ///
    /// An unknown user and a wrong password both return
    /// [`StoreError::InvalidCredentials`].
    #[instrument(skip(self, password), fields(username = %username.trim()))]
    pub async fn authenticate(&self, username: &str, password: &str) -> StoreResult<()> {
        let username = username.trim();
        let stored = self.doc.read_with(|users| users.get(username).cloned()).await?;
        let Some(digest) = stored else {
            debug!("unknown user");
            return Err(StoreError::InvalidCredentials);
        };
        if !self.hasher.verify(&digest, password.trim()) {
            debug!("password mismatch");
            return Err(StoreError::InvalidCredentials);
        }
        Ok(())
    }

    pub async fn contains(&self, username: &str) -> StoreResult<bool> {
        let username = username.trim();
        self.doc.read_with(|users| users.contains_key(username)).await
    }
}
