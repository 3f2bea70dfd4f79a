//! Factory wiring every store to its file, the shared file system and the hasher.

use std::sync::Arc;

use configs::{AuthConfig, StorageConfig};
use tracing::info;

use crate::auth::{Argon2Hasher, CredentialStore, SecretHasher};
use crate::errors::StoreResult;
use crate::file::{ChartRegistry, SettingsStore};
use crate::leaderboard::LeaderboardStore;
use crate::storage::{DocumentFs, TokioFs};

/// One instance of each resource store. Each owns a distinct file and lock.
#[derive(Clone)]
pub struct Stores {
    pub credentials: Arc<CredentialStore>,
    pub settings: Arc<SettingsStore>,
    pub leaderboard: Arc<LeaderboardStore>,
    pub charts: Arc<ChartRegistry>,
}

impl Stores {
    /// Build the stores on real disk with an Argon2 hasher tuned from `auth`.
    pub fn open(storage: &StorageConfig, auth: &AuthConfig) -> StoreResult<Self> {
        let hasher = Arc::new(Argon2Hasher::from_config(auth)?);
        Ok(Self::with_backends(storage, auth, Arc::new(TokioFs), hasher))
    }

    pub fn with_backends(
        storage: &StorageConfig,
        auth: &AuthConfig,
        fs: Arc<dyn DocumentFs>,
        hasher: Arc<dyn SecretHasher>,
    ) -> Self {
        info!(
            users = %storage.users_path().display(),
            settings = %storage.settings_path().display(),
            rankings = %storage.rankings_path().display(),
            charts = %storage.chart_path.display(),
            "opening document stores"
        );
        Self {
            credentials: Arc::new(CredentialStore::new(storage.users_path(), fs.clone(), hasher)),
            settings: Arc::new(SettingsStore::new(storage.settings_path(), fs.clone())),
            leaderboard: Arc::new(LeaderboardStore::new(storage.rankings_path(), fs.clone())),
            charts: Arc::new(ChartRegistry::new(storage.chart_path.clone(), fs, auth.admin_user.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::fs::memory::MemoryFs;
    use serde_json::json;
    use std::path::Path;

    #[tokio::test]
    async fn each_resource_writes_its_own_file() -> Result<(), anyhow::Error> {
        let fs = Arc::new(MemoryFs::new());
        let hasher = Arc::new(Argon2Hasher::with_params(8, 1, 1)?);
        let stores = Stores::with_backends(&StorageConfig::default(), &AuthConfig::default(), fs.clone(), hasher);

        stores.credentials.register("alice", "pw").await?;
        stores.settings.put("alice", json!({"speed": 3})).await?;
        stores.leaderboard.submit("song", crate::leaderboard::ScoreSubmission::new("alice", 10)).await?;
        stores.charts.replace_all(json!([{"title": "x"}]), "admin").await?;

        for path in ["data/users.json", "data/user_settings.json", "data/rankings.json", "frontend/assets/chart.json"] {
            assert!(fs.get(Path::new(path)).is_some(), "{path} missing");
        }
        Ok(())
    }
}
