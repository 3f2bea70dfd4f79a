//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use std::path::Path;

use tracing::{info, warn};

/// Ensure expected directories exist; warn on missing optional ones.
///
/// The frontend directory is optional (static assets simply 404 without it),
/// the data directory is created when missing because every store writes there.
pub async fn ensure_env(frontend_dir: &Path, data_dir: &Path) -> anyhow::Result<()> {
    if tokio::fs::metadata(frontend_dir).await.is_err() {
        warn!(frontend_dir = %frontend_dir.display(), "frontend assets directory not found; static assets may 404");
    }
    tokio::fs::create_dir_all(data_dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", data_dir.display()))?;
    info!(data_dir = %data_dir.display(), "data directory ready");
    Ok(())
}
