//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` so binary crates can prepare the
//! storage layout without depending directly on `common`.

use configs::StorageConfig;

/// Ensure the data directory and the chart's parent directory exist; warn on a missing frontend.
pub async fn ensure_env(storage: &StorageConfig) -> anyhow::Result<()> {
    common::env::ensure_env(&storage.frontend_dir, &storage.data_dir).await?;
    if let Some(parent) = storage.chart_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    Ok(())
}
