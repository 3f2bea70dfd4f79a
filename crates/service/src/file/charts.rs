use std::{path::PathBuf, sync::Arc};

use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::errors::{StoreError, StoreResult};
use crate::storage::{DocumentFs, JsonDocumentStore, Loaded};

/// Song catalog as stored. Replacements always write a list of opaque song
/// descriptors, but the file shipped with the frontend may hold any JSON
/// (e.g. a single chart object), so reads pass it through untouched.
pub type ChartDocument = Value;

/// Whole-document song catalog, writable only by one configured identity.
///
/// The single-identity check is the minimum contract; it is not an
/// authorization scheme and offers nothing for multi-admin or token setups.
pub struct ChartRegistry {
    doc: JsonDocumentStore<ChartDocument>,
    admin_user: String,
}

impl ChartRegistry {
    pub fn new<P: Into<PathBuf>>(path: P, fs: Arc<dyn DocumentFs>, admin_user: impl Into<String>) -> Self {
        Self { doc: JsonDocumentStore::new("charts", path, fs), admin_user: admin_user.into() }
    }

    /// Current catalog; an empty list if nothing was ever written.
    pub async fn songs(&self) -> StoreResult<ChartDocument> {
        Ok(match self.doc.load().await? {
            Loaded::Absent => Value::Array(Vec::new()),
            Loaded::Present(doc) => doc,
        })
    }

    /// Overwrite the catalog. No merge, no history.
    #[instrument(skip(self, songs))]
    pub async fn replace_all(&self, songs: Value, requester: &str) -> StoreResult<()> {
        if requester != self.admin_user {
            warn!(requester, "chart replacement by non-admin rejected");
            return Err(StoreError::Unauthorized);
        }
        let Value::Array(songs) = songs else {
            return Err(StoreError::invalid("expected a list of songs"));
        };
        let count = songs.len();
        self.doc.write_all(&Value::Array(songs)).await?;
        info!(requester, count, "charts_replaced");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::fs::memory::MemoryFs;
    use serde_json::json;

    fn registry() -> ChartRegistry {
        ChartRegistry::new("chart.json", Arc::new(MemoryFs::new()), "admin")
    }

    #[tokio::test]
    async fn admin_replaces_and_reads_back() -> Result<(), anyhow::Error> {
        let reg = registry();
        assert_eq!(reg.songs().await?, json!([]));
        let songs = json!([{"title": "Intro", "bpm": 120}, {"title": "Outro", "timestamps": [0.5, 1.0]}]);
        reg.replace_all(songs.clone(), "admin").await?;
        assert_eq!(reg.songs().await?, songs);
        Ok(())
    }

    #[tokio::test]
    async fn non_admin_is_rejected_and_document_unchanged() -> Result<(), anyhow::Error> {
        let reg = registry();
        let catalog = json!([{"title": "Intro"}]);
        reg.replace_all(catalog.clone(), "admin").await?;

        let err = reg.replace_all(json!([]), "rando").await.unwrap_err();
        assert!(matches!(err, StoreError::Unauthorized));
        assert_eq!(reg.songs().await?, catalog);
        Ok(())
    }

    #[tokio::test]
    async fn authorization_is_checked_before_shape() {
        let err = registry().replace_all(json!({"not": "a list"}), "rando").await.unwrap_err();
        assert!(matches!(err, StoreError::Unauthorized));
    }

    #[tokio::test]
    async fn non_list_payload_is_invalid() {
        for bad in [json!({"title": "x"}), Value::Null, json!("songs")] {
            let err = registry().replace_all(bad, "admin").await.unwrap_err();
            assert!(matches!(err, StoreError::InvalidInput(_)));
        }
    }

    #[tokio::test]
    async fn shipped_chart_object_reads_back_as_is() -> Result<(), anyhow::Error> {
        let fs = Arc::new(MemoryFs::new());
        fs.put("chart.json", br#"{"timestamps": [0.5, 1.0]}"#.to_vec());
        let reg = ChartRegistry::new("chart.json", fs, "admin");
        assert_eq!(reg.songs().await?, json!({"timestamps": [0.5, 1.0]}));

        reg.replace_all(json!([{"title": "x"}]), "admin").await?;
        assert_eq!(reg.songs().await?, json!([{"title": "x"}]));
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_chart_file_is_reported() {
        let fs = Arc::new(MemoryFs::new());
        fs.put("chart.json", b"{not json".to_vec());
        let err = ChartRegistry::new("chart.json", fs, "admin").songs().await.unwrap_err();
        assert!(matches!(err, StoreError::CorruptDocument { .. }));
    }

    #[tokio::test]
    async fn empty_list_is_a_valid_catalog() -> Result<(), anyhow::Error> {
        let reg = registry();
        reg.replace_all(json!([{"title": "x"}]), "admin").await?;
        reg.replace_all(json!([]), "admin").await?;
        assert_eq!(reg.songs().await?, json!([]));
        Ok(())
    }
}
