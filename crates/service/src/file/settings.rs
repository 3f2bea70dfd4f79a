use std::{collections::BTreeMap, path::PathBuf, sync::Arc};

use serde_json::{Map, Value};
use tracing::{info, instrument};

use crate::errors::{StoreError, StoreResult};
use crate::storage::{DocumentFs, JsonDocumentStore};

/// `username -> settings object`
pub type SettingsDocument = BTreeMap<String, Value>;

/// Per-user settings blob, stored as given and replaced wholesale on save.
pub struct SettingsStore {
    doc: JsonDocumentStore<SettingsDocument>,
}

/// Any empty JSON value counts as "no settings supplied":
/// `null`, `false`, zero, `""`, `[]` and `{}`.
fn is_missing(settings: &Value) -> bool {
    match settings {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

impl SettingsStore {
    pub fn new<P: Into<PathBuf>>(path: P, fs: Arc<dyn DocumentFs>) -> Self {
        Self { doc: JsonDocumentStore::new("settings", path, fs) }
    }

    /// Settings for `username`, or an empty object if none were saved.
    pub async fn get(&self, username: &str) -> StoreResult<Value> {
        if username.is_empty() {
            return Err(StoreError::invalid("missing username"));
        }
        self.doc
            .read_with(|all| all.get(username).cloned().unwrap_or_else(|| Value::Object(Map::new())))
            .await
    }

    /// Replace the settings for `username`. No field-level merge: the last writer wins.
    #[instrument(skip(self, settings))]
    pub async fn put(&self, username: &str, settings: Value) -> StoreResult<()> {
        if username.is_empty() || is_missing(&settings) {
            return Err(StoreError::invalid("missing username or settings"));
        }
        self.doc
            .update(|all| {
                all.insert(username.to_string(), settings);
                Ok(())
            })
            .await?;
        info!(username, "settings_saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::fs::memory::MemoryFs;
    use serde_json::json;

    fn store() -> SettingsStore {
        SettingsStore::new("user_settings.json", Arc::new(MemoryFs::new()))
    }

    #[tokio::test]
    async fn unknown_user_gets_empty_object() -> Result<(), anyhow::Error> {
        assert_eq!(store().get("alice").await?, json!({}));
        Ok(())
    }

    #[tokio::test]
    async fn put_then_get_returns_exact_value() -> Result<(), anyhow::Error> {
        let store = store();
        let s = json!({"speed": 7.5, "keys": ["d", "f", "j", "k"], "nested": {"offset": -12}});
        store.put("alice", s.clone()).await?;
        assert_eq!(store.get("alice").await?, s);
        Ok(())
    }

    #[tokio::test]
    async fn second_put_replaces_wholesale() -> Result<(), anyhow::Error> {
        let store = store();
        store.put("alice", json!({"speed": 5, "volume": 80})).await?;
        store.put("alice", json!({"speed": 9})).await?;
        assert_eq!(store.get("alice").await?, json!({"speed": 9}));
        Ok(())
    }

    #[tokio::test]
    async fn users_do_not_share_settings() -> Result<(), anyhow::Error> {
        let store = store();
        store.put("alice", json!({"speed": 5})).await?;
        store.put("bob", json!({"speed": 6})).await?;
        assert_eq!(store.get("alice").await?, json!({"speed": 5}));
        assert_eq!(store.get("bob").await?, json!({"speed": 6}));
        Ok(())
    }

    #[tokio::test]
    async fn non_object_settings_pass_through() -> Result<(), anyhow::Error> {
        let store = store();
        store.put("alice", json!([1, 2, 3])).await?;
        assert_eq!(store.get("alice").await?, json!([1, 2, 3]));
        Ok(())
    }

    #[tokio::test]
    async fn rejects_missing_fields() {
        let store = store();
        assert!(matches!(store.put("", json!({"a": 1})).await, Err(StoreError::InvalidInput(_))));
        assert!(matches!(store.put("alice", Value::Null).await, Err(StoreError::InvalidInput(_))));
        assert!(matches!(store.put("alice", json!({})).await, Err(StoreError::InvalidInput(_))));
        assert!(matches!(store.get("").await, Err(StoreError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn empty_values_of_any_kind_are_rejected() -> Result<(), anyhow::Error> {
        let store = store();
        for empty in [json!(false), json!(0), json!(0.0), json!(""), json!([])] {
            let err = store.put("alice", empty.clone()).await.unwrap_err();
            assert!(matches!(err, StoreError::InvalidInput(_)), "{empty} accepted");
        }
        assert_eq!(store.get("alice").await?, json!({}));

        for kept in [json!(true), json!(-1), json!("dark"), json!([0])] {
            store.put("alice", kept.clone()).await?;
            assert_eq!(store.get("alice").await?, kept);
        }
        Ok(())
    }
}
