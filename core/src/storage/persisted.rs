use super::kv::KeyValueStore;
use crate::error::StorageError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

const RECORD_VERSION: u32 = 0;

/// On-disk envelope shared by every persisted record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persisted<T> {
    pub state: T,
    #[serde(default)]
    pub version: u32,
}

pub fn save_record<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    state: &T,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(&Persisted {
        state,
        version: RECORD_VERSION,
    })?;
    store.set(key, &json)
}

/// Missing or unreadable records yield `None`; corruption is logged, not fatal.
pub fn load_record<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(err) => {
            tracing::warn!(target: "texton.storage", key, error = %err, "failed to read record");
            return None;
        }
    };
    match serde_json::from_str::<Persisted<T>>(&raw) {
        Ok(record) => Some(record.state),
        Err(err) => {
            tracing::warn!(target: "texton.storage", key, error = %err, "discarding unreadable record");
            None
        }
    }
}
