use super::types::Settings;
use crate::storage::{load_record, save_record, KeyValueStore, MemoryStore, SETTINGS_STORAGE_KEY};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

/// Holder of the preference record. Every change is normalized, persisted
/// under `settings-storage` and broadcast to subscribers.
#[derive(Clone)]
pub struct SettingsStore {
    inner: Arc<SettingsStoreInner>,
}

struct SettingsStoreInner {
    state: RwLock<Settings>,
    storage: Arc<dyn KeyValueStore>,
    event_tx: broadcast::Sender<Arc<Settings>>,
}

impl SettingsStore {
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let settings = load_record::<Settings>(storage.as_ref(), SETTINGS_STORAGE_KEY)
            .unwrap_or_default()
            .normalized();
        let (event_tx, _) = broadcast::channel(64);
        Self {
            inner: Arc::new(SettingsStoreInner {
                state: RwLock::new(settings),
                storage,
                event_tx,
            }),
        }
    }

    pub fn in_memory() -> Self {
        Self::load(Arc::new(MemoryStore::new()))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Arc<Settings>> {
        self.inner.event_tx.subscribe()
    }

    pub async fn get(&self) -> Settings {
        self.inner.state.read().await.clone()
    }

    /// Applies `f`, then normalizes and persists the result.
    pub async fn update<F>(&self, f: F) -> Settings
    where
        F: FnOnce(&mut Settings),
    {
        let updated = {
            let mut state = self.inner.state.write().await;
            let mut next = state.clone();
            f(&mut next);
            *state = next.normalized();
            state.clone()
        };
        self.commit(updated)
    }

    pub async fn reset(&self) -> Settings {
        let defaults = Settings::default();
        *self.inner.state.write().await = defaults.clone();
        tracing::info!(target: "texton.settings", "settings reset to defaults");
        self.commit(defaults)
    }

    fn commit(&self, settings: Settings) -> Settings {
        if let Err(err) = save_record(self.inner.storage.as_ref(), SETTINGS_STORAGE_KEY, &settings)
        {
            tracing::warn!(target: "texton.settings", error = %err, "failed to persist settings");
        }
        let _ = self.inner.event_tx.send(Arc::new(settings.clone()));
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Theme;

    #[tokio::test]
    async fn update_normalizes_and_persists() {
        let storage = Arc::new(MemoryStore::new());
        let store = SettingsStore::load(storage.clone());

        let s = store
            .update(|s| {
                s.auto_lock_minutes = 0;
                s.theme = Theme::Dark;
            })
            .await;
        assert_eq!(s.auto_lock_minutes, 1);

        let raw = storage.get(SETTINGS_STORAGE_KEY).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["state"]["autoLockMinutes"], 1);
        assert_eq!(json["state"]["theme"], "dark");
        assert_eq!(json["version"], 0);

        let restored = SettingsStore::load(storage);
        assert_eq!(restored.get().await.theme, Theme::Dark);
    }

    #[tokio::test]
    async fn corrupt_record_falls_back_to_defaults() {
        let storage = Arc::new(MemoryStore::new());
        storage
            .set(SETTINGS_STORAGE_KEY, r#"{"state":{"theme":"sepia"},"version":0}"#)
            .unwrap();
        let store = SettingsStore::load(storage);
        assert_eq!(store.get().await, Settings::default());
    }

    #[tokio::test]
    async fn subscribers_see_changes() {
        let store = SettingsStore::in_memory();
        let mut rx = store.subscribe();
        store.update(|s| s.auto_save = false).await;
        store.reset().await;

        assert!(!rx.recv().await.unwrap().auto_save);
        assert!(rx.recv().await.unwrap().auto_save);
    }
}
