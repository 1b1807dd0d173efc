//! Local key-value persistence for session and settings records.

mod file;
mod kv;
mod persisted;

pub use file::FileStore;
pub use kv::{KeyValueStore, MemoryStore};
pub use persisted::{load_record, save_record, Persisted};

/// Storage key of the session projection.
pub const AUTH_STORAGE_KEY: &str = "auth-storage";
/// Storage key of the settings record.
pub const SETTINGS_STORAGE_KEY: &str = "settings-storage";
