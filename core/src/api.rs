//! Stable re-exports for consumers (`plugins`, `devserver`, and external crates).
//!
//! Prefer importing from `texton_core::api` instead of reaching into internal modules.

pub use crate::autosave::{AutosaveCoordinator, AutosaveHandle, DocumentSaver};
pub use crate::client::models::{ImportFile, ImportRequest, ImportSummary, VersionItem};
pub use crate::client::{ApiClient, AuthApi, ExportedFile, FilesApi, HistoryApi, SystemApi};
pub use crate::config::{
    load_default, load_from_str, ApiConfig, AppConfig, DevServerConfig, LoggingConfig,
    SessionConfig, StorageConfig,
};
pub use crate::context::{open_storage, AppContext, BackgroundTasks};
pub use crate::editor::{EditorEvent, EditorState, EditorStore, FileContent, FileItem, SaveStatus};
pub use crate::error::{
    ApiError, AuthError, StorageError, TransportError, TransportErrorKind, WorkspaceError,
};
pub use crate::idle::{ActivityKind, ActivitySink, IdleLockMonitor, IdleMonitorHandle};
pub use crate::session::{
    AuthFlow, AuthPhase, LoginOutcome, SessionEvent, SessionState, SessionStore, TotpProvisioning,
};
pub use crate::settings::{Settings, SettingsStore, Theme, ThemeKind};
pub use crate::storage::{FileStore, KeyValueStore, MemoryStore};
pub use crate::transport::{ApiRequest, ApiResponse, Credentials, Method, Transport};
pub use crate::workspace::{
    DiffStats, FileBrowser, HistoryBrowser, StatusBar, UpdateCheck, UpdateOutcome, Updater,
};
