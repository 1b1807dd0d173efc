use crate::autosave::{AutosaveCoordinator, AutosaveHandle};
use crate::client::ApiClient;
use crate::config::AppConfig;
use crate::editor::{EditorStore, FileItem};
use crate::error::{StorageError, WorkspaceError};
use crate::idle::{ActivitySink, IdleLockMonitor, IdleMonitorHandle};
use crate::session::{AuthFlow, SessionStore};
use crate::settings::SettingsStore;
use crate::storage::{FileStore, KeyValueStore, MemoryStore};
use crate::transport::Transport;
use crate::workspace::{FileBrowser, HistoryBrowser, StatusBar, Updater};
use std::sync::Arc;

/// Opens the persistent store named by `cfg.storage.directory`; without a
/// directory the records live in memory only.
pub fn open_storage(cfg: &AppConfig) -> Result<Arc<dyn KeyValueStore>, StorageError> {
    match cfg
        .storage
        .directory
        .as_deref()
        .filter(|d| !d.trim().is_empty())
    {
        Some(dir) => Ok(Arc::new(FileStore::new(dir)?)),
        None => Ok(Arc::new(MemoryStore::new())),
    }
}

/// Explicit application context: the stores, the API client and the
/// controllers built on them.
#[derive(Clone)]
pub struct AppContext {
    cfg: AppConfig,
    session: SessionStore,
    settings: SettingsStore,
    editor: EditorStore,
    client: ApiClient,
}

/// Background tasks started by [`AppContext::start_background`].
pub struct BackgroundTasks {
    pub idle: IdleMonitorHandle,
    pub autosave: AutosaveHandle,
}

impl BackgroundTasks {
    pub fn activity(&self) -> ActivitySink {
        self.idle.sink()
    }

    pub async fn shutdown(self) {
        self.idle.stop();
        self.autosave.shutdown().await;
    }
}

impl AppContext {
    pub fn new(
        cfg: AppConfig,
        storage: Arc<dyn KeyValueStore>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let session = SessionStore::load(storage.clone());
        let settings = SettingsStore::load(storage);
        let client = ApiClient::new(transport, session.clone());
        tracing::debug!(
            target: "texton.context",
            transport = client.transport_name(),
            base_url = %cfg.api.base_url,
            "context ready"
        );
        Self {
            cfg,
            session,
            settings,
            editor: EditorStore::new(),
            client,
        }
    }

    pub fn cfg(&self) -> &AppConfig {
        &self.cfg
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn editor(&self) -> &EditorStore {
        &self.editor
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn auth(&self) -> AuthFlow {
        AuthFlow::new(self.session.clone(), self.client.auth())
    }

    pub fn files(&self) -> FileBrowser {
        FileBrowser::new(self.client.files(), self.editor.clone())
    }

    pub fn history(&self) -> HistoryBrowser {
        HistoryBrowser::new(self.client.history(), self.editor.clone())
    }

    pub fn status_bar(&self) -> StatusBar {
        StatusBar::new(self.client.files(), self.editor.clone())
    }

    pub fn updater(&self) -> Updater {
        Updater::new(self.client.system())
    }

    /// Loads what the main screen shows after sign-in: the file list and the
    /// server version, fetched together. A missing version is not fatal.
    pub async fn load_workspace(&self) -> Result<(Vec<FileItem>, Option<String>), WorkspaceError> {
        let files = self.files();
        let updater = self.updater();
        let (listed, version) = futures::join!(files.refresh(), updater.current_version());
        let version = version
            .inspect_err(|err| {
                tracing::warn!(target: "texton.context", error = %err, "version lookup failed");
            })
            .ok();
        Ok((listed?, version))
    }

    /// Spawns the idle-lock monitor and the autosave coordinator. Must be
    /// called from within a tokio runtime.
    pub fn start_background(&self) -> BackgroundTasks {
        let idle = IdleLockMonitor::spawn(
            self.session.clone(),
            self.settings.clone(),
            self.cfg.session.idle_poll_interval(),
        );
        let autosave = AutosaveCoordinator::spawn(
            self.editor.clone(),
            self.settings.clone(),
            self.session.clone(),
            Arc::new(self.client.files()),
        );
        BackgroundTasks { idle, autosave }
    }

    /// Closes the open document before signing out so a pending debounce
    /// cannot save on behalf of a logged-out session.
    pub async fn logout(&self) {
        self.editor.set_current_file(None).await;
        self.editor.set_files(Vec::new()).await;
        self.session.logout().await;
        tracing::info!(target: "texton.context", "signed out");
    }
}
