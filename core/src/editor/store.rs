//! 编辑器存储

use super::types::{FileContent, FileItem, SaveStatus};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

/// 编辑器状态
#[derive(Debug, Clone)]
pub struct EditorState {
    pub files: Vec<FileItem>,
    pub current_file: Option<FileContent>,
    /// 实时编辑缓冲区，可能与 `current_file.content` 不同
    pub editor_content: String,
    pub save_status: SaveStatus,
    pub sidebar_open: bool,
    pub settings_open: bool,
    pub history_open: bool,
}

impl Default for EditorState {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            current_file: None,
            editor_content: String::new(),
            save_status: SaveStatus::Saved,
            sidebar_open: true,
            settings_open: false,
            history_open: false,
        }
    }
}

impl EditorState {
    pub fn current_file_id(&self) -> Option<i64> {
        self.current_file.as_ref().map(|f| f.id)
    }
}

/// 编辑器事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    /// 打开了另一个文件，缓冲区已载入服务端内容
    FileOpened { file_id: i64, content: String },
    /// 同一文件的元数据更新，缓冲区保留
    FileUpdated { file_id: i64 },
    FileClosed,
    ContentChanged { file_id: Option<i64> },
    SaveStatusChanged { status: SaveStatus },
    FilesChanged { count: usize },
}

#[derive(Clone)]
pub struct EditorStore {
    inner: Arc<EditorStoreInner>,
}

struct EditorStoreInner {
    state: RwLock<EditorState>,
    event_tx: broadcast::Sender<EditorEvent>,
}

impl EditorStore {
    pub fn new() -> Self {
        let (event_tx, _) = broadcast::channel(1024);
        Self {
            inner: Arc::new(EditorStoreInner {
                state: RwLock::new(EditorState::default()),
                event_tx,
            }),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EditorEvent> {
        self.inner.event_tx.subscribe()
    }

    fn emit(&self, event: EditorEvent) {
        let _ = self.inner.event_tx.send(event);
    }

    pub async fn snapshot(&self) -> EditorState {
        self.inner.state.read().await.clone()
    }

    pub async fn files(&self) -> Vec<FileItem> {
        self.inner.state.read().await.files.clone()
    }

    pub async fn current_file(&self) -> Option<FileContent> {
        self.inner.state.read().await.current_file.clone()
    }

    pub async fn current_file_id(&self) -> Option<i64> {
        self.inner.state.read().await.current_file_id()
    }

    pub async fn editor_content(&self) -> String {
        self.inner.state.read().await.editor_content.clone()
    }

    /// 当前文件 id 与缓冲区（同一把锁下读取）
    pub async fn buffer(&self) -> (Option<i64>, String) {
        let state = self.inner.state.read().await;
        (state.current_file_id(), state.editor_content.clone())
    }

    pub async fn save_status(&self) -> SaveStatus {
        self.inner.state.read().await.save_status
    }

    pub async fn set_files(&self, files: Vec<FileItem>) {
        let count = files.len();
        self.inner.state.write().await.files = files;
        self.emit(EditorEvent::FilesChanged { count });
    }

    /// 切换当前文件。
    ///
    /// 同一 id 的记录只替换元数据并保留缓冲区；不同 id 载入新内容并重置保存状态。
    pub async fn set_current_file(&self, file: Option<FileContent>) {
        let event = {
            let mut state = self.inner.state.write().await;
            match file {
                Some(file) if state.current_file_id() == Some(file.id) => {
                    let file_id = file.id;
                    state.current_file = Some(file);
                    EditorEvent::FileUpdated { file_id }
                }
                Some(file) => {
                    let event = EditorEvent::FileOpened {
                        file_id: file.id,
                        content: file.content.clone(),
                    };
                    state.editor_content = file.content.clone();
                    state.current_file = Some(file);
                    state.save_status = SaveStatus::Saved;
                    event
                }
                None => {
                    state.current_file = None;
                    state.editor_content.clear();
                    state.save_status = SaveStatus::Saved;
                    EditorEvent::FileClosed
                }
            }
        };
        tracing::debug!(target: "texton.editor", event = ?event_kind(&event), "current file changed");
        self.emit(event);
    }

    /// 用服务端内容替换当前文件的缓冲区（恢复历史版本）
    pub async fn reload_current(&self, file: FileContent) {
        let event = {
            let mut state = self.inner.state.write().await;
            let event = EditorEvent::FileOpened {
                file_id: file.id,
                content: file.content.clone(),
            };
            state.editor_content = file.content.clone();
            state.current_file = Some(file);
            state.save_status = SaveStatus::Saved;
            event
        };
        self.emit(event);
    }

    pub async fn set_editor_content(&self, content: impl Into<String>) {
        let file_id = {
            let mut state = self.inner.state.write().await;
            state.editor_content = content.into();
            state.current_file_id()
        };
        self.emit(EditorEvent::ContentChanged { file_id });
    }

    pub async fn set_save_status(&self, status: SaveStatus) {
        let changed = {
            let mut state = self.inner.state.write().await;
            let changed = state.save_status != status;
            state.save_status = status;
            changed
        };
        if changed {
            self.emit(EditorEvent::SaveStatusChanged { status });
        }
    }

    pub async fn toggle_sidebar(&self) -> bool {
        let mut state = self.inner.state.write().await;
        state.sidebar_open = !state.sidebar_open;
        state.sidebar_open
    }

    pub async fn toggle_settings(&self) -> bool {
        let mut state = self.inner.state.write().await;
        state.settings_open = !state.settings_open;
        state.settings_open
    }

    pub async fn toggle_history(&self) -> bool {
        let mut state = self.inner.state.write().await;
        state.history_open = !state.history_open;
        state.history_open
    }

    pub async fn set_history_open(&self, open: bool) {
        self.inner.state.write().await.history_open = open;
    }
}

impl Default for EditorStore {
    fn default() -> Self {
        Self::new()
    }
}

fn event_kind(event: &EditorEvent) -> &'static str {
    match event {
        EditorEvent::FileOpened { .. } => "opened",
        EditorEvent::FileUpdated { .. } => "updated",
        EditorEvent::FileClosed => "closed",
        EditorEvent::ContentChanged { .. } => "content",
        EditorEvent::SaveStatusChanged { .. } => "status",
        EditorEvent::FilesChanged { .. } => "files",
    }
}
