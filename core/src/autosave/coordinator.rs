//! 自动保存协调任务

use super::DocumentSaver;
use crate::editor::{EditorEvent, EditorStore, SaveStatus};
use crate::error::ApiError;
use crate::session::{SessionEvent, SessionStore};
use crate::settings::{Settings, SettingsStore};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::Instant;

enum Command {
    SaveNow,
    Shutdown,
}

struct SaveResult {
    generation: u64,
    file_id: i64,
    content: String,
    result: Result<(), ApiError>,
}

/// 自动保存任务句柄；drop 时任务随之终止
pub struct AutosaveHandle {
    cmd_tx: mpsc::Sender<Command>,
    task: JoinHandle<()>,
}

impl AutosaveHandle {
    /// 立即保存（手动保存），同样受进行中保存的限制
    pub async fn save_now(&self) {
        let _ = self.cmd_tx.send(Command::SaveNow).await;
    }

    /// 停止任务；尚未触发的计时器被丢弃
    pub async fn shutdown(mut self) {
        let _ = self.cmd_tx.send(Command::Shutdown).await;
        let _ = (&mut self.task).await;
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for AutosaveHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

pub struct AutosaveCoordinator {
    editor: EditorStore,
    session: SessionStore,
    saver: Arc<dyn DocumentSaver>,
    auto_save: bool,
    delay: Duration,
    /// 每次切换文档递增，用于丢弃旧文档的保存结果
    generation: u64,
    doc_id: Option<i64>,
    /// 最近一次成功保存（或服务端下发）的内容
    snapshot: String,
    deadline: Option<Instant>,
    /// 进行中的保存：文件 id -> 发起时的 generation，跨文档切换保留
    in_flight: HashMap<i64, u64>,
    follow_up: bool,
    done_tx: mpsc::UnboundedSender<SaveResult>,
}

impl AutosaveCoordinator {
    /// 启动协调任务
    pub fn spawn(
        editor: EditorStore,
        settings: SettingsStore,
        session: SessionStore,
        saver: Arc<dyn DocumentSaver>,
    ) -> AutosaveHandle {
        // 先订阅，避免错过启动期间的事件
        let editor_rx = editor.subscribe();
        let settings_rx = settings.subscribe();
        let session_rx = session.subscribe();
        let (cmd_tx, cmd_rx) = mpsc::channel(8);
        let (done_tx, done_rx) = mpsc::unbounded_channel();

        let coordinator = Self {
            editor,
            session,
            saver,
            auto_save: true,
            delay: Duration::from_millis(500),
            generation: 0,
            doc_id: None,
            snapshot: String::new(),
            deadline: None,
            in_flight: HashMap::new(),
            follow_up: false,
            done_tx,
        };
        let task = tokio::spawn(coordinator.run(settings, editor_rx, settings_rx, session_rx, cmd_rx, done_rx));
        AutosaveHandle { cmd_tx, task }
    }

    async fn run(
        mut self,
        settings: SettingsStore,
        mut editor_rx: broadcast::Receiver<EditorEvent>,
        mut settings_rx: broadcast::Receiver<Arc<Settings>>,
        mut session_rx: broadcast::Receiver<SessionEvent>,
        mut cmd_rx: mpsc::Receiver<Command>,
        mut done_rx: mpsc::UnboundedReceiver<SaveResult>,
    ) {
        self.apply_settings(&settings.get().await).await;
        self.resync().await;
        tracing::debug!(target: "texton.autosave", "autosave started");

        loop {
            let deadline = self.deadline;
            tokio::select! {
                ev = editor_rx.recv() => match ev {
                    Ok(ev) => self.on_editor_event(ev).await,
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::debug!(target: "texton.autosave", skipped, "editor events lagged, resyncing");
                        self.resync().await;
                    }
                    Err(RecvError::Closed) => break,
                },

                s = settings_rx.recv() => match s {
                    Ok(s) => self.apply_settings(&s).await,
                    Err(RecvError::Lagged(_)) => self.apply_settings(&settings.get().await).await,
                    Err(RecvError::Closed) => {}
                },

                ev = session_rx.recv() => match ev {
                    Ok(SessionEvent::LoggedOut { .. }) => self.on_signed_out().await,
                    Ok(_) | Err(RecvError::Closed) => {}
                    Err(RecvError::Lagged(_)) => {
                        if self.session.access_token().await.is_none() {
                            self.on_signed_out().await;
                        }
                    }
                },

                cmd = cmd_rx.recv() => match cmd {
                    Some(Command::SaveNow) => {
                        self.deadline = None;
                        self.request_save().await;
                    }
                    Some(Command::Shutdown) | None => break,
                },

                Some(done) = done_rx.recv() => self.on_save_done(done).await,

                _ = async {
                    match deadline {
                        Some(at) => tokio::time::sleep_until(at).await,
                        None => std::future::pending().await,
                    }
                } => {
                    self.deadline = None;
                    self.request_save().await;
                }
            }
        }
        tracing::debug!(target: "texton.autosave", "autosave stopped");
    }

    async fn on_editor_event(&mut self, ev: EditorEvent) {
        match ev {
            EditorEvent::FileOpened { file_id, content } => self.reset(Some(file_id), content),
            EditorEvent::FileClosed => self.reset(None, String::new()),
            EditorEvent::ContentChanged { file_id } => {
                if file_id.is_some() && file_id == self.doc_id {
                    self.evaluate().await;
                }
            }
            EditorEvent::FileUpdated { .. }
            | EditorEvent::SaveStatusChanged { .. }
            | EditorEvent::FilesChanged { .. } => {}
        }
    }

    fn reset(&mut self, doc_id: Option<i64>, snapshot: String) {
        self.generation += 1;
        self.doc_id = doc_id;
        self.snapshot = snapshot;
        self.deadline = None;
        self.follow_up = false;
    }

    /// 当前文档是否有本代发起的保存
    fn saving_current(&self) -> bool {
        self.doc_id
            .and_then(|id| self.in_flight.get(&id))
            .is_some_and(|generation| *generation == self.generation)
    }

    /// 会话结束：丢弃计时器并关闭文档，匿名状态下不再保存
    async fn on_signed_out(&mut self) {
        if self.doc_id.is_none() {
            return;
        }
        tracing::debug!(
            target: "texton.autosave",
            file_id = self.doc_id,
            "session ended, dropping pending save"
        );
        self.reset(None, String::new());
        self.editor.set_current_file(None).await;
    }

    /// 从编辑器状态重建（启动或事件丢失后）
    async fn resync(&mut self) {
        let state = self.editor.snapshot().await;
        let current = state.current_file_id();
        if current != self.doc_id {
            let content = state
                .current_file
                .map(|f| f.content)
                .unwrap_or_default();
            self.reset(current, content);
        }
        if self.doc_id.is_some() {
            self.evaluate().await;
        }
    }

    async fn apply_settings(&mut self, settings: &Settings) {
        let was_enabled = self.auto_save;
        self.auto_save = settings.auto_save;
        self.delay = settings.auto_save_delay();
        if !self.auto_save {
            self.deadline = None;
        } else if !was_enabled {
            self.evaluate().await;
        }
    }

    /// 比较缓冲区与快照并更新状态和计时器
    async fn evaluate(&mut self) {
        let (file_id, content) = self.editor.buffer().await;
        if file_id.is_none() || file_id != self.doc_id {
            return;
        }

        if content == self.snapshot {
            self.deadline = None;
            if !self.saving_current() {
                self.editor.set_save_status(SaveStatus::Saved).await;
            }
            return;
        }

        if !self.saving_current() {
            self.editor.set_save_status(SaveStatus::Unsaved).await;
        }
        if self.auto_save {
            self.deadline = Some(Instant::now() + self.delay);
        }
    }

    async fn request_save(&mut self) {
        let (file_id, content) = self.editor.buffer().await;
        let Some(file_id) = file_id.filter(|id| Some(*id) == self.doc_id) else {
            return;
        };
        // 同一文档同时只允许一个保存请求，包括重新加载前发起的那个
        if self.in_flight.contains_key(&file_id) {
            self.follow_up = true;
            return;
        }
        if content == self.snapshot {
            self.editor.set_save_status(SaveStatus::Saved).await;
            return;
        }
        if self.session.access_token().await.is_none() {
            tracing::debug!(target: "texton.autosave", file_id, "signed out, skipping save");
            return;
        }

        self.in_flight.insert(file_id, self.generation);
        self.editor.set_save_status(SaveStatus::Saving).await;
        tracing::debug!(target: "texton.autosave", file_id, bytes = content.len(), "saving");

        let saver = self.saver.clone();
        let done_tx = self.done_tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let result = saver.save_document(file_id, &content).await;
            let _ = done_tx.send(SaveResult {
                generation,
                file_id,
                content,
                result,
            });
        });
    }

    async fn on_save_done(&mut self, done: SaveResult) {
        self.in_flight.remove(&done.file_id);
        if done.generation != self.generation {
            if Some(done.file_id) != self.doc_id {
                tracing::debug!(
                    target: "texton.autosave",
                    file_id = done.file_id,
                    "discarding save result for a closed document"
                );
                return;
            }
            // 文档已重新加载；旧保存写入的内容现在是服务端版本
            if done.result.is_ok() {
                self.snapshot = done.content;
            }
            if std::mem::take(&mut self.follow_up) {
                self.request_save().await;
            } else {
                self.evaluate().await;
            }
            return;
        }

        match done.result {
            Ok(()) => {
                self.snapshot = done.content;
                tracing::debug!(target: "texton.autosave", file_id = done.file_id, "saved");
            }
            Err(err) => {
                let status = if err.is_offline() {
                    SaveStatus::Offline
                } else {
                    SaveStatus::Error
                };
                tracing::warn!(
                    target: "texton.autosave",
                    file_id = done.file_id,
                    status = %status,
                    error = %err,
                    "save failed"
                );
                self.editor.set_save_status(status).await;
                if std::mem::take(&mut self.follow_up) {
                    self.request_save().await;
                }
                return;
            }
        }

        if std::mem::take(&mut self.follow_up) {
            self.request_save().await;
            return;
        }
        let (_, content) = self.editor.buffer().await;
        if content == self.snapshot {
            self.editor.set_save_status(SaveStatus::Saved).await;
            return;
        }
        // 保存期间缓冲区被改回旧内容时没有计时器在等待
        if self.auto_save && self.deadline.is_none() {
            self.deadline = Some(Instant::now() + self.delay);
        }
        self.editor.set_save_status(SaveStatus::Unsaved).await;
    }
}
