use crate::client::models::VersionItem;
use crate::client::HistoryApi;
use crate::editor::EditorStore;
use crate::error::WorkspaceError;
use std::collections::HashSet;

/// Line-level change counts between two texts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffStats {
    pub added: usize,
    pub removed: usize,
}

impl DiffStats {
    /// Set-based comparison: a line of `new` counts as added when no line of
    /// `old` has the same text, and vice versa. Repeated lines count each time.
    pub fn between(old: &str, new: &str) -> Self {
        let old_lines: HashSet<&str> = old.split('\n').collect();
        let new_lines: HashSet<&str> = new.split('\n').collect();
        DiffStats {
            added: new.split('\n').filter(|l| !old_lines.contains(l)).count(),
            removed: old.split('\n').filter(|l| !new_lines.contains(l)).count(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added == 0 && self.removed == 0
    }
}

/// A stored version next to the live buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionComparison {
    pub version_id: i64,
    pub content: String,
    /// Changes from the version to the current buffer.
    pub stats: DiffStats,
}

#[derive(Clone)]
pub struct HistoryBrowser {
    api: HistoryApi,
    editor: EditorStore,
}

impl HistoryBrowser {
    pub fn new(api: HistoryApi, editor: EditorStore) -> Self {
        Self { api, editor }
    }

    pub async fn versions(&self) -> Result<Vec<VersionItem>, WorkspaceError> {
        let file_id = self.current_id().await?;
        Ok(self.api.versions(file_id).await.inspect_err(|err| {
            tracing::error!(target: "texton.workspace", file_id, error = %err, "loading versions failed");
        })?)
    }

    pub async fn compare(&self, version_id: i64) -> Result<VersionComparison, WorkspaceError> {
        let file_id = self.current_id().await?;
        let content = self.api.version_content(file_id, version_id).await?;
        let current = self.editor.editor_content().await;
        let stats = DiffStats::between(&content, &current);
        Ok(VersionComparison {
            version_id,
            content,
            stats,
        })
    }

    /// Restores a version server-side, replaces the buffer with it and closes
    /// the history panel.
    pub async fn restore(&self, version_id: i64) -> Result<(), WorkspaceError> {
        let file_id = self.current_id().await?;
        let file = self
            .api
            .restore(file_id, version_id)
            .await
            .inspect_err(|err| {
                tracing::error!(target: "texton.workspace", file_id, version_id, error = %err, "restore failed");
            })?;
        tracing::info!(target: "texton.workspace", file_id, version_id, "version restored");
        self.editor.reload_current(file).await;
        self.editor.set_history_open(false).await;
        Ok(())
    }

    async fn current_id(&self) -> Result<i64, WorkspaceError> {
        self.editor
            .current_file_id()
            .await
            .ok_or(WorkspaceError::NoOpenFile)
    }
}
