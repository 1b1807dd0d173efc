use super::language::{language_label, LanguageOption, LANGUAGES};
use crate::client::models::FileUpdate;
use crate::client::FilesApi;
use crate::editor::{EditorStore, SaveStatus};
use crate::error::WorkspaceError;

/// Bottom bar summary of the open document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub file_name: Option<String>,
    pub language: Option<String>,
    pub lines: usize,
    pub characters: usize,
    pub save_status: SaveStatus,
}

#[derive(Clone)]
pub struct StatusBar {
    api: FilesApi,
    editor: EditorStore,
}

impl StatusBar {
    pub fn new(api: FilesApi, editor: EditorStore) -> Self {
        Self { api, editor }
    }

    pub fn languages(&self) -> &'static [LanguageOption] {
        LANGUAGES
    }

    pub async fn status_line(&self) -> StatusLine {
        let state = self.editor.snapshot().await;
        let file = state.current_file.as_ref();
        StatusLine {
            file_name: file.map(|f| f.name.clone()),
            language: file.map(|f| {
                language_label(&f.language)
                    .map(str::to_string)
                    .unwrap_or_else(|| f.language.clone())
            }),
            lines: line_count(&state.editor_content),
            characters: state.editor_content.chars().count(),
            save_status: state.save_status,
        }
    }

    /// Changes the language of the open file. Only metadata changes; the
    /// live buffer is left alone.
    pub async fn set_language(&self, language: &str) -> Result<(), WorkspaceError> {
        let id = self
            .editor
            .current_file_id()
            .await
            .ok_or(WorkspaceError::NoOpenFile)?;
        let update = FileUpdate {
            language: Some(language.to_string()),
            ..FileUpdate::default()
        };
        let updated = self.api.update(id, &update).await.inspect_err(|err| {
            tracing::error!(target: "texton.workspace", file_id = id, error = %err, "language change failed");
        })?;
        self.editor.set_current_file(Some(updated)).await;
        Ok(())
    }
}

pub fn line_count(text: &str) -> usize {
    text.split('\n').count()
}
