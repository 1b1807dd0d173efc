use super::language::language_for;
use crate::client::models::{FileCreate, FileUpdate, ImportRequest, ImportSummary};
use crate::client::{ExportedFile, FilesApi};
use crate::editor::{EditorStore, FileContent, FileItem};
use crate::error::WorkspaceError;
use chrono::Utc;

/// Sidebar actions over the file list and the open document.
///
/// Failed calls leave the stores untouched and are logged under
/// `texton.workspace`.
#[derive(Clone)]
pub struct FileBrowser {
    api: FilesApi,
    editor: EditorStore,
}

impl FileBrowser {
    pub fn new(api: FilesApi, editor: EditorStore) -> Self {
        Self { api, editor }
    }

    pub async fn refresh(&self) -> Result<Vec<FileItem>, WorkspaceError> {
        let files = self.api.list(false).await.inspect_err(|err| log_failure("list", err))?;
        self.editor.set_files(files.clone()).await;
        Ok(files)
    }

    /// Case-insensitive name filter over the loaded list.
    pub async fn filtered(&self, query: &str) -> Vec<FileItem> {
        let files = self.editor.files().await;
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return files;
        }
        files
            .into_iter()
            .filter(|f| f.name.to_lowercase().contains(&query))
            .collect()
    }

    pub async fn open(&self, id: i64) -> Result<FileContent, WorkspaceError> {
        let file = self.api.get(id).await.inspect_err(|err| log_failure("open", err))?;
        self.editor.set_current_file(Some(file.clone())).await;
        Ok(file)
    }

    pub async fn create(&self, name: &str) -> Result<FileContent, WorkspaceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(WorkspaceError::EmptyName);
        }
        let request = FileCreate {
            name: name.to_string(),
            path: format!("/{name}"),
            content: String::new(),
            language: language_for(name).to_string(),
        };
        let created = self
            .api
            .create(&request)
            .await
            .inspect_err(|err| log_failure("create", err))?;
        tracing::info!(target: "texton.workspace", file_id = created.id, "file created");
        self.refresh_quietly().await;
        self.editor.set_current_file(Some(created.clone())).await;
        Ok(created)
    }

    /// Renames a file and replaces the last segment of its path.
    pub async fn rename(&self, id: i64, new_name: &str) -> Result<(), WorkspaceError> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(WorkspaceError::EmptyName);
        }
        let item = self.find(id).await?;
        let update = FileUpdate {
            name: Some(new_name.to_string()),
            path: Some(renamed_path(&item.path, new_name)),
            language: None,
        };
        self.api
            .update(id, &update)
            .await
            .inspect_err(|err| log_failure("rename", err))?;
        self.refresh_quietly().await;

        if self.editor.current_file_id().await == Some(id) {
            // Same id: metadata only, the live buffer stays.
            let file = self.api.get(id).await?;
            self.editor.set_current_file(Some(file)).await;
        }
        Ok(())
    }

    pub async fn duplicate(&self, id: i64) -> Result<FileContent, WorkspaceError> {
        let copy = self
            .api
            .duplicate(id)
            .await
            .inspect_err(|err| log_failure("duplicate", err))?;
        self.refresh_quietly().await;
        self.editor.set_current_file(Some(copy.clone())).await;
        Ok(copy)
    }

    /// Moves a file to the trash, closing it when it is open.
    pub async fn delete(&self, id: i64) -> Result<(), WorkspaceError> {
        self.api
            .delete(id, false)
            .await
            .inspect_err(|err| log_failure("delete", err))?;
        self.close_if_current(id).await;
        self.refresh_quietly().await;
        Ok(())
    }

    pub async fn trash(&self) -> Result<Vec<FileItem>, WorkspaceError> {
        Ok(self
            .api
            .list_trash()
            .await
            .inspect_err(|err| log_failure("trash", err))?)
    }

    pub async fn restore_deleted(&self, id: i64) -> Result<(), WorkspaceError> {
        self.api
            .restore(id)
            .await
            .inspect_err(|err| log_failure("restore", err))?;
        self.refresh_quietly().await;
        Ok(())
    }

    /// Deletes a file for good.
    pub async fn purge(&self, id: i64) -> Result<(), WorkspaceError> {
        self.api
            .delete(id, true)
            .await
            .inspect_err(|err| log_failure("purge", err))?;
        self.close_if_current(id).await;
        self.refresh_quietly().await;
        Ok(())
    }

    pub async fn export(&self, id: i64) -> Result<ExportedFile, WorkspaceError> {
        let filename = match self.editor.files().await.into_iter().find(|f| f.id == id) {
            Some(item) => item.name,
            None => self.api.get(id).await?.name,
        };
        let bytes = self
            .api
            .export(id)
            .await
            .inspect_err(|err| log_failure("export", err))?;
        Ok(ExportedFile { filename, bytes })
    }

    /// ZIP of every file; encrypted when a non-empty password is given.
    pub async fn export_all(&self, password: Option<&str>) -> Result<ExportedFile, WorkspaceError> {
        let bytes = self
            .api
            .export_all(password)
            .await
            .inspect_err(|err| log_failure("export_all", err))?;
        Ok(ExportedFile {
            filename: backup_filename(),
            bytes,
        })
    }

    /// Imports a `{"files": [...]}` document.
    pub async fn import(&self, json: &str) -> Result<ImportSummary, WorkspaceError> {
        let request: ImportRequest =
            serde_json::from_str(json).map_err(WorkspaceError::InvalidImport)?;
        let summary = self
            .api
            .import(&request)
            .await
            .inspect_err(|err| log_failure("import", err))?;
        tracing::info!(
            target: "texton.workspace",
            imported = summary.imported,
            skipped = summary.skipped,
            "import finished"
        );
        self.refresh_quietly().await;
        Ok(summary)
    }

    /// Moves `from_id` to the position of `to_id`. The new order is shown
    /// immediately and reloaded from the server if saving it fails.
    pub async fn reorder(&self, from_id: i64, to_id: i64) -> Result<(), WorkspaceError> {
        let mut files = self.editor.files().await;
        let (Some(from), Some(to)) = (
            files.iter().position(|f| f.id == from_id),
            files.iter().position(|f| f.id == to_id),
        ) else {
            return Ok(());
        };
        if from == to {
            return Ok(());
        }
        let moved = files.remove(from);
        files.insert(to, moved);
        let ids: Vec<i64> = files.iter().map(|f| f.id).collect();
        self.editor.set_files(files).await;

        if let Err(err) = self.api.reorder(&ids).await {
            log_failure("reorder", &err);
            self.refresh_quietly().await;
            return Err(err.into());
        }
        Ok(())
    }

    async fn find(&self, id: i64) -> Result<FileItem, WorkspaceError> {
        self.editor
            .files()
            .await
            .into_iter()
            .find(|f| f.id == id)
            .ok_or(WorkspaceError::UnknownFile(id))
    }

    async fn close_if_current(&self, id: i64) {
        if self.editor.current_file_id().await == Some(id) {
            self.editor.set_current_file(None).await;
        }
    }

    async fn refresh_quietly(&self) {
        let _ = self.refresh().await;
    }
}

fn log_failure(action: &str, err: &crate::error::ApiError) {
    tracing::error!(target: "texton.workspace", action, error = %err, "file operation failed");
}

fn renamed_path(path: &str, new_name: &str) -> String {
    match path.rsplit_once('/') {
        Some((dir, _)) => format!("{dir}/{new_name}"),
        None => new_name.to_string(),
    }
}

fn backup_filename() -> String {
    format!("texton-backup-{}.zip", Utc::now().format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ApiClient;
    use crate::session::SessionStore;
    use crate::transport::fake::FakeTransport;
    use crate::transport::Method;
    use std::sync::Arc;

    const LIST: &str = r#"[
        {"id":1,"name":"a.txt","path":"/a.txt","language":"plaintext","is_deleted":false,"sort_order":0,"updated_at":"2024-01-01T00:00:00"},
        {"id":2,"name":"Notes.md","path":"/docs/Notes.md","language":"markdown","is_deleted":false,"sort_order":1,"updated_at":"2024-01-01T00:00:00"},
        {"id":3,"name":"main.rs","path":"/main.rs","language":"rust","is_deleted":false,"sort_order":2,"updated_at":"2024-01-01T00:00:00"}
    ]"#;

    fn file_json(id: i64, name: &str, content: &str) -> String {
        serde_json::json!({
            "id": id, "name": name, "path": format!("/{name}"), "content": content,
            "language": "plaintext", "encoding": "utf-8", "is_deleted": false,
            "created_at": "2024-01-01T00:00:00", "updated_at": "2024-01-01T00:00:00"
        })
        .to_string()
    }

    async fn browser(fake: Arc<FakeTransport>) -> (FileBrowser, EditorStore) {
        fake.reply(Method::Get, "/files", 200, LIST);
        let client = ApiClient::new(fake, SessionStore::in_memory());
        let editor = EditorStore::new();
        let browser = FileBrowser::new(client.files(), editor.clone());
        browser.refresh().await.unwrap();
        (browser, editor)
    }

    #[tokio::test]
    async fn filter_is_case_insensitive() {
        let (browser, _) = browser(Arc::new(FakeTransport::new())).await;
        let hits = browser.filtered("notes").await;
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 2);
        assert_eq!(browser.filtered("  ").await.len(), 3);
    }

    #[tokio::test]
    async fn create_derives_path_and_language() {
        let fake = Arc::new(FakeTransport::new());
        fake.reply(Method::Post, "/files", 200, &file_json(9, "lib.py", ""));
        let (browser, editor) = browser(fake.clone()).await;

        browser.create("lib.py").await.unwrap();

        let body = fake
            .requests()
            .into_iter()
            .find(|r| r.method == Method::Post)
            .and_then(|r| r.body)
            .unwrap();
        assert_eq!(body["path"], "/lib.py");
        assert_eq!(body["language"], "python");
        assert_eq!(editor.current_file_id().await, Some(9));
        assert!(matches!(
            browser.create("   ").await,
            Err(WorkspaceError::EmptyName)
        ));
    }

    #[tokio::test]
    async fn rename_replaces_last_segment_and_keeps_buffer() {
        let fake = Arc::new(FakeTransport::new());
        fake.reply(Method::Get, "/files/2", 200, &file_json(2, "Notes.md", "server"));
        fake.reply(Method::Put, "/files/2", 200, &file_json(2, "Todo.md", "server"));
        let (browser, editor) = browser(fake.clone()).await;
        browser.open(2).await.unwrap();
        editor.set_editor_content("typing").await;

        browser.rename(2, "Todo.md").await.unwrap();

        let put = fake
            .requests()
            .into_iter()
            .find(|r| r.method == Method::Put)
            .unwrap();
        assert_eq!(put.body.unwrap()["path"], "/docs/Todo.md");
        assert_eq!(editor.editor_content().await, "typing");
    }

    #[tokio::test]
    async fn delete_closes_current_file() {
        let fake = Arc::new(FakeTransport::new());
        fake.reply(Method::Get, "/files/1", 200, &file_json(1, "a.txt", "x"));
        fake.reply(Method::Delete, "/files/1", 200, r#"{"message":"删除成功"}"#);
        let (browser, editor) = browser(fake).await;
        browser.open(1).await.unwrap();

        browser.delete(1).await.unwrap();
        assert_eq!(editor.current_file_id().await, None);
    }

    #[tokio::test]
    async fn failed_delete_leaves_state() {
        let fake = Arc::new(FakeTransport::new());
        fake.reply(Method::Get, "/files/1", 200, &file_json(1, "a.txt", "x"));
        fake.reply(Method::Delete, "/files/1", 404, r#"{"detail":"文件不存在"}"#);
        let (browser, editor) = browser(fake).await;
        browser.open(1).await.unwrap();

        let err = browser.delete(1).await.unwrap_err();
        assert!(matches!(err, WorkspaceError::Api(ref e) if e.is_not_found()));
        assert_eq!(editor.current_file_id().await, Some(1));
    }

    #[tokio::test]
    async fn reorder_moves_item_and_reloads_on_failure() {
        let fake = Arc::new(FakeTransport::new());
        fake.reply(Method::Post, "/files/reorder", 200, r#"{"message":"排序成功"}"#)
            .reply(Method::Post, "/files/reorder", 500, "boom");
        let (browser, editor) = browser(fake.clone()).await;

        browser.reorder(3, 1).await.unwrap();
        let ids: Vec<i64> = editor.files().await.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        let sent = fake
            .requests()
            .into_iter()
            .find(|r| r.path == "/files/reorder")
            .unwrap();
        assert_eq!(sent.body.unwrap()["file_ids"], serde_json::json!([3, 1, 2]));

        assert!(browser.reorder(1, 2).await.is_err());
        let ids: Vec<i64> = editor.files().await.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn import_rejects_malformed_json() {
        let fake = Arc::new(FakeTransport::new());
        fake.reply(Method::Post, "/files/import", 200, r#"{"imported":2,"skipped":1}"#);
        let (browser, _) = browser(fake.clone()).await;

        assert!(matches!(
            browser.import("not json").await,
            Err(WorkspaceError::InvalidImport(_))
        ));
        let summary = browser
            .import(r#"{"files":[{"name":"a","content":"1"},{"name":"b","path":"/b","content":""},{"name":"c"}]}"#)
            .await
            .unwrap();
        assert_eq!(summary, ImportSummary { imported: 2, skipped: 1 });
    }

    #[tokio::test]
    async fn export_uses_file_name() {
        let fake = Arc::new(FakeTransport::new());
        fake.reply(Method::Get, "/files/3/export", 200, "fn main() {}");
        fake.reply(Method::Get, "/files/export-all", 200, "PK");
        let (browser, _) = browser(fake).await;

        let out = browser.export(3).await.unwrap();
        assert_eq!(out.filename, "main.rs");
        assert_eq!(out.bytes, b"fn main() {}");

        let all = browser.export_all(Some("pw")).await.unwrap();
        assert!(all.filename.starts_with("texton-backup-"));
        assert!(all.filename.ends_with(".zip"));
    }

    #[test]
    fn renamed_path_keeps_directory() {
        assert_eq!(renamed_path("/a/b/old.txt", "new.txt"), "/a/b/new.txt");
        assert_eq!(renamed_path("/old.txt", "new.txt"), "/new.txt");
        assert_eq!(renamed_path("old.txt", "new.txt"), "new.txt");
    }
}
