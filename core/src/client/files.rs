use super::models::{
    FileCreate, FileSave, FileUpdate, ImportRequest, ImportSummary, ReorderRequest,
};
use super::ApiClient;
use crate::autosave::DocumentSaver;
use crate::editor::{FileContent, FileItem};
use crate::error::ApiError;
use crate::transport::ApiRequest;
use async_trait::async_trait;

/// Downloaded file or archive, ready to be written by the front-end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// `/files/*` endpoints.
#[derive(Clone)]
pub struct FilesApi {
    client: ApiClient,
}

impl FilesApi {
    pub(crate) fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, include_deleted: bool) -> Result<Vec<FileItem>, ApiError> {
        let req = ApiRequest::get("/files").query("include_deleted", include_deleted);
        self.client.execute_json(req).await
    }

    pub async fn list_trash(&self) -> Result<Vec<FileItem>, ApiError> {
        self.client.execute_json(ApiRequest::get("/files/trash")).await
    }

    pub async fn get(&self, id: i64) -> Result<FileContent, ApiError> {
        self.client
            .execute_json(ApiRequest::get(format!("/files/{id}")))
            .await
    }

    pub async fn create(&self, file: &FileCreate) -> Result<FileContent, ApiError> {
        self.client
            .execute_json(ApiRequest::post("/files").json(file))
            .await
    }

    pub async fn update(&self, id: i64, update: &FileUpdate) -> Result<FileContent, ApiError> {
        self.client
            .execute_json(ApiRequest::put(format!("/files/{id}")).json(update))
            .await
    }

    pub async fn save(
        &self,
        id: i64,
        content: &str,
        create_snapshot: bool,
    ) -> Result<FileContent, ApiError> {
        let req = ApiRequest::post(format!("/files/{id}/save")).json(&FileSave {
            content,
            create_snapshot,
        });
        self.client.execute_json(req).await
    }

    /// Soft delete moves the file to the trash; `permanent` removes it.
    pub async fn delete(&self, id: i64, permanent: bool) -> Result<(), ApiError> {
        let req = ApiRequest::delete(format!("/files/{id}")).query("permanent", permanent);
        self.client.execute_unit(req).await
    }

    pub async fn restore(&self, id: i64) -> Result<(), ApiError> {
        self.client
            .execute_unit(ApiRequest::post(format!("/files/{id}/restore")))
            .await
    }

    pub async fn duplicate(&self, id: i64) -> Result<FileContent, ApiError> {
        self.client
            .execute_json(ApiRequest::post(format!("/files/{id}/duplicate")))
            .await
    }

    pub async fn export(&self, id: i64) -> Result<Vec<u8>, ApiError> {
        let resp = self
            .client
            .execute(ApiRequest::get(format!("/files/{id}/export")))
            .await?;
        Ok(resp.body)
    }

    /// ZIP archive of every live file; encrypted when `password` is non-empty.
    pub async fn export_all(&self, password: Option<&str>) -> Result<Vec<u8>, ApiError> {
        let mut req = ApiRequest::get("/files/export-all");
        if let Some(password) = password.filter(|p| !p.is_empty()) {
            req = req.query("password", password);
        }
        Ok(self.client.execute(req).await?.body)
    }

    pub async fn import(&self, request: &ImportRequest) -> Result<ImportSummary, ApiError> {
        self.client
            .execute_json(ApiRequest::post("/files/import").json(request))
            .await
    }

    pub async fn reorder(&self, file_ids: &[i64]) -> Result<(), ApiError> {
        self.client
            .execute_unit(ApiRequest::post("/files/reorder").json(&ReorderRequest { file_ids }))
            .await
    }
}

#[async_trait]
impl DocumentSaver for FilesApi {
    async fn save_document(&self, file_id: i64, content: &str) -> Result<(), ApiError> {
        self.save(file_id, content, false).await.map(|_| ())
    }
}
