use super::models::{RestoreVersionRequest, VersionContent, VersionItem};
use super::ApiClient;
use crate::editor::FileContent;
use crate::error::ApiError;
use crate::transport::ApiRequest;

/// `/history/{file_id}/*` endpoints.
#[derive(Clone)]
pub struct HistoryApi {
    client: ApiClient,
}

impl HistoryApi {
    pub(crate) fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn versions(&self, file_id: i64) -> Result<Vec<VersionItem>, ApiError> {
        self.client
            .execute_json(ApiRequest::get(format!("/history/{file_id}/versions")))
            .await
    }

    pub async fn version_content(&self, file_id: i64, version_id: i64) -> Result<String, ApiError> {
        let body: VersionContent = self
            .client
            .execute_json(ApiRequest::get(format!(
                "/history/{file_id}/versions/{version_id}"
            )))
            .await?;
        Ok(body.content)
    }

    pub async fn restore(&self, file_id: i64, version_id: i64) -> Result<FileContent, ApiError> {
        let req = ApiRequest::post(format!("/history/{file_id}/restore"))
            .json(&RestoreVersionRequest { version_id });
        self.client.execute_json(req).await
    }
}
