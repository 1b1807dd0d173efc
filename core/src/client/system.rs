use super::models::{CheckUpdateResponse, HealthResponse, UpdateResponse, VersionInfo};
use super::ApiClient;
use crate::error::ApiError;
use crate::transport::ApiRequest;

/// Health, version and self-update endpoints.
#[derive(Clone)]
pub struct SystemApi {
    client: ApiClient,
}

impl SystemApi {
    pub(crate) fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn health(&self) -> Result<HealthResponse, ApiError> {
        self.client.execute_json(ApiRequest::get("/health")).await
    }

    pub async fn version(&self) -> Result<VersionInfo, ApiError> {
        self.client.execute_json(ApiRequest::get("/version")).await
    }

    pub async fn check_update(&self) -> Result<CheckUpdateResponse, ApiError> {
        self.client
            .execute_json(ApiRequest::get("/check-update"))
            .await
    }

    pub async fn perform_update(&self) -> Result<UpdateResponse, ApiError> {
        self.client.execute_json(ApiRequest::post("/update")).await
    }
}
