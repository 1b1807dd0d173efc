use super::types::{ApiRequest, ApiResponse};
use crate::error::TransportError;
use async_trait::async_trait;

/// Sends one request to the TextOn server. Implementations resolve `path`
/// against their base URL and attach `bearer` when present; they never retry.
#[async_trait]
pub trait Transport: Send + Sync {
    fn name(&self) -> &str;
    async fn send(&self, req: &ApiRequest) -> Result<ApiResponse, TransportError>;
}
