use anyhow::Result;
use std::sync::Arc;

use texton_core::api::{open_storage, AppConfig, AppContext, Transport};

use crate::transport::HttpTransport;

pub fn build_transport(cfg: &AppConfig) -> Result<Arc<dyn Transport>> {
    let transport = HttpTransport::new(&cfg.api.base_url, cfg.api.timeout_ms)?;
    tracing::debug!(
        target: "texton.factory",
        base_url = %transport.base_url(),
        timeout_ms = cfg.api.timeout_ms,
        "http transport ready"
    );
    Ok(Arc::new(transport))
}

/// Context backed by the configured storage directory and the HTTP transport.
pub fn build_context(cfg: AppConfig) -> Result<AppContext> {
    let storage = open_storage(&cfg)?;
    let transport = build_transport(&cfg)?;
    Ok(AppContext::new(cfg, storage, transport))
}
