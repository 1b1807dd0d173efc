//! 代理共享状态

use chrono::{DateTime, Local};
use std::sync::Arc;
use std::time::Duration;

/// 在所有 handler 间共享
#[derive(Clone)]
pub struct DevState {
    pub client: reqwest::Client,
    /// 上游地址，不含 `/api` 后缀
    pub api_target: Arc<str>,
    pub started_at: DateTime<Local>,
}

impl DevState {
    pub fn new(api_target: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self {
            client,
            api_target: Arc::from(api_target.trim_end_matches('/')),
            started_at: Local::now(),
        })
    }

    /// 上游 URL：目标地址 + 原始 path 与 query
    pub fn upstream_url(&self, path_and_query: &str) -> String {
        format!("{}{}", self.api_target, path_and_query)
    }
}
