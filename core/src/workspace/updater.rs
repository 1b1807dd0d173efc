use crate::client::models::CheckUpdateResponse;
use crate::client::SystemApi;
use crate::error::ApiError;

/// Details of an available release.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateInfo {
    pub current_version: Option<String>,
    pub latest_version: Option<String>,
    pub message: Option<String>,
    pub release_notes: Option<String>,
    pub update_url: Option<String>,
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateCheck {
    UpToDate,
    Available(UpdateInfo),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The server updated itself; a manual restart picks up the new build.
    Completed { output: String },
    Failed { message: String },
}

#[derive(Clone)]
pub struct Updater {
    api: SystemApi,
}

impl Updater {
    pub fn new(api: SystemApi) -> Self {
        Self { api }
    }

    pub async fn current_version(&self) -> Result<String, ApiError> {
        Ok(self.api.version().await?.version)
    }

    pub async fn check(&self) -> UpdateCheck {
        match self.api.check_update().await {
            Ok(resp) => classify_check(resp),
            Err(err) => {
                tracing::error!(target: "texton.update", error = %err, "update check failed");
                UpdateCheck::Failed("检查更新失败，请检查网络连接".to_string())
            }
        }
    }

    pub async fn perform(&self) -> UpdateOutcome {
        let resp = match self.api.perform_update().await {
            Ok(resp) => resp,
            Err(err) => {
                tracing::error!(target: "texton.update", error = %err, "update failed");
                return UpdateOutcome::Failed {
                    message: "更新失败，请手动更新".to_string(),
                };
            }
        };
        let output = resp.output.unwrap_or_default();
        if resp.success || pull_succeeded(&output) {
            tracing::info!(target: "texton.update", "update completed");
            return UpdateOutcome::Completed { output };
        }
        UpdateOutcome::Failed {
            message: resp
                .error
                .or(resp.message)
                .unwrap_or_else(|| "未知错误".to_string()),
        }
    }
}

fn classify_check(resp: CheckUpdateResponse) -> UpdateCheck {
    if let Some(error) = resp.error.filter(|e| !e.is_empty()) {
        return UpdateCheck::Failed(error);
    }
    if !resp.has_update {
        return UpdateCheck::UpToDate;
    }
    UpdateCheck::Available(UpdateInfo {
        current_version: resp.current_version,
        latest_version: resp.latest_version,
        message: resp.message,
        release_notes: resp.release_notes,
        update_url: resp.update_url,
        kind: resp.kind,
    })
}

// git pull reports a non-zero status on some hosts even when it fetched.
fn pull_succeeded(output: &str) -> bool {
    output.contains("->") || output.contains("Already up to date")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ApiClient;
    use crate::error::TransportErrorKind;
    use crate::session::SessionStore;
    use crate::transport::fake::FakeTransport;
    use crate::transport::Method;
    use std::sync::Arc;

    fn updater(fake: Arc<FakeTransport>) -> Updater {
        Updater::new(ApiClient::new(fake, SessionStore::in_memory()).system())
    }

    #[tokio::test]
    async fn check_reports_available_release() {
        let fake = Arc::new(FakeTransport::new());
        fake.reply(
            Method::Get,
            "/check-update",
            200,
            r#"{"has_update":true,"current_version":"1.0.0","latest_version":"1.1.0","type":"git"}"#,
        );
        let UpdateCheck::Available(info) = updater(fake).check().await else {
            panic!("expected an update");
        };
        assert_eq!(info.latest_version.as_deref(), Some("1.1.0"));
        assert_eq!(info.kind.as_deref(), Some("git"));
    }

    #[tokio::test]
    async fn check_error_field_wins() {
        let fake = Arc::new(FakeTransport::new());
        fake.reply(
            Method::Get,
            "/check-update",
            200,
            r#"{"has_update":true,"error":"rate limited"}"#,
        );
        assert_eq!(
            updater(fake).check().await,
            UpdateCheck::Failed("rate limited".to_string())
        );
    }

    #[tokio::test]
    async fn check_up_to_date_and_offline() {
        let fake = Arc::new(FakeTransport::new());
        fake.reply(Method::Get, "/check-update", 200, r#"{"has_update":false}"#);
        assert_eq!(updater(fake).check().await, UpdateCheck::UpToDate);

        let fake = Arc::new(FakeTransport::new());
        fake.fail(Method::Get, "/check-update", TransportErrorKind::Connect);
        assert!(matches!(updater(fake).check().await, UpdateCheck::Failed(_)));
    }

    #[tokio::test]
    async fn pull_output_counts_as_success() {
        let fake = Arc::new(FakeTransport::new());
        fake.reply(
            Method::Post,
            "/update",
            200,
            r#"{"success":false,"output":"   a1b2..c3d4  main -> origin/main","error":"exit 1"}"#,
        );
        assert!(matches!(
            updater(fake).perform().await,
            UpdateOutcome::Completed { .. }
        ));
    }

    #[tokio::test]
    async fn failed_update_prefers_error_text() {
        let fake = Arc::new(FakeTransport::new());
        fake.reply(
            Method::Post,
            "/update",
            200,
            r#"{"success":false,"output":"fatal: not a git repository","error":"git failed","message":"m"}"#,
        );
        assert_eq!(
            updater(fake).perform().await,
            UpdateOutcome::Failed {
                message: "git failed".to_string()
            }
        );
    }

    #[tokio::test]
    async fn current_version_reads_version_endpoint() {
        let fake = Arc::new(FakeTransport::new());
        fake.reply(Method::Get, "/version", 200, r#"{"version":"2.3.1","buildTime":"x"}"#);
        assert_eq!(updater(fake).current_version().await.unwrap(), "2.3.1");
    }
}
