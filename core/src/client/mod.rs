//! Session-aware API client.
//!
//! Every request goes through [`ApiClient::execute`], which attaches the
//! current access token and runs the refresh sub-protocol: one `/auth/refresh`
//! on a 401, one retry, and a forced logout when that does not help.

pub mod auth;
pub mod files;
pub mod history;
pub mod models;
pub mod system;

pub use auth::AuthApi;
pub use files::{ExportedFile, FilesApi};
pub use history::HistoryApi;
pub use system::SystemApi;

use crate::error::ApiError;
use crate::session::SessionStore;
use crate::transport::{ApiRequest, ApiResponse, Credentials, Transport};
use models::{RefreshRequest, RefreshResponse};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

const REFRESH_PATH: &str = "/auth/refresh";

#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    transport: Arc<dyn Transport>,
    session: SessionStore,
    // Serializes refreshes so concurrent 401s share one call.
    refresh_lock: Mutex<()>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, session: SessionStore) -> Self {
        Self {
            inner: Arc::new(ApiClientInner {
                transport,
                session,
                refresh_lock: Mutex::new(()),
            }),
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    pub fn transport_name(&self) -> &str {
        self.inner.transport.name()
    }

    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.clone())
    }

    pub fn files(&self) -> FilesApi {
        FilesApi::new(self.clone())
    }

    pub fn history(&self) -> HistoryApi {
        HistoryApi::new(self.clone())
    }

    pub fn system(&self) -> SystemApi {
        SystemApi::new(self.clone())
    }

    /// Sends `req` and maps non-2xx responses to [`ApiError::Status`].
    pub async fn execute(&self, mut req: ApiRequest) -> Result<ApiResponse, ApiError> {
        if req.credentials == Credentials::Anonymous {
            req.bearer = None;
            return self.send_once(&req).await?.error_for_status();
        }

        let token = self.inner.session.access_token().await;
        req.bearer = token.clone();
        let resp = self.send_once(&req).await?;
        if resp.status != 401 || req.credentials == Credentials::SessionNoRefresh {
            return resp.error_for_status();
        }

        tracing::debug!(
            target: "texton.api",
            method = %req.method,
            path = %req.path,
            "unauthorized, refreshing access token"
        );
        let fresh = self.refresh(token).await?;
        req.bearer = Some(fresh);
        let retried = self.send_once(&req).await?;
        if retried.status == 401 {
            tracing::warn!(
                target: "texton.api",
                path = %req.path,
                "still unauthorized after refresh, signing out"
            );
            self.inner.session.logout().await;
            return Err(ApiError::SessionExpired);
        }
        retried.error_for_status()
    }

    pub async fn execute_json<T: DeserializeOwned>(&self, req: ApiRequest) -> Result<T, ApiError> {
        self.execute(req).await?.json()
    }

    pub async fn execute_unit(&self, req: ApiRequest) -> Result<(), ApiError> {
        self.execute(req).await.map(|_| ())
    }

    async fn send_once(&self, req: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let started = Instant::now();
        match self.inner.transport.send(req).await {
            Ok(resp) => {
                tracing::debug!(
                    target: "texton.api",
                    method = %req.method,
                    path = %req.path,
                    status = resp.status,
                    elapsed_ms = started.elapsed().as_millis() as u64
                );
                Ok(resp)
            }
            Err(err) => {
                tracing::warn!(
                    target: "texton.api",
                    method = %req.method,
                    path = %req.path,
                    kind = %err.kind(),
                    error = %err
                );
                Err(err.into())
            }
        }
    }

    /// Returns a usable access token, refreshing at most once per stale token.
    /// Any failure signs the session out.
    async fn refresh(&self, stale: Option<String>) -> Result<String, ApiError> {
        let _guard = self.inner.refresh_lock.lock().await;
        let session = &self.inner.session;

        if let Some(current) = session.access_token().await {
            if Some(&current) != stale.as_ref() {
                return Ok(current);
            }
        }

        let Some(refresh_token) = session.refresh_token().await else {
            tracing::info!(target: "texton.api", "no refresh token, signing out");
            session.logout().await;
            return Err(ApiError::SessionExpired);
        };

        let req = ApiRequest::post(REFRESH_PATH)
            .anonymous()
            .json(&RefreshRequest {
                refresh_token: &refresh_token,
            });
        let result = match self.send_once(&req).await {
            Ok(resp) => resp
                .error_for_status()
                .and_then(|r| r.json::<RefreshResponse>()),
            Err(err) => Err(err),
        };

        let access_token = match result {
            Ok(body) if !body.access_token.is_empty() => body.access_token,
            Ok(_) => {
                tracing::warn!(target: "texton.api", "refresh returned an empty token, signing out");
                session.logout().await;
                return Err(ApiError::SessionExpired);
            }
            Err(err) => {
                tracing::warn!(target: "texton.api", error = %err, "token refresh failed, signing out");
                session.logout().await;
                return Err(ApiError::SessionExpired);
            }
        };

        if session.replace_access_token(access_token.clone()).await.is_err() {
            // Signed out while the refresh was in flight.
            return Err(ApiError::SessionExpired);
        }
        Ok(access_token)
    }
}
