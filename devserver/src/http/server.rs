//! HTTP服务器生命周期管理

use super::{
    middleware::{create_middleware_stack, create_trace_layer, request_logger},
    proxy::proxy,
    DevState,
};
use crate::error::DevServerError;
use axum::{middleware, routing::any, Router};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use texton_core::api::DevServerConfig;
use tokio::signal;
use tower_http::services::{ServeDir, ServeFile};
use tracing::{info, warn};

/// `/api` 走代理，其余路径读静态目录，找不到时回退到 `index.html`
pub fn build_router(state: DevState, static_dir: &Path, timeout: Duration) -> Router {
    let assets = ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .route("/api", any(proxy))
        .route("/api/*path", any(proxy))
        .with_state(state)
        .fallback_service(assets)
        .layer(middleware::from_fn(request_logger))
        .layer(create_middleware_stack(timeout))
        .layer(create_trace_layer())
}

/// 启动开发服务器，直到收到 Ctrl-C 或 SIGTERM
pub async fn serve(cfg: &DevServerConfig) -> Result<(), DevServerError> {
    let port = cfg.effective_port();
    let addr: SocketAddr = format!("{}:{}", cfg.host, port)
        .parse()
        .map_err(|e| DevServerError::Config(format!("invalid listen address {}: {e}", cfg.host)))?;

    let static_dir = Path::new(&cfg.static_dir);
    if !static_dir.join("index.html").is_file() {
        warn!(
            target: "texton.devserver",
            static_dir = %static_dir.display(),
            "index.html not found, UI routes will return 404"
        );
    }

    let timeout = Duration::from_secs(cfg.request_timeout_secs.max(1));
    let state = DevState::new(&cfg.api_target, timeout)?;
    let app = build_router(state.clone(), static_dir, timeout);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| DevServerError::Bind {
            addr: addr.to_string(),
            source,
        })?;
    info!(
        target: "texton.devserver",
        addr = %addr,
        api_target = %state.api_target,
        started_at = %state.started_at.to_rfc3339(),
        "dev server listening on http://{addr}"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::select! {
                _ = signal::ctrl_c() => info!(target: "texton.devserver", "Received Ctrl+C signal"),
                _ = wait_for_sigterm() => info!(target: "texton.devserver", "Received SIGTERM signal"),
            }
            info!(target: "texton.devserver", "Starting graceful shutdown...");
        })
        .await?;

    info!(target: "texton.devserver", "Server shutdown complete");
    Ok(())
}

#[cfg(unix)]
async fn wait_for_sigterm() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            warn!(target: "texton.devserver", error = %e, "SIGTERM handler unavailable");
            std::future::pending::<()>().await
        }
    }
}

/// Windows 不支持 SIGTERM，只等待 Ctrl+C
#[cfg(not(unix))]
async fn wait_for_sigterm() {
    std::future::pending::<()>().await
}
