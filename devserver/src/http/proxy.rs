//! `/api` 反向代理

use super::state::DevState;
use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::time::Instant;
use uuid::Uuid;

/// 请求体上限
const MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

const REQUEST_ID: &str = "x-request-id";

/// 删除逐跳头以及 `Connection` 中列出的头
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let listed: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();
    for name in listed {
        headers.remove(name);
    }
    for name in HOP_BY_HOP {
        headers.remove(name);
    }
}

fn bad_gateway(detail: String) -> Response {
    (
        StatusCode::BAD_GATEWAY,
        Json(serde_json::json!({ "detail": detail })),
    )
        .into_response()
}

/// 转发到 `api_target`，保留方法、path、query、请求体和端到端头
pub async fn proxy(State(state): State<DevState>, req: Request) -> Response {
    let (parts, body) = req.into_parts();
    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let url = state.upstream_url(path_and_query);

    let body = match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!(target: "texton.devserver", error = %e, "request body rejected");
            return StatusCode::PAYLOAD_TOO_LARGE.into_response();
        }
    };

    let mut headers = parts.headers;
    strip_hop_by_hop(&mut headers);
    // reqwest derives Host and Content-Length from the target URL and body
    headers.remove(header::HOST);
    headers.remove(header::CONTENT_LENGTH);
    if !headers.contains_key(REQUEST_ID) {
        if let Ok(id) = HeaderValue::from_str(&Uuid::new_v4().to_string()) {
            headers.insert(REQUEST_ID, id);
        }
    }

    let started = Instant::now();
    let upstream = state
        .client
        .request(parts.method.clone(), &url)
        .headers(headers)
        .body(body)
        .send()
        .await;

    let resp = match upstream {
        Ok(resp) => resp,
        Err(e) => {
            tracing::error!(
                target: "texton.devserver",
                method = %parts.method,
                url = %url,
                error = %e,
                "upstream request failed"
            );
            return bad_gateway(format!("upstream unavailable: {e}"));
        }
    };

    let status = resp.status();
    let mut resp_headers = resp.headers().clone();
    strip_hop_by_hop(&mut resp_headers);
    resp_headers.remove(header::CONTENT_LENGTH);

    let bytes = match resp.bytes().await {
        Ok(b) => b,
        Err(e) => {
            tracing::error!(target: "texton.devserver", url = %url, error = %e, "upstream body failed");
            return bad_gateway(format!("upstream body error: {e}"));
        }
    };
    tracing::debug!(
        target: "texton.devserver",
        method = %parts.method,
        url = %url,
        status = status.as_u16(),
        bytes = bytes.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "proxied"
    );

    let mut out = Response::new(Body::from(bytes));
    *out.status_mut() = status;
    *out.headers_mut() = resp_headers;
    out
}
