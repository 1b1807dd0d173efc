use async_trait::async_trait;
use std::time::{Duration, Instant};
use texton_core::api::{ApiRequest, ApiResponse, Method, Transport, TransportError, TransportErrorKind};

fn kind_of(err: &reqwest::Error) -> TransportErrorKind {
    if err.is_timeout() {
        TransportErrorKind::Timeout
    } else if err.is_connect() {
        TransportErrorKind::Connect
    } else if err.is_request() {
        TransportErrorKind::Request
    } else if err.is_body() {
        TransportErrorKind::Body
    } else if err.is_decode() {
        TransportErrorKind::Decode
    } else {
        TransportErrorKind::Unknown
    }
}

fn from_reqwest(err: reqwest::Error, url: &str) -> TransportError {
    TransportError::new(kind_of(&err), url, err.to_string())
}

/// [`Transport`] over `reqwest`; paths are resolved against `base_url`
/// (which carries the `/api` prefix).
#[derive(Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout_ms: u64) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn method(m: Method) -> reqwest::Method {
    match m {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &str {
        "http"
    }

    async fn send(&self, req: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = self.url_for(&req.path);
        let mut builder = self.http.request(method(req.method), &url);
        if !req.query.is_empty() {
            builder = builder.query(&req.query);
        }
        if let Some(body) = &req.body {
            builder = builder.json(body);
        }
        if let Some(token) = req.bearer.as_deref().filter(|t| !t.is_empty()) {
            builder = builder.bearer_auth(token);
        }

        let started = Instant::now();
        let resp = builder.send().await.map_err(|err| from_reqwest(err, &url))?;
        let status = resp.status().as_u16();
        let body = resp
            .bytes()
            .await
            .map_err(|err| from_reqwest(err, &url))?;
        tracing::trace!(
            target: "texton.http",
            url = %url,
            status,
            bytes = body.len(),
            elapsed_ms = started.elapsed().as_millis() as u64
        );
        Ok(ApiResponse::new(status, body.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[test]
    fn url_joins_without_double_slash() {
        let t = HttpTransport::new("http://localhost:8000/api/", 1_000).unwrap();
        assert_eq!(t.url_for("/files/1"), "http://localhost:8000/api/files/1");
        assert_eq!(t.url_for("health"), "http://localhost:8000/api/health");
    }

    #[tokio::test]
    async fn sends_bearer_query_and_json() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("DELETE", "/api/files/3")
            .match_query(Matcher::UrlEncoded("permanent".into(), "true".into()))
            .match_header("authorization", "Bearer tok")
            .with_status(200)
            .with_body(r#"{"message":"ok"}"#)
            .create_async()
            .await;

        let t = HttpTransport::new(&format!("{}/api", server.url()), 1_000).unwrap();
        let mut req = ApiRequest::delete("/files/3").query("permanent", true);
        req.bearer = Some("tok".into());
        let resp = t.send(&req).await.unwrap();

        assert_eq!(resp.status, 200);
        m.assert_async().await;
    }

    #[tokio::test]
    async fn posts_json_body() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/api/auth/login")
            .match_body(Matcher::Json(serde_json::json!({"username":"u","password":"p"})))
            .with_status(401)
            .with_body(r#"{"detail":"用户名或密码错误"}"#)
            .create_async()
            .await;

        let t = HttpTransport::new(&format!("{}/api", server.url()), 1_000).unwrap();
        let req = ApiRequest::post("/auth/login")
            .anonymous()
            .json(&serde_json::json!({"username":"u","password":"p"}));
        let resp = t.send(&req).await.unwrap();

        // non-2xx statuses are data, not transport errors
        assert_eq!(resp.status, 401);
        assert_eq!(resp.detail(), "用户名或密码错误");
        m.assert_async().await;
    }

    #[tokio::test]
    async fn unreachable_server_is_connect_error() {
        let t = HttpTransport::new("http://127.0.0.1:9/api", 1_000).unwrap();
        let err = t.send(&ApiRequest::get("/health")).await.unwrap_err();
        assert!(err.is_unreachable());
        assert!(err.url().ends_with("/api/health"));
    }
}
