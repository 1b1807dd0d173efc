use super::{ApiRequest, ApiResponse, Method, Transport};
use crate::error::{TransportError, TransportErrorKind};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

type Reply = Result<ApiResponse, TransportError>;

/// Scripted transport: replies are queued per `(method, path)` and consumed in
/// order; the last reply of a route repeats. Unscripted routes answer 404.
#[derive(Default)]
pub(crate) struct FakeTransport {
    routes: Mutex<HashMap<(Method, String), VecDeque<Reply>>>,
    log: Mutex<Vec<ApiRequest>>,
    latency: Mutex<Option<Duration>>,
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Every reply waits this long first (tokio time, so paused tests stay instant).
    pub(crate) fn set_latency(&self, latency: Duration) {
        *self.latency.lock().unwrap() = Some(latency);
    }

    pub(crate) fn reply(&self, method: Method, path: &str, status: u16, body: &str) -> &Self {
        self.push(method, path, Ok(ApiResponse::new(status, body.as_bytes().to_vec())))
    }

    pub(crate) fn fail(&self, method: Method, path: &str, kind: TransportErrorKind) -> &Self {
        let err = TransportError::new(kind, path, "scripted failure");
        self.push(method, path, Err(err))
    }

    fn push(&self, method: Method, path: &str, reply: Reply) -> &Self {
        self.routes
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
        self
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.log.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, method: Method, path: &str) -> usize {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    fn name(&self) -> &str {
        "fake"
    }

    async fn send(&self, req: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let latency = *self.latency.lock().unwrap();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        self.log.lock().unwrap().push(req.clone());
        let mut routes = self.routes.lock().unwrap();
        let Some(queue) = routes.get_mut(&(req.method, req.path.clone())) else {
            return Ok(ApiResponse::new(404, br#"{"detail":"Not Found"}"#.to_vec()));
        };
        let reply = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        reply.unwrap_or_else(|| Ok(ApiResponse::new(404, Vec::new())))
    }
}
