#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Mutex;
use texton_core::api::{ApiRequest, ApiResponse, Method, Transport, TransportError};

pub const USER: &str = "admin";
pub const PASSWORD: &str = "secret";
pub const TOTP: &str = "123456";

/// Small stateful stand-in for the TextOn backend.
pub struct MockBackend {
    state: Mutex<BackendState>,
}

struct BackendState {
    two_factor: bool,
    token_seq: u32,
    access: Option<String>,
    refresh: Option<String>,
    files: BTreeMap<i64, (String, String)>,
    next_id: i64,
    saves: Vec<(i64, String)>,
    log: Vec<(Method, String)>,
}

impl MockBackend {
    pub fn new(two_factor: bool) -> Self {
        Self {
            state: Mutex::new(BackendState {
                two_factor,
                token_seq: 0,
                access: None,
                refresh: None,
                files: BTreeMap::new(),
                next_id: 1,
                saves: Vec::new(),
                log: Vec::new(),
            }),
        }
    }

    pub fn add_file(&self, name: &str, content: &str) -> i64 {
        let mut s = self.state.lock().unwrap();
        let id = s.next_id;
        s.next_id += 1;
        s.files.insert(id, (name.to_string(), content.to_string()));
        id
    }

    /// Invalidates the current access token; the refresh token stays valid.
    pub fn expire_access(&self) {
        self.state.lock().unwrap().access = None;
    }

    pub fn revoke_all(&self) {
        let mut s = self.state.lock().unwrap();
        s.access = None;
        s.refresh = None;
    }

    pub fn saves(&self) -> Vec<(i64, String)> {
        self.state.lock().unwrap().saves.clone()
    }

    pub fn content(&self, id: i64) -> Option<String> {
        self.state.lock().unwrap().files.get(&id).map(|f| f.1.clone())
    }

    pub fn calls(&self, method: Method, path: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .log
            .iter()
            .filter(|(m, p)| *m == method && p == path)
            .count()
    }
}

fn reply(status: u16, body: Value) -> Result<ApiResponse, TransportError> {
    Ok(ApiResponse::new(status, body.to_string().into_bytes()))
}

fn file_json(id: i64, name: &str, content: &str) -> Value {
    json!({
        "id": id, "name": name, "path": format!("/{name}"), "content": content,
        "language": "plaintext", "encoding": "utf-8", "is_deleted": false,
        "created_at": "2024-01-01T00:00:00", "updated_at": "2024-01-01T00:00:00"
    })
}

impl BackendState {
    fn issue_tokens(&mut self) -> Value {
        self.token_seq += 1;
        let access = format!("access-{}", self.token_seq);
        let refresh = format!("refresh-{}", self.token_seq);
        self.access = Some(access.clone());
        self.refresh = Some(refresh.clone());
        json!({"access_token": access, "refresh_token": refresh, "token_type": "bearer"})
    }

    fn authorized(&self, req: &ApiRequest) -> bool {
        self.access.is_some() && req.bearer == self.access
    }
}

#[async_trait]
impl Transport for MockBackend {
    fn name(&self) -> &str {
        "mock-backend"
    }

    async fn send(&self, req: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let mut s = self.state.lock().unwrap();
        s.log.push((req.method, req.path.clone()));
        let body = req.body.clone().unwrap_or(Value::Null);
        let segments: Vec<&str> = req.path.trim_start_matches('/').split('/').collect();

        match (req.method, segments.as_slice()) {
            (Method::Post, ["auth", "login"]) => {
                if body["username"] != USER || body["password"] != PASSWORD {
                    return reply(401, json!({"detail": "用户名或密码错误"}));
                }
                if s.two_factor {
                    match body["totp_code"].as_str() {
                        None => {
                            return reply(
                                200,
                                json!({"access_token": "", "refresh_token": "", "requires_2fa": true}),
                            )
                        }
                        Some(code) if code != TOTP => {
                            return reply(401, json!({"detail": "验证码错误"}))
                        }
                        Some(_) => {}
                    }
                }
                let tokens = s.issue_tokens();
                reply(200, tokens)
            }
            (Method::Post, ["auth", "refresh"]) => {
                if s.refresh.is_some() && body["refresh_token"].as_str() == s.refresh.as_deref() {
                    s.token_seq += 1;
                    let access = format!("access-{}", s.token_seq);
                    s.access = Some(access.clone());
                    reply(200, json!({"access_token": access}))
                } else {
                    reply(401, json!({"detail": "invalid refresh token"}))
                }
            }
            (Method::Post, ["auth", "verify-totp"]) => {
                if !s.authorized(req) {
                    return reply(401, json!({"detail": "Not authenticated"}));
                }
                if body["totp_code"] == TOTP {
                    reply(200, json!({"valid": true}))
                } else {
                    reply(401, json!({"detail": "验证码错误"}))
                }
            }
            _ if !s.authorized(req) => reply(401, json!({"detail": "Could not validate credentials"})),
            (Method::Get, ["files"]) => {
                let items: Vec<Value> = s
                    .files
                    .iter()
                    .enumerate()
                    .map(|(i, (id, (name, _)))| {
                        json!({"id": id, "name": name, "path": format!("/{name}"),
                               "language": "plaintext", "is_deleted": false,
                               "sort_order": i, "updated_at": "2024-01-01T00:00:00"})
                    })
                    .collect();
                reply(200, Value::Array(items))
            }
            (Method::Get, ["files", id]) => {
                let Ok(id) = id.parse::<i64>() else {
                    return reply(422, json!({"detail": "bad id"}));
                };
                match s.files.get(&id) {
                    Some((name, content)) => reply(200, file_json(id, name, content)),
                    None => reply(404, json!({"detail": "文件不存在"})),
                }
            }
            (Method::Post, ["files", id, "save"]) => {
                let id = id.parse::<i64>().unwrap_or_default();
                let content = body["content"].as_str().unwrap_or_default().to_string();
                let Some(entry) = s.files.get_mut(&id) else {
                    return reply(404, json!({"detail": "文件不存在"}));
                };
                entry.1 = content.clone();
                let name = entry.0.clone();
                s.saves.push((id, content.clone()));
                reply(200, file_json(id, &name, &content))
            }
            _ => reply(404, json!({"detail": "Not Found"})),
        }
    }
}
