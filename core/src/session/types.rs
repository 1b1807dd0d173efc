//! 会话状态类型定义

use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::time::Instant;

/// 多步登录过程中暂存的用户名和密码
#[derive(Clone, PartialEq, Eq)]
pub struct PendingLogin {
    username: String,
    password: String,
}

impl PendingLogin {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for PendingLogin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingLogin")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// 首次启用 2FA 时服务端下发的密钥和二维码
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotpProvisioning {
    pub secret: String,
    /// base64 编码的 PNG 图片
    pub qr_code: String,
}

impl TotpProvisioning {
    /// 解码二维码 PNG 字节
    pub fn qr_png(&self) -> Result<Vec<u8>, base64::DecodeError> {
        base64::engine::general_purpose::STANDARD.decode(self.qr_code.trim())
    }
}

/// 会话阶段（由状态字段推导）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthPhase {
    /// 未登录
    Anonymous,
    /// 需要首次设置 2FA
    TwoFactorSetup,
    /// 需要输入 2FA 验证码
    TwoFactorVerify,
    /// 已登录，未锁定
    Unlocked,
    /// 已登录，屏幕锁定
    Locked,
}

/// 会话状态
#[derive(Clone)]
pub struct SessionState {
    pub(crate) access_token: Option<String>,
    pub(crate) refresh_token: Option<String>,
    pub(crate) is_authenticated: bool,
    pub(crate) is_locked: bool,
    pub(crate) last_activity: Instant,
    pub(crate) pending: Option<PendingLogin>,
    pub(crate) requires_2fa_setup: bool,
    pub(crate) requires_2fa: bool,
    pub(crate) totp_setup: Option<TotpProvisioning>,
}

impl SessionState {
    pub fn anonymous() -> Self {
        Self {
            access_token: None,
            refresh_token: None,
            is_authenticated: false,
            is_locked: false,
            last_activity: Instant::now(),
            pending: None,
            requires_2fa_setup: false,
            requires_2fa: false,
            totp_setup: None,
        }
    }

    pub fn phase(&self) -> AuthPhase {
        if self.is_authenticated {
            if self.is_locked {
                AuthPhase::Locked
            } else {
                AuthPhase::Unlocked
            }
        } else if self.requires_2fa_setup {
            AuthPhase::TwoFactorSetup
        } else if self.requires_2fa {
            AuthPhase::TwoFactorVerify
        } else {
            AuthPhase::Anonymous
        }
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    pub fn is_locked(&self) -> bool {
        self.is_locked
    }

    pub fn last_activity(&self) -> Instant {
        self.last_activity
    }

    pub fn pending(&self) -> Option<&PendingLogin> {
        self.pending.as_ref()
    }

    pub fn pending_username(&self) -> Option<&str> {
        self.pending.as_ref().map(PendingLogin::username)
    }

    pub fn requires_2fa_setup(&self) -> bool {
        self.requires_2fa_setup
    }

    pub fn requires_2fa(&self) -> bool {
        self.requires_2fa
    }

    pub fn totp_setup(&self) -> Option<&TotpProvisioning> {
        self.totp_setup.as_ref()
    }

    pub(crate) fn clear_login_progress(&mut self) {
        self.pending = None;
        self.requires_2fa_setup = false;
        self.requires_2fa = false;
        self.totp_setup = None;
    }

    pub(crate) fn to_persisted(&self) -> PersistedSession {
        PersistedSession {
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
            is_authenticated: self.is_authenticated,
            is_locked: self.is_locked,
        }
    }

    /// 从持久化记录恢复；修正不可能出现的组合
    pub(crate) fn from_persisted(p: PersistedSession) -> Self {
        let mut state = Self::anonymous();
        let has_token = p
            .access_token
            .as_deref()
            .map(|t| !t.is_empty())
            .unwrap_or(false);
        if p.is_authenticated && has_token {
            state.access_token = p.access_token;
            state.refresh_token = p.refresh_token;
            state.is_authenticated = true;
            state.is_locked = p.is_locked;
        }
        state
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::anonymous()
    }
}

impl fmt::Debug for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionState")
            .field("phase", &self.phase())
            .field("has_access_token", &self.access_token.is_some())
            .field("has_refresh_token", &self.refresh_token.is_some())
            .field("pending", &self.pending)
            .finish()
    }
}

/// 持久化的会话字段（不含登录过程中的临时字段）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PersistedSession {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub is_authenticated: bool,
    #[serde(default)]
    pub is_locked: bool,
}

/// 会话事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn { timestamp: DateTime<Utc> },
    TwoFactorSetupRequired { username: String },
    TwoFactorRequired { username: String },
    TokenRefreshed { timestamp: DateTime<Utc> },
    Locked { timestamp: DateTime<Utc> },
    Unlocked { timestamp: DateTime<Utc> },
    LoggedOut { timestamp: DateTime<Utc> },
}
