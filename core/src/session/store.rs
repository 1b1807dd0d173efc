//! 会话存储

use super::transitions::{AuthTransition, TransitionError};
use super::types::{
    AuthPhase, PendingLogin, PersistedSession, SessionEvent, SessionState, TotpProvisioning,
};
use crate::storage::{load_record, save_record, KeyValueStore, MemoryStore, AUTH_STORAGE_KEY};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tokio::time::Instant;

/// 会话存储：令牌、锁定状态和登录过程状态的唯一持有者
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionStoreInner>,
}

struct SessionStoreInner {
    state: RwLock<SessionState>,
    storage: Arc<dyn KeyValueStore>,
    event_tx: broadcast::Sender<SessionEvent>,
}

impl SessionStore {
    /// 从持久化存储恢复会话
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let state = load_record::<PersistedSession>(storage.as_ref(), AUTH_STORAGE_KEY)
            .map(SessionState::from_persisted)
            .unwrap_or_default();
        tracing::debug!(target: "texton.session", phase = ?state.phase(), "session restored");

        let (event_tx, _) = broadcast::channel(64);
        Self {
            inner: Arc::new(SessionStoreInner {
                state: RwLock::new(state),
                storage,
                event_tx,
            }),
        }
    }

    /// 不落盘的会话（测试和临时会话）
    pub fn in_memory() -> Self {
        Self::load(Arc::new(MemoryStore::new()))
    }

    /// 订阅会话事件
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.event_tx.subscribe()
    }

    fn emit(&self, event: SessionEvent) {
        let _ = self.inner.event_tx.send(event);
    }

    fn persist(&self, record: PersistedSession) {
        if let Err(err) = save_record(self.inner.storage.as_ref(), AUTH_STORAGE_KEY, &record) {
            tracing::warn!(target: "texton.session", error = %err, "failed to persist session");
        }
    }

    /// 获取当前状态快照
    pub async fn snapshot(&self) -> SessionState {
        self.inner.state.read().await.clone()
    }

    pub async fn phase(&self) -> AuthPhase {
        self.inner.state.read().await.phase()
    }

    pub async fn access_token(&self) -> Option<String> {
        self.inner.state.read().await.access_token.clone()
    }

    pub async fn refresh_token(&self) -> Option<String> {
        self.inner.state.read().await.refresh_token.clone()
    }

    pub async fn last_activity(&self) -> Instant {
        self.inner.state.read().await.last_activity
    }

    pub async fn is_locked(&self) -> bool {
        self.inner.state.read().await.is_locked
    }

    pub async fn pending(&self) -> Option<PendingLogin> {
        self.inner.state.read().await.pending.clone()
    }

    /// 登录成功：保存令牌并清除登录过程状态
    pub async fn set_tokens(
        &self,
        access_token: String,
        refresh_token: String,
    ) -> Result<(), TransitionError> {
        if access_token.is_empty() {
            return Err(TransitionError::MissingAccessToken);
        }
        let record = {
            let mut state = self.inner.state.write().await;
            AuthTransition::validate(state.phase(), AuthPhase::Unlocked)?;
            state.access_token = Some(access_token);
            state.refresh_token = Some(refresh_token);
            state.is_authenticated = true;
            state.is_locked = false;
            state.last_activity = Instant::now();
            state.clear_login_progress();
            state.to_persisted()
        };
        self.persist(record);
        tracing::info!(target: "texton.session", "signed in");
        self.emit(SessionEvent::LoggedIn {
            timestamp: Utc::now(),
        });
        Ok(())
    }

    /// 刷新令牌：只替换 access token，不影响锁定状态和活动时间
    pub async fn replace_access_token(&self, access_token: String) -> Result<(), TransitionError> {
        if access_token.is_empty() {
            return Err(TransitionError::MissingAccessToken);
        }
        let record = {
            let mut state = self.inner.state.write().await;
            if !state.is_authenticated {
                return Err(TransitionError::NotAuthenticated);
            }
            state.access_token = Some(access_token);
            state.to_persisted()
        };
        self.persist(record);
        tracing::debug!(target: "texton.session", "access token refreshed");
        self.emit(SessionEvent::TokenRefreshed {
            timestamp: Utc::now(),
        });
        Ok(())
    }

    /// 需要首次设置 2FA：暂存凭据和二维码
    pub async fn begin_two_factor_setup(
        &self,
        pending: PendingLogin,
        provisioning: TotpProvisioning,
    ) -> Result<(), TransitionError> {
        let username = pending.username().to_string();
        {
            let mut state = self.inner.state.write().await;
            AuthTransition::validate(state.phase(), AuthPhase::TwoFactorSetup)?;
            state.pending = Some(pending);
            state.requires_2fa_setup = true;
            state.requires_2fa = false;
            state.totp_setup = Some(provisioning);
        }
        tracing::info!(target: "texton.session", username = %username, "two-factor setup required");
        self.emit(SessionEvent::TwoFactorSetupRequired { username });
        Ok(())
    }

    /// 需要 2FA 验证码：暂存凭据
    pub async fn begin_two_factor_verify(&self, pending: PendingLogin) -> Result<(), TransitionError> {
        let username = pending.username().to_string();
        {
            let mut state = self.inner.state.write().await;
            AuthTransition::validate(state.phase(), AuthPhase::TwoFactorVerify)?;
            state.pending = Some(pending);
            state.requires_2fa_setup = false;
            state.requires_2fa = true;
            state.totp_setup = None;
        }
        tracing::info!(target: "texton.session", username = %username, "two-factor code required");
        self.emit(SessionEvent::TwoFactorRequired { username });
        Ok(())
    }

    /// 放弃进行中的登录
    pub async fn clear_pending(&self) {
        self.inner.state.write().await.clear_login_progress();
    }

    /// 锁定屏幕；仅在已登录且未锁定时允许，不影响令牌
    pub async fn lock(&self) -> Result<(), TransitionError> {
        let record = {
            let mut state = self.inner.state.write().await;
            AuthTransition::validate(state.phase(), AuthPhase::Locked)?;
            state.is_locked = true;
            state.to_persisted()
        };
        self.persist(record);
        tracing::info!(target: "texton.session", "session locked");
        self.emit(SessionEvent::Locked {
            timestamp: Utc::now(),
        });
        Ok(())
    }

    /// 解锁并重置活动时间；调用方负责先完成 TOTP 验证
    pub async fn unlock(&self) -> Result<(), TransitionError> {
        let record = {
            let mut state = self.inner.state.write().await;
            if state.phase() != AuthPhase::Locked {
                return Err(TransitionError::InvalidTransition {
                    from: state.phase(),
                    to: AuthPhase::Unlocked,
                });
            }
            state.is_locked = false;
            state.last_activity = Instant::now();
            state.to_persisted()
        };
        self.persist(record);
        tracing::info!(target: "texton.session", "session unlocked");
        self.emit(SessionEvent::Unlocked {
            timestamp: Utc::now(),
        });
        Ok(())
    }

    /// 无条件清空令牌和登录过程状态
    pub async fn logout(&self) {
        let was = {
            let mut state = self.inner.state.write().await;
            let was = state.phase();
            *state = SessionState::anonymous();
            was
        };
        self.persist(PersistedSession::default());
        tracing::info!(target: "texton.session", from = ?was, "signed out");
        self.emit(SessionEvent::LoggedOut {
            timestamp: Utc::now(),
        });
    }

    /// 记录用户活动时间
    pub async fn update_activity(&self) {
        self.inner.state.write().await.last_activity = Instant::now();
    }
}
