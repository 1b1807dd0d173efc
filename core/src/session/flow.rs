//! 登录 / 两步验证 / 解锁流程

use super::store::SessionStore;
use super::transitions::TransitionError;
use super::types::{AuthPhase, PendingLogin, TotpProvisioning};
use crate::client::models::LoginResponse;
use crate::client::AuthApi;
use crate::error::{ApiError, AuthError};

/// 登录结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// 已获得令牌
    Authenticated,
    /// 需要扫码设置 2FA
    TwoFactorSetup(TotpProvisioning),
    /// 需要输入 2FA 验证码
    TwoFactorRequired,
}

/// 验证码必须是 6 位数字
pub fn validate_totp_code(code: &str) -> Result<&str, AuthError> {
    let code = code.trim();
    if code.len() == 6 && code.bytes().all(|b| b.is_ascii_digit()) {
        Ok(code)
    } else {
        Err(AuthError::InvalidCode)
    }
}

/// 与服务端交互并驱动 [`SessionStore`] 的认证流程
///
/// 失败时会话保持原状态，由调用方清空输入的验证码。
#[derive(Clone)]
pub struct AuthFlow {
    session: SessionStore,
    auth: AuthApi,
}

impl AuthFlow {
    pub fn new(session: SessionStore, auth: AuthApi) -> Self {
        Self { session, auth }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// 用户名密码登录，可附带验证码
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        totp_code: Option<&str>,
    ) -> Result<LoginOutcome, AuthError> {
        let totp_code = totp_code.map(validate_totp_code).transpose()?;
        let resp = self.auth.login(username, password, totp_code).await?;

        if resp.requires_2fa_setup {
            // 先取二维码，失败时保持未登录
            let provisioning = self.auth.setup_two_factor(username, password).await?;
            self.session
                .begin_two_factor_setup(PendingLogin::new(username, password), provisioning.clone())
                .await?;
            return Ok(LoginOutcome::TwoFactorSetup(provisioning));
        }

        if resp.requires_2fa {
            self.session
                .begin_two_factor_verify(PendingLogin::new(username, password))
                .await?;
            return Ok(LoginOutcome::TwoFactorRequired);
        }

        self.accept_tokens(resp).await?;
        Ok(LoginOutcome::Authenticated)
    }

    /// 提交 2FA 验证码；设置阶段走 verify-2fa，验证阶段重新提交登录
    pub async fn verify_two_factor(&self, code: &str) -> Result<(), AuthError> {
        let code = validate_totp_code(code)?;
        let snapshot = self.session.snapshot().await;
        let pending = snapshot.pending().cloned().ok_or(AuthError::NoPendingLogin)?;

        let resp = match snapshot.phase() {
            AuthPhase::TwoFactorSetup => {
                self.auth
                    .verify_two_factor(pending.username(), pending.password(), code)
                    .await?
            }
            AuthPhase::TwoFactorVerify => {
                self.auth
                    .login(pending.username(), pending.password(), Some(code))
                    .await?
            }
            _ => return Err(AuthError::NoPendingLogin),
        };

        if !resp.has_tokens() {
            tracing::info!(target: "texton.session", "two-factor code not accepted");
            return Err(AuthError::Rejected("verification code not accepted".to_string()));
        }
        self.accept_tokens(resp).await
    }

    /// 放弃 2FA 流程，回到登录表单
    pub async fn cancel_login(&self) {
        self.session.clear_pending().await;
    }

    /// 锁屏解锁：只调用 verify-totp，不重新登录
    pub async fn unlock(&self, code: &str) -> Result<(), AuthError> {
        let code = validate_totp_code(code)?;
        let phase = self.session.phase().await;
        if phase != AuthPhase::Locked {
            return Err(TransitionError::InvalidTransition {
                from: phase,
                to: AuthPhase::Unlocked,
            }
            .into());
        }
        self.auth.verify_totp(code).await?;
        self.session.unlock().await?;
        Ok(())
    }

    pub async fn lock(&self) -> Result<(), AuthError> {
        Ok(self.session.lock().await?)
    }

    pub async fn logout(&self) {
        self.session.logout().await;
    }

    pub async fn update_activity(&self) {
        self.session.update_activity().await;
    }

    async fn accept_tokens(&self, resp: LoginResponse) -> Result<(), AuthError> {
        if !resp.has_tokens() {
            return Err(AuthError::Api(ApiError::Decode(
                "login response carried no tokens".to_string(),
            )));
        }
        self.session
            .set_tokens(resp.access_token, resp.refresh_token)
            .await?;
        Ok(())
    }
}
