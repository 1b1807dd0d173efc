//! 会话阶段转换规则

use super::types::AuthPhase;
use thiserror::Error;

/// 状态转换错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Invalid transition from {from:?} to {to:?}")]
    InvalidTransition { from: AuthPhase, to: AuthPhase },
    #[error("Cannot authenticate without an access token")]
    MissingAccessToken,
    #[error("Session is not authenticated")]
    NotAuthenticated,
}

/// 会话阶段转换
pub struct AuthTransition;

impl AuthTransition {
    /// 验证阶段转换是否合法
    pub fn validate(from: AuthPhase, to: AuthPhase) -> Result<(), TransitionError> {
        use AuthPhase::*;

        let is_valid = match (from, to) {
            // 任意阶段都可以登出
            (_, Anonymous) => true,

            // 输入用户名密码后：直接登录或进入 2FA 子流程
            (Anonymous, TwoFactorSetup | TwoFactorVerify | Unlocked) => true,

            // 2FA 子流程中重新提交用户名密码
            (TwoFactorSetup | TwoFactorVerify, TwoFactorSetup | TwoFactorVerify) => true,

            // 2FA 验证成功
            (TwoFactorSetup | TwoFactorVerify, Unlocked) => true,

            // 空闲锁定与解锁
            (Unlocked, Locked) | (Locked, Unlocked) => true,

            _ => false,
        };

        if is_valid {
            Ok(())
        } else {
            Err(TransitionError::InvalidTransition { from, to })
        }
    }

    /// 该阶段是否持有有效令牌
    pub fn is_authenticated(phase: AuthPhase) -> bool {
        matches!(phase, AuthPhase::Unlocked | AuthPhase::Locked)
    }

    /// 获取阶段的可读描述
    pub fn phase_description(phase: AuthPhase) -> &'static str {
        match phase {
            AuthPhase::Anonymous => "未登录",
            AuthPhase::TwoFactorSetup => "设置两步验证",
            AuthPhase::TwoFactorVerify => "两步验证",
            AuthPhase::Unlocked => "已登录",
            AuthPhase::Locked => "屏幕已锁定",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_transitions() {
        assert!(AuthTransition::validate(AuthPhase::Anonymous, AuthPhase::Unlocked).is_ok());
        assert!(
            AuthTransition::validate(AuthPhase::Anonymous, AuthPhase::TwoFactorSetup).is_ok()
        );
        assert!(
            AuthTransition::validate(AuthPhase::TwoFactorVerify, AuthPhase::Unlocked).is_ok()
        );
        assert!(AuthTransition::validate(AuthPhase::Unlocked, AuthPhase::Locked).is_ok());
        assert!(AuthTransition::validate(AuthPhase::Locked, AuthPhase::Unlocked).is_ok());
    }

    #[test]
    fn test_logout_from_anywhere() {
        for from in [
            AuthPhase::Anonymous,
            AuthPhase::TwoFactorSetup,
            AuthPhase::TwoFactorVerify,
            AuthPhase::Unlocked,
            AuthPhase::Locked,
        ] {
            assert!(AuthTransition::validate(from, AuthPhase::Anonymous).is_ok());
        }
    }

    #[test]
    fn test_invalid_transitions() {
        assert!(AuthTransition::validate(AuthPhase::Anonymous, AuthPhase::Locked).is_err());
        assert!(AuthTransition::validate(AuthPhase::Locked, AuthPhase::Locked).is_err());
        assert!(
            AuthTransition::validate(AuthPhase::TwoFactorSetup, AuthPhase::Locked).is_err()
        );
        assert_eq!(
            AuthTransition::validate(AuthPhase::Unlocked, AuthPhase::TwoFactorVerify),
            Err(TransitionError::InvalidTransition {
                from: AuthPhase::Unlocked,
                to: AuthPhase::TwoFactorVerify
            })
        );
    }

    #[test]
    fn test_authenticated_phases() {
        assert!(AuthTransition::is_authenticated(AuthPhase::Locked));
        assert!(!AuthTransition::is_authenticated(AuthPhase::TwoFactorVerify));
    }
}
