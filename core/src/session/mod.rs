//! # 会话管理模块
//!
//! 负责登录流程、两步验证、令牌持有以及空闲锁定状态。
//!
//! 状态只能通过 [`SessionStore`] 暴露的方法修改；[`AuthFlow`] 负责与服务端交互后
//! 驱动这些修改。

pub mod flow;
pub mod store;
pub mod transitions;
pub mod types;

pub use flow::{validate_totp_code, AuthFlow, LoginOutcome};
pub use store::SessionStore;
pub use transitions::{AuthTransition, TransitionError};
pub use types::{AuthPhase, PendingLogin, SessionEvent, SessionState, TotpProvisioning};
