//! # 空闲锁定
//!
//! 定时采样空闲时长（默认每 10 秒），超过设置的分钟数且会话处于已登录未锁定状态时锁屏。
//! 用户输入事件通过 [`ActivitySink`] 送入；锁定期间的输入被忽略。
//! 锁定可能比阈值晚最多一个采样周期。

mod monitor;

pub use monitor::{ActivityKind, ActivitySink, IdleLockMonitor, IdleMonitorHandle};
