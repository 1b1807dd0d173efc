//! # 自动保存
//!
//! 监听编辑器缓冲区变化，防抖后保存，并维护保存状态。
//!
//! - 缓冲区与最近一次成功保存的快照相同：标记已保存，不发请求
//! - 不同：标记未保存并重新计时，只有窗口内最后一次修改会触发保存
//! - 同一文档同时最多一个保存请求；保存期间的修改排队一次后续保存
//! - 切换到其他文档时丢弃计时器并以服务端内容重置快照
//! - 会话登出（任何途径）时丢弃计时器并关闭文档

mod coordinator;

pub use coordinator::{AutosaveCoordinator, AutosaveHandle};

use crate::error::ApiError;
use async_trait::async_trait;

/// 保存文档内容的网络调用
#[async_trait]
pub trait DocumentSaver: Send + Sync {
    async fn save_document(&self, file_id: i64, content: &str) -> Result<(), ApiError>;
}
