//! # 编辑器状态模块
//!
//! 持有文件列表、当前文件、实时编辑缓冲区和保存状态。
//! 缓冲区与服务端内容只在显式保存时同步。

pub mod store;
pub mod types;

pub use store::{EditorEvent, EditorState, EditorStore};
pub use types::{FileContent, FileItem, SaveStatus};
