//! texton-devserver library - 暴露模块用于单元测试

pub mod error;
pub mod http;
