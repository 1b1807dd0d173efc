//! 开发服务器：静态 UI 包 + `/api` 反向代理

pub mod middleware;
pub mod proxy;
pub mod server;
pub mod state;

pub use server::*;
pub use state::*;
