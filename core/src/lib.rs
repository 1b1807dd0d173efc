pub mod api;
pub mod autosave;
pub mod client;
pub mod config;
pub mod context;
pub mod editor;
pub mod error;
pub mod idle;
pub mod session;
pub mod settings;
pub mod storage;
pub mod transport;
pub mod util;
pub mod workspace;
