mod load;
mod types;

pub use load::{get_texton_data_dir, load_default, load_from_str};
pub use types::{
    ApiConfig, AppConfig, DevServerConfig, LoggingConfig, SessionConfig, StorageConfig,
    DEFAULT_DEV_SERVER_PORT, MIN_DEV_SERVER_PORT,
};
