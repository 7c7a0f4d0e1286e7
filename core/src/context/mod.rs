mod app_config;

pub use app_config::{
    AppConfig, ConfigError, DEFAULT_API_BASE_URL, DEFAULT_RACE_DISPLAY_COUNT,
    DEFAULT_RACE_RETRIEVAL_COUNT,
};
