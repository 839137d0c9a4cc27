use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use self::providers::ProvidersConfig;

pub mod providers;
pub mod settings;
pub mod store;

pub use settings::{
    BaiduCredentials, DEFAULT_IGNORE_SITES, DictionaryProvider, Settings, TencentCredentials,
    TranslateProvider,
};
pub use store::SettingsStore;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid ignore site: {0}")]
    InvalidIgnoreSite(String),

    #[error("Malformed settings: {0}")]
    Malformed(String),
}

/// Host process configuration, separate from the user's settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    pub providers: ProvidersConfig,

    /// Transport timeout for every provider call
    pub http_timeout_ms: u64,
    /// Capacity of the reply channel feeding the writer task
    pub reply_capacity: usize,
    /// Settings profile loaded at startup
    pub profile_path: Option<PathBuf>,
}

impl HostConfig {
    pub fn new() -> Self {
        let http_timeout_ms = env::var("HUACI_HTTP_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10_000); // 10 seconds default

        let reply_capacity = env::var("HUACI_REPLY_CAPACITY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(64);

        let profile_path = env::var("HUACI_PROFILE").ok().map(PathBuf::from);

        HostConfig {
            providers: ProvidersConfig::new(),
            http_timeout_ms,
            reply_capacity,
            profile_path,
        }
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            providers: ProvidersConfig::default(),
            http_timeout_ms: 10_000,
            reply_capacity: 64,
            profile_path: None,
        }
    }
}
