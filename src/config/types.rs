use mpdforge_probe::ClientProfile;
use serde::{Deserialize, Serialize};

use crate::cache::DEFAULT_CLEAR_FACTOR;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    /// Versions and locale of the spoofed streaming clients
    #[serde(default)]
    pub clients: ClientProfile,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpConfig {
    /// Total request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Connection timeout in seconds (default: 10)
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// User agent for requests that do not set their own
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            user_agent: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Maximum manifests kept per delivery type (unbounded when unset)
    #[serde(default)]
    pub max_entries: Option<usize>,

    /// Share of entries kept when a full cache is trimmed
    #[serde(default = "default_clear_factor")]
    pub clear_factor: f64,
}

fn default_clear_factor() -> f64 {
    DEFAULT_CLEAR_FACTOR
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: None,
            clear_factor: default_clear_factor(),
        }
    }
}
