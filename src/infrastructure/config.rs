//! Configuration infrastructure
//!
//! Configuration is layered with the `config` crate: built-in defaults, then an
//! optional TOML/JSON/YAML file, then `GOMUNIME__*` environment variables
//! (for example `GOMUNIME__COLLECTOR__REQUEST_DELAY_MS=250`).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::infrastructure::parsing::SelectorCatalogue;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config: {source}")]
    Load {
        #[from]
        source: config::ConfigError,
    },

    #[error("Configuration validation failed: {message}")]
    Validation { message: String },
}

impl ConfigError {
    fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub site: SiteConfig,
    pub collector: CollectorSettings,
    pub cache: CacheConfig,
    pub logging: LoggingConfig,
    pub selectors: SelectorCatalogue,
}

/// Remote site endpoints and identity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub base_url: String,
    pub ajax_url: String,
    pub schedule_url: String,
    pub user_agent: String,
    /// Label placed in response envelopes
    pub source_label: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: gomunime::BASE_URL.to_string(),
            ajax_url: gomunime::AJAX_URL.to_string(),
            schedule_url: gomunime::SCHEDULE_URL.to_string(),
            user_agent: gomunime::USER_AGENT.to_string(),
            source_label: gomunime::SOURCE_LABEL.to_string(),
        }
    }
}

impl SiteConfig {
    pub fn base(&self) -> Result<Url, url::ParseError> {
        Url::parse(&self.base_url)
    }

    /// `{base}page/{n}/` for n > 1, the root otherwise.
    pub fn listing_url(&self, page: u32) -> String {
        if page > 1 {
            format!("{}page/{page}/", with_trailing_slash(&self.base_url))
        } else {
            with_trailing_slash(&self.base_url)
        }
    }

    pub fn anime_url(&self, slug: &str) -> String {
        format!("{}anime/{slug}/", with_trailing_slash(&self.base_url))
    }

    pub fn search_url(&self, query: &str) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
        format!("{}?s={encoded}", with_trailing_slash(&self.base_url))
    }

    pub fn genre_url(&self, genre: &str, page: u32) -> String {
        let root = format!("{}genres/{genre}/", with_trailing_slash(&self.base_url));
        if page > 1 { format!("{root}page/{page}/") } else { root }
    }
}

fn with_trailing_slash(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{url}/")
    }
}

/// Collector engine tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorSettings {
    /// Fixed spacing between requests to the same domain in fan-out mode
    pub request_delay_ms: u64,
    pub request_timeout_secs: u64,
    pub latest_parallelism: usize,
    pub paged_parallelism: usize,
    pub search_parallelism: usize,
    pub genre_parallelism: usize,
    /// Buffer of the channel that carries merged records to the consumer
    pub detail_channel_capacity: usize,
}

impl Default for CollectorSettings {
    fn default() -> Self {
        Self {
            request_delay_ms: defaults::REQUEST_DELAY_MS,
            request_timeout_secs: defaults::REQUEST_TIMEOUT_SECS,
            latest_parallelism: defaults::LATEST_PARALLELISM,
            paged_parallelism: defaults::PAGED_PARALLELISM,
            search_parallelism: defaults::SEARCH_PARALLELISM,
            genre_parallelism: defaults::GENRE_PARALLELISM,
            detail_channel_capacity: defaults::DETAIL_CHANNEL_CAPACITY,
        }
    }
}

impl CollectorSettings {
    pub const fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// On-disk response cache
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    /// Directory path, or `"platform"` for the OS cache directory
    pub directory: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            directory: defaults::CACHE_DIR.to_string(),
        }
    }
}

impl CacheConfig {
    /// Resolved cache directory, `None` when caching is off.
    pub fn resolved_directory(&self) -> Option<PathBuf> {
        if !self.enabled {
            return None;
        }
        if self.directory == defaults::PLATFORM_CACHE_SENTINEL {
            return dirs::cache_dir().map(|dir| dir.join(defaults::APP_DIR_NAME));
        }
        Some(PathBuf::from(&self.directory))
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// JSON formatted file logs
    pub json_format: bool,

    /// Console output goes to stderr; stdout carries command output
    pub console_output: bool,

    pub file_output: bool,

    /// Directory for log files, defaults to `logs/` next to the executable
    pub log_dir: Option<String>,

    pub file_name: String,

    /// Per-target levels (e.g. "reqwest": "warn")
    pub module_filters: HashMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: false,
            console_output: true,
            file_output: false,
            log_dir: None,
            file_name: defaults::LOG_FILE_NAME.to_string(),
            module_filters: HashMap::from([
                ("reqwest".to_string(), "info".to_string()),
                ("hyper".to_string(), "warn".to_string()),
                ("h2".to_string(), "warn".to_string()),
                ("tokio".to_string(), "info".to_string()),
                ("html5ever".to_string(), "warn".to_string()),
            ]),
        }
    }
}

impl AppConfig {
    /// Load defaults, then the optional file, then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        } else {
            builder = builder.add_source(config::File::with_name(defaults::CONFIG_FILE).required(false));
        }
        let settings = builder
            .add_source(
                config::Environment::with_prefix(defaults::ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("site.base_url", &self.site.base_url),
            ("site.ajax_url", &self.site.ajax_url),
            ("site.schedule_url", &self.site.schedule_url),
        ] {
            Url::parse(value).map_err(|e| ConfigError::validation(format!("{name} is not a valid URL: {e}")))?;
        }

        let c = &self.collector;
        if [c.latest_parallelism, c.paged_parallelism, c.search_parallelism, c.genre_parallelism]
            .contains(&0)
        {
            return Err(ConfigError::validation("parallelism must be greater than 0"));
        }
        if c.request_timeout_secs == 0 {
            return Err(ConfigError::validation("request_timeout_secs must be greater than 0"));
        }
        if c.detail_channel_capacity == 0 {
            return Err(ConfigError::validation("detail_channel_capacity must be greater than 0"));
        }
        Ok(())
    }
}

/// Fixed endpoints of the target site
pub mod gomunime {
    pub const BASE_URL: &str = "https://gomunime.co/";
    pub const AJAX_URL: &str = "https://gomunime.co/wp-admin/admin-ajax.php";
    pub const SCHEDULE_URL: &str = "https://gomunime.co/schedule/";
    pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/115.0.0.0 Safari/537.36";
    pub const SOURCE_LABEL: &str = "gomunime.co";

    /// Form body of the hover-detail request
    pub fn hover_request_body(post_id: &str) -> String {
        format!("action=tooltip_action&id={post_id}")
    }
}

pub mod defaults {
    pub const REQUEST_DELAY_MS: u64 = 100;
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;

    pub const LATEST_PARALLELISM: usize = 12;
    pub const PAGED_PARALLELISM: usize = 15;
    pub const SEARCH_PARALLELISM: usize = 4;
    pub const GENRE_PARALLELISM: usize = 4;
    pub const DETAIL_CHANNEL_CAPACITY: usize = 100;

    pub const CACHE_DIR: &str = "./cache";
    pub const PLATFORM_CACHE_SENTINEL: &str = "platform";
    pub const APP_DIR_NAME: &str = "gomunime-scraper";

    pub const LOG_LEVEL: &str = "info";
    pub const LOG_FILE_NAME: &str = "gomunime-scraper.log";

    pub const CONFIG_FILE: &str = "config/gomunime";
    pub const ENV_PREFIX: &str = "GOMUNIME";
}
