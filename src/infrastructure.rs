//! Infrastructure layer: configuration, logging, HTTP transport and HTML parsing
//!
//! Nothing in here knows which page of the site it is looking at. Site
//! semantics live in the application layer.

pub mod collector; // Concurrent request engine
pub mod collector_error;
pub mod config; // Configuration loading and site constants
pub mod http_client;
pub mod logging; // Logging infrastructure
pub mod parsing; // Selector-driven field extraction
pub mod parsing_error;
pub mod response_cache;

// Re-export commonly used items
pub use collector::{Collector, CollectorMode, CollectorOptions};
pub use collector_error::CollectorError;
pub use config::{AppConfig, ConfigError, gomunime};
pub use http_client::{HttpClient, HttpClientConfig, Method, PageFetcher, PageRequest};
pub use logging::{get_log_directory, init_logging, init_logging_with_config};
pub use parsing::{
    ContextualParser, FieldSpec, PageDocument, ParsingError, ParsingResult, RegionSpec,
    SelectorCatalogue,
};
pub use response_cache::ResponseCache;
