//! Gomunime Scraper - concurrent anime metadata extraction
//!
//! Fetches listing, schedule, detail and episode pages from gomunime.co,
//! merges each listing card with its hover-detail payload and returns
//! normalized records tagged with a completeness score.

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{AnimeScraper, ApiResponse, ScrapeError, ScrapeResult};
pub use domain::{AggregateResult, ConfidenceScore};
pub use infrastructure::AppConfig;
