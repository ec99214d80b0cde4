//! Application layer: site-aware parsers and the workflows built on them
//!
//! Parsers turn one fetched page into domain records. [`AnimeScraper`] drives
//! the collector, correlates listing cards with their hover details and
//! scores the result. The `dto` module shapes records for the published JSON
//! contract.

pub mod anime_detail;
pub mod correlator;
pub mod dto;
pub mod episode_detail;
pub mod error;
pub mod genre;
pub mod listing;
pub mod popular;
pub mod response;
pub mod schedule;
pub mod scraper;
pub mod validator;

pub use correlator::DetailCorrelator;
pub use error::{ScrapeError, ScrapeResult};
pub use response::ApiResponse;
pub use scraper::{AnimeScraper, HomeSources};
pub use validator::RequiredFields;
