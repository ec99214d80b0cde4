//! Workflow-level errors
//!
//! Only failures that leave a workflow with nothing to return surface here.
//! Per-item and per-mirror failures are absorbed where they happen.

use thiserror::Error;

use crate::infrastructure::{CollectorError, ConfigError, ParsingError};

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Entry page {url} is unreachable: {source}")]
    EntryPageUnreachable {
        url: String,
        #[source]
        source: CollectorError,
    },

    #[error("{what} not found: {key}")]
    NotFound { what: &'static str, key: String },

    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Selector catalogue rejected: {0}")]
    Parsing(#[from] ParsingError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("HTTP client setup failed: {0}")]
    Client(CollectorError),
}

impl ScrapeError {
    pub fn unreachable(url: &str, source: CollectorError) -> Self {
        Self::EntryPageUnreachable {
            url: url.to_string(),
            source,
        }
    }

    pub fn not_found(what: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            what,
            key: key.into(),
        }
    }

    pub fn invalid_url(url: &str, reason: impl ToString) -> Self {
        Self::InvalidUrl {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type ScrapeResult<T> = Result<T, ScrapeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn unreachable_keeps_request_cause() {
        let err = ScrapeError::unreachable(
            "https://gomunime.co/",
            CollectorError::timeout("https://gomunime.co/", Duration::from_secs(30)),
        );
        assert!(err.to_string().contains("https://gomunime.co/"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn not_found_is_distinguishable() {
        let err = ScrapeError::not_found("Anime", "sousou-no-frieren");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Anime not found: sousou-no-frieren");
    }
}
