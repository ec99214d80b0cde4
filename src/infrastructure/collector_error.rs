//! Request-level error types
//!
//! Every variant describes the failure of exactly one request. None of them is
//! retried; callers decide whether the failure costs an item's detail fields
//! or the whole workflow.

use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollectorError {
    #[error("Transport failure for {url}: {message}")]
    Transport { url: String, message: String },

    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Request to {url} exceeded {}ms", .after.as_millis())]
    Timeout { url: String, after: Duration },

    #[error("Invalid request URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Collector shut down before {url} was sent")]
    Closed { url: String },
}

impl CollectorError {
    pub fn transport(url: &str, message: impl ToString) -> Self {
        Self::Transport {
            url: url.to_string(),
            message: message.to_string(),
        }
    }

    pub fn timeout(url: &str, after: Duration) -> Self {
        Self::Timeout {
            url: url.to_string(),
            after,
        }
    }

    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    pub fn url(&self) -> &str {
        match self {
            Self::Transport { url, .. }
            | Self::HttpStatus { url, .. }
            | Self::Timeout { url, .. }
            | Self::InvalidUrl { url, .. }
            | Self::Closed { url } => url,
        }
    }
}
