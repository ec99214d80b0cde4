//! Parsing error types
//!
//! Selector and pattern failures are configuration problems and abort the
//! workflow before any request is sent. Payload-level failures (a mirror that
//! does not decode, a link that does not resolve) are scoped to one value and
//! are logged and skipped by the caller.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParsingError {
    #[error("Invalid CSS selector for '{field}': {selector} - {reason}")]
    InvalidSelector {
        field: String,
        selector: String,
        reason: String,
    },

    #[error("No selectors configured for '{field}'")]
    EmptySelectorList { field: String },

    #[error("Invalid pattern: {pattern} - {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Malformed mirror payload for '{server}': {reason}")]
    MalformedMirror { server: String, reason: String },

    #[error("URL resolution failed: {url} - {reason}")]
    UrlResolutionFailed {
        url: String,
        reason: String,
        base_url: Option<String>,
    },
}

impl ParsingError {
    pub fn invalid_selector(field: &str, selector: &str, reason: impl ToString) -> Self {
        Self::InvalidSelector {
            field: field.to_string(),
            selector: selector.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_pattern(pattern: &str, reason: impl ToString) -> Self {
        Self::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn malformed_mirror(server: &str, reason: impl ToString) -> Self {
        Self::MalformedMirror {
            server: server.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Whether the error only affects a single extracted value.
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::MalformedMirror { .. } | Self::UrlResolutionFailed { .. } => true,
            Self::InvalidSelector { .. }
            | Self::EmptySelectorList { .. }
            | Self::InvalidPattern { .. } => false,
        }
    }
}

pub type ParsingResult<T> = Result<T, ParsingError>;
