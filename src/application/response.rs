//! Response envelope and fill-in defaults
//!
//! Shaped output replaces missing values with fixed placeholders so
//! consumers never see an empty string where a value is expected. The
//! confidence score is computed on the shaped data, after the placeholders
//! are in, exactly as consumers see it.

use serde::{Deserialize, Serialize};

use crate::domain::slug::slug_from_url;
use crate::domain::{AggregateResult, ConfidenceScore};

pub const SUCCESS_MESSAGE: &str = "Data berhasil diambil";
pub const NOT_AVAILABLE: &str = "N/A";
pub const UNKNOWN_SLUG: &str = "unknown-slug";
pub const MISSING_SYNOPSIS: &str = "Sinopsis tidak tersedia.";
pub const MISSING_EPISODE_TITLE: &str = "Judul tidak ditemukan";
pub const COVER_PLACEHOLDER: &str = "https://via.placeholder.com/350x500?text=No+Image";
pub const THUMBNAIL_PLACEHOLDER: &str = "https://placehold.co/200x300?text=No+Image";

/// `{confidence_score, data, message, source}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub confidence_score: ConfidenceScore,
    pub data: T,
    pub message: String,
    pub source: String,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T, confidence: ConfidenceScore, source: &str) -> Self {
        Self {
            confidence_score: confidence,
            data,
            message: SUCCESS_MESSAGE.to_string(),
            source: source.to_string(),
        }
    }

    pub fn from_aggregate(result: AggregateResult<T>, source: &str) -> Self {
        Self::new(result.data, result.confidence, source)
    }
}

pub fn fill_if_empty(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

pub fn fill_list_if_empty(values: &[String], fallback: &[&str]) -> Vec<String> {
    if values.is_empty() {
        fallback.iter().map(|value| (*value).to_string()).collect()
    } else {
        values.to_vec()
    }
}

/// Slug of a URL, `unknown-slug` when the URL has no path segment.
pub fn slug_or_unknown(url: &str) -> String {
    let slug = slug_from_url(url);
    if slug.is_empty() { UNKNOWN_SLUG.to_string() } else { slug }
}
