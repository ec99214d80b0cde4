use serde::{Deserialize, Serialize};

/// Completeness score of an aggregate, always within `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfidenceScore(f64);

impl ConfidenceScore {
    pub const COMPLETE: Self = Self(1.0);
    pub const INCOMPLETE: Self = Self(0.0);

    /// Clamp into range; NaN counts as incomplete.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            Self::INCOMPLETE
        } else {
            Self(value.clamp(0.0, 1.0))
        }
    }

    pub const fn from_completeness(complete: bool) -> Self {
        if complete { Self::COMPLETE } else { Self::INCOMPLETE }
    }

    pub const fn value(self) -> f64 {
        self.0
    }

    pub fn is_complete(self) -> bool {
        self.0 >= 1.0
    }
}

impl Default for ConfidenceScore {
    fn default() -> Self {
        Self::INCOMPLETE
    }
}

/// Output of a workflow: the collected data and how complete it is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult<T> {
    pub data: T,
    pub confidence: ConfidenceScore,
}

impl<T> AggregateResult<T> {
    pub const fn new(data: T, confidence: ConfidenceScore) -> Self {
        Self { data, confidence }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> AggregateResult<U> {
        AggregateResult {
            data: f(self.data),
            confidence: self.confidence,
        }
    }
}
