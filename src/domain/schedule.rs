use serde::{Deserialize, Serialize};

/// One title on the weekly release schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub title: String,
    pub url: String,
    pub release_time: String,
    pub thumbnail: String,
}

impl ScheduleEntry {
    /// Title, URL and thumbnail are all present.
    pub fn is_displayable(&self) -> bool {
        !self.title.is_empty() && !self.url.is_empty() && !self.thumbnail.is_empty()
    }
}

/// Day label plus its entries in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDay {
    pub day: String,
    pub entries: Vec<ScheduleEntry>,
}

impl ScheduleDay {
    pub fn matches_day(&self, requested: &str) -> bool {
        self.day.trim().eq_ignore_ascii_case(requested.trim())
    }
}
