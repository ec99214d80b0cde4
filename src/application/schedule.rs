//! Weekly release schedule page

use crate::domain::{ScheduleDay, ScheduleEntry};
use crate::infrastructure::parsing::config::ScheduleSelectors;
use crate::infrastructure::parsing::{FieldSpec, PageDocument, ParsingResult, RegionSpec};

pub struct ScheduleParser {
    days: RegionSpec,
    day_label: FieldSpec,
    entries: RegionSpec,
    title: FieldSpec,
    url: FieldSpec,
    release_time: FieldSpec,
    thumbnail: FieldSpec,
}

impl ScheduleParser {
    pub fn new(selectors: &ScheduleSelectors) -> ParsingResult<Self> {
        Ok(Self {
            days: RegionSpec::new("schedule.day", &selectors.day)?,
            day_label: FieldSpec::text("schedule.day_label", &selectors.day_label)?,
            entries: RegionSpec::new("schedule.entry", &selectors.entry)?,
            title: FieldSpec::attribute("schedule.title", &selectors.link, "title")?,
            url: FieldSpec::attribute("schedule.url", &selectors.link, "href")?,
            release_time: FieldSpec::text("schedule.release_time", &selectors.release_time)?,
            thumbnail: FieldSpec::image("schedule.thumbnail", &selectors.thumbnail)?,
        })
    }

    /// Days in document order; days without entries are dropped.
    pub fn parse(&self, page: &PageDocument) -> Vec<ScheduleDay> {
        self.days
            .select(page.root())
            .into_iter()
            .map(|day| ScheduleDay {
                day: self.day_label.extract(day),
                entries: self
                    .entries
                    .select(day)
                    .into_iter()
                    .map(|entry| ScheduleEntry {
                        title: self.title.extract(entry),
                        url: self.url.extract_url(entry, &page.url),
                        release_time: self.release_time.extract(entry),
                        thumbnail: self.thumbnail.extract(entry),
                    })
                    .collect(),
            })
            .filter(|day| !day.entries.is_empty())
            .collect()
    }
}
