use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::slug::slug_from_url;

/// Baseline record scraped from a listing card, enriched in place by hover details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    pub title: String,
    pub url: String,
    pub thumbnail: String,
    /// Site-internal id used for the hover request
    pub post_id: String,
    /// Type tag as printed on the card (TV, Movie, OVA, ...)
    pub kind: String,
    pub episode: String,

    // Hover detail fields
    pub rating: String,
    pub synopsis: String,
    pub duration: String,
    pub status: String,
    pub genres: Vec<String>,
    pub studio: String,
}

impl ListItem {
    /// Slug derived from the canonical URL.
    pub fn slug(&self) -> String {
        slug_from_url(&self.url)
    }

    /// Merge a hover payload into this record.
    ///
    /// Only non-empty payload values are written, so a payload never blanks
    /// a field that already carries data. Title, URL, thumbnail, post id,
    /// type and episode are not part of the payload and stay untouched.
    pub fn merge_detail(&mut self, payload: DetailPayload) {
        overwrite_if_present(&mut self.rating, payload.rating);
        overwrite_if_present(&mut self.synopsis, payload.synopsis);
        overwrite_if_present(&mut self.duration, payload.duration);
        overwrite_if_present(&mut self.status, payload.status);
        overwrite_if_present(&mut self.studio, payload.studio);
        if !payload.genres.is_empty() {
            self.genres = payload.genres;
        }
    }
}

fn overwrite_if_present(target: &mut String, value: String) {
    if !value.trim().is_empty() {
        *target = value;
    }
}

/// Fields that only the AJAX hover fragment carries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailPayload {
    pub rating: String,
    pub synopsis: String,
    pub duration: String,
    pub status: String,
    pub genres: Vec<String>,
    pub studio: String,
}

impl DetailPayload {
    pub fn is_empty(&self) -> bool {
        self.rating.is_empty()
            && self.synopsis.is_empty()
            && self.duration.is_empty()
            && self.status.is_empty()
            && self.studio.is_empty()
            && self.genres.is_empty()
    }
}

/// Well-known keys of the anime detail table.
///
/// The table itself stays free-form; these are the keys downstream
/// consumers read by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetailKey {
    Japanese,
    Synonyms,
    English,
    Status,
    Type,
    Source,
    Duration,
    Episodes,
    Season,
    Studio,
    Producers,
    Released,
}

impl DetailKey {
    /// Label as it appears before the colon on the page.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Japanese => "Japanese",
            Self::Synonyms => "Synonyms",
            Self::English => "English",
            Self::Status => "Status",
            Self::Type => "Type",
            Self::Source => "Source",
            Self::Duration => "Duration",
            Self::Episodes => "Episodes",
            Self::Season => "Season",
            Self::Studio => "Studio",
            Self::Producers => "Producers",
            Self::Released => "Released",
        }
    }
}

/// Key/value rows of the anime information table ("Studio: MAPPA", ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DetailMap(BTreeMap<String, String>);

impl DetailMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a row. Later rows with the same key replace earlier ones.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Insert only when the key has no non-empty value yet.
    pub fn insert_missing(&mut self, key: DetailKey, value: impl Into<String>) {
        if self.well_known(key).is_empty() {
            self.insert(key.label(), value);
        }
    }

    /// Parse a `Key: value` row, splitting on the first colon.
    pub fn insert_row(&mut self, row: &str) -> bool {
        match row.split_once(':') {
            Some((key, value)) if !key.trim().is_empty() => {
                self.insert(key.trim(), value.trim());
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Value of a well-known key, empty when absent.
    pub fn well_known(&self, key: DetailKey) -> &str {
        self.get(key.label()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// One row of the series episode list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeEntry {
    pub number: String,
    pub title: String,
    pub url: String,
    pub release_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub url: String,
    pub thumbnail: String,
    pub episode: String,
    /// Only known when the entry comes from a hover-enriched listing
    pub rating: String,
}

impl From<ListItem> for Recommendation {
    fn from(item: ListItem) -> Self {
        Self {
            title: item.title,
            url: item.url,
            thumbnail: item.thumbnail,
            episode: item.episode,
            rating: item.rating,
        }
    }
}

/// Everything the anime detail page yields for one series.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimeDetailRecord {
    pub slug: String,
    pub url: String,
    pub title: String,
    pub thumbnail: String,
    pub rating: String,
    pub synopsis: String,
    pub genres: Vec<String>,
    pub details: DetailMap,
    pub episodes: Vec<EpisodeEntry>,
    pub recommendations: Vec<Recommendation>,
}

impl AnimeDetailRecord {
    pub fn is_found(&self) -> bool {
        !self.title.trim().is_empty()
    }
}

/// Entry of a popularity ranking widget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopularEntry {
    pub rank: u32,
    pub title: String,
    pub url: String,
    pub thumbnail: String,
    pub genres: Vec<String>,
    pub score: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopularRankings {
    pub weekly: Vec<PopularEntry>,
    pub monthly: Vec<PopularEntry>,
    pub all_time: Vec<PopularEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreLink {
    pub name: String,
    pub url: String,
}

/// One page of a genre listing plus the sidebar genre catalogue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenrePage {
    pub genre: String,
    pub page: u32,
    pub catalogue: Vec<GenreLink>,
    pub items: Vec<ListItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn baseline() -> ListItem {
        ListItem {
            title: "Frieren".into(),
            url: "https://gomunime.co/anime/frieren/".into(),
            thumbnail: "https://gomunime.co/wp-content/uploads/frieren.jpg".into(),
            post_id: "42".into(),
            kind: "TV".into(),
            episode: "12".into(),
            status: "Ongoing".into(),
            ..ListItem::default()
        }
    }

    #[test]
    fn merge_fills_detail_fields() {
        let mut item = baseline();
        item.merge_detail(DetailPayload {
            rating: "9.1".into(),
            synopsis: "An elf mage".into(),
            genres: vec!["Adventure".into(), "Fantasy".into()],
            ..DetailPayload::default()
        });

        assert_eq!(item.rating, "9.1");
        assert_eq!(item.synopsis, "An elf mage");
        assert_eq!(item.genres, vec!["Adventure", "Fantasy"]);
        assert_eq!(item.title, "Frieren");
        assert_eq!(item.episode, "12");
    }

    #[test]
    fn merge_keeps_existing_value_when_payload_blank() {
        let mut item = baseline();
        item.merge_detail(DetailPayload {
            status: "   ".into(),
            ..DetailPayload::default()
        });
        assert_eq!(item.status, "Ongoing");
    }

    #[test]
    fn detail_map_splits_on_first_colon() {
        let mut map = DetailMap::new();
        assert!(map.insert_row("Released: Sep 29, 2023 at 12:00"));
        assert!(!map.insert_row("no separator here"));
        assert!(!map.insert_row(": orphan value"));

        assert_eq!(map.well_known(DetailKey::Released), "Sep 29, 2023 at 12:00");
        assert_eq!(map.well_known(DetailKey::Studio), "");
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn insert_missing_does_not_replace() {
        let mut map = DetailMap::new();
        map.insert("Status", "Completed");
        map.insert_missing(DetailKey::Status, "Ongoing");
        map.insert_missing(DetailKey::Type, "TV");

        assert_eq!(map.well_known(DetailKey::Status), "Completed");
        assert_eq!(map.well_known(DetailKey::Type), "TV");
    }
}
