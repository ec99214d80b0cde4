//! Data transfer objects for shaped workflow output
//!
//! Field names follow the published JSON contract, which mixes Indonesian
//! (`judul`, `skor`, `jadwal_rilis`) and English keys. Every shaping
//! function fills placeholders first and scores the result afterwards.

use std::collections::BTreeMap;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::application::error::{ScrapeError, ScrapeResult};
use crate::application::response::{
    ApiResponse, COVER_PLACEHOLDER, MISSING_EPISODE_TITLE, MISSING_SYNOPSIS, NOT_AVAILABLE, THUMBNAIL_PLACEHOLDER,
    fill_if_empty, fill_list_if_empty, slug_or_unknown,
};
use crate::application::scraper::HomeSources;
use crate::application::validator::{RequiredFields, all_complete, present, score, score_list};
use crate::domain::slug::slug_to_title;
use crate::domain::{
    AnimeDetailRecord, ConfidenceScore, DetailKey, DownloadTable, EpisodeDetailRecord, ListItem, Recommendation,
    ScheduleDay, ScheduleEntry,
};

const TOP_LIST_SIZE: usize = 10;
const DEFAULT_TOP_RATING: &str = "8.0";
const DEFAULT_TOP_GENRES: [&str; 2] = ["Action", "Adventure"];
const UNKNOWN_GENRES: [&str; 1] = ["Unknown"];
const TV_TYPE: &str = "tv";
const SCHEDULE_TYPE: &str = "TV";
const HOME_RELEASE_TIME: &str = "00:00";
/// `2 January 2006`
const RELEASE_DATE_FORMAT: &str = "%-d %B %Y";

// ============================================================================
// Home DTOs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Top10Anime {
    pub judul: String,
    pub url: String,
    pub anime_slug: String,
    pub rating: String,
    pub cover: String,
    pub genres: Vec<String>,
}

impl From<&ListItem> for Top10Anime {
    fn from(item: &ListItem) -> Self {
        Self {
            judul: item.title.clone(),
            url: item.url.clone(),
            anime_slug: slug_or_unknown(&item.url),
            rating: fill_if_empty(&item.rating, DEFAULT_TOP_RATING),
            cover: item.thumbnail.clone(),
            genres: fill_list_if_empty(&item.genres, &DEFAULT_TOP_GENRES),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEpisode {
    pub judul: String,
    pub url: String,
    pub anime_slug: String,
    pub episode: String,
    /// Not published on listing cards; stamped with the collection date
    pub rilis: String,
    pub cover: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeMovie {
    pub judul: String,
    pub url: String,
    pub anime_slug: String,
    pub tanggal: String,
    pub cover: String,
    pub genres: Vec<String>,
}

impl From<&ListItem> for HomeMovie {
    fn from(item: &ListItem) -> Self {
        Self {
            judul: item.title.clone(),
            url: item.url.clone(),
            anime_slug: slug_or_unknown(&item.url),
            tanggal: NOT_AVAILABLE.to_string(),
            cover: item.thumbnail.clone(),
            genres: fill_list_if_empty(&item.genres, &UNKNOWN_GENRES),
        }
    }
}

/// Schedule entry as shaped for both the home page and the schedule endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JadwalAnime {
    pub title: String,
    pub url: String,
    pub anime_slug: String,
    pub cover_url: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub score: String,
    pub genres: Vec<String>,
    pub release_time: String,
}

impl JadwalAnime {
    fn from_entry(entry: &ScheduleEntry, missing_time: &str) -> Self {
        Self {
            title: entry.title.clone(),
            url: entry.url.clone(),
            anime_slug: slug_or_unknown(&entry.url),
            cover_url: entry.thumbnail.clone(),
            kind: SCHEDULE_TYPE.to_string(),
            score: NOT_AVAILABLE.to_string(),
            genres: fill_list_if_empty(&[], &UNKNOWN_GENRES),
            release_time: fill_if_empty(&entry.release_time, missing_time),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeData {
    pub top10: Vec<Top10Anime>,
    pub new_eps: Vec<NewEpisode>,
    pub movies: Vec<HomeMovie>,
    pub jadwal_rilis: BTreeMap<String, Vec<JadwalAnime>>,
}

impl HomeData {
    /// Build the home aggregate; `today` stamps the new-episode release dates.
    pub fn assemble(latest: &[ListItem], schedule: &[ScheduleDay], today: NaiveDate) -> Self {
        let released = today.format(RELEASE_DATE_FORMAT).to_string();

        Self {
            top10: latest.iter().take(TOP_LIST_SIZE).map(Top10Anime::from).collect(),
            new_eps: latest
                .iter()
                .filter(|item| !item.episode.is_empty() && item.kind.to_lowercase() == TV_TYPE)
                .map(|item| NewEpisode {
                    judul: item.title.clone(),
                    url: item.url.clone(),
                    anime_slug: slug_or_unknown(&item.url),
                    episode: fill_if_empty(&item.episode, NOT_AVAILABLE),
                    rilis: released.clone(),
                    cover: item.thumbnail.clone(),
                })
                .collect(),
            movies: latest.iter().map(HomeMovie::from).collect(),
            jadwal_rilis: schedule
                .iter()
                .map(|day| {
                    let entries = day
                        .entries
                        .iter()
                        .map(|entry| JadwalAnime::from_entry(entry, HOME_RELEASE_TIME))
                        .collect();
                    (day.day.clone(), entries)
                })
                .collect(),
        }
    }
}

pub fn home(sources: &HomeSources, source_label: &str) -> ApiResponse<HomeData> {
    let data = HomeData::assemble(&sources.latest.data, &sources.schedule.data, Local::now().date_naive());
    let confidence = score(&data);
    ApiResponse::new(data, confidence, source_label)
}

// ============================================================================
// Listing DTOs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimeTerbaruItem {
    pub judul: String,
    pub url: String,
    pub anime_slug: String,
    pub episode: String,
    pub uploader: String,
    pub rilis: String,
    pub cover: String,
}

impl From<&ListItem> for AnimeTerbaruItem {
    fn from(item: &ListItem) -> Self {
        Self {
            judul: item.title.clone(),
            url: item.url.clone(),
            anime_slug: slug_or_unknown(&item.url),
            episode: fill_if_empty(&item.episode, NOT_AVAILABLE),
            uploader: NOT_AVAILABLE.to_string(),
            rilis: NOT_AVAILABLE.to_string(),
            cover: item.thumbnail.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieItem {
    pub judul: String,
    pub url: String,
    pub anime_slug: String,
    pub status: String,
    pub skor: String,
    pub sinopsis: String,
    pub views: String,
    pub cover: String,
    pub genres: Vec<String>,
    pub tanggal: String,
}

impl From<&ListItem> for MovieItem {
    fn from(item: &ListItem) -> Self {
        Self {
            judul: item.title.clone(),
            url: item.url.clone(),
            anime_slug: slug_or_unknown(&item.url),
            status: fill_if_empty(&item.status, NOT_AVAILABLE),
            skor: fill_if_empty(&item.rating, NOT_AVAILABLE),
            sinopsis: fill_if_empty(&item.synopsis, MISSING_SYNOPSIS),
            views: NOT_AVAILABLE.to_string(),
            cover: item.thumbnail.clone(),
            genres: fill_list_if_empty(&item.genres, &UNKNOWN_GENRES),
            tanggal: NOT_AVAILABLE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResultItem {
    pub judul: String,
    pub url_anime: String,
    pub anime_slug: String,
    pub status: String,
    pub tipe: String,
    pub skor: String,
    pub penonton: String,
    pub sinopsis: String,
    pub genre: Vec<String>,
    pub url_cover: String,
}

impl From<&ListItem> for SearchResultItem {
    fn from(item: &ListItem) -> Self {
        Self {
            judul: item.title.clone(),
            url_anime: item.url.clone(),
            anime_slug: slug_or_unknown(&item.url),
            status: fill_if_empty(&item.status, NOT_AVAILABLE),
            tipe: fill_if_empty(&item.kind, NOT_AVAILABLE),
            skor: fill_if_empty(&item.rating, NOT_AVAILABLE),
            penonton: NOT_AVAILABLE.to_string(),
            sinopsis: fill_if_empty(&item.synopsis, MISSING_SYNOPSIS),
            genre: item.genres.clone(),
            url_cover: item.thumbnail.clone(),
        }
    }
}

/// Shape every item of a listing workflow and score the shaped list.
pub fn listing<'a, T>(items: &'a [ListItem], source_label: &str) -> ApiResponse<Vec<T>>
where
    T: From<&'a ListItem> + RequiredFields,
{
    let data: Vec<T> = items.iter().map(T::from).collect();
    let confidence = score_list(&data);
    ApiResponse::new(data, confidence, source_label)
}

// ============================================================================
// Schedule DTOs
// ============================================================================

fn displayable(day: &ScheduleDay) -> Vec<JadwalAnime> {
    day.entries
        .iter()
        .filter(|entry| entry.is_displayable())
        .map(|entry| JadwalAnime::from_entry(entry, NOT_AVAILABLE))
        .collect()
}

/// Whole week keyed by day label. Entries without title, URL or cover are left out.
pub fn schedule(days: &[ScheduleDay], source_label: &str) -> ApiResponse<BTreeMap<String, Vec<JadwalAnime>>> {
    let data: BTreeMap<String, Vec<JadwalAnime>> = days
        .iter()
        .filter(|day| !day.day.trim().is_empty())
        .map(|day| (day.day.clone(), displayable(day)))
        .collect();
    let confidence = ConfidenceScore::from_completeness(!data.is_empty());
    ApiResponse::new(data, confidence, source_label)
}

/// One day of the schedule, matched case-insensitively.
pub fn schedule_for_day(days: &[ScheduleDay], day: &str, source_label: &str) -> ScrapeResult<ApiResponse<Vec<JadwalAnime>>> {
    let found = days
        .iter()
        .find(|candidate| candidate.matches_day(day))
        .ok_or_else(|| ScrapeError::not_found("Schedule day", day.to_lowercase()))?;

    let data = displayable(found);
    let confidence = score_list(&data);
    Ok(ApiResponse::new(data, confidence, source_label))
}

// ============================================================================
// Anime detail DTOs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeListItem {
    pub episode: String,
    pub title: String,
    pub url: String,
    pub episode_slug: String,
    pub release_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationItem {
    pub title: String,
    pub url: String,
    pub anime_slug: String,
    pub cover_url: String,
    pub rating: String,
    pub episode: String,
}

impl From<&Recommendation> for RecommendationItem {
    fn from(rec: &Recommendation) -> Self {
        Self {
            title: rec.title.clone(),
            url: rec.url.clone(),
            anime_slug: slug_or_unknown(&rec.url),
            cover_url: rec.thumbnail.clone(),
            rating: fill_if_empty(&rec.rating, NOT_AVAILABLE),
            episode: fill_if_empty(&rec.episode, NOT_AVAILABLE),
        }
    }
}

/// Well-known rows of the information table, `N/A` when missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Details {
    #[serde(rename = "Japanese")]
    pub japanese: String,
    #[serde(rename = "Synonyms")]
    pub synonyms: String,
    #[serde(rename = "English")]
    pub english: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "Duration")]
    pub duration: String,
    #[serde(rename = "Total Episode")]
    pub total_episode: String,
    #[serde(rename = "Season")]
    pub season: String,
    #[serde(rename = "Studio")]
    pub studio: String,
    #[serde(rename = "Producers")]
    pub producers: String,
    #[serde(rename = "Released")]
    pub released: String,
}

impl Details {
    fn from_record(record: &AnimeDetailRecord) -> Self {
        let row = |key: DetailKey| fill_if_empty(record.details.well_known(key), NOT_AVAILABLE);
        Self {
            japanese: row(DetailKey::Japanese),
            synonyms: row(DetailKey::Synonyms),
            english: row(DetailKey::English),
            status: row(DetailKey::Status),
            kind: row(DetailKey::Type),
            source: row(DetailKey::Source),
            duration: row(DetailKey::Duration),
            total_episode: row(DetailKey::Episodes),
            season: row(DetailKey::Season),
            studio: row(DetailKey::Studio),
            producers: row(DetailKey::Producers),
            released: row(DetailKey::Released),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingInfo {
    pub score: String,
    pub users: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimeDetailData {
    pub judul: String,
    pub url_anime: String,
    pub anime_slug: String,
    pub url_cover: String,
    pub episode_list: Vec<EpisodeListItem>,
    pub recommendations: Vec<RecommendationItem>,
    pub status: String,
    pub tipe: String,
    pub skor: String,
    pub penonton: String,
    pub sinopsis: String,
    pub genre: Vec<String>,
    pub details: Details,
    pub rating: RatingInfo,
}

impl From<&AnimeDetailRecord> for AnimeDetailData {
    fn from(record: &AnimeDetailRecord) -> Self {
        let details = Details::from_record(record);
        let skor = fill_if_empty(&record.rating, NOT_AVAILABLE);

        Self {
            judul: record.title.clone(),
            url_anime: record.url.clone(),
            anime_slug: record.slug.clone(),
            url_cover: fill_if_empty(&record.thumbnail, COVER_PLACEHOLDER),
            episode_list: record
                .episodes
                .iter()
                .map(|episode| {
                    let episode_slug = slug_or_unknown(&episode.url);
                    EpisodeListItem {
                        episode: fill_if_empty(&episode.number, NOT_AVAILABLE),
                        title: slug_to_title(&episode_slug),
                        url: episode.url.clone(),
                        episode_slug,
                        release_date: fill_if_empty(&episode.release_date, NOT_AVAILABLE),
                    }
                })
                .collect(),
            recommendations: record.recommendations.iter().map(RecommendationItem::from).collect(),
            status: details.status.clone(),
            tipe: details.kind.clone(),
            skor: skor.clone(),
            penonton: NOT_AVAILABLE.to_string(),
            sinopsis: fill_if_empty(&record.synopsis, MISSING_SYNOPSIS),
            genre: record.genres.clone(),
            details,
            rating: RatingInfo {
                score: skor,
                users: NOT_AVAILABLE.to_string(),
            },
        }
    }
}

pub fn anime_detail(record: &AnimeDetailRecord, source_label: &str) -> ApiResponse<AnimeDetailData> {
    let data = AnimeDetailData::from(record);
    let confidence = score(&data);
    ApiResponse::new(data, confidence, source_label)
}

// ============================================================================
// Episode detail DTOs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamingServerItem {
    pub server_name: String,
    pub streaming_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationLinks {
    pub previous_episode_url: String,
    pub all_episodes_url: String,
    pub next_episode_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimeInfo {
    pub title: String,
    pub thumbnail_url: String,
    pub synopsis: String,
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtherEpisode {
    pub title: String,
    pub url: String,
    pub thumbnail_url: String,
    pub release_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeDetailData {
    pub title: String,
    pub thumbnail_url: String,
    pub streaming_servers: Vec<StreamingServerItem>,
    pub release_info: String,
    pub download_links: DownloadTable,
    pub navigation: NavigationLinks,
    pub anime_info: AnimeInfo,
    pub other_episodes: Vec<OtherEpisode>,
}

impl From<&EpisodeDetailRecord> for EpisodeDetailData {
    fn from(record: &EpisodeDetailRecord) -> Self {
        let thumbnail = fill_if_empty(&record.thumbnail, &record.series.thumbnail);

        Self {
            title: fill_if_empty(&record.title, MISSING_EPISODE_TITLE),
            thumbnail_url: fill_if_empty(&thumbnail, THUMBNAIL_PLACEHOLDER),
            streaming_servers: record
                .servers
                .iter()
                .map(|server| StreamingServerItem {
                    server_name: server.name.clone(),
                    streaming_url: server.url.clone(),
                })
                .collect(),
            release_info: fill_if_empty(&record.release_info, NOT_AVAILABLE),
            download_links: record.downloads.clone(),
            navigation: NavigationLinks {
                previous_episode_url: record.navigation.previous.clone(),
                all_episodes_url: record.navigation.all_episodes.clone(),
                next_episode_url: record.navigation.next.clone(),
            },
            anime_info: AnimeInfo {
                title: record.series.title.clone(),
                thumbnail_url: record.series.thumbnail.clone(),
                synopsis: record.series.synopsis.clone(),
                genres: record.series.genres.clone(),
            },
            other_episodes: record
                .siblings
                .iter()
                .map(|sibling| OtherEpisode {
                    title: sibling.title.clone(),
                    url: sibling.url.clone(),
                    thumbnail_url: sibling.thumbnail.clone(),
                    release_date: sibling.release_date.clone(),
                })
                .collect(),
        }
    }
}

/// A page without an episode title is treated as missing.
pub fn episode_detail(record: &EpisodeDetailRecord, source_label: &str) -> ScrapeResult<ApiResponse<EpisodeDetailData>> {
    if record.title.trim().is_empty() {
        return Err(ScrapeError::not_found("Episode", record.url.clone()));
    }
    let data = EpisodeDetailData::from(record);
    let confidence = score(&data);
    Ok(ApiResponse::new(data, confidence, source_label))
}

// ============================================================================
// Required fields of shaped output
// ============================================================================

impl RequiredFields for Top10Anime {
    fn has_required_fields(&self) -> bool {
        present(&[&self.judul, &self.url, &self.cover, &self.anime_slug])
    }
}

impl RequiredFields for NewEpisode {
    fn has_required_fields(&self) -> bool {
        present(&[&self.judul, &self.url, &self.cover, &self.anime_slug])
    }
}

impl RequiredFields for HomeMovie {
    fn has_required_fields(&self) -> bool {
        present(&[&self.judul, &self.url, &self.cover, &self.anime_slug])
    }
}

impl RequiredFields for JadwalAnime {
    fn has_required_fields(&self) -> bool {
        present(&[&self.title, &self.url, &self.cover_url, &self.anime_slug])
    }
}

/// Empty sub-lists pass; only a blank field anywhere fails.
impl RequiredFields for HomeData {
    fn has_required_fields(&self) -> bool {
        all_complete(&self.top10)
            && all_complete(&self.new_eps)
            && all_complete(&self.movies)
            && self.jadwal_rilis.values().all(|entries| all_complete(entries))
    }
}

impl RequiredFields for AnimeTerbaruItem {
    fn has_required_fields(&self) -> bool {
        present(&[&self.judul, &self.url, &self.cover, &self.anime_slug])
    }
}

impl RequiredFields for MovieItem {
    fn has_required_fields(&self) -> bool {
        present(&[&self.judul, &self.url, &self.cover, &self.anime_slug])
    }
}

impl RequiredFields for SearchResultItem {
    fn has_required_fields(&self) -> bool {
        present(&[&self.judul, &self.url_anime, &self.url_cover, &self.anime_slug])
    }
}

impl RequiredFields for AnimeDetailData {
    fn has_required_fields(&self) -> bool {
        present(&[&self.judul, &self.url_anime, &self.url_cover, &self.anime_slug])
            && self
                .episode_list
                .iter()
                .all(|episode| present(&[&episode.title, &episode.url, &episode.episode_slug]))
    }
}

impl RequiredFields for EpisodeDetailData {
    fn has_required_fields(&self) -> bool {
        present(&[&self.title])
            && !self.streaming_servers.is_empty()
            && self.streaming_servers.iter().all(|server| present(&[&server.streaming_url]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EpisodeEntry, SeriesSummary, StreamingServer};

    fn listed(title: &str, kind: &str, episode: &str) -> ListItem {
        let slug = title.to_lowercase().replace(' ', "-");
        ListItem {
            title: title.to_string(),
            url: format!("https://gomunime.co/anime/{slug}/"),
            thumbnail: format!("https://gomunime.co/wp-content/uploads/{slug}.jpg"),
            post_id: "1".into(),
            kind: kind.to_string(),
            episode: episode.to_string(),
            ..ListItem::default()
        }
    }

    fn day(label: &str, entries: Vec<ScheduleEntry>) -> ScheduleDay {
        ScheduleDay {
            day: label.to_string(),
            entries,
        }
    }

    fn entry(title: &str, thumbnail: &str, time: &str) -> ScheduleEntry {
        ScheduleEntry {
            title: title.to_string(),
            url: format!("https://gomunime.co/anime/{}/", title.to_lowercase()),
            release_time: time.to_string(),
            thumbnail: thumbnail.to_string(),
        }
    }

    #[test]
    fn home_applies_defaults_and_filters_new_episodes() {
        let mut latest: Vec<ListItem> = (0..12).map(|n| listed(&format!("Show {n}"), "TV", "3")).collect();
        latest[0].rating = "9.1".into();
        latest[1].kind = "Movie".into();
        latest[2].episode.clear();

        let schedule = vec![day("Senin", vec![entry("Frieren", "https://gomunime.co/f.jpg", "")])];
        let today = NaiveDate::from_ymd_opt(2023, 10, 6).unwrap();
        let home = HomeData::assemble(&latest, &schedule, today);

        assert_eq!(home.top10.len(), 10);
        assert_eq!(home.top10[0].rating, "9.1");
        assert_eq!(home.top10[1].rating, "8.0");
        assert_eq!(home.top10[1].genres, vec!["Action", "Adventure"]);

        assert_eq!(home.new_eps.len(), 10);
        assert_eq!(home.new_eps[0].rilis, "6 October 2023");

        assert_eq!(home.movies.len(), 12);
        assert_eq!(home.movies[0].tanggal, "N/A");
        assert_eq!(home.movies[0].genres, vec!["Unknown"]);

        let senin = &home.jadwal_rilis["Senin"];
        assert_eq!(senin[0].release_time, "00:00");
        assert_eq!(senin[0].kind, "TV");
        assert!(score(&home).is_complete());
    }

    #[test]
    fn home_fails_on_any_blank_schedule_cover() {
        let latest = vec![listed("Frieren", "TV", "1")];
        let schedule = vec![day("Rabu", vec![entry("Dandadan", "", "21:00")])];
        let home = HomeData::assemble(&latest, &schedule, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert!(!score(&home).is_complete());
    }

    #[test]
    fn jadwal_serializes_type_key() {
        let json = serde_json::to_value(JadwalAnime::from_entry(&entry("Frieren", "x", ""), NOT_AVAILABLE)).unwrap();
        assert_eq!(json["type"], "TV");
        assert_eq!(json["release_time"], "N/A");
        assert_eq!(json["anime_slug"], "frieren");
    }

    #[test]
    fn search_and_movie_defaults() {
        let items = vec![listed("Frieren", "", "")];

        let search: ApiResponse<Vec<SearchResultItem>> = listing(&items, "gomunime.co");
        assert_eq!(search.data[0].tipe, "N/A");
        assert_eq!(search.data[0].sinopsis, MISSING_SYNOPSIS);
        assert_eq!(search.data[0].penonton, "N/A");
        assert!(search.confidence_score.is_complete());

        let movies: ApiResponse<Vec<MovieItem>> = listing(&items, "gomunime.co");
        assert_eq!(movies.data[0].views, "N/A");
        assert_eq!(movies.data[0].genres, vec!["Unknown"]);

        let latest: ApiResponse<Vec<AnimeTerbaruItem>> = listing(&[], "gomunime.co");
        assert_eq!(latest.confidence_score, ConfidenceScore::INCOMPLETE);
    }

    #[test]
    fn schedule_day_lookup() {
        let days = vec![
            day("Senin", vec![entry("Frieren", "f.jpg", "22:30"), entry("Orphan", "", "")]),
            day("Kamis", vec![entry("Dandadan", "d.jpg", "")]),
        ];

        let senin = schedule_for_day(&days, "SENIN", "gomunime.co").unwrap();
        assert_eq!(senin.data.len(), 1);
        assert!(senin.confidence_score.is_complete());

        let kamis = schedule_for_day(&days, "kamis", "gomunime.co").unwrap();
        assert_eq!(kamis.data[0].release_time, "N/A");

        assert!(schedule_for_day(&days, "minggu", "gomunime.co").unwrap_err().is_not_found());

        let week = schedule(&days, "gomunime.co");
        assert_eq!(week.data.keys().collect::<Vec<_>>(), vec!["Kamis", "Senin"]);
    }

    #[test]
    fn anime_detail_fills_placeholders() {
        let record = AnimeDetailRecord {
            slug: "sousou-no-frieren".into(),
            url: "https://gomunime.co/anime/sousou-no-frieren/".into(),
            title: "Sousou no Frieren".into(),
            episodes: vec![EpisodeEntry {
                number: "1".into(),
                url: "https://gomunime.co/sousou-no-frieren-episode-1/".into(),
                ..EpisodeEntry::default()
            }],
            ..AnimeDetailRecord::default()
        };
        let response = anime_detail(&record, "gomunime.co");
        let data = &response.data;

        assert_eq!(data.url_cover, COVER_PLACEHOLDER);
        assert_eq!(data.sinopsis, MISSING_SYNOPSIS);
        assert_eq!(data.skor, "N/A");
        assert_eq!(data.details.studio, "N/A");
        assert_eq!(data.episode_list[0].title, "Sousou No Frieren Episode 1");
        assert_eq!(data.episode_list[0].release_date, "N/A");
        assert!(response.confidence_score.is_complete());

        let json = serde_json::to_value(data).unwrap();
        assert_eq!(json["details"]["Total Episode"], "N/A");
    }

    #[test]
    fn episode_without_title_is_not_found() {
        let record = EpisodeDetailRecord {
            url: "https://gomunime.co/missing-episode-1/".into(),
            ..EpisodeDetailRecord::default()
        };
        assert!(episode_detail(&record, "gomunime.co").unwrap_err().is_not_found());
    }

    #[test]
    fn episode_thumbnail_falls_back() {
        let mut record = EpisodeDetailRecord {
            title: "Frieren Episode 2".into(),
            servers: vec![StreamingServer {
                name: "Mega".into(),
                url: "https://mega.nz/embed/abc".into(),
            }],
            series: SeriesSummary {
                thumbnail: "https://gomunime.co/f.jpg".into(),
                ..SeriesSummary::default()
            },
            ..EpisodeDetailRecord::default()
        };

        let shaped = episode_detail(&record, "gomunime.co").unwrap();
        assert_eq!(shaped.data.thumbnail_url, "https://gomunime.co/f.jpg");
        assert_eq!(shaped.data.release_info, "N/A");
        assert!(shaped.confidence_score.is_complete());

        record.series.thumbnail.clear();
        assert_eq!(episode_detail(&record, "gomunime.co").unwrap().data.thumbnail_url, THUMBNAIL_PLACEHOLDER);
    }
}
