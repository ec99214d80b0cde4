//! Episode page: streaming mirrors, download table, navigation and siblings
//!
//! Mirrors are `<option>` values holding a base64-encoded `<iframe>` tag.
//! Each one is decoded on its own; a mirror that fails to decode or carries
//! no player source is logged and skipped without affecting the others.

use std::collections::HashSet;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use regex::Regex;
use scraper::ElementRef;
use tracing::{debug, warn};

use crate::domain::episode::{DEFAULT_RESOLUTION, STREAM_DOWNLOAD_GROUP};
use crate::domain::slug::{segment_to_title, trailing_episode_number};
use crate::domain::{
    DownloadProvider, DownloadTable, EpisodeDetailRecord, EpisodeNavigation, SeriesSummary, SiblingEpisode,
    StreamingServer,
};
use crate::infrastructure::parsing::config::EpisodeDetailSelectors;
use crate::infrastructure::parsing::{
    FieldSpec, PageDocument, ParsingError, ParsingResult, RegionSpec, absolute_url, element_text,
};

const MIRROR_SOURCE_PATTERN: &str = r#"src="([^"]+)""#;
const RESOLUTION_PATTERN: &str = r"(\d{3,4}p)";
const EPISODE_SEPARATOR: &str = " Episode ";
const UNKNOWN_EPISODE: &str = "Unknown Episode";

const PREVIOUS_MARKERS: [&str; 2] = ["prev", "sebelum"];
const NEXT_MARKERS: [&str; 2] = ["next", "selanjut"];
const ALL_EPISODES_MARKERS: [&str; 3] = ["all episode", "all eps", "semua episode"];

/// Compiled patterns for mirror payloads and server names.
#[derive(Debug, Clone)]
pub struct EpisodePatterns {
    mirror_source: Regex,
    resolution: Regex,
}

impl EpisodePatterns {
    pub fn new() -> ParsingResult<Self> {
        let compile = |pattern: &str| Regex::new(pattern).map_err(|e| ParsingError::invalid_pattern(pattern, e));
        Ok(Self {
            mirror_source: compile(MIRROR_SOURCE_PATTERN)?,
            resolution: compile(RESOLUTION_PATTERN)?,
        })
    }

    /// Decode one mirror option into a streaming server.
    pub fn decode_mirror(&self, name: &str, encoded: &str) -> ParsingResult<StreamingServer> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| ParsingError::malformed_mirror(name, e))?;
        let tag = String::from_utf8_lossy(&bytes);
        let url = self
            .mirror_source
            .captures(&tag)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| ParsingError::malformed_mirror(name, "no player source in decoded tag"))?;

        Ok(StreamingServer {
            name: name.to_string(),
            url,
        })
    }

    /// Resolution token of a server name (`Nakama 1080p` -> `1080p`), `HD` when absent.
    pub fn resolution_of(&self, server_name: &str) -> String {
        self.resolution
            .captures(&server_name.to_lowercase())
            .and_then(|caps| caps.get(1))
            .map_or_else(|| DEFAULT_RESOLUTION.to_string(), |m| m.as_str().to_string())
    }

    /// Group streaming servers by resolution under the stream download group.
    pub fn download_table(&self, servers: &[StreamingServer]) -> DownloadTable {
        let mut table = DownloadTable::default();
        for server in servers {
            table.push(
                STREAM_DOWNLOAD_GROUP,
                &self.resolution_of(&server.name),
                DownloadProvider {
                    provider: server.name.clone(),
                    url: server.url.clone(),
                },
            );
        }
        table
    }
}

/// Title for a sibling episode that has none.
///
/// Series title plus episode number (taken from the URL when not given),
/// the series title alone, or a title-cased rendering of the URL's last
/// path segment.
pub fn synthesize_episode_title(url: &str, series_title: &str, number: &str) -> String {
    let number = if number.is_empty() {
        trailing_episode_number(url).unwrap_or_default()
    } else {
        number.to_string()
    };

    if !series_title.is_empty() && !number.is_empty() {
        return format!("{series_title} Episode {number}");
    }
    if !series_title.is_empty() {
        return series_title.to_string();
    }

    let segment = url.trim_end_matches('/').rsplit('/').next().unwrap_or_default();
    if segment.is_empty() {
        UNKNOWN_EPISODE.to_string()
    } else {
        segment_to_title(segment)
    }
}

pub struct EpisodeDetailParser {
    series_block: RegionSpec,
    series_thumbnail: FieldSpec,
    series_title: FieldSpec,
    series_synopsis: FieldSpec,
    series_genres: FieldSpec,

    title: FieldSpec,
    release_info: FieldSpec,
    mirror_options: RegionSpec,
    navigation_links: RegionSpec,

    sibling_rows: RegionSpec,
    sibling_thumbnail: FieldSpec,
    sibling_title: FieldSpec,
    sibling_number: FieldSpec,
    sibling_date: FieldSpec,
    sibling_link: FieldSpec,

    card_grid: RegionSpec,
    card_title: FieldSpec,
    card_link: FieldSpec,
    card_info: FieldSpec,
    card_thumbnail: FieldSpec,

    patterns: EpisodePatterns,
}

impl EpisodeDetailParser {
    pub fn new(selectors: &EpisodeDetailSelectors) -> ParsingResult<Self> {
        Ok(Self {
            series_block: RegionSpec::new("episode.series_block", &selectors.series_block)?,
            series_thumbnail: FieldSpec::image("episode.series_thumbnail", &selectors.series_thumbnail)?,
            series_title: FieldSpec::text("episode.series_title", &selectors.series_title)?,
            series_synopsis: FieldSpec::text("episode.series_synopsis", &selectors.series_synopsis)?,
            series_genres: FieldSpec::text("episode.series_genres", &selectors.series_genres)?,

            title: FieldSpec::text("episode.title", &selectors.title)?,
            release_info: FieldSpec::text("episode.release_info", &selectors.release_info)?,
            mirror_options: RegionSpec::new("episode.mirror_options", &selectors.mirror_options)?,
            navigation_links: RegionSpec::new("episode.navigation_links", &selectors.navigation_links)?,

            sibling_rows: RegionSpec::new("episode.sibling_rows", &selectors.sibling_rows)?,
            sibling_thumbnail: FieldSpec::image("episode.sibling_thumbnail", &selectors.sibling_thumbnail)?,
            sibling_title: FieldSpec::text("episode.sibling_title", &selectors.sibling_title)?,
            sibling_number: FieldSpec::text("episode.sibling_number", &selectors.sibling_number)?,
            sibling_date: FieldSpec::text("episode.sibling_date", &selectors.sibling_date)?,
            sibling_link: FieldSpec::attribute("episode.sibling_link", &selectors.sibling_link, "href")?,

            card_grid: RegionSpec::new("episode.card_grid", &selectors.card_grid)?,
            card_title: FieldSpec::attribute("episode.card_title", &selectors.card_link, "title")?,
            card_link: FieldSpec::attribute("episode.card_link", &selectors.card_link, "href")?,
            card_info: FieldSpec::text("episode.card_info", &selectors.card_info)?,
            card_thumbnail: FieldSpec::image("episode.card_thumbnail", &selectors.card_thumbnail)?,

            patterns: EpisodePatterns::new()?,
        })
    }

    pub fn parse(&self, page: &PageDocument) -> EpisodeDetailRecord {
        let root = page.root();
        let mut series = self.series(root);
        let title = self.title.extract(root);

        if series.title.is_empty() && !title.is_empty() {
            series.title = title
                .split_once(EPISODE_SEPARATOR)
                .map_or_else(|| title.clone(), |(head, _)| head.to_string());
        }

        let servers = self.servers(root);
        let downloads = self.patterns.download_table(&servers);
        let siblings = self.siblings(page, &series);

        EpisodeDetailRecord {
            url: page.url.to_string(),
            title,
            thumbnail: series.thumbnail.clone(),
            release_info: self.release_info.extract(root),
            servers,
            downloads,
            navigation: self.navigation(page),
            series,
            siblings,
        }
    }

    fn series(&self, root: ElementRef<'_>) -> SeriesSummary {
        let Some(block) = self.series_block.first(root) else {
            return SeriesSummary::default();
        };

        let mut seen = HashSet::new();
        SeriesSummary {
            title: self.series_title.extract(block),
            thumbnail: self.series_thumbnail.extract(block),
            synopsis: self.series_synopsis.extract(block),
            genres: self
                .series_genres
                .extract_all(block)
                .into_iter()
                .filter(|genre| seen.insert(genre.clone()))
                .collect(),
        }
    }

    fn servers(&self, root: ElementRef<'_>) -> Vec<StreamingServer> {
        self.mirror_options
            .select(root)
            .into_iter()
            .filter_map(|option| {
                let encoded = option.value().attr("value").unwrap_or_default();
                if encoded.trim().is_empty() {
                    return None;
                }
                let name = element_text(option).trim().to_string();
                match self.patterns.decode_mirror(&name, encoded) {
                    Ok(server) => Some(server),
                    Err(e) => {
                        warn!("Skipping mirror: {}", e);
                        None
                    }
                }
            })
            .collect()
    }

    /// Anchors are scanned narrowest scope first; the first match per slot wins.
    fn navigation(&self, page: &PageDocument) -> EpisodeNavigation {
        let mut navigation = EpisodeNavigation::default();
        for anchor in self.navigation_links.select_each(page.root()) {
            let href = absolute_url(&page.url, anchor.value().attr("href").unwrap_or_default());
            if href.is_empty() {
                continue;
            }
            let label = element_text(anchor).to_lowercase();
            let slot = if ALL_EPISODES_MARKERS.iter().any(|m| label.contains(m)) {
                &mut navigation.all_episodes
            } else if PREVIOUS_MARKERS.iter().any(|m| label.contains(m)) {
                &mut navigation.previous
            } else if NEXT_MARKERS.iter().any(|m| label.contains(m)) {
                &mut navigation.next
            } else {
                continue;
            };
            if slot.is_empty() {
                *slot = href;
            }
        }
        navigation
    }

    fn siblings(&self, page: &PageDocument, series: &SeriesSummary) -> Vec<SiblingEpisode> {
        let root = page.root();
        let mut siblings: Vec<SiblingEpisode> = self
            .sibling_rows
            .select(root)
            .into_iter()
            .map(|row| {
                let url = self.sibling_link.extract_url(row, &page.url);
                let mut title = self.sibling_title.extract(row);
                if title.is_empty() {
                    title = synthesize_episode_title(&url, &series.title, &self.sibling_number.extract(row));
                }
                SiblingEpisode {
                    title,
                    release_date: self.sibling_date.extract(row),
                    thumbnail: non_empty_or(self.sibling_thumbnail.extract(row), &series.thumbnail),
                    url,
                }
            })
            .collect();

        if siblings.is_empty() {
            debug!("No episode list on {}, reading episode cards", page.url);
            siblings = self
                .card_grid
                .select(root)
                .into_iter()
                .map(|card| {
                    let mut title = self.card_title.extract(card);
                    if title.is_empty() && !series.title.is_empty() {
                        let info = self.card_info.extract(card);
                        title = if info.is_empty() {
                            series.title.clone()
                        } else {
                            format!("{} {info}", series.title)
                        };
                    }
                    SiblingEpisode {
                        title,
                        url: self.card_link.extract_url(card, &page.url),
                        release_date: String::new(),
                        thumbnail: non_empty_or(self.card_thumbnail.extract(card), &series.thumbnail),
                    }
                })
                .collect();
        }

        for sibling in siblings.iter_mut().filter(|s| s.title.is_empty()) {
            sibling.title = synthesize_episode_title(&sibling.url, &series.title, "");
        }
        siblings
    }
}

fn non_empty_or(value: String, fallback: &str) -> String {
    if value.is_empty() { fallback.to_string() } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use url::Url;

    fn parse_fixture(name: &str, body: &str) -> EpisodeDetailRecord {
        let parser = EpisodeDetailParser::new(&EpisodeDetailSelectors::default()).unwrap();
        let url = Url::parse(&format!("https://gomunime.co/{name}/")).unwrap();
        parser.parse(&PageDocument::parse(body, &url))
    }

    #[rstest]
    #[case("Nakama 1080p", "1080p")]
    #[case("Pixeldrain 720P", "720p")]
    #[case("Nakama HD", "HD")]
    #[case("Mega 4k", "HD")]
    fn buckets_servers_by_resolution(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(EpisodePatterns::new().unwrap().resolution_of(name), expected);
    }

    #[rstest]
    #[case("https://gomunime.co/frieren-episode-7/", "Sousou no Frieren", "", "Sousou no Frieren Episode 7")]
    #[case("https://gomunime.co/frieren-episode-7/", "Sousou no Frieren", "8", "Sousou no Frieren Episode 8")]
    #[case("https://gomunime.co/frieren-special/", "Sousou no Frieren", "", "Sousou no Frieren")]
    #[case("https://gomunime.co/frieren-special/", "", "", "Frieren Special")]
    #[case("", "", "", "Unknown Episode")]
    fn synthesizes_missing_titles(
        #[case] url: &str,
        #[case] series: &str,
        #[case] number: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(synthesize_episode_title(url, series, number), expected);
    }

    #[test]
    fn bad_mirror_payload_is_recoverable_error() {
        let patterns = EpisodePatterns::new().unwrap();
        let err = patterns.decode_mirror("Broken", "%%%not-base64%%%").unwrap_err();
        assert!(err.is_recoverable());

        // Decodes, but carries no src attribute
        let no_src = STANDARD.encode("<div>nothing here</div>");
        assert!(patterns.decode_mirror("Empty", &no_src).is_err());
    }

    #[test]
    fn episode_page() {
        let record = parse_fixture(
            "sousou-no-frieren-episode-2",
            include_str!("../../tests/fixtures/episode_detail.html"),
        );

        assert_eq!(record.title, "Sousou no Frieren Episode 2 Subtitle Indonesia");
        assert_eq!(record.thumbnail, "https://gomunime.co/wp-content/uploads/2023/09/frieren.jpg");
        assert_eq!(record.release_info, "October 6, 2023");
        assert_eq!(record.series.title, "Sousou no Frieren");
        assert_eq!(record.series.genres, vec!["Adventure", "Drama", "Fantasy"]);

        // One broken mirror and the placeholder option are skipped
        assert_eq!(record.servers.len(), 2);
        assert_eq!(record.servers[0].name, "Nakama 1080p");
        assert_eq!(record.servers[0].url, "https://pixeldrain.com/api/file/Ra5A3rtj");

        let group = record.downloads.group(STREAM_DOWNLOAD_GROUP).unwrap();
        assert_eq!(group["1080p"][0].provider, "Nakama 1080p");
        assert_eq!(group["HD"][0].url, "https://mega.nz/embed/abc");

        assert_eq!(record.navigation.previous, "https://gomunime.co/sousou-no-frieren-episode-1/");
        assert_eq!(record.navigation.next, "https://gomunime.co/sousou-no-frieren-episode-3/");
        assert_eq!(record.navigation.all_episodes, "https://gomunime.co/anime/sousou-no-frieren/");

        assert_eq!(record.siblings.len(), 2);
        assert_eq!(record.siblings[0].title, "Sousou no Frieren Episode 3");
        assert_eq!(record.siblings[0].thumbnail, "https://gomunime.co/wp-content/uploads/2023/09/frieren.jpg");
        assert_eq!(record.siblings[1].title, "Frieren Ep 1: The End of the Journey");
    }

    #[test]
    fn card_grid_is_secondary_sibling_source() {
        let body = r#"<html><body>
            <h1 class="entry-title">Dandadan Episode 4</h1>
            <div class="bixbox mctn">
              <article class="bs"><a href="/dandadan-episode-3/"><span class="epx">Ep 3</span><img src="https://gomunime.co/wp-content/uploads/d3.jpg"></a></article>
              <article class="bs"><a href="/dandadan-episode-5/" title="Dandadan Episode 5"></a></article>
            </div></body></html>"#;
        let record = parse_fixture("dandadan-episode-4", body);

        assert_eq!(record.series.title, "Dandadan");
        assert_eq!(record.siblings.len(), 2);
        assert_eq!(record.siblings[0].title, "Dandadan Ep 3");
        assert_eq!(record.siblings[0].release_date, "");
        assert_eq!(record.siblings[1].title, "Dandadan Episode 5");
        assert!(record.servers.is_empty());
        assert!(record.downloads.is_empty());
    }
}
