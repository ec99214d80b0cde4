//! Anime series page
//!
//! Two strategies run in order:
//!
//! 1. **Structural**: the theme's known markup (title heading, info table,
//!    episode list, recommendation boxes).
//! 2. **Heuristic**: only when the structural pass found no title. Scans
//!    generic headings, paragraphs and content images, for pages rendered
//!    with a different template.
//!
//! `Status` and `Type` are finally recovered from the raw page text when the
//! info table did not provide them.

use std::collections::HashSet;

use regex::Regex;
use scraper::ElementRef;
use tracing::debug;

use crate::domain::{AnimeDetailRecord, DetailKey, DetailMap, EpisodeEntry, Recommendation};
use crate::infrastructure::parsing::config::{AnimeDetailSelectors, ListingSelectors};
use crate::infrastructure::parsing::{
    ContextualParser, FieldSpec, PageDocument, ParsingError, ParsingResult, RegionSpec, Transform,
    absolute_url, element_text, image_source,
};

const STATUS_PATTERN: &str = r"(?i)Status:\s*([^\n]+)";
const TYPE_PATTERN: &str = r"(?i)Type:\s*([^\n]+)";
const RATING_LABEL: &str = "Rating";

/// Card fields shared by both recommendation containers.
struct CardFields {
    title: FieldSpec,
    url: FieldSpec,
    thumbnail: FieldSpec,
    episode: FieldSpec,
}

impl CardFields {
    fn new(selectors: &ListingSelectors) -> ParsingResult<Self> {
        Ok(Self {
            title: FieldSpec::attribute("recommendation.title", &selectors.link, "title")?,
            url: FieldSpec::attribute("recommendation.url", &selectors.link, "href")?,
            thumbnail: FieldSpec::image("recommendation.thumbnail", &selectors.thumbnail)?,
            episode: FieldSpec::text("recommendation.episode", &selectors.badge)?,
        })
    }

    fn read(&self, card: ElementRef<'_>, page: &PageDocument) -> Recommendation {
        Recommendation {
            title: self.title.extract(card),
            url: self.url.extract_url(card, &page.url),
            thumbnail: self.thumbnail.extract(card),
            episode: self.episode.extract(card),
            rating: String::new(),
        }
    }
}

struct Heuristics {
    headings: RegionSpec,
    paragraphs: RegionSpec,
    images: RegionSpec,
    upload_marker: String,
    image_extensions: Vec<String>,
    min_synopsis_chars: usize,
    navigation_words: Vec<String>,
}

impl Heuristics {
    fn title(&self, root: ElementRef<'_>) -> String {
        self.headings
            .select_each(root)
            .into_iter()
            .map(|heading| element_text(heading).trim().to_string())
            .find(|text| !text.is_empty())
            .unwrap_or_default()
    }

    /// First paragraph long enough to be prose that is not a watch/download prompt.
    fn synopsis(&self, root: ElementRef<'_>) -> String {
        self.paragraphs
            .select_each(root)
            .into_iter()
            .map(|p| element_text(p).trim().to_string())
            .find(|text| {
                let folded = text.to_lowercase();
                text.chars().count() >= self.min_synopsis_chars
                    && !self.navigation_words.iter().any(|word| folded.contains(word.as_str()))
            })
            .unwrap_or_default()
    }

    /// First image whose resolved URL points into the uploads area.
    fn content_image(&self, page: &PageDocument) -> String {
        self.images
            .select_each(page.root())
            .into_iter()
            .filter_map(image_source)
            .map(|src| absolute_url(&page.url, &src))
            .find(|url| {
                let folded = url.to_lowercase();
                folded.contains(&self.upload_marker)
                    && self.image_extensions.iter().any(|ext| folded.contains(ext.as_str()))
            })
            .unwrap_or_default()
    }
}

pub struct AnimeDetailParser {
    title: FieldSpec,
    rating: FieldSpec,
    synopsis: FieldSpec,
    thumbnail: FieldSpec,
    og_image: FieldSpec,
    genres: FieldSpec,
    detail_rows: RegionSpec,

    episode_rows: RegionSpec,
    episode_number: FieldSpec,
    episode_title: FieldSpec,
    episode_link: FieldSpec,
    episode_date: FieldSpec,

    recommendation_cards: RegionSpec,
    recommendation_sections: RegionSpec,
    section_heading: FieldSpec,
    recommendation_heading: String,
    section_cards: RegionSpec,
    card: CardFields,

    heuristics: Heuristics,
    status_pattern: Regex,
    type_pattern: Regex,
}

impl AnimeDetailParser {
    pub fn new(selectors: &AnimeDetailSelectors, cards: &ListingSelectors) -> ParsingResult<Self> {
        let compile = |pattern: &str| Regex::new(pattern).map_err(|e| ParsingError::invalid_pattern(pattern, e));

        Ok(Self {
            title: FieldSpec::text("anime.title", &selectors.title)?,
            rating: FieldSpec::text("anime.rating", &selectors.rating)?
                .with_transform(Transform::StripLiteral(RATING_LABEL.to_string())),
            synopsis: FieldSpec::text("anime.synopsis", &selectors.synopsis)?,
            thumbnail: FieldSpec::image("anime.thumbnail", &selectors.thumbnail)?,
            og_image: FieldSpec::attribute("anime.og_image", &selectors.og_image, "content")?,
            genres: FieldSpec::text("anime.genres", &selectors.genres)?,
            detail_rows: RegionSpec::new("anime.detail_rows", &selectors.detail_rows)?,

            episode_rows: RegionSpec::new("anime.episode_rows", &selectors.episode_rows)?,
            episode_number: FieldSpec::text("anime.episode_number", &selectors.episode_number)?,
            episode_title: FieldSpec::text("anime.episode_title", &selectors.episode_title)?,
            episode_link: FieldSpec::attribute("anime.episode_link", &selectors.episode_link, "href")?,
            episode_date: FieldSpec::text("anime.episode_date", &selectors.episode_date)?,

            recommendation_cards: RegionSpec::new("anime.recommendation_cards", &selectors.recommendation_cards)?,
            recommendation_sections: RegionSpec::new(
                "anime.recommendation_sections",
                &selectors.recommendation_sections,
            )?,
            section_heading: FieldSpec::text("anime.section_heading", &selectors.section_heading)?,
            recommendation_heading: selectors.recommendation_heading.clone(),
            section_cards: RegionSpec::new("anime.section_cards", &selectors.section_cards)?,
            card: CardFields::new(cards)?,

            heuristics: Heuristics {
                headings: RegionSpec::new("anime.heuristic_headings", &selectors.heuristic_headings)?,
                paragraphs: RegionSpec::new("anime.heuristic_paragraphs", &selectors.heuristic_paragraphs)?,
                images: RegionSpec::new("anime.heuristic_images", &selectors.heuristic_images)?,
                upload_marker: selectors.upload_marker.to_lowercase(),
                image_extensions: selectors.image_extensions.iter().map(|e| e.to_lowercase()).collect(),
                min_synopsis_chars: selectors.min_synopsis_chars,
                navigation_words: selectors.navigation_words.iter().map(|w| w.to_lowercase()).collect(),
            },
            status_pattern: compile(STATUS_PATTERN)?,
            type_pattern: compile(TYPE_PATTERN)?,
        })
    }

    fn structural(&self, page: &PageDocument, record: &mut AnimeDetailRecord) {
        let root = page.root();
        record.title = self.title.extract(root);
        record.rating = self.rating.extract(root);
        record.synopsis = self.synopsis.extract(root);
        record.thumbnail = self.thumbnail.extract(root);
        if record.thumbnail.is_empty() {
            record.thumbnail = self.og_image.extract(root);
        }
        record.genres = self.genres.extract_all(root);

        let mut details = DetailMap::new();
        for row in self.detail_rows.select(root) {
            details.insert_row(&element_text(row));
        }
        record.details = details;
    }

    fn heuristic(&self, page: &PageDocument, record: &mut AnimeDetailRecord) {
        let root = page.root();
        record.title = self.heuristics.title(root);
        if record.synopsis.is_empty() {
            record.synopsis = self.heuristics.synopsis(root);
        }
        if record.thumbnail.is_empty() {
            record.thumbnail = self.heuristics.content_image(page);
        }
    }

    fn recover_from_text(&self, page: &PageDocument, details: &mut DetailMap) {
        let text = page.root().text().collect::<Vec<_>>().join("\n");
        for (key, pattern) in [(DetailKey::Status, &self.status_pattern), (DetailKey::Type, &self.type_pattern)] {
            if !details.well_known(key).is_empty() {
                continue;
            }
            if let Some(value) = pattern
                .captures(&text)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().trim())
                .filter(|value| !value.is_empty())
            {
                details.insert_missing(key, value);
            }
        }
    }

    fn episodes(&self, page: &PageDocument) -> Vec<EpisodeEntry> {
        self.episode_rows
            .select(page.root())
            .into_iter()
            .map(|row| EpisodeEntry {
                number: self.episode_number.extract(row),
                title: self.episode_title.extract(row),
                url: self.episode_link.extract_url(row, &page.url),
                release_date: self.episode_date.extract(row),
            })
            .collect()
    }

    /// Both containers are read independently and merged by URL.
    fn recommendations(&self, page: &PageDocument) -> Vec<Recommendation> {
        let root = page.root();
        let headed_sections = self
            .recommendation_sections
            .select_each(root)
            .into_iter()
            .filter(|section| {
                self.section_heading
                    .extract(*section)
                    .eq_ignore_ascii_case(&self.recommendation_heading)
            })
            .flat_map(|section| self.section_cards.select(section));

        let mut seen = HashSet::new();
        self.recommendation_cards
            .select_each(root)
            .into_iter()
            .chain(headed_sections)
            .map(|card| self.card.read(card, page))
            .filter(|rec| !rec.url.is_empty() && seen.insert(rec.url.clone()))
            .collect()
    }
}

impl ContextualParser for AnimeDetailParser {
    type Output = AnimeDetailRecord;
    /// Slug the page was requested with
    type Context = String;

    fn parse_with_context(&self, page: &PageDocument, slug: &String) -> AnimeDetailRecord {
        let mut record = AnimeDetailRecord {
            slug: slug.clone(),
            url: page.url.to_string(),
            ..AnimeDetailRecord::default()
        };

        self.structural(page, &mut record);
        if record.title.is_empty() {
            debug!("No structured title on {}, trying heuristic extraction", page.url);
            self.heuristic(page, &mut record);
        }
        self.recover_from_text(page, &mut record.details);

        record.episodes = self.episodes(page);
        record.recommendations = self.recommendations(page);
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn parser() -> AnimeDetailParser {
        AnimeDetailParser::new(&AnimeDetailSelectors::default(), &ListingSelectors::default()).unwrap()
    }

    fn parse(body: &str, slug: &str) -> AnimeDetailRecord {
        let url = Url::parse(&format!("https://gomunime.co/anime/{slug}/")).unwrap();
        parser().parse_with_context(&PageDocument::parse(body, &url), &slug.to_string())
    }

    #[test]
    fn structural_page() {
        let record = parse(include_str!("../../tests/fixtures/anime_detail.html"), "sousou-no-frieren");

        assert_eq!(record.title, "Sousou no Frieren");
        assert_eq!(record.url, "https://gomunime.co/anime/sousou-no-frieren/");
        assert_eq!(record.rating, "9.10");
        assert_eq!(record.thumbnail, "https://gomunime.co/wp-content/uploads/2023/09/frieren.jpg");
        assert!(record.synopsis.starts_with("The adventure is over"));
        assert_eq!(record.genres, vec!["Adventure", "Drama", "Fantasy"]);
        assert_eq!(record.details.well_known(DetailKey::Studio), "Madhouse");
        assert_eq!(record.details.well_known(DetailKey::Released), "Sep 29, 2023");
        assert_eq!(record.details.well_known(DetailKey::Status), "Ongoing");

        assert_eq!(record.episodes.len(), 2);
        assert_eq!(record.episodes[0].number, "2");
        assert_eq!(record.episodes[0].url, "https://gomunime.co/sousou-no-frieren-episode-2/");
        assert_eq!(record.episodes[1].release_date, "September 29, 2023");

        // rd-list and the headed box overlap on one entry
        let urls: Vec<_> = record.recommendations.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(
            urls,
            vec!["https://gomunime.co/anime/mushoku-tensei/", "https://gomunime.co/anime/made-in-abyss/"]
        );
        assert_eq!(record.recommendations[0].episode, "Eps 23");
    }

    #[test]
    fn heuristic_page() {
        let record = parse(include_str!("../../tests/fixtures/anime_detail_alt.html"), "kusuriya-no-hitorigoto");

        assert_eq!(record.title, "Kusuriya no Hitorigoto");
        assert_eq!(record.thumbnail, "https://gomunime.co/wp-content/uploads/2023/10/kusuriya.webp");
        assert!(record.synopsis.starts_with("Maomao"));
        assert_eq!(record.details.well_known(DetailKey::Status), "Completed");
        assert_eq!(record.details.well_known(DetailKey::Type), "TV");
    }

    #[test]
    fn og_image_is_last_thumbnail_fallback() {
        let body = r#"<html><head><meta property="og:image" content="https://gomunime.co/og.jpg"></head>
            <body><h1 class="entry-title">Title</h1></body></html>"#;
        assert_eq!(parse(body, "title").thumbnail, "https://gomunime.co/og.jpg");
    }

    #[test]
    fn missing_page_is_not_found() {
        let record = parse("<html><body></body></html>", "nope");
        assert!(!record.is_found());
        assert!(record.episodes.is_empty());
    }
}
