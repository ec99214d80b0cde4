//! Listing cards and their AJAX hover fragments
//!
//! The same card markup backs the home page, paginated releases, search
//! results and genre pages. Only the meaning of the badge differs: release
//! cards show the episode number, search and genre cards show the airing
//! status.

use scraper::ElementRef;
use tracing::debug;

use crate::domain::{DetailPayload, ListItem};
use crate::infrastructure::parsing::config::{HoverSelectors, ListingSelectors};
use crate::infrastructure::parsing::{
    ContextualParser, FieldSpec, PageDocument, ParsingResult, RegionSpec, Transform, element_text,
};

/// Literal label printed after the number on release badges.
const EPISODE_LABEL: &str = "Episode";

const DURATION_MARKER: &str = "min. per ep.";
const STATUS_ROW: &str = "Status:";
const GENRES_ROW: &str = "Genres:";
const STUDIO_ROW: &str = "Studio:";

/// How the card badge is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardFlavor {
    /// Badge is the latest episode (`12 Episode` -> `12`)
    Release,
    /// Badge is the airing status
    Search,
}

pub struct ListingParser {
    cards: RegionSpec,
    post_id: FieldSpec,
    title: FieldSpec,
    url: FieldSpec,
    thumbnail: FieldSpec,
    episode: FieldSpec,
    status: FieldSpec,
    kind: FieldSpec,
}

impl ListingParser {
    pub fn new(selectors: &ListingSelectors) -> ParsingResult<Self> {
        Ok(Self {
            cards: RegionSpec::new("listing.card", &selectors.card)?,
            post_id: FieldSpec::attribute("listing.post_id", &selectors.link, "rel")?,
            title: FieldSpec::attribute("listing.title", &selectors.link, "title")?,
            url: FieldSpec::attribute("listing.url", &selectors.link, "href")?,
            thumbnail: FieldSpec::image("listing.thumbnail", &selectors.thumbnail)?,
            episode: FieldSpec::text("listing.episode", &selectors.badge)?
                .with_transform(Transform::StripLiteral(EPISODE_LABEL.to_string())),
            status: FieldSpec::text("listing.status", &selectors.badge)?,
            kind: FieldSpec::text("listing.kind", &selectors.kind)?,
        })
    }

    /// Baseline record of one card, `None` when the card has no post id.
    pub fn parse_card(&self, card: ElementRef<'_>, page: &PageDocument, flavor: CardFlavor) -> Option<ListItem> {
        let post_id = self.post_id.extract(card);
        if post_id.is_empty() {
            return None;
        }

        let mut item = ListItem {
            title: self.title.extract(card),
            url: self.url.extract_url(card, &page.url),
            thumbnail: self.thumbnail.extract(card),
            post_id,
            kind: self.kind.extract(card),
            ..ListItem::default()
        };
        match flavor {
            CardFlavor::Release => item.episode = self.episode.extract(card),
            CardFlavor::Search => item.status = self.status.extract(card),
        }
        Some(item)
    }
}

impl ContextualParser for ListingParser {
    type Output = Vec<ListItem>;
    type Context = CardFlavor;

    /// Cards in document order. Cards without a post id cannot be enriched and are skipped.
    fn parse_with_context(&self, page: &PageDocument, flavor: &CardFlavor) -> Vec<ListItem> {
        let cards = self.cards.select(page.root());
        let items: Vec<ListItem> = cards
            .iter()
            .filter_map(|card| self.parse_card(*card, page, *flavor))
            .collect();

        if items.len() < cards.len() {
            debug!("Skipped {} cards without post id on {}", cards.len() - items.len(), page.url);
        }
        items
    }
}

/// Parser for the `tooltip_action` AJAX fragment.
pub struct HoverParser {
    root: RegionSpec,
    info_badges: RegionSpec,
    rating_marker: RegionSpec,
    synopsis: FieldSpec,
    info_rows: RegionSpec,
    row_links: FieldSpec,
    genre_links: FieldSpec,
}

impl HoverParser {
    pub fn new(selectors: &HoverSelectors) -> ParsingResult<Self> {
        Ok(Self {
            root: RegionSpec::new("hover.root", &selectors.root)?,
            info_badges: RegionSpec::new("hover.info_badges", &selectors.info_badges)?,
            rating_marker: RegionSpec::new("hover.rating_marker", &selectors.rating_marker)?,
            synopsis: FieldSpec::text("hover.synopsis", &selectors.synopsis)?,
            info_rows: RegionSpec::new("hover.info_rows", &selectors.info_rows)?,
            row_links: FieldSpec::text("hover.row_links", &selectors.row_links)?,
            genre_links: FieldSpec::text("hover.genre_links", &selectors.genre_links)?,
        })
    }

    /// Detail fields of a hover fragment. A fragment without the info block yields an empty payload.
    pub fn parse(&self, fragment: &PageDocument) -> DetailPayload {
        let Some(root) = self.root.first(fragment.root()) else {
            return DetailPayload::default();
        };

        let mut payload = DetailPayload {
            synopsis: self.synopsis.extract(root),
            ..DetailPayload::default()
        };

        for badge in self.info_badges.select(root) {
            let text = element_text(badge).trim().to_string();
            if text.contains(DURATION_MARKER) {
                payload.duration = text;
            } else if self.rating_marker.first(badge).is_some() {
                payload.rating = text;
            }
        }

        for row in self.info_rows.select(root) {
            let text = element_text(row);
            let text = text.trim();
            if let Some(status) = text.strip_prefix(STATUS_ROW) {
                payload.status = status.trim().to_string();
            } else if text.starts_with(GENRES_ROW) {
                payload.genres.extend(self.row_links.extract_all(row));
            } else if text.starts_with(STUDIO_ROW) {
                payload.studio = self.row_links.extract(row);
            }
        }

        if payload.genres.is_empty() {
            payload.genres = self.genre_links.extract_all(root);
        }
        payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    const LISTING: &str = include_str!("../../tests/fixtures/listing.html");
    const HOVER: &str = include_str!("../../tests/fixtures/hover_frieren.html");

    fn base() -> Url {
        Url::parse("https://gomunime.co/").unwrap()
    }

    #[test]
    fn release_cards_strip_episode_label() {
        let parser = ListingParser::new(&ListingSelectors::default()).unwrap();
        let page = PageDocument::parse(LISTING, &base());
        let items = parser.parse_with_context(&page, &CardFlavor::Release);

        assert_eq!(items.len(), 2);
        let first = &items[0];
        assert_eq!(first.title, "Sousou no Frieren");
        assert_eq!(first.url, "https://gomunime.co/anime/sousou-no-frieren/");
        assert_eq!(first.thumbnail, "https://gomunime.co/wp-content/uploads/2023/09/frieren.jpg");
        assert_eq!(first.post_id, "101");
        assert_eq!(first.episode, "12");
        assert_eq!(first.kind, "TV");
        assert!(first.status.is_empty());
    }

    #[test]
    fn search_cards_read_badge_as_status() {
        let parser = ListingParser::new(&ListingSelectors::default()).unwrap();
        let page = PageDocument::parse(LISTING, &base());
        let items = parser.parse_with_context(&page, &CardFlavor::Search);

        assert_eq!(items[1].status, "Completed");
        assert!(items[1].episode.is_empty());
    }

    #[test]
    fn hover_fragment_yields_detail_payload() {
        let parser = HoverParser::new(&HoverSelectors::default()).unwrap();
        let fragment = PageDocument::parse_fragment(HOVER, &base());
        let payload = parser.parse(&fragment);

        assert_eq!(payload.rating, "9.1");
        assert_eq!(payload.duration, "24 min. per ep.");
        assert_eq!(payload.status, "Ongoing");
        assert_eq!(payload.genres, vec!["Adventure", "Drama", "Fantasy"]);
        assert_eq!(payload.studio, "Madhouse");
        assert!(payload.synopsis.starts_with("The adventure is over"));
    }

    #[test]
    fn genres_fall_back_to_any_info_link() {
        let parser = HoverParser::new(&HoverSelectors::default()).unwrap();
        let fragment = PageDocument::parse_fragment(
            r#"<div class="ingfo"><div class="linginfo"><span><a>Action</a><a>Comedy</a></span></div></div>"#,
            &base(),
        );
        assert_eq!(parser.parse(&fragment).genres, vec!["Action", "Comedy"]);
    }

    #[test]
    fn unrelated_fragment_is_empty_payload() {
        let parser = HoverParser::new(&HoverSelectors::default()).unwrap();
        let fragment = PageDocument::parse_fragment("<p>0</p>", &base());
        assert!(parser.parse(&fragment).is_empty());
    }
}
