//! Selector catalogue for HTML extraction
//!
//! Every logical field maps to an ordered selector list: the first entry is
//! the primary selector, the rest are fallbacks. The catalogue deserializes
//! from configuration so markup changes can be absorbed without a rebuild.

use serde::{Deserialize, Serialize};

fn list(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| (*s).to_string()).collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorCatalogue {
    pub listing: ListingSelectors,
    pub hover: HoverSelectors,
    pub schedule: ScheduleSelectors,
    pub anime_detail: AnimeDetailSelectors,
    pub episode_detail: EpisodeDetailSelectors,
    pub popular: PopularSelectors,
    pub genre: GenreSelectors,
}

/// Listing cards (home page, search results, genre pages, recommendations)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingSelectors {
    pub card: Vec<String>,
    /// Anchor carrying `rel` (post id), `title` and `href`
    pub link: Vec<String>,
    pub thumbnail: Vec<String>,
    /// Episode label on release cards, status label on search cards
    pub badge: Vec<String>,
    pub kind: Vec<String>,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            card: list(&["div.listupd article.bs"]),
            link: list(&["a.tip"]),
            thumbnail: list(&["img"]),
            badge: list(&["span.epx"]),
            kind: list(&[".typez", "div.typez"]),
        }
    }
}

/// AJAX hover fragment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoverSelectors {
    pub root: Vec<String>,
    pub info_badges: Vec<String>,
    pub rating_marker: Vec<String>,
    pub synopsis: Vec<String>,
    pub info_rows: Vec<String>,
    pub row_links: Vec<String>,
    pub genre_links: Vec<String>,
}

impl Default for HoverSelectors {
    fn default() -> Self {
        Self {
            root: list(&["div.ingfo"]),
            info_badges: list(&[".minginfo span.l"]),
            rating_marker: list(&["i.fa-star"]),
            synopsis: list(&[".contexcerpt", "div.ingdesc .contexcerpt"]),
            info_rows: list(&[".linginfo span"]),
            row_links: list(&["a"]),
            genre_links: list(&[".linginfo span a"]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleSelectors {
    pub day: Vec<String>,
    pub day_label: Vec<String>,
    pub entry: Vec<String>,
    pub link: Vec<String>,
    pub release_time: Vec<String>,
    pub thumbnail: Vec<String>,
}

impl Default for ScheduleSelectors {
    fn default() -> Self {
        Self {
            day: list(&["div.bixbox.schedulepage"]),
            day_label: list(&["div.releases h3 span"]),
            entry: list(&["div.bs"]),
            link: list(&["a"]),
            release_time: list(&["span.epx"]),
            thumbnail: list(&["img"]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimeDetailSelectors {
    pub title: Vec<String>,
    pub rating: Vec<String>,
    pub synopsis: Vec<String>,
    pub thumbnail: Vec<String>,
    pub og_image: Vec<String>,
    pub genres: Vec<String>,
    pub detail_rows: Vec<String>,

    pub episode_rows: Vec<String>,
    pub episode_number: Vec<String>,
    pub episode_title: Vec<String>,
    pub episode_link: Vec<String>,
    pub episode_date: Vec<String>,

    /// Cards of the dedicated recommendation block
    pub recommendation_cards: Vec<String>,
    /// Generic boxes; the one whose heading reads `recommendation_heading` is used
    pub recommendation_sections: Vec<String>,
    pub section_heading: Vec<String>,
    pub recommendation_heading: String,
    pub section_cards: Vec<String>,

    // Heuristic strategy for pages on a different template
    pub heuristic_headings: Vec<String>,
    pub heuristic_paragraphs: Vec<String>,
    pub heuristic_images: Vec<String>,
    pub upload_marker: String,
    pub image_extensions: Vec<String>,
    pub min_synopsis_chars: usize,
    pub navigation_words: Vec<String>,
}

impl Default for AnimeDetailSelectors {
    fn default() -> Self {
        Self {
            title: list(&["h1.entry-title", ".bigcontent h1.entry-title"]),
            rating: list(&[".rating strong", ".bigcontent .rating strong"]),
            synopsis: list(&[
                ".bixbox.synp .entry-content p",
                ".bixbox.synp .entry-content",
                ".synp .entry-content",
            ]),
            thumbnail: list(&[
                ".thumbook .thumb img",
                ".bigcontent .thumbook .thumb img",
                ".thumb img, .thumbook img",
            ]),
            og_image: list(&[r#"meta[property="og:image"]"#]),
            genres: list(&[".genxed a", ".bigcontent .genxed a"]),
            detail_rows: list(&[".spe span", ".bigcontent .spe span"]),

            episode_rows: list(&["div.eplister ul li"]),
            episode_number: list(&[".epl-num"]),
            episode_title: list(&[".epl-title"]),
            episode_link: list(&["a"]),
            episode_date: list(&[".epl-date"]),

            recommendation_cards: list(&["div.bixbox.rd-list article.bs"]),
            recommendation_sections: list(&["div.bixbox"]),
            section_heading: list(&["h3 span", "h3"]),
            recommendation_heading: "Recommended Series".to_string(),
            section_cards: list(&[".listupd article.bs"]),

            heuristic_headings: list(&["h1", "h2", "h3"]),
            heuristic_paragraphs: list(&["p"]),
            heuristic_images: list(&["img"]),
            upload_marker: "uploads".to_string(),
            image_extensions: list(&[".jpg", ".jpeg", ".png", ".webp", ".gif"]),
            min_synopsis_chars: 100,
            navigation_words: list(&["watch", "download", "streaming"]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpisodeDetailSelectors {
    pub series_block: Vec<String>,
    pub series_thumbnail: Vec<String>,
    pub series_title: Vec<String>,
    pub series_synopsis: Vec<String>,
    pub series_genres: Vec<String>,

    pub title: Vec<String>,
    pub release_info: Vec<String>,
    pub mirror_options: Vec<String>,
    /// Anchors scanned for prev/next/all-episodes text, narrowest scope first
    pub navigation_links: Vec<String>,

    pub sibling_rows: Vec<String>,
    pub sibling_thumbnail: Vec<String>,
    pub sibling_title: Vec<String>,
    pub sibling_number: Vec<String>,
    pub sibling_date: Vec<String>,
    pub sibling_link: Vec<String>,

    pub card_grid: Vec<String>,
    pub card_link: Vec<String>,
    pub card_info: Vec<String>,
    pub card_thumbnail: Vec<String>,
}

impl Default for EpisodeDetailSelectors {
    fn default() -> Self {
        Self {
            series_block: list(&[".bixbox.single-info"]),
            series_thumbnail: list(&[".thumb img"]),
            series_title: list(&[".infox h2.entry-title"]),
            series_synopsis: list(&[".infox .desc p"]),
            series_genres: list(&[".infox .genxed a"]),

            title: list(&["h1.entry-title"]),
            release_info: list(&[".entry-info .updated", ".epwrapper .updated", ".year .updated"]),
            mirror_options: list(&["select.mirror option"]),
            navigation_links: list(&["div.epnav a", ".naveps a", "a"]),

            sibling_rows: list(&["#mainepisode .episodelist ul li", "div.eplister ul li"]),
            sibling_thumbnail: list(&[".epl-thumb img"]),
            sibling_title: list(&[".epl-title"]),
            sibling_number: list(&[".epl-num"]),
            sibling_date: list(&[".epl-date"]),
            sibling_link: list(&["a"]),

            card_grid: list(&["div.bixbox.mctn article.bs"]),
            card_link: list(&["a"]),
            card_info: list(&[".epx"]),
            card_thumbnail: list(&["img"]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopularSelectors {
    pub weekly: Vec<String>,
    pub monthly: Vec<String>,
    pub all_time: Vec<String>,
    pub rows: Vec<String>,
    pub rank: Vec<String>,
    pub title_link: Vec<String>,
    pub thumbnail: Vec<String>,
    pub genres: Vec<String>,
    pub score: Vec<String>,
}

impl Default for PopularSelectors {
    fn default() -> Self {
        Self {
            weekly: list(&["div.serieslist.pop.wpop-weekly"]),
            monthly: list(&["div.serieslist.pop.wpop-monthly"]),
            all_time: list(&["div.serieslist.pop.wpop-alltime"]),
            rows: list(&["ul li"]),
            rank: list(&[".ctr"]),
            title_link: list(&[".leftseries h4 a"]),
            thumbnail: list(&[".imgseries img"]),
            genres: list(&[".leftseries span"]),
            score: list(&[".numscore"]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenreSelectors {
    pub catalogue_links: Vec<String>,
}

impl Default for GenreSelectors {
    fn default() -> Self {
        Self {
            catalogue_links: list(&["div#sidebar ul.genre li a"]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_override_keeps_defaults() {
        let json = r#"{ "listing": { "card": ["div.grid article"] } }"#;
        let catalogue: SelectorCatalogue = serde_json::from_str(json).unwrap();

        assert_eq!(catalogue.listing.card, vec!["div.grid article"]);
        assert_eq!(catalogue.listing.link, vec!["a.tip"]);
        assert_eq!(catalogue.hover, HoverSelectors::default());
    }
}
