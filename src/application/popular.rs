//! Popularity ranking widgets of the home page sidebar

use scraper::ElementRef;

use crate::domain::{PopularEntry, PopularRankings};
use crate::infrastructure::parsing::config::PopularSelectors;
use crate::infrastructure::parsing::{FieldSpec, PageDocument, ParsingResult, RegionSpec, Transform};

const GENRES_PREFIX: &str = "Genres:";
const GENRE_SEPARATOR: &str = ",";

pub struct PopularParser {
    weekly: RegionSpec,
    monthly: RegionSpec,
    all_time: RegionSpec,
    rows: RegionSpec,
    rank: FieldSpec,
    title: FieldSpec,
    url: FieldSpec,
    thumbnail: FieldSpec,
    genres: FieldSpec,
    score: FieldSpec,
}

impl PopularParser {
    pub fn new(selectors: &PopularSelectors) -> ParsingResult<Self> {
        Ok(Self {
            weekly: RegionSpec::new("popular.weekly", &selectors.weekly)?,
            monthly: RegionSpec::new("popular.monthly", &selectors.monthly)?,
            all_time: RegionSpec::new("popular.all_time", &selectors.all_time)?,
            rows: RegionSpec::new("popular.rows", &selectors.rows)?,
            rank: FieldSpec::text("popular.rank", &selectors.rank)?,
            title: FieldSpec::text("popular.title", &selectors.title_link)?,
            url: FieldSpec::attribute("popular.url", &selectors.title_link, "href")?,
            thumbnail: FieldSpec::image("popular.thumbnail", &selectors.thumbnail)?,
            genres: FieldSpec::text("popular.genres", &selectors.genres)?
                .with_transform(Transform::CollapseWhitespace)
                .with_transform(Transform::StripPrefix(GENRES_PREFIX.to_string())),
            score: FieldSpec::text("popular.score", &selectors.score)?,
        })
    }

    pub fn parse(&self, page: &PageDocument) -> PopularRankings {
        let root = page.root();
        PopularRankings {
            weekly: self.widget(&self.weekly, root, page),
            monthly: self.widget(&self.monthly, root, page),
            all_time: self.widget(&self.all_time, root, page),
        }
    }

    fn widget(&self, region: &RegionSpec, root: ElementRef<'_>, page: &PageDocument) -> Vec<PopularEntry> {
        let Some(widget) = region.first(root) else {
            return Vec::new();
        };
        self.rows
            .select(widget)
            .into_iter()
            .map(|row| PopularEntry {
                rank: self.rank.extract(row).parse().unwrap_or(0),
                title: self.title.extract(row),
                url: self.url.extract_url(row, &page.url),
                thumbnail: self.thumbnail.extract(row),
                genres: self
                    .genres
                    .extract(row)
                    .split(GENRE_SEPARATOR)
                    .map(str::trim)
                    .filter(|genre| !genre.is_empty())
                    .map(str::to_string)
                    .collect(),
                score: self.score.extract(row),
            })
            .collect()
    }
}
