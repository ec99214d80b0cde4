//! Genre catalogue from the sidebar of genre pages

use crate::domain::GenreLink;
use crate::infrastructure::parsing::config::GenreSelectors;
use crate::infrastructure::parsing::{PageDocument, ParsingResult, RegionSpec, absolute_url, element_text};

pub struct GenreCatalogueParser {
    links: RegionSpec,
}

impl GenreCatalogueParser {
    pub fn new(selectors: &GenreSelectors) -> ParsingResult<Self> {
        Ok(Self {
            links: RegionSpec::new("genre.catalogue_links", &selectors.catalogue_links)?,
        })
    }

    pub fn parse(&self, page: &PageDocument) -> Vec<GenreLink> {
        self.links
            .select(page.root())
            .into_iter()
            .map(|link| GenreLink {
                name: element_text(link).trim().to_string(),
                url: absolute_url(&page.url, link.value().attr("href").unwrap_or_default()),
            })
            .filter(|genre| !genre.name.is_empty())
            .collect()
    }
}
