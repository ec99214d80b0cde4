//! HTML parsing infrastructure
//!
//! Declarative field extraction over `scraper` documents, driven by a
//! configurable selector catalogue.

pub mod config;
pub mod error;
pub mod field_extractor;

pub use config::SelectorCatalogue;
pub use error::{ParsingError, ParsingResult};
pub use field_extractor::{FieldSpec, RegionSpec, Transform, ValueSource, absolute_url, element_text, image_source};

use scraper::Html;
use url::Url;

/// Parse a page and keep its URL for link resolution.
///
/// Parsers take a `&PageDocument` so handlers see the same resolved base as
/// the request that produced the body.
pub struct PageDocument {
    pub html: Html,
    pub url: Url,
}

impl PageDocument {
    pub fn parse(body: &str, url: &Url) -> Self {
        Self {
            html: Html::parse_document(body),
            url: url.clone(),
        }
    }

    /// AJAX responses are fragments, not full documents.
    pub fn parse_fragment(body: &str, url: &Url) -> Self {
        Self {
            html: Html::parse_fragment(body),
            url: url.clone(),
        }
    }

    pub fn root(&self) -> scraper::ElementRef<'_> {
        self.html.root_element()
    }
}

/// Parser over a page that needs context besides the HTML itself.
pub trait ContextualParser {
    type Output;
    type Context;

    fn parse_with_context(&self, page: &PageDocument, context: &Self::Context) -> Self::Output;
}
