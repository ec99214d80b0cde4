//! Declarative field extraction
//!
//! A [`FieldSpec`] is an ordered list of selectors (primary first, then
//! fallbacks) plus a value source and a chain of transforms. Evaluation is a
//! single "first non-empty wins" pass; a field that matches nothing yields an
//! empty value, never an error.

use scraper::{ElementRef, Selector};
use url::Url;

use super::error::{ParsingError, ParsingResult};

/// Attribute probed before `src` on lazily loaded images.
pub const LAZY_IMAGE_ATTR: &str = "data-src";
pub const IMAGE_ATTR: &str = "src";

/// Where the value of a matched element comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Concatenated text of the element and its descendants
    Text,
    /// A named attribute
    Attribute(String),
    /// `data-src`, then `src`, skipping inline `data:` placeholders
    LazyImage,
}

/// Post-processing applied to a raw value, in order, before the emptiness check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transform {
    Trim,
    /// Remove every occurrence of a literal label
    StripLiteral(String),
    StripPrefix(String),
    CaseFold,
    CollapseWhitespace,
}

impl Transform {
    fn apply(&self, value: String) -> String {
        match self {
            Self::Trim => value.trim().to_string(),
            Self::StripLiteral(literal) => value.replace(literal.as_str(), ""),
            Self::StripPrefix(prefix) => value
                .trim_start()
                .strip_prefix(prefix.as_str())
                .map_or(value.clone(), str::to_string),
            Self::CaseFold => value.to_lowercase(),
            Self::CollapseWhitespace => value.split_whitespace().collect::<Vec<_>>().join(" "),
        }
    }
}

/// Compiled selector list shared by [`FieldSpec`] and [`RegionSpec`].
#[derive(Debug, Clone)]
struct SelectorChain {
    selectors: Vec<(String, Selector)>,
}

impl SelectorChain {
    fn compile(field: &str, sources: &[String]) -> ParsingResult<Self> {
        if sources.is_empty() {
            return Err(ParsingError::EmptySelectorList {
                field: field.to_string(),
            });
        }

        let selectors = sources
            .iter()
            .map(|source| {
                Selector::parse(source)
                    .map(|selector| (source.clone(), selector))
                    .map_err(|e| ParsingError::invalid_selector(field, source, e))
            })
            .collect::<ParsingResult<Vec<_>>>()?;

        Ok(Self { selectors })
    }
}

/// Extraction recipe for one logical field.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    chain: SelectorChain,
    source: ValueSource,
    transforms: Vec<Transform>,
}

impl FieldSpec {
    /// Text content, trimmed.
    pub fn text(field: &str, selectors: &[String]) -> ParsingResult<Self> {
        Ok(Self {
            chain: SelectorChain::compile(field, selectors)?,
            source: ValueSource::Text,
            transforms: vec![Transform::Trim],
        })
    }

    pub fn attribute(field: &str, selectors: &[String], attribute: &str) -> ParsingResult<Self> {
        Ok(Self {
            chain: SelectorChain::compile(field, selectors)?,
            source: ValueSource::Attribute(attribute.to_string()),
            transforms: vec![Transform::Trim],
        })
    }

    pub fn image(field: &str, selectors: &[String]) -> ParsingResult<Self> {
        Ok(Self {
            chain: SelectorChain::compile(field, selectors)?,
            source: ValueSource::LazyImage,
            transforms: vec![Transform::Trim],
        })
    }

    /// Append a transform. A trailing trim is kept last.
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        if self.transforms.last() == Some(&Transform::Trim) {
            self.transforms.insert(self.transforms.len() - 1, transform);
        } else {
            self.transforms.push(transform);
        }
        self
    }

    /// First non-empty value over the selector chain.
    ///
    /// Text sources join every match of a selector; attribute sources take the
    /// first match whose attribute is non-empty.
    pub fn extract(&self, fragment: ElementRef<'_>) -> String {
        for (_, selector) in &self.chain.selectors {
            let value = match self.source {
                ValueSource::Text => {
                    let joined = fragment
                        .select(selector)
                        .map(element_text)
                        .filter(|text| !text.trim().is_empty())
                        .collect::<Vec<_>>()
                        .join(" ");
                    self.finish(joined)
                }
                ValueSource::Attribute(_) | ValueSource::LazyImage => fragment
                    .select(selector)
                    .filter_map(|el| self.read_attribute(el))
                    .map(|raw| self.finish(raw))
                    .find(|value| !value.is_empty())
                    .unwrap_or_default(),
            };
            if !value.is_empty() {
                return value;
            }
        }
        String::new()
    }

    /// Every non-empty value of the first selector that yields any.
    pub fn extract_all(&self, fragment: ElementRef<'_>) -> Vec<String> {
        for (_, selector) in &self.chain.selectors {
            let values: Vec<String> = fragment
                .select(selector)
                .filter_map(|el| match self.source {
                    ValueSource::Text => Some(element_text(el)),
                    _ => self.read_attribute(el),
                })
                .map(|raw| self.finish(raw))
                .filter(|value| !value.is_empty())
                .collect();
            if !values.is_empty() {
                return values;
            }
        }
        Vec::new()
    }

    /// Extract a link and resolve it against the page URL.
    pub fn extract_url(&self, fragment: ElementRef<'_>, base: &Url) -> String {
        absolute_url(base, &self.extract(fragment))
    }

    fn read_attribute(&self, element: ElementRef<'_>) -> Option<String> {
        match &self.source {
            ValueSource::Text => None,
            ValueSource::Attribute(name) => element.value().attr(name).map(str::to_string),
            ValueSource::LazyImage => image_source(element),
        }
    }

    fn finish(&self, raw: String) -> String {
        self.transforms
            .iter()
            .fold(raw, |value, transform| transform.apply(value))
    }
}

/// Selector chain that locates repeated regions (cards, rows, days).
#[derive(Debug, Clone)]
pub struct RegionSpec {
    chain: SelectorChain,
}

impl RegionSpec {
    pub fn new(field: &str, selectors: &[String]) -> ParsingResult<Self> {
        Ok(Self {
            chain: SelectorChain::compile(field, selectors)?,
        })
    }

    /// Matches of the first selector that matches anything, in document order.
    pub fn select<'a>(&self, fragment: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        self.chain
            .selectors
            .iter()
            .map(|(_, selector)| fragment.select(selector).collect::<Vec<_>>())
            .find(|matches| !matches.is_empty())
            .unwrap_or_default()
    }

    /// Matches of every selector, each tried independently, in chain order.
    pub fn select_each<'a>(&self, fragment: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        self.chain
            .selectors
            .iter()
            .flat_map(|(_, selector)| fragment.select(selector))
            .collect()
    }

    pub fn first<'a>(&self, fragment: ElementRef<'a>) -> Option<ElementRef<'a>> {
        self.select(fragment).into_iter().next()
    }
}

/// Text of an element and all descendants.
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

/// Lazy image source of an `<img>`: `data-src` first, then a non-placeholder `src`.
pub fn image_source(element: ElementRef<'_>) -> Option<String> {
    let attr = |name: &str| {
        element
            .value()
            .attr(name)
            .map(str::trim)
            .filter(|value| !value.is_empty() && !value.starts_with("data:"))
    };
    attr(LAZY_IMAGE_ATTR).or_else(|| attr(IMAGE_ATTR)).map(str::to_string)
}

/// Resolve `href` against `base`; empty and fragment-only links stay empty.
pub fn absolute_url(base: &Url, href: &str) -> String {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return String::new();
    }
    base.join(href)
        .map_or_else(|_| href.to_string(), |resolved| resolved.to_string())
}
