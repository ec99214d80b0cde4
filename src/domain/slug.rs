//! Slug helpers shared by workflows and response shaping.

use url::Url;

const EPISODE_MARKERS: [&str; 3] = ["-episode-", "-ep-", "-eps-"];

/// Last non-empty path segment of a URL (`.../anime/frieren/` -> `frieren`).
pub fn slug_from_url(url: &str) -> String {
    let path = Url::parse(url).map_or_else(
        |_| url.split(['?', '#']).next().unwrap_or_default().to_string(),
        |parsed| parsed.path().to_string(),
    );
    path.trim_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Recover a series slug from an episode slug.
///
/// Cuts at the first episode marker, otherwise drops a trailing numeric
/// segment. The flag reports whether anything was removed.
pub fn sanitize_episode_slug(slug: &str) -> (String, bool) {
    for marker in EPISODE_MARKERS {
        if let Some(index) = slug.find(marker) {
            return (slug[..index].to_string(), true);
        }
    }

    match slug.rsplit_once('-') {
        Some((series, tail)) if is_number(tail) => (series.to_string(), true),
        _ => (slug.to_string(), false),
    }
}

/// `shingeki-no-KYOJIN` -> `Shingeki No Kyojin`
pub fn slug_to_title(slug: &str) -> String {
    slug.replace('-', " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Capitalize each dash-separated part of a path segment, leaving the rest as is.
pub fn segment_to_title(segment: &str) -> String {
    segment
        .split('-')
        .map(|part| {
            let mut chars = part.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Trailing numeric part of the first dash-separated path segment that has one.
pub fn trailing_episode_number(url: &str) -> Option<String> {
    url.split('/')
        .filter(|part| part.contains('-'))
        .find_map(|part| part.rsplit('-').next().filter(|tail| is_number(tail)))
        .map(str::to_string)
}

fn is_number(value: &str) -> bool {
    let digits = value.strip_prefix(['-', '+']).unwrap_or(value);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}
