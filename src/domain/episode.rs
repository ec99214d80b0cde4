use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Group name used for download links derived from streaming mirrors.
pub const STREAM_DOWNLOAD_GROUP: &str = "MP4 (from Stream)";

/// Resolution bucket for servers whose name carries no resolution token.
pub const DEFAULT_RESOLUTION: &str = "HD";

/// A decoded streaming mirror.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamingServer {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadProvider {
    pub provider: String,
    pub url: String,
}

/// Download links keyed by group, then by resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DownloadTable(BTreeMap<String, BTreeMap<String, Vec<DownloadProvider>>>);

impl DownloadTable {
    pub fn push(&mut self, group: &str, resolution: &str, provider: DownloadProvider) {
        self.0
            .entry(group.to_string())
            .or_default()
            .entry(resolution.to_string())
            .or_default()
            .push(provider);
    }

    pub fn group(&self, group: &str) -> Option<&BTreeMap<String, Vec<DownloadProvider>>> {
        self.0.get(group)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn groups(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, Vec<DownloadProvider>>)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeNavigation {
    pub previous: String,
    pub next: String,
    pub all_episodes: String,
}

/// Summary of the series an episode belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub title: String,
    pub thumbnail: String,
    pub synopsis: String,
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiblingEpisode {
    pub title: String,
    pub url: String,
    pub release_date: String,
    pub thumbnail: String,
}

/// Everything the episode page yields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeDetailRecord {
    pub url: String,
    pub title: String,
    pub thumbnail: String,
    pub release_info: String,
    pub servers: Vec<StreamingServer>,
    pub downloads: DownloadTable,
    pub navigation: EpisodeNavigation,
    pub series: SeriesSummary,
    pub siblings: Vec<SiblingEpisode>,
}
