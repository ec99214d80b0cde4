//! Domain module - scraped records and the values derived from them
//!
//! Records are plain owned data. They are created and mutated inside a single
//! workflow invocation and leave it only through an [`AggregateResult`].

pub mod aggregate;
pub mod anime;
pub mod correlation;
pub mod episode;
pub mod schedule;
pub mod slug;

pub use aggregate::{AggregateResult, ConfidenceScore};
pub use anime::{
    AnimeDetailRecord, DetailKey, DetailMap, DetailPayload, EpisodeEntry, GenreLink, GenrePage,
    ListItem, PopularEntry, PopularRankings, Recommendation,
};
pub use correlation::CorrelationToken;
pub use episode::{
    DownloadProvider, DownloadTable, EpisodeDetailRecord, EpisodeNavigation, SeriesSummary,
    SiblingEpisode, StreamingServer,
};
pub use schedule::{ScheduleDay, ScheduleEntry};
