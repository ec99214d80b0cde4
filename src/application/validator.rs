//! Confidence validator
//!
//! All-or-nothing: a record scores 1.0 when every required field is present
//! and 0.0 otherwise. Lists score 0.0 when empty, because an empty listing
//! page is indistinguishable from a broken selector.

use crate::domain::{
    AnimeDetailRecord, ConfidenceScore, EpisodeDetailRecord, GenrePage, ListItem, PopularEntry, PopularRankings,
    ScheduleDay, ScheduleEntry,
};

/// Per-record required-field gate.
pub trait RequiredFields {
    fn has_required_fields(&self) -> bool;
}

pub fn score<T: RequiredFields + ?Sized>(record: &T) -> ConfidenceScore {
    ConfidenceScore::from_completeness(record.has_required_fields())
}

/// Non-empty list where every item passes.
pub fn score_list<T: RequiredFields>(items: &[T]) -> ConfidenceScore {
    ConfidenceScore::from_completeness(!items.is_empty() && all_complete(items))
}

pub fn all_complete<T: RequiredFields>(items: &[T]) -> bool {
    items.iter().all(RequiredFields::has_required_fields)
}

/// Every value is non-blank.
pub fn present(values: &[&str]) -> bool {
    values.iter().all(|value| !value.trim().is_empty())
}

impl<T: RequiredFields> RequiredFields for [T] {
    fn has_required_fields(&self) -> bool {
        all_complete(self)
    }
}

impl RequiredFields for ListItem {
    fn has_required_fields(&self) -> bool {
        present(&[&self.title, &self.url, &self.thumbnail, &self.slug()])
    }
}

impl RequiredFields for ScheduleEntry {
    fn has_required_fields(&self) -> bool {
        present(&[&self.title, &self.url])
    }
}

impl RequiredFields for ScheduleDay {
    fn has_required_fields(&self) -> bool {
        present(&[&self.day]) && !self.entries.is_empty() && all_complete(&self.entries)
    }
}

impl RequiredFields for AnimeDetailRecord {
    fn has_required_fields(&self) -> bool {
        present(&[&self.title, &self.url, &self.thumbnail, &self.slug])
            && self.episodes.iter().all(|episode| present(&[&episode.url]))
    }
}

impl RequiredFields for EpisodeDetailRecord {
    fn has_required_fields(&self) -> bool {
        present(&[&self.title]) && self.servers.iter().any(|server| present(&[&server.url]))
    }
}

impl RequiredFields for PopularEntry {
    fn has_required_fields(&self) -> bool {
        present(&[&self.title, &self.url])
    }
}

impl RequiredFields for PopularRankings {
    fn has_required_fields(&self) -> bool {
        let lists = [&self.weekly, &self.monthly, &self.all_time];
        lists.iter().any(|list| !list.is_empty()) && lists.iter().all(|list| all_complete(list.as_slice()))
    }
}

impl RequiredFields for GenrePage {
    fn has_required_fields(&self) -> bool {
        !self.items.is_empty() && all_complete(&self.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EpisodeEntry, StreamingServer};
    use rstest::rstest;

    fn item() -> ListItem {
        ListItem {
            title: "Sousou no Frieren".into(),
            url: "https://gomunime.co/anime/sousou-no-frieren/".into(),
            thumbnail: "https://gomunime.co/wp-content/uploads/frieren.jpg".into(),
            post_id: "101".into(),
            ..ListItem::default()
        }
    }

    #[test]
    fn complete_list_scores_one() {
        assert_eq!(score_list(&[item(), item()]), ConfidenceScore::COMPLETE);
    }

    #[rstest]
    #[case::title(|i: &mut ListItem| i.title.clear())]
    #[case::url(|i: &mut ListItem| i.url.clear())]
    #[case::thumbnail(|i: &mut ListItem| i.thumbnail = "  ".into())]
    #[case::slug(|i: &mut ListItem| i.url = "https://gomunime.co/".into())]
    fn any_missing_field_scores_zero(#[case] blank: fn(&mut ListItem)) {
        let mut broken = item();
        blank(&mut broken);
        assert_eq!(score_list(&[item(), broken]), ConfidenceScore::INCOMPLETE);
    }

    #[test]
    fn empty_lists() {
        let empty: [ListItem; 0] = [];
        assert_eq!(score_list(&empty), ConfidenceScore::INCOMPLETE);
        assert!(all_complete(&empty));
    }

    #[test]
    fn episode_needs_a_playable_server() {
        let mut record = EpisodeDetailRecord {
            title: "Frieren Episode 2".into(),
            ..EpisodeDetailRecord::default()
        };
        assert!(!score(&record).is_complete());

        record.servers.push(StreamingServer {
            name: "Nakama 1080p".into(),
            url: String::new(),
        });
        assert!(!score(&record).is_complete());

        record.servers.push(StreamingServer {
            name: "Mega".into(),
            url: "https://mega.nz/embed/abc".into(),
        });
        assert!(score(&record).is_complete());
    }

    #[test]
    fn anime_detail_checks_every_episode() {
        let mut record = AnimeDetailRecord {
            slug: "sousou-no-frieren".into(),
            url: "https://gomunime.co/anime/sousou-no-frieren/".into(),
            title: "Sousou no Frieren".into(),
            thumbnail: "https://gomunime.co/wp-content/uploads/frieren.jpg".into(),
            episodes: vec![EpisodeEntry {
                url: "https://gomunime.co/sousou-no-frieren-episode-1/".into(),
                ..EpisodeEntry::default()
            }],
            ..AnimeDetailRecord::default()
        };
        assert!(score(&record).is_complete());

        record.episodes.push(EpisodeEntry::default());
        assert!(!score(&record).is_complete());
    }

    #[test]
    fn schedule_day_without_entries_fails() {
        let day = ScheduleDay {
            day: "Senin".into(),
            entries: Vec::new(),
        };
        assert!(!day.has_required_fields());
    }
}
