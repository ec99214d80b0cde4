//! End-to-end workflow tests over canned pages
//!
//! The fetcher serves fixtures keyed by URL and form body, with an optional
//! delay per route so detail responses can be made to complete in a chosen
//! order.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use gomunime_scraper_lib::application::dto;
use gomunime_scraper_lib::domain::{ConfidenceScore, ListItem};
use gomunime_scraper_lib::infrastructure::{AppConfig, CollectorError, PageFetcher, PageRequest, gomunime};
use gomunime_scraper_lib::{AnimeScraper, ScrapeError};

const LISTING: &str = include_str!("fixtures/listing.html");
const LISTING_CROWDED: &str = include_str!("fixtures/listing_crowded.html");
const LISTING_OWN_ONLY: &str = include_str!("fixtures/listing_own_only.html");
const HOVER_FRIEREN: &str = include_str!("fixtures/hover_frieren.html");
const HOVER_KIMETSU: &str = include_str!("fixtures/hover_kimetsu.html");
const SCHEDULE: &str = include_str!("fixtures/schedule.html");
const ANIME_DETAIL: &str = include_str!("fixtures/anime_detail.html");
const ANIME_DETAIL_ALT: &str = include_str!("fixtures/anime_detail_alt.html");
const EPISODE_DETAIL: &str = include_str!("fixtures/episode_detail.html");

const KUSURIYA_URL: &str = "https://gomunime.co/anime/kusuriya-no-hitorigoto/";

struct Route {
    body: &'static str,
    delay: Duration,
}

#[derive(Default)]
struct CannedSite {
    routes: HashMap<(String, Option<String>), Route>,
}

impl CannedSite {
    fn page(mut self, url: &str, body: &'static str) -> Self {
        self.routes.insert(
            (url.to_string(), None),
            Route {
                body,
                delay: Duration::ZERO,
            },
        );
        self
    }

    fn hover(mut self, post_id: &str, body: &'static str, delay: Duration) -> Self {
        self.routes.insert(
            (gomunime::AJAX_URL.to_string(), Some(gomunime::hover_request_body(post_id))),
            Route { body, delay },
        );
        self
    }

    /// Home page listing with both hover fragments.
    fn with_listing(self, url: &str, frieren_delay: Duration, kimetsu_delay: Duration) -> Self {
        self.page(url, LISTING)
            .hover("101", HOVER_FRIEREN, frieren_delay)
            .hover("102", HOVER_KIMETSU, kimetsu_delay)
    }

    fn into_scraper(self) -> AnimeScraper {
        let mut config = AppConfig::default();
        config.cache.enabled = false;
        config.collector.request_delay_ms = 0;
        AnimeScraper::new(config, Arc::new(self)).unwrap()
    }
}

#[async_trait]
impl PageFetcher for CannedSite {
    async fn fetch(&self, request: &PageRequest) -> Result<String, CollectorError> {
        let key = (request.url.clone(), request.body.clone());
        match self.routes.get(&key) {
            Some(route) => {
                tokio::time::sleep(route.delay).await;
                Ok(route.body.to_string())
            }
            None => Err(CollectorError::transport(&request.url, "no route")),
        }
    }
}

fn by_post_id(mut items: Vec<ListItem>) -> Vec<ListItem> {
    items.sort_by(|a, b| a.post_id.cmp(&b.post_id));
    items
}

#[tokio::test]
async fn detail_merge_is_independent_of_arrival_order() {
    let slow = Duration::from_millis(150);

    let frieren_last = CannedSite::default()
        .with_listing(gomunime::BASE_URL, slow, Duration::ZERO)
        .into_scraper()
        .latest_releases(1)
        .await
        .unwrap();
    let kimetsu_last = CannedSite::default()
        .with_listing(gomunime::BASE_URL, Duration::ZERO, slow)
        .into_scraper()
        .latest_releases(1)
        .await
        .unwrap();

    // Completion order shows through, content does not depend on it
    assert_eq!(frieren_last.data[0].post_id, "102");
    assert_eq!(kimetsu_last.data[0].post_id, "101");

    let left = by_post_id(frieren_last.data);
    let right = by_post_id(kimetsu_last.data);
    assert_eq!(left, right);

    assert_eq!(left.len(), 2);
    assert_eq!(left[0].title, "Sousou no Frieren");
    assert_eq!(left[0].url, "https://gomunime.co/anime/sousou-no-frieren/");
    assert_eq!(left[0].episode, "12");
    assert_eq!(left[0].rating, "9.1");
    assert_eq!(left[0].studio, "Madhouse");
    assert_eq!(left[1].rating, "8.5");
    assert_eq!(left[1].studio, "ufotable");
    assert_eq!(frieren_last.confidence, ConfidenceScore::COMPLETE);
    assert_eq!(kimetsu_last.confidence, ConfidenceScore::COMPLETE);
}

#[tokio::test]
async fn failed_detail_request_keeps_the_card() {
    let latest = CannedSite::default()
        .page(gomunime::BASE_URL, LISTING)
        .hover("101", HOVER_FRIEREN, Duration::ZERO)
        .into_scraper()
        .latest_releases(1)
        .await
        .unwrap();

    let items = by_post_id(latest.data);
    assert_eq!(items.len(), 2);
    assert_eq!(items[1].title, "Kimetsu no Yaiba: Mugen Ressha-hen");
    assert!(items[1].rating.is_empty());
    assert!(items[1].studio.is_empty());
    assert_eq!(latest.confidence, ConfidenceScore::COMPLETE);
}

#[tokio::test]
async fn unreachable_entry_page_fails_the_workflow() {
    let err = CannedSite::default().into_scraper().latest_releases(2).await.unwrap_err();
    match err {
        ScrapeError::EntryPageUnreachable { url, .. } => assert_eq!(url, "https://gomunime.co/page/2/"),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn search_shapes_results() {
    let scraper = CannedSite::default()
        .with_listing("https://gomunime.co/?s=frieren", Duration::ZERO, Duration::ZERO)
        .into_scraper();
    let results = scraper.search("frieren").await.unwrap();
    assert_eq!(results.data.len(), 2);

    let shaped = dto::listing::<dto::SearchResultItem>(&results.data, gomunime::SOURCE_LABEL);
    assert_eq!(shaped.data.len(), 2);
    assert_eq!(shaped.source, "gomunime.co");
}

#[tokio::test]
async fn genre_page_carries_catalogue() {
    let genre = CannedSite::default()
        .with_listing("https://gomunime.co/genres/action/", Duration::ZERO, Duration::ZERO)
        .into_scraper()
        .genre("action", 1)
        .await
        .unwrap();

    assert_eq!(genre.data.genre, "action");
    assert_eq!(genre.data.page, 1);
    assert_eq!(genre.data.catalogue.len(), 3);
    assert_eq!(genre.data.items.len(), 2);
    assert!(genre.confidence.is_complete());
}

#[tokio::test]
async fn schedule_by_day() {
    let schedule = CannedSite::default()
        .page(gomunime::SCHEDULE_URL, SCHEDULE)
        .into_scraper()
        .schedule()
        .await
        .unwrap();

    let days: Vec<_> = schedule.data.iter().map(|day| day.day.as_str()).collect();
    assert_eq!(days, vec!["Senin", "Rabu"]);

    let monday = dto::schedule_for_day(&schedule.data, "senin", gomunime::SOURCE_LABEL).unwrap();
    assert_eq!(monday.data[0].title, "Sousou no Frieren");
    assert_eq!(monday.data[0].release_time, "22:30");

    let sunday = dto::schedule_for_day(&schedule.data, "Minggu", gomunime::SOURCE_LABEL);
    assert!(sunday.unwrap_err().is_not_found());
}

#[tokio::test]
async fn episode_slug_recovers_the_series() {
    let anime = CannedSite::default()
        .page("https://gomunime.co/anime/sousou-no-frieren/", ANIME_DETAIL)
        .into_scraper()
        .anime_detail_with_recovery("sousou-no-frieren-episode-2")
        .await
        .unwrap();

    assert_eq!(anime.data.slug, "sousou-no-frieren");
    assert_eq!(anime.data.title, "Sousou no Frieren");
    assert_eq!(anime.data.recommendations.len(), 2);
    assert!(anime.confidence.is_complete());

    let shaped = dto::anime_detail(&anime.data, gomunime::SOURCE_LABEL);
    assert_eq!(shaped.data.episode_list.len(), 2);
}

#[tokio::test]
async fn empty_recommendations_fall_back_to_latest_releases() {
    let anime = CannedSite::default()
        .page(KUSURIYA_URL, ANIME_DETAIL_ALT)
        .with_listing(gomunime::BASE_URL, Duration::ZERO, Duration::ZERO)
        .into_scraper()
        .anime_detail_with_recovery("kusuriya-no-hitorigoto")
        .await
        .unwrap();

    let mut urls: Vec<_> = anime.data.recommendations.iter().map(|r| r.url.as_str()).collect();
    urls.sort_unstable();
    assert_eq!(
        urls,
        vec![
            "https://gomunime.co/anime/kimetsu-no-yaiba-mugen-ressha-hen/",
            "https://gomunime.co/anime/sousou-no-frieren/",
        ]
    );
}

#[tokio::test]
async fn fallback_takes_three_and_skips_the_series_itself() {
    // Shuffled picks differ between runs, the invariants must not
    for _ in 0..8 {
        let anime = CannedSite::default()
            .page(KUSURIYA_URL, ANIME_DETAIL_ALT)
            .page(gomunime::BASE_URL, LISTING_CROWDED)
            .into_scraper()
            .anime_detail_with_recovery("kusuriya-no-hitorigoto")
            .await
            .unwrap();

        let recommendations = &anime.data.recommendations;
        assert_eq!(recommendations.len(), 3);
        assert!(recommendations.iter().all(|r| r.url != KUSURIYA_URL));

        let mut urls: Vec<_> = recommendations.iter().map(|r| r.url.as_str()).collect();
        urls.sort_unstable();
        urls.dedup();
        assert_eq!(urls.len(), 3);
    }
}

#[tokio::test]
async fn fallback_is_empty_when_latest_holds_only_the_series() {
    let anime = CannedSite::default()
        .page(KUSURIYA_URL, ANIME_DETAIL_ALT)
        .page(gomunime::BASE_URL, LISTING_OWN_ONLY)
        .into_scraper()
        .anime_detail_with_recovery("kusuriya-no-hitorigoto")
        .await
        .unwrap();

    assert_eq!(anime.data.title, "Kusuriya no Hitorigoto");
    assert!(anime.data.recommendations.is_empty());
}

#[tokio::test]
async fn fallback_failure_leaves_recommendations_empty() {
    let anime = CannedSite::default()
        .page(KUSURIYA_URL, ANIME_DETAIL_ALT)
        .into_scraper()
        .anime_detail_with_recovery("kusuriya-no-hitorigoto")
        .await
        .unwrap();

    assert_eq!(anime.data.title, "Kusuriya no Hitorigoto");
    assert!(anime.data.recommendations.is_empty());
}

#[tokio::test]
async fn titleless_page_is_not_found() {
    let err = CannedSite::default()
        .page("https://gomunime.co/anime/nope/", "<html><body></body></html>")
        .into_scraper()
        .anime_detail_with_recovery("nope")
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn episode_detail_end_to_end() {
    let url = "https://gomunime.co/sousou-no-frieren-episode-2/";
    let episode = CannedSite::default()
        .page(url, EPISODE_DETAIL)
        .into_scraper()
        .episode_detail(url)
        .await
        .unwrap();

    assert_eq!(episode.data.servers.len(), 2);
    assert!(episode.confidence.is_complete());

    let shaped = dto::episode_detail(&episode.data, gomunime::SOURCE_LABEL).unwrap();
    let json = serde_json::to_value(&shaped).unwrap();
    assert_eq!(
        json["data"]["download_links"]["MP4 (from Stream)"]["1080p"][0]["url"],
        "https://pixeldrain.com/api/file/Ra5A3rtj"
    );
}

#[tokio::test]
async fn home_combines_latest_and_schedule() {
    let sources = CannedSite::default()
        .with_listing(gomunime::BASE_URL, Duration::ZERO, Duration::ZERO)
        .page(gomunime::SCHEDULE_URL, SCHEDULE)
        .into_scraper()
        .home_sources()
        .await
        .unwrap();

    let home = dto::home(&sources, gomunime::SOURCE_LABEL);
    assert_eq!(home.data.top10.len(), 2);
    assert_eq!(home.data.movies.len(), 2);
    assert_eq!(home.data.new_eps.len(), 1);
    assert_eq!(home.data.jadwal_rilis.len(), 2);
}
