//! Record assembler: one method per workflow
//!
//! Every workflow configures its own [`Collector`], visits an entry page,
//! parses it synchronously and, for listing pages, fans out one hover
//! request per card through a [`DetailCorrelator`]. Parsed documents never
//! live across an await point.

use std::sync::Arc;

use tracing::{debug, info, warn};
use url::Url;

use crate::application::anime_detail::AnimeDetailParser;
use crate::application::correlator::DetailCorrelator;
use crate::application::episode_detail::EpisodeDetailParser;
use crate::application::error::{ScrapeError, ScrapeResult};
use crate::application::genre::GenreCatalogueParser;
use crate::application::listing::{CardFlavor, HoverParser, ListingParser};
use crate::application::popular::PopularParser;
use crate::application::schedule::ScheduleParser;
use crate::application::validator::{score, score_list};
use crate::domain::slug::sanitize_episode_slug;
use crate::domain::{
    AggregateResult, AnimeDetailRecord, EpisodeDetailRecord, GenrePage, ListItem, PopularRankings, Recommendation,
    ScheduleDay,
};
use crate::infrastructure::{
    AppConfig, Collector, CollectorMode, CollectorOptions, ContextualParser, HttpClient, HttpClientConfig,
    PageDocument, PageFetcher, ResponseCache, SelectorCatalogue,
};

/// Recommendations borrowed from the latest releases when a series has none.
const FALLBACK_RECOMMENDATIONS: usize = 3;

/// Parsers compiled once from the selector catalogue.
struct ParserSet {
    listing: ListingParser,
    hover: Arc<HoverParser>,
    schedule: ScheduleParser,
    anime: AnimeDetailParser,
    episode: EpisodeDetailParser,
    popular: PopularParser,
    genre: GenreCatalogueParser,
}

impl ParserSet {
    fn compile(selectors: &SelectorCatalogue) -> ScrapeResult<Self> {
        Ok(Self {
            listing: ListingParser::new(&selectors.listing)?,
            hover: Arc::new(HoverParser::new(&selectors.hover)?),
            schedule: ScheduleParser::new(&selectors.schedule)?,
            anime: AnimeDetailParser::new(&selectors.anime_detail, &selectors.listing)?,
            episode: EpisodeDetailParser::new(&selectors.episode_detail)?,
            popular: PopularParser::new(&selectors.popular)?,
            genre: GenreCatalogueParser::new(&selectors.genre)?,
        })
    }
}

/// Inputs of the home aggregate.
#[derive(Debug, Clone)]
pub struct HomeSources {
    pub latest: AggregateResult<Vec<ListItem>>,
    pub schedule: AggregateResult<Vec<ScheduleDay>>,
}

pub struct AnimeScraper {
    config: AppConfig,
    fetcher: Arc<dyn PageFetcher>,
    cache: Option<Arc<ResponseCache>>,
    parsers: ParserSet,
}

impl AnimeScraper {
    /// Build a scraper over any fetcher. The selector catalogue is compiled
    /// here, so a bad selector fails before any request is sent.
    pub fn new(config: AppConfig, fetcher: Arc<dyn PageFetcher>) -> ScrapeResult<Self> {
        config.validate()?;
        let parsers = ParserSet::compile(&config.selectors)?;
        let cache = config
            .cache
            .resolved_directory()
            .map(|dir| Arc::new(ResponseCache::new(dir)));
        if let Some(cache) = &cache {
            debug!("Response cache at {}", cache.directory().display());
        }

        Ok(Self {
            config,
            fetcher,
            cache,
            parsers,
        })
    }

    /// Scraper backed by the `reqwest` client.
    pub fn from_config(config: AppConfig) -> ScrapeResult<Self> {
        let client = HttpClient::new(HttpClientConfig::new(
            config.site.user_agent.clone(),
            config.collector.request_timeout(),
        ))
        .map_err(ScrapeError::Client)?;
        Self::new(config, Arc::new(client))
    }

    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    fn collector(&self, mode: CollectorMode) -> Collector {
        Collector::new(
            Arc::clone(&self.fetcher),
            self.cache.clone(),
            &CollectorOptions {
                mode,
                request_delay: self.config.collector.request_delay(),
                request_timeout: self.config.collector.request_timeout(),
            },
        )
    }

    /// Single-flight visit of an entry page.
    async fn fetch_entry(&self, url: &str) -> ScrapeResult<(String, Url)> {
        let page_url = Url::parse(url).map_err(|e| ScrapeError::invalid_url(url, e))?;
        let body = self
            .collector(CollectorMode::SingleFlight)
            .visit(url)
            .await
            .map_err(|e| ScrapeError::unreachable(url, e))?;
        Ok((body, page_url))
    }

    /// Visit a listing page and enrich every card with its hover details.
    ///
    /// `also` reads anything else the workflow needs from the same page.
    async fn fan_out<E>(
        &self,
        url: &str,
        flavor: CardFlavor,
        parallelism: usize,
        also: impl FnOnce(&PageDocument) -> E,
    ) -> ScrapeResult<(Vec<ListItem>, E)> {
        let page_url = Url::parse(url).map_err(|e| ScrapeError::invalid_url(url, e))?;
        let mut collector = self.collector(CollectorMode::Fanout { parallelism });
        let body = collector
            .visit(url)
            .await
            .map_err(|e| ScrapeError::unreachable(url, e))?;

        let (cards, extra) = {
            let page = PageDocument::parse(&body, &page_url);
            (self.parsers.listing.parse_with_context(&page, &flavor), also(&page))
        };
        debug!("{} cards on {}", cards.len(), url);

        let mut correlator = DetailCorrelator::new(
            &self.config.site.ajax_url,
            Arc::clone(&self.parsers.hover),
            self.config.collector.detail_channel_capacity,
        )?;
        for card in cards {
            correlator.issue(&mut collector, card);
        }
        Ok((correlator.finish(&mut collector).await, extra))
    }

    /// Latest episode releases. Page 1 is the site root.
    pub async fn latest_releases(&self, page: u32) -> ScrapeResult<AggregateResult<Vec<ListItem>>> {
        let url = self.config.site.listing_url(page);
        let parallelism = if page > 1 {
            self.config.collector.paged_parallelism
        } else {
            self.config.collector.latest_parallelism
        };
        info!("Collecting latest releases (page {})", page.max(1));

        let (items, ()) = self.fan_out(&url, CardFlavor::Release, parallelism, |_| ()).await?;
        let confidence = score_list(&items);
        info!("Latest releases: {} items, confidence {:.1}", items.len(), confidence.value());
        Ok(AggregateResult::new(items, confidence))
    }

    pub async fn search(&self, query: &str) -> ScrapeResult<AggregateResult<Vec<ListItem>>> {
        let url = self.config.site.search_url(query);
        info!("Searching for '{}'", query);

        let (items, ()) = self
            .fan_out(&url, CardFlavor::Search, self.config.collector.search_parallelism, |_| ())
            .await?;
        let confidence = score_list(&items);
        info!("Search '{}': {} results, confidence {:.1}", query, items.len(), confidence.value());
        Ok(AggregateResult::new(items, confidence))
    }

    /// One page of a genre listing plus the sidebar catalogue.
    pub async fn genre(&self, genre: &str, page: u32) -> ScrapeResult<AggregateResult<GenrePage>> {
        let url = self.config.site.genre_url(genre, page);
        info!("Collecting genre '{}' (page {})", genre, page.max(1));

        let catalogue_parser = &self.parsers.genre;
        let (items, catalogue) = self
            .fan_out(&url, CardFlavor::Search, self.config.collector.genre_parallelism, |doc| {
                catalogue_parser.parse(doc)
            })
            .await?;

        let result = GenrePage {
            genre: genre.to_string(),
            page: page.max(1),
            catalogue,
            items,
        };
        let confidence = score(&result);
        info!("Genre '{}': {} items, confidence {:.1}", genre, result.items.len(), confidence.value());
        Ok(AggregateResult::new(result, confidence))
    }

    pub async fn schedule(&self) -> ScrapeResult<AggregateResult<Vec<ScheduleDay>>> {
        let url = self.config.site.schedule_url.clone();
        info!("Collecting release schedule");

        let (body, page_url) = self.fetch_entry(&url).await?;
        let days = self.parsers.schedule.parse(&PageDocument::parse(&body, &page_url));
        let confidence = score_list(&days);
        info!("Schedule: {} days, confidence {:.1}", days.len(), confidence.value());
        Ok(AggregateResult::new(days, confidence))
    }

    /// Anime detail page for a series slug, as found.
    ///
    /// A page without a title is returned with zero confidence; see
    /// [`Self::anime_detail_with_recovery`] for the lookup that treats it as missing.
    pub async fn anime_detail(&self, slug: &str) -> ScrapeResult<AggregateResult<AnimeDetailRecord>> {
        let url = self.config.site.anime_url(slug);
        info!("Collecting anime detail for '{}'", slug);

        let (body, page_url) = self.fetch_entry(&url).await?;
        let record = self
            .parsers
            .anime
            .parse_with_context(&PageDocument::parse(&body, &page_url), &slug.to_string());
        let confidence = score(&record);
        info!(
            "Anime '{}': {} episodes, {} recommendations, confidence {:.1}",
            slug,
            record.episodes.len(),
            record.recommendations.len(),
            confidence.value()
        );
        Ok(AggregateResult::new(record, confidence))
    }

    /// Anime detail that recovers from episode slugs and never returns an
    /// empty recommendation list when the latest releases can fill it.
    pub async fn anime_detail_with_recovery(&self, slug: &str) -> ScrapeResult<AggregateResult<AnimeDetailRecord>> {
        let first = self.anime_detail(slug).await;
        let mut result = match first {
            Ok(found) if found.data.is_found() => found,
            first => {
                let (series, changed) = sanitize_episode_slug(slug);
                if !changed {
                    return Err(match first {
                        Err(e) => e,
                        Ok(_) => ScrapeError::not_found("Anime", slug),
                    });
                }
                info!("No anime at '{}', retrying as '{}'", slug, series);
                let retry = self.anime_detail(&series).await?;
                if !retry.data.is_found() {
                    return Err(ScrapeError::not_found("Anime", slug));
                }
                retry
            }
        };

        if result.data.recommendations.is_empty() {
            result.data.recommendations = self.fallback_recommendations(&result.data.slug).await;
        }
        Ok(result)
    }

    /// Random picks from the first page of latest releases, excluding the series itself.
    async fn fallback_recommendations(&self, own_slug: &str) -> Vec<Recommendation> {
        let mut latest = match self.latest_releases(1).await {
            Ok(latest) => latest.data,
            Err(e) => {
                warn!("No fallback recommendations for '{}': {}", own_slug, e);
                return Vec::new();
            }
        };
        fastrand::shuffle(&mut latest);
        latest
            .into_iter()
            .filter(|item| item.slug() != own_slug)
            .take(FALLBACK_RECOMMENDATIONS)
            .map(Recommendation::from)
            .collect()
    }

    /// Episode page by full URL.
    pub async fn episode_detail(&self, url: &str) -> ScrapeResult<AggregateResult<EpisodeDetailRecord>> {
        info!("Collecting episode detail from {}", url);

        let (body, page_url) = self.fetch_entry(url).await?;
        let record = self.parsers.episode.parse(&PageDocument::parse(&body, &page_url));
        let confidence = score(&record);
        info!(
            "Episode '{}': {} servers, confidence {:.1}",
            record.title,
            record.servers.len(),
            confidence.value()
        );
        Ok(AggregateResult::new(record, confidence))
    }

    /// Weekly, monthly and all-time rankings from the home page sidebar.
    pub async fn popular(&self) -> ScrapeResult<AggregateResult<PopularRankings>> {
        let url = self.config.site.listing_url(1);
        info!("Collecting popular rankings");

        let (body, page_url) = self.fetch_entry(&url).await?;
        let rankings = self.parsers.popular.parse(&PageDocument::parse(&body, &page_url));
        let confidence = score(&rankings);
        Ok(AggregateResult::new(rankings, confidence))
    }

    /// Latest releases and the schedule, collected concurrently.
    pub async fn home_sources(&self) -> ScrapeResult<HomeSources> {
        let (latest, schedule) = tokio::try_join!(self.latest_releases(1), self.schedule())?;
        Ok(HomeSources { latest, schedule })
    }
}
