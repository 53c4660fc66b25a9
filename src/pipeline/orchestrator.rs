use crate::apis::{LastFmClient, SongkickClient};
use crate::app::ports::{EventsProvider, HttpClientPort, TagProvider};
use crate::config::{Config, PipelineSettings};
use crate::error::Result;
use crate::metrics::PipelineMetrics;
use crate::pipeline::aggregate::GenreAggregator;
use crate::pipeline::enrich::{flatten_pages, ArtistEnricher};
use crate::pipeline::fetch::PaginatedEventFetcher;
use crate::pipeline::reshape::reshape;
use crate::types::OutputRecord;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, Instrument};
use uuid::Uuid;

/// Runs fetch, enrichment, ranking and reshaping for one location.
///
/// Every phase completes before the next one starts. Working data lives only
/// for the duration of `run`.
pub struct GenrePipeline {
    events: Arc<dyn EventsProvider>,
    tags: Arc<dyn TagProvider>,
    settings: PipelineSettings,
}

impl GenrePipeline {
    pub fn new(
        events: Arc<dyn EventsProvider>,
        tags: Arc<dyn TagProvider>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            events,
            tags,
            settings,
        }
    }

    /// Wire the Songkick and Last.fm clients from configuration
    pub fn from_config(config: &Config, http: Arc<dyn HttpClientPort>) -> Result<Self> {
        let songkick = SongkickClient::new(
            http.clone(),
            &config.providers.songkick_base_url,
            config.songkick_api_key.clone(),
        )?;
        let lastfm = LastFmClient::new(
            http,
            &config.providers.lastfm_base_url,
            config.lastfm_api_key.clone(),
        )?;
        Ok(Self::new(
            Arc::new(songkick),
            Arc::new(lastfm),
            config.pipeline.clone(),
        ))
    }

    pub fn events_provider(&self) -> Arc<dyn EventsProvider> {
        self.events.clone()
    }

    pub async fn run(&self, location: &str) -> Result<Vec<OutputRecord>> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("genre_pipeline", %run_id, location);
        self.run_phases(location).instrument(span).await
    }

    async fn run_phases(&self, location: &str) -> Result<Vec<OutputRecord>> {
        let started = Instant::now();
        info!("Starting pipeline");

        let fetcher = PaginatedEventFetcher::new(
            self.events.as_ref(),
            self.settings.max_pages,
            self.settings.page_size,
        );
        let pages = match fetcher.fetch_all(location).await {
            Ok(pages) => pages,
            Err(e) => {
                error!("Pipeline failed: {}", e);
                PipelineMetrics::record_run_failure();
                return Err(e);
            }
        };
        let page_count = pages.len();

        let mut events = flatten_pages(pages);
        let enrichment = ArtistEnricher::new(self.tags.as_ref())
            .enrich(&mut events)
            .await;

        let hot_genres = GenreAggregator::from_settings(&self.settings).hot_genres(&events);
        let records = reshape(&events, &hot_genres);

        let elapsed = started.elapsed();
        PipelineMetrics::record_run(elapsed.as_secs_f64(), records.len());
        info!(
            pages = page_count,
            events = events.len(),
            artists = enrichment.lookups,
            tagged = enrichment.tagged,
            hot_genres = hot_genres.len(),
            records = records.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Pipeline finished"
        );
        Ok(records)
    }
}
