use crate::app::ports::TagProvider;
use crate::metrics::PipelineMetrics;
use crate::types::{AggregatedEvent, Fetched, Performance, RawEventPage};
use futures::future::join_all;
use tracing::{debug, info, instrument, warn};

/// Flatten every non-empty page into working event records, in page order
pub fn flatten_pages(pages: Vec<Fetched<RawEventPage>>) -> Vec<AggregatedEvent> {
    pages
        .into_iter()
        .filter_map(Fetched::into_option)
        .filter(|page| page.total_entries > 0)
        .flat_map(RawEventPage::into_events)
        .map(AggregatedEvent::from)
        .collect()
}

/// Counts from one enrichment pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichmentSummary {
    pub lookups: usize,
    pub tagged: usize,
}

/// Attaches genre tags to every performance of every event.
///
/// Each lookup owns a unique `&mut Performance` for its duration. Repeated
/// artist names are looked up once per appearance.
pub struct ArtistEnricher<'a> {
    provider: &'a dyn TagProvider,
}

impl<'a> ArtistEnricher<'a> {
    pub fn new(provider: &'a dyn TagProvider) -> Self {
        Self { provider }
    }

    #[instrument(skip_all, fields(events = events.len()))]
    pub async fn enrich(&self, events: &mut [AggregatedEvent]) -> EnrichmentSummary {
        let lookups = events
            .iter_mut()
            .flat_map(|event| event.artists.iter_mut())
            .map(|artist| self.enrich_artist(artist));
        let outcomes = join_all(lookups).await;

        let summary = EnrichmentSummary {
            lookups: outcomes.len(),
            tagged: outcomes.iter().filter(|tagged| **tagged).count(),
        };
        info!(lookups = summary.lookups, tagged = summary.tagged, "Artist enrichment complete");
        summary
    }

    async fn enrich_artist(&self, artist: &mut Performance) -> bool {
        let fetched = match self.provider.fetch_artist_tags(&artist.display_name).await {
            Ok(fetched) => fetched,
            Err(e) => {
                warn!(artist = %artist.display_name, error = %e, "Tag lookup failed");
                Fetched::Empty
            }
        };
        PipelineMetrics::record_tag_lookup(fetched.is_empty());

        match fetched {
            Fetched::Data(tags) => {
                debug!(artist = %artist.display_name, tags = tags.len(), "Tagged artist");
                artist.top_genres = Some(tags);
                true
            }
            Fetched::Empty => false,
        }
    }
}
