use crate::app::ports::EventsProvider;
use crate::error::{AppError, Result};
use crate::metrics::PipelineMetrics;
use crate::types::{Fetched, RawEventPage};
use futures::future::join_all;
use tracing::{debug, info, instrument, warn};

/// Number of pages needed to cover `total_entries`, capped at `max_pages`
pub fn required_pages(total_entries: u32, max_pages: u32, page_size: u32) -> u32 {
    let total = u64::from(total_entries);
    let cap = u64::from(max_pages) * u64::from(page_size);
    if total < cap {
        total.div_ceil(u64::from(page_size)) as u32
    } else {
        max_pages
    }
}

/// Fetches every calendar page of a location.
///
/// Page 1 is awaited alone to learn the total; the remaining pages are fetched
/// concurrently and returned in page order.
pub struct PaginatedEventFetcher<'a> {
    provider: &'a dyn EventsProvider,
    max_pages: u32,
    page_size: u32,
}

impl<'a> PaginatedEventFetcher<'a> {
    pub fn new(provider: &'a dyn EventsProvider, max_pages: u32, page_size: u32) -> Self {
        Self {
            provider,
            max_pages,
            page_size,
        }
    }

    #[instrument(skip(self))]
    pub async fn fetch_all(&self, location: &str) -> Result<Vec<Fetched<RawEventPage>>> {
        let first = self
            .provider
            .fetch_events_page(location, 1)
            .await
            .map_err(|e| AppError::FirstPage {
                location: location.to_string(),
                source: Box::new(e),
            })?;
        PipelineMetrics::record_page(first.is_empty());

        let total_entries = match &first {
            Fetched::Data(page) => page.total_entries,
            Fetched::Empty => {
                warn!("First calendar page unavailable, treating location as empty");
                return Ok(vec![first]);
            }
        };

        let req_pages = required_pages(total_entries, self.max_pages, self.page_size);
        info!(total_entries, req_pages, "Planning calendar fetch");

        let mut pages = Vec::with_capacity(req_pages.max(1) as usize);
        pages.push(first);
        if req_pages > 1 {
            let rest = join_all((2..=req_pages).map(|page| self.fetch_page(location, page))).await;
            pages.extend(rest);
        }
        Ok(pages)
    }

    /// One page with its failure contained, so siblings are unaffected
    async fn fetch_page(&self, location: &str, page: u32) -> Fetched<RawEventPage> {
        let fetched = match self.provider.fetch_events_page(location, page).await {
            Ok(fetched) => fetched,
            Err(e) => {
                warn!(page, error = %e, "Calendar page failed, skipping");
                Fetched::Empty
            }
        };
        PipelineMetrics::record_page(fetched.is_empty());
        debug!(page, empty = fetched.is_empty(), "Calendar page settled");
        fetched
    }
}
