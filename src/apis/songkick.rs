use crate::app::ports::{EventsProvider, HttpClientPort, HttpGetResult};
use crate::constants::SONGKICK_PROVIDER;
use crate::error::{AppError, Result};
use crate::types::{Fetched, RawEventPage};
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

#[derive(Debug, Deserialize)]
struct CalendarResponse {
    #[serde(rename = "resultsPage")]
    results_page: RawEventPage,
}

/// Client for the Songkick metro-area calendar and location search
pub struct SongkickClient {
    http: Arc<dyn HttpClientPort>,
    base_url: Url,
    api_key: String,
}

impl SongkickClient {
    pub fn new(http: Arc<dyn HttpClientPort>, base_url: &str, api_key: impl Into<String>) -> Result<Self> {
        let base_url =
            Url::parse(base_url).map_err(|e| AppError::Url(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Url(format!("{} cannot be a base URL", base_url)));
        }
        Ok(Self {
            http,
            base_url,
            api_key: api_key.into(),
        })
    }

    fn endpoint(&self, segments: &[&str], params: &[(&str, String)]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Url(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        url.query_pairs_mut()
            .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())))
            .append_pair("apikey", &self.api_key);
        Ok(url)
    }

    pub fn calendar_url(&self, location: &str, page: u32) -> Result<Url> {
        self.endpoint(&["metro_areas", location, "calendar.json"], &[("page", page.to_string())])
    }

    pub fn location_search_url(&self, query: &str) -> Result<Url> {
        self.endpoint(&["search", "locations.json"], &[("query", query.to_string())])
    }

    async fn get_json(&self, url: Url) -> Result<Fetched<HttpGetResult>> {
        let response = self.http.get(url.as_str()).await?;
        if !response.is_success() {
            let err = AppError::ProviderUnavailable {
                provider: SONGKICK_PROVIDER,
                status: response.status,
            };
            warn!(path = url.path(), "{}", err);
            return Ok(Fetched::Empty);
        }
        Ok(Fetched::Data(response))
    }
}

#[async_trait]
impl EventsProvider for SongkickClient {
    #[instrument(skip(self), fields(provider = SONGKICK_PROVIDER))]
    async fn fetch_events_page(&self, location: &str, page: u32) -> Result<Fetched<RawEventPage>> {
        let url = self.calendar_url(location, page)?;
        let response = match self.get_json(url).await? {
            Fetched::Data(response) => response,
            Fetched::Empty => return Ok(Fetched::Empty),
        };

        let calendar: CalendarResponse = serde_json::from_slice(&response.bytes)?;
        debug!(
            total_entries = calendar.results_page.total_entries,
            events = calendar.results_page.events().len(),
            "Fetched calendar page"
        );
        Ok(Fetched::Data(calendar.results_page))
    }

    #[instrument(skip(self), fields(provider = SONGKICK_PROVIDER))]
    async fn search_locations(&self, query: &str) -> Result<Fetched<serde_json::Value>> {
        let url = self.location_search_url(query)?;
        match self.get_json(url).await? {
            Fetched::Data(response) => Ok(Fetched::Data(serde_json::from_slice(&response.bytes)?)),
            Fetched::Empty => Ok(Fetched::Empty),
        }
    }
}
