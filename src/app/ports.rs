use crate::error::Result;
use crate::types::{Fetched, GenreTag, RawEventPage};
use async_trait::async_trait;

// Transport port
#[async_trait]
pub trait HttpClientPort: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpGetResult>;
}

#[derive(Clone, Debug)]
pub struct HttpGetResult {
    pub status: u16,
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl HttpGetResult {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Source of paginated metro-area event listings
#[async_trait]
pub trait EventsProvider: Send + Sync {
    /// Fetch one page of a location's calendar; non-success statuses yield `Empty`
    async fn fetch_events_page(&self, location: &str, page: u32) -> Result<Fetched<RawEventPage>>;

    /// Free-text location search, forwarded verbatim
    async fn search_locations(&self, query: &str) -> Result<Fetched<serde_json::Value>>;
}

/// Source of genre tags for an artist
#[async_trait]
pub trait TagProvider: Send + Sync {
    async fn fetch_artist_tags(&self, artist_name: &str) -> Result<Fetched<Vec<GenreTag>>>;
}
