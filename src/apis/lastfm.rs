use crate::app::ports::{HttpClientPort, TagProvider};
use crate::constants::LASTFM_PROVIDER;
use crate::error::{AppError, Result};
use crate::types::{Fetched, GenreTag};
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// `artist.gettoptags` response; `toptags` is missing on error payloads
#[derive(Debug, Deserialize)]
struct TopTagsResponse {
    #[serde(default)]
    toptags: Option<TopTags>,
}

#[derive(Debug, Deserialize)]
struct TopTags {
    #[serde(default)]
    tag: Option<OneOrMany>,
}

/// Older Last.fm JSON collapses single-element lists into an object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<GenreTag>),
    One(GenreTag),
}

impl From<OneOrMany> for Vec<GenreTag> {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::Many(tags) => tags,
            OneOrMany::One(tag) => vec![tag],
        }
    }
}

/// Client for Last.fm artist tag lookups
pub struct LastFmClient {
    http: Arc<dyn HttpClientPort>,
    base_url: Url,
    api_key: String,
}

impl LastFmClient {
    pub fn new(http: Arc<dyn HttpClientPort>, base_url: &str, api_key: impl Into<String>) -> Result<Self> {
        let base_url =
            Url::parse(base_url).map_err(|e| AppError::Url(format!("{}: {}", base_url, e)))?;
        Ok(Self {
            http,
            base_url,
            api_key: api_key.into(),
        })
    }

    pub fn top_tags_url(&self, artist_name: &str) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("method", "artist.gettoptags")
            .append_pair("artist", artist_name)
            .append_pair("api_key", &self.api_key)
            .append_pair("format", "json");
        url
    }
}

#[async_trait]
impl TagProvider for LastFmClient {
    #[instrument(skip(self), fields(provider = LASTFM_PROVIDER))]
    async fn fetch_artist_tags(&self, artist_name: &str) -> Result<Fetched<Vec<GenreTag>>> {
        let url = self.top_tags_url(artist_name);
        let response = self.http.get(url.as_str()).await?;
        if !response.is_success() {
            let err = AppError::ProviderUnavailable {
                provider: LASTFM_PROVIDER,
                status: response.status,
            };
            warn!("{}", err);
            return Ok(Fetched::Empty);
        }

        let body: TopTagsResponse = serde_json::from_slice(&response.bytes)?;
        let tags = body.toptags.and_then(|t| t.tag).map(Vec::<GenreTag>::from);
        if tags.is_none() {
            debug!("No toptags field in response");
        }
        Ok(tags.into())
    }
}
