use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Outcome of a single provider call.
///
/// Providers answer `Empty` when they respond with a non-success status or
/// without the field we asked for. It is a normal value, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    Data(T),
    Empty,
}

impl<T> Fetched<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            Fetched::Data(value) => Some(value),
            Fetched::Empty => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Fetched::Empty)
    }
}

impl<T> From<Option<T>> for Fetched<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Fetched::Empty, Fetched::Data)
    }
}

/// One page of a metro area calendar
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEventPage {
    #[serde(default)]
    pub total_entries: u32,
    #[serde(default)]
    pub results: PageResults,
}

/// `results` is `{}` when the calendar is empty
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PageResults {
    #[serde(default)]
    pub event: Vec<RawEvent>,
}

impl RawEventPage {
    pub fn events(&self) -> &[RawEvent] {
        &self.results.event
    }

    pub fn into_events(self) -> Vec<RawEvent> {
        self.results.event
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub start: Option<EventStart>,
    #[serde(default)]
    pub performance: Vec<Performance>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EventStart {
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// A performing artist on an event bill.
///
/// `top_genres` stays `None` until enrichment finds tags for the artist.
/// Every other provider field (`billing`, `artist`, `id`, ...) is carried
/// through `extra` untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Performance {
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_genres: Option<Vec<GenreTag>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Performance {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            top_genres: None,
            extra: Map::new(),
        }
    }

    /// Tags attached during enrichment, empty when there are none
    pub fn genres(&self) -> &[GenreTag] {
        self.top_genres.as_deref().unwrap_or_default()
    }
}

/// A genre label and its popularity weight for one artist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreTag {
    pub name: String,
    #[serde(deserialize_with = "lenient_count")]
    pub count: u64,
}

impl GenreTag {
    pub fn new(name: impl Into<String>, count: u64) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

/// Last.fm has served tag counts both as numbers and as numeric strings
fn lenient_count<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum CountRepr {
        Number(u64),
        Float(f64),
        Text(String),
    }

    match CountRepr::deserialize(deserializer)? {
        CountRepr::Number(n) => Ok(n),
        CountRepr::Float(f) if f >= 0.0 => Ok(f as u64),
        CountRepr::Float(f) => Err(serde::de::Error::custom(format!("negative tag count {f}"))),
        CountRepr::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Working record for one event, built after all pages are flattened
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedEvent {
    pub date: Option<NaiveDate>,
    pub name: String,
    pub artists: Vec<Performance>,
    pub link: Option<String>,
}

impl From<RawEvent> for AggregatedEvent {
    fn from(event: RawEvent) -> Self {
        Self {
            date: event.start.and_then(|s| s.date),
            name: event.display_name,
            artists: event.performance,
            link: event.uri,
        }
    }
}

/// One (event, genre) pair of the final response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputRecord {
    pub genre: String,
    /// The artist's own tag count, not the aggregated total
    pub weight: u64,
    pub date: Option<NaiveDate>,
    pub details: AggregatedEvent,
}
