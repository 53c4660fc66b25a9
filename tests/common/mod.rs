//! In-memory providers shared by the integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use concert_genres::app::ports::{EventsProvider, TagProvider};
use concert_genres::error::{AppError, Result};
use concert_genres::types::{
    EventStart, Fetched, GenreTag, PageResults, Performance, RawEvent, RawEventPage,
};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// How a fake provider answers one call
#[derive(Clone, Debug)]
pub enum Answer {
    Tags(Vec<GenreTag>),
    /// Non-success status
    Unavailable,
    /// Connection-level failure
    Broken,
}

fn transport_error() -> AppError {
    AppError::Io(std::io::Error::new(
        std::io::ErrorKind::ConnectionReset,
        "simulated transport failure",
    ))
}

/// High-water mark of concurrent calls into a fake provider
#[derive(Default)]
pub struct InFlight {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl InFlight {
    /// Mark a call as started; returns how many calls are now in flight
    fn enter(&self) -> usize {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        now
    }

    /// Mark a call as finished; returns how many calls were in flight just before
    fn exit(&self) -> usize {
        self.current.fetch_sub(1, Ordering::SeqCst)
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

pub fn raw_event(name: &str, date: &str, artists: &[&str]) -> RawEvent {
    RawEvent {
        display_name: name.to_string(),
        uri: Some(format!("https://www.songkick.com/concerts/{}", name.replace(' ', "-"))),
        start: Some(EventStart {
            date: date.parse().ok(),
        }),
        performance: artists.iter().map(|a| Performance::new(*a)).collect(),
    }
}

pub fn tags(pairs: &[(&str, u64)]) -> Vec<GenreTag> {
    pairs.iter().map(|(n, c)| GenreTag::new(*n, *c)).collect()
}

/// Calendar provider answering from a fixed set of pages
#[derive(Default)]
pub struct FakeEvents {
    total_entries: u32,
    pages: HashMap<u32, Vec<RawEvent>>,
    failures: HashMap<u32, Answer>,
    delays: HashMap<u32, Duration>,
    locations: Option<serde_json::Value>,
    calls: Mutex<Vec<u32>>,
    in_flight: InFlight,
    overlap: Mutex<HashMap<u32, usize>>,
}

impl FakeEvents {
    pub fn new(total_entries: u32) -> Self {
        Self {
            total_entries,
            ..Default::default()
        }
    }

    pub fn with_page(mut self, page: u32, events: Vec<RawEvent>) -> Self {
        self.pages.insert(page, events);
        self
    }

    pub fn failing_page(mut self, page: u32, failure: Answer) -> Self {
        self.failures.insert(page, failure);
        self
    }

    pub fn delayed_page(mut self, page: u32, delay: Duration) -> Self {
        self.delays.insert(page, delay);
        self
    }

    pub fn with_locations(mut self, body: serde_json::Value) -> Self {
        self.locations = Some(body);
        self
    }

    pub fn delay_all_pages(mut self, pages: u32, delay: Duration) -> Self {
        for page in 1..=pages {
            self.delays.insert(page, delay);
        }
        self
    }

    /// Page numbers requested, in call order
    pub fn calls(&self) -> Vec<u32> {
        self.calls.lock().unwrap().clone()
    }

    /// Most page requests ever outstanding at once
    pub fn peak_in_flight(&self) -> usize {
        self.in_flight.peak()
    }

    /// Most requests outstanding at once while `page` was being fetched
    pub fn overlap_for(&self, page: u32) -> usize {
        self.overlap.lock().unwrap().get(&page).copied().unwrap_or(0)
    }
}

#[async_trait]
impl EventsProvider for FakeEvents {
    async fn fetch_events_page(&self, _location: &str, page: u32) -> Result<Fetched<RawEventPage>> {
        self.calls.lock().unwrap().push(page);
        let at_start = self.in_flight.enter();
        if let Some(delay) = self.delays.get(&page) {
            tokio::time::sleep(*delay).await;
        }
        let at_end = self.in_flight.exit();
        self.overlap.lock().unwrap().insert(page, at_start.max(at_end));

        match self.failures.get(&page) {
            Some(Answer::Unavailable) => return Ok(Fetched::Empty),
            Some(Answer::Broken) => return Err(transport_error()),
            _ => {}
        }
        Ok(Fetched::Data(RawEventPage {
            total_entries: self.total_entries,
            results: PageResults {
                event: self.pages.get(&page).cloned().unwrap_or_default(),
            },
        }))
    }

    async fn search_locations(&self, _query: &str) -> Result<Fetched<serde_json::Value>> {
        Ok(self.locations.clone().into())
    }
}

/// Tag provider answering per artist from a queue; unknown artists get no tags
#[derive(Default)]
pub struct FakeTags {
    answers: Mutex<HashMap<String, VecDeque<Answer>>>,
    calls: Mutex<Vec<String>>,
    delay: Option<Duration>,
    in_flight: InFlight,
}

impl FakeTags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(self, artist: &str, answer: Answer) -> Self {
        self.answers
            .lock()
            .unwrap()
            .entry(artist.to_string())
            .or_default()
            .push_back(answer);
        self
    }

    pub fn tagged(self, artist: &str, pairs: &[(&str, u64)]) -> Self {
        self.answer(artist, Answer::Tags(tags(pairs)))
    }

    /// Every lookup sleeps for `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Most lookups ever outstanding at once
    pub fn peak_in_flight(&self) -> usize {
        self.in_flight.peak()
    }

    pub fn calls_for(&self, artist: &str) -> usize {
        self.calls().iter().filter(|a| *a == artist).count()
    }
}

#[async_trait]
impl TagProvider for FakeTags {
    async fn fetch_artist_tags(&self, artist_name: &str) -> Result<Fetched<Vec<GenreTag>>> {
        self.calls.lock().unwrap().push(artist_name.to_string());
        self.in_flight.enter();
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.exit();

        let answer = self
            .answers
            .lock()
            .unwrap()
            .get_mut(artist_name)
            .and_then(VecDeque::pop_front);
        match answer {
            Some(Answer::Tags(tags)) => Ok(Fetched::Data(tags)),
            Some(Answer::Broken) => Err(transport_error()),
            Some(Answer::Unavailable) | None => Ok(Fetched::Empty),
        }
    }
}
