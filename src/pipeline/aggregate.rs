use crate::config::PipelineSettings;
use crate::types::AggregatedEvent;
use std::collections::HashMap;
use tracing::debug;

/// Summed tag counts per genre, in first-sighting order
#[derive(Debug, Default, Clone, PartialEq)]
pub struct GenreRanking {
    totals: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl GenreRanking {
    pub fn tally(events: &[AggregatedEvent]) -> Self {
        let mut ranking = Self::default();
        for event in events {
            for artist in &event.artists {
                for tag in artist.genres() {
                    ranking.add(&tag.name, tag.count);
                }
            }
        }
        ranking
    }

    pub fn add(&mut self, genre: &str, count: u64) {
        match self.index.get(genre) {
            Some(&i) => self.totals[i].1 = self.totals[i].1.saturating_add(count),
            None => {
                self.index.insert(genre.to_string(), self.totals.len());
                self.totals.push((genre.to_string(), count));
            }
        }
    }

    pub fn total(&self, genre: &str) -> Option<u64> {
        self.index.get(genre).map(|&i| self.totals[i].1)
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Genre names by descending total; ties keep first-sighting order
    pub fn ranked(self) -> Vec<String> {
        let mut totals = self.totals;
        totals.sort_by(|a, b| b.1.cmp(&a.1));
        totals.into_iter().map(|(name, _)| name).collect()
    }
}

/// Picks the hot genre set: top candidates, minus denylisted labels, capped
#[derive(Debug, Clone)]
pub struct GenreAggregator {
    candidate_pool: usize,
    hot_genre_limit: usize,
    denylist: Vec<String>,
}

impl GenreAggregator {
    pub fn new(candidate_pool: usize, hot_genre_limit: usize, denylist: Vec<String>) -> Self {
        Self {
            candidate_pool,
            hot_genre_limit,
            denylist,
        }
    }

    pub fn from_settings(settings: &PipelineSettings) -> Self {
        Self::new(
            settings.candidate_pool,
            settings.hot_genre_limit,
            settings.denylist.clone(),
        )
    }

    pub fn hot_genres(&self, events: &[AggregatedEvent]) -> Vec<String> {
        let ranking = GenreRanking::tally(events);
        let distinct = ranking.len();

        let hot: Vec<String> = ranking
            .ranked()
            .into_iter()
            .take(self.candidate_pool)
            .filter(|genre| !self.denylist.iter().any(|denied| denied == genre))
            .take(self.hot_genre_limit)
            .collect();

        debug!(distinct, hot = hot.len(), "Ranked genres");
        hot
    }
}
