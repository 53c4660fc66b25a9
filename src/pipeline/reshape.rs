use crate::types::{AggregatedEvent, OutputRecord};
use std::collections::HashSet;

/// Emit one record per (event, artist, tag) whose tag is a hot genre.
///
/// The weight is the artist's own tag count. Several artists of one event
/// sharing a genre each produce a record.
pub fn reshape(events: &[AggregatedEvent], hot_genres: &[String]) -> Vec<OutputRecord> {
    let hot: HashSet<&str> = hot_genres.iter().map(String::as_str).collect();

    let mut output = Vec::new();
    for event in events {
        for artist in &event.artists {
            for tag in artist.genres() {
                if hot.contains(tag.name.as_str()) {
                    output.push(OutputRecord {
                        genre: tag.name.clone(),
                        weight: tag.count,
                        date: event.date,
                        details: event.clone(),
                    });
                }
            }
        }
    }
    output
}
