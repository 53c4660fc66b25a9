//! The genre aggregation pipeline.
//!
//! location → calendar pages → enriched events → hot genres → output records

pub mod aggregate;
pub mod enrich;
pub mod fetch;
pub mod orchestrator;
pub mod reshape;

pub use aggregate::{GenreAggregator, GenreRanking};
pub use enrich::{flatten_pages, ArtistEnricher, EnrichmentSummary};
pub use fetch::{required_pages, PaginatedEventFetcher};
pub use orchestrator::GenrePipeline;
pub use reshape::reshape;
