pub mod lastfm;
pub mod songkick;

pub use lastfm::LastFmClient;
pub use songkick::SongkickClient;
