/// Provider names used in logs, metrics and error messages
pub const SONGKICK_PROVIDER: &str = "songkick";
pub const LASTFM_PROVIDER: &str = "lastfm";

// Provider endpoints
pub const SONGKICK_BASE_URL: &str = "https://api.songkick.com/api/3.0";
pub const LASTFM_BASE_URL: &str = "http://ws.audioscrobbler.com/2.0/";

// Pipeline defaults
pub const DEFAULT_MAX_PAGES: u32 = 10;
pub const DEFAULT_PAGE_SIZE: u32 = 50;
pub const DEFAULT_CANDIDATE_POOL: usize = 30;
pub const DEFAULT_HOT_GENRE_LIMIT: usize = 20;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_PORT: u16 = 5000;

/// Last.fm labels that are popular but say nothing about the music itself
pub const DEFAULT_GENRE_DENYLIST: [&str; 3] = ["seen live", "All", "under 2000 listeners"];

// Environment variables
pub const SONGKICK_KEY_VAR: &str = "SK_KEY";
pub const LASTFM_KEY_VAR: &str = "LF_KEY";
pub const PORT_VAR: &str = "PORT";
pub const CONFIG_PATH_VAR: &str = "CONCERT_GENRES_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "concert_genres.toml";

/// Get the default denylist as owned strings
pub fn default_denylist() -> Vec<String> {
    DEFAULT_GENRE_DENYLIST.iter().map(|s| s.to_string()).collect()
}
