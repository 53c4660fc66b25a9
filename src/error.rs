use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid provider URL: {0}")]
    Url(String),

    #[error("{provider} responded with status {status}")]
    ProviderUnavailable { provider: &'static str, status: u16 },

    #[error("Could not fetch the first events page for location {location}: {source}")]
    FirstPage {
        location: String,
        #[source]
        source: Box<AppError>,
    },

    #[error("Environment variable error: {0}")]
    Env(#[from] std::env::VarError),
}

pub type Result<T> = std::result::Result<T, AppError>;
