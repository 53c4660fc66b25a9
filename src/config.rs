use crate::constants::*;
use crate::error::{AppError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Process-wide configuration, read once at startup and passed down explicitly.
#[derive(Debug, Clone)]
pub struct Config {
    pub songkick_api_key: String,
    pub lastfm_api_key: String,
    pub port: u16,
    pub pipeline: PipelineSettings,
    pub providers: ProviderSettings,
}

/// Tunables for paging, ranking and HTTP behavior
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineSettings {
    pub max_pages: u32,
    pub page_size: u32,
    pub candidate_pool: usize,
    pub hot_genre_limit: usize,
    pub denylist: Vec<String>,
    pub request_timeout_secs: u64,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            page_size: DEFAULT_PAGE_SIZE,
            candidate_pool: DEFAULT_CANDIDATE_POOL,
            hot_genre_limit: DEFAULT_HOT_GENRE_LIMIT,
            denylist: default_denylist(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl PipelineSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn validate(&self) -> Result<()> {
        if self.max_pages == 0 {
            return Err(AppError::Config("pipeline.max_pages must be at least 1".into()));
        }
        if self.page_size == 0 {
            return Err(AppError::Config("pipeline.page_size must be at least 1".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(AppError::Config(
                "pipeline.request_timeout_secs must be at least 1".into(),
            ));
        }
        if self.hot_genre_limit > self.candidate_pool {
            return Err(AppError::Config(format!(
                "pipeline.hot_genre_limit ({}) cannot exceed pipeline.candidate_pool ({})",
                self.hot_genre_limit, self.candidate_pool
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProviderSettings {
    pub songkick_base_url: String,
    pub lastfm_base_url: String,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            songkick_base_url: SONGKICK_BASE_URL.to_string(),
            lastfm_base_url: LASTFM_BASE_URL.to_string(),
        }
    }
}

/// Optional TOML overrides
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    pipeline: PipelineSettings,
    #[serde(default)]
    providers: ProviderSettings,
}

impl Config {
    /// Load from `.env`, the process environment and the optional TOML file.
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let config_path =
            std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let file_contents = if Path::new(&config_path).exists() {
            Some(fs::read_to_string(&config_path).map_err(|e| {
                AppError::Config(format!("Failed to read config file '{}': {}", config_path, e))
            })?)
        } else {
            None
        };

        Self::from_sources(|key| std::env::var(key).ok(), file_contents.as_deref())
    }

    /// Build a config from a variable lookup and optional TOML text.
    pub fn from_sources<F>(lookup: F, file_contents: Option<&str>) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file: FileConfig = match file_contents {
            Some(text) => toml::from_str(text)?,
            None => FileConfig::default(),
        };
        file.pipeline.validate()?;

        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| AppError::Config(format!("{} must be set", key)))
        };

        let port = match lookup(PORT_VAR) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| AppError::Config(format!("Invalid {} '{}': {}", PORT_VAR, raw, e)))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            songkick_api_key: required(SONGKICK_KEY_VAR)?,
            lastfm_api_key: required(LASTFM_KEY_VAR)?,
            port,
            pipeline: file.pipeline,
            providers: file.providers,
        })
    }
}
