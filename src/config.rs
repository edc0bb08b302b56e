//! Environment-driven settings: where the data lives and how to start.

use crate::classify::Policy;
use crate::error::Result;
use std::env;
use std::path::PathBuf;

pub const APP_NAME: &str = "reading-log";

pub const READING_LIST_FILE: &str = "reading_list.json";
pub const GENRE_COUNTS_FILE: &str = "genre_counts.json";
pub const LANGUAGE_COUNTS_FILE: &str = "language_counts.json";
pub const PUBLISHER_CITIES_FILE: &str = "publisher_cities_list.json";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub cache_dir: PathBuf,
    /// Raw `READING_LOG_POLICY`, resolved by [`Config::initial_policy`].
    pub policy_name: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let home = var("HOME").unwrap_or_else(|| ".".to_string());

        let data_dir = var("READING_LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                let base = var("XDG_DATA_HOME").unwrap_or_else(|| format!("{}/.local/share", home));
                PathBuf::from(base).join(APP_NAME)
            });

        let cache_dir = PathBuf::from(
            var("XDG_CACHE_HOME").unwrap_or_else(|| format!("{}/.cache", home)),
        )
        .join(APP_NAME);

        Self {
            data_dir,
            cache_dir,
            policy_name: var("READING_LOG_POLICY"),
        }
    }

    /// Policy to open with; unset means the default. An unknown name is an
    /// `InvalidPolicy` error for the caller to surface.
    pub fn initial_policy(&self) -> Result<Policy> {
        match self.policy_name.as_deref() {
            Some(raw) => raw.parse(),
            None => Ok(Policy::default()),
        }
    }

    #[inline]
    pub fn data_file(&self, name: &str) -> PathBuf {
        self.data_dir.join(name)
    }

    #[inline]
    pub fn log_path(&self) -> PathBuf {
        self.cache_dir.join("reading-log.log")
    }
}
