//! Location bar configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use omnibar_navigation::{DEFAULT_SEARCH_LABEL, DEFAULT_SEARCH_TEMPLATE};

use crate::error::OmnibarError;
use crate::rank::DEFAULT_MAX_RESULTS;
use crate::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the database file
    pub database_path: PathBuf,
    /// Search engine URL template
    pub search_engine: String,
    /// Label shown on the search row
    pub search_label: String,
    /// Maximum number of rows under the location bar
    pub max_results: usize,
    /// Maximum number of history hits requested per keystroke
    pub history_limit: usize,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            database_path: data_dir.join("omnibar.db"),
            search_engine: DEFAULT_SEARCH_TEMPLATE.to_string(),
            search_label: DEFAULT_SEARCH_LABEL.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
            history_limit: DEFAULT_MAX_RESULTS,
        }
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("omnibar"))
            .unwrap_or_else(|| PathBuf::from(".omnibar"))
    }

    /// Read a JSON config file; missing keys take their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.search_engine.contains("%s") {
            return Err(OmnibarError::Config(format!(
                "search engine template has no %s placeholder: {}",
                self.search_engine
            )));
        }
        if self.max_results < 2 {
            return Err(OmnibarError::Config(
                "max_results must leave room for the navigate and search rows".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}
