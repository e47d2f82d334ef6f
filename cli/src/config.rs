use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use log::LevelFilter;
use plandate_core::DateOrder;
use serde::{Deserialize, Serialize};

pub const DATA_DIR_ENV: &str = "PLANDATE_DATA_DIR";

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct Config {
    // Where tasks.json lives; ~/.plandate when unset
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub date_order: DateOrder,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            date_order: DateOrder::default(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("plandate").join("config.toml"))
    }

    /// Reads the user's config file. A missing file gives the defaults.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file '{}'", path.display()))?;
        config
            .level_filter()
            .with_context(|| format!("invalid config file '{}'", path.display()))?;
        Ok(config)
    }

    /// `PLANDATE_DATA_DIR` beats the config file, which beats `~/.plandate`.
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
            return Ok(PathBuf::from(dir));
        }
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        let home =
            dirs::home_dir().ok_or_else(|| anyhow!("could not determine home directory"))?;
        Ok(home.join(".plandate"))
    }

    pub fn level_filter(&self) -> Result<LevelFilter> {
        self.log_level
            .parse()
            .map_err(|_| anyhow!("unknown log_level '{}'", self.log_level))
    }
}
