use crate::pager::DEFAULT_PAGE_SIZE;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub url: Option<String>,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            accept_invalid_certs: false,
        }
    }
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}
fn default_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Loads `explicit` if given, otherwise the first config file found in
    /// the usual places. No file at all yields the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config_path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::find_config_path(),
        };

        if let Some(path) = config_path {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;

            Self::parse(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        if config.display.page_size == 0 {
            anyhow::bail!("display.page_size must be at least 1");
        }
        Ok(config)
    }

    fn find_config_path() -> Option<PathBuf> {
        if let Some(xdg_config) = dirs::config_dir() {
            let xdg_path = xdg_config.join("trsearch/config.toml");
            if xdg_path.exists() {
                return Some(xdg_path);
            }
        }

        if let Some(home) = dirs::home_dir() {
            let home_path = home.join(".trsearch.toml");
            if home_path.exists() {
                return Some(home_path);
            }
        }

        let current_path = Path::new(".trsearch.toml");
        if current_path.exists() {
            return Some(current_path.to_path_buf());
        }

        None
    }
}
