use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Products API base URL (default: "http://localhost:5086/api")
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Page size used when none is given (default: 4)
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

pub const DEFAULT_BASE_URL: &str = "http://localhost:5086/api";

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_page_size() -> u32 {
    4
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_size: default_page_size(),
        }
    }
}

impl Config {
    /// Load configuration from file, environment, and CLI arguments
    pub fn load(
        config_path: Option<&PathBuf>,
        cli_base_url: Option<&str>,
        cli_page_size: Option<u32>,
    ) -> anyhow::Result<Self> {
        let mut config = if let Some(path) = config_path {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)?
        } else if let Ok(content) = std::fs::read_to_string("shelf.toml") {
            toml::from_str(&content)?
        } else {
            Config::default()
        };

        if let Ok(url) = std::env::var("SHELF_BASE_URL") {
            config.base_url = url;
        }
        if let Ok(size) = std::env::var("SHELF_PAGE_SIZE") {
            if let Ok(s) = size.parse() {
                config.page_size = s;
            }
        }

        if let Some(url) = cli_base_url {
            config.base_url = url.to_string();
        }
        if let Some(size) = cli_page_size {
            config.page_size = size;
        }

        Ok(config)
    }
}
