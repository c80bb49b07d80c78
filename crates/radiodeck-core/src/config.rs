use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::platform;

pub const DEFAULT_BASE_URL: &str = "https://de1.api.radio-browser.info";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Directory server, without a trailing `/json`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// radio-browser asks clients to send a descriptive agent.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Results per search, clamped to `1..=20` by the client.
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    #[serde(default = "default_volume")]
    pub default_volume: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Category key selected at start-up (`all`, `top`, `trending`, ...).
    #[serde(default = "default_category")]
    pub default_category: String,
    #[serde(default = "default_show_keys_bar")]
    pub show_keys_bar: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            search_limit: default_search_limit(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            default_volume: default_volume(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_category: default_category(),
            show_keys_bar: default_show_keys_bar(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_user_agent() -> String {
    format!("radiodeck/{}", env!("CARGO_PKG_VERSION"))
}

fn default_search_limit() -> usize {
    20
}

fn default_volume() -> f32 {
    0.5
}

fn default_category() -> String {
    "all".to_string()
}

fn default_show_keys_bar() -> bool {
    true
}

impl Config {
    /// Load `config.toml`, writing the defaults on first run.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(config_path: &Path) -> anyhow::Result<Self> {
        if !config_path.exists() {
            let config = Self::default();
            config.save_to(config_path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(config_path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, config_path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}
