//! Configuration types and loading.
//!
//! Config is loaded from a JSON file (e.g. `~/.wren/config.json`) and
//! environment. Kept minimal: the API base and the bot token are all the
//! library needs; env vars override the file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::rest::DEFAULT_API_BASE;

/// Top-level application config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// API base URL. Overridden by WREN_API_BASE env when set.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Bot token. Overridden by WREN_BOT_TOKEN env when set.
    pub token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            token: None,
        }
    }
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

/// Resolve config path from env or default (~/.wren/config.json).
pub fn default_config_path() -> PathBuf {
    std::env::var("WREN_CONFIG_PATH").map(PathBuf::from).unwrap_or_else(|_| {
        dirs::home_dir()
            .map(|h| h.join(".wren").join("config.json"))
            .unwrap_or_else(|| PathBuf::from("config.json"))
    })
}

/// Load config from the default path (or WREN_CONFIG_PATH). Missing file => default config.
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(default_config_path);
    if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        return Ok(Config::default());
    }
    let s = std::fs::read_to_string(&path)
        .with_context(|| format!("reading config from {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parsing config from {}", path.display()))
}

/// Resolve the bot token: env WREN_BOT_TOKEN overrides config.
pub fn resolve_bot_token(config: &Config) -> Option<String> {
    std::env::var("WREN_BOT_TOKEN")
        .ok()
        .and_then(|s| {
            let t = s.trim();
            if t.is_empty() {
                None
            } else {
                Some(t.to_string())
            }
        })
        .or_else(|| {
            config
                .token
                .as_ref()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
}

/// Resolve the API base: env WREN_API_BASE overrides config; trailing
/// slashes are trimmed so path joins stay predictable.
pub fn resolve_api_base(config: &Config) -> String {
    std::env::var("WREN_API_BASE")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| config.api_base.clone())
        .trim_end_matches('/')
        .to_string()
}
