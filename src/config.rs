use crate::cursor::CursorOrder;
use crate::display::DEFAULT_ICON_BASE_URL;
use crate::feed::DEFAULT_HISTORY_LIMIT;
use anyhow::{bail, Context, Result};
use log::info;
use serde_derive::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "./config.toml";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Where the `/boosts` endpoint and the sound asset live.
    pub base_url: String,
    /// Chat/room id. Not used for polling.
    pub cid: Option<String>,
    pub poll_interval_ms: u64,
    pub request_timeout_ms: u64,
    pub cursor_order: CursorOrder,
    pub history_limit: usize,
    pub icon_base_url: String,
    pub sound: bool,
    pub sound_path: String,
    pub sound_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:2112".to_string(),
            cid: None,
            poll_interval_ms: 7000,
            request_timeout_ms: 10_000,
            cursor_order: CursorOrder::default(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            icon_base_url: DEFAULT_ICON_BASE_URL.to_string(),
            sound: true,
            sound_path: "/pew.mp3".to_string(),
            sound_file: None,
        }
    }
}

impl Config {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            bail!("base_url must not be empty");
        }
        if self.poll_interval_ms == 0 {
            bail!("poll_interval_ms must be greater than zero");
        }
        if self.request_timeout_ms == 0 {
            bail!("request_timeout_ms must be greater than zero");
        }
        if self.history_limit == 0 {
            bail!("history_limit must be greater than zero");
        }
        Ok(())
    }
}

pub fn parse_config(contents: &str) -> Result<Config> {
    let cfg: Config = toml::from_str(contents)
        .context("Failed to parse configuration")?;
    Ok(cfg)
}

/// Load the configuration file. A missing file means all defaults.
pub fn load_config(path: &Path) -> Result<Config> {
    match fs::read_to_string(path) {
        Ok(contents) => parse_config(&contents)
            .with_context(|| format!("Invalid config file {}", path.display())),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("No config file at {}, using defaults", path.display());
            Ok(Config::default())
        }
        Err(e) => Err(e).with_context(|| format!("Unable to read config file {}", path.display())),
    }
}
