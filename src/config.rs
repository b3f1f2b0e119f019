use egui::Color32;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::engine::compose::ViewLimits;
use crate::engine::persist::FileStore;
use crate::engine::shell::ShellLimits;
use crate::worker::cache::CacheStorage;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("{} is not valid config JSON: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("asset_base_url {0:?} is not an absolute URL")]
    BadUrl(String),
    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    pub ui_scale: f32,

    /// Where the shell's static assets are served from. Must end in `/`.
    pub asset_base_url: String,
    pub fetch_timeout_secs: u64,

    pub state_path: Option<PathBuf>,
    pub cache_dir: Option<PathBuf>,

    pub input_log_limit: usize,
    pub world_log_visible: usize,

    // Panel role → color mapping
    pub panel_colors: HashMap<String, [u8; 4]>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        let mut panel_colors = HashMap::new();

        panel_colors.insert("title".into(), [120, 200, 170, 255]);
        panel_colors.insert("text".into(), [220, 220, 220, 255]);
        panel_colors.insert("muted".into(), [140, 140, 140, 255]);
        panel_colors.insert("selected".into(), [230, 190, 90, 255]);
        panel_colors.insert("panel".into(), [24, 32, 30, 255]);

        Self {
            ui_scale: 1.0,
            asset_base_url: "http://localhost:8080/eldritch-v2/".into(),
            fetch_timeout_secs: 10,
            state_path: None,
            cache_dir: None,
            input_log_limit: 40,
            world_log_visible: 12,
            panel_colors,
        }
    }
}

impl ShellConfig {
    pub fn color(&self, key: &str) -> Color32 {
        self.panel_colors
            .get(key)
            .map(|c| Color32::from_rgba_unmultiplied(c[0], c[1], c[2], c[3]))
            .unwrap_or(Color32::WHITE)
    }

    pub fn limits(&self) -> ShellLimits {
        ShellLimits {
            input_log_limit: self.input_log_limit,
            view: ViewLimits {
                world_log_visible: self.world_log_visible,
            },
        }
    }

    pub fn asset_scope(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.asset_base_url)
            .map_err(|_| ConfigError::BadUrl(self.asset_base_url.clone()))?;
        if url.cannot_be_a_base() {
            return Err(ConfigError::BadUrl(self.asset_base_url.clone()));
        }
        Ok(url)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn state_path(&self) -> PathBuf {
        self.state_path.clone().unwrap_or_else(FileStore::default_path)
    }

    pub fn cache_root(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(CacheStorage::default_root)
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.input_log_limit == 0 {
            return Err(ConfigError::Invalid("input_log_limit must be at least 1".into()));
        }
        if !(0.5..=3.0).contains(&self.ui_scale) {
            return Err(ConfigError::Invalid(format!(
                "ui_scale {} is outside 0.5..=3.0",
                self.ui_scale
            )));
        }
        self.asset_scope()?;
        Ok(self)
    }
}

/// `<config dir>/eldritch-v2/shell_config.json`
pub fn config_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("eldritch-v2");
    path.push("shell_config.json");
    path
}

/// A missing file means defaults. A file that exists but cannot be used is an error.
pub fn load_config(path: &Path) -> Result<ShellConfig, ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(ShellConfig::default()),
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let config: ShellConfig = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()
}
