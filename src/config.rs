//! Configuration management for tubetui
//!
//! Handles config file loading/saving and external tool lookup.
//! Config is stored at ~/.config/tubetui/config.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::session::search::DEFAULT_LIMIT;

/// Volume the engine starts at
pub const DEFAULT_VOLUME: i32 = 80;

/// Seconds moved per seek key press
pub const DEFAULT_SEEK_STEP: u32 = 10;

/// Volume change per key press
pub const DEFAULT_VOLUME_STEP: i32 = 5;

/// Env var overriding the yt-dlp executable
pub const YTDLP_ENV: &str = "TUBETUI_YTDLP";

/// Env var overriding the mpv executable
pub const MPV_ENV: &str = "TUBETUI_MPV";

/// Application configuration
///
/// Every key is optional; accessors apply the defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// yt-dlp executable
    pub ytdlp_path: Option<String>,
    /// mpv executable
    pub mpv_path: Option<String>,
    /// Startup volume (0-150)
    pub initial_volume: Option<i32>,
    /// Results per search
    pub search_limit: Option<usize>,
    /// Seek step in seconds
    pub seek_step_secs: Option<u32>,
    /// Volume step
    pub volume_step: Option<i32>,
    /// Fetch and render thumbnails
    pub thumbnails: Option<bool>,
    /// tracing filter directive, e.g. "tubetui=debug"
    pub log_filter: Option<String>,
}

impl Config {
    /// Get config file path (~/.config/tubetui/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tubetui").join("config.toml"))
    }

    /// Load config from the default path, or return default if not found
    pub fn load() -> Self {
        Self::path().map(|p| Self::load_from(&p)).unwrap_or_default()
    }

    /// Load config from `path`; missing or unparsable files give defaults
    pub fn load_from(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| toml::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Save config to the default path
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path().ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }

        let toml = toml::to_string_pretty(self)?;
        std::fs::write(path, toml).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    /// Copy with every default filled in, as written by `config --init`
    pub fn resolved(&self) -> Self {
        Self {
            ytdlp_path: Some(self.ytdlp_path()),
            mpv_path: Some(self.mpv_path()),
            initial_volume: Some(self.initial_volume()),
            search_limit: Some(self.search_limit()),
            seek_step_secs: Some(self.seek_step_secs()),
            volume_step: Some(self.volume_step()),
            thumbnails: Some(self.thumbnails()),
            log_filter: self.log_filter.clone(),
        }
    }

    /// yt-dlp executable with fallback chain:
    /// 1. Environment variable TUBETUI_YTDLP
    /// 2. `ytdlp_path` from config file
    /// 3. `yt-dlp` on PATH
    pub fn ytdlp_path(&self) -> String {
        tool_path(YTDLP_ENV, self.ytdlp_path.as_deref(), "yt-dlp")
    }

    /// mpv executable, same chain with TUBETUI_MPV
    pub fn mpv_path(&self) -> String {
        tool_path(MPV_ENV, self.mpv_path.as_deref(), "mpv")
    }

    pub fn initial_volume(&self) -> i32 {
        self.initial_volume.unwrap_or(DEFAULT_VOLUME).clamp(0, 150)
    }

    pub fn search_limit(&self) -> usize {
        self.search_limit.filter(|n| *n > 0).unwrap_or(DEFAULT_LIMIT)
    }

    pub fn seek_step_secs(&self) -> u32 {
        self.seek_step_secs.filter(|n| *n > 0).unwrap_or(DEFAULT_SEEK_STEP)
    }

    pub fn volume_step(&self) -> i32 {
        self.volume_step.filter(|n| *n > 0).unwrap_or(DEFAULT_VOLUME_STEP)
    }

    pub fn thumbnails(&self) -> bool {
        self.thumbnails.unwrap_or(true)
    }
}

fn tool_path(env_var: &str, configured: Option<&str>, default: &str) -> String {
    if let Ok(path) = std::env::var(env_var) {
        if !path.trim().is_empty() {
            return path;
        }
    }
    configured
        .filter(|p| !p.trim().is_empty())
        .unwrap_or(default)
        .to_string()
}
