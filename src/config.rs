use crate::library;
use crate::model::{DEFAULT_VOLUME, Track, default_tracks};
use crate::persistence::DEFAULT_POSITION_SAVE_INTERVAL;
use crate::resume::DEFAULT_RESUME_DELAYS_MS;
use crate::session::SessionSettings;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_DIR: &str = "studio-player";
const CONFIG_FILE: &str = "player.json";
const SESSION_FILE: &str = "session.json";
const LOG_FILE: &str = "studio-player.log";
pub const CONFIG_DIR_ENV: &str = "STUDIO_PLAYER_CONFIG_DIR";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerConfig {
    #[serde(default)]
    pub tracks: Vec<Track>,
    #[serde(default)]
    pub music_dir: Option<PathBuf>,
    #[serde(default = "default_volume")]
    pub default_volume: f32,
    #[serde(default = "default_resume_delays_ms")]
    pub resume_delays_ms: Vec<u64>,
    #[serde(default = "default_position_save_secs")]
    pub position_save_secs: u64,
}

fn default_volume() -> f32 {
    DEFAULT_VOLUME
}

fn default_resume_delays_ms() -> Vec<u64> {
    DEFAULT_RESUME_DELAYS_MS.to_vec()
}

fn default_position_save_secs() -> u64 {
    DEFAULT_POSITION_SAVE_INTERVAL.as_secs()
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            tracks: Vec::new(),
            music_dir: None,
            default_volume: default_volume(),
            resume_delays_ms: default_resume_delays_ms(),
            position_save_secs: default_position_save_secs(),
        }
    }
}

impl PlayerConfig {
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            default_volume: self.default_volume.clamp(0.0, 1.0),
            resume_delays: self
                .resume_delays_ms
                .iter()
                .map(|ms| Duration::from_millis(*ms))
                .collect(),
            position_save_interval: Duration::from_secs(self.position_save_secs.max(1)),
        }
    }

    /// Playlist source, in order of preference: a scanned music folder, the
    /// configured list, the bundled default track.
    pub fn resolve_tracks(&self) -> Vec<Track> {
        if let Some(dir) = &self.music_dir {
            let scanned = library::scan_folder(dir);
            if !scanned.is_empty() {
                return scanned;
            }
            log::warn!("no audio files found in {}", dir.display());
        }
        if !self.tracks.is_empty() {
            return self.tracks.clone();
        }
        default_tracks()
    }
}

pub fn config_root() -> Result<PathBuf> {
    if let Ok(override_dir) = env::var(CONFIG_DIR_ENV) {
        return Ok(PathBuf::from(override_dir));
    }

    let home = env::var("HOME")
        .or_else(|_| env::var("USERPROFILE"))
        .context("neither HOME nor USERPROFILE is set")?;
    Ok(PathBuf::from(home).join(".config").join(APP_DIR))
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn session_path(root: &Path) -> PathBuf {
    root.join(SESSION_FILE)
}

pub fn log_path(root: &Path) -> PathBuf {
    root.join(LOG_FILE)
}

pub fn ensure_config_dir(root: &Path) -> Result<()> {
    fs::create_dir_all(root).with_context(|| format!("failed to create {}", root.display()))
}

pub fn load_config(root: &Path) -> Result<PlayerConfig> {
    let path = config_path(root);
    if !path.exists() {
        return Ok(PlayerConfig::default());
    }

    let raw = fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config: PlayerConfig = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    Ok(config)
}

pub fn save_config(root: &Path, config: &PlayerConfig) -> Result<()> {
    ensure_config_dir(root)?;
    let path = config_path(root);
    let json = serde_json::to_string_pretty(config)?;
    fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
