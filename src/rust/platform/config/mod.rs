#![cfg(feature = "cli")]

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::engine::scheduler::DEFAULT_DEBOUNCE;
use crate::engine::tempo::{DEFAULT_BPM, DEFAULT_MAX_BPM, DEFAULT_MIN_BPM};
use crate::services::library::SONG_LIST_FILE;
use crate::services::session::{DEFAULT_CLICK_FILE, SessionSettings};

pub const JSON_CONFIG: &str = "metronome.json";
pub const TOML_CONFIG: &str = "metronome.toml";
pub const DOT_CONFIG: &str = ".metronome";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub tempo: TempoSection,
    pub audio: AudioSection,
    pub library: LibrarySection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TempoSection {
    pub bpm: f64,
    pub min_bpm: f64,
    pub max_bpm: f64,
    pub debounce_ms: u64,
    /// Start ticking as soon as a session opens.
    pub autostart: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSection {
    pub click: PathBuf,
    pub volume: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LibrarySection {
    pub path: Option<PathBuf>,
}

impl Default for TempoSection {
    fn default() -> Self {
        Self {
            bpm: DEFAULT_BPM,
            min_bpm: DEFAULT_MIN_BPM,
            max_bpm: DEFAULT_MAX_BPM,
            debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
            autostart: false,
        }
    }
}

impl Default for AudioSection {
    fn default() -> Self {
        Self {
            click: PathBuf::from(DEFAULT_CLICK_FILE),
            volume: 1.0,
        }
    }
}

impl AppConfig {
    /// Loads the config found in `root`, writing a default `metronome.json`
    /// when there is none.
    pub fn load(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let json_path = root.join(JSON_CONFIG);
        let dot_path = root.join(DOT_CONFIG);
        let toml_path = root.join(TOML_CONFIG);

        let mut candidates: Vec<PathBuf> = Vec::new();
        if json_path.exists() {
            candidates.push(json_path.clone());
        }
        if dot_path.exists() {
            candidates.push(dot_path.clone());
        }
        if toml_path.exists() {
            candidates.push(toml_path.clone());
        }

        match candidates.len() {
            0 => {
                let default = AppConfig::default();
                write_default_json(&json_path, &default)?;
                Ok(default)
            }
            1 => load_config_by_path(&candidates[0]),
            _ => {
                // Multiple config files: ask on a terminal, otherwise fall back to priority order.
                let selected = select_config_interactive(&candidates)
                    .unwrap_or_else(|| pick_config_priority(&candidates));
                load_config_by_path(&selected)
            }
        }
    }

    pub fn click_path(&self, root: impl AsRef<Path>) -> PathBuf {
        root.as_ref().join(&self.audio.click)
    }

    pub fn volume(&self) -> f32 {
        self.audio.volume.clamp(0.0, 1.0)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.tempo.debounce_ms)
    }

    /// Song list location: the configured path, else the documents folder,
    /// else the working directory.
    pub fn library_path(&self, root: impl AsRef<Path>) -> PathBuf {
        match &self.library.path {
            Some(path) => root.as_ref().join(path),
            None => dirs::document_dir()
                .unwrap_or_else(|| root.as_ref().to_path_buf())
                .join(SONG_LIST_FILE),
        }
    }

    pub fn session_settings(&self, root: impl AsRef<Path>) -> SessionSettings {
        SessionSettings {
            bpm: self.tempo.bpm,
            min_bpm: self.tempo.min_bpm,
            max_bpm: self.tempo.max_bpm,
            debounce: self.debounce(),
            click: self.click_path(root),
        }
    }
}

fn load_json(path: &Path) -> Result<AppConfig> {
    let file = fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    let config = serde_json::from_str(&file)
        .with_context(|| format!("invalid JSON config: {}", path.display()))?;
    Ok(config)
}

fn load_toml(path: &Path) -> Result<AppConfig> {
    let file = fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    let config = toml::from_str(&file)
        .with_context(|| format!("invalid TOML config: {}", path.display()))?;
    Ok(config)
}

fn load_config_by_path(path: &Path) -> Result<AppConfig> {
    // `.metronome` may hold either format; sniff the first character.
    if path.file_name().and_then(|s| s.to_str()) == Some(DOT_CONFIG) {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        let trimmed = raw.trim_start();
        if trimmed.starts_with('{') {
            return serde_json::from_str(&raw)
                .with_context(|| format!("invalid JSON config: {}", path.display()));
        }
        return toml::from_str(&raw)
            .with_context(|| format!("invalid TOML config: {}", path.display()));
    }

    match path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase())
        .as_deref()
    {
        Some("json") => load_json(path),
        Some("toml") => load_toml(path),
        _ => load_json(path).or_else(|_| load_toml(path)),
    }
}

fn pick_config_priority(candidates: &[PathBuf]) -> PathBuf {
    for pref in [TOML_CONFIG, JSON_CONFIG, DOT_CONFIG] {
        if let Some(found) = candidates.iter().find(|p| {
            p.file_name()
                .and_then(|s| s.to_str())
                .map(|n| n.eq_ignore_ascii_case(pref))
                .unwrap_or(false)
        }) {
            return found.clone();
        }
    }
    candidates[0].clone()
}

fn select_config_interactive(candidates: &[PathBuf]) -> Option<PathBuf> {
    if atty::is(atty::Stream::Stdin) {
        let options: Vec<String> = candidates
            .iter()
            .map(|p| p.to_string_lossy().to_string())
            .collect();
        if let Ok(selected) =
            inquire::Select::new("Multiple config files found; select one:", options).prompt()
        {
            return Some(PathBuf::from(selected));
        }
    }
    None
}

pub fn write_default_json(path: &Path, config: &AppConfig) -> Result<()> {
    let json = serde_json::to_string_pretty(config).context("serialize default config")?;
    let mut file = File::create(path)
        .with_context(|| format!("failed to create config file: {}", path.display()))?;
    file.write_all(json.as_bytes())
        .with_context(|| format!("unable to write config file: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "test_config.rs"]
mod tests;
