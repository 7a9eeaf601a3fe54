use crate::sync::ReparentPolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_ENV: &str = "PROCTREE_CONFIG";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub refresh_interval_ms: u64,
    pub reparent: ReparentPolicy,
    /// Regexes matched against process names; matches are left out of every view.
    pub exclude: Vec<String>,
    pub show_table: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            refresh_interval_ms: 1000,
            reparent: ReparentPolicy::Move,
            exclude: Vec::new(),
            show_table: false,
        }
    }
}

impl Settings {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms.max(1))
    }
}

/// `PROCTREE_CONFIG` if set, otherwise the per-user config directory.
pub fn get_config_path() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Ok(PathBuf::from(path));
    }
    let config_dir =
        dirs::config_dir().ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
    Ok(config_dir.join("proctree-sync").join("settings.toml"))
}

pub fn save_settings_to(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let toml_string = toml::to_string(settings)?;
    fs::write(path, toml_string)
        .with_context(|| format!("Could not write settings to {}", path.display()))?;
    Ok(())
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    save_settings_to(&get_config_path()?, settings)
}

/// Missing files yield the defaults; unreadable or invalid ones are errors.
pub fn load_settings_from(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }
    let toml_string = fs::read_to_string(path)
        .with_context(|| format!("Could not read settings from {}", path.display()))?;
    let settings: Settings = toml::from_str(&toml_string)
        .with_context(|| format!("Invalid settings in {}", path.display()))?;
    Ok(settings)
}

pub fn load_settings() -> Result<Settings> {
    load_settings_from(&get_config_path()?)
}
