use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{FrontendError, Result};

pub const APP_NAME: &str = "snes_handheld_frontend";

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ConfigFile {
    /// Directory holding options, button map, save states and screenshots.
    pub app_dir: Option<String>,
    /// Path to the libretro core shared library.
    pub core_path: Option<String>,
    /// Directory the game browser opens in before any game is loaded.
    pub rom_dir: Option<String>,
    pub font_path: Option<String>,
    pub fullscreen: Option<bool>,
}

impl ConfigFile {
    pub fn app_dir(&self) -> PathBuf {
        self.app_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(default_app_dir)
    }

    pub fn rom_dir(&self) -> PathBuf {
        self.rom_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| self.app_dir())
    }

    /// Overlay every field the parsed file sets.
    fn merge(&mut self, parsed: ConfigFile) {
        if parsed.app_dir.is_some() {
            self.app_dir = parsed.app_dir;
        }
        if parsed.core_path.is_some() {
            self.core_path = parsed.core_path;
        }
        if parsed.rom_dir.is_some() {
            self.rom_dir = parsed.rom_dir;
        }
        if parsed.font_path.is_some() {
            self.font_path = parsed.font_path;
        }
        if parsed.fullscreen.is_some() {
            self.fullscreen = parsed.fullscreen;
        }
    }
}

fn default_app_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join(APP_NAME))
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn user_config_dir() -> Option<PathBuf> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        let mut p = PathBuf::from(xdg);
        p.push(APP_NAME);
        Some(p)
    } else if let Some(home) = dirs::home_dir() {
        let mut p = home;
        p.push(".config");
        p.push(APP_NAME);
        Some(p)
    } else {
        None
    }
}

pub fn user_config_path() -> Option<PathBuf> {
    user_config_dir().map(|d| d.join("config.toml"))
}

/// Write `contents` next to `path` and rename it into place.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    std::fs::write(&tmp, contents)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

fn write_default_config(path: &Path) -> std::io::Result<()> {
    let sample = include_str!("../config.sample.toml");
    write_atomic(path, sample.as_bytes())
}

pub fn load_config() -> ConfigFile {
    match user_config_path() {
        Some(p) => {
            if !p.exists() {
                if let Err(e) = write_default_config(&p) {
                    log::warn!("Failed to write default config: {}", e);
                }
            }
            load_config_from(&p)
        }
        None => ConfigFile::default(),
    }
}

/// Parse the config at `path` over the built-in defaults; unreadable or
/// malformed files leave the defaults untouched.
pub fn load_config_from(path: &Path) -> ConfigFile {
    let mut cfg = ConfigFile {
        fullscreen: Some(true),
        ..ConfigFile::default()
    };
    if let Ok(contents) = std::fs::read_to_string(path) {
        match toml::from_str::<ConfigFile>(&contents) {
            Ok(parsed) => cfg.merge(parsed),
            Err(e) => log::warn!("Failed to parse config at {}: {}", path.display(), e),
        }
    }
    cfg
}

pub fn write_config(cfg: &ConfigFile) -> Result<()> {
    let p = user_config_path()
        .ok_or_else(|| FrontendError::Config("No config path available".into()))?;
    write_config_to(cfg, &p)
}

pub fn write_config_to(cfg: &ConfigFile, path: &Path) -> Result<()> {
    let s = toml::to_string_pretty(cfg)
        .map_err(|e| FrontendError::Config(format!("Failed to serialize config: {}", e)))?;
    write_atomic(path, s.as_bytes())?;
    Ok(())
}
