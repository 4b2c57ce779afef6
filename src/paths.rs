//! Locations of every file the menu persists under the application directory.

use std::path::{Path, PathBuf};

use crate::error::Result;

pub const SAVE_STATE_DIR: &str = "savedata";
pub const SCREENSHOT_DIR: &str = "screenshot";
pub const OPTIONS_FILE: &str = "snes9xvita.ini";
pub const BUTTON_CONFIG_FILE: &str = "buttons.cnf";
pub const BACKGROUND_FILE: &str = "background.png";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub app_dir: PathBuf,
    pub save_state_dir: PathBuf,
    pub screenshot_dir: PathBuf,
    pub options_file: PathBuf,
    pub button_config_file: PathBuf,
    pub background: PathBuf,
}

impl AppPaths {
    pub fn new(app_dir: impl AsRef<Path>) -> Self {
        let app_dir = app_dir.as_ref().to_path_buf();
        AppPaths {
            save_state_dir: app_dir.join(SAVE_STATE_DIR),
            screenshot_dir: app_dir.join(SCREENSHOT_DIR),
            options_file: app_dir.join(OPTIONS_FILE),
            button_config_file: app_dir.join(BUTTON_CONFIG_FILE),
            background: app_dir.join(BACKGROUND_FILE),
            app_dir,
        }
    }

    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in [&self.save_state_dir, &self.screenshot_dir] {
            if !dir.exists() {
                std::fs::create_dir_all(dir)?;
                log::info!("Created {}", dir.display());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_under_app_dir() {
        let paths = AppPaths::new("/data/snes");
        assert_eq!(paths.save_state_dir, PathBuf::from("/data/snes/savedata"));
        assert_eq!(paths.screenshot_dir, PathBuf::from("/data/snes/screenshot"));
        assert_eq!(paths.options_file, PathBuf::from("/data/snes/snes9xvita.ini"));
        assert_eq!(paths.button_config_file, PathBuf::from("/data/snes/buttons.cnf"));
    }

    #[test]
    fn test_ensure_dirs_creates_missing() {
        let dir = tempfile::tempdir().unwrap();
        let paths = AppPaths::new(dir.path().join("app"));
        paths.ensure_dirs().unwrap();
        assert!(paths.save_state_dir.is_dir());
        assert!(paths.screenshot_dir.is_dir());
        // second call is a no-op
        paths.ensure_dirs().unwrap();
    }
}
