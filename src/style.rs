use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::{user_config_dir, write_atomic};

pub type Rgba = [u8; 4];

const GRAY: Rgba = [0xcc, 0xcc, 0xcc, 0xff];
const YELLOW: Rgba = [0xff, 0xff, 0x00, 0xff];
const WHITE: Rgba = [0xff, 0xff, 0xff, 0xff];
const BLACK: Rgba = [0x00, 0x00, 0x00, 0xff];

/// UI metrics and colours. Every field is optional in `style.toml`; missing
/// ones keep the built-in look.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct StyleConfig {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub font_size: u16,
    pub background: Rgba,
    pub text: Rgba,
    pub selected: Rgba,
    pub selected_bg: Rgba,
    pub status_bar: Rgba,
    pub browser_file: Rgba,
    pub browser_directory: Rgba,
    pub scrollbar: Rgba,
    pub scrollbar_bg: Rgba,
    pub scrollbar_width: u32,
    pub gallery_icons_per_row: usize,
    pub gallery_icon_margin: i32,
    pub menu_item_margin: i32,
    pub menu_option_box: Rgba,
    pub menu_option_box_bg: Rgba,
    pub menu_sel_option_bg: Rgba,
    pub menu_decor: Rgba,
    pub dialog_fog: Rgba,
    pub title_padding: i32,
    pub title: Rgba,
    pub tab_bg: Rgba,
    pub no_save_icon: Rgba,
    pub menu_fps: u32,
}

impl Default for StyleConfig {
    fn default() -> Self {
        StyleConfig {
            left: 16,
            top: 48,
            right: 944,
            bottom: 500,
            font_size: 16,
            background: [0x01, 0x33, 0x24, 0xff],
            text: GRAY,
            selected: YELLOW,
            selected_bg: [0xff, 0xff, 0xff, 0x44],
            status_bar: WHITE,
            browser_file: GRAY,
            browser_directory: YELLOW,
            scrollbar: GRAY,
            scrollbar_bg: [0xff, 0xff, 0xff, 0x44],
            scrollbar_width: 10,
            gallery_icons_per_row: 5,
            gallery_icon_margin: 16,
            menu_item_margin: 20,
            menu_option_box: GRAY,
            menu_option_box_bg: [0x01, 0x33, 0x24, 0xbb],
            menu_sel_option_bg: BLACK,
            menu_decor: YELLOW,
            dialog_fog: [0, 0, 0, 88],
            title_padding: 8,
            title: WHITE,
            tab_bg: [0xc5, 0xe0, 0xd8, 0xff],
            no_save_icon: [0x01, 0x33, 0x24, 0xff],
            menu_fps: 30,
        }
    }
}

pub fn user_style_path() -> Option<PathBuf> {
    user_config_dir().map(|d| d.join("style.toml"))
}

fn write_default_style(path: &Path) -> std::io::Result<()> {
    let sample = toml::to_string_pretty(&StyleConfig::default())
        .map_err(std::io::Error::other)?;
    write_atomic(path, sample.as_bytes())
}

pub fn load_style() -> StyleConfig {
    match user_style_path() {
        Some(p) => {
            if !p.exists() {
                if let Err(e) = write_default_style(&p) {
                    log::warn!("Failed to write default style: {}", e);
                }
            }
            load_style_from(&p)
        }
        None => StyleConfig::default(),
    }
}

pub fn load_style_from(path: &Path) -> StyleConfig {
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str::<StyleConfig>(&contents) {
            Ok(parsed) => parsed,
            Err(e) => {
                log::warn!("Failed to parse style at {}: {}", path.display(), e);
                StyleConfig::default()
            }
        },
        Err(_) => StyleConfig::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_style_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("style.toml");
        std::fs::write(&path, "gallery_icons_per_row = 4\ntab_bg = [1, 2, 3, 255]\n").unwrap();
        let style = load_style_from(&path);
        assert_eq!(style.gallery_icons_per_row, 4);
        assert_eq!(style.tab_bg, [1, 2, 3, 255]);
        assert_eq!(style.menu_fps, 30);
        assert_eq!(style.left, 16);
    }

    #[test]
    fn test_broken_style_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("style.toml");
        std::fs::write(&path, "left = \"wide\"").unwrap();
        assert_eq!(load_style_from(&path), StyleConfig::default());
    }

    #[test]
    fn test_default_style_serializes() {
        let s = toml::to_string_pretty(&StyleConfig::default()).unwrap();
        let back: StyleConfig = toml::from_str(&s).unwrap();
        assert_eq!(back, StyleConfig::default());
    }
}
