//! Emulated frames and screenshot files.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbImage};

use crate::config::write_atomic;
use crate::error::Result;

/// Highest sequence number a screenshot name can carry.
pub const MAX_SEQUENCE: u32 = 99;

/// One emulated frame, tightly packed RGB565.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u16>,
}

/// Expand an RGB565 pixel to 8 bits per channel.
pub fn rgb565_to_rgb888(p: u16) -> [u8; 3] {
    let r = ((p >> 11) & 0x1f) as u8;
    let g = ((p >> 5) & 0x3f) as u8;
    let b = (p & 0x1f) as u8;
    [(r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2)]
}

impl Frame {
    pub fn new(width: u32, height: u32, pixels: Vec<u16>) -> Self {
        debug_assert_eq!(pixels.len(), (width * height) as usize);
        Frame {
            width,
            height,
            pixels,
        }
    }

    pub fn blank(width: u32, height: u32) -> Self {
        Frame::new(width, height, vec![0; (width * height) as usize])
    }

    pub fn to_rgb_image(&self) -> RgbImage {
        let mut raw = Vec::with_capacity(self.pixels.len() * 3);
        for p in &self.pixels {
            raw.extend_from_slice(&rgb565_to_rgb888(*p));
        }
        RgbImage::from_raw(self.width, self.height, raw)
            .unwrap_or_else(|| RgbImage::new(self.width, self.height))
    }

    pub fn encode_png(&self) -> Result<Vec<u8>> {
        encode_png(&self.to_rgb_image())
    }
}

pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    image.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(buf)
}

/// `<dir>/<prefix>-NN.png` for the first NN not taken yet; once every
/// number is used the last one is reused.
pub fn sequential_path(dir: &Path, prefix: &str) -> PathBuf {
    (0..=MAX_SEQUENCE)
        .map(|i| dir.join(format!("{}-{:02}.png", prefix, i)))
        .find(|p| !p.exists())
        .unwrap_or_else(|| dir.join(format!("{}-{:02}.png", prefix, MAX_SEQUENCE)))
}

pub fn save_png(image: &RgbImage, path: &Path) -> Result<()> {
    write_atomic(path, &encode_png(image)?)?;
    Ok(())
}

/// Save `image` under the next free sequence number, creating `dir` first.
pub fn save_sequential(image: &RgbImage, dir: &Path, prefix: &str) -> Result<PathBuf> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
    }
    let path = sequential_path(dir, prefix);
    save_png(image, &path)?;
    log::info!("Saved screenshot {}", path.display());
    Ok(path)
}
