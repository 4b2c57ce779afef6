//! Save-state files and the state-slot gallery.
//!
//! A state file is a complete PNG screenshot of the frame on screen when the
//! state was taken, immediately followed by the core's serialized state:
//!
//! ```text
//! +----------------------------+------------------------------+
//! | PNG (signature .. IEND)    | serialize_size() state bytes |
//! +----------------------------+------------------------------+
//! ```
//!
//! Readers find the boundary by walking the PNG chunk list up to `IEND`.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local};
use image::{ImageFormat, RgbaImage};

use crate::config::write_atomic;
use crate::core::Core;
use crate::error::{FrontendError, Result};

pub const SLOT_COUNT: u32 = 10;

pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

pub const EMPTY_CAPTION: &str = "Empty";
pub const ERROR_CAPTION: &str = "ERROR";
pub const EMPTY_SLOT_HELP: &str = "Square: Save";
pub const PRESENT_SLOT_HELP: &str = "Square: Save\tOK: Load\tTriangle: Delete";

/// `<dir>/<game file name>.sNN`
pub fn slot_path(dir: &Path, game_file_name: &str, slot: u32) -> PathBuf {
    dir.join(format!("{}.s{:02}", game_file_name, slot))
}

/// Length in bytes of the PNG stream at the start of `data`, including the
/// `IEND` chunk. Chunk CRCs are verified on the way.
pub fn png_length(data: &[u8]) -> Result<usize> {
    if data.len() < PNG_SIGNATURE.len() || data[..PNG_SIGNATURE.len()] != PNG_SIGNATURE {
        return Err(FrontendError::malformed("missing PNG signature"));
    }
    let mut pos = PNG_SIGNATURE.len();
    loop {
        let header = data
            .get(pos..pos + 8)
            .ok_or_else(|| FrontendError::malformed("truncated PNG chunk header"))?;
        let len = u32::from_be_bytes([header[0], header[1], header[2], header[3]]) as usize;
        let kind = [header[4], header[5], header[6], header[7]];
        let end = pos
            .checked_add(12)
            .and_then(|n| n.checked_add(len))
            .filter(|end| *end <= data.len())
            .ok_or_else(|| FrontendError::malformed("truncated PNG chunk"))?;

        let stored = u32::from_be_bytes([data[end - 4], data[end - 3], data[end - 2], data[end - 1]]);
        if crc32fast::hash(&data[pos + 4..end - 4]) != stored {
            return Err(FrontendError::malformed(format!(
                "bad CRC in {} chunk",
                String::from_utf8_lossy(&kind)
            )));
        }
        pos = end;
        if &kind == b"IEND" {
            return Ok(pos);
        }
    }
}

/// Split a state file into its PNG screenshot and the trailing state bytes.
pub fn split_state_file(data: &[u8]) -> Result<(&[u8], &[u8])> {
    let png_len = png_length(data)?;
    Ok(data.split_at(png_len))
}

pub fn encode_state_file(png: &[u8], state: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(png.len() + state.len());
    out.extend_from_slice(png);
    out.extend_from_slice(state);
    out
}

/// Write the current frame and the core's state to `path`.
pub fn save_state(core: &mut dyn Core, path: &Path) -> Result<()> {
    let frame = core.frame().ok_or(FrontendError::NoFrame)?;
    let png = frame.encode_png()?;

    let size = core.serialize_size();
    if size == 0 {
        return Err(FrontendError::core("Core does not support save states"));
    }
    let mut state = vec![0u8; size];
    if !core.serialize(&mut state) {
        return Err(FrontendError::core("Failed to serialize state"));
    }

    write_atomic(path, &encode_state_file(&png, &state))?;
    log::info!(
        "Saved state to {} ({} byte screenshot, {} byte state)",
        path.display(),
        png.len(),
        size
    );
    Ok(())
}

/// Skip the screenshot in `path` and hand the state that follows to the core.
pub fn load_state(core: &mut dyn Core, path: &Path) -> Result<()> {
    let data = std::fs::read(path)?;
    let (_, state) = split_state_file(&data)?;

    let size = core.serialize_size();
    if state.len() < size {
        return Err(FrontendError::TruncatedState {
            expected: size,
            actual: state.len(),
        });
    }
    if !core.unserialize(&state[..size]) {
        return Err(FrontendError::core("Failed to unserialize state"));
    }
    log::info!("Loaded state from {}", path.display());
    Ok(())
}

/// Decode the screenshot stored at the front of a state file.
pub fn load_state_icon(path: &Path) -> Result<RgbaImage> {
    let data = std::fs::read(path)?;
    let (png, _) = split_state_file(&data)?;
    Ok(image::load_from_memory_with_format(png, ImageFormat::Png)?.into_rgba8())
}

/// `MM/DD/YY HH:MM` in local time.
pub fn format_caption(mtime: SystemTime) -> String {
    DateTime::<Local>::from(mtime)
        .format("%m/%d/%y %H:%M")
        .to_string()
}

#[derive(Debug, Clone, PartialEq)]
pub enum SlotIcon {
    /// No state in the slot; drawn as the "no save" placeholder
    Empty,
    /// A state exists but its screenshot could not be decoded
    Missing,
    Image(RgbaImage),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    pub id: u32,
    pub caption: String,
    pub icon: SlotIcon,
    pub help_text: &'static str,
}

impl Slot {
    fn empty(id: u32) -> Self {
        Slot {
            id,
            caption: EMPTY_CAPTION.to_string(),
            icon: SlotIcon::Empty,
            help_text: EMPTY_SLOT_HELP,
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.icon != SlotIcon::Empty
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlotGallery {
    pub slots: Vec<Slot>,
    pub cursor: usize,
    pub title: String,
    revision: u64,
}

impl Default for SlotGallery {
    fn default() -> Self {
        SlotGallery {
            slots: (0..SLOT_COUNT).map(Slot::empty).collect(),
            cursor: 0,
            title: String::new(),
            revision: 0,
        }
    }
}

impl SlotGallery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-read every slot of `game` from `dir`.
    pub fn refresh(&mut self, dir: &Path, game: &Path) {
        let file_name = game_file_name(game);
        self.title = game
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        for id in 0..SLOT_COUNT {
            self.refresh_slot(id, &slot_path(dir, &file_name, id));
        }
    }

    /// Update one slot from the file at `path`.
    pub fn refresh_slot(&mut self, id: u32, path: &Path) {
        let Some(slot) = self.slots.iter_mut().find(|s| s.id == id) else {
            return;
        };
        self.revision += 1;
        if !path.exists() {
            *slot = Slot::empty(id);
            return;
        }
        let mtime = std::fs::metadata(path).and_then(|m| m.modified());
        if let Err(e) = &mtime {
            log::warn!("Failed to stat {}: {}", path.display(), e);
        }
        slot.caption = slot_caption(mtime);
        slot.icon = match load_state_icon(path) {
            Ok(img) => SlotIcon::Image(img),
            Err(e) => {
                log::warn!("Failed to load state icon from {}: {}", path.display(), e);
                SlotIcon::Missing
            }
        };
        slot.help_text = PRESENT_SLOT_HELP;
    }

    pub fn mark_empty(&mut self, id: u32) {
        if let Some(slot) = self.slots.iter_mut().find(|s| s.id == id) {
            *slot = Slot::empty(id);
            self.revision += 1;
        }
    }

    /// Bumped whenever a slot's icon or caption may have changed, so
    /// renderers can keep per-slot textures until it moves.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn selected(&self) -> Option<&Slot> {
        self.slots.get(self.cursor)
    }

    /// Move through a grid `per_row` icons wide, staying inside it.
    pub fn move_cursor(&mut self, dx: i32, dy: i32, per_row: usize) {
        let per_row = per_row.max(1) as i32;
        let target = self.cursor as i32 + dx + dy * per_row;
        if target >= 0 && (target as usize) < self.slots.len() {
            let same_row = dx == 0 || target / per_row == self.cursor as i32 / per_row;
            if same_row {
                self.cursor = target as usize;
            }
        }
    }

    /// Drop decoded icons while the gallery is not displayed.
    pub fn release_icons(&mut self) {
        self.revision += 1;
        for slot in &mut self.slots {
            if let SlotIcon::Image(_) = slot.icon {
                slot.icon = SlotIcon::Missing;
            }
        }
    }
}

/// Slot caption for a state file's modification time, or the error caption
/// when it could not be read.
pub fn slot_caption(mtime: std::io::Result<SystemTime>) -> String {
    match mtime {
        Ok(mtime) => format_caption(mtime),
        Err(_) => ERROR_CAPTION.to_string(),
    }
}

/// File name (with extension) of the game, used to key its state slots.
pub fn game_file_name(game: &Path) -> String {
    game.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "tests/savestate_tests.rs"]
mod tests;
