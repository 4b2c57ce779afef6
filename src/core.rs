//! The emulator core seam.

use std::path::Path;

use crate::buttons::ResolvedInput;
use crate::error::Result;
use crate::options::{ControllerDevice, EmulatorOptions};
use crate::screenshot::Frame;

/// Core-side settings derived from the emulator options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoreSettings {
    pub controller_device: ControllerDevice,
    pub mouse_speed: u32,
    pub emulate_sound: bool,
}

impl From<&EmulatorOptions> for CoreSettings {
    fn from(opts: &EmulatorOptions) -> Self {
        CoreSettings {
            controller_device: opts.controller_device,
            mouse_speed: opts.mouse_speed,
            emulate_sound: opts.emulate_sound,
        }
    }
}

/// An emulator engine the menu drives. Mirrors the libretro entry points the
/// front-end needs.
pub trait Core {
    /// Replace the running game. The previous game is unloaded first, so
    /// on failure no game is loaded.
    fn load_game(&mut self, path: &Path) -> Result<()>;
    fn unload_game(&mut self);

    /// Emulate one frame.
    fn run(&mut self);
    fn reset(&mut self);

    /// Bytes needed by `serialize`; 0 when the core has no save states.
    fn serialize_size(&self) -> usize;
    fn serialize(&mut self, buf: &mut [u8]) -> bool;
    fn unserialize(&mut self, buf: &[u8]) -> bool;

    fn apply_settings(&mut self, settings: &CoreSettings);

    /// Input reported to the core on the next `run`.
    fn set_input(&mut self, input: ResolvedInput);

    /// Last frame the core produced.
    fn frame(&self) -> Option<Frame>;
}
