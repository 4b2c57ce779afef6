//! In-memory `Core` and `Platform` used by the unit tests.

use std::path::{Path, PathBuf};

use crate::buttons::ResolvedInput;
use crate::core::{Core, CoreSettings};
use crate::error::{FrontendError, Result};
use crate::platform::Platform;
use crate::screenshot::Frame;

#[derive(Debug, Default)]
pub struct MockCore {
    pub state: Vec<u8>,
    pub frame: Option<Frame>,
    pub loaded: Option<PathBuf>,
    pub fail_load: bool,
    pub refuse_unserialize: bool,
    pub frames_run: u32,
    pub resets: u32,
    pub settings: Option<CoreSettings>,
    pub last_input: ResolvedInput,
}

impl MockCore {
    pub fn new(state: &[u8]) -> Self {
        MockCore {
            state: state.to_vec(),
            frame: Some(Frame::new(2, 2, vec![0xf800, 0x07e0, 0x001f, 0xffff])),
            ..Default::default()
        }
    }
}

impl Core for MockCore {
    fn load_game(&mut self, path: &Path) -> Result<()> {
        self.loaded = None;
        if self.fail_load {
            return Err(FrontendError::core("mock load failure"));
        }
        self.loaded = Some(path.to_path_buf());
        Ok(())
    }

    fn unload_game(&mut self) {
        self.loaded = None;
    }

    fn run(&mut self) {
        self.frames_run += 1;
    }

    fn reset(&mut self) {
        self.resets += 1;
    }

    fn serialize_size(&self) -> usize {
        self.state.len()
    }

    fn serialize(&mut self, buf: &mut [u8]) -> bool {
        if buf.len() < self.state.len() {
            return false;
        }
        buf[..self.state.len()].copy_from_slice(&self.state);
        true
    }

    fn unserialize(&mut self, buf: &[u8]) -> bool {
        if self.refuse_unserialize || buf.len() != self.state.len() {
            return false;
        }
        self.state.copy_from_slice(buf);
        true
    }

    fn apply_settings(&mut self, settings: &CoreSettings) {
        self.settings = Some(*settings);
    }

    fn set_input(&mut self, input: ResolvedInput) {
        self.last_input = input;
    }

    fn frame(&self) -> Option<Frame> {
        self.frame.clone()
    }
}

#[derive(Debug, Default)]
pub struct MockPlatform {
    pub clock: Option<u32>,
    pub vblank_wait: Option<bool>,
    pub tick: u64,
    pub idled: u64,
}

impl Platform for MockPlatform {
    fn set_clock_frequency(&mut self, mhz: u32) {
        self.clock = Some(mhz);
    }

    fn set_vblank_wait(&mut self, wait: bool) {
        self.vblank_wait = Some(wait);
    }

    fn tick_resolution(&self) -> u64 {
        1_000_000
    }

    fn current_tick(&self) -> u64 {
        self.tick
    }

    fn idle(&mut self, ticks: u64) {
        self.idled += ticks;
        self.tick += ticks;
    }
}
