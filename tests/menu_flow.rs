//! Drives a whole menu session through the public API: pick a ROM, play a
//! frame, save a state, reload it, and persist the options on exit.

use std::path::Path;

use snes_handheld_frontend::buttons::{Analog, Buttons, ResolvedInput};
use snes_handheld_frontend::core::{Core, CoreSettings};
use snes_handheld_frontend::frontend::{Dialog, Frontend, Step, MSG_LOADING, MSG_LOAD_STATE};
use snes_handheld_frontend::options::EmulatorOptions;
use snes_handheld_frontend::paths::AppPaths;
use snes_handheld_frontend::platform::Platform;
use snes_handheld_frontend::screenshot::Frame;
use snes_handheld_frontend::tabs::Tab;

struct CounterCore {
    counter: u8,
    loaded: bool,
}

impl Core for CounterCore {
    fn load_game(&mut self, _path: &Path) -> snes_handheld_frontend::Result<()> {
        self.loaded = true;
        Ok(())
    }

    fn unload_game(&mut self) {
        self.loaded = false;
    }

    fn run(&mut self) {
        self.counter = self.counter.wrapping_add(1);
    }

    fn reset(&mut self) {
        self.counter = 0;
    }

    fn serialize_size(&self) -> usize {
        4
    }

    fn serialize(&mut self, buf: &mut [u8]) -> bool {
        buf[..4].copy_from_slice(&[b'S', b'T', 0, self.counter]);
        true
    }

    fn unserialize(&mut self, buf: &[u8]) -> bool {
        if buf.len() != 4 || &buf[..2] != b"ST" {
            return false;
        }
        self.counter = buf[3];
        true
    }

    fn apply_settings(&mut self, _settings: &CoreSettings) {}

    fn set_input(&mut self, _input: ResolvedInput) {}

    fn frame(&self) -> Option<Frame> {
        Some(Frame::new(4, 4, vec![u16::from(self.counter); 16]))
    }
}

#[derive(Default)]
struct FakeClock {
    tick: u64,
}

impl Platform for FakeClock {
    fn set_clock_frequency(&mut self, _mhz: u32) {}
    fn set_vblank_wait(&mut self, _wait: bool) {}
    fn tick_resolution(&self) -> u64 {
        1000
    }
    fn current_tick(&self) -> u64 {
        self.tick
    }
    fn idle(&mut self, ticks: u64) {
        self.tick += ticks;
    }
}

#[test]
fn test_play_save_and_reload_session() {
    let tmp = tempfile::tempdir().unwrap();
    let rom_dir = tmp.path().join("roms");
    std::fs::create_dir_all(&rom_dir).unwrap();
    let rom = rom_dir.join("Mario World.smc");
    std::fs::write(&rom, b"rom").unwrap();

    let paths = AppPaths::new(tmp.path().join("app"));
    let options_file = paths.options_file.clone();
    let core = CounterCore { counter: 0, loaded: false };
    let mut fe = Frontend::new(paths, &rom_dir, core, FakeClock::default());
    assert_eq!(fe.tab, Tab::About);

    // About -> Game, then pick the ROM
    fe.handle_input(Buttons::RTRIGGER);
    assert_eq!(fe.tab, Tab::Game);
    fe.browser.open(&rom_dir, Some(&rom));
    assert_eq!(fe.browser.selected().map(|e| e.name.as_str()), Some("Mario World.smc"));
    fe.handle_input(fe.ok_button());
    assert_eq!(fe.flash_message(), Some(MSG_LOADING));
    fe.run_pending();
    assert!(fe.is_emulating());

    for _ in 0..3 {
        assert_eq!(fe.run_frame(Buttons::empty(), Analog::default()), Step::Presented);
    }

    // save into the first slot
    fe.enter_menu();
    fe.open_tab(Tab::SaveLoad);
    assert_eq!(fe.gallery.title, "Mario World");
    fe.handle_input(Buttons::SQUARE);
    fe.run_pending();
    assert!(fe.gallery.slots[0].is_occupied());
    assert!(fe.dialog.is_none());

    // play on, then come back and load the state
    fe.handle_input(fe.cancel_button());
    fe.run_frame(Buttons::empty(), Analog::default());
    assert_eq!(fe.core().counter, 4);
    fe.enter_menu();
    fe.open_tab(Tab::SaveLoad);
    fe.handle_input(fe.ok_button());
    assert!(matches!(fe.dialog, Some(Dialog::Confirm { message, .. }) if message == MSG_LOAD_STATE));
    fe.handle_input(fe.ok_button());
    assert!(fe.is_emulating());
    assert_eq!(fe.core().counter, 3);

    fe.shutdown();
    assert!(!fe.core().loaded);
    assert_eq!(EmulatorOptions::load(&options_file), EmulatorOptions::default());
}

#[test]
fn test_save_tabs_hidden_until_a_game_runs() {
    let tmp = tempfile::tempdir().unwrap();
    let paths = AppPaths::new(tmp.path());
    let core = CounterCore { counter: 0, loaded: false };
    let mut fe = Frontend::new(paths, tmp.path(), core, FakeClock::default());

    fe.open_tab(Tab::SaveLoad);
    assert_eq!(fe.tab, Tab::Control);
    assert!(!fe.is_emulating());

    // cancel without a game stays in the menu
    fe.handle_input(fe.cancel_button());
    assert!(!fe.is_emulating());
}
