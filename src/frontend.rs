//! The menu session: tab navigation, the per-tab widgets and their handlers,
//! and the hand-off between menu and emulation.
//!
//! Modal dialogs are state rather than nested loops. A handler that needs a
//! confirmation stores the action it will take in [`Dialog::Confirm`]; slow
//! work that shows a flash message first is queued and run by
//! [`Frontend::run_pending`] once the message has been drawn.

use std::path::{Path, PathBuf};

use image::RgbImage;

use crate::browser::{Activated, Browser};
use crate::buttons::{Analog, ButtonConfig, Buttons, MapSlot, MapTarget};
use crate::core::{Core, CoreSettings};
use crate::error::{FrontendError, Result};
use crate::menu::{self, Menu, OptionId, SystemId};
use crate::options::{ControlMode, ControllerDevice, DisplayMode, EmulatorOptions};
use crate::paths::AppPaths;
use crate::platform::{FpsCounter, FrameLimiter, Platform};
use crate::savestate::{self, game_file_name, SlotGallery};
use crate::screenshot;
use crate::style::StyleConfig;
use crate::tabs::Tab;

pub const MSG_SAVED: &str = "Saved successfully";
pub const MSG_NOT_SAVED: &str = "ERROR: Not saved";
pub const MSG_LOADING: &str = "Loading, please wait...";
pub const MSG_GAME_NOT_LOADED: &str = "ERROR: Game not loaded";
pub const MSG_LOAD_STATE: &str = "Load state?";
pub const MSG_STATE_LOAD_FAILED: &str = "ERROR: State failed to load";
pub const MSG_OVERWRITE_STATE: &str = "Overwrite existing state?";
pub const MSG_SAVING: &str = "Saving, please wait...";
pub const MSG_STATE_SAVE_FAILED: &str = "ERROR: Couldn't save savestate";
pub const MSG_DELETE_STATE: &str = "Delete state?";
pub const MSG_STATE_NOT_DELETED: &str = "ERROR: State not deleted";
pub const MSG_CHANGES_SAVED: &str = "Changes saved";
pub const MSG_CHANGES_NOT_SAVED: &str = "ERROR: Changes not saved";
pub const MSG_RESET: &str = "Reset the system?";
pub const MSG_SCREENSHOT_SAVED: &str = "Screenshot saved successfully";
pub const MSG_SCREENSHOT_NOT_SAVED: &str = "ERROR: Screenshot not saved";

/// Prefix of screenshots taken of the menu itself.
pub const UI_SCREENSHOT_PREFIX: &str = "ui";

/// What a confirmed dialog goes on to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    LoadState(u32),
    OverwriteState(u32),
    DeleteState(u32),
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialog {
    Confirm {
        message: &'static str,
        action: PendingAction,
    },
    Alert(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Work {
    LoadGame(PathBuf),
    SaveState(u32),
}

/// Outcome of one emulation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The frame should be shown
    Presented,
    /// The frame was emulated but skipped
    Skipped,
    /// The menu is up; nothing ran
    InMenu,
}

pub struct Frontend<C: Core, P: Platform> {
    pub paths: AppPaths,
    pub options: EmulatorOptions,
    pub active_config: ButtonConfig,
    pub tab: Tab,
    pub gallery: SlotGallery,
    pub control_menu: Menu,
    pub options_menu: Menu,
    pub system_menu: Menu,
    pub browser: Browser,
    pub dialog: Option<Dialog>,
    /// Gallery grid width, matching the renderer's layout
    pub gallery_per_row: usize,

    core: C,
    platform: P,
    game: Option<PathBuf>,
    game_dir: PathBuf,
    flash: Option<&'static str>,
    work: Option<Work>,
    resume: bool,
    ui_capture_requested: bool,
    limiter: FrameLimiter,
    fps: FpsCounter,
    skipped: u32,
}

impl<C: Core, P: Platform> Frontend<C, P> {
    /// Prepare the menu: state and screenshot directories, options, button
    /// map, menus and empty save slots. The session starts on the About tab.
    pub fn new(paths: AppPaths, rom_dir: &Path, core: C, platform: P) -> Self {
        if let Err(e) = paths.ensure_dirs() {
            log::error!("Failed to create data directories under {}: {}", paths.app_dir.display(), e);
        }
        let options = EmulatorOptions::load(&paths.options_file);
        let active_config = ButtonConfig::load_or_default(&paths.button_config_file);
        let limiter = FrameLimiter::new(options.update_freq, platform.tick_resolution());

        Frontend {
            options,
            active_config,
            tab: Tab::About,
            gallery: SlotGallery::new(),
            control_menu: menu::control_menu(),
            options_menu: menu::options_menu(),
            system_menu: menu::system_menu(),
            browser: Browser::new(rom_dir),
            dialog: None,
            gallery_per_row: StyleConfig::default().gallery_icons_per_row,
            core,
            platform,
            game: None,
            game_dir: rom_dir.to_path_buf(),
            flash: None,
            work: None,
            resume: false,
            ui_capture_requested: false,
            limiter,
            fps: FpsCounter::new(),
            skipped: 0,
            paths,
        }
    }

    pub fn core(&self) -> &C {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut C {
        &mut self.core
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn game(&self) -> Option<&Path> {
        self.game.as_deref()
    }

    pub fn game_loaded(&self) -> bool {
        self.game.is_some()
    }

    /// Directory the quick-load browser opens in when no game is loaded.
    pub fn game_dir(&self) -> &Path {
        &self.game_dir
    }

    pub fn is_emulating(&self) -> bool {
        self.resume
    }

    pub fn flash_message(&self) -> Option<&'static str> {
        self.flash
    }

    pub fn has_pending_work(&self) -> bool {
        self.work.is_some()
    }

    pub fn fps(&self) -> u32 {
        self.fps.fps()
    }

    pub fn ok_button(&self) -> Buttons {
        self.options.control_mode.ok_button()
    }

    pub fn cancel_button(&self) -> Buttons {
        self.options.control_mode.cancel_button()
    }

    /// Help line for the widget under the cursor.
    pub fn help_text(&self) -> &str {
        match self.tab {
            Tab::SaveLoad => self.gallery.selected().map(|s| s.help_text).unwrap_or(""),
            Tab::Control => self.control_menu.selected_item().map(|i| i.help_text.as_str()).unwrap_or(""),
            Tab::Options => self.options_menu.selected_item().map(|i| i.help_text.as_str()).unwrap_or(""),
            Tab::System => self.system_menu.selected_item().map(|i| i.help_text.as_str()).unwrap_or(""),
            Tab::Game | Tab::About => "",
        }
    }

    /// Leave emulation and show the current tab.
    pub fn enter_menu(&mut self) {
        self.resume = false;
        self.open_tab(self.tab);
    }

    /// Switch to `tab` and bring its widget in line with the current state.
    pub fn open_tab(&mut self, tab: Tab) {
        if self.tab == Tab::SaveLoad && tab != Tab::SaveLoad {
            self.gallery.release_icons();
        }
        self.tab = tab;
        match tab {
            Tab::Game => {
                let (dir, select) = match &self.game {
                    Some(game) => (
                        game.parent().map(Path::to_path_buf).unwrap_or_else(|| self.game_dir.clone()),
                        Some(game.clone()),
                    ),
                    None => (self.game_dir.clone(), None),
                };
                self.browser.open(&dir, select.as_deref());
            }
            Tab::SaveLoad => match self.game.clone() {
                Some(game) => self.gallery.refresh(&self.paths.save_state_dir, &game),
                None => self.open_tab(tab.next(false)),
            },
            Tab::Control => self.sync_control_menu(),
            Tab::Options => self.sync_options_menu(),
            Tab::System | Tab::About => {}
        }
    }

    fn sync_control_menu(&mut self) {
        for slot in MapSlot::ALL {
            let value = self.active_config[slot].value() as i32;
            self.control_menu.select_option_by_value(slot.index() as u32, value);
        }
    }

    fn sync_options_menu(&mut self) {
        let o = &self.options;
        let values = [
            (OptionId::DisplayMode, o.display_mode.value()),
            (OptionId::TextureFilter, i32::from(o.texture_filter)),
            (OptionId::EmulateSound, i32::from(o.emulate_sound)),
            (OptionId::ControllerDevice, o.controller_device.value()),
            (OptionId::MouseSensitivity, o.mouse_speed as i32),
            (OptionId::SyncFreq, o.update_freq as i32),
            (OptionId::Frameskip, o.frameskip as i32),
            (OptionId::VSync, i32::from(o.vsync)),
            (OptionId::ClockFreq, o.clock_freq as i32),
            (OptionId::ShowFps, i32::from(o.show_fps)),
            (OptionId::ControlMode, o.control_mode.value()),
            (OptionId::Animate, i32::from(o.animate)),
        ];
        for (id, value) in values {
            self.options_menu.select_option_by_value(id.id(), value);
        }
    }

    /// React to `held` as if every button in it had just gone down.
    pub fn handle_input(&mut self, held: Buttons) {
        self.handle_press(held, held);
    }

    /// React to a press while the menu is up. Handlers see only the
    /// newly `pressed` buttons; `held` completes the Start+Select combo when
    /// one half of it was already down.
    pub fn handle_press(&mut self, pressed: Buttons, held: Buttons) {
        if self.resume || self.work.is_some() || pressed.is_empty() {
            return;
        }
        let combo = Buttons::START | Buttons::SELECT;
        let keys = if pressed.intersects(combo) && held.contains(combo) {
            pressed | combo
        } else {
            pressed
        };
        let ok = self.ok_button();
        let cancel = self.cancel_button();

        if let Some(dialog) = self.dialog.take() {
            match dialog {
                Dialog::Confirm { action, .. } if keys.contains(ok) => self.confirmed(action),
                Dialog::Confirm { .. } if keys.contains(cancel) => {}
                Dialog::Alert(_) if keys.intersects(ok | cancel) => {}
                other => self.dialog = Some(other),
            }
            return;
        }

        match self.tab {
            Tab::Game => self.browser_input(keys, ok, cancel),
            Tab::SaveLoad => self.gallery_input(keys, ok, cancel),
            Tab::Control | Tab::Options | Tab::System => self.menu_input(keys, ok, cancel),
            Tab::About => {
                if keys.contains(cancel) {
                    self.generic_cancel();
                } else {
                    self.generic_button_press(keys);
                }
            }
        }
    }

    fn browser_input(&mut self, held: Buttons, ok: Buttons, cancel: Buttons) {
        if held.contains(ok) {
            if let Activated::Game(path) = self.browser.activate() {
                self.quickload(path);
            }
        } else if held.contains(cancel) {
            self.generic_cancel();
        } else if held.contains(Buttons::UP) {
            self.browser.move_cursor(-1);
        } else if held.contains(Buttons::DOWN) {
            self.browser.move_cursor(1);
        } else if held.contains(Buttons::LEFT) {
            self.browser.move_cursor(-10);
        } else if held.contains(Buttons::RIGHT) {
            self.browser.move_cursor(10);
        } else {
            self.generic_button_press(held);
        }
    }

    fn gallery_input(&mut self, held: Buttons, ok: Buttons, cancel: Buttons) {
        if self.game.is_none() {
            self.open_tab(self.tab.next(false));
            return;
        }
        let per_row = self.gallery_per_row;
        let slot = self.gallery.selected().map(|s| s.id).unwrap_or(0);
        if held.contains(ok) {
            self.save_state_ok(slot);
        } else if held.contains(cancel) {
            self.generic_cancel();
        } else if held.intersects(Buttons::SQUARE | Buttons::TRIANGLE) {
            self.save_state_button_press(slot, held);
        } else if held.contains(Buttons::UP) {
            self.gallery.move_cursor(0, -1, per_row);
        } else if held.contains(Buttons::DOWN) {
            self.gallery.move_cursor(0, 1, per_row);
        } else if held.contains(Buttons::LEFT) {
            self.gallery.move_cursor(-1, 0, per_row);
        } else if held.contains(Buttons::RIGHT) {
            self.gallery.move_cursor(1, 0, per_row);
        } else {
            self.generic_button_press(held);
        }
    }

    fn current_menu_mut(&mut self) -> Option<&mut Menu> {
        match self.tab {
            Tab::Control => Some(&mut self.control_menu),
            Tab::Options => Some(&mut self.options_menu),
            Tab::System => Some(&mut self.system_menu),
            _ => None,
        }
    }

    fn menu_input(&mut self, held: Buttons, ok: Buttons, cancel: Buttons) {
        if held.contains(ok) {
            self.menu_ok();
        } else if held.contains(cancel) {
            self.generic_cancel();
        } else if held.intersects(Buttons::UP | Buttons::DOWN) {
            let delta = if held.contains(Buttons::UP) { -1 } else { 1 };
            if let Some(menu) = self.current_menu_mut() {
                menu.move_cursor(delta);
            }
        } else if held.intersects(Buttons::LEFT | Buttons::RIGHT) {
            let delta = if held.contains(Buttons::LEFT) { -1 } else { 1 };
            let changed = self.current_menu_mut().and_then(|m| m.cycle_option(delta));
            if let Some((id, value)) = changed {
                self.menu_item_changed(id, value);
            }
        } else {
            self.menu_button_press(held);
        }
    }

    /// L/R switch tabs; Start+Select asks for a screenshot of the menu.
    pub fn generic_button_press(&mut self, held: Buttons) {
        let loaded = self.game_loaded();
        if held.contains(Buttons::LTRIGGER) {
            self.open_tab(self.tab.prev(loaded));
        } else if held.contains(Buttons::RTRIGGER) {
            self.open_tab(self.tab.next(loaded));
        } else if held.contains(Buttons::START | Buttons::SELECT) {
            self.ui_capture_requested = true;
        }
    }

    /// Back to the game, if there is one.
    pub fn generic_cancel(&mut self) {
        if self.game_loaded() {
            self.resume_emulation();
        }
    }

    fn resume_emulation(&mut self) {
        self.resume = true;
        self.gallery.release_icons();
        self.apply_options();
    }

    /// The renderer checks this once per menu frame and, when set, reads back
    /// the screen and hands it to [`Frontend::save_ui_screenshot`].
    pub fn take_ui_capture_request(&mut self) -> bool {
        std::mem::take(&mut self.ui_capture_requested)
    }

    pub fn save_ui_screenshot(&mut self, image: &RgbImage) {
        let msg = match screenshot::save_sequential(image, &self.paths.screenshot_dir, UI_SCREENSHOT_PREFIX) {
            Ok(_) => MSG_SAVED,
            Err(e) => {
                log::error!("Failed to save menu screenshot: {}", e);
                MSG_NOT_SAVED
            }
        };
        self.alert(msg);
    }

    fn alert(&mut self, msg: &str) {
        self.dialog = Some(Dialog::Alert(msg.to_string()));
    }

    fn confirm(&mut self, message: &'static str, action: PendingAction) {
        self.dialog = Some(Dialog::Confirm { message, action });
    }

    fn queue(&mut self, flash: &'static str, work: Work) {
        self.flash = Some(flash);
        self.work = Some(work);
    }

    /// Run work queued behind a flash message. Call after the message has
    /// been drawn.
    pub fn run_pending(&mut self) {
        self.flash = None;
        match self.work.take() {
            Some(Work::LoadGame(path)) => self.load_game(&path),
            Some(Work::SaveState(slot)) => self.save_state(slot),
            None => {}
        }
    }

    pub fn quickload(&mut self, path: PathBuf) {
        self.queue(MSG_LOADING, Work::LoadGame(path));
    }

    fn load_game(&mut self, path: &Path) {
        if let Err(e) = self.core.load_game(path) {
            log::error!("Failed to load {}: {}", path.display(), e);
            // the core has already dropped whatever game it was running
            self.core.unload_game();
            self.game = None;
            self.resume = false;
            self.alert(MSG_GAME_NOT_LOADED);
            return;
        }
        self.game = Some(path.to_path_buf());
        if let Some(parent) = path.parent() {
            self.game_dir = parent.to_path_buf();
        }
        self.resume_emulation();
    }

    fn slot_path(&self, slot: u32) -> Result<PathBuf> {
        let game = self.game.as_deref().ok_or(FrontendError::NoGame)?;
        Ok(savestate::slot_path(&self.paths.save_state_dir, &game_file_name(game), slot))
    }

    /// OK on a gallery slot: load it after confirmation.
    pub fn save_state_ok(&mut self, slot: u32) {
        let Ok(path) = self.slot_path(slot) else {
            self.open_tab(self.tab.next(false));
            return;
        };
        if path.exists() {
            self.confirm(MSG_LOAD_STATE, PendingAction::LoadState(slot));
        }
    }

    /// Square saves into the slot, Triangle deletes it; anything else is a
    /// generic press.
    pub fn save_state_button_press(&mut self, slot: u32, held: Buttons) {
        let Ok(path) = self.slot_path(slot) else {
            self.open_tab(self.tab.next(false));
            return;
        };
        if held.contains(Buttons::SQUARE) {
            if path.exists() {
                self.confirm(MSG_OVERWRITE_STATE, PendingAction::OverwriteState(slot));
            } else {
                self.queue(MSG_SAVING, Work::SaveState(slot));
            }
        } else if held.contains(Buttons::TRIANGLE) {
            if path.exists() {
                self.confirm(MSG_DELETE_STATE, PendingAction::DeleteState(slot));
            }
        } else {
            self.generic_button_press(held);
        }
    }

    fn confirmed(&mut self, action: PendingAction) {
        match action {
            PendingAction::LoadState(slot) => self.load_state(slot),
            PendingAction::OverwriteState(slot) => self.queue(MSG_SAVING, Work::SaveState(slot)),
            PendingAction::DeleteState(slot) => self.delete_state(slot),
            PendingAction::Reset => {
                self.core.reset();
                log::info!("System reset");
                self.resume_emulation();
            }
        }
    }

    fn load_state(&mut self, slot: u32) {
        let result = self
            .slot_path(slot)
            .and_then(|path| savestate::load_state(&mut self.core, &path));
        match result {
            Ok(()) => self.resume_emulation(),
            Err(e) => {
                log::error!("Failed to load state {}: {}", slot, e);
                self.alert(MSG_STATE_LOAD_FAILED);
            }
        }
    }

    fn save_state(&mut self, slot: u32) {
        let result = self.slot_path(slot).and_then(|path| {
            savestate::save_state(&mut self.core, &path)?;
            Ok(path)
        });
        match result {
            Ok(path) => self.gallery.refresh_slot(slot, &path),
            Err(e) => {
                log::error!("Failed to save state {}: {}", slot, e);
                self.alert(MSG_STATE_SAVE_FAILED);
            }
        }
    }

    fn delete_state(&mut self, slot: u32) {
        let result = self
            .slot_path(slot)
            .and_then(|path| std::fs::remove_file(&path).map_err(FrontendError::from));
        match result {
            Ok(()) => {
                log::info!("Deleted state {}", slot);
                self.gallery.mark_empty(slot);
            }
            Err(e) => {
                log::error!("Failed to delete state {}: {}", slot, e);
                self.alert(MSG_STATE_NOT_DELETED);
            }
        }
    }

    /// A menu option changed: update the mapping or the options and persist
    /// the options.
    pub fn menu_item_changed(&mut self, id: u32, value: i32) {
        match self.tab {
            Tab::Control => {
                let slot = MapSlot::from_index(id as usize);
                let target = u32::try_from(value).ok().and_then(MapTarget::from_value);
                if let (Some(slot), Some(target)) = (slot, target) {
                    self.active_config[slot] = target;
                }
            }
            Tab::Options => self.set_option(id, value),
            _ => {}
        }
        if let Err(e) = self.options.save(&self.paths.options_file) {
            log::error!("Failed to save options: {}", e);
        }
    }

    fn set_option(&mut self, id: u32, value: i32) {
        let o = &mut self.options;
        let as_u32 = |v: i32| u32::try_from(v).unwrap_or(0);
        match OptionId::from_id(id) {
            Some(OptionId::DisplayMode) => {
                if let Some(mode) = DisplayMode::from_value(value) {
                    o.display_mode = mode;
                }
            }
            Some(OptionId::TextureFilter) => o.texture_filter = value != 0,
            Some(OptionId::EmulateSound) => o.emulate_sound = value != 0,
            Some(OptionId::ControllerDevice) => {
                if let Some(device) = ControllerDevice::from_value(value) {
                    o.controller_device = device;
                }
            }
            Some(OptionId::MouseSensitivity) => o.mouse_speed = as_u32(value),
            Some(OptionId::SyncFreq) => o.update_freq = as_u32(value),
            Some(OptionId::Frameskip) => o.frameskip = as_u32(value),
            Some(OptionId::VSync) => o.vsync = value != 0,
            Some(OptionId::ClockFreq) => o.clock_freq = as_u32(value),
            Some(OptionId::ShowFps) => o.show_fps = value != 0,
            Some(OptionId::ControlMode) => {
                if let Some(mode) = ControlMode::from_value(value) {
                    o.control_mode = mode;
                }
            }
            Some(OptionId::Animate) => o.animate = value != 0,
            None => log::warn!("Unknown option id {}", id),
        }
    }

    /// OK in the control menu saves the mapping; in the system menu it runs
    /// the selected action.
    pub fn menu_ok(&mut self) {
        match self.tab {
            Tab::Control => {
                let msg = match self.active_config.save(&self.paths.button_config_file) {
                    Ok(()) => MSG_CHANGES_SAVED,
                    Err(e) => {
                        log::error!("Failed to save button config: {}", e);
                        MSG_CHANGES_NOT_SAVED
                    }
                };
                self.alert(msg);
            }
            Tab::System => {
                let id = self.system_menu.selected_item().map(|i| i.id);
                match id.and_then(SystemId::from_id) {
                    Some(SystemId::Reset) => self.confirm(MSG_RESET, PendingAction::Reset),
                    Some(SystemId::Screenshot) => {
                        let msg = match self.save_game_screenshot() {
                            Ok(path) => {
                                log::info!("Saved game screenshot {}", path.display());
                                MSG_SCREENSHOT_SAVED
                            }
                            Err(e) => {
                                log::error!("Failed to save game screenshot: {}", e);
                                MSG_SCREENSHOT_NOT_SAVED
                            }
                        };
                        self.alert(msg);
                    }
                    None => {}
                }
            }
            _ => {}
        }
    }

    /// Current frame to `<screenshot dir>/<game file name>-NN.png`.
    pub fn save_game_screenshot(&self) -> Result<PathBuf> {
        let game = self.game.as_deref().ok_or(FrontendError::NoGame)?;
        let frame = self.core.frame().ok_or(FrontendError::NoFrame)?;
        screenshot::save_sequential(&frame.to_rgb_image(), &self.paths.screenshot_dir, &game_file_name(game))
    }

    /// Triangle in the control menu restores the default mapping.
    pub fn menu_button_press(&mut self, held: Buttons) {
        if self.tab == Tab::Control && held.contains(Buttons::TRIANGLE) {
            self.active_config = ButtonConfig::default();
            self.sync_control_menu();
            return;
        }
        self.generic_button_press(held);
    }

    /// Push the options out to the platform and the core before emulation
    /// resumes.
    pub fn apply_options(&mut self) {
        self.platform.set_clock_frequency(self.options.clock_freq);
        self.platform.set_vblank_wait(self.options.vsync);
        self.limiter = FrameLimiter::new(self.options.update_freq, self.platform.tick_resolution());
        self.core.apply_settings(&CoreSettings::from(&self.options));
        self.skipped = 0;
    }

    /// Emulate one frame with the given input. Returns whether the frame
    /// should be shown; the special "open menu" mapping drops back to the
    /// menu instead.
    pub fn run_frame(&mut self, held: Buttons, analog: Analog) -> Step {
        if !self.resume {
            return Step::InMenu;
        }
        let input = self.active_config.resolve(held, analog);
        if input.open_menu {
            self.enter_menu();
            return Step::InMenu;
        }

        self.core.set_input(input);
        self.core.run();
        let now = self.platform.current_tick();
        self.fps.frame(now, self.platform.tick_resolution());
        self.limiter.wait(&mut self.platform);

        if self.skipped < self.options.frameskip {
            self.skipped += 1;
            Step::Skipped
        } else {
            self.skipped = 0;
            Step::Presented
        }
    }

    /// Persist options and release the game.
    pub fn shutdown(&mut self) {
        if let Err(e) = self.options.save(&self.paths.options_file) {
            log::error!("Failed to save options: {}", e);
        }
        self.core.unload_game();
        self.game = None;
        self.resume = false;
    }
}

#[cfg(test)]
#[path = "tests/frontend_tests.rs"]
mod tests;
