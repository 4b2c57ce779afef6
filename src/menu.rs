//! Menu widget state: items with selectable options, a cursor, and the
//! option/control/system menu definitions.

use crate::buttons::{JoypadButton, MapSlot, MapTarget};
use crate::options::{ControlMode, ControllerDevice, DisplayMode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuOption {
    pub label: String,
    pub value: i32,
}

impl MenuOption {
    pub fn new(label: impl Into<String>, value: i32) -> Self {
        MenuOption {
            label: label.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub id: u32,
    pub caption: String,
    pub options: Vec<MenuOption>,
    pub selected: Option<usize>,
    pub help_text: String,
    /// Section headers are drawn but never selected
    pub header: bool,
}

impl MenuItem {
    pub fn new(id: u32, caption: impl Into<String>, options: Vec<MenuOption>, help_text: impl Into<String>) -> Self {
        let selected = if options.is_empty() { None } else { Some(0) };
        MenuItem {
            id,
            caption: caption.into(),
            options,
            selected,
            help_text: help_text.into(),
            header: false,
        }
    }

    pub fn header(caption: impl Into<String>) -> Self {
        MenuItem {
            id: u32::MAX,
            caption: caption.into(),
            options: Vec::new(),
            selected: None,
            help_text: String::new(),
            header: true,
        }
    }

    pub fn selected_option(&self) -> Option<&MenuOption> {
        self.selected.and_then(|i| self.options.get(i))
    }

    /// Select the option carrying `value`. Returns false, leaving the
    /// selection alone, when no option matches.
    pub fn select_option_by_value(&mut self, value: i32) -> bool {
        match self.options.iter().position(|o| o.value == value) {
            Some(i) => {
                self.selected = Some(i);
                true
            }
            None => false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Menu {
    pub items: Vec<MenuItem>,
    pub cursor: usize,
}

impl Menu {
    pub fn new(items: Vec<MenuItem>) -> Self {
        let cursor = items.iter().position(|i| !i.header).unwrap_or(0);
        Menu { items, cursor }
    }

    pub fn find_item_by_id(&self, id: u32) -> Option<&MenuItem> {
        self.items.iter().find(|i| !i.header && i.id == id)
    }

    pub fn find_item_by_id_mut(&mut self, id: u32) -> Option<&mut MenuItem> {
        self.items.iter_mut().find(|i| !i.header && i.id == id)
    }

    pub fn select_option_by_value(&mut self, id: u32, value: i32) -> bool {
        self.find_item_by_id_mut(id)
            .map(|item| item.select_option_by_value(value))
            .unwrap_or(false)
    }

    pub fn selected_item(&self) -> Option<&MenuItem> {
        self.items.get(self.cursor).filter(|i| !i.header)
    }

    pub fn move_cursor(&mut self, delta: i32) {
        let len = self.items.len() as i32;
        let mut pos = self.cursor as i32;
        loop {
            let next = pos + delta;
            if next < 0 || next >= len {
                return;
            }
            pos = next;
            if !self.items[pos as usize].header {
                self.cursor = pos as usize;
                return;
            }
        }
    }

    /// Step the selected item's option by `delta`, clamped to its list.
    /// Returns the item id and newly selected value when it changed.
    pub fn cycle_option(&mut self, delta: i32) -> Option<(u32, i32)> {
        let item = self.items.get_mut(self.cursor).filter(|i| !i.header)?;
        let current = item.selected? as i32;
        let next = (current + delta).clamp(0, item.options.len() as i32 - 1) as usize;
        if next == current as usize {
            return None;
        }
        item.selected = Some(next);
        Some((item.id, item.options[next].value))
    }
}

/// Ids of the items in the options menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionId {
    DisplayMode,
    TextureFilter,
    EmulateSound,
    ControllerDevice,
    MouseSensitivity,
    SyncFreq,
    Frameskip,
    VSync,
    ClockFreq,
    ShowFps,
    ControlMode,
    Animate,
}

impl OptionId {
    const ALL: [OptionId; 12] = [
        OptionId::DisplayMode,
        OptionId::TextureFilter,
        OptionId::EmulateSound,
        OptionId::ControllerDevice,
        OptionId::MouseSensitivity,
        OptionId::SyncFreq,
        OptionId::Frameskip,
        OptionId::VSync,
        OptionId::ClockFreq,
        OptionId::ShowFps,
        OptionId::ControlMode,
        OptionId::Animate,
    ];

    pub fn id(self) -> u32 {
        self as u32
    }

    pub fn from_id(id: u32) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }
}

/// Ids of the items in the system menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemId {
    Reset,
    Screenshot,
}

impl SystemId {
    pub fn id(self) -> u32 {
        self as u32
    }

    pub fn from_id(id: u32) -> Option<Self> {
        match id {
            0 => Some(SystemId::Reset),
            1 => Some(SystemId::Screenshot),
            _ => None,
        }
    }
}

fn opts(list: &[(&str, i32)]) -> Vec<MenuOption> {
    list.iter().map(|(l, v)| MenuOption::new(*l, *v)).collect()
}

fn toggle() -> Vec<MenuOption> {
    opts(&[("Disabled", 0), ("Enabled", 1)])
}

pub fn options_menu() -> Menu {
    let item = |id: OptionId, caption: &str, options: Vec<MenuOption>, help: &str| {
        MenuItem::new(id.id(), caption, options, help)
    };
    Menu::new(vec![
        MenuItem::header("Video"),
        item(
            OptionId::DisplayMode,
            "Screen size",
            opts(&[
                ("Actual size", DisplayMode::Unscaled.value()),
                ("4:3 scaled (2x)", DisplayMode::Scaled2x.value()),
                ("4:3 scaled (fit height)", DisplayMode::FitHeight.value()),
                ("16:9 scaled (fit screen)", DisplayMode::FillScreen.value()),
            ]),
            "Left/Right: Change screen size",
        ),
        item(
            OptionId::TextureFilter,
            "Screen smoothing",
            toggle(),
            "Left/Right: Enable/disable screen smoothing",
        ),
        MenuItem::header("Audio"),
        item(OptionId::EmulateSound, "Enable sound", toggle(), "Left/Right: Enable/disable sound"),
        MenuItem::header("Control device"),
        item(
            OptionId::ControllerDevice,
            "Device",
            opts(&[
                ("SNES Joypad", ControllerDevice::Joypad.value()),
                ("SNES Mouse", ControllerDevice::Mouse.value()),
            ]),
            "Left/Right: Change the device plugged into the controller port",
        ),
        item(
            OptionId::MouseSensitivity,
            "Mouse speed",
            (1..=10).map(|v| MenuOption::new(v.to_string(), v)).collect(),
            "Left/Right: Adjust the speed of the SNES mouse",
        ),
        MenuItem::header("Performance"),
        item(
            OptionId::SyncFreq,
            "Frame limiter",
            opts(&[("Disabled", 0), ("50 fps (PAL)", 50), ("60 fps (NTSC)", 60)]),
            "Left/Right: Change screen update frequency",
        ),
        item(
            OptionId::Frameskip,
            "Frame skipping",
            std::iter::once(MenuOption::new("No skipping", 0))
                .chain((1..=6).map(|n| {
                    let label = if n == 1 {
                        "Skip 1 frame".to_string()
                    } else {
                        format!("Skip {} frames", n)
                    };
                    MenuOption::new(label, n)
                }))
                .collect(),
            "Left/Right: Change number of frames skipped per update",
        ),
        item(
            OptionId::VSync,
            "VSync",
            toggle(),
            "Left/Right: Enable to reduce tearing; disable to increase speed",
        ),
        item(
            OptionId::ClockFreq,
            "CPU clock frequency",
            opts(&[("333 MHz", 333), ("444 MHz", 444)]),
            "Left/Right: Larger values: faster emulation, faster battery depletion (default: 444MHz)",
        ),
        item(
            OptionId::ShowFps,
            "Show FPS counter",
            toggle(),
            "Left/Right: Show/hide the frames-per-second counter",
        ),
        MenuItem::header("Menu"),
        item(
            OptionId::ControlMode,
            "Button mode",
            opts(&[
                ("Circle cancels, Cross confirms (US)", ControlMode::Us.value()),
                ("Cross cancels, Circle confirms (Japan)", ControlMode::Japan.value()),
            ]),
            "Left/Right: Change OK and Cancel button mapping",
        ),
        item(
            OptionId::Animate,
            "Animate",
            toggle(),
            "Left/Right: Enable/disable in-menu animations",
        ),
    ])
}

pub const CONTROL_HELP: &str = "Left/Right: Change mapping\tOK: Save\tTriangle: Load defaults";

pub fn map_target_options() -> Vec<MenuOption> {
    let mut list = vec![
        MenuOption::new("None", MapTarget::Unmapped.value() as i32),
        MenuOption::new("Special: Open Menu", MapTarget::Menu.value() as i32),
    ];
    let buttons = [
        ("Up", JoypadButton::Up),
        ("Down", JoypadButton::Down),
        ("Left", JoypadButton::Left),
        ("Right", JoypadButton::Right),
        ("Button A", JoypadButton::A),
        ("Button B", JoypadButton::B),
        ("Button X", JoypadButton::X),
        ("Button Y", JoypadButton::Y),
        ("Button L", JoypadButton::L),
        ("Button R", JoypadButton::R),
        ("Start", JoypadButton::Start),
        ("Select", JoypadButton::Select),
    ];
    list.extend(
        buttons
            .iter()
            .map(|(l, b)| MenuOption::new(*l, MapTarget::Joypad(*b).value() as i32)),
    );
    list
}

/// One row per map slot; item ids are slot indices.
pub fn control_menu() -> Menu {
    Menu::new(
        MapSlot::ALL
            .iter()
            .map(|slot| {
                MenuItem::new(slot.index() as u32, slot.label(), map_target_options(), CONTROL_HELP)
            })
            .collect(),
    )
}

pub fn system_menu() -> Menu {
    Menu::new(vec![
        MenuItem::header("System"),
        MenuItem::new(SystemId::Reset.id(), "Reset", Vec::new(), "OK: Reset"),
        MenuItem::new(SystemId::Screenshot.id(), "Save screenshot", Vec::new(), "OK: Save screenshot"),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_skips_headers() {
        let mut menu = options_menu();
        assert_eq!(menu.selected_item().unwrap().id, OptionId::DisplayMode.id());
        menu.move_cursor(1);
        assert_eq!(menu.selected_item().unwrap().id, OptionId::TextureFilter.id());
        menu.move_cursor(1);
        assert_eq!(menu.selected_item().unwrap().id, OptionId::EmulateSound.id());
        menu.move_cursor(-1);
        menu.move_cursor(-1);
        // no selectable item above the first
        menu.move_cursor(-1);
        assert_eq!(menu.selected_item().unwrap().id, OptionId::DisplayMode.id());
    }

    #[test]
    fn test_cycle_option_clamps() {
        let mut menu = options_menu();
        assert!(menu.select_option_by_value(OptionId::DisplayMode.id(), 3));
        assert_eq!(menu.cycle_option(1), None);
        assert_eq!(
            menu.cycle_option(-1),
            Some((OptionId::DisplayMode.id(), DisplayMode::FitHeight.value()))
        );
    }

    #[test]
    fn test_select_unknown_value_keeps_selection() {
        let mut menu = options_menu();
        assert!(menu.select_option_by_value(OptionId::ClockFreq.id(), 444));
        assert!(!menu.select_option_by_value(OptionId::ClockFreq.id(), 500));
        let item = menu.find_item_by_id(OptionId::ClockFreq.id()).unwrap();
        assert_eq!(item.selected_option().unwrap().value, 444);
    }

    #[test]
    fn test_control_menu_has_row_per_slot() {
        let menu = control_menu();
        assert_eq!(menu.items.len(), MapSlot::ALL.len());
        let last = menu.items.last().unwrap();
        assert_eq!(last.caption, "L+R+Down+Start");
        assert_eq!(last.options.len(), 14);
    }

    #[test]
    fn test_option_ids_round_trip() {
        for id in OptionId::ALL {
            assert_eq!(OptionId::from_id(id.id()), Some(id));
        }
        assert_eq!(SystemId::from_id(1), Some(SystemId::Screenshot));
    }

    #[test]
    fn test_frameskip_labels() {
        let menu = options_menu();
        let item = menu.find_item_by_id(OptionId::Frameskip.id()).unwrap();
        let labels: Vec<&str> = item.options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels[0], "No skipping");
        assert_eq!(labels[1], "Skip 1 frame");
        assert_eq!(labels[6], "Skip 6 frames");
    }
}
