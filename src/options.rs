//! Emulator options and their INI persistence.

use std::path::Path;

use ini::Ini;

use crate::buttons::Buttons;
use crate::config::write_atomic;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    Unscaled,
    Scaled2x,
    FitHeight,
    FillScreen,
}

impl DisplayMode {
    pub fn value(self) -> i32 {
        match self {
            DisplayMode::Unscaled => 0,
            DisplayMode::Scaled2x => 1,
            DisplayMode::FitHeight => 2,
            DisplayMode::FillScreen => 3,
        }
    }

    pub fn from_value(v: i32) -> Option<Self> {
        match v {
            0 => Some(DisplayMode::Unscaled),
            1 => Some(DisplayMode::Scaled2x),
            2 => Some(DisplayMode::FitHeight),
            3 => Some(DisplayMode::FillScreen),
            _ => None,
        }
    }

    /// Destination rectangle `(x, y, w, h)` of a `frame_w`x`frame_h` frame on
    /// a `screen_w`x`screen_h` screen. 4:3 modes never exceed the screen.
    pub fn dest_rect(self, frame_w: u32, frame_h: u32, screen_w: u32, screen_h: u32) -> (i32, i32, u32, u32) {
        let (w, h) = match self {
            DisplayMode::Unscaled => (frame_w, frame_h),
            DisplayMode::Scaled2x => {
                let h = (frame_h * 2).min(screen_h);
                (h * 4 / 3, h)
            }
            DisplayMode::FitHeight => (screen_h * 4 / 3, screen_h),
            DisplayMode::FillScreen => (screen_w, screen_h),
        };
        let w = w.min(screen_w);
        let h = h.min(screen_h);
        let x = (screen_w as i32 - w as i32) / 2;
        let y = (screen_h as i32 - h as i32) / 2;
        (x, y, w, h)
    }
}

/// Which face button confirms and which cancels in the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMode {
    /// Cross confirms, Circle cancels
    Us,
    /// Circle confirms, Cross cancels
    Japan,
}

impl ControlMode {
    pub fn value(self) -> i32 {
        match self {
            ControlMode::Us => 0,
            ControlMode::Japan => 1,
        }
    }

    pub fn from_value(v: i32) -> Option<Self> {
        match v {
            0 => Some(ControlMode::Us),
            1 => Some(ControlMode::Japan),
            _ => None,
        }
    }

    pub fn ok_button(self) -> Buttons {
        match self {
            ControlMode::Us => Buttons::CROSS,
            ControlMode::Japan => Buttons::CIRCLE,
        }
    }

    pub fn cancel_button(self) -> Buttons {
        match self {
            ControlMode::Us => Buttons::CIRCLE,
            ControlMode::Japan => Buttons::CROSS,
        }
    }
}

/// Device plugged into the emulated controller port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerDevice {
    Joypad,
    /// SNES mouse driven by the analog stick
    Mouse,
}

impl ControllerDevice {
    pub fn value(self) -> i32 {
        match self {
            ControllerDevice::Joypad => 1,
            ControllerDevice::Mouse => 2,
        }
    }

    pub fn from_value(v: i32) -> Option<Self> {
        match v {
            1 => Some(ControllerDevice::Joypad),
            2 => Some(ControllerDevice::Mouse),
            _ => None,
        }
    }
}

pub const UPDATE_FREQUENCIES: [u32; 3] = [0, 50, 60];
pub const CLOCK_FREQUENCIES: [u32; 2] = [333, 444];
pub const MAX_FRAMESKIP: u32 = 6;
pub const MOUSE_SPEEDS: std::ops::RangeInclusive<u32> = 1..=10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmulatorOptions {
    pub display_mode: DisplayMode,
    pub texture_filter: bool,
    /// Frame limiter target in frames per second; 0 disables the limiter.
    pub update_freq: u32,
    pub frameskip: u32,
    pub vsync: bool,
    /// CPU clock in MHz
    pub clock_freq: u32,
    pub show_fps: bool,
    pub control_mode: ControlMode,
    /// Menu transition animation. There are no transitions to animate; the
    /// value is stored so the INI file round-trips.
    pub animate: bool,
    /// Passed to the core, but audio output is not implemented and samples
    /// are always discarded; stored so the INI file round-trips.
    pub emulate_sound: bool,
    pub controller_device: ControllerDevice,
    pub mouse_speed: u32,
}

impl Default for EmulatorOptions {
    fn default() -> Self {
        EmulatorOptions {
            display_mode: DisplayMode::FitHeight,
            texture_filter: true,
            update_freq: 60,
            frameskip: 0,
            vsync: false,
            clock_freq: 444,
            show_fps: false,
            control_mode: ControlMode::Us,
            animate: true,
            emulate_sound: true,
            controller_device: ControllerDevice::Joypad,
            mouse_speed: 1,
        }
    }
}

fn get_int(conf: &Ini, section: &str, key: &str) -> Option<i32> {
    conf.get_from(Some(section), key)
        .and_then(|v| v.trim().parse::<i32>().ok())
}

fn get_bool(conf: &Ini, section: &str, key: &str, default: bool) -> bool {
    get_int(conf, section, key).map(|v| v != 0).unwrap_or(default)
}

fn get_u32_in(conf: &Ini, section: &str, key: &str, allowed: impl Fn(u32) -> bool, default: u32) -> u32 {
    get_int(conf, section, key)
        .and_then(|v| u32::try_from(v).ok())
        .filter(|v| allowed(*v))
        .unwrap_or(default)
}

impl EmulatorOptions {
    /// Read the options file. Missing files, keys, or values no menu option
    /// offers fall back to the defaults.
    pub fn load(path: &Path) -> Self {
        let conf = match Ini::load_from_file(path) {
            Ok(conf) => conf,
            Err(ini::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No options at {}, using defaults", path.display());
                Ini::new()
            }
            Err(e) => {
                log::warn!("Failed to read options at {}: {}", path.display(), e);
                Ini::new()
            }
        };
        Self::from_ini(&conf)
    }

    pub fn from_ini(conf: &Ini) -> Self {
        let d = EmulatorOptions::default();
        EmulatorOptions {
            display_mode: get_int(conf, "Video", "Display Mode")
                .and_then(DisplayMode::from_value)
                .unwrap_or(d.display_mode),
            texture_filter: get_bool(conf, "Video", "Screen smoothing", d.texture_filter),
            update_freq: get_u32_in(
                conf,
                "Video",
                "Update Frequency",
                |v| UPDATE_FREQUENCIES.contains(&v),
                d.update_freq,
            ),
            frameskip: get_u32_in(conf, "Video", "Frameskip", |v| v <= MAX_FRAMESKIP, d.frameskip),
            vsync: get_bool(conf, "Video", "VSync", d.vsync),
            clock_freq: get_u32_in(
                conf,
                "Video",
                "PSP Clock Frequency",
                |v| CLOCK_FREQUENCIES.contains(&v),
                d.clock_freq,
            ),
            show_fps: get_bool(conf, "Video", "Show FPS", d.show_fps),
            control_mode: get_int(conf, "Menu", "Control Mode")
                .and_then(ControlMode::from_value)
                .unwrap_or(d.control_mode),
            animate: get_bool(conf, "Menu", "Animate", d.animate),
            emulate_sound: get_bool(conf, "Audio", "Emulate Sound", d.emulate_sound),
            controller_device: get_int(conf, "Control", "Controller device")
                .and_then(ControllerDevice::from_value)
                .unwrap_or(d.controller_device),
            mouse_speed: get_u32_in(
                conf,
                "Control",
                "Mouse speed",
                |v| MOUSE_SPEEDS.contains(&v),
                d.mouse_speed,
            ),
        }
    }

    pub fn to_ini(&self) -> Ini {
        let flag = |b: bool| i32::from(b).to_string();
        let mut conf = Ini::new();
        conf.with_section(Some("Video"))
            .set("Display Mode", self.display_mode.value().to_string())
            .set("Screen smoothing", flag(self.texture_filter))
            .set("Update Frequency", self.update_freq.to_string())
            .set("Frameskip", self.frameskip.to_string())
            .set("VSync", flag(self.vsync))
            .set("PSP Clock Frequency", self.clock_freq.to_string())
            .set("Show FPS", flag(self.show_fps));
        conf.with_section(Some("Menu"))
            .set("Control Mode", self.control_mode.value().to_string())
            .set("Animate", flag(self.animate));
        conf.with_section(Some("Audio"))
            .set("Emulate Sound", flag(self.emulate_sound));
        conf.with_section(Some("Control"))
            .set("Controller device", self.controller_device.value().to_string())
            .set("Mouse speed", self.mouse_speed.to_string());
        conf
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let mut buf = Vec::new();
        self.to_ini().write_to(&mut buf)?;
        write_atomic(path, &buf)?;
        log::debug!("Saved options to {}", path.display());
        Ok(())
    }
}
