//! Physical buttons, the persisted button map, and input resolution.

use std::ops::{Index, IndexMut};
use std::path::Path;

use crate::config::write_atomic;
use crate::error::{FrontendError, Result};

bitflags::bitflags! {
    /// Bit mask of physical console buttons.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Buttons: u32 {
        const SELECT = 0x0001;
        const START = 0x0008;
        const UP = 0x0010;
        const RIGHT = 0x0020;
        const DOWN = 0x0040;
        const LEFT = 0x0080;
        const LTRIGGER = 0x0100;
        const RTRIGGER = 0x0200;
        const TRIANGLE = 0x1000;
        const CIRCLE = 0x2000;
        const CROSS = 0x4000;
        const SQUARE = 0x8000;
    }
}

/// Analog stick deflection, centred on zero (-128..=127 per axis).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Analog {
    pub x: i16,
    pub y: i16,
}

pub const ANALOG_THRESHOLD: i16 = 48;

/// SNES joypad buttons, numbered with the libretro joypad ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoypadButton {
    B,
    Y,
    Select,
    Start,
    Up,
    Down,
    Left,
    Right,
    A,
    X,
    L,
    R,
}

impl JoypadButton {
    pub const ALL: [JoypadButton; 12] = [
        JoypadButton::B,
        JoypadButton::Y,
        JoypadButton::Select,
        JoypadButton::Start,
        JoypadButton::Up,
        JoypadButton::Down,
        JoypadButton::Left,
        JoypadButton::Right,
        JoypadButton::A,
        JoypadButton::X,
        JoypadButton::L,
        JoypadButton::R,
    ];

    pub fn id(self) -> u32 {
        self as u32
    }

    pub fn from_id(id: u32) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }
}

const SPECIAL_UNMAPPED: u32 = 0x4000_0000;
const SPECIAL_MENU: u32 = 0x4000_0001;

/// What a map slot drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapTarget {
    Unmapped,
    /// Leave emulation and open the menu
    Menu,
    Joypad(JoypadButton),
}

impl MapTarget {
    pub fn value(self) -> u32 {
        match self {
            MapTarget::Unmapped => SPECIAL_UNMAPPED,
            MapTarget::Menu => SPECIAL_MENU,
            MapTarget::Joypad(b) => b.id(),
        }
    }

    pub fn from_value(v: u32) -> Option<Self> {
        match v {
            SPECIAL_UNMAPPED => Some(MapTarget::Unmapped),
            SPECIAL_MENU => Some(MapTarget::Menu),
            id => JoypadButton::from_id(id).map(MapTarget::Joypad),
        }
    }
}

/// Physical inputs that can be remapped, in menu and file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapSlot {
    AnalogUp,
    AnalogDown,
    AnalogLeft,
    AnalogRight,
    Up,
    Down,
    Left,
    Right,
    Square,
    Cross,
    Circle,
    Triangle,
    LTrigger,
    RTrigger,
    Select,
    Start,
    LRTriggers,
    StartSelect,
    LRDownStart,
}

pub const MAP_SLOTS: usize = 19;

impl MapSlot {
    pub const ALL: [MapSlot; MAP_SLOTS] = [
        MapSlot::AnalogUp,
        MapSlot::AnalogDown,
        MapSlot::AnalogLeft,
        MapSlot::AnalogRight,
        MapSlot::Up,
        MapSlot::Down,
        MapSlot::Left,
        MapSlot::Right,
        MapSlot::Square,
        MapSlot::Cross,
        MapSlot::Circle,
        MapSlot::Triangle,
        MapSlot::LTrigger,
        MapSlot::RTrigger,
        MapSlot::Select,
        MapSlot::Start,
        MapSlot::LRTriggers,
        MapSlot::StartSelect,
        MapSlot::LRDownStart,
    ];

    /// Multi-button slots, most specific first.
    const COMBOS: [MapSlot; 3] = [MapSlot::LRDownStart, MapSlot::LRTriggers, MapSlot::StartSelect];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(i: usize) -> Option<Self> {
        Self::ALL.get(i).copied()
    }

    /// Buttons that must all be held; empty for analog slots, which are
    /// driven by the stick instead.
    pub fn physical(self) -> Buttons {
        match self {
            MapSlot::AnalogUp | MapSlot::AnalogDown | MapSlot::AnalogLeft | MapSlot::AnalogRight => {
                Buttons::empty()
            }
            MapSlot::Up => Buttons::UP,
            MapSlot::Down => Buttons::DOWN,
            MapSlot::Left => Buttons::LEFT,
            MapSlot::Right => Buttons::RIGHT,
            MapSlot::Square => Buttons::SQUARE,
            MapSlot::Cross => Buttons::CROSS,
            MapSlot::Circle => Buttons::CIRCLE,
            MapSlot::Triangle => Buttons::TRIANGLE,
            MapSlot::LTrigger => Buttons::LTRIGGER,
            MapSlot::RTrigger => Buttons::RTRIGGER,
            MapSlot::Select => Buttons::SELECT,
            MapSlot::Start => Buttons::START,
            MapSlot::LRTriggers => Buttons::LTRIGGER | Buttons::RTRIGGER,
            MapSlot::StartSelect => Buttons::START | Buttons::SELECT,
            MapSlot::LRDownStart => {
                Buttons::LTRIGGER | Buttons::RTRIGGER | Buttons::DOWN | Buttons::START
            }
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MapSlot::AnalogUp => "Analog Up",
            MapSlot::AnalogDown => "Analog Down",
            MapSlot::AnalogLeft => "Analog Left",
            MapSlot::AnalogRight => "Analog Right",
            MapSlot::Up => "D-pad Up",
            MapSlot::Down => "D-pad Down",
            MapSlot::Left => "D-pad Left",
            MapSlot::Right => "D-pad Right",
            MapSlot::Square => "Square",
            MapSlot::Cross => "Cross",
            MapSlot::Circle => "Circle",
            MapSlot::Triangle => "Triangle",
            MapSlot::LTrigger => "L Trigger",
            MapSlot::RTrigger => "R Trigger",
            MapSlot::Select => "Select",
            MapSlot::Start => "Start",
            MapSlot::LRTriggers => "L+R",
            MapSlot::StartSelect => "Start+Select",
            MapSlot::LRDownStart => "L+R+Down+Start",
        }
    }
}

/// Joypad state handed to the core for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolvedInput {
    /// One bit per libretro joypad id
    pub joypad: u16,
    pub open_menu: bool,
    pub analog: Analog,
}

impl ResolvedInput {
    pub fn is_pressed(&self, button: JoypadButton) -> bool {
        self.joypad & (1 << button.id()) != 0
    }

    fn apply(&mut self, target: MapTarget) {
        match target {
            MapTarget::Unmapped => {}
            MapTarget::Menu => self.open_menu = true,
            MapTarget::Joypad(b) => self.joypad |= 1 << b.id(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonConfig {
    map: [MapTarget; MAP_SLOTS],
}

impl Default for ButtonConfig {
    fn default() -> Self {
        use JoypadButton as J;
        use MapTarget::Joypad;
        ButtonConfig {
            map: [
                Joypad(J::Up),
                Joypad(J::Down),
                Joypad(J::Left),
                Joypad(J::Right),
                Joypad(J::Up),
                Joypad(J::Down),
                Joypad(J::Left),
                Joypad(J::Right),
                Joypad(J::Y),
                Joypad(J::B),
                Joypad(J::A),
                Joypad(J::X),
                Joypad(J::L),
                Joypad(J::R),
                Joypad(J::Select),
                Joypad(J::Start),
                MapTarget::Menu,
                MapTarget::Unmapped,
                MapTarget::Unmapped,
            ],
        }
    }
}

impl Index<MapSlot> for ButtonConfig {
    type Output = MapTarget;

    fn index(&self, slot: MapSlot) -> &MapTarget {
        &self.map[slot.index()]
    }
}

impl IndexMut<MapSlot> for ButtonConfig {
    fn index_mut(&mut self, slot: MapSlot) -> &mut MapTarget {
        &mut self.map[slot.index()]
    }
}

impl ButtonConfig {
    pub fn targets(&self) -> &[MapTarget; MAP_SLOTS] {
        &self.map
    }

    /// Decode `buttons.cnf` contents: one little-endian u32 per slot. Slots
    /// past the end of the data, or holding unknown values, keep defaults.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut cfg = ButtonConfig::default();
        for (i, chunk) in bytes.chunks_exact(4).take(MAP_SLOTS).enumerate() {
            let raw = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            match MapTarget::from_value(raw) {
                Some(target) => cfg.map[i] = target,
                None => log::warn!("Ignoring unknown mapping {:#x} in slot {}", raw, i),
            }
        }
        cfg
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.map
            .iter()
            .flat_map(|t| t.value().to_le_bytes())
            .collect()
    }

    /// Load the button map. A missing file yields the defaults; an empty one
    /// is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = match std::fs::read(path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No button config at {}, using defaults", path.display());
                return Ok(ButtonConfig::default());
            }
            Err(e) => return Err(e.into()),
        };
        if bytes.len() < 4 {
            return Err(FrontendError::EmptyButtonConfig(path.to_path_buf()));
        }
        Ok(Self::from_bytes(&bytes))
    }

    /// `load`, falling back to the defaults on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            log::warn!("Failed to load button config: {}", e);
            ButtonConfig::default()
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        write_atomic(path, &self.to_bytes())?;
        log::info!("Saved button config to {}", path.display());
        Ok(())
    }

    /// Translate held physical buttons and stick position into joypad state.
    /// A fully held combo whose slot is mapped consumes its buttons, so they
    /// do not also fire their single-button mappings.
    pub fn resolve(&self, pressed: Buttons, analog: Analog) -> ResolvedInput {
        let mut pressed = pressed;
        let mut out = ResolvedInput {
            analog,
            ..ResolvedInput::default()
        };

        for slot in MapSlot::COMBOS {
            let combo = slot.physical();
            let target = self[slot];
            if pressed.contains(combo) && target != MapTarget::Unmapped {
                out.apply(target);
                pressed.remove(combo);
            }
        }

        for slot in &MapSlot::ALL[MapSlot::Up.index()..=MapSlot::Start.index()] {
            if pressed.contains(slot.physical()) {
                out.apply(self[*slot]);
            }
        }

        if analog.y < -ANALOG_THRESHOLD {
            out.apply(self[MapSlot::AnalogUp]);
        } else if analog.y > ANALOG_THRESHOLD {
            out.apply(self[MapSlot::AnalogDown]);
        }
        if analog.x < -ANALOG_THRESHOLD {
            out.apply(self[MapSlot::AnalogLeft]);
        } else if analog.x > ANALOG_THRESHOLD {
            out.apply(self[MapSlot::AnalogRight]);
        }

        out
    }
}

#[cfg(test)]
#[path = "tests/buttons_tests.rs"]
mod tests;
