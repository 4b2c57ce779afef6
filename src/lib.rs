//! Menu front-end for a libretro SNES core on a handheld: tabbed menu state,
//! options and button-map persistence, and save states stored as a PNG
//! screenshot followed by the core's serialized state.

pub mod browser;
pub mod buttons;
pub mod config;
pub mod core;
pub mod error;
pub mod frontend;
pub mod libretro;
pub mod menu;
pub mod options;
pub mod paths;
pub mod platform;
pub mod savestate;
pub mod screenshot;
pub mod style;
pub mod tabs;

pub use error::{FrontendError, Result};

#[cfg(test)]
#[path = "tests/mock.rs"]
pub(crate) mod mock;
