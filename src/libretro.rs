//! `Core` implementation backed by a libretro shared library.
//!
//! libretro callbacks carry no user pointer, so everything they touch lives in
//! one process-wide `CallbackState`. Only one `LibretroCore` may exist at a
//! time.

use std::ffi::{c_char, c_void, CString};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use libloading::Library;

use crate::buttons::{Analog, JoypadButton, ResolvedInput};
use crate::core::{Core, CoreSettings};
use crate::error::{FrontendError, Result};
use crate::options::ControllerDevice;
use crate::screenshot::Frame;

const ENV_GET_CAN_DUPE: u32 = 3;
const ENV_GET_SYSTEM_DIRECTORY: u32 = 9;
const ENV_SET_PIXEL_FORMAT: u32 = 10;
const ENV_GET_LOG_INTERFACE: u32 = 27;
const ENV_GET_SAVE_DIRECTORY: u32 = 31;

const DEVICE_JOYPAD: u32 = 1;
const DEVICE_MOUSE: u32 = 2;

const DEVICE_ID_MOUSE_X: u32 = 0;
const DEVICE_ID_MOUSE_Y: u32 = 1;
const DEVICE_ID_MOUSE_LEFT: u32 = 2;
const DEVICE_ID_MOUSE_RIGHT: u32 = 3;

/// Largest frame a SNES core can produce (hi-res, interlaced).
const MAX_FRAME_DIM: u32 = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Rgb1555,
    Xrgb8888,
    Rgb565,
}

impl PixelFormat {
    fn from_raw(v: u32) -> Option<Self> {
        match v {
            0 => Some(PixelFormat::Rgb1555),
            1 => Some(PixelFormat::Xrgb8888),
            2 => Some(PixelFormat::Rgb565),
            _ => None,
        }
    }

    fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Xrgb8888 => 4,
            PixelFormat::Rgb565 | PixelFormat::Rgb1555 => 2,
        }
    }
}

/// Convert one core frame with row stride `pitch` to packed RGB565.
pub fn convert_frame(src: &[u8], width: u32, height: u32, pitch: usize, format: PixelFormat) -> Frame {
    let bpp = format.bytes_per_pixel();
    let mut pixels = Vec::with_capacity((width * height) as usize);
    for y in 0..height as usize {
        for x in 0..width as usize {
            let off = y * pitch + x * bpp;
            let Some(px) = src.get(off..off + bpp) else {
                pixels.push(0);
                continue;
            };
            let p = match format {
                PixelFormat::Rgb565 => u16::from_ne_bytes([px[0], px[1]]),
                PixelFormat::Rgb1555 => {
                    let p = u16::from_ne_bytes([px[0], px[1]]);
                    let r = (p >> 10) & 0x1f;
                    let g = (p >> 5) & 0x1f;
                    let b = p & 0x1f;
                    (r << 11) | (((g << 1) | (g >> 4)) << 5) | b
                }
                PixelFormat::Xrgb8888 => {
                    let p = u32::from_ne_bytes([px[0], px[1], px[2], px[3]]);
                    let r = ((p >> 19) & 0x1f) as u16;
                    let g = ((p >> 10) & 0x3f) as u16;
                    let b = ((p >> 3) & 0x1f) as u16;
                    (r << 11) | (g << 5) | b
                }
            };
            pixels.push(p);
        }
    }
    Frame::new(width, height, pixels)
}

/// Mouse reading for `id`, driven by the analog stick; A and B act as the
/// left and right mouse buttons.
pub fn mouse_state(input: &ResolvedInput, speed: u32, id: u32) -> i16 {
    let axis = |v: i16| -> i16 {
        if v.unsigned_abs() < crate::buttons::ANALOG_THRESHOLD as u16 {
            0
        } else {
            (v as i32 * speed as i32 / 32).clamp(i16::MIN as i32, i16::MAX as i32) as i16
        }
    };
    match id {
        DEVICE_ID_MOUSE_X => axis(input.analog.x),
        DEVICE_ID_MOUSE_Y => axis(input.analog.y),
        DEVICE_ID_MOUSE_LEFT => i16::from(input.is_pressed(JoypadButton::A)),
        DEVICE_ID_MOUSE_RIGHT => i16::from(input.is_pressed(JoypadButton::B)),
        _ => 0,
    }
}

struct CallbackState {
    pixel_format: PixelFormat,
    frame: Option<Frame>,
    input: ResolvedInput,
    device: ControllerDevice,
    mouse_speed: u32,
    system_dir: Option<CString>,
    save_dir: Option<CString>,
}

impl CallbackState {
    const fn new() -> Self {
        CallbackState {
            pixel_format: PixelFormat::Rgb1555,
            frame: None,
            input: ResolvedInput {
                joypad: 0,
                open_menu: false,
                analog: Analog { x: 0, y: 0 },
            },
            device: ControllerDevice::Joypad,
            mouse_speed: 1,
            system_dir: None,
            save_dir: None,
        }
    }
}

static CALLBACK_STATE: Mutex<CallbackState> = Mutex::new(CallbackState::new());

// Never panic across the FFI boundary, so a poisoned lock is taken as is.
fn callback_state() -> MutexGuard<'static, CallbackState> {
    CALLBACK_STATE.lock().unwrap_or_else(PoisonError::into_inner)
}

extern "C" fn environment(cmd: u32, data: *mut c_void) -> bool {
    if data.is_null() {
        return false;
    }
    match cmd {
        ENV_SET_PIXEL_FORMAT => {
            // SAFETY: SET_PIXEL_FORMAT passes a pointer to an enum retro_pixel_format.
            let raw = unsafe { *(data as *const u32) };
            match PixelFormat::from_raw(raw) {
                Some(fmt) => {
                    log::debug!("Core pixel format set to {:?}", fmt);
                    callback_state().pixel_format = fmt;
                    true
                }
                None => false,
            }
        }
        ENV_GET_SYSTEM_DIRECTORY | ENV_GET_SAVE_DIRECTORY => {
            let state = callback_state();
            let dir = if cmd == ENV_GET_SYSTEM_DIRECTORY {
                &state.system_dir
            } else {
                &state.save_dir
            };
            match dir {
                Some(dir) => {
                    // SAFETY: the core expects a `const char **`. The CString lives
                    // in the static state until the core is dropped.
                    unsafe { *(data as *mut *const c_char) = dir.as_ptr() };
                    true
                }
                None => false,
            }
        }
        ENV_GET_CAN_DUPE => {
            // SAFETY: GET_CAN_DUPE passes a pointer to bool.
            unsafe { *(data as *mut bool) = true };
            true
        }
        ENV_GET_LOG_INTERFACE => false,
        _ => false,
    }
}

extern "C" fn video_refresh(data: *const c_void, width: u32, height: u32, pitch: usize) {
    // a null frame is a dupe: keep showing the previous one
    if data.is_null() || width == 0 || height == 0 || width > MAX_FRAME_DIM || height > MAX_FRAME_DIM {
        return;
    }
    let mut state = callback_state();
    let format = state.pixel_format;
    // SAFETY: the core guarantees `data` is valid for `pitch * height` bytes
    // for the duration of this call.
    let src = unsafe { std::slice::from_raw_parts(data as *const u8, pitch * height as usize) };
    state.frame = Some(convert_frame(src, width, height, pitch, format));
}

extern "C" fn audio_sample(_left: i16, _right: i16) {}

extern "C" fn audio_sample_batch(_data: *const i16, frames: usize) -> usize {
    frames
}

extern "C" fn input_poll() {}

extern "C" fn input_state(port: u32, device: u32, _index: u32, id: u32) -> i16 {
    if port != 0 {
        return 0;
    }
    let state = callback_state();
    match device {
        DEVICE_JOYPAD => match JoypadButton::from_id(id) {
            Some(b) => i16::from(state.input.is_pressed(b)),
            None => 0,
        },
        DEVICE_MOUSE if state.device == ControllerDevice::Mouse => {
            mouse_state(&state.input, state.mouse_speed, id)
        }
        _ => 0,
    }
}

#[repr(C)]
struct GameInfo {
    path: *const c_char,
    data: *const c_void,
    size: usize,
    meta: *const c_char,
}

type EnvironmentFn = extern "C" fn(u32, *mut c_void) -> bool;
type VideoRefreshFn = extern "C" fn(*const c_void, u32, u32, usize);
type AudioSampleFn = extern "C" fn(i16, i16);
type AudioSampleBatchFn = extern "C" fn(*const i16, usize) -> usize;
type InputPollFn = extern "C" fn();
type InputStateFn = extern "C" fn(u32, u32, u32, u32) -> i16;

struct Api {
    init: unsafe extern "C" fn(),
    deinit: unsafe extern "C" fn(),
    set_environment: unsafe extern "C" fn(EnvironmentFn),
    set_video_refresh: unsafe extern "C" fn(VideoRefreshFn),
    set_audio_sample: unsafe extern "C" fn(AudioSampleFn),
    set_audio_sample_batch: unsafe extern "C" fn(AudioSampleBatchFn),
    set_input_poll: unsafe extern "C" fn(InputPollFn),
    set_input_state: unsafe extern "C" fn(InputStateFn),
    set_controller_port_device: unsafe extern "C" fn(u32, u32),
    load_game: unsafe extern "C" fn(*const GameInfo) -> bool,
    unload_game: unsafe extern "C" fn(),
    run: unsafe extern "C" fn(),
    reset: unsafe extern "C" fn(),
    serialize_size: unsafe extern "C" fn() -> usize,
    serialize: unsafe extern "C" fn(*mut c_void, usize) -> bool,
    unserialize: unsafe extern "C" fn(*const c_void, usize) -> bool,
}

/// # Safety
/// `T` must be the exact function pointer type of the exported symbol.
unsafe fn symbol<T: Copy>(lib: &Library, name: &str) -> Result<T> {
    let sym = lib.get::<T>(name.as_bytes())?;
    Ok(*sym)
}

impl Api {
    /// # Safety
    /// `lib` must be a libretro core.
    unsafe fn load(lib: &Library) -> Result<Self> {
        Ok(Api {
            init: symbol(lib, "retro_init")?,
            deinit: symbol(lib, "retro_deinit")?,
            set_environment: symbol(lib, "retro_set_environment")?,
            set_video_refresh: symbol(lib, "retro_set_video_refresh")?,
            set_audio_sample: symbol(lib, "retro_set_audio_sample")?,
            set_audio_sample_batch: symbol(lib, "retro_set_audio_sample_batch")?,
            set_input_poll: symbol(lib, "retro_set_input_poll")?,
            set_input_state: symbol(lib, "retro_set_input_state")?,
            set_controller_port_device: symbol(lib, "retro_set_controller_port_device")?,
            load_game: symbol(lib, "retro_load_game")?,
            unload_game: symbol(lib, "retro_unload_game")?,
            run: symbol(lib, "retro_run")?,
            reset: symbol(lib, "retro_reset")?,
            serialize_size: symbol(lib, "retro_serialize_size")?,
            serialize: symbol(lib, "retro_serialize")?,
            unserialize: symbol(lib, "retro_unserialize")?,
        })
    }
}

fn c_path(path: &Path) -> Result<CString> {
    CString::new(path.to_string_lossy().as_bytes())
        .map_err(|_| FrontendError::core(format!("Path contains NUL: {}", path.display())))
}

pub struct LibretroCore {
    api: Api,
    game: Option<(CString, Vec<u8>)>,
    path: PathBuf,
    // Dropped last so the function pointers above stay valid.
    _lib: Library,
}

impl LibretroCore {
    /// Load the core at `path` and initialise it. `system_dir` and `save_dir`
    /// are handed to the core on request.
    pub fn load(path: &Path, system_dir: &Path, save_dir: &Path) -> Result<Self> {
        {
            let mut state = callback_state();
            *state = CallbackState::new();
            state.system_dir = Some(c_path(system_dir)?);
            state.save_dir = Some(c_path(save_dir)?);
        }

        // SAFETY: loading a core runs its initialisers; the path is the one
        // the user configured as a libretro core.
        let lib = unsafe { Library::new(path)? };
        // SAFETY: the symbol types match libretro.h.
        let api = unsafe { Api::load(&lib)? };

        // SAFETY: retro_set_environment must precede retro_init; the other
        // callbacks may be set in any order before retro_run.
        unsafe {
            (api.set_environment)(environment);
            (api.init)();
            (api.set_video_refresh)(video_refresh);
            (api.set_audio_sample)(audio_sample);
            (api.set_audio_sample_batch)(audio_sample_batch);
            (api.set_input_poll)(input_poll);
            (api.set_input_state)(input_state);
        }
        log::info!("Loaded libretro core {}", path.display());

        Ok(LibretroCore {
            api,
            game: None,
            path: path.to_path_buf(),
            _lib: lib,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Core for LibretroCore {
    fn load_game(&mut self, path: &Path) -> Result<()> {
        self.unload_game();

        let data = std::fs::read(path)?;
        let rom_path = c_path(path)?;
        let info = GameInfo {
            path: rom_path.as_ptr(),
            data: data.as_ptr() as *const c_void,
            size: data.len(),
            meta: std::ptr::null(),
        };
        // SAFETY: `info` and the buffers it points to stay alive for the call;
        // both buffers are kept in `self.game` for cores that hold on to them.
        let ok = unsafe { (self.api.load_game)(&info) };
        if !ok {
            return Err(FrontendError::core(format!("Core rejected {}", path.display())));
        }
        callback_state().frame = None;
        self.game = Some((rom_path, data));
        log::info!("Loaded game {}", path.display());
        Ok(())
    }

    fn unload_game(&mut self) {
        if self.game.take().is_some() {
            // SAFETY: a game is loaded.
            unsafe { (self.api.unload_game)() };
        }
    }

    fn run(&mut self) {
        if self.game.is_some() {
            // SAFETY: a game is loaded and every callback is installed.
            unsafe { (self.api.run)() };
        }
    }

    fn reset(&mut self) {
        if self.game.is_some() {
            // SAFETY: a game is loaded.
            unsafe { (self.api.reset)() };
        }
    }

    fn serialize_size(&self) -> usize {
        // SAFETY: plain query on an initialised core.
        unsafe { (self.api.serialize_size)() }
    }

    fn serialize(&mut self, buf: &mut [u8]) -> bool {
        // SAFETY: `buf` is valid for writes of `buf.len()` bytes.
        unsafe { (self.api.serialize)(buf.as_mut_ptr() as *mut c_void, buf.len()) }
    }

    fn unserialize(&mut self, buf: &[u8]) -> bool {
        // SAFETY: `buf` is valid for reads of `buf.len()` bytes.
        unsafe { (self.api.unserialize)(buf.as_ptr() as *const c_void, buf.len()) }
    }

    fn apply_settings(&mut self, settings: &CoreSettings) {
        {
            let mut state = callback_state();
            state.device = settings.controller_device;
            state.mouse_speed = settings.mouse_speed;
        }
        let device = match settings.controller_device {
            ControllerDevice::Joypad => DEVICE_JOYPAD,
            ControllerDevice::Mouse => DEVICE_MOUSE,
        };
        // SAFETY: port 0 exists on every SNES core.
        unsafe { (self.api.set_controller_port_device)(0, device) };
        if !settings.emulate_sound {
            log::debug!("Sound emulation off; audio samples are discarded");
        }
    }

    fn set_input(&mut self, input: ResolvedInput) {
        callback_state().input = input;
    }

    fn frame(&self) -> Option<Frame> {
        callback_state().frame.clone()
    }
}

impl Drop for LibretroCore {
    fn drop(&mut self) {
        self.unload_game();
        // SAFETY: the core was initialised in `load`.
        unsafe { (self.api.deinit)() };
        *callback_state() = CallbackState::new();
    }
}
