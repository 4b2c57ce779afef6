use sdl2::controller::{Axis, Button as CButton};
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::Texture;
use sdl2::ttf::Sdl2TtfContext;
use sdl2::video::{FullscreenType, SwapInterval};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use snes_handheld_frontend::buttons::{Analog, Buttons};
use snes_handheld_frontend::config::{load_config, user_config_path, write_config};
use snes_handheld_frontend::core::Core;
use snes_handheld_frontend::frontend::{Frontend, Step};
use snes_handheld_frontend::libretro::LibretroCore;
use snes_handheld_frontend::paths::AppPaths;
use snes_handheld_frontend::platform::StdPlatform;
use snes_handheld_frontend::style::load_style;

mod ui;

const WINDOW_W: u32 = 960;
const WINDOW_H: u32 = 544;

fn key_button(key: Keycode) -> Option<Buttons> {
    Some(match key {
        Keycode::Up => Buttons::UP,
        Keycode::Down => Buttons::DOWN,
        Keycode::Left => Buttons::LEFT,
        Keycode::Right => Buttons::RIGHT,
        Keycode::Z => Buttons::CROSS,
        Keycode::X => Buttons::CIRCLE,
        Keycode::A => Buttons::SQUARE,
        Keycode::S => Buttons::TRIANGLE,
        Keycode::Q => Buttons::LTRIGGER,
        Keycode::W => Buttons::RTRIGGER,
        Keycode::Return => Buttons::START,
        Keycode::Backspace | Keycode::RShift => Buttons::SELECT,
        _ => return None,
    })
}

// face buttons by position: bottom, right, left, top
fn controller_button(button: CButton) -> Option<Buttons> {
    Some(match button {
        CButton::DPadUp => Buttons::UP,
        CButton::DPadDown => Buttons::DOWN,
        CButton::DPadLeft => Buttons::LEFT,
        CButton::DPadRight => Buttons::RIGHT,
        CButton::A => Buttons::CROSS,
        CButton::B => Buttons::CIRCLE,
        CButton::X => Buttons::SQUARE,
        CButton::Y => Buttons::TRIANGLE,
        CButton::LeftShoulder => Buttons::LTRIGGER,
        CButton::RightShoulder => Buttons::RTRIGGER,
        CButton::Start => Buttons::START,
        CButton::Back => Buttons::SELECT,
        _ => return None,
    })
}

/// SDL axes span the full i16 range; the core expects -128..=127.
fn scale_axis(value: i16) -> i16 {
    value / 256
}

fn find_font(configured: Option<String>) -> Option<String> {
    configured.or_else(|| env::var("FONT_PATH").ok()).or_else(|| {
        let candidates = [
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        ];
        candidates.iter().find(|p| Path::new(p).exists()).map(|s| s.to_string())
    })
}

fn main() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut config = load_config();
    let style = load_style();

    // optional first argument overrides the ROM directory
    let rom_dir = env::args().nth(1).map(PathBuf::from).unwrap_or_else(|| config.rom_dir());

    let core_path = match config.core_path.clone() {
        Some(p) => PathBuf::from(p),
        None => {
            return Err(format!(
                "No core configured. Set core_path in {}",
                user_config_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "config.toml".to_string())
            ))
        }
    };

    let paths = AppPaths::new(config.app_dir());
    paths.ensure_dirs().map_err(|e| e.to_string())?;
    let core = LibretroCore::load(&core_path, &paths.app_dir, &paths.save_state_dir).map_err(|e| e.to_string())?;
    log::info!("Loaded core {}", core.path().display());

    let sdl_ctx = sdl2::init()?;
    let video = sdl_ctx.video()?;
    let controller_subsystem = sdl_ctx.game_controller()?;

    let mut is_fullscreen = config.fullscreen.unwrap_or(false);
    let (w, h) = if is_fullscreen {
        let mode = video.desktop_display_mode(0)?;
        (mode.w as u32, mode.h as u32)
    } else {
        (WINDOW_W, WINDOW_H)
    };

    let mut builder = video.window(env!("CARGO_PKG_NAME"), w, h);
    builder.position_centered();
    if is_fullscreen {
        builder.fullscreen_desktop();
    }
    let window = builder.build().map_err(|e| e.to_string())?;
    let mut canvas = window.into_canvas().accelerated().build().map_err(|e| e.to_string())?;

    let ttf_ctx: Sdl2TtfContext = sdl2::ttf::init().map_err(|e| e.to_string())?;
    let font_path = match find_font(config.font_path.clone()) {
        Some(p) => p,
        None => return Err("No TTF font found. Set font_path in config or install DejaVu/FreeSans or set FONT_PATH.".into()),
    };
    let font = ttf_ctx.load_font(font_path, style.font_size).map_err(|e| e.to_string())?;

    // opened controllers must stay alive to keep delivering events
    let mut controllers: Vec<sdl2::controller::GameController> = Vec::new();
    for id in 0..sdl_ctx.joystick()?.num_joysticks()? {
        if controller_subsystem.is_game_controller(id) {
            match controller_subsystem.open(id) {
                Ok(gc) => {
                    log::info!("Opened controller: {}", gc.name());
                    controllers.push(gc);
                }
                Err(e) => log::warn!("Failed opening controller {}: {}", id, e),
            }
        }
    }

    let texture_creator = canvas.texture_creator();
    let background = ui::load_background(&texture_creator, &paths.background);
    let mut game_tex: Option<(u32, u32, bool, Texture)> = None;
    let mut icons = ui::IconCache::default();

    let mut frontend = Frontend::new(paths, &rom_dir, core, StdPlatform::new());
    frontend.gallery_per_row = style.gallery_icons_per_row;
    frontend.enter_menu();

    let mut event_pump = sdl_ctx.event_pump()?;
    let mut held = Buttons::empty();
    let mut analog = Analog::default();
    let mut vsync: Option<bool> = None;
    let menu_delay = Duration::from_millis(1000 / u64::from(style.menu_fps.max(1)));

    'running: loop {
        let mut pressed = Buttons::empty();
        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => break 'running,
                Event::KeyDown { keycode: Some(Keycode::F11), repeat: false, .. } => {
                    is_fullscreen = !is_fullscreen;
                    let mode = if is_fullscreen { FullscreenType::Desktop } else { FullscreenType::Off };
                    let _ = canvas.window_mut().set_fullscreen(mode);
                    config.fullscreen = Some(is_fullscreen);
                    if let Err(e) = write_config(&config) {
                        log::warn!("Failed to save config: {}", e);
                    }
                }
                Event::KeyDown { keycode: Some(Keycode::Escape), repeat: false, .. } => {
                    if frontend.is_emulating() {
                        frontend.enter_menu();
                    }
                }
                Event::KeyDown { keycode: Some(key), .. } => {
                    if let Some(b) = key_button(key) {
                        held |= b;
                        pressed |= b;
                    }
                }
                Event::KeyUp { keycode: Some(key), .. } => {
                    if let Some(b) = key_button(key) {
                        held.remove(b);
                    }
                }
                Event::ControllerButtonDown { button, .. } => {
                    if let Some(b) = controller_button(button) {
                        held |= b;
                        pressed |= b;
                    }
                }
                Event::ControllerButtonUp { button, .. } => {
                    if let Some(b) = controller_button(button) {
                        held.remove(b);
                    }
                }
                Event::ControllerAxisMotion { axis: Axis::LeftX, value, .. } => analog.x = scale_axis(value),
                Event::ControllerAxisMotion { axis: Axis::LeftY, value, .. } => analog.y = scale_axis(value),
                Event::ControllerDeviceAdded { which, .. } => match controller_subsystem.open(which) {
                    Ok(gc) => {
                        log::info!("Opened controller: {}", gc.name());
                        controllers.push(gc);
                    }
                    Err(e) => log::warn!("Failed opening controller {}: {}", which, e),
                },
                _ => {}
            }
        }

        let (w, h) = canvas.output_size()?;

        if frontend.is_emulating() {
            icons.clear();
            let wait = frontend.platform().vblank_wait();
            if vsync != Some(wait) {
                let interval = if wait { SwapInterval::VSync } else { SwapInterval::Immediate };
                if let Err(e) = video.gl_set_swap_interval(interval) {
                    log::debug!("Swap interval not applied: {}", e);
                }
                vsync = Some(wait);
            }

            if frontend.run_frame(held, analog) == Step::Presented {
                if let Some(frame) = frontend.core().frame() {
                    if let Err(e) = ui::upload_frame(&texture_creator, &mut game_tex, &frame, frontend.options.texture_filter) {
                        log::warn!("Failed to upload frame: {}", e);
                    }
                }
                let fps = frontend.options.show_fps.then(|| frontend.fps());
                ui::render_game(
                    &mut canvas,
                    &texture_creator,
                    &font,
                    game_tex.as_ref().map(|(_, _, _, t)| t),
                    frontend.options.display_mode,
                    fps,
                    w,
                    h,
                );
                canvas.present();
            }
            continue;
        }

        if !pressed.is_empty() && !frontend.has_pending_work() {
            frontend.handle_press(pressed, held);
        }

        ui::render_menu(
            &mut canvas,
            &texture_creator,
            &font,
            &style,
            &frontend,
            &mut icons,
            background.as_ref(),
            game_tex.as_ref().map(|(_, _, _, t)| t),
            w,
            h,
        );

        if frontend.take_ui_capture_request() {
            match canvas.read_pixels(None, PixelFormatEnum::RGB24) {
                Ok(pixels) => match image::RgbImage::from_raw(w, h, pixels) {
                    Some(img) => frontend.save_ui_screenshot(&img),
                    None => log::warn!("Screen capture has unexpected size"),
                },
                Err(e) => log::warn!("Failed to read screen: {}", e),
            }
        }
        canvas.present();

        if frontend.has_pending_work() {
            // the flash message is on screen now
            frontend.run_pending();
            continue;
        }
        std::thread::sleep(menu_delay);
    }

    frontend.shutdown();
    Ok(())
}
