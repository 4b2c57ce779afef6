use std::collections::HashMap;

use sdl2::pixels::{Color, PixelFormatEnum};
use sdl2::rect::Rect;
use sdl2::render::{BlendMode, Texture, TextureCreator, WindowCanvas};
use sdl2::ttf::Font;
use sdl2::video::WindowContext;

use snes_handheld_frontend::browser::EntryKind;
use snes_handheld_frontend::core::Core;
use snes_handheld_frontend::frontend::{Dialog, Frontend};
use snes_handheld_frontend::menu::Menu;
use snes_handheld_frontend::options::DisplayMode;
use snes_handheld_frontend::platform::Platform;
use snes_handheld_frontend::savestate::{SlotGallery, SlotIcon};
use snes_handheld_frontend::screenshot::Frame;
use snes_handheld_frontend::style::{Rgba, StyleConfig};
use snes_handheld_frontend::tabs::Tab;

const SNES_WIDTH: u32 = 256;
const SNES_HEIGHT: u32 = 224;

const SPLASH_LINES: [&str; 6] = [
    "",
    "https://github.com/skogaby/CATSFC-libretro",
    " ",
    "2015 skogaby",
    "Based on CATSFC-libretro",
    "https://github.com/libretro/CATSFC-libretro",
];

pub fn color(c: Rgba) -> Color {
    Color::RGBA(c[0], c[1], c[2], c[3])
}

/// Draw `text` at (x, y); returns its width.
fn draw_text(
    canvas: &mut WindowCanvas,
    tc: &TextureCreator<WindowContext>,
    font: &Font,
    text: &str,
    x: i32,
    y: i32,
    c: Color,
) -> u32 {
    if text.is_empty() {
        return 0;
    }
    if let Ok(surface) = font.render(text).blended(c) {
        if let Ok(tex) = tc.create_texture_from_surface(&surface) {
            let q = tex.query();
            let _ = canvas.copy(&tex, None, Rect::new(x, y, q.width, q.height));
            return q.width;
        }
    }
    0
}

fn text_width(font: &Font, text: &str) -> u32 {
    font.size_of(text).map(|(w, _)| w).unwrap_or(0)
}

/// Upload an RGB565 frame, recreating the texture when its size or filter
/// changes.
pub fn upload_frame<'a>(
    tc: &'a TextureCreator<WindowContext>,
    cache: &mut Option<(u32, u32, bool, Texture<'a>)>,
    frame: &Frame,
    smooth: bool,
) -> Result<(), String> {
    let stale = match cache {
        Some((w, h, s, _)) => *w != frame.width || *h != frame.height || *s != smooth,
        None => true,
    };
    if stale {
        sdl2::hint::set("SDL_RENDER_SCALE_QUALITY", if smooth { "1" } else { "0" });
        let tex = tc
            .create_texture_streaming(PixelFormatEnum::RGB565, frame.width, frame.height)
            .map_err(|e| e.to_string())?;
        *cache = Some((frame.width, frame.height, smooth, tex));
    }
    if let Some((_, _, _, tex)) = cache {
        let bytes: Vec<u8> = frame.pixels.iter().flat_map(|p| p.to_ne_bytes()).collect();
        tex.update(None, &bytes, frame.width as usize * 2)
            .map_err(|e| e.to_string())?;
    }
    Ok(())
}

fn rgba_texture<'a>(
    tc: &'a TextureCreator<WindowContext>,
    img: &image::RgbaImage,
) -> Option<Texture<'a>> {
    // ABGR8888 is R, G, B, A in memory on little-endian targets
    let mut tex = tc
        .create_texture_static(PixelFormatEnum::ABGR8888, img.width(), img.height())
        .ok()?;
    tex.update(None, img.as_raw(), img.width() as usize * 4).ok()?;
    Some(tex)
}

pub fn load_background<'a>(
    tc: &'a TextureCreator<WindowContext>,
    path: &std::path::Path,
) -> Option<Texture<'a>> {
    if !path.exists() {
        return None;
    }
    match image::open(path) {
        Ok(img) => rgba_texture(tc, &img.into_rgba8()),
        Err(e) => {
            log::warn!("Failed to load background {}: {}", path.display(), e);
            None
        }
    }
}

/// Game frame scaled per the display mode, plus the FPS counter.
#[allow(clippy::too_many_arguments)]
pub fn render_game(
    canvas: &mut WindowCanvas,
    tc: &TextureCreator<WindowContext>,
    font: &Font,
    game_tex: Option<&Texture>,
    mode: DisplayMode,
    fps: Option<u32>,
    w: u32,
    h: u32,
) {
    canvas.set_draw_color(Color::RGB(0, 0, 0));
    canvas.clear();
    if let Some(tex) = game_tex {
        let q = tex.query();
        let (x, y, dw, dh) = mode.dest_rect(q.width, q.height, w, h);
        let _ = canvas.copy(tex, None, Rect::new(x, y, dw, dh));
    }
    if let Some(fps) = fps {
        let label = format!("{:3} fps", fps);
        let tw = text_width(font, &label) as i32;
        canvas.set_draw_color(Color::RGBA(0, 0, 0, 160));
        let _ = canvas.fill_rect(Rect::new(w as i32 - tw - 10, 0, tw as u32 + 10, font.height() as u32 + 2));
        draw_text(canvas, tc, font, &label, w as i32 - tw - 5, 1, Color::RGB(255, 255, 255));
    }
}

fn render_tabs(
    canvas: &mut WindowCanvas,
    tc: &TextureCreator<WindowContext>,
    font: &Font,
    style: &StyleConfig,
    current: Tab,
    game_loaded: bool,
) {
    let height = font.height() as u32 + 1;
    let mut x = 5;
    for tab in Tab::visible(game_loaded) {
        let width = text_width(font, tab.label()) as i32;
        if tab == current {
            canvas.set_draw_color(color(style.tab_bg));
            let _ = canvas.fill_rect(Rect::new(x - 5, 0, (width + 10) as u32, height));
        }
        draw_text(canvas, tc, font, tab.label(), x, 0, color(style.status_bar));
        x += width + 10;
    }
}

fn render_help(
    canvas: &mut WindowCanvas,
    tc: &TextureCreator<WindowContext>,
    font: &Font,
    style: &StyleConfig,
    help: &str,
    h: u32,
) {
    let y = h as i32 - font.height() - 4;
    let mut x = style.left;
    for part in help.split('\t') {
        x += draw_text(canvas, tc, font, part, x, y, color(style.status_bar)) as i32 + 24;
    }
}

/// First visible row so that `cursor` stays on screen.
fn scroll_start(cursor: usize, visible: usize) -> usize {
    if visible == 0 {
        0
    } else {
        cursor.saturating_sub(visible - 1)
    }
}

fn render_scrollbar(canvas: &mut WindowCanvas, style: &StyleConfig, start: usize, visible: usize, total: usize) {
    if total <= visible {
        return;
    }
    let x = style.right - style.scrollbar_width as i32;
    let track_h = (style.bottom - style.top) as u32;
    canvas.set_draw_color(color(style.scrollbar_bg));
    let _ = canvas.fill_rect(Rect::new(x, style.top, style.scrollbar_width, track_h));
    let thumb_h = (track_h as usize * visible / total).max(8) as u32;
    let thumb_y = style.top + (track_h as usize * start / total) as i32;
    canvas.set_draw_color(color(style.scrollbar));
    let _ = canvas.fill_rect(Rect::new(x, thumb_y, style.scrollbar_width, thumb_h));
}

fn render_browser<C: Core, P: Platform>(
    canvas: &mut WindowCanvas,
    tc: &TextureCreator<WindowContext>,
    font: &Font,
    style: &StyleConfig,
    fe: &Frontend<C, P>,
) {
    let b = &fe.browser;
    draw_text(canvas, tc, font, &b.dir.display().to_string(), style.left, style.top - font.height() - style.title_padding, color(style.title));

    let line_h = font.height() + 4;
    let visible = ((style.bottom - style.top) / line_h).max(1) as usize;
    let start = scroll_start(b.cursor, visible);
    for (i, entry) in b.entries.iter().enumerate().skip(start).take(visible) {
        let y = style.top + (i - start) as i32 * line_h;
        let mut c = match entry.kind {
            EntryKind::Parent | EntryKind::Dir => color(style.browser_directory),
            EntryKind::File => color(style.browser_file),
        };
        if i == b.cursor {
            canvas.set_draw_color(color(style.selected_bg));
            let _ = canvas.fill_rect(Rect::new(style.left, y, (style.right - style.left) as u32, line_h as u32));
            c = color(style.selected);
        }
        let name = match entry.kind {
            EntryKind::Dir => format!("{}/", entry.name),
            _ => entry.name.clone(),
        };
        draw_text(canvas, tc, font, &name, style.left + 4, y + 2, c);
    }
    render_scrollbar(canvas, style, start, visible, b.entries.len());
}

/// Slot icon textures, kept until the gallery's revision moves.
#[derive(Default)]
pub struct IconCache<'a> {
    revision: Option<u64>,
    textures: HashMap<u32, Texture<'a>>,
}

impl<'a> IconCache<'a> {
    pub fn clear(&mut self) {
        self.revision = None;
        self.textures.clear();
    }

    fn sync(&mut self, tc: &'a TextureCreator<WindowContext>, gallery: &SlotGallery) {
        if self.revision == Some(gallery.revision()) {
            return;
        }
        self.textures.clear();
        for slot in &gallery.slots {
            if let SlotIcon::Image(img) = &slot.icon {
                if let Some(tex) = rgba_texture(tc, img) {
                    self.textures.insert(slot.id, tex);
                }
            }
        }
        self.revision = Some(gallery.revision());
    }
}

fn render_gallery<'a, C: Core, P: Platform>(
    canvas: &mut WindowCanvas,
    tc: &'a TextureCreator<WindowContext>,
    font: &Font,
    style: &StyleConfig,
    fe: &Frontend<C, P>,
    icons: &mut IconCache<'a>,
) {
    icons.sync(tc, &fe.gallery);
    let g = &fe.gallery;
    draw_text(canvas, tc, font, &g.title, style.left, style.top - font.height() - style.title_padding, color(style.title));

    let per_row = fe.gallery_per_row.max(1);
    let margin = style.gallery_icon_margin;
    let icon_w = ((style.right - style.left) - margin * (per_row as i32 + 1)) / per_row as i32;
    let icon_h = icon_w * SNES_HEIGHT as i32 / SNES_WIDTH as i32;
    let cell_h = icon_h + font.height() + margin;

    for (i, slot) in g.slots.iter().enumerate() {
        let col = (i % per_row) as i32;
        let row = (i / per_row) as i32;
        let x = style.left + margin + col * (icon_w + margin);
        let y = style.top + margin + row * cell_h;
        let dst = Rect::new(x, y, icon_w.max(1) as u32, icon_h.max(1) as u32);

        let drawn = icons
            .textures
            .get(&slot.id)
            .map(|tex| canvas.copy(tex, None, dst).is_ok())
            .unwrap_or(false);
        if !drawn {
            canvas.set_draw_color(color(style.no_save_icon));
            let _ = canvas.fill_rect(dst);
        }

        let selected = i == g.cursor;
        if selected {
            canvas.set_draw_color(color(style.selected));
            let _ = canvas.draw_rect(Rect::new(x - 2, y - 2, dst.width() + 4, dst.height() + 4));
        }
        let c = if selected { color(style.selected) } else { color(style.text) };
        draw_text(canvas, tc, font, &slot.caption, x, y + icon_h + 2, c);
    }
}

fn render_menu_items(
    canvas: &mut WindowCanvas,
    tc: &TextureCreator<WindowContext>,
    font: &Font,
    style: &StyleConfig,
    menu: &Menu,
) {
    let line_h = font.height() + style.menu_item_margin / 2;
    let visible = ((style.bottom - style.top) / line_h).max(1) as usize;
    let start = scroll_start(menu.cursor, visible);
    let option_x = style.left + (style.right - style.left) / 2;

    for (i, item) in menu.items.iter().enumerate().skip(start).take(visible) {
        let y = style.top + (i - start) as i32 * line_h;
        if item.header {
            draw_text(canvas, tc, font, &item.caption, style.left, y, color(style.menu_decor));
            canvas.set_draw_color(color(style.menu_decor));
            let _ = canvas.fill_rect(Rect::new(style.left, y + font.height(), (style.right - style.left) as u32, 1));
            continue;
        }
        let selected = i == menu.cursor;
        if selected {
            canvas.set_draw_color(color(style.selected_bg));
            let _ = canvas.fill_rect(Rect::new(style.left, y, (style.right - style.left) as u32, line_h as u32));
        }
        let c = if selected { color(style.selected) } else { color(style.text) };
        draw_text(canvas, tc, font, &item.caption, style.left + 16, y + 2, c);
        if let Some(opt) = item.selected_option() {
            if selected {
                let ow = text_width(font, &opt.label);
                canvas.set_draw_color(color(style.menu_sel_option_bg));
                let _ = canvas.fill_rect(Rect::new(option_x - 4, y, ow + 8, line_h as u32));
            }
            draw_text(canvas, tc, font, &opt.label, option_x, y + 2, c);
        }
    }
    render_scrollbar(canvas, style, start, visible, menu.items.len());
}

/// Small copy of the game screen in the lower right corner.
fn render_system_preview(canvas: &mut WindowCanvas, game_tex: Option<&Texture>, w: u32, h: u32) {
    let x = w as i32 - SNES_WIDTH as i32 - 45;
    let y = h as i32 - SNES_HEIGHT as i32 - 45;
    let rect = Rect::new(x, y, SNES_WIDTH, SNES_HEIGHT);
    canvas.set_draw_color(Color::RGBA(0, 0, 0, 128));
    let _ = canvas.fill_rect(Rect::new(x + 3, y + 3, SNES_WIDTH, SNES_HEIGHT));
    if let Some(tex) = game_tex {
        let _ = canvas.copy(tex, None, rect);
    }
    canvas.set_draw_color(Color::RGB(0xcc, 0xcc, 0xcc));
    let _ = canvas.draw_rect(rect);
}

fn render_splash(
    canvas: &mut WindowCanvas,
    tc: &TextureCreator<WindowContext>,
    font: &Font,
    style: &StyleConfig,
    w: u32,
    h: u32,
) {
    let title = format!("{} version {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    let fh = font.height();
    let height = fh * (SPLASH_LINES.len() as i32 - 1);
    let mut y = h as i32 / 2 - height / 2;
    for (i, line) in SPLASH_LINES.iter().enumerate() {
        let text = if i == 0 { title.as_str() } else { *line };
        let x = w as i32 / 2 - text_width(font, text) as i32 / 2;
        draw_text(canvas, tc, font, text, x, y, color(style.text));
        y += fh;
    }
}

fn render_box(
    canvas: &mut WindowCanvas,
    tc: &TextureCreator<WindowContext>,
    font: &Font,
    style: &StyleConfig,
    lines: &[&str],
    w: u32,
    h: u32,
) {
    canvas.set_draw_color(color(style.dialog_fog));
    let _ = canvas.fill_rect(Rect::new(0, 0, w, h));

    let pad = 16;
    let fh = font.height();
    let box_w = lines.iter().map(|l| text_width(font, l)).max().unwrap_or(0) as i32 + pad * 2;
    let box_h = fh * lines.len() as i32 + pad * 2;
    let bx = (w as i32 - box_w) / 2;
    let by = (h as i32 - box_h) / 2;
    canvas.set_draw_color(color(style.menu_option_box_bg));
    let _ = canvas.fill_rect(Rect::new(bx, by, box_w as u32, box_h as u32));
    canvas.set_draw_color(color(style.menu_option_box));
    let _ = canvas.draw_rect(Rect::new(bx, by, box_w as u32, box_h as u32));
    for (i, line) in lines.iter().enumerate() {
        let x = (w as i32 - text_width(font, line) as i32) / 2;
        draw_text(canvas, tc, font, line, x, by + pad + i as i32 * fh, color(style.title));
    }
}

/// One frame of the menu: background, tab bar, the current tab's widget,
/// help line, then any flash message or dialog on top.
#[allow(clippy::too_many_arguments)]
pub fn render_menu<'a, C: Core, P: Platform>(
    canvas: &mut WindowCanvas,
    tc: &'a TextureCreator<WindowContext>,
    font: &Font,
    style: &StyleConfig,
    fe: &Frontend<C, P>,
    icons: &mut IconCache<'a>,
    background: Option<&Texture>,
    game_tex: Option<&Texture>,
    w: u32,
    h: u32,
) {
    canvas.set_blend_mode(BlendMode::Blend);
    canvas.set_draw_color(color(style.background));
    canvas.clear();
    if let Some(bg) = background {
        let _ = canvas.copy(bg, None, Rect::new(0, 0, w, h));
    }

    if fe.tab != Tab::SaveLoad {
        icons.clear();
    }
    render_tabs(canvas, tc, font, style, fe.tab, fe.game_loaded());
    match fe.tab {
        Tab::Game => render_browser(canvas, tc, font, style, fe),
        Tab::SaveLoad => render_gallery(canvas, tc, font, style, fe, icons),
        Tab::Control => render_menu_items(canvas, tc, font, style, &fe.control_menu),
        Tab::Options => render_menu_items(canvas, tc, font, style, &fe.options_menu),
        Tab::System => {
            render_menu_items(canvas, tc, font, style, &fe.system_menu);
            render_system_preview(canvas, game_tex, w, h);
        }
        Tab::About => render_splash(canvas, tc, font, style, w, h),
    }
    render_help(canvas, tc, font, style, fe.help_text(), h);

    if let Some(msg) = fe.flash_message() {
        render_box(canvas, tc, font, style, &[msg], w, h);
    }
    match &fe.dialog {
        Some(Dialog::Confirm { message, .. }) => {
            render_box(canvas, tc, font, style, &[*message, "", "OK: Yes    Cancel: No"], w, h)
        }
        Some(Dialog::Alert(msg)) => render_box(canvas, tc, font, style, &[msg.as_str(), "", "OK: Close"], w, h),
        None => {}
    }
}
