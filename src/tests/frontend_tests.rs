use super::*;
use crate::mock::{MockCore, MockPlatform};
use crate::savestate::{EMPTY_CAPTION, PRESENT_SLOT_HELP};
use std::fs;
use tempfile::TempDir;

type TestFrontend = Frontend<MockCore, MockPlatform>;

fn setup() -> (TempDir, TestFrontend) {
    let dir = tempfile::tempdir().unwrap();
    let roms = dir.path().join("roms");
    fs::create_dir_all(&roms).unwrap();
    fs::write(roms.join("game.sfc"), b"rom").unwrap();
    let fe = Frontend::new(
        AppPaths::new(dir.path().join("app")),
        &roms,
        MockCore::new(&[1, 2, 3, 4]),
        MockPlatform::default(),
    );
    (dir, fe)
}

fn rom(dir: &TempDir) -> PathBuf {
    dir.path().join("roms").join("game.sfc")
}

fn with_game() -> (TempDir, TestFrontend) {
    let (dir, mut fe) = setup();
    fe.quickload(rom(&dir));
    fe.run_pending();
    fe.enter_menu();
    (dir, fe)
}

fn slot_file(dir: &TempDir, slot: u32) -> PathBuf {
    dir.path().join("app").join("savedata").join(format!("game.sfc.s{:02}", slot))
}

fn alert(msg: &str) -> Option<Dialog> {
    Some(Dialog::Alert(msg.to_string()))
}

#[test]
fn test_new_session_starts_on_about() {
    let (dir, fe) = setup();
    assert_eq!(fe.tab, Tab::About);
    assert!(!fe.game_loaded());
    assert!(!fe.is_emulating());
    assert!(dir.path().join("app/savedata").is_dir());
    assert!(dir.path().join("app/screenshot").is_dir());
    assert_eq!(fe.options, EmulatorOptions::default());
    assert_eq!(fe.active_config, ButtonConfig::default());
    assert!(fe.gallery.slots.iter().all(|s| s.caption == EMPTY_CAPTION));
}

#[test]
fn test_tabs_skip_game_only_tabs() {
    let (_dir, mut fe) = setup();
    fe.handle_input(Buttons::RTRIGGER);
    assert_eq!(fe.tab, Tab::Game);
    fe.handle_input(Buttons::RTRIGGER);
    assert_eq!(fe.tab, Tab::Control);
    fe.handle_input(Buttons::LTRIGGER);
    fe.handle_input(Buttons::LTRIGGER);
    assert_eq!(fe.tab, Tab::About);
}

#[test]
fn test_save_load_tab_bounces_without_game() {
    let (_dir, mut fe) = setup();
    fe.open_tab(Tab::SaveLoad);
    assert_eq!(fe.tab, Tab::Control);
}

#[test]
fn test_cancel_only_resumes_with_game() {
    let (_dir, mut fe) = setup();
    fe.handle_input(Buttons::CIRCLE);
    assert!(!fe.is_emulating());

    let (_dir, mut fe) = with_game();
    fe.handle_input(Buttons::CIRCLE);
    assert!(fe.is_emulating());
}

#[test]
fn test_quickload_from_browser() {
    let (dir, mut fe) = setup();
    fe.open_tab(Tab::Game);
    fe.handle_input(Buttons::DOWN);
    fe.handle_input(Buttons::CROSS);
    assert_eq!(fe.flash_message(), Some(MSG_LOADING));
    assert!(fe.has_pending_work());
    assert!(fe.core().loaded.is_none());

    fe.run_pending();
    assert_eq!(fe.flash_message(), None);
    assert_eq!(fe.core().loaded.as_deref(), Some(rom(&dir).as_path()));
    assert_eq!(fe.game_dir(), dir.path().join("roms"));
    assert!(fe.is_emulating());
    assert_eq!(fe.platform().clock, Some(444));
    assert!(fe.core().settings.is_some());
}

#[test]
fn test_failed_game_load_alerts() {
    let (dir, mut fe) = setup();
    fe.core_mut().fail_load = true;
    fe.quickload(rom(&dir));
    fe.run_pending();
    assert!(!fe.game_loaded());
    assert!(!fe.is_emulating());
    assert_eq!(fe.dialog, alert(MSG_GAME_NOT_LOADED));
}

#[test]
fn test_save_into_empty_slot() {
    let (dir, mut fe) = with_game();
    fe.open_tab(Tab::SaveLoad);
    fe.handle_input(Buttons::SQUARE);
    assert_eq!(fe.flash_message(), Some(MSG_SAVING));
    fe.run_pending();

    assert!(slot_file(&dir, 0).exists());
    assert!(fe.gallery.slots[0].is_occupied());
    assert_eq!(fe.gallery.slots[0].help_text, PRESENT_SLOT_HELP);
    assert_eq!(fe.help_text(), PRESENT_SLOT_HELP);
}

#[test]
fn test_overwrite_needs_confirmation() {
    let (dir, mut fe) = with_game();
    fe.open_tab(Tab::SaveLoad);
    fe.handle_input(Buttons::SQUARE);
    fe.run_pending();
    let first = fs::metadata(slot_file(&dir, 0)).unwrap().len();

    fe.handle_input(Buttons::SQUARE);
    assert_eq!(
        fe.dialog,
        Some(Dialog::Confirm {
            message: MSG_OVERWRITE_STATE,
            action: PendingAction::OverwriteState(0)
        })
    );
    assert!(!fe.has_pending_work());

    fe.core_mut().state = vec![5; 10];
    fe.handle_input(Buttons::CROSS);
    assert!(fe.dialog.is_none());
    fe.run_pending();
    assert_eq!(fs::metadata(slot_file(&dir, 0)).unwrap().len(), first + 6);
}

#[test]
fn test_load_state_after_confirmation() {
    let (dir, mut fe) = with_game();
    fe.open_tab(Tab::SaveLoad);
    fe.gallery.move_cursor(1, 0, 5);
    fe.handle_input(Buttons::SQUARE);
    fe.run_pending();
    assert!(slot_file(&dir, 1).exists());

    fe.core_mut().state = vec![0; 4];
    fe.handle_input(Buttons::CROSS);
    assert_eq!(
        fe.dialog,
        Some(Dialog::Confirm {
            message: MSG_LOAD_STATE,
            action: PendingAction::LoadState(1)
        })
    );
    fe.handle_input(Buttons::CROSS);
    assert_eq!(fe.core().state, vec![1, 2, 3, 4]);
    assert!(fe.is_emulating());
}

#[test]
fn test_ok_on_empty_slot_does_nothing() {
    let (_dir, mut fe) = with_game();
    fe.open_tab(Tab::SaveLoad);
    fe.handle_input(Buttons::CROSS);
    assert!(fe.dialog.is_none());
    assert!(!fe.is_emulating());
}

#[test]
fn test_corrupt_state_alerts() {
    let (dir, mut fe) = with_game();
    fe.open_tab(Tab::SaveLoad);
    fs::write(slot_file(&dir, 0), b"not a state").unwrap();
    fe.handle_input(Buttons::CROSS);
    fe.handle_input(Buttons::CROSS);
    assert_eq!(fe.dialog, alert(MSG_STATE_LOAD_FAILED));
    assert!(!fe.is_emulating());
}

#[test]
fn test_save_without_frame_alerts() {
    let (dir, mut fe) = with_game();
    fe.core_mut().frame = None;
    fe.open_tab(Tab::SaveLoad);
    fe.handle_input(Buttons::SQUARE);
    fe.run_pending();
    assert_eq!(fe.dialog, alert(MSG_STATE_SAVE_FAILED));
    assert!(!slot_file(&dir, 0).exists());
}

#[test]
fn test_delete_state() {
    let (dir, mut fe) = with_game();
    fe.open_tab(Tab::SaveLoad);
    fe.handle_input(Buttons::SQUARE);
    fe.run_pending();

    fe.handle_input(Buttons::TRIANGLE);
    fe.handle_input(Buttons::CIRCLE);
    assert!(fe.dialog.is_none());
    assert!(slot_file(&dir, 0).exists());

    fe.handle_input(Buttons::TRIANGLE);
    fe.handle_input(Buttons::CROSS);
    assert!(!slot_file(&dir, 0).exists());
    assert!(!fe.gallery.slots[0].is_occupied());
    assert_eq!(fe.gallery.slots[0].caption, EMPTY_CAPTION);
}

#[test]
fn test_option_change_is_saved() {
    let (dir, mut fe) = setup();
    fe.open_tab(Tab::Options);
    fe.handle_input(Buttons::RIGHT);
    assert_eq!(fe.options.display_mode, DisplayMode::FillScreen);

    let saved = EmulatorOptions::load(&dir.path().join("app/snes9xvita.ini"));
    assert_eq!(saved.display_mode, DisplayMode::FillScreen);
}

#[test]
fn test_control_mode_swaps_ok_and_cancel() {
    let (_dir, mut fe) = with_game();
    fe.options.control_mode = ControlMode::Japan;
    fe.open_tab(Tab::System);
    fe.handle_input(Buttons::CROSS);
    assert!(fe.is_emulating());

    fe.enter_menu();
    fe.handle_input(Buttons::CIRCLE);
    assert!(matches!(fe.dialog, Some(Dialog::Confirm { message: MSG_RESET, .. })));
}

#[test]
fn test_remap_save_and_restore_defaults() {
    let (dir, mut fe) = setup();
    fe.open_tab(Tab::Control);
    fe.handle_input(Buttons::RIGHT);
    assert_eq!(
        fe.active_config[MapSlot::AnalogUp],
        MapTarget::Joypad(crate::buttons::JoypadButton::Down)
    );

    fe.handle_input(Buttons::CROSS);
    assert_eq!(fe.dialog, alert(MSG_CHANGES_SAVED));
    let saved = ButtonConfig::load(&dir.path().join("app/buttons.cnf")).unwrap();
    assert_eq!(saved, fe.active_config);

    fe.handle_input(Buttons::CROSS);
    assert!(fe.dialog.is_none());
    fe.handle_input(Buttons::TRIANGLE);
    assert_eq!(fe.active_config, ButtonConfig::default());
    let item = fe.control_menu.find_item_by_id(0).unwrap();
    assert_eq!(
        item.selected_option().unwrap().value,
        MapTarget::Joypad(crate::buttons::JoypadButton::Up).value() as i32
    );
}

#[test]
fn test_reset_after_confirmation() {
    let (_dir, mut fe) = with_game();
    fe.open_tab(Tab::System);
    fe.handle_input(Buttons::CROSS);
    fe.handle_input(Buttons::CIRCLE);
    assert_eq!(fe.core().resets, 0);

    fe.handle_input(Buttons::CROSS);
    fe.handle_input(Buttons::CROSS);
    assert_eq!(fe.core().resets, 1);
    assert!(fe.is_emulating());
}

#[test]
fn test_system_screenshot() {
    let (dir, mut fe) = with_game();
    fe.open_tab(Tab::System);
    fe.handle_input(Buttons::DOWN);
    fe.handle_input(Buttons::CROSS);
    assert_eq!(fe.dialog, alert(MSG_SCREENSHOT_SAVED));
    assert!(dir.path().join("app/screenshot/game.sfc-00.png").exists());
}

#[test]
fn test_ui_screenshot_request() {
    let (dir, mut fe) = setup();
    fe.handle_input(Buttons::START | Buttons::SELECT);
    assert!(fe.take_ui_capture_request());
    assert!(!fe.take_ui_capture_request());

    fe.save_ui_screenshot(&RgbImage::new(4, 4));
    assert_eq!(fe.dialog, alert(MSG_SAVED));
    assert!(dir.path().join("app/screenshot/ui-00.png").exists());
}

#[test]
fn test_alert_waits_for_ok_or_cancel() {
    let (_dir, mut fe) = setup();
    fe.save_ui_screenshot(&RgbImage::new(1, 1));
    fe.handle_input(Buttons::UP);
    assert!(fe.dialog.is_some());
    fe.handle_input(Buttons::CIRCLE);
    assert!(fe.dialog.is_none());
}

#[test]
fn test_menu_combo_leaves_emulation() {
    let (_dir, mut fe) = with_game();
    fe.handle_input(Buttons::CIRCLE);
    assert!(fe.is_emulating());

    assert_eq!(fe.run_frame(Buttons::CROSS, Analog::default()), Step::Presented);
    assert!(fe.core().last_input.is_pressed(crate::buttons::JoypadButton::B));
    assert_eq!(fe.core().frames_run, 1);

    assert_eq!(
        fe.run_frame(Buttons::LTRIGGER | Buttons::RTRIGGER, Analog::default()),
        Step::InMenu
    );
    assert!(!fe.is_emulating());
    assert_eq!(fe.core().frames_run, 1);
}

#[test]
fn test_frameskip() {
    let (_dir, mut fe) = with_game();
    fe.options.frameskip = 2;
    fe.handle_input(Buttons::CIRCLE);
    let steps: Vec<Step> = (0..4).map(|_| fe.run_frame(Buttons::empty(), Analog::default())).collect();
    assert_eq!(steps, [Step::Skipped, Step::Skipped, Step::Presented, Step::Skipped]);
    assert_eq!(fe.core().frames_run, 4);
}

#[test]
fn test_shutdown_saves_options() {
    let (dir, mut fe) = with_game();
    fe.options.show_fps = true;
    fe.shutdown();
    assert!(fe.core().loaded.is_none());
    assert!(EmulatorOptions::load(&dir.path().join("app/snes9xvita.ini")).show_fps);
}

#[test]
fn test_failed_reload_drops_the_old_game() {
    let (dir, mut fe) = with_game();
    assert!(fe.game_loaded());
    fe.core_mut().fail_load = true;
    fe.quickload(rom(&dir));
    fe.run_pending();

    assert_eq!(fe.dialog, alert(MSG_GAME_NOT_LOADED));
    assert!(!fe.game_loaded());
    assert!(!fe.is_emulating());
    assert!(fe.core().loaded.is_none());
    assert!(!Tab::SaveLoad.is_visible(fe.game_loaded()));

    fe.handle_input(Buttons::CIRCLE);
    fe.handle_input(Buttons::CIRCLE);
    assert!(!fe.is_emulating());
    fe.open_tab(Tab::SaveLoad);
    assert_eq!(fe.tab, Tab::Control);
}

#[test]
fn test_unwritable_button_config_alerts() {
    let (dir, mut fe) = setup();
    fs::create_dir(dir.path().join("app/buttons.cnf")).unwrap();
    fe.open_tab(Tab::Control);
    fe.handle_input(Buttons::CROSS);
    assert_eq!(fe.dialog, alert(MSG_CHANGES_NOT_SAVED));
}

#[test]
fn test_undeletable_state_alerts() {
    let (dir, mut fe) = with_game();
    fs::create_dir(slot_file(&dir, 0)).unwrap();
    fe.open_tab(Tab::SaveLoad);
    assert!(fe.gallery.slots[0].is_occupied());

    fe.handle_input(Buttons::TRIANGLE);
    fe.handle_input(Buttons::CROSS);
    assert_eq!(fe.dialog, alert(MSG_STATE_NOT_DELETED));
    assert!(fe.gallery.slots[0].is_occupied());
}

fn block_screenshot_dir(dir: &TempDir) {
    let shots = dir.path().join("app/screenshot");
    fs::remove_dir_all(&shots).unwrap();
    fs::write(&shots, b"").unwrap();
}

#[test]
fn test_system_screenshot_failure_alerts() {
    let (dir, mut fe) = with_game();
    block_screenshot_dir(&dir);
    fe.open_tab(Tab::System);
    fe.handle_input(Buttons::DOWN);
    fe.handle_input(Buttons::CROSS);
    assert_eq!(fe.dialog, alert(MSG_SCREENSHOT_NOT_SAVED));
}

#[test]
fn test_ui_screenshot_failure_alerts() {
    let (dir, mut fe) = setup();
    block_screenshot_dir(&dir);
    fe.save_ui_screenshot(&RgbImage::new(4, 4));
    assert_eq!(fe.dialog, alert(MSG_NOT_SAVED));
}

#[test]
fn test_only_new_presses_are_dispatched() {
    let (_dir, mut fe) = with_game();
    fe.open_tab(Tab::Control);
    // R pressed while Cross is still down switches tabs without saving
    fe.handle_press(Buttons::RTRIGGER, Buttons::CROSS | Buttons::RTRIGGER);
    assert_eq!(fe.tab, Tab::Options);
    assert!(fe.dialog.is_none());

    // Select joining a held Start completes the capture combo
    fe.handle_press(Buttons::SELECT, Buttons::START | Buttons::SELECT);
    assert!(fe.take_ui_capture_request());

    fe.handle_press(Buttons::empty(), Buttons::CROSS);
    assert!(fe.dialog.is_none());
}
