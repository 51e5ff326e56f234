use embedded_graphics::{
    draw_target::{DrawTarget, DrawTargetExt},
    primitives::Rectangle,
};
use pendant_canvas::Sprite;

use super::*;
use crate::{
    input::IdleInput,
    selection::{Axis, CoordSystem, JogIncrement, OverridePreset},
    settings::MemorySettings,
    surface::testing::{RecordingSink, ScriptedInput, TestSurface},
    telemetry::MachineState,
    ui::RegionPainter,
};

const PLENTY: usize = 512 * 1024;

type TestApp = PendantApp<ScriptedInput, RecordingSink, MemorySettings>;

#[derive(Default)]
struct RecordingDelay {
    total_ns: u64,
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }
}

/// Periodic refresh disabled so blits come from input alone.
fn quiet_config() -> PendantConfig {
    PendantConfig::default().with_refresh_interval_ms(u64::MAX)
}

fn started(input: ScriptedInput, config: PendantConfig, surface: &mut TestSurface) -> TestApp {
    let mut app = PendantApp::new(input, RecordingSink::default(), MemorySettings::new(), config);
    app.start(surface, 0);
    app
}

fn touch(app: &mut TestApp, surface: &mut TestSurface, now_ms: u64, x: i32, y: i32) {
    surface.touch_at(x, y);
    let _ = app.tick(now_ms, surface, &mut RecordingDelay::default());
}

fn idle_tick(app: &mut TestApp, surface: &mut TestSurface, now_ms: u64) -> TickResult {
    app.tick(now_ms, surface, &mut RecordingDelay::default())
}

fn region_rect(region: RegionId) -> Rectangle {
    region.spec().unwrap().rect
}

/// One detent: clock falls while data shows the direction.
fn detent(forward: bool) -> RawLevels {
    RawLevels {
        clock_high: false,
        data_high: forward,
        ..RawLevels::IDLE
    }
}

fn holding(button: Button) -> RawLevels {
    let mut levels = RawLevels::IDLE;
    levels.buttons_high[button as usize] = false;
    levels
}

fn expected_region(app: &TestApp, region: RegionId) -> Sprite {
    let spec = region.spec().unwrap();
    let mut sprite =
        Sprite::try_new(spec.rect.size.width as u16, spec.rect.size.height as u16).unwrap();
    sprite.clear(spec.background()).unwrap();
    let view = View {
        telemetry: app.telemetry(),
        selection: app.selection(),
        orientation: app.orientation(),
    };
    view.paint(region, &mut sprite.translated(-spec.rect.top_left))
        .unwrap();
    sprite
}

#[test]
fn menu_to_jog_then_select_and_home_z() {
    let mut surface = TestSurface::new(PLENTY);
    let mut app = started(ScriptedInput::default(), quiet_config(), &mut surface);
    assert_eq!(app.current_screen(), Screen::MainMenu);
    let clears = surface.clears;

    touch(&mut app, &mut surface, 1_000, 60, 130);

    assert_eq!(app.current_screen(), Screen::JogHoming);
    assert_eq!(app.previous_screen(), Screen::MainMenu);
    assert_eq!(surface.clears, clears + 1);
    assert!(app.cache().is_cached(Screen::JogHoming));

    surface.blits.clear();
    touch(&mut app, &mut surface, 1_300, 140, 130);

    assert_eq!(app.current_screen(), Screen::JogHoming);
    assert_eq!(app.selection().axis, Axis::Z);
    assert_eq!(
        surface.blits,
        [
            region_rect(RegionId::JogAxisGroup),
            region_rect(RegionId::JogAxisDisplay)
        ]
    );
    assert!(app.commands().lines.is_empty());

    touch(&mut app, &mut surface, 1_600, 140, 190);

    assert_eq!(app.commands().lines, ["$HZ\n"]);
}

#[test]
fn full_repaint_twice_yields_identical_regions() {
    let mut surface = TestSurface::new(PLENTY);
    let mut app = started(ScriptedInput::default(), quiet_config(), &mut surface);
    app.telemetry_mut().machine_pos = [12.5, -3.25, 40.0, 0.0];
    app.telemetry_mut().set_sd_files(["a.nc", "b.nc"]);

    for screen in Screen::ALL {
        app.navigate(screen, &mut surface);
        let first_frame = surface.frame.clone();
        let first: Vec<Option<Sprite>> = screen
            .layout()
            .regions
            .iter()
            .map(|spec| app.cache().sprite(spec.id).cloned())
            .collect();

        app.navigate(screen, &mut surface);
        let second: Vec<Option<Sprite>> = screen
            .layout()
            .regions
            .iter()
            .map(|spec| app.cache().sprite(spec.id).cloned())
            .collect();

        assert_eq!(first, second, "{screen:?}");
        assert_eq!(first_frame, surface.frame, "{screen:?}");
    }
}

#[test]
fn uncached_screens_still_repaint_identically() {
    let mut surface = TestSurface::new(4 * 1024);
    let mut app = started(ScriptedInput::default(), quiet_config(), &mut surface);

    app.navigate(Screen::Status, &mut surface);
    let first = surface.frame.clone();
    app.navigate(Screen::Status, &mut surface);

    assert!(!app.cache().is_cached(Screen::Status));
    assert!(surface.blits.is_empty());
    assert_eq!(first, surface.frame);
}

#[test]
fn bouncy_press_emits_one_feed_hold() {
    let mut input = ScriptedInput::default();
    let pattern = [
        true, false, true, false, true, true, true, true, true, true, true, true, false, true,
        false, false, false, false, false, false, false, false,
    ];
    for pressed in pattern {
        input.push(if pressed { holding(Button::Red) } else { RawLevels::IDLE });
    }
    let mut surface = TestSurface::new(PLENTY);
    let mut app = started(input, quiet_config(), &mut surface);

    for step in 0..pattern.len() as u64 + 4 {
        idle_tick(&mut app, &mut surface, 10 * step);
    }

    assert_eq!(app.commands().lines, ["!\n"]);
}

#[test]
fn yellow_clears_alarm_only_in_alarm() {
    let mut input = ScriptedInput::default();
    for _ in 0..8 {
        input.push(holding(Button::Yellow));
    }
    for _ in 0..8 {
        input.push(RawLevels::IDLE);
    }
    for _ in 0..8 {
        input.push(holding(Button::Yellow));
    }
    let mut surface = TestSurface::new(PLENTY);
    let mut app = started(input, quiet_config(), &mut surface);

    app.telemetry_mut().state = MachineState::Alarm;
    for step in 0..16 {
        idle_tick(&mut app, &mut surface, 10 * step);
    }
    app.telemetry_mut().state = MachineState::Idle;
    for step in 16..24 {
        idle_tick(&mut app, &mut surface, 10 * step);
    }

    assert_eq!(app.commands().lines, ["$X\n", "!\n"]);
}

#[test]
fn green_resumes_cycle() {
    let mut input = ScriptedInput::default();
    for _ in 0..8 {
        input.push(holding(Button::Green));
    }
    let mut surface = TestSurface::new(PLENTY);
    let mut app = started(input, quiet_config(), &mut surface);

    for step in 0..8 {
        idle_tick(&mut app, &mut surface, 10 * step);
    }

    assert_eq!(app.commands().lines, ["~\n"]);
}

#[test]
fn encoder_jogs_selected_axis_by_increment() {
    let mut input = ScriptedInput::default();
    input.push(detent(true));
    input.push(RawLevels::IDLE);
    input.push(detent(false));
    let mut surface = TestSurface::new(PLENTY);
    let mut app = started(input, quiet_config(), &mut surface);
    app.navigate(Screen::JogHoming, &mut surface);

    idle_tick(&mut app, &mut surface, 100);
    idle_tick(&mut app, &mut surface, 120);
    idle_tick(&mut app, &mut surface, 200);

    assert_eq!(
        app.commands().lines,
        ["$J=G91 G21 X1.000 F1000\n", "$J=G91 G21 X-1.000 F1000\n"]
    );
}

#[test]
fn encoder_ticks_inside_jog_window_are_dropped() {
    let mut input = ScriptedInput::default();
    input.push(detent(true));
    input.push(RawLevels::IDLE);
    input.push(detent(true));
    let mut surface = TestSurface::new(PLENTY);
    let mut app = started(input, quiet_config(), &mut surface);
    app.navigate(Screen::JogHoming, &mut surface);

    idle_tick(&mut app, &mut surface, 100);
    idle_tick(&mut app, &mut surface, 110);
    idle_tick(&mut app, &mut surface, 120);

    assert_eq!(app.commands().lines.len(), 1);
}

#[test]
fn increment_toggles_fix_jog_distance() {
    let mut surface = TestSurface::new(PLENTY);
    let mut app = started(ScriptedInput::default(), quiet_config(), &mut surface);
    app.navigate(Screen::JogHoming, &mut surface);

    for (i, expected) in [0.1, 1.0, 10.0, 100.0].into_iter().enumerate() {
        let x = 5 + 56 * i as i32 + 26;
        touch(&mut app, &mut surface, 1_000 + 300 * i as u64, x, 250);

        assert_eq!(app.selection().increment, JogIncrement::ALL[i]);
        assert_eq!(app.selection().increment.distance_mm(), expected);
    }
    assert!(app.commands().lines.is_empty());
}

#[test]
fn encoder_is_ignored_on_other_screens() {
    let mut input = ScriptedInput::default();
    input.push(detent(true));
    let mut surface = TestSurface::new(PLENTY);
    let mut app = started(input, quiet_config(), &mut surface);

    idle_tick(&mut app, &mut surface, 100);

    assert!(app.commands().lines.is_empty());
    assert_eq!(app.orientation(), Orientation::Normal);
}

#[test]
fn override_toggles_set_value_and_readout() {
    let mut surface = TestSurface::new(PLENTY);
    let mut app = started(ScriptedInput::default(), quiet_config(), &mut surface);
    app.navigate(Screen::FeedsSpeeds, &mut surface);
    let feed_points = [(41, 113), (119, 113), (197, 113), (41, 155), (197, 155)];

    let mut readouts = Vec::new();
    for (i, (x, y)) in feed_points.into_iter().enumerate() {
        touch(&mut app, &mut surface, 1_000 + 300 * i as u64, x, y);

        let preset = app.selection().feed_override;
        assert_eq!(preset, OverridePreset::ALL[i]);
        assert_eq!(preset.percent(), [50, 75, 100, 125, 150][i]);
        let cached = app.cache().sprite(RegionId::FeedOverrideGroup).unwrap().clone();
        assert_eq!(cached, expected_region(&app, RegionId::FeedOverrideGroup));
        readouts.push(cached);
    }

    assert_ne!(readouts[0], readouts[4]);
    assert_eq!(app.selection().spindle_override, OverridePreset::P100);
}

#[test]
fn spindle_override_uses_its_own_group() {
    let mut surface = TestSurface::new(PLENTY);
    let mut app = started(ScriptedInput::default(), quiet_config(), &mut surface);
    app.navigate(Screen::FeedsSpeeds, &mut surface);
    surface.blits.clear();

    touch(&mut app, &mut surface, 1_000, 41, 254);

    assert_eq!(app.selection().spindle_override, OverridePreset::P125);
    assert_eq!(app.selection().feed_override, OverridePreset::P100);
    assert_eq!(surface.blits, [region_rect(RegionId::SpindleOverrideGroup)]);
}

#[test]
fn orientation_toggle_persists_across_restart() {
    let mut input = ScriptedInput::default();
    input.push(detent(true));
    input.push(RawLevels::IDLE);
    let config = quiet_config();
    let mut surface = TestSurface::new(PLENTY);
    let mut app = started(input, config, &mut surface);
    app.navigate(Screen::ConnectionInfo, &mut surface);
    let clears = surface.clears;

    assert_eq!(idle_tick(&mut app, &mut surface, 1_000), TickResult::Rendered);
    idle_tick(&mut app, &mut surface, 1_010);

    assert_eq!(app.orientation(), Orientation::Flipped);
    assert_eq!(surface.orientation, Some(Orientation::Flipped));
    assert_eq!(surface.clears, clears + 1);

    let (_, _, settings) = app.release();
    let mut restarted_surface = TestSurface::new(PLENTY);
    let mut restarted = PendantApp::new(
        ScriptedInput::default(),
        RecordingSink::default(),
        settings,
        config,
    );
    restarted.start(&mut restarted_surface, 0);

    assert_eq!(restarted.orientation(), Orientation::Flipped);
    assert_eq!(restarted_surface.orientation, Some(Orientation::Flipped));
}

#[test]
fn orientation_flips_between_two_states() {
    let mut input = ScriptedInput::default();
    input.push(detent(true));
    input.push(RawLevels::IDLE);
    input.push(detent(false));
    input.push(RawLevels::IDLE);
    input.push(detent(true));
    let mut surface = TestSurface::new(PLENTY);
    let mut app = started(input, quiet_config(), &mut surface);
    app.navigate(Screen::ConnectionInfo, &mut surface);

    idle_tick(&mut app, &mut surface, 1_000);
    idle_tick(&mut app, &mut surface, 1_010);
    idle_tick(&mut app, &mut surface, 1_400);
    assert_eq!(app.orientation(), Orientation::Normal);

    idle_tick(&mut app, &mut surface, 1_410);
    idle_tick(&mut app, &mut surface, 1_500);
    assert_eq!(app.orientation(), Orientation::Normal, "inside the window");
    assert!(app.commands().lines.is_empty());
}

#[test]
fn touches_inside_interval_are_ignored() {
    let mut surface = TestSurface::new(PLENTY);
    let mut app = started(ScriptedInput::default(), quiet_config(), &mut surface);

    touch(&mut app, &mut surface, 1_000, 60, 130);
    app.navigate(Screen::MainMenu, &mut surface);
    touch(&mut app, &mut surface, 1_100, 180, 130);

    assert_eq!(app.current_screen(), Screen::MainMenu);

    touch(&mut app, &mut surface, 1_250, 180, 130);
    assert_eq!(app.current_screen(), Screen::WorkArea);
}

#[test]
fn zero_uses_selected_coordinate_system() {
    let mut surface = TestSurface::new(PLENTY);
    let mut app = started(ScriptedInput::default(), quiet_config(), &mut surface);
    app.navigate(Screen::WorkArea, &mut surface);

    touch(&mut app, &mut surface, 1_000, 87, 74);
    touch(&mut app, &mut surface, 1_300, 75, 249);
    touch(&mut app, &mut surface, 1_600, 216, 249);

    assert_eq!(app.selection().coord_system, CoordSystem::G55);
    assert_eq!(
        app.commands().lines,
        ["G10 L20 P2 Y0\n", "G10 L20 P2 X0 Y0 Z0 A0\n"]
    );
}

#[test]
fn spindle_start_uses_direction_and_preset() {
    let mut surface = TestSurface::new(PLENTY);
    let mut app = started(ScriptedInput::default(), quiet_config(), &mut surface);
    app.navigate(Screen::SpindleControl, &mut surface);

    touch(&mut app, &mut surface, 1_000, 179, 137);
    touch(&mut app, &mut surface, 1_300, 40, 196);
    touch(&mut app, &mut surface, 1_600, 60, 248);
    touch(&mut app, &mut surface, 1_900, 179, 248);

    assert_eq!(app.commands().lines, ["M4 S6000\n", "M5\n"]);
}

#[test]
fn preset_tap_updates_spindle_target() {
    let mut surface = TestSurface::new(PLENTY);
    let mut app = started(ScriptedInput::default(), quiet_config(), &mut surface);
    app.navigate(Screen::SpindleControl, &mut surface);
    let before = app.cache().sprite(RegionId::SpindleRpm).unwrap().clone();
    surface.blits.clear();

    touch(&mut app, &mut surface, 1_000, 40, 196);

    assert_eq!(
        surface.blits,
        [
            region_rect(RegionId::SpindlePresetGroup),
            region_rect(RegionId::SpindleRpm)
        ]
    );
    let after = app.cache().sprite(RegionId::SpindleRpm).unwrap();
    assert_ne!(after, &before);
    assert_eq!(after, &expected_region(&app, RegionId::SpindleRpm));
}

#[test]
fn status_shows_active_work_coordinates() {
    let mut surface = TestSurface::new(PLENTY);
    let mut app = started(ScriptedInput::default(), quiet_config(), &mut surface);
    app.navigate(Screen::Status, &mut surface);
    let g54 = app.cache().sprite(RegionId::StatusState).unwrap().clone();

    app.telemetry_mut().work_coordinates = CoordSystem::G56;
    app.navigate(Screen::Status, &mut surface);

    let g56 = app.cache().sprite(RegionId::StatusState).unwrap();
    assert_ne!(g56, &g54);
    assert_eq!(g56, &expected_region(&app, RegionId::StatusState));
}

#[test]
fn command_press_flashes_for_the_animation_window() {
    let mut surface = TestSurface::new(PLENTY);
    let mut app = started(ScriptedInput::default(), quiet_config(), &mut surface);
    app.navigate(Screen::Macros, &mut surface);
    let mut delay = RecordingDelay::default();

    surface.touch_at(180, 60);
    app.tick(1_000, &mut surface, &mut delay);

    assert_eq!(app.commands().lines, ["$Macros/Run=1\n"]);
    assert_eq!(delay.total_ns, 150_000_000);
    assert_eq!(surface.frame.color_at(125, 60), Some(ui::theme::BUTTON_GRAY));
}

#[test]
fn sd_browser_scrolls_selects_and_runs() {
    let mut surface = TestSurface::new(PLENTY);
    let mut app = started(ScriptedInput::default(), quiet_config(), &mut surface);
    app.telemetry_mut()
        .set_sd_files(["a.nc", "b.nc", "c.nc", "d.nc", "e.nc", "f.nc"]);
    app.navigate(Screen::SdCard, &mut surface);

    touch(&mut app, &mut surface, 1_000, 180, 226);
    touch(&mut app, &mut surface, 1_300, 60, 100);
    touch(&mut app, &mut surface, 1_600, 60, 264);
    touch(&mut app, &mut surface, 1_900, 180, 264);

    assert_eq!(app.selection().sd.scroll(), 1);
    assert_eq!(app.selection().sd.selected(), 2);
    assert_eq!(
        app.commands().lines,
        ["$SD/Run=/c.nc\n", "$SD/Delete=/c.nc\n"]
    );
}

#[test]
fn long_sd_names_run_in_full() {
    let mut surface = TestSurface::new(PLENTY);
    let mut app = started(ScriptedInput::default(), quiet_config(), &mut surface);
    app.telemetry_mut()
        .set_sd_files(["enclosure_lid_roughing_pass_v2_final.gcode"]);
    app.navigate(Screen::SdCard, &mut surface);

    touch(&mut app, &mut surface, 1_000, 60, 264);

    assert_eq!(
        app.commands().lines,
        ["$SD/Run=/enclosure_lid_roughing_pass_v2_final.gcode\n"]
    );
}

#[test]
fn sd_names_past_line_capacity_are_never_addressed() {
    let mut surface = TestSurface::new(PLENTY);
    let mut app = started(ScriptedInput::default(), quiet_config(), &mut surface);
    let overlong = "f".repeat(crate::telemetry::FILE_NAME_BYTES + 1);
    app.telemetry_mut().set_sd_files([overlong.as_str(), "b.nc"]);
    app.navigate(Screen::SdCard, &mut surface);

    touch(&mut app, &mut surface, 1_000, 60, 264);
    touch(&mut app, &mut surface, 1_300, 180, 264);

    assert_eq!(app.commands().lines, ["$SD/Run=/b.nc\n", "$SD/Delete=/b.nc\n"]);
}

#[test]
fn empty_sd_listing_sends_nothing() {
    let mut surface = TestSurface::new(PLENTY);
    let mut app = started(ScriptedInput::default(), quiet_config(), &mut surface);
    app.navigate(Screen::SdCard, &mut surface);

    touch(&mut app, &mut surface, 1_000, 60, 264);

    assert!(app.commands().lines.is_empty());
}

#[test]
fn probe_uses_selected_kind() {
    let mut surface = TestSurface::new(PLENTY);
    let mut app = started(ScriptedInput::default(), quiet_config(), &mut surface);
    app.navigate(Screen::Probing, &mut surface);

    touch(&mut app, &mut surface, 1_000, 119, 74);
    touch(&mut app, &mut surface, 1_300, 120, 200);

    assert_eq!(app.commands().lines, ["G38.2 X-25 F100\n"]);
}

#[test]
fn refresh_repaints_regions_from_telemetry() {
    let mut surface = TestSurface::new(PLENTY);
    let mut app = started(ScriptedInput::default(), PendantConfig::default(), &mut surface);
    let before = app.cache().sprite(RegionId::MenuAxes).unwrap().clone();

    app.telemetry_mut().machine_pos[0] = 123.4;
    assert_eq!(idle_tick(&mut app, &mut surface, 50), TickResult::NoRender);
    assert_eq!(app.cache().sprite(RegionId::MenuAxes), Some(&before));

    assert_eq!(idle_tick(&mut app, &mut surface, 100), TickResult::Rendered);
    let after = app.cache().sprite(RegionId::MenuAxes).unwrap();
    assert_ne!(after, &before);
    assert_eq!(after, &expected_region(&app, RegionId::MenuAxes));
}

#[test]
fn refresh_after_navigation_only_blits_new_screen() {
    let mut surface = TestSurface::new(PLENTY);
    let mut app = started(ScriptedInput::default(), PendantConfig::default(), &mut surface);
    app.navigate(Screen::JogHoming, &mut surface);
    app.navigate(Screen::WorkArea, &mut surface);
    surface.blits.clear();

    idle_tick(&mut app, &mut surface, 500);

    let owned: Vec<Rectangle> = Screen::WorkArea
        .layout()
        .regions
        .iter()
        .map(|spec| spec.rect)
        .collect();
    assert_eq!(surface.blits, owned);
}

#[test]
fn input_fault_is_tolerated() {
    let mut input = ScriptedInput::default();
    input.push_fault();
    input.push_fault();
    let mut surface = TestSurface::new(PLENTY);
    let mut app = started(input, PendantConfig::default(), &mut surface);

    idle_tick(&mut app, &mut surface, 100);
    idle_tick(&mut app, &mut surface, 110);
    touch(&mut app, &mut surface, 120, 60, 130);

    assert!(app.commands().lines.is_empty());
    assert_eq!(app.current_screen(), Screen::JogHoming);
}

#[test]
fn touch_only_board_still_navigates() {
    let mut surface = TestSurface::new(PLENTY);
    let mut app = PendantApp::new(
        IdleInput::new(),
        RecordingSink::default(),
        MemorySettings::new(),
        quiet_config(),
    );
    app.start(&mut surface, 0);

    for now_ms in 0..200 {
        let _ = app.tick(now_ms, &mut surface, &mut RecordingDelay::default());
    }
    surface.touch_at(60, 130);
    let _ = app.tick(1_000, &mut surface, &mut RecordingDelay::default());

    assert_eq!(app.current_screen(), Screen::JogHoming);
    assert!(app.commands().lines.is_empty());
}
