//! Static geometry of every screen on the 240x320 portrait panel.

use embedded_graphics::geometry::Point;

use super::{
    Action, ButtonStyle, Caption, Control, Font, Panel, RegionId, RegionSpec, Screen, ScreenLayout,
    rect,
};
use crate::selection::{
    Axis, CoordSystem, JogIncrement, OverridePreset, ProbeKind, SpindleDirection, SpindlePreset,
};

const fn control(
    (x, y, width, height): (i32, i32, u32, u32),
    label: &'static str,
    action: Action,
    style: ButtonStyle,
    font: Font,
) -> Control {
    Control {
        rect: rect(x, y, width, height),
        action,
        label,
        style,
        font,
    }
}

const fn nav(at: (i32, i32, u32, u32), label: &'static str, screen: Screen) -> Control {
    control(at, label, Action::Goto(screen), ButtonStyle::Nav, Font::Large)
}

const fn toggle(at: (i32, i32, u32, u32), label: &'static str, action: Action) -> Control {
    control(at, label, action, ButtonStyle::Toggle, Font::Large)
}

const fn go(at: (i32, i32, u32, u32), label: &'static str, action: Action) -> Control {
    control(at, label, action, ButtonStyle::Go, Font::Large)
}

const fn region(id: RegionId, (x, y, width, height): (i32, i32, u32, u32), on_panel: bool) -> RegionSpec {
    RegionSpec {
        id,
        rect: rect(x, y, width, height),
        on_panel,
    }
}

const fn panel((x, y, width, height): (i32, i32, u32, u32), caption: &'static str) -> Panel {
    Panel {
        rect: rect(x, y, width, height),
        caption,
    }
}

const fn caption(x: i32, y: i32, text: &'static str) -> Caption {
    Caption {
        at: Point::new(x, y),
        text,
    }
}

/// Columns for four equal buttons across the panel.
const fn quad(i: i32, y: i32) -> (i32, i32, u32, u32) {
    (5 + i * 56, y, 52, 38)
}

static MAIN_MENU: ScreenLayout = ScreenLayout {
    title: "MAIN MENU",
    panels: &[panel((5, 40, 230, 65), "")],
    captions: &[caption(10, 45, "STATUS"), caption(95, 45, "AXIS")],
    controls: &[
        nav((5, 112, 112, 36), "Jog", Screen::JogHoming),
        nav((123, 112, 112, 36), "Work Area", Screen::WorkArea),
        nav((5, 154, 112, 36), "Feeds", Screen::FeedsSpeeds),
        nav((123, 154, 112, 36), "Spindle", Screen::SpindleControl),
        nav((5, 196, 112, 36), "Macros", Screen::Macros),
        nav((123, 196, 112, 36), "SD Card", Screen::SdCard),
        nav((5, 238, 112, 36), "Probing", Screen::Probing),
        nav((123, 238, 112, 36), "Status", Screen::Status),
        nav((5, 280, 230, 36), "Connection", Screen::ConnectionInfo),
    ],
    regions: &[
        region(RegionId::MenuState, (10, 58, 80, 30), true),
        region(RegionId::MenuAxes, (95, 57, 136, 44), true),
    ],
};

static STATUS: ScreenLayout = ScreenLayout {
    title: "STATUS",
    panels: &[
        panel((5, 40, 230, 50), "MACHINE STATUS"),
        panel((5, 95, 230, 40), "CURRENT FILE"),
        panel((5, 140, 230, 65), "AXIS POSITIONS"),
    ],
    captions: &[],
    controls: &[nav((5, 280, 230, 36), "Main Menu", Screen::MainMenu)],
    regions: &[
        region(RegionId::StatusState, (10, 56, 220, 30), true),
        region(RegionId::StatusFile, (10, 112, 220, 18), true),
        region(RegionId::StatusAxes, (10, 156, 220, 44), true),
        region(RegionId::StatusFeedSpindle, (5, 210, 230, 65), false),
    ],
};

static JOG_HOMING: ScreenLayout = ScreenLayout {
    title: "JOG & HOMING",
    panels: &[],
    captions: &[
        caption(5, 103, "JOG AXIS"),
        caption(5, 161, "HOME"),
        caption(5, 219, "JOG INCREMENT"),
    ],
    controls: &[
        toggle(quad(0, 115), Axis::X.label(), Action::SelectAxis(Axis::X)),
        toggle(quad(1, 115), Axis::Y.label(), Action::SelectAxis(Axis::Y)),
        toggle(quad(2, 115), Axis::Z.label(), Action::SelectAxis(Axis::Z)),
        toggle(quad(3, 115), Axis::A.label(), Action::SelectAxis(Axis::A)),
        go(quad(0, 173), "HX", Action::HomeAxis(Axis::X)),
        go(quad(1, 173), "HY", Action::HomeAxis(Axis::Y)),
        go(quad(2, 173), "HZ", Action::HomeAxis(Axis::Z)),
        go(quad(3, 173), "HA", Action::HomeAxis(Axis::A)),
        toggle(quad(0, 231), JogIncrement::Tenth.label(), Action::SelectIncrement(JogIncrement::Tenth)),
        toggle(quad(1, 231), JogIncrement::One.label(), Action::SelectIncrement(JogIncrement::One)),
        toggle(quad(2, 231), JogIncrement::Ten.label(), Action::SelectIncrement(JogIncrement::Ten)),
        toggle(quad(3, 231), JogIncrement::Hundred.label(), Action::SelectIncrement(JogIncrement::Hundred)),
        nav((5, 277, 112, 40), "Main Menu", Screen::MainMenu),
        nav((123, 277, 112, 40), "Work Area", Screen::WorkArea),
    ],
    regions: &[
        region(RegionId::JogAxisDisplay, (5, 40, 230, 55), false),
        region(RegionId::JogAxisGroup, (5, 115, 220, 38), false),
        region(RegionId::JogIncrementGroup, (5, 231, 220, 38), false),
    ],
};

const fn zero(x: i32, label: &'static str, action: Action) -> Control {
    control((x, 230, 46, 38), label, action, ButtonStyle::Go, Font::Medium)
}

static WORK_AREA: ScreenLayout = ScreenLayout {
    title: "WORK AREA",
    panels: &[],
    captions: &[
        caption(5, 43, "COORDINATE SYSTEM"),
        caption(5, 100, "MACHINE POS"),
        caption(5, 158, "WORK POS"),
        caption(5, 218, "SET WORK ZERO"),
    ],
    controls: &[
        toggle(quad(0, 55), CoordSystem::G54.label(), Action::SelectCoordSystem(CoordSystem::G54)),
        toggle(quad(1, 55), CoordSystem::G55.label(), Action::SelectCoordSystem(CoordSystem::G55)),
        toggle(quad(2, 55), CoordSystem::G56.label(), Action::SelectCoordSystem(CoordSystem::G56)),
        toggle(quad(3, 55), CoordSystem::G57.label(), Action::SelectCoordSystem(CoordSystem::G57)),
        zero(5, "X0", Action::ZeroAxis(Axis::X)),
        zero(52, "Y0", Action::ZeroAxis(Axis::Y)),
        zero(99, "Z0", Action::ZeroAxis(Axis::Z)),
        zero(146, "A0", Action::ZeroAxis(Axis::A)),
        zero(193, "ALL", Action::ZeroAll),
        nav((5, 277, 112, 40), "Main Menu", Screen::MainMenu),
        nav((123, 277, 112, 40), "Jog", Screen::JogHoming),
    ],
    regions: &[
        region(RegionId::WorkCoordGroup, (5, 55, 220, 38), false),
        region(RegionId::WorkMachinePos, (5, 112, 230, 40), false),
        region(RegionId::WorkWorkPos, (5, 170, 230, 40), false),
    ],
};

const fn probe_kind(i: i32, kind: ProbeKind) -> Control {
    control(
        (5 + i * 78, 55, 72, 38),
        kind.label(),
        Action::SelectProbe(kind),
        ButtonStyle::Toggle,
        Font::Medium,
    )
}

static PROBING: ScreenLayout = ScreenLayout {
    title: "PROBING",
    panels: &[],
    captions: &[caption(5, 43, "PROBE TYPE"), caption(5, 166, "CYCLE")],
    controls: &[
        probe_kind(0, ProbeKind::ZSurface),
        probe_kind(1, ProbeKind::XEdge),
        probe_kind(2, ProbeKind::YEdge),
        go((5, 178, 230, 44), "Start Probe", Action::StartProbe),
        nav((5, 277, 112, 40), "Main Menu", Screen::MainMenu),
        nav((123, 277, 112, 40), "Work Area", Screen::WorkArea),
    ],
    regions: &[
        region(RegionId::ProbeKindGroup, (5, 55, 228, 38), false),
        region(RegionId::ProbeReadout, (5, 100, 230, 58), false),
    ],
};

const fn feed_override(at: (i32, i32, u32, u32), preset: OverridePreset) -> Control {
    control(at, preset.label(), Action::SelectFeedOverride(preset), ButtonStyle::Toggle, Font::Medium)
}

const fn spindle_override(at: (i32, i32, u32, u32), preset: OverridePreset) -> Control {
    control(at, preset.label(), Action::SelectSpindleOverride(preset), ButtonStyle::Toggle, Font::Medium)
}

static FEEDS_SPEEDS: ScreenLayout = ScreenLayout {
    title: "FEEDS & SPEEDS",
    panels: &[],
    captions: &[caption(5, 83, "FEED OVERRIDE"), caption(5, 182, "SPINDLE OVERRIDE")],
    controls: &[
        feed_override((5, 95, 72, 37), OverridePreset::P50),
        feed_override((83, 95, 72, 37), OverridePreset::P75),
        feed_override((161, 95, 72, 37), OverridePreset::P100),
        feed_override((5, 137, 72, 37), OverridePreset::P125),
        feed_override((161, 137, 72, 37), OverridePreset::P150),
        spindle_override((5, 194, 72, 37), OverridePreset::P50),
        spindle_override((83, 194, 72, 37), OverridePreset::P75),
        spindle_override((161, 194, 72, 37), OverridePreset::P100),
        spindle_override((5, 236, 72, 37), OverridePreset::P125),
        spindle_override((161, 236, 72, 37), OverridePreset::P150),
        nav((5, 280, 230, 37), "Main Menu", Screen::MainMenu),
    ],
    regions: &[
        region(RegionId::FeedsLive, (5, 40, 230, 35), false),
        region(RegionId::FeedOverrideGroup, (5, 95, 228, 79), false),
        region(RegionId::SpindleOverrideGroup, (5, 194, 228, 79), false),
    ],
};

const fn spindle_preset(i: i32, preset: SpindlePreset) -> Control {
    control(
        (5 + i * 75, 178, 70, 37),
        preset.label(),
        Action::SelectSpindlePreset(preset),
        ButtonStyle::Toggle,
        Font::Medium,
    )
}

static SPINDLE_CONTROL: ScreenLayout = ScreenLayout {
    title: "SPINDLE CONTROL",
    panels: &[],
    captions: &[caption(5, 106, "DIRECTION"), caption(5, 166, "RPM PRESETS")],
    controls: &[
        toggle(
            (5, 118, 112, 38),
            SpindleDirection::Forward.label(),
            Action::SelectSpindleDirection(SpindleDirection::Forward),
        ),
        toggle(
            (123, 118, 112, 38),
            SpindleDirection::Reverse.label(),
            Action::SelectSpindleDirection(SpindleDirection::Reverse),
        ),
        spindle_preset(0, SpindlePreset::Low),
        spindle_preset(1, SpindlePreset::Mid),
        spindle_preset(2, SpindlePreset::High),
        go((5, 228, 112, 40), "Start", Action::SpindleStart),
        control((123, 228, 112, 40), "Stop", Action::SpindleStop, ButtonStyle::Stop, Font::Large),
        nav((5, 280, 230, 37), "Main Menu", Screen::MainMenu),
    ],
    regions: &[
        region(RegionId::SpindleRpm, (5, 40, 230, 60), false),
        region(RegionId::SpindleDirectionGroup, (5, 118, 230, 38), false),
        region(RegionId::SpindlePresetGroup, (5, 178, 220, 37), false),
    ],
};

const fn macro_button(index: u8, label: &'static str) -> Control {
    let column = (index % 2) as i32;
    let row = (index / 2) as i32;
    control(
        (5 + column * 118, 40 + row * 48, 112, 43),
        label,
        Action::RunMacro(index),
        ButtonStyle::Neutral,
        Font::Medium,
    )
}

static MACROS: ScreenLayout = ScreenLayout {
    title: "MACROS",
    panels: &[],
    captions: &[],
    controls: &[
        macro_button(0, "Macro 0"),
        macro_button(1, "Macro 1"),
        macro_button(2, "Macro 2"),
        macro_button(3, "Macro 3"),
        macro_button(4, "Macro 4"),
        macro_button(5, "Macro 5"),
        macro_button(6, "Macro 6"),
        macro_button(7, "Macro 7"),
        macro_button(8, "Macro 8"),
        macro_button(9, "Macro 9"),
        nav((5, 280, 230, 37), "Main Menu", Screen::MainMenu),
    ],
    regions: &[],
};

/// Row pitch of the SD listing.
pub const SD_ROW_PITCH: i32 = 42;
pub const SD_ROW_HEIGHT: u32 = 38;

const fn sd_row(row: u8) -> Control {
    control(
        (5, 40 + row as i32 * SD_ROW_PITCH, 230, SD_ROW_HEIGHT),
        "",
        Action::SelectFileRow(row),
        ButtonStyle::Toggle,
        Font::Medium,
    )
}

static SD_CARD: ScreenLayout = ScreenLayout {
    title: "SD CARD",
    panels: &[],
    captions: &[],
    controls: &[
        sd_row(0),
        sd_row(1),
        sd_row(2),
        sd_row(3),
        control((5, 210, 112, 32), "Back", Action::ScrollBack, ButtonStyle::Neutral, Font::Medium),
        control((123, 210, 112, 32), "Next", Action::ScrollNext, ButtonStyle::Neutral, Font::Medium),
        control((5, 248, 112, 32), "Open", Action::OpenFile, ButtonStyle::Go, Font::Medium),
        control((123, 248, 112, 32), "Delete", Action::DeleteFile, ButtonStyle::Stop, Font::Medium),
        nav((5, 286, 230, 30), "Main Menu", Screen::MainMenu),
    ],
    regions: &[region(RegionId::SdFileList, (5, 40, 230, 164), false)],
};

static CONNECTION_INFO: ScreenLayout = ScreenLayout {
    title: "CONNECTION",
    panels: &[],
    captions: &[caption(5, 276, "TURN DIAL TO FLIP SCREEN")],
    controls: &[nav((5, 288, 230, 30), "Main Menu", Screen::MainMenu)],
    regions: &[
        region(RegionId::ConnVersions, (5, 40, 230, 106), false),
        region(RegionId::ConnLink, (5, 152, 230, 72), false),
        region(RegionId::ConnHeap, (5, 230, 230, 40), false),
    ],
};

pub(super) fn for_screen(screen: Screen) -> &'static ScreenLayout {
    match screen {
        Screen::MainMenu => &MAIN_MENU,
        Screen::Status => &STATUS,
        Screen::JogHoming => &JOG_HOMING,
        Screen::WorkArea => &WORK_AREA,
        Screen::Probing => &PROBING,
        Screen::FeedsSpeeds => &FEEDS_SPEEDS,
        Screen::SpindleControl => &SPINDLE_CONTROL,
        Screen::Macros => &MACROS,
        Screen::SdCard => &SD_CARD,
        Screen::ConnectionInfo => &CONNECTION_INFO,
    }
}

#[cfg(test)]
mod tests {
    use embedded_graphics::primitives::Rectangle;
    use pendant_canvas::panel;

    use super::*;
    use crate::cache::MAX_REGIONS;

    fn inside(outer: &Rectangle, inner: &Rectangle) -> bool {
        outer.intersection(inner) == *inner
    }

    fn screen_rect() -> Rectangle {
        rect(0, 0, panel::WIDTH as u32, panel::HEIGHT as u32)
    }

    #[test]
    fn controls_never_overlap() {
        for screen in Screen::ALL {
            let controls = screen.layout().controls;
            for (i, a) in controls.iter().enumerate() {
                for b in &controls[i + 1..] {
                    assert!(
                        a.rect.intersection(&b.rect).is_zero_sized(),
                        "{screen:?}: {:?} overlaps {:?}",
                        a.action,
                        b.action
                    );
                }
            }
        }
    }

    #[test]
    fn everything_fits_on_the_panel() {
        let panel = screen_rect();
        for screen in Screen::ALL {
            let layout = screen.layout();
            for control in layout.controls {
                assert!(inside(&panel, &control.rect), "{screen:?} {:?}", control.action);
            }
            for spec in layout.regions {
                assert!(inside(&panel, &spec.rect), "{screen:?} {:?}", spec.id);
            }
        }
    }

    #[test]
    fn regions_belong_to_their_screen() {
        for screen in Screen::ALL {
            let regions = screen.layout().regions;
            assert!(regions.len() <= MAX_REGIONS, "{screen:?}");
            for spec in regions {
                assert_eq!(spec.id.screen(), screen);
                assert_eq!(spec.id.spec().map(|s| s.rect), Some(spec.rect));
            }
        }
    }

    #[test]
    fn toggles_sit_inside_a_region() {
        for screen in Screen::ALL {
            let layout = screen.layout();
            for control in layout.controls.iter().filter(|c| c.style == ButtonStyle::Toggle) {
                assert!(
                    layout.regions.iter().any(|spec| inside(&spec.rect, &control.rect)),
                    "{screen:?} {:?}",
                    control.action
                );
            }
        }
    }

    #[test]
    fn regions_do_not_cover_static_buttons() {
        for screen in Screen::ALL {
            let layout = screen.layout();
            for control in layout.controls.iter().filter(|c| c.style != ButtonStyle::Toggle) {
                for spec in layout.regions {
                    assert!(
                        spec.rect.intersection(&control.rect).is_zero_sized(),
                        "{screen:?} {:?} under {:?}",
                        control.action,
                        spec.id
                    );
                }
            }
        }
    }

    #[test]
    fn every_screen_can_return_to_the_menu() {
        for screen in Screen::ALL.into_iter().filter(|s| *s != Screen::MainMenu) {
            assert!(
                screen
                    .layout()
                    .controls
                    .iter()
                    .any(|c| c.action == Action::Goto(Screen::MainMenu)),
                "{screen:?}"
            );
        }
    }

    #[test]
    fn hit_test_uses_half_open_edges() {
        let layout = Screen::WorkArea.layout();
        let x0 = layout.hit_test(Point::new(50, 240)).map(|c| c.action);
        let y0 = layout.hit_test(Point::new(52, 240)).map(|c| c.action);
        let gap = layout.hit_test(Point::new(51, 240));

        assert_eq!(x0, Some(Action::ZeroAxis(Axis::X)));
        assert_eq!(y0, Some(Action::ZeroAxis(Axis::Y)));
        assert!(gap.is_none());
        assert!(layout.hit_test(Point::new(2, 2)).is_none());
    }
}
