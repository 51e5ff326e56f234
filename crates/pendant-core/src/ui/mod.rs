//! Screen model: per-screen layout tables, actions, and region painters.

mod layout;
mod paint;
pub mod theme;

use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::{Point, Size},
    pixelcolor::Rgb565,
    primitives::Rectangle,
};

use crate::{
    selection::{
        Axis, CoordSystem, JogIncrement, OverridePreset, ProbeKind, Selection, SpindleDirection,
        SpindlePreset,
    },
    settings::Orientation,
    telemetry::Telemetry,
};

pub use paint::{ButtonLook, draw_button, paint_region, paint_static};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Screen {
    MainMenu,
    Status,
    JogHoming,
    WorkArea,
    Probing,
    FeedsSpeeds,
    SpindleControl,
    Macros,
    SdCard,
    ConnectionInfo,
}

impl Screen {
    pub const ALL: [Self; 10] = [
        Self::MainMenu,
        Self::Status,
        Self::JogHoming,
        Self::WorkArea,
        Self::Probing,
        Self::FeedsSpeeds,
        Self::SpindleControl,
        Self::Macros,
        Self::SdCard,
        Self::ConnectionInfo,
    ];

    pub fn layout(self) -> &'static ScreenLayout {
        layout::for_screen(self)
    }
}

/// What a control does when touched.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Action {
    Goto(Screen),
    SelectAxis(Axis),
    HomeAxis(Axis),
    SelectIncrement(JogIncrement),
    SelectCoordSystem(CoordSystem),
    ZeroAxis(Axis),
    ZeroAll,
    SelectProbe(ProbeKind),
    StartProbe,
    SelectFeedOverride(OverridePreset),
    SelectSpindleOverride(OverridePreset),
    SelectSpindleDirection(SpindleDirection),
    SelectSpindlePreset(SpindlePreset),
    SpindleStart,
    SpindleStop,
    RunMacro(u8),
    SelectFileRow(u8),
    ScrollBack,
    ScrollNext,
    OpenFile,
    DeleteFile,
}

impl Action {
    /// True for the toggle that matches the current selection.
    pub fn is_selected(self, selection: &Selection) -> bool {
        match self {
            Self::SelectAxis(axis) => selection.axis == axis,
            Self::SelectIncrement(increment) => selection.increment == increment,
            Self::SelectCoordSystem(cs) => selection.coord_system == cs,
            Self::SelectProbe(kind) => selection.probe == kind,
            Self::SelectFeedOverride(preset) => selection.feed_override == preset,
            Self::SelectSpindleOverride(preset) => selection.spindle_override == preset,
            Self::SelectSpindleDirection(dir) => selection.spindle_direction == dir,
            Self::SelectSpindlePreset(preset) => selection.spindle_preset == preset,
            Self::SelectFileRow(row) => {
                selection.sd.selected() == selection.sd.scroll() + row as usize
            }
            _ => false,
        }
    }

    /// Regions to repaint after a selection change.
    pub fn affected_regions(self) -> &'static [RegionId] {
        match self {
            Self::SelectAxis(_) => &[RegionId::JogAxisGroup, RegionId::JogAxisDisplay],
            Self::SelectIncrement(_) => &[RegionId::JogIncrementGroup],
            Self::SelectCoordSystem(_) => &[RegionId::WorkCoordGroup],
            Self::SelectProbe(_) => &[RegionId::ProbeKindGroup, RegionId::ProbeReadout],
            Self::SelectFeedOverride(_) => &[RegionId::FeedOverrideGroup],
            Self::SelectSpindleOverride(_) => &[RegionId::SpindleOverrideGroup],
            Self::SelectSpindleDirection(_) => &[RegionId::SpindleDirectionGroup],
            Self::SelectSpindlePreset(_) => &[RegionId::SpindlePresetGroup, RegionId::SpindleRpm],
            Self::SelectFileRow(_) | Self::ScrollBack | Self::ScrollNext => &[RegionId::SdFileList],
            _ => &[],
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ButtonStyle {
    Nav,
    /// Drawn by its group region, highlighted when selected.
    Toggle,
    Go,
    Stop,
    Neutral,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Font {
    Small,
    Medium,
    Large,
}

/// Touchable rectangle bound to an action.
#[derive(Clone, Copy, Debug)]
pub struct Control {
    pub rect: Rectangle,
    pub action: Action,
    pub label: &'static str,
    pub style: ButtonStyle,
    pub font: Font,
}

/// Frequently changing sub-rectangles, one cache slot each.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RegionId {
    MenuState,
    MenuAxes,
    StatusState,
    StatusFile,
    StatusAxes,
    StatusFeedSpindle,
    JogAxisDisplay,
    JogAxisGroup,
    JogIncrementGroup,
    WorkCoordGroup,
    WorkMachinePos,
    WorkWorkPos,
    ProbeKindGroup,
    ProbeReadout,
    FeedsLive,
    FeedOverrideGroup,
    SpindleOverrideGroup,
    SpindleRpm,
    SpindleDirectionGroup,
    SpindlePresetGroup,
    SdFileList,
    ConnVersions,
    ConnLink,
    ConnHeap,
}

impl RegionId {
    pub const fn screen(self) -> Screen {
        match self {
            Self::MenuState | Self::MenuAxes => Screen::MainMenu,
            Self::StatusState | Self::StatusFile | Self::StatusAxes | Self::StatusFeedSpindle => {
                Screen::Status
            }
            Self::JogAxisDisplay | Self::JogAxisGroup | Self::JogIncrementGroup => {
                Screen::JogHoming
            }
            Self::WorkCoordGroup | Self::WorkMachinePos | Self::WorkWorkPos => Screen::WorkArea,
            Self::ProbeKindGroup | Self::ProbeReadout => Screen::Probing,
            Self::FeedsLive | Self::FeedOverrideGroup | Self::SpindleOverrideGroup => {
                Screen::FeedsSpeeds
            }
            Self::SpindleRpm | Self::SpindleDirectionGroup | Self::SpindlePresetGroup => {
                Screen::SpindleControl
            }
            Self::SdFileList => Screen::SdCard,
            Self::ConnVersions | Self::ConnLink | Self::ConnHeap => Screen::ConnectionInfo,
        }
    }

    pub fn spec(self) -> Option<&'static RegionSpec> {
        self.screen()
            .layout()
            .regions
            .iter()
            .find(|spec| spec.id == self)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct RegionSpec {
    pub id: RegionId,
    pub rect: Rectangle,
    /// Sits inside a static panel, so it clears to the panel color.
    pub on_panel: bool,
}

impl RegionSpec {
    pub fn background(&self) -> Rgb565 {
        if self.on_panel {
            theme::DARKER_BG
        } else {
            theme::BACKGROUND
        }
    }
}

/// Static rounded panel with an optional caption at its top-left.
#[derive(Clone, Copy, Debug)]
pub struct Panel {
    pub rect: Rectangle,
    pub caption: &'static str,
}

/// Free-standing caption above a control group.
#[derive(Clone, Copy, Debug)]
pub struct Caption {
    pub at: Point,
    pub text: &'static str,
}

/// Everything needed to paint and hit-test one screen.
#[derive(Debug)]
pub struct ScreenLayout {
    pub title: &'static str,
    pub panels: &'static [Panel],
    pub captions: &'static [Caption],
    /// In hit-test order, which is also drawing order.
    pub controls: &'static [Control],
    pub regions: &'static [RegionSpec],
}

impl ScreenLayout {
    /// First control containing `point`.
    pub fn hit_test(&'static self, point: Point) -> Option<&'static Control> {
        self.controls
            .iter()
            .find(|control| control.rect.contains(point))
    }
}

/// Read-only snapshot handed to region painters.
#[derive(Clone, Copy, Debug)]
pub struct View<'a> {
    pub telemetry: &'a Telemetry,
    pub selection: &'a Selection,
    pub orientation: Orientation,
}

/// Paints the content of one region in screen coordinates.
pub trait RegionPainter {
    fn paint<D>(&self, region: RegionId, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>;
}

impl RegionPainter for View<'_> {
    fn paint<D>(&self, region: RegionId, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        paint_region(region, self, target)
    }
}

pub(crate) const fn rect(x: i32, y: i32, width: u32, height: u32) -> Rectangle {
    Rectangle::new(Point::new(x, y), Size::new(width, height))
}
