//! Painters for static screen chrome, buttons, and cached regions.
//!
//! Everything draws in panel coordinates; callers translate or clip.

use core::fmt::{Arguments, Write};

use embedded_graphics::{
    Drawable,
    draw_target::DrawTarget,
    geometry::{Point, Size},
    mono_font::MonoTextStyle,
    pixelcolor::Rgb565,
    primitives::{Primitive, PrimitiveStyle, Rectangle, RoundedRectangle},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};
use heapless::String;
use pendant_canvas::panel;

use super::{
    Action, ButtonStyle, Control, Font, RegionId, RegionSpec, ScreenLayout, View,
    theme::{self, BUTTON_GRAY, DARKER_BG, GRAY_TEXT, GREEN, ORANGE, RED, WHITE},
};
use crate::{
    selection::{Axis, SdBrowser},
    settings::Orientation,
};

type Label = String<32>;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ButtonLook {
    Normal,
    /// Inverted colors shown while a press is acknowledged.
    Pressed,
}

fn label(args: Arguments<'_>) -> Label {
    let mut out = Label::new();
    // Overflow keeps the prefix, which is what the panel can show anyway.
    let _ = out.write_fmt(args);
    out
}

fn text<D>(
    target: &mut D,
    content: &str,
    at: Point,
    font: Font,
    color: Rgb565,
    alignment: Alignment,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let style = MonoTextStyle::new(theme::font(font), color);
    let baseline = match alignment {
        Alignment::Center => Baseline::Middle,
        _ => Baseline::Top,
    };
    let text_style = TextStyleBuilder::new()
        .alignment(alignment)
        .baseline(baseline)
        .build();
    Text::with_text_style(content, at, style, text_style).draw(target)?;
    Ok(())
}

fn small_caption<D>(target: &mut D, content: &str, at: Point) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    text(target, content, at, Font::Small, GRAY_TEXT, Alignment::Left)
}

fn rounded<D>(target: &mut D, rect: Rectangle, fill: Rgb565) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let radius = Size::new(theme::CORNER_RADIUS, theme::CORNER_RADIUS);
    RoundedRectangle::with_equal_corners(rect, radius)
        .into_styled(PrimitiveStyle::with_fill(fill))
        .draw(target)
}

fn face<D>(
    target: &mut D,
    rect: Rectangle,
    content: &str,
    font: Font,
    fill: Rgb565,
    ink: Rgb565,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    rounded(target, rect, fill)?;
    text(target, content, rect.center(), font, ink, Alignment::Center)
}

/// Clears the panel and draws the title bar, panels, captions, and every
/// button that is not owned by a region.
pub fn paint_static<D>(layout: &ScreenLayout, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    target.clear(theme::BACKGROUND)?;

    let bar = Rectangle::new(
        Point::zero(),
        Size::new(panel::WIDTH as u32, theme::TITLE_BAR_HEIGHT),
    );
    bar.into_styled(PrimitiveStyle::with_fill(DARKER_BG))
        .draw(target)?;
    text(
        target,
        layout.title,
        bar.center(),
        Font::Large,
        theme::TITLE,
        Alignment::Center,
    )?;

    for panel in layout.panels {
        rounded(target, panel.rect, DARKER_BG)?;
        if !panel.caption.is_empty() {
            small_caption(target, panel.caption, panel.rect.top_left + Point::new(5, 5))?;
        }
    }

    for caption in layout.captions {
        small_caption(target, caption.text, caption.at)?;
    }

    for control in layout
        .controls
        .iter()
        .filter(|c| c.style != ButtonStyle::Toggle)
    {
        draw_button(target, control, ButtonLook::Normal)?;
    }

    Ok(())
}

pub fn draw_button<D>(target: &mut D, control: &Control, look: ButtonLook) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let fill = theme::button_fill(control.style, false);
    match look {
        ButtonLook::Normal => face(target, control.rect, control.label, control.font, fill, WHITE),
        ButtonLook::Pressed => face(target, control.rect, control.label, control.font, WHITE, fill),
    }
}

/// Paints the content of `region`, assuming its background is already laid.
pub fn paint_region<D>(region: RegionId, view: &View<'_>, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let Some(spec) = region.spec() else {
        return Ok(());
    };
    let rect = spec.rect;
    let origin = rect.top_left;
    let telemetry = view.telemetry;
    let selection = view.selection;

    match region {
        RegionId::MenuState => text(
            target,
            telemetry.state.label(),
            rect.center(),
            Font::Large,
            theme::state_color(telemetry.state),
            Alignment::Center,
        ),
        RegionId::MenuAxes => axis_grid(target, origin, Point::new(70, 22), Font::Medium, |axis| {
            label(format_args!("{}{:.1}", axis.label(), telemetry.machine_position(axis)))
        }),
        RegionId::StatusState => {
            text(
                target,
                telemetry.state.label(),
                origin,
                Font::Large,
                theme::state_color(telemetry.state),
                Alignment::Left,
            )?;
            text(
                target,
                telemetry.work_coordinates.label(),
                origin + Point::new(rect.size.width as i32, 4),
                Font::Medium,
                ORANGE,
                Alignment::Right,
            )
        }
        RegionId::StatusFile => {
            if telemetry.current_file.is_empty() {
                text(target, "(none)", origin, Font::Medium, GRAY_TEXT, Alignment::Left)
            } else {
                text(target, &telemetry.current_file, origin, Font::Medium, WHITE, Alignment::Left)
            }
        }
        RegionId::StatusAxes => axis_grid(target, origin, Point::new(110, 22), Font::Medium, |axis| {
            label(format_args!("{}: {:.2}", axis.label(), telemetry.machine_position(axis)))
        }),
        RegionId::StatusFeedSpindle => {
            let half = Size::new(112, rect.size.height);
            let feed = Rectangle::new(origin, half);
            let spindle = Rectangle::new(origin + Point::new(118, 0), half);
            let feed_override = label(format_args!("{}%", telemetry.feed_override));
            let spindle_override = label(format_args!("{}%", telemetry.spindle_override));
            value_panel(
                target,
                feed,
                "FEED",
                &label(format_args!("{}", telemetry.feed_rate)),
                &feed_override,
            )?;
            value_panel(
                target,
                spindle,
                "SPINDLE",
                &label(format_args!("{}", telemetry.spindle_rpm)),
                &spindle_override,
            )
        }
        RegionId::JogAxisDisplay => {
            let axis = selection.axis;
            rounded(target, rect, DARKER_BG)?;
            small_caption(target, "SELECTED AXIS", origin + Point::new(5, 5))?;
            text(
                target,
                axis.label(),
                origin + Point::new(10, 20),
                Font::Large,
                ORANGE,
                Alignment::Left,
            )?;
            text(
                target,
                &label(format_args!("{:.3}", telemetry.machine_position(axis))),
                origin + Point::new(40, 20),
                Font::Large,
                WHITE,
                Alignment::Left,
            )?;
            small_caption(
                target,
                &label(format_args!("STEP {} mm", selection.increment.label())),
                origin + Point::new(150, 5),
            )
        }
        RegionId::JogAxisGroup
        | RegionId::JogIncrementGroup
        | RegionId::WorkCoordGroup
        | RegionId::ProbeKindGroup
        | RegionId::SpindleDirectionGroup
        | RegionId::SpindlePresetGroup => toggles(target, spec, view),
        RegionId::FeedOverrideGroup => {
            toggles(target, spec, view)?;
            readout(
                target,
                origin + Point::new(78, 42),
                selection.feed_override.label(),
            )
        }
        RegionId::SpindleOverrideGroup => {
            toggles(target, spec, view)?;
            readout(
                target,
                origin + Point::new(78, 42),
                selection.spindle_override.label(),
            )
        }
        RegionId::WorkMachinePos => position_panel(target, rect, |axis| {
            telemetry.machine_position(axis)
        }),
        RegionId::WorkWorkPos => position_panel(target, rect, |axis| telemetry.work_position(axis)),
        RegionId::ProbeReadout => {
            let axis = selection.probe.axis();
            let half = Size::new(112, rect.size.height);
            value_panel(
                target,
                Rectangle::new(origin, half),
                &label(format_args!("{} MACHINE", axis.label())),
                &label(format_args!("{:.3}", telemetry.machine_position(axis))),
                "",
            )?;
            value_panel(
                target,
                Rectangle::new(origin + Point::new(118, 0), half),
                &label(format_args!("{} WORK", axis.label())),
                &label(format_args!("{:.3}", telemetry.work_position(axis))),
                selection.probe.label(),
            )
        }
        RegionId::FeedsLive => {
            let half = Size::new(112, rect.size.height);
            value_row(
                target,
                Rectangle::new(origin, half),
                "FEED",
                &label(format_args!("{}", telemetry.feed_rate)),
            )?;
            value_row(
                target,
                Rectangle::new(origin + Point::new(118, 0), half),
                "RPM",
                &label(format_args!("{}", telemetry.spindle_rpm)),
            )
        }
        RegionId::SpindleRpm => {
            let color = if telemetry.spindle_rpm > 0 { GREEN } else { GRAY_TEXT };
            rounded(target, rect, DARKER_BG)?;
            small_caption(target, "SPINDLE RPM", origin + Point::new(5, 5))?;
            text(
                target,
                &label(format_args!("{}", telemetry.spindle_rpm)),
                rect.center() + Point::new(0, 6),
                Font::Large,
                color,
                Alignment::Center,
            )?;
            small_caption(
                target,
                telemetry.spindle_direction.label(),
                origin + Point::new(200, 5),
            )?;
            small_caption(
                target,
                &label(format_args!("TARGET {}", selection.spindle_preset.rpm())),
                origin + Point::new(5, 47),
            )
        }
        RegionId::SdFileList => file_rows(target, rect, view),
        RegionId::ConnVersions => {
            let half = Size::new(rect.size.width, 50);
            let pendant = version_or_dash(&telemetry.pendant_version);
            let controller = version_or_dash(&telemetry.controller_version);
            value_row(target, Rectangle::new(origin, half), "PENDANT VERSION", pendant)?;
            value_row(
                target,
                Rectangle::new(origin + Point::new(0, 56), half),
                "CONTROLLER VERSION",
                controller,
            )
        }
        RegionId::ConnLink => {
            rounded(target, rect, DARKER_BG)?;
            small_caption(target, "CONNECTION", origin + Point::new(5, 5))?;
            let (status, color) = if telemetry.connected {
                ("Connected", GREEN)
            } else {
                ("Disconnected", RED)
            };
            text(
                target,
                status,
                origin + Point::new(10, 20),
                Font::Medium,
                color,
                Alignment::Left,
            )?;
            let port = if telemetry.port.is_empty() {
                "--"
            } else {
                telemetry.port.as_str()
            };
            text(
                target,
                &label(format_args!("Port: {port}")),
                origin + Point::new(10, 40),
                Font::Small,
                WHITE,
                Alignment::Left,
            )?;
            text(
                target,
                &label(format_args!("Baud: {}", telemetry.baud_rate)),
                origin + Point::new(10, 54),
                Font::Small,
                WHITE,
                Alignment::Left,
            )
        }
        RegionId::ConnHeap => {
            rounded(target, rect, DARKER_BG)?;
            small_caption(target, "FREE HEAP", origin + Point::new(5, 5))?;
            text(
                target,
                &label(format_args!("{} KB", telemetry.free_heap_kb)),
                origin + Point::new(10, 18),
                Font::Medium,
                WHITE,
                Alignment::Left,
            )?;
            let rotation = match view.orientation {
                Orientation::Normal => "ROT 180",
                Orientation::Flipped => "ROT 0",
            };
            text(
                target,
                rotation,
                origin + Point::new(160, 18),
                Font::Medium,
                ORANGE,
                Alignment::Left,
            )
        }
    }
}

fn version_or_dash(version: &str) -> &str {
    if version.is_empty() { "--" } else { version }
}

/// Two-by-two grid of per-axis labels.
fn axis_grid<D, F>(
    target: &mut D,
    origin: Point,
    pitch: Point,
    font: Font,
    mut cell: F,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
    F: FnMut(Axis) -> Label,
{
    for axis in Axis::ALL {
        let i = axis.index() as i32;
        let at = origin + Point::new((i % 2) * pitch.x, (i / 2) * pitch.y);
        text(target, &cell(axis), at, font, WHITE, Alignment::Left)?;
    }
    Ok(())
}

fn position_panel<D, F>(target: &mut D, rect: Rectangle, position: F) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
    F: Fn(Axis) -> f32,
{
    rounded(target, rect, DARKER_BG)?;
    axis_grid(
        target,
        rect.top_left + Point::new(8, 4),
        Point::new(112, 17),
        Font::Medium,
        |axis| label(format_args!("{} {:.2}", axis.label(), position(axis))),
    )
}

/// Panel with a caption, a large value, and an optional footnote.
fn value_panel<D>(
    target: &mut D,
    rect: Rectangle,
    caption: &str,
    value: &str,
    note: &str,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    rounded(target, rect, DARKER_BG)?;
    small_caption(target, caption, rect.top_left + Point::new(5, 5))?;
    text(
        target,
        value,
        rect.top_left + Point::new(5, 20),
        Font::Large,
        WHITE,
        Alignment::Left,
    )?;
    if !note.is_empty() {
        text(
            target,
            note,
            rect.top_left + Point::new(5, 44),
            Font::Small,
            ORANGE,
            Alignment::Left,
        )?;
    }
    Ok(())
}

/// Panel with a caption and one medium-sized value.
fn value_row<D>(target: &mut D, rect: Rectangle, caption: &str, value: &str) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    rounded(target, rect, DARKER_BG)?;
    small_caption(target, caption, rect.top_left + Point::new(5, 4))?;
    text(
        target,
        value,
        rect.top_left + Point::new(5, 16),
        Font::Medium,
        WHITE,
        Alignment::Left,
    )
}

fn readout<D>(target: &mut D, top_left: Point, value: &str) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    face(
        target,
        Rectangle::new(top_left, Size::new(72, 37)),
        value,
        Font::Medium,
        DARKER_BG,
        ORANGE,
    )
}

/// Draws every toggle of the region's screen that lies inside the region.
fn toggles<D>(target: &mut D, spec: &RegionSpec, view: &View<'_>) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let controls = spec.id.screen().layout().controls;
    for control in controls.iter().filter(|c| {
        c.style == ButtonStyle::Toggle && spec.rect.intersection(&c.rect) == c.rect
    }) {
        let selected = control.action.is_selected(view.selection);
        let fill = theme::button_fill(ButtonStyle::Toggle, selected);
        face(target, control.rect, control.label, control.font, fill, WHITE)?;
    }
    Ok(())
}

fn file_rows<D>(target: &mut D, area: Rectangle, view: &View<'_>) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let telemetry = view.telemetry;
    let browser = view.selection.sd;
    let rows = RegionId::SdFileList.screen().layout().controls.iter().filter_map(|c| match c.action {
        Action::SelectFileRow(row) => Some((row as usize, c.rect)),
        _ => None,
    });

    if telemetry.sd_files.is_empty() {
        return text(
            target,
            "No files",
            area.center(),
            Font::Medium,
            GRAY_TEXT,
            Alignment::Center,
        );
    }

    for (row, rect) in rows.take(SdBrowser::VISIBLE_ROWS) {
        let index = browser.scroll() + row;
        let Some(name) = telemetry.sd_file(index) else {
            break;
        };
        let fill = if index == browser.selected() { ORANGE } else { BUTTON_GRAY };
        rounded(target, rect, fill)?;
        let middle = rect.center().y;
        text(
            target,
            name,
            Point::new(rect.top_left.x + 8, middle - 7),
            Font::Medium,
            WHITE,
            Alignment::Left,
        )?;
    }
    Ok(())
}
