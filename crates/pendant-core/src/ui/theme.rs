//! Palette and fonts.

use embedded_graphics::{
    mono_font::{
        MonoFont,
        ascii::{FONT_6X10, FONT_9X15, FONT_10X20},
    },
    pixelcolor::Rgb565,
};

use super::{ButtonStyle, Font};
use crate::telemetry::MachineState;

pub const BACKGROUND: Rgb565 = rgb565(0x0000);
pub const DARKER_BG: Rgb565 = rgb565(0x2104);
pub const TITLE: Rgb565 = rgb565(0xFD20);
pub const ORANGE: Rgb565 = rgb565(0xFD20);
pub const GRAY_TEXT: Rgb565 = rgb565(0x7BEF);
pub const GREEN: Rgb565 = rgb565(0x07E0);
pub const DARK_GREEN: Rgb565 = rgb565(0x0360);
pub const CYAN: Rgb565 = rgb565(0x07FF);
pub const BLUE: Rgb565 = rgb565(0x1C9F);
pub const RED: Rgb565 = rgb565(0xF800);
pub const WHITE: Rgb565 = rgb565(0xFFFF);
pub const BUTTON_GRAY: Rgb565 = rgb565(0x31A6);

pub const TITLE_BAR_HEIGHT: u32 = 35;
pub const CORNER_RADIUS: u32 = 5;

/// Splits a packed 5-6-5 word into channels.
pub const fn rgb565(raw: u16) -> Rgb565 {
    Rgb565::new(
        ((raw >> 11) & 0x1F) as u8,
        ((raw >> 5) & 0x3F) as u8,
        (raw & 0x1F) as u8,
    )
}

pub fn font(font: Font) -> &'static MonoFont<'static> {
    match font {
        Font::Small => &FONT_6X10,
        Font::Medium => &FONT_9X15,
        Font::Large => &FONT_10X20,
    }
}

/// Fill of an idle button.
pub fn button_fill(style: ButtonStyle, selected: bool) -> Rgb565 {
    match style {
        ButtonStyle::Nav => BLUE,
        ButtonStyle::Toggle if selected => ORANGE,
        ButtonStyle::Toggle | ButtonStyle::Neutral => BUTTON_GRAY,
        ButtonStyle::Go => DARK_GREEN,
        ButtonStyle::Stop => RED,
    }
}

pub fn state_color(state: MachineState) -> Rgb565 {
    match state {
        MachineState::Alarm => RED,
        MachineState::Run | MachineState::Jog => GREEN,
        MachineState::Hold | MachineState::Door => ORANGE,
        _ => CYAN,
    }
}
