//! Pendant state machine: navigation, periodic refresh, and input dispatch.

use embedded_hal::delay::DelayNs;
use log::{debug, info, warn};

use crate::{
    cache::{DEFAULT_HEADROOM_BYTES, RegionCache},
    command::{Command, CommandLine, CommandSink, MotionParams},
    input::{Button, DebounceTracker, EncoderTracker, InputSource, RateLimiter, RawLevels},
    selection::Selection,
    settings::{self, Orientation, SettingsStore},
    surface::Surface,
    telemetry::Telemetry,
    ui::{self, Action, ButtonLook, Control, RegionId, Screen, View},
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TickResult {
    NoRender,
    Rendered,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PendantConfig {
    pub button_debounce_ms: u64,
    pub jog_debounce_ms: u64,
    pub orientation_debounce_ms: u64,
    pub touch_interval_ms: u64,
    pub refresh_interval_ms: u64,
    pub press_animation_ms: u32,
    pub cache_headroom_bytes: usize,
    pub motion: MotionParams,
}

impl Default for PendantConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl PendantConfig {
    pub const fn new() -> Self {
        Self {
            button_debounce_ms: 50,
            jog_debounce_ms: 50,
            orientation_debounce_ms: 300,
            touch_interval_ms: 200,
            refresh_interval_ms: 100,
            press_animation_ms: 150,
            cache_headroom_bytes: DEFAULT_HEADROOM_BYTES,
            motion: MotionParams::new(),
        }
    }

    pub const fn with_button_debounce_ms(mut self, ms: u64) -> Self {
        self.button_debounce_ms = ms;
        self
    }

    pub const fn with_touch_interval_ms(mut self, ms: u64) -> Self {
        self.touch_interval_ms = ms;
        self
    }

    pub const fn with_refresh_interval_ms(mut self, ms: u64) -> Self {
        self.refresh_interval_ms = ms;
        self
    }

    pub const fn with_press_animation_ms(mut self, ms: u32) -> Self {
        self.press_animation_ms = ms;
        self
    }

    pub const fn with_cache_headroom_bytes(mut self, bytes: usize) -> Self {
        self.cache_headroom_bytes = bytes;
        self
    }

    pub const fn with_motion(mut self, motion: MotionParams) -> Self {
        self.motion = motion;
        self
    }
}

/// Current and previous screen.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Navigation {
    current: Screen,
    previous: Screen,
}

impl Navigation {
    const fn new() -> Self {
        Self {
            current: Screen::MainMenu,
            previous: Screen::MainMenu,
        }
    }

    fn go(&mut self, screen: Screen) {
        self.previous = self.current;
        self.current = screen;
    }
}

pub struct PendantApp<IN, OUT, ST>
where
    IN: InputSource,
    OUT: CommandSink,
    ST: SettingsStore,
{
    input: IN,
    commands: OUT,
    settings: ST,
    config: PendantConfig,
    telemetry: Telemetry,
    selection: Selection,
    nav: Navigation,
    cache: RegionCache,
    orientation: Orientation,
    buttons: [DebounceTracker; Button::COUNT],
    encoder: EncoderTracker,
    jog_limiter: RateLimiter,
    orientation_limiter: RateLimiter,
    touch_limiter: RateLimiter,
    last_refresh_ms: u64,
    input_fault: bool,
}

include!("navigation.rs");
include!("input.rs");
include!("runtime.rs");

#[cfg(test)]
mod tests;
