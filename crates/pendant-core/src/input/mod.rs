//! Raw input sampling and the trackers that turn levels into events.

mod debounce;
mod encoder;
mod idle;

pub use debounce::DebounceTracker;
pub use encoder::{EncoderTracker, RateLimiter, Rotation};
pub use idle::IdleInput;

/// Physical buttons, in service order.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Button {
    /// Emergency stop.
    Red,
    /// Pause, or alarm clear while the controller is in alarm.
    Yellow,
    /// Cycle start.
    Green,
}

impl Button {
    pub const COUNT: usize = 3;
    pub const ALL: [Self; Self::COUNT] = [Self::Red, Self::Yellow, Self::Green];
}

/// Line levels read in one poll. Buttons are active-low.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RawLevels {
    pub buttons_high: [bool; Button::COUNT],
    pub clock_high: bool,
    pub data_high: bool,
}

impl RawLevels {
    /// All buttons released, encoder at rest.
    pub const IDLE: Self = Self {
        buttons_high: [true; Button::COUNT],
        clock_high: true,
        data_high: true,
    };

    pub const fn pressed(&self, button: Button) -> bool {
        !self.buttons_high[button as usize]
    }
}

/// Polled source for button and encoder lines.
pub trait InputSource {
    type Error;

    fn sample(&mut self) -> Result<RawLevels, Self::Error>;
}
