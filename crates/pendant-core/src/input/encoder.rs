/// Detent direction.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Rotation {
    Forward,
    Reverse,
}

impl Rotation {
    pub const fn sign(self) -> f32 {
        match self {
            Self::Forward => 1.0,
            Self::Reverse => -1.0,
        }
    }
}

/// Clock-edge detector for a two-line encoder.
///
/// A high-to-low clock edge is one tick; the data level sampled at that
/// edge gives the direction (high = forward).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EncoderTracker {
    last_clock_high: bool,
}

impl Default for EncoderTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl EncoderTracker {
    pub const fn new() -> Self {
        Self {
            last_clock_high: true,
        }
    }

    pub fn update(&mut self, clock_high: bool, data_high: bool) -> Option<Rotation> {
        let falling = self.last_clock_high && !clock_high;
        self.last_clock_high = clock_high;

        if !falling {
            return None;
        }

        Some(if data_high {
            Rotation::Forward
        } else {
            Rotation::Reverse
        })
    }
}

/// Accepts at most one event per window; rejected events do not extend it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RateLimiter {
    window_ms: u64,
    last_accepted_ms: Option<u64>,
}

impl RateLimiter {
    pub const fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            last_accepted_ms: None,
        }
    }

    pub fn accept(&mut self, now_ms: u64) -> bool {
        if let Some(last) = self.last_accepted_ms
            && now_ms.saturating_sub(last) < self.window_ms
        {
            return false;
        }

        self.last_accepted_ms = Some(now_ms);
        true
    }
}
