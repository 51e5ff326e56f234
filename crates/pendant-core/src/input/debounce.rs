/// Per-button debounce state.
///
/// A press is confirmed once the raw level has held for the whole window.
/// Each depression yields one press; the confirmed release re-arms it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DebounceTracker {
    window_ms: u64,
    last_raw: bool,
    stable: bool,
    last_change_ms: u64,
    delivered: bool,
}

impl DebounceTracker {
    pub const fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            last_raw: false,
            stable: false,
            last_change_ms: 0,
            delivered: false,
        }
    }

    /// Feeds one sample. Returns `true` exactly once per confirmed press.
    pub fn update(&mut self, pressed: bool, now_ms: u64) -> bool {
        if pressed != self.last_raw {
            self.last_raw = pressed;
            self.last_change_ms = now_ms;
            return false;
        }

        if now_ms.saturating_sub(self.last_change_ms) < self.window_ms {
            return false;
        }

        if self.stable != self.last_raw {
            self.stable = self.last_raw;
            if !self.stable {
                self.delivered = false;
            }
        }

        if self.stable && !self.delivered {
            self.delivered = true;
            return true;
        }

        false
    }

    pub const fn is_pressed(&self) -> bool {
        self.stable
    }
}
