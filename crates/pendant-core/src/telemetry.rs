//! Last-known machine state, written by the controller poller.

use heapless::{String, Vec};
use log::warn;

use crate::{
    command::LINE_BYTES,
    selection::{Axis, CoordSystem, SpindleDirection},
};

/// Longest name that still fits `$SD/Delete=/{name}\n` in one command line.
pub const FILE_NAME_BYTES: usize = LINE_BYTES - "$SD/Delete=/\n".len();
pub const MAX_SD_FILES: usize = 16;
pub const VERSION_BYTES: usize = 16;
pub const PORT_BYTES: usize = 24;

/// Controller run state as reported in status reports.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MachineState {
    Idle,
    Run,
    Hold,
    Jog,
    Alarm,
    Door,
    Check,
    Home,
    Sleep,
}

impl MachineState {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Run => "RUN",
            Self::Hold => "HOLD",
            Self::Jog => "JOG",
            Self::Alarm => "ALARM",
            Self::Door => "DOOR",
            Self::Check => "CHECK",
            Self::Home => "HOME",
            Self::Sleep => "SLEEP",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Telemetry {
    pub state: MachineState,
    pub machine_pos: [f32; Axis::COUNT],
    pub work_pos: [f32; Axis::COUNT],
    pub feed_rate: u32,
    pub spindle_rpm: u32,
    pub spindle_direction: SpindleDirection,
    pub feed_override: u16,
    pub spindle_override: u16,
    pub current_file: String<FILE_NAME_BYTES>,
    pub sd_files: Vec<String<FILE_NAME_BYTES>, MAX_SD_FILES>,
    pub controller_version: String<VERSION_BYTES>,
    pub pendant_version: String<VERSION_BYTES>,
    pub baud_rate: u32,
    pub port: String<PORT_BYTES>,
    pub connected: bool,
    pub free_heap_kb: u32,
    pub work_coordinates: CoordSystem,
}

impl Default for Telemetry {
    fn default() -> Self {
        Self::new()
    }
}

impl Telemetry {
    pub fn new() -> Self {
        Self {
            state: MachineState::Idle,
            machine_pos: [0.0; Axis::COUNT],
            work_pos: [0.0; Axis::COUNT],
            feed_rate: 0,
            spindle_rpm: 0,
            spindle_direction: SpindleDirection::Forward,
            feed_override: 100,
            spindle_override: 100,
            current_file: String::new(),
            sd_files: Vec::new(),
            controller_version: String::new(),
            pendant_version: String::new(),
            baud_rate: 115_200,
            port: String::new(),
            connected: false,
            free_heap_kb: 0,
            work_coordinates: CoordSystem::G54,
        }
    }

    pub fn is_alarm(&self) -> bool {
        self.state == MachineState::Alarm
    }

    pub fn machine_position(&self, axis: Axis) -> f32 {
        self.machine_pos[axis.index()]
    }

    pub fn work_position(&self, axis: Axis) -> f32 {
        self.work_pos[axis.index()]
    }

    pub fn sd_file(&self, index: usize) -> Option<&str> {
        self.sd_files.get(index).map(|name| name.as_str())
    }

    /// Replaces the SD listing. Names too long to address in a command are
    /// left out rather than shortened; the count is capped at capacity.
    pub fn set_sd_files<'a, I>(&mut self, names: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.sd_files.clear();
        for name in names {
            let Ok(entry) = String::try_from(name) else {
                warn!("ui: sd file name too long, not listed: {}", name);
                continue;
            };
            if self.sd_files.push(entry).is_err() {
                break;
            }
        }
    }

    pub fn set_current_file(&mut self, name: &str) {
        self.current_file.clear();
        push_truncated(&mut self.current_file, name);
    }
}

/// Copies as many whole chars of `src` as fit.
pub fn push_truncated<const N: usize>(dst: &mut String<N>, src: &str) {
    for ch in src.chars() {
        if dst.push(ch).is_err() {
            break;
        }
    }
}
