//! Text commands sent to the motion controller.

use core::fmt::Write;

use heapless::String;

use crate::selection::{Axis, CoordSystem, ProbeKind, SpindleDirection};

/// Upper bound on one rendered line, newline included.
pub const LINE_BYTES: usize = 64;

pub type CommandLine = String<LINE_BYTES>;

/// Feed and travel parameters that are not part of the operator's selection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionParams {
    pub jog_feed_mm_min: u32,
    pub probe_feed_mm_min: u32,
    pub probe_distance_mm: u32,
}

impl MotionParams {
    pub const fn new() -> Self {
        Self {
            jog_feed_mm_min: 1_000,
            probe_feed_mm_min: 100,
            probe_distance_mm: 25,
        }
    }
}

impl Default for MotionParams {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command<'a> {
    Home(Axis),
    ZeroAxis(CoordSystem, Axis),
    ZeroAll(CoordSystem),
    Jog { axis: Axis, distance_mm: f32 },
    SpindleStart(SpindleDirection, u32),
    SpindleStop,
    FeedHold,
    CycleResume,
    ClearAlarm,
    RunMacro(u8),
    RunFile(&'a str),
    DeleteFile(&'a str),
    Probe(ProbeKind),
}

impl Command<'_> {
    /// Renders the newline-terminated line.
    ///
    /// Returns `None` when the line does not fit, which only happens for
    /// file names near the buffer size.
    pub fn to_line(&self, params: &MotionParams) -> Option<CommandLine> {
        let mut line = CommandLine::new();
        self.write_line(&mut line, params).ok()?;
        Some(line)
    }

    fn write_line(&self, out: &mut CommandLine, params: &MotionParams) -> core::fmt::Result {
        match *self {
            Self::Home(axis) => write!(out, "$H{}", axis.label())?,
            Self::ZeroAxis(cs, axis) => write!(out, "G10 L20 P{} {}0", cs.p_number(), axis.label())?,
            Self::ZeroAll(cs) => write!(out, "G10 L20 P{} X0 Y0 Z0 A0", cs.p_number())?,
            Self::Jog { axis, distance_mm } => write!(
                out,
                "$J=G91 G21 {}{:.3} F{}",
                axis.label(),
                distance_mm,
                params.jog_feed_mm_min
            )?,
            Self::SpindleStart(SpindleDirection::Forward, rpm) => write!(out, "M3 S{rpm}")?,
            Self::SpindleStart(SpindleDirection::Reverse, rpm) => write!(out, "M4 S{rpm}")?,
            Self::SpindleStop => out.push_str("M5").map_err(|_| core::fmt::Error)?,
            Self::FeedHold => out.push('!').map_err(|_| core::fmt::Error)?,
            Self::CycleResume => out.push('~').map_err(|_| core::fmt::Error)?,
            Self::ClearAlarm => out.push_str("$X").map_err(|_| core::fmt::Error)?,
            Self::RunMacro(index) => write!(out, "$Macros/Run={index}")?,
            Self::RunFile(name) => write!(out, "$SD/Run=/{name}")?,
            Self::DeleteFile(name) => write!(out, "$SD/Delete=/{name}")?,
            Self::Probe(kind) => write!(
                out,
                "G38.2 {}-{} F{}",
                kind.axis().label(),
                params.probe_distance_mm,
                params.probe_feed_mm_min
            )?,
        }
        out.push('\n').map_err(|_| core::fmt::Error)
    }
}

/// Outbound line channel to the controller. Fire-and-forget.
pub trait CommandSink {
    type Error;

    fn send_line(&mut self, line: &str) -> Result<(), Self::Error>;
}
