use super::{InputSource, RawLevels};

/// No-hardware input source for boards without buttons or encoder fitted.
#[derive(Default, Debug, Clone, Copy)]
pub struct IdleInput;

impl IdleInput {
    pub const fn new() -> Self {
        Self
    }
}

impl InputSource for IdleInput {
    type Error = core::convert::Infallible;

    fn sample(&mut self) -> Result<RawLevels, Self::Error> {
        Ok(RawLevels::IDLE)
    }
}
