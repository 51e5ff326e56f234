use embedded_hal::digital::InputPin;

use pendant_core::input::{InputSource, RawLevels};

#[derive(Debug, Clone, Copy, Default)]
pub struct PanelInputConfig {
    direction_inverted: bool,
}

impl PanelInputConfig {
    /// Swaps which data level counts as forward.
    pub const fn with_direction_inverted(mut self, direction_inverted: bool) -> Self {
        self.direction_inverted = direction_inverted;
        self
    }
}

#[derive(Debug)]
pub enum PanelInputError<RedErr, YellowErr, GreenErr, ClkErr, DtErr> {
    Red(RedErr),
    Yellow(YellowErr),
    Green(GreenErr),
    Clock(ClkErr),
    Data(DtErr),
}

type PanelResult<R, Y, G, C, D, T> = Result<T, PanelInputError<R, Y, G, C, D>>;

/// Three pulled-up push buttons plus the encoder's clock and data lines.
#[derive(Debug)]
pub struct PanelInputs<RED, YELLOW, GREEN, CLK, DT> {
    red: RED,
    yellow: YELLOW,
    green: GREEN,
    clk: CLK,
    dt: DT,
    config: PanelInputConfig,
}

impl<RED, YELLOW, GREEN, CLK, DT> PanelInputs<RED, YELLOW, GREEN, CLK, DT>
where
    RED: InputPin,
    YELLOW: InputPin,
    GREEN: InputPin,
    CLK: InputPin,
    DT: InputPin,
{
    pub fn new(
        red: RED,
        yellow: YELLOW,
        green: GREEN,
        clk: CLK,
        dt: DT,
        config: PanelInputConfig,
    ) -> Self {
        Self {
            red,
            yellow,
            green,
            clk,
            dt,
            config,
        }
    }

    fn read_levels(
        &mut self,
    ) -> PanelResult<RED::Error, YELLOW::Error, GREEN::Error, CLK::Error, DT::Error, RawLevels>
    {
        let red = self.red.is_high().map_err(PanelInputError::Red)?;
        let yellow = self.yellow.is_high().map_err(PanelInputError::Yellow)?;
        let green = self.green.is_high().map_err(PanelInputError::Green)?;
        let clock_high = self.clk.is_high().map_err(PanelInputError::Clock)?;
        let dt_high = self.dt.is_high().map_err(PanelInputError::Data)?;

        Ok(RawLevels {
            buttons_high: [red, yellow, green],
            clock_high,
            data_high: dt_high != self.config.direction_inverted,
        })
    }
}

impl<RED, YELLOW, GREEN, CLK, DT> InputSource for PanelInputs<RED, YELLOW, GREEN, CLK, DT>
where
    RED: InputPin,
    YELLOW: InputPin,
    GREEN: InputPin,
    CLK: InputPin,
    DT: InputPin,
{
    type Error = PanelInputError<RED::Error, YELLOW::Error, GREEN::Error, CLK::Error, DT::Error>;

    fn sample(&mut self) -> Result<RawLevels, Self::Error> {
        self.read_levels()
    }
}
