use embedded_graphics::geometry::Point;
use embedded_hal::{digital::InputPin, spi::SpiDevice};
use pendant_canvas::panel;
use pendant_core::settings::Orientation;

const CMD_READ_X: u8 = 0xD0;
const CMD_READ_Y: u8 = 0x90;
const CMD_READ_Z1: u8 = 0xB0;
const CMD_READ_Z2: u8 = 0xC0;

const ADC_MAX: u16 = 0x0FFF;

/// Raw ADC span that maps onto the panel edges.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Calibration {
    pub x_min: u16,
    pub x_max: u16,
    pub y_min: u16,
    pub y_max: u16,
}

impl Calibration {
    pub const fn new() -> Self {
        Self {
            x_min: 200,
            x_max: 3700,
            y_min: 200,
            y_max: 3700,
        }
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Xpt2046Config {
    calibration: Calibration,
    pressure_threshold: u16,
}

impl Xpt2046Config {
    pub const fn new() -> Self {
        Self {
            calibration: Calibration::new(),
            pressure_threshold: 400,
        }
    }

    pub const fn with_calibration(mut self, calibration: Calibration) -> Self {
        self.calibration = calibration;
        self
    }

    /// Minimum `z1 + 4095 - z2` that counts as a press.
    pub const fn with_pressure_threshold(mut self, pressure_threshold: u16) -> Self {
        self.pressure_threshold = pressure_threshold;
        self
    }
}

impl Default for Xpt2046Config {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TouchError<SpiErr, IrqErr> {
    Bus(SpiErr),
    Irq(IrqErr),
}

pub type TouchResult<SpiErr, IrqErr, T> = Result<T, TouchError<SpiErr, IrqErr>>;

/// Resistive touch controller on its own SPI device; IRQ is active low.
#[derive(Debug)]
pub struct Xpt2046<SPI, IRQ> {
    spi: SPI,
    irq: IRQ,
    config: Xpt2046Config,
    orientation: Orientation,
}

impl<SPI, IRQ> Xpt2046<SPI, IRQ>
where
    SPI: SpiDevice<u8>,
    IRQ: InputPin,
{
    pub fn new(spi: SPI, irq: IRQ, config: Xpt2046Config) -> Self {
        Self {
            spi,
            irq,
            config,
            orientation: Orientation::default(),
        }
    }

    /// Follows the panel rotation so points land where they are drawn.
    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    /// One press in panel coordinates, or `None` when the panel is idle.
    pub fn read(&mut self) -> TouchResult<SPI::Error, IRQ::Error, Option<Point>> {
        if self.irq.is_high().map_err(TouchError::Irq)? {
            return Ok(None);
        }

        let z1 = self.read_channel(CMD_READ_Z1)?;
        let z2 = self.read_channel(CMD_READ_Z2)?;
        let pressure = z1.saturating_add(ADC_MAX).saturating_sub(z2);
        if pressure < self.config.pressure_threshold {
            return Ok(None);
        }

        let raw_x = self.read_channel(CMD_READ_X)?;
        let raw_y = self.read_channel(CMD_READ_Y)?;
        let cal = self.config.calibration;
        let x = map_axis(raw_x, cal.x_min, cal.x_max, panel::WIDTH as u16 - 1);
        let y = map_axis(raw_y, cal.y_min, cal.y_max, panel::HEIGHT as u16 - 1);

        let point = match self.orientation {
            Orientation::Flipped => Point::new(x as i32, y as i32),
            Orientation::Normal => Point::new(
                (panel::WIDTH as u16 - 1 - x) as i32,
                (panel::HEIGHT as u16 - 1 - y) as i32,
            ),
        };
        Ok(Some(point))
    }

    /// 12-bit result sits left-aligned in the two bytes after the command.
    fn read_channel(&mut self, command: u8) -> TouchResult<SPI::Error, IRQ::Error, u16> {
        let mut frame = [command, 0, 0];
        self.spi
            .transfer_in_place(&mut frame)
            .map_err(TouchError::Bus)?;
        Ok((u16::from_be_bytes([frame[1], frame[2]]) >> 3) & ADC_MAX)
    }
}

fn map_axis(raw: u16, min: u16, max: u16, screen_max: u16) -> u16 {
    if max <= min || raw <= min {
        return 0;
    }
    if raw >= max {
        return screen_max;
    }

    let offset = (raw - min) as u32;
    let range = (max - min) as u32;
    ((offset * screen_max as u32) / range) as u16
}
