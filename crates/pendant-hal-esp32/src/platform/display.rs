use embedded_graphics::{
    Pixel,
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Point, Size},
    pixelcolor::Rgb565,
    primitives::Rectangle,
};
use embedded_hal::{
    digital::{InputPin, OutputPin},
    spi::SpiDevice,
};
use log::warn;
use mipidsi::{
    Display,
    interface::{Interface, InterfacePixelFormat},
    models::Model,
    options::{Orientation as PanelOrientation, Rotation},
};
use pendant_core::{settings::Orientation, surface::Surface};

use crate::touch::xpt2046::Xpt2046;

/// Panel rotation for each pendant orientation.
pub const fn rotation_for(orientation: Orientation) -> Rotation {
    match orientation {
        Orientation::Normal => Rotation::Deg180,
        Orientation::Flipped => Rotation::Deg0,
    }
}

/// ILI9341 panel, XPT2046 touch layer, and allocator probe of the CYD board.
pub struct CydSurface<DI, MODEL, RST, TSPI, TIRQ>
where
    DI: Interface,
    MODEL: Model<ColorFormat = Rgb565>,
    Rgb565: InterfacePixelFormat<DI::Word>,
    RST: OutputPin,
{
    display: Display<DI, MODEL, RST>,
    touch: Xpt2046<TSPI, TIRQ>,
    free_heap: fn() -> usize,
    touch_fault: bool,
}

impl<DI, MODEL, RST, TSPI, TIRQ> CydSurface<DI, MODEL, RST, TSPI, TIRQ>
where
    DI: Interface,
    MODEL: Model<ColorFormat = Rgb565>,
    Rgb565: InterfacePixelFormat<DI::Word>,
    RST: OutputPin,
    TSPI: SpiDevice<u8>,
    TIRQ: InputPin,
{
    pub fn new(
        display: Display<DI, MODEL, RST>,
        touch: Xpt2046<TSPI, TIRQ>,
        free_heap: fn() -> usize,
    ) -> Self {
        Self {
            display,
            touch,
            free_heap,
            touch_fault: false,
        }
    }

    pub fn release(self) -> (Display<DI, MODEL, RST>, Xpt2046<TSPI, TIRQ>) {
        (self.display, self.touch)
    }
}

impl<DI, MODEL, RST, TSPI, TIRQ> DrawTarget for CydSurface<DI, MODEL, RST, TSPI, TIRQ>
where
    DI: Interface,
    MODEL: Model<ColorFormat = Rgb565>,
    Rgb565: InterfacePixelFormat<DI::Word>,
    RST: OutputPin,
{
    type Color = Rgb565;
    type Error = DI::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.display.draw_iter(pixels)
    }

    fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        self.display.fill_contiguous(area, colors)
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        self.display.fill_solid(area, color)
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.display.clear(color)
    }
}

impl<DI, MODEL, RST, TSPI, TIRQ> OriginDimensions for CydSurface<DI, MODEL, RST, TSPI, TIRQ>
where
    DI: Interface,
    MODEL: Model<ColorFormat = Rgb565>,
    Rgb565: InterfacePixelFormat<DI::Word>,
    RST: OutputPin,
{
    fn size(&self) -> Size {
        self.display.size()
    }
}

impl<DI, MODEL, RST, TSPI, TIRQ> Surface for CydSurface<DI, MODEL, RST, TSPI, TIRQ>
where
    DI: Interface,
    MODEL: Model<ColorFormat = Rgb565>,
    Rgb565: InterfacePixelFormat<DI::Word>,
    RST: OutputPin,
    TSPI: SpiDevice<u8>,
    TIRQ: InputPin,
{
    fn free_heap_bytes(&self) -> usize {
        (self.free_heap)()
    }

    fn touch(&mut self) -> Option<Point> {
        match self.touch.read() {
            Ok(point) => {
                self.touch_fault = false;
                point
            }
            Err(_) => {
                if !self.touch_fault {
                    warn!("input: touch controller read failed");
                }
                self.touch_fault = true;
                None
            }
        }
    }

    fn set_orientation(&mut self, orientation: Orientation) -> Result<(), Self::Error> {
        self.display
            .set_orientation(PanelOrientation::new().rotate(rotation_for(orientation)))?;
        self.touch.set_orientation(orientation);
        Ok(())
    }
}
