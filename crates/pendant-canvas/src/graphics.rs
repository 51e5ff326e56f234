use core::convert::Infallible;

use embedded_graphics_core::{
    Pixel,
    draw_target::DrawTarget,
    geometry::{Dimensions, OriginDimensions, Size},
    pixelcolor::{IntoStorage, Rgb565, raw::RawU16},
    primitives::Rectangle,
};

use crate::Sprite;

impl Sprite {
    /// Pixels as colors, row-major, for `fill_contiguous` blits.
    pub fn colors(&self) -> impl Iterator<Item = Rgb565> + '_ {
        self.raw().iter().map(|raw| Rgb565::from(RawU16::new(*raw)))
    }

    pub fn color_at(&self, x: usize, y: usize) -> Option<Rgb565> {
        self.pixel(x, y).map(|raw| Rgb565::from(RawU16::new(raw)))
    }
}

impl DrawTarget for Sprite {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 {
                continue;
            }

            let _ = self.set_pixel(point.x as usize, point.y as usize, color.into_storage());
        }

        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        self.fill_rect(
            area.top_left.x,
            area.top_left.y,
            area.size.width,
            area.size.height,
            color.into_storage(),
        );
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color.into_storage());
        Ok(())
    }
}

impl OriginDimensions for Sprite {
    fn size(&self) -> Size {
        Size::new(self.width() as u32, self.height() as u32)
    }
}
