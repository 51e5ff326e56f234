//! Display, touch, and heap probe behind one drawing target.

use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::{Point, Size},
    pixelcolor::Rgb565,
    primitives::Rectangle,
};
use pendant_canvas::Sprite;

use crate::settings::Orientation;

pub trait Surface: DrawTarget<Color = Rgb565> {
    /// Bytes the allocator can still hand out.
    fn free_heap_bytes(&self) -> usize;

    /// One touch sample in panel coordinates, or `None` when untouched.
    fn touch(&mut self) -> Option<Point>;

    /// Rotates both the panel and the touch mapping.
    fn set_orientation(&mut self, orientation: Orientation) -> Result<(), Self::Error>;

    /// Copies `sprite` to the panel with its corner at `top_left`.
    fn blit(&mut self, sprite: &Sprite, top_left: Point) -> Result<(), Self::Error> {
        let area = Rectangle::new(
            top_left,
            Size::new(sprite.width() as u32, sprite.height() as u32),
        );
        self.fill_contiguous(&area, sprite.colors())
    }
}
