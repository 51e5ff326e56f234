//! Heap-backed RGB565 pixel buffer.

use alloc::vec::Vec;

use crate::panel;

/// Returned when the allocator cannot satisfy a buffer request.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct AllocError {
    pub requested_bytes: usize,
}

/// Off-screen RGB565 buffer.
///
/// Pixels are stored row-major as raw `u16` values.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Sprite {
    width: u16,
    height: u16,
    pixels: Vec<u16>,
}

impl Sprite {
    /// Allocates a zeroed (black) buffer without aborting on exhaustion.
    pub fn try_new(width: u16, height: u16) -> Result<Self, AllocError> {
        let len = width as usize * height as usize;
        let mut pixels = Vec::new();
        pixels.try_reserve_exact(len).map_err(|_| AllocError {
            requested_bytes: panel::buffer_bytes(width, height),
        })?;
        pixels.resize(len, 0);

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Allocates a buffer covering the whole panel.
    pub fn panel() -> Result<Self, AllocError> {
        Self::try_new(panel::WIDTH as u16, panel::HEIGHT as u16)
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Heap bytes held by the pixel storage.
    pub fn byte_len(&self) -> usize {
        panel::buffer_bytes(self.width, self.height)
    }

    /// Raw RGB565 pixels, row-major.
    pub fn raw(&self) -> &[u16] {
        &self.pixels
    }

    pub fn fill(&mut self, raw: u16) {
        self.pixels.fill(raw);
    }

    /// Sets a pixel.
    ///
    /// Returns `true` when the pixel is in bounds, `false` otherwise.
    pub fn set_pixel(&mut self, x: usize, y: usize, raw: u16) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.pixels[i] = raw;
                true
            }
            None => false,
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u16> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Fills a rectangle, clipped to the buffer.
    pub fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, raw: u16) {
        let x0 = x.max(0) as usize;
        let y0 = y.max(0) as usize;
        let x1 = (x as i64 + width as i64).clamp(0, self.width as i64) as usize;
        let y1 = (y as i64 + height as i64).clamp(0, self.height as i64) as usize;
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let stride = self.width as usize;
        for row in y0..y1 {
            self.pixels[row * stride + x0..row * stride + x1].fill(raw);
        }
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> Option<usize> {
        if x >= self.width as usize || y >= self.height as usize {
            return None;
        }
        Some(y * self.width as usize + x)
    }
}
