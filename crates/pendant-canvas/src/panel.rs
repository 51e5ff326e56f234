//! Panel geometry and buffer sizing.

/// Panel width in pixels (portrait).
pub const WIDTH: usize = 240;
/// Panel height in pixels (portrait).
pub const HEIGHT: usize = 320;
/// RGB565 storage size.
pub const BYTES_PER_PIXEL: usize = 2;
/// Size of a full-panel buffer in bytes.
pub const FRAME_BYTES: usize = WIDTH * HEIGHT * BYTES_PER_PIXEL;

/// Bytes needed for a `width` x `height` RGB565 buffer.
#[inline]
pub const fn buffer_bytes(width: u16, height: u16) -> usize {
    width as usize * height as usize * BYTES_PER_PIXEL
}
