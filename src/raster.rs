// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the PixelBuffer, a row-major RGB raster with its origin
//! at the top left, and the mapping from simulation space (centered,
//! radius-normalized, continuous) to that raster.

use std::io::{self, Write};

use crate::sampler::{is_in_circle, Point};

/// A three-byte RGB color.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Color(pub [u8; 3]);

/// Points that land inside the disk.
pub const INSIDE: Color = Color([0xeb, 0x83, 0x10]);
/// Points that land outside the disk.
pub const OUTSIDE: Color = Color([0xd3, 0x34, 0x88]);
/// The blank canvas.
pub const BACKGROUND: Color = Color([0xff, 0xff, 0xff]);
/// The seven-segment readout.
pub const INK: Color = Color([0x00, 0x00, 0x00]);

/// Column and row of a pixel, counted from the top left.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Pixel(pub usize, pub usize);

/// An owned raster, three bytes per pixel, `width * height` pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    bytes: Vec<u8>,
}

impl PixelBuffer {
    /// A buffer with every pixel set to the background color.
    pub fn new(width: usize, height: usize) -> PixelBuffer {
        PixelBuffer::filled(width, height, BACKGROUND)
    }

    /// A buffer with every pixel set to `color`.
    pub fn filled(width: usize, height: usize, color: Color) -> PixelBuffer {
        let mut bytes = Vec::with_capacity(3 * width * height);
        for _ in 0..width * height {
            bytes.extend_from_slice(&color.0);
        }
        PixelBuffer {
            width,
            height,
            bytes,
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The number of bytes in one row.
    pub fn line_len(&self) -> usize {
        3 * self.width
    }

    /// The raw RGB bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The color of one pixel.
    pub fn pixel(&self, pixel: Pixel) -> Color {
        let offset = pixel.1 * self.line_len() + pixel.0 * 3;
        Color([
            self.bytes[offset],
            self.bytes[offset + 1],
            self.bytes[offset + 2],
        ])
    }

    /// Sets one pixel, addressing rows by the buffer's own width.
    pub fn put(&mut self, pixel: Pixel, color: Color) {
        let line_len = self.line_len();
        set_pixel(self, pixel, color, line_len);
    }

    /// The portable pixmap header for this buffer.  The fields are
    /// separated by single spaces and downstream tools expect exactly
    /// this form.
    pub fn ppm_header(&self) -> String {
        format!("P6 {} {} 255\n", self.width, self.height)
    }

    /// Writes the buffer as a binary portable pixmap.
    pub fn write_ppm<W: Write>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(self.ppm_header().as_bytes())?;
        out.write_all(&self.bytes)
    }
}

/// Writes `color` over the pixel at `pixel`, where a row is
/// `line_len` bytes long.  The caller guarantees the pixel lies in the
/// buffer.
#[inline]
pub fn set_pixel(buffer: &mut PixelBuffer, pixel: Pixel, color: Color, line_len: usize) {
    let offset = pixel.1 * line_len + pixel.0 * 3;
    debug_assert!(
        offset + 3 <= buffer.bytes.len(),
        "pixel {:?} lies outside a {}x{} buffer",
        pixel,
        buffer.width,
        buffer.height
    );
    buffer.bytes[offset..offset + 3].copy_from_slice(&color.0);
}

/// Maps a point in simulation space onto a square raster `width`
/// pixels across.  Every point in [-1, 1) x [-1, 1) lands in the
/// raster; rounding at the far edge is clamped back onto the last
/// column or row.
pub fn map_to_buffer(point: &Point, width: usize) -> Pixel {
    let radius = width as f64 / 2.0;
    let last = width.saturating_sub(1) as f64;
    let left = num::clamp((point.0 * radius + radius).floor(), 0.0, last);
    let top = num::clamp((point.1 * radius + radius).floor(), 0.0, last);
    Pixel(left as usize, top as usize)
}

/// Plots a batch of points onto the buffer.  Whether a point counts
/// as inside is decided again on the pixel grid, against a disk
/// centered in the buffer, not taken from the sampler.
pub fn paint_points(buffer: &mut PixelBuffer, points: &[Point]) {
    let width = buffer.width();
    let radius = width as f64 / 2.0;
    for point in points {
        let pixel = map_to_buffer(point, width);
        let color = if is_in_circle(pixel.0 as f64, pixel.1 as f64, radius, radius, radius) {
            INSIDE
        } else {
            OUTSIDE
        };
        buffer.put(pixel, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::distributions::{Distribution, Uniform};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn new_buffer_is_background() {
        let buffer = PixelBuffer::new(4, 3);
        assert_eq!(buffer.as_bytes().len(), 36);
        assert!(buffer.as_bytes().iter().all(|b| *b == 0xff));
    }

    #[test]
    fn maps_corners_and_center() {
        assert_eq!(map_to_buffer(&Point(-1.0, -1.0), 100), Pixel(0, 0));
        assert_eq!(map_to_buffer(&Point(0.0, 0.0), 100), Pixel(50, 50));
        assert_eq!(map_to_buffer(&Point(0.5, -0.5), 100), Pixel(75, 25));
        assert_eq!(
            map_to_buffer(&Point(0.999_999_999_999, 0.999_999_999_999), 100),
            Pixel(99, 99)
        );
    }

    #[test]
    fn mapped_points_stay_in_the_buffer() {
        let mut rng = StdRng::seed_from_u64(11);
        let range = Uniform::new(-1.0_f64, 1.0);
        for width in &[1, 2, 3, 17, 100, 641] {
            for _ in 0..2000 {
                let point = Point(range.sample(&mut rng), range.sample(&mut rng));
                let p = map_to_buffer(&point, *width);
                assert!(p.0 < *width && p.1 < *width);
            }
        }
    }

    #[test]
    fn set_pixel_uses_the_line_length() {
        let mut buffer = PixelBuffer::new(4, 4);
        set_pixel(&mut buffer, Pixel(1, 2), INK, 12);
        assert_eq!(buffer.pixel(Pixel(1, 2)), INK);
        assert_eq!(&buffer.as_bytes()[27..30], &[0, 0, 0]);
        assert_eq!(buffer.pixel(Pixel(2, 2)), BACKGROUND);
    }

    #[test]
    fn paints_by_pixel_membership() {
        let mut buffer = PixelBuffer::new(10, 10);
        paint_points(&mut buffer, &[Point(0.0, 0.0), Point(-0.95, -0.95)]);
        assert_eq!(buffer.pixel(Pixel(5, 5)), INSIDE);
        assert_eq!(buffer.pixel(Pixel(0, 0)), OUTSIDE);
    }

    #[test]
    fn ppm_has_exact_header() {
        let buffer = PixelBuffer::filled(2, 1, INK);
        let mut out = Vec::new();
        buffer.write_ppm(&mut out).unwrap();
        assert_eq!(&out[..], &b"P6 2 1 255\n\0\0\0\0\0\0"[..]);
    }
}
