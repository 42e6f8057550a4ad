// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Seven-segment glyphs, drawn straight into a PixelBuffer.
//!
//! Segments are laid out around an anchor at the bottom left of the
//! glyph:
//!
//! ```text
//!             A
//!        -----------
//!        |         |
//!     F  |    G    | B
//!        -----------
//!     E  |         | C
//!        |    D    |
//!        O----------
//!        ^
//!        anchor
//! ```
//!
//! The decimal point ignores the segments and is a filled square
//! sitting on the anchor.

use itertools::iproduct;
use log::warn;

use crate::raster::{set_pixel, Pixel, PixelBuffer, INK};

/// One stroke of a seven-segment glyph.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    /// Top.
    A,
    /// Upper right.
    B,
    /// Lower right.
    C,
    /// Bottom.
    D,
    /// Lower left.
    E,
    /// Upper left.
    F,
    /// Middle.
    G,
}

use self::Segment::*;

/// Everything the readout can show.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Glyph {
    /// A decimal digit, 0 through 9.
    Digit(u8),
    /// The decimal point.
    Point,
}

impl Glyph {
    /// Parses one character of the readout.  Anything other than a
    /// decimal digit or '.' has no glyph.
    pub fn from_char(c: char) -> Option<Glyph> {
        match c {
            '.' => Some(Glyph::Point),
            '0'..='9' => Some(Glyph::Digit(c as u8 - b'0')),
            _ => None,
        }
    }

    /// The segments lit for this glyph.  The decimal point has none;
    /// it is drawn as a square instead.
    pub fn segments(self) -> &'static [Segment] {
        match self {
            Glyph::Digit(0) => &[A, B, C, D, E, F],
            Glyph::Digit(1) => &[B, C],
            Glyph::Digit(2) => &[A, B, D, E, G],
            Glyph::Digit(3) => &[A, B, C, D, G],
            Glyph::Digit(4) => &[B, C, F, G],
            Glyph::Digit(5) => &[A, C, D, F, G],
            Glyph::Digit(6) => &[A, C, D, E, F, G],
            Glyph::Digit(7) => &[A, B, C],
            Glyph::Digit(8) => &[A, B, C, D, E, F, G],
            Glyph::Digit(9) => &[A, B, C, D, F, G],
            Glyph::Digit(_) | Glyph::Point => &[],
        }
    }
}

/// The bottom-left reference point of a glyph, in pixels.  Signed,
/// because degenerate layouts can push strokes off the buffer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Anchor(pub i64, pub i64);

/// The layout of the readout, derived from the image size and the
/// number of decimals shown.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SegmentGeometry {
    /// Height of the area reserved for the readout.
    pub cell_height: i64,
    /// Width of the area reserved for the readout.
    pub cell_width: i64,
    /// Length of a horizontal segment.
    pub segment_width: i64,
    /// Length of a vertical segment.
    pub segment_height: i64,
    /// Stroke thickness; never less than one.
    pub thickness: i64,
    /// Where the first glyph sits.
    pub anchor: Anchor,
}

impl SegmentGeometry {
    /// Lays out `precision + 2` glyphs (integer digit, point,
    /// decimals) in the middle of a `width` x `height` image.
    pub fn new(width: usize, height: usize, precision: usize) -> SegmentGeometry {
        let cell_height = (height / 12) as i64;
        let cell_width = (width / 6) as i64;
        let precision = precision as i64;

        let segment_height = cell_height / 2;
        // Signed division truncates toward zero, which is what we want
        // when there is no room left for the decimals.
        let segment_width = (cell_width - 3 * (precision + 1)) / (precision + 2);
        let thickness = 1 + cell_height.min(cell_width) / 30;

        let anchor = Anchor(
            (width as f64 / 2.0 - cell_width as f64 / 2.0) as i64,
            (height as f64 / 2.0 + segment_height as f64) as i64,
        );

        SegmentGeometry {
            cell_height,
            cell_width,
            segment_width,
            segment_height,
            thickness,
            anchor,
        }
    }

    /// Horizontal distance from one glyph's anchor to the next.
    pub fn advance(&self) -> i64 {
        self.segment_width + 3
    }

    /// True when the segments have no extent; glyphs still draw, but
    /// the digits are unreadable.
    pub fn is_degenerate(&self) -> bool {
        self.segment_width <= 0 || self.segment_height <= 0
    }
}

// Strokes are clipped to the buffer, so a degenerate layout can only
// lose ink, never write outside the raster.
fn plot(buffer: &mut PixelBuffer, x: i64, y: i64, line_len: usize) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= line_len / 3 || (y * line_len + x * 3 + 3) > buffer.as_bytes().len() {
        return;
    }
    set_pixel(buffer, Pixel(x, y), INK, line_len);
}

fn stroke<I>(buffer: &mut PixelBuffer, points: I, line_len: usize)
where
    I: Iterator<Item = (i64, i64)>,
{
    for (x, y) in points {
        plot(buffer, x, y, line_len);
    }
}

/// Draws one glyph in ink with its bottom-left corner at `anchor`.
/// `size` is (segment width, segment height); `line_len` is the byte
/// length of a full row of the buffer.
pub fn draw_character(
    buffer: &mut PixelBuffer,
    glyph: Glyph,
    anchor: Anchor,
    size: (i64, i64),
    line_len: usize,
    thickness: i64,
) {
    let Anchor(ax, ay) = anchor;
    let (sw, sh) = size;
    let t = thickness;

    if glyph == Glyph::Point {
        let square = iproduct!(0..2 * t, 0..2 * t).map(|(i, j)| (ax + i, ay - j));
        stroke(buffer, square, line_len);
        return;
    }

    let across = ax..=ax + sw;
    let down = (ay - sh + 1)..=ay;

    for segment in glyph.segments() {
        match segment {
            A => stroke(
                buffer,
                iproduct!(0..t, across.clone()).map(|(i, x)| (x, ay - 2 * sh + i)),
                line_len,
            ),
            B => stroke(
                buffer,
                iproduct!(0..t, down.clone()).map(|(i, y)| (ax + sw - i, y - sh)),
                line_len,
            ),
            C => stroke(
                buffer,
                iproduct!(0..t, down.clone()).map(|(i, y)| (ax + sw - i, y)),
                line_len,
            ),
            D => stroke(
                buffer,
                iproduct!(0..t, across.clone()).map(|(i, x)| (x, ay - i)),
                line_len,
            ),
            E => stroke(
                buffer,
                iproduct!(0..t, down.clone()).map(|(i, y)| (ax + i, y)),
                line_len,
            ),
            F => stroke(
                buffer,
                iproduct!(0..t, down.clone()).map(|(i, y)| (ax + i, y - sh)),
                line_len,
            ),
            // Swept from -t/2 to t/2 inclusive, so an even thickness
            // draws one row more than the other segments.
            G => stroke(
                buffer,
                iproduct!(-(t / 2)..=(t / 2), across.clone()).map(|(i, x)| (x, ay - sh + i)),
                line_len,
            ),
        }
    }
}

/// Draws the first `precision + 2` characters of `text` as a row of
/// glyphs laid out by `geometry`.
pub fn draw_text(
    buffer: &mut PixelBuffer,
    text: &str,
    precision: usize,
    geometry: &SegmentGeometry,
) {
    let line_len = buffer.line_len();
    let size = (geometry.segment_width, geometry.segment_height);
    let mut anchor = geometry.anchor;
    for c in text.chars().take(precision + 2) {
        match Glyph::from_char(c) {
            Some(glyph) => {
                draw_character(buffer, glyph, anchor, size, line_len, geometry.thickness)
            }
            None => warn!("no glyph for {:?} in {:?}", c, text),
        }
        anchor.0 += geometry.advance();
    }
}
