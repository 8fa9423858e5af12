//! Raster drawing surface: colors, the surface trait, and an in-memory bitmap.
//!
//! The drawing layer is the one the user paints on with pen, eraser, fill and
//! the rails of the track tool. Its contents are what the undo history
//! snapshots. [`Bitmap`] is a self-contained implementation used headless and
//! in tests; the browser implementation lives in [`crate::web`].

#[cfg(test)]
#[path = "raster_test.rs"]
mod raster_test;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::FILL_TOLERANCE;
use crate::error::SurfaceError;
use crate::geom::Point;

// =============================================================
// Color
// =============================================================

/// An 8-bit RGBA color. (De)serializes as a `#rrggbb` or `#rrggbbaa` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Returned when a string is not a hex color.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid hex color: {0:?}")]
pub struct ColorParseError(pub String);

impl Rgba {
    pub const WHITE: Rgba = Rgba::opaque(0xff, 0xff, 0xff);
    pub const BLACK: Rgba = Rgba::opaque(0, 0, 0);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[must_use]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    ///
    /// # Errors
    ///
    /// Returns [`ColorParseError`] for any other shape or non-hex digits.
    pub fn parse_hex(s: &str) -> Result<Self, ColorParseError> {
        let err = || ColorParseError(s.to_owned());
        let hex = s.strip_prefix('#').ok_or_else(err)?;
        if !hex.is_ascii() {
            return Err(err());
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        let nibble = |i: usize| u8::from_str_radix(&hex[i..=i], 16).map(|v| v * 17).map_err(|_| err());
        match hex.len() {
            3 => Ok(Self::opaque(nibble(0)?, nibble(1)?, nibble(2)?)),
            6 => Ok(Self::opaque(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Self::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => Err(err()),
        }
    }

    /// `#rrggbb` when opaque, `#rrggbbaa` otherwise.
    #[must_use]
    pub fn to_hex(self) -> String {
        if self.a == 0xff {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Whether every channel of `other` is within `tolerance` of this color.
    #[must_use]
    pub fn is_near(self, other: Rgba, tolerance: u8) -> bool {
        self.r.abs_diff(other.r) <= tolerance
            && self.g.abs_diff(other.g) <= tolerance
            && self.b.abs_diff(other.b) <= tolerance
            && self.a.abs_diff(other.a) <= tolerance
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Rgba {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_hex(&value)
    }
}

impl From<Rgba> for String {
    fn from(c: Rgba) -> Self {
        c.to_hex()
    }
}

// =============================================================
// Surface trait
// =============================================================

/// The drawing layer as seen by tools and the undo history.
///
/// Snapshots are opaque to callers; only [`RasterSurface::restore`] interprets them.
pub trait RasterSurface {
    type Snapshot: Clone;

    /// Width and height in pixels.
    fn size(&self) -> (u32, u32);

    /// Capture the current pixels.
    ///
    /// # Errors
    ///
    /// Propagates backend failures.
    fn snapshot(&self) -> Result<Self::Snapshot, SurfaceError>;

    /// Replace the current pixels with a previous snapshot. A snapshot taken
    /// at another size is painted at the origin over white; the surface keeps
    /// its current size.
    ///
    /// # Errors
    ///
    /// Propagates backend failures.
    fn restore(&mut self, snapshot: &Self::Snapshot) -> Result<(), SurfaceError>;

    /// Paint every pixel `color`.
    ///
    /// # Errors
    ///
    /// Propagates backend failures.
    fn fill_all(&mut self, color: Rgba) -> Result<(), SurfaceError>;

    /// Paint a filled circle.
    ///
    /// # Errors
    ///
    /// Propagates backend failures.
    fn fill_disc(&mut self, center: Point, radius: f64, color: Rgba) -> Result<(), SurfaceError>;

    /// Paint a straight line of `width` pixels with round caps.
    ///
    /// # Errors
    ///
    /// Propagates backend failures.
    fn stroke_segment(&mut self, from: Point, to: Point, width: f64, color: Rgba) -> Result<(), SurfaceError>;

    /// Change the size, keeping existing pixels anchored at the origin and
    /// painting any new area white.
    ///
    /// # Errors
    ///
    /// Propagates backend failures.
    fn resize(&mut self, width: u32, height: u32) -> Result<(), SurfaceError>;

    /// Copy out the full pixel buffer.
    ///
    /// # Errors
    ///
    /// Propagates backend failures.
    fn read_pixels(&self) -> Result<Bitmap, SurfaceError>;

    /// Overwrite the full pixel buffer.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::SizeMismatch`] when `pixels` does not match [`Self::size`].
    fn write_pixels(&mut self, pixels: &Bitmap) -> Result<(), SurfaceError>;
}

// =============================================================
// Bitmap
// =============================================================

/// Row-major RGBA8 pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Bitmap {
    /// A `width` x `height` bitmap filled white.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Rgba::WHITE)
    }

    #[must_use]
    pub fn filled(width: u32, height: u32, color: Rgba) -> Self {
        let len = width as usize * height as usize;
        let data = [color.r, color.g, color.b, color.a].repeat(len);
        Self { width, height, data }
    }

    /// Wrap raw RGBA bytes; `None` if the length doesn't match the dimensions.
    #[must_use]
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        (data.len() == width as usize * height as usize * 4).then_some(Self { width, height, data })
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes, row-major.
    #[must_use]
    pub fn as_rgba(&self) -> &[u8] {
        &self.data
    }

    /// These pixels anchored at the origin of a `width` x `height` white bitmap.
    /// Whatever falls outside is cut off.
    #[must_use]
    pub fn resized(&self, width: u32, height: u32) -> Bitmap {
        let mut out = Bitmap::new(width, height);
        let row = self.width.min(width) as usize * 4;
        for y in 0..self.height.min(height) as usize {
            let src = y * self.width as usize * 4;
            let dst = y * width as usize * 4;
            out.data[dst..dst + row].copy_from_slice(&self.data[src..src + row]);
        }
        out
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| (y as usize * self.width as usize + x as usize) * 4)
    }

    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        let i = self.index(x, y)?;
        Some(Rgba::new(self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]))
    }

    /// Set one pixel. Out-of-bounds writes are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        if let Some(i) = self.index(x, y) {
            self.data[i..i + 4].copy_from_slice(&[color.r, color.g, color.b, color.a]);
        }
    }

    /// Set every pixel whose center lies within `reach` of the segment `a -> b`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn paint_capsule(&mut self, a: Point, b: Point, reach: f64, color: Rgba) {
        if reach <= 0.0 || self.width == 0 || self.height == 0 {
            return;
        }
        let max_x = f64::from(self.width - 1);
        let max_y = f64::from(self.height - 1);
        let x0 = (a.x.min(b.x) - reach).floor().clamp(0.0, max_x) as u32;
        let x1 = (a.x.max(b.x) + reach).ceil().clamp(0.0, max_x) as u32;
        let y0 = (a.y.min(b.y) - reach).floor().clamp(0.0, max_y) as u32;
        let y1 = (a.y.max(b.y) + reach).ceil().clamp(0.0, max_y) as u32;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let c = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
                if distance_to_segment(c, a, b) <= reach {
                    self.set_pixel(x, y, color);
                }
            }
        }
    }

    /// 4-connected flood fill from `(x, y)` over pixels within
    /// [`FILL_TOLERANCE`] of the seed color.
    ///
    /// Returns `false` without touching anything when the seed is out of
    /// bounds or already exactly `color`.
    pub fn flood_fill(&mut self, x: i64, y: i64, color: Rgba) -> bool {
        let (Ok(sx), Ok(sy)) = (u32::try_from(x), u32::try_from(y)) else {
            return false;
        };
        let Some(target) = self.pixel(sx, sy) else {
            return false;
        };
        if target == color {
            return false;
        }
        let w = self.width as usize;
        let mut visited = vec![false; w * self.height as usize];
        let mut stack = vec![(sx, sy)];
        while let Some((px, py)) = stack.pop() {
            let flat = py as usize * w + px as usize;
            if visited[flat] {
                continue;
            }
            visited[flat] = true;
            match self.pixel(px, py) {
                Some(c) if c.is_near(target, FILL_TOLERANCE) => self.set_pixel(px, py, color),
                _ => continue,
            }
            if px > 0 {
                stack.push((px - 1, py));
            }
            if px + 1 < self.width {
                stack.push((px + 1, py));
            }
            if py > 0 {
                stack.push((px, py - 1));
            }
            if py + 1 < self.height {
                stack.push((px, py + 1));
            }
        }
        true
    }
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq <= f64::EPSILON {
        return p.distance_to(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    p.distance_to(a.lerp(b, t))
}

impl RasterSurface for Bitmap {
    type Snapshot = Bitmap;

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn snapshot(&self) -> Result<Bitmap, SurfaceError> {
        Ok(self.clone())
    }

    fn restore(&mut self, snapshot: &Bitmap) -> Result<(), SurfaceError> {
        if snapshot.size() == self.size() {
            return self.write_pixels(snapshot);
        }
        *self = snapshot.resized(self.width, self.height);
        Ok(())
    }

    fn fill_all(&mut self, color: Rgba) -> Result<(), SurfaceError> {
        *self = Self::filled(self.width, self.height, color);
        Ok(())
    }

    fn fill_disc(&mut self, center: Point, radius: f64, color: Rgba) -> Result<(), SurfaceError> {
        self.paint_capsule(center, center, radius, color);
        Ok(())
    }

    fn stroke_segment(&mut self, from: Point, to: Point, width: f64, color: Rgba) -> Result<(), SurfaceError> {
        self.paint_capsule(from, to, width / 2.0, color);
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), SurfaceError> {
        *self = self.resized(width, height);
        Ok(())
    }

    fn read_pixels(&self) -> Result<Bitmap, SurfaceError> {
        Ok(self.clone())
    }

    fn write_pixels(&mut self, pixels: &Bitmap) -> Result<(), SurfaceError> {
        if pixels.size() != self.size() {
            return Err(SurfaceError::SizeMismatch {
                got_w: pixels.width,
                got_h: pixels.height,
                want_w: self.width,
                want_h: self.height,
            });
        }
        self.data.copy_from_slice(&pixels.data);
        Ok(())
    }
}

/// Flood fill on any raster surface by round-tripping its pixel buffer.
///
/// Returns whether any pixel changed.
///
/// # Errors
///
/// Propagates backend failures from reading or writing pixels.
pub fn flood_fill<R: RasterSurface + ?Sized>(surface: &mut R, x: i64, y: i64, color: Rgba) -> Result<bool, SurfaceError> {
    let mut pixels = surface.read_pixels()?;
    if !pixels.flood_fill(x, y, color) {
        return Ok(false);
    }
    surface.write_pixels(&pixels)?;
    Ok(true)
}
