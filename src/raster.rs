//! Pixel geometry and surfaces.
//!
//! Everything downstream operates on 16-bit straight-alpha RGBA. Layer
//! rectangles keep their native PSD offsets, so coordinates are absolute
//! document coordinates, not buffer-local ones.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle with a signed origin and unsigned extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(left: i32, top: i32, width: u32, height: u32) -> Self {
        Self { left, top, width, height }
    }

    pub fn right(&self) -> i32 {
        self.left + self.width as i32
    }

    pub fn bottom(&self) -> i32 {
        self.top + self.height as i32
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.left && x < self.right() && y >= self.top && y < self.bottom()
    }

    /// Intersection of two rectangles. Non-overlapping inputs yield an
    /// empty rectangle.
    pub fn intersect(&self, other: &Rect) -> Rect {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= left || bottom <= top {
            Rect { left, top, width: 0, height: 0 }
        } else {
            Rect {
                left,
                top,
                width: (right - left) as u32,
                height: (bottom - top) as u32,
            }
        }
    }
}

/// One pixel: straight (non-premultiplied) 16-bit color plus alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba64 {
    pub r: u16,
    pub g: u16,
    pub b: u16,
    pub a: u16,
}

impl Rgba64 {
    pub const OPAQUE: u16 = u16::MAX;

    pub fn opaque(r: u16, g: u16, b: u16) -> Self {
        Self { r, g, b, a: Self::OPAQUE }
    }
}

/// Owned rectangular pixel surface, addressed in document coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    rect: Rect,
    pixels: Vec<Rgba64>,
}

impl PixelBuffer {
    /// Fully transparent buffer covering `rect`.
    pub fn new(rect: Rect) -> Self {
        let len = rect.width as usize * rect.height as usize;
        Self { rect, pixels: vec![Rgba64::default(); len] }
    }

    pub fn bounds(&self) -> Rect {
        self.rect
    }

    /// Pixel at absolute document coordinates. Panics outside `bounds()`.
    pub fn pixel(&self, x: i32, y: i32) -> Rgba64 {
        self.pixels[self.index(x, y)]
    }

    pub fn set(&mut self, x: i32, y: i32, value: Rgba64) {
        let i = self.index(x, y);
        self.pixels[i] = value;
    }

    fn index(&self, x: i32, y: i32) -> usize {
        assert!(self.rect.contains(x, y), "pixel ({x}, {y}) outside {:?}", self.rect);
        let dx = (x - self.rect.left) as usize;
        let dy = (y - self.rect.top) as usize;
        dy * self.rect.width as usize + dx
    }
}
