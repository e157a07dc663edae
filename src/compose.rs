//! Pixel transforms applied between the layer walk and the PNG encoder.

use crate::raster::{PixelBuffer, Rect, Rgba64};

/// Blend `src` over a solid background color.
///
/// Straight-alpha over: `out = src * a + bg * (1 - a)` per channel, computed
/// in f32 and truncated back to 16 bits. The result is always fully opaque,
/// whatever the input alpha was.
pub fn composite(src: &PixelBuffer, bg: Rgba64) -> PixelBuffer {
    let bounds = src.bounds();
    let mut out = PixelBuffer::new(bounds);
    for y in bounds.top..bounds.bottom() {
        for x in bounds.left..bounds.right() {
            let c = src.pixel(x, y);
            let ra = c.a as f32 / u16::MAX as f32;
            let blend = |s: u16, b: u16| (s as f32 * ra + b as f32 * (1.0 - ra)) as u16;
            out.set(x, y, Rgba64::opaque(blend(c.r, bg.r), blend(c.g, bg.g), blend(c.b, bg.b)));
        }
    }
    out
}

/// Reproject `src` onto `target`, typically the document canvas rectangle.
///
/// Pixels inside the overlap are copied verbatim, all four channels; the
/// rest of the target stays transparent black. Handles layers whose native
/// bounds are smaller than, or offset against, the shared canvas.
pub fn reproject(target: Rect, src: &PixelBuffer) -> PixelBuffer {
    let mut out = PixelBuffer::new(target);
    let overlap = target.intersect(&src.bounds());
    for y in overlap.top..overlap.bottom() {
        for x in overlap.left..overlap.right() {
            out.set(x, y, src.pixel(x, y));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(rect: Rect, px: Rgba64) -> PixelBuffer {
        let mut buf = PixelBuffer::new(rect);
        for y in rect.top..rect.bottom() {
            for x in rect.left..rect.right() {
                buf.set(x, y, px);
            }
        }
        buf
    }

    #[test]
    fn opaque_source_keeps_its_color() {
        let red = Rgba64::opaque(u16::MAX, 0, 0);
        let src = solid(Rect::new(0, 0, 2, 2), red);
        let out = composite(&src, Rgba64::opaque(0, u16::MAX, 0));
        assert_eq!(out.pixel(1, 1), red);
    }

    #[test]
    fn transparent_source_becomes_background() {
        let src = PixelBuffer::new(Rect::new(0, 0, 3, 3));
        let bg = Rgba64::opaque(0x1234, 0x5678, 0x9abc);
        let out = composite(&src, bg);
        for y in 0..3 {
            for x in 0..3 {
                assert_eq!(out.pixel(x, y), bg);
            }
        }
    }

    #[test]
    fn half_coverage_blends_and_forces_opaque() {
        let rect = Rect::new(0, 0, 1, 1);
        let mut src = PixelBuffer::new(rect);
        src.set(0, 0, Rgba64 { r: u16::MAX, g: 0, b: 0, a: 32768 });
        let out = composite(&src, Rgba64::opaque(0, 0, u16::MAX));

        let ra = 32768.0_f32 / 65535.0;
        let expect_r = (65535.0 * ra) as u16;
        let expect_b = (65535.0 * (1.0 - ra)) as u16;
        let px = out.pixel(0, 0);
        assert_eq!((px.r, px.g, px.b, px.a), (expect_r, 0, expect_b, u16::MAX));
    }

    #[test]
    fn reproject_matches_target_dimensions() {
        let src = solid(Rect::new(1, 1, 2, 2), Rgba64::opaque(1, 2, 3));
        let out = reproject(Rect::new(0, 0, 4, 4), &src);
        assert_eq!(out.bounds(), Rect::new(0, 0, 4, 4));
        // inside the overlap: verbatim copy
        assert_eq!(out.pixel(1, 1), Rgba64::opaque(1, 2, 3));
        assert_eq!(out.pixel(2, 2), Rgba64::opaque(1, 2, 3));
        // outside: transparent black
        assert_eq!(out.pixel(0, 0), Rgba64::default());
        assert_eq!(out.pixel(3, 3), Rgba64::default());
    }

    #[test]
    fn reproject_copies_alpha_unchanged() {
        let rect = Rect::new(0, 0, 1, 1);
        let mut src = PixelBuffer::new(rect);
        src.set(0, 0, Rgba64 { r: 9, g: 9, b: 9, a: 1234 });
        let out = reproject(Rect::new(0, 0, 2, 2), &src);
        assert_eq!(out.pixel(0, 0).a, 1234);
    }

    #[test]
    fn reproject_disjoint_source_is_all_transparent() {
        let src = solid(Rect::new(10, 10, 2, 2), Rgba64::opaque(5, 5, 5));
        let out = reproject(Rect::new(0, 0, 2, 2), &src);
        for y in 0..2 {
            for x in 0..2 {
                assert_eq!(out.pixel(x, y), Rgba64::default());
            }
        }
    }
}
