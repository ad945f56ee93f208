//! Procedural heart glyph.
//!
//! The heart is the region `(x² + y² − 1)³ − x²y³ ≤ 0`, sampled 4×4 per
//! pixel into an 8-bit coverage mask. The curve spans
//! `x ∈ [−1.1375, 1.1375]`, `y ∈ [−1.0, 1.235]`; it is fitted to 20/24 of
//! the glyph box and then grown by a stroke of 2/24 of the box, matching a
//! 24-unit outline icon drawn with stroke width 2 and the same color.
//!
//! The glow is the same mask blurred with a Gaussian and composited under
//! the heart at reduced opacity.

use image::{GrayImage, Luma, Rgb, RgbImage};

use crate::layout::Glow;

const CURVE_HALF_WIDTH: f32 = 1.1375;
const CURVE_Y_MIN: f32 = -1.0;
const CURVE_Y_MAX: f32 = 1.235;
const FILL_FRACTION: f32 = 20.0 / 24.0;
const STROKE_FRACTION: f32 = 2.0 / 24.0;
const SUBSAMPLES: u32 = 4;

/// Whether a point in curve space lies inside the heart.
fn inside(x: f32, y: f32) -> bool {
    let r = x * x + y * y - 1.0;
    r * r * r - x * x * y * y * y <= 0.0
}

/// Anti-aliased coverage mask of a `size`×`size` heart, stroke included.
pub fn heart_mask(size: u32) -> GrayImage {
    let mut mask = GrayImage::new(size, size);
    if size == 0 {
        return mask;
    }

    let side = size as f32;
    let units_per_px = (2.0 * CURVE_HALF_WIDTH) / (side * FILL_FRACTION);
    let center_y = (CURVE_Y_MIN + CURVE_Y_MAX) / 2.0;

    // Half the stroke lies outside the fill; grow the curve by that much.
    let stroke_units = side * STROKE_FRACTION / 2.0 * units_per_px;
    let grow = 1.0 + stroke_units / CURVE_HALF_WIDTH;

    let step = 1.0 / SUBSAMPLES as f32;
    let total = (SUBSAMPLES * SUBSAMPLES) as f32;

    for py in 0..size {
        for px in 0..size {
            let mut hits = 0u32;
            for sy in 0..SUBSAMPLES {
                for sx in 0..SUBSAMPLES {
                    let fx = px as f32 + (sx as f32 + 0.5) * step - side / 2.0;
                    let fy = py as f32 + (sy as f32 + 0.5) * step - side / 2.0;
                    let x = fx * units_per_px;
                    let y = center_y - fy * units_per_px;
                    if inside(x / grow, y / grow) {
                        hits += 1;
                    }
                }
            }
            let coverage = (hits as f32 / total * 255.0).round() as u8;
            mask.put_pixel(px, py, Luma([coverage]));
        }
    }

    mask
}

/// Blend `src` over `dst` with the given opacity.
pub(crate) fn blend(dst: &mut Rgb<u8>, src: Rgb<u8>, alpha: f32) {
    let a = alpha.clamp(0.0, 1.0);
    for c in 0..3 {
        let mixed = src.0[c] as f32 * a + dst.0[c] as f32 * (1.0 - a);
        dst.0[c] = mixed.round().clamp(0.0, 255.0) as u8;
    }
}

/// Composite a coverage mask onto the canvas at `(left, top)`, clipping at
/// the canvas edges.
fn composite_mask(
    canvas: &mut RgbImage,
    mask: &GrayImage,
    left: i64,
    top: i64,
    color: Rgb<u8>,
    opacity: f32,
) {
    let (cw, ch) = (canvas.width() as i64, canvas.height() as i64);
    for (mx, my, coverage) in mask.enumerate_pixels() {
        let cov = coverage.0[0];
        if cov == 0 {
            continue;
        }
        let x = left + mx as i64;
        let y = top + my as i64;
        if x < 0 || y < 0 || x >= cw || y >= ch {
            continue;
        }
        let alpha = cov as f32 / 255.0 * opacity;
        blend(canvas.get_pixel_mut(x as u32, y as u32), color, alpha);
    }
}

/// Paint a heart of `size` device pixels with its top-left at `(left, top)`.
///
/// `glow.radius` must already be in device pixels.
pub fn paint_heart(
    canvas: &mut RgbImage,
    left: i64,
    top: i64,
    size: u32,
    color: Rgb<u8>,
    glow: Option<Glow>,
) {
    let mask = heart_mask(size);

    if let Some(glow) = glow.filter(|g| g.alpha > 0.0 && g.radius > 0.0) {
        // CSS blur radius corresponds to roughly two standard deviations.
        let sigma = glow.radius / 2.0;
        let pad = (sigma * 3.0).ceil() as u32;

        let mut padded = GrayImage::new(size + 2 * pad, size + 2 * pad);
        image::imageops::overlay(&mut padded, &mask, pad as i64, pad as i64);
        let halo = image::imageops::blur(&padded, sigma);

        composite_mask(
            canvas,
            &halo,
            left - pad as i64,
            top - pad as i64,
            glow.color,
            glow.alpha,
        );
    }

    composite_mask(canvas, &mask, left, top, color, 1.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_shape() {
        let mask = heart_mask(120);
        let at = |x: u32, y: u32| mask.get_pixel(x, y).0[0];

        // Solid in the middle of each lobe and the body.
        assert_eq!(at(60, 70), 255);
        assert_eq!(at(35, 40), 255);
        assert_eq!(at(85, 40), 255);

        // Empty in the corners and in the notch between the lobes.
        assert_eq!(at(0, 0), 0);
        assert_eq!(at(119, 0), 0);
        assert_eq!(at(2, 117), 0);
        assert_eq!(at(117, 117), 0);
        assert_eq!(at(60, 12), 0);
    }

    #[test]
    fn test_mask_is_symmetric() {
        let mask = heart_mask(64);
        for y in 0..64 {
            for x in 0..32 {
                let left = mask.get_pixel(x, y).0[0] as i32;
                let right = mask.get_pixel(63 - x, y).0[0] as i32;
                assert!((left - right).abs() <= 16, "asymmetry at ({x},{y})");
            }
        }
    }

    #[test]
    fn test_mask_edges_are_antialiased() {
        let mask = heart_mask(96);
        assert!(mask.pixels().any(|p| p.0[0] > 0 && p.0[0] < 255));
    }

    #[test]
    fn test_zero_size_mask() {
        assert_eq!(heart_mask(0).dimensions(), (0, 0));
    }

    #[test]
    fn test_blend() {
        let mut px = Rgb([0, 0, 0]);
        blend(&mut px, Rgb([200, 100, 50]), 0.5);
        assert_eq!(px, Rgb([100, 50, 25]));

        let mut px = Rgb([10, 10, 10]);
        blend(&mut px, Rgb([200, 100, 50]), 0.0);
        assert_eq!(px, Rgb([10, 10, 10]));
    }

    #[test]
    fn test_paint_heart_with_glow() {
        let bg = Rgb([0x12, 0x12, 0x12]);
        let red = Rgb([0xdc, 0x26, 0x26]);
        let mut canvas = RgbImage::from_pixel(200, 200, bg);

        paint_heart(
            &mut canvas,
            50,
            50,
            100,
            red,
            Some(Glow {
                color: red,
                alpha: 0.7,
                radius: 20.0,
            }),
        );

        // Body is the fill color.
        assert_eq!(*canvas.get_pixel(100, 110), red);
        // The glow reddens the background just outside the glyph box.
        let halo = canvas.get_pixel(100, 153);
        assert!(halo.0[0] > bg.0[0]);
        // Far corners are untouched.
        assert_eq!(*canvas.get_pixel(0, 0), bg);
    }

    #[test]
    fn test_paint_heart_clips_at_edges() {
        let mut canvas = RgbImage::from_pixel(40, 40, Rgb([0, 0, 0]));
        paint_heart(&mut canvas, -30, -30, 60, Rgb([255, 0, 0]), None);
        paint_heart(&mut canvas, 20, 20, 60, Rgb([255, 0, 0]), None);
        assert!(canvas.pixels().any(|p| p.0[0] == 255));
    }
}
