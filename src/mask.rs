//! Rounded-corner masking.
//!
//! A rounded rectangle covering the whole image is rasterized into an
//! anti-aliased coverage mask, then the source is composited "source-in":
//! colour is kept as-is and alpha is scaled by the mask coverage. Pixels the
//! shape does not touch stay fully transparent.

use image::{Rgba, RgbaImage};
use tiny_skia::{FillRule, Mask, Path, PathBuilder, Transform};
use tracing::debug;

use crate::error::MaskError;
use crate::radius::{max_radius, RadiusPercent};

/// Control point distance for approximating a quarter circle with one cubic.
const KAPPA: f32 = 0.552_284_8;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Returns a copy of `source` with everything outside a rounded rectangle of
/// corner radius `radius` made transparent. The radius is clamped into
/// `[0, min(w, h) / 2]`.
pub fn apply_rounded_mask(source: &RgbaImage, radius: f32) -> Result<RgbaImage, MaskError> {
    let (w, h) = source.dimensions();
    if w == 0 || h == 0 {
        return Err(MaskError::InvalidInput {
            width: w,
            height: h,
        });
    }

    let radius = clamp_radius(radius, w, h);
    debug!("Masking {w}x{h} image with corner radius {radius:.2}px");

    if radius == 0.0 {
        return Ok(source.clone());
    }

    let coverage = coverage_mask(w, h, radius)?;

    let mut output = RgbaImage::from_pixel(w, h, TRANSPARENT);
    for ((dst, src), &cov) in output
        .pixels_mut()
        .zip(source.pixels())
        .zip(coverage.data())
    {
        if cov == 0 {
            continue;
        }
        let alpha = (src[3] as u16 * cov as u16 + 127) / 255;
        *dst = Rgba([src[0], src[1], src[2], alpha as u8]);
    }

    Ok(output)
}

/// Masks `source` with the radius derived from `percent` and the source's own
/// dimensions.
pub fn round_by_percent(source: &RgbaImage, percent: RadiusPercent) -> Result<RgbaImage, MaskError> {
    let radius = percent.pixels(source.width(), source.height());
    apply_rounded_mask(source, radius)
}

fn clamp_radius(radius: f32, w: u32, h: u32) -> f32 {
    if radius.is_nan() || radius <= 0.0 {
        return 0.0;
    }
    radius.min(max_radius(w, h))
}

fn coverage_mask(w: u32, h: u32, radius: f32) -> Result<Mask, MaskError> {
    let invalid = || MaskError::InvalidInput {
        width: w,
        height: h,
    };

    let mut mask = Mask::new(w, h).ok_or_else(invalid)?;
    let path = rounded_rect_path(w as f32, h as f32, radius).ok_or_else(invalid)?;
    mask.fill_path(&path, FillRule::Winding, true, Transform::identity());

    Ok(mask)
}

/// Rounded rectangle spanning `(0, 0)..(w, h)`, clockwise from the top edge.
/// `r` must be positive; a zero radius never reaches rasterization.
fn rounded_rect_path(w: f32, h: f32, r: f32) -> Option<Path> {
    let k = r * KAPPA;
    let mut pb = PathBuilder::new();
    pb.move_to(r, 0.0);
    pb.line_to(w - r, 0.0);
    pb.cubic_to(w - r + k, 0.0, w, r - k, w, r);
    pb.line_to(w, h - r);
    pb.cubic_to(w, h - r + k, w - r + k, h, w - r, h);
    pb.line_to(r, h);
    pb.cubic_to(r - k, h, 0.0, h - r + k, 0.0, h - r);
    pb.line_to(0.0, r);
    pb.cubic_to(0.0, r - k, r - k, 0.0, r, 0.0);
    pb.close();
    pb.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_bounds_cover_the_image() {
        let path = rounded_rect_path(200.0, 100.0, 25.0).unwrap();
        let bounds = path.bounds();
        assert_eq!(bounds.left(), 0.0);
        assert_eq!(bounds.top(), 0.0);
        assert_eq!(bounds.right(), 200.0);
        assert_eq!(bounds.bottom(), 100.0);
    }

    #[test]
    fn radius_is_clamped() {
        assert_eq!(clamp_radius(-3.0, 10, 10), 0.0);
        assert_eq!(clamp_radius(f32::NAN, 10, 10), 0.0);
        assert_eq!(clamp_radius(80.0, 200, 100), 50.0);
        assert_eq!(clamp_radius(12.5, 200, 100), 12.5);
    }

    #[test]
    fn coverage_is_full_inside_and_empty_at_corners() {
        let mask = coverage_mask(40, 40, 20.0).unwrap();
        let at = |x: u32, y: u32| mask.data()[(y * 40 + x) as usize];
        assert_eq!(at(20, 20), 255);
        assert_eq!(at(0, 0), 0);
        assert_eq!(at(39, 0), 0);
        assert_eq!(at(0, 39), 0);
        assert_eq!(at(39, 39), 0);
    }
}
