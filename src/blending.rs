//! Alpha handling and compositing.
//!
//! The watermark is applied with standard "over" blending where the overlay's
//! alpha is first scaled by the configured opacity:
//! `a = a_src * opacity`, `out = a * src + (1 - a) * dst`.

use image::{DynamicImage, Rgba, RgbaImage};

use crate::error::{Error, Result};

/// Fully transparent black, the background used when flattening PNG sources.
pub const TRANSPARENT_BLACK: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Drop the alpha channel, keeping the stored color values as they are.
#[must_use]
pub fn remove_alpha(img: &DynamicImage) -> DynamicImage {
    DynamicImage::ImageRgb8(img.to_rgb8())
}

/// Composite an image onto a solid background, removing its transparency.
///
/// An image without an alpha channel is returned unchanged.
#[must_use]
pub fn flatten(img: DynamicImage, background: Rgba<u8>) -> DynamicImage {
    if !img.color().has_alpha() {
        return img;
    }

    let mut rgba = img.to_rgba8();
    let bg_alpha = f32::from(background[3]) / 255.0;
    for px in rgba.pixels_mut() {
        let alpha = f32::from(px[3]) / 255.0;
        for ch in 0..3 {
            let src = f32::from(px[ch]);
            let bg = f32::from(background[ch]) * bg_alpha;
            px[ch] = to_channel(alpha * src + (1.0 - alpha) * bg);
        }
        px[3] = 255;
    }
    DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(rgba).to_rgb8())
}

/// Composite `overlay` onto `canvas` with its top-left corner at `(x, y)`.
///
/// Offsets may be negative; the overlay is clipped to the canvas bounds.
pub fn composite_over(canvas: &mut RgbaImage, overlay: &RgbaImage, x: i64, y: i64, opacity: f32) {
    let canvas_w = i64::from(canvas.width());
    let canvas_h = i64::from(canvas.height());

    // Clip to canvas bounds
    let x1 = x.max(0);
    let y1 = y.max(0);
    let x2 = (x + i64::from(overlay.width())).min(canvas_w);
    let y2 = (y + i64::from(overlay.height())).min(canvas_h);

    if x1 >= x2 || y1 >= y2 {
        return;
    }

    let opacity = opacity.clamp(0.0, 1.0);

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    for cy in y1..y2 {
        for cx in x1..x2 {
            let src = overlay.get_pixel((cx - x) as u32, (cy - y) as u32);
            let src_a = f32::from(src[3]) / 255.0 * opacity;
            if src_a <= 0.0 {
                continue;
            }

            let dst = canvas.get_pixel_mut(cx as u32, cy as u32);
            let dst_a = f32::from(dst[3]) / 255.0;
            let out_a = src_a + dst_a * (1.0 - src_a);

            for ch in 0..3 {
                let s = f32::from(src[ch]);
                let d = f32::from(dst[ch]);
                let premul = s * src_a + d * dst_a * (1.0 - src_a);
                dst[ch] = to_channel(premul / out_a);
            }
            dst[3] = to_channel(out_a * 255.0);
        }
    }
}

/// Check that the overlay fits inside the canvas.
///
/// # Errors
///
/// Returns [`Error::WatermarkTooLarge`] if either dimension exceeds the canvas.
pub fn ensure_fits(canvas: (u32, u32), overlay: (u32, u32)) -> Result<()> {
    if overlay.0 > canvas.0 || overlay.1 > canvas.1 {
        return Err(Error::WatermarkTooLarge {
            width: canvas.0,
            height: canvas.1,
            wm_width: overlay.0,
            wm_height: overlay.1,
        });
    }
    Ok(())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_channel(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}
