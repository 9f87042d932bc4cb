//! Resizing helpers built on `image::imageops`.

use image::imageops::FilterType;
use image::DynamicImage;

/// Filter used for every resize.
pub const FILTER: FilterType = FilterType::Lanczos3;

/// Scale to fill `width x height` and crop the overflow around the center.
///
/// The result is always exactly the requested size.
#[must_use]
pub fn resize_cover(img: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    img.resize_to_fill(width, height, FILTER)
}

/// Height that keeps the aspect ratio when scaling `src` to `target_width`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn scaled_height(src: (u32, u32), target_width: u32) -> u32 {
    if src.0 == 0 {
        return 1;
    }
    let scale = f64::from(target_width) / f64::from(src.0);
    let h = (f64::from(src.1) * scale).round() as u32;
    h.max(1)
}

/// Resize to `width`, deriving the height from the aspect ratio.
#[must_use]
pub fn resize_to_width(img: &DynamicImage, width: u32) -> DynamicImage {
    let height = scaled_height((img.width(), img.height()), width);
    img.resize_exact(width, height, FILTER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cover_produces_exact_target_size() {
        for &(sw, sh) in &[(1000, 500), (300, 900), (64, 64), (7, 3)] {
            let img = DynamicImage::new_rgb8(sw, sh);
            let out = resize_cover(&img, 120, 80);
            assert_eq!((out.width(), out.height()), (120, 80), "from {sw}x{sh}");
        }
    }

    #[test]
    fn cover_crops_the_center() {
        // Left half black, right half white; a square crop keeps both halves.
        let mut src = image::RgbImage::new(200, 100);
        for (x, _, px) in src.enumerate_pixels_mut() {
            *px = if x < 100 {
                image::Rgb([0, 0, 0])
            } else {
                image::Rgb([255, 255, 255])
            };
        }
        let out = resize_cover(&DynamicImage::ImageRgb8(src), 50, 50).to_rgb8();
        assert!(out.get_pixel(2, 25)[0] < 30);
        assert!(out.get_pixel(47, 25)[0] > 225);
    }

    #[test]
    fn scaled_height_preserves_aspect() {
        assert_eq!(scaled_height((400, 100), 200), 50);
        assert_eq!(scaled_height((100, 400), 50), 200);
        assert_eq!(scaled_height((3, 2), 100), 67);
        assert_eq!(scaled_height((1000, 1), 10), 1);
    }

    #[test]
    fn resize_to_width_hits_requested_width() {
        let img = DynamicImage::new_rgba8(400, 100);
        let out = resize_to_width(&img, 150);
        assert_eq!((out.width(), out.height()), (150, 38));
    }
}
