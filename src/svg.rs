//! SVG rasterization via `resvg`.

use std::path::Path;

use image::{DynamicImage, RgbaImage};
use resvg::{tiny_skia, usvg};

use crate::error::{Error, Result};
use crate::format::{save_image, OutputFormat};
use crate::resize::scaled_height;

/// Width used by the watermark preconverter when none is given.
pub const DEFAULT_RASTER_WIDTH: u32 = 200;

/// Check whether a path carries a `.svg` extension, ignoring case.
#[must_use]
pub fn is_svg(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"))
}

/// Render SVG source bytes to an RGBA raster `width` pixels wide.
///
/// Height follows the document's aspect ratio.
///
/// # Errors
///
/// Returns [`Error::Svg`] if the document cannot be parsed or the target
/// size is unusable.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn rasterize(data: &[u8], width: u32) -> Result<RgbaImage> {
    let tree = usvg::Tree::from_data(data, &usvg::Options::default())
        .map_err(|e| Error::Svg(e.to_string()))?;

    let size = tree.size();
    let height = scaled_height(
        (size.width().ceil() as u32, size.height().ceil() as u32),
        width,
    );
    #[allow(clippy::cast_precision_loss)]
    let scale = width as f32 / size.width();

    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| Error::Svg(format!("cannot allocate {width}x{height} pixmap")))?;
    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );

    // tiny-skia stores premultiplied alpha
    let mut raw = Vec::with_capacity(pixmap.pixels().len() * 4);
    for px in pixmap.pixels() {
        let c = px.demultiply();
        raw.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }

    RgbaImage::from_raw(width, height, raw)
        .ok_or_else(|| Error::Svg("rendered buffer has unexpected length".to_string()))
}

/// Read an SVG file and render it `width` pixels wide.
///
/// # Errors
///
/// Returns an error if the file cannot be read or rendered.
pub fn rasterize_file(path: &Path, width: u32) -> Result<RgbaImage> {
    let data = std::fs::read(path)?;
    rasterize(&data, width)
}

/// Convert a vector watermark into a PNG ready for the batch run.
///
/// # Errors
///
/// Returns an error if reading, rendering or writing fails.
pub fn convert_to_png(input: &Path, output: &Path, width: u32) -> Result<()> {
    let raster = rasterize_file(input, width)?;
    save_image(&DynamicImage::ImageRgba8(raster), OutputFormat::Png, output)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BADGE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="20">
        <rect x="0" y="0" width="40" height="20" fill="#ff0000"/>
    </svg>"##;

    #[test]
    fn rasterizes_at_requested_width() {
        let img = rasterize(BADGE.as_bytes(), 200).unwrap();
        assert_eq!((img.width(), img.height()), (200, 100));
        let px = img.get_pixel(100, 50);
        assert_eq!(px.0, [255, 0, 0, 255]);
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            rasterize(b"definitely not svg", 10),
            Err(Error::Svg(_))
        ));
    }

    #[test]
    fn converts_file_to_png() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("watermark.svg");
        let output = dir.path().join("watermark.png");
        std::fs::write(&input, BADGE).unwrap();

        convert_to_png(&input, &output, DEFAULT_RASTER_WIDTH).unwrap();

        let back = image::open(&output).unwrap();
        assert_eq!((back.width(), back.height()), (200, 100));
    }

    #[test]
    fn svg_extension_check() {
        assert!(is_svg(Path::new("logo.SVG")));
        assert!(!is_svg(Path::new("logo.png")));
    }
}
