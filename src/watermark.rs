//! The watermark raster shared by every file in a run.

use std::path::Path;

use image::{DynamicImage, RgbaImage};

use crate::error::{Error, Result};
use crate::resize::resize_to_width;
use crate::svg;

/// A decoded watermark, resized and carrying an alpha channel.
///
/// Prepared once per run and only read afterwards.
#[derive(Debug, Clone)]
pub struct WatermarkAsset {
    image: RgbaImage,
}

impl WatermarkAsset {
    /// Load the watermark at `path` and resize it to `width`.
    ///
    /// SVG files are rasterized straight at the target width.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WatermarkMissing`] if the file does not exist, or a
    /// decode error if it cannot be read.
    pub fn load(path: &Path, width: u32) -> Result<Self> {
        if !path.exists() {
            return Err(Error::WatermarkMissing {
                path: path.to_path_buf(),
            });
        }

        if svg::is_svg(path) {
            return Ok(Self {
                image: svg::rasterize_file(path, width)?,
            });
        }

        let decoded = image::open(path)?;
        Ok(Self::from_image(&decoded, width))
    }

    /// Build an asset from an already decoded image.
    #[must_use]
    pub fn from_image(img: &DynamicImage, width: u32) -> Self {
        Self {
            image: resize_to_width(img, width).to_rgba8(),
        }
    }

    /// The prepared raster.
    #[must_use]
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// `(width, height)` in pixels.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}
