//! Error types for the batch-image-processor crate.

use std::path::PathBuf;

/// Errors that can occur while loading configuration or processing images.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configuration document does not exist.
    #[error("configuration file not found: {}", path.display())]
    ConfigMissing {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The configuration document is not valid JSON or has the wrong shape.
    #[error("malformed configuration file {}: {source}", path.display())]
    ConfigMalformed {
        /// Path of the offending document.
        path: PathBuf,
        /// Underlying parse error.
        source: serde_json::Error,
    },

    /// The configuration parsed but holds values that cannot be used.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Watermarking is enabled but the watermark image is not on disk.
    #[error("watermark image not found: {}", path.display())]
    WatermarkMissing {
        /// Resolved watermark path.
        path: PathBuf,
    },

    /// The watermark does not fit inside the output canvas.
    #[error("watermark ({wm_width}x{wm_height}) is larger than the {width}x{height} canvas")]
    WatermarkTooLarge {
        /// Canvas width in pixels.
        width: u32,
        /// Canvas height in pixels.
        height: u32,
        /// Watermark width in pixels.
        wm_width: u32,
        /// Watermark height in pixels.
        wm_height: u32,
    },

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The image format is not supported.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// An SVG document could not be parsed or rendered.
    #[error("SVG rendering error: {0}")]
    Svg(String),

    /// An error occurred during image processing (load, save, encode).
    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
