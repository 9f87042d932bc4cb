//! Input filtering and output encoding.

use std::io::Cursor;
use std::path::Path;
use std::str::FromStr;

use image::codecs::avif::AvifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::webp::WebPEncoder;
use image::{DynamicImage, ImageFormat};

use crate::error::{Error, Result};

/// Quality used for every lossy encode.
pub const ENCODE_QUALITY: u8 = 90;

/// AVIF encoder speed, 1 (slowest) to 10.
const AVIF_SPEED: u8 = 4;

/// Extensions accepted as source images (compared case-insensitively).
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "tiff"];

/// Output codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Baseline JPEG; alpha is dropped.
    Jpeg,
    /// PNG, lossless.
    Png,
    /// WebP. The `image` encoder is lossless only, so quality is ignored.
    WebP,
    /// GIF.
    Gif,
    /// TIFF.
    Tiff,
    /// AVIF, lossy at the given quality.
    Avif,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            "webp" => Ok(Self::WebP),
            "gif" => Ok(Self::Gif),
            "tiff" | "tif" => Ok(Self::Tiff),
            "avif" => Ok(Self::Avif),
            other => Err(Error::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Check if a file has a supported source image extension.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()),
        None => false,
    }
}

/// Check whether a path carries a `.png` extension, ignoring case.
#[must_use]
pub fn is_png(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("png"))
}

/// Encode an image into an in-memory buffer.
///
/// `quality` only affects JPEG and AVIF.
///
/// # Errors
///
/// Returns [`Error::Image`] if the encoder rejects the image.
pub fn encode_image(img: &DynamicImage, format: OutputFormat, quality: u8) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());

    match format {
        OutputFormat::Jpeg => {
            let encoder = JpegEncoder::new_with_quality(&mut buf, quality);
            img.to_rgb8().write_with_encoder(encoder)?;
        }
        OutputFormat::Png => img.write_to(&mut buf, ImageFormat::Png)?,
        OutputFormat::WebP => {
            let encoder = WebPEncoder::new_lossless(&mut buf);
            img.to_rgba8().write_with_encoder(encoder)?;
        }
        OutputFormat::Gif => {
            DynamicImage::ImageRgba8(img.to_rgba8()).write_to(&mut buf, ImageFormat::Gif)?;
        }
        OutputFormat::Tiff => img.write_to(&mut buf, ImageFormat::Tiff)?,
        OutputFormat::Avif => {
            let encoder = AvifEncoder::new_with_speed_quality(&mut buf, AVIF_SPEED, quality);
            img.to_rgba8().write_with_encoder(encoder)?;
        }
    }

    Ok(buf.into_inner())
}

/// Encode at [`ENCODE_QUALITY`] and write to `path`.
///
/// # Errors
///
/// Returns an error if encoding or writing fails.
pub fn save_image(img: &DynamicImage, format: OutputFormat, path: &Path) -> Result<()> {
    let bytes = encode_image(img, format, ENCODE_QUALITY)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_supported_image_accepts_common_formats() {
        assert!(is_supported_image(Path::new("photo.jpg")));
        assert!(is_supported_image(Path::new("photo.JPEG")));
        assert!(is_supported_image(Path::new("photo.png")));
        assert!(is_supported_image(Path::new("photo.webp")));
        assert!(is_supported_image(Path::new("anim.GIF")));
        assert!(is_supported_image(Path::new("scan.tiff")));
    }

    #[test]
    fn is_supported_image_rejects_unsupported_formats() {
        assert!(!is_supported_image(Path::new("photo.bmp")));
        assert!(!is_supported_image(Path::new("scan.tif")));
        assert!(!is_supported_image(Path::new("notes.txt")));
        assert!(!is_supported_image(Path::new("photo")));
        assert!(!is_supported_image(Path::new(".png")));
    }

    #[test]
    fn png_detection_ignores_case() {
        assert!(is_png(Path::new("logo.PNG")));
        assert!(is_png(Path::new("logo.png")));
        assert!(!is_png(Path::new("logo.jpg")));
    }

    #[test]
    fn parses_codec_identifiers() {
        assert_eq!("jpeg".parse::<OutputFormat>().unwrap(), OutputFormat::Jpeg);
        assert_eq!("JPG".parse::<OutputFormat>().unwrap(), OutputFormat::Jpeg);
        assert_eq!("webp".parse::<OutputFormat>().unwrap(), OutputFormat::WebP);
        assert_eq!("tif".parse::<OutputFormat>().unwrap(), OutputFormat::Tiff);
        assert_eq!("AVIF".parse::<OutputFormat>().unwrap(), OutputFormat::Avif);
        assert!("heic".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn encoders_write_expected_signatures() {
        let img = DynamicImage::new_rgba8(10, 10);

        let jpeg = encode_image(&img, OutputFormat::Jpeg, ENCODE_QUALITY).unwrap();
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);

        let png = encode_image(&img, OutputFormat::Png, ENCODE_QUALITY).unwrap();
        assert_eq!(&png[0..8], &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]);

        let webp = encode_image(&img, OutputFormat::WebP, ENCODE_QUALITY).unwrap();
        assert_eq!(&webp[0..4], b"RIFF");

        let gif = encode_image(&img, OutputFormat::Gif, ENCODE_QUALITY).unwrap();
        assert_eq!(&gif[0..3], b"GIF");

        let tiff = encode_image(&img, OutputFormat::Tiff, ENCODE_QUALITY).unwrap();
        assert!(&tiff[0..2] == b"II" || &tiff[0..2] == b"MM");

        let avif = encode_image(&img, OutputFormat::Avif, ENCODE_QUALITY).unwrap();
        assert_eq!(&avif[4..8], b"ftyp");
    }

    #[test]
    fn save_image_writes_decodable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jpeg");
        save_image(&DynamicImage::new_rgb8(12, 8), OutputFormat::Jpeg, &path).unwrap();

        let back = image::open(&path).unwrap();
        assert_eq!((back.width(), back.height()), (12, 8));
    }
}
