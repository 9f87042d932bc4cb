//! Run configuration loaded from `config.json`.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::format::OutputFormat;
use crate::placement::{Anchor, DEFAULT_PADDING};

/// File name of the configuration document inside the base directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Settings for one batch run.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory scanned for source images.
    pub input_folder: PathBuf,
    /// Directory that receives the converted images.
    pub output_folder: PathBuf,
    /// Output canvas width in pixels.
    pub width: u32,
    /// Output canvas height in pixels.
    pub height: u32,
    /// Codec identifier, also used verbatim as the output extension.
    pub output_format: String,
    /// Drop the alpha channel of PNG sources before resizing.
    #[serde(default)]
    pub remove_white_background: bool,
    /// Watermark overlay settings.
    #[serde(default)]
    pub watermark: WatermarkConfig,
}

/// Watermark overlay settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatermarkConfig {
    /// Whether to composite the watermark at all.
    #[serde(default)]
    pub enabled: bool,
    /// Watermark image, relative to the base directory.
    #[serde(default)]
    pub image_path: PathBuf,
    /// Width the watermark is resized to; height follows the aspect ratio.
    #[serde(default)]
    pub width: u32,
    /// Blend opacity in `[0, 1]`.
    #[serde(default = "default_opacity")]
    pub opacity: f32,
    /// Anchor name, see [`Anchor::from_name`]. Absent or `null` means bottom-right.
    #[serde(default)]
    pub position: Option<String>,
    /// Inset from the canvas edges in whole pixels.
    #[serde(default)]
    pub padding: Option<u32>,
}

fn default_opacity() -> f32 {
    1.0
}

impl WatermarkConfig {
    /// The configured anchor; unknown names resolve to bottom-right.
    #[must_use]
    pub fn anchor(&self) -> Anchor {
        self.position
            .as_deref()
            .map_or(Anchor::BottomRight, Anchor::from_name)
    }

    /// Effective padding. Unset and zero both mean [`DEFAULT_PADDING`].
    #[must_use]
    pub fn padding(&self) -> u32 {
        match self.padding {
            Some(p) if p > 0 => p,
            _ => DEFAULT_PADDING,
        }
    }
}

impl Config {
    /// Load `config.json` from `base_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigMissing`] if the file does not exist,
    /// [`Error::ConfigMalformed`] if it cannot be parsed and
    /// [`Error::InvalidConfig`] if a value is out of range.
    pub fn load(base_dir: &Path) -> Result<Self> {
        Self::from_path(&base_dir.join(CONFIG_FILE_NAME))
    }

    /// Load a configuration document from an explicit path.
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`].
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::ConfigMissing {
                    path: path.to_path_buf(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        let config: Self = serde_json::from_str(&text).map_err(|source| Error::ConfigMalformed {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that the JSON shape alone cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] describing the first bad value.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidConfig(format!(
                "output size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        self.output_codec()?;

        if self.watermark.enabled {
            if self.watermark.width == 0 {
                return Err(Error::InvalidConfig(
                    "watermark.width must be non-zero".to_string(),
                ));
            }
            if !(0.0..=1.0).contains(&self.watermark.opacity) {
                return Err(Error::InvalidConfig(format!(
                    "watermark.opacity must be between 0 and 1, got {}",
                    self.watermark.opacity
                )));
            }
        }
        Ok(())
    }

    /// Parsed output codec.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `outputFormat` names no known codec.
    pub fn output_codec(&self) -> Result<OutputFormat> {
        self.output_format.parse().map_err(|_| {
            Error::InvalidConfig(format!("unknown outputFormat {:?}", self.output_format))
        })
    }

    /// Watermark image path resolved against `base_dir`.
    #[must_use]
    pub fn watermark_path(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.watermark.image_path)
    }

    /// Output path for a source file: its base name plus the configured extension.
    #[must_use]
    pub fn output_path_for(&self, source: &Path) -> PathBuf {
        let stem = source.file_stem().unwrap_or_default().to_string_lossy();
        self.output_folder.join(format!("{stem}.{}", self.output_format))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "inputFolder": "./entrada",
        "outputFolder": "./salida",
        "width": 800,
        "height": 600,
        "outputFormat": "webp",
        "quality": 80,
        "removeWhiteBackground": true,
        "watermark": {
            "enabled": true,
            "imagePath": "./watermark.png",
            "width": 150,
            "opacity": 0.7,
            "position": "top-left",
            "padding": 12
        }
    }"#;

    fn parse(text: &str) -> Config {
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn parses_camel_case_fields() {
        let cfg = parse(SAMPLE);
        assert_eq!(cfg.input_folder, PathBuf::from("./entrada"));
        assert_eq!(cfg.output_folder, PathBuf::from("./salida"));
        assert_eq!((cfg.width, cfg.height), (800, 600));
        assert_eq!(cfg.output_format, "webp");
        assert!(cfg.remove_white_background);
        assert!(cfg.watermark.enabled);
        assert_eq!(cfg.watermark.width, 150);
        assert!((cfg.watermark.opacity - 0.7).abs() < f32::EPSILON);
        assert_eq!(cfg.watermark.anchor(), Anchor::TopLeft);
        assert_eq!(cfg.watermark.padding(), 12);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn padding_defaults_when_unset_or_zero() {
        let mut wm = WatermarkConfig::default();
        assert_eq!(wm.padding(), DEFAULT_PADDING);
        wm.padding = Some(0);
        assert_eq!(wm.padding(), DEFAULT_PADDING);
        wm.padding = Some(5);
        assert_eq!(wm.padding(), 5);
    }

    #[test]
    fn watermark_section_is_optional() {
        let cfg = parse(
            r#"{"inputFolder":"in","outputFolder":"out","width":10,"height":10,"outputFormat":"png"}"#,
        );
        assert!(!cfg.watermark.enabled);
        assert!(!cfg.remove_white_background);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn null_position_falls_back_to_bottom_right() {
        let cfg = parse(
            r#"{"inputFolder":"in","outputFolder":"out","width":10,"height":10,"outputFormat":"png",
                "watermark":{"enabled":true,"imagePath":"w.png","width":5,"opacity":0.5,
                             "position":null,"padding":null}}"#,
        );
        assert_eq!(cfg.watermark.position, None);
        assert_eq!(cfg.watermark.anchor(), Anchor::BottomRight);
        assert_eq!(cfg.watermark.padding(), DEFAULT_PADDING);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_unknown_output_format() {
        let mut cfg = parse(SAMPLE);
        cfg.output_format = "heic".to_string();
        assert!(matches!(cfg.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn rejects_out_of_range_values() {
        let mut cfg = parse(SAMPLE);
        cfg.width = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = parse(SAMPLE);
        cfg.watermark.opacity = 1.5;
        assert!(cfg.validate().is_err());

        // Ignored when the watermark is off.
        cfg.watermark.enabled = false;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn output_path_keeps_stem_and_swaps_extension() {
        let cfg = parse(SAMPLE);
        assert_eq!(
            cfg.output_path_for(Path::new("/photos/beach.day.JPG")),
            PathBuf::from("./salida/beach.day.webp")
        );
    }

    #[test]
    fn watermark_path_is_relative_to_base_dir() {
        let cfg = parse(SAMPLE);
        assert_eq!(
            cfg.watermark_path(Path::new("/opt/tool")),
            PathBuf::from("/opt/tool/./watermark.png")
        );
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        match Config::load(dir.path()) {
            Err(Error::ConfigMissing { path }) => {
                assert_eq!(path, dir.path().join(CONFIG_FILE_NAME));
            }
            other => panic!("expected ConfigMissing, got {other:?}"),
        }
    }

    #[test]
    fn load_reports_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "{ \"width\": ").unwrap();
        assert!(matches!(
            Config::load(dir.path()),
            Err(Error::ConfigMalformed { .. })
        ));
    }
}
