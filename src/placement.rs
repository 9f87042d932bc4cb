//! Watermark placement on the output canvas.
//!
//! Positions are computed as real numbers so that the `center` anchor can land
//! on half pixels; callers round with [`round_coordinate`] when compositing.

/// Padding used when the configuration leaves it unset (or sets it to zero).
pub const DEFAULT_PADDING: u32 = 20;

/// Named position of the watermark on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    /// Lower right corner, inset by the padding.
    #[default]
    BottomRight,
    /// Lower left corner, inset by the padding.
    BottomLeft,
    /// Upper right corner, inset by the padding.
    TopRight,
    /// Upper left corner, inset by the padding.
    TopLeft,
    /// Centered on both axes; padding is ignored.
    Center,
}

impl Anchor {
    /// Parse an anchor name such as `"top-left"`.
    ///
    /// Unknown names fall back to [`Anchor::BottomRight`] instead of failing.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "bottom-left" => Self::BottomLeft,
            "top-right" => Self::TopRight,
            "top-left" => Self::TopLeft,
            "center" => Self::Center,
            _ => Self::BottomRight,
        }
    }

    /// Canonical configuration name of this anchor.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::BottomRight => "bottom-right",
            Self::BottomLeft => "bottom-left",
            Self::TopRight => "top-right",
            Self::TopLeft => "top-left",
            Self::Center => "center",
        }
    }
}

/// Compute the top-left coordinate of the watermark.
///
/// * `canvas` - `(width, height)` of the output canvas.
/// * `watermark` - `(width, height)` of the prepared watermark raster.
/// * `padding` - inset from the canvas edges for the corner anchors.
///
/// The result may be negative when the watermark is larger than the canvas.
#[must_use]
pub fn watermark_position(
    canvas: (u32, u32),
    watermark: (u32, u32),
    anchor: Anchor,
    padding: u32,
) -> (f64, f64) {
    let (cw, ch) = (f64::from(canvas.0), f64::from(canvas.1));
    let (ww, wh) = (f64::from(watermark.0), f64::from(watermark.1));
    let p = f64::from(padding);

    let right = cw - ww - p;
    let bottom = ch - wh - p;

    match anchor {
        Anchor::BottomRight => (right, bottom),
        Anchor::BottomLeft => (p, bottom),
        Anchor::TopRight => (right, p),
        Anchor::TopLeft => (p, p),
        Anchor::Center => ((cw - ww) / 2.0, (ch - wh) / 2.0),
    }
}

/// Round a placement coordinate to a pixel offset, halves going up.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn round_coordinate(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}
