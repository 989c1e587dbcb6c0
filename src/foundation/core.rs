use crate::foundation::error::{VignetteError, VignetteResult};

/// Default render resolution in pixels per figure unit.
pub const DEFAULT_DPI: u32 = 100;

/// Figure size in abstract figure units.
///
/// Pixel dimensions are `units * dpi`; the default of `(7.0, 4.0)` maps to
/// 700x400 at [`DEFAULT_DPI`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FigSize {
    /// Width in figure units.
    pub width: f64,
    /// Height in figure units.
    pub height: f64,
}

impl Default for FigSize {
    fn default() -> Self {
        Self {
            width: 7.0,
            height: 4.0,
        }
    }
}

impl FigSize {
    /// Create a validated size with finite, positive dimensions.
    pub fn new(width: f64, height: f64) -> VignetteResult<Self> {
        if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
            return Err(VignetteError::validation(
                "FigSize dimensions must be finite and > 0",
            ));
        }
        Ok(Self { width, height })
    }

    /// Pixel dimensions at `dpi`, rounded to the nearest pixel, at least 1x1.
    pub fn to_pixels(self, dpi: u32) -> (u32, u32) {
        let px = |units: f64| ((units * f64::from(dpi)).round() as u32).max(1);
        (px(self.width), px(self.height))
    }
}
