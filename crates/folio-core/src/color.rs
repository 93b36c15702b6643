//! HSLA color values as used by the effect palettes.

/// A color in hue/saturation/lightness space with an alpha channel.
///
/// Hue is in degrees, saturation and lightness are percentages (0-100), and
/// alpha is clamped to `[0, 1]` on construction so every value handed to a
/// surface is a valid rendering alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsla {
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
    pub alpha: f32,
}

impl Hsla {
    pub fn new(hue: f32, saturation: f32, lightness: f32, alpha: f32) -> Self {
        Self {
            hue,
            saturation,
            lightness,
            alpha: clamp_alpha(alpha),
        }
    }

    /// Fully transparent black, the `"transparent"` gradient stop.
    pub const fn transparent() -> Self {
        Self {
            hue: 0.0,
            saturation: 0.0,
            lightness: 0.0,
            alpha: 0.0,
        }
    }

    /// Same color with a different alpha.
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            alpha: clamp_alpha(alpha),
            ..self
        }
    }

    pub fn is_transparent(&self) -> bool {
        self.alpha <= 0.0
    }
}

/// Clamp an alpha to `[0, 1]`, mapping NaN to fully transparent.
fn clamp_alpha(alpha: f32) -> f32 {
    if alpha.is_nan() {
        0.0
    } else {
        alpha.clamp(0.0, 1.0)
    }
}
