//! Color conversion for terminal output.

use folio_core::Hsla;
use ratatui::style::Color;

/// Alpha below which a mark is not worth drawing in a terminal.
const MIN_VISIBLE_ALPHA: f32 = 0.004;

/// Convert HSL to RGB color. `s` and `l` are fractions in `[0, 1]`.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Color {
    if s == 0.0 {
        let v = (l * 255.0) as u8;
        return Color::Rgb(v, v, v);
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    let h = h.rem_euclid(360.0) / 360.0;

    let r = hue_to_rgb(p, q, h + 1.0 / 3.0);
    let g = hue_to_rgb(p, q, h);
    let b = hue_to_rgb(p, q, h - 1.0 / 3.0);

    Color::Rgb((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8)
}

fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

/// Flatten a translucent color onto a black terminal background.
///
/// Terminals have no alpha channel, so the lightness is scaled by the square
/// root of the alpha: faint effects stay visible without drowning out the
/// brighter ones. Returns `None` for marks too faint to see.
pub fn shade(color: Hsla, gain: f32) -> Option<Color> {
    if color.alpha < MIN_VISIBLE_ALPHA {
        return None;
    }
    let intensity = (color.alpha.sqrt() * gain).clamp(0.0, 1.0);
    let lightness = (color.lightness / 100.0) * intensity;
    Some(hsl_to_rgb(
        color.hue,
        (color.saturation / 100.0).clamp(0.0, 1.0),
        lightness.clamp(0.0, 1.0),
    ))
}
