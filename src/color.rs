//! Numeric helpers for chart geometry and color.

use ratatui::style::Color;
use std::fmt;

/// Map `value` from `domain` onto `range` linearly.
///
/// A degenerate domain maps everything to the start of the range.
#[inline]
pub fn lerp(domain: (f64, f64), range: (f64, f64), value: f64) -> f64 {
    let (d0, d1) = domain;
    let (r0, r1) = range;
    if d1 == d0 {
        return r0;
    }
    let t = (value - d0) / (d1 - d0);
    r0 + t * (r1 - r0)
}

/// HSL color with hue in degrees and saturation/lightness in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
}

impl Hsl {
    pub const fn new(hue: f64, saturation: f64, lightness: f64) -> Self {
        Self {
            hue,
            saturation,
            lightness,
        }
    }

    pub fn to_rgb(self) -> (u8, u8, u8) {
        let h = self.hue.rem_euclid(360.0) / 360.0;
        let s = (self.saturation / 100.0).clamp(0.0, 1.0);
        let l = (self.lightness / 100.0).clamp(0.0, 1.0);

        if s == 0.0 {
            let v = channel(l);
            return (v, v, v);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        (
            channel(hue_to_rgb(p, q, h + 1.0 / 3.0)),
            channel(hue_to_rgb(p, q, h)),
            channel(hue_to_rgb(p, q, h - 1.0 / 3.0)),
        )
    }

    #[inline]
    pub fn to_color(self) -> Color {
        let (r, g, b) = self.to_rgb();
        Color::Rgb(r, g, b)
    }
}

impl fmt::Display for Hsl {
    /// CSS form, e.g. `hsl(30, 89%, 42.5%)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsl({}, {}%, {}%)",
            self.hue, self.saturation, self.lightness
        )
    }
}

fn hue_to_rgb(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

#[inline]
fn channel(v: f64) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}
