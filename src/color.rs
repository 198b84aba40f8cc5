use crate::error::{KeyraError, KeyraResult};
use serde::{Deserialize, Serialize};

/// A straight RGB color sample, one byte per channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    /// Red channel intensity.
    pub r: u8,
    /// Green channel intensity.
    pub g: u8,
    /// Blue channel intensity.
    pub b: u8,
}

impl Rgb {
    /// Build a color sample from channel intensities.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// An HSL comparison value: hue in `[0,360)`, saturation and lightness in `[0,100]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    /// Hue in degrees, `[0,360)`.
    pub h: f64,
    /// Saturation percentage, `[0,100]`.
    pub s: f64,
    /// Lightness percentage, `[0,100]`.
    pub l: f64,
}

/// The coordinate space a similarity test runs in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorSpace {
    /// Direct per-channel tolerance on the RGB triple.
    #[default]
    Rgb,
    /// Per-component tolerance on the HSL conversion of both colors.
    Hsl,
}

/// Convert an RGB sample to HSL.
///
/// Achromatic inputs (`r == g == b`) have no defined hue; they map to
/// `h = 0, s = 0` rather than erroring.
pub fn rgb_to_hsl(rgb: Rgb) -> Hsl {
    let r = f64::from(rgb.r) / 255.0;
    let g = f64::from(rgb.g) / 255.0;
    let b = f64::from(rgb.b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let l = (max + min) / 2.0;

    if delta == 0.0 {
        return Hsl {
            h: 0.0,
            s: 0.0,
            l: l * 100.0,
        };
    }

    let s = if l <= 0.5 {
        delta / (max + min)
    } else {
        delta / (2.0 - max - min)
    };

    // Six-sector hue, 60 degrees per sector, wrapped into [0,360).
    let sector = if max == r {
        (g - b) / delta
    } else if max == g {
        2.0 + (b - r) / delta
    } else {
        4.0 + (r - g) / delta
    };
    let mut h = sector * 60.0;
    if h < 0.0 {
        h += 360.0;
    }

    Hsl {
        h,
        s: s * 100.0,
        l: l * 100.0,
    }
}

/// True iff every channel's absolute difference is within `tolerance`.
pub fn similar_rgb(a: Rgb, b: Rgb, tolerance: f64) -> bool {
    let dr = (i16::from(a.r) - i16::from(b.r)).abs();
    let dg = (i16::from(a.g) - i16::from(b.g)).abs();
    let db = (i16::from(a.b) - i16::from(b.b)).abs();
    f64::from(dr) <= tolerance && f64::from(dg) <= tolerance && f64::from(db) <= tolerance
}

/// True iff every HSL component's absolute difference is within `tolerance`.
///
/// Hue is compared as a plain linear difference, not a circular one: two
/// hues adjacent across the 0/360 boundary (say 359 and 1) measure 358
/// apart and will not match under a small tolerance.
pub fn similar_hsl(a: Hsl, b: Hsl, tolerance: f64) -> bool {
    (a.h - b.h).abs() <= tolerance
        && (a.s - b.s).abs() <= tolerance
        && (a.l - b.l).abs() <= tolerance
}

/// Key target configuration: which color gets keyed out, and how loosely.
///
/// Immutable for the lifetime of a keying session.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChromaKey {
    /// The reference background color.
    pub key_color: Rgb,
    /// Maximum allowed per-component difference for a match.
    pub tolerance: f64,
    /// The space the similarity test runs in.
    pub color_space: ColorSpace,
}

impl Default for ChromaKey {
    fn default() -> Self {
        Self {
            key_color: Rgb::new(0, 255, 5),
            tolerance: 120.0,
            color_space: ColorSpace::Rgb,
        }
    }
}

impl ChromaKey {
    /// Build a validated key target.
    pub fn new(key_color: Rgb, tolerance: f64, color_space: ColorSpace) -> KeyraResult<Self> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(KeyraError::validation(
                "ChromaKey tolerance must be finite and >= 0",
            ));
        }
        Ok(Self {
            key_color,
            tolerance,
            color_space,
        })
    }

    /// Decide whether a sampled pixel color should be treated as background.
    pub fn matches(&self, sample: Rgb) -> bool {
        match self.color_space {
            ColorSpace::Rgb => similar_rgb(sample, self.key_color, self.tolerance),
            ColorSpace::Hsl => similar_hsl(
                rgb_to_hsl(sample),
                rgb_to_hsl(self.key_color),
                self.tolerance,
            ),
        }
    }
}
