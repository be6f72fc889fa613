//! Color conversion between hex, RGB, HSL and HSV
//!
//! Hue is expressed in degrees (`0..=360`), saturation, lightness and value
//! in percent (`0..=100`). Conversions towards RGB round each channel to the
//! nearest integer, so an RGB -> HSL -> RGB trip returns the input.
//!
//! ```
//! use helpkit_common::color::{hex_to_rgb, rgb_to_hex, Rgb};
//!
//! let rgb = hex_to_rgb("#F80").unwrap();
//! assert_eq!(rgb, Rgb::new(255, 136, 0));
//! assert_eq!(rgb_to_hex(rgb), "#ff8800");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Color conversion errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ColorError {
    #[error("Invalid hex color: {0}")]
    InvalidHex(String),

    #[error("{component} out of range: {value}")]
    OutOfRange { component: &'static str, value: f64 },
}

/// Result of the color conversions
pub type ColorResult<T> = Result<T, ColorError>;

/// 24-bit color, one byte per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Lowercase `#rrggbb`
    pub fn to_hex(self) -> String {
        rgb_to_hex(self)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&rgb_to_hex(*self))
    }
}

impl FromStr for Rgb {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hex_to_rgb(s)
    }
}

/// Hue in degrees (0..360), saturation and lightness in percent (0..100)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    pub const fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }

    /// Round every component to one decimal place
    pub fn rounded(self) -> Self {
        Self { h: round1(self.h), s: round1(self.s), l: round1(self.l) }
    }
}

/// Hue in degrees (0..360), saturation and value in percent (0..100)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsv {
    pub h: f64,
    pub s: f64,
    pub v: f64,
}

impl Hsv {
    pub const fn new(h: f64, s: f64, v: f64) -> Self {
        Self { h, s, v }
    }

    /// Components rounded to one decimal, for display and comparisons
    pub fn rounded(self) -> Self {
        Self { h: round1(self.h), s: round1(self.s), v: round1(self.v) }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Lowercase `#rrggbb`
pub fn rgb_to_hex(rgb: Rgb) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb.r, rgb.g, rgb.b)
}

/// Parse `#rgb`, `#rrggbb`, with or without `#`, in any case
pub fn hex_to_rgb(hex: &str) -> ColorResult<Rgb> {
    let digits = hex.trim();
    let digits = digits.strip_prefix('#').unwrap_or(digits);
    let invalid = || ColorError::InvalidHex(hex.to_string());

    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        _ => return Err(invalid()),
    };

    let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).map_err(|_| invalid());
    Ok(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
}

/// Whether the input parses as a hex color
pub fn is_hex_color(hex: &str) -> bool {
    hex_to_rgb(hex).is_ok()
}

/// Hue in degrees plus the max and min of the normalized channels
fn hue_and_extremes(rgb: Rgb) -> (f64, f64, f64) {
    let r = f64::from(rgb.r) / 255.0;
    let g = f64::from(rgb.g) / 255.0;
    let b = f64::from(rgb.b) / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let hue = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (((g - b) / delta).rem_euclid(6.0))
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };

    (hue, max, min)
}

/// Convert to HSL
pub fn rgb_to_hsl(rgb: Rgb) -> Hsl {
    let (h, max, min) = hue_and_extremes(rgb);
    let delta = max - min;
    let l = (max + min) / 2.0;
    let s = if delta == 0.0 { 0.0 } else { delta / (1.0 - (2.0 * l - 1.0).abs()) };

    Hsl::new(h, s * 100.0, l * 100.0)
}

/// Convert to HSV
pub fn rgb_to_hsv(rgb: Rgb) -> Hsv {
    let (h, max, min) = hue_and_extremes(rgb);
    let s = if max == 0.0 { 0.0 } else { (max - min) / max };

    Hsv::new(h, s * 100.0, max * 100.0)
}

fn check_range(component: &'static str, value: f64, max: f64) -> ColorResult<()> {
    if value.is_finite() && (0.0..=max).contains(&value) {
        Ok(())
    } else {
        Err(ColorError::OutOfRange { component, value })
    }
}

/// Build RGB from chroma, hue and the lightness match value
fn from_chroma(hue: f64, chroma: f64, m: f64) -> Rgb {
    let sector = (hue % 360.0) / 60.0;
    let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());

    let (r, g, b) = match sector as u8 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };

    let to_byte = |c: f64| ((c + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgb::new(to_byte(r), to_byte(g), to_byte(b))
}

/// Convert from HSL
///
/// # Errors
/// [`ColorError::OutOfRange`] when a component is outside its range.
pub fn hsl_to_rgb(hsl: Hsl) -> ColorResult<Rgb> {
    check_range("hue", hsl.h, 360.0)?;
    check_range("saturation", hsl.s, 100.0)?;
    check_range("lightness", hsl.l, 100.0)?;

    let s = hsl.s / 100.0;
    let l = hsl.l / 100.0;
    let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;

    Ok(from_chroma(hsl.h, chroma, l - chroma / 2.0))
}

/// Convert from HSV
///
/// # Errors
/// [`ColorError::OutOfRange`] when a component is outside its range.
pub fn hsv_to_rgb(hsv: Hsv) -> ColorResult<Rgb> {
    check_range("hue", hsv.h, 360.0)?;
    check_range("saturation", hsv.s, 100.0)?;
    check_range("value", hsv.v, 100.0)?;

    let s = hsv.s / 100.0;
    let v = hsv.v / 100.0;
    let chroma = v * s;

    Ok(from_chroma(hsv.h, chroma, v - chroma))
}

/// Parse a hex color straight to HSL
pub fn hex_to_hsl(hex: &str) -> ColorResult<Hsl> {
    hex_to_rgb(hex).map(rgb_to_hsl)
}

/// Format an HSL color as `#rrggbb`
pub fn hsl_to_hex(hsl: Hsl) -> ColorResult<String> {
    hsl_to_rgb(hsl).map(rgb_to_hex)
}

fn shift_lightness(hex: &str, delta: f64) -> ColorResult<String> {
    let mut hsl = hex_to_hsl(hex)?;
    hsl.l = (hsl.l + delta).clamp(0.0, 100.0);
    hsl_to_hex(hsl)
}

/// Raise HSL lightness by `amount` percentage points, clamped at 100
pub fn lighten(hex: &str, amount: f64) -> ColorResult<String> {
    shift_lightness(hex, amount)
}

/// Lower HSL lightness by `amount` percentage points, clamped at 0
pub fn darken(hex: &str, amount: f64) -> ColorResult<String> {
    shift_lightness(hex, -amount)
}

/// WCAG relative luminance in `0.0..=1.0`
pub fn luminance(rgb: Rgb) -> f64 {
    let linear = |channel: u8| {
        let c = f64::from(channel) / 255.0;
        if c <= 0.039_28 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };

    0.2126 * linear(rgb.r) + 0.7152 * linear(rgb.g) + 0.0722 * linear(rgb.b)
}

/// WCAG contrast ratio between two colors, from 1 to 21
pub fn contrast_ratio(a: Rgb, b: Rgb) -> f64 {
    let (la, lb) = (luminance(a), luminance(b));
    let (light, dark) = if la >= lb { (la, lb) } else { (lb, la) };
    (light + 0.05) / (dark + 0.05)
}

/// Black or white, whichever reads better on the given background
pub fn contrast_color(background_hex: &str) -> ColorResult<&'static str> {
    let background = hex_to_rgb(background_hex)?;
    if contrast_ratio(background, Rgb::BLACK) >= contrast_ratio(background, Rgb::WHITE) {
        Ok("#000000")
    } else {
        Ok("#ffffff")
    }
}

/// Blend two colors; `weight` is the share of `a`, clamped to `0.0..=1.0`
pub fn mix(a: Rgb, b: Rgb, weight: f64) -> Rgb {
    let w = weight.clamp(0.0, 1.0);
    let blend = |x: u8, y: u8| (f64::from(x) * w + f64::from(y) * (1.0 - w)).round() as u8;
    Rgb::new(blend(a.r, b.r), blend(a.g, b.g), blend(a.b, b.b))
}

#[cfg(test)]
mod tests {
    //! Unit tests for color conversion.
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 0.05
    }

    /// Validates `hex_to_rgb` for the accepted input shapes.
    ///
    /// Assertions:
    /// - Confirms short and long forms decode identically.
    /// - Confirms the leading `#` and letter case are optional.
    #[test]
    fn test_hex_to_rgb_accepts_short_and_long_forms() {
        assert_eq!(hex_to_rgb("#abc").unwrap(), Rgb::new(0xaa, 0xbb, 0xcc));
        assert_eq!(hex_to_rgb("AABBCC").unwrap(), Rgb::new(0xaa, 0xbb, 0xcc));
        assert_eq!(hex_to_rgb(" #000000 ").unwrap(), Rgb::BLACK);
    }

    #[test]
    fn test_hex_to_rgb_rejects_garbage() {
        for input in ["", "#", "#12", "#12345", "#1234567", "#ggg", "#12 456", "#ééé"] {
            assert!(
                matches!(hex_to_rgb(input), Err(ColorError::InvalidHex(_))),
                "{input:?} should be rejected"
            );
        }
    }

    /// Validates `rgb_to_hex` round-trips.
    ///
    /// Assertions:
    /// - Confirms every sampled color survives hex encoding and decoding.
    #[test]
    fn test_rgb_hex_round_trip() {
        for rgb in [Rgb::BLACK, Rgb::WHITE, Rgb::new(18, 52, 86), Rgb::new(255, 0, 127)] {
            assert_eq!(hex_to_rgb(&rgb_to_hex(rgb)).unwrap(), rgb);
        }
        assert_eq!(Rgb::new(1, 2, 3).to_string(), "#010203");
    }

    #[test]
    fn test_rgb_to_hsl_known_values() {
        let red = rgb_to_hsl(Rgb::new(255, 0, 0));
        assert!(approx(red.h, 0.0) && approx(red.s, 100.0) && approx(red.l, 50.0));

        let teal = rgb_to_hsl(Rgb::new(0, 128, 128)).rounded();
        assert_eq!(teal, Hsl::new(180.0, 100.0, 25.1));

        let grey = rgb_to_hsl(Rgb::new(128, 128, 128));
        assert!(approx(grey.s, 0.0) && approx(grey.h, 0.0));
    }

    #[test]
    fn test_hsl_round_trip_is_exact() {
        for rgb in [Rgb::new(12, 200, 99), Rgb::new(250, 250, 10), Rgb::new(3, 7, 240), Rgb::WHITE] {
            assert_eq!(hsl_to_rgb(rgb_to_hsl(rgb)).unwrap(), rgb);
            assert_eq!(hsv_to_rgb(rgb_to_hsv(rgb)).unwrap(), rgb);
        }
    }

    #[test]
    fn test_hsv_known_values() {
        let hsv = rgb_to_hsv(Rgb::new(255, 128, 0)).rounded();
        assert_eq!(hsv, Hsv::new(30.1, 100.0, 100.0));
        assert_eq!(hsv_to_rgb(Hsv::new(360.0, 100.0, 100.0)).unwrap(), Rgb::new(255, 0, 0));
    }

    #[test]
    fn test_out_of_range_components() {
        let err = hsl_to_rgb(Hsl::new(400.0, 50.0, 50.0)).unwrap_err();
        assert_eq!(err, ColorError::OutOfRange { component: "hue", value: 400.0 });
        assert!(hsv_to_rgb(Hsv::new(10.0, -1.0, 50.0)).is_err());
        assert!(hsl_to_rgb(Hsl::new(10.0, 50.0, f64::NAN)).is_err());
    }

    #[test]
    fn test_lighten_and_darken_clamp() {
        assert_eq!(lighten("#000000", 50.0).unwrap(), "#808080");
        assert_eq!(lighten("#808080", 90.0).unwrap(), "#ffffff");
        assert_eq!(darken("#ffffff", 100.0).unwrap(), "#000000");
        assert!(darken("nope", 10.0).is_err());
    }

    #[test]
    fn test_contrast_color() {
        assert_eq!(contrast_color("#ffffff").unwrap(), "#000000");
        assert_eq!(contrast_color("#ffeb3b").unwrap(), "#000000");
        assert_eq!(contrast_color("#1a237e").unwrap(), "#ffffff");
        assert!(approx(contrast_ratio(Rgb::BLACK, Rgb::WHITE), 21.0));
    }

    #[test]
    fn test_mix() {
        assert_eq!(mix(Rgb::BLACK, Rgb::WHITE, 0.5), Rgb::new(128, 128, 128));
        assert_eq!(mix(Rgb::new(255, 0, 0), Rgb::new(0, 0, 255), 1.0), Rgb::new(255, 0, 0));
        assert_eq!(mix(Rgb::new(255, 0, 0), Rgb::new(0, 0, 255), 7.0), Rgb::new(255, 0, 0));
    }
}
