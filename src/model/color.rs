use std::fmt;

use serde::{Deserialize, Serialize};

/// Solid color with three channels, each wrapped into `[0, 256)`.
///
/// Channels wrap rather than clamp: `300 -> 44`, `-1 -> 255`. Non-finite inputs become `0`.
/// The [`fmt::Display`] form is the canonical `rgb(r, g, b)` encoding handed to surfaces that
/// take CSS-style fill strings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Rgb {
    r: f64,
    g: f64,
    b: f64,
}

impl Rgb {
    /// Build a color, wrapping each channel into `[0, 256)`.
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self {
            r: wrap_channel(r),
            g: wrap_channel(g),
            b: wrap_channel(b),
        }
    }

    /// Build a color from optional channels; missing channels are `0`.
    pub fn from_parts(r: Option<f64>, g: Option<f64>, b: Option<f64>) -> Self {
        Self::new(r.unwrap_or(0.0), g.unwrap_or(0.0), b.unwrap_or(0.0))
    }

    /// Build a color from 8-bit channels.
    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f64,
            g: g as f64,
            b: b as f64,
        }
    }

    /// Pure black.
    pub const BLACK: Rgb = Rgb::from_rgb8(0, 0, 0);

    /// Red channel.
    pub fn r(&self) -> f64 {
        self.r
    }

    /// Green channel.
    pub fn g(&self) -> f64 {
        self.g
    }

    /// Blue channel.
    pub fn b(&self) -> f64 {
        self.b
    }

    /// Truncate each channel to 8 bits.
    pub fn to_rgb8(self) -> [u8; 3] {
        // Channels are already in [0, 256), so the floor always fits.
        [
            self.r.floor() as u8,
            self.g.floor() as u8,
            self.b.floor() as u8,
        ]
    }

    /// Opaque RGBA8 pixel for raster surfaces.
    pub fn to_rgba8(self) -> [u8; 4] {
        let [r, g, b] = self.to_rgb8();
        [r, g, b, 255]
    }
}

fn wrap_channel(v: f64) -> f64 {
    if !v.is_finite() {
        return 0.0;
    }
    let w = v.rem_euclid(256.0);
    // rem_euclid can round up to the modulus for tiny negative inputs, and keeps -0.0.
    if w == 0.0 || w >= 256.0 { 0.0 } else { w }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            Arr(Vec<f64>),
            Obj {
                #[serde(default)]
                r: Option<f64>,
                #[serde(default)]
                g: Option<f64>,
                #[serde(default)]
                b: Option<f64>,
            },
        }

        match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => parse_hex(&s).map_err(serde::de::Error::custom),
            Repr::Obj { r, g, b } => Ok(Self::from_parts(r, g, b)),
            Repr::Arr(v) => {
                if v.len() > 3 {
                    return Err(serde::de::Error::custom(
                        "rgb array must have at most 3 entries ([r,g,b])",
                    ));
                }
                let at = |i: usize| v.get(i).copied();
                Ok(Self::from_parts(at(0), at(1), at(2)))
            }
        }
    }
}

fn parse_hex(s: &str) -> Result<Rgb, String> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);

    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    if s.len() != 6 || !s.is_ascii() {
        return Err("hex color must be #RRGGBB (case-insensitive)".to_owned());
    }

    Ok(Rgb::from_rgb8(
        hex_byte(&s[0..2])?,
        hex_byte(&s[2..4])?,
        hex_byte(&s[4..6])?,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/model/color.rs"]
mod tests;
