// In crates/analytics/src/heatmap.rs

//! Maps bucket P&L onto a display intensity for calendar / heat-map views.

use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Above this intensity the light foreground color is used.
pub const CONTRAST_THRESHOLD: f64 = 0.6;
/// Lowest intensity any non-zero bucket is drawn with.
pub const MIN_INTENSITY: f64 = 0.2;

/// An opaque color, configured as "#rrggbb".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// The color drawn at `alpha` opacity.
    pub fn with_alpha(self, alpha: f64) -> Rgba {
        Rgba {
            r: self.r,
            g: self.g,
            b: self.b,
            alpha: alpha.clamp(0.0, 1.0),
        }
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let hex = value.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(format!("expected a color like \"#22c55e\", got \"{value}\""));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|e| format!("invalid color \"{value}\": {e}"))
        };
        Ok(Rgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: f64,
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {:.2})", self.r, self.g, self.b, self.alpha)
    }
}

/// Colors used by heat-map cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatmapPalette {
    pub profit: Rgb,
    pub loss: Rgb,
    /// Foreground on strongly tinted cells.
    pub light_text: Rgb,
    /// Foreground everywhere else.
    pub dark_text: Rgb,
}

impl Default for HeatmapPalette {
    fn default() -> Self {
        Self {
            profit: Rgb::new(0x22, 0xc5, 0x5e),
            loss: Rgb::new(0xef, 0x44, 0x44),
            light_text: Rgb::new(0xff, 0xff, 0xff),
            dark_text: Rgb::new(0x11, 0x18, 0x27),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Neutral,
    Profit,
    Loss,
}

/// How a single bucket should be drawn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapCell {
    pub tone: Tone,
    /// `None` for neutral cells.
    pub intensity: Option<f64>,
    pub background: Option<Rgba>,
    pub foreground: Rgb,
}

/// Series-wide maxima, computed once and shared by every bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct HeatmapScale {
    pub max_profit: Decimal,
    /// Magnitude of the largest loss, never negative.
    pub max_loss: Decimal,
}

impl HeatmapScale {
    pub fn new(max_profit: Decimal, max_loss: Decimal) -> Self {
        Self {
            max_profit: max_profit.max(Decimal::ZERO),
            max_loss: max_loss.abs(),
        }
    }

    /// Scans a bucketed series once for its largest profit and loss.
    pub fn from_pnls(pnls: impl IntoIterator<Item = Decimal>) -> Self {
        pnls.into_iter().fold(Self::default(), |scale, pnl| Self {
            max_profit: scale.max_profit.max(pnl),
            max_loss: scale.max_loss.max(-pnl),
        })
    }

    /// `0.2 + 0.8 * log10(1 + 9 * ratio)`, or `None` when the bucket is
    /// neutral.
    pub fn intensity(&self, pnl: Decimal) -> Option<f64> {
        if pnl.is_zero() || (self.max_profit.is_zero() && self.max_loss.is_zero()) {
            return None;
        }
        let max = if pnl > Decimal::ZERO { self.max_profit } else { self.max_loss };
        let ratio = if max.is_zero() {
            0.0
        } else {
            (pnl.abs() / max).to_f64().unwrap_or(0.0)
        };
        Some(MIN_INTENSITY + (1.0 - MIN_INTENSITY) * (1.0 + ratio * 9.0).log10())
    }

    pub fn cell(&self, pnl: Decimal, palette: &HeatmapPalette) -> HeatmapCell {
        let Some(intensity) = self.intensity(pnl) else {
            return HeatmapCell {
                tone: Tone::Neutral,
                intensity: None,
                background: None,
                foreground: palette.dark_text,
            };
        };

        let (tone, base) = if pnl > Decimal::ZERO {
            (Tone::Profit, palette.profit)
        } else {
            (Tone::Loss, palette.loss)
        };
        let foreground = if intensity > CONTRAST_THRESHOLD {
            palette.light_text
        } else {
            palette.dark_text
        };

        HeatmapCell {
            tone,
            intensity: Some(intensity),
            background: Some(base.with_alpha(intensity)),
            foreground,
        }
    }
}
