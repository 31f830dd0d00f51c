//! Accent colors and the star-count color ramp

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// 24-bit RGB accent color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color(u32);

impl Color {
    /// Default starboard yellow (#f1c40f)
    pub const GOLD: Color = Color(0x00f1_c40f);

    #[inline]
    pub const fn new(rgb: u32) -> Self {
        Self(rgb & 0x00ff_ffff)
    }

    #[inline]
    pub const fn rgb(self) -> u32 {
        self.0
    }

    /// Parse `#rrggbb` (the leading `#` is optional)
    pub fn parse_hex(s: &str) -> Result<Self, ColorParseError> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 {
            return Err(ColorParseError::InvalidHex(s.to_string()));
        }
        u32::from_str_radix(hex, 16)
            .map(Self)
            .map_err(|_| ColorParseError::InvalidHex(s.to_string()))
    }
}

/// Error when parsing a color
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorParseError {
    #[error("invalid hex color: {0}")]
    InvalidHex(String),
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(u32),
            Hex(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Int(rgb) => Ok(Color::new(rgb)),
            Raw::Hex(s) => Color::parse_hex(&s).map_err(serde::de::Error::custom),
        }
    }
}

/// Stepped gradient: a color per star band, up to `max` stars
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradientSpec {
    pub colors: Vec<Color>,
    pub max: u32,
}

/// Starboard accent: either a fixed color or a gradient over star counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorSpec {
    Fixed(Color),
    Gradient(GradientSpec),
}

impl Default for ColorSpec {
    fn default() -> Self {
        Self::Fixed(Color::GOLD)
    }
}

impl ColorSpec {
    /// Accent color for a star post with `count` stars.
    ///
    /// Gradient index is `floor((count - 1) / max * len)`, clamped to the
    /// palette. An empty palette falls back to the default gold.
    pub fn color_for(&self, count: u32) -> Color {
        match self {
            Self::Fixed(color) => *color,
            Self::Gradient(GradientSpec { colors, max }) => {
                let Some(last) = colors.len().checked_sub(1) else {
                    return Color::GOLD;
                };
                // Integer form of the floor keeps band edges exact
                let max = i64::from((*max).max(1));
                let raw = ((i64::from(count) - 1) * colors.len() as i64).div_euclid(max);
                let index = raw.clamp(0, last as i64) as usize;
                colors[index]
            }
        }
    }

    /// Check the spec can produce colors (non-empty palette, positive max)
    pub fn is_usable(&self) -> bool {
        match self {
            Self::Fixed(_) => true,
            Self::Gradient(g) => !g.colors.is_empty() && g.max >= 1,
        }
    }
}

impl From<Color> for ColorSpec {
    fn from(color: Color) -> Self {
        Self::Fixed(color)
    }
}
