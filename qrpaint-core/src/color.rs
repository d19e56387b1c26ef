//! Flat RGB colours with CSS-style hex literals.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{CoreError, CoreResult};

/// A flat RGB fill colour.
///
/// Serializes as a `#RRGGBB` hex string so configs stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Opaque black, the default module colour.
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0 };

    /// Opaque white, the default background colour.
    pub const WHITE: Self = Self {
        r: 255,
        g: 255,
        b: 255,
    };

    /// Create a colour from channel values.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#RGB` or `#RRGGBB` hex literal.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Color`] if the literal is not one of the two
    /// accepted forms.
    pub fn from_hex(literal: &str) -> CoreResult<Self> {
        let digits = literal
            .strip_prefix('#')
            .ok_or_else(|| CoreError::Color(literal.to_string()))?;

        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(CoreError::Color(literal.to_string()));
        }

        let channel = |s: &str| {
            u8::from_str_radix(s, 16).map_err(|_| CoreError::Color(literal.to_string()))
        };

        match digits.len() {
            // #abc is shorthand for #aabbcc
            3 => Ok(Self::new(
                channel(&digits[0..1])? * 17,
                channel(&digits[1..2])? * 17,
                channel(&digits[2..3])? * 17,
            )),
            6 => Ok(Self::new(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            _ => Err(CoreError::Color(literal.to_string())),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let literal = String::deserialize(deserializer)?;
        Self::from_hex(&literal).map_err(serde::de::Error::custom)
    }
}
