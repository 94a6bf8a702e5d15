//! Hex color parsing for text and shadow tints

use serde::{Deserialize, Serialize};

/// Errors produced when parsing a hex color string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorError {
    /// String does not contain exactly six hex digits
    #[error("Expected 6 hex digits, got {0} characters in '{1}'")]
    InvalidLength(usize, String),

    /// A character is not a hex digit
    #[error("Invalid hex digit in color '{0}'")]
    InvalidDigit(String),
}

/// Linear RGB color with components in the 0.0-1.0 range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel
    pub r: f32,
    /// Green channel
    pub g: f32,
    /// Blue channel
    pub b: f32,
}

impl Color {
    /// Opaque white, the tint that leaves the atlas unchanged
    pub const WHITE: Self = Self { r: 1.0, g: 1.0, b: 1.0 };

    /// Opaque black
    pub const BLACK: Self = Self { r: 0.0, g: 0.0, b: 0.0 };

    /// Create a color from channel values
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parse a `rrggbb` hex string, with or without a leading `#`
    ///
    /// # Example
    ///
    /// ```
    /// use bmtext::text::Color;
    ///
    /// let red = Color::from_hex("ff0000").unwrap();
    /// assert_eq!(red, Color::new(1.0, 0.0, 0.0));
    /// ```
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 {
            return Err(ColorError::InvalidLength(digits.len(), hex.to_string()));
        }

        // from_str_radix tolerates a leading sign, so check digits first
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorError::InvalidDigit(hex.to_string()));
        }
        let value = u32::from_str_radix(digits, 16)
            .map_err(|_| ColorError::InvalidDigit(hex.to_string()))?;

        Ok(Self::from_rgb_u32(value))
    }

    /// Build a color from a packed `0xRRGGBB` value
    pub fn from_rgb_u32(value: u32) -> Self {
        let channel = |shift: u32| f32::from(((value >> shift) & 0xFF) as u8) / 255.0;
        Self::new(channel(16), channel(8), channel(0))
    }

    /// Channels as an array, the layout material uniforms expect
    pub const fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}
