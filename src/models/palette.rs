//! Colour palette for workstation screens and status lights.
//!
//! Values follow the Tailwind shades used by the rest of the office scene.

use image::Rgba;
use serde::{Serialize, Serializer};

/// An opaque RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Build a colour from a `0xRRGGBB` literal.
    pub const fn hex(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xFF) as u8,
            g: ((value >> 8) & 0xFF) as u8,
            b: (value & 0xFF) as u8,
        }
    }

    /// Parse `#RRGGBB` (the leading `#` is optional).
    pub fn parse_hex(text: &str) -> Option<Self> {
        let digits = text.strip_prefix('#').unwrap_or(text);
        if digits.len() != 6 {
            return None;
        }
        u32::from_str_radix(digits, 16).ok().map(Self::hex)
    }

    /// `#RRGGBB`, upper case.
    pub fn to_hex_string(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Pixel value with full opacity.
    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, 255])
    }

    /// Linear interpolation towards `other`; `t` is clamped to [0, 1].
    pub fn lerp(self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Color {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex_string())
    }
}

// Screen colours
pub const SCREEN_BACKGROUND_TOP: Color = Color::hex(0x0F172A); // slate-900
pub const SCREEN_BACKGROUND_BOTTOM: Color = Color::hex(0x1E293B); // slate-800
pub const SCREEN_TEXT: Color = Color::hex(0xF8FAFC); // slate-50
pub const SCREEN_ACCENT: Color = Color::hex(0x38BDF8); // sky-400
pub const SCREEN_SUCCESS: Color = Color::hex(0x4ADE80); // green-400
pub const SCREEN_ERROR: Color = Color::hex(0xF87171); // red-400
pub const SCREEN_WARNING: Color = Color::hex(0xFBBF24); // amber-400
pub const PROGRESS_TRACK: Color = Color::hex(0x334155); // slate-700
pub const LINE_NUMBER: Color = Color::hex(0x64748B); // slate-500

// Status colours
pub const STATUS_IDLE: Color = Color::hex(0x6B7280); // gray-500
pub const STATUS_WORKING: Color = Color::hex(0xFBBF24); // amber-400
pub const STATUS_THINKING: Color = Color::hex(0xF59E0B); // amber-500
pub const STATUS_COMPLETED: Color = Color::hex(0x10B981); // emerald-500
pub const STATUS_ERROR: Color = Color::hex(0xEF4444); // red-500

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_roundtrip_of_status_colours() {
        assert_eq!(STATUS_WORKING.to_hex_string(), "#FBBF24");
        assert_eq!(Color::parse_hex("#fbbf24"), Some(STATUS_WORKING));
        assert_eq!(Color::parse_hex("6B7280"), Some(STATUS_IDLE));
    }

    #[test]
    fn test_parse_hex_rejects_garbage() {
        assert_eq!(Color::parse_hex("#12345"), None);
        assert_eq!(Color::parse_hex("#GGGGGG"), None);
        assert_eq!(Color::parse_hex(""), None);
    }

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(SCREEN_ACCENT.lerp(SCREEN_SUCCESS, 0.0), SCREEN_ACCENT);
        assert_eq!(SCREEN_ACCENT.lerp(SCREEN_SUCCESS, 1.0), SCREEN_SUCCESS);
        assert_eq!(SCREEN_ACCENT.lerp(SCREEN_SUCCESS, 7.0), SCREEN_SUCCESS);
    }

    #[test]
    fn test_to_rgba_is_opaque() {
        assert_eq!(STATUS_ERROR.to_rgba(), Rgba([0xEF, 0x44, 0x44, 255]));
    }
}
