//! Color parsing for appearance fields
//!
//! Colors are stored as normalized `#AARRGGBB` strings, or as theme
//! references (`@primary`) which are resolved by the renderer.

use crate::constants::colors::THEME_REF_PREFIX;

/// ARGB color parsed from a hex string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexColor(u32);

impl HexColor {
    /// Parse `RGB`, `RRGGBB` or `AARRGGBB`, with or without a leading `#`.
    /// 3- and 6-digit forms get full opacity.
    pub fn parse(s: &str) -> Option<Self> {
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }

        match hex.len() {
            3 => {
                let expanded: String = hex.chars().flat_map(|c| [c, c]).collect();
                u32::from_str_radix(&expanded, 16).ok().map(|rgb| Self(0xFF00_0000 | rgb))
            }
            6 => u32::from_str_radix(hex, 16).ok().map(|rgb| Self(0xFF00_0000 | rgb)),
            8 => u32::from_str_radix(hex, 16).ok().map(Self),
            _ => None,
        }
    }

    pub fn from_argb32(argb: u32) -> Self {
        Self(argb)
    }

    /// Plain `0xRRGGBB` integer, fully opaque
    pub fn from_rgb24(rgb: u32) -> Self {
        Self(0xFF00_0000 | (rgb & 0x00FF_FFFF))
    }

    pub fn argb32(self) -> u32 {
        self.0
    }

    pub fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub fn to_hex_string(self) -> String {
        format!("#{:08X}", self.0)
    }
}

/// Normalize a color field value.
///
/// Theme references are kept verbatim; hex strings are rewritten to
/// `#AARRGGBB`. Returns `None` for anything else.
pub fn normalize(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if let Some(name) = trimmed.strip_prefix(THEME_REF_PREFIX) {
        if !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Some(trimmed.to_string());
        }
        return None;
    }
    HexColor::parse(trimmed).map(HexColor::to_hex_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_six_digit_gets_full_alpha() {
        let c = HexColor::parse("#00FF00").unwrap();
        assert_eq!(c.argb32(), 0xFF00FF00);
        assert_eq!(c.alpha(), 0xFF);
    }

    #[test]
    fn test_parse_short_form() {
        assert_eq!(HexColor::parse("f0a").unwrap().argb32(), 0xFFFF00AA);
    }

    #[test]
    fn test_parse_eight_digit_keeps_alpha() {
        assert_eq!(HexColor::parse("7F000000").unwrap().alpha(), 0x7F);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(HexColor::parse("invalid").is_none());
        assert!(HexColor::parse("#12345").is_none());
        assert!(HexColor::parse("").is_none());
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("#ff0000").as_deref(), Some("#FFFF0000"));
        assert_eq!(normalize("@primary").as_deref(), Some("@primary"));
        assert_eq!(normalize("@"), None);
        assert_eq!(normalize("red"), None);
    }

    #[test]
    fn test_from_rgb24_masks_high_bits() {
        assert_eq!(HexColor::from_rgb24(0x12_00FF00).to_hex_string(), "#FF00FF00");
    }
}
