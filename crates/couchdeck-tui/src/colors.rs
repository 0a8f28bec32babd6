//! Dark theme colors, with fade blending toward the background

use ratatui::style::Color;

pub const BG: Color = Color::Rgb(0x14, 0x13, 0x13);
pub const SURFACE: Color = Color::Rgb(0x20, 0x1f, 0x20);
pub const SURFACE_HIGH: Color = Color::Rgb(0x2b, 0x2a, 0x2a);

pub const ON_SURFACE: Color = Color::Rgb(0xe6, 0xe1, 0xe1);
pub const SUBTEXT: Color = Color::Rgb(0xcb, 0xc5, 0xca);
pub const OUTLINE: Color = Color::Rgb(0x94, 0x8f, 0x94);

pub const PRIMARY: Color = Color::Rgb(0xcb, 0xc4, 0xcb);

pub const SUCCESS: Color = Color::Rgb(0xb5, 0xcc, 0xba);
pub const WARNING: Color = Color::Rgb(0xff, 0xd9, 0x66);
pub const ERROR: Color = Color::Rgb(0xff, 0xb4, 0xab);

/// Blend `color` toward [`BG`] by `opacity` (1.0 is unchanged). Non-RGB
/// colors are returned as-is.
#[must_use]
// Channels are blended within 0..=255 before the cast
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn faded(color: Color, opacity: f64) -> Color {
    let (Color::Rgb(r, g, b), Color::Rgb(br, bg, bb)) = (color, BG) else {
        return color;
    };
    let opacity = opacity.clamp(0.0, 1.0);
    let mix = |c: u8, base: u8| {
        (f64::from(base) + (f64::from(c) - f64::from(base)) * opacity).round() as u8
    };
    Color::Rgb(mix(r, br), mix(g, bg), mix(b, bb))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_opacity_is_identity() {
        assert_eq!(faded(ON_SURFACE, 1.0), ON_SURFACE);
    }

    #[test]
    fn test_zero_opacity_is_background() {
        assert_eq!(faded(PRIMARY, 0.0), BG);
        assert_eq!(faded(PRIMARY, -3.0), BG);
    }

    #[test]
    fn test_named_colors_pass_through() {
        assert_eq!(faded(Color::Red, 0.5), Color::Red);
    }
}
