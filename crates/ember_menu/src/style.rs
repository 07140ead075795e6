//! Colors and palettes.
//!
//! `Color` doubles as the datum of color-picker items, so it is serializable.

use serde::{Deserialize, Serialize};

/// RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red component (0-1).
    pub r: f32,
    /// Green component (0-1).
    pub g: f32,
    /// Blue component (0-1).
    pub b: f32,
    /// Alpha component (0-1).
    pub a: f32,
}

impl Color {
    /// Transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);
    /// Solid black.
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);
    /// Solid white.
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);
    /// Neon green (terminal style).
    pub const NEON_GREEN: Self = Self::rgba(0.2, 1.0, 0.3, 1.0);
    /// Neon cyan.
    pub const NEON_CYAN: Self = Self::rgba(0.2, 0.9, 1.0, 1.0);
    /// Warning orange.
    pub const WARNING: Self = Self::rgba(1.0, 0.6, 0.1, 1.0);

    /// Creates a color from RGBA values (0-1).
    #[must_use]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a color from RGB values (0-1) with full alpha.
    #[must_use]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// Creates a color from hex value (0xRRGGBBAA).
    #[must_use]
    pub fn hex(hex: u32) -> Self {
        let r = ((hex >> 24) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let b = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let a = (hex & 0xFF) as f32 / 255.0;
        Self::rgba(r, g, b, a)
    }

    /// Returns a new color with different alpha.
    #[must_use]
    pub const fn with_alpha(self, a: f32) -> Self {
        Self::rgba(self.r, self.g, self.b, a)
    }

    /// Linearly interpolates between two colors.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self::rgba(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
    }

    /// Channel by index (0 = r, 1 = g, 2 = b, 3 = a).
    #[must_use]
    pub fn channel(self, index: usize) -> f32 {
        match index {
            0 => self.r,
            1 => self.g,
            2 => self.b,
            _ => self.a,
        }
    }

    /// Returns a copy with one channel replaced, clamped to 0-1.
    #[must_use]
    pub fn with_channel(self, index: usize, value: f32) -> Self {
        let value = value.clamp(0.0, 1.0);
        let mut out = self;
        match index {
            0 => out.r = value,
            1 => out.g = value,
            2 => out.b = value,
            _ => out.a = value,
        }
        out
    }

    /// Converts to array format.
    #[must_use]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Colors a skin draws with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    /// Surface color (rows, panels).
    pub surface: Color,
    /// Surface of an expanded menu header or a hovered option.
    pub surface_active: Color,
    /// Primary accent color.
    pub primary: Color,
    /// Secondary accent color.
    pub secondary: Color,
    /// Text color.
    pub text: Color,
    /// Muted text color.
    pub text_muted: Color,
    /// Border color.
    pub border: Color,
    /// Warning color (key capture, focused text).
    pub warning: Color,
}

impl Palette {
    /// Dark terminal palette.
    pub const TERMINAL: Self = Self {
        surface: Color::rgba(0.05, 0.05, 0.08, 0.95),
        surface_active: Color::rgba(0.10, 0.14, 0.10, 0.95),
        primary: Color::NEON_GREEN,
        secondary: Color::NEON_CYAN,
        text: Color::rgba(0.9, 0.9, 0.9, 1.0),
        text_muted: Color::rgba(0.5, 0.5, 0.5, 1.0),
        border: Color::rgba(0.15, 0.2, 0.15, 0.8),
        warning: Color::WARNING,
    };
}

impl Default for Palette {
    fn default() -> Self {
        Self::TERMINAL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_lerp() {
        let mid = Color::BLACK.lerp(Color::WHITE, 0.5);

        assert!((mid.r - 0.5).abs() < 0.01);
        assert!((mid.g - 0.5).abs() < 0.01);
        assert!((mid.b - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_color_hex() {
        let color = Color::hex(0xFF00_00FF);
        assert!((color.r - 1.0).abs() < 0.01);
        assert!((color.g - 0.0).abs() < 0.01);
        assert!((color.a - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_with_channel_clamps() {
        let color = Color::BLACK.with_channel(1, 2.0).with_channel(3, -1.0);
        assert_eq!(color.channel(1), 1.0);
        assert_eq!(color.channel(3), 0.0);
    }
}
