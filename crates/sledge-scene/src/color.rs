//! 8-bit RGBA colors used for face emphasis and flat materials.

/// An sRGB color with straight alpha, one byte per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const YELLOW: Self = Self::rgb(255, 255, 0);

    /// Creates an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Creates a color with an explicit alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Returns the same color with its alpha replaced.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Returns the same color with alpha set from an opacity in `[0, 1]`.
    ///
    /// The opacity is scaled to 0..=255 and truncated, so `1.0` maps to 255
    /// and `0.5` to 127. Values outside the range are clamped.
    pub fn with_opacity(self, opacity: f32) -> Self {
        let alpha = (opacity.clamp(0.0, 1.0) * 255.0) as u8;
        self.with_alpha(alpha)
    }

    /// Returns the channels as floats in `[0, 1]`.
    pub fn to_f32_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a].map(|c| f32::from(c) / 255.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opacity_truncates_like_an_integer_cast() {
        assert_eq!(Color::RED.with_opacity(1.0).a, 255);
        assert_eq!(Color::RED.with_opacity(0.5).a, 127);
        assert_eq!(Color::RED.with_opacity(0.0).a, 0);
        assert_eq!(Color::RED.with_opacity(4.0).a, 255);
    }

    #[test]
    fn translucent_red_keeps_channels() {
        let tint = Color::RED.with_alpha(128);
        assert_eq!(tint, Color::rgba(255, 0, 0, 128));
        assert_eq!(tint.to_f32_array()[0], 1.0);
    }
}
