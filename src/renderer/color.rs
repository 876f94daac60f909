use glam::Vec3;

/// An sRGB colour as authored (hex literals, picker values). Lighting code
/// works on [`Color::to_linear`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color(pub Vec3);

impl Color {
    pub const BLACK: Self = Self(Vec3::ZERO);
    pub const WHITE: Self = Self(Vec3::ONE);

    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self(Vec3::new(r, g, b))
    }

    /// `0xRRGGBB`; bits above the low 24 are ignored.
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Self::rgb(channel(16), channel(8), channel(0))
    }

    pub fn to_hex(self) -> u32 {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.0.x) << 16) | (channel(self.0.y) << 8) | channel(self.0.z)
    }

    pub fn to_linear(self) -> Vec3 {
        Vec3::new(
            srgb_to_linear(self.0.x),
            srgb_to_linear(self.0.y),
            srgb_to_linear(self.0.z),
        )
    }

    pub fn to_wgpu(self) -> wgpu::Color {
        let linear = self.to_linear();
        wgpu::Color {
            r: linear.x as f64,
            g: linear.y as f64,
            b: linear.z as f64,
            a: 1.0,
        }
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trips() {
        for hex in [0xff0000, 0x00ffff, 0x999999, 0xB69D86] {
            assert_eq!(Color::from_hex(hex).to_hex(), hex);
        }
    }

    #[test]
    fn primaries_are_unchanged_by_linearisation() {
        assert_eq!(Color::from_hex(0xff0000).to_linear(), Vec3::X);
        assert_eq!(Color::BLACK.to_linear(), Vec3::ZERO);
    }

    #[test]
    fn mid_grey_darkens_in_linear_space() {
        let grey = Color::from_hex(0x999999).to_linear();
        assert!(grey.x < 0.6 && grey.x > 0.3);
    }
}
