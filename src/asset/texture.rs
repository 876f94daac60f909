// asset/texture.rs
use glam::{Vec2, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Wrapping {
    #[default]
    ClampToEdge,
    Repeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorSpace {
    #[default]
    Srgb,
    Linear,
}

/// Decoded pixel data.
#[derive(Debug, Clone)]
pub enum TextureImage {
    Rgba8(image::RgbaImage),
    Rgba32F(image::Rgba32FImage),
}

impl TextureImage {
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            TextureImage::Rgba8(img) => img.dimensions(),
            TextureImage::Rgba32F(img) => img.dimensions(),
        }
    }

    pub fn is_hdr(&self) -> bool {
        matches!(self, TextureImage::Rgba32F(_))
    }

    /// Average colour over all pixels, in linear units for HDR images and
    /// normalised 0..1 for 8-bit images.
    pub fn mean_rgb(&self) -> Vec3 {
        let (sum, count) = match self {
            TextureImage::Rgba8(img) => img.pixels().fold((Vec3::ZERO, 0usize), |(acc, n), p| {
                (
                    acc + Vec3::new(p[0] as f32, p[1] as f32, p[2] as f32) / 255.0,
                    n + 1,
                )
            }),
            TextureImage::Rgba32F(img) => img
                .pixels()
                .fold((Vec3::ZERO, 0usize), |(acc, n), p| {
                    (acc + Vec3::new(p[0], p[1], p[2]), n + 1)
                }),
        };

        if count == 0 {
            Vec3::ZERO
        } else {
            sum / count as f32
        }
    }
}

#[derive(Debug, Clone)]
pub enum TextureState {
    Pending,
    Ready(TextureImage),
    Failed(String),
}

/// A texture registered with the scene. The handle exists as soon as a load
/// is requested; pixels arrive later through the [`TextureLoader`](super::TextureLoader).
#[derive(Debug, Clone)]
pub struct Texture {
    source: String,
    state: TextureState,
    version: u32,
    pub wrap_s: Wrapping,
    pub wrap_t: Wrapping,
    pub repeat: Vec2,
    pub color_space: ColorSpace,
}

impl Texture {
    pub fn pending(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            state: TextureState::Pending,
            version: 0,
            wrap_s: Wrapping::default(),
            wrap_t: Wrapping::default(),
            repeat: Vec2::ONE,
            color_space: ColorSpace::default(),
        }
    }

    pub fn from_image(source: impl Into<String>, image: TextureImage) -> Self {
        let mut texture = Self::pending(source);
        texture.set_image(image);
        texture
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn state(&self) -> &TextureState {
        &self.state
    }

    pub fn image(&self) -> Option<&TextureImage> {
        match &self.state {
            TextureState::Ready(image) => Some(image),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, TextureState::Ready(_))
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, TextureState::Pending)
    }

    /// Bumped on every state change so GPU copies know when to re-upload.
    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn set_image(&mut self, image: TextureImage) {
        if image.is_hdr() {
            self.color_space = ColorSpace::Linear;
        }
        self.state = TextureState::Ready(image);
        self.version = self.version.wrapping_add(1);
    }

    pub fn fail(&mut self, reason: impl Into<String>) {
        self.state = TextureState::Failed(reason.into());
        self.version = self.version.wrapping_add(1);
    }

    pub fn set_wrapping(&mut self, wrapping: Wrapping) {
        self.wrap_s = wrapping;
        self.wrap_t = wrapping;
    }

    pub fn set_repeat(&mut self, x: f32, y: f32) {
        self.repeat = Vec2::new(x, y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_texture_has_no_image() {
        let texture = Texture::pending("textures/a.jpg");
        assert!(texture.is_pending());
        assert!(texture.image().is_none());
        assert_eq!(texture.version(), 0);
        assert_eq!(texture.repeat, Vec2::ONE);
    }

    #[test]
    fn set_image_bumps_version() {
        let mut texture = Texture::pending("a.png");
        texture.set_image(TextureImage::Rgba8(image::RgbaImage::new(1, 1)));
        assert!(texture.is_ready());
        assert_eq!(texture.version(), 1);

        texture.fail("gone");
        assert!(!texture.is_ready());
        assert_eq!(texture.version(), 2);
    }

    #[test]
    fn hdr_images_are_linear() {
        let texture = Texture::from_image(
            "env.hdr",
            TextureImage::Rgba32F(image::Rgba32FImage::new(2, 1)),
        );
        assert_eq!(texture.color_space, ColorSpace::Linear);
    }

    #[test]
    fn mean_rgb_averages_pixels() {
        let mut img = image::Rgba32FImage::new(2, 1);
        img.put_pixel(0, 0, image::Rgba([2.0, 0.0, 0.0, 1.0]));
        img.put_pixel(1, 0, image::Rgba([0.0, 4.0, 0.0, 1.0]));

        let mean = TextureImage::Rgba32F(img).mean_rgb();
        assert!(mean.abs_diff_eq(Vec3::new(1.0, 2.0, 0.0), 1e-6));
    }
}
