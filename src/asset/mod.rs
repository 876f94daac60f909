pub mod cache;
pub mod geometry;
pub mod handle;
pub mod loader;
pub mod texture;

pub use cache::AssetCache;
pub use geometry::{Geometry, GeometryKind};
pub use handle::Handle;
pub use loader::{LoadError, TextureLoader};
pub use texture::{ColorSpace, Texture, TextureImage, TextureState, Wrapping};

/// CPU-side asset storage owned by a [`Scene`](crate::scene::Scene).
pub struct Assets {
    pub geometries: AssetCache<Geometry>,
    pub textures: AssetCache<Texture>,
}

impl Assets {
    pub fn new() -> Self {
        Self {
            geometries: AssetCache::new(),
            textures: AssetCache::new(),
        }
    }
}

impl Default for Assets {
    fn default() -> Self {
        Self::new()
    }
}
