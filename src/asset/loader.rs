// asset/loader.rs
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};

use super::{Handle, Texture, TextureImage};
use crate::io;
use crate::scene::Scene;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    Io(String),
    Decode(String),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "IO error: {}", e),
            LoadError::Decode(e) => write!(f, "Image error: {}", e),
        }
    }
}

impl std::error::Error for LoadError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ImageKind {
    Ldr,
    Hdr,
}

type Completion = Box<dyn FnOnce(&mut Scene, Handle<Texture>)>;

struct Finished {
    handle: Handle<Texture>,
    result: Result<TextureImage, LoadError>,
}

#[cfg(target_arch = "wasm32")]
struct QueuedJob {
    handle: Handle<Texture>,
    path: PathBuf,
    kind: ImageKind,
}

/// Asynchronous texture loader.
///
/// `load*` registers a pending [`Texture`] in the scene and returns its handle
/// immediately. Decoding happens off the frame (rayon pool on native, next
/// frame on the web) and results, including completion callbacks, are only
/// applied to the scene inside [`TextureLoader::poll`].
pub struct TextureLoader {
    root: PathBuf,
    callbacks: HashMap<Handle<Texture>, Completion>,
    in_flight: usize,
    sender: Sender<Finished>,
    receiver: Receiver<Finished>,
    #[cfg(target_arch = "wasm32")]
    queued: Vec<QueuedJob>,
}

impl TextureLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            root: root.into(),
            callbacks: HashMap::new(),
            in_flight: 0,
            sender,
            receiver,
            #[cfg(target_arch = "wasm32")]
            queued: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of requests whose results have not been applied yet.
    pub fn pending(&self) -> usize {
        self.in_flight
    }

    pub fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }

    pub fn load(&mut self, scene: &mut Scene, path: &str) -> Handle<Texture> {
        self.request(scene, path, ImageKind::Ldr, None)
    }

    /// Loads an 8-bit image and runs `on_load` against the texture once the
    /// pixels are in place.
    pub fn load_with<F>(&mut self, scene: &mut Scene, path: &str, on_load: F) -> Handle<Texture>
    where
        F: FnOnce(&mut Texture) + 'static,
    {
        let completion: Completion = Box::new(move |scene, handle| {
            if let Some(texture) = scene.assets.textures.get_mut(handle) {
                on_load(texture);
            }
        });
        self.request(scene, path, ImageKind::Ldr, Some(completion))
    }

    /// Loads a radiance HDR image. `on_load` receives the whole scene so it
    /// can install the texture as environment, background, fog and so on.
    pub fn load_hdr<F>(&mut self, scene: &mut Scene, path: &str, on_load: F) -> Handle<Texture>
    where
        F: FnOnce(&mut Scene, Handle<Texture>) + 'static,
    {
        self.request(scene, path, ImageKind::Hdr, Some(Box::new(on_load)))
    }

    fn request(
        &mut self,
        scene: &mut Scene,
        path: &str,
        kind: ImageKind,
        completion: Option<Completion>,
    ) -> Handle<Texture> {
        let handle = scene.assets.textures.insert(Texture::pending(path));
        if let Some(completion) = completion {
            self.callbacks.insert(handle, completion);
        }

        let resolved = self.resolve(path);
        log::debug!("Queued texture load {:?} ({:?})", resolved, kind);

        self.in_flight += 1;
        self.dispatch(handle, resolved, kind);
        handle
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn dispatch(&mut self, handle: Handle<Texture>, path: PathBuf, kind: ImageKind) {
        let sender = self.sender.clone();
        rayon::spawn(move || {
            let result = guarded(&path, || decode(&path, kind));
            // The loader may already be gone; nobody is waiting then.
            let _ = sender.send(Finished { handle, result });
        });
    }

    #[cfg(target_arch = "wasm32")]
    fn dispatch(&mut self, handle: Handle<Texture>, path: PathBuf, kind: ImageKind) {
        self.queued.push(QueuedJob { handle, path, kind });
    }

    #[cfg(target_arch = "wasm32")]
    fn run_queued(&mut self) {
        for job in std::mem::take(&mut self.queued) {
            let result = guarded(&job.path, || decode(&job.path, job.kind));
            let _ = self.sender.send(Finished {
                handle: job.handle,
                result,
            });
        }
    }

    /// Applies every finished load to `scene` without blocking. Returns the
    /// number of results applied.
    pub fn poll(&mut self, scene: &mut Scene) -> usize {
        #[cfg(target_arch = "wasm32")]
        self.run_queued();

        let mut applied = 0;
        while let Ok(finished) = self.receiver.try_recv() {
            self.apply(scene, finished);
            applied += 1;
        }
        applied
    }

    /// Blocks until every outstanding request has been applied.
    pub fn finish(&mut self, scene: &mut Scene) -> usize {
        #[cfg(target_arch = "wasm32")]
        self.run_queued();

        let mut applied = 0;
        while self.in_flight > 0 {
            match self.receiver.recv() {
                Ok(finished) => {
                    self.apply(scene, finished);
                    applied += 1;
                }
                Err(_) => break,
            }
        }
        applied
    }

    fn apply(&mut self, scene: &mut Scene, finished: Finished) {
        self.in_flight = self.in_flight.saturating_sub(1);
        let Finished { handle, result } = finished;
        let callback = self.callbacks.remove(&handle);

        let Some(texture) = scene.assets.textures.get_mut(handle) else {
            log::warn!("Finished load for unknown texture {:?}", handle);
            return;
        };

        match result {
            Ok(image) => {
                let (w, h) = image.dimensions();
                log::info!("Loaded texture {} ({}x{})", texture.source(), w, h);
                texture.set_image(image);
                if let Some(callback) = callback {
                    callback(scene, handle);
                }
            }
            Err(err) => {
                log::error!("Failed to load texture {}: {}", texture.source(), err);
                texture.fail(err.to_string());
            }
        }
    }
}

/// Runs a decode job, turning a panic into [`LoadError::Decode`] so every
/// request still reports back and `in_flight` drains.
fn guarded<F>(path: &Path, job: F) -> Result<TextureImage, LoadError>
where
    F: FnOnce() -> Result<TextureImage, LoadError>,
{
    panic::catch_unwind(AssertUnwindSafe(job)).unwrap_or_else(|payload| {
        let reason = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        Err(LoadError::Decode(format!(
            "{:?}: decoder panicked: {}",
            path, reason
        )))
    })
}

fn decode(path: &Path, kind: ImageKind) -> Result<TextureImage, LoadError> {
    let bytes = io::load_binary(path)?;
    let img = image::load_from_memory(&bytes)
        .map_err(|e| LoadError::Decode(format!("{:?}: {}", path, e)))?;

    Ok(match kind {
        ImageKind::Ldr => TextureImage::Rgba8(img.to_rgba8()),
        ImageKind::Hdr => TextureImage::Rgba32F(img.to_rgba32f()),
    })
}
