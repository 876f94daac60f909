use std::fmt;
use std::path::PathBuf;

use glam::{Vec2, Vec3};
use log::{debug, info};

use crate::asset::TextureLoader;
use crate::exercise::Episode;
use crate::renderer::{DrawingSurface, RenderBackend, RenderError, WindowSize};
use crate::scene::{OrbitControls, PerspectiveCamera, PointerEvent, Scene, SceneError};
use crate::time::{Clock, FrameTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    Initialized,
    SceneBuilt,
    Running,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleState::Uninitialized => "uninitialized",
            LifecycleState::Initialized => "initialized",
            LifecycleState::SceneBuilt => "scene built",
            LifecycleState::Running => "running",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleError {
    OutOfOrder {
        operation: &'static str,
        state: LifecycleState,
    },
    Renderer(RenderError),
    Scene(SceneError),
}

impl fmt::Display for LifecycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleError::OutOfOrder { operation, state } => {
                write!(f, "cannot {} while the exercise is {}", operation, state)
            }
            LifecycleError::Renderer(err) => write!(f, "renderer error: {}", err),
            LifecycleError::Scene(err) => write!(f, "scene error: {}", err),
        }
    }
}

impl std::error::Error for LifecycleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LifecycleError::Renderer(err) => Some(err),
            LifecycleError::Scene(err) => Some(err),
            LifecycleError::OutOfOrder { .. } => None,
        }
    }
}

impl From<RenderError> for LifecycleError {
    fn from(err: RenderError) -> Self {
        LifecycleError::Renderer(err)
    }
}

impl From<SceneError> for LifecycleError {
    fn from(err: SceneError) -> Self {
        LifecycleError::Scene(err)
    }
}

/// Everything `init` allocates.
struct Runtime<B> {
    renderer: B,
    scene: Scene,
    camera: PerspectiveCamera,
    controls: Option<OrbitControls>,
    loader: TextureLoader,
}

/// One running exercise: a renderer, a scene graph, a camera and an
/// episode's content, driven through `init → create → start → frame`.
pub struct Exercise<B: RenderBackend> {
    episode: Box<dyn Episode>,
    asset_root: PathBuf,
    state: LifecycleState,
    runtime: Option<Runtime<B>>,
    clock: Clock,
}

impl<B: RenderBackend> Exercise<B> {
    pub fn new(episode: Box<dyn Episode>, asset_root: impl Into<PathBuf>) -> Self {
        info!("{} initialized", episode.name());
        Self {
            episode,
            asset_root: asset_root.into(),
            state: LifecycleState::Uninitialized,
            runtime: None,
            clock: Clock::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.episode.name()
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn renderer(&self) -> Option<&B> {
        self.runtime.as_ref().map(|rt| &rt.renderer)
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.runtime.as_ref().map(|rt| &rt.scene)
    }

    pub fn scene_mut(&mut self) -> Option<&mut Scene> {
        self.runtime.as_mut().map(|rt| &mut rt.scene)
    }

    pub fn camera(&self) -> Option<&PerspectiveCamera> {
        self.runtime.as_ref().map(|rt| &rt.camera)
    }

    pub fn controls(&self) -> Option<&OrbitControls> {
        self.runtime.as_ref().and_then(|rt| rt.controls.as_ref())
    }

    /// Blocks until every outstanding texture load has been applied.
    pub fn finish_loading(&mut self) -> usize {
        match self.runtime.as_mut() {
            Some(rt) => rt.loader.finish(&mut rt.scene),
            None => 0,
        }
    }

    fn out_of_order(&self, operation: &'static str) -> LifecycleError {
        LifecycleError::OutOfOrder {
            operation,
            state: self.state,
        }
    }

    fn runtime_mut(&mut self, operation: &'static str) -> Result<&mut Runtime<B>, LifecycleError> {
        let state = self.state;
        self.runtime
            .as_mut()
            .ok_or(LifecycleError::OutOfOrder { operation, state })
    }

    pub fn init<S>(&mut self, surface: &mut S) -> Result<(), LifecycleError>
    where
        S: DrawingSurface<Backend = B>,
    {
        if self.state != LifecycleState::Uninitialized {
            return Err(self.out_of_order("init"));
        }

        let size = surface.window_size();
        let mut renderer = surface.create_renderer(&self.episode.renderer_options())?;
        renderer.set_size(size);

        let aspect = if size.is_empty() { 1.0 } else { size.aspect() };
        let mut camera = PerspectiveCamera::with_aspect(aspect);
        camera.position = self.episode.camera_position();
        camera.look_at(Vec3::ZERO);

        let controls = self
            .episode
            .wants_controls()
            .then(|| OrbitControls::new(&camera, Vec2::new(size.width as f32, size.height as f32)));

        self.runtime = Some(Runtime {
            renderer,
            scene: Scene::new(),
            camera,
            controls,
            loader: TextureLoader::new(self.asset_root.clone()),
        });
        self.clock.reset();
        self.state = LifecycleState::Initialized;
        debug!("{} sized to {}x{}", self.episode.name(), size.width, size.height);
        Ok(())
    }

    pub fn create(&mut self) -> Result<(), LifecycleError> {
        if self.state != LifecycleState::Initialized {
            return Err(self.out_of_order("create"));
        }

        let Some(rt) = self.runtime.as_mut() else {
            return Err(LifecycleError::OutOfOrder {
                operation: "create",
                state: self.state,
            });
        };
        let (scene, loader) = (&mut rt.scene, &mut rt.loader);
        self.episode.create(scene, loader)?;
        scene.update_world_transforms();

        info!(
            "{} scene built with {} meshes ({} textures loading)",
            self.episode.name(),
            scene.mesh_count(),
            loader.pending()
        );
        self.state = LifecycleState::SceneBuilt;
        Ok(())
    }

    pub fn start(&mut self) -> Result<(), LifecycleError> {
        if self.state != LifecycleState::SceneBuilt {
            return Err(self.out_of_order("start"));
        }
        self.state = LifecycleState::Running;
        info!("{} started", self.episode.name());
        Ok(())
    }

    /// One animation frame. `timestamp_ms` is the high-resolution time of the
    /// display refresh.
    pub fn frame(&mut self, timestamp_ms: f64) -> Result<FrameTime, LifecycleError> {
        if self.state != LifecycleState::Running {
            return Err(self.out_of_order("render a frame"));
        }

        let time = self.clock.tick(timestamp_ms);
        let Some(rt) = self.runtime.as_mut() else {
            return Err(LifecycleError::OutOfOrder {
                operation: "render a frame",
                state: self.state,
            });
        };

        rt.loader.poll(&mut rt.scene);
        if let Some(controls) = rt.controls.as_mut() {
            controls.update(&mut rt.camera);
        }
        self.episode.update(&mut rt.scene, time);
        rt.scene.update_world_transforms();
        rt.renderer.render(&rt.scene, &rt.camera)?;
        Ok(time)
    }

    pub fn resize(&mut self, size: WindowSize) -> Result<(), LifecycleError> {
        let rt = self.runtime_mut("resize")?;
        if size.is_empty() {
            debug!("Ignoring resize to {}x{}", size.width, size.height);
            return Ok(());
        }

        rt.camera.aspect = size.aspect();
        rt.camera.update_projection_matrix();
        rt.renderer.set_size(size);
        if let Some(controls) = rt.controls.as_mut() {
            controls.set_viewport(Vec2::new(size.width as f32, size.height as f32));
        }
        Ok(())
    }

    /// Returns whether the controls consumed the event.
    pub fn handle_input(&mut self, event: PointerEvent) -> bool {
        self.runtime
            .as_mut()
            .and_then(|rt| rt.controls.as_mut())
            .map(|controls| controls.handle_pointer(event))
            .unwrap_or(false)
    }
}
