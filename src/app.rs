// app.rs
use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::*,
    event_loop::{ActiveEventLoop, EventLoopProxy},
    keyboard::{Key, NamedKey},
    window::{Window, WindowId},
};

use crate::exercise::{LifecycleError, LifecycleState};
use crate::host::{Host, MountOutcome};
use crate::renderer::{RenderError, Renderer, WindowSurface};
use crate::scene::PointerEvent;
use crate::settings::{AppSettings, Resolution};
use crate::time::{timestamp_since, Instant};

/// Messages posted back into the event loop.
pub enum AppEvent {
    /// GPU surface acquisition finished (asynchronously on the web).
    SurfaceReady(Result<WindowSurface, RenderError>),
}

pub struct App {
    settings: AppSettings,
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    proxy: EventLoopProxy<AppEvent>,
    window: Option<Arc<Window>>,
    surface: Option<WindowSurface>,
    host: Host<Renderer>,
    started_at: Instant,
}

impl App {
    pub fn new(settings: AppSettings, proxy: EventLoopProxy<AppEvent>) -> Self {
        let host = Host::new(settings.exercise, settings.asset_root.clone());
        Self {
            settings,
            proxy,
            window: None,
            surface: None,
            host,
            started_at: Instant::now(),
        }
    }

    fn window_attributes(&self) -> Option<winit::window::WindowAttributes> {
        let mut attributes = Window::default_attributes().with_title(self.settings.title.clone());
        if let Some(size) =
            requested_inner_size(&self.settings.resolution, cfg!(target_arch = "wasm32"))
        {
            attributes = attributes.with_inner_size(size);
        }

        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            const CANVAS_ID: &str = "canvas";

            let canvas = web_sys::window()
                .and_then(|window| window.document())
                .and_then(|document| document.get_element_by_id(CANVAS_ID))
                .and_then(|element| element.dyn_into::<web_sys::HtmlCanvasElement>().ok())?;
            attributes = attributes.with_canvas(Some(canvas));
        }

        Some(attributes)
    }

    fn surface_ready(&mut self, result: Result<WindowSurface, RenderError>) {
        match result {
            Ok(surface) => self.surface = Some(surface),
            Err(err) => log::error!("Failed to acquire drawing surface: {}", err),
        }
        self.mount();
    }

    fn mount(&mut self) {
        match self.host.mount(self.surface.as_mut()) {
            Ok(MountOutcome::Started) => {
                self.started_at = Instant::now();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            Ok(outcome) => log::debug!("Mount skipped: {:?}", outcome),
            Err(err) => log::error!("Failed to start {}: {}", self.host.kind(), err),
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let timestamp = timestamp_since(self.started_at);
        let Some(exercise) = self.host.exercise_mut() else {
            return;
        };
        if exercise.state() != LifecycleState::Running {
            return;
        }

        match exercise.frame(timestamp) {
            Ok(_) => {}
            Err(LifecycleError::Renderer(RenderError::SurfaceLost)) => {
                log::error!("Surface is out of memory, exiting");
                event_loop.exit();
                return;
            }
            Err(err) => log::warn!("Frame failed: {}", err),
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Initial window size. On the web the page stylesheet sizes the canvas;
/// a fixed size there becomes inline pixels and resizes stop arriving.
fn requested_inner_size(resolution: &Resolution, web: bool) -> Option<LogicalSize<u32>> {
    if web {
        None
    } else {
        Some(LogicalSize::new(resolution.width, resolution.height))
    }
}

impl ApplicationHandler<AppEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let Some(attributes) = self.window_attributes() else {
            self.mount();
            return;
        };
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                log::error!("Failed to create window: {}", err);
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());

        let present_mode = self.settings.present_mode;

        #[cfg(not(target_arch = "wasm32"))]
        {
            let result = pollster::block_on(WindowSurface::new(window, present_mode));
            self.surface_ready(result);
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let result = WindowSurface::new(window, present_mode).await;
                if proxy.send_event(AppEvent::SurfaceReady(result)).is_err() {
                    log::error!("Event loop closed before the surface was ready");
                }
            });
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: AppEvent) {
        match event {
            AppEvent::SurfaceReady(result) => self.surface_ready(result),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        if self.window.as_ref().map(|w| w.id()) != Some(id) {
            return;
        }

        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(exercise) = self.host.exercise_mut() {
                    if let Err(err) = exercise.resize(size.into()) {
                        log::debug!("Resize skipped: {}", err);
                    }
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                #[cfg(not(target_arch = "wasm32"))]
                event_loop.exit();
            }
            other => {
                if let (Some(pointer), Some(exercise)) = (
                    PointerEvent::from_window_event(&other),
                    self.host.exercise_mut(),
                ) {
                    exercise.handle_input(pointer);
                }
            }
        }
    }
}
