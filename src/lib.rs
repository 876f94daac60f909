pub mod app;
pub mod asset;
pub mod exercise;
pub mod host;
pub mod io;
pub mod renderer;
pub mod scene;
pub mod settings;
pub mod time;

pub use exercise::{Episode, Exercise, ExerciseKind, LifecycleError, LifecycleState};
pub use host::{Host, MountOutcome};
pub use settings::AppSettings;

use app::{App, AppEvent};
use winit::event_loop::EventLoop;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
fn init_logging() {
    // Set panic hook to get better error messages
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
    // A second init only fails because a logger is already installed.
    let _ = console_log::init_with_level(log::Level::Info);
}

#[cfg(not(target_arch = "wasm32"))]
fn init_logging() {
    let _ = env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .try_init();
}

#[cfg(not(target_arch = "wasm32"))]
pub fn run() -> Result<(), winit::error::EventLoopError> {
    init_logging();

    let settings = AppSettings::load();
    log::info!("Starting scene episodes ({})", settings.exercise);

    let event_loop = EventLoop::<AppEvent>::with_user_event().build()?;
    let mut app = App::new(settings, event_loop.create_proxy());

    let result = event_loop.run_app(&mut app);

    if let Err(ref err) = result {
        log::error!("Application error: {}", err);
    }

    log::info!("Application shutdown complete");

    result
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn run() -> Result<(), JsValue> {
    use winit::platform::web::EventLoopExtWebSys;

    init_logging();

    let settings = AppSettings::load();
    log::info!("Starting scene episodes ({}) - WebAssembly", settings.exercise);

    let event_loop = EventLoop::<AppEvent>::with_user_event()
        .build()
        .map_err(|err| JsValue::from_str(&err.to_string()))?;
    let app = App::new(settings, event_loop.create_proxy());

    event_loop.spawn_app(app);

    Ok(())
}
