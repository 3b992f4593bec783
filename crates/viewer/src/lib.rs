#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

mod app;
pub mod config;
pub mod device;
mod gpu;
pub mod input;
pub mod renderer;
mod resources;

pub use app::start;
pub use config::{DitherConfig, DitherMatrixSize, SmoothingFactors, ViewerConfig};
pub use device::{DeviceError, RenderDevice};
pub use gpu::WgpuDevice;
pub use input::InputState;
pub use renderer::{Clock, FrameScheduler, InputEvent, RenderLoop, Renderer, SystemClock};

/// Routes `log` output to the browser console or to stderr.
pub fn init_logging() {
    cfg_if::cfg_if! {
        if #[cfg(target_arch = "wasm32")] {
            std::panic::set_hook(Box::new(console_error_panic_hook::hook));
            if let Err(e) = console_log::init_with_level(log::Level::Info) {
                web_sys::console::error_1(&format!("couldn't initialize logger: {}", e).into());
            }
        } else {
            env_logger::init();
        }
    }
}

/// Starts the viewer with `config`.
///
/// Natively this blocks until the window is closed. On the web it schedules
/// the viewer and returns immediately.
pub fn run_with(config: ViewerConfig) -> anyhow::Result<()> {
    cfg_if::cfg_if! {
        if #[cfg(target_arch = "wasm32")] {
            wasm_bindgen_futures::spawn_local(async move {
                if let Err(e) = start(config).await {
                    log::error!("{:#}", e);
                }
            });
            Ok(())
        } else {
            pollster::block_on(start(config))
        }
    }
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen(start))]
pub fn run() {
    init_logging();
    if let Err(e) = run_with(ViewerConfig::landing()) {
        log::error!("{:#}", e);
    }
}
