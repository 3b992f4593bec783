use anyhow::Context;
use dither_mesh::DefaultMesh;
use winit::{
    event::*,
    event_loop::{ControlFlow, EventLoop},
    window::{Window, WindowBuilder},
};

use crate::config::ViewerConfig;
use crate::device::DeviceError;
use crate::gpu::WgpuDevice;
use crate::renderer::{InputEvent, RenderLoop, Renderer, ShaderSources, SystemClock};
use crate::resources;

/// Pixels scrolled per wheel notch when the wheel reports lines.
#[cfg(not(target_arch = "wasm32"))]
const LINE_HEIGHT: f64 = 40.0;

/// Vertical scroll position of the page, in physical pixels.
///
/// The web build follows the page the canvas is embedded in. Natively there
/// is no page, so the mouse wheel scrolls an imaginary one that starts at the
/// top and never goes above it.
struct ScrollPosition {
    scroll_y: f64,
}

impl ScrollPosition {
    fn new(window: &Window) -> Self {
        let mut scroll = Self { scroll_y: 0.0 };
        scroll.poll_page(window);
        scroll
    }

    /// Returns the new position if the page moved.
    #[cfg(target_arch = "wasm32")]
    fn poll_page(&mut self, window: &Window) -> Option<f64> {
        let css_pixels = web_sys::window()?.scroll_y().ok()?;
        let scroll_y = css_pixels * window.scale_factor();
        if scroll_y == self.scroll_y {
            return None;
        }
        self.scroll_y = scroll_y;
        Some(scroll_y)
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn poll_page(&mut self, _window: &Window) -> Option<f64> {
        None
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn wheel(&mut self, delta: MouseScrollDelta) -> f64 {
        let dy = match delta {
            MouseScrollDelta::LineDelta(_, lines) => lines as f64 * LINE_HEIGHT,
            MouseScrollDelta::PixelDelta(position) => position.y,
        };
        // Wheel down reports a negative delta and moves further down the page.
        self.scroll_y = (self.scroll_y - dy).max(0.0);
        self.scroll_y
    }
}

/// Last known size of the browser window, in CSS pixels.
///
/// winit on the web only reports a resize when the canvas size is set
/// explicitly, so the page size is polled and pushed to the window.
#[derive(Debug, Default, PartialEq)]
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
struct PageSize {
    last: Option<(f64, f64)>,
}

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
impl PageSize {
    /// Records `width` x `height` and returns it if it differs from the last
    /// size seen. Empty sizes, ex: a hidden tab, are ignored.
    fn update(&mut self, width: f64, height: f64) -> Option<(f64, f64)> {
        if !(width > 0.0 && height > 0.0) {
            return None;
        }
        if self.last == Some((width, height)) {
            return None;
        }
        self.last = Some((width, height));
        self.last
    }
}

/// Resizes the window to the browser window if it changed since the last call.
///
/// winit answers `set_inner_size` with a `Resized` event, which the app
/// handles like any other resize.
#[cfg(target_arch = "wasm32")]
fn sync_page_size(window: &Window, page_size: &mut PageSize) {
    let Some(web_window) = web_sys::window() else {
        return;
    };
    let width = web_window.inner_width().ok().and_then(|w| w.as_f64());
    let height = web_window.inner_height().ok().and_then(|h| h.as_f64());
    let (Some(width), Some(height)) = (width, height) else {
        return;
    };
    if let Some((width, height)) = page_size.update(width, height) {
        log::debug!("page resized to {}x{}", width, height);
        window.set_inner_size(winit::dpi::LogicalSize::new(width, height));
    }
}

struct App {
    // Declared before the window so the surface is dropped first.
    render_loop: RenderLoop<WgpuDevice, SystemClock>,
    scroll: ScrollPosition,
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    page_size: PageSize,
    window: Window,
}

impl App {
    fn handle_window_event(&mut self, window_event: WindowEvent, control_flow: &mut ControlFlow) {
        match window_event {
            WindowEvent::CloseRequested => *control_flow = ControlFlow::Exit,
            WindowEvent::Resized(physical_size) => self.resize(physical_size),
            WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                // new_inner_size is &&mut so we have to dereference it twice
                self.resize(*new_inner_size);
            }
            // Only reported while the pointer is over the canvas. On the web
            // the canvas covers the page, so this is the whole document.
            WindowEvent::CursorMoved { position, .. } => {
                self.render_loop.handle_event(InputEvent::PointerMoved {
                    x: position.x,
                    y: position.y,
                });
            }
            #[cfg(not(target_arch = "wasm32"))]
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll_y = self.scroll.wheel(delta);
                self.render_loop
                    .handle_event(InputEvent::Scrolled { scroll_y });
            }
            _ => {}
        }
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.render_loop
            .renderer_mut()
            .device_mut()
            .resize_surface(new_size);
        self.render_loop.handle_event(InputEvent::Resized {
            width: new_size.width,
            height: new_size.height,
        });
    }

    fn redraw(&mut self, control_flow: &mut ControlFlow) {
        #[cfg(target_arch = "wasm32")]
        sync_page_size(&self.window, &mut self.page_size);
        if let Some(scroll_y) = self.scroll.poll_page(&self.window) {
            self.render_loop
                .handle_event(InputEvent::Scrolled { scroll_y });
        }
        match self.render_loop.tick() {
            Ok(_) => {}
            // Reconfigure the surface if lost
            Err(DeviceError::SurfaceLost) => {
                self.render_loop.renderer_mut().device_mut().reconfigure()
            }
            // The system is out of memory, we should probably quit
            Err(DeviceError::OutOfMemory) => {
                log::error!("graphics device out of memory");
                *control_flow = ControlFlow::Exit;
            }
            // All other errors (Outdated, Timeout) should be resolved by the next frame
            Err(e) => log::warn!("{}", e),
        }
    }

    fn handle_event<T>(&mut self, event: Event<'_, T>, control_flow: &mut ControlFlow) {
        *control_flow = ControlFlow::Wait;
        match event {
            Event::WindowEvent { event, window_id } if window_id == self.window.id() => {
                self.handle_window_event(event, control_flow)
            }
            Event::RedrawRequested(window_id) if window_id == self.window.id() => {
                self.redraw(control_flow)
            }
            Event::MainEventsCleared => {
                // RedrawRequested will only trigger once, unless we manually
                // request it.
                self.window.request_redraw();
            }
            _ => (),
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn attach_canvas(window: &Window, page_size: &mut PageSize) -> anyhow::Result<()> {
    use winit::platform::web::WindowExtWebSys;

    let web_window = web_sys::window().context("no browser window")?;

    // Winit prevents sizing with CSS, so we have to set the drawing size
    // manually and let CSS stretch it over the page.
    sync_page_size(window, page_size);

    let canvas = window.canvas();
    let style = canvas.style();
    for (property, value) in [
        ("image-rendering", "pixelated"),
        ("width", "100%"),
        ("height", "100%"),
    ] {
        style
            .set_property(property, value)
            .map_err(|e| anyhow::anyhow!("setting {}: {:?}", property, e))?;
    }

    web_window
        .document()
        .and_then(|doc| {
            let dst = doc
                .get_element_by_id("glcanvas")
                .or_else(|| doc.body().map(web_sys::Element::from))?;
            dst.append_child(&web_sys::Element::from(canvas)).ok()?;
            Some(())
        })
        .context("couldn't append canvas to document")
}

/// Tells the user there is no way to render, the viewer stops afterwards.
fn report_unsupported(error: &DeviceError) {
    log::error!("{}", error);
    #[cfg(target_arch = "wasm32")]
    if let Some(window) = web_sys::window() {
        if let Err(e) = window.alert_with_message(&error.to_string()) {
            log::warn!("couldn't show alert: {:?}", e);
        }
    }
}

/// Loads the assets, sets up the device and runs the event loop.
///
/// Only returns on setup failures; once the first frame is scheduled the
/// loop runs until the window or page goes away.
pub async fn start(config: ViewerConfig) -> anyhow::Result<()> {
    config.validate()?;

    let shaders = ShaderSources {
        vertex: resources::load_string(&config.vertex_shader).await?,
        fragment: resources::load_string(&config.fragment_shader).await?,
    };
    let text = resources::load_string(&config.model).await?;
    let mesh = dither_obj::parse_obj::<DefaultMesh>(&text)
        .with_context(|| format!("parsing {}", config.model))?;
    log::info!("loaded {} with {} vertices", config.model, mesh.vertex_count());

    let event_loop = EventLoop::new(); // Loop provided by winit for handling window events
    let window = WindowBuilder::new()
        .with_title("dither")
        .build(&event_loop)?;

    #[allow(unused_mut)]
    let mut page_size = PageSize::default();
    #[cfg(target_arch = "wasm32")]
    attach_canvas(&window, &mut page_size)?;

    let device = match WgpuDevice::new(&window).await {
        Ok(device) => device,
        Err(e) => {
            report_unsupported(&e);
            return Err(e.into());
        }
    };
    let renderer = Renderer::new(device, config, &mesh, &shaders)?;
    let clock = SystemClock::new().context("no frame clock available")?;
    let scroll = ScrollPosition::new(&window);
    let size = window.inner_size();
    let render_loop = RenderLoop::new(renderer, clock, (size.width, size.height), scroll.scroll_y);

    let mut app = App {
        render_loop,
        scroll,
        page_size,
        window,
    };
    event_loop.run(move |event, _, control_flow| {
        app.handle_event(event, control_flow);
    });
}
