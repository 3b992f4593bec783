use dither_mesh::VertexBuffer;

use crate::config::{ConfigError, ViewerConfig};
use crate::device::{uniforms, DeviceError, RenderDevice, UniformValue, VERTEX_ATTRIBUTES};
use crate::input::InputState;

#[derive(thiserror::Error, Debug)]
pub enum SetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Device(#[from] DeviceError),
    #[error("mesh has no triangles")]
    EmptyMesh,
    #[error("mesh has {0} vertices, more than a single draw can address")]
    MeshTooLarge(usize),
}

pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
}

/// Size of the off-screen image the scene is rendered into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    /// Divides the window size by the pixel scale, rounding down.
    ///
    /// Returns `None` while the window is too small to hold a single pixel,
    /// ex: when it is minimised.
    pub fn scaled(window_width: u32, window_height: u32, pixel_scale: u32) -> Option<Self> {
        let scale = pixel_scale.max(1);
        let width = window_width / scale;
        let height = window_height / scale;
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self { width, height })
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Owns the device and pushes one frame at a time into it.
pub struct Renderer<D> {
    device: D,
    config: ViewerConfig,
    vertex_count: u32,
    resolution: Option<Resolution>,
}

impl<D: RenderDevice> Renderer<D> {
    /// Compiles the program, uploads the mesh and sets the parameters that
    /// never change during a session.
    pub fn new(
        mut device: D,
        config: ViewerConfig,
        mesh: &VertexBuffer,
        shaders: &ShaderSources,
    ) -> Result<Self, SetupError> {
        config.validate()?;
        let bounds = mesh.bounding_box();
        if bounds.is_empty() {
            return Err(SetupError::EmptyMesh);
        }
        let vertex_count = u32::try_from(mesh.vertex_count())
            .map_err(|_| SetupError::MeshTooLarge(mesh.vertex_count()))?;

        device.compile_program(&shaders.vertex, &shaders.fragment)?;
        device.upload_buffer(mesh.as_floats());
        for attribute in &VERTEX_ATTRIBUTES {
            device.bind_vertex_attribute(attribute)?;
        }

        let matrix_size = config.dither.matrix_size.side() as f32;
        device.set_uniform(uniforms::MATRIX_SIZE, UniformValue::Float(matrix_size));
        device.set_uniform(uniforms::BIAS, UniformValue::Float(config.dither.bias));
        device.set_uniform(uniforms::CENTER_OFFSET, UniformValue::Vec3(bounds.center.into()));

        log::info!(
            "renderer ready: {} vertices, center {:?}, {}x{} dither",
            vertex_count,
            bounds.center,
            matrix_size,
            matrix_size
        );
        Ok(Self {
            device,
            config,
            vertex_count,
            resolution: None,
        })
    }

    /// Recomputes the output resolution for a new window size.
    pub fn resize(&mut self, window_width: u32, window_height: u32) {
        let Some(resolution) =
            Resolution::scaled(window_width, window_height, self.config.pixel_scale)
        else {
            log::debug!("ignoring resize to {}x{}", window_width, window_height);
            return;
        };
        self.device.resize_viewport(resolution.width, resolution.height);
        self.device
            .set_uniform(uniforms::ASPECT, UniformValue::Float(resolution.aspect()));
        self.device.set_uniform(
            uniforms::RESOLUTION,
            UniformValue::Vec2([resolution.width as f32, resolution.height as f32]),
        );
        self.resolution = Some(resolution);
    }

    /// Renders a single frame.
    ///
    /// `timestamp_ms` is the frame time in milliseconds since the loop started.
    pub fn frame(&mut self, timestamp_ms: f64, input: &mut InputState) -> Result<(), DeviceError> {
        input.step(&self.config.smoothing);
        let time = (timestamp_ms * self.config.time_scale as f64) as f32;

        self.device.clear(self.config.clear_color);
        self.device.set_uniform(uniforms::TIME, UniformValue::Float(time));
        self.device
            .set_uniform(uniforms::MOUSE, UniformValue::Vec2(input.smoothed()));
        if self.config.scroll_parallax {
            self.device
                .set_uniform(uniforms::PARALLAX_OFFSET, UniformValue::Float(input.scroll()));
        }
        self.device.draw(self.vertex_count)
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn resolution(&self) -> Option<Resolution> {
        self.resolution
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }
}

/// Raw input as reported by the host, in window pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerMoved { x: f64, y: f64 },
    Scrolled { scroll_y: f64 },
    Resized { width: u32, height: u32 },
}

/// Source of frame timestamps, in milliseconds.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Paces the loop to the display.
pub trait FrameScheduler {
    /// Waits for the next display frame and returns the input that arrived
    /// since the previous one, in order. Returns `None` once the host is gone.
    fn next_frame(&mut self) -> Option<Vec<InputEvent>>;
}

cfg_if::cfg_if! {
    if #[cfg(target_arch = "wasm32")] {
        /// Reads `performance.now()`, the same time base as animation frames.
        pub struct SystemClock {
            performance: web_sys::Performance,
        }

        impl SystemClock {
            pub fn new() -> Option<Self> {
                let performance = web_sys::window()?.performance()?;
                Some(Self { performance })
            }
        }

        impl Clock for SystemClock {
            fn now_ms(&self) -> f64 {
                self.performance.now()
            }
        }
    } else {
        /// Milliseconds since the clock was created.
        pub struct SystemClock {
            start: std::time::Instant,
        }

        impl SystemClock {
            pub fn new() -> Option<Self> {
                Some(Self {
                    start: std::time::Instant::now(),
                })
            }
        }

        impl Clock for SystemClock {
            fn now_ms(&self) -> f64 {
                self.start.elapsed().as_secs_f64() * 1000.0
            }
        }
    }
}

/// The renderer together with the input it reads and the clock it is timed by.
///
/// Input events and frames are handled one at a time on the same thread, so
/// the input state needs no synchronisation.
pub struct RenderLoop<D, C> {
    renderer: Renderer<D>,
    input: InputState,
    clock: C,
    window_size: (u32, u32),
}

impl<D: RenderDevice, C: Clock> RenderLoop<D, C> {
    pub fn new(mut renderer: Renderer<D>, clock: C, window_size: (u32, u32), scroll_y: f64) -> Self {
        let mut input = InputState::new();
        renderer.resize(window_size.0, window_size.1);
        input.scrolled(scroll_y, window_size.1 as f64);
        Self {
            renderer,
            input,
            clock,
            window_size,
        }
    }

    pub fn handle_event(&mut self, event: InputEvent) {
        let (width, height) = self.window_size;
        match event {
            InputEvent::PointerMoved { x, y } => {
                self.input.pointer_moved(x, y, width as f64, height as f64)
            }
            InputEvent::Scrolled { scroll_y } => self.input.scrolled(scroll_y, height as f64),
            InputEvent::Resized { width, height } => {
                self.window_size = (width, height);
                self.renderer.resize(width, height);
            }
        }
    }

    /// Renders one frame stamped with the current clock time.
    pub fn tick(&mut self) -> Result<(), DeviceError> {
        let now = self.clock.now_ms();
        self.renderer.frame(now, &mut self.input)
    }

    /// Renders a frame, then keeps rendering one frame per display refresh
    /// until the scheduler reports that the host is gone.
    ///
    /// There is no catch up; a slow frame just delays the next one.
    pub fn run<S: FrameScheduler>(&mut self, scheduler: &mut S) -> Result<(), DeviceError> {
        self.tick()?;
        while let Some(events) = scheduler.next_frame() {
            for event in events {
                self.handle_event(event);
            }
            self.tick()?;
        }
        Ok(())
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn renderer(&self) -> &Renderer<D> {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut Renderer<D> {
        &mut self.renderer
    }
}
