use std::cell::Cell;

use dither_mesh::DefaultMesh;
use dither_test_data::OBJ_TORUS;
use dither_viewer::{
    device::{DeviceError, RenderDevice, UniformValue, VertexAttribute},
    renderer::ShaderSources,
    Clock, FrameScheduler, InputEvent, RenderLoop, Renderer, ViewerConfig,
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen_test::wasm_bindgen_test as test;

/// Counts draws and remembers the last mouse value, nothing else.
#[derive(Default)]
struct CountingDevice {
    draws: Vec<u32>,
    mouse: [f32; 2],
    viewport: (u32, u32),
}

impl RenderDevice for CountingDevice {
    fn compile_program(&mut self, _: &str, _: &str) -> Result<(), DeviceError> {
        Ok(())
    }

    fn upload_buffer(&mut self, _: &[f32]) {}

    fn bind_vertex_attribute(&mut self, _: &VertexAttribute) -> Result<(), DeviceError> {
        Ok(())
    }

    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        if let ("mouse", UniformValue::Vec2(v)) = (name, value) {
            self.mouse = v;
        }
    }

    fn clear(&mut self, _: [f32; 4]) {}

    fn draw(&mut self, vertex_count: u32) -> Result<(), DeviceError> {
        self.draws.push(vertex_count);
        Ok(())
    }

    fn resize_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
    }
}

struct FixedStep(Cell<f64>);

impl Clock for FixedStep {
    fn now_ms(&self) -> f64 {
        let now = self.0.get();
        self.0.set(now + 1000.0 / 60.0);
        now
    }
}

/// Delivers one pointer move, then a fixed number of empty frames.
struct Frames {
    remaining: usize,
    first: bool,
}

impl FrameScheduler for Frames {
    fn next_frame(&mut self) -> Option<Vec<InputEvent>> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        if std::mem::take(&mut self.first) {
            return Some(vec![InputEvent::PointerMoved { x: 1920.0, y: 0.0 }]);
        }
        Some(Vec::new())
    }
}

#[test]
fn torus_runs_headless() {
    let mesh = dither_obj::parse_obj::<DefaultMesh>(OBJ_TORUS.text).unwrap();
    let shaders = ShaderSources {
        vertex: String::new(),
        fragment: String::new(),
    };
    let renderer = Renderer::new(
        CountingDevice::default(),
        ViewerConfig::landing(),
        &mesh,
        &shaders,
    )
    .unwrap();
    let mut render_loop = RenderLoop::new(renderer, FixedStep(Cell::new(0.0)), (1920, 1080), 0.0);

    let mut frames = Frames {
        remaining: 120,
        first: true,
    };
    render_loop.run(&mut frames).unwrap();

    let device = render_loop.renderer().device();
    assert_eq!(121, device.draws.len());
    let vertices = (OBJ_TORUS.triangles * 3) as u32;
    assert!(device.draws.iter().all(|n| *n == vertices));
    assert_eq!((480, 270), device.viewport);

    // After 120 frames the slow X filter trails the faster Y filter.
    let [x, y] = device.mouse;
    assert!(x > 0.9 && x < 1.0, "x = {}", x);
    assert!(y > x && y <= 1.0, "y = {}", y);
}
