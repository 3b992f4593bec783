use dither_mesh::{COLOR_OFFSET, NORMAL_OFFSET, POSITION_OFFSET, VERTEX_STRIDE};

/// Names of the parameters the shaders read.
pub mod uniforms {
    pub const TIME: &str = "time";
    pub const ASPECT: &str = "aspect";
    pub const RESOLUTION: &str = "resolution";
    pub const MATRIX_SIZE: &str = "matrix_size";
    pub const BIAS: &str = "bias";
    pub const MOUSE: &str = "mouse";
    pub const CENTER_OFFSET: &str = "center_offset";
    pub const PARALLAX_OFFSET: &str = "parallax_offset";
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
}

/// Describes where one vertex shader input lives inside the uploaded buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub name: &'static str,
    /// Number of f32 components.
    pub components: u32,
    /// Bytes between consecutive records.
    pub stride: usize,
    /// Byte offset of the first component within a record.
    pub offset: usize,
}

/// The interleaved position, normal, color layout produced by the OBJ parser.
pub const VERTEX_ATTRIBUTES: [VertexAttribute; 3] = [
    VertexAttribute {
        name: "position",
        components: 3,
        stride: VERTEX_STRIDE,
        offset: POSITION_OFFSET,
    },
    VertexAttribute {
        name: "normal",
        components: 3,
        stride: VERTEX_STRIDE,
        offset: NORMAL_OFFSET,
    },
    VertexAttribute {
        name: "color",
        components: 3,
        stride: VERTEX_STRIDE,
        offset: COLOR_OFFSET,
    },
];

#[derive(thiserror::Error, Debug)]
pub enum DeviceError {
    /// The host cannot provide the graphics capability at all.
    #[error("graphics device not supported: {0}")]
    Unsupported(String),
    #[error("shader program failed to compile: {0}")]
    Compile(String),
    #[error("unknown vertex attribute '{0}'")]
    UnknownAttribute(String),
    #[error("render surface lost")]
    SurfaceLost,
    #[error("graphics device out of memory")]
    OutOfMemory,
    #[error("frame failed: {0}")]
    Frame(String),
}

/// The calls the renderer makes into a graphics device.
///
/// The device owns all GPU objects. The renderer only ever talks to it
/// through this trait so the frame logic can run against a fake.
pub trait RenderDevice {
    /// Compiles and links the program, and makes it current.
    fn compile_program(&mut self, vertex_source: &str, fragment_source: &str) -> Result<(), DeviceError>;

    /// Uploads the vertex data. Called once, the data is never rewritten.
    fn upload_buffer(&mut self, data: &[f32]);

    fn bind_vertex_attribute(&mut self, attribute: &VertexAttribute) -> Result<(), DeviceError>;

    /// Sets a named shader parameter. Unknown names are ignored.
    fn set_uniform(&mut self, name: &str, value: UniformValue);

    /// Clears the color and depth targets.
    fn clear(&mut self, color: [f32; 4]);

    /// Draws `vertex_count` vertices of the uploaded buffer as a triangle list.
    fn draw(&mut self, vertex_count: u32) -> Result<(), DeviceError>;

    fn resize_viewport(&mut self, width: u32, height: u32);
}

#[cfg(test)]
pub(crate) mod recording {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        Compile,
        Upload(usize),
        Bind(&'static str),
        Uniform(String, UniformValue),
        Clear([f32; 4]),
        Draw(u32),
        Viewport(u32, u32),
    }

    /// Records every call in order. Never fails unless told to.
    #[derive(Default)]
    pub struct RecordingDevice {
        pub calls: Vec<Call>,
        pub fail_compile: bool,
        pub fail_draw: bool,
    }

    impl RecordingDevice {
        pub fn uniforms(&self, name: &str) -> Vec<UniformValue> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Uniform(n, v) if n == name => Some(*v),
                    _ => None,
                })
                .collect()
        }

        pub fn draws(&self) -> Vec<u32> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Draw(n) => Some(*n),
                    _ => None,
                })
                .collect()
        }
    }

    impl RenderDevice for RecordingDevice {
        fn compile_program(&mut self, _: &str, _: &str) -> Result<(), DeviceError> {
            if self.fail_compile {
                return Err(DeviceError::Compile("rejected".to_string()));
            }
            self.calls.push(Call::Compile);
            Ok(())
        }

        fn upload_buffer(&mut self, data: &[f32]) {
            self.calls.push(Call::Upload(data.len()));
        }

        fn bind_vertex_attribute(&mut self, attribute: &VertexAttribute) -> Result<(), DeviceError> {
            self.calls.push(Call::Bind(attribute.name));
            Ok(())
        }

        fn set_uniform(&mut self, name: &str, value: UniformValue) {
            self.calls.push(Call::Uniform(name.to_string(), value));
        }

        fn clear(&mut self, color: [f32; 4]) {
            self.calls.push(Call::Clear(color));
        }

        fn draw(&mut self, vertex_count: u32) -> Result<(), DeviceError> {
            if self.fail_draw {
                return Err(DeviceError::SurfaceLost);
            }
            self.calls.push(Call::Draw(vertex_count));
            Ok(())
        }

        fn resize_viewport(&mut self, width: u32, height: u32) {
            self.calls.push(Call::Viewport(width, height));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_cover_the_record() {
        let offsets: Vec<usize> = VERTEX_ATTRIBUTES.iter().map(|a| a.offset).collect();
        assert_eq!(vec![0, 12, 24], offsets);
        assert!(VERTEX_ATTRIBUTES.iter().all(|a| a.stride == 36));
        let floats: u32 = VERTEX_ATTRIBUTES.iter().map(|a| a.components).sum();
        assert_eq!(9, floats);
    }
}
