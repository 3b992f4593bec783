pub type Vector3 = cgmath::Vector3<f32>;

/// Number of floats in a single interleaved vertex record.
pub const FLOATS_PER_VERTEX: usize = 9;

/// Size in bytes of a single interleaved vertex record.
pub const VERTEX_STRIDE: usize = FLOATS_PER_VERTEX * std::mem::size_of::<f32>();

/// Byte offsets of each attribute within a record.
pub const POSITION_OFFSET: usize = 0;
pub const NORMAL_OFFSET: usize = 3 * std::mem::size_of::<f32>();
pub const COLOR_OFFSET: usize = 6 * std::mem::size_of::<f32>();

/// Normal used for corners that do not reference one.
pub const DEFAULT_NORMAL: [f32; 3] = [0.0, 1.0, 0.0];

/// There is no material support, every vertex is white.
pub const WHITE: [f32; 3] = [1.0, 1.0, 1.0];

// We rely on Vector3 being repr(c).
static_assertions::assert_eq_size!(Vector3, [f32; 3]);
static_assertions::assert_eq_align!(Vector3, f32);

/// A single corner of a triangle as it is laid out in the vertex buffer.
///
/// The layout is fixed: position, normal, color, each as 3 floats. The
/// device side binds attributes using the offsets above so this must stay
/// `repr(C)` with no padding.
#[repr(C)]
#[derive(Debug, PartialEq, Copy, Clone, bytemuck_derive::Pod, bytemuck_derive::Zeroable)]
pub struct InterleavedVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 3],
}

static_assertions::assert_eq_size!(InterleavedVertex, [f32; FLOATS_PER_VERTEX]);
static_assertions::assert_eq_align!(InterleavedVertex, f32);

impl InterleavedVertex {
    pub fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self {
            position,
            normal,
            color: WHITE,
        }
    }

    pub fn position(&self) -> Vector3 {
        self.position.into()
    }
}

impl std::default::Default for InterleavedVertex {
    fn default() -> Self {
        Self::new([0.0, 0.0, 0.0], DEFAULT_NORMAL)
    }
}

/// Three corners of a triangle, in winding order.
#[repr(C)]
#[derive(Debug, PartialEq, Copy, Clone, Default, bytemuck_derive::Pod, bytemuck_derive::Zeroable)]
pub struct Triangle {
    pub c0: InterleavedVertex,
    pub c1: InterleavedVertex,
    pub c2: InterleavedVertex,
}

impl Triangle {
    pub fn corners(&self) -> [InterleavedVertex; 3] {
        [self.c0, self.c1, self.c2]
    }
}
