use crate::{
    bounds::BoundingBox,
    geometry::{InterleavedVertex, Triangle, FLOATS_PER_VERTEX},
    TriangleMesh,
};

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("vertex buffer length {0} is not a multiple of 9")]
pub struct BufferLengthError(pub usize);

/// A flat list of interleaved vertex records, ready to be uploaded to a device.
///
/// Every 9 floats describe one corner of a triangle:
///
/// ```text
///  0   1   2    3   4   5    6   7   8
/// [px, py, pz,  nx, ny, nz,  r,  g,  b ] [px, ...
/// ```
///
/// Every 3 records form one triangle, so the buffer is drawn as a plain
/// triangle list with no index buffer. The length is always a multiple of 9.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexBuffer {
    data: Vec<f32>,
}

impl VertexBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, vertex: InterleavedVertex) {
        self.data.extend_from_slice(bytemuck::cast_slice(&[vertex]));
    }

    pub fn push_triangle(&mut self, triangle: Triangle) {
        self.data.extend_from_slice(bytemuck::cast_slice(&[triangle]));
    }

    /// Number of vertices to draw (buffer length / 9).
    pub fn vertex_count(&self) -> usize {
        self.data.len() / FLOATS_PER_VERTEX
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_floats(&self) -> &[f32] {
        &self.data
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    pub fn as_vertices(&self) -> &[InterleavedVertex] {
        bytemuck::cast_slice(&self.data)
    }

    pub fn vertices(&self) -> impl Iterator<Item = &InterleavedVertex> + '_ {
        self.as_vertices().iter()
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::compute(&self.data)
    }

    pub fn into_inner(self) -> Vec<f32> {
        let VertexBuffer { data } = self;
        data
    }
}

impl TryFrom<Vec<f32>> for VertexBuffer {
    type Error = BufferLengthError;

    fn try_from(data: Vec<f32>) -> Result<Self, Self::Error> {
        if data.len() % FLOATS_PER_VERTEX != 0 {
            return Err(BufferLengthError(data.len()));
        }
        Ok(Self { data })
    }
}

impl TriangleMesh for VertexBuffer {
    fn from_triangles(triangles: Vec<Triangle>) -> Self {
        Self {
            data: bytemuck::cast_slice(&triangles).to_vec(),
        }
    }

    fn triangle_count(&self) -> usize {
        self.vertex_count() / 3
    }

    fn as_triangle_slice(&self) -> Option<&[Triangle]> {
        // A buffer assembled with `push` may end on a partial triangle.
        bytemuck::try_cast_slice(&self.data).ok()
    }
}
