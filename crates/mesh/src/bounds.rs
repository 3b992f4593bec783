use crate::geometry::{Vector3, FLOATS_PER_VERTEX};

/// Axis aligned extents of a vertex buffer.
///
/// `center` is the midpoint of the extents, not the average of the
/// vertices. A mesh with many vertices on one side is still centered on
/// its envelope.
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct BoundingBox {
    pub min: Vector3,
    pub max: Vector3,
    pub center: Vector3,
}

impl BoundingBox {
    /// Scans an interleaved buffer at a stride of 9 floats, using the first
    /// 3 floats of every record as the position.
    ///
    /// An empty buffer yields `min = +inf`, `max = -inf` and a NaN center.
    /// Callers must treat that as an invalid mesh, see [`BoundingBox::is_empty`].
    pub fn compute(data: &[f32]) -> Self {
        let mut min = Vector3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY);
        let mut max = Vector3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY);

        for record in data.chunks_exact(FLOATS_PER_VERTEX) {
            let (x, y, z) = (record[0], record[1], record[2]);
            min.x = min.x.min(x);
            min.y = min.y.min(y);
            min.z = min.z.min(z);
            max.x = max.x.max(x);
            max.y = max.y.max(y);
            max.z = max.z.max(z);
        }

        Self {
            min,
            max,
            center: (min + max) / 2.0,
        }
    }

    /// True when no positions were scanned.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x
    }

    pub fn size(&self) -> Vector3 {
        self.max - self.min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(x: f32, y: f32, z: f32) -> [f32; 9] {
        [x, y, z, 0.0, 1.0, 0.0, 1.0, 1.0, 1.0]
    }

    #[test]
    fn extents_and_midpoint() {
        let data: Vec<f32> = [
            record(-1.0, 0.0, 0.0),
            record(1.0, 0.0, 0.0),
            record(0.0, 2.0, 0.0),
        ]
        .concat();
        let bounds = BoundingBox::compute(&data);
        assert_eq!(Vector3::new(-1.0, 0.0, 0.0), bounds.min);
        assert_eq!(Vector3::new(1.0, 2.0, 0.0), bounds.max);
        assert_eq!(Vector3::new(0.0, 1.0, 0.0), bounds.center);
        assert_eq!(Vector3::new(2.0, 2.0, 0.0), bounds.size());
        assert!(!bounds.is_empty());
    }

    #[test]
    fn normals_and_colors_are_not_positions() {
        // Large values outside the position slots must not leak into the box.
        let data = [0.5, 0.5, 0.5, 100.0, -100.0, 100.0, 7.0, 7.0, 7.0];
        let bounds = BoundingBox::compute(&data);
        assert_eq!(Vector3::new(0.5, 0.5, 0.5), bounds.min);
        assert_eq!(Vector3::new(0.5, 0.5, 0.5), bounds.max);
    }

    #[test]
    fn center_is_midpoint_not_centroid() {
        let data: Vec<f32> = [
            record(0.0, 0.0, 0.0),
            record(0.0, 0.0, 0.0),
            record(0.0, 0.0, 0.0),
            record(4.0, 0.0, 0.0),
        ]
        .concat();
        let bounds = BoundingBox::compute(&data);
        assert_eq!(2.0, bounds.center.x);
    }

    #[test]
    fn empty_buffer_is_degenerate() {
        let bounds = BoundingBox::compute(&[]);
        assert!(bounds.is_empty());
        assert_eq!(f32::INFINITY, bounds.min.x);
        assert_eq!(f32::NEG_INFINITY, bounds.max.z);
        assert!(bounds.center.x.is_nan());
        assert!(bounds.center.y.is_nan());
        assert!(bounds.center.z.is_nan());
    }
}
