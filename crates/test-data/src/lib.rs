pub struct TestModel {
    pub text: &'static str,
    pub triangles: usize,
    /// Smallest and largest corner of the model's extents.
    pub min: [f32; 3],
    pub max: [f32; 3],
}

pub const OBJ_TRIANGLE: TestModel = TestModel {
    text: include_str!("../../../res/triangle/triangle.obj"),
    triangles: 1,
    min: [0.0, 0.0, 0.0],
    max: [1.0, 1.0, 0.0],
};

pub const OBJ_QUAD: TestModel = TestModel {
    text: include_str!("../../../res/quad/quad.obj"),
    triangles: 2,
    min: [0.0, 0.0, 0.0],
    max: [1.0, 1.0, 0.0],
};

pub const OBJ_CUBE: TestModel = TestModel {
    text: include_str!("../../../res/cube/cube.obj"),
    triangles: 12,
    min: [0.0, 0.0, 0.0],
    max: [2.0, 2.0, 2.0],
};

pub const OBJ_TORUS: TestModel = TestModel {
    text: include_str!("../../../res/models/torus.obj"),
    triangles: 32 * 16 * 2,
    min: [-1.4, -0.4, -1.4],
    max: [1.4, 0.4, 1.4],
};
