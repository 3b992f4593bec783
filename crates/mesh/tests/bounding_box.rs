use dither_mesh::{BoundingBox, DefaultMesh, Vector3};
use dither_test_data::{TestModel, OBJ_CUBE, OBJ_QUAD, OBJ_TORUS, OBJ_TRIANGLE};
use float_eq::assert_float_eq;

fn check_extents(model: &TestModel) {
    let mesh = dither_obj::parse_obj::<DefaultMesh>(model.text).unwrap();
    let bounds = mesh.bounding_box();

    assert_float_eq!(model.min, [bounds.min.x, bounds.min.y, bounds.min.z], abs_all <= 1e-5);
    assert_float_eq!(model.max, [bounds.max.x, bounds.max.y, bounds.max.z], abs_all <= 1e-5);

    // The center is exactly the midpoint, with no tolerance.
    assert_eq!((bounds.min + bounds.max) / 2.0, bounds.center);
}

#[test]
fn fixture_extents() {
    check_extents(&OBJ_TRIANGLE);
    check_extents(&OBJ_QUAD);
    check_extents(&OBJ_CUBE);
    check_extents(&OBJ_TORUS);
}

#[test]
fn cube_is_centered_on_its_envelope() {
    let mesh = dither_obj::parse_obj::<DefaultMesh>(OBJ_CUBE.text).unwrap();
    let bounds = mesh.bounding_box();
    assert_eq!(Vector3::new(1.0, 1.0, 1.0), bounds.center);
    assert_eq!(Vector3::new(2.0, 2.0, 2.0), bounds.size());
}

#[test]
fn scenario_from_positions() {
    let mesh = dither_obj::parse_obj::<DefaultMesh>("v -1 0 0\nv 1 0 0\nv 0 2 0\nf 1 2 3").unwrap();
    let bounds = BoundingBox::compute(mesh.as_floats());
    assert_eq!(Vector3::new(-1.0, 0.0, 0.0), bounds.min);
    assert_eq!(Vector3::new(1.0, 2.0, 0.0), bounds.max);
    assert_eq!(Vector3::new(0.0, 1.0, 0.0), bounds.center);
}

#[test]
fn empty_mesh_has_no_extents() {
    let mesh = dither_obj::parse_obj::<DefaultMesh>("# empty\n").unwrap();
    assert!(mesh.bounding_box().is_empty());
}
