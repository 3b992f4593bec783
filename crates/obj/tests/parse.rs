use dither_mesh::{TriangleMesh, VertexBuffer, DEFAULT_NORMAL, FLOATS_PER_VERTEX, WHITE};
use dither_obj::{parse_obj, ObjError, ObjReader};
use dither_test_data::{TestModel, OBJ_CUBE, OBJ_QUAD, OBJ_TORUS, OBJ_TRIANGLE};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen_test::wasm_bindgen_test as test;

fn positions(mesh: &VertexBuffer) -> Vec<[f32; 3]> {
    mesh.vertices().map(|v| v.position).collect()
}

fn parse_model(model: &TestModel) -> VertexBuffer {
    parse_obj(model.text).unwrap()
}

#[test]
fn parse_triangle() {
    let mesh = parse_model(&OBJ_TRIANGLE);

    assert_eq!(27, mesh.as_floats().len());
    assert_eq!(1, mesh.triangle_count());
    assert_eq!(
        vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        positions(&mesh)
    );
    assert!(mesh.vertices().all(|v| v.normal == DEFAULT_NORMAL));
    assert!(mesh.vertices().all(|v| v.color == WHITE));
}

#[test]
fn parse_quad() {
    let mesh = parse_model(&OBJ_QUAD);

    assert_eq!(54, mesh.as_floats().len());
    assert_eq!(2, mesh.triangle_count());
    // Corners (1, 3, 4) of the quad form the second triangle.
    assert_eq!(
        vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ],
        positions(&mesh)
    );
}

#[test]
fn parse_referenced_normals() {
    let mesh: VertexBuffer = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//1").unwrap();
    assert_eq!(3, mesh.vertex_count());
    assert!(mesh.vertices().all(|v| v.normal == [0.0, 0.0, 1.0]));
}

#[test]
fn ngon_emits_n_minus_two_triangles() {
    for n in 3..10usize {
        let mut text = String::new();
        for i in 0..n {
            let a = i as f32 / n as f32 * std::f32::consts::TAU;
            text.push_str(&format!("v {} {} 0\n", a.cos(), a.sin()));
        }
        text.push('f');
        for i in 1..=n {
            text.push_str(&format!(" {}", i));
        }
        let mesh: VertexBuffer = parse_obj(&text).unwrap();
        assert_eq!(n - 2, mesh.triangle_count(), "{}-gon", n);
        assert_eq!(0, mesh.as_floats().len() % FLOATS_PER_VERTEX);

        let first = mesh.as_vertices()[0].position;
        for triangle in mesh.as_triangle_slice().unwrap() {
            assert_eq!(first, triangle.c0.position);
        }
    }
}

#[test]
fn parse_cube_ignores_other_records() {
    let mesh = parse_model(&OBJ_CUBE);
    assert_eq!(OBJ_CUBE.triangles, mesh.triangle_count());
    assert!(mesh.vertices().all(|v| v.color == WHITE));
    // Every face of the cube references an axis aligned normal.
    assert!(mesh
        .vertices()
        .all(|v| v.normal.iter().map(|c| c.abs()).sum::<f32>() == 1.0));
    assert_eq!([0.0, 0.0, -1.0], mesh.as_vertices()[0].normal);
}

#[test]
fn parse_torus() {
    let mesh = parse_model(&OBJ_TORUS);
    assert_eq!(OBJ_TORUS.triangles, mesh.triangle_count());
    assert_eq!(OBJ_TORUS.triangles * 3 * FLOATS_PER_VERTEX, mesh.as_floats().len());
}

#[test]
fn reparsing_is_identical() {
    let first = parse_model(&OBJ_CUBE);
    let second = parse_model(&OBJ_CUBE);
    assert_eq!(first.as_bytes(), second.as_bytes());
}

#[test]
fn empty_and_unrecognised_input() {
    for text in ["", "\n\n   \n", "# nothing here\no Empty\ng group\nvt 0 0\ns 1\nusemtl x"] {
        let mesh: VertexBuffer = parse_obj(text).unwrap();
        assert!(mesh.is_empty(), "{:?}", text);
    }
}

#[test]
fn whitespace_is_trimmed() {
    let mesh: VertexBuffer =
        parse_obj("  v 0 0 0  \r\n\tv  1 0 0\r\nv 0 1 0\r\n   f 1  2   3   \r\n").unwrap();
    assert_eq!(1, mesh.triangle_count());
}

#[test]
fn undeclared_position_is_fatal() {
    let err = parse_obj::<VertexBuffer>("v 0 0 0\nv 1 0 0\nf 1 2 3\n").unwrap_err();
    assert!(matches!(err, ObjError::MissingPosition { line: 3, index: 3 }));
}

#[test]
fn positions_declared_after_face_are_not_visible() {
    let err = parse_obj::<VertexBuffer>("v 0 0 0\nf 1 2 3\nv 1 0 0\nv 0 1 0\n").unwrap_err();
    assert!(matches!(err, ObjError::MissingPosition { line: 2, index: 2 }));
}

#[test]
fn read_from_reader() {
    let mut reader = std::io::Cursor::new(OBJ_QUAD.text.as_bytes());
    let mesh: VertexBuffer = reader.read_obj().unwrap();
    assert_eq!(OBJ_QUAD.triangles, mesh.triangle_count());
}

#[test]
fn reader_rejects_invalid_utf8() {
    let mut reader = std::io::Cursor::new(vec![b'v', b' ', 0xff, 0xfe]);
    let err = reader.read_obj::<VertexBuffer>().unwrap_err();
    assert!(matches!(err, ObjError::Io(e) if e.kind() == std::io::ErrorKind::InvalidData));
}
