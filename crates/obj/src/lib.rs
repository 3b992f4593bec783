use dither_mesh::{InterleavedVertex, Triangle, TriangleMesh, DEFAULT_NORMAL};
use std::io::Read;
use std::path::Path;

#[derive(thiserror::Error, Debug)]
pub enum ObjError {
    #[error("line {line}: face references position {index} which has not been declared")]
    MissingPosition { line: usize, index: usize },

    #[error("line {line}: invalid position index in corner '{token}'")]
    InvalidPositionIndex { line: usize, token: String },

    #[error("line {line}: invalid coordinate in '{token}'")]
    InvalidCoordinate { line: usize, token: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Geometry collected so far. Indices in faces refer into these lists.
#[derive(Default)]
struct Sources {
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
}

fn parse_triple<'a>(
    line: usize,
    record: &str,
    mut tokens: impl Iterator<Item = &'a str>,
) -> Result<[f32; 3], ObjError> {
    let mut coords = [0.0f32; 3];
    for coord in &mut coords {
        *coord = tokens
            .next()
            .and_then(|t| t.parse().ok())
            .ok_or_else(|| ObjError::InvalidCoordinate {
                line,
                token: record.to_string(),
            })?;
    }
    // Anything past the third component (ex: the optional `w` weight) is ignored.
    Ok(coords)
}

/// Resolves a single face corner, ex: `3`, `3/1`, `3//2` or `3/1/2`.
///
/// The position is mandatory. The texture index is ignored. A normal that is
/// missing, unparsable or out of range falls back to `DEFAULT_NORMAL`.
fn resolve_corner(line: usize, token: &str, sources: &Sources) -> Result<InterleavedVertex, ObjError> {
    let mut parts = token.split('/');

    let index = parts
        .next()
        .and_then(|p| p.parse::<usize>().ok())
        .filter(|i| *i > 0)
        .ok_or_else(|| ObjError::InvalidPositionIndex {
            line,
            token: token.to_string(),
        })?;
    let position = *sources
        .positions
        .get(index - 1)
        .ok_or(ObjError::MissingPosition { line, index })?;

    let _texture = parts.next();
    let normal = parts
        .next()
        .and_then(|p| p.parse::<usize>().ok())
        .and_then(|i| i.checked_sub(1))
        .and_then(|i| sources.normals.get(i))
        .copied()
        .unwrap_or(DEFAULT_NORMAL);

    Ok(InterleavedVertex::new(position, normal))
}

/// Splits a polygon into triangles that all share the first corner.
///
/// For corners `[0, 1, ... n-1]` this emits `(0, i, i+1)` for `i` in
/// `1..n-1`. This is only correct for convex polygons.
fn fan_triangulate(corners: &[InterleavedVertex], triangles: &mut Vec<Triangle>) {
    let Some((&c0, rest)) = corners.split_first() else {
        return;
    };
    for pair in rest.windows(2) {
        triangles.push(Triangle {
            c0,
            c1: pair[0],
            c2: pair[1],
        });
    }
}

fn parse_lines<M: TriangleMesh>(text: &str) -> Result<M, ObjError> {
    let mut sources = Sources::default();
    let mut triangles = Vec::new();
    let mut corners = Vec::new();

    for (n, raw) in text.lines().enumerate() {
        let line = n + 1;
        let record = raw.trim();
        let mut tokens = record.split_whitespace();
        match tokens.next() {
            Some("v") => {
                let p = parse_triple(line, record, tokens)?;
                sources.positions.push(p);
            }
            Some("vn") => {
                let normal = parse_triple(line, record, tokens)?;
                sources.normals.push(normal);
            }
            Some("f") => {
                corners.clear();
                for token in tokens {
                    corners.push(resolve_corner(line, token, &sources)?);
                }
                if corners.len() < 3 {
                    log::warn!("line {}: face with {} corners skipped", line, corners.len());
                    continue;
                }
                fan_triangulate(&corners, &mut triangles);
            }
            // Texture coordinates, comments, groups, objects, materials,
            // smoothing groups and blank lines carry nothing we draw.
            _ => {}
        }
    }

    log::debug!(
        "parsed {} positions, {} normals into {} triangles",
        sources.positions.len(),
        sources.normals.len(),
        triangles.len()
    );
    Ok(M::from_triangles(triangles))
}

/// Parses the `v`, `vn` and `f` records of an OBJ document into a mesh.
///
/// Every other record is skipped. Text without any face yields an empty mesh.
pub fn parse_obj<M: TriangleMesh>(text: &str) -> Result<M, ObjError> {
    parse_lines(text)
}

pub fn read_obj<M: TriangleMesh, P: AsRef<Path>>(p: P) -> Result<M, ObjError> {
    let mut f = std::fs::File::open(p)?;
    f.read_obj()
}

pub trait ObjReader: Read {
    fn read_obj<M: TriangleMesh>(&mut self) -> Result<M, ObjError>;
}

impl<T: Read> ObjReader for T {
    fn read_obj<M: TriangleMesh>(&mut self) -> Result<M, ObjError> {
        // Invalid UTF-8 surfaces as `ErrorKind::InvalidData`.
        let mut text = String::new();
        self.read_to_string(&mut text)?;
        parse_lines(&text)
    }
}
