//! Wavefront OBJ subset reader.
//!
//! Handles `v`, `vn`, `vt` and triangular `f` statements with 1-based
//! `vertex/texture/normal` index triples. Comments and unrecognized
//! statements are skipped. Index values are converted to 0-based but not
//! range-checked against the pools; that is the consumer's contract.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use ember_math::{Point3, Vec3};
use thiserror::Error;

use crate::mesh::{Face, Mesh};

#[derive(Debug, Error)]
pub enum ObjError {
    #[error("failed to read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: `{statement}` expects {expected} components, found {found}")]
    ComponentCount {
        line: usize,
        statement: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: malformed number `{token}`")]
    Number { line: usize, token: String },
    #[error("line {line}: malformed face element `{token}`")]
    FaceElement { line: usize, token: String },
    #[error("line {line}: face with {found} vertices, only triangles are supported")]
    NonTriangleFace { line: usize, found: usize },
}

/// Read a mesh from an OBJ file on disk.
pub fn load_obj(path: impl AsRef<Path>) -> Result<Mesh, ObjError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ObjError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let mesh = parse_obj(BufReader::new(file))?;
    log::info!(
        "loaded {}: {} vertices, {} faces",
        path.display(),
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Parse OBJ text from any buffered reader.
///
/// If the input carries no `vn` statements, smooth per-vertex normals are
/// computed so the mesh is always renderable.
pub fn parse_obj(reader: impl BufRead) -> Result<Mesh, ObjError> {
    let mut mesh = Mesh::default();

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.map_err(|source| ObjError::Io {
            path: String::from("<input>"),
            source,
        })?;

        // strip trailing comments
        let line = match line.split_once('#') {
            Some((before, _)) => before,
            None => line.as_str(),
        };

        let mut tokens = line.split_whitespace();
        let Some(statement) = tokens.next() else {
            continue;
        };
        let args: Vec<&str> = tokens.collect();

        match statement {
            "v" => mesh.positions.push(read_vec3(line_no, "v", &args)?),
            "vn" => mesh.normals.push(read_vec3(line_no, "vn", &args)?),
            "vt" => mesh.texcoords.push(read_texcoord(line_no, &args)?),
            "f" => mesh.faces.push(read_face(line_no, &args)?),
            _ => log::debug!("line {line_no}: skipping `{statement}` statement"),
        }
    }

    if !mesh.has_normals() {
        log::debug!("input has no vertex normals, computing smooth normals");
        mesh.compute_normals();
    }

    Ok(mesh)
}

fn read_f64(line: usize, token: &str) -> Result<f64, ObjError> {
    token.parse().map_err(|_| ObjError::Number {
        line,
        token: token.to_owned(),
    })
}

fn read_vec3(line: usize, statement: &'static str, args: &[&str]) -> Result<Vec3, ObjError> {
    if args.len() != 3 {
        return Err(ObjError::ComponentCount {
            line,
            statement,
            expected: 3,
            found: args.len(),
        });
    }
    Ok(Point3::new(
        read_f64(line, args[0])?,
        read_f64(line, args[1])?,
        read_f64(line, args[2])?,
    ))
}

fn read_texcoord(line: usize, args: &[&str]) -> Result<Vec3, ObjError> {
    // 2D coordinates get a zero third component
    match args.len() {
        2 => Ok(Vec3::new(
            read_f64(line, args[0])?,
            read_f64(line, args[1])?,
            0.0,
        )),
        3 => Ok(Vec3::new(
            read_f64(line, args[0])?,
            read_f64(line, args[1])?,
            read_f64(line, args[2])?,
        )),
        found => Err(ObjError::ComponentCount {
            line,
            statement: "vt",
            expected: 2,
            found,
        }),
    }
}

fn read_face(line: usize, args: &[&str]) -> Result<Face, ObjError> {
    if args.len() != 3 {
        return Err(ObjError::NonTriangleFace {
            line,
            found: args.len(),
        });
    }

    let mut vertex_indices = [0u32; 3];
    let mut normal_indices = [0u32; 3];

    for (slot, token) in args.iter().enumerate() {
        // element forms: `v`, `v/vt`, `v//vn`, `v/vt/vn` with 1-based indices
        let mut parts = token.split('/');

        let vertex = parts
            .next()
            .and_then(|p| parse_index(p))
            .ok_or_else(|| ObjError::FaceElement {
                line,
                token: (*token).to_owned(),
            })?;

        let _texture = parts.next(); // carried in the pool, unused per-face
        let normal = match parts.next() {
            Some(p) if !p.is_empty() => {
                Some(parse_index(p).ok_or_else(|| ObjError::FaceElement {
                    line,
                    token: (*token).to_owned(),
                })?)
            }
            _ => None,
        };

        vertex_indices[slot] = vertex;
        // fall back to the vertex index when the file has per-vertex normals
        normal_indices[slot] = normal.unwrap_or(vertex);
    }

    Ok(Face {
        vertex_indices,
        normal_indices,
    })
}

/// Parse a 1-based OBJ index into a 0-based pool index.
fn parse_index(token: &str) -> Option<u32> {
    let value: u32 = token.parse().ok()?;
    value.checked_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TETRAHEDRON: &str = "\
# tetrahedron
v 0 1 0
v 1 0 1
v -1 0 1
v 0 0 -1
vn 0 0.70710678 0.70710678
f 1//1 3//1 2//1
f 1//1 2//1 4//1
f 1//1 4//1 3//1
f 2//1 3//1 4//1
";

    #[test]
    fn test_parse_tetrahedron() {
        let mesh = parse_obj(TETRAHEDRON.as_bytes()).unwrap();

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 4);
        assert_eq!(mesh.normals.len(), 1);

        // 1-based indices converted to 0-based
        assert_eq!(mesh.faces[0].vertex_indices, [0, 2, 1]);
        assert_eq!(mesh.faces[0].normal_indices, [0, 0, 0]);
    }

    #[test]
    fn test_parse_without_normals_computes_them() {
        let src = "\
v 0 0 0
v 1 0 0
v 0 1 0
f 1 2 3
";
        let mesh = parse_obj(src.as_bytes()).unwrap();

        assert!(mesh.has_normals());
        assert_eq!(mesh.normals.len(), 3);
        // CCW triangle in the XY plane faces +Z
        assert!((mesh.normals[0].z - 1.0).abs() < 1e-12);
        assert_eq!(mesh.faces[0].normal_indices, [0, 1, 2]);
    }

    #[test]
    fn test_parse_skips_comments_and_unknown() {
        let src = "\
# header comment
o some_object
v 0 0 0   # inline comment
v 1 0 0
v 0 1 0
s off
f 1 2 3
";
        let mesh = parse_obj(src.as_bytes()).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn test_parse_texcoords() {
        let src = "\
v 0 0 0
v 1 0 0
v 0 1 0
vt 0 0
vt 1 0
vt 0 1
f 1/1 2/2 3/3
";
        let mesh = parse_obj(src.as_bytes()).unwrap();
        assert_eq!(mesh.texcoords.len(), 3);
        assert_eq!(mesh.texcoords[1], Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_parse_malformed_number() {
        let err = parse_obj("v 0 zero 0\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ObjError::Number { line: 1, .. }));
    }

    #[test]
    fn test_parse_non_triangle_face() {
        let src = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f 1 2 3 4
";
        let err = parse_obj(src.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            ObjError::NonTriangleFace { line: 5, found: 4 }
        ));
    }

    #[test]
    fn test_parse_zero_index_rejected() {
        let err = parse_obj("v 0 0 0\nf 0 1 1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ObjError::FaceElement { line: 2, .. }));
    }
}
