//! Mesh geometry representation shared between scene input and rendering.

use ember_math::{Point3, Vec3};

/// A triangular face: index triples into the owning mesh's pools.
///
/// Faces never copy vertex data; positions and normals are looked up
/// through these indices at intersection time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    pub vertex_indices: [u32; 3],
    pub normal_indices: [u32; 3],
}

/// Raw mesh pools plus index-based faces.
///
/// Texture coordinates are parsed and carried but not consumed by the
/// renderer yet.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub positions: Vec<Point3>,
    pub normals: Vec<Vec3>,
    pub texcoords: Vec<Vec3>,
    pub faces: Vec<Face>,
}

impl Mesh {
    pub fn new(
        positions: Vec<Point3>,
        normals: Vec<Vec3>,
        faces: Vec<Face>,
    ) -> Self {
        Self {
            positions,
            normals,
            texcoords: Vec::new(),
            faces,
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.faces.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn has_normals(&self) -> bool {
        !self.normals.is_empty()
    }

    /// Compute smooth per-vertex normals by averaging face normals.
    ///
    /// Replaces the normal pool with one entry per vertex and rewires every
    /// face's normal indices to its vertex indices. Faces are taken as
    /// counter-clockwise wound.
    pub fn compute_normals(&mut self) {
        let vertex_count = self.positions.len();
        let mut normals = vec![Vec3::ZERO; vertex_count];

        // Accumulate area-weighted face normals at each vertex
        for face in &self.faces {
            let [i0, i1, i2] = face.vertex_indices.map(|i| i as usize);
            if i0 >= vertex_count || i1 >= vertex_count || i2 >= vertex_count {
                log::warn!(
                    "skipping face with out-of-range vertex indices [{}, {}, {}] (vertex count {})",
                    i0,
                    i1,
                    i2,
                    vertex_count
                );
                continue;
            }

            let p0 = self.positions[i0];
            let p1 = self.positions[i1];
            let p2 = self.positions[i2];
            let face_normal = (p1 - p0).cross(p2 - p0);

            normals[i0] += face_normal;
            normals[i1] += face_normal;
            normals[i2] += face_normal;
        }

        // Normalize accumulated normals
        for normal in &mut normals {
            let len = normal.length();
            if len > 0.0 {
                *normal /= len;
            } else {
                *normal = Vec3::Y; // degenerate vertex, pick an arbitrary up
            }
        }

        for face in &mut self.faces {
            face.normal_indices = face.vertex_indices;
        }
        self.normals = normals;
    }
}
