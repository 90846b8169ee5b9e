//! Indexed triangle mesh with a nested BVH.
//!
//! Faces store index triples into the mesh pools and never copy vertex
//! data. Geometry stays untransformed in the pools; the transform chain is
//! replayed at every query, so pushing or popping a transform is cheap and
//! takes effect at the next commit.

use crate::bvh::{BvhNode, PrimitiveSet};
use crate::hittable::{CommitError, HitRecord, Hittable};
use crate::triangle::{intersect_triangle, triangle_bounds};
use crate::Material;
use ember_math::{Aabb, Interval, Point3, Ray, Transform, TransformChain, Vec3};
use std::sync::Arc;

/// A mesh face: pool indices plus the transformed centroid and bounds
/// cached by the last commit.
struct MeshFace {
    vertex_indices: [u32; 3],
    normal_indices: [u32; 3],
    centroid: Point3,
    bbox: Aabb,
}

pub struct TriangleMesh {
    positions: Vec<Point3>,
    normals: Vec<Vec3>,
    texcoords: Vec<Vec3>, // carried but not consumed yet
    faces: Vec<MeshFace>,
    material: Arc<dyn Material>,
    transforms: TransformChain,
    bvh: Option<BvhNode>,
    bbox: Aabb,
}

impl TriangleMesh {
    /// Build a mesh from raw pools. Meshes without normals get smooth
    /// per-vertex normals computed up front.
    pub fn new(mut mesh: ember_core::Mesh, material: Arc<dyn Material>) -> Self {
        if !mesh.has_normals() {
            mesh.compute_normals();
        }

        let faces = mesh
            .faces
            .iter()
            .map(|face| MeshFace {
                vertex_indices: face.vertex_indices,
                normal_indices: face.normal_indices,
                centroid: Point3::ZERO,
                bbox: Aabb::EMPTY,
            })
            .collect();

        Self {
            positions: mesh.positions,
            normals: mesh.normals,
            texcoords: mesh.texcoords,
            faces,
            material,
            transforms: TransformChain::new(),
            bvh: None,
            bbox: Aabb::EMPTY,
        }
    }

    pub fn push_transform(&mut self, transform: Transform) {
        self.transforms.push(transform);
    }

    pub fn pop_transform(&mut self) -> Option<Transform> {
        self.transforms.pop()
    }

    /// Push a translation that centers the (transformed) mesh on the
    /// origin.
    pub fn to_origin(&mut self) {
        self.update_bounding_box();
        let center = self.bbox.centroid();
        self.transforms.push(Transform::Translation(-center));
    }

    pub fn triangle_count(&self) -> usize {
        self.faces.len()
    }

    /// Texture coordinate pool (placeholder until materials consume UVs).
    pub fn texcoords(&self) -> &[Vec3] {
        &self.texcoords
    }

    fn face_vertices(&self, face: &MeshFace) -> [Point3; 3] {
        face.vertex_indices
            .map(|i| self.transforms.point(self.positions[i as usize]))
    }

    fn update_bounding_box(&mut self) {
        let mut min = Point3::splat(f64::INFINITY);
        let mut max = Point3::splat(f64::NEG_INFINITY);
        for &position in &self.positions {
            let p = self.transforms.point(position);
            min = min.min(p);
            max = max.max(p);
        }
        self.bbox = Aabb::from_points(min, max);
    }
}

impl PrimitiveSet for TriangleMesh {
    fn primitive_count(&self) -> usize {
        self.faces.len()
    }

    fn primitive_bounding_box(&self, index: usize) -> Aabb {
        self.faces[index].bbox
    }

    fn primitive_centroid(&self, index: usize) -> Point3 {
        self.faces[index].centroid
    }

    fn primitive_hit<'a>(
        &'a self,
        index: usize,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
    ) -> bool {
        let face = &self.faces[index];
        if !face.bbox.hit(ray, ray_t) {
            return false;
        }

        let vertices = self.face_vertices(face);
        let Some(tri_hit) = intersect_triangle(vertices, ray, ray_t) else {
            return false;
        };

        let normals = face
            .normal_indices
            .map(|i| self.transforms.direction(self.normals[i as usize]));

        let [b0, b1, b2] = tri_hit.bary;
        rec.t = tri_hit.t;
        rec.p = b0 * vertices[0] + b1 * vertices[1] + b2 * vertices[2];
        let normal = (b0 * normals[0] + b1 * normals[1] + b2 * normals[2]).normalize();
        rec.set_face_normal(ray, normal);
        rec.material = self.material.as_ref();

        true
    }
}

impl Hittable for TriangleMesh {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        if !self.bbox.hit(ray, ray_t) {
            return false;
        }

        // uncommitted meshes answer no queries
        match &self.bvh {
            Some(node) => node.hit(self, ray, ray_t, rec),
            None => false,
        }
    }

    fn commit(&mut self) -> Result<(), CommitError> {
        if self.faces.is_empty() {
            return Err(CommitError::EmptyMesh);
        }

        // finalize per-face centroids and bounds through the chain
        for index in 0..self.faces.len() {
            let vertices = self.face_vertices(&self.faces[index]);
            let face = &mut self.faces[index];
            face.centroid = (vertices[0] + vertices[1] + vertices[2]) / 3.0;
            face.bbox = triangle_bounds(vertices);
        }

        self.bvh = BvhNode::build(self);
        self.update_bounding_box();
        log::debug!("mesh committed: {} faces", self.faces.len());
        Ok(())
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn centroid(&self) -> Point3 {
        // box midpoint, good enough for a BVH sort key
        self.bbox.centroid()
    }
}
