//! Triangle primitive and the watertight ray-triangle test.
//!
//! Intersection translates the vertices into the ray's frame, permutes the
//! axes so the ray's dominant direction component becomes local z, shears
//! the ray onto that axis, and classifies the origin against the projected
//! 2D edge functions. A zero edge function counts as inside, which is what
//! keeps shared edges between adjacent triangles gap-free.

use crate::hittable::{CommitError, HitRecord, Hittable};
use crate::Material;
use ember_math::{Aabb, Interval, Point3, Ray, Vec3};
use std::sync::Arc;

/// Near-zero cutoff for the edge-function determinant; rays this close to
/// the triangle plane conservatively miss.
const DET_EPS: f64 = 1e-9;

/// Barycentric weights and distance of a ray-triangle intersection.
pub(crate) struct TriangleHit {
    pub t: f64,
    pub bary: [f64; 3],
}

/// Watertight ray-triangle test against world-space vertices.
pub(crate) fn intersect_triangle(
    vertices: [Point3; 3],
    ray: &Ray,
    ray_t: Interval,
) -> Option<TriangleHit> {
    // translate vertices into the ray-local frame
    let mut v0 = vertices[0] - ray.origin();
    let mut v1 = vertices[1] - ray.origin();
    let mut v2 = vertices[2] - ray.origin();

    // permute axes so the dominant direction component becomes z
    // (ties resolve to the lower axis index)
    let d = ray.direction();
    let mut max_dim = usize::from(d.y.abs() > d.x.abs());
    if d.z.abs() > d[max_dim].abs() {
        max_dim = 2;
    }
    let kz = max_dim;
    let kx = (kz + 1) % 3;
    let ky = (kx + 1) % 3;
    let dir = permute(d, kx, ky, kz);
    v0 = permute(v0, kx, ky, kz);
    v1 = permute(v1, kx, ky, kz);
    v2 = permute(v2, kx, ky, kz);

    // shear so the ray direction becomes the local z axis
    let sx = -dir.x / dir.z;
    let sy = -dir.y / dir.z;
    let sz = 1.0 / dir.z;
    v0.x += sx * v0.z;
    v0.y += sy * v0.z;
    v1.x += sx * v1.z;
    v1.y += sy * v1.z;
    v2.x += sx * v2.z;
    v2.y += sy * v2.z;
    v0.z *= sz;
    v1.z *= sz;
    v2.z *= sz;

    // signed 2D edge functions: the origin lies inside the triangle iff all
    // three share a sign, where an exact zero (on-edge) counts as inside
    let e0 = v1.x * v2.y - v1.y * v2.x;
    let e1 = v2.x * v0.y - v2.y * v0.x;
    let e2 = v0.x * v1.y - v0.y * v1.x;

    if (e0 < 0.0 || e1 < 0.0 || e2 < 0.0) && (e0 > 0.0 || e1 > 0.0 || e2 > 0.0) {
        return None;
    }

    let det = e0 + e1 + e2;
    if det.abs() < DET_EPS {
        // ray effectively parallel to the triangle plane
        return None;
    }

    // scaled distance, sign- and range-checked before the division
    let t_scaled = e0 * v0.z + e1 * v1.z + e2 * v2.z;
    if det < 0.0 && (t_scaled >= 0.0 || t_scaled < ray_t.max * det) {
        return None;
    }
    if det > 0.0 && (t_scaled <= 0.0 || t_scaled > ray_t.max * det) {
        return None;
    }

    let inv_det = 1.0 / det;
    let t = t_scaled * inv_det;
    if t < ray_t.min {
        return None;
    }

    Some(TriangleHit {
        t,
        bary: [e0 * inv_det, e1 * inv_det, e2 * inv_det],
    })
}

#[inline]
fn permute(v: Vec3, kx: usize, ky: usize, kz: usize) -> Vec3 {
    Vec3::new(v[kx], v[ky], v[kz])
}

/// Bounding box of a triangle; degenerate axes get padded by the Aabb
/// constructor.
pub(crate) fn triangle_bounds(vertices: [Point3; 3]) -> Aabb {
    let min = vertices[0].min(vertices[1]).min(vertices[2]);
    let max = vertices[0].max(vertices[1]).max(vertices[2]);
    Aabb::from_points(min, max)
}

/// Vertex ordering of a standalone triangle, used to orient the generated
/// face normal. Intersection never culls by winding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winding {
    Clockwise,
    CounterClockwise,
}

/// A standalone triangle primitive with per-vertex normals.
pub struct Triangle {
    vertices: [Point3; 3],
    normals: [Vec3; 3],
    material: Arc<dyn Material>,
    centroid: Point3,
    bbox: Aabb,
}

impl Triangle {
    /// Flat-shaded triangle: the face normal, oriented by `winding`, is
    /// replicated at every vertex.
    pub fn new(vertices: [Point3; 3], winding: Winding, material: Arc<dyn Material>) -> Self {
        let face_normal = (vertices[1] - vertices[0])
            .cross(vertices[2] - vertices[0])
            .normalize();
        let normal = match winding {
            Winding::CounterClockwise => face_normal,
            Winding::Clockwise => -face_normal,
        };
        Self::with_normals(vertices, [normal; 3], material)
    }

    /// Smooth-shaded triangle with explicit per-vertex normals.
    pub fn with_normals(
        vertices: [Point3; 3],
        normals: [Vec3; 3],
        material: Arc<dyn Material>,
    ) -> Self {
        let mut triangle = Self {
            vertices,
            normals: normals.map(|n| n.normalize()),
            material,
            centroid: Point3::ZERO,
            bbox: Aabb::EMPTY,
        };
        triangle.refresh_cached();
        triangle
    }

    fn refresh_cached(&mut self) {
        self.centroid = (self.vertices[0] + self.vertices[1] + self.vertices[2]) / 3.0;
        self.bbox = triangle_bounds(self.vertices);
    }
}

impl Hittable for Triangle {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        if !self.bbox.hit(ray, ray_t) {
            return false;
        }

        let Some(tri_hit) = intersect_triangle(self.vertices, ray, ray_t) else {
            return false;
        };

        let [b0, b1, b2] = tri_hit.bary;
        rec.t = tri_hit.t;
        rec.p = b0 * self.vertices[0] + b1 * self.vertices[1] + b2 * self.vertices[2];
        let normal =
            (b0 * self.normals[0] + b1 * self.normals[1] + b2 * self.normals[2]).normalize();
        rec.set_face_normal(ray, normal);
        rec.material = self.material.as_ref();

        true
    }

    fn commit(&mut self) -> Result<(), CommitError> {
        self.refresh_cached();
        Ok(())
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn centroid(&self) -> Point3 {
        self.centroid
    }
}
