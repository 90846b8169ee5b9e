//! Hittable trait and HitRecord for ray-object intersection.

use crate::{Material, Ray, ScatterResult};
use ember_math::{Aabb, Interval, Point3, Vec3};
use rand::RngCore;
use thiserror::Error;

/// Failure modes of the commit lifecycle step.
///
/// Errors propagate through nested commits with `?`, so a failing member
/// fails its parent before the parent touches its own BVH.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommitError {
    #[error("scene list contains no objects")]
    EmptyScene,
    #[error("triangle mesh contains no faces")]
    EmptyMesh,
}

/// A dummy material used for HitRecord::default().
/// Always absorbs light (returns None from scatter).
struct DummyMaterial;

impl Material for DummyMaterial {
    fn scatter(
        &self,
        _ray_in: &Ray,
        _rec: &HitRecord,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        None
    }
}

/// Static dummy material instance for Default impl.
static DUMMY_MATERIAL: DummyMaterial = DummyMaterial;

/// Record of a ray-object intersection.
///
/// Mutated in place during traversal: callers shrink the valid t range as
/// closer hits are found, so a later sibling subtree can never report a
/// farther hit.
#[derive(Clone)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Point3,
    /// Shading normal at the intersection (always points against the ray)
    pub normal: Vec3,
    /// Material at the intersection point
    pub material: &'a dyn Material,
    /// Parameter t where the intersection occurs
    pub t: f64,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
}

impl Default for HitRecord<'_> {
    fn default() -> Self {
        Self {
            p: Point3::ZERO,
            normal: Vec3::ZERO,
            material: &DUMMY_MATERIAL,
            t: f64::INFINITY,
            front_face: false,
        }
    }
}

impl HitRecord<'_> {
    /// Set the face normal based on ray direction and outward normal.
    ///
    /// The normal is stored pointing against the ray; `front_face` records
    /// which side the ray arrived from.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        self.front_face = ray.direction().dot(outward_normal) < 0.0;

        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Geometry the renderer can query.
///
/// `commit` must succeed before the first `hit`; it finalizes the bounding
/// box and, for composites, builds the BVH. Committing again rebuilds the
/// same state deterministically. `bounding_box` and `centroid` are only
/// meaningful after a successful commit. A committed value is never
/// mutated during rendering and is safe to share across worker threads.
pub trait Hittable: Send + Sync {
    /// Test if a ray hits this object within the given interval.
    ///
    /// Returns true if hit, and fills in the hit record.
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool;

    /// Finalize bounding data and acceleration structures.
    fn commit(&mut self) -> Result<(), CommitError>;

    /// Get the axis-aligned bounding box of this object.
    fn bounding_box(&self) -> Aabb;

    /// Center point used as the BVH sort key.
    fn centroid(&self) -> Point3;
}
