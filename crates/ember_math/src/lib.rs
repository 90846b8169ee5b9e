// Re-export glam for convenience
pub use glam::*;

/// Double-precision 3-vector used for everything in the workspace.
///
/// `Point3` is a semantic alias, not a distinct type.
pub type Vec3 = glam::DVec3;
pub type Point3 = Vec3;

mod ray;
pub use ray::Ray;

mod interval;
pub use interval::Interval;

mod aabb;
pub use aabb::Aabb;

mod transform;
pub use transform::{Transform, TransformChain};
