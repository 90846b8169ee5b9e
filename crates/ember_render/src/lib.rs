//! ember render core — CPU path tracing.
//!
//! A Monte Carlo path tracer: hittable geometry behind a commit lifecycle,
//! BVH-accelerated intersection, scattering materials, and a multithreaded
//! integrator writing a lock-free frame buffer.

mod bvh;
mod camera;
mod hittable;
mod material;
mod renderer;
mod sampling;
mod scene;
mod sphere;
mod triangle;
mod triangle_mesh;

pub use bvh::{BvhNode, PrimitiveSet};
pub use camera::Camera;
pub use hittable::{CommitError, HitRecord, Hittable};
pub use material::{Color, Dielectric, Glossy, Lambertian, Material, Metal, ScatterResult};
pub use renderer::{ray_color, render_scene, FrameBuffer, RenderConfig};
pub use sampling::{gen_f64, gen_range, random_in_unit_disk, random_in_unit_sphere, random_unit_vector};
pub use scene::HittableList;
pub use sphere::{MovingSphere, Sphere};
pub use triangle::{Triangle, Winding};
pub use triangle_mesh::TriangleMesh;

/// Re-export the math types used throughout the public API.
pub use ember_math::{Aabb, Interval, Point3, Ray, Transform, TransformChain, Vec3};
