//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! The tree is built over primitive indices rather than owned objects, so
//! one node type accelerates both the scene list (over boxed Hittables)
//! and a triangle mesh (over its face array) without duplicating geometry.

use crate::hittable::HitRecord;
use ember_math::{Aabb, Interval, Point3, Ray};
use std::cmp::Ordering;

/// A collection the BVH can be built over and traversed against.
///
/// Implementors expose their primitives by index; leaves of the tree store
/// those indices back into the implementor's storage.
pub trait PrimitiveSet: Send + Sync {
    fn primitive_count(&self) -> usize;

    /// Bounding box of one primitive. Valid once the owner is committed.
    fn primitive_bounding_box(&self, index: usize) -> Aabb;

    /// Centroid of one primitive, the BVH sort key.
    fn primitive_centroid(&self, index: usize) -> Point3;

    /// Intersect one primitive, filling `rec` on a hit.
    fn primitive_hit<'a>(
        &'a self,
        index: usize,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
    ) -> bool;
}

/// BVH node: a leaf holds one or two primitive indices, a branch holds two
/// child subtrees. Every node carries the box of everything below it.
pub enum BvhNode {
    Leaf {
        first: usize,
        second: Option<usize>,
        bbox: Aabb,
    },
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
}

struct BuildEntry {
    index: usize,
    centroid: Point3,
    bbox: Aabb,
}

impl BvhNode {
    /// Build a BVH over every primitive in `set`.
    ///
    /// Returns None for an empty set. Construction is a median split on
    /// the z component of the primitive centroids; ranges of one or two
    /// primitives become leaves.
    pub fn build(set: &dyn PrimitiveSet) -> Option<BvhNode> {
        let count = set.primitive_count();
        if count == 0 {
            return None;
        }

        let mut entries: Vec<BuildEntry> = (0..count)
            .map(|index| BuildEntry {
                index,
                centroid: set.primitive_centroid(index),
                bbox: set.primitive_bounding_box(index),
            })
            .collect();

        Some(Self::build_range(&mut entries))
    }

    fn build_range(entries: &mut [BuildEntry]) -> BvhNode {
        // sort the range along the split axis
        entries.sort_unstable_by(|a, b| {
            a.centroid
                .z
                .partial_cmp(&b.centroid.z)
                .unwrap_or(Ordering::Equal)
        });

        match entries {
            [only] => BvhNode::Leaf {
                first: only.index,
                second: None,
                bbox: only.bbox,
            },
            [a, b] => BvhNode::Leaf {
                first: a.index,
                second: Some(b.index),
                bbox: Aabb::surrounding(&a.bbox, &b.bbox),
            },
            _ => {
                let mid = entries.len() / 2;
                let (lower, upper) = entries.split_at_mut(mid);
                let left = Self::build_range(lower);
                let right = Self::build_range(upper);
                let bbox = Aabb::surrounding(&left.bounding_box(), &right.bounding_box());
                BvhNode::Branch {
                    left: Box::new(left),
                    right: Box::new(right),
                    bbox,
                }
            }
        }
    }

    pub fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Leaf { bbox, .. } => *bbox,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }

    /// Traverse the tree for the closest hit.
    ///
    /// A miss on the node's own box prunes the whole subtree. The left
    /// child is tested first; a left hit shrinks the interval before the
    /// right child runs, so a farther right-side hit can never overwrite a
    /// closer left-side one.
    pub fn hit<'a>(
        &self,
        set: &'a dyn PrimitiveSet,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
    ) -> bool {
        if !self.bounding_box().hit(ray, ray_t) {
            return false;
        }

        match self {
            BvhNode::Leaf { first, second, .. } => {
                let hit_first = set.primitive_hit(*first, ray, ray_t, rec);

                let second_max = if hit_first { rec.t } else { ray_t.max };
                let mut hit_anything = hit_first;
                if let Some(second) = second {
                    hit_anything |= set.primitive_hit(
                        *second,
                        ray,
                        Interval::new(ray_t.min, second_max),
                        rec,
                    );
                }
                hit_anything
            }
            BvhNode::Branch { left, right, .. } => {
                let hit_left = left.hit(set, ray, ray_t, rec);

                // only check right up to the closest hit so far
                let right_max = if hit_left { rec.t } else { ray_t.max };
                let hit_right = right.hit(set, ray, Interval::new(ray_t.min, right_max), rec);

                hit_left || hit_right
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;
    use crate::sphere::Sphere;
    use crate::{Color, Hittable};
    use ember_math::Vec3;
    use std::sync::Arc;

    struct SphereSet(Vec<Sphere>);

    impl PrimitiveSet for SphereSet {
        fn primitive_count(&self) -> usize {
            self.0.len()
        }
        fn primitive_bounding_box(&self, index: usize) -> Aabb {
            self.0[index].bounding_box()
        }
        fn primitive_centroid(&self, index: usize) -> Point3 {
            self.0[index].centroid()
        }
        fn primitive_hit<'a>(
            &'a self,
            index: usize,
            ray: &Ray,
            ray_t: Interval,
            rec: &mut HitRecord<'a>,
        ) -> bool {
            self.0[index].hit(ray, ray_t, rec)
        }
    }

    fn sphere_at(center: Point3, radius: f64) -> Sphere {
        Sphere::new(
            center,
            radius,
            Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5))),
        )
    }

    #[test]
    fn test_build_shapes() {
        let one = SphereSet(vec![sphere_at(Point3::ZERO, 1.0)]);
        assert!(matches!(
            BvhNode::build(&one),
            Some(BvhNode::Leaf { second: None, .. })
        ));

        let two = SphereSet(vec![
            sphere_at(Point3::ZERO, 1.0),
            sphere_at(Point3::new(0.0, 0.0, 5.0), 1.0),
        ]);
        assert!(matches!(
            BvhNode::build(&two),
            Some(BvhNode::Leaf {
                second: Some(_),
                ..
            })
        ));

        let five = SphereSet(
            (0..5)
                .map(|i| sphere_at(Point3::new(0.0, 0.0, i as f64 * 4.0), 1.0))
                .collect(),
        );
        assert!(matches!(
            BvhNode::build(&five),
            Some(BvhNode::Branch { .. })
        ));

        assert!(BvhNode::build(&SphereSet(Vec::new())).is_none());
    }

    #[test]
    fn test_node_box_contains_primitives() {
        let set = SphereSet(
            (0..9)
                .map(|i| sphere_at(Point3::new(i as f64, -(i as f64), i as f64 * 2.0), 0.5))
                .collect(),
        );
        let root = BvhNode::build(&set).unwrap();
        let bbox = root.bounding_box();

        for i in 0..set.primitive_count() {
            let prim = set.primitive_bounding_box(i);
            assert!(bbox.x.contains(prim.x.min) && bbox.x.contains(prim.x.max));
            assert!(bbox.y.contains(prim.y.min) && bbox.y.contains(prim.y.max));
            assert!(bbox.z.contains(prim.z.min) && bbox.z.contains(prim.z.max));
        }
    }

    #[test]
    fn test_bvh_matches_brute_force() {
        // deterministic pseudo-random sphere cloud
        let mut state = 0x2545F4914F6CDD1Du64;
        let mut next = move || {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state >> 11) as f64 / (1u64 << 53) as f64
        };

        let spheres: Vec<Sphere> = (0..64)
            .map(|_| {
                let center = Point3::new(
                    next() * 10.0 - 5.0,
                    next() * 10.0 - 5.0,
                    next() * 10.0 - 5.0,
                );
                sphere_at(center, 0.2 + next() * 0.8)
            })
            .collect();
        let set = SphereSet(spheres);
        let root = BvhNode::build(&set).unwrap();

        for _ in 0..128 {
            let origin = Point3::new(
                next() * 16.0 - 8.0,
                next() * 16.0 - 8.0,
                next() * 16.0 - 8.0,
            );
            let direction = Vec3::new(next() * 2.0 - 1.0, next() * 2.0 - 1.0, next() * 2.0 - 1.0);
            if direction.length_squared() < 1e-6 {
                continue;
            }
            let ray = Ray::new_simple(origin, direction);
            let ray_t = Interval::new(0.001, f64::INFINITY);

            // brute-force linear scan with shrinking t
            let mut brute = HitRecord::default();
            let mut brute_hit = false;
            let mut closest = ray_t.max;
            for i in 0..set.primitive_count() {
                if set.primitive_hit(i, &ray, Interval::new(ray_t.min, closest), &mut brute) {
                    brute_hit = true;
                    closest = brute.t;
                }
            }

            let mut accel = HitRecord::default();
            let accel_hit = root.hit(&set, &ray, ray_t, &mut accel);

            assert_eq!(brute_hit, accel_hit);
            if brute_hit {
                assert!((brute.t - accel.t).abs() < 1e-9);
            }
        }
    }
}
