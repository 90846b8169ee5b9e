//! Scene container: aggregates hittables and owns the top-level BVH.

use crate::bvh::{BvhNode, PrimitiveSet};
use crate::hittable::{CommitError, HitRecord, Hittable};
use ember_math::{Aabb, Interval, Point3, Ray};

/// A list of hittable objects.
///
/// The list exclusively owns its primitives. `commit` cascades into every
/// member first (nested meshes build their own BVHs before the outer tree
/// exists), then unions the member boxes and builds the top-level BVH.
/// Until that succeeds, the list answers no hit queries.
pub struct HittableList {
    objects: Vec<Box<dyn Hittable>>,
    bbox: Aabb,
    bvh: Option<BvhNode>,
}

impl HittableList {
    /// Create a new empty hittable list.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            bbox: Aabb::EMPTY,
            bvh: None,
        }
    }

    /// Add an object to the list. Invalidates any previous commit.
    pub fn add(&mut self, object: Box<dyn Hittable>) {
        self.bvh = None;
        self.objects.push(object);
    }

    /// Clear all objects from the list.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.bbox = Aabb::EMPTY;
        self.bvh = None;
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Default for HittableList {
    fn default() -> Self {
        Self::new()
    }
}

impl PrimitiveSet for HittableList {
    fn primitive_count(&self) -> usize {
        self.objects.len()
    }

    fn primitive_bounding_box(&self, index: usize) -> Aabb {
        self.objects[index].bounding_box()
    }

    fn primitive_centroid(&self, index: usize) -> Point3 {
        self.objects[index].centroid()
    }

    fn primitive_hit<'a>(
        &'a self,
        index: usize,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
    ) -> bool {
        self.objects[index].hit(ray, ray_t, rec)
    }
}

impl Hittable for HittableList {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        if !self.bbox.hit(ray, ray_t) {
            return false;
        }

        // an uncommitted list answers no queries
        match &self.bvh {
            Some(node) => node.hit(self, ray, ray_t, rec),
            None => false,
        }
    }

    fn commit(&mut self) -> Result<(), CommitError> {
        self.bvh = None;

        if self.objects.is_empty() {
            return Err(CommitError::EmptyScene);
        }

        for object in &mut self.objects {
            object.commit()?;
        }

        let mut bbox = self.objects[0].bounding_box();
        for object in &self.objects[1..] {
            bbox = Aabb::surrounding(&bbox, &object.bounding_box());
        }
        self.bbox = bbox;

        self.bvh = BvhNode::build(self);
        log::debug!("scene committed: {} objects", self.objects.len());
        Ok(())
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn centroid(&self) -> Point3 {
        self.bbox.centroid()
    }
}
