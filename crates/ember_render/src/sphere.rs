//! Sphere primitives: static (with a transform chain) and linearly moving.

use crate::hittable::{CommitError, HitRecord, Hittable};
use crate::Material;
use ember_math::{Aabb, Interval, Point3, Ray, Transform, TransformChain, Vec3};
use std::sync::Arc;

/// A sphere primitive.
///
/// The center is stored untransformed; the transform chain is replayed at
/// every query, so pushed transforms take effect after the next commit
/// refreshes the bounding box.
#[derive(Clone)]
pub struct Sphere {
    center: Point3,
    radius: f64,
    material: Arc<dyn Material>,
    transforms: TransformChain,
    bbox: Aabb,
}

impl Sphere {
    pub fn new(center: Point3, radius: f64, material: Arc<dyn Material>) -> Self {
        let mut sphere = Self {
            center,
            radius: radius.max(0.0),
            material,
            transforms: TransformChain::new(),
            bbox: Aabb::EMPTY,
        };
        sphere.update_bounding_box();
        sphere
    }

    pub fn push_transform(&mut self, transform: Transform) {
        self.transforms.push(transform);
    }

    pub fn pop_transform(&mut self) -> Option<Transform> {
        self.transforms.pop()
    }

    fn update_bounding_box(&mut self) {
        let center = self.transforms.point(self.center);
        let rvec = Vec3::splat(self.radius);
        self.bbox = Aabb::from_points(center - rvec, center + rvec);
    }
}

impl Hittable for Sphere {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        if !self.bbox.hit(ray, ray_t) {
            return false;
        }

        let center = self.transforms.point(self.center);
        let oc = center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return false;
        }

        let sqrtd = discriminant.sqrt();

        // find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return false;
            }
        }

        rec.t = root;
        rec.p = ray.at(rec.t);
        let outward_normal = (rec.p - center) / self.radius;
        rec.set_face_normal(ray, outward_normal);
        rec.material = self.material.as_ref();

        true
    }

    fn commit(&mut self) -> Result<(), CommitError> {
        self.update_bounding_box();
        Ok(())
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn centroid(&self) -> Point3 {
        self.transforms.point(self.center)
    }
}

/// A sphere whose center moves linearly between two points over a time
/// interval, sampled by each ray's time stamp (motion blur).
#[derive(Clone)]
pub struct MovingSphere {
    center0: Point3,
    center1: Point3,
    time0: f64,
    time1: f64,
    radius: f64,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl MovingSphere {
    /// `time1` must be greater than `time0`.
    pub fn new(
        center0: Point3,
        center1: Point3,
        time0: f64,
        time1: f64,
        radius: f64,
        material: Arc<dyn Material>,
    ) -> Self {
        let mut sphere = Self {
            center0,
            center1,
            time0,
            time1,
            radius: radius.max(0.0),
            material,
            bbox: Aabb::EMPTY,
        };
        sphere.update_bounding_box();
        sphere
    }

    /// Center position at the given time, lerped between the endpoints.
    fn center(&self, time: f64) -> Point3 {
        self.center0
            + ((time - self.time0) / (self.time1 - self.time0)) * (self.center1 - self.center0)
    }

    fn update_bounding_box(&mut self) {
        // the path is a straight line, so the endpoint boxes bound it
        let rvec = Vec3::splat(self.radius);
        let box0 = Aabb::from_points(self.center0 - rvec, self.center0 + rvec);
        let box1 = Aabb::from_points(self.center1 - rvec, self.center1 + rvec);
        self.bbox = Aabb::surrounding(&box0, &box1);
    }
}

impl Hittable for MovingSphere {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        if !self.bbox.hit(ray, ray_t) {
            return false;
        }

        let center = self.center(ray.time());
        let oc = center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return false;
        }

        let sqrtd = discriminant.sqrt();

        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return false;
            }
        }

        rec.t = root;
        rec.p = ray.at(rec.t);
        let outward_normal = (rec.p - center) / self.radius;
        rec.set_face_normal(ray, outward_normal);
        rec.material = self.material.as_ref();

        true
    }

    fn commit(&mut self) -> Result<(), CommitError> {
        self.update_bounding_box();
        Ok(())
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn centroid(&self) -> Point3 {
        (self.center0 + self.center1) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{Color, Lambertian};

    fn gray() -> Arc<dyn Material> {
        Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5)))
    }

    #[test]
    fn test_sphere_hit() {
        let sphere = Sphere::new(Point3::new(0.0, 0.0, -1.0), 0.5, gray());

        let ray = Ray::new_simple(Point3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();

        assert!(sphere.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec));
        assert!((rec.t - 0.5).abs() < 1e-9);
        assert!(rec.front_face);
        assert!((rec.normal - Vec3::Z).length() < 1e-9);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Point3::new(0.0, 0.0, -1.0), 0.5, gray());

        // ray pointing away from the sphere
        let ray = Ray::new_simple(Point3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        let mut rec = HitRecord::default();

        assert!(!sphere.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec));
    }

    #[test]
    fn test_sphere_inside_hit_is_back_face() {
        let sphere = Sphere::new(Point3::ZERO, 2.0, gray());

        let ray = Ray::new_simple(Point3::ZERO, Vec3::X);
        let mut rec = HitRecord::default();

        assert!(sphere.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec));
        assert!((rec.t - 2.0).abs() < 1e-9);
        assert!(!rec.front_face);
    }

    #[test]
    fn test_sphere_transform_replayed_after_commit() {
        let mut sphere = Sphere::new(Point3::new(0.0, 0.0, -1.0), 0.5, gray());
        sphere.push_transform(Transform::Translation(Vec3::new(2.0, 0.0, 0.0)));
        sphere.commit().unwrap();

        // original position no longer hit
        let ray = Ray::new_simple(Point3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();
        assert!(!sphere.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec));

        // translated position is
        let ray = Ray::new_simple(Point3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();
        assert!(sphere.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec));
        assert_eq!(sphere.centroid(), Point3::new(2.0, 0.0, -1.0));

        // popping restores the original geometry on the next commit
        sphere.pop_transform();
        sphere.commit().unwrap();
        let ray = Ray::new_simple(Point3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();
        assert!(sphere.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec));
    }

    #[test]
    fn test_moving_sphere_follows_ray_time() {
        let sphere = MovingSphere::new(
            Point3::new(-2.0, 0.0, -5.0),
            Point3::new(2.0, 0.0, -5.0),
            0.0,
            1.0,
            0.5,
            gray(),
        );

        let mut rec = HitRecord::default();

        // at time 0 the sphere sits at x = -2
        let ray = Ray::new(Point3::new(-2.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0), 0.0);
        assert!(sphere.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec));

        let ray = Ray::new(Point3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0), 0.0);
        assert!(!sphere.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec));

        // at time 1 it has moved to x = 2
        let ray = Ray::new(Point3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0), 1.0);
        assert!(sphere.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec));
    }

    #[test]
    fn test_moving_sphere_box_covers_both_endpoints() {
        let sphere = MovingSphere::new(
            Point3::new(-2.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            0.0,
            1.0,
            0.5,
            gray(),
        );

        let bbox = sphere.bounding_box();
        assert_eq!(bbox.x.min, -2.5);
        assert_eq!(bbox.x.max, 2.5);
        assert_eq!(sphere.centroid(), Point3::ZERO);
    }
}
