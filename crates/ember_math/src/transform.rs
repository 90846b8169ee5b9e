use crate::{Point3, Vec3};

/// A single affine operation in a transform chain.
///
/// Rotation angles are in radians and apply in X → Y → Z order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    Translation(Vec3),
    Scale(Vec3),
    Rotation(Vec3),
}

impl Transform {
    /// Apply to a point in space.
    pub fn apply_point(&self, p: Point3) -> Point3 {
        match self {
            Transform::Translation(offset) => p + *offset,
            Transform::Scale(factors) => p * *factors,
            Transform::Rotation(angles) => {
                rotate_z(rotate_y(rotate_x(p, angles.x), angles.y), angles.z)
            }
        }
    }

    /// Apply to a direction vector. Translation does not move directions.
    pub fn apply_direction(&self, v: Vec3) -> Vec3 {
        match self {
            Transform::Translation(_) => v,
            _ => self.apply_point(v),
        }
    }
}

#[inline]
fn rotate_x(v: Vec3, theta: f64) -> Vec3 {
    let (s, c) = theta.sin_cos();
    Vec3::new(v.x, c * v.y - s * v.z, s * v.y + c * v.z)
}

#[inline]
fn rotate_y(v: Vec3, theta: f64) -> Vec3 {
    let (s, c) = theta.sin_cos();
    Vec3::new(c * v.x + s * v.z, v.y, -s * v.x + c * v.z)
}

#[inline]
fn rotate_z(v: Vec3, theta: f64) -> Vec3 {
    let (s, c) = theta.sin_cos();
    Vec3::new(c * v.x - s * v.y, s * v.x + c * v.y, v.z)
}

/// An ordered sequence of transforms, replayed at query time rather than
/// baked into stored geometry. Push and pop are O(1) and order-sensitive.
#[derive(Debug, Clone, Default)]
pub struct TransformChain {
    ops: Vec<Transform>,
}

impl TransformChain {
    pub fn new() -> Self {
        Self { ops: Vec::new() }
    }

    pub fn push(&mut self, transform: Transform) {
        self.ops.push(transform);
    }

    pub fn pop(&mut self) -> Option<Transform> {
        self.ops.pop()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Replay the chain over a point.
    pub fn point(&self, p: Point3) -> Point3 {
        self.ops.iter().fold(p, |acc, t| t.apply_point(acc))
    }

    /// Replay the chain over a direction (normals, edges).
    pub fn direction(&self, v: Vec3) -> Vec3 {
        self.ops.iter().fold(v, |acc, t| t.apply_direction(acc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_translation() {
        let t = Transform::Translation(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.apply_point(Point3::ZERO), Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_scale() {
        let t = Transform::Scale(Vec3::new(2.0, 3.0, 4.0));
        assert_eq!(
            t.apply_point(Point3::new(1.0, 1.0, 1.0)),
            Point3::new(2.0, 3.0, 4.0)
        );
    }

    #[test]
    fn test_rotation_quarter_turn() {
        // 90 degrees around Z maps +X to +Y
        let t = Transform::Rotation(Vec3::new(0.0, 0.0, FRAC_PI_2));
        let rotated = t.apply_point(Point3::X);

        assert!((rotated - Point3::Y).length() < 1e-12);
    }

    #[test]
    fn test_rotation_axis_order() {
        // X rotation first: +Y -> +Z, then Y rotation: +Z -> +X
        let t = Transform::Rotation(Vec3::new(FRAC_PI_2, FRAC_PI_2, 0.0));
        let rotated = t.apply_point(Point3::Y);

        assert!((rotated - Point3::X).length() < 1e-12);
    }

    #[test]
    fn test_chain_order_sensitive() {
        let mut scale_then_move = TransformChain::new();
        scale_then_move.push(Transform::Scale(Vec3::splat(2.0)));
        scale_then_move.push(Transform::Translation(Vec3::X));

        let mut move_then_scale = TransformChain::new();
        move_then_scale.push(Transform::Translation(Vec3::X));
        move_then_scale.push(Transform::Scale(Vec3::splat(2.0)));

        let p = Point3::new(1.0, 0.0, 0.0);
        assert_eq!(scale_then_move.point(p), Point3::new(3.0, 0.0, 0.0));
        assert_eq!(move_then_scale.point(p), Point3::new(4.0, 0.0, 0.0));
    }

    #[test]
    fn test_chain_direction_skips_translation() {
        let mut chain = TransformChain::new();
        chain.push(Transform::Translation(Vec3::new(10.0, 20.0, 30.0)));
        chain.push(Transform::Scale(Vec3::splat(2.0)));

        assert_eq!(chain.direction(Vec3::X), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(chain.point(Point3::ZERO), Point3::new(20.0, 40.0, 60.0));
    }

    #[test]
    fn test_chain_pop_restores() {
        let mut chain = TransformChain::new();
        chain.push(Transform::Translation(Vec3::X));
        chain.push(Transform::Translation(Vec3::Y));

        assert_eq!(chain.pop(), Some(Transform::Translation(Vec3::Y)));
        assert_eq!(chain.point(Point3::ZERO), Point3::X);

        chain.pop();
        assert!(chain.is_empty());
        assert_eq!(chain.pop(), None);
    }
}
