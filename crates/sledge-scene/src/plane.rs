//! Planes and box side tests for frustum culling.

use nalgebra::{Point3, Vector3};

use crate::Aabb;

/// Default epsilon for plane classification.
/// Points within this distance of the plane are considered "on" the plane.
pub const PLANE_EPSILON: f32 = 1e-5;

/// Classification of a box relative to a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Every corner is in front of the plane
    Front,
    /// Every corner is behind the plane
    Back,
    /// Corners are on both sides (or touching)
    Spanning,
}

/// A plane in 3D space, represented as `normal · point = offset`.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane3D {
    normal: Vector3<f32>,
    offset: f32,
}

impl Plane3D {
    /// Creates a new plane from a normal vector and offset.
    /// The normal will be normalized automatically, scaling the offset with it.
    ///
    /// # Panics
    /// Panics if the normal vector has zero length.
    pub fn new(normal: Vector3<f32>, offset: f32) -> Self {
        let norm = normal.norm();
        assert!(norm > f32::EPSILON, "Plane normal cannot be zero");
        Self {
            normal: normal / norm,
            offset: offset / norm,
        }
    }

    /// Returns the unit normal vector of the plane.
    #[inline]
    pub fn normal(&self) -> Vector3<f32> {
        self.normal
    }

    /// Returns the signed distance from the origin to the plane along the normal.
    #[inline]
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Computes the signed distance from a point to the plane.
    /// Positive in front, negative behind.
    #[inline]
    pub fn signed_distance(&self, point: Point3<f32>) -> f32 {
        self.normal.dot(&point.coords) - self.offset
    }

    /// Classifies a box relative to the plane.
    ///
    /// Only the two corners extreme along the normal are tested: the one
    /// furthest in front and the one furthest behind.
    pub fn classify_aabb(&self, aabb: &Aabb) -> Classification {
        let mut positive = aabb.min;
        let mut negative = aabb.max;
        for axis in 0..3 {
            if self.normal[axis] >= 0.0 {
                positive[axis] = aabb.max[axis];
                negative[axis] = aabb.min[axis];
            }
        }

        if self.signed_distance(positive) < -PLANE_EPSILON {
            Classification::Back
        } else if self.signed_distance(negative) > PLANE_EPSILON {
            Classification::Front
        } else {
            Classification::Spanning
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor() -> Plane3D {
        Plane3D::new(Vector3::new(0.0, 0.0, 2.0), 0.0)
    }

    #[test]
    fn new_normalizes_normal_and_offset() {
        let plane = Plane3D::new(Vector3::new(0.0, 0.0, 2.0), 4.0);
        assert_eq!(plane.normal(), Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(plane.offset(), 2.0);
    }

    #[test]
    fn classify_aabb_sides() {
        let plane = floor();
        let above = Aabb::new(Point3::new(0.0, 0.0, 1.0), Point3::new(1.0, 1.0, 2.0));
        let below = Aabb::new(Point3::new(0.0, 0.0, -2.0), Point3::new(1.0, 1.0, -1.0));
        let across = Aabb::new(Point3::new(0.0, 0.0, -1.0), Point3::new(1.0, 1.0, 1.0));

        assert_eq!(plane.classify_aabb(&above), Classification::Front);
        assert_eq!(plane.classify_aabb(&below), Classification::Back);
        assert_eq!(plane.classify_aabb(&across), Classification::Spanning);
    }

    #[test]
    fn classify_aabb_touching_is_spanning() {
        let plane = floor();
        let touching = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        assert_eq!(plane.classify_aabb(&touching), Classification::Spanning);
    }
}
