//! View frustums and picking rays.

use nalgebra::{Matrix4, Point3, Vector3};

use crate::{Aabb, Classification, Plane3D};

/// A view frustum bounded by six inward-facing planes.
///
/// Points inside the frustum are in front of every plane.
#[derive(Debug, Clone, PartialEq)]
pub struct Frustum {
    planes: [Plane3D; 6],
}

impl Frustum {
    /// Creates a frustum from six planes whose normals point inward.
    pub fn from_planes(planes: [Plane3D; 6]) -> Self {
        Self { planes }
    }

    /// Extracts the frustum of a combined view-projection matrix.
    ///
    /// Assumes OpenGL clip space, where visible points satisfy
    /// `-w <= x, y, z <= w`.
    ///
    /// # Panics
    /// Panics if the matrix is degenerate and yields a plane with a zero normal.
    pub fn from_view_projection(matrix: &Matrix4<f32>) -> Self {
        let row = |i: usize| matrix.row(i).transpose();
        let w = row(3);
        let plane = |coefficients: nalgebra::Vector4<f32>| {
            Plane3D::new(coefficients.xyz(), -coefficients.w)
        };

        Self {
            planes: [
                plane(w + row(0)), // left
                plane(w - row(0)), // right
                plane(w + row(1)), // bottom
                plane(w - row(1)), // top
                plane(w + row(2)), // near
                plane(w - row(2)), // far
            ],
        }
    }

    /// Returns the bounding planes: left, right, bottom, top, near, far.
    #[inline]
    pub fn planes(&self) -> &[Plane3D; 6] {
        &self.planes
    }

    /// Returns `true` unless the box is entirely behind one of the planes.
    ///
    /// This is conservative: a box near a frustum corner may be reported as
    /// intersecting even though it is outside.
    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.classify_aabb(aabb) != Classification::Back)
    }
}

/// A half-line used for picking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start of the ray.
    pub origin: Point3<f32>,
    /// Direction of travel. Need not be normalized; distances are measured
    /// in multiples of this vector.
    pub direction: Vector3<f32>,
}

impl Ray {
    /// Creates a ray from an origin and a direction.
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Self {
        Self { origin, direction }
    }

    /// Returns the point at parameter `t` along the ray.
    #[inline]
    pub fn at(&self, t: f32) -> Point3<f32> {
        self.origin + self.direction * t
    }

    /// Intersects the ray with a box using the slab method.
    ///
    /// Returns the parameter where the ray enters the box, `0.0` if the origin
    /// is already inside, or `None` if the box is missed or behind the ray.
    pub fn intersect_aabb(&self, aabb: &Aabb) -> Option<f32> {
        let mut t_min = 0.0_f32;
        let mut t_max = f32::INFINITY;

        for axis in 0..3 {
            let origin = self.origin[axis];
            let direction = self.direction[axis];
            let (lo, hi) = (aabb.min[axis], aabb.max[axis]);

            if direction.abs() < f32::EPSILON {
                // Parallel to this slab: must already be between its planes
                if origin < lo || origin > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / direction;
            let mut t0 = (lo - origin) * inv;
            let mut t1 = (hi - origin) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }

        Some(t_min)
    }
}
