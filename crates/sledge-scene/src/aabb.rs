//! Axis-aligned bounding boxes in render space.

use nalgebra::{Point3, Vector3};

/// An axis-aligned box described by its minimum and maximum corners.
///
/// Boxes are closed: two boxes that share a face intersect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Corner with the smallest coordinates.
    pub min: Point3<f32>,
    /// Corner with the largest coordinates.
    pub max: Point3<f32>,
}

impl Aabb {
    /// Creates a box from two corners. The corners may be given in any order.
    pub fn new(a: Point3<f32>, b: Point3<f32>) -> Self {
        Self {
            min: a.inf(&b),
            max: a.sup(&b),
        }
    }

    /// Creates a cube centred on `center` with the given half extent.
    pub fn from_center(center: Point3<f32>, half_extent: f32) -> Self {
        let half = Vector3::repeat(half_extent);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Returns the smallest box containing every point, or `None` for no points.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3<f32>>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = *points.next()?;
        Some(points.fold(Self { min: first, max: first }, |aabb, p| Self {
            min: aabb.min.inf(p),
            max: aabb.max.sup(p),
        }))
    }

    /// Returns the smallest box containing both boxes.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// Returns `true` if the boxes overlap or touch.
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        self.max.x >= other.min.x
            && self.min.x <= other.max.x
            && self.max.y >= other.min.y
            && self.min.y <= other.max.y
            && self.max.z >= other.min.z
            && self.min.z <= other.max.z
    }

    /// Returns the centre of the box.
    #[inline]
    pub fn center(&self) -> Point3<f32> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Returns the edge lengths of the box.
    #[inline]
    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }

    /// Returns one of the eight sub-boxes obtained by halving every axis.
    ///
    /// Bit 0 of `index` selects the upper half along X, bit 1 along Y and
    /// bit 2 along Z.
    pub fn octant(&self, index: usize) -> Self {
        debug_assert!(index < 8, "octant index out of range");
        let center = self.center();
        let mut min = self.min;
        let mut max = center;
        for axis in 0..3 {
            if index & (1 << axis) != 0 {
                min[axis] = center[axis];
                max[axis] = self.max[axis];
            }
        }
        Self { min, max }
    }

    /// Returns the eight corners of the box, ordered like [`Aabb::octant`].
    pub fn corners(&self) -> [Point3<f32>; 8] {
        std::array::from_fn(|index| {
            let mut corner = self.min;
            for axis in 0..3 {
                if index & (1 << axis) != 0 {
                    corner[axis] = self.max[axis];
                }
            }
            corner
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_box(min: [f32; 3], max: [f32; 3]) -> Aabb {
        Aabb::new(
            Point3::new(min[0], min[1], min[2]),
            Point3::new(max[0], max[1], max[2]),
        )
    }

    #[test]
    fn new_orders_corners() {
        let aabb = make_box([1.0, -1.0, 3.0], [-1.0, 1.0, 0.0]);
        assert_eq!(aabb.min, Point3::new(-1.0, -1.0, 0.0));
        assert_eq!(aabb.max, Point3::new(1.0, 1.0, 3.0));
    }

    #[test]
    fn from_points_empty_is_none() {
        let points: Vec<Point3<f32>> = vec![];
        assert!(Aabb::from_points(&points).is_none());
    }

    #[test]
    fn from_points_covers_all() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, -1.0, 0.5),
            Point3::new(1.0, 3.0, -4.0),
        ];
        let aabb = Aabb::from_points(&points).unwrap();
        assert_eq!(aabb, make_box([0.0, -1.0, -4.0], [2.0, 3.0, 0.5]));
    }

    #[test]
    fn touching_boxes_intersect() {
        let a = make_box([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
        let b = make_box([1.0, 0.0, 0.0], [2.0, 1.0, 1.0]);
        let c = make_box([1.5, 0.0, 0.0], [2.0, 1.0, 1.0]);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn octants_tile_the_box() {
        let aabb = make_box([0.0, 0.0, 0.0], [2.0, 2.0, 2.0]);
        assert_eq!(aabb.octant(0), make_box([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]));
        assert_eq!(aabb.octant(7), make_box([1.0, 1.0, 1.0], [2.0, 2.0, 2.0]));
        assert_eq!(aabb.octant(5), make_box([1.0, 0.0, 1.0], [2.0, 1.0, 2.0]));

        let merged = (1..8).fold(aabb.octant(0), |acc, i| acc.union(&aabb.octant(i)));
        assert_eq!(merged, aabb);
    }

    #[test]
    fn corners_match_octant_order() {
        let aabb = make_box([0.0, 0.0, 0.0], [1.0, 2.0, 3.0]);
        let corners = aabb.corners();
        assert_eq!(corners[0], aabb.min);
        assert_eq!(corners[7], aabb.max);
        assert_eq!(corners[2], Point3::new(0.0, 2.0, 0.0));
    }
}
