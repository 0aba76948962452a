//! Octree container: batch insert/remove and region queries.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

use nalgebra::Point3;

use crate::{Aabb, Frustum, Ray};

use super::node::OctreeNode;
use super::split::{MaxItems, SplitPolicy};
use super::visitor::OctreeVisitor;

/// Half extent of the default octree root, matching the largest map size the
/// editor supports.
pub const WORLD_HALF_EXTENT: f32 = 16384.0;

/// Something the octree can index: a stable identity plus a bounding box.
pub trait Spatial {
    /// Identity used for membership. Two objects with the same id are the
    /// same object as far as the octree is concerned.
    type Id: Copy + Eq + Hash + Debug;

    fn id(&self) -> Self::Id;

    /// Bounds in render space. Read once when the object is added.
    fn bounds(&self) -> Aabb;
}

/// A query region.
pub trait Volume {
    /// Returns `true` if the region may overlap the box.
    fn intersects_aabb(&self, aabb: &Aabb) -> bool;
}

impl Volume for Aabb {
    fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        self.intersects(aabb)
    }
}

impl Volume for Frustum {
    fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        Frustum::intersects_aabb(self, aabb)
    }
}

/// A loose octree over objects with bounding boxes.
///
/// Objects are stored once by id; leaves reference ids. Objects whose
/// bounds fall entirely outside the root region are kept in an overflow list
/// so that they are still counted and still returned by queries.
///
/// # Example
///
/// ```ignore
/// use sledge_scene::Octree;
///
/// let mut octree = Octree::new();
/// octree.add(objects.iter().cloned());
/// assert_eq!(octree.count(), objects.len());
///
/// let visible = octree.query(&frustum);
///
/// octree.remove(&objects);
/// assert_eq!(octree.count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct Octree<T: Spatial, S = MaxItems> {
    root: OctreeNode<T::Id>,
    objects: HashMap<T::Id, T>,
    overflow: Vec<T::Id>,
    policy: S,
}

impl<T: Spatial> Octree<T> {
    /// Creates an empty octree covering the default world bounds.
    pub fn new() -> Self {
        Self::with_bounds(Aabb::from_center(Point3::origin(), WORLD_HALF_EXTENT))
    }

    /// Creates an empty octree covering `bounds` with the default split policy.
    pub fn with_bounds(bounds: Aabb) -> Self {
        Self::with_policy(bounds, MaxItems::default())
    }
}

impl<T: Spatial> Default for Octree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Spatial, S: SplitPolicy> Octree<T, S> {
    /// Creates an empty octree with a custom split policy.
    pub fn with_policy(bounds: Aabb, policy: S) -> Self {
        Self {
            root: OctreeNode::new(bounds, 0),
            objects: HashMap::new(),
            overflow: Vec::new(),
            policy,
        }
    }

    /// Returns the number of distinct objects indexed.
    #[inline]
    pub fn count(&self) -> usize {
        self.objects.len()
    }

    /// Returns `true` if the octree holds no objects.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Returns the root region.
    #[inline]
    pub fn bounds(&self) -> &Aabb {
        self.root.bounds()
    }

    /// Returns the root node.
    #[inline]
    pub fn root(&self) -> &OctreeNode<T::Id> {
        &self.root
    }

    /// Returns the ids of objects lying outside the root region.
    #[inline]
    pub fn overflow(&self) -> &[T::Id] {
        &self.overflow
    }

    /// Returns the maximum depth of the tree (1 for an unsplit root).
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Returns the number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    pub fn contains(&self, id: &T::Id) -> bool {
        self.objects.contains_key(id)
    }

    pub fn get(&self, id: &T::Id) -> Option<&T> {
        self.objects.get(id)
    }

    /// Iterates over all indexed objects in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.objects.values()
    }

    /// Adds a batch of objects.
    ///
    /// Objects whose id is already indexed are skipped, keeping the stored
    /// copy. Returns the number of objects actually added.
    pub fn add<I>(&mut self, objects: I) -> usize
    where
        I: IntoIterator<Item = T>,
    {
        let mut added = 0;
        for object in objects {
            let id = object.id();
            if self.objects.contains_key(&id) {
                continue;
            }

            let bounds = object.bounds();
            self.objects.insert(id, object);
            added += 1;

            if self.root.bounds().intersects(&bounds) {
                let objects = &self.objects;
                let lookup = |k: &T::Id| objects.get(k).map(Spatial::bounds);
                self.root.insert(id, &bounds, &self.policy, &lookup);
            } else {
                self.overflow.push(id);
            }
        }

        log::trace!("octree: added {} objects, {} indexed", added, self.count());
        added
    }

    /// Removes a batch of objects by identity. Objects that are not indexed
    /// are ignored. Returns the number of objects actually removed.
    pub fn remove<'a, I>(&mut self, objects: I) -> usize
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        self.remove_ids(objects.into_iter().map(Spatial::id))
    }

    /// Removes a batch of objects by id. Returns the number actually removed.
    pub fn remove_ids<I>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = T::Id>,
    {
        let mut removed = 0;
        for id in ids {
            let Some(object) = self.objects.remove(&id) else {
                continue;
            };
            removed += 1;

            let bounds = object.bounds();
            if self.root.bounds().intersects(&bounds) {
                self.root.remove(&id, &bounds);
            } else {
                self.overflow.retain(|k| *k != id);
            }
        }

        log::trace!("octree: removed {} objects, {} indexed", removed, self.count());
        removed
    }

    /// Removes every object, keeping the root region and policy.
    pub fn clear(&mut self) {
        let bounds = *self.root.bounds();
        self.root = OctreeNode::new(bounds, 0);
        self.objects.clear();
        self.overflow.clear();
    }

    /// Returns every object whose bounds intersect the volume.
    ///
    /// Each object is returned once, in depth-first octant order followed by
    /// overflow objects.
    pub fn query<V: Volume>(&self, volume: &V) -> Vec<&T> {
        self.collect(|region| volume.intersects_aabb(region))
    }

    /// Returns every object whose bounds intersect the box.
    pub fn query_aabb(&self, aabb: &Aabb) -> Vec<&T> {
        self.query(aabb)
    }

    /// Returns every object whose bounds may be inside the frustum.
    pub fn query_frustum(&self, frustum: &Frustum) -> Vec<&T> {
        self.query(frustum)
    }

    /// Returns the objects whose bounds the ray hits, nearest first, with
    /// the ray parameter of each hit.
    pub fn query_ray(&self, ray: &Ray) -> Vec<(f32, &T)> {
        let mut hits: Vec<(f32, &T)> = self
            .collect(|region| ray.intersect_aabb(region).is_some())
            .into_iter()
            .filter_map(|object| {
                ray.intersect_aabb(&object.bounds())
                    .map(|t| (t, object))
            })
            .collect();
        hits.sort_by(|a, b| a.0.total_cmp(&b.0));
        hits
    }

    /// Walks every non-empty leaf with a visitor. Overflow objects are not
    /// part of any leaf and are not visited.
    pub fn traverse<V: OctreeVisitor<T::Id>>(&self, visitor: &mut V) {
        self.root.traverse(visitor);
    }

    fn collect<H>(&self, hit: H) -> Vec<&T>
    where
        H: Fn(&Aabb) -> bool,
    {
        let mut seen = HashSet::new();
        let mut ids = Vec::new();
        self.root.collect(&hit, &mut seen, &mut ids);
        ids.extend(self.overflow.iter().copied());

        ids.iter()
            .filter_map(|id| self.objects.get(id))
            .filter(|object| hit(&object.bounds()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::octree::visitor::CollectingVisitor;
    use nalgebra::Vector3;

    #[derive(Debug, Clone, PartialEq)]
    struct Cube {
        id: u32,
        bounds: Aabb,
    }

    impl Spatial for Cube {
        type Id = u32;

        fn id(&self) -> u32 {
            self.id
        }

        fn bounds(&self) -> Aabb {
            self.bounds
        }
    }

    fn make_cube(id: u32, center: [f32; 3], half: f32) -> Cube {
        Cube {
            id,
            bounds: Aabb::from_center(Point3::new(center[0], center[1], center[2]), half),
        }
    }

    /// A 10x10x10 lattice of small cubes inside [0, 100]^3.
    fn lattice() -> Vec<Cube> {
        let mut cubes = Vec::new();
        for x in 0..10 {
            for y in 0..10 {
                for z in 0..10 {
                    let id = (x * 100 + y * 10 + z) as u32;
                    let center = [x as f32 * 10.0 + 5.0, y as f32 * 10.0 + 5.0, z as f32 * 10.0 + 5.0];
                    cubes.push(make_cube(id, center, 2.0));
                }
            }
        }
        cubes
    }

    fn small_world() -> Aabb {
        Aabb::new(Point3::origin(), Point3::new(128.0, 128.0, 128.0))
    }

    #[test]
    fn empty_octree() {
        let octree: Octree<Cube> = Octree::new();
        assert!(octree.is_empty());
        assert_eq!(octree.count(), 0);
        assert_eq!(octree.depth(), 1);
    }

    #[test]
    fn add_then_remove_round_trip() {
        let cubes = lattice();
        let mut octree = Octree::new();

        assert_eq!(octree.count(), 0);
        octree.add(cubes.iter().cloned());
        assert_eq!(octree.count(), cubes.len());
        octree.remove(&cubes);
        assert_eq!(octree.count(), 0);
        assert_eq!(octree.root().reference_count(), 0);
        assert!(octree.root().is_leaf());
    }

    #[test]
    fn duplicate_add_is_noop() {
        let cubes = lattice();
        let mut octree = Octree::with_bounds(small_world());

        assert_eq!(octree.add(cubes.iter().cloned()), 1000);
        assert_eq!(octree.add(cubes.iter().cloned()), 0);
        assert_eq!(octree.count(), 1000);
        assert_eq!(octree.root().distinct_count(), 1000);

        // Same batch twice in one call
        let mut octree = Octree::with_bounds(small_world());
        let doubled: Vec<Cube> = cubes.iter().chain(cubes.iter()).cloned().collect();
        assert_eq!(octree.add(doubled), 1000);
        assert_eq!(octree.count(), 1000);
    }

    #[test]
    fn remove_absent_is_noop() {
        let cubes = lattice();
        let mut octree = Octree::with_bounds(small_world());
        octree.add(cubes[..10].iter().cloned());

        assert_eq!(octree.remove(&cubes[500..510]), 0);
        assert_eq!(octree.count(), 10);
        assert_eq!(octree.remove(&cubes[..10]), 10);
        assert_eq!(octree.remove(&cubes[..10]), 0);
        assert_eq!(octree.count(), 0);
    }

    #[test]
    fn partial_remove_keeps_the_rest() {
        let cubes = lattice();
        let mut octree = Octree::with_bounds(small_world());
        octree.add(cubes.iter().cloned());

        let removed = octree.remove(cubes.iter().filter(|c| c.id % 2 == 0));
        assert_eq!(removed, 500);
        assert_eq!(octree.count(), 500);
        assert!(octree.contains(&1));
        assert!(!octree.contains(&0));
        assert_eq!(octree.root().distinct_count(), 500);
    }

    #[test]
    fn lattice_splits_the_root() {
        let mut octree = Octree::with_bounds(small_world());
        octree.add(lattice());
        assert!(!octree.root().is_leaf());
        assert!(octree.depth() > 1);
        assert!(octree.node_count() > 9);
    }

    #[test]
    fn world_sized_objects_stay_in_the_root() {
        let mut octree = Octree::new();
        for id in 0..64 {
            octree.add([make_cube(id, [0.0, 0.0, 0.0], WORLD_HALF_EXTENT)]);
        }

        assert_eq!(octree.count(), 64);
        assert_eq!(octree.node_count(), 1);
        assert_eq!(octree.root().reference_count(), 64);
        assert_eq!(octree.query_aabb(&Aabb::from_center(Point3::origin(), 1.0)).len(), 64);
    }

    #[test]
    fn query_aabb_matches_brute_force() {
        let cubes = lattice();
        let mut octree = Octree::with_bounds(small_world());
        octree.add(cubes.iter().cloned());

        let region = Aabb::new(Point3::new(12.0, 33.0, 0.0), Point3::new(41.0, 58.0, 27.0));
        let mut found: Vec<u32> = octree.query_aabb(&region).iter().map(|c| c.id).collect();
        let mut expected: Vec<u32> = cubes
            .iter()
            .filter(|c| c.bounds.intersects(&region))
            .map(|c| c.id)
            .collect();
        found.sort();
        expected.sort();
        assert_eq!(found, expected);
        assert!(!found.is_empty());
    }

    #[test]
    fn query_returns_spanning_objects_once() {
        let mut octree = Octree::with_policy(small_world(), MaxItems::new(1, 4));
        let big = make_cube(1, [64.0, 64.0, 64.0], 30.0);
        let small = make_cube(2, [10.0, 10.0, 10.0], 1.0);
        let other = make_cube(3, [110.0, 110.0, 110.0], 1.0);
        octree.add(vec![big, small, other]);

        let all = octree.query_aabb(&small_world());
        assert_eq!(all.len(), 3);
        assert!(octree.root().reference_count() > 3);
    }

    #[test]
    fn objects_outside_root_overflow() {
        let mut octree = Octree::with_bounds(small_world());
        let inside = make_cube(1, [10.0, 10.0, 10.0], 1.0);
        let outside = make_cube(2, [-500.0, 0.0, 0.0], 1.0);
        octree.add(vec![inside, outside.clone()]);

        assert_eq!(octree.count(), 2);
        assert_eq!(octree.overflow(), &[2]);
        let found = octree.query_aabb(&outside.bounds);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 2);

        octree.remove(&[outside]);
        assert!(octree.overflow().is_empty());
        assert_eq!(octree.count(), 1);
    }

    #[test]
    fn query_frustum_culls() {
        let mut octree = Octree::new();
        octree.add(vec![
            make_cube(1, [0.0, 0.0, 0.0], 0.5),
            make_cube(2, [10.0, 0.0, 0.0], 0.5),
        ]);

        let frustum = Frustum::from_view_projection(&nalgebra::Matrix4::identity());
        let found = octree.query_frustum(&frustum);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 1);
    }

    #[test]
    fn query_ray_sorts_nearest_first() {
        let mut octree = Octree::with_bounds(small_world());
        octree.add(lattice());

        let ray = Ray::new(Point3::new(5.0, 5.0, 200.0), Vector3::new(0.0, 0.0, -1.0));
        let hits = octree.query_ray(&ray);
        assert_eq!(hits.len(), 10);
        let ids: Vec<u32> = hits.iter().map(|(_, c)| c.id).collect();
        assert_eq!(ids, vec![9, 8, 7, 6, 5, 4, 3, 2, 1, 0]);
        assert!(hits.windows(2).all(|w| w[0].0 <= w[1].0));
    }

    #[test]
    fn traverse_visits_every_object() {
        let cubes = lattice();
        let mut octree = Octree::with_bounds(small_world());
        octree.add(cubes.iter().cloned());

        let mut visitor = CollectingVisitor::new();
        octree.traverse(&mut visitor);
        let mut ids: Vec<u32> = visitor
            .into_leaves()
            .into_iter()
            .flat_map(|(_, ids)| ids)
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), cubes.len());
    }

    #[test]
    fn clear_resets() {
        let mut octree = Octree::with_bounds(small_world());
        octree.add(lattice());
        octree.clear();
        assert_eq!(octree.count(), 0);
        assert!(octree.root().is_leaf());
        assert_eq!(octree.bounds(), &small_world());
    }
}
