//! Octree node implementation.

use std::collections::HashSet;
use std::hash::Hash;

use crate::Aabb;

use super::split::SplitPolicy;
use super::visitor::OctreeVisitor;

/// A node in the octree.
///
/// Each node covers an axis-aligned region. Leaves reference the ids of the
/// objects whose bounds intersect their region; inner nodes reference nothing
/// themselves and delegate to exactly eight children, one per octant.
///
/// An object that crosses octant boundaries is referenced by every leaf it
/// touches, so queries deduplicate.
#[derive(Debug, Clone)]
pub struct OctreeNode<K> {
    /// Region covered by this node.
    bounds: Aabb,

    /// Distance from the root (the root is depth 0).
    depth: usize,

    /// Ids referenced by this leaf. Always empty for inner nodes.
    ids: Vec<K>,

    /// Children in [`Aabb::octant`] order, if this node has been split.
    children: Option<Box<[OctreeNode<K>; 8]>>,
}

impl<K: Copy + Eq + Hash> OctreeNode<K> {
    /// Creates an empty leaf covering `bounds`.
    pub fn new(bounds: Aabb, depth: usize) -> Self {
        Self {
            bounds,
            depth,
            ids: Vec::new(),
            children: None,
        }
    }

    /// Returns the region covered by this node.
    #[inline]
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// Returns the depth of this node below the root.
    #[inline]
    pub fn level(&self) -> usize {
        self.depth
    }

    /// Returns the ids referenced directly by this node.
    #[inline]
    pub fn ids(&self) -> &[K] {
        &self.ids
    }

    /// Returns the eight children, if this node is split.
    #[inline]
    pub fn children(&self) -> Option<&[OctreeNode<K>; 8]> {
        self.children.as_deref()
    }

    /// Returns one child by octant index.
    #[inline]
    pub fn child(&self, octant: usize) -> Option<&OctreeNode<K>> {
        self.children.as_ref().and_then(|c| c.get(octant))
    }

    /// Checks if this node has any children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Returns the number of leaf references in this subtree.
    ///
    /// Objects spanning several leaves are counted once per leaf.
    pub fn reference_count(&self) -> usize {
        match &self.children {
            Some(children) => children.iter().map(OctreeNode::reference_count).sum(),
            None => self.ids.len(),
        }
    }

    /// Returns the number of distinct ids in this subtree.
    pub fn distinct_count(&self) -> usize {
        let mut seen = HashSet::new();
        self.for_each_leaf(&mut |_, ids| seen.extend(ids.iter().copied()));
        seen.len()
    }

    /// Returns the number of nodes in this subtree, including this one.
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .flat_map(|c| c.iter())
            .map(OctreeNode::node_count)
            .sum::<usize>()
    }

    /// Returns the depth of this subtree (1 for a leaf node).
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .flat_map(|c| c.iter())
            .map(OctreeNode::depth)
            .max()
            .unwrap_or(0)
    }

    /// Adds `id` to every leaf its bounds intersect, splitting leaves that
    /// the policy marks as over capacity.
    ///
    /// `bounds_of` resolves the bounds of ids already stored, needed when a
    /// leaf is split and its references are redistributed.
    pub(crate) fn insert<S, F>(&mut self, id: K, item: &Aabb, policy: &S, bounds_of: &F)
    where
        S: SplitPolicy,
        F: Fn(&K) -> Option<Aabb>,
    {
        if !self.bounds.intersects(item) {
            return;
        }

        if let Some(children) = self.children.as_mut() {
            for child in children.iter_mut() {
                child.insert(id, item, policy, bounds_of);
            }
            return;
        }

        self.ids.push(id);
        if policy.should_split(self.ids.len(), self.depth) && self.split_reduces_load(bounds_of) {
            self.split(bounds_of);
        }
    }

    /// Returns `true` if every octant would reference fewer ids than this
    /// leaf does. Objects covering a whole octant follow it into the child,
    /// so splitting a leaf full of them only multiplies references.
    fn split_reduces_load<F>(&self, bounds_of: &F) -> bool
    where
        F: Fn(&K) -> Option<Aabb>,
    {
        let items: Vec<Aabb> = self.ids.iter().filter_map(bounds_of).collect();
        (0..8).all(|i| {
            let octant = self.bounds.octant(i);
            items.iter().filter(|item| octant.intersects(item)).count() < self.ids.len()
        })
    }

    /// Turns this leaf into an inner node, moving its references to the
    /// children they intersect.
    fn split<F>(&mut self, bounds_of: &F)
    where
        F: Fn(&K) -> Option<Aabb>,
    {
        let depth = self.depth + 1;
        let mut children: Box<[OctreeNode<K>; 8]> =
            Box::new(std::array::from_fn(|i| OctreeNode::new(self.bounds.octant(i), depth)));

        for id in self.ids.drain(..) {
            let Some(item) = bounds_of(&id) else {
                continue;
            };
            for child in children.iter_mut() {
                if child.bounds.intersects(&item) {
                    child.ids.push(id);
                }
            }
        }

        log::trace!("octree: split node at depth {} ({:?})", self.depth, self.bounds);
        self.children = Some(children);
    }

    /// Removes `id` from every leaf referencing it. Inner nodes whose
    /// children all end up as empty leaves become leaves again.
    ///
    /// Returns `true` if any reference was removed.
    pub(crate) fn remove(&mut self, id: &K, item: &Aabb) -> bool {
        if !self.bounds.intersects(item) {
            return false;
        }

        let removed = match self.children.as_mut() {
            Some(children) => children
                .iter_mut()
                .fold(false, |acc, child| child.remove(id, item) | acc),
            None => {
                let before = self.ids.len();
                self.ids.retain(|k| k != id);
                self.ids.len() != before
            }
        };

        if removed && self.children_are_empty() {
            self.children = None;
        }
        removed
    }

    fn children_are_empty(&self) -> bool {
        self.children.as_ref().is_some_and(|children| {
            children
                .iter()
                .all(|child| child.is_leaf() && child.ids.is_empty())
        })
    }

    /// Collects ids from leaves whose region passes `hit`, each id once, in
    /// depth-first octant order.
    pub(crate) fn collect<H>(&self, hit: &H, seen: &mut HashSet<K>, out: &mut Vec<K>)
    where
        H: Fn(&Aabb) -> bool,
    {
        if !hit(&self.bounds) {
            return;
        }

        match &self.children {
            Some(children) => {
                for child in children.iter() {
                    child.collect(hit, seen, out);
                }
            }
            None => {
                for id in &self.ids {
                    if seen.insert(*id) {
                        out.push(*id);
                    }
                }
            }
        }
    }

    /// Calls `func` for each non-empty leaf.
    pub(crate) fn for_each_leaf<F>(&self, func: &mut F)
    where
        F: FnMut(&Aabb, &[K]),
    {
        match &self.children {
            Some(children) => {
                for child in children.iter() {
                    child.for_each_leaf(func);
                }
            }
            None => {
                if !self.ids.is_empty() {
                    func(&self.bounds, &self.ids);
                }
            }
        }
    }

    /// Walks non-empty leaves with a visitor.
    pub fn traverse<V: OctreeVisitor<K>>(&self, visitor: &mut V) {
        self.for_each_leaf(&mut |bounds, ids| visitor.visit(bounds, ids));
    }
}
