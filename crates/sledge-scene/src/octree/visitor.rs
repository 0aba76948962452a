//! Visitor pattern for octree traversal.
//!
//! Visitors receive every non-empty leaf together with the ids it references.
//! An object spanning several leaves is reported once per leaf.

use crate::Aabb;

/// Visitor for processing leaves during octree traversal.
pub trait OctreeVisitor<K> {
    /// Called for each non-empty leaf, in depth-first octant order.
    fn visit(&mut self, bounds: &Aabb, ids: &[K]);
}

/// A visitor that records every visited leaf.
#[derive(Debug)]
pub struct CollectingVisitor<K> {
    leaves: Vec<(Aabb, Vec<K>)>,
}

impl<K> Default for CollectingVisitor<K> {
    fn default() -> Self {
        Self { leaves: Vec::new() }
    }
}

impl<K: Clone> CollectingVisitor<K> {
    /// Creates a new empty collecting visitor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded leaves.
    pub fn leaves(&self) -> &[(Aabb, Vec<K>)] {
        &self.leaves
    }

    /// Consumes the visitor, returning the recorded leaves.
    pub fn into_leaves(self) -> Vec<(Aabb, Vec<K>)> {
        self.leaves
    }
}

impl<K: Clone> OctreeVisitor<K> for CollectingVisitor<K> {
    fn visit(&mut self, bounds: &Aabb, ids: &[K]) {
        self.leaves.push((*bounds, ids.to_vec()));
    }
}

/// A visitor that calls a closure for each leaf.
pub struct FnVisitor<F> {
    func: F,
}

impl<F> FnVisitor<F> {
    /// Creates a new visitor from a closure.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<K, F> OctreeVisitor<K> for FnVisitor<F>
where
    F: FnMut(&Aabb, &[K]),
{
    fn visit(&mut self, bounds: &Aabb, ids: &[K]) {
        (self.func)(bounds, ids);
    }
}
