//! Octree spatial index over renderable objects.
//!
//! The octree answers viewport questions about the converted scene: which
//! faces are inside a frustum, which ones a picking ray passes through, and
//! which ones overlap a selection box. It supports:
//!
//! - Batch insert and batch remove with exact, duplicate-tolerant counts
//! - Region queries by box, frustum, or any [`Volume`]
//! - Ray queries sorted nearest first
//!
//! # Example
//!
//! ```ignore
//! use sledge_scene::{Octree, Aabb};
//!
//! let mut octree = Octree::new();
//! octree.add(renderables.clone());
//! assert_eq!(octree.count(), renderables.len());
//!
//! let hits = octree.query_aabb(&selection_box);
//!
//! octree.remove(&renderables);
//! assert_eq!(octree.count(), 0);
//! ```
//!
//! # Architecture
//!
//! - [`Octree`]: Owns the objects by id and the root node
//! - [`OctreeNode`]: Regions; leaves reference ids, inner nodes have 8 children
//! - [`SplitPolicy`]: Strategy trait for deciding when a leaf subdivides
//! - [`OctreeVisitor`]: Visitor trait for walking leaves

mod node;
mod split;
mod tree;
mod visitor;

// Re-export main types
pub use node::OctreeNode;
pub use split::{MaxItems, NeverSplit, SplitPolicy};
pub use tree::{Octree, Spatial, Volume, WORLD_HALF_EXTENT};
pub use visitor::{CollectingVisitor, FnVisitor, OctreeVisitor};
