//! Leaf split strategies for octree insertion.
//!
//! Splitting only affects query speed. Whatever the policy decides, every
//! object stays reachable and counted exactly once. A leaf the policy marks
//! for splitting stays a leaf if one of its octants would still reference
//! every object in it.

/// Strategy deciding when a leaf is subdivided into eight children.
pub trait SplitPolicy {
    /// Called after an object is added to a leaf.
    ///
    /// `item_count` is the number of objects now referenced by the leaf and
    /// `depth` its distance from the root (the root is depth 0).
    fn should_split(&self, item_count: usize, depth: usize) -> bool;
}

/// Splits a leaf once it holds more than `max_items` objects, unless it is
/// already `max_depth` levels deep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxItems {
    pub max_items: usize,
    pub max_depth: usize,
}

impl MaxItems {
    pub fn new(max_items: usize, max_depth: usize) -> Self {
        Self {
            max_items,
            max_depth,
        }
    }
}

impl Default for MaxItems {
    fn default() -> Self {
        Self::new(16, 8)
    }
}

impl SplitPolicy for MaxItems {
    fn should_split(&self, item_count: usize, depth: usize) -> bool {
        item_count > self.max_items && depth < self.max_depth
    }
}

/// Never splits; the octree degenerates to a single list.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverSplit;

impl SplitPolicy for NeverSplit {
    fn should_split(&self, _item_count: usize, _depth: usize) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_items_splits_over_capacity() {
        let policy = MaxItems::new(4, 3);
        assert!(!policy.should_split(4, 0));
        assert!(policy.should_split(5, 0));
    }

    #[test]
    fn max_items_respects_depth_limit() {
        let policy = MaxItems::new(4, 3);
        assert!(policy.should_split(100, 2));
        assert!(!policy.should_split(100, 3));
    }

    #[test]
    fn never_split() {
        assert!(!NeverSplit.should_split(usize::MAX, 0));
    }
}
