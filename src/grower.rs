use serde::Deserialize;
use serde::Serialize;

use crate::node::{FrontierRecord, StackRecord};
use std::collections::BinaryHeap;

/// Trait for handling the growth of the tree.
pub trait Grower<R> {
    /// Add a node to the grower.
    fn add_node(&mut self, node: R);
    /// Get the next node to expand, `None` once the grower is exhausted.
    fn get_next_node(&mut self) -> Option<R>;
    /// Check if the grower is empty.
    fn is_empty(&self) -> bool;
}

/// Highest improvement first.
impl Grower<FrontierRecord> for BinaryHeap<FrontierRecord> {
    fn add_node(&mut self, node: FrontierRecord) {
        self.push(node);
    }

    fn get_next_node(&mut self) -> Option<FrontierRecord> {
        self.pop()
    }

    fn is_empty(&self) -> bool {
        BinaryHeap::is_empty(self)
    }
}

/// Last in, first out.
impl Grower<StackRecord> for Vec<StackRecord> {
    fn add_node(&mut self, node: StackRecord) {
        self.push(node);
    }

    fn get_next_node(&mut self) -> Option<StackRecord> {
        self.pop()
    }

    fn is_empty(&self) -> bool {
        Vec::is_empty(self)
    }
}

/// Policy for growing the tree.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum GrowPolicy {
    /// Left to right depth-first expansion, bounded by `max_depth`.
    DepthFirst,
    /// Highest improvement first, bounded by `max_leaf_nodes`.
    BestFirst,
}
