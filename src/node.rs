use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A committed node of a [`crate::tree::tree::Tree`].
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Node {
    pub num: usize,
    pub parent: Option<usize>,
    pub left_child: usize,
    pub right_child: usize,
    pub feature: usize,
    pub threshold: f64,
    pub impurity: f64,
    pub n_node_samples: usize,
    pub weighted_n_node_samples: f64,
    pub depth: usize,
    pub is_leaf: bool,
    /// Weighted class counts (`n_outputs` blocks of the widest class count)
    /// for classification, output means for regression.
    pub value: Vec<f64>,
}

impl Node {
    /// Get the path that should be traveled down, given a value.
    #[inline]
    pub fn get_child_idx(&self, v: f64) -> usize {
        if v <= self.threshold {
            self.left_child
        } else {
            self.right_child
        }
    }
}

impl fmt::Display for Node {
    // This trait requires `fmt` with this exact signature.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_leaf {
            write!(
                f,
                "{}:leaf={:?},impurity={},cover={}",
                self.num, self.value, self.impurity, self.weighted_n_node_samples
            )
        } else {
            write!(
                f,
                "{}:[{} <= {}] yes={},no={},impurity={},cover={}",
                self.num,
                self.feature,
                self.threshold,
                self.left_child,
                self.right_child,
                self.impurity,
                self.weighted_n_node_samples
            )
        }
    }
}

/// Pending node of the depth-first worklist.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackRecord {
    pub start: usize,
    pub end: usize,
    pub depth: usize,
    pub parent: Option<usize>,
    pub is_left: bool,
    pub impurity: f64,
    pub n_constant_features: usize,
}

/// An evaluated but not yet committed node of the best-first frontier.
///
/// Records compare by `improvement` only, so a [`std::collections::BinaryHeap`]
/// pops the most promising candidate first.
#[derive(Debug, Clone)]
pub struct FrontierRecord {
    pub start: usize,
    pub end: usize,
    /// Split position, equal to `end` for leaves.
    pub pos: usize,
    pub depth: usize,
    pub parent: Option<usize>,
    pub is_left: bool,
    pub is_leaf: bool,
    pub feature: usize,
    pub threshold: f64,
    pub impurity: f64,
    pub impurity_left: f64,
    pub impurity_right: f64,
    pub improvement: f64,
    pub n_node_samples: usize,
    pub weighted_n_node_samples: f64,
    pub value: Vec<f64>,
    pub n_constant_features: usize,
}

impl Ord for FrontierRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.improvement.total_cmp(&other.improvement)
    }
}

impl PartialOrd for FrontierRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for FrontierRecord {
    fn eq(&self, other: &Self) -> bool {
        self.improvement == other.improvement
    }
}

impl Eq for FrontierRecord {}
