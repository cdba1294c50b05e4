use super::{BuilderParams, TreeBuilder};
use crate::constants::DEFAULT_NODE_CAPACITY;
use crate::data::Matrix;
use crate::errors::TreeError;
use crate::grower::Grower;
use crate::node::FrontierRecord;
use crate::splitter::{SplitRecord, Splitter};
use crate::tree::tree::Tree;
use log::{debug, info, trace};
use std::collections::BinaryHeap;

/// Expands the candidate with the largest impurity improvement first,
/// bounded by `max_leaf_nodes`. Depth is not limited.
///
/// Candidates are evaluated when pushed and committed to the tree when
/// popped, so every split spends exactly one unit of the leaf budget.
pub struct BestFirstTreeBuilder<S> {
    pub splitter: S,
    pub params: BuilderParams,
}

impl<S> BestFirstTreeBuilder<S> {
    pub fn new(splitter: S, params: BuilderParams) -> Self {
        BestFirstTreeBuilder { splitter, params }
    }
}

impl<'a, S: Splitter<'a>> BestFirstTreeBuilder<S> {
    /// Search the best split of `samples[start..end]`, partitioning the
    /// range by it, and package the outcome as a frontier candidate.
    #[allow(clippy::too_many_arguments)]
    fn evaluate_node(
        &mut self,
        start: usize,
        end: usize,
        depth: usize,
        parent: Option<usize>,
        is_left: bool,
        impurity: Option<f64>,
        n_constant_features: usize,
    ) -> FrontierRecord {
        let node_impurity = self.splitter.node_reset(start, end);
        let impurity = impurity.unwrap_or(node_impurity);
        let n_node_samples = end - start;
        let weighted_n_node_samples = self.splitter.weighted_n_node_samples();

        let mut n_constant_features = n_constant_features;
        let mut is_leaf = self
            .params
            .is_leaf_candidate(n_node_samples, weighted_n_node_samples, impurity);
        let mut split = SplitRecord::new(end);
        if !is_leaf {
            split = self.splitter.node_split(impurity, &mut n_constant_features);
            is_leaf = !split.is_split(end);
        }

        FrontierRecord {
            start,
            end,
            pos: if is_leaf { end } else { split.pos },
            depth,
            parent,
            is_left,
            is_leaf,
            feature: split.feature,
            threshold: split.threshold,
            impurity,
            impurity_left: split.impurity_left,
            impurity_right: split.impurity_right,
            improvement: if is_leaf { f64::NEG_INFINITY } else { split.improvement },
            n_node_samples,
            weighted_n_node_samples,
            value: self.splitter.node_value(),
            n_constant_features,
        }
    }
}

impl<'a, S: Splitter<'a>> TreeBuilder<'a> for BestFirstTreeBuilder<S> {
    fn build(
        &mut self,
        tree: &mut Tree,
        x: Matrix<'a, f64>,
        y: &Matrix<f64>,
        sample_weight: Option<&[f64]>,
    ) -> Result<(), TreeError> {
        self.splitter.init(x, y, sample_weight)?;
        let max_leaf_nodes = self.params.max_leaf_nodes.unwrap_or(usize::MAX);
        // A tree with `s` splits has `s + 1` leaves.
        let max_splits = max_leaf_nodes.saturating_sub(1);
        if max_leaf_nodes != usize::MAX {
            tree.reserve(
                max_leaf_nodes
                    .saturating_mul(2)
                    .saturating_sub(1)
                    .min(DEFAULT_NODE_CAPACITY),
            );
        }
        debug!(
            "Best-first build over {} samples, at most {} leaves.",
            self.splitter.n_samples(),
            max_leaf_nodes
        );

        let mut frontier: BinaryHeap<FrontierRecord> = BinaryHeap::new();
        let root = self.evaluate_node(0, self.splitter.n_samples(), 0, None, false, None, 0);
        frontier.add_node(root);
        let mut n_splits = 0;

        while let Some(record) = frontier.get_next_node() {
            // Once the budget is spent, remaining candidates are closed as leaves.
            let is_leaf = record.is_leaf || n_splits >= max_splits;
            let node_id = tree.add_node(
                record.parent,
                record.is_left,
                is_leaf,
                record.feature,
                record.threshold,
                record.impurity,
                record.n_node_samples,
                record.weighted_n_node_samples,
                record.value,
                record.depth,
            );
            trace!(
                "Node {} at depth {} over [{}, {}), improvement {}, leaf: {}.",
                node_id,
                record.depth,
                record.start,
                record.end,
                record.improvement,
                is_leaf
            );
            if is_leaf {
                continue;
            }
            n_splits += 1;

            let left = self.evaluate_node(
                record.start,
                record.pos,
                record.depth + 1,
                Some(node_id),
                true,
                Some(record.impurity_left),
                record.n_constant_features,
            );
            let right = self.evaluate_node(
                record.pos,
                record.end,
                record.depth + 1,
                Some(node_id),
                false,
                Some(record.impurity_right),
                record.n_constant_features,
            );
            frontier.add_node(left);
            frontier.add_node(right);
        }

        info!(
            "Built best-first tree with {} nodes, {} leaves, depth {}.",
            tree.node_count(),
            tree.n_leaves,
            tree.max_depth
        );
        Ok(())
    }
}
