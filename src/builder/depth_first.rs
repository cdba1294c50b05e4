use super::{BuilderParams, TreeBuilder};
use crate::constants::{DEFAULT_NODE_CAPACITY, MAX_DEPTH_PREALLOC};
use crate::data::Matrix;
use crate::errors::TreeError;
use crate::grower::Grower;
use crate::node::StackRecord;
use crate::splitter::{SplitRecord, Splitter};
use crate::tree::tree::Tree;
use log::{debug, info, trace};

/// Expands nodes in left to right depth-first order, bounded by `max_depth`.
pub struct DepthFirstBuilder<S> {
    pub splitter: S,
    pub params: BuilderParams,
}

impl<S> DepthFirstBuilder<S> {
    pub fn new(splitter: S, params: BuilderParams) -> Self {
        DepthFirstBuilder { splitter, params }
    }

    fn initial_capacity(&self) -> usize {
        if self.params.max_depth <= MAX_DEPTH_PREALLOC {
            (1 << (self.params.max_depth + 1)) - 1
        } else {
            DEFAULT_NODE_CAPACITY
        }
    }
}

impl<'a, S: Splitter<'a>> TreeBuilder<'a> for DepthFirstBuilder<S> {
    fn build(
        &mut self,
        tree: &mut Tree,
        x: Matrix<'a, f64>,
        y: &Matrix<f64>,
        sample_weight: Option<&[f64]>,
    ) -> Result<(), TreeError> {
        self.splitter.init(x, y, sample_weight)?;
        tree.reserve(self.initial_capacity());
        debug!(
            "Depth-first build over {} samples, max depth {}.",
            self.splitter.n_samples(),
            self.params.max_depth
        );

        let mut stack: Vec<StackRecord> = Vec::with_capacity(self.params.max_depth.min(64) + 1);
        stack.add_node(StackRecord {
            start: 0,
            end: self.splitter.n_samples(),
            depth: 0,
            parent: None,
            is_left: false,
            impurity: f64::INFINITY,
            n_constant_features: 0,
        });

        while let Some(record) = stack.get_next_node() {
            let StackRecord {
                start,
                end,
                depth,
                parent,
                is_left,
                ..
            } = record;
            let n_node_samples = end - start;
            let node_impurity = self.splitter.node_reset(start, end);
            // The root is the only node whose impurity is not known from its parent's split.
            let impurity = if parent.is_none() { node_impurity } else { record.impurity };
            let weighted_n_node_samples = self.splitter.weighted_n_node_samples();

            let mut is_leaf = depth >= self.params.max_depth
                || self.params.is_leaf_candidate(n_node_samples, weighted_n_node_samples, impurity);
            let mut n_constant_features = record.n_constant_features;
            let mut split = SplitRecord::new(end);
            if !is_leaf {
                split = self.splitter.node_split(impurity, &mut n_constant_features);
                is_leaf = !split.is_split(end);
            }

            let node_id = tree.add_node(
                parent,
                is_left,
                is_leaf,
                split.feature,
                split.threshold,
                impurity,
                n_node_samples,
                weighted_n_node_samples,
                self.splitter.node_value(),
                depth,
            );
            trace!(
                "Node {} at depth {} over [{}, {}), leaf: {}.",
                node_id,
                depth,
                start,
                end,
                is_leaf
            );

            if !is_leaf {
                // Right first, so the left child is expanded next.
                stack.add_node(StackRecord {
                    start: split.pos,
                    end,
                    depth: depth + 1,
                    parent: Some(node_id),
                    is_left: false,
                    impurity: split.impurity_right,
                    n_constant_features,
                });
                stack.add_node(StackRecord {
                    start,
                    end: split.pos,
                    depth: depth + 1,
                    parent: Some(node_id),
                    is_left: true,
                    impurity: split.impurity_left,
                    n_constant_features,
                });
            }
        }

        info!(
            "Built depth-first tree with {} nodes, {} leaves, depth {}.",
            tree.node_count(),
            tree.n_leaves,
            tree.max_depth
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::tests::{assert_constants_monotone, grow, labelled_data, RecordingSplitter};
    use crate::criterion::CriterionKind;
    use crate::grower::GrowPolicy;
    use crate::splitter::{BestSplitter, SplitterKind, SplitterParams};

    #[test]
    fn test_end_to_end_single_split() {
        let x = vec![0., 1., 2., 3.];
        let y = vec![0., 0., 1., 1.];
        let params = BuilderParams {
            max_depth: 1,
            ..Default::default()
        };
        let tree = grow(GrowPolicy::DepthFirst, SplitterKind::Best, params, &x, &y, 4, 1, 0);
        assert_eq!(tree.node_count(), 3);
        let root = &tree.nodes[0];
        assert!(!root.is_leaf);
        assert_eq!(root.feature, 0);
        assert_eq!(root.threshold, 1.5);
        assert_eq!(root.impurity, 0.5);
        let left = &tree.nodes[root.left_child];
        let right = &tree.nodes[root.right_child];
        assert!(left.is_leaf && right.is_leaf);
        assert_eq!(left.impurity, 0.0);
        assert_eq!(right.impurity, 0.0);
        assert_eq!(left.value, vec![2.0, 0.0]);
        assert_eq!(right.value, vec![0.0, 2.0]);
    }

    #[test]
    fn test_respects_max_depth() {
        let (x, y) = labelled_data(0, 200, 4);
        for kind in [SplitterKind::Best, SplitterKind::Random, SplitterKind::PresortBest] {
            for max_depth in [0, 1, 3] {
                let params = BuilderParams {
                    max_depth,
                    ..Default::default()
                };
                let tree = grow(GrowPolicy::DepthFirst, kind, params, &x, &y, 200, 4, 1);
                assert!(tree.nodes.iter().all(|n| n.depth <= max_depth));
                assert!(tree.max_depth <= max_depth);
            }
        }
    }

    #[test]
    fn test_binary_shape_and_order() {
        let (x, y) = labelled_data(2, 150, 3);
        let tree = grow(
            GrowPolicy::DepthFirst,
            SplitterKind::Best,
            BuilderParams::default(),
            &x,
            &y,
            150,
            3,
            0,
        );
        let k = tree.nodes.iter().filter(|n| !n.is_leaf).count();
        assert!(k > 0);
        assert_eq!(tree.node_count(), 2 * k + 1);
        assert_eq!(tree.n_leaves, k + 1);
        // Left child always directly follows its parent.
        for n in tree.nodes.iter().filter(|n| !n.is_leaf) {
            assert_eq!(n.left_child, n.num + 1);
            assert!(n.right_child > n.left_child);
        }
        // Unbounded depth fits the training labels.
        let m = Matrix::new(&x, 150, 3);
        let leaves = tree.apply(&m, false);
        for (i, leaf) in leaves.iter().enumerate() {
            let value = &tree.nodes[*leaf].value;
            let predicted = if value[1] > value[0] { 1.0 } else { 0.0 };
            if tree.nodes[*leaf].impurity == 0.0 {
                assert_eq!(predicted, y[i]);
            }
        }
    }

    #[test]
    fn test_leaf_size_limits() {
        let (x, y) = labelled_data(4, 120, 3);
        let params = BuilderParams {
            min_samples_leaf: 7,
            min_samples_split: 14,
            ..Default::default()
        };
        let tree = grow(GrowPolicy::DepthFirst, SplitterKind::Best, params, &x, &y, 120, 3, 0);
        assert!(tree.nodes.iter().all(|n| n.n_node_samples >= 7));
    }

    #[test]
    fn test_constant_features_never_shrink() {
        // Feature 1 is constant everywhere, feature 2 constant within x0 halves.
        let rows = 64;
        let mut x = Vec::with_capacity(rows * 3);
        x.extend((0..rows).map(|i| (i % 16) as f64));
        x.extend((0..rows).map(|_| 3.0));
        x.extend((0..rows).map(|i| if i % 16 < 8 { 0.0 } else { 1.0 }));
        let y: Vec<f64> = (0..rows).map(|i| ((i % 16) % 3 == 0) as u8 as f64).collect();

        let splitter = RecordingSplitter {
            inner: BestSplitter::new(CriterionKind::Gini.as_criterion(1, &[2]), SplitterParams::default()),
            calls: Vec::new(),
        };
        let mut builder = DepthFirstBuilder::new(splitter, BuilderParams::default());
        let mut tree = Tree::new(3, 1, vec![2]);
        builder
            .build(&mut tree, Matrix::new(&x, rows, 3), &Matrix::new(&y, rows, 1), None)
            .unwrap();
        let calls = &builder.splitter.calls;
        assert!(calls.iter().all(|c| c.3 >= 1));
        assert_constants_monotone(calls);
    }

    #[test]
    fn test_random_splitter_reproducible() {
        let (x, y) = labelled_data(9, 100, 5);
        let a = grow(GrowPolicy::DepthFirst, SplitterKind::Random, BuilderParams::default(), &x, &y, 100, 5, 17);
        let b = grow(GrowPolicy::DepthFirst, SplitterKind::Random, BuilderParams::default(), &x, &y, 100, 5, 17);
        assert_eq!(a, b);
    }

    #[test]
    fn test_init_error_propagates() {
        let x = vec![0., 1., 2.];
        let y = vec![0., 1.];
        let splitter = BestSplitter::new(CriterionKind::Gini.as_criterion(1, &[2]), SplitterParams::default());
        let mut builder = DepthFirstBuilder::new(splitter, BuilderParams::default());
        let mut tree = Tree::new(1, 1, vec![2]);
        let r = builder.build(&mut tree, Matrix::new(&x, 3, 1), &Matrix::new(&y, 2, 1), None);
        assert!(matches!(r, Err(TreeError::ShapeMismatch(..))));
        assert_eq!(tree.node_count(), 0);
    }
}
