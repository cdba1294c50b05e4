//! Tree builders
//!
//! A builder owns one splitter and drives it over the sample array,
//! turning split decisions into nodes of a [`Tree`]. Two expansion orders
//! are available, see [`GrowPolicy`].
mod best_first;
mod depth_first;

pub use best_first::BestFirstTreeBuilder;
pub use depth_first::DepthFirstBuilder;

use crate::constants::MIN_IMPURITY_SPLIT;
use crate::data::Matrix;
use crate::errors::TreeError;
use crate::grower::GrowPolicy;
use crate::splitter::Splitter;
use crate::tree::tree::Tree;
use serde::{Deserialize, Serialize};

/// Growth limits shared by both builders.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct BuilderParams {
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Absolute minimum weight of a leaf.
    pub min_weight_leaf: f64,
    /// Only honoured by the depth-first builder.
    pub max_depth: usize,
    /// Only honoured by the best-first builder.
    pub max_leaf_nodes: Option<usize>,
}

impl Default for BuilderParams {
    fn default() -> Self {
        BuilderParams {
            min_samples_split: 2,
            min_samples_leaf: 1,
            min_weight_leaf: 0.0,
            max_depth: usize::MAX,
            max_leaf_nodes: None,
        }
    }
}

impl BuilderParams {
    /// Whether a node must become a leaf before any split search.
    ///
    /// * `n_node_samples` - Sample count of the node.
    /// * `weighted_n_node_samples` - Total weight of the node.
    /// * `impurity` - Impurity of the node.
    #[inline]
    pub fn is_leaf_candidate(&self, n_node_samples: usize, weighted_n_node_samples: f64, impurity: f64) -> bool {
        n_node_samples < self.min_samples_split
            || n_node_samples < self.min_samples_leaf.saturating_mul(2)
            || weighted_n_node_samples < 2.0 * self.min_weight_leaf
            || impurity <= MIN_IMPURITY_SPLIT
    }
}

/// Grows a [`Tree`] from a training set.
pub trait TreeBuilder<'a> {
    /// Bind the splitter to the data and append every node to `tree`.
    ///
    /// * `tree` - Empty tree to grow.
    /// * `x` - Features, one column per feature.
    /// * `y` - Labels, one column per output.
    /// * `sample_weight` - Optional non-negative weights.
    fn build(
        &mut self,
        tree: &mut Tree,
        x: Matrix<'a, f64>,
        y: &Matrix<f64>,
        sample_weight: Option<&[f64]>,
    ) -> Result<(), TreeError>;
}

impl GrowPolicy {
    pub fn as_builder<'a>(
        &self,
        splitter: Box<dyn Splitter<'a> + 'a>,
        params: BuilderParams,
    ) -> Box<dyn TreeBuilder<'a> + 'a> {
        match self {
            GrowPolicy::DepthFirst => Box::new(DepthFirstBuilder::new(splitter, params)),
            GrowPolicy::BestFirst => Box::new(BestFirstTreeBuilder::new(splitter, params)),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::criterion::CriterionKind;
    use crate::splitter::{SplitRecord, SplitterBase, SplitterKind, SplitterParams};

    /// Classification data whose label depends on the first two features.
    pub(crate) fn labelled_data(seed: u64, rows: usize, cols: usize) -> (Vec<f64>, Vec<f64>) {
        crate::splitter::tests::random_data(seed, rows, cols)
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn grow(
        policy: GrowPolicy,
        kind: SplitterKind,
        params: BuilderParams,
        x: &[f64],
        y: &[f64],
        rows: usize,
        cols: usize,
        random_state: u64,
    ) -> Tree {
        let splitter_params = SplitterParams {
            min_samples_leaf: params.min_samples_leaf,
            min_weight_leaf: params.min_weight_leaf,
            random_state,
            ..Default::default()
        };
        let splitter = kind.as_splitter(CriterionKind::Gini.as_criterion(1, &[2]), splitter_params);
        let mut builder = policy.as_builder(splitter, params);
        let mut tree = Tree::new(cols, 1, vec![2]);
        builder
            .build(&mut tree, Matrix::new(x, rows, cols), &Matrix::new(y, rows, 1), None)
            .unwrap();
        tree
    }

    /// Wraps a splitter and records `(start, end, n_constant in, n_constant out)`
    /// for every split search.
    pub(crate) struct RecordingSplitter<S> {
        pub inner: S,
        pub calls: Vec<(usize, usize, usize, usize)>,
    }

    impl<'a, S: Splitter<'a>> Splitter<'a> for RecordingSplitter<S> {
        fn base(&self) -> &SplitterBase<'a> {
            self.inner.base()
        }

        fn base_mut(&mut self) -> &mut SplitterBase<'a> {
            self.inner.base_mut()
        }

        fn init(&mut self, x: Matrix<'a, f64>, y: &Matrix<f64>, sample_weight: Option<&[f64]>) -> Result<(), TreeError> {
            self.inner.init(x, y, sample_weight)
        }

        fn node_split(&mut self, impurity: f64, n_constant_features: &mut usize) -> SplitRecord {
            let before = *n_constant_features;
            let split = self.inner.node_split(impurity, n_constant_features);
            let base = self.inner.base();
            self.calls.push((base.start, base.end, before, *n_constant_features));
            split
        }
    }

    /// Every split search inside a node's range starts from at least the
    /// constants that node handed down.
    pub(crate) fn assert_constants_monotone(calls: &[(usize, usize, usize, usize)]) {
        for (i, (start, end, before, after)) in calls.iter().enumerate() {
            assert!(after >= before);
            for (c_start, c_end, c_before, _) in &calls[i + 1..] {
                if start <= c_start && c_end <= end && (c_start, c_end) != (start, end) {
                    assert!(c_before >= after);
                }
            }
        }
    }

    #[test]
    fn test_leaf_candidate() {
        let params = BuilderParams {
            min_samples_split: 4,
            min_samples_leaf: 2,
            min_weight_leaf: 1.5,
            ..Default::default()
        };
        assert!(!params.is_leaf_candidate(4, 4.0, 0.5));
        assert!(params.is_leaf_candidate(3, 4.0, 0.5));
        assert!(params.is_leaf_candidate(4, 2.5, 0.5));
        assert!(params.is_leaf_candidate(4, 4.0, 0.0));
        assert!(params.is_leaf_candidate(4, 4.0, 1e-8));

        let params = BuilderParams {
            min_samples_leaf: usize::MAX,
            ..Default::default()
        };
        assert!(params.is_leaf_candidate(usize::MAX, 4.0, 0.5));
    }
}
