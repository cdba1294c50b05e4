use crate::criterion::CriterionKind;
use crate::decision_tree::config::MaxFeatures;
use crate::decision_tree::core::DecisionTree;
use crate::grower::GrowPolicy;
use crate::splitter::SplitterKind;

impl DecisionTree {
    // Set methods for parameters

    /// Set the impurity measure.
    /// * `criterion` - Gini or Entropy for classification, SquaredError for regression.
    pub fn set_criterion(mut self, criterion: CriterionKind) -> Self {
        self.cfg.criterion = criterion;
        self
    }

    /// Set the split search strategy.
    /// * `splitter` - Best, Random or PresortBest.
    pub fn set_splitter(mut self, splitter: SplitterKind) -> Self {
        self.cfg.splitter = splitter;
        self
    }

    /// Set the expansion order.
    /// * `grow_policy` - `None` picks best-first iff `max_leaf_nodes` is set.
    pub fn set_grow_policy(mut self, grow_policy: Option<GrowPolicy>) -> Self {
        self.cfg.grow_policy = grow_policy;
        self
    }

    /// Set the number of features visited per split search.
    pub fn set_max_features(mut self, max_features: MaxFeatures) -> Self {
        self.cfg.max_features = max_features;
        self
    }

    pub fn set_min_samples_split(mut self, min_samples_split: usize) -> Self {
        self.cfg.min_samples_split = min_samples_split;
        self
    }

    pub fn set_min_samples_leaf(mut self, min_samples_leaf: usize) -> Self {
        self.cfg.min_samples_leaf = min_samples_leaf;
        self
    }

    /// Set the minimum share of total sample weight in each leaf.
    /// * `min_weight_fraction_leaf` - Within `[0, 0.5]`.
    pub fn set_min_weight_fraction_leaf(mut self, min_weight_fraction_leaf: f64) -> Self {
        self.cfg.min_weight_fraction_leaf = min_weight_fraction_leaf;
        self
    }

    /// Set the depth limit, only used by depth-first growth.
    pub fn set_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.cfg.max_depth = max_depth;
        self
    }

    /// Set the leaf limit, only used by best-first growth.
    pub fn set_max_leaf_nodes(mut self, max_leaf_nodes: Option<usize>) -> Self {
        self.cfg.max_leaf_nodes = max_leaf_nodes;
        self
    }

    /// Set the seed of the feature and threshold draws.
    pub fn set_random_state(mut self, random_state: u64) -> Self {
        self.cfg.random_state = random_state;
        self
    }
}
