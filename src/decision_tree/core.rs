use crate::builder::BuilderParams;
use crate::data::Matrix;
use crate::decision_tree::config::DecisionTreeConfig;
use crate::errors::TreeError;
use crate::splitter::SplitterParams;
use crate::tree::tree::{Tree, TreeIO};
use hashbrown::HashMap;
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Decision Tree object
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct DecisionTree {
    pub cfg: DecisionTreeConfig,
    pub tree: Option<Tree>,
}

/// Class count of every output: one more than its largest label.
pub(crate) fn count_classes(y: &Matrix<f64>) -> Result<Vec<usize>, TreeError> {
    (0..y.cols)
        .map(|k| {
            let mut max_label = 0;
            for v in y.get_col(k) {
                if !v.is_finite() || *v < 0.0 || v.fract() != 0.0 {
                    return Err(TreeError::InvalidLabel(*v, k));
                }
                max_label = max_label.max(*v as usize);
            }
            Ok(max_label + 1)
        })
        .collect()
}

impl DecisionTree {
    /// Decision Tree object
    ///
    /// * `cfg` - Configuration, validated here and left untouched afterwards.
    pub fn new(cfg: DecisionTreeConfig) -> Result<Self, TreeError> {
        cfg.validate()?;
        Ok(DecisionTree { cfg, tree: None })
    }

    pub fn validate_parameters(&self) -> Result<(), TreeError> {
        self.cfg.validate()
    }

    /// Fit the tree on a provided dataset, replacing any previous fit.
    ///
    /// * `data` - Features, column major, one column per feature.
    /// * `y` - Labels, column major, one column per output. Class indices
    ///   `0, 1, ..` for classification criteria.
    /// * `sample_weight` - Instance weights to use when training the model.
    pub fn fit(&mut self, data: &Matrix<f64>, y: &Matrix<f64>, sample_weight: Option<&[f64]>) -> Result<(), TreeError> {
        self.validate_parameters()?;
        if data.rows == 0 {
            return Err(TreeError::NoSamples);
        }
        if y.rows != data.rows {
            return Err(TreeError::ShapeMismatch("labels".to_string(), data.rows, y.rows));
        }
        if y.cols == 0 {
            return Err(TreeError::ShapeMismatch("label outputs".to_string(), 1, 0));
        }

        let n_classes = if self.cfg.criterion.is_classification() {
            count_classes(y)?
        } else {
            vec![1; y.cols]
        };
        let weighted_n_samples = match sample_weight {
            Some(w) => w.iter().sum(),
            None => data.rows as f64,
        };
        let min_weight_leaf = self.cfg.min_weight_fraction_leaf * weighted_n_samples;
        let splitter_params = SplitterParams {
            max_features: self.cfg.max_features.resolve(data.cols)?,
            min_samples_leaf: self.cfg.min_samples_leaf,
            min_weight_leaf,
            random_state: self.cfg.random_state,
        };
        let builder_params = BuilderParams {
            min_samples_split: self.cfg.effective_min_samples_split(),
            min_samples_leaf: self.cfg.min_samples_leaf,
            min_weight_leaf,
            max_depth: self.cfg.max_depth.unwrap_or(usize::MAX),
            max_leaf_nodes: self.cfg.max_leaf_nodes,
        };
        let policy = self.cfg.effective_grow_policy();
        debug!(
            "Fitting {:?} tree with {:?} splitter and {:?} criterion, classes {:?}.",
            policy, self.cfg.splitter, self.cfg.criterion, n_classes
        );

        let criterion = self.cfg.criterion.as_criterion(y.cols, &n_classes);
        let splitter = self.cfg.splitter.as_splitter(criterion, splitter_params);
        let mut builder = policy.as_builder(splitter, builder_params);
        let mut tree = Tree::new(data.cols, y.cols, n_classes);
        builder.build(&mut tree, *data, y, sample_weight)?;

        info!(
            "Fitted tree on {} samples: {} nodes, {} leaves, depth {}.",
            data.rows,
            tree.node_count(),
            tree.n_leaves,
            tree.max_depth
        );
        self.tree = Some(tree);
        Ok(())
    }

    /// The fitted tree.
    pub fn tree(&self) -> Result<&Tree, TreeError> {
        self.tree.as_ref().ok_or(TreeError::NotFitted)
    }

    pub fn is_fitted(&self) -> bool {
        self.tree.is_some()
    }

    /// Weighted impurity decrease per feature, see [`Tree::feature_importances`].
    pub fn feature_importances(&self, normalize: bool) -> Result<HashMap<usize, f64>, TreeError> {
        Ok(self.tree()?.feature_importances(normalize))
    }
}

impl TreeIO for DecisionTree {}
