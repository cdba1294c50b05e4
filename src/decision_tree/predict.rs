use crate::data::Matrix;
use crate::decision_tree::core::DecisionTree;
use crate::errors::TreeError;
use crate::tree::tree::Tree;

impl DecisionTree {
    fn fitted_for(&self, data: &Matrix<f64>) -> Result<&Tree, TreeError> {
        let tree = self.tree()?;
        if data.cols != tree.n_features {
            return Err(TreeError::ShapeMismatch("features".to_string(), tree.n_features, data.cols));
        }
        Ok(tree)
    }

    /// Predict one value per row and output, column major.
    ///
    /// Classification criteria predict the most weighted class of the leaf,
    /// regression predicts the leaf mean.
    ///
    /// * `data` - Features, one column per feature.
    /// * `parallel` - Traverse rows in parallel.
    pub fn predict(&self, data: &Matrix<f64>, parallel: bool) -> Result<Vec<f64>, TreeError> {
        let tree = self.fitted_for(data)?;
        let leaves = tree.apply(data, parallel);
        let is_classification = self.cfg.criterion.is_classification();
        let stride = tree.n_classes.iter().copied().max().unwrap_or(1);

        let mut preds = vec![0.0; data.rows * tree.n_outputs];
        for k in 0..tree.n_outputs {
            for (i, leaf) in leaves.iter().enumerate() {
                let value = &tree.nodes[*leaf].value;
                preds[i + k * data.rows] = if is_classification {
                    let counts = &value[k * stride..k * stride + tree.n_classes[k]];
                    argmax(counts) as f64
                } else {
                    value[k]
                };
            }
        }
        Ok(preds)
    }

    /// Class probabilities of the first output, one row per sample.
    ///
    /// * `data` - Features, one column per feature.
    /// * `parallel` - Traverse rows in parallel.
    pub fn predict_proba(&self, data: &Matrix<f64>, parallel: bool) -> Result<Vec<Vec<f64>>, TreeError> {
        if !self.cfg.criterion.is_classification() {
            return Err(TreeError::InvalidParameter(
                "criterion".to_string(),
                "a classification criterion".to_string(),
                format!("{:?}", self.cfg.criterion),
            ));
        }
        let tree = self.fitted_for(data)?;
        let n_classes = tree.n_classes[0];
        Ok(tree
            .apply(data, parallel)
            .iter()
            .map(|leaf| {
                let counts = &tree.nodes[*leaf].value[..n_classes];
                let total: f64 = counts.iter().sum();
                if total > 0.0 {
                    counts.iter().map(|c| c / total).collect()
                } else {
                    vec![1.0 / n_classes as f64; n_classes]
                }
            })
            .collect())
    }
}

/// First index of the largest value.
fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = i;
        }
    }
    best
}
