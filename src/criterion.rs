//! Criterion
//!
//! Impurity measures driven by the splitters. A criterion is bound once to
//! the labels and sample weights, reset for every node, and then moved
//! forward through the node's samples one candidate cut at a time.
use crate::data::Matrix;
use crate::errors::TreeError;
use serde::{Deserialize, Serialize};

/// Impurity statistics over a contiguous block `samples[start..end]`.
///
/// The split position only ever moves forward through `update`; moving
/// back to `start` requires `rewind` (same node) or `reset` (new node).
pub trait Criterion {
    /// Copy the labels and sample weights the criterion will read from.
    ///
    /// * `y` - Labels, one column per output.
    /// * `sample_weight` - Per sample weight, same length as `y.rows`.
    /// * `weighted_n_samples` - Total weight over all samples.
    fn bind(&mut self, y: &Matrix<f64>, sample_weight: &[f64], weighted_n_samples: f64) -> Result<(), TreeError>;

    /// Compute the node statistics for `samples[start..end]` and put the
    /// split position at `start`.
    fn reset(&mut self, samples: &[usize], start: usize, end: usize);

    /// Put the split position back at `start`, keeping the node statistics.
    fn rewind(&mut self);

    /// Move the split position forward to `new_pos`, so that
    /// `samples[start..new_pos]` is the left child.
    fn update(&mut self, samples: &[usize], new_pos: usize);

    /// Impurity of the whole node.
    fn node_impurity(&self) -> f64;

    /// Impurity of the left and right children at the current position.
    fn children_impurity(&self) -> (f64, f64);

    /// Value stored for the node, class weights or output means.
    fn node_value(&self) -> Vec<f64>;

    fn weighted_n_samples(&self) -> f64;
    fn weighted_n_node_samples(&self) -> f64;
    fn weighted_n_left(&self) -> f64;
    fn weighted_n_right(&self) -> f64;

    /// A cheaper quantity ordering candidate cuts the same way as
    /// [`Criterion::impurity_improvement`] does within one node.
    fn proxy_impurity_improvement(&self) -> f64 {
        let (impurity_left, impurity_right) = self.children_impurity();
        -self.weighted_n_right() * impurity_right - self.weighted_n_left() * impurity_left
    }

    /// Weighted impurity decrease of the current cut, relative to the
    /// whole training set.
    fn impurity_improvement(&self, impurity_parent: f64) -> f64 {
        let (impurity_left, impurity_right) = self.children_impurity();
        let w_node = self.weighted_n_node_samples();
        if w_node <= 0.0 {
            return 0.0;
        }
        (w_node / self.weighted_n_samples())
            * (impurity_parent
                - (self.weighted_n_right() / w_node) * impurity_right
                - (self.weighted_n_left() / w_node) * impurity_left)
    }
}

/// Available impurity measures.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum CriterionKind {
    /// Gini index, classification.
    #[default]
    Gini,
    /// Shannon entropy, classification.
    Entropy,
    /// Mean squared error, regression.
    SquaredError,
}

impl CriterionKind {
    pub fn is_classification(&self) -> bool {
        !matches!(self, CriterionKind::SquaredError)
    }

    /// Build a criterion for `n_outputs` outputs. `n_classes` is only read
    /// for the classification measures.
    pub fn as_criterion(&self, n_outputs: usize, n_classes: &[usize]) -> Box<dyn Criterion> {
        match self {
            CriterionKind::Gini => Box::new(ClassificationCriterion::gini(n_classes.to_vec())),
            CriterionKind::Entropy => Box::new(ClassificationCriterion::entropy(n_classes.to_vec())),
            CriterionKind::SquaredError => Box::new(SquaredError::new(n_outputs)),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ClassImpurity {
    Gini,
    Entropy,
}

/// Weighted class counts per output, for the classification measures.
#[derive(Debug, Clone)]
pub struct ClassificationCriterion {
    impurity: ClassImpurity,
    n_classes: Vec<usize>,
    stride: usize,
    // Class index of each sample and output, row major.
    labels: Vec<usize>,
    weights: Vec<f64>,
    weighted_n_samples: f64,

    start: usize,
    pos: usize,
    end: usize,
    weighted_n_node_samples: f64,
    weighted_n_left: f64,
    weighted_n_right: f64,

    sum_total: Vec<f64>,
    sum_left: Vec<f64>,
    sum_right: Vec<f64>,
}

impl ClassificationCriterion {
    pub fn new(impurity: ClassImpurity, n_classes: Vec<usize>) -> Self {
        let stride = n_classes.iter().copied().max().unwrap_or(0);
        let width = n_classes.len() * stride;
        ClassificationCriterion {
            impurity,
            n_classes,
            stride,
            labels: Vec::new(),
            weights: Vec::new(),
            weighted_n_samples: 0.0,
            start: 0,
            pos: 0,
            end: 0,
            weighted_n_node_samples: 0.0,
            weighted_n_left: 0.0,
            weighted_n_right: 0.0,
            sum_total: vec![0.0; width],
            sum_left: vec![0.0; width],
            sum_right: vec![0.0; width],
        }
    }

    pub fn gini(n_classes: Vec<usize>) -> Self {
        Self::new(ClassImpurity::Gini, n_classes)
    }

    pub fn entropy(n_classes: Vec<usize>) -> Self {
        Self::new(ClassImpurity::Entropy, n_classes)
    }

    #[inline]
    fn n_outputs(&self) -> usize {
        self.n_classes.len()
    }

    fn impurity_of(&self, sums: &[f64], weight: f64) -> f64 {
        if weight <= 0.0 {
            return 0.0;
        }
        let mut total = 0.0;
        for (k, n_classes) in self.n_classes.iter().enumerate() {
            let counts = &sums[k * self.stride..k * self.stride + n_classes];
            total += match self.impurity {
                ClassImpurity::Gini => {
                    let sq_count: f64 = counts.iter().map(|c| c * c).sum();
                    1.0 - sq_count / (weight * weight)
                }
                ClassImpurity::Entropy => counts
                    .iter()
                    .filter(|c| **c > 0.0)
                    .map(|c| {
                        let p = c / weight;
                        -p * p.log2()
                    })
                    .sum(),
            };
        }
        total / self.n_outputs() as f64
    }
}

impl Criterion for ClassificationCriterion {
    fn bind(&mut self, y: &Matrix<f64>, sample_weight: &[f64], weighted_n_samples: f64) -> Result<(), TreeError> {
        let n_outputs = self.n_outputs();
        if y.cols != n_outputs {
            return Err(TreeError::ShapeMismatch("label outputs".to_string(), n_outputs, y.cols));
        }
        if sample_weight.len() != y.rows {
            return Err(TreeError::ShapeMismatch(
                "sample weights".to_string(),
                y.rows,
                sample_weight.len(),
            ));
        }
        let mut labels = vec![0; y.rows * n_outputs];
        for (k, n_classes) in self.n_classes.iter().enumerate() {
            for (i, v) in y.get_col(k).iter().enumerate() {
                if !v.is_finite() || *v < 0.0 || v.fract() != 0.0 || *v as usize >= *n_classes {
                    return Err(TreeError::InvalidLabel(*v, k));
                }
                labels[i * n_outputs + k] = *v as usize;
            }
        }
        self.labels = labels;
        self.weights = sample_weight.to_vec();
        self.weighted_n_samples = weighted_n_samples;
        Ok(())
    }

    fn reset(&mut self, samples: &[usize], start: usize, end: usize) {
        let n_outputs = self.n_outputs();
        self.start = start;
        self.end = end;
        self.sum_total.iter_mut().for_each(|v| *v = 0.0);
        self.weighted_n_node_samples = 0.0;
        for i in &samples[start..end] {
            let w = self.weights[*i];
            for k in 0..n_outputs {
                let c = self.labels[i * n_outputs + k];
                self.sum_total[k * self.stride + c] += w;
            }
            self.weighted_n_node_samples += w;
        }
        self.rewind();
    }

    fn rewind(&mut self) {
        self.pos = self.start;
        self.weighted_n_left = 0.0;
        self.weighted_n_right = self.weighted_n_node_samples;
        self.sum_left.iter_mut().for_each(|v| *v = 0.0);
        self.sum_right.copy_from_slice(&self.sum_total);
    }

    fn update(&mut self, samples: &[usize], new_pos: usize) {
        debug_assert!(new_pos >= self.pos && new_pos <= self.end);
        let n_outputs = self.n_outputs();
        for i in &samples[self.pos..new_pos] {
            let w = self.weights[*i];
            for k in 0..n_outputs {
                let c = self.labels[i * n_outputs + k];
                self.sum_left[k * self.stride + c] += w;
            }
            self.weighted_n_left += w;
        }
        self.weighted_n_right = self.weighted_n_node_samples - self.weighted_n_left;
        for ((r, t), l) in self.sum_right.iter_mut().zip(&self.sum_total).zip(&self.sum_left) {
            *r = t - l;
        }
        self.pos = new_pos;
    }

    fn node_impurity(&self) -> f64 {
        self.impurity_of(&self.sum_total, self.weighted_n_node_samples)
    }

    fn children_impurity(&self) -> (f64, f64) {
        (
            self.impurity_of(&self.sum_left, self.weighted_n_left),
            self.impurity_of(&self.sum_right, self.weighted_n_right),
        )
    }

    fn node_value(&self) -> Vec<f64> {
        self.sum_total.clone()
    }

    fn weighted_n_samples(&self) -> f64 {
        self.weighted_n_samples
    }
    fn weighted_n_node_samples(&self) -> f64 {
        self.weighted_n_node_samples
    }
    fn weighted_n_left(&self) -> f64 {
        self.weighted_n_left
    }
    fn weighted_n_right(&self) -> f64 {
        self.weighted_n_right
    }
}

/// Mean squared error for regression, one weighted variance per output.
#[derive(Debug, Clone)]
pub struct SquaredError {
    n_outputs: usize,
    // Targets of each sample and output, row major.
    targets: Vec<f64>,
    weights: Vec<f64>,
    weighted_n_samples: f64,

    start: usize,
    pos: usize,
    end: usize,
    weighted_n_node_samples: f64,
    weighted_n_left: f64,
    weighted_n_right: f64,

    sum_total: Vec<f64>,
    sum_left: Vec<f64>,
    sum_right: Vec<f64>,
    sq_sum_total: f64,
    sq_sum_left: f64,
}

impl SquaredError {
    pub fn new(n_outputs: usize) -> Self {
        SquaredError {
            n_outputs,
            targets: Vec::new(),
            weights: Vec::new(),
            weighted_n_samples: 0.0,
            start: 0,
            pos: 0,
            end: 0,
            weighted_n_node_samples: 0.0,
            weighted_n_left: 0.0,
            weighted_n_right: 0.0,
            sum_total: vec![0.0; n_outputs],
            sum_left: vec![0.0; n_outputs],
            sum_right: vec![0.0; n_outputs],
            sq_sum_total: 0.0,
            sq_sum_left: 0.0,
        }
    }

    fn variance(&self, sums: &[f64], sq_sum: f64, weight: f64) -> f64 {
        if weight <= 0.0 {
            return 0.0;
        }
        let mean_sq: f64 = sums.iter().map(|s| (s / weight) * (s / weight)).sum();
        (sq_sum / weight - mean_sq) / self.n_outputs as f64
    }
}

impl Criterion for SquaredError {
    fn bind(&mut self, y: &Matrix<f64>, sample_weight: &[f64], weighted_n_samples: f64) -> Result<(), TreeError> {
        if y.cols != self.n_outputs {
            return Err(TreeError::ShapeMismatch(
                "label outputs".to_string(),
                self.n_outputs,
                y.cols,
            ));
        }
        if sample_weight.len() != y.rows {
            return Err(TreeError::ShapeMismatch(
                "sample weights".to_string(),
                y.rows,
                sample_weight.len(),
            ));
        }
        let mut targets = vec![0.0; y.rows * self.n_outputs];
        for k in 0..self.n_outputs {
            for (i, v) in y.get_col(k).iter().enumerate() {
                targets[i * self.n_outputs + k] = *v;
            }
        }
        self.targets = targets;
        self.weights = sample_weight.to_vec();
        self.weighted_n_samples = weighted_n_samples;
        Ok(())
    }

    fn reset(&mut self, samples: &[usize], start: usize, end: usize) {
        self.start = start;
        self.end = end;
        self.sum_total.iter_mut().for_each(|v| *v = 0.0);
        self.sq_sum_total = 0.0;
        self.weighted_n_node_samples = 0.0;
        for i in &samples[start..end] {
            let w = self.weights[*i];
            for k in 0..self.n_outputs {
                let y_ik = self.targets[i * self.n_outputs + k];
                self.sum_total[k] += w * y_ik;
                self.sq_sum_total += w * y_ik * y_ik;
            }
            self.weighted_n_node_samples += w;
        }
        self.rewind();
    }

    fn rewind(&mut self) {
        self.pos = self.start;
        self.weighted_n_left = 0.0;
        self.weighted_n_right = self.weighted_n_node_samples;
        self.sq_sum_left = 0.0;
        self.sum_left.iter_mut().for_each(|v| *v = 0.0);
        self.sum_right.copy_from_slice(&self.sum_total);
    }

    fn update(&mut self, samples: &[usize], new_pos: usize) {
        debug_assert!(new_pos >= self.pos && new_pos <= self.end);
        for i in &samples[self.pos..new_pos] {
            let w = self.weights[*i];
            for k in 0..self.n_outputs {
                let y_ik = self.targets[i * self.n_outputs + k];
                self.sum_left[k] += w * y_ik;
                self.sq_sum_left += w * y_ik * y_ik;
            }
            self.weighted_n_left += w;
        }
        self.weighted_n_right = self.weighted_n_node_samples - self.weighted_n_left;
        for k in 0..self.n_outputs {
            self.sum_right[k] = self.sum_total[k] - self.sum_left[k];
        }
        self.pos = new_pos;
    }

    fn node_impurity(&self) -> f64 {
        self.variance(&self.sum_total, self.sq_sum_total, self.weighted_n_node_samples)
    }

    fn children_impurity(&self) -> (f64, f64) {
        (
            self.variance(&self.sum_left, self.sq_sum_left, self.weighted_n_left),
            self.variance(
                &self.sum_right,
                self.sq_sum_total - self.sq_sum_left,
                self.weighted_n_right,
            ),
        )
    }

    fn proxy_impurity_improvement(&self) -> f64 {
        let side = |sums: &[f64], weight: f64| {
            if weight <= 0.0 {
                0.0
            } else {
                sums.iter().map(|s| s * s).sum::<f64>() / weight
            }
        };
        side(&self.sum_left, self.weighted_n_left) + side(&self.sum_right, self.weighted_n_right)
    }

    fn node_value(&self) -> Vec<f64> {
        if self.weighted_n_node_samples <= 0.0 {
            return vec![0.0; self.n_outputs];
        }
        self.sum_total
            .iter()
            .map(|s| s / self.weighted_n_node_samples)
            .collect()
    }

    fn weighted_n_samples(&self) -> f64 {
        self.weighted_n_samples
    }
    fn weighted_n_node_samples(&self) -> f64 {
        self.weighted_n_node_samples
    }
    fn weighted_n_left(&self) -> f64 {
        self.weighted_n_left
    }
    fn weighted_n_right(&self) -> f64 {
        self.weighted_n_right
    }
}
