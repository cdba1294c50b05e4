//! Splitter
//!
//! Split search over a contiguous block of the sample index array. All
//! variants share [`SplitterBase`], which owns the sample and feature index
//! arrays and draws the candidate features, and differ only in how they
//! evaluate a single candidate feature.
mod best;
mod presort;
mod random;

pub use best::BestSplitter;
pub use presort::PresortBestSplitter;
pub use random::RandomSplitter;

use crate::constants::FEATURE_THRESHOLD;
use crate::criterion::Criterion;
use crate::data::Matrix;
use crate::errors::TreeError;
use crate::utils::{midpoint, pivot_on_threshold, rand_int, total_cmp_pair};
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Result of one split search on `samples[start..end]`.
///
/// `pos == end` means no admissible split was found.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitRecord {
    /// Feature to split on.
    pub feature: usize,
    /// Samples with a feature value `<= threshold` go left.
    pub threshold: f64,
    /// First position of the right child in the sample array.
    pub pos: usize,
    /// Impurity improvement given the parent node.
    pub improvement: f64,
    /// Impurity of the left child.
    pub impurity_left: f64,
    /// Impurity of the right child.
    pub impurity_right: f64,
}

impl SplitRecord {
    pub fn new(start_pos: usize) -> Self {
        SplitRecord {
            feature: 0,
            threshold: 0.0,
            pos: start_pos,
            improvement: f64::NEG_INFINITY,
            impurity_left: f64::INFINITY,
            impurity_right: f64::INFINITY,
        }
    }

    /// Whether the search produced a split for a node ending at `end`.
    #[inline]
    pub fn is_split(&self, end: usize) -> bool {
        self.pos < end
    }
}

/// Construction time settings shared by every splitter.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct SplitterParams {
    /// Number of features to visit per search, clamped to the feature count.
    pub max_features: usize,
    /// Minimum number of samples on each side of a split.
    pub min_samples_leaf: usize,
    /// Minimum total sample weight on each side of a split.
    pub min_weight_leaf: f64,
    /// Seed of the random sequence used for feature and threshold draws.
    pub random_state: u64,
}

impl Default for SplitterParams {
    fn default() -> Self {
        SplitterParams {
            max_features: usize::MAX,
            min_samples_leaf: 1,
            min_weight_leaf: 0.0,
            random_state: 0,
        }
    }
}

/// The available split search strategies.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum SplitterKind {
    /// Exhaustive search over sorted feature values.
    #[default]
    Best,
    /// One random threshold per visited feature.
    Random,
    /// Exhaustive search walking a global presorted order.
    PresortBest,
}

impl SplitterKind {
    pub fn as_splitter<'a>(&self, criterion: Box<dyn Criterion>, params: SplitterParams) -> Box<dyn Splitter<'a> + 'a> {
        match self {
            SplitterKind::Best => Box::new(BestSplitter::new(criterion, params)),
            SplitterKind::Random => Box::new(RandomSplitter::new(criterion, params)),
            SplitterKind::PresortBest => Box::new(PresortBestSplitter::new(criterion, params)),
        }
    }
}

/// Outcome of visiting one candidate feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureVisit {
    /// All values of the node fall within [`FEATURE_THRESHOLD`].
    Constant,
    /// The feature was evaluated.
    Candidate,
}

/// State shared by every splitter.
///
/// `samples[start..end]` holds the samples of the node under consideration.
/// `features[..n_constant_features]` holds features known to be constant in
/// the current node, in the order they were handed down by the parent;
/// `constant_features` keeps a copy of that prefix so it can be restored for
/// siblings and children.
pub struct SplitterBase<'a> {
    pub criterion: Box<dyn Criterion>,
    pub params: SplitterParams,
    pub max_features: usize,

    pub x: Matrix<'a, f64>,
    pub samples: Vec<usize>,
    pub features: Vec<usize>,
    pub constant_features: Vec<usize>,
    pub feature_values: Vec<f64>,
    pub sample_weight: Vec<f64>,
    pub weighted_n_samples: f64,

    pub start: usize,
    pub end: usize,

    pub(crate) rng: StdRng,
    sort_buffer: Vec<(f64, usize)>,
}

impl<'a> SplitterBase<'a> {
    pub fn new(criterion: Box<dyn Criterion>, params: SplitterParams) -> Self {
        SplitterBase {
            criterion,
            params,
            max_features: params.max_features,
            x: Matrix::empty(),
            samples: Vec::new(),
            features: Vec::new(),
            constant_features: Vec::new(),
            feature_values: Vec::new(),
            sample_weight: Vec::new(),
            weighted_n_samples: 0.0,
            start: 0,
            end: 0,
            rng: StdRng::seed_from_u64(params.random_state),
            sort_buffer: Vec::new(),
        }
    }

    /// Bind the training data, validating that the inputs agree in shape.
    pub fn init(&mut self, x: Matrix<'a, f64>, y: &Matrix<f64>, sample_weight: Option<&[f64]>) -> Result<(), TreeError> {
        let n_samples = x.rows;
        if n_samples == 0 {
            return Err(TreeError::NoSamples);
        }
        if y.rows != n_samples {
            return Err(TreeError::ShapeMismatch("labels".to_string(), n_samples, y.rows));
        }
        let sample_weight = match sample_weight {
            Some(w) => {
                if w.len() != n_samples {
                    return Err(TreeError::ShapeMismatch("sample weights".to_string(), n_samples, w.len()));
                }
                if let Some((i, v)) = w.iter().enumerate().find(|(_, v)| v.is_nan() || **v < 0.0) {
                    return Err(TreeError::NegativeWeight(i, *v));
                }
                w.to_vec()
            }
            None => vec![1.0; n_samples],
        };
        let weighted_n_samples: f64 = sample_weight.iter().sum();
        self.criterion.bind(y, &sample_weight, weighted_n_samples)?;

        let n_features = x.cols;
        for f in 0..n_features {
            if let Some(i) = x.get_col(f).iter().position(|v| v.is_nan()) {
                return Err(TreeError::NaNFeatureValue(i, f));
            }
        }
        if self.params.max_features != usize::MAX && self.params.max_features > n_features {
            warn!(
                "max_features of {} is larger than the {} available features, visiting all features.",
                self.params.max_features, n_features
            );
        }
        self.max_features = self.params.max_features.clamp(1, n_features.max(1));

        self.x = x;
        self.samples = (0..n_samples).collect();
        self.features = (0..n_features).collect();
        self.constant_features = vec![0; n_features];
        self.feature_values = vec![0.0; n_samples];
        self.sample_weight = sample_weight;
        self.weighted_n_samples = weighted_n_samples;
        self.start = 0;
        self.end = n_samples;
        self.rng = StdRng::seed_from_u64(self.params.random_state);
        debug!(
            "Splitter bound to {} samples, {} features, weighted sample count {}.",
            n_samples, n_features, weighted_n_samples
        );
        Ok(())
    }

    pub fn node_reset(&mut self, start: usize, end: usize) -> f64 {
        debug_assert!(start <= end && end <= self.samples.len());
        self.start = start;
        self.end = end;
        self.criterion.reset(&self.samples, start, end);
        self.criterion.node_impurity()
    }

    /// Draw candidate features without replacement, calling `visit` on each.
    ///
    /// Known constant features are skipped without being visited. Drawing
    /// stops once `max_features` features were visited and at least one of
    /// them was not constant, or when only constant features remain.
    /// `n_constant_features` is updated for the children of this node.
    pub fn sample_features<F>(&mut self, n_constant_features: &mut usize, mut visit: F)
    where
        F: FnMut(&mut SplitterBase<'a>, usize) -> FeatureVisit,
    {
        let n_features = self.features.len();
        let n_known_constants = *n_constant_features;
        let mut n_total_constants = n_known_constants;
        let mut n_found_constants = 0;
        let mut n_drawn_constants = 0;
        let mut n_visited_features = 0;
        let mut f_i = n_features;

        while f_i > n_total_constants
            && (n_visited_features < self.max_features
                || n_visited_features <= n_found_constants + n_drawn_constants)
        {
            n_visited_features += 1;
            let f_j = rand_int(n_drawn_constants, f_i - n_found_constants, &mut self.rng);

            if f_j < n_known_constants {
                // Already known to be constant, move it into the drawn block.
                self.features.swap(f_j, n_drawn_constants);
                n_drawn_constants += 1;
                continue;
            }

            // f_j in [n_total_constants, f_i)
            let f_j = f_j + n_found_constants;
            let feature = self.features[f_j];
            match visit(self, feature) {
                FeatureVisit::Constant => {
                    self.features.swap(f_j, n_total_constants);
                    n_found_constants += 1;
                    n_total_constants += 1;
                }
                FeatureVisit::Candidate => {
                    f_i -= 1;
                    self.features.swap(f_i, f_j);
                }
            }
        }

        // Restore the inherited order of the known constants and record the new ones.
        self.features[..n_known_constants].copy_from_slice(&self.constant_features[..n_known_constants]);
        self.constant_features[n_known_constants..n_total_constants]
            .copy_from_slice(&self.features[n_known_constants..n_total_constants]);
        *n_constant_features = n_total_constants;
    }

    /// Sort `samples[start..end]` by the value of `feature`, leaving the
    /// sorted values in `feature_values[start..end]`.
    pub fn sort_by_feature(&mut self, feature: usize) {
        let col = self.x.get_col(feature);
        self.sort_buffer.clear();
        self.sort_buffer
            .extend(self.samples[self.start..self.end].iter().map(|i| (col[*i], *i)));
        self.sort_buffer.sort_unstable_by(total_cmp_pair);
        for (offset, (v, i)) in self.sort_buffer.iter().enumerate() {
            self.samples[self.start + offset] = *i;
            self.feature_values[self.start + offset] = *v;
        }
    }

    /// Nodes with fewer than two samples cannot be split.
    #[inline]
    pub fn is_unsplittable(&self) -> bool {
        self.end - self.start < 2
    }

    /// Whether the sorted `feature_values[start..end]` span less than
    /// [`FEATURE_THRESHOLD`].
    #[inline]
    pub fn is_constant_sorted(&self) -> bool {
        self.feature_values[self.end - 1] <= self.feature_values[self.start] + FEATURE_THRESHOLD
    }

    /// Whether a cut at `pos` leaves enough samples on both sides.
    #[inline]
    pub fn admits_sizes(&self, pos: usize) -> bool {
        pos - self.start >= self.params.min_samples_leaf && self.end - pos >= self.params.min_samples_leaf
    }

    /// Whether the criterion's current cut leaves enough weight on both sides.
    #[inline]
    pub fn admits_weights(&self) -> bool {
        self.criterion.weighted_n_left() >= self.params.min_weight_leaf
            && self.criterion.weighted_n_right() >= self.params.min_weight_leaf
    }

    /// Scan every admissible cut between distinct sorted values of
    /// `feature`, keeping the best by proxy improvement.
    ///
    /// Expects `samples[start..end]` sorted by `feature` with the matching
    /// values in `feature_values`.
    pub fn scan_sorted(&mut self, feature: usize, best: &mut SplitRecord, best_proxy_improvement: &mut f64) {
        let (start, end) = (self.start, self.end);
        self.criterion.rewind();
        let mut p = start;
        while p < end {
            while p + 1 < end && self.feature_values[p + 1] <= self.feature_values[p] + FEATURE_THRESHOLD {
                p += 1;
            }
            p += 1;
            if p >= end {
                break;
            }
            // feature_values[p] > feature_values[p - 1]
            if !self.admits_sizes(p) {
                continue;
            }
            self.criterion.update(&self.samples, p);
            if !self.admits_weights() {
                continue;
            }
            let proxy_improvement = self.criterion.proxy_impurity_improvement();
            if proxy_improvement > *best_proxy_improvement {
                *best_proxy_improvement = proxy_improvement;
                best.feature = feature;
                best.threshold = midpoint(self.feature_values[p - 1], self.feature_values[p]);
                best.pos = p;
            }
        }
    }

    /// Partition the node by the winning split and compute its exact
    /// improvement and child impurities.
    pub fn finish_split(&mut self, impurity: f64, best: &mut SplitRecord) {
        if !best.is_split(self.end) {
            return;
        }
        let col = self.x.get_col(best.feature);
        let pos = pivot_on_threshold(self.start, self.end, &mut self.samples, col, best.threshold);
        debug_assert_eq!(pos, best.pos);
        best.pos = pos;
        self.criterion.rewind();
        self.criterion.update(&self.samples, pos);
        best.improvement = self.criterion.impurity_improvement(impurity);
        let (impurity_left, impurity_right) = self.criterion.children_impurity();
        best.impurity_left = impurity_left;
        best.impurity_right = impurity_right;
    }
}

/// Split search over the samples of one node at a time.
pub trait Splitter<'a> {
    fn base(&self) -> &SplitterBase<'a>;
    fn base_mut(&mut self) -> &mut SplitterBase<'a>;

    /// Bind the training data.
    ///
    /// * `x` - Features, one column per feature.
    /// * `y` - Labels, one column per output.
    /// * `sample_weight` - Optional non-negative weights, uniform when absent.
    fn init(&mut self, x: Matrix<'a, f64>, y: &Matrix<f64>, sample_weight: Option<&[f64]>) -> Result<(), TreeError> {
        self.base_mut().init(x, y, sample_weight)
    }

    /// Move to the node `samples[start..end]` and return its impurity.
    fn node_reset(&mut self, start: usize, end: usize) -> f64 {
        self.base_mut().node_reset(start, end)
    }

    /// Find the best split of the current node, and partition its samples
    /// by it. Returns a record with `pos == end` if no split is admissible.
    ///
    /// * `impurity` - Impurity of the current node.
    /// * `n_constant_features` - Known constant feature count, updated for the children.
    fn node_split(&mut self, impurity: f64, n_constant_features: &mut usize) -> SplitRecord;

    fn node_value(&self) -> Vec<f64> {
        self.base().criterion.node_value()
    }

    fn node_impurity(&self) -> f64 {
        self.base().criterion.node_impurity()
    }

    fn weighted_n_node_samples(&self) -> f64 {
        self.base().criterion.weighted_n_node_samples()
    }

    fn n_samples(&self) -> usize {
        self.base().samples.len()
    }

    fn samples<'s>(&'s self) -> &'s [usize]
    where
        'a: 's,
    {
        &self.base().samples
    }
}

impl<'a, S: Splitter<'a> + ?Sized> Splitter<'a> for Box<S> {
    fn base(&self) -> &SplitterBase<'a> {
        (**self).base()
    }

    fn base_mut(&mut self) -> &mut SplitterBase<'a> {
        (**self).base_mut()
    }

    fn init(&mut self, x: Matrix<'a, f64>, y: &Matrix<f64>, sample_weight: Option<&[f64]>) -> Result<(), TreeError> {
        (**self).init(x, y, sample_weight)
    }

    fn node_split(&mut self, impurity: f64, n_constant_features: &mut usize) -> SplitRecord {
        (**self).node_split(impurity, n_constant_features)
    }
}
