use super::{FeatureVisit, SplitRecord, Splitter, SplitterBase, SplitterParams};
use crate::criterion::Criterion;
use crate::data::Matrix;
use crate::errors::TreeError;
use crate::utils::argsort;
use log::debug;

/// Exhaustive splitter that sorts every feature once at [`Splitter::init`]
/// and recovers each node's order by filtering the global order with a
/// membership mask, instead of sorting per node.
pub struct PresortBestSplitter<'a> {
    pub(crate) base: SplitterBase<'a>,
    /// `x_argsorted[f * n_total_samples..(f + 1) * n_total_samples]` lists
    /// every sample ordered by feature `f`.
    x_argsorted: Vec<usize>,
    n_total_samples: usize,
    sample_mask: Vec<bool>,
}

impl<'a> PresortBestSplitter<'a> {
    pub fn new(criterion: Box<dyn Criterion>, params: SplitterParams) -> Self {
        PresortBestSplitter {
            base: SplitterBase::new(criterion, params),
            x_argsorted: Vec::new(),
            n_total_samples: 0,
            sample_mask: Vec::new(),
        }
    }

    /// Fill `samples[start..end]` and `feature_values[start..end]` in
    /// ascending order of `feature`, using only the samples of the node.
    fn gather_sorted(
        base: &mut SplitterBase<'a>,
        sorted: &[usize],
        sample_mask: &[bool],
        feature: usize,
    ) {
        let col = base.x.get_col(feature);
        let mut p = base.start;
        for i in sorted {
            if sample_mask[*i] {
                base.samples[p] = *i;
                base.feature_values[p] = col[*i];
                p += 1;
            }
        }
        debug_assert_eq!(p, base.end);
    }
}

impl<'a> Splitter<'a> for PresortBestSplitter<'a> {
    fn base(&self) -> &SplitterBase<'a> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut SplitterBase<'a> {
        &mut self.base
    }

    fn init(&mut self, x: Matrix<'a, f64>, y: &Matrix<f64>, sample_weight: Option<&[f64]>) -> Result<(), TreeError> {
        self.base.init(x, y, sample_weight)?;
        self.n_total_samples = x.rows;
        self.x_argsorted = Vec::with_capacity(x.rows * x.cols);
        for feature in 0..x.cols {
            self.x_argsorted.extend(argsort(x.get_col(feature)));
        }
        self.sample_mask = vec![false; x.rows];
        debug!("Presorted {} features over {} samples.", x.cols, x.rows);
        Ok(())
    }

    fn node_split(&mut self, impurity: f64, n_constant_features: &mut usize) -> SplitRecord {
        let (start, end) = (self.base.start, self.base.end);
        let mut best = SplitRecord::new(end);
        if self.base.is_unsplittable() {
            return best;
        }
        let mut best_proxy_improvement = f64::NEG_INFINITY;

        for i in &self.base.samples[start..end] {
            self.sample_mask[*i] = true;
        }

        let n_total_samples = self.n_total_samples;
        let x_argsorted = &self.x_argsorted;
        let sample_mask = &self.sample_mask;
        self.base.sample_features(n_constant_features, |base, feature| {
            let sorted = &x_argsorted[feature * n_total_samples..(feature + 1) * n_total_samples];
            Self::gather_sorted(base, sorted, sample_mask, feature);
            if base.is_constant_sorted() {
                return FeatureVisit::Constant;
            }
            base.scan_sorted(feature, &mut best, &mut best_proxy_improvement);
            FeatureVisit::Candidate
        });

        self.base.finish_split(impurity, &mut best);

        for i in &self.base.samples[start..end] {
            self.sample_mask[*i] = false;
        }
        best
    }
}
