use super::{FeatureVisit, SplitRecord, Splitter, SplitterBase, SplitterParams};
use crate::criterion::Criterion;

/// Exhaustive splitter: sorts the node's values of every visited feature and
/// scans all cuts between distinct neighbouring values.
pub struct BestSplitter<'a> {
    pub(crate) base: SplitterBase<'a>,
}

impl<'a> BestSplitter<'a> {
    pub fn new(criterion: Box<dyn Criterion>, params: SplitterParams) -> Self {
        BestSplitter {
            base: SplitterBase::new(criterion, params),
        }
    }
}

impl<'a> Splitter<'a> for BestSplitter<'a> {
    fn base(&self) -> &SplitterBase<'a> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut SplitterBase<'a> {
        &mut self.base
    }

    fn node_split(&mut self, impurity: f64, n_constant_features: &mut usize) -> SplitRecord {
        let mut best = SplitRecord::new(self.base.end);
        if self.base.is_unsplittable() {
            return best;
        }
        let mut best_proxy_improvement = f64::NEG_INFINITY;

        self.base.sample_features(n_constant_features, |base, feature| {
            base.sort_by_feature(feature);
            if base.is_constant_sorted() {
                return FeatureVisit::Constant;
            }
            base.scan_sorted(feature, &mut best, &mut best_proxy_improvement);
            FeatureVisit::Candidate
        });

        // The scan ranked cuts by proxy, the partition recovers the exact figures.
        self.base.finish_split(impurity, &mut best);
        best
    }
}
