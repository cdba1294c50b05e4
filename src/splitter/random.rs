use super::{FeatureVisit, SplitRecord, Splitter, SplitterBase, SplitterParams};
use crate::constants::FEATURE_THRESHOLD;
use crate::criterion::Criterion;
use crate::utils::{pivot_on_threshold, pivot_on_threshold_cached, rand_uniform};

/// Randomised splitter: draws a single threshold per visited feature,
/// uniformly between the node's minimum and maximum value.
pub struct RandomSplitter<'a> {
    pub(crate) base: SplitterBase<'a>,
}

impl<'a> RandomSplitter<'a> {
    pub fn new(criterion: Box<dyn Criterion>, params: SplitterParams) -> Self {
        RandomSplitter {
            base: SplitterBase::new(criterion, params),
        }
    }
}

impl<'a> Splitter<'a> for RandomSplitter<'a> {
    fn base(&self) -> &SplitterBase<'a> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut SplitterBase<'a> {
        &mut self.base
    }

    fn node_split(&mut self, impurity: f64, n_constant_features: &mut usize) -> SplitRecord {
        let (start, end) = (self.base.start, self.base.end);
        let mut best = SplitRecord::new(end);
        if self.base.is_unsplittable() {
            return best;
        }
        let mut best_proxy_improvement = f64::NEG_INFINITY;
        let mut last_partitioned = None;

        self.base.sample_features(n_constant_features, |base, feature| {
            let col = base.x.get_col(feature);
            let mut min_feature_value = col[base.samples[start]];
            let mut max_feature_value = min_feature_value;
            for p in start..end {
                let v = col[base.samples[p]];
                base.feature_values[p] = v;
                if v < min_feature_value {
                    min_feature_value = v;
                } else if v > max_feature_value {
                    max_feature_value = v;
                }
            }
            if max_feature_value <= min_feature_value + FEATURE_THRESHOLD {
                return FeatureVisit::Constant;
            }

            let mut threshold = rand_uniform(min_feature_value, max_feature_value, &mut base.rng);
            if threshold == max_feature_value {
                threshold = min_feature_value;
            }
            let pos = pivot_on_threshold_cached(start, end, &mut base.samples, &mut base.feature_values, threshold);
            last_partitioned = Some(feature);

            if !base.admits_sizes(pos) {
                return FeatureVisit::Candidate;
            }
            base.criterion.rewind();
            base.criterion.update(&base.samples, pos);
            if !base.admits_weights() {
                return FeatureVisit::Candidate;
            }

            let proxy_improvement = base.criterion.proxy_impurity_improvement();
            if proxy_improvement > best_proxy_improvement {
                best_proxy_improvement = proxy_improvement;
                let (impurity_left, impurity_right) = base.criterion.children_impurity();
                best = SplitRecord {
                    feature,
                    threshold,
                    pos,
                    improvement: base.criterion.impurity_improvement(impurity),
                    impurity_left,
                    impurity_right,
                };
            }
            FeatureVisit::Candidate
        });

        // Samples are still partitioned by the last visited feature.
        if best.is_split(end) && last_partitioned != Some(best.feature) {
            let col = self.base.x.get_col(best.feature);
            best.pos = pivot_on_threshold(start, end, &mut self.base.samples, col, best.threshold);
        }
        best
    }
}
